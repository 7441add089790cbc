//! In-flight request ledger for loading-state bookkeeping.
//!
//! The ledger is an explicit context object shared by callers (no ambient
//! process-wide singleton). Each in-flight operation brackets itself with
//! [`RequestLedger::begin`] / [`RequestLedger::end`]; the surrounding UI
//! reads [`RequestLedger::is_busy`] / [`RequestLedger::is_masking`] to
//! decide whether to render a blocking overlay.

use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use uuid::Uuid;

/// Opaque handle identifying one in-flight operation.
///
/// Written by exactly one call and removed by the same call's completion
/// path, so handles never contend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestHandle(String);

impl RequestHandle {
    fn fresh() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// The handle's unique string form.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

struct LedgerState<T> {
    /// Outstanding operations keyed by handle.
    queue: BTreeMap<String, T>,
    /// Handles whose operations should visually block interaction,
    /// in begin order.
    mask: Vec<String>,
}

/// Tracker for outstanding operations, with a masking subset.
pub struct RequestLedger<T> {
    inner: Mutex<LedgerState<T>>,
}

impl<T> RequestLedger<T> {
    /// Create an empty ledger.
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(LedgerState {
                queue: BTreeMap::new(),
                mask: Vec::new(),
            }),
        }
    }

    fn state(&self) -> MutexGuard<'_, LedgerState<T>> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Register a new in-flight operation.
    ///
    /// # Arguments
    /// * `payload` - Arbitrary value associated with the operation
    /// * `masking` - Whether the operation should block interaction
    ///
    /// # Returns
    /// A fresh unique handle for the matching [`end`](Self::end) call.
    pub fn begin(&self, payload: T, masking: bool) -> RequestHandle {
        let handle: RequestHandle = RequestHandle::fresh();
        let mut state = self.state();
        state.queue.insert(handle.0.clone(), payload);
        if masking {
            state.mask.push(handle.0.clone());
        }
        handle
    }

    /// Complete an operation, removing it from the ledger.
    ///
    /// # Arguments
    /// * `handle` - Handle returned by [`begin`](Self::begin)
    ///
    /// # Returns
    /// The payload stored at begin time, or `None` for an unknown handle.
    pub fn end(&self, handle: &RequestHandle) -> Option<T> {
        let mut state = self.state();
        let payload: Option<T> = state.queue.remove(&handle.0);
        if payload.is_some() {
            if let Some(index) = state.mask.iter().position(|k| k == &handle.0) {
                state.mask.remove(index);
            }
        }
        payload
    }

    /// Whether any operation is outstanding.
    pub fn is_busy(&self) -> bool {
        !self.state().queue.is_empty()
    }

    /// Whether any masking operation is outstanding.
    pub fn is_masking(&self) -> bool {
        !self.state().mask.is_empty()
    }

    /// Number of outstanding operations.
    pub fn len(&self) -> usize {
        self.state().queue.len()
    }

    /// Whether the ledger is empty.
    pub fn is_empty(&self) -> bool {
        !self.is_busy()
    }

    /// Drop all outstanding entries.
    ///
    /// The masking set is left as-is; `end` still clears its handles when
    /// the bracketing calls complete.
    pub fn clear(&self) {
        self.state().queue.clear();
    }
}

impl<T> Default for RequestLedger<T> {
    fn default() -> Self {
        Self::new()
    }
}
