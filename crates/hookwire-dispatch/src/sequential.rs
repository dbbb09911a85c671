//! Sequential return dispatch
//!
//! Hands out a fixed sequence of responses, one per call.

use crate::policy::SubstitutePolicy;
use crate::response::ResponseSpec;
use hookwire_runtime::{CallContext, CallError, Value};
use std::sync::atomic::{AtomicUsize, Ordering};

/// Ordered responses plus a call counter
///
/// The counter starts at 0, is scoped to this policy value (so every new
/// installation starts over) and advances on every call, including calls
/// past the end of the sequence. Those fail with `IndexOutOfRange`; the
/// sequence never wraps around.
#[derive(Debug)]
pub struct SequentialReturn {
    responses: Vec<ResponseSpec>,
    calls: AtomicUsize,
}

impl SequentialReturn {
    /// Create policy
    #[inline]
    #[must_use]
    pub fn new(responses: Vec<ResponseSpec>) -> Self {
        Self {
            responses,
            calls: AtomicUsize::new(0),
        }
    }

    /// Number of calls made so far
    #[inline]
    #[must_use]
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Responses not yet handed out
    #[inline]
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.responses.len().saturating_sub(self.calls())
    }
}

impl SubstitutePolicy for SequentialReturn {
    fn respond(&self, ctx: &CallContext<'_>, _args: &[Value]) -> Result<Value, CallError> {
        let index = self.calls.fetch_add(1, Ordering::SeqCst);
        let response = self
            .responses
            .get(index)
            .ok_or_else(|| CallError::IndexOutOfRange {
                target: ctx.target().clone(),
                index,
                len: self.responses.len(),
            })?;
        response.resolve()
    }

    fn name(&self) -> &'static str {
        "sequential"
    }
}
