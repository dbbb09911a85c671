//! Delegating replace dispatch
//!
//! Forwards every call to another target, resolved at call time.

use crate::policy::SubstitutePolicy;
use hookwire_runtime::{CallContext, CallError, TargetId, Value};

/// Swap one implementation wholesale for another
///
/// The delegate is looked up by name on every call, so redefining it after
/// installation is observed. Arguments are forwarded unmodified and in
/// order.
#[derive(Debug, Clone)]
pub struct DelegatingReplace {
    delegate: TargetId,
}

impl DelegatingReplace {
    /// Create policy forwarding to `delegate`
    #[inline]
    #[must_use]
    pub fn new(delegate: TargetId) -> Self {
        Self { delegate }
    }

    /// Delegate target
    #[inline]
    #[must_use]
    pub fn delegate(&self) -> &TargetId {
        &self.delegate
    }
}

impl SubstitutePolicy for DelegatingReplace {
    fn respond(&self, ctx: &CallContext<'_>, args: &[Value]) -> Result<Value, CallError> {
        ctx.call(&self.delegate, args)
    }

    fn name(&self) -> &'static str {
        "replace"
    }
}
