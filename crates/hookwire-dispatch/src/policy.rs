//! Substitute policy trait
//!
//! Provides the [`SubstitutePolicy`] trait implemented by every dispatch
//! strategy, and the adapter that turns a policy into an installable
//! [`Function`].

use hookwire_runtime::{CallContext, CallError, Function, Value};
use std::fmt;
use std::sync::Arc;

/// Decides what an intercepted call returns
///
/// One implementation per dispatch strategy. A policy is stateless with
/// respect to the runtime; any per-installation state (such as a call
/// counter) lives inside the policy value itself.
pub trait SubstitutePolicy: Send + Sync + fmt::Debug {
    /// Produce the result of one intercepted call
    ///
    /// # Errors
    /// Returns whatever the policy, its hook, delegate or producer raises
    fn respond(&self, ctx: &CallContext<'_>, args: &[Value]) -> Result<Value, CallError>;

    /// Strategy name (for debugging and introspection)
    fn name(&self) -> &'static str;
}

/// Substitute function that forwards every call to `policy`
#[must_use]
pub fn into_substitute(policy: Arc<dyn SubstitutePolicy>) -> Function {
    Function::new(move |ctx, args| policy.respond(ctx, args))
}

/// Arbitrary caller-supplied substitute
///
/// Used for raw installs where the test provides the whole body.
#[derive(Clone)]
pub struct CustomSubstitute {
    body: Function,
}

impl CustomSubstitute {
    /// Wrap a function body
    #[inline]
    #[must_use]
    pub fn new(body: Function) -> Self {
        Self { body }
    }
}

impl fmt::Debug for CustomSubstitute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CustomSubstitute")
            .field("body", &self.body)
            .finish()
    }
}

impl SubstitutePolicy for CustomSubstitute {
    fn respond(&self, ctx: &CallContext<'_>, args: &[Value]) -> Result<Value, CallError> {
        self.body.invoke(ctx, args)
    }

    fn name(&self) -> &'static str {
        "custom"
    }
}
