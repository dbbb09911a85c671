//! Callable function bodies
//!
//! Provides [`Function`], the shared callable bound to a target, and the
//! [`CallContext`] handed to it on every invocation.

use crate::error::CallError;
use crate::runtime::Runtime;
use crate::target::TargetId;
use crate::value::Value;
use std::fmt;
use std::sync::Arc;

type Body = dyn Fn(&CallContext<'_>, &[Value]) -> Result<Value, CallError> + Send + Sync;

/// Per-invocation context
///
/// Gives a body access to the runtime it was called through (so it can
/// call other targets) and the target it was invoked as.
#[derive(Debug, Clone, Copy)]
pub struct CallContext<'a> {
    runtime: &'a Runtime,
    target: &'a TargetId,
}

impl<'a> CallContext<'a> {
    /// Create context for one call
    #[inline]
    #[must_use]
    pub fn new(runtime: &'a Runtime, target: &'a TargetId) -> Self {
        Self { runtime, target }
    }

    /// Runtime the call was made through
    #[inline]
    #[must_use]
    pub fn runtime(&self) -> &'a Runtime {
        self.runtime
    }

    /// Target being invoked
    #[inline]
    #[must_use]
    pub fn target(&self) -> &'a TargetId {
        self.target
    }
}

/// Shared callable
///
/// Cloning is cheap and yields a handle to the same body.
#[derive(Clone)]
pub struct Function(Arc<Body>);

impl Function {
    /// Wrap a body that needs the call context
    pub fn new<F>(body: F) -> Self
    where
        F: Fn(&CallContext<'_>, &[Value]) -> Result<Value, CallError> + Send + Sync + 'static,
    {
        Self(Arc::new(body))
    }

    /// Wrap a body that only looks at its arguments
    pub fn from_fn<F>(body: F) -> Self
    where
        F: Fn(&[Value]) -> Result<Value, CallError> + Send + Sync + 'static,
    {
        Self::new(move |_ctx, args| body(args))
    }

    /// Invoke the body
    ///
    /// # Errors
    /// Propagates whatever the body raises
    #[inline]
    pub fn invoke(&self, ctx: &CallContext<'_>, args: &[Value]) -> Result<Value, CallError> {
        (self.0)(ctx, args)
    }

    /// Same body?
    #[inline]
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Debug for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Function({:p})", Arc::as_ptr(&self.0).cast::<()>())
    }
}
