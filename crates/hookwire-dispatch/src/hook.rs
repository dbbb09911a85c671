//! Hook-and-forward dispatch
//!
//! Runs a caller-supplied function, records its result in an
//! [`OutputSlot`] and returns the same result.

use crate::policy::SubstitutePolicy;
use hookwire_runtime::{CallContext, CallError, Function, Value};
use parking_lot::Mutex;
use std::sync::Arc;

/// Single-value observation cell
///
/// Owned by the test, shared with the substitute. Every successful hooked
/// call overwrites the previous value; it never accumulates.
#[derive(Debug, Clone, Default)]
pub struct OutputSlot(Arc<Mutex<Option<Value>>>);

impl OutputSlot {
    /// Create empty slot
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Result of the latest hooked call
    #[must_use]
    pub fn get(&self) -> Option<Value> {
        self.0.lock().clone()
    }

    /// Take the latest result, leaving the slot empty
    pub fn take(&self) -> Option<Value> {
        self.0.lock().take()
    }

    /// Has any hooked call completed since creation or the last take?
    #[must_use]
    pub fn is_filled(&self) -> bool {
        self.0.lock().is_some()
    }

    fn store(&self, value: Value) {
        *self.0.lock() = Some(value);
    }
}

/// Observe what an indirect call produced without altering control flow
#[derive(Debug, Clone)]
pub struct HookForward {
    hook: Function,
    slot: OutputSlot,
}

impl HookForward {
    /// Create hook writing into `slot`
    #[inline]
    #[must_use]
    pub fn new(hook: Function, slot: OutputSlot) -> Self {
        Self { hook, slot }
    }

    /// Slot this hook writes to
    #[inline]
    #[must_use]
    pub fn slot(&self) -> &OutputSlot {
        &self.slot
    }
}

impl SubstitutePolicy for HookForward {
    fn respond(&self, ctx: &CallContext<'_>, args: &[Value]) -> Result<Value, CallError> {
        let result = self.hook.invoke(ctx, args)?;
        self.slot.store(result.clone());
        Ok(result)
    }

    fn name(&self) -> &'static str {
        "hook"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hookwire_runtime::{Runtime, TargetId};

    fn call(policy: &HookForward, args: &[Value]) -> Result<Value, CallError> {
        let rt = Runtime::new();
        let t = TargetId::Function("insert".into());
        policy.respond(&CallContext::new(&rt, &t), args)
    }

    #[test]
    fn slot_holds_latest_result() {
        let slot = OutputSlot::new();
        let hook = HookForward::new(
            Function::from_fn(|args| Ok(args[0].clone())),
            slot.clone(),
        );

        assert_eq!(call(&hook, &[Value::Int(1)]).unwrap(), Value::Int(1));
        assert_eq!(call(&hook, &[Value::Int(2)]).unwrap(), Value::Int(2));
        assert_eq!(slot.get(), Some(Value::Int(2)));
        assert_eq!(hook.slot().get(), Some(Value::Int(2)));
    }

    #[test]
    fn failing_hook_leaves_slot_untouched() {
        let slot = OutputSlot::new();
        let hook = HookForward::new(
            Function::from_fn(|_| Err(CallError::raised("boom"))),
            slot.clone(),
        );

        assert!(call(&hook, &[]).is_err());
        assert!(!slot.is_filled());
    }

    #[test]
    fn take_empties_slot() {
        let slot = OutputSlot::new();
        let hook = HookForward::new(Function::from_fn(|_| Ok(Value::Bool(true))), slot.clone());

        call(&hook, &[]).unwrap();
        assert_eq!(slot.take(), Some(Value::Bool(true)));
        assert!(slot.get().is_none());
    }
}
