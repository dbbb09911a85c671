//! Constant return and mute dispatch

use crate::policy::SubstitutePolicy;
use crate::response::ResponseSpec;
use hookwire_runtime::{CallContext, CallError, Value};

/// Always resolve the same response, whatever the arguments
#[derive(Debug, Clone)]
pub struct ConstantReturn {
    response: ResponseSpec,
}

impl ConstantReturn {
    /// Create policy
    #[inline]
    #[must_use]
    pub fn new(response: ResponseSpec) -> Self {
        Self { response }
    }
}

impl SubstitutePolicy for ConstantReturn {
    fn respond(&self, _ctx: &CallContext<'_>, _args: &[Value]) -> Result<Value, CallError> {
        self.response.resolve()
    }

    fn name(&self) -> &'static str {
        "constant"
    }
}

/// Do nothing and return the empty value
#[derive(Debug, Clone, Copy, Default)]
pub struct Mute;

impl SubstitutePolicy for Mute {
    fn respond(&self, _ctx: &CallContext<'_>, _args: &[Value]) -> Result<Value, CallError> {
        Ok(Value::Null)
    }

    fn name(&self) -> &'static str {
        "mute"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hookwire_runtime::{ObjectRef, Runtime, TargetId};

    #[test]
    fn constant_ignores_arguments() {
        let rt = Runtime::new();
        let t = TargetId::Function("now".into());
        let ctx = CallContext::new(&rt, &t);
        let policy = ConstantReturn::new(ResponseSpec::literal(1_700_000_000i64));

        assert_eq!(policy.respond(&ctx, &[]).unwrap(), Value::Int(1_700_000_000));
        assert_eq!(
            policy.respond(&ctx, &[Value::from("ignored")]).unwrap(),
            Value::Int(1_700_000_000)
        );
    }

    #[test]
    fn constant_prototype_copied() {
        let rt = Runtime::new();
        let t = TargetId::Function("config".into());
        let ctx = CallContext::new(&rt, &t);
        let proto = ObjectRef::new("Config");
        let policy = ConstantReturn::new(proto.clone().into());

        let out = policy.respond(&ctx, &[]).unwrap();
        assert!(!out.as_object().unwrap().ptr_eq(&proto));
    }

    #[test]
    fn mute_returns_null() {
        let rt = Runtime::new();
        let t = TargetId::Function("send_mail".into());
        let out = Mute.respond(&CallContext::new(&rt, &t), &[Value::from("x")]);
        assert_eq!(out, Ok(Value::Null));
    }
}
