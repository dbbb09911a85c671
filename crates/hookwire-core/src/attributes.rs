//! Attribute and constant mutation
//!
//! Thin pass-through to the host's metadata primitives. No backup is kept
//! for either operation.

use hookwire_runtime::{AccessFlags, AttributePrimitive, CallError, ConstantPrimitive, TargetId, Value};

/// Rewrites access metadata and named constants
#[derive(Debug, Clone, Copy, Default)]
pub struct AttributeMutator;

impl AttributeMutator {
    /// Replace the access flags of `target`
    ///
    /// # Errors
    /// Forwards the primitive's failure (e.g. `UndefinedTarget`)
    pub fn set_access_attributes<P>(
        self,
        primitive: &P,
        target: &TargetId,
        flags: AccessFlags,
    ) -> Result<(), CallError>
    where
        P: AttributePrimitive + ?Sized,
    {
        primitive.set_flags(target, flags)?;
        tracing::info!(callee = %target, ?flags, "access attributes rewritten");
        Ok(())
    }

    /// Rebind the value of constant `name`
    ///
    /// # Errors
    /// Forwards the primitive's failure (e.g. `UndefinedConstant`)
    pub fn redefine_constant<P>(self, primitive: &P, name: &str, value: Value) -> Result<(), CallError>
    where
        P: ConstantPrimitive + ?Sized,
    {
        primitive.redefine_constant(name, value)?;
        tracing::info!(constant = name, "constant redefined");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hookwire_runtime::{Function, Runtime, Visibility};
    use pretty_assertions::assert_eq;

    #[test]
    fn exposes_private_method() {
        let rt = Runtime::new();
        let t = rt
            .define_method(
                "Vault",
                "secret",
                &[],
                AccessFlags::PRIVATE,
                Function::from_fn(|_| Ok(Value::from("s3cr3t"))),
            )
            .unwrap();
        assert!(rt.call(&t, &[]).is_err());

        AttributeMutator
            .set_access_attributes(&rt, &t, AccessFlags::PUBLIC)
            .unwrap();

        assert_eq!(rt.flags(&t).unwrap().visibility, Visibility::Public);
        assert_eq!(rt.call(&t, &[]).unwrap(), Value::from("s3cr3t"));
    }

    #[test]
    fn attributes_of_undefined_target() {
        let rt = Runtime::new();
        let t = TargetId::Function("ghost".into());
        let err = AttributeMutator
            .set_access_attributes(&rt, &t, AccessFlags::PUBLIC)
            .unwrap_err();
        assert!(err.is_undefined_target());
    }

    #[test]
    fn redefines_constant() {
        let rt = Runtime::new();
        rt.define_constant("MAX_USERS", 10);

        AttributeMutator
            .redefine_constant(&rt, "MAX_USERS", Value::Int(1))
            .unwrap();
        assert_eq!(rt.constant("MAX_USERS").unwrap(), Value::Int(1));
    }

    #[test]
    fn redefine_undefined_constant() {
        let rt = Runtime::new();
        let err = AttributeMutator
            .redefine_constant(&rt, "NOPE", Value::Null)
            .unwrap_err();
        assert_eq!(err, CallError::UndefinedConstant("NOPE".into()));
    }
}
