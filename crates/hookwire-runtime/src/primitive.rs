//! Low-level primitive traits
//!
//! The interception engine only ever issues commands through these traits.
//! [`Runtime`](crate::Runtime) implements all of them; tests substitute
//! mocks to observe command ordering.

use crate::error::CallError;
use crate::function::Function;
use crate::target::TargetId;
use crate::value::Value;
use serde::{Deserialize, Serialize};

/// Override, backup and restore of target implementations
///
/// All operations are atomic and take effect immediately for every caller.
pub trait OverridePrimitive {
    /// Bind `substitute` as the active implementation of `target`
    ///
    /// # Errors
    /// Returns error if the primitive rejects the target
    fn install_override(&self, target: &TargetId, substitute: Function) -> Result<(), CallError>;

    /// Preserve the currently bound implementation of `target`
    ///
    /// # Errors
    /// Returns `UndefinedTarget` if nothing is bound to `target`
    fn backup_original(&self, target: &TargetId) -> Result<(), CallError>;

    /// Rebind the preserved implementation of `target` and forget it
    ///
    /// # Errors
    /// Returns `MissingBackup` if no implementation was preserved
    fn restore_original(&self, target: &TargetId) -> Result<(), CallError>;
}

/// Access metadata changes
pub trait AttributePrimitive {
    /// Replace the access flags of `target`
    ///
    /// # Errors
    /// Returns `UndefinedTarget` if `target` does not exist
    fn set_flags(&self, target: &TargetId, flags: AccessFlags) -> Result<(), CallError>;
}

/// Named constant redefinition
pub trait ConstantPrimitive {
    /// Rebind the value of constant `name` process-wide
    ///
    /// # Errors
    /// Returns `UndefinedConstant` if `name` was never defined
    fn redefine_constant(&self, name: &str, value: Value) -> Result<(), CallError>;
}

/// Signature introspection
pub trait Reflection {
    /// Ordered formal parameter names of the implementation bound to `target`
    ///
    /// Substitutes have no formal parameters and report an empty list.
    ///
    /// # Errors
    /// Returns `UndefinedTarget` if `target` does not exist
    fn parameter_names(&self, target: &TargetId) -> Result<Vec<String>, CallError>;

    /// Whether `target` currently resolves to an anonymous substitute
    ///
    /// # Errors
    /// Returns `UndefinedTarget` if `target` does not exist
    fn is_substitute(&self, target: &TargetId) -> Result<bool, CallError>;
}

/// Everything the interception engine needs from its host
pub trait Host: OverridePrimitive + AttributePrimitive + ConstantPrimitive + Reflection {}

impl<T> Host for T where T: OverridePrimitive + AttributePrimitive + ConstantPrimitive + Reflection {}

/// Member visibility
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Visibility {
    /// Callable from anywhere
    #[default]
    Public,

    /// Callable from the class and its subclasses
    Protected,

    /// Callable from the class only
    Private,
}

/// Access metadata of a target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct AccessFlags {
    /// Member visibility
    pub visibility: Visibility,

    /// Static member
    pub is_static: bool,

    /// Cannot be overridden by subclasses
    pub is_final: bool,
}

impl AccessFlags {
    /// Public, non-static, non-final
    pub const PUBLIC: Self = Self::with_visibility(Visibility::Public);

    /// Protected, non-static, non-final
    pub const PROTECTED: Self = Self::with_visibility(Visibility::Protected);

    /// Private, non-static, non-final
    pub const PRIVATE: Self = Self::with_visibility(Visibility::Private);

    /// Flags with the given visibility only
    #[inline]
    #[must_use]
    pub const fn with_visibility(visibility: Visibility) -> Self {
        Self {
            visibility,
            is_static: false,
            is_final: false,
        }
    }

    /// Mark as static
    #[inline]
    #[must_use]
    pub const fn as_static(mut self) -> Self {
        self.is_static = true;
        self
    }

    /// Mark as final
    #[inline]
    #[must_use]
    pub const fn as_final(mut self) -> Self {
        self.is_final = true;
        self
    }

    /// Can outside code call the member directly?
    #[inline]
    #[must_use]
    pub fn is_public(&self) -> bool {
        self.visibility == Visibility::Public
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_flags_are_public() {
        let flags = AccessFlags::default();
        assert_eq!(flags, AccessFlags::PUBLIC);
        assert!(flags.is_public());
    }

    #[test]
    fn flag_builders() {
        let flags = AccessFlags::PRIVATE.as_static().as_final();
        assert!(!flags.is_public());
        assert!(flags.is_static);
        assert!(flags.is_final);
    }
}
