//! In-process function table
//!
//! Provides [`Runtime`], a cloneable handle over a process-wide table of
//! named functions, methods and constants. Code under test calls through
//! [`Runtime::call`]; the interception engine rebinds entries through the
//! primitive traits.

use crate::error::CallError;
use crate::function::{CallContext, Function};
use crate::primitive::{
    AccessFlags, AttributePrimitive, ConstantPrimitive, OverridePrimitive, Reflection,
};
use crate::target::{IntoTarget, TargetId};
use crate::value::Value;
use indexmap::IndexMap;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Implementation currently bound to a target
#[derive(Clone)]
enum Binding {
    /// Declared implementation with formal parameter names
    Declared { params: Vec<String>, body: Function },

    /// Anonymous substitute installed as an override
    Substitute(Function),
}

impl Binding {
    fn body(&self) -> &Function {
        match self {
            Self::Declared { body, .. } | Self::Substitute(body) => body,
        }
    }

    fn params(&self) -> &[String] {
        match self {
            Self::Declared { params, .. } => params,
            Self::Substitute(_) => &[],
        }
    }

    fn is_substitute(&self) -> bool {
        matches!(self, Self::Substitute(_))
    }
}

#[derive(Clone)]
struct Entry {
    binding: Binding,
    flags: AccessFlags,
}

#[derive(Default)]
struct RuntimeState {
    targets: HashMap<TargetId, Entry>,
    backups: HashMap<TargetId, Binding>,
    constants: IndexMap<String, Value>,
}

/// Shared function table
///
/// All clones refer to the same table; an override installed through one
/// handle is observed by calls through every other handle.
///
/// # Example
/// ```
/// use hookwire_runtime::{Function, Runtime, Value};
///
/// let runtime = Runtime::new();
/// let add = runtime
///     .define_function("add", &["a", "b"], Function::from_fn(|args| {
///         let a = args[0].as_int().unwrap_or_default();
///         let b = args[1].as_int().unwrap_or_default();
///         Ok(Value::Int(a + b))
///     }))
///     .unwrap();
///
/// let sum = runtime.call(&add, &[Value::Int(2), Value::Int(3)]).unwrap();
/// assert_eq!(sum, Value::Int(5));
/// ```
#[derive(Clone, Default)]
pub struct Runtime {
    state: Arc<RwLock<RuntimeState>>,
}

impl Runtime {
    /// Create empty runtime
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare (or redeclare) a free function
    ///
    /// # Errors
    /// Returns `InvalidTarget` if `name` is not a valid function name
    pub fn define_function(
        &self,
        name: &str,
        params: &[&str],
        body: Function,
    ) -> Result<TargetId, CallError> {
        let target = TargetId::function(name)?;
        self.declare(target.clone(), params, AccessFlags::PUBLIC, body);
        Ok(target)
    }

    /// Declare (or redeclare) a method
    ///
    /// # Errors
    /// Returns `InvalidTarget` if `class` or `method` is not a valid name
    pub fn define_method(
        &self,
        class: &str,
        method: &str,
        params: &[&str],
        flags: AccessFlags,
        body: Function,
    ) -> Result<TargetId, CallError> {
        let target = TargetId::method(class, method)?;
        self.declare(target.clone(), params, flags, body);
        Ok(target)
    }

    fn declare(&self, target: TargetId, params: &[&str], flags: AccessFlags, body: Function) {
        let binding = Binding::Declared {
            params: params.iter().map(ToString::to_string).collect(),
            body,
        };
        tracing::trace!(callee = %target, "declaring target");
        self.state
            .write()
            .targets
            .insert(target, Entry { binding, flags });
    }

    /// Call `target` from outside any class
    ///
    /// The binding is resolved at call time and the table lock is released
    /// before the body runs, so bodies may call back into the runtime.
    ///
    /// # Errors
    /// - `UndefinedTarget` if nothing is bound to `target`
    /// - `AccessDenied` if `target` is a non-public method
    /// - anything the bound body raises
    pub fn call(&self, target: &TargetId, args: &[Value]) -> Result<Value, CallError> {
        self.call_from(None, target, args)
    }

    /// Call `target` by any accepted name form
    ///
    /// # Errors
    /// As [`Runtime::call`], plus `InvalidTarget` for malformed names
    pub fn call_named(&self, target: impl IntoTarget, args: &[Value]) -> Result<Value, CallError> {
        let target = target.into_target()?;
        self.call(&target, args)
    }

    /// Call `target` on behalf of `caller`
    ///
    /// Non-public methods are reachable only when `caller` is a method of
    /// the same class.
    pub(crate) fn call_from(
        &self,
        caller: Option<&TargetId>,
        target: &TargetId,
        args: &[Value],
    ) -> Result<Value, CallError> {
        let body = {
            let state = self.state.read();
            let entry = state
                .targets
                .get(target)
                .ok_or_else(|| CallError::UndefinedTarget(target.clone()))?;

            let same_class = caller
                .and_then(TargetId::class)
                .is_some_and(|class| target.class() == Some(class));
            if !entry.flags.is_public() && !same_class {
                return Err(CallError::AccessDenied(target.clone()));
            }
            entry.binding.body().clone()
        };

        body.invoke(&CallContext::new(self, target), args)
    }

    /// Is anything bound to `target`?
    #[must_use]
    pub fn is_defined(&self, target: &TargetId) -> bool {
        self.state.read().targets.contains_key(target)
    }

    /// Access flags of `target`
    ///
    /// # Errors
    /// Returns `UndefinedTarget` if `target` does not exist
    pub fn flags(&self, target: &TargetId) -> Result<AccessFlags, CallError> {
        self.state
            .read()
            .targets
            .get(target)
            .map(|entry| entry.flags)
            .ok_or_else(|| CallError::UndefinedTarget(target.clone()))
    }

    /// Does `target` have a preserved original?
    #[must_use]
    pub fn has_backup(&self, target: &TargetId) -> bool {
        self.state.read().backups.contains_key(target)
    }

    /// Declare (or overwrite) a named constant
    pub fn define_constant(&self, name: impl Into<String>, value: impl Into<Value>) {
        self.state
            .write()
            .constants
            .insert(name.into(), value.into());
    }

    /// Current value of a named constant
    ///
    /// # Errors
    /// Returns `UndefinedConstant` if `name` was never defined
    pub fn constant(&self, name: &str) -> Result<Value, CallError> {
        self.state
            .read()
            .constants
            .get(name)
            .cloned()
            .ok_or_else(|| CallError::UndefinedConstant(name.to_string()))
    }
}

impl CallContext<'_> {
    /// Call another target from inside this body
    ///
    /// Non-public methods of the same class are reachable.
    ///
    /// # Errors
    /// As [`Runtime::call`]
    pub fn call(&self, target: &TargetId, args: &[Value]) -> Result<Value, CallError> {
        self.runtime().call_from(Some(self.target()), target, args)
    }
}

impl OverridePrimitive for Runtime {
    fn install_override(&self, target: &TargetId, substitute: Function) -> Result<(), CallError> {
        let mut state = self.state.write();
        let binding = Binding::Substitute(substitute);
        match state.targets.get_mut(target) {
            Some(entry) => entry.binding = binding,
            None => {
                state.targets.insert(
                    target.clone(),
                    Entry {
                        binding,
                        flags: AccessFlags::PUBLIC,
                    },
                );
            }
        }
        tracing::trace!(callee = %target, "override installed");
        Ok(())
    }

    fn backup_original(&self, target: &TargetId) -> Result<(), CallError> {
        let mut state = self.state.write();
        let binding = state
            .targets
            .get(target)
            .map(|entry| entry.binding.clone())
            .ok_or_else(|| CallError::UndefinedTarget(target.clone()))?;

        // The first preserved binding wins.
        state.backups.entry(target.clone()).or_insert(binding);
        Ok(())
    }

    fn restore_original(&self, target: &TargetId) -> Result<(), CallError> {
        let mut state = self.state.write();
        let binding = state
            .backups
            .remove(target)
            .ok_or_else(|| CallError::MissingBackup(target.clone()))?;

        match state.targets.get_mut(target) {
            Some(entry) => entry.binding = binding,
            None => {
                state.targets.insert(
                    target.clone(),
                    Entry {
                        binding,
                        flags: AccessFlags::PUBLIC,
                    },
                );
            }
        }
        tracing::trace!(callee = %target, "original restored");
        Ok(())
    }
}

impl AttributePrimitive for Runtime {
    fn set_flags(&self, target: &TargetId, flags: AccessFlags) -> Result<(), CallError> {
        let mut state = self.state.write();
        let entry = state
            .targets
            .get_mut(target)
            .ok_or_else(|| CallError::UndefinedTarget(target.clone()))?;
        entry.flags = flags;
        Ok(())
    }
}

impl ConstantPrimitive for Runtime {
    fn redefine_constant(&self, name: &str, value: Value) -> Result<(), CallError> {
        let mut state = self.state.write();
        let slot = state
            .constants
            .get_mut(name)
            .ok_or_else(|| CallError::UndefinedConstant(name.to_string()))?;
        *slot = value;
        Ok(())
    }
}

impl Reflection for Runtime {
    fn parameter_names(&self, target: &TargetId) -> Result<Vec<String>, CallError> {
        self.state
            .read()
            .targets
            .get(target)
            .map(|entry| entry.binding.params().to_vec())
            .ok_or_else(|| CallError::UndefinedTarget(target.clone()))
    }

    fn is_substitute(&self, target: &TargetId) -> Result<bool, CallError> {
        self.state
            .read()
            .targets
            .get(target)
            .map(|entry| entry.binding.is_substitute())
            .ok_or_else(|| CallError::UndefinedTarget(target.clone()))
    }
}

impl fmt::Debug for Runtime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state.read();
        f.debug_struct("Runtime")
            .field("targets", &state.targets.len())
            .field("backups", &state.backups.len())
            .field("constants", &state.constants.len())
            .finish()
    }
}
