//! hookwire Runtime
//!
//! In-process function table that code under test calls through, and the
//! low-level primitives the interception engine drives.
//!
//! # Core Concepts
//!
//! - [`Runtime`]: Shared table of functions, methods and constants
//! - [`TargetId`]: Function name or class+method pair
//! - [`Value`]: Dynamic call arguments and results
//! - [`Function`]: Shared callable bound to a target
//! - [`OverridePrimitive`], [`AttributePrimitive`], [`ConstantPrimitive`],
//!   [`Reflection`]: Commands the engine issues
//!
//! # Example
//!
//! ```rust
//! use hookwire_runtime::{Function, OverridePrimitive, Runtime, Value};
//!
//! let runtime = Runtime::new();
//! let now = runtime
//!     .define_function("now", &[], Function::from_fn(|_| Ok(Value::Int(1_700_000_000))))
//!     .unwrap();
//!
//! runtime.backup_original(&now).unwrap();
//! runtime.install_override(&now, Function::from_fn(|_| Ok(Value::Int(0)))).unwrap();
//! assert_eq!(runtime.call(&now, &[]).unwrap(), Value::Int(0));
//!
//! runtime.restore_original(&now).unwrap();
//! assert_eq!(runtime.call(&now, &[]).unwrap(), Value::Int(1_700_000_000));
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

mod error;
mod function;
mod primitive;
mod runtime;
mod target;
mod value;

// Re-exports
pub use error::CallError;
pub use function::{CallContext, Function};
pub use primitive::{
    AccessFlags, AttributePrimitive, ConstantPrimitive, Host, OverridePrimitive, Reflection,
    Visibility,
};
pub use runtime::Runtime;
pub use target::{IntoTarget, TargetId, TargetParseError, METHOD_SEPARATOR};
pub use value::{Object, ObjectRef, Value};

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for runtime operations
    pub use crate::{
        AccessFlags, CallContext, CallError, Function, IntoTarget, ObjectRef, OverridePrimitive,
        Reflection, Runtime, TargetId, Value,
    };
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
