//! hookwire Dispatch
//!
//! Substitute policies that decide what an intercepted call returns.
//!
//! # Core Concepts
//!
//! - [`SubstitutePolicy`]: Core trait, one `respond` per intercepted call
//! - [`ResponseSpec`]: Literal, lazy producer, or copied prototype
//! - [`HookForward`]: Run a hook and record its result in an [`OutputSlot`]
//! - [`ConditionalReturn`]: First matching named-argument [`Condition`] wins
//! - [`SequentialReturn`]: One response per call, in order
//! - [`DelegatingReplace`]: Forward to another target resolved per call
//! - [`ConstantReturn`] / [`Mute`]: Fixed response / empty response
//!
//! # Example
//!
//! ```rust
//! use hookwire_dispatch::{into_substitute, Condition, ConditionalReturn, ResponseSpec};
//! use hookwire_runtime::{Function, OverridePrimitive, Reflection, Runtime, Value};
//! use std::sync::Arc;
//!
//! let runtime = Runtime::new();
//! let select = runtime
//!     .define_function("select_all", &["table"], Function::from_fn(|_| Ok(Value::Null)))
//!     .unwrap();
//!
//! let policy = ConditionalReturn::new(
//!     runtime.parameter_names(&select).unwrap(),
//!     vec![Condition::new("table", "user", "user rows")],
//!     ResponseSpec::null(),
//! );
//! runtime.install_override(&select, into_substitute(Arc::new(policy))).unwrap();
//!
//! let rows = runtime.call(&select, &[Value::from("user")]).unwrap();
//! assert_eq!(rows, Value::from("user rows"));
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

// Policy implementations
mod conditional;
mod constant;
mod hook;
mod policy;
mod replace;
mod response;
mod sequential;

// Re-exports
pub use conditional::{Condition, ConditionalReturn};
pub use constant::{ConstantReturn, Mute};
pub use hook::{HookForward, OutputSlot};
pub use policy::{into_substitute, CustomSubstitute, SubstitutePolicy};
pub use replace::DelegatingReplace;
pub use response::{resolve, Producer, ResponseSpec};
pub use sequential::SequentialReturn;

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
