//! hookwire
//!
//! Call interception for tests: swap the implementation of a named
//! function or method for a test double, observe what it was called with,
//! and put the original back afterwards.
//!
//! # Core Operations
//!
//! - **Hook**: run a function on every call and keep its latest result
//! - **Conditional return**: answer by named-argument match, first match wins
//! - **Consistent return**: one response per call, in order
//! - **Replace / Mute**: forward to another target / do nothing
//! - **Backup / Restore**: preserve the original once, rewind on demand
//!
//! # Architecture
//!
//! ```text
//! Interceptor ──> Installer ──> OverridePrimitive (Runtime)
//!      │              │
//!      │              └──> BackupStore
//!      └──> AttributeMutator ──> AttributePrimitive / ConstantPrimitive
//! ```
//!
//! # Example
//!
//! ```rust
//! use hookwire::{Condition, Function, Interceptor, Runtime, Value};
//!
//! let runtime = Runtime::new();
//! runtime
//!     .define_function("select_all", &["table", "limit"], Function::from_fn(|_| Ok(Value::Null)))
//!     .unwrap();
//!
//! let mut interceptor = Interceptor::new(runtime.clone());
//! interceptor
//!     .conditional_return(
//!         "select_all",
//!         vec![Condition::new("table", "user", Value::from(vec!["ann", "bob"]))],
//!         Value::List(vec![]),
//!         true,
//!     )
//!     .unwrap();
//!
//! let rows = runtime.call_named("select_all", &["user".into(), 10.into()]).unwrap();
//! assert_eq!(rows, Value::from(vec!["ann", "bob"]));
//!
//! interceptor.restore_all().unwrap();
//! assert_eq!(runtime.call_named("select_all", &["user".into()]).unwrap(), Value::Null);
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

// Core modules
pub mod attributes;
pub mod backup;
pub mod config;
pub mod error;
pub mod installer;
pub mod interceptor;

// Re-exports for convenience
pub use attributes::AttributeMutator;
pub use backup::BackupStore;
pub use config::InterceptorConfig;
pub use error::InterceptError;
pub use installer::{Installation, Installer};
pub use interceptor::{Interceptor, Result};

pub use hookwire_dispatch::{Condition, OutputSlot, Producer, ResponseSpec, SubstitutePolicy};
pub use hookwire_runtime::{
    AccessFlags, CallContext, CallError, Function, IntoTarget, ObjectRef, Runtime, TargetId,
    Value, Visibility,
};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for writing intercepting tests
    pub use crate::config::InterceptorConfig;
    pub use crate::error::InterceptError;
    pub use crate::interceptor::Interceptor;
    pub use hookwire_dispatch::{Condition, OutputSlot, ResponseSpec};
    pub use hookwire_runtime::{AccessFlags, Function, ObjectRef, Runtime, TargetId, Value};
}
