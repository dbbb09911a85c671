//! Response specifications and their resolution
//!
//! Provides [`ResponseSpec`], the declared shape of a value a substitute
//! hands back, and [`resolve`], which turns it into a concrete [`Value`].

use hookwire_runtime::{CallError, ObjectRef, Value};
use std::fmt;
use std::sync::Arc;

/// Zero-argument callable evaluated at resolution time
#[derive(Clone)]
pub struct Producer(Arc<dyn Fn() -> Result<Value, CallError> + Send + Sync>);

impl Producer {
    /// Wrap a closure
    pub fn new<F>(f: F) -> Self
    where
        F: Fn() -> Result<Value, CallError> + Send + Sync + 'static,
    {
        Self(Arc::new(f))
    }

    /// Invoke the closure
    ///
    /// # Errors
    /// Propagates whatever the closure raises
    #[inline]
    pub fn produce(&self) -> Result<Value, CallError> {
        (self.0)()
    }
}

impl fmt::Debug for Producer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Producer({:p})", Arc::as_ptr(&self.0).cast::<()>())
    }
}

/// Declared response of a substitute
///
/// # Variants
/// - `Literal`: returned as-is
/// - `Producer`: invoked on every resolution, never cached
/// - `Prototype`: shallow-duplicated on every resolution
#[derive(Debug, Clone)]
pub enum ResponseSpec {
    /// Plain value
    Literal(Value),

    /// Lazily computed value
    Producer(Producer),

    /// Object copied per call
    Prototype(ObjectRef),
}

impl ResponseSpec {
    /// Literal response
    #[inline]
    #[must_use]
    pub fn literal(value: impl Into<Value>) -> Self {
        Self::Literal(value.into())
    }

    /// Producer response
    #[inline]
    pub fn producer<F>(f: F) -> Self
    where
        F: Fn() -> Result<Value, CallError> + Send + Sync + 'static,
    {
        Self::Producer(Producer::new(f))
    }

    /// Prototype response
    #[inline]
    #[must_use]
    pub fn prototype(object: ObjectRef) -> Self {
        Self::Prototype(object)
    }

    /// Empty response
    #[inline]
    #[must_use]
    pub fn null() -> Self {
        Self::Literal(Value::Null)
    }

    /// Resolve into a concrete value
    ///
    /// # Errors
    /// Propagates a producer's failure unchanged
    #[inline]
    pub fn resolve(&self) -> Result<Value, CallError> {
        resolve(self)
    }
}

/// Resolve a response specification
///
/// # Errors
/// Propagates a producer's failure unchanged
pub fn resolve(spec: &ResponseSpec) -> Result<Value, CallError> {
    match spec {
        ResponseSpec::Producer(producer) => producer.produce(),
        ResponseSpec::Prototype(object) => Ok(Value::Object(object.duplicate())),
        ResponseSpec::Literal(value) => Ok(value.clone()),
    }
}

impl Default for ResponseSpec {
    fn default() -> Self {
        Self::null()
    }
}

/// Object values become prototypes, everything else a literal
impl From<Value> for ResponseSpec {
    fn from(value: Value) -> Self {
        match value {
            Value::Object(object) => Self::Prototype(object),
            other => Self::Literal(other),
        }
    }
}

impl From<ObjectRef> for ResponseSpec {
    fn from(object: ObjectRef) -> Self {
        Self::Prototype(object)
    }
}

impl From<Producer> for ResponseSpec {
    fn from(producer: Producer) -> Self {
        Self::Producer(producer)
    }
}

impl From<()> for ResponseSpec {
    fn from((): ()) -> Self {
        Self::null()
    }
}

impl From<bool> for ResponseSpec {
    fn from(b: bool) -> Self {
        Self::Literal(Value::Bool(b))
    }
}

impl From<i64> for ResponseSpec {
    fn from(i: i64) -> Self {
        Self::Literal(Value::Int(i))
    }
}

impl From<i32> for ResponseSpec {
    fn from(i: i32) -> Self {
        Self::Literal(Value::from(i))
    }
}

impl From<f64> for ResponseSpec {
    fn from(f: f64) -> Self {
        Self::Literal(Value::Float(f))
    }
}

impl From<&str> for ResponseSpec {
    fn from(s: &str) -> Self {
        Self::Literal(Value::from(s))
    }
}

impl From<String> for ResponseSpec {
    fn from(s: String) -> Self {
        Self::Literal(Value::Str(s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn literal_returned_as_is() {
        let spec = ResponseSpec::literal(vec![1i64, 2]);
        assert_eq!(spec.resolve().unwrap(), Value::from(vec![1i64, 2]));
    }

    #[test]
    fn producer_invoked_every_time() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let spec = ResponseSpec::producer(move || {
            let n = counter.fetch_add(1, Ordering::SeqCst);
            Ok(Value::Int(i64::try_from(n).unwrap_or(i64::MAX)))
        });

        assert_eq!(spec.resolve().unwrap(), Value::Int(0));
        assert_eq!(spec.resolve().unwrap(), Value::Int(1));
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn producer_failure_propagates() {
        let spec = ResponseSpec::producer(|| Err(CallError::raised("connection refused")));
        assert_eq!(
            spec.resolve(),
            Err(CallError::Raised("connection refused".into()))
        );
    }

    #[test]
    fn prototype_never_aliases() {
        let proto = ObjectRef::new("User").with_field("name", "ann");
        let spec = ResponseSpec::prototype(proto.clone());

        let first = spec.resolve().unwrap();
        let second = spec.resolve().unwrap();
        let a = first.as_object().unwrap();
        let b = second.as_object().unwrap();

        assert!(!a.ptr_eq(&proto));
        assert!(!a.ptr_eq(b));
        assert_eq!(first, Value::Object(proto.clone()));

        a.set("name", "bob");
        assert_eq!(b.get("name"), Some(Value::from("ann")));
        assert_eq!(proto.get("name"), Some(Value::from("ann")));
    }

    #[test]
    fn object_values_become_prototypes() {
        let spec = ResponseSpec::from(Value::Object(ObjectRef::new("Row")));
        assert!(matches!(spec, ResponseSpec::Prototype(_)));

        let spec = ResponseSpec::from(Value::from("plain"));
        assert!(matches!(spec, ResponseSpec::Literal(_)));
    }

    #[test]
    fn default_is_null() {
        assert_eq!(ResponseSpec::default().resolve().unwrap(), Value::Null);
    }
}
