//! Dynamic values passed to and returned from intercepted calls
//!
//! Provides [`Value`] and the shared, identity-carrying [`ObjectRef`].

use indexmap::IndexMap;
use parking_lot::Mutex;
use std::fmt;
use std::sync::Arc;

/// Dynamic value exchanged with runtime functions
///
/// Scalars, lists and maps have value semantics. Objects are shared
/// references: cloning a `Value::Object` clones the handle, not the object.
#[derive(Debug, Clone, Default)]
pub enum Value {
    /// Absent / empty result
    #[default]
    Null,

    /// Boolean
    Bool(bool),

    /// Signed integer
    Int(i64),

    /// Floating point number
    Float(f64),

    /// UTF-8 string
    Str(String),

    /// Ordered sequence
    List(Vec<Value>),

    /// Insertion-ordered mapping
    Map(IndexMap<String, Value>),

    /// Shared object instance
    Object(ObjectRef),
}

impl Value {
    /// Check for the empty value
    #[inline]
    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Borrow object handle, if this is an object
    #[inline]
    #[must_use]
    pub fn as_object(&self) -> Option<&ObjectRef> {
        match self {
            Self::Object(obj) => Some(obj),
            _ => None,
        }
    }

    /// Integer payload, if any
    #[inline]
    #[must_use]
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// String payload, if any
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Build a map value from key/value pairs
    #[must_use]
    pub fn map<K, I>(entries: I) -> Self
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, Value)>,
    {
        Self::Map(entries.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }

    /// Strict equality used for argument matching
    ///
    /// Same variant and same payload; no numeric coercion between
    /// `Int` and `Float`. Objects match only when they are the same
    /// instance. Lists and maps compare element-wise with the same rule,
    /// maps ignoring key order.
    #[must_use]
    pub fn strict_eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Null, Self::Null) => true,
            (Self::Bool(a), Self::Bool(b)) => a == b,
            (Self::Int(a), Self::Int(b)) => a == b,
            (Self::Float(a), Self::Float(b)) => a == b,
            (Self::Str(a), Self::Str(b)) => a == b,
            (Self::List(a), Self::List(b)) => {
                a.len() == b.len() && a.iter().zip(b).all(|(x, y)| x.strict_eq(y))
            }
            (Self::Map(a), Self::Map(b)) => {
                a.len() == b.len()
                    && a.iter()
                        .all(|(k, v)| b.get(k).is_some_and(|other| v.strict_eq(other)))
            }
            (Self::Object(a), Self::Object(b)) => a.ptr_eq(b),
            _ => false,
        }
    }
}

/// Structural equality: objects compare by class and fields
impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Object(a), Self::Object(b)) => a.structurally_eq(b),
            (Self::List(a), Self::List(b)) => a == b,
            (Self::Map(a), Self::Map(b)) => a == b,
            _ => self.strict_eq(other),
        }
    }
}

impl From<()> for Value {
    fn from((): ()) -> Self {
        Self::Null
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Self::Int(i)
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Self::Int(i64::from(i))
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Self::Float(f)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::Str(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::Str(s)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(items: Vec<T>) -> Self {
        Self::List(items.into_iter().map(Into::into).collect())
    }
}

impl From<ObjectRef> for Value {
    fn from(obj: ObjectRef) -> Self {
        Self::Object(obj)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => write!(f, "null"),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Int(i) => write!(f, "{i}"),
            Self::Float(x) => write!(f, "{x}"),
            Self::Str(s) => write!(f, "{s:?}"),
            Self::List(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{item}")?;
                }
                write!(f, "]")
            }
            Self::Map(entries) => {
                write!(f, "{{")?;
                for (i, (k, v)) in entries.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{k:?}: {v}")?;
                }
                write!(f, "}}")
            }
            Self::Object(obj) => write!(f, "{obj}"),
        }
    }
}

/// Object instance state
#[derive(Debug, Clone, PartialEq)]
pub struct Object {
    /// Class name
    pub class: String,

    /// Named properties, in declaration order
    pub fields: IndexMap<String, Value>,
}

/// Shared handle to an [`Object`]
///
/// Clones of the handle alias the same instance; use
/// [`ObjectRef::duplicate`] for an independent copy.
#[derive(Clone)]
pub struct ObjectRef(Arc<Mutex<Object>>);

impl ObjectRef {
    /// Create a new object of `class` with no fields
    #[must_use]
    pub fn new(class: impl Into<String>) -> Self {
        Self(Arc::new(Mutex::new(Object {
            class: class.into(),
            fields: IndexMap::new(),
        })))
    }

    /// Builder-style field initialisation
    #[must_use]
    pub fn with_field(self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.set(name, value);
        self
    }

    /// Class name
    #[must_use]
    pub fn class(&self) -> String {
        self.0.lock().class.clone()
    }

    /// Read a field
    #[must_use]
    pub fn get(&self, name: &str) -> Option<Value> {
        self.0.lock().fields.get(name).cloned()
    }

    /// Write a field, visible through every handle to this instance
    pub fn set(&self, name: impl Into<String>, value: impl Into<Value>) {
        self.0.lock().fields.insert(name.into(), value.into());
    }

    /// Snapshot of the object state
    #[must_use]
    pub fn snapshot(&self) -> Object {
        self.0.lock().clone()
    }

    /// Shallow copy into a new instance
    ///
    /// Fields are copied; object-valued fields keep pointing at the same
    /// nested instances.
    #[must_use]
    pub fn duplicate(&self) -> Self {
        Self(Arc::new(Mutex::new(self.snapshot())))
    }

    /// Same instance?
    #[inline]
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }

    /// Same class and structurally equal fields
    #[must_use]
    pub fn structurally_eq(&self, other: &Self) -> bool {
        if self.ptr_eq(other) {
            return true;
        }
        // Snapshot first so the two locks are never held together.
        let left = self.snapshot();
        let right = other.snapshot();
        left == right
    }
}

impl fmt::Debug for ObjectRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let obj = self.snapshot();
        f.debug_struct("ObjectRef")
            .field("class", &obj.class)
            .field("fields", &obj.fields)
            .finish()
    }
}

impl fmt::Display for ObjectRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{:p}", self.class(), Arc::as_ptr(&self.0))
    }
}
