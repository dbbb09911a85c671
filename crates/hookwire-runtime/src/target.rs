//! Target identifiers
//!
//! Provides [`TargetId`], the key for every piece of per-target state.

use serde::{Deserialize, Serialize};
use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

/// Separator between class and method in the textual form
pub const METHOD_SEPARATOR: &str = "::";

/// Names an interception target
///
/// # Examples
/// - `foo` → free function `foo`
/// - `Database::query` → method `query` of class `Database`
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum TargetId {
    /// Free function
    Function(String),

    /// Method on a class
    Method {
        /// Owning class
        class: String,
        /// Member name
        method: String,
    },
}

impl TargetId {
    /// Free function target
    ///
    /// # Errors
    /// Returns error if the name is empty or not an identifier
    pub fn function(name: impl Into<String>) -> Result<Self, TargetParseError> {
        let name = name.into();
        validate_segment(&name)?;
        Ok(Self::Function(name))
    }

    /// Method target
    ///
    /// # Errors
    /// Returns error if either part is empty or not an identifier
    pub fn method(
        class: impl Into<String>,
        method: impl Into<String>,
    ) -> Result<Self, TargetParseError> {
        let class = class.into();
        let method = method.into();
        validate_segment(&class)?;
        validate_segment(&method)?;
        Ok(Self::Method { class, method })
    }

    /// Function or member name
    #[inline]
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Function(name) => name,
            Self::Method { method, .. } => method,
        }
    }

    /// Owning class, for methods
    #[inline]
    #[must_use]
    pub fn class(&self) -> Option<&str> {
        match self {
            Self::Function(_) => None,
            Self::Method { class, .. } => Some(class),
        }
    }

    /// Is this a method target?
    #[inline]
    #[must_use]
    pub fn is_method(&self) -> bool {
        matches!(self, Self::Method { .. })
    }
}

fn validate_segment(segment: &str) -> Result<(), TargetParseError> {
    if segment.is_empty() {
        return Err(TargetParseError::EmptyName);
    }
    let starts_ok = segment
        .chars()
        .next()
        .is_some_and(|c| c.is_alphabetic() || c == '_');
    if !starts_ok || segment.contains(|c: char| !c.is_alphanumeric() && c != '_') {
        return Err(TargetParseError::InvalidName(segment.to_string()));
    }
    Ok(())
}

impl Display for TargetId {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Function(name) => write!(f, "{name}"),
            Self::Method { class, method } => write!(f, "{class}{METHOD_SEPARATOR}{method}"),
        }
    }
}

impl FromStr for TargetId {
    type Err = TargetParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        match s.split_once(METHOD_SEPARATOR) {
            Some((class, method)) => Self::method(class, method),
            None => Self::function(s),
        }
    }
}

impl TryFrom<&str> for TargetId {
    type Error = TargetParseError;

    fn try_from(s: &str) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl TryFrom<(&str, &str)> for TargetId {
    type Error = TargetParseError;

    fn try_from((class, method): (&str, &str)) -> Result<Self, Self::Error> {
        Self::method(class, method)
    }
}

/// Conversion into a [`TargetId`]
///
/// Accepted forms: `"name"`, `"Class::method"`, `("Class", "method")`, or
/// an existing identifier.
pub trait IntoTarget {
    /// Normalise into a validated identifier
    ///
    /// # Errors
    /// Returns error if the textual form is not a valid target
    fn into_target(self) -> Result<TargetId, TargetParseError>;
}

impl IntoTarget for TargetId {
    fn into_target(self) -> Result<TargetId, TargetParseError> {
        Ok(self)
    }
}

impl IntoTarget for &TargetId {
    fn into_target(self) -> Result<TargetId, TargetParseError> {
        Ok(self.clone())
    }
}

impl IntoTarget for &str {
    fn into_target(self) -> Result<TargetId, TargetParseError> {
        self.parse()
    }
}

impl IntoTarget for String {
    fn into_target(self) -> Result<TargetId, TargetParseError> {
        self.parse()
    }
}

impl IntoTarget for (&str, &str) {
    fn into_target(self) -> Result<TargetId, TargetParseError> {
        TargetId::method(self.0, self.1)
    }
}

/// Errors for target identifier parsing
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TargetParseError {
    /// Empty function, class or method name
    #[error("target name cannot be empty")]
    EmptyName,

    /// Name is not a valid identifier
    #[error("invalid target name: '{0}'")]
    InvalidName(String),
}
