//! Interceptor configuration

use crate::error::InterceptError;
use serde::{Deserialize, Serialize};

/// Interceptor behaviour switches
///
/// # Example
/// ```
/// use hookwire::InterceptorConfig;
///
/// let config = InterceptorConfig::from_json(r#"{ "trace_calls": true }"#).unwrap();
/// assert!(config.trace_calls);
/// assert!(!config.backup_by_default);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct InterceptorConfig {
    /// Preserve originals for operations that take no explicit backup flag
    pub backup_by_default: bool,
    /// Emit a debug event for every intercepted call
    pub trace_calls: bool,
    /// Restore every backed-up target when the interceptor is reset
    pub restore_on_reset: bool,
}

impl Default for InterceptorConfig {
    fn default() -> Self {
        Self {
            backup_by_default: false,
            trace_calls: false,
            restore_on_reset: true,
        }
    }
}

impl InterceptorConfig {
    /// Create default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With default backup behaviour
    #[inline]
    #[must_use]
    pub fn with_backup_by_default(mut self, backup: bool) -> Self {
        self.backup_by_default = backup;
        self
    }

    /// With per-call tracing
    #[inline]
    #[must_use]
    pub fn with_trace_calls(mut self, trace: bool) -> Self {
        self.trace_calls = trace;
        self
    }

    /// With restore-on-reset behaviour
    #[inline]
    #[must_use]
    pub fn with_restore_on_reset(mut self, restore: bool) -> Self {
        self.restore_on_reset = restore;
        self
    }

    /// Parse a JSON document; missing keys keep their defaults
    ///
    /// # Errors
    /// Returns `InvalidConfig` if the document is malformed
    pub fn from_json(json: &str) -> Result<Self, InterceptError> {
        serde_json::from_str(json).map_err(|e| InterceptError::InvalidConfig(e.to_string()))
    }
}
