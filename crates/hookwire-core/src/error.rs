//! Error types for the interception engine
//!
//! Provides error handling for:
//! - Conditional dispatch on an already-overridden target
//! - Failures forwarded from the runtime primitives
//! - Malformed target names and configuration

use hookwire_runtime::{CallError, TargetId, TargetParseError};

/// Main interception error type
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum InterceptError {
    /// Conditional dispatch requested on a target bound to a substitute
    #[error("cannot apply conditions to {0}: it is bound to a substitute, restore it first")]
    UnsupportedTargetKind(TargetId),

    /// Failure raised by a primitive or an intercepted call
    #[error(transparent)]
    Call(#[from] CallError),

    /// Target name could not be parsed
    #[error("invalid target: {0}")]
    InvalidTarget(#[from] TargetParseError),

    /// Configuration could not be loaded
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

impl InterceptError {
    /// Check for a restore without backup
    #[inline]
    #[must_use]
    pub fn is_missing_backup(&self) -> bool {
        matches!(self, Self::Call(e) if e.is_missing_backup())
    }

    /// Check for an undefined target
    #[inline]
    #[must_use]
    pub fn is_undefined_target(&self) -> bool {
        matches!(self, Self::Call(e) if e.is_undefined_target())
    }

    /// Check for exhausted sequential responses
    #[inline]
    #[must_use]
    pub fn is_index_out_of_range(&self) -> bool {
        matches!(self, Self::Call(e) if e.is_index_out_of_range())
    }

    /// Check for conditional dispatch on an overridden target
    #[inline]
    #[must_use]
    pub fn is_unsupported_target_kind(&self) -> bool {
        matches!(self, Self::UnsupportedTargetKind(_))
    }
}
