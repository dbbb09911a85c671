//! Error types raised by runtime calls and primitives
//!
//! Every failure is surfaced to the caller as a [`CallError`]; nothing is
//! retried or swallowed.

use crate::target::{TargetId, TargetParseError};

/// Errors raised while calling or manipulating runtime targets
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CallError {
    /// Named function or method does not exist
    #[error("undefined target: {0}")]
    UndefinedTarget(TargetId),

    /// Restore requested without a preserved original
    #[error("no backup preserved for {0}")]
    MissingBackup(TargetId),

    /// Sequential responses exhausted
    #[error("call #{index} to {target} exceeds the {len} configured responses")]
    IndexOutOfRange {
        /// Target that was called
        target: TargetId,
        /// Zero-based call index
        index: usize,
        /// Number of configured responses
        len: usize,
    },

    /// Non-public method invoked from outside its class
    #[error("cannot call non-public method {0}")]
    AccessDenied(TargetId),

    /// Named constant does not exist
    #[error("undefined constant: {0}")]
    UndefinedConstant(String),

    /// Target name could not be parsed
    #[error("invalid target: {0}")]
    InvalidTarget(#[from] TargetParseError),

    /// Failure raised by a function body, hook or producer
    #[error("{0}")]
    Raised(String),
}

impl CallError {
    /// Create failure raised by user code
    #[inline]
    pub fn raised(message: impl Into<String>) -> Self {
        Self::Raised(message.into())
    }

    /// Check for an undefined target
    #[inline]
    #[must_use]
    pub fn is_undefined_target(&self) -> bool {
        matches!(self, Self::UndefinedTarget(_))
    }

    /// Check for a restore without backup
    #[inline]
    #[must_use]
    pub fn is_missing_backup(&self) -> bool {
        matches!(self, Self::MissingBackup(_))
    }

    /// Check for exhausted sequential responses
    #[inline]
    #[must_use]
    pub fn is_index_out_of_range(&self) -> bool {
        matches!(self, Self::IndexOutOfRange { .. })
    }

    /// Target the error refers to, if any
    #[must_use]
    pub fn target(&self) -> Option<&TargetId> {
        match self {
            Self::UndefinedTarget(t)
            | Self::MissingBackup(t)
            | Self::AccessDenied(t)
            | Self::IndexOutOfRange { target: t, .. } => Some(t),
            Self::UndefinedConstant(_) | Self::InvalidTarget(_) | Self::Raised(_) => None,
        }
    }
}
