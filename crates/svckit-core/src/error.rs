//! Two-kind error taxonomy shared by every svckit layer.
//!
//! `System` errors are unexpected infrastructure failures; `Business` errors
//! are expected domain-rule violations with a user-facing message. Both carry
//! a code resolvable against [`ResultCode`] and are converted to a response
//! envelope exactly once, at the outermost request boundary. No retry or
//! recovery happens at this layer.

use crate::envelope::ResultCode;
use thiserror::Error;

/// Unified error type for svckit operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SvcError {
    /// Unexpected infrastructure failure. Fatal to the current request.
    #[error("{message}")]
    System { code: i32, message: String },

    /// Expected domain-rule violation. The message is user-facing.
    #[error("{message}")]
    Business { code: i32, message: String },
}

impl SvcError {
    /// Creates a system error with the generic failure code.
    #[must_use]
    pub fn system(message: impl Into<String>) -> Self {
        Self::System {
            code: ResultCode::ERROR.code,
            message: message.into(),
        }
    }

    /// Creates a system error with an explicit code.
    #[must_use]
    pub fn system_code(code: i32, message: impl Into<String>) -> Self {
        Self::System {
            code,
            message: message.into(),
        }
    }

    /// Creates a system error from an enumerated result code.
    #[must_use]
    pub fn system_from(code: ResultCode) -> Self {
        Self::System {
            code: code.code,
            message: code.message.to_string(),
        }
    }

    /// Creates a business error with the generic failure code.
    #[must_use]
    pub fn business(message: impl Into<String>) -> Self {
        Self::Business {
            code: ResultCode::ERROR.code,
            message: message.into(),
        }
    }

    /// Creates a business error with an explicit code.
    #[must_use]
    pub fn business_code(code: i32, message: impl Into<String>) -> Self {
        Self::Business {
            code,
            message: message.into(),
        }
    }

    /// Creates a business error from an enumerated result code.
    #[must_use]
    pub fn business_from(code: ResultCode) -> Self {
        Self::Business {
            code: code.code,
            message: code.message.to_string(),
        }
    }

    /// Returns the machine-readable code.
    #[must_use]
    pub const fn code(&self) -> i32 {
        match self {
            Self::System { code, .. } | Self::Business { code, .. } => *code,
        }
    }

    /// Returns the error message.
    #[must_use]
    pub fn message(&self) -> &str {
        match self {
            Self::System { message, .. } | Self::Business { message, .. } => message,
        }
    }

    /// Returns `true` for domain-rule violations.
    #[must_use]
    pub const fn is_business(&self) -> bool {
        matches!(self, Self::Business { .. })
    }

    /// Returns `true` for infrastructure failures.
    #[must_use]
    pub const fn is_system(&self) -> bool {
        matches!(self, Self::System { .. })
    }
}

impl From<serde_json::Error> for SvcError {
    fn from(err: serde_json::Error) -> Self {
        Self::system(format!("JSON error: {err}"))
    }
}

impl From<std::io::Error> for SvcError {
    fn from(err: std::io::Error) -> Self {
        Self::system(format!("I/O error: {err}"))
    }
}
