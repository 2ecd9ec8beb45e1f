//! Error types for jsonrpc-binder.

use thiserror::Error;

use crate::protocol::error_codes;

/// Error type raised by method bodies.
///
/// Anything convertible into it (`std::io::Error`, `String`, `&str`, ...)
/// can be returned from a handler.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Main error type for all binding and dispatch operations.
#[derive(Debug, Error)]
pub enum BinderError {
    /// No method is registered under the (prefix-stripped) name.
    #[error("Method not found: {0}")]
    MethodNotFound(String),

    /// Arity mismatch, missing required argument or incompatible value.
    #[error("Invalid params: {0}")]
    InvalidParams(String),

    /// The bound method body failed.
    #[error("Method {method} failed: {source}")]
    Invocation {
        /// Name of the method that failed.
        method: String,
        /// Error raised by the method body.
        #[source]
        source: BoxError,
    },

    /// Malformed descriptor or registry definition.
    #[error("Registration error: {0}")]
    Registration(String),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl BinderError {
    /// JSON-RPC error code reported for this error.
    ///
    /// JSON failures only reach a response while decoding arguments, so they
    /// map to invalid params. Registration errors never reach the wire; they
    /// map to internal error for completeness.
    pub fn code(&self) -> i32 {
        match self {
            BinderError::MethodNotFound(_) => error_codes::METHOD_NOT_FOUND,
            BinderError::InvalidParams(_) | BinderError::Json(_) => error_codes::INVALID_PARAMS,
            BinderError::Invocation { .. } | BinderError::Registration(_) => {
                error_codes::INTERNAL_ERROR
            }
        }
    }

    /// Whether this error was caused by the caller's arguments.
    pub fn is_invalid_params(&self) -> bool {
        matches!(self, BinderError::InvalidParams(_) | BinderError::Json(_))
    }
}

/// Result type alias using BinderError.
pub type Result<T> = std::result::Result<T, BinderError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(BinderError::MethodNotFound("x".into()).code(), -32601);
        assert_eq!(BinderError::InvalidParams("x".into()).code(), -32602);
        assert_eq!(
            BinderError::Invocation {
                method: "x".into(),
                source: "boom".into(),
            }
            .code(),
            -32603
        );
    }

    #[test]
    fn test_json_error_is_invalid_params() {
        let err: BinderError = serde_json::from_str::<i32>("\"nope\"").unwrap_err().into();
        assert!(err.is_invalid_params());
        assert_eq!(err.code(), -32602);
    }

    #[test]
    fn test_invocation_display_includes_source() {
        let err = BinderError::Invocation {
            method: "divide".into(),
            source: "division by zero".into(),
        };
        assert_eq!(err.to_string(), "Method divide failed: division by zero");
    }
}
