//! JSON-RPC 2.0 request, response and error objects.
//!
//! # Example
//!
//! ```
//! use jsonrpc_binder::protocol::{JsonRpcRequest, Params, RequestId};
//!
//! let request: JsonRpcRequest =
//!     serde_json::from_str(r#"{"jsonrpc":"2.0","method":"add","params":[5],"id":1}"#).unwrap();
//!
//! assert_eq!(request.method, "add");
//! assert_eq!(request.id, RequestId::from(1));
//! assert!(matches!(request.params, Some(Params::Positional(_))));
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};

use super::{error_codes, JSONRPC_VERSION};
use crate::error::BinderError;

/// Request correlation id (string, number, or null).
///
/// Any JSON number is accepted and echoed back unchanged, including values
/// beyond `i64` and fractional ones. An absent id reads as `Null`;
/// notifications are not distinguished.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RequestId {
    Number(Number),
    String(String),
    #[default]
    Null,
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RequestId::Number(n) => write!(f, "{}", n),
            RequestId::String(s) => write!(f, "{:?}", s),
            RequestId::Null => f.write_str("null"),
        }
    }
}

impl From<i64> for RequestId {
    fn from(n: i64) -> Self {
        RequestId::Number(n.into())
    }
}

impl From<&str> for RequestId {
    fn from(s: &str) -> Self {
        RequestId::String(s.to_string())
    }
}

/// Request parameters: by position or by name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Params {
    /// Ordered values bound to parameters by index.
    Positional(Vec<Value>),
    /// Values bound to parameters by name.
    Named(Map<String, Value>),
}

impl Params {
    /// Number of supplied arguments.
    pub fn len(&self) -> usize {
        match self {
            Params::Positional(args) => args.len(),
            Params::Named(args) => args.len(),
        }
    }

    /// Whether no arguments were supplied.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for Params {
    fn default() -> Self {
        Params::Positional(Vec::new())
    }
}

impl From<Vec<Value>> for Params {
    fn from(args: Vec<Value>) -> Self {
        Params::Positional(args)
    }
}

impl From<Map<String, Value>> for Params {
    fn from(args: Map<String, Value>) -> Self {
        Params::Named(args)
    }
}

/// JSON-RPC 2.0 request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JsonRpcRequest {
    pub jsonrpc: String,
    pub method: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub params: Option<Params>,
    #[serde(default)]
    pub id: RequestId,
}

impl JsonRpcRequest {
    /// Create a request with the given method, params and id.
    pub fn new(method: impl Into<String>, params: Option<Params>, id: RequestId) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.to_string(),
            method: method.into(),
            params,
            id,
        }
    }
}

/// JSON-RPC error object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JsonRpcError {
    pub code: i32,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl JsonRpcError {
    /// Create an error object without data.
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            data: None,
        }
    }

    /// Attach a data member.
    pub fn with_data(mut self, data: Value) -> Self {
        self.data = Some(data);
        self
    }

    pub fn parse_error() -> Self {
        Self::new(error_codes::PARSE_ERROR, "Parse error")
    }

    pub fn invalid_request() -> Self {
        Self::new(error_codes::INVALID_REQUEST, "Invalid Request")
    }

    pub fn method_not_found() -> Self {
        Self::new(error_codes::METHOD_NOT_FOUND, "Method not found")
    }

    pub fn internal_error() -> Self {
        Self::new(error_codes::INTERNAL_ERROR, "Internal error")
    }
}

impl From<&BinderError> for JsonRpcError {
    fn from(err: &BinderError) -> Self {
        match err {
            BinderError::MethodNotFound(_) => Self::method_not_found(),
            BinderError::InvalidParams(msg) => Self::new(err.code(), msg.clone()),
            BinderError::Json(e) => Self::new(err.code(), e.to_string()),
            BinderError::Invocation { .. } | BinderError::Registration(_) => Self::internal_error(),
        }
    }
}

/// JSON-RPC 2.0 response.
///
/// Exactly one of `result` / `error` is set. `id` is always serialized,
/// as `null` when the request id was absent or unknown.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JsonRpcResponse {
    pub jsonrpc: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<JsonRpcError>,
    pub id: RequestId,
}

impl JsonRpcResponse {
    /// Create a success response.
    pub fn success(id: RequestId, result: Value) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.to_string(),
            result: Some(result),
            error: None,
            id,
        }
    }

    /// Create an error response.
    pub fn error(id: RequestId, error: JsonRpcError) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.to_string(),
            result: None,
            error: Some(error),
            id,
        }
    }

    /// Whether this is an error response.
    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }
}
