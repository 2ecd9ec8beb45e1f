//! Protocol module - JSON-RPC 2.0 wire shapes.
//!
//! Provides:
//! - [`JsonRpcRequest`] / [`JsonRpcResponse`] - request and response envelopes
//! - [`Params`] - positional or named arguments
//! - [`RequestId`] - correlation id
//! - [`error_codes`] - reserved error codes

mod message;

pub use message::{JsonRpcError, JsonRpcRequest, JsonRpcResponse, Params, RequestId};

/// Protocol version carried in every message.
pub const JSONRPC_VERSION: &str = "2.0";

/// Standard JSON-RPC error codes.
pub mod error_codes {
    pub const PARSE_ERROR: i32 = -32700;
    pub const INVALID_REQUEST: i32 = -32600;
    pub const METHOD_NOT_FOUND: i32 = -32601;
    pub const INVALID_PARAMS: i32 = -32602;
    pub const INTERNAL_ERROR: i32 = -32603;
}
