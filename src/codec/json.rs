//! JSON codec using `serde_json`.
//!
//! Bridges typed Rust values and the untyped [`Value`] tokens that travel in
//! requests and responses.
//!
//! # Example
//!
//! ```
//! use jsonrpc_binder::codec::JsonCodec;
//! use serde_json::json;
//!
//! let token = JsonCodec::to_value(&(5, "five")).unwrap();
//! assert_eq!(token, json!([5, "five"]));
//!
//! let back: (i64, String) = JsonCodec::from_value(token).unwrap();
//! assert_eq!(back, (5, "five".to_string()));
//! ```

use bytes::Bytes;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::error::Result;

/// JSON codec for argument and result tokens.
pub struct JsonCodec;

impl JsonCodec {
    /// Serialize a value into a JSON token.
    ///
    /// # Errors
    ///
    /// Returns error if the value cannot be represented as JSON
    /// (e.g. a map with non-string keys).
    #[inline]
    pub fn to_value<T: Serialize>(value: &T) -> Result<Value> {
        Ok(serde_json::to_value(value)?)
    }

    /// Deserialize a JSON token into a typed value.
    ///
    /// # Errors
    ///
    /// Returns error if the token does not match the shape of `T`.
    #[inline]
    pub fn from_value<T: DeserializeOwned>(token: Value) -> Result<T> {
        Ok(serde_json::from_value(token)?)
    }

    /// Encode a value as JSON text bytes.
    #[inline]
    pub fn encode<T: Serialize>(value: &T) -> Result<Bytes> {
        Ok(Bytes::from(serde_json::to_vec(value)?))
    }

    /// Decode JSON text bytes.
    #[inline]
    pub fn decode<T: DeserializeOwned>(bytes: &[u8]) -> Result<T> {
        Ok(serde_json::from_slice(bytes)?)
    }
}
