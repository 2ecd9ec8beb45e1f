//! Codec module - serialization between typed values and JSON tokens.
//!
//! - [`JsonCodec`] - `serde_json` backed conversion for arguments and results
//!
//! # Design
//!
//! Codecs are marker structs with static methods rather than trait objects,
//! so typed handlers pick their conversion at compile time.

mod json;

pub use json::JsonCodec;
