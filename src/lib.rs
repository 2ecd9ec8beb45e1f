//! # jsonrpc-binder
//!
//! Binds incoming JSON-RPC 2.0 requests to statically registered service
//! methods.
//!
//! Each method declares an ordered parameter list. Requests may pass
//! arguments by position or by name; the binder checks arity and types,
//! fills omitted optional arguments from their declared defaults, invokes the
//! method and classifies the outcome into a result or a standard error.
//!
//! ## Architecture
//!
//! - **Descriptors** ([`handler`]): parameter and method descriptions plus
//!   the binding algorithm, built once at service attachment
//! - **Registry** ([`handler::MethodRegistry`]): immutable name lookup
//! - **Dispatcher** ([`Dispatcher`]): prefix stripping, binding, invocation
//!   and error classification per request
//!
//! Transport, batching and notifications belong to the embedding server.
//!
//! ## Example
//!
//! ```
//! use std::sync::Arc;
//!
//! use jsonrpc_binder::handler::{MethodDescriptor, MethodRegistry, ParamType};
//! use jsonrpc_binder::{BoxError, Dispatcher};
//! use serde_json::json;
//!
//! struct Calculator {
//!     scale: i64,
//! }
//!
//! # tokio::runtime::Runtime::new().unwrap().block_on(async {
//! let calc = Arc::new(Calculator { scale: 2 });
//!
//! let registry = MethodRegistry::builder()
//!     .define(
//!         MethodDescriptor::builder("scale")
//!             .required("x", ParamType::Integer)
//!             .returns(ParamType::Integer)
//!             .handler_with(calc, |calc: Arc<Calculator>, (x,): (i64,)| async move {
//!                 Ok::<_, BoxError>(calc.scale * x)
//!             }),
//!     )
//!     .build()
//!     .unwrap();
//!
//! let dispatcher = Dispatcher::new(registry);
//! let response = dispatcher
//!     .process(r#"{"jsonrpc":"2.0","method":"scale","params":{"x":21},"id":1}"#)
//!     .await;
//!
//! let response: serde_json::Value = serde_json::from_str(&response).unwrap();
//! assert_eq!(response["result"], json!(42));
//! # });
//! ```

pub mod codec;
pub mod error;
pub mod handler;
pub mod protocol;

mod dispatcher;

pub use dispatcher::{Dispatcher, DispatcherBuilder, DispatcherConfig, RequestHandler};
pub use error::{BinderError, BoxError, Result};
pub use handler::{MethodDescriptor, MethodRegistry, ParamType};
