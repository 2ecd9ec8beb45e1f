//! Handler module - method descriptors, argument binding and invocation.
//!
//! Provides:
//! - [`ParamType`] / [`TypeChecker`] - declared types and compatibility checks
//! - [`ParameterDescriptor`] - one declared parameter
//! - [`MethodDescriptor`] - a callable method with its binding rules
//! - [`MethodRegistry`] - immutable name to descriptor mapping
//! - [`Invoke`] / [`TypedInvoker`] - type-erased invocation thunks
//!
//! # Example
//!
//! ```
//! use jsonrpc_binder::handler::{MethodDescriptor, ParamType};
//! use jsonrpc_binder::BoxError;
//! use serde_json::json;
//!
//! let greet = MethodDescriptor::builder("greet")
//!     .required("name", ParamType::String)
//!     .optional("greeting", ParamType::String, json!("hello"))
//!     .returns(ParamType::String)
//!     .handler_sync(|(name, greeting): (String, String)| {
//!         Ok::<_, BoxError>(format!("{}, {}", greeting, name))
//!     })
//!     .build()
//!     .unwrap();
//!
//! let bound = greet.bind_named(json!({"name": "ann"}).as_object().unwrap().clone()).unwrap();
//! assert_eq!(bound.as_slice(), &[json!("ann"), json!("hello")]);
//! ```

mod invoke;
mod method;
mod parameter;
mod registry;
mod schema;
mod types;

pub use invoke::{BoxFuture, Invoke, InvokeResult, MethodOutput, TypedInvoker};
pub use method::{BoundArgs, MethodBuilder, MethodDescriptor};
pub use parameter::ParameterDescriptor;
pub use registry::{MethodRegistry, RegistryBuilder};
pub use schema::{MethodSchema, ParamSchema, RegistrySchema};
pub use types::{NullabilityPolicy, ParamType, PermissiveNulls, StrictNulls, TypeChecker, ValueKind};
