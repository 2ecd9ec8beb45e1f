//! Request dispatcher and its builder.
//!
//! The [`DispatcherBuilder`] configures how wire method names map onto a
//! [`MethodRegistry`]. The [`Dispatcher`] handles each request in four steps:
//! 1. Strip the method prefix and look the method up
//! 2. Bind positional or named arguments
//! 3. Invoke the method
//! 4. Build the success or error response
//!
//! # Example
//!
//! ```
//! use jsonrpc_binder::handler::{MethodDescriptor, MethodRegistry, ParamType};
//! use jsonrpc_binder::{BoxError, Dispatcher};
//!
//! # tokio::runtime::Runtime::new().unwrap().block_on(async {
//! let registry = MethodRegistry::builder()
//!     .define(
//!         MethodDescriptor::builder("add")
//!             .required("a", ParamType::Integer)
//!             .optional("b", ParamType::Integer, serde_json::json!(10))
//!             .returns(ParamType::Integer)
//!             .handler_sync(|(a, b): (i64, i64)| Ok::<_, BoxError>(a + b)),
//!     )
//!     .build()
//!     .unwrap();
//!
//! let dispatcher = Dispatcher::builder(registry).prefix("math.").build();
//!
//! let output = dispatcher
//!     .process(r#"{"jsonrpc":"2.0","method":"math.add","params":[5],"id":1}"#)
//!     .await;
//! assert_eq!(output, r#"{"jsonrpc":"2.0","result":15,"id":1}"#);
//! # });
//! ```

use std::sync::Arc;

use bytes::Bytes;
use serde::Deserialize;
use serde_json::Value;

use crate::codec::JsonCodec;
use crate::error::{BinderError, Result};
use crate::handler::{BoxFuture, MethodDescriptor, MethodOutput, MethodRegistry};
use crate::protocol::{JsonRpcError, JsonRpcRequest, JsonRpcResponse, Params, RequestId, JSONRPC_VERSION};

/// Fallback when a response cannot be serialized.
const INTERNAL_ERROR_RESPONSE: &str =
    r#"{"jsonrpc":"2.0","error":{"code":-32603,"message":"Internal error"},"id":null}"#;

/// A component that can answer JSON-RPC requests for some set of methods.
pub trait RequestHandler: Send + Sync {
    /// Whether this handler serves the given wire method name.
    fn can_handle(&self, method: &str) -> bool;

    /// Handle a request, always producing a response.
    fn handle(&self, request: JsonRpcRequest) -> BoxFuture<'_, JsonRpcResponse>;
}

/// Dispatcher configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DispatcherConfig {
    /// Stripped from wire method names before registry lookup.
    pub method_prefix: String,
    /// Attach the method body's error text as `data` on internal errors.
    pub expose_internal_errors: bool,
}

/// Builder for configuring and creating a [`Dispatcher`].
pub struct DispatcherBuilder {
    registry: Arc<MethodRegistry>,
    config: DispatcherConfig,
}

impl DispatcherBuilder {
    /// Create a builder over a registry.
    pub fn new(registry: impl Into<Arc<MethodRegistry>>) -> Self {
        Self {
            registry: registry.into(),
            config: DispatcherConfig::default(),
        }
    }

    /// Set the method prefix.
    ///
    /// Default: empty (wire names are looked up verbatim)
    pub fn prefix(mut self, prefix: impl Into<String>) -> Self {
        self.config.method_prefix = prefix.into();
        self
    }

    /// Include method body error text in internal error responses.
    ///
    /// Default: false
    pub fn expose_internal_errors(mut self, expose: bool) -> Self {
        self.config.expose_internal_errors = expose;
        self
    }

    /// Replace the whole configuration.
    pub fn config(mut self, config: DispatcherConfig) -> Self {
        self.config = config;
        self
    }

    pub fn build(self) -> Dispatcher {
        Dispatcher {
            registry: self.registry,
            config: self.config,
        }
    }
}

/// Binds requests to a registry and produces responses.
///
/// Holds no per-request state; share it behind an `Arc` across tasks.
pub struct Dispatcher {
    registry: Arc<MethodRegistry>,
    config: DispatcherConfig,
}

impl Dispatcher {
    /// Create a new dispatcher builder.
    pub fn builder(registry: impl Into<Arc<MethodRegistry>>) -> DispatcherBuilder {
        DispatcherBuilder::new(registry)
    }

    /// Dispatcher with default configuration.
    pub fn new(registry: impl Into<Arc<MethodRegistry>>) -> Self {
        DispatcherBuilder::new(registry).build()
    }

    #[inline]
    pub fn registry(&self) -> &MethodRegistry {
        &self.registry
    }

    #[inline]
    pub fn config(&self) -> &DispatcherConfig {
        &self.config
    }

    /// Resolve a wire method name to its descriptor.
    ///
    /// Returns `None` if the name lacks the prefix or the stripped name is
    /// not registered.
    pub fn resolve(&self, wire_method: &str) -> Option<&MethodDescriptor> {
        wire_method
            .strip_prefix(self.config.method_prefix.as_str())
            .and_then(|name| self.registry.lookup(name))
    }

    /// Bind and invoke a method by wire name.
    ///
    /// # Errors
    ///
    /// - [`BinderError::MethodNotFound`] if the name does not resolve
    /// - [`BinderError::InvalidParams`] if binding fails
    /// - [`BinderError::Invocation`] if the method body fails
    pub async fn call(&self, wire_method: &str, params: Option<Params>) -> Result<MethodOutput> {
        let method = self
            .resolve(wire_method)
            .ok_or_else(|| BinderError::MethodNotFound(wire_method.to_string()))?;

        let bound = method.bind(params)?;
        tracing::debug!("Bound {} argument(s) for {}", bound.len(), method.name());

        method.call(bound).await
    }

    /// Handle one request.
    ///
    /// The response always echoes the request id, including for unknown
    /// methods.
    pub async fn dispatch(&self, request: JsonRpcRequest) -> JsonRpcResponse {
        tracing::debug!("Dispatching method {} (id {})", request.method, request.id);

        let JsonRpcRequest {
            method, params, id, ..
        } = request;

        match self.call(&method, params).await {
            Ok(output) => JsonRpcResponse::success(id, output.into_value()),
            Err(err) => {
                self.log_failure(&method, &id, &err);
                self.error_response(id, &err)
            }
        }
    }

    /// Build the error response for a classified failure.
    pub fn error_response(&self, id: RequestId, err: &BinderError) -> JsonRpcResponse {
        let mut error = JsonRpcError::from(err);
        if self.config.expose_internal_errors {
            if let BinderError::Invocation { source, .. } = err {
                error = error.with_data(Value::String(source.to_string()));
            }
        }
        JsonRpcResponse::error(id, error)
    }

    fn log_failure(&self, method: &str, id: &RequestId, err: &BinderError) {
        match err {
            BinderError::Invocation { .. } => {
                tracing::error!("Request {} for {} failed: {}", id, method, err)
            }
            _ => tracing::warn!("Request {} for {} rejected: {}", id, method, err),
        }
    }

    /// Handle a request given as JSON text, returning the response text.
    ///
    /// Text that is not JSON yields a parse error; JSON that is not a
    /// single request object yields an invalid request error. An invalid
    /// request still echoes its id when one can be read.
    pub async fn process(&self, input: &str) -> String {
        let response = self.process_value(JsonCodec::decode(input.as_bytes())).await;
        match serde_json::to_string(&response) {
            Ok(text) => text,
            Err(e) => {
                tracing::error!("Failed to serialize response: {}", e);
                INTERNAL_ERROR_RESPONSE.to_string()
            }
        }
    }

    /// Byte-oriented variant of [`process`](Self::process).
    pub async fn process_bytes(&self, input: &[u8]) -> Bytes {
        let response = self.process_value(JsonCodec::decode(input)).await;
        match JsonCodec::encode(&response) {
            Ok(bytes) => bytes,
            Err(e) => {
                tracing::error!("Failed to serialize response: {}", e);
                Bytes::from_static(INTERNAL_ERROR_RESPONSE.as_bytes())
            }
        }
    }

    async fn process_value(&self, parsed: Result<Value>) -> JsonRpcResponse {
        let value = match parsed {
            Ok(value) => value,
            Err(e) => {
                tracing::warn!("Rejecting unparsable request: {}", e);
                return JsonRpcResponse::error(RequestId::Null, JsonRpcError::parse_error());
            }
        };

        let id = readable_id(&value);
        match JsonCodec::from_value::<JsonRpcRequest>(value) {
            Ok(request) if request.jsonrpc == JSONRPC_VERSION => self.dispatch(request).await,
            Ok(request) => {
                tracing::warn!("Rejecting request with version {:?}", request.jsonrpc);
                JsonRpcResponse::error(id, JsonRpcError::invalid_request())
            }
            Err(e) => {
                tracing::warn!("Rejecting malformed request: {}", e);
                JsonRpcResponse::error(id, JsonRpcError::invalid_request())
            }
        }
    }
}

/// Id of a request object that may otherwise be malformed; `Null` when
/// absent or not a valid id.
fn readable_id(value: &Value) -> RequestId {
    value
        .get("id")
        .and_then(|id| RequestId::deserialize(id).ok())
        .unwrap_or_default()
}

impl RequestHandler for Dispatcher {
    fn can_handle(&self, method: &str) -> bool {
        self.resolve(method).is_some()
    }

    fn handle(&self, request: JsonRpcRequest) -> BoxFuture<'_, JsonRpcResponse> {
        Box::pin(self.dispatch(request))
    }
}
