//! Type-erased invocation thunks.
//!
//! A [`MethodDescriptor`](super::MethodDescriptor) owns one [`Invoke`]
//! implementation. It receives the bound argument list in declaration order
//! and produces the method's JSON result. [`TypedInvoker`] is the usual
//! implementation: it decodes the argument list into a typed tuple or struct,
//! runs the closure and encodes what it returns.
//!
//! # Example
//!
//! ```
//! use jsonrpc_binder::handler::{Invoke, TypedInvoker};
//! use jsonrpc_binder::BoxError;
//! use serde_json::json;
//!
//! let add = TypedInvoker::new(|(a, b): (i64, i64)| async move { Ok::<_, BoxError>(a + b) });
//!
//! # tokio::runtime::Runtime::new().unwrap().block_on(async {
//! let result = add.invoke(vec![json!(5), json!(10)]).unwrap().await.unwrap();
//! assert_eq!(result, json!(15));
//! # });
//! ```

use std::future::Future;
use std::marker::PhantomData;
use std::pin::Pin;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::codec::JsonCodec;
use crate::error::{BinderError, BoxError, Result};

/// Boxed future returned by invocation thunks.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Result of running a method body. Errors are whatever the body raised.
pub type InvokeResult = std::result::Result<Value, BoxError>;

/// Trait for invocation thunks.
pub trait Invoke: Send + Sync + 'static {
    /// Prepare a call with a fully bound argument list.
    ///
    /// Argument conversion happens here, before the body runs. Every error
    /// the returned future yields comes from the body itself.
    ///
    /// # Errors
    ///
    /// [`BinderError::InvalidParams`](crate::BinderError::InvalidParams) if
    /// the arguments cannot be converted into the body's input type.
    fn invoke(&self, args: Vec<Value>) -> Result<BoxFuture<'static, InvokeResult>>;
}

/// Outcome of a successful call.
#[derive(Debug, Clone, PartialEq)]
pub enum MethodOutput {
    /// The method declares no return type.
    Unit,
    /// The method returned a value (which may itself be `null`).
    Value(Value),
}

impl MethodOutput {
    /// JSON representation for a response; `Unit` becomes `null`.
    pub fn into_value(self) -> Value {
        match self {
            MethodOutput::Unit => Value::Null,
            MethodOutput::Value(v) => v,
        }
    }
}

/// Wrapper that decodes bound arguments before calling the handler.
///
/// Arguments arrive as a JSON array in declaration order, so `A` is usually a
/// tuple (`(i64,)`, `(String, bool)`) or a struct deriving `Deserialize`.
/// A zero-parameter method may use `A = ()`.
pub struct TypedInvoker<F, A, Fut>
where
    F: Fn(A) -> Fut + Send + Sync + 'static,
    A: DeserializeOwned + Send + 'static,
    Fut: Future + Send + 'static,
{
    handler: F,
    _phantom: PhantomData<fn(A) -> Fut>,
}

impl<F, A, Fut> TypedInvoker<F, A, Fut>
where
    F: Fn(A) -> Fut + Send + Sync + 'static,
    A: DeserializeOwned + Send + 'static,
    Fut: Future + Send + 'static,
{
    /// Create a new typed invoker.
    pub fn new(handler: F) -> Self {
        Self {
            handler,
            _phantom: PhantomData,
        }
    }
}

impl<F, A, Fut, R, E> Invoke for TypedInvoker<F, A, Fut>
where
    F: Fn(A) -> Fut + Send + Sync + 'static,
    A: DeserializeOwned + Send + 'static,
    Fut: Future<Output = std::result::Result<R, E>> + Send + 'static,
    R: Serialize,
    E: Into<BoxError>,
{
    fn invoke(&self, args: Vec<Value>) -> Result<BoxFuture<'static, InvokeResult>> {
        let parsed: A = decode_args(args)?;

        let fut = (self.handler)(parsed);
        Ok(Box::pin(async move {
            let output = match fut.await {
                Ok(v) => v,
                Err(e) => return Err::<Value, BoxError>(e.into()),
            };
            Ok(JsonCodec::to_value(&output)?)
        }))
    }
}

/// Decode a bound argument list into the handler's input type.
fn decode_args<A: DeserializeOwned>(args: Vec<Value>) -> Result<A> {
    // `()` only deserializes from null.
    if args.is_empty() {
        if let Ok(unit) = JsonCodec::from_value(Value::Null) {
            return Ok(unit);
        }
    }
    JsonCodec::from_value(Value::Array(args))
        .map_err(|e| BinderError::InvalidParams(format!("cannot convert arguments: {}", e)))
}
