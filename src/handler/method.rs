//! Method descriptors and the argument binding algorithm.
//!
//! A [`MethodDescriptor`] pairs a parameter list with an invocation thunk.
//! Parameters are stored as two segments, a required prefix and an optional
//! suffix, so the arity window for positional calls is always
//! `[required_count, parameter_count]`.
//!
//! # Example
//!
//! ```
//! use jsonrpc_binder::handler::{MethodDescriptor, ParamType};
//! use jsonrpc_binder::BoxError;
//! use serde_json::json;
//!
//! let add = MethodDescriptor::builder("add")
//!     .required("a", ParamType::Integer)
//!     .optional("b", ParamType::Integer, json!(10))
//!     .returns(ParamType::Integer)
//!     .handler(|(a, b): (i64, i64)| async move { Ok::<_, BoxError>(a + b) })
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(add.required_count(), 1);
//! let bound = add.bind_positional(vec![json!(5)]).unwrap();
//! assert_eq!(bound.as_slice(), &[json!(5), json!(10)]);
//! assert_eq!(add.to_string(), "integer add(integer a, integer b = 10)");
//! ```

use std::fmt;
use std::future::Future;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};

use super::invoke::{Invoke, MethodOutput, TypedInvoker};
use super::parameter::ParameterDescriptor;
use super::types::{ParamType, TypeChecker};
use crate::error::{BinderError, BoxError, Result};
use crate::protocol::Params;

/// Argument list bound to a method's parameters, in declaration order.
///
/// Always exactly one value per declared parameter.
#[derive(Debug, Clone, PartialEq)]
pub struct BoundArgs(Vec<Value>);

impl BoundArgs {
    #[inline]
    pub fn as_slice(&self) -> &[Value] {
        &self.0
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_inner(self) -> Vec<Value> {
        self.0
    }
}

/// Immutable description of one callable method.
pub struct MethodDescriptor {
    name: String,
    /// Leading parameters without defaults.
    required: Vec<ParameterDescriptor>,
    /// Trailing parameters with defaults.
    optional: Vec<ParameterDescriptor>,
    return_type: Option<ParamType>,
    checker: TypeChecker,
    invoker: Box<dyn Invoke>,
}

impl MethodDescriptor {
    /// Start building a method descriptor.
    pub fn builder(name: impl Into<String>) -> MethodBuilder {
        MethodBuilder::new(name)
    }

    /// Create a descriptor from already validated parameters.
    ///
    /// # Errors
    ///
    /// [`BinderError::Registration`] if the name is empty, two parameters
    /// share a name, or a required parameter follows an optional one.
    pub fn new<I: Invoke>(
        name: impl Into<String>,
        parameters: Vec<ParameterDescriptor>,
        return_type: Option<ParamType>,
        invoker: I,
    ) -> Result<Self> {
        Self::assemble(name, parameters, return_type, TypeChecker::default(), Box::new(invoker))
    }

    /// Like [`new`](Self::new), but binds arguments with the given checker.
    ///
    /// Use this with parameters built by
    /// [`ParameterDescriptor::with_checker`] so that binding applies the
    /// same nullability policy the defaults were validated against.
    ///
    /// # Errors
    ///
    /// Same as [`new`](Self::new).
    pub fn with_checker<I: Invoke>(
        name: impl Into<String>,
        parameters: Vec<ParameterDescriptor>,
        return_type: Option<ParamType>,
        checker: TypeChecker,
        invoker: I,
    ) -> Result<Self> {
        Self::assemble(name, parameters, return_type, checker, Box::new(invoker))
    }

    fn assemble(
        name: impl Into<String>,
        parameters: Vec<ParameterDescriptor>,
        return_type: Option<ParamType>,
        checker: TypeChecker,
        invoker: Box<dyn Invoke>,
    ) -> Result<Self> {
        let name = name.into();
        if name.is_empty() {
            return Err(BinderError::Registration(
                "method name cannot be empty".to_string(),
            ));
        }

        for (i, param) in parameters.iter().enumerate() {
            if parameters[..i].iter().any(|p| p.name() == param.name()) {
                return Err(BinderError::Registration(format!(
                    "method {} declares parameter {} more than once",
                    name,
                    param.name()
                )));
            }
        }

        let split = parameters
            .iter()
            .position(ParameterDescriptor::is_optional)
            .unwrap_or(parameters.len());
        let mut required = parameters;
        let optional = required.split_off(split);

        if let Some(misplaced) = optional.iter().find(|p| !p.is_optional()) {
            return Err(BinderError::Registration(format!(
                "method {}: required parameter {} follows optional parameter {}",
                name,
                misplaced.name(),
                optional[0].name()
            )));
        }

        Ok(Self {
            name,
            required,
            optional,
            return_type,
            checker,
            invoker,
        })
    }

    /// Method name as registered (without any dispatcher prefix).
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Declared return type; `None` when the method returns nothing.
    #[inline]
    pub fn return_type(&self) -> Option<&ParamType> {
        self.return_type.as_ref()
    }

    /// Minimum number of positional arguments.
    #[inline]
    pub fn required_count(&self) -> usize {
        self.required.len()
    }

    /// Total number of declared parameters.
    #[inline]
    pub fn parameter_count(&self) -> usize {
        self.required.len() + self.optional.len()
    }

    /// Parameters in declaration order.
    pub fn parameters(&self) -> impl Iterator<Item = &ParameterDescriptor> + '_ {
        self.required.iter().chain(self.optional.iter())
    }

    /// Bind positional arguments.
    ///
    /// Missing trailing arguments are filled from the declared defaults.
    ///
    /// # Errors
    ///
    /// [`BinderError::InvalidParams`] if fewer than [`required_count`](Self::required_count)
    /// or more than [`parameter_count`](Self::parameter_count) arguments are
    /// given, or an argument fails the type check.
    pub fn bind_positional(&self, args: Vec<Value>) -> Result<BoundArgs> {
        let supplied = args.len();
        if supplied < self.required_count() {
            return Err(BinderError::InvalidParams(format!(
                "expected at least {} arguments, got {}",
                self.required_count(),
                supplied
            )));
        }
        if supplied > self.parameter_count() {
            return Err(BinderError::InvalidParams(format!(
                "expected at most {} arguments, got {}",
                self.parameter_count(),
                supplied
            )));
        }

        let mut bound = Vec::with_capacity(self.parameter_count());
        for (param, arg) in self.parameters().zip(args) {
            self.checker.check(&arg, param.param_type(), param.name())?;
            bound.push(arg);
        }

        // Everything past the supplied arguments lies in the optional suffix.
        for param in self.parameters().skip(supplied) {
            bound.push(param.default_value().cloned().unwrap_or(Value::Null));
        }

        Ok(BoundArgs(bound))
    }

    /// Bind named arguments.
    ///
    /// Keys that match no parameter are ignored.
    ///
    /// # Errors
    ///
    /// [`BinderError::InvalidParams`] if a required parameter is missing or a
    /// supplied value fails the type check.
    pub fn bind_named(&self, mut args: Map<String, Value>) -> Result<BoundArgs> {
        let mut bound = Vec::with_capacity(self.parameter_count());

        for param in self.parameters() {
            match args.remove(param.name()) {
                Some(arg) => {
                    self.checker.check(&arg, param.param_type(), param.name())?;
                    bound.push(arg);
                }
                None => match param.default_value() {
                    Some(default) => bound.push(default.clone()),
                    None => {
                        return Err(BinderError::InvalidParams(format!(
                            "parameter {} is required and not specified",
                            param.name()
                        )))
                    }
                },
            }
        }

        if !args.is_empty() {
            tracing::debug!(
                "Ignoring {} unknown named argument(s) for method {}",
                args.len(),
                self.name
            );
        }

        Ok(BoundArgs(bound))
    }

    /// Bind request parameters in whichever style they were sent.
    ///
    /// Absent parameters bind as an empty positional list.
    pub fn bind(&self, params: Option<Params>) -> Result<BoundArgs> {
        match params.unwrap_or_default() {
            Params::Positional(args) => self.bind_positional(args),
            Params::Named(args) => self.bind_named(args),
        }
    }

    /// Invoke the method with bound arguments.
    ///
    /// # Errors
    ///
    /// [`BinderError::InvalidParams`] if the handler could not convert the
    /// arguments; [`BinderError::Invocation`] for any failure of the method
    /// body, whatever error type it raised.
    pub async fn call(&self, args: BoundArgs) -> Result<MethodOutput> {
        let body = self.invoker.invoke(args.into_inner())?;

        let value = body.await.map_err(|source| BinderError::Invocation {
            method: self.name.clone(),
            source,
        })?;

        Ok(match self.return_type {
            Some(_) => MethodOutput::Value(value),
            None => MethodOutput::Unit,
        })
    }

}

impl fmt::Display for MethodDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.return_type {
            Some(ty) => write!(f, "{} {}(", ty, self.name)?,
            None => write!(f, "unit {}(", self.name)?,
        }
        for (i, param) in self.parameters().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}", param)?;
        }
        f.write_str(")")
    }
}

impl fmt::Debug for MethodDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MethodDescriptor")
            .field("name", &self.name)
            .field("required", &self.required)
            .field("optional", &self.optional)
            .field("return_type", &self.return_type)
            .finish_non_exhaustive()
    }
}

/// Parameter as declared on the builder, validated at `build()`.
struct ParamDecl {
    name: String,
    ty: ParamType,
    is_optional: bool,
    default: Option<Value>,
}

/// Builder for [`MethodDescriptor`].
///
/// Parameters are declared in order. Validation happens in
/// [`build`](Self::build), so a malformed declaration fails the whole
/// method rather than panicking halfway through.
pub struct MethodBuilder {
    name: String,
    params: Vec<ParamDecl>,
    return_type: Option<ParamType>,
    checker: TypeChecker,
    invoker: Option<Box<dyn Invoke>>,
}

impl MethodBuilder {
    /// Create a new method builder.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            params: Vec::new(),
            return_type: None,
            checker: TypeChecker::default(),
            invoker: None,
        }
    }

    /// Declare a required parameter.
    pub fn required(self, name: impl Into<String>, ty: ParamType) -> Self {
        self.push(name.into(), ty, false, None)
    }

    /// Declare an optional parameter with a default value.
    pub fn optional(self, name: impl Into<String>, ty: ParamType, default: Value) -> Self {
        self.push(name.into(), ty, true, Some(default))
    }

    /// Declare a parameter from an existing descriptor.
    pub fn param(self, param: &ParameterDescriptor) -> Self {
        self.push(
            param.name().to_string(),
            param.param_type().clone(),
            param.is_optional(),
            param.default_value().cloned(),
        )
    }

    fn push(mut self, name: String, ty: ParamType, is_optional: bool, default: Option<Value>) -> Self {
        self.params.push(ParamDecl {
            name,
            ty,
            is_optional,
            default,
        });
        self
    }

    /// Declare the return type. Methods without one produce [`MethodOutput::Unit`].
    pub fn returns(mut self, ty: ParamType) -> Self {
        self.return_type = Some(ty);
        self
    }

    /// Use a specific type checker (and therefore nullability policy).
    pub fn checker(mut self, checker: TypeChecker) -> Self {
        self.checker = checker;
        self
    }

    /// Set an async handler receiving the decoded argument list.
    pub fn handler<F, A, Fut, R, E>(self, handler: F) -> Self
    where
        F: Fn(A) -> Fut + Send + Sync + 'static,
        A: DeserializeOwned + Send + 'static,
        Fut: Future<Output = std::result::Result<R, E>> + Send + 'static,
        R: Serialize,
        E: Into<BoxError>,
    {
        self.invoker(TypedInvoker::new(handler))
    }

    /// Set a synchronous handler.
    pub fn handler_sync<F, A, R, E>(self, handler: F) -> Self
    where
        F: Fn(A) -> std::result::Result<R, E> + Send + Sync + 'static,
        A: DeserializeOwned + Send + 'static,
        R: Serialize + Send + 'static,
        E: Into<BoxError> + Send + 'static,
    {
        self.handler(move |args: A| std::future::ready(handler(args)))
    }

    /// Set a handler bound to a shared service instance.
    pub fn handler_with<S, F, A, Fut, R, E>(self, instance: Arc<S>, handler: F) -> Self
    where
        S: Send + Sync + 'static,
        F: Fn(Arc<S>, A) -> Fut + Send + Sync + 'static,
        A: DeserializeOwned + Send + 'static,
        Fut: Future<Output = std::result::Result<R, E>> + Send + 'static,
        R: Serialize,
        E: Into<BoxError>,
    {
        self.handler(move |args: A| handler(Arc::clone(&instance), args))
    }

    /// Set a custom invocation thunk.
    pub fn invoker<I: Invoke>(mut self, invoker: I) -> Self {
        self.invoker = Some(Box::new(invoker));
        self
    }

    /// Validate the declaration and build the descriptor.
    ///
    /// # Errors
    ///
    /// [`BinderError::Registration`] for any malformed parameter, a
    /// required-after-optional ordering, duplicate parameter names, an empty
    /// name, or a missing handler.
    pub fn build(self) -> Result<MethodDescriptor> {
        let invoker = self.invoker.ok_or_else(|| {
            BinderError::Registration(format!("method {} has no handler", self.name))
        })?;

        let parameters = self
            .params
            .into_iter()
            .map(|decl| {
                ParameterDescriptor::with_checker(
                    decl.name,
                    decl.ty,
                    decl.is_optional,
                    decl.default,
                    &self.checker,
                )
            })
            .collect::<Result<Vec<_>>>()
            .map_err(|e| match e {
                BinderError::Registration(msg) => {
                    BinderError::Registration(format!("method {}: {}", self.name, msg))
                }
                other => other,
            })?;

        MethodDescriptor::assemble(
            self.name,
            parameters,
            self.return_type,
            self.checker,
            invoker,
        )
    }
}
