//! Method registry mapping names to descriptors.
//!
//! The registry is built once, when a service is attached, and is read-only
//! afterwards. It holds no interior mutability, so a shared reference (or an
//! `Arc`) can be read from any number of tasks without locking.
//!
//! # Example
//!
//! ```
//! use jsonrpc_binder::handler::{MethodDescriptor, MethodRegistry, ParamType};
//! use jsonrpc_binder::BoxError;
//!
//! let registry = MethodRegistry::builder()
//!     .define(
//!         MethodDescriptor::builder("echo")
//!             .required("text", ParamType::String)
//!             .returns(ParamType::String)
//!             .handler_sync(|(text,): (String,)| Ok::<_, BoxError>(text)),
//!     )
//!     .build()
//!     .unwrap();
//!
//! assert!(registry.has("echo"));
//! assert_eq!(registry.lookup("echo").unwrap().required_count(), 1);
//! ```

use std::collections::HashMap;

use super::method::{MethodBuilder, MethodDescriptor};
use super::schema::{MethodSchema, RegistrySchema};
use crate::error::{BinderError, Result};

/// Immutable mapping from method name to descriptor.
#[derive(Debug, Default)]
pub struct MethodRegistry {
    methods: HashMap<String, MethodDescriptor>,
}

impl MethodRegistry {
    /// Start building a registry.
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::new()
    }

    /// Build a registry from descriptors.
    ///
    /// # Errors
    ///
    /// [`BinderError::Registration`] if two descriptors share a name.
    pub fn from_methods<I>(methods: I) -> Result<Self>
    where
        I: IntoIterator<Item = MethodDescriptor>,
    {
        let mut map = HashMap::new();
        for method in methods {
            if map.contains_key(method.name()) {
                return Err(BinderError::Registration(format!(
                    "method {} is registered more than once",
                    method.name()
                )));
            }
            map.insert(method.name().to_string(), method);
        }
        Ok(Self { methods: map })
    }

    /// Get a method by name.
    pub fn lookup(&self, name: &str) -> Option<&MethodDescriptor> {
        self.methods.get(name)
    }

    /// Whether a method is registered under `name`.
    pub fn has(&self, name: &str) -> bool {
        self.methods.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.methods.len()
    }

    pub fn is_empty(&self) -> bool {
        self.methods.is_empty()
    }

    /// Registered method names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.methods.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Iterate over all descriptors, in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = &MethodDescriptor> + '_ {
        self.methods.values()
    }

    /// Build a serializable description of every registered method.
    pub fn schema(&self) -> RegistrySchema {
        RegistrySchema {
            methods: self
                .methods
                .iter()
                .map(|(name, method)| (name.clone(), MethodSchema::from(method)))
                .collect(),
        }
    }
}

/// Builder for [`MethodRegistry`].
///
/// Accepts finished descriptors and unfinished [`MethodBuilder`]s; every
/// declaration is validated in [`build`](Self::build), which reports the
/// first failure.
#[derive(Default)]
pub struct RegistryBuilder {
    methods: Vec<Result<MethodDescriptor>>,
}

impl RegistryBuilder {
    /// Create a new empty registry builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a finished descriptor.
    pub fn method(mut self, method: MethodDescriptor) -> Self {
        self.methods.push(Ok(method));
        self
    }

    /// Add a method declaration, built when the registry is built.
    pub fn define(mut self, method: MethodBuilder) -> Self {
        self.methods.push(method.build());
        self
    }

    /// Validate all declarations and build the registry.
    ///
    /// # Errors
    ///
    /// [`BinderError::Registration`] for the first malformed method or
    /// duplicate name.
    pub fn build(self) -> Result<MethodRegistry> {
        let methods = self.methods.into_iter().collect::<Result<Vec<_>>>()?;
        let registry = MethodRegistry::from_methods(methods)?;
        tracing::debug!("Built method registry with {} methods", registry.len());
        Ok(registry)
    }
}
