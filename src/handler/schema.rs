//! Serializable description of a registry, for discovery endpoints.
//!
//! # Example
//!
//! ```
//! use jsonrpc_binder::handler::{MethodDescriptor, MethodRegistry, ParamType};
//! use jsonrpc_binder::BoxError;
//! use serde_json::json;
//!
//! let registry = MethodRegistry::builder()
//!     .define(
//!         MethodDescriptor::builder("add")
//!             .required("a", ParamType::Integer)
//!             .optional("b", ParamType::Integer, json!(10))
//!             .returns(ParamType::Integer)
//!             .handler_sync(|(a, b): (i64, i64)| Ok::<_, BoxError>(a + b)),
//!     )
//!     .build()
//!     .unwrap();
//!
//! let schema = serde_json::to_value(registry.schema()).unwrap();
//! assert_eq!(schema["methods"]["add"]["params"][1]["default"], 10);
//! assert_eq!(schema["methods"]["add"]["returns"], "integer");
//! ```

use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::Value;

use super::method::MethodDescriptor;
use super::parameter::ParameterDescriptor;
use super::types::ParamType;

/// One declared parameter.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParamSchema {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: ParamType,
    pub optional: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
}

/// One method's signature.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MethodSchema {
    pub params: Vec<ParamSchema>,
    /// `None` when the method returns nothing.
    pub returns: Option<ParamType>,
}

/// All methods of a registry, keyed by name.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RegistrySchema {
    pub methods: BTreeMap<String, MethodSchema>,
}

impl RegistrySchema {
    /// Get a method by name.
    pub fn get_method(&self, name: &str) -> Option<&MethodSchema> {
        self.methods.get(name)
    }

    pub fn is_empty(&self) -> bool {
        self.methods.is_empty()
    }
}

impl From<&ParameterDescriptor> for ParamSchema {
    fn from(param: &ParameterDescriptor) -> Self {
        Self {
            name: param.name().to_string(),
            ty: param.param_type().clone(),
            optional: param.is_optional(),
            default: param.default_value().cloned(),
        }
    }
}

impl From<&MethodDescriptor> for MethodSchema {
    fn from(method: &MethodDescriptor) -> Self {
        Self {
            params: method.parameters().map(ParamSchema::from).collect(),
            returns: method.return_type().cloned(),
        }
    }
}
