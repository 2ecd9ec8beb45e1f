//! Parameter descriptors.

use std::fmt;

use serde_json::Value;

use super::types::{ParamType, TypeChecker};
use crate::error::{BinderError, Result};

/// Immutable description of one method parameter.
///
/// Construction validates the descriptor: the name is non-empty, only
/// optional parameters carry a default, and that default satisfies the
/// declared type. An optional parameter declared without a default
/// defaults to `null`.
#[derive(Debug, Clone, PartialEq)]
pub struct ParameterDescriptor {
    name: String,
    ty: ParamType,
    default: Option<Value>,
}

impl ParameterDescriptor {
    /// Create a descriptor, checking any default with the strict checker.
    ///
    /// # Errors
    ///
    /// [`BinderError::Registration`] if the descriptor is malformed.
    pub fn new(
        name: impl Into<String>,
        ty: ParamType,
        is_optional: bool,
        default: Option<Value>,
    ) -> Result<Self> {
        Self::with_checker(name, ty, is_optional, default, &TypeChecker::default())
    }

    /// Create a descriptor, checking any default with `checker`.
    pub fn with_checker(
        name: impl Into<String>,
        ty: ParamType,
        is_optional: bool,
        default: Option<Value>,
        checker: &TypeChecker,
    ) -> Result<Self> {
        let name = name.into();
        if name.is_empty() {
            return Err(BinderError::Registration(
                "parameter name cannot be empty".to_string(),
            ));
        }

        if !is_optional {
            if default.is_some() {
                return Err(BinderError::Registration(format!(
                    "parameter {} has a default value but is not optional",
                    name
                )));
            }
            return Ok(Self {
                name,
                ty,
                default: None,
            });
        }

        let default = default.unwrap_or(Value::Null);
        checker
            .check(&default, &ty, &name)
            .map_err(|e| BinderError::Registration(format!("invalid default: {}", e)))?;

        Ok(Self {
            name,
            ty,
            default: Some(default),
        })
    }

    /// Create a required parameter.
    pub fn required(name: impl Into<String>, ty: ParamType) -> Result<Self> {
        Self::new(name, ty, false, None)
    }

    /// Create an optional parameter with the given default.
    pub fn optional(name: impl Into<String>, ty: ParamType, default: Value) -> Result<Self> {
        Self::new(name, ty, true, Some(default))
    }

    /// Name as used in named requests.
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Declared type.
    #[inline]
    pub fn param_type(&self) -> &ParamType {
        &self.ty
    }

    #[inline]
    pub fn is_optional(&self) -> bool {
        self.default.is_some()
    }

    /// Default value; `None` for required parameters.
    #[inline]
    pub fn default_value(&self) -> Option<&Value> {
        self.default.as_ref()
    }
}

impl fmt::Display for ParameterDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.ty, self.name)?;
        if let Some(default) = &self.default {
            write!(f, " = {}", default)?;
        }
        Ok(())
    }
}
