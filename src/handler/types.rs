//! Declared parameter types and runtime type compatibility.
//!
//! [`ParamType`] is what a method declares; [`ValueKind`] is what a request
//! actually carried. [`TypeChecker`] decides whether the two fit, delegating
//! the question "may this type be null?" to a pluggable
//! [`NullabilityPolicy`].
//!
//! # Example
//!
//! ```
//! use jsonrpc_binder::handler::{ParamType, TypeChecker};
//! use serde_json::json;
//!
//! let checker = TypeChecker::default();
//!
//! assert!(checker.check(&json!(5), &ParamType::Number, "x").is_ok());
//! assert!(checker.check(&json!(null), &ParamType::Integer, "x").is_err());
//! assert!(checker
//!     .check(&json!(null), &ParamType::nullable(ParamType::Integer), "x")
//!     .is_ok());
//! ```

use std::fmt;
use std::sync::Arc;

use serde::{Serialize, Serializer};
use serde_json::Value;

use crate::error::{BinderError, Result};

/// Declared type of a parameter or return value.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ParamType {
    /// Accepts every value, including null.
    Any,
    Bool,
    /// Whole numbers that fit `i64` or `u64`.
    Integer,
    /// Any JSON number, integers included.
    Number,
    String,
    /// Array whose every element satisfies the element type.
    Array(Box<ParamType>),
    Object,
    /// Null, or whatever the inner type accepts.
    Nullable(Box<ParamType>),
}

impl ParamType {
    /// Shorthand for `ParamType::Array(Box::new(elem))`.
    pub fn array(elem: ParamType) -> Self {
        ParamType::Array(Box::new(elem))
    }

    /// Shorthand for `ParamType::Nullable(Box::new(inner))`.
    pub fn nullable(inner: ParamType) -> Self {
        ParamType::Nullable(Box::new(inner))
    }

    /// Whether a non-null value of `kind` is assignable to this type.
    ///
    /// Array elements are not inspected here; see [`TypeChecker::check`].
    pub fn admits(&self, kind: ValueKind) -> bool {
        match (self, kind) {
            (ParamType::Any, _) => true,
            (ParamType::Nullable(inner), kind) => inner.admits(kind),
            (ParamType::Bool, ValueKind::Bool) => true,
            (ParamType::Integer, ValueKind::Integer) => true,
            (ParamType::Number, ValueKind::Integer | ValueKind::Float) => true,
            (ParamType::String, ValueKind::String) => true,
            (ParamType::Array(_), ValueKind::Array) => true,
            (ParamType::Object, ValueKind::Object) => true,
            _ => false,
        }
    }
}

impl fmt::Display for ParamType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamType::Any => f.write_str("any"),
            ParamType::Bool => f.write_str("bool"),
            ParamType::Integer => f.write_str("integer"),
            ParamType::Number => f.write_str("number"),
            ParamType::String => f.write_str("string"),
            ParamType::Array(elem) => write!(f, "{}[]", elem),
            ParamType::Object => f.write_str("object"),
            ParamType::Nullable(inner) => write!(f, "{}?", inner),
        }
    }
}

impl Serialize for ParamType {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Runtime kind of a JSON value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    Null,
    Bool,
    Integer,
    Float,
    String,
    Array,
    Object,
}

impl ValueKind {
    /// Classify a JSON value.
    pub fn of(value: &Value) -> Self {
        match value {
            Value::Null => ValueKind::Null,
            Value::Bool(_) => ValueKind::Bool,
            Value::Number(n) if n.is_i64() || n.is_u64() => ValueKind::Integer,
            Value::Number(_) => ValueKind::Float,
            Value::String(_) => ValueKind::String,
            Value::Array(_) => ValueKind::Array,
            Value::Object(_) => ValueKind::Object,
        }
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ValueKind::Null => "null",
            ValueKind::Bool => "bool",
            ValueKind::Integer => "integer",
            ValueKind::Float => "float",
            ValueKind::String => "string",
            ValueKind::Array => "array",
            ValueKind::Object => "object",
        };
        f.write_str(name)
    }
}

/// Decides which declared types accept null.
pub trait NullabilityPolicy: Send + Sync + 'static {
    /// Whether `null` may be bound to a parameter of type `ty`.
    fn accepts_null(&self, ty: &ParamType) -> bool;
}

/// Only `Any` and `Nullable(_)` accept null.
#[derive(Debug, Clone, Copy, Default)]
pub struct StrictNulls;

impl NullabilityPolicy for StrictNulls {
    fn accepts_null(&self, ty: &ParamType) -> bool {
        matches!(ty, ParamType::Any | ParamType::Nullable(_))
    }
}

/// Every type accepts null.
///
/// Method bodies must then cope with null in any position.
#[derive(Debug, Clone, Copy, Default)]
pub struct PermissiveNulls;

impl NullabilityPolicy for PermissiveNulls {
    fn accepts_null(&self, _ty: &ParamType) -> bool {
        true
    }
}

/// Validates candidate values against declared parameter types.
///
/// Cheap to clone; the policy is shared.
#[derive(Clone)]
pub struct TypeChecker {
    policy: Arc<dyn NullabilityPolicy>,
}

impl TypeChecker {
    /// Create a checker with the given nullability policy.
    pub fn new<P: NullabilityPolicy>(policy: P) -> Self {
        Self {
            policy: Arc::new(policy),
        }
    }

    /// Checker where every type accepts null.
    pub fn permissive() -> Self {
        Self::new(PermissiveNulls)
    }

    /// Check that `value` may be bound to parameter `param_name` of type `ty`.
    ///
    /// # Errors
    ///
    /// [`BinderError::InvalidParams`] naming the parameter, the expected type
    /// and (for non-null values) the actual kind.
    pub fn check(&self, value: &Value, ty: &ParamType, param_name: &str) -> Result<()> {
        if value.is_null() {
            if self.policy.accepts_null(ty) {
                return Ok(());
            }
            return Err(BinderError::InvalidParams(format!(
                "parameter {} must be a {}, which does not accept null",
                param_name, ty
            )));
        }

        let kind = ValueKind::of(value);
        if !ty.admits(kind) {
            return Err(BinderError::InvalidParams(format!(
                "parameter {} must be a {}, got {}",
                param_name, ty, kind
            )));
        }

        if let (Some(elem), Value::Array(items)) = (element_type(ty), value) {
            for (i, item) in items.iter().enumerate() {
                self.check(item, elem, &format!("{}[{}]", param_name, i))?;
            }
        }

        Ok(())
    }
}

impl Default for TypeChecker {
    fn default() -> Self {
        Self::new(StrictNulls)
    }
}

impl fmt::Debug for TypeChecker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeChecker").finish_non_exhaustive()
    }
}

/// Element type of an array type, looking through `Nullable`.
fn element_type(ty: &ParamType) -> Option<&ParamType> {
    match ty {
        ParamType::Array(elem) => Some(elem),
        ParamType::Nullable(inner) => element_type(inner),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn message(result: Result<()>) -> String {
        match result {
            Err(BinderError::InvalidParams(msg)) => msg,
            other => panic!("expected InvalidParams, got {:?}", other),
        }
    }

    #[test]
    fn test_value_kind_classification() {
        assert_eq!(ValueKind::of(&json!(null)), ValueKind::Null);
        assert_eq!(ValueKind::of(&json!(true)), ValueKind::Bool);
        assert_eq!(ValueKind::of(&json!(-3)), ValueKind::Integer);
        assert_eq!(ValueKind::of(&json!(u64::MAX)), ValueKind::Integer);
        assert_eq!(ValueKind::of(&json!(1.5)), ValueKind::Float);
        assert_eq!(ValueKind::of(&json!("s")), ValueKind::String);
        assert_eq!(ValueKind::of(&json!([])), ValueKind::Array);
        assert_eq!(ValueKind::of(&json!({})), ValueKind::Object);
    }

    #[test]
    fn test_integer_assignable_to_number() {
        let checker = TypeChecker::default();
        assert!(checker.check(&json!(3), &ParamType::Number, "n").is_ok());
        assert!(checker.check(&json!(3.5), &ParamType::Number, "n").is_ok());
    }

    #[test]
    fn test_float_not_assignable_to_integer() {
        let checker = TypeChecker::default();
        let msg = message(checker.check(&json!(3.5), &ParamType::Integer, "a"));
        assert_eq!(msg, "parameter a must be a integer, got float");
    }

    #[test]
    fn test_type_mismatch_names_param_expected_and_actual() {
        let checker = TypeChecker::default();
        let msg = message(checker.check(&json!("five"), &ParamType::Integer, "count"));

        assert!(msg.contains("count"));
        assert!(msg.contains("integer"));
        assert!(msg.contains("string"));
    }

    #[test]
    fn test_strict_null_rejected() {
        let checker = TypeChecker::default();
        let msg = message(checker.check(&Value::Null, &ParamType::String, "name"));
        assert_eq!(msg, "parameter name must be a string, which does not accept null");
    }

    #[test]
    fn test_strict_null_accepted_by_nullable_and_any() {
        let checker = TypeChecker::default();
        assert!(checker
            .check(&Value::Null, &ParamType::nullable(ParamType::String), "name")
            .is_ok());
        assert!(checker.check(&Value::Null, &ParamType::Any, "name").is_ok());
    }

    #[test]
    fn test_permissive_accepts_null_everywhere() {
        let checker = TypeChecker::permissive();
        assert!(checker.check(&Value::Null, &ParamType::Integer, "a").is_ok());
        assert!(checker.check(&Value::Null, &ParamType::Object, "a").is_ok());
        // Non-null values are still checked.
        assert!(checker.check(&json!("x"), &ParamType::Integer, "a").is_err());
    }

    #[test]
    fn test_custom_policy() {
        struct StringsOnly;

        impl NullabilityPolicy for StringsOnly {
            fn accepts_null(&self, ty: &ParamType) -> bool {
                *ty == ParamType::String
            }
        }

        let checker = TypeChecker::new(StringsOnly);
        assert!(checker.check(&Value::Null, &ParamType::String, "s").is_ok());
        assert!(checker.check(&Value::Null, &ParamType::Bool, "b").is_err());
    }

    #[test]
    fn test_array_elements_checked() {
        let checker = TypeChecker::default();
        let ty = ParamType::array(ParamType::Integer);

        assert!(checker.check(&json!([1, 2, 3]), &ty, "xs").is_ok());
        let msg = message(checker.check(&json!([1, "two"]), &ty, "xs"));
        assert_eq!(msg, "parameter xs[1] must be a integer, got string");
    }

    #[test]
    fn test_nullable_array_elements_checked() {
        let checker = TypeChecker::default();
        let ty = ParamType::nullable(ParamType::array(ParamType::Bool));

        assert!(checker.check(&Value::Null, &ty, "flags").is_ok());
        assert!(checker.check(&json!([true]), &ty, "flags").is_ok());
        assert!(checker.check(&json!([1]), &ty, "flags").is_err());
    }

    #[test]
    fn test_display() {
        assert_eq!(ParamType::array(ParamType::nullable(ParamType::Integer)).to_string(), "integer?[]");
        assert_eq!(ParamType::nullable(ParamType::Object).to_string(), "object?");
    }

    #[test]
    fn test_serialize_as_display_string() {
        let value = serde_json::to_value(ParamType::array(ParamType::String)).unwrap();
        assert_eq!(value, json!("string[]"));
    }
}
