//! Runtime type tags for instance-of contracts.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::value::Value;

/// A runtime type tag, the dynamic counterpart of a class in an instance-of
/// contract. `Numeric` covers both integer and float values; `Object`
/// matches every value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TypeTag {
    Integer,
    Float,
    Numeric,
    String,
    Symbol,
    Boolean,
    Array,
    Hash,
    Nil,
    Object,
}

impl TypeTag {
    /// The tag name as it appears in matcher descriptions ("be a Integer").
    pub fn name(self) -> &'static str {
        match self {
            TypeTag::Integer => "Integer",
            TypeTag::Float => "Float",
            TypeTag::Numeric => "Numeric",
            TypeTag::String => "String",
            TypeTag::Symbol => "Symbol",
            TypeTag::Boolean => "Boolean",
            TypeTag::Array => "Array",
            TypeTag::Hash => "Hash",
            TypeTag::Nil => "NilClass",
            TypeTag::Object => "Object",
        }
    }

    /// Runtime membership test for this tag.
    pub fn matches(self, value: &Value) -> bool {
        match self {
            TypeTag::Integer => matches!(value, Value::Int(_)),
            TypeTag::Float => matches!(value, Value::Float(_)),
            TypeTag::Numeric => matches!(value, Value::Int(_) | Value::Float(_)),
            TypeTag::String => matches!(value, Value::Str(_)),
            TypeTag::Symbol => matches!(value, Value::Symbol(_)),
            TypeTag::Boolean => matches!(value, Value::Bool(_)),
            TypeTag::Array => matches!(value, Value::Array(_)),
            TypeTag::Hash => matches!(value, Value::Map(_)),
            TypeTag::Nil => matches!(value, Value::Nil),
            TypeTag::Object => true,
        }
    }
}

impl fmt::Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numeric_covers_ints_and_floats() {
        assert!(TypeTag::Numeric.matches(&Value::Int(1)));
        assert!(TypeTag::Numeric.matches(&Value::Float(1.5)));
        assert!(!TypeTag::Numeric.matches(&Value::Str("1".into())));
    }

    #[test]
    fn object_matches_everything() {
        for v in [Value::Nil, Value::Int(0), Value::Array(vec![]), Value::Map(vec![])] {
            assert!(TypeTag::Object.matches(&v));
        }
    }

    #[test]
    fn exact_tags() {
        assert!(TypeTag::Integer.matches(&Value::Int(1)));
        assert!(!TypeTag::Integer.matches(&Value::Float(1.0)));
        assert!(TypeTag::Nil.matches(&Value::Nil));
        assert!(!TypeTag::Nil.matches(&Value::Bool(false)));
        assert!(TypeTag::Hash.matches(&Value::Map(vec![])));
    }
}
