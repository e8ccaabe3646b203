//! Actual arguments of one invocation.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use chaperone_core::Value;

/// The arguments a caller supplied for one call: a positional sequence plus
/// keyword arguments in the order they were written. Keyword order matters;
/// the binder promotes a leading run of keyword arguments into positional
/// position.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CallArgs {
    pub positional: Vec<Value>,
    pub keywords: IndexMap<String, Value>,
}

impl CallArgs {
    pub fn new() -> CallArgs {
        CallArgs::default()
    }

    /// Appends one positional argument.
    pub fn arg(mut self, value: impl Into<Value>) -> Self {
        self.positional.push(value.into());
        self
    }

    /// Appends one keyword argument. A repeated name overwrites in place,
    /// keeping the original position.
    pub fn kw(mut self, name: &str, value: impl Into<Value>) -> Self {
        self.keywords.insert(name.to_string(), value.into());
        self
    }
}

impl From<Vec<Value>> for CallArgs {
    fn from(positional: Vec<Value>) -> CallArgs {
        CallArgs { positional, keywords: IndexMap::new() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_preserves_order() {
        let args = CallArgs::new()
            .arg(1)
            .arg("two")
            .kw("b", 2)
            .kw("a", 1);
        assert_eq!(args.positional, vec![Value::Int(1), Value::Str("two".into())]);
        let names: Vec<&String> = args.keywords.keys().collect();
        assert_eq!(names, vec!["b", "a"]);
    }

    #[test]
    fn from_positional_vec() {
        let args = CallArgs::from(vec![Value::Nil]);
        assert_eq!(args.positional.len(), 1);
        assert!(args.keywords.is_empty());
    }
}
