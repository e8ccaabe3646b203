//! Contract specifications and their coercion into matchers.
//!
//! [`ContractSpec`] is the tagged union accepted wherever a contract is
//! required: a literal value, a type tag, a regular expression, a predicate,
//! a list of alternatives, a ready matcher instance, or a matcher type with
//! a zero-argument constructor. [`coerce`] is the single mapping from a spec
//! to a matcher; the match arms are ordered by the documented variant
//! priority (matcher type, matcher instance, pattern, predicate, list,
//! type tag, literal).

use std::fmt;
use std::sync::Arc;

use regex::Regex;

use crate::error::ContractError;
use crate::matcher::{
    AnyOf, ArcMatcher, ArrayOf, Exactly, InstanceOf, MapOf, Matcher, PatternMatch, Predicate,
    PredicateFn,
};
use crate::tag::TypeTag;
use crate::value::Value;

/// A named matcher type usable bare as a contract spec.
///
/// Only types with a zero-argument constructor can be instantiated this way;
/// using one that requires constructor arguments is a configuration error
/// surfaced at coercion time.
#[derive(Clone, Copy)]
pub struct MatcherType {
    name: &'static str,
    construct: Option<fn() -> ArcMatcher>,
}

impl MatcherType {
    /// A matcher type with a zero-argument constructor.
    pub fn new(name: &'static str, construct: fn() -> ArcMatcher) -> MatcherType {
        MatcherType { name, construct: Some(construct) }
    }

    /// A matcher type whose constructor requires arguments, so it cannot be
    /// used bare as a contract spec.
    pub fn with_required_args(name: &'static str) -> MatcherType {
        MatcherType { name, construct: None }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    fn instantiate(self) -> Result<ArcMatcher, ContractError> {
        match self.construct {
            Some(construct) => Ok(construct()),
            None => Err(ContractError::MatcherTypeTakesArguments {
                name: self.name.to_string(),
            }),
        }
    }
}

impl fmt::Debug for MatcherType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MatcherType")
            .field("name", &self.name)
            .field("zero_arg", &self.construct.is_some())
            .finish()
    }
}

/// The union type accepted wherever a contract is required.
#[derive(Clone)]
pub enum ContractSpec {
    /// A matcher type; instantiated if its constructor takes no arguments.
    MatcherType(MatcherType),
    /// A ready matcher instance, used as-is.
    Matcher(ArcMatcher),
    /// A regular expression, coerced to [`PatternMatch`].
    Pattern(Regex),
    /// A boolean-valued callback, coerced to [`Predicate`].
    Predicate(PredicateFn),
    /// A list of alternative specs, coerced to [`AnyOf`] recursively.
    OneOf(Vec<ContractSpec>),
    /// A runtime type tag, coerced to [`InstanceOf`].
    Type(TypeTag),
    /// Anything else: a literal value, coerced to [`Exactly`].
    Literal(Value),
}

impl ContractSpec {
    /// Shorthand for a predicate spec.
    pub fn predicate(f: impl Fn(&Value) -> bool + Send + Sync + 'static) -> ContractSpec {
        ContractSpec::Predicate(PredicateFn::new(f))
    }
}

impl fmt::Debug for ContractSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ContractSpec::MatcherType(t) => f.debug_tuple("MatcherType").field(&t.name()).finish(),
            ContractSpec::Matcher(m) => f.debug_tuple("Matcher").field(&m.describe()).finish(),
            ContractSpec::Pattern(re) => f.debug_tuple("Pattern").field(&re.as_str()).finish(),
            ContractSpec::Predicate(_) => f.write_str("Predicate"),
            ContractSpec::OneOf(specs) => f.debug_tuple("OneOf").field(specs).finish(),
            ContractSpec::Type(tag) => f.debug_tuple("Type").field(tag).finish(),
            ContractSpec::Literal(v) => f.debug_tuple("Literal").field(v).finish(),
        }
    }
}

impl From<MatcherType> for ContractSpec {
    fn from(t: MatcherType) -> ContractSpec {
        ContractSpec::MatcherType(t)
    }
}

impl From<ArcMatcher> for ContractSpec {
    fn from(m: ArcMatcher) -> ContractSpec {
        ContractSpec::Matcher(m)
    }
}

impl From<Regex> for ContractSpec {
    fn from(re: Regex) -> ContractSpec {
        ContractSpec::Pattern(re)
    }
}

impl From<Vec<ContractSpec>> for ContractSpec {
    fn from(specs: Vec<ContractSpec>) -> ContractSpec {
        ContractSpec::OneOf(specs)
    }
}

impl From<TypeTag> for ContractSpec {
    fn from(tag: TypeTag) -> ContractSpec {
        ContractSpec::Type(tag)
    }
}

impl From<Value> for ContractSpec {
    fn from(v: Value) -> ContractSpec {
        ContractSpec::Literal(v)
    }
}

impl From<bool> for ContractSpec {
    fn from(b: bool) -> ContractSpec {
        ContractSpec::Literal(Value::Bool(b))
    }
}

impl From<i64> for ContractSpec {
    fn from(i: i64) -> ContractSpec {
        ContractSpec::Literal(Value::Int(i))
    }
}

impl From<f64> for ContractSpec {
    fn from(x: f64) -> ContractSpec {
        ContractSpec::Literal(Value::Float(x))
    }
}

impl From<&str> for ContractSpec {
    fn from(s: &str) -> ContractSpec {
        ContractSpec::Literal(Value::Str(s.to_string()))
    }
}

/// Maps a contract spec to a matcher.
///
/// The only failure mode is a bare matcher type whose constructor requires
/// arguments (possibly nested inside a list spec).
pub fn coerce(spec: impl Into<ContractSpec>) -> Result<ArcMatcher, ContractError> {
    match spec.into() {
        ContractSpec::MatcherType(t) => t.instantiate(),
        ContractSpec::Matcher(m) => Ok(m),
        ContractSpec::Pattern(re) => Ok(Arc::new(PatternMatch::new(re))),
        ContractSpec::Predicate(pred) => Ok(Arc::new(Predicate::new(pred))),
        ContractSpec::OneOf(specs) => Ok(Arc::new(AnyOf::new(specs)?)),
        ContractSpec::Type(tag) => Ok(Arc::new(InstanceOf::new(tag))),
        ContractSpec::Literal(v) => Ok(Arc::new(Exactly::new(v))),
    }
}

/// Structural-matcher shorthand: every element must match `element`.
pub fn array_of(element: impl Into<ContractSpec>) -> Result<ContractSpec, ContractError> {
    Ok(ContractSpec::Matcher(Arc::new(ArrayOf::new(element)?)))
}

/// Structural-matcher shorthand: every key and value must match their contracts.
pub fn map_of(
    key: impl Into<ContractSpec>,
    value: impl Into<ContractSpec>,
) -> Result<ContractSpec, ContractError> {
    Ok(ContractSpec::Matcher(Arc::new(MapOf::new(key, value)?)))
}
