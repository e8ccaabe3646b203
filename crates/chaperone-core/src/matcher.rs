//! The matcher abstraction and its built-in implementations.
//!
//! A [`Matcher`] is the atomic evaluable contract: a pure membership test
//! plus a stable, human-readable description that violation messages quote
//! verbatim. Structural matchers ([`AnyOf`], [`ArrayOf`], [`MapOf`]) coerce
//! their sub-contracts once at construction time, so `matches` never pays a
//! coercion cost and never fails.

use std::fmt;
use std::sync::Arc;

use regex::Regex;
use smallvec::SmallVec;

use crate::coerce::{coerce, ContractSpec};
use crate::error::ContractError;
use crate::tag::TypeTag;
use crate::value::Value;

/// An evaluable contract for a single value.
///
/// Implementations must be pure: `matches` may not mutate state or fail, and
/// `describe` must return the same phrase for the life of the matcher.
pub trait Matcher: Send + Sync {
    /// Runs the membership test.
    fn matches(&self, value: &Value) -> bool;

    /// A stable phrase completing the sentence "which does not match: ...".
    fn describe(&self) -> String;
}

impl fmt::Debug for dyn Matcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Matcher").field(&self.describe()).finish()
    }
}

/// Shared handle to a matcher. Matchers are immutable once constructed, so
/// bindings and cloned annotations share them freely.
pub type ArcMatcher = Arc<dyn Matcher>;

/// Matches values equal to one expected literal.
pub struct Exactly {
    expected: Value,
}

impl Exactly {
    pub fn new(expected: impl Into<Value>) -> Exactly {
        Exactly { expected: expected.into() }
    }
}

impl Matcher for Exactly {
    fn matches(&self, value: &Value) -> bool {
        self.expected == *value
    }

    fn describe(&self) -> String {
        format!("equal {}", self.expected)
    }
}

/// Matches values belonging to a runtime type tag.
pub struct InstanceOf {
    tag: TypeTag,
}

impl InstanceOf {
    pub fn new(tag: TypeTag) -> InstanceOf {
        InstanceOf { tag }
    }
}

impl Matcher for InstanceOf {
    fn matches(&self, value: &Value) -> bool {
        self.tag.matches(value)
    }

    fn describe(&self) -> String {
        format!("be a {}", self.tag.name())
    }
}

/// Matches string-like values against a regular expression.
///
/// Only strings and symbols are eligible; any other value type is a
/// non-match, not an error.
pub struct PatternMatch {
    pattern: Regex,
}

impl PatternMatch {
    pub fn new(pattern: Regex) -> PatternMatch {
        PatternMatch { pattern }
    }
}

impl Matcher for PatternMatch {
    fn matches(&self, value: &Value) -> bool {
        match value {
            Value::Str(s) | Value::Symbol(s) => self.pattern.is_match(s),
            _ => false,
        }
    }

    fn describe(&self) -> String {
        format!("/{}/", self.pattern.as_str())
    }
}

/// A boolean-valued callback usable as a contract.
///
/// Wrapped in an `Arc` so cloned annotations (accessor splitting clones the
/// pending record per property) share one closure.
#[derive(Clone)]
pub struct PredicateFn(Arc<dyn Fn(&Value) -> bool + Send + Sync>);

impl PredicateFn {
    pub fn new(f: impl Fn(&Value) -> bool + Send + Sync + 'static) -> PredicateFn {
        PredicateFn(Arc::new(f))
    }

    pub fn call(&self, value: &Value) -> bool {
        (self.0)(value)
    }
}

impl fmt::Debug for PredicateFn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PredicateFn")
    }
}

/// Matches values accepted by a caller-supplied predicate.
pub struct Predicate {
    pred: PredicateFn,
}

impl Predicate {
    pub fn new(pred: PredicateFn) -> Predicate {
        Predicate { pred }
    }
}

impl Matcher for Predicate {
    fn matches(&self, value: &Value) -> bool {
        self.pred.call(value)
    }

    fn describe(&self) -> String {
        "<custom matcher>".to_string()
    }
}

/// Matches when any sub-matcher matches (union of contracts).
pub struct AnyOf {
    matchers: SmallVec<[ArcMatcher; 4]>,
}

impl AnyOf {
    /// Coerces each element spec into a matcher. Fails only if an element is
    /// itself misconfigured (e.g. a bare matcher type that takes arguments).
    pub fn new(specs: Vec<ContractSpec>) -> Result<AnyOf, ContractError> {
        let matchers = specs
            .into_iter()
            .map(coerce)
            .collect::<Result<SmallVec<_>, _>>()?;
        Ok(AnyOf { matchers })
    }
}

impl Matcher for AnyOf {
    fn matches(&self, value: &Value) -> bool {
        self.matchers.iter().any(|m| m.matches(value))
    }

    fn describe(&self) -> String {
        let parts: Vec<String> = self.matchers.iter().map(|m| m.describe()).collect();
        format!("<any of: {}>", parts.join(", "))
    }
}

/// Matches arrays whose every element matches the element contract.
/// An empty array always matches.
pub struct ArrayOf {
    element: ArcMatcher,
}

impl ArrayOf {
    pub fn new(element: impl Into<ContractSpec>) -> Result<ArrayOf, ContractError> {
        Ok(ArrayOf { element: coerce(element.into())? })
    }
}

impl Matcher for ArrayOf {
    fn matches(&self, value: &Value) -> bool {
        match value {
            Value::Array(items) => items.iter().all(|item| self.element.matches(item)),
            _ => false,
        }
    }

    fn describe(&self) -> String {
        format!("an array of elements matching {}", self.element.describe())
    }
}

/// Matches maps whose every key and value match their respective contracts.
/// An empty map always matches.
pub struct MapOf {
    key: ArcMatcher,
    value: ArcMatcher,
}

impl MapOf {
    pub fn new(
        key: impl Into<ContractSpec>,
        value: impl Into<ContractSpec>,
    ) -> Result<MapOf, ContractError> {
        Ok(MapOf {
            key: coerce(key.into())?,
            value: coerce(value.into())?,
        })
    }
}

impl Matcher for MapOf {
    fn matches(&self, value: &Value) -> bool {
        match value {
            Value::Map(pairs) => pairs
                .iter()
                .all(|(k, v)| self.key.matches(k) && self.value.matches(v)),
            _ => false,
        }
    }

    fn describe(&self) -> String {
        format!(
            "a hash with keys matching {} and values matching {}",
            self.key.describe(),
            self.value.describe()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn value_strategy() -> impl Strategy<Value = Value> {
        let leaf = prop_oneof![
            Just(Value::Nil),
            any::<bool>().prop_map(Value::Bool),
            any::<i64>().prop_map(Value::Int),
            "[a-z]{0,8}".prop_map(Value::Str),
            "[a-z]{1,8}".prop_map(Value::Symbol),
        ];
        leaf.prop_recursive(3, 16, 4, |inner| {
            prop_oneof![
                prop::collection::vec(inner.clone(), 0..4).prop_map(Value::Array),
                prop::collection::vec((inner.clone(), inner), 0..4).prop_map(Value::Map),
            ]
        })
    }

    #[test]
    fn exactly_compares_by_equality() {
        let m = Exactly::new(Value::Nil);
        assert!(m.matches(&Value::Nil));
        assert!(!m.matches(&Value::Str("not nil".into())));
        insta::assert_snapshot!(m.describe(), @"equal nil");
    }

    #[test]
    fn instance_of_describes_its_tag() {
        let m = InstanceOf::new(TypeTag::Integer);
        assert!(m.matches(&Value::Int(1)));
        assert!(!m.matches(&Value::Str("1".into())));
        insta::assert_snapshot!(m.describe(), @"be a Integer");
    }

    #[test]
    fn pattern_only_matches_string_likes() {
        let m = PatternMatch::new(Regex::new("^a+$").unwrap());
        assert!(m.matches(&Value::Str("aaa".into())));
        assert!(m.matches(&Value::symbol("aa")));
        assert!(!m.matches(&Value::Int(1)));
        assert!(!m.matches(&Value::Nil));
        insta::assert_snapshot!(m.describe(), @"/^a+$/");
    }

    #[test]
    fn predicate_delegates_to_callback() {
        let m = Predicate::new(PredicateFn::new(|v| matches!(v, Value::Int(i) if *i > 0)));
        assert!(m.matches(&Value::Int(1)));
        assert!(!m.matches(&Value::Int(0)));
        insta::assert_snapshot!(m.describe(), @"<custom matcher>");
    }

    #[test]
    fn any_of_unions_sub_matchers() {
        let m = AnyOf::new(vec![
            ContractSpec::Type(TypeTag::String),
            ContractSpec::Type(TypeTag::Symbol),
        ])
        .unwrap();
        assert!(m.matches(&Value::Str("string".into())));
        assert!(m.matches(&Value::symbol("symbol")));
        assert!(!m.matches(&Value::Nil));
        insta::assert_snapshot!(m.describe(), @"<any of: be a String, be a Symbol>");
    }

    #[test]
    fn array_of_checks_every_element() {
        let m = ArrayOf::new(TypeTag::Integer).unwrap();
        assert!(m.matches(&Value::Array(vec![Value::Int(1), Value::Int(2)])));
        assert!(!m.matches(&Value::Array(vec![Value::Int(1), Value::Str("2".into())])));
        assert!(!m.matches(&Value::Int(1)));
        insta::assert_snapshot!(m.describe(), @"an array of elements matching be a Integer");
    }

    #[test]
    fn map_of_checks_keys_and_values() {
        let m = MapOf::new(TypeTag::Symbol, TypeTag::Integer).unwrap();
        assert!(m.matches(&Value::Map(vec![(Value::symbol("a"), Value::Int(1))])));
        assert!(!m.matches(&Value::Map(vec![(Value::Str("a".into()), Value::Int(1))])));
        assert!(!m.matches(&Value::Map(vec![(Value::symbol("a"), Value::Nil)])));
        assert!(!m.matches(&Value::Array(vec![])));
        insta::assert_snapshot!(
            m.describe(),
            @"a hash with keys matching be a Symbol and values matching be a Integer"
        );
    }

    #[test]
    fn structural_matchers_nest() {
        let inner = ArrayOf::new(TypeTag::String).unwrap();
        let m = ArrayOf::new(ContractSpec::Matcher(Arc::new(inner))).unwrap();
        let nested = Value::Array(vec![Value::Array(vec![Value::Str("x".into())])]);
        let flat = Value::Array(vec![Value::Str("x".into())]);
        assert!(m.matches(&nested));
        assert!(!m.matches(&flat));
    }

    proptest! {
        #[test]
        fn empty_structures_always_match(v in value_strategy()) {
            let array = ArrayOf::new(ContractSpec::Literal(v.clone())).unwrap();
            prop_assert!(array.matches(&Value::Array(vec![])));

            let map = MapOf::new(ContractSpec::Literal(v.clone()), TypeTag::Object).unwrap();
            prop_assert!(map.matches(&Value::Map(vec![])));
        }

        #[test]
        fn any_of_is_disjunction(v in value_strategy()) {
            let a = InstanceOf::new(TypeTag::Integer);
            let b = InstanceOf::new(TypeTag::Symbol);
            let expected = a.matches(&v) || b.matches(&v);

            let union = AnyOf::new(vec![
                ContractSpec::Type(TypeTag::Integer),
                ContractSpec::Type(TypeTag::Symbol),
            ])
            .unwrap();
            prop_assert_eq!(union.matches(&v), expected);
        }

        #[test]
        fn matching_is_deterministic(v in value_strategy(), w in value_strategy()) {
            let m = AnyOf::new(vec![
                ContractSpec::Literal(w),
                ContractSpec::Type(TypeTag::Numeric),
            ])
            .unwrap();
            prop_assert_eq!(m.matches(&v), m.matches(&v));
            prop_assert_eq!(m.describe(), m.describe());
        }
    }
}
