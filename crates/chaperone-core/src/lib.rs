pub mod coerce;
pub mod error;
pub mod matcher;
pub mod tag;
pub mod value;

// Re-export commonly used types
pub use coerce::{array_of, coerce, map_of, ContractSpec, MatcherType};
pub use error::ContractError;
pub use matcher::{
    AnyOf, ArcMatcher, ArrayOf, Exactly, InstanceOf, MapOf, Matcher, PatternMatch, Predicate,
    PredicateFn,
};
pub use tag::TypeTag;
pub use value::Value;
