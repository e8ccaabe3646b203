//! Configuration error types for contract declarations.
//!
//! Uses `thiserror` for structured, matchable error variants. Every variant
//! here is a declaration-time mistake: it surfaces immediately when the
//! contract or signature is built, never at call time, and is never recovered.

use thiserror::Error;

/// Errors raised while declaring contracts or building signature models.
#[derive(Debug, Error)]
pub enum ContractError {
    /// A parameter contract was declared without a parameter name.
    #[error("parameter name is required")]
    MissingParamName,

    /// A contract declaration supplied both a contract spec and a predicate.
    #[error("contract and predicate are mutually exclusive")]
    ContractAndPredicate,

    /// A contract declaration supplied neither a contract spec nor a predicate.
    #[error("either a contract or a predicate is required")]
    MissingContract,

    /// A second `returns` contract was declared while one is already pending.
    #[error("a contract already exists for the return value")]
    DuplicateReturnContract,

    /// A matcher type whose constructor requires arguments was used bare
    /// as a contract spec.
    #[error("matcher type {name} constructor takes arguments")]
    MatcherTypeTakesArguments { name: String },

    /// A signature declared the same parameter name twice.
    #[error("duplicate parameter name: '{name}'")]
    DuplicateParamName { name: String },

    /// A signature declared more than one variadic positional slot.
    #[error("signature declares more than one variadic positional parameter")]
    MultipleRestParams,

    /// A signature declared more than one variadic keyword slot.
    #[error("signature declares more than one variadic keyword parameter")]
    MultipleKeyRestParams,
}
