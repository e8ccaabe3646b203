//! Call-time error types.
//!
//! Violation variants carry enough structured data (owner, method, parameter
//! name, matcher description, actual value) to format their messages, and the
//! message text is part of the public contract of this crate: tooling matches
//! on it. The actual value is rendered through [`Value`]'s inspect-style
//! `Display`.

use thiserror::Error;

use chaperone_core::Value;

/// Errors raised while calling a wrapped method. Never caught internally;
/// every failure aborts the call and propagates to the caller.
#[derive(Debug, Error)]
pub enum CallError {
    /// A bound argument did not satisfy its parameter contract.
    #[error("{owner}#{method}.{param} was {actual}, which does not match: {matcher}")]
    BrokenParamContract {
        owner: String,
        method: String,
        param: String,
        matcher: String,
        actual: Value,
    },

    /// The body's result did not satisfy the return contract.
    #[error("{owner}#{method} returned {actual}, which does not match: {matcher}")]
    BrokenReturnContract {
        owner: String,
        method: String,
        matcher: String,
        actual: Value,
    },

    /// A declared parameter contract names no slot in the signature. Raised
    /// the first time the method is called, not at declaration.
    #[error("Parameter {owner}#{method}.{param} does not exist")]
    ParameterDoesNotExist {
        owner: String,
        method: String,
        param: String,
    },

    /// The scope has no method under this name.
    #[error("undefined method '{method}' for {owner}")]
    MethodNotFound { owner: String, method: String },

    /// An error raised by the wrapped body itself, propagated unchanged.
    #[error("{source}")]
    Body {
        #[source]
        source: Box<dyn std::error::Error + Send + Sync + 'static>,
    },
}

impl CallError {
    /// Wraps a body error for propagation through a wrapped call.
    pub fn body(err: impl Into<Box<dyn std::error::Error + Send + Sync + 'static>>) -> CallError {
        CallError::Body { source: err.into() }
    }
}
