//! The enforcement binding: one wrapped method and its per-call check logic.
//!
//! A [`MethodBinding`] is created once when an annotated method is defined
//! and never mutated afterwards; re-declaring contracts for the same name
//! replaces the whole binding. Call-time validation touches only this
//! immutable state, so concurrent calls need no locks.

use std::sync::Arc;

use chaperone_core::Value;

use crate::args::CallArgs;
use crate::bind::{recombine, Bound};
use crate::contract::Annotations;
use crate::error::CallError;
use crate::signature::Signature;

/// The original, unwrapped callable.
pub type Body = Arc<dyn Fn(&CallArgs) -> Result<Value, CallError> + Send + Sync>;

/// The immutable pairing of a signature model, a consumed annotation record,
/// and the original body, backing one wrapped method.
pub struct MethodBinding {
    owner: String,
    method: String,
    signature: Signature,
    annotations: Annotations,
    body: Body,
}

impl MethodBinding {
    pub fn new(
        owner: impl Into<String>,
        method: impl Into<String>,
        signature: Signature,
        annotations: Annotations,
        body: Body,
    ) -> MethodBinding {
        MethodBinding {
            owner: owner.into(),
            method: method.into(),
            signature,
            annotations,
            body,
        }
    }

    pub fn owner(&self) -> &str {
        &self.owner
    }

    pub fn method(&self) -> &str {
        &self.method
    }

    pub fn signature(&self) -> &Signature {
        &self.signature
    }

    pub fn annotations(&self) -> &Annotations {
        &self.annotations
    }

    /// Intercepts one call: bind, validate parameters, invoke the original
    /// body with the original arguments, validate the return value.
    ///
    /// If any slot came back `NotProvided`, parameter validation is skipped
    /// for this call -- the body is still invoked so the natural arity
    /// failure surfaces instead of a misleading contract error.
    pub fn call(&self, args: &CallArgs) -> Result<Value, CallError> {
        let bound = recombine(&self.signature, args);

        if bound.values().all(Bound::is_provided) {
            for contract in self.annotations.params() {
                let value = match bound.get(contract.name()).and_then(Bound::value) {
                    Some(value) => value,
                    None => {
                        return Err(CallError::ParameterDoesNotExist {
                            owner: self.owner.clone(),
                            method: self.method.clone(),
                            param: contract.name().to_string(),
                        })
                    }
                };
                contract.check(&self.owner, &self.method, value).map_err(|err| {
                    tracing::debug!(owner = %self.owner, method = %self.method, %err, "parameter contract violated");
                    err
                })?;
            }
        } else {
            tracing::trace!(
                owner = %self.owner,
                method = %self.method,
                "argument slot unbound, skipping parameter validation"
            );
        }

        let result = (self.body)(args)?;

        if let Some(ret) = self.annotations.ret() {
            ret.check(&self.owner, &self.method, &result).map_err(|err| {
                tracing::debug!(owner = %self.owner, method = %self.method, %err, "return contract violated");
                err
            })?;
        }

        Ok(result)
    }
}
