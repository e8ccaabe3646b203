//! Parameter and return contracts, and the pending annotation record.
//!
//! Contracts coerce their spec into a matcher at declaration time, so a
//! misconfigured spec surfaces immediately rather than on first call. The
//! exactly-one-of contract/predicate rule is enforced by the constructors.

use std::fmt;

use chaperone_core::{coerce, ArcMatcher, ContractError, ContractSpec, Matcher, Value};

use crate::error::CallError;

/// A declared expectation for one named parameter.
#[derive(Clone)]
pub struct ParamContract {
    name: String,
    matcher: ArcMatcher,
}

impl ParamContract {
    /// Builds a parameter contract from exactly one of a contract spec or a
    /// predicate. A missing name, both sources, or neither source is a
    /// configuration error.
    pub fn new(
        name: &str,
        contract: Option<ContractSpec>,
        predicate: Option<chaperone_core::PredicateFn>,
    ) -> Result<ParamContract, ContractError> {
        if name.is_empty() {
            return Err(ContractError::MissingParamName);
        }
        let matcher = exactly_one(contract, predicate)?;
        Ok(ParamContract { name: name.to_string(), matcher })
    }

    pub fn with_contract(
        name: &str,
        spec: impl Into<ContractSpec>,
    ) -> Result<ParamContract, ContractError> {
        ParamContract::new(name, Some(spec.into()), None)
    }

    pub fn with_predicate(
        name: &str,
        predicate: impl Fn(&Value) -> bool + Send + Sync + 'static,
    ) -> Result<ParamContract, ContractError> {
        ParamContract::new(name, None, Some(chaperone_core::PredicateFn::new(predicate)))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn matcher(&self) -> &ArcMatcher {
        &self.matcher
    }

    /// Checks a bound value, producing the structured violation on mismatch.
    pub fn check(&self, owner: &str, method: &str, value: &Value) -> Result<(), CallError> {
        if self.matcher.matches(value) {
            Ok(())
        } else {
            Err(CallError::BrokenParamContract {
                owner: owner.to_string(),
                method: method.to_string(),
                param: self.name.clone(),
                matcher: self.matcher.describe(),
                actual: value.clone(),
            })
        }
    }
}

impl fmt::Debug for ParamContract {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ParamContract")
            .field("name", &self.name)
            .field("matcher", &self.matcher.describe())
            .finish()
    }
}

/// A declared expectation for a method's return value.
#[derive(Clone)]
pub struct ReturnContract {
    matcher: ArcMatcher,
}

impl ReturnContract {
    /// Same exactly-one-of rule as [`ParamContract::new`], minus the name.
    pub fn new(
        contract: Option<ContractSpec>,
        predicate: Option<chaperone_core::PredicateFn>,
    ) -> Result<ReturnContract, ContractError> {
        Ok(ReturnContract { matcher: exactly_one(contract, predicate)? })
    }

    pub fn with_contract(spec: impl Into<ContractSpec>) -> Result<ReturnContract, ContractError> {
        ReturnContract::new(Some(spec.into()), None)
    }

    pub fn with_predicate(
        predicate: impl Fn(&Value) -> bool + Send + Sync + 'static,
    ) -> Result<ReturnContract, ContractError> {
        ReturnContract::new(None, Some(chaperone_core::PredicateFn::new(predicate)))
    }

    pub fn matcher(&self) -> &ArcMatcher {
        &self.matcher
    }

    pub fn check(&self, owner: &str, method: &str, value: &Value) -> Result<(), CallError> {
        if self.matcher.matches(value) {
            Ok(())
        } else {
            Err(CallError::BrokenReturnContract {
                owner: owner.to_string(),
                method: method.to_string(),
                matcher: self.matcher.describe(),
                actual: value.clone(),
            })
        }
    }
}

impl fmt::Debug for ReturnContract {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReturnContract")
            .field("matcher", &self.matcher.describe())
            .finish()
    }
}

fn exactly_one(
    contract: Option<ContractSpec>,
    predicate: Option<chaperone_core::PredicateFn>,
) -> Result<ArcMatcher, ContractError> {
    match (contract, predicate) {
        (Some(_), Some(_)) => Err(ContractError::ContractAndPredicate),
        (None, None) => Err(ContractError::MissingContract),
        (Some(spec), None) => coerce(spec),
        (None, Some(pred)) => Ok(std::sync::Arc::new(chaperone_core::Predicate::new(pred))),
    }
}

/// The pending annotation record: contracts declared ahead of the next
/// method definition, consumed exactly once when that definition happens.
#[derive(Debug, Clone, Default)]
pub struct Annotations {
    params: Vec<ParamContract>,
    ret: Option<ReturnContract>,
}

impl Annotations {
    pub fn new() -> Annotations {
        Annotations::default()
    }

    /// Appends a parameter contract.
    pub fn param(
        &mut self,
        name: &str,
        spec: impl Into<ContractSpec>,
    ) -> Result<&mut Self, ContractError> {
        self.params.push(ParamContract::with_contract(name, spec)?);
        Ok(self)
    }

    /// Appends a predicate-backed parameter contract.
    pub fn param_where(
        &mut self,
        name: &str,
        predicate: impl Fn(&Value) -> bool + Send + Sync + 'static,
    ) -> Result<&mut Self, ContractError> {
        self.params.push(ParamContract::with_predicate(name, predicate)?);
        Ok(self)
    }

    /// Sets the return contract. At most one per pending record.
    pub fn returns(&mut self, spec: impl Into<ContractSpec>) -> Result<&mut Self, ContractError> {
        if self.ret.is_some() {
            return Err(ContractError::DuplicateReturnContract);
        }
        self.ret = Some(ReturnContract::with_contract(spec)?);
        Ok(self)
    }

    /// Sets a predicate-backed return contract.
    pub fn returns_where(
        &mut self,
        predicate: impl Fn(&Value) -> bool + Send + Sync + 'static,
    ) -> Result<&mut Self, ContractError> {
        if self.ret.is_some() {
            return Err(ContractError::DuplicateReturnContract);
        }
        self.ret = Some(ReturnContract::with_predicate(predicate)?);
        Ok(self)
    }

    pub fn params(&self) -> &[ParamContract] {
        &self.params
    }

    pub fn ret(&self) -> Option<&ReturnContract> {
        self.ret.as_ref()
    }

    pub fn is_empty(&self) -> bool {
        self.params.is_empty() && self.ret.is_none()
    }

    /// The getter's share of an accessor annotation: return contract only.
    pub fn getter_half(&self) -> Annotations {
        Annotations { params: Vec::new(), ret: self.ret.clone() }
    }

    /// The setter's share of an accessor annotation: parameter contracts only.
    pub fn setter_half(&self) -> Annotations {
        Annotations { params: self.params.clone(), ret: None }
    }
}
