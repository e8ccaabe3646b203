//! The signature model: a parsed description of a function's parameter list.
//!
//! Most target runtimes cannot reflect parameter names and kinds off a live
//! function, so the signature is declared explicitly alongside the body and
//! captured once into the enforcement binding. It is immutable after
//! construction and shared by every call to that function.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use chaperone_core::ContractError;

/// The kind of one parameter slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ParamKind {
    /// Plain positional parameter.
    Required,
    /// Positional parameter with a default value.
    Optional,
    /// Variadic positional slot (`*rest`). At most one per signature.
    Rest,
    /// Named parameter with a default (`e: default`).
    Keyword,
    /// Variadic keyword slot (`**kwargs`). At most one per signature.
    KeyRest,
}

/// One declared parameter slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Slot {
    pub name: String,
    pub kind: ParamKind,
}

/// Ordered parameter slots for one function, in declaration order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Signature {
    slots: SmallVec<[Slot; 8]>,
}

impl Signature {
    pub fn builder() -> SignatureBuilder {
        SignatureBuilder { slots: Vec::new() }
    }

    pub fn slots(&self) -> &[Slot] {
        &self.slots
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Number of slots excluding the variadic keyword slot. This is the
    /// figure the binder subtracts from the argument count to size the
    /// variadic surplus.
    pub fn arity(&self) -> usize {
        let key_rest = usize::from(self.key_rest_name().is_some());
        self.slots.len() - key_rest
    }

    /// Name of the variadic positional slot, if declared.
    pub fn rest_name(&self) -> Option<&str> {
        self.find_kind(ParamKind::Rest)
    }

    /// Name of the variadic keyword slot, if declared.
    pub fn key_rest_name(&self) -> Option<&str> {
        self.find_kind(ParamKind::KeyRest)
    }

    /// `true` if `name` is a declared keyword (named, defaulted) slot.
    pub fn is_keyword(&self, name: &str) -> bool {
        self.slots
            .iter()
            .any(|s| s.kind == ParamKind::Keyword && s.name == name)
    }

    /// `true` if any slot carries this name.
    pub fn contains(&self, name: &str) -> bool {
        self.slots.iter().any(|s| s.name == name)
    }

    fn find_kind(&self, kind: ParamKind) -> Option<&str> {
        self.slots
            .iter()
            .find(|s| s.kind == kind)
            .map(|s| s.name.as_str())
    }
}

/// Builds a [`Signature`], validating slot invariants at `build` time.
pub struct SignatureBuilder {
    slots: Vec<Slot>,
}

impl SignatureBuilder {
    pub fn required(self, name: &str) -> Self {
        self.slot(name, ParamKind::Required)
    }

    pub fn optional(self, name: &str) -> Self {
        self.slot(name, ParamKind::Optional)
    }

    pub fn rest(self, name: &str) -> Self {
        self.slot(name, ParamKind::Rest)
    }

    pub fn keyword(self, name: &str) -> Self {
        self.slot(name, ParamKind::Keyword)
    }

    pub fn key_rest(self, name: &str) -> Self {
        self.slot(name, ParamKind::KeyRest)
    }

    fn slot(mut self, name: &str, kind: ParamKind) -> Self {
        self.slots.push(Slot { name: name.to_string(), kind });
        self
    }

    /// Validates uniqueness of names and the at-most-one rule for the two
    /// variadic kinds.
    pub fn build(self) -> Result<Signature, ContractError> {
        for (i, slot) in self.slots.iter().enumerate() {
            if self.slots[..i].iter().any(|s| s.name == slot.name) {
                return Err(ContractError::DuplicateParamName { name: slot.name.clone() });
            }
        }
        if self.slots.iter().filter(|s| s.kind == ParamKind::Rest).count() > 1 {
            return Err(ContractError::MultipleRestParams);
        }
        if self.slots.iter().filter(|s| s.kind == ParamKind::KeyRest).count() > 1 {
            return Err(ContractError::MultipleKeyRestParams);
        }
        Ok(Signature { slots: self.slots.into_iter().collect() })
    }
}
