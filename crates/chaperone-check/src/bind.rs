//! Call binding (recombination): reconstructing a name→value map from one
//! call's actual arguments and a signature model.
//!
//! Call sites may pass named parameters positionally up to the first keyword
//! argument not declared by name, so a leading contiguous run of keyword
//! arguments naming declared keyword slots is promoted into the positional
//! sequence before the walk. The walk then binds positional arguments to
//! slots left to right, sizing the variadic slot by the surplus of arguments
//! over non-variadic-keyword slots. Getting this exactly right is what keeps
//! contract checks attributed to the correct parameter name.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use chaperone_core::Value;

use crate::args::CallArgs;
use crate::signature::{ParamKind, Signature};

/// What one slot received in one call. `NotProvided` marks under-application:
/// the enforcer skips validation entirely so the real call can raise its
/// natural arity failure instead of a misleading contract error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Bound {
    Provided(Value),
    NotProvided,
}

impl Bound {
    pub fn is_provided(&self) -> bool {
        matches!(self, Bound::Provided(_))
    }

    pub fn value(&self) -> Option<&Value> {
        match self {
            Bound::Provided(v) => Some(v),
            Bound::NotProvided => None,
        }
    }
}

/// Name→value map for one call, covering every slot except the variadic
/// keyword slot in declaration order (the variadic keyword slot is appended
/// last when declared).
pub type BoundArgs = IndexMap<String, Bound>;

/// Reconstructs the name→value map for one call.
///
/// Excess positional arguments beyond the slot list are ignored here; the
/// real call surfaces the arity failure.
pub fn recombine(signature: &Signature, call: &CallArgs) -> BoundArgs {
    let mut bound: BoundArgs = signature
        .slots()
        .iter()
        .filter(|s| s.kind != ParamKind::KeyRest)
        .map(|s| (s.name.clone(), Bound::NotProvided))
        .collect();

    // Promote the leading contiguous run of keyword arguments that name
    // declared keyword slots into the positional sequence.
    let mut positional = call.positional.clone();
    let mut promoted = 0;
    for (name, value) in &call.keywords {
        if !signature.is_keyword(name) {
            break;
        }
        positional.push(value.clone());
        promoted += 1;
    }

    // Surplus of positional arguments over non-variadic-keyword slots; this
    // many consecutive arguments belong to the variadic slot.
    let surplus = positional.len() as i64 - signature.arity() as i64 + 1;
    let mut consumed = 0i64;

    let slots = signature.slots();
    let mut slot_idx = 0;

    for value in &positional {
        let Some(slot) = slots.get(slot_idx) else {
            break;
        };
        if slot.kind == ParamKind::Rest {
            let entry = bound
                .entry(slot.name.clone())
                .or_insert(Bound::NotProvided);
            if !entry.is_provided() {
                *entry = Bound::Provided(Value::Array(Vec::new()));
            }
            if consumed < surplus {
                if let Bound::Provided(Value::Array(items)) = entry {
                    items.push(value.clone());
                }
                consumed += 1;
            }
            if consumed >= surplus {
                slot_idx += 1;
            }
        } else {
            bound.insert(slot.name.clone(), Bound::Provided(value.clone()));
            slot_idx += 1;
        }
    }

    // A variadic slot the walk never reached falls back to the original,
    // unmodified positional sequence; "no variadic supplied" stays distinct
    // from "empty variadic explicitly supplied".
    if let Some(rest) = signature.rest_name() {
        let untouched = !bound.get(rest).map_or(false, Bound::is_provided);
        if untouched {
            bound.insert(
                rest.to_string(),
                Bound::Provided(Value::Array(call.positional.clone())),
            );
        }
    }

    // Whatever keyword arguments the promotion left behind belong to the
    // variadic keyword slot.
    if let Some(key_rest) = signature.key_rest_name() {
        let remaining: Vec<(Value, Value)> = call
            .keywords
            .iter()
            .skip(promoted)
            .map(|(name, value)| (Value::symbol(name.clone()), value.clone()))
            .collect();
        bound.insert(key_rest.to_string(), Bound::Provided(Value::Map(remaining)));
    }

    bound
}
