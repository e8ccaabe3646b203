pub mod args;
pub mod bind;
pub mod config;
pub mod contract;
pub mod enforce;
pub mod error;
pub mod scope;
pub mod signature;

// Re-export commonly used types
pub use args::CallArgs;
pub use bind::{recombine, Bound, BoundArgs};
pub use config::{config, configure, Config};
pub use contract::{Annotations, ParamContract, ReturnContract};
pub use enforce::{Body, MethodBinding};
pub use error::CallError;
pub use scope::Scope;
pub use signature::{ParamKind, Signature, SignatureBuilder, Slot};

// The core data model this crate checks against.
pub use chaperone_core::{
    array_of, coerce, map_of, ContractError, ContractSpec, Matcher, MatcherType, PredicateFn,
    TypeTag, Value,
};
