//! Declarative scopes: where contracts are declared and methods defined.
//!
//! A [`Scope`] plays the role of a class body. Contract declarations
//! (`param`, `returns`) accumulate into a pending annotation record, and the
//! next `define` consumes it: the signature, the record, and the body are
//! captured into a [`MethodBinding`] if contracts are enabled, or the body is
//! stored unwrapped if not. Declaration is sequential and single-threaded;
//! calling is read-only over the finished scope.

use std::sync::{Arc, Mutex, PoisonError};

use indexmap::IndexMap;

use chaperone_core::{ContractError, ContractSpec, Value};

use crate::args::CallArgs;
use crate::config::{self, Config};
use crate::contract::Annotations;
use crate::enforce::{Body, MethodBinding};
use crate::error::CallError;
use crate::signature::Signature;

enum Method {
    /// Unwrapped body: no annotations, or contracts disabled at wrap time.
    Plain(Body),
    Checked(MethodBinding),
}

type FieldStore = Arc<Mutex<IndexMap<String, Value>>>;

/// A declarative scope owning methods, their contracts, and the field store
/// behind generated accessors.
pub struct Scope {
    owner: String,
    /// Explicit override; `None` defers to the global config, read at each
    /// definition.
    config: Option<Config>,
    pending: Option<Annotations>,
    methods: IndexMap<String, Method>,
    annotations: IndexMap<String, Annotations>,
    fields: FieldStore,
}

impl Scope {
    /// A scope deferring to the global config. The toggle is consulted each
    /// time a method is defined, not when the scope is built, so flipping it
    /// between definitions takes effect immediately.
    pub fn new(owner: impl Into<String>) -> Scope {
        Scope {
            owner: owner.into(),
            config: None,
            pending: None,
            methods: IndexMap::new(),
            annotations: IndexMap::new(),
            fields: Arc::new(Mutex::new(IndexMap::new())),
        }
    }

    /// A scope with an explicit config, independent of the global toggle.
    pub fn with_config(owner: impl Into<String>, config: Config) -> Scope {
        Scope { config: Some(config), ..Scope::new(owner) }
    }

    pub fn owner(&self) -> &str {
        &self.owner
    }

    /// Declares a contract for one parameter of the next method defined.
    pub fn param(
        &mut self,
        name: &str,
        spec: impl Into<ContractSpec>,
    ) -> Result<&mut Self, ContractError> {
        self.pending_mut().param(name, spec)?;
        Ok(self)
    }

    /// Predicate form of [`Scope::param`].
    pub fn param_where(
        &mut self,
        name: &str,
        predicate: impl Fn(&Value) -> bool + Send + Sync + 'static,
    ) -> Result<&mut Self, ContractError> {
        self.pending_mut().param_where(name, predicate)?;
        Ok(self)
    }

    /// Declares the return contract for the next method defined. At most one
    /// per method.
    pub fn returns(&mut self, spec: impl Into<ContractSpec>) -> Result<&mut Self, ContractError> {
        self.pending_mut().returns(spec)?;
        Ok(self)
    }

    /// Alias for [`Scope::returns`], reading better with type-tag specs.
    pub fn returns_a(&mut self, spec: impl Into<ContractSpec>) -> Result<&mut Self, ContractError> {
        self.returns(spec)
    }

    /// Predicate form of [`Scope::returns`].
    pub fn returns_where(
        &mut self,
        predicate: impl Fn(&Value) -> bool + Send + Sync + 'static,
    ) -> Result<&mut Self, ContractError> {
        self.pending_mut().returns_where(predicate)?;
        Ok(self)
    }

    /// Defines a method, consuming the pending annotation record.
    ///
    /// With no pending record the body is stored untouched. With one, the
    /// config decides: enabled builds a [`MethodBinding`]; disabled records
    /// the annotations for inspection but constructs no binding, leaving the
    /// method with zero call-time overhead. Redefining a name replaces the
    /// previous method and binding outright.
    pub fn define<F>(&mut self, name: &str, signature: Signature, body: F)
    where
        F: Fn(&CallArgs) -> Result<Value, CallError> + Send + Sync + 'static,
    {
        let annotation = self.pending.take();
        self.install(name, signature, Arc::new(body), annotation);
    }

    /// Calls a method by name with one set of actual arguments.
    pub fn call(&self, name: &str, args: CallArgs) -> Result<Value, CallError> {
        match self.methods.get(name) {
            Some(Method::Plain(body)) => body(&args),
            Some(Method::Checked(binding)) => binding.call(&args),
            None => Err(CallError::MethodNotFound {
                owner: self.owner.clone(),
                method: name.to_string(),
            }),
        }
    }

    /// The annotation record consumed by a method definition, if any was
    /// declared. Recorded even while contracts are disabled.
    pub fn annotations(&self, name: &str) -> Option<&Annotations> {
        self.annotations.get(name)
    }

    /// `true` if the named method carries an enforcement binding.
    pub fn has_binding(&self, name: &str) -> bool {
        matches!(self.methods.get(name), Some(Method::Checked(_)))
    }

    /// Defines a getter/setter pair per property over the scope's field
    /// store. The pending annotation record is cloned per property and
    /// split: the getter keeps only the return contract, the setter keeps
    /// only the parameter contracts, and each generated method gets its own
    /// independent binding.
    pub fn attr_accessor(&mut self, properties: &[&str]) -> Result<(), ContractError> {
        let pending = self.pending.take();
        for property in properties {
            self.define_getter(property, pending.as_ref().map(Annotations::getter_half))?;
            self.define_setter(property, pending.as_ref().map(Annotations::setter_half))?;
        }
        Ok(())
    }

    /// Getter-only variant of [`Scope::attr_accessor`].
    pub fn attr_reader(&mut self, properties: &[&str]) -> Result<(), ContractError> {
        let pending = self.pending.take();
        for property in properties {
            self.define_getter(property, pending.as_ref().map(Annotations::getter_half))?;
        }
        Ok(())
    }

    /// Setter-only variant of [`Scope::attr_accessor`].
    pub fn attr_writer(&mut self, properties: &[&str]) -> Result<(), ContractError> {
        let pending = self.pending.take();
        for property in properties {
            self.define_setter(property, pending.as_ref().map(Annotations::setter_half))?;
        }
        Ok(())
    }

    fn pending_mut(&mut self) -> &mut Annotations {
        self.pending.get_or_insert_with(Annotations::new)
    }

    /// Installs one method. The annotation registry is filled independently
    /// of the config; the toggle decides only whether a binding wraps the
    /// body.
    fn install(&mut self, name: &str, signature: Signature, body: Body, annotation: Option<Annotations>) {
        let config = self.config.unwrap_or_else(config::config);
        match annotation {
            None => {
                self.methods.insert(name.to_string(), Method::Plain(body));
            }
            Some(annotation) => {
                self.annotations.insert(name.to_string(), annotation.clone());
                if config.enabled() {
                    tracing::debug!(owner = %self.owner, method = name, "wrapping method with contract checks");
                    self.methods.insert(
                        name.to_string(),
                        Method::Checked(MethodBinding::new(
                            self.owner.clone(),
                            name,
                            signature,
                            annotation,
                            body,
                        )),
                    );
                } else {
                    tracing::debug!(owner = %self.owner, method = name, "contracts disabled, method left unwrapped");
                    self.methods.insert(name.to_string(), Method::Plain(body));
                }
            }
        }
    }

    fn define_getter(
        &mut self,
        property: &str,
        annotation: Option<Annotations>,
    ) -> Result<(), ContractError> {
        let fields = Arc::clone(&self.fields);
        let field = property.to_string();
        let body: Body = Arc::new(move |_args| {
            let fields = fields.lock().unwrap_or_else(PoisonError::into_inner);
            Ok(fields.get(&field).cloned().unwrap_or(Value::Nil))
        });
        let signature = Signature::builder().build()?;
        self.install(property, signature, body, annotation);
        Ok(())
    }

    fn define_setter(
        &mut self,
        property: &str,
        annotation: Option<Annotations>,
    ) -> Result<(), ContractError> {
        let fields = Arc::clone(&self.fields);
        let field = property.to_string();
        let body: Body = Arc::new(move |args| {
            let value = args.positional.first().cloned().unwrap_or(Value::Nil);
            let mut fields = fields.lock().unwrap_or_else(PoisonError::into_inner);
            fields.insert(field.clone(), value.clone());
            // Assignment evaluates to the written value.
            Ok(value)
        });
        let signature = Signature::builder().required("value").build()?;
        self.install(&format!("{property}="), signature, body, annotation);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chaperone_core::TypeTag;

    fn enabled() -> Config {
        Config { enabled: true, apply_everywhere: false }
    }

    fn identity_body(args: &CallArgs) -> Result<Value, CallError> {
        Ok(args.positional.first().cloned().unwrap_or(Value::Nil))
    }

    #[test]
    fn annotated_method_is_wrapped_and_checked() {
        let mut scope = Scope::with_config("Sample", enabled());
        scope.param("x", TypeTag::Integer).unwrap();
        scope.define(
            "foo",
            Signature::builder().required("x").build().unwrap(),
            identity_body,
        );

        assert!(scope.has_binding("foo"));
        assert_eq!(scope.call("foo", CallArgs::new().arg(1)).unwrap(), Value::Int(1));

        let err = scope.call("foo", CallArgs::new().arg("1")).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Sample#foo.x was \"1\", which does not match: be a Integer"
        );
    }

    #[test]
    fn unannotated_method_stays_plain() {
        let mut scope = Scope::with_config("Sample", enabled());
        scope.define("no_params", Signature::builder().build().unwrap(), |_| {
            Ok(Value::symbol("no_params"))
        });
        assert!(!scope.has_binding("no_params"));
        assert!(scope.annotations("no_params").is_none());
        assert_eq!(
            scope.call("no_params", CallArgs::new()).unwrap(),
            Value::symbol("no_params")
        );
    }

    #[test]
    fn pending_record_is_consumed_exactly_once() {
        let mut scope = Scope::with_config("Sample", enabled());
        scope.param("x", TypeTag::Integer).unwrap();
        scope.define(
            "first",
            Signature::builder().required("x").build().unwrap(),
            identity_body,
        );
        // The record went to `first`; `second` must come out unwrapped.
        scope.define(
            "second",
            Signature::builder().required("x").build().unwrap(),
            identity_body,
        );
        assert!(scope.has_binding("first"));
        assert!(!scope.has_binding("second"));
    }

    #[test]
    fn disabled_config_records_annotations_but_skips_wrapping() {
        let mut scope = Scope::with_config("Sample", Config::default());
        scope.param("x", TypeTag::Integer).unwrap();
        scope.define(
            "foo",
            Signature::builder().required("x").build().unwrap(),
            identity_body,
        );

        assert!(!scope.has_binding("foo"));
        assert!(scope.annotations("foo").is_some());
        // Contract would reject this, but the method is unwrapped.
        assert_eq!(
            scope.call("foo", CallArgs::new().arg("1")).unwrap(),
            Value::Str("1".into())
        );
    }

    #[test]
    fn redefinition_replaces_the_binding() {
        let mut scope = Scope::with_config("Sample", enabled());
        scope.param("x", TypeTag::Integer).unwrap();
        scope.define(
            "foo",
            Signature::builder().required("x").build().unwrap(),
            identity_body,
        );

        scope.param("x", TypeTag::String).unwrap();
        scope.define(
            "foo",
            Signature::builder().required("x").build().unwrap(),
            identity_body,
        );

        assert!(scope.call("foo", CallArgs::new().arg("1")).is_ok());
        assert!(scope.call("foo", CallArgs::new().arg(1)).is_err());
    }

    #[test]
    fn unknown_method() {
        let scope = Scope::with_config("Sample", enabled());
        let err = scope.call("missing", CallArgs::new()).unwrap_err();
        assert_eq!(err.to_string(), "undefined method 'missing' for Sample");
    }

    #[test]
    fn accessors_split_the_annotation() {
        let mut scope = Scope::with_config("Sample", enabled());
        scope.param("value", TypeTag::String).unwrap();
        scope.returns(vec![
            ContractSpec::Type(TypeTag::String),
            ContractSpec::Literal(Value::Nil),
        ]).unwrap();
        scope.attr_accessor(&["name"]).unwrap();

        // Unset field reads as nil, satisfying the getter's return contract.
        assert_eq!(scope.call("name", CallArgs::new()).unwrap(), Value::Nil);

        // Setter checks the written value and returns it.
        assert_eq!(
            scope.call("name=", CallArgs::new().arg("jo")).unwrap(),
            Value::Str("jo".into())
        );
        assert_eq!(scope.call("name", CallArgs::new()).unwrap(), Value::Str("jo".into()));

        let err = scope.call("name=", CallArgs::new().arg(1)).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Sample#name=.value was 1, which does not match: be a String"
        );

        // The getter carries no param contracts, the setter no return contract.
        let getter = scope.annotations("name").unwrap();
        assert!(getter.params().is_empty());
        assert!(getter.ret().is_some());
        let setter = scope.annotations("name=").unwrap();
        assert_eq!(setter.params().len(), 1);
        assert!(setter.ret().is_none());
    }

    #[test]
    fn multi_property_accessors_get_independent_bindings() {
        let mut scope = Scope::with_config("Sample", enabled());
        scope.param("value", TypeTag::Integer).unwrap();
        scope.returns(vec![
            ContractSpec::Type(TypeTag::Integer),
            ContractSpec::Literal(Value::Nil),
        ]).unwrap();
        scope.attr_accessor(&["width", "height"]).unwrap();

        assert!(scope.has_binding("width"));
        assert!(scope.has_binding("width="));
        assert!(scope.has_binding("height"));
        assert!(scope.has_binding("height="));

        scope.call("width=", CallArgs::new().arg(3)).unwrap();
        scope.call("height=", CallArgs::new().arg(4)).unwrap();
        assert_eq!(scope.call("width", CallArgs::new()).unwrap(), Value::Int(3));
        assert_eq!(scope.call("height", CallArgs::new()).unwrap(), Value::Int(4));
    }

    #[test]
    fn attr_reader_and_writer_halves() {
        let mut scope = Scope::with_config("Sample", enabled());
        scope.returns(vec![
            ContractSpec::Type(TypeTag::Integer),
            ContractSpec::Literal(Value::Nil),
        ]).unwrap();
        scope.attr_reader(&["count"]).unwrap();
        assert!(scope.has_binding("count"));
        assert!(scope.call("count=", CallArgs::new().arg(1)).is_err());

        scope.param("value", TypeTag::Integer).unwrap();
        scope.attr_writer(&["count"]).unwrap();
        assert!(scope.has_binding("count="));
        scope.call("count=", CallArgs::new().arg(7)).unwrap();
        assert_eq!(scope.call("count", CallArgs::new()).unwrap(), Value::Int(7));
    }

    #[test]
    fn accessors_without_annotations_are_plain() {
        let mut scope = Scope::with_config("Sample", enabled());
        scope.attr_accessor(&["tag"]).unwrap();
        assert!(!scope.has_binding("tag"));
        assert!(!scope.has_binding("tag="));
        scope.call("tag=", CallArgs::new().arg(Value::symbol("t"))).unwrap();
        assert_eq!(scope.call("tag", CallArgs::new()).unwrap(), Value::symbol("t"));
    }
}
