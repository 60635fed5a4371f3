//! Operation descriptors and concrete remote calls.

use crate::core::domain::{
    model::{invocation::InvocationMode, xen_class::XenClass},
    value_object::OpaqueRef,
};
use serde_json::Value;

/// What a remote method returns, and therefore how its result is projected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReturnShape {
    /// Nothing is handed back (e.g. `destroy`).
    Nothing,
    /// A void call whose effect is shown by re-reading the target record.
    TargetRecord,
    /// A string, number, boolean, timestamp or list of those.
    Scalar,
    /// A string-keyed map.
    Map,
    /// A reference to an object of the given class.
    Ref(XenClass),
    /// A list of references to objects of the given class.
    RefList(XenClass),
    /// A full record of the given class, e.g. `get_record`.
    Record(XenClass),
}

/// A named operation on one object: lifecycle action, getter or destructor.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiAction {
    method: String,
    args: Vec<Value>,
    returns: ReturnShape,
    gated: bool,
}

impl ApiAction {
    /// A state-changing action; it passes through the approval gate.
    pub fn new(method: impl Into<String>, returns: ReturnShape) -> Self {
        Self {
            method: method.into(),
            args: Vec::new(),
            returns,
            gated: true,
        }
    }

    /// A property read (`get_<field>`); never gated.
    pub fn property(field: &str, returns: ReturnShape) -> Self {
        Self {
            method: format!("get_{}", field),
            args: Vec::new(),
            returns,
            gated: false,
        }
    }

    pub fn destroy() -> Self {
        Self::new("destroy", ReturnShape::Nothing)
    }

    /// Appends an argument after the object reference.
    #[must_use]
    pub fn arg(mut self, value: impl Into<Value>) -> Self {
        self.args.push(value.into());
        self
    }

    pub fn method(&self) -> &str {
        &self.method
    }

    pub fn args(&self) -> &[Value] {
        &self.args
    }

    pub fn returns(&self) -> ReturnShape {
        self.returns
    }

    pub fn is_gated(&self) -> bool {
        self.gated
    }

    /// Binds the action to a concrete object.
    pub fn call_on(&self, class: XenClass, target: &OpaqueRef) -> ApiCall {
        ApiCall::on(class, self.method.clone(), target).args(self.args.iter().cloned())
    }
}

/// One concrete remote call, minus the session argument.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiCall {
    class: XenClass,
    method: String,
    target: Option<OpaqueRef>,
    args: Vec<Value>,
}

impl ApiCall {
    /// A call not aimed at an existing object (lookups, constructors).
    pub fn new(class: XenClass, method: impl Into<String>) -> Self {
        Self {
            class,
            method: method.into(),
            target: None,
            args: Vec::new(),
        }
    }

    /// A call whose first argument is the target object.
    pub fn on(class: XenClass, method: impl Into<String>, target: &OpaqueRef) -> Self {
        Self {
            class,
            method: method.into(),
            target: Some(target.clone()),
            args: Vec::new(),
        }
    }

    #[must_use]
    pub fn arg(mut self, value: impl Into<Value>) -> Self {
        self.args.push(value.into());
        self
    }

    #[must_use]
    pub fn args(mut self, values: impl IntoIterator<Item = Value>) -> Self {
        self.args.extend(values);
        self
    }

    pub fn class(&self) -> XenClass {
        self.class
    }

    pub fn target(&self) -> Option<&OpaqueRef> {
        self.target.as_ref()
    }

    /// Qualified name, e.g. `Cluster.pool_destroy`.
    pub fn name(&self) -> String {
        self.class.method(&self.method)
    }

    /// The method as sent on the wire; async calls use the `Async.` twin.
    pub fn wire_method(&self, mode: InvocationMode) -> String {
        match mode {
            InvocationMode::Sync => self.name(),
            InvocationMode::Async => format!("Async.{}", self.name()),
        }
    }

    /// Positional parameters after the session reference.
    pub fn params(&self) -> Vec<Value> {
        self.target
            .iter()
            .map(Value::from)
            .chain(self.args.iter().cloned())
            .collect()
    }
}
