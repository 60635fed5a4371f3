//! Generic object records.
//!
//! The object schema belongs to the server, so a record is kept as a field map
//! rather than a typed struct per class.

use crate::core::domain::{
    error::{XenError, XenResult},
    model::xen_class::XenClass,
    value_object::OpaqueRef,
};
use serde_json::{Map, Value};

/// The full set of named fields describing a remote object.
#[derive(Debug, Clone, PartialEq)]
pub struct XenRecord {
    class: XenClass,
    opaque_ref: Option<OpaqueRef>,
    fields: Map<String, Value>,
}

impl XenRecord {
    pub fn new(class: XenClass, fields: Map<String, Value>) -> Self {
        Self {
            class,
            opaque_ref: None,
            fields,
        }
    }

    /// Builds a record from a `get_record` reply.
    pub(crate) fn from_value(class: XenClass, value: Value) -> XenResult<Self> {
        match value {
            Value::Object(fields) => Ok(Self::new(class, fields)),
            other => Err(XenError::Response(format!(
                "{} record must be a struct, got {}",
                class, other
            ))),
        }
    }

    /// Stamps the record with the reference it was fetched through.
    #[must_use]
    pub fn with_ref(mut self, opaque_ref: OpaqueRef) -> Self {
        self.opaque_ref = Some(opaque_ref);
        self
    }

    pub fn class(&self) -> XenClass {
        self.class
    }

    pub fn opaque_ref(&self) -> Option<&OpaqueRef> {
        self.opaque_ref.as_ref()
    }

    /// The record's own reference, or the null reference when it carries none.
    pub fn reference(&self) -> OpaqueRef {
        self.opaque_ref.clone().unwrap_or_else(OpaqueRef::null)
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields.get(field)
    }

    pub fn uuid(&self) -> Option<&str> {
        self.get("uuid").and_then(Value::as_str)
    }

    pub fn name_label(&self) -> Option<&str> {
        self.get("name_label").and_then(Value::as_str)
    }

    pub fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }

    pub fn into_fields(self) -> Map<String, Value> {
        self.fields
    }

    /// The record as a JSON object, with `opaque_ref` added when known.
    pub fn to_json(&self) -> Value {
        let mut fields = self.fields.clone();
        if let Some(opaque_ref) = &self.opaque_ref {
            fields.insert("opaque_ref".to_string(), opaque_ref.into());
        }
        Value::Object(fields)
    }
}
