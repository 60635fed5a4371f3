//! Object identifiers accepted by every command.

use crate::core::domain::{
    error::{ValidationError, XenResult},
    model::{record::XenRecord, xen_class::XenClass},
    value_object::{NameLabel, ObjectUuid, OpaqueRef},
};

/// Exactly one way of naming a remote object.
#[derive(Debug, Clone, PartialEq)]
pub enum ObjectIdentifier {
    /// An object already fetched; its own reference is used.
    Record(XenRecord),
    /// A raw opaque reference, used unchanged.
    Reference(OpaqueRef),
    /// Looked up with `get_by_uuid`.
    Uuid(ObjectUuid),
    /// Looked up with `get_by_name_label`; must match at most one object.
    NameLabel(NameLabel),
}

impl From<XenRecord> for ObjectIdentifier {
    fn from(record: XenRecord) -> Self {
        ObjectIdentifier::Record(record)
    }
}

impl From<OpaqueRef> for ObjectIdentifier {
    fn from(opaque_ref: OpaqueRef) -> Self {
        ObjectIdentifier::Reference(opaque_ref)
    }
}

impl From<ObjectUuid> for ObjectIdentifier {
    fn from(uuid: ObjectUuid) -> Self {
        ObjectIdentifier::Uuid(uuid)
    }
}

impl From<NameLabel> for ObjectIdentifier {
    fn from(name: NameLabel) -> Self {
        ObjectIdentifier::NameLabel(name)
    }
}

/// Identifier parameters as bound by a command front end.
///
/// Several may be set at once; [`ObjectSelector::into_identifier`] picks one
/// with a fixed precedence: record, then a non-nil UUID, then name label,
/// then raw reference.
#[derive(Debug, Clone, Default)]
pub struct ObjectSelector {
    record: Option<XenRecord>,
    reference: Option<OpaqueRef>,
    uuid: Option<ObjectUuid>,
    name: Option<NameLabel>,
}

impl ObjectSelector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(mut self, record: XenRecord) -> Self {
        self.record = Some(record);
        self
    }

    pub fn reference(mut self, reference: OpaqueRef) -> Self {
        self.reference = Some(reference);
        self
    }

    pub fn uuid(mut self, uuid: ObjectUuid) -> Self {
        self.uuid = Some(uuid);
        self
    }

    pub fn name(mut self, name: NameLabel) -> Self {
        self.name = Some(name);
        self
    }

    /// Collapses the bound parameters into a single identifier.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::MissingIdentifier` listing the parameters
    /// accepted for `class` when nothing usable was bound.
    pub fn into_identifier(self, class: XenClass) -> XenResult<ObjectIdentifier> {
        if let Some(record) = self.record {
            return Ok(ObjectIdentifier::Record(record));
        }
        if let Some(uuid) = self.uuid.filter(|u| !u.is_nil()) {
            return Ok(ObjectIdentifier::Uuid(uuid));
        }
        if let Some(name) = self.name {
            return Ok(ObjectIdentifier::NameLabel(name));
        }
        if let Some(reference) = self.reference {
            return Ok(ObjectIdentifier::Reference(reference));
        }
        Err(ValidationError::MissingIdentifier {
            accepted: class.accepted_parameters(),
        }
        .into())
    }
}
