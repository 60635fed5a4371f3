use crate::core::{
    domain::{
        error::{ValidationError, XenError, XenResult},
        model::{
            api_action::ApiCall, identifier::ObjectIdentifier, invocation::InvocationMode,
            xen_class::XenClass,
        },
        value_object::OpaqueRef,
    },
    infrastructure::session::Session,
};
use serde_json::Value;
use tracing::{debug, warn};

/// Turns any accepted identifier form into one canonical opaque reference.
///
/// Resolution never mutates remote state: at most one lookup call is made.
/// A name label with no match resolves to the null reference, which callers
/// treat as "no object".
#[derive(Debug, Default, Clone, Copy)]
pub struct ResolveService;

impl ResolveService {
    pub fn new() -> Self {
        Self
    }

    /// # Errors
    ///
    /// * `ValidationError::MissingIdentifier` for a nil UUID
    /// * `ValidationError::AmbiguousIdentifier` when a name label matches
    ///   more than one object
    /// * `ValidationError::ConstraintViolation` for a name label on a class
    ///   without name lookup
    /// * any failure of the lookup call, tagged with the call name
    pub async fn execute(
        &self,
        session: &Session,
        class: XenClass,
        identifier: &ObjectIdentifier,
    ) -> XenResult<OpaqueRef> {
        match identifier {
            ObjectIdentifier::Record(record) => Ok(record.reference()),
            ObjectIdentifier::Uuid(uuid) => {
                if uuid.is_nil() {
                    return Err(ValidationError::MissingIdentifier {
                        accepted: class.accepted_parameters(),
                    }
                    .into());
                }
                let call = ApiCall::new(class, "get_by_uuid").arg(uuid.to_string());
                let value = session.call(&call, InvocationMode::Sync).await?;
                let reference = parse_ref(value, &call.name())?;
                debug!(class = %class, uuid = %uuid, reference = %reference, "resolved by uuid");
                Ok(reference)
            }
            ObjectIdentifier::NameLabel(name) => {
                if !class.supports_name_lookup() {
                    return Err(ValidationError::ConstraintViolation(format!(
                        "{} objects cannot be looked up by name label",
                        class
                    ))
                    .into());
                }
                let call = ApiCall::new(class, "get_by_name_label").arg(name.as_str());
                let value = session.call(&call, InvocationMode::Sync).await?;
                let mut matches = parse_ref_list(value, &call.name())?;

                match matches.len() {
                    0 => {
                        warn!(class = %class, name = %name, "no object with this name label");
                        Ok(OpaqueRef::null())
                    }
                    1 => Ok(matches.remove(0)),
                    count => Err(ValidationError::AmbiguousIdentifier {
                        class: class.to_string(),
                        name: name.to_string(),
                        count,
                    }
                    .into()),
                }
            }
            ObjectIdentifier::Reference(reference) => Ok(reference.clone()),
        }
    }
}

/// Reads a single reference out of a call result; `null` maps to the null reference.
pub(crate) fn parse_ref(value: Value, source: &str) -> XenResult<OpaqueRef> {
    match value {
        Value::String(s) if s.is_empty() => Ok(OpaqueRef::null()),
        Value::String(s) => Ok(OpaqueRef::new_unchecked(s)),
        Value::Null => Ok(OpaqueRef::null()),
        other => Err(unexpected(source, "a reference", &other)),
    }
}

pub(crate) fn parse_ref_list(value: Value, source: &str) -> XenResult<Vec<OpaqueRef>> {
    match value {
        Value::Array(items) => items.into_iter().map(|item| parse_ref(item, source)).collect(),
        Value::Null => Ok(Vec::new()),
        other => Err(unexpected(source, "a list of references", &other)),
    }
}

fn unexpected(source: &str, expected: &str, got: &Value) -> XenError {
    XenError::Response(format!("{} returned {} where {} was expected", source, got, expected))
}
