use crate::core::domain::error::{ValidationError, XenResult};
use std::fmt;
use uuid::Uuid;

/// The UUID of a remote object.
///
/// The nil UUID is accepted here but treated as "not given" by
/// [`crate::ObjectSelector`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObjectUuid(Uuid);

impl ObjectUuid {
    /// Parses a UUID in any of the hyphenated, simple or braced forms.
    pub fn parse(value: &str) -> XenResult<Self> {
        Ok(Self(validate_uuid(value)?))
    }

    #[must_use]
    pub fn is_nil(&self) -> bool {
        self.0.is_nil()
    }

    #[must_use]
    pub fn get(&self) -> Uuid {
        self.0
    }
}

impl From<Uuid> for ObjectUuid {
    fn from(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

impl fmt::Display for ObjectUuid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.hyphenated())
    }
}

pub(crate) fn validate_uuid(value: &str) -> Result<Uuid, ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::Field {
            field: "Uuid".to_string(),
            message: "UUID cannot be empty".to_string(),
        });
    }
    Uuid::parse_str(value.trim())
        .map_err(|e| ValidationError::Format(format!("Invalid UUID '{}': {}", value, e)))
}
