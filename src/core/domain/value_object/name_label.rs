use crate::core::domain::error::{ValidationError, XenResult};
use std::fmt;

/// A human-readable object label used for lookup.
///
/// Labels are not unique on the server, so resolving one may yield any number
/// of objects.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NameLabel(String);

impl NameLabel {
    pub fn new(value: impl Into<String>) -> XenResult<Self> {
        let value = value.into();
        validate_name_label(&value)?;
        Ok(Self(value))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NameLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

pub(crate) fn validate_name_label(value: &str) -> Result<(), ValidationError> {
    if value.is_empty() {
        return Err(ValidationError::Field {
            field: "Name".to_string(),
            message: "Name label cannot be empty".to_string(),
        });
    }
    Ok(())
}
