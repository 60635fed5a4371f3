use crate::core::domain::error::{ValidationError, XenResult};
use serde::{Deserialize, Serialize};
use std::fmt;

/// The literal the server uses for "no object".
pub const NULL_REF: &str = "OpaqueRef:NULL";

/// An opaque reference to a remote object instance.
///
/// The string is meaningful only to the server; equality is by value. The
/// distinguished [`OpaqueRef::null`] reference stands for "no object" and must
/// be checked with [`OpaqueRef::is_null`] before being dereferenced.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OpaqueRef(String);

impl OpaqueRef {
    /// Creates a validated reference.
    pub fn new(value: impl Into<String>) -> XenResult<Self> {
        let value = value.into();
        validate_opaque_ref(&value)?;
        Ok(Self(value))
    }

    /// Creates a reference without validation.
    pub(crate) fn new_unchecked(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// The null reference.
    #[must_use]
    pub fn null() -> Self {
        Self(NULL_REF.to_string())
    }

    #[must_use]
    pub fn is_null(&self) -> bool {
        self.0 == NULL_REF
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for OpaqueRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<OpaqueRef> for serde_json::Value {
    fn from(r: OpaqueRef) -> Self {
        serde_json::Value::String(r.0)
    }
}

impl From<&OpaqueRef> for serde_json::Value {
    fn from(r: &OpaqueRef) -> Self {
        serde_json::Value::String(r.0.clone())
    }
}

/// Validates an opaque reference string.
///
/// Only emptiness and whitespace are rejected; the server decides everything
/// else about the format.
pub(crate) fn validate_opaque_ref(value: &str) -> Result<(), ValidationError> {
    if value.is_empty() {
        return Err(ValidationError::Field {
            field: "Ref".to_string(),
            message: "Opaque reference cannot be empty".to_string(),
        });
    }
    if value.chars().any(char::is_whitespace) {
        return Err(ValidationError::Format(
            "Opaque reference cannot contain whitespace".to_string(),
        ));
    }
    Ok(())
}
