use crate::core::domain::error::{ValidationError, XenResult};
use std::time::{Duration, SystemTime};

/// A XenAPI session reference, as returned by `session.login_with_password`.
#[derive(Debug, Clone)]
pub struct SessionRef {
    value: String,
    created_at: SystemTime,
}

impl SessionRef {
    /// Creates a new session reference without validation.
    pub(crate) fn new_unchecked(value: String) -> Self {
        Self {
            value,
            created_at: SystemTime::now(),
        }
    }

    /// Wraps a session reference obtained elsewhere, e.g. a shared session.
    pub fn new(value: String) -> XenResult<Self> {
        validate_session_ref(&value)?;
        Ok(Self::new_unchecked(value))
    }

    /// Returns the reference as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.value
    }

    /// Returns the creation time.
    #[must_use]
    pub fn created_at(&self) -> SystemTime {
        self.created_at
    }

    /// Checks if the session is older than the given lifetime.
    #[must_use]
    pub fn is_expired(&self, lifetime: Duration) -> bool {
        self.created_at
            .elapsed()
            .map(|age| age > lifetime)
            .unwrap_or(true)
    }
}

/// Validates the format of a session reference string.
pub(crate) fn validate_session_ref(value: &str) -> Result<(), ValidationError> {
    if value.is_empty() {
        return Err(ValidationError::Field {
            field: "session".to_string(),
            message: "Session reference cannot be empty".to_string(),
        });
    }
    if !value.starts_with("OpaqueRef:") || value == super::opaque_ref::NULL_REF {
        return Err(ValidationError::Format(
            "Invalid session reference: must be a non-null 'OpaqueRef:'".to_string(),
        ));
    }
    Ok(())
}
