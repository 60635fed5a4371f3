use crate::core::domain::error::ValidationError;

/// A validated endpoint port number.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct XenPort(u16);

impl XenPort {
    /// Creates a new port without validation.
    pub(crate) fn new_unchecked(port: u16) -> Self {
        Self(port)
    }

    /// Returns the port number.
    pub fn get(&self) -> u16 {
        self.0
    }

    /// The default port for the given scheme.
    pub(crate) fn default_for(secure: bool) -> Self {
        Self(if secure { 443 } else { 80 })
    }
}

/// Validates a port number.
pub(crate) fn validate_port(port: u16) -> Result<(), ValidationError> {
    if port == 0 {
        return Err(ValidationError::Field {
            field: "port".to_string(),
            message: "Port cannot be 0".to_string(),
        });
    }
    Ok(())
}
