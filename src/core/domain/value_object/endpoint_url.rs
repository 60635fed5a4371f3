use crate::core::domain::{
    error::ValidationError,
    value_object::{xen_host::XenHost, xen_port::XenPort},
};
use url::Url;

const MAX_URL_LENGTH: usize = 2083;

/// The base URL of a pool master, e.g. `https://xen.example.com:443/`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EndpointUrl(Url);

impl EndpointUrl {
    /// Builds the base URL from its validated parts.
    pub(crate) fn from_parts(
        host: &XenHost,
        port: &XenPort,
        secure: bool,
    ) -> Result<Self, ValidationError> {
        let scheme = if secure { "https" } else { "http" };
        let raw = format!("{}://{}:{}/", scheme, host.as_authority(), port.get());
        Ok(Self(validate_url(&raw)?))
    }

    /// Creates a URL without validation.
    pub(crate) fn new_unchecked(url: Url) -> Self {
        Self(url)
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    /// The JSON-RPC endpoint on this host.
    #[must_use]
    pub fn jsonrpc(&self) -> String {
        format!("{}/jsonrpc", self.0.as_str().trim_end_matches('/'))
    }
}

/// Validates an endpoint URL and returns it parsed.
pub(crate) fn validate_url(raw: &str) -> Result<Url, ValidationError> {
    if raw.is_empty() {
        return Err(ValidationError::Field {
            field: "url".to_string(),
            message: "URL cannot be empty".to_string(),
        });
    }

    if raw.len() > MAX_URL_LENGTH {
        return Err(ValidationError::Format(format!(
            "URL exceeds maximum length of {} characters",
            MAX_URL_LENGTH
        )));
    }

    let url =
        Url::parse(raw).map_err(|e| ValidationError::Format(format!("Invalid URL format: {}", e)))?;

    if url.scheme() != "https" && url.scheme() != "http" {
        return Err(ValidationError::ConstraintViolation(
            "Invalid scheme. Must be one of: https, http".to_string(),
        ));
    }

    Ok(url)
}
