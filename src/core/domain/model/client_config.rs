//! Client-side configuration.

use std::time::Duration;

/// Client-side rate limit applied to every remote call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitConfig {
    pub requests_per_second: u32,
    pub burst_size: u32,
}

/// What to do with the remaining field mutations after one fails.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MutationPolicy {
    /// Attempt every mutation and report all failures.
    #[default]
    ContinueOnError,
    /// Stop at the first failure and return it.
    StopOnError,
}

/// Tunables shared by the transport and the command service.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Disabled when `None`.
    pub rate_limit: Option<RateLimitConfig>,
    pub request_timeout: Option<Duration>,
    pub mutation_policy: MutationPolicy,
    /// Sent as the `originator` of `session.login_with_password`.
    pub originator: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            rate_limit: None,
            request_timeout: Some(Duration::from_secs(60)),
            mutation_policy: MutationPolicy::default(),
            originator: concat!("xencmd/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}
