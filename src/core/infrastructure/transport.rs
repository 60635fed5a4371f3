//! The seam between the command core and whatever carries calls to the server.

use crate::core::domain::error::XenResult;
use async_trait::async_trait;
use serde_json::Value;

/// Sends one remote method call and returns its raw result.
///
/// `params` are positional and already include the session reference where
/// the method takes one. Implementations must not retry: each logical call is
/// attempted exactly once.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait XenTransport: Send + Sync {
    async fn call(&self, method: &str, params: Vec<Value>) -> XenResult<Value>;
}
