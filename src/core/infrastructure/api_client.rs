//! Internal HTTP client that frames XenAPI calls as JSON-RPC.

use crate::core::domain::{
    error::{ApiFailure, ValidationError, XenError, XenResult},
    model::{client_config::ClientConfig, xen_connection::XenConnection},
};
use crate::core::infrastructure::transport::XenTransport;
use async_trait::async_trait;
use governor::{DefaultDirectRateLimiter, Quota};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::num::NonZeroU32;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::trace;

/// Failure codes that mean the credentials or the session were rejected.
const AUTH_FAILURES: [&str; 3] = [
    "SESSION_AUTHENTICATION_FAILED",
    "SESSION_INVALID",
    "HOST_IS_SLAVE",
];

#[derive(Debug, Serialize)]
struct JsonRpcRequest<'a> {
    jsonrpc: &'static str,
    method: &'a str,
    params: &'a [Value],
    id: u64,
}

#[derive(Debug, Deserialize)]
struct JsonRpcResponse {
    #[serde(default)]
    result: Option<Value>,
    #[serde(default)]
    error: Option<JsonRpcError>,
}

#[derive(Debug, Deserialize)]
struct JsonRpcError {
    #[serde(default)]
    message: String,
    #[serde(default)]
    data: Option<Value>,
}

impl JsonRpcError {
    fn into_failure(self) -> ApiFailure {
        let params = match self.data {
            Some(Value::Array(items)) => items
                .into_iter()
                .map(|v| match v {
                    Value::String(s) => s,
                    other => other.to_string(),
                })
                .collect(),
            Some(Value::Null) | None => Vec::new(),
            Some(other) => vec![other.to_string()],
        };
        ApiFailure::new(self.message, params)
    }
}

/// HTTP transport speaking XenAPI JSON-RPC to one pool master.
///
/// Every call is a single POST to `<endpoint>/jsonrpc`. There is no retry
/// and no session refresh: a rejected session surfaces as
/// `XenError::Authentication`.
#[derive(Debug)]
pub struct ApiClient {
    http_client: Client,
    connection: Arc<XenConnection>,
    rate_limiter: Option<Arc<DefaultDirectRateLimiter>>,
    next_id: AtomicU64,
}

impl ApiClient {
    /// Creates a new `ApiClient`.
    ///
    /// # Errors
    /// Returns `XenError::Validation` for a zero rate limit and
    /// `XenError::Connection` if the HTTP client cannot be built.
    pub fn new(connection: XenConnection, config: &ClientConfig) -> XenResult<Self> {
        let mut builder =
            Client::builder().danger_accept_invalid_certs(connection.accept_invalid_certs());
        if let Some(timeout) = config.request_timeout {
            builder = builder.timeout(timeout);
        }
        let http_client = builder
            .build()
            .map_err(|e| XenError::Connection(e.to_string()))?;

        let rate_limiter = match config.rate_limit {
            Some(rl) => {
                let per_second = non_zero(rl.requests_per_second, "requests_per_second")?;
                let burst = non_zero(rl.burst_size, "burst_size")?;
                let quota = Quota::per_second(per_second).allow_burst(burst);
                Some(Arc::new(DefaultDirectRateLimiter::direct(quota)))
            }
            None => None,
        };

        Ok(Self {
            http_client,
            connection: Arc::new(connection),
            rate_limiter,
            next_id: AtomicU64::new(1),
        })
    }

    /// Returns a reference to the underlying connection details.
    pub fn connection(&self) -> &XenConnection {
        &self.connection
    }

    async fn execute_request(&self, method: &str, params: &[Value]) -> XenResult<Value> {
        if let Some(limiter) = &self.rate_limiter {
            limiter.until_ready().await;
        }

        let request = JsonRpcRequest {
            jsonrpc: "2.0",
            method,
            params,
            id: self.next_id.fetch_add(1, Ordering::Relaxed),
        };
        trace!(method, id = request.id, "sending JSON-RPC request");

        let response = self
            .http_client
            .post(self.connection.url().jsonrpc())
            .json(&request)
            .send()
            .await
            .map_err(|e| XenError::Connection(format!("HTTP request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "unknown".to_string());
            return Err(XenError::Connection(format!(
                "API error ({}): {}",
                status, error_text
            )));
        }

        let reply = response
            .json::<JsonRpcResponse>()
            .await
            .map_err(|e| XenError::Response(format!("Failed to parse response: {}", e)))?;

        match reply.error {
            Some(error) => {
                let failure = error.into_failure();
                if AUTH_FAILURES.contains(&failure.code.as_str()) {
                    Err(XenError::Authentication(failure.to_string()))
                } else {
                    Err(XenError::Api(failure))
                }
            }
            None => Ok(reply.result.unwrap_or(Value::Null)),
        }
    }
}

#[async_trait]
impl XenTransport for ApiClient {
    async fn call(&self, method: &str, params: Vec<Value>) -> XenResult<Value> {
        self.execute_request(method, &params).await
    }
}

fn non_zero(value: u32, field: &str) -> XenResult<NonZeroU32> {
    NonZeroU32::new(value).ok_or_else(|| {
        ValidationError::Field {
            field: format!("rate_limit.{}", field),
            message: "must be greater than 0".to_string(),
        }
        .into()
    })
}
