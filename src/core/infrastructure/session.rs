//! The explicit session handle passed to every core operation.

use crate::core::domain::{
    error::XenResult,
    model::{api_action::ApiCall, invocation::InvocationMode},
    value_object::{OpaqueRef, SessionRef},
};
use crate::core::infrastructure::transport::XenTransport;
use serde_json::Value;
use std::sync::Arc;
use tracing::debug;

/// A live session: the transport plus the session reference every call
/// carries as its first parameter.
#[derive(Clone)]
pub struct Session {
    transport: Arc<dyn XenTransport>,
    session_ref: SessionRef,
}

impl Session {
    pub fn new(transport: Arc<dyn XenTransport>, session_ref: SessionRef) -> Self {
        Self {
            transport,
            session_ref,
        }
    }

    pub fn session_ref(&self) -> &SessionRef {
        &self.session_ref
    }

    pub fn transport(&self) -> &Arc<dyn XenTransport> {
        &self.transport
    }

    /// Issues `call` once in the given mode.
    ///
    /// # Errors
    ///
    /// Any failure comes back as `XenError::Call` naming the wire method and
    /// the target reference.
    pub async fn call(&self, call: &ApiCall, mode: InvocationMode) -> XenResult<Value> {
        let method = call.wire_method(mode);
        let params: Vec<Value> = std::iter::once(Value::from(self.session_ref.as_str()))
            .chain(call.params())
            .collect();

        debug!(method = %method, target = ?call.target().map(OpaqueRef::as_str), "remote call");

        self.transport
            .call(&method, params)
            .await
            .map_err(|e| e.in_call(method, call.target().map(OpaqueRef::as_str)))
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("session_ref", &self.session_ref)
            .finish_non_exhaustive()
    }
}
