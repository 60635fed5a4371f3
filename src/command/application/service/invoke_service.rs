use crate::command::application::service::resolve_service::parse_ref;
use crate::core::{
    domain::{
        error::XenResult,
        model::{
            api_action::ApiCall,
            invocation::{InvocationMode, OperationHandle},
        },
    },
    infrastructure::session::Session,
};
use serde_json::Value;
use tracing::debug;

/// The unprojected outcome of one call.
#[derive(Debug, Clone, PartialEq)]
pub enum Execution {
    Finished(Value),
    Pending(OperationHandle),
}

/// Issues a single call, either blocking (`Class.method`) or as its
/// `Async.` twin, which hands back a task reference straight away.
#[derive(Debug, Default, Clone, Copy)]
pub struct InvokeService;

impl InvokeService {
    pub fn new() -> Self {
        Self
    }

    pub async fn execute(
        &self,
        session: &Session,
        call: &ApiCall,
        mode: InvocationMode,
    ) -> XenResult<Execution> {
        let value = session.call(call, mode).await?;

        match mode {
            InvocationMode::Sync => Ok(Execution::Finished(value)),
            InvocationMode::Async => {
                let wire_method = call.wire_method(mode);
                let task = parse_ref(value, &wire_method)?;
                debug!(call = %wire_method, task = %task, "task started");
                Ok(Execution::Pending(OperationHandle::new(task, wire_method)))
            }
        }
    }
}
