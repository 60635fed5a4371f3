//! Invocation modes and results.

use crate::core::domain::{
    error::XenResult,
    model::{
        api_action::ApiCall, record::XenRecord, task_record::TaskRecord, xen_class::XenClass,
    },
    value_object::OpaqueRef,
};
use crate::core::infrastructure::session::Session;
use serde_json::Value;
use std::collections::BTreeMap;

/// Whether a call blocks for its result or returns a task handle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum InvocationMode {
    #[default]
    Sync,
    Async,
}

impl InvocationMode {
    pub fn from_async_flag(is_async: bool) -> Self {
        if is_async {
            InvocationMode::Async
        } else {
            InvocationMode::Sync
        }
    }
}

/// A handle to a server task started by an `Async.` call.
///
/// The task progresses independently; polling it is up to the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperationHandle {
    task: OpaqueRef,
    call: String,
}

impl OperationHandle {
    pub(crate) fn new(task: OpaqueRef, call: String) -> Self {
        Self { task, call }
    }

    pub fn task_ref(&self) -> &OpaqueRef {
        &self.task
    }

    /// The async method that started the task.
    pub fn call(&self) -> &str {
        &self.call
    }

    /// Fetches the current task record; `None` when the server handed back
    /// the null reference.
    pub async fn record(&self, session: &Session) -> XenResult<Option<TaskRecord>> {
        if self.task.is_null() {
            return Ok(None);
        }
        let call = ApiCall::on(XenClass::Task, "get_record", &self.task);
        let value = session.call(&call, InvocationMode::Sync).await?;
        let mut record = TaskRecord::from_value(value)?;
        record.opaque_ref = Some(self.task.clone());
        Ok(Some(record))
    }

    /// Asks the server to cancel the task.
    pub async fn cancel(&self, session: &Session) -> XenResult<()> {
        let call = ApiCall::on(XenClass::Task, "cancel", &self.task);
        session.call(&call, InvocationMode::Sync).await?;
        Ok(())
    }
}

/// A projected result in the shape the caller expects.
#[derive(Debug, Clone, PartialEq)]
pub enum XenOutput {
    None,
    Record(XenRecord),
    Records(Vec<XenRecord>),
    Map(BTreeMap<String, Value>),
    Value(Value),
}

impl XenOutput {
    pub fn as_record(&self) -> Option<&XenRecord> {
        match self {
            XenOutput::Record(record) => Some(record),
            _ => None,
        }
    }

    pub fn to_json(&self) -> Value {
        match self {
            XenOutput::None => Value::Null,
            XenOutput::Record(record) => record.to_json(),
            XenOutput::Records(records) => {
                Value::Array(records.iter().map(XenRecord::to_json).collect())
            }
            XenOutput::Map(map) => Value::Object(map.clone().into_iter().collect()),
            XenOutput::Value(value) => value.clone(),
        }
    }
}

/// The outcome of one invocation: a finished value or a pending task, never both.
#[derive(Debug, Clone, PartialEq)]
pub enum InvocationResult {
    Completed(XenOutput),
    Pending(OperationHandle),
}

impl InvocationResult {
    pub fn is_pending(&self) -> bool {
        matches!(self, InvocationResult::Pending(_))
    }

    pub fn output(&self) -> Option<&XenOutput> {
        match self {
            InvocationResult::Completed(output) => Some(output),
            InvocationResult::Pending(_) => None,
        }
    }

    pub fn handle(&self) -> Option<&OperationHandle> {
        match self {
            InvocationResult::Completed(_) => None,
            InvocationResult::Pending(handle) => Some(handle),
        }
    }
}
