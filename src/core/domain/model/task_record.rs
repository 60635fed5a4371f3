//! Domain model for asynchronous server tasks.

use crate::core::domain::{
    error::{XenError, XenResult},
    value_object::OpaqueRef,
};
use serde::{Deserialize, Serialize};

/// Status of a server task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskStatus {
    Pending,
    Success,
    Failure,
    Cancelling,
    Cancelled,
}

/// A task record as returned by `task.get_record`.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct TaskRecord {
    /// The task's own reference (not part of the server record).
    #[serde(skip)]
    pub opaque_ref: Option<OpaqueRef>,
    pub uuid: String,
    #[serde(default)]
    pub name_label: String,
    #[serde(default)]
    pub name_description: String,
    pub status: TaskStatus,
    /// Completion between 0.0 and 1.0.
    #[serde(default)]
    pub progress: f64,
    /// Result payload once the task succeeded (often an opaque reference).
    #[serde(default)]
    pub result: String,
    /// Failure code followed by its parameters.
    #[serde(default)]
    pub error_info: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub finished: Option<String>,
}

impl TaskRecord {
    pub(crate) fn from_value(value: serde_json::Value) -> XenResult<Self> {
        serde_json::from_value(value)
            .map_err(|e| XenError::Response(format!("Failed to parse task record: {}", e)))
    }

    #[must_use]
    pub fn is_finished(&self) -> bool {
        !matches!(self.status, TaskStatus::Pending | TaskStatus::Cancelling)
    }
}
