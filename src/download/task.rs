use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifies the foreground context (tab) a request came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TabId(pub i64);

impl fmt::Display for TabId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "tab#{}", self.0)
    }
}

/// Transfer id assigned by the download service once it accepts a submit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ServiceId(pub u64);

impl fmt::Display for ServiceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "dl#{}", self.0)
    }
}

/// A download request as the foreground agent sees it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogicalTask {
    /// Caller-assigned id, unique among unfinished tasks of one batch
    pub id: String,
    pub batch_number: i64,
    pub file_url: String,
    pub file_name: String,
    pub tab_id: TabId,
}

/// Links a service transfer back to the logical task that produced it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CorrelationEntry {
    pub service_id: ServiceId,
    pub file_url: String,
    pub logical_id: String,
    /// Batch the task was dispatched in
    pub batch_number: i64,
    pub tab_id: TabId,
    /// Set when the service replaced the requested filename with a generated one
    #[serde(default)]
    pub renamed_to_opaque_id: bool,
}

impl CorrelationEntry {
    pub fn new(service_id: ServiceId, task: &LogicalTask) -> Self {
        Self {
            service_id,
            file_url: task.file_url.clone(),
            logical_id: task.id.clone(),
            batch_number: task.batch_number,
            tab_id: task.tab_id,
            renamed_to_opaque_id: false,
        }
    }
}
