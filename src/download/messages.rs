//! Messages exchanged with the foreground agent and the download service.
//!
//! Wire format: JSON objects with camelCase fields.

use super::errors::DownloadErrorInfo;
use super::task::{CorrelationEntry, LogicalTask, ServiceId, TabId};
use serde::{Deserialize, Serialize};

/// Request sent from the foreground agent. The tab identity travels with the
/// sender, not in the message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum InboundMessage {
    #[serde(rename = "send_download", rename_all = "camelCase")]
    SendDownload {
        id: String,
        batch_number: i64,
        file_url: String,
        file_name: String,
    },
}

impl InboundMessage {
    /// Attach the sender's tab to get the logical task
    pub fn into_task(self, tab_id: TabId) -> LogicalTask {
        match self {
            InboundMessage::SendDownload {
                id,
                batch_number,
                file_url,
                file_name,
            } => LogicalTask {
                id,
                batch_number,
                file_url,
                file_name,
                tab_id,
            },
        }
    }
}

/// Lifecycle state reported by the download service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DownloadState {
    InProgress,
    Interrupted,
    Complete,
}

/// Asynchronous state change for one transfer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DownloadDelta {
    pub service_id: ServiceId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<DownloadState>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl DownloadDelta {
    pub fn new(service_id: ServiceId) -> Self {
        Self {
            service_id,
            filename: None,
            state: None,
            error: None,
        }
    }

    pub fn filename(mut self, name: impl Into<String>) -> Self {
        self.filename = Some(name.into());
        self
    }

    pub fn state(mut self, state: DownloadState) -> Self {
        self.state = Some(state);
        self
    }

    pub fn error(mut self, code: impl Into<String>) -> Self {
        self.error = Some(code.into());
        self
    }

    pub fn completed(service_id: ServiceId) -> Self {
        Self::new(service_id).state(DownloadState::Complete)
    }

    pub fn errored(service_id: ServiceId, code: impl Into<String>) -> Self {
        Self::new(service_id)
            .state(DownloadState::Interrupted)
            .error(code)
    }

    /// Error code, ignoring empty strings
    pub fn error_code(&self) -> Option<&str> {
        self.error.as_deref().filter(|code| !code.is_empty())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OutcomeKind {
    #[serde(rename = "downloaded")]
    Downloaded,
    #[serde(rename = "download_err")]
    DownloadErr,
}

/// Final result of a task, sent back to the tab that requested it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OutcomeMessage {
    pub kind: OutcomeKind,
    pub task: CorrelationEntry,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_code: Option<String>,
}

impl OutcomeMessage {
    pub fn downloaded(task: CorrelationEntry) -> Self {
        Self {
            kind: OutcomeKind::Downloaded,
            task,
            error_code: None,
        }
    }

    pub fn download_err(task: CorrelationEntry, code: impl Into<String>) -> Self {
        Self {
            kind: OutcomeKind::DownloadErr,
            task,
            error_code: Some(code.into()),
        }
    }

    pub fn error_info(&self) -> Option<DownloadErrorInfo> {
        self.error_code.as_deref().map(DownloadErrorInfo::from_code)
    }
}
