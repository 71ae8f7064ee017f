//! Boundaries to the download service and to the foreground agents

use super::messages::OutcomeMessage;
use super::task::{ServiceId, TabId};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::mpsc;

/// What the service does when the target file already exists
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConflictAction {
    #[default]
    Overwrite,
    Uniquify,
}

/// Download command issued to the service
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitRequest {
    pub url: String,
    pub filename: String,
    pub conflict_action: ConflictAction,
    /// Show a "save as" prompt
    pub save_as: bool,
}

/// The service refused to start a transfer
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Download service refused {url}: {reason}")]
pub struct ServiceError {
    pub url: String,
    pub reason: String,
}

impl ServiceError {
    pub fn new(url: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            reason: reason.into(),
        }
    }
}

/// External download service.
///
/// `submit` only acknowledges acceptance. Progress, renames and the terminal
/// result arrive later as [`DownloadDelta`](super::messages::DownloadDelta)
/// notifications.
pub trait DownloadService {
    fn submit(&mut self, request: SubmitRequest) -> Result<ServiceId, ServiceError>;
}

/// Outcome addressed to a tab
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TabOutcome {
    pub tab_id: TabId,
    pub message: OutcomeMessage,
}

/// Delivers outcome messages to foreground agents. Fire-and-forget.
pub trait OutcomeSink {
    fn deliver(&mut self, tab_id: TabId, message: OutcomeMessage);
}

impl OutcomeSink for mpsc::UnboundedSender<TabOutcome> {
    fn deliver(&mut self, tab_id: TabId, message: OutcomeMessage) {
        if self.send(TabOutcome { tab_id, message }).is_err() {
            tracing::debug!("Outcome receiver dropped, message for {} discarded", tab_id);
        }
    }
}

impl OutcomeSink for Vec<TabOutcome> {
    fn deliver(&mut self, tab_id: TabId, message: OutcomeMessage) {
        self.push(TabOutcome { tab_id, message });
    }
}
