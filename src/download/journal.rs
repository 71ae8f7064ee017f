//! In-process download service that accepts every well-formed submit, assigns
//! sequential ids and keeps a journal of what was submitted.
//!
//! Transfers are not performed; their notifications are supplied by whoever
//! drives the relay (replay files, tests).

use super::service::{DownloadService, ServiceError, SubmitRequest};
use super::task::ServiceId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One accepted submit
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JournalEntry {
    pub service_id: ServiceId,
    pub submitted_at: DateTime<Utc>,
    #[serde(flatten)]
    pub request: SubmitRequest,
}

#[derive(Debug, Clone)]
pub struct JournalService {
    next_id: u64,
    entries: Vec<JournalEntry>,
}

impl JournalService {
    pub fn new() -> Self {
        Self::starting_at(1)
    }

    pub fn starting_at(first_id: u64) -> Self {
        Self {
            next_id: first_id,
            entries: Vec::new(),
        }
    }

    pub fn entries(&self) -> &[JournalEntry] {
        &self.entries
    }

    pub fn last(&self) -> Option<&JournalEntry> {
        self.entries.last()
    }
}

impl Default for JournalService {
    fn default() -> Self {
        Self::new()
    }
}

impl DownloadService for JournalService {
    fn submit(&mut self, request: SubmitRequest) -> Result<ServiceId, ServiceError> {
        if request.url.trim().is_empty() {
            return Err(ServiceError::new(request.url, "empty url"));
        }
        if request.filename.trim().is_empty() {
            return Err(ServiceError::new(request.url, "empty filename"));
        }

        let service_id = ServiceId(self.next_id);
        self.next_id += 1;
        self.entries.push(JournalEntry {
            service_id,
            submitted_at: Utc::now(),
            request,
        });
        Ok(service_id)
    }
}
