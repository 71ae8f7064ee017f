//! Replay a recorded stream of tab requests and service notifications
//! through the relay.
//!
//! Input is JSON lines, one event per line:
//!
//! ```text
//! {"type":"request","tabId":1,"message":{"kind":"send_download","id":"f1","batchNumber":1,"fileUrl":"https://...","fileName":"a.png"},"criteria":{"ext":"png"}}
//! {"type":"changed","serviceId":1,"state":"complete"}
//! ```

use crate::app::config::RelayConfig;
use crate::download::journal::{JournalEntry, JournalService};
use crate::download::messages::{DownloadDelta, InboundMessage, OutcomeMessage};
use crate::download::service::{DownloadService, OutcomeSink, ServiceError, SubmitRequest};
use crate::download::task::{ServiceId, TabId};
use crate::download::{DownloadRelay, RelayEvent};
use crate::filter::{Filter, FilterOption};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio::sync::mpsc;

/// One line of replay input
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ReplayLine {
    #[serde(rename_all = "camelCase")]
    Request {
        tab_id: TabId,
        message: InboundMessage,
        /// Scraped metadata, checked by the filter when filtering is on
        #[serde(default, skip_serializing_if = "Option::is_none")]
        criteria: Option<FilterOption>,
    },
    Changed(DownloadDelta),
}

/// One line of replay output
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ReplayOutput {
    Submit(JournalEntry),
    #[serde(rename_all = "camelCase")]
    Outcome {
        tab_id: TabId,
        message: OutcomeMessage,
    },
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReplaySummary {
    /// Events handed to the relay
    pub events: usize,
    /// Requests dropped by the filter before reaching the relay
    pub filtered: usize,
    /// Lines that could not be parsed
    pub skipped: usize,
    pub submitted: usize,
    pub outcomes: usize,
    /// Transfers with no terminal notification in the input
    pub pending: usize,
}

/// Journal service that also reports each accepted submit
struct ReportingService {
    journal: JournalService,
    out: mpsc::UnboundedSender<ReplayOutput>,
}

impl DownloadService for ReportingService {
    fn submit(&mut self, request: SubmitRequest) -> Result<ServiceId, ServiceError> {
        let service_id = self.journal.submit(request)?;
        if let Some(entry) = self.journal.last() {
            if self.out.send(ReplayOutput::Submit(entry.clone())).is_err() {
                tracing::debug!("Replay output closed, submit of {} not recorded", service_id);
            }
        }
        Ok(service_id)
    }
}

struct ReportingSink {
    out: mpsc::UnboundedSender<ReplayOutput>,
}

impl OutcomeSink for ReportingSink {
    fn deliver(&mut self, tab_id: TabId, message: OutcomeMessage) {
        if self
            .out
            .send(ReplayOutput::Outcome { tab_id, message })
            .is_err()
        {
            tracing::debug!("Replay output closed, outcome for {} not recorded", tab_id);
        }
    }
}

/// Replay `reader` through a fresh relay and collect what it emitted, in order.
pub async fn replay<R>(
    reader: R,
    config: &RelayConfig,
    filter: Option<&Filter>,
) -> Result<(Vec<ReplayOutput>, ReplaySummary)>
where
    R: AsyncBufRead + Unpin,
{
    let (out_tx, mut out_rx) = mpsc::unbounded_channel();
    let relay = DownloadRelay::with_options(
        ReportingService {
            journal: JournalService::new(),
            out: out_tx.clone(),
        },
        ReportingSink { out: out_tx },
        config.submit_options(),
    );

    let (event_tx, event_rx) = mpsc::channel(config.channel_capacity.max(1));
    let mut summary = ReplaySummary::default();

    let feed = async {
        let mut lines = reader.lines();
        let mut line_no = 0usize;
        while let Some(line) = lines.next_line().await.context("Failed to read replay input")? {
            line_no += 1;
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let event = match serde_json::from_str::<ReplayLine>(line) {
                Ok(ReplayLine::Request {
                    tab_id,
                    message,
                    criteria,
                }) => {
                    if let (Some(filter), Some(criteria)) = (filter, criteria.as_ref()) {
                        if !filter.check(criteria) {
                            tracing::debug!("Line {}: request rejected by filter", line_no);
                            summary.filtered += 1;
                            continue;
                        }
                    }
                    RelayEvent::Request { tab_id, message }
                }
                Ok(ReplayLine::Changed(delta)) => RelayEvent::Changed(delta),
                Err(e) => {
                    tracing::warn!("Line {}: skipped: {}", line_no, e);
                    summary.skipped += 1;
                    continue;
                }
            };

            summary.events += 1;
            if event_tx.send(event).await.is_err() {
                anyhow::bail!("Relay stopped before input was exhausted");
            }
        }
        drop(event_tx);
        Ok::<(), anyhow::Error>(())
    };

    let (fed, relay) = tokio::join!(feed, relay.run(event_rx));
    fed?;

    summary.pending = relay.pending_count();
    drop(relay);

    let mut outputs = Vec::new();
    while let Ok(output) = out_rx.try_recv() {
        match &output {
            ReplayOutput::Submit(_) => summary.submitted += 1,
            ReplayOutput::Outcome { .. } => summary.outcomes += 1,
        }
        outputs.push(output);
    }

    Ok((outputs, summary))
}
