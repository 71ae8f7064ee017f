//! Download relay: owns the batch tracker and the correlation table, and
//! processes inbound requests and service notifications one at a time.

use super::batch::BatchTracker;
use super::messages::{DownloadDelta, InboundMessage};
use super::service::{ConflictAction, DownloadService, OutcomeSink};
use super::task::{CorrelationEntry, ServiceId, TabId};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tokio::sync::mpsc;

/// Options applied to every submit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmitOptions {
    pub conflict_action: ConflictAction,
    pub save_as: bool,
}

impl Default for SubmitOptions {
    fn default() -> Self {
        Self {
            conflict_action: ConflictAction::Overwrite,
            save_as: false,
        }
    }
}

/// Event consumed by [`DownloadRelay::run`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RelayEvent {
    /// Message from a foreground agent, with the sender's tab
    Request {
        tab_id: TabId,
        message: InboundMessage,
    },
    /// State change reported by the download service
    Changed(DownloadDelta),
}

pub struct DownloadRelay<S, O> {
    pub(crate) batches: BatchTracker,
    pub(crate) correlations: HashMap<ServiceId, CorrelationEntry>,
    pub(crate) service: S,
    pub(crate) sink: O,
    pub(crate) options: SubmitOptions,
}

impl<S, O> DownloadRelay<S, O>
where
    S: DownloadService,
    O: OutcomeSink,
{
    pub fn new(service: S, sink: O) -> Self {
        Self::with_options(service, sink, SubmitOptions::default())
    }

    pub fn with_options(service: S, sink: O, options: SubmitOptions) -> Self {
        Self {
            batches: BatchTracker::new(),
            correlations: HashMap::new(),
            service,
            sink,
            options,
        }
    }

    /// Handle one event to completion
    pub fn handle_event(&mut self, event: RelayEvent) {
        match event {
            RelayEvent::Request { tab_id, message } => {
                self.send_download(message.into_task(tab_id));
            }
            RelayEvent::Changed(delta) => {
                self.on_changed(delta);
            }
        }
    }

    /// Consume events until every sender is dropped, then hand the relay back.
    ///
    /// Events are handled strictly one after another, so no locking is needed
    /// around relay state.
    pub async fn run(mut self, mut events: mpsc::Receiver<RelayEvent>) -> Self {
        tracing::info!("Download relay started");
        let mut handled: u64 = 0;

        while let Some(event) = events.recv().await {
            tracing::trace!("Relay event: {:?}", event);
            self.handle_event(event);
            handled += 1;
        }

        tracing::info!(
            "Download relay stopped after {} events, {} transfers still pending",
            handled,
            self.correlations.len()
        );
        self
    }

    pub fn batches(&self) -> &BatchTracker {
        &self.batches
    }

    /// Correlation entry of a transfer that has not finished yet
    pub fn correlation(&self, service_id: ServiceId) -> Option<&CorrelationEntry> {
        self.correlations.get(&service_id)
    }

    pub fn pending_count(&self) -> usize {
        self.correlations.len()
    }

    pub fn service(&self) -> &S {
        &self.service
    }

    pub fn sink(&self) -> &O {
        &self.sink
    }

    pub fn into_parts(self) -> (S, O) {
        (self.service, self.sink)
    }
}
