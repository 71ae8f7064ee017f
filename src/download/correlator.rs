use super::errors::DownloadErrorInfo;
use super::messages::{DownloadDelta, DownloadState, OutcomeKind, OutcomeMessage};
use super::naming::is_opaque_renamed;
use super::relay::DownloadRelay;
use super::service::{DownloadService, OutcomeSink};

/// How a notification was handled
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Correlation {
    /// Not a transfer this relay is tracking
    Ignored,
    /// Non-terminal update applied
    Updated,
    /// Terminal update; the outcome was sent and the entry removed
    Finished(OutcomeKind),
}

impl<S, O> DownloadRelay<S, O>
where
    S: DownloadService,
    O: OutcomeSink,
{
    /// Apply a service notification to the transfer it belongs to.
    ///
    /// An error code takes precedence over a completed state in the same
    /// notification. Each tracked transfer produces exactly one outcome.
    pub fn on_changed(&mut self, delta: DownloadDelta) -> Correlation {
        let Some(entry) = self.correlations.get_mut(&delta.service_id) else {
            tracing::trace!("Ignoring notification for untracked {}", delta.service_id);
            return Correlation::Ignored;
        };

        if let Some(name) = delta.filename.as_deref() {
            if is_opaque_renamed(name) {
                if !entry.renamed_to_opaque_id {
                    tracing::debug!(
                        "{} of task {} renamed to opaque name {}",
                        delta.service_id,
                        entry.logical_id,
                        name
                    );
                }
                entry.renamed_to_opaque_id = true;
            }
        }

        if let Some(code) = delta.error_code() {
            let Some(entry) = self.correlations.remove(&delta.service_id) else {
                return Correlation::Ignored;
            };

            let info = DownloadErrorInfo::from_code(code);
            tracing::warn!(
                "Task {} for {} failed: {} (retryable: {})",
                entry.logical_id,
                entry.tab_id,
                info.format(),
                info.is_retryable
            );

            if !self
                .batches
                .tombstone(entry.tab_id, entry.batch_number, &entry.logical_id)
            {
                tracing::debug!(
                    "Task {} no longer in the current batch of {}",
                    entry.logical_id,
                    entry.tab_id
                );
            }

            let tab_id = entry.tab_id;
            self.sink
                .deliver(tab_id, OutcomeMessage::download_err(entry, code));
            return Correlation::Finished(OutcomeKind::DownloadErr);
        }

        match delta.state {
            Some(DownloadState::Complete) => {
                let Some(entry) = self.correlations.remove(&delta.service_id) else {
                    return Correlation::Ignored;
                };
                tracing::info!(
                    "Task {} for {} downloaded{}",
                    entry.logical_id,
                    entry.tab_id,
                    if entry.renamed_to_opaque_id {
                        " (opaque filename)"
                    } else {
                        ""
                    }
                );

                let tab_id = entry.tab_id;
                self.sink.deliver(tab_id, OutcomeMessage::downloaded(entry));
                Correlation::Finished(OutcomeKind::Downloaded)
            }
            Some(DownloadState::Interrupted) => {
                tracing::debug!(
                    "{} interrupted without an error code, waiting for more",
                    delta.service_id
                );
                Correlation::Updated
            }
            Some(DownloadState::InProgress) | None => Correlation::Updated,
        }
    }
}
