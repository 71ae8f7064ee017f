use super::relay::DownloadRelay;
use super::service::{DownloadService, OutcomeSink, ServiceError, SubmitRequest};
use super::task::{CorrelationEntry, LogicalTask, ServiceId};

/// What happened to a `send_download` request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Dispatch {
    /// Already dispatched in this batch; dropped without any signal
    Duplicate,
    /// Accepted by the service
    Submitted(ServiceId),
    /// The service refused the command; the id may be sent again
    Refused(ServiceError),
}

impl<S, O> DownloadRelay<S, O>
where
    S: DownloadService,
    O: OutcomeSink,
{
    /// Dedup `task` against its tab's batch and hand it to the download service.
    ///
    /// The return value is only an acknowledgement. The task's result reaches
    /// its tab later through [`on_changed`](Self::on_changed).
    pub fn send_download(&mut self, task: LogicalTask) -> Dispatch {
        if !self
            .batches
            .admit(task.tab_id, task.batch_number, &task.id)
        {
            tracing::debug!(
                "Duplicate request {} from {} in batch {}, dropped",
                task.id,
                task.tab_id,
                task.batch_number
            );
            return Dispatch::Duplicate;
        }

        let request = SubmitRequest {
            url: task.file_url.clone(),
            filename: task.file_name.clone(),
            conflict_action: self.options.conflict_action,
            save_as: self.options.save_as,
        };

        match self.service.submit(request) {
            Ok(service_id) => {
                let entry = CorrelationEntry::new(service_id, &task);
                if let Some(stale) = self.correlations.insert(service_id, entry) {
                    tracing::warn!(
                        "{} reassigned while task {} was pending",
                        service_id,
                        stale.logical_id
                    );
                }
                tracing::info!(
                    "Dispatched {} ({}) for {} as {}",
                    task.id,
                    task.file_name,
                    task.tab_id,
                    service_id
                );
                Dispatch::Submitted(service_id)
            }
            Err(err) => {
                tracing::warn!("Dispatch of {} failed: {}", task.id, err);
                self.batches
                    .tombstone(task.tab_id, task.batch_number, &task.id);
                Dispatch::Refused(err)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::download::service::{ConflictAction, TabOutcome};
    use crate::download::task::TabId;

    #[derive(Default)]
    struct FakeService {
        next: u64,
        refuse: bool,
        submitted: Vec<SubmitRequest>,
    }

    impl DownloadService for FakeService {
        fn submit(&mut self, request: SubmitRequest) -> Result<ServiceId, ServiceError> {
            if self.refuse {
                return Err(ServiceError::new(request.url, "invalid url"));
            }
            self.submitted.push(request);
            self.next += 1;
            Ok(ServiceId(self.next))
        }
    }

    fn task(id: &str, batch: i64) -> LogicalTask {
        LogicalTask {
            id: id.to_string(),
            batch_number: batch,
            file_url: format!("https://example.com/{}.png", id),
            file_name: format!("{}.png", id),
            tab_id: TabId(1),
        }
    }

    #[test]
    fn test_submit_uses_overwrite_without_prompt() {
        let mut relay = DownloadRelay::new(FakeService::default(), Vec::<TabOutcome>::new());
        assert_eq!(relay.send_download(task("f1", 1)), Dispatch::Submitted(ServiceId(1)));

        let request = &relay.service().submitted[0];
        assert_eq!(request.conflict_action, ConflictAction::Overwrite);
        assert!(!request.save_as);
        assert_eq!(request.filename, "f1.png");

        let entry = relay.correlation(ServiceId(1)).unwrap();
        assert_eq!(entry.logical_id, "f1");
        assert!(!entry.renamed_to_opaque_id);
    }

    #[test]
    fn test_duplicate_is_not_submitted() {
        let mut relay = DownloadRelay::new(FakeService::default(), Vec::<TabOutcome>::new());
        relay.send_download(task("f1", 1));
        assert_eq!(relay.send_download(task("f1", 1)), Dispatch::Duplicate);
        assert_eq!(relay.service().submitted.len(), 1);
        assert!(relay.sink().is_empty());
    }

    #[test]
    fn test_refused_submit_frees_the_id() {
        let service = FakeService {
            refuse: true,
            ..Default::default()
        };
        let mut relay = DownloadRelay::new(service, Vec::<TabOutcome>::new());
        assert!(matches!(relay.send_download(task("f1", 1)), Dispatch::Refused(_)));
        assert_eq!(relay.pending_count(), 0);
        assert!(!relay.batches().state(TabId(1)).unwrap().contains("f1"));
        assert!(relay.sink().is_empty());
    }
}
