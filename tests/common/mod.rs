use fanrelay::download::messages::InboundMessage;
use fanrelay::download::service::{
    DownloadService, OutcomeSink, ServiceError, SubmitRequest, TabOutcome,
};
use fanrelay::download::task::{LogicalTask, ServiceId, TabId};
use fanrelay::download::{DownloadRelay, RelayEvent};
use fanrelay::filter::{Filter, FilterConfig, LogSignal};
use std::sync::{Arc, Mutex};

/// Download service that records every submit and hands out sequential ids.
///
/// Clones share the same record, so a test can keep a handle while the relay
/// owns the service.
#[derive(Clone, Default)]
pub struct RecordingService {
    submits: Arc<Mutex<Vec<(ServiceId, SubmitRequest)>>>,
    refuse_urls: Arc<Mutex<Vec<String>>>,
}

#[allow(dead_code)]
impl RecordingService {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn submits(&self) -> Vec<(ServiceId, SubmitRequest)> {
        self.submits.lock().unwrap().clone()
    }

    pub fn submit_count(&self) -> usize {
        self.submits.lock().unwrap().len()
    }

    /// Make the service refuse submits for `url`
    pub fn refuse(&self, url: &str) {
        self.refuse_urls.lock().unwrap().push(url.to_string());
    }
}

impl DownloadService for RecordingService {
    fn submit(&mut self, request: SubmitRequest) -> Result<ServiceId, ServiceError> {
        if self.refuse_urls.lock().unwrap().contains(&request.url) {
            return Err(ServiceError::new(request.url, "refused by test"));
        }
        let mut submits = self.submits.lock().unwrap();
        let service_id = ServiceId(submits.len() as u64 + 1);
        submits.push((service_id, request));
        Ok(service_id)
    }
}

/// Outcome sink that collects deliveries into a shared list
#[derive(Clone, Default)]
pub struct CollectingSink {
    outcomes: Arc<Mutex<Vec<TabOutcome>>>,
}

#[allow(dead_code)]
impl CollectingSink {
    pub fn outcomes(&self) -> Vec<TabOutcome> {
        self.outcomes.lock().unwrap().clone()
    }

    pub fn len(&self) -> usize {
        self.outcomes.lock().unwrap().len()
    }
}

impl OutcomeSink for CollectingSink {
    fn deliver(&mut self, tab_id: TabId, message: fanrelay::download::messages::OutcomeMessage) {
        self.outcomes
            .lock()
            .unwrap()
            .push(TabOutcome { tab_id, message });
    }
}

/// Relay wired to a recording service and a collecting sink
#[allow(dead_code)]
pub fn create_test_relay() -> (
    DownloadRelay<RecordingService, CollectingSink>,
    RecordingService,
    CollectingSink,
) {
    let service = RecordingService::new();
    let sink = CollectingSink::default();
    let relay = DownloadRelay::new(service.clone(), sink.clone());
    (relay, service, sink)
}

#[allow(dead_code)]
pub fn create_test_task(id: &str, batch: i64, tab: i64) -> LogicalTask {
    LogicalTask {
        id: id.to_string(),
        batch_number: batch,
        file_url: format!("https://downloads.example.com/files/{}.png", id),
        file_name: format!("fanbox/{}.png", id),
        tab_id: TabId(tab),
    }
}

#[allow(dead_code)]
pub fn send_download_event(id: &str, batch: i64, tab: i64) -> RelayEvent {
    let task = create_test_task(id, batch, tab);
    RelayEvent::Request {
        tab_id: task.tab_id,
        message: InboundMessage::SendDownload {
            id: task.id,
            batch_number: task.batch_number,
            file_url: task.file_url,
            file_name: task.file_name,
        },
    }
}

#[allow(dead_code)]
pub fn create_test_filter(edit: impl FnOnce(&mut FilterConfig)) -> Filter {
    let mut config = FilterConfig::default();
    edit(&mut config);
    Filter::init(config.into(), LogSignal).unwrap()
}

// Initialize logging once for all tests
#[allow(dead_code)]
pub fn init_logging() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::DEBUG)
        .try_init();
}
