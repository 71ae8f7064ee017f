//! Error signal boundary used when filter configuration is invalid
//!
//! Initialization failures must be visible: a crawl-error event is fired for
//! whoever drives the crawl, and a user-facing alert carries the message.

use tokio::sync::mpsc;

/// Receiver of fatal configuration signals
pub trait ErrorSignal {
    /// Fire the "crawl error" event so the crawl stops
    fn fire_crawl_error(&self);

    /// Present a message to the user
    fn alert(&self, message: &str);
}

/// Signal that only writes to the log
#[derive(Debug, Clone, Copy, Default)]
pub struct LogSignal;

impl ErrorSignal for LogSignal {
    fn fire_crawl_error(&self) {
        tracing::error!("Crawl error signalled");
    }

    fn alert(&self, message: &str) {
        tracing::error!("Alert: {}", message);
    }
}

/// Signal events emitted by [`ChannelSignal`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SignalEvent {
    CrawlError,
    Alert(String),
}

/// Signal that forwards events to a channel (UI bridge, tests)
#[derive(Debug, Clone)]
pub struct ChannelSignal {
    tx: mpsc::UnboundedSender<SignalEvent>,
}

impl ChannelSignal {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<SignalEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

impl ErrorSignal for ChannelSignal {
    fn fire_crawl_error(&self) {
        if self.tx.send(SignalEvent::CrawlError).is_err() {
            tracing::debug!("Signal receiver dropped, crawl error not delivered");
        }
    }

    fn alert(&self, message: &str) {
        if self.tx.send(SignalEvent::Alert(message.to_string())).is_err() {
            tracing::debug!("Signal receiver dropped, alert not delivered");
        }
    }
}

impl<T: ErrorSignal + ?Sized> ErrorSignal for &T {
    fn fire_crawl_error(&self) {
        (**self).fire_crawl_error()
    }

    fn alert(&self, message: &str) {
        (**self).alert(message)
    }
}
