pub mod batch;
pub mod correlator;
pub mod dispatcher;
pub mod errors;
pub mod journal;
pub mod messages;
pub mod naming;
pub mod relay;
pub mod service;
pub mod task;

pub use correlator::Correlation;
pub use dispatcher::Dispatch;
pub use relay::{DownloadRelay, RelayEvent, SubmitOptions};
