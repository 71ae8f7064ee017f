pub mod app;
pub mod cli;
pub mod download;
pub mod filter;
pub mod util;

pub use app::{config::Config, state::AppState};
pub use download::{DownloadRelay, RelayEvent};
pub use filter::{Filter, FilterOption};
