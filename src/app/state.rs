use super::config::Config;
use crate::filter::{ErrorSignal, Filter, FilterResult, SharedFilterConfig};
use std::sync::Arc;
use tokio::sync::RwLock;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<RwLock<Config>>,
    /// Live filter settings. Every filter built from this state reads through it.
    pub filter_config: SharedFilterConfig,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        let filter_config = SharedFilterConfig::new(config.filter.clone());
        Self {
            config: Arc::new(RwLock::new(config)),
            filter_config,
        }
    }

    /// Build a filter over the live settings, validating thresholds first
    pub fn filter(&self, signal: impl ErrorSignal) -> FilterResult<Filter> {
        Filter::init(self.filter_config.clone(), signal)
    }

    /// Replace the configuration, keeping the live filter settings in step
    pub async fn replace_config(&self, config: Config) {
        let filter = config.filter.clone();
        *self.config.write().await = config;
        self.filter_config.update(|current| *current = filter);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::{FilterOption, LogSignal};

    #[tokio::test]
    async fn test_replace_config_reaches_existing_filter() {
        let state = AppState::new(Config::default());
        let filter = state.filter(LogSignal).unwrap();
        let option = FilterOption::default().with_ext("mp3");
        assert!(filter.check(&option));

        let mut config = Config::default();
        config.filter.file_types.music = false;
        state.replace_config(config).await;

        assert!(!state.config.read().await.filter.file_types.music);
        assert!(!filter.check(&option));
    }
}
