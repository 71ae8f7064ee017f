use crate::download::SubmitOptions;
use crate::download::service::ConflictAction;
use crate::filter::FilterConfig;
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Complete configuration (saved to config/settings.toml)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub relay: RelayConfig,
    #[serde(default)]
    pub filter: FilterConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelayConfig {
    /// Capacity of the relay event channel
    #[serde(default = "default_channel_capacity")]
    pub channel_capacity: usize,
    #[serde(default)]
    pub conflict_action: ConflictAction,
    /// Ask where to save each file
    #[serde(default)]
    pub save_as: bool,
}

fn default_channel_capacity() -> usize {
    256
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            channel_capacity: default_channel_capacity(),
            conflict_action: ConflictAction::Overwrite,
            save_as: false,
        }
    }
}

impl RelayConfig {
    pub fn submit_options(&self) -> SubmitOptions {
        SubmitOptions {
            conflict_action: self.conflict_action,
            save_as: self.save_as,
        }
    }
}

impl Config {
    /// Load configuration from the resolved config directory.
    ///
    /// A missing settings file yields defaults. Filter thresholds are not
    /// validated here; that is `Filter::init`'s job.
    pub fn load() -> anyhow::Result<Self> {
        let config_path = crate::util::paths::get_app_config_path()?;
        Self::load_from(&config_path)
    }

    pub fn load_from(config_path: &Path) -> anyhow::Result<Self> {
        if !config_path.exists() {
            tracing::info!("Config not found at {:?}, using defaults", config_path);
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(config_path)
            .context(format!("Failed to read {:?}", config_path))?;
        let config: Config =
            toml::from_str(&content).context(format!("Failed to parse {:?}", config_path))?;

        if config.relay.channel_capacity == 0 {
            anyhow::bail!("Invalid configuration: relay.channel_capacity must be at least 1");
        }

        Ok(config)
    }

    /// Save configuration to the resolved config directory
    pub fn save(&self) -> anyhow::Result<()> {
        let config_path = crate::util::paths::get_app_config_path()?;
        self.save_to(&config_path)
    }

    pub fn save_to(&self, config_path: &Path) -> anyhow::Result<()> {
        // Ensure parent directory exists
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;

        // Atomic write using temp file + rename
        let temp_path = config_path.with_extension("toml.tmp");
        std::fs::write(&temp_path, &content).context("Failed to write temp config file")?;
        std::fs::rename(&temp_path, config_path).context("Failed to rename temp config file")?;

        tracing::info!("Saved config to {:?}", config_path);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::{DateDirection, IdDirection};
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_gives_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let config = Config::load_from(&temp_dir.path().join("settings.toml")).unwrap();
        assert_eq!(config, Config::default());
        assert!(config.filter.file_types.other);
        assert!(!config.filter.id_range.enabled);
    }

    #[test]
    fn test_save_and_load() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nested").join("settings.toml");

        let mut config = Config::default();
        config.relay.conflict_action = ConflictAction::Uniquify;
        config.filter.fee_types.pay = false;
        config.filter.id_range.enabled = true;
        config.filter.id_range.threshold = "12345".to_string();
        config.filter.id_range.direction = IdDirection::Greater;
        config.filter.post_date.direction = DateDirection::Before;

        config.save_to(&path).unwrap();
        assert!(!path.with_extension("toml.tmp").exists());

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_partial_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("settings.toml");
        std::fs::write(
            &path,
            "[filter.file_types]\nimage = true\nmusic = false\nvideo = true\ncompressed = true\nps = true\nother = false\n",
        )
        .unwrap();

        let config = Config::load_from(&path).unwrap();
        assert!(!config.filter.file_types.music);
        assert!(config.filter.fee_types.free);
        assert_eq!(config.relay, RelayConfig::default());
    }

    #[test]
    fn test_zero_capacity_rejected() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("settings.toml");
        std::fs::write(&path, "[relay]\nchannel_capacity = 0\n").unwrap();
        assert!(Config::load_from(&path).is_err());
    }
}
