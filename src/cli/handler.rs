use super::error;
use super::output;
use super::replay;
use super::{Commands, ConfigAction};
use crate::app::config::Config;
use crate::app::state::AppState;
use crate::filter::{self, Filter, FilterOption, LogSignal, PostId};
use anyhow::Result;
use serde::de::DeserializeOwned;
use std::path::PathBuf;
use tokio::io::BufReader;

/// Handle a CLI command and return exit code
pub async fn handle_command(command: Commands, state: AppState) -> i32 {
    let result = match command {
        Commands::Check {
            id,
            date,
            fee,
            ext,
            json,
        } => handle_check(&state, id, date, fee, ext, json),
        Commands::Replay { input, filter } => handle_replay(&state, input, filter).await,
        Commands::Config { action } => handle_config(action, &state).await,
    };

    match result {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {}", e);
            error::ERROR
        }
    }
}

/// Build the filter, reporting a bad threshold the way users see it
fn init_filter(state: &AppState) -> Option<Filter> {
    match state.filter(LogSignal) {
        Ok(filter) => Some(filter),
        Err(e) => {
            eprintln!("{}", e);
            None
        }
    }
}

fn handle_check(
    state: &AppState,
    id: Option<String>,
    date: Option<String>,
    fee: Option<i64>,
    ext: Option<String>,
    json: bool,
) -> Result<i32> {
    let Some(filter) = init_filter(state) else {
        return Ok(error::INVALID_INPUT);
    };

    let option = FilterOption {
        id: id.map(PostId::Text),
        date,
        fee,
        ext,
    };
    let accepted = filter.check(&option);

    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&serde_json::json!({
                "criteria": option,
                "accepted": accepted,
            }))?
        );
    } else {
        println!("{}", output::format_verdict(&option, accepted));
    }

    Ok(if accepted {
        error::SUCCESS
    } else {
        error::REJECTED
    })
}

async fn handle_replay(state: &AppState, input: String, use_filter: bool) -> Result<i32> {
    let filter = if use_filter {
        match init_filter(state) {
            Some(filter) => Some(filter),
            None => return Ok(error::INVALID_INPUT),
        }
    } else {
        None
    };

    let relay_config = state.config.read().await.relay.clone();

    let (outputs, summary) = if input == "-" {
        let reader = BufReader::new(tokio::io::stdin());
        replay::replay(reader, &relay_config, filter.as_ref()).await?
    } else {
        let path = PathBuf::from(&input);
        if !path.exists() {
            eprintln!("Replay input not found: {}", path.display());
            return Ok(error::NOT_FOUND);
        }
        let file = tokio::fs::File::open(&path).await?;
        replay::replay(BufReader::new(file), &relay_config, filter.as_ref()).await?
    };

    for line in &outputs {
        println!("{}", output::format_replay_output(line));
    }
    eprintln!("{}", output::format_summary(&summary, &outputs));

    Ok(error::SUCCESS)
}

/// Handle configuration commands
async fn handle_config(action: ConfigAction, state: &AppState) -> Result<i32> {
    match action {
        ConfigAction::Get { key } => {
            let config = state.config.read().await;
            let value = get_config_value(&config, &key)?;
            println!("{}", value);
            Ok(error::SUCCESS)
        }
        ConfigAction::Set { key, value } => {
            let mut config = state.config.read().await.clone();
            set_config_value(&mut config, &key, &value)?;
            config.save()?;
            state.replace_config(config).await;
            println!("Configuration updated: {} = {}", key, value);
            Ok(error::SUCCESS)
        }
        ConfigAction::Show { json } => {
            let config = state.config.read().await;
            if json {
                println!("{}", serde_json::to_string_pretty(&*config)?);
            } else {
                println!("{}", toml::to_string_pretty(&*config)?);
            }
            Ok(error::SUCCESS)
        }
        ConfigAction::Path => {
            println!("{}", crate::util::paths::get_app_config_path()?.display());
            Ok(error::SUCCESS)
        }
        ConfigAction::Init { force } => {
            let path = crate::util::paths::get_app_config_path()?;
            if path.exists() && !force {
                eprintln!("{} already exists (use --force to overwrite)", path.display());
                return Ok(error::INVALID_INPUT);
            }
            Config::default().save_to(&path)?;
            println!("Wrote default configuration to {}", path.display());
            Ok(error::SUCCESS)
        }
        ConfigAction::Validate => {
            let config = state.config.read().await;
            match filter::validate(&config.filter) {
                Ok(()) => {
                    println!("✓ Configuration is valid");
                    Ok(error::SUCCESS)
                }
                Err(e) => {
                    println!("✗ {} ({:?})", e, e.value());
                    Ok(error::INVALID_INPUT)
                }
            }
        }
    }
}

/// Parse a lowercase enum value the same way settings.toml does
fn parse_enum<T: DeserializeOwned>(value: &str) -> Result<T> {
    serde_json::from_value(serde_json::Value::String(value.to_string()))
        .map_err(|_| anyhow::anyhow!("Invalid value: {}", value))
}

fn to_lower_name<T: serde::Serialize>(value: &T) -> String {
    serde_json::to_value(value)
        .ok()
        .and_then(|v| v.as_str().map(str::to_string))
        .unwrap_or_default()
}

/// Get configuration value by dot notation key
pub fn get_config_value(config: &Config, key: &str) -> Result<String> {
    let parts: Vec<&str> = key.split('.').collect();
    let filter = &config.filter;

    match parts.as_slice() {
        ["relay", "channel_capacity"] => Ok(config.relay.channel_capacity.to_string()),
        ["relay", "conflict_action"] => Ok(to_lower_name(&config.relay.conflict_action)),
        ["relay", "save_as"] => Ok(config.relay.save_as.to_string()),
        ["filter", "file_types", "image"] => Ok(filter.file_types.image.to_string()),
        ["filter", "file_types", "music"] => Ok(filter.file_types.music.to_string()),
        ["filter", "file_types", "video"] => Ok(filter.file_types.video.to_string()),
        ["filter", "file_types", "compressed"] => Ok(filter.file_types.compressed.to_string()),
        ["filter", "file_types", "ps"] => Ok(filter.file_types.ps.to_string()),
        ["filter", "file_types", "other"] => Ok(filter.file_types.other.to_string()),
        ["filter", "fee_types", "free"] => Ok(filter.fee_types.free.to_string()),
        ["filter", "fee_types", "pay"] => Ok(filter.fee_types.pay.to_string()),
        ["filter", "fee_threshold", "enabled"] => Ok(filter.fee_threshold.enabled.to_string()),
        ["filter", "fee_threshold", "value"] => Ok(filter.fee_threshold.value.to_string()),
        ["filter", "id_range", "enabled"] => Ok(filter.id_range.enabled.to_string()),
        ["filter", "id_range", "threshold"] => Ok(filter.id_range.threshold.clone()),
        ["filter", "id_range", "direction"] => Ok(to_lower_name(&filter.id_range.direction)),
        ["filter", "post_date", "enabled"] => Ok(filter.post_date.enabled.to_string()),
        ["filter", "post_date", "threshold"] => Ok(filter.post_date.threshold.clone()),
        ["filter", "post_date", "direction"] => Ok(to_lower_name(&filter.post_date.direction)),
        _ => Err(anyhow::anyhow!("Unknown configuration key: {}", key)),
    }
}

/// Set configuration value by dot notation key
pub fn set_config_value(config: &mut Config, key: &str, value: &str) -> Result<()> {
    let parts: Vec<&str> = key.split('.').collect();
    let filter = &mut config.filter;

    match parts.as_slice() {
        ["relay", "channel_capacity"] => {
            let capacity: usize = value.parse()?;
            if capacity == 0 {
                anyhow::bail!("relay.channel_capacity must be at least 1");
            }
            config.relay.channel_capacity = capacity;
        }
        ["relay", "conflict_action"] => config.relay.conflict_action = parse_enum(value)?,
        ["relay", "save_as"] => config.relay.save_as = value.parse()?,
        ["filter", "file_types", "image"] => filter.file_types.image = value.parse()?,
        ["filter", "file_types", "music"] => filter.file_types.music = value.parse()?,
        ["filter", "file_types", "video"] => filter.file_types.video = value.parse()?,
        ["filter", "file_types", "compressed"] => filter.file_types.compressed = value.parse()?,
        ["filter", "file_types", "ps"] => filter.file_types.ps = value.parse()?,
        ["filter", "file_types", "other"] => filter.file_types.other = value.parse()?,
        ["filter", "fee_types", "free"] => filter.fee_types.free = value.parse()?,
        ["filter", "fee_types", "pay"] => filter.fee_types.pay = value.parse()?,
        ["filter", "fee_threshold", "enabled"] => filter.fee_threshold.enabled = value.parse()?,
        ["filter", "fee_threshold", "value"] => filter.fee_threshold.value = value.parse()?,
        ["filter", "id_range", "enabled"] => filter.id_range.enabled = value.parse()?,
        ["filter", "id_range", "threshold"] => filter.id_range.threshold = value.to_string(),
        ["filter", "id_range", "direction"] => filter.id_range.direction = parse_enum(value)?,
        ["filter", "post_date", "enabled"] => filter.post_date.enabled = value.parse()?,
        ["filter", "post_date", "threshold"] => filter.post_date.threshold = value.to_string(),
        ["filter", "post_date", "direction"] => filter.post_date.direction = parse_enum(value)?,
        _ => return Err(anyhow::anyhow!("Unknown configuration key: {}", key)),
    }

    Ok(())
}
