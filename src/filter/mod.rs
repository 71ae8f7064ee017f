//! Admission filter
//!
//! Decides whether a discovered file should be downloaded at all. Callers pass
//! only the criteria they know; every absent field passes its predicate.

pub mod config;
pub mod error;
pub mod parse;
pub mod signal;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub use config::{
    DateDirection, FileCategory, FilterConfig, IdDirection, SharedFilterConfig,
};
pub use error::{FilterError, FilterResult};
pub use signal::{ChannelSignal, ErrorSignal, LogSignal, SignalEvent};

use parse::{parse_leading_int, parse_timestamp};

/// Post id as emitted by the scraper: numeric or textual
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PostId {
    Number(i64),
    Text(String),
}

impl PostId {
    fn as_int(&self) -> Option<i64> {
        match self {
            PostId::Number(n) => Some(*n),
            PostId::Text(s) => parse_leading_int(s),
        }
    }
}

impl From<i64> for PostId {
    fn from(n: i64) -> Self {
        PostId::Number(n)
    }
}

impl From<&str> for PostId {
    fn from(s: &str) -> Self {
        PostId::Text(s.to_string())
    }
}

/// Partial criteria for a single file
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterOption {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<PostId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fee: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ext: Option<String>,
}

impl FilterOption {
    pub fn with_id(mut self, id: impl Into<PostId>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_date(mut self, date: impl Into<String>) -> Self {
        self.date = Some(date.into());
        self
    }

    pub fn with_fee(mut self, fee: i64) -> Self {
        self.fee = Some(fee);
        self
    }

    pub fn with_ext(mut self, ext: impl Into<String>) -> Self {
        self.ext = Some(ext.into());
        self
    }
}

/// Filter evaluating criteria against the live configuration
#[derive(Debug, Clone)]
pub struct Filter {
    config: SharedFilterConfig,
}

impl Filter {
    /// Validate the configured thresholds and build the filter.
    ///
    /// A bad id or date threshold is fatal: the crawl error is fired, the user
    /// is alerted and no filter is returned.
    pub fn init(config: SharedFilterConfig, signal: impl ErrorSignal) -> FilterResult<Self> {
        let snapshot = config.snapshot();
        if let Err(err) = validate(&snapshot) {
            signal.fire_crawl_error();
            let message = err.to_string();
            signal.alert(&message);
            tracing::error!("{} (value: {:?})", message, err.value());
            return Err(err);
        }

        Ok(Self { config })
    }

    pub fn config(&self) -> &SharedFilterConfig {
        &self.config
    }

    /// Check whether a file matching `option` should be kept.
    ///
    /// Predicates run in a fixed order and the first failure short-circuits:
    /// file type, fee type, fee threshold, id range, post date.
    pub fn check(&self, option: &FilterOption) -> bool {
        let config = self.config.snapshot();

        check_file_type(&config, option.ext.as_deref())
            && check_fee_type(&config, option.fee)
            && check_fee_range(&config, option.fee)
            && check_id_range(&config, option.id.as_ref())
            && check_post_date(&config, option.date.as_deref())
    }
}

/// Validate the thresholds of enabled rules. Id is checked before date.
pub fn validate(config: &FilterConfig) -> FilterResult<()> {
    if config.id_range.enabled && parse_leading_int(&config.id_range.threshold).is_none() {
        return Err(FilterError::invalid_id(&config.id_range.threshold));
    }

    if config.post_date.enabled && parse_timestamp(&config.post_date.threshold).is_none() {
        return Err(FilterError::invalid_date(&config.post_date.threshold));
    }

    Ok(())
}

fn check_file_type(config: &FilterConfig, ext: Option<&str>) -> bool {
    let Some(ext) = ext.filter(|e| !e.is_empty()) else {
        return true;
    };

    let category = FileCategory::classify(ext);
    let keep = config.file_types.is_enabled(category);
    if !keep {
        tracing::trace!("Rejected .{}: category {} disabled", ext, category.name());
    }
    keep
}

fn check_fee_type(config: &FilterConfig, fee: Option<i64>) -> bool {
    match fee {
        None => true,
        Some(fee) if fee > 0 => config.fee_types.pay,
        Some(_) => config.fee_types.free,
    }
}

fn check_fee_range(config: &FilterConfig, fee: Option<i64>) -> bool {
    match fee {
        Some(fee) if config.fee_threshold.enabled => fee >= config.fee_threshold.value,
        _ => true,
    }
}

fn check_id_range(config: &FilterConfig, id: Option<&PostId>) -> bool {
    let Some(id) = id else {
        return true;
    };
    if !config.id_range.enabled {
        return true;
    }

    let direction = config.id_range.direction;
    if direction == IdDirection::Neutral {
        return true;
    }

    let (Some(now), Some(threshold)) = (id.as_int(), parse_leading_int(&config.id_range.threshold))
    else {
        tracing::warn!(
            "Id comparison skipped: id={:?} threshold={:?}",
            id,
            config.id_range.threshold
        );
        return false;
    };

    match direction {
        IdDirection::Greater => now > threshold,
        IdDirection::Less => now < threshold,
        IdDirection::Neutral => true,
    }
}

fn check_post_date(config: &FilterConfig, date: Option<&str>) -> bool {
    let Some(date) = date else {
        return true;
    };
    if !config.post_date.enabled {
        return true;
    }

    let direction = config.post_date.direction;
    if direction == DateDirection::Neutral {
        return true;
    }

    let parsed: Option<(DateTime<Utc>, DateTime<Utc>)> =
        parse_timestamp(date).zip(parse_timestamp(&config.post_date.threshold));
    let Some((posted, threshold)) = parsed else {
        tracing::warn!(
            "Date comparison skipped: date={:?} threshold={:?}",
            date,
            config.post_date.threshold
        );
        return false;
    };

    match direction {
        DateDirection::Before => posted < threshold,
        DateDirection::After => posted > threshold,
        DateDirection::Neutral => true,
    }
}
