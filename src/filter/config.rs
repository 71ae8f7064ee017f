use serde::{Deserialize, Serialize};
use std::sync::{Arc, RwLock};

/// User-controlled filter policy (saved under `[filter]` in settings.toml)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FilterConfig {
    #[serde(default)]
    pub file_types: FileTypeToggles,
    #[serde(default)]
    pub fee_types: FeeTypeToggles,
    #[serde(default)]
    pub fee_threshold: FeeThreshold,
    #[serde(default)]
    pub id_range: IdRangeRule,
    #[serde(default)]
    pub post_date: PostDateRule,
}

/// Per-category inclusion toggles
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileTypeToggles {
    pub image: bool,
    pub music: bool,
    pub video: bool,
    pub compressed: bool,
    pub ps: bool,
    pub other: bool,
}

impl Default for FileTypeToggles {
    fn default() -> Self {
        Self {
            image: true,
            music: true,
            video: true,
            compressed: true,
            ps: true,
            other: true,
        }
    }
}

impl FileTypeToggles {
    pub fn is_enabled(&self, category: FileCategory) -> bool {
        match category {
            FileCategory::Image => self.image,
            FileCategory::Music => self.music,
            FileCategory::Video => self.video,
            FileCategory::Compressed => self.compressed,
            FileCategory::Ps => self.ps,
            FileCategory::Other => self.other,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeeTypeToggles {
    pub free: bool,
    pub pay: bool,
}

impl Default for FeeTypeToggles {
    fn default() -> Self {
        Self {
            free: true,
            pay: true,
        }
    }
}

/// Minimum fee rule (inclusive floor)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeeThreshold {
    pub enabled: bool,
    #[serde(default)]
    pub value: i64,
}

/// Id range rule. The threshold is kept as entered and validated by `Filter::init`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdRangeRule {
    pub enabled: bool,
    #[serde(default)]
    pub threshold: String,
    #[serde(default)]
    pub direction: IdDirection,
}

/// Post date rule. The threshold is kept as entered and validated by `Filter::init`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostDateRule {
    pub enabled: bool,
    #[serde(default)]
    pub threshold: String,
    #[serde(default)]
    pub direction: DateDirection,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IdDirection {
    /// Keep ids strictly greater than the threshold
    Greater,
    /// Keep ids strictly less than the threshold
    Less,
    /// Any other value: the rule passes everything
    #[default]
    #[serde(other)]
    Neutral,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DateDirection {
    /// Keep posts published strictly before the threshold
    Before,
    /// Keep posts published strictly after the threshold
    After,
    #[default]
    #[serde(other)]
    Neutral,
}

/// File categories a criteria extension is classified into
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileCategory {
    Image,
    Music,
    Video,
    Compressed,
    Ps,
    Other,
}

impl FileCategory {
    /// Fixed category tables. Anything not listed here is `Other`.
    const TABLE: &'static [(FileCategory, &'static [&'static str])] = &[
        (FileCategory::Image, &["jpg", "jpeg", "png", "gif"]),
        (FileCategory::Music, &["wav", "mp3", "flac"]),
        (FileCategory::Video, &["mp4", "mov", "avi", "clip"]),
        (FileCategory::Compressed, &["zip"]),
        (FileCategory::Ps, &["psd"]),
    ];

    /// Classify an extension (without the leading dot). Matching is exact.
    pub fn classify(ext: &str) -> Self {
        Self::TABLE
            .iter()
            .find(|(_, exts)| exts.contains(&ext))
            .map(|(category, _)| *category)
            .unwrap_or(FileCategory::Other)
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Image => "image",
            Self::Music => "music",
            Self::Video => "video",
            Self::Compressed => "compressed",
            Self::Ps => "ps",
            Self::Other => "other",
        }
    }
}

/// Live filter configuration shared between the settings owner and the filter.
///
/// The filter takes a fresh snapshot on every check, so edits made through
/// [`SharedFilterConfig::update`] apply to the next evaluation.
#[derive(Debug, Clone, Default)]
pub struct SharedFilterConfig {
    inner: Arc<RwLock<FilterConfig>>,
}

impl SharedFilterConfig {
    pub fn new(config: FilterConfig) -> Self {
        Self {
            inner: Arc::new(RwLock::new(config)),
        }
    }

    pub fn snapshot(&self) -> FilterConfig {
        match self.inner.read() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    pub fn update(&self, edit: impl FnOnce(&mut FilterConfig)) {
        let mut guard = match self.inner.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        edit(&mut guard);
    }
}

impl From<FilterConfig> for SharedFilterConfig {
    fn from(config: FilterConfig) -> Self {
        Self::new(config)
    }
}
