use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::catalog::Engine;

/// Output container for generated audio.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum AudioFormat {
    #[default]
    Mp3,
    OggVorbis,
}

impl AudioFormat {
    pub const fn name(self) -> &'static str {
        match self {
            Self::Mp3 => "mp3",
            Self::OggVorbis => "ogg_vorbis",
        }
    }

    pub fn from_name(s: &str) -> Option<Self> {
        match s {
            "mp3" => Some(Self::Mp3),
            "ogg_vorbis" => Some(Self::OggVorbis),
            _ => None,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Mp3 => "MP3 (Recommended)",
            Self::OggVorbis => "Ogg Vorbis",
        }
    }
}

/// Plugin settings with every field resolved. Loaded via
/// [`Settings::merged`] so a partial stored payload is always backfilled
/// from the defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub access_key: String,
    #[serde(default)]
    pub secret_key: String,
    #[serde(default)]
    pub bucket: String,
    #[serde(default = "default_region")]
    pub region: String,
    #[serde(default)]
    pub engine: Engine,
    #[serde(default = "default_voice")]
    pub voice: String,
    /// Post types whose content may be converted. "post" is always present
    /// and enabled.
    #[serde(default = "default_post_types")]
    pub post_types: BTreeMap<String, bool>,
    #[serde(default)]
    pub format: AudioFormat,
    /// Optional object-key directory such as "audio". Changing it later
    /// breaks previously stored URLs.
    #[serde(default)]
    pub path_prefix: String,
    /// Optional custom host serving the bucket, including scheme.
    #[serde(default)]
    pub domain: String,
    #[serde(default = "default_sample_rate")]
    pub sample_rate: String,
}

fn default_region() -> String {
    "us-east-1".to_string()
}

fn default_voice() -> String {
    "Kendra".to_string()
}

fn default_sample_rate() -> String {
    "24000".to_string()
}

fn default_post_types() -> BTreeMap<String, bool> {
    BTreeMap::from([("post".to_string(), true)])
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            access_key: String::new(),
            secret_key: String::new(),
            bucket: String::new(),
            region: default_region(),
            engine: Engine::Standard,
            voice: default_voice(),
            post_types: default_post_types(),
            format: AudioFormat::Mp3,
            path_prefix: String::new(),
            domain: String::new(),
            sample_rate: default_sample_rate(),
        }
    }
}

impl Settings {
    /// Resolves a possibly-partial payload against the defaults. String
    /// fields keep whatever was submitted, valid or not (validation reports
    /// problems separately); enum-typed fields fall back to their default
    /// when the submitted name does not parse.
    pub fn merged(partial: &PartialSettings) -> Settings {
        let defaults = Settings::default();

        let mut post_types = partial
            .post_types
            .clone()
            .unwrap_or_else(|| defaults.post_types.clone());
        // "post" cannot be deselected.
        post_types.insert("post".to_string(), true);

        Settings {
            access_key: partial
                .access_key
                .clone()
                .unwrap_or(defaults.access_key),
            secret_key: partial
                .secret_key
                .clone()
                .unwrap_or(defaults.secret_key),
            bucket: partial.bucket.clone().unwrap_or(defaults.bucket),
            region: partial.region.clone().unwrap_or(defaults.region),
            engine: partial
                .engine
                .as_deref()
                .and_then(Engine::from_name)
                .filter(|e| e.is_selectable())
                .unwrap_or(defaults.engine),
            voice: partial.voice.clone().unwrap_or(defaults.voice),
            post_types,
            format: partial
                .format
                .as_deref()
                .and_then(AudioFormat::from_name)
                .unwrap_or(defaults.format),
            path_prefix: partial
                .path_prefix
                .clone()
                .unwrap_or(defaults.path_prefix),
            domain: partial.domain.clone().unwrap_or(defaults.domain),
            sample_rate: partial
                .sample_rate
                .clone()
                .unwrap_or(defaults.sample_rate),
        }
    }

    /// Whether the credentials and bucket needed for any conversion are set.
    pub fn setup_is_complete(&self) -> bool {
        !self.access_key.is_empty() && !self.secret_key.is_empty() && !self.bucket.is_empty()
    }

    pub fn allows_post_type(&self, post_type: &str) -> bool {
        self.post_types.get(post_type).copied().unwrap_or(false)
    }
}

/// A possibly-partial settings payload as stored by, or submitted through,
/// the host. Fields arrive stringly typed; [`Settings::merged`] resolves
/// them and `settings::validate` reports the invalid ones.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PartialSettings {
    pub access_key: Option<String>,
    pub secret_key: Option<String>,
    pub bucket: Option<String>,
    pub region: Option<String>,
    pub engine: Option<String>,
    pub voice: Option<String>,
    pub post_types: Option<BTreeMap<String, bool>>,
    pub format: Option<String>,
    pub path_prefix: Option<String>,
    pub domain: Option<String>,
    pub sample_rate: Option<String>,
}

impl From<&Settings> for PartialSettings {
    fn from(settings: &Settings) -> Self {
        Self {
            access_key: Some(settings.access_key.clone()),
            secret_key: Some(settings.secret_key.clone()),
            bucket: Some(settings.bucket.clone()),
            region: Some(settings.region.clone()),
            engine: Some(settings.engine.name().to_string()),
            voice: Some(settings.voice.clone()),
            post_types: Some(settings.post_types.clone()),
            format: Some(settings.format.name().to_string()),
            path_prefix: Some(settings.path_prefix.clone()),
            domain: Some(settings.domain.clone()),
            sample_rate: Some(settings.sample_rate.clone()),
        }
    }
}
