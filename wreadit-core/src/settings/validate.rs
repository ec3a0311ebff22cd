use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use url::Url;

use crate::catalog::voices;
use crate::catalog::{regions, Engine};
use crate::content::PostTypeRegistry;

use super::config::{AudioFormat, PartialSettings, Settings};

/// Stable identifiers for settings problems. `Display` carries the text the
/// host shows next to the offending field; `key` stays stable for
/// programmatic use.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageKey {
    BlankAwsKey,
    BlankSecretKey,
    BadBucketName,
    UnknownRegion,
    InvalidHost,
    InvalidAudioFormat,
    InvalidVoice,
    InvalidEngine,
    InvalidPostTypes,
}

impl MessageKey {
    pub const fn key(self) -> &'static str {
        match self {
            Self::BlankAwsKey => "BLANK_AWS_KEY",
            Self::BlankSecretKey => "BLANK_SECRET_KEY",
            Self::BadBucketName => "BAD_BUCKET_NAME",
            Self::UnknownRegion => "UNKNOWN_REGION",
            Self::InvalidHost => "INVALID_HOST",
            Self::InvalidAudioFormat => "INVALID_AUDIO_FORMAT",
            Self::InvalidVoice => "INVALID_VOICE",
            Self::InvalidEngine => "INVALID_ENGINE",
            Self::InvalidPostTypes => "INVALID_POST_TYPES",
        }
    }
}

impl fmt::Display for MessageKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Self::BlankAwsKey => "I need an AWS Key ID.",
            Self::BlankSecretKey => "I need a Secret Access Key.",
            Self::BadBucketName => "Your S3 bucket name does not follow AWS rules.",
            Self::UnknownRegion => "Please enter a known region name.",
            Self::InvalidHost => "Please enter a valid host name.",
            Self::InvalidAudioFormat => "Unsupported audio format.",
            Self::InvalidVoice => "Unsupported voice option.",
            Self::InvalidEngine => "Unsupported engine option.",
            Self::InvalidPostTypes => "One or more of the post types selected does not exist.",
        };
        f.write_str(text)
    }
}

/// One problem found in a settings submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldError {
    pub field: &'static str,
    pub message: MessageKey,
}

static BUCKET_SHAPE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-z0-9][a-z0-9-]{1,61}[a-z0-9]$").expect("bucket name pattern compiles")
});

const RESERVED_BUCKET_PREFIXES: [&str; 3] = ["xn--", "sthree-", "amzn-s3-demo-"];
const RESERVED_BUCKET_SUFFIXES: [&str; 3] = ["-s3alias", "--ol-s3", "--x-s3"];

/// S3 bucket naming rules: 3-63 characters, lowercase alphanumerics and
/// hyphens, alphanumeric at both ends, none of the reserved prefixes or
/// suffixes.
pub fn is_valid_bucket_name(bucket: &str) -> bool {
    BUCKET_SHAPE.is_match(bucket)
        && !RESERVED_BUCKET_PREFIXES
            .iter()
            .any(|p| bucket.starts_with(p))
        && !RESERVED_BUCKET_SUFFIXES.iter().any(|s| bucket.ends_with(s))
}

/// An empty host is fine (the field is optional); anything else must parse
/// as an http or https URL.
pub fn is_valid_host(host: &str) -> bool {
    if host.is_empty() {
        return true;
    }
    match Url::parse(host) {
        Ok(parsed) => matches!(parsed.scheme(), "http" | "https"),
        Err(_) => false,
    }
}

/// Checks a settings submission against every field rule and returns the
/// full ordered list of problems. Rules are independent: a failure never
/// hides later ones, and an empty list means the submission is clean.
/// Missing fields are checked at their default values.
///
/// Engine/region compatibility is deliberately not a rule here; the host UI
/// disables standard-only regions when the neural engine is selected (see
/// `catalog::regions::supports_engine`).
pub fn validate(input: &PartialSettings, post_types: &dyn PostTypeRegistry) -> Vec<FieldError> {
    let defaults = Settings::default();
    let mut errors = Vec::new();

    if input
        .access_key
        .as_deref()
        .unwrap_or(&defaults.access_key)
        .trim()
        .is_empty()
    {
        errors.push(FieldError {
            field: "access_key",
            message: MessageKey::BlankAwsKey,
        });
    }

    if input
        .secret_key
        .as_deref()
        .unwrap_or(&defaults.secret_key)
        .trim()
        .is_empty()
    {
        errors.push(FieldError {
            field: "secret_key",
            message: MessageKey::BlankSecretKey,
        });
    }

    let bucket = input.bucket.as_deref().unwrap_or(&defaults.bucket).trim();
    if !is_valid_bucket_name(bucket) {
        errors.push(FieldError {
            field: "bucket",
            message: MessageKey::BadBucketName,
        });
    }

    let region = input.region.as_deref().unwrap_or(&defaults.region).trim();
    if !regions::is_valid(region) {
        errors.push(FieldError {
            field: "region",
            message: MessageKey::UnknownRegion,
        });
    }

    let domain = input.domain.as_deref().unwrap_or(&defaults.domain).trim();
    if !is_valid_host(domain) {
        errors.push(FieldError {
            field: "domain",
            message: MessageKey::InvalidHost,
        });
    }

    let format = input
        .format
        .as_deref()
        .unwrap_or(defaults.format.name())
        .trim();
    if AudioFormat::from_name(format).is_none() {
        errors.push(FieldError {
            field: "format",
            message: MessageKey::InvalidAudioFormat,
        });
    }

    let voice = input.voice.as_deref().unwrap_or(&defaults.voice).trim();
    if !voices::selectable_voice_names().contains(voice) {
        errors.push(FieldError {
            field: "voice",
            message: MessageKey::InvalidVoice,
        });
    }

    let engine = input
        .engine
        .as_deref()
        .unwrap_or(defaults.engine.name())
        .trim();
    let recognized = Engine::from_name(engine)
        .map(Engine::is_selectable)
        .unwrap_or(false);
    if !recognized {
        errors.push(FieldError {
            field: "engine",
            message: MessageKey::InvalidEngine,
        });
    }

    let submitted_types = input.post_types.as_ref().unwrap_or(&defaults.post_types);
    if !submitted_types.keys().all(|t| post_types.exists(t)) {
        errors.push(FieldError {
            field: "post_types",
            message: MessageKey::InvalidPostTypes,
        });
    }

    errors
}
