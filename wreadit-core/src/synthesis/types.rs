use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::catalog::Engine;
use crate::settings::AudioFormat;

/// Parameter bundle for one synthesis task. Built fresh from the current
/// settings and content item on every conversion; never persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct SynthesisRequest {
    pub engine: Engine,
    pub language_code: String,
    pub format: AudioFormat,
    pub bucket: String,
    pub key_prefix: String,
    pub text: String,
    pub voice: String,
    pub sample_rate: String,
}

/// A completed synthesis task as reported by the speech service.
#[derive(Debug, Clone, PartialEq)]
pub struct SynthesisResult {
    pub output_uri: String,
    /// Service-reported output format name ("mp3", "ogg_vorbis", "pcm").
    pub output_format: String,
    pub characters: i32,
    pub task_id: String,
    pub creation_time: DateTime<Utc>,
    pub language_code: String,
}

/// One generated audio file tied to a content item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AudioAsset {
    pub content_id: u64,
    pub uri: String,
    pub mime: String,
    pub created_at: DateTime<Utc>,
    pub characters: i32,
    pub task_id: String,
    /// Whether this is the live audio version for its content item. At most
    /// one asset per content id should be active at a time; hosts that
    /// allow concurrent conversions of the same item must serialize them to
    /// keep that invariant.
    pub active: bool,
}

/// Fields the host needs to register a generated audio file as a media
/// attachment.
#[derive(Debug, Clone, PartialEq)]
pub struct AttachmentDescriptor {
    /// File name of the stored object, used as both title and slug.
    pub title: String,
    pub slug: String,
    pub description: String,
    pub mime: String,
    pub artist: String,
    /// MySQL-style timestamp string for the host's date columns.
    pub created_at: String,
    pub metadata: AttachmentMetadata,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttachmentMetadata {
    pub dataformat: String,
    pub sample_rate: String,
    pub lang: String,
    pub char_length: i32,
    pub mime: String,
    pub task_id: String,
}

/// MIME type for a service-reported output format. Anything unrecognized
/// falls back to MPEG, matching the mp3 service default.
pub fn mime_type(output_format: &str) -> &'static str {
    match output_format {
        "ogg" => "audio/ogg",
        "pcm" => "audio/pcm",
        _ => "audio/mpeg",
    }
}
