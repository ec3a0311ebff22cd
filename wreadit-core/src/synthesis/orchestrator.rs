use std::sync::Arc;
use std::sync::LazyLock;

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use regex::Regex;
use url::Url;

use crate::catalog::regions;
use crate::content::{ContentItem, ContentRepository, LocaleProvider};
use crate::error::Error;
use crate::settings::validate::is_valid_bucket_name;
use crate::settings::Settings;

use super::provider::{AudioStore, SpeechSynthesizer};
use super::types::{
    mime_type, AttachmentDescriptor, AttachmentMetadata, AudioAsset, SynthesisRequest,
    SynthesisResult,
};

/// Characters allowed to survive in an object key prefix. Everything else
/// is removed, not escaped.
static PREFIX_DISALLOWED: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[^0-9a-zA-Z/!_.*'():;$@=+,?&-]").expect("prefix pattern compiles")
});

static MARKUP_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<[^>]*>").expect("markup pattern compiles"));

/// Percent-encoding that leaves only unreserved characters, applied to the
/// user's path prefix before key sanitization.
const RAW_URL: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

/// Builds synthesis requests and maps results back into host-facing
/// records. Holds its own settings copy; nothing here reads process-wide
/// state.
pub struct Orchestrator {
    settings: Settings,
    locale: Box<dyn LocaleProvider>,
}

impl Orchestrator {
    pub fn new(settings: Settings, locale: Box<dyn LocaleProvider>) -> Self {
        Self { settings, locale }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Assembles the parameter bundle for converting one content item.
    pub fn build_request(&self, content: &ContentItem) -> SynthesisRequest {
        SynthesisRequest {
            engine: self.settings.engine,
            language_code: self.locale.current_locale(),
            format: self.settings.format,
            bucket: self.settings.bucket.clone(),
            key_prefix: self.file_prefix(content),
            text: build_text(content),
            voice: self.settings.voice.clone(),
            sample_rate: self.settings.sample_rate.clone(),
        }
    }

    /// Object key prefix for the generated file: the content slug (or a
    /// slug derived from the title), optionally under the configured path
    /// prefix with its trailing slash stripped.
    pub fn file_prefix(&self, content: &ContentItem) -> String {
        let mut key = if content.slug.is_empty() {
            slugify(&content.title)
        } else {
            content.slug.clone()
        };

        if !self.settings.path_prefix.is_empty() {
            let prefix = self.settings.path_prefix.trim_end_matches('/');
            key = format!("{}/{}", utf8_percent_encode(prefix, RAW_URL), key);
        }

        sanitize_prefix(&key)
    }

    /// Maps a completed synthesis result into the live audio asset for its
    /// content item.
    pub fn build_asset(&self, result: &SynthesisResult, content_id: u64) -> AudioAsset {
        AudioAsset {
            content_id,
            uri: result.output_uri.clone(),
            mime: mime_type(&result.output_format).to_string(),
            created_at: result.creation_time,
            characters: result.characters,
            task_id: result.task_id.clone(),
            active: true,
        }
    }

    /// A copy of `asset` taken out of service, used when a new version
    /// replaces it or a deletion was requested. Remote objects are deleted
    /// by the audio store, never here.
    pub fn mark_superseded(&self, asset: &AudioAsset) -> AudioAsset {
        AudioAsset {
            active: false,
            ..asset.clone()
        }
    }

    /// Public URL for a stored asset. With a custom domain configured the
    /// bucket segment is stripped from the stored path; otherwise a
    /// virtual-hosted-style bucket URL is built. Bucket and region are
    /// re-checked here independently of settings validation.
    pub fn playback_url(&self, asset: &AudioAsset) -> Result<String, Error> {
        let mut path = uri_path(&asset.uri);
        if !self.settings.bucket.is_empty() {
            path = path
                .replace(&self.settings.bucket, "")
                .trim_matches('/')
                .to_string();
        }

        if !self.settings.domain.is_empty() {
            return Ok(format!("{}/{}", self.settings.domain, path));
        }

        make_bucket_url(&self.settings.bucket, &self.settings.region, &path)
    }

    /// Object key within the bucket for a stored asset, for deletion.
    pub fn storage_key(&self, asset: &AudioAsset) -> String {
        uri_path(&asset.uri)
            .replace(&format!("{}/", self.settings.bucket), "")
            .trim_start_matches('/')
            .to_string()
    }

    /// Attachment fields for registering the result as a media item.
    pub fn attachment_descriptor(
        &self,
        result: &SynthesisResult,
        content: &ContentItem,
    ) -> AttachmentDescriptor {
        let file_name =
            filename_from_uri(&result.output_uri).unwrap_or_else(|| content.slug.clone());
        let mime = mime_type(&result.output_format).to_string();

        AttachmentDescriptor {
            title: file_name.clone(),
            slug: file_name,
            description: format!(
                "Audio version of \"{}\" ({})",
                content.title, content.slug
            ),
            mime: mime.clone(),
            artist: content.author.clone(),
            created_at: result.creation_time.format("%Y-%m-%d %H:%M:%S").to_string(),
            metadata: AttachmentMetadata {
                dataformat: result.output_format.clone(),
                sample_rate: self.settings.sample_rate.clone(),
                lang: result.language_code.clone(),
                char_length: result.characters,
                mime,
                task_id: result.task_id.clone(),
            },
        }
    }
}

/// Virtual-hosted-style bucket URL. Fails rather than producing a URL from
/// values that never passed validation.
pub fn make_bucket_url(bucket: &str, region: &str, path: &str) -> Result<String, Error> {
    if !is_valid_bucket_name(bucket) {
        return Err(Error::InvalidArgument(
            "bucket name contains one or more disallowed characters".to_string(),
        ));
    }
    if !regions::is_valid(region) {
        return Err(Error::InvalidArgument(
            "unsupported region; check the stored settings".to_string(),
        ));
    }

    Ok(format!("https://{bucket}.s3.{region}.amazonaws.com/{path}"))
}

/// Title, author, and body joined with blank lines for the synthesis text.
fn build_text(content: &ContentItem) -> String {
    format!(
        "{} \n\n by {} \n\n {}",
        sanitize_text(&content.title),
        content.author,
        sanitize_textarea(&content.body),
    )
}

/// Single-line plain text: markup removed, whitespace collapsed.
fn sanitize_text(text: &str) -> String {
    let stripped = MARKUP_TAG.replace_all(text, "");
    stripped.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Multi-line plain text: markup and control characters removed, line
/// breaks kept.
fn sanitize_textarea(text: &str) -> String {
    let stripped = MARKUP_TAG.replace_all(text, "");
    stripped
        .chars()
        .filter(|c| !c.is_control() || *c == '\n')
        .collect::<String>()
        .trim()
        .to_string()
}

fn sanitize_prefix(prefix: &str) -> String {
    PREFIX_DISALLOWED.replace_all(prefix, "").into_owned()
}

fn slugify(title: &str) -> String {
    let mut slug = String::with_capacity(title.len());
    let mut pending_dash = false;
    for c in title.chars() {
        if c.is_ascii_alphanumeric() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            slug.push(c.to_ascii_lowercase());
            pending_dash = false;
        } else {
            pending_dash = true;
        }
    }
    slug
}

/// Path portion of a stored object URI; a value that does not parse as a
/// URL is treated as already being a path.
fn uri_path(uri: &str) -> String {
    match Url::parse(uri) {
        Ok(parsed) => parsed.path().to_string(),
        Err(_) => uri.to_string(),
    }
}

/// File name portion of a stored object URI.
fn filename_from_uri(uri: &str) -> Option<String> {
    let path = uri_path(uri);
    let name = path.rsplit('/').next()?;
    if name.is_empty() {
        None
    } else {
        Some(name.to_string())
    }
}

/// Drives one content item through the audio lifecycle: no audio, a single
/// blocking synthesis call, then an active registered asset. A synthesis
/// failure surfaces immediately and leaves no intermediate state.
pub struct Converter {
    orchestrator: Orchestrator,
    synthesizer: Arc<dyn SpeechSynthesizer>,
    audio_store: Arc<dyn AudioStore>,
    repository: Arc<dyn ContentRepository>,
}

impl Converter {
    pub fn new(
        orchestrator: Orchestrator,
        synthesizer: Arc<dyn SpeechSynthesizer>,
        audio_store: Arc<dyn AudioStore>,
        repository: Arc<dyn ContentRepository>,
    ) -> Self {
        Self {
            orchestrator,
            synthesizer,
            audio_store,
            repository,
        }
    }

    pub fn orchestrator(&self) -> &Orchestrator {
        &self.orchestrator
    }

    /// Converts a content item to audio and registers the attachment.
    /// Returns the new active asset.
    pub async fn convert(&self, content_id: u64) -> Result<AudioAsset, Error> {
        let settings = self.orchestrator.settings();
        if !settings.setup_is_complete() {
            return Err(Error::InvalidArgument(
                "an access key, secret key, and bucket name are required".to_string(),
            ));
        }

        let content = self.repository.find(content_id).await?;
        if !settings.allows_post_type(&content.post_type) {
            return Err(Error::InvalidArgument(format!(
                "post type '{}' is not enabled for audio",
                content.post_type
            )));
        }

        let request = self.orchestrator.build_request(&content);
        tracing::debug!(content_id, voice = %request.voice, "starting synthesis");
        let result = self.synthesizer.synthesize(&request).await?;

        let asset = self.orchestrator.build_asset(&result, content_id);
        let descriptor = self.orchestrator.attachment_descriptor(&result, &content);
        self.repository.attach(&asset, descriptor).await?;

        Ok(asset)
    }

    /// Removes an asset: deletes the stored object, detaches the media
    /// record, and returns the superseded copy.
    pub async fn remove(
        &self,
        asset: &AudioAsset,
        attachment_id: u64,
    ) -> Result<AudioAsset, Error> {
        let bucket = &self.orchestrator.settings().bucket;
        let key = self.orchestrator.storage_key(asset);
        self.audio_store.delete(bucket, &key).await?;
        self.repository.detach(attachment_id).await?;

        Ok(self.orchestrator.mark_superseded(asset))
    }
}
