use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{TimeZone, Utc};

use crate::content::{ContentItem, ContentRepository, LocaleProvider};
use crate::error::Error;
use crate::settings::Settings;
use crate::synthesis::orchestrator::{make_bucket_url, Converter, Orchestrator};
use crate::synthesis::provider::{AudioStore, SpeechSynthesizer};
use crate::synthesis::types::{
    mime_type, AttachmentDescriptor, AudioAsset, SynthesisRequest, SynthesisResult,
};

struct FixedLocale(&'static str);

impl LocaleProvider for FixedLocale {
    fn current_locale(&self) -> String {
        self.0.to_string()
    }
}

struct StubSynthesizer {
    fail: bool,
    result: SynthesisResult,
}

#[async_trait]
impl SpeechSynthesizer for StubSynthesizer {
    async fn synthesize(&self, request: &SynthesisRequest) -> Result<SynthesisResult, Error> {
        if self.fail {
            return Err(Error::Upstream(anyhow::anyhow!("service unavailable")));
        }
        Ok(SynthesisResult {
            language_code: request.language_code.clone(),
            ..self.result.clone()
        })
    }
}

#[derive(Default)]
struct RecordingAudioStore {
    deleted: Mutex<Vec<(String, String)>>,
}

#[async_trait]
impl AudioStore for RecordingAudioStore {
    async fn delete(&self, bucket: &str, key: &str) -> Result<(), Error> {
        self.deleted
            .lock()
            .unwrap()
            .push((bucket.to_string(), key.to_string()));
        Ok(())
    }
}

#[derive(Default)]
struct InMemoryRepository {
    items: HashMap<u64, ContentItem>,
    attached: Mutex<Vec<(AudioAsset, AttachmentDescriptor)>>,
    detached: Mutex<Vec<u64>>,
}

#[async_trait]
impl ContentRepository for InMemoryRepository {
    async fn find(&self, id: u64) -> Result<ContentItem, Error> {
        self.items
            .get(&id)
            .cloned()
            .ok_or_else(|| Error::NotFound(format!("content item {id}")))
    }

    async fn attach(
        &self,
        asset: &AudioAsset,
        descriptor: AttachmentDescriptor,
    ) -> Result<u64, Error> {
        let mut attached = self.attached.lock().unwrap();
        attached.push((asset.clone(), descriptor));
        Ok(attached.len() as u64)
    }

    async fn detach(&self, attachment_id: u64) -> Result<(), Error> {
        self.detached.lock().unwrap().push(attachment_id);
        Ok(())
    }
}

fn settings() -> Settings {
    Settings {
        access_key: "AKIAEXAMPLE".to_string(),
        secret_key: "secret".to_string(),
        bucket: "mybucket".to_string(),
        region: "us-east-1".to_string(),
        voice: "Joanna".to_string(),
        ..Settings::default()
    }
}

fn orchestrator(settings: Settings) -> Orchestrator {
    Orchestrator::new(settings, Box::new(FixedLocale("en-US")))
}

fn content() -> ContentItem {
    ContentItem {
        id: 7,
        slug: "hello-world".to_string(),
        title: "Hello, World!".to_string(),
        author: "Sam Writer".to_string(),
        body: "First paragraph.".to_string(),
        post_type: "post".to_string(),
    }
}

fn result() -> SynthesisResult {
    SynthesisResult {
        output_uri: "https://s3.us-east-1.amazonaws.com/mybucket/prefix/file.mp3".to_string(),
        output_format: "mp3".to_string(),
        characters: 120,
        task_id: "task-123".to_string(),
        creation_time: Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap(),
        language_code: "en-US".to_string(),
    }
}

fn converter(
    settings: Settings,
    synthesizer: Arc<StubSynthesizer>,
    audio_store: Arc<RecordingAudioStore>,
    repository: Arc<InMemoryRepository>,
) -> Converter {
    Converter::new(
        orchestrator(settings),
        synthesizer,
        audio_store,
        repository,
    )
}

#[test]
fn mime_types_follow_the_fixed_mapping() {
    assert_eq!(mime_type("ogg"), "audio/ogg");
    assert_eq!(mime_type("pcm"), "audio/pcm");
    assert_eq!(mime_type("mp3"), "audio/mpeg");
    assert_eq!(mime_type("anything-else"), "audio/mpeg");
}

#[test]
fn request_carries_settings_and_locale() {
    let request = orchestrator(settings()).build_request(&content());

    assert_eq!(request.language_code, "en-US");
    assert_eq!(request.bucket, "mybucket");
    assert_eq!(request.voice, "Joanna");
    assert_eq!(request.sample_rate, "24000");
    assert_eq!(request.key_prefix, "hello-world");
}

#[test]
fn request_text_reads_title_author_then_body() {
    let request = orchestrator(settings()).build_request(&content());
    assert_eq!(
        request.text,
        "Hello, World! \n\n by Sam Writer \n\n First paragraph."
    );
}

#[test]
fn request_text_strips_markup() {
    let mut item = content();
    item.title = "<b>Big</b> News".to_string();
    item.body = "See <a href=\"https://example.com\">the site</a>.".to_string();

    let request = orchestrator(settings()).build_request(&item);
    assert_eq!(request.text, "Big News \n\n by Sam Writer \n\n See the site.");
}

#[test]
fn file_prefix_uses_path_prefix_without_trailing_slash() {
    let mut cfg = settings();
    cfg.path_prefix = "audio/".to_string();

    let prefix = orchestrator(cfg).file_prefix(&content());
    assert_eq!(prefix, "audio/hello-world");
}

#[test]
fn file_prefix_strips_disallowed_characters() {
    let mut cfg = settings();
    cfg.path_prefix = "my audio".to_string();

    // The space is percent-encoded first and '%' is not an allowed key
    // character, so it disappears entirely.
    let prefix = orchestrator(cfg).file_prefix(&content());
    assert_eq!(prefix, "my20audio/hello-world");
}

#[test]
fn file_prefix_keeps_the_allowed_literal_set() {
    let mut item = content();
    item.slug = "ep.1-q&a!(live)".to_string();

    let prefix = orchestrator(settings()).file_prefix(&item);
    assert_eq!(prefix, "ep.1-q&a!(live)");
}

#[test]
fn file_prefix_slugifies_title_when_slug_is_missing() {
    let mut item = content();
    item.slug = String::new();

    let prefix = orchestrator(settings()).file_prefix(&item);
    assert_eq!(prefix, "hello-world");
}

#[test]
fn asset_is_built_active() {
    let asset = orchestrator(settings()).build_asset(&result(), 7);

    assert!(asset.active);
    assert_eq!(asset.content_id, 7);
    assert_eq!(asset.mime, "audio/mpeg");
    assert_eq!(asset.characters, 120);
    assert_eq!(asset.task_id, "task-123");
}

#[test]
fn superseded_copy_only_flips_active() {
    let orchestrator = orchestrator(settings());
    let asset = orchestrator.build_asset(&result(), 7);
    let superseded = orchestrator.mark_superseded(&asset);

    assert!(!superseded.active);
    assert_eq!(
        AudioAsset {
            active: true,
            ..superseded
        },
        asset
    );
}

#[test]
fn playback_url_builds_virtual_hosted_bucket_url() {
    let orchestrator = orchestrator(settings());
    let asset = orchestrator.build_asset(&result(), 7);

    assert_eq!(
        orchestrator.playback_url(&asset).unwrap(),
        "https://mybucket.s3.us-east-1.amazonaws.com/prefix/file.mp3"
    );
}

#[test]
fn playback_url_prefers_custom_domain() {
    let mut cfg = settings();
    cfg.domain = "https://cdn.example.com".to_string();
    let orchestrator = orchestrator(cfg);
    let asset = orchestrator.build_asset(&result(), 7);

    assert_eq!(
        orchestrator.playback_url(&asset).unwrap(),
        "https://cdn.example.com/prefix/file.mp3"
    );
}

#[test]
fn bucket_url_is_exact() {
    assert_eq!(
        make_bucket_url("mybucket", "us-east-1", "prefix/file.mp3").unwrap(),
        "https://mybucket.s3.us-east-1.amazonaws.com/prefix/file.mp3"
    );
}

#[test]
fn bucket_url_revalidates_bucket_and_region() {
    assert!(matches!(
        make_bucket_url("My Bucket", "us-east-1", "file.mp3"),
        Err(Error::InvalidArgument(_))
    ));
    assert!(matches!(
        make_bucket_url("mybucket", "nowhere-1", "file.mp3"),
        Err(Error::InvalidArgument(_))
    ));
}

#[test]
fn storage_key_drops_bucket_segment() {
    let orchestrator = orchestrator(settings());
    let asset = orchestrator.build_asset(&result(), 7);

    assert_eq!(orchestrator.storage_key(&asset), "prefix/file.mp3");
}

#[test]
fn attachment_descriptor_maps_result_fields() {
    let descriptor = orchestrator(settings()).attachment_descriptor(&result(), &content());

    assert_eq!(descriptor.title, "file.mp3");
    assert_eq!(descriptor.slug, "file.mp3");
    assert_eq!(
        descriptor.description,
        "Audio version of \"Hello, World!\" (hello-world)"
    );
    assert_eq!(descriptor.artist, "Sam Writer");
    assert_eq!(descriptor.created_at, "2025-06-01 12:00:00");
    assert_eq!(descriptor.metadata.dataformat, "mp3");
    assert_eq!(descriptor.metadata.sample_rate, "24000");
    assert_eq!(descriptor.metadata.char_length, 120);
    assert_eq!(descriptor.metadata.task_id, "task-123");
}

#[tokio::test]
async fn convert_registers_an_active_asset() {
    let synthesizer = Arc::new(StubSynthesizer {
        fail: false,
        result: result(),
    });
    let audio_store = Arc::new(RecordingAudioStore::default());
    let repository = Arc::new(InMemoryRepository {
        items: HashMap::from([(7, content())]),
        ..Default::default()
    });

    let converter = converter(
        settings(),
        synthesizer,
        audio_store,
        repository.clone(),
    );

    let asset = converter.convert(7).await.unwrap();

    assert!(asset.active);
    assert_eq!(asset.content_id, 7);

    let attached = repository.attached.lock().unwrap();
    assert_eq!(attached.len(), 1);
    assert_eq!(attached[0].1.title, "file.mp3");
}

#[tokio::test]
async fn convert_requires_complete_setup() {
    let mut cfg = settings();
    cfg.bucket = String::new();

    let converter = converter(
        cfg,
        Arc::new(StubSynthesizer {
            fail: false,
            result: result(),
        }),
        Arc::new(RecordingAudioStore::default()),
        Arc::new(InMemoryRepository {
            items: HashMap::from([(7, content())]),
            ..Default::default()
        }),
    );

    assert!(matches!(
        converter.convert(7).await,
        Err(Error::InvalidArgument(_))
    ));
}

#[tokio::test]
async fn convert_rejects_disabled_post_types() {
    let mut item = content();
    item.post_type = "widget".to_string();

    let converter = converter(
        settings(),
        Arc::new(StubSynthesizer {
            fail: false,
            result: result(),
        }),
        Arc::new(RecordingAudioStore::default()),
        Arc::new(InMemoryRepository {
            items: HashMap::from([(7, item)]),
            ..Default::default()
        }),
    );

    assert!(matches!(
        converter.convert(7).await,
        Err(Error::InvalidArgument(_))
    ));
}

#[tokio::test]
async fn convert_surfaces_missing_content() {
    let converter = converter(
        settings(),
        Arc::new(StubSynthesizer {
            fail: false,
            result: result(),
        }),
        Arc::new(RecordingAudioStore::default()),
        Arc::new(InMemoryRepository::default()),
    );

    assert!(matches!(
        converter.convert(7).await,
        Err(Error::NotFound(_))
    ));
}

#[tokio::test]
async fn synthesis_failure_leaves_nothing_attached() {
    let repository = Arc::new(InMemoryRepository {
        items: HashMap::from([(7, content())]),
        ..Default::default()
    });

    let converter = converter(
        settings(),
        Arc::new(StubSynthesizer {
            fail: true,
            result: result(),
        }),
        Arc::new(RecordingAudioStore::default()),
        repository.clone(),
    );

    assert!(matches!(
        converter.convert(7).await,
        Err(Error::Upstream(_))
    ));
    assert!(repository.attached.lock().unwrap().is_empty());
}

#[tokio::test]
async fn remove_deletes_object_and_detaches_record() {
    let audio_store = Arc::new(RecordingAudioStore::default());
    let repository = Arc::new(InMemoryRepository {
        items: HashMap::from([(7, content())]),
        ..Default::default()
    });

    let converter = converter(
        settings(),
        Arc::new(StubSynthesizer {
            fail: false,
            result: result(),
        }),
        audio_store.clone(),
        repository.clone(),
    );

    let asset = converter.orchestrator().build_asset(&result(), 7);
    let superseded = converter.remove(&asset, 42).await.unwrap();

    assert!(!superseded.active);
    assert_eq!(
        audio_store.deleted.lock().unwrap().as_slice(),
        &[("mybucket".to_string(), "prefix/file.mp3".to_string())]
    );
    assert_eq!(repository.detached.lock().unwrap().as_slice(), &[42]);
}
