//! AWS-backed synthesis and storage collaborators: Polly for asynchronous
//! speech synthesis tasks, S3 for deleting stored audio objects.

use anyhow::anyhow;
use async_trait::async_trait;
use aws_sdk_polly::config::{Credentials, Region};
use aws_sdk_polly::types::{
    Engine as PollyEngine, LanguageCode, OutputFormat as PollyOutputFormat, VoiceId,
};
use aws_sdk_polly::Client as PollyClient;
use aws_sdk_s3::Client as S3Client;
use chrono::{DateTime, Utc};

use crate::catalog::Engine;
use crate::error::Error;
use crate::settings::{AudioFormat, Settings};

use super::provider::{AudioStore, SpeechSynthesizer};
use super::types::{SynthesisRequest, SynthesisResult};

/// Builds one SDK config from the stored credentials and region; both
/// clients share it.
async fn sdk_config(settings: &Settings) -> aws_config::SdkConfig {
    let credentials = Credentials::new(
        settings.access_key.clone(),
        settings.secret_key.clone(),
        None,
        None,
        "wreadit-settings",
    );

    aws_config::defaults(aws_config::BehaviorVersion::latest())
        .credentials_provider(credentials)
        .region(Region::new(settings.region.clone()))
        .load()
        .await
}

fn polly_engine(engine: Engine) -> PollyEngine {
    match engine {
        Engine::Standard => PollyEngine::Standard,
        Engine::Neural => PollyEngine::Neural,
        Engine::Generative => PollyEngine::Generative,
        Engine::LongForm => PollyEngine::LongForm,
    }
}

fn polly_format(format: AudioFormat) -> PollyOutputFormat {
    match format {
        AudioFormat::Mp3 => PollyOutputFormat::Mp3,
        AudioFormat::OggVorbis => PollyOutputFormat::OggVorbis,
    }
}

fn chrono_time(time: Option<&aws_smithy_types::DateTime>) -> DateTime<Utc> {
    time.and_then(|t| DateTime::from_timestamp(t.secs(), t.subsec_nanos()))
        .unwrap_or_else(Utc::now)
}

/// Speech synthesis through Polly's task API. The output lands directly in
/// the configured bucket; the response carries the object URI.
pub struct PollySynthesizer {
    client: PollyClient,
}

impl PollySynthesizer {
    pub async fn new(settings: &Settings) -> Self {
        let config = sdk_config(settings).await;
        Self {
            client: PollyClient::new(&config),
        }
    }

    pub fn from_client(client: PollyClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl SpeechSynthesizer for PollySynthesizer {
    async fn synthesize(&self, request: &SynthesisRequest) -> Result<SynthesisResult, Error> {
        let response = self
            .client
            .start_speech_synthesis_task()
            .engine(polly_engine(request.engine))
            .language_code(LanguageCode::from(request.language_code.as_str()))
            .output_format(polly_format(request.format))
            .output_s3_bucket_name(&request.bucket)
            .output_s3_key_prefix(&request.key_prefix)
            .sample_rate(&request.sample_rate)
            .text(&request.text)
            .voice_id(VoiceId::from(request.voice.as_str()))
            .send()
            .await
            .map_err(Error::upstream)?;

        let task = response
            .synthesis_task
            .ok_or_else(|| Error::Upstream(anyhow!("synthesis task missing from response")))?;

        tracing::debug!(
            task_id = task.task_id.as_deref().unwrap_or_default(),
            characters = task.request_characters,
            "synthesis task accepted"
        );

        Ok(SynthesisResult {
            output_uri: task.output_uri.unwrap_or_default(),
            output_format: task
                .output_format
                .map(|f| f.as_str().to_string())
                .unwrap_or_else(|| request.format.name().to_string()),
            characters: task.request_characters,
            task_id: task.task_id.unwrap_or_default(),
            creation_time: chrono_time(task.creation_time.as_ref()),
            language_code: task
                .language_code
                .map(|c| c.as_str().to_string())
                .unwrap_or_else(|| request.language_code.clone()),
        })
    }
}

/// Deletes stored audio objects from S3.
pub struct S3AudioStore {
    client: S3Client,
}

impl S3AudioStore {
    pub async fn new(settings: &Settings) -> Self {
        let config = sdk_config(settings).await;
        Self {
            client: S3Client::new(&config),
        }
    }

    pub fn from_client(client: S3Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl AudioStore for S3AudioStore {
    async fn delete(&self, bucket: &str, key: &str) -> Result<(), Error> {
        self.client
            .delete_object()
            .bucket(bucket)
            .key(key)
            .send()
            .await
            .map_err(Error::upstream)?;

        tracing::debug!(bucket, key, "deleted audio object");
        Ok(())
    }
}
