use async_trait::async_trait;

use crate::error::Error;

use super::types::{SynthesisRequest, SynthesisResult};

/// Boundary to the speech-synthesis service. The call blocks until the
/// service accepts the task and reports its output location; a failure is
/// propagated verbatim with no retry at this layer.
#[async_trait]
pub trait SpeechSynthesizer: Send + Sync {
    async fn synthesize(&self, request: &SynthesisRequest) -> Result<SynthesisResult, Error>;
}

/// Boundary to the object store holding generated audio files. The core
/// only ever computes deletion intents; this trait carries them out.
#[async_trait]
pub trait AudioStore: Send + Sync {
    async fn delete(&self, bucket: &str, key: &str) -> Result<(), Error>;
}
