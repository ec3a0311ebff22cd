pub mod aws;
pub mod orchestrator;
pub mod provider;
pub mod types;

#[cfg(test)]
mod tests;

pub use aws::{PollySynthesizer, S3AudioStore};
pub use orchestrator::{make_bucket_url, Converter, Orchestrator};
pub use provider::{AudioStore, SpeechSynthesizer};
pub use types::{
    mime_type, AttachmentDescriptor, AttachmentMetadata, AudioAsset, SynthesisRequest,
    SynthesisResult,
};
