pub mod catalog;
pub mod content;
pub mod error;
pub mod settings;
pub mod synthesis;

// Public library API for embedding hosts.
pub use catalog::{Engine, LanguageGroup, Region, Voice};
pub use content::{ContentItem, ContentRepository, LocaleProvider, PostTypeRegistry};
pub use error::Error;
pub use settings::{
    AudioFormat, FieldError, MessageKey, PartialSettings, Settings, SettingsManager, SettingsStore,
};
pub use synthesis::{
    AudioAsset, Converter, Orchestrator, SpeechSynthesizer, SynthesisRequest, SynthesisResult,
};
