pub mod config;
pub mod store;
pub mod validate;


pub use config::{AudioFormat, PartialSettings, Settings};
pub use store::{FileStore, SettingsManager, SettingsStore};
pub use validate::{FieldError, MessageKey};
