use async_trait::async_trait;

use crate::error::Error;
use crate::synthesis::types::{AttachmentDescriptor, AudioAsset};

/// A piece of host content eligible for audio conversion.
#[derive(Debug, Clone, PartialEq)]
pub struct ContentItem {
    pub id: u64,
    /// URL slug; may be empty for drafts, in which case a slug is derived
    /// from the title.
    pub slug: String,
    pub title: String,
    /// Author display name, spoken in the generated audio.
    pub author: String,
    pub body: String,
    pub post_type: String,
}

/// Host oracle for post-type existence. Injected into settings validation
/// so the core never hard-codes which content types the host defines.
pub trait PostTypeRegistry: Send + Sync {
    fn exists(&self, post_type: &str) -> bool;
}

/// Supplies the site's active locale in hyphenated form (e.g. "en-US").
pub trait LocaleProvider: Send + Sync {
    fn current_locale(&self) -> String;
}

/// Converts an underscored host locale ("en_US") to the hyphenated form the
/// synthesis service expects.
pub fn hyphenated_locale(locale: &str) -> String {
    locale.replace('_', "-")
}

/// Read access to host content plus registration of attached audio records.
#[async_trait]
pub trait ContentRepository: Send + Sync {
    async fn find(&self, id: u64) -> Result<ContentItem, Error>;

    /// Registers a generated audio file as an attachment of its content
    /// item and returns the attachment id.
    async fn attach(
        &self,
        asset: &AudioAsset,
        descriptor: AttachmentDescriptor,
    ) -> Result<u64, Error>;

    /// Unregisters an attachment; the stored object is deleted separately
    /// through the audio store.
    async fn detach(&self, attachment_id: u64) -> Result<(), Error>;
}

#[cfg(test)]
mod tests {
    use super::hyphenated_locale;

    #[test]
    fn underscored_locales_become_hyphenated() {
        assert_eq!(hyphenated_locale("en_US"), "en-US");
        assert_eq!(hyphenated_locale("en-US"), "en-US");
        assert_eq!(hyphenated_locale("arb"), "arb");
    }
}
