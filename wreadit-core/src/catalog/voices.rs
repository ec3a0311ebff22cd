use std::collections::HashSet;
use std::sync::LazyLock;

use serde::{Deserialize, Serialize};

use crate::catalog::engine::Engine;
use crate::error::Error;

/// One synthetic speaker. `name` is the identifier sent to the synthesis
/// service. It is unique within a language group but not globally: "Aditi"
/// and "Kajal" each appear in an English and a Hindi group, so a stored
/// voice name alone does not identify a language group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Voice {
    /// Locale code of the voice's own language region (e.g. "en-GB").
    pub lang: String,
    pub name: String,
    pub label: String,
    pub gender: String,
    pub engines: Vec<Engine>,
}

impl Voice {
    pub fn supports_any(&self, engines: &[Engine]) -> bool {
        self.engines.iter().any(|e| engines.contains(e))
    }
}

/// Voices sharing a display language. `language` is the grouping key and is
/// unique across the catalog; `code` is the group's locale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LanguageGroup {
    pub language: String,
    pub code: String,
    pub voices: Vec<Voice>,
}

impl LanguageGroup {
    /// Voices ordered alphabetically by name for select menus. Catalog
    /// order is preserved in `voices` itself.
    pub fn sorted_voices(&self) -> Vec<&Voice> {
        let mut voices: Vec<&Voice> = self.voices.iter().collect();
        voices.sort_by(|a, b| a.name.cmp(&b.name));
        voices
    }
}

static CATALOG: LazyLock<Vec<LanguageGroup>> = LazyLock::new(|| {
    serde_json::from_str(include_str!("data/voices.json"))
        .expect("embedded voice catalog is well formed")
});

static SELECTABLE_NAMES: LazyLock<HashSet<&'static str>> = LazyLock::new(|| {
    catalog()
        .iter()
        .flat_map(|g| g.voices.iter())
        .filter(|v| v.supports_any(&Engine::SELECTABLE))
        .map(|v| v.name.as_str())
        .collect()
});

fn catalog() -> &'static [LanguageGroup] {
    LazyLock::force(&CATALOG).as_slice()
}

/// The full catalog in its defined display order.
pub fn all() -> &'static [LanguageGroup] {
    catalog()
}

/// Filters the catalog by a locale code such as "fr", "en-US", or
/// "en-GB-WLS". Each present subtag narrows the previous stage's result:
/// language prefix first, then exact region, then variant substring. A
/// subtag absent from the input skips its stage entirely.
pub fn by_locale(code: &str) -> Vec<&'static LanguageGroup> {
    let (language, region, variant) = split_locale(code);
    if language.is_empty() {
        return Vec::new();
    }

    let mut matching: Vec<&LanguageGroup> = catalog()
        .iter()
        .filter(|g| g.code.to_ascii_lowercase().starts_with(&language))
        .collect();

    if let Some(region) = region {
        matching.retain(|g| {
            let (_, group_region, _) = split_locale(&g.code);
            group_region.as_deref() == Some(region.as_str())
        });
    }

    if let Some(variant) = variant {
        matching.retain(|g| g.code.to_ascii_uppercase().contains(&variant));
    }

    matching
}

/// Filters the catalog down to voices usable on any of `engines`, dropping
/// groups left with no voices. Only the selectable engines are accepted;
/// anything else is a caller error.
pub fn by_engines(engines: &[Engine]) -> Result<Vec<LanguageGroup>, Error> {
    ensure_selectable(engines)?;

    Ok(catalog()
        .iter()
        .filter_map(|group| {
            let voices: Vec<Voice> = group
                .voices
                .iter()
                .filter(|v| v.supports_any(engines))
                .cloned()
                .collect();
            if voices.is_empty() {
                None
            } else {
                Some(LanguageGroup {
                    language: group.language.clone(),
                    code: group.code.clone(),
                    voices,
                })
            }
        })
        .collect())
}

/// Flat set of voice names usable on any of `engines`, for membership
/// checks. Names are not unique across groups (see [`Voice`]).
pub fn voice_names_for_engines(engines: &[Engine]) -> Result<HashSet<&'static str>, Error> {
    ensure_selectable(engines)?;

    Ok(catalog()
        .iter()
        .flat_map(|g| g.voices.iter())
        .filter(|v| v.supports_any(engines))
        .map(|v| v.name.as_str())
        .collect())
}

/// Names valid for settings storage: every voice usable on a selectable
/// engine. Infallible counterpart of `voice_names_for_engines` for the
/// settings validator.
pub fn selectable_voice_names() -> &'static HashSet<&'static str> {
    LazyLock::force(&SELECTABLE_NAMES)
}

fn ensure_selectable(engines: &[Engine]) -> Result<(), Error> {
    if engines.is_empty() {
        return Err(Error::InvalidArgument(
            "at least one engine is required".to_string(),
        ));
    }
    if let Some(engine) = engines.iter().find(|e| !e.is_selectable()) {
        return Err(Error::InvalidArgument(format!(
            "engine '{}' is not supported",
            engine.name()
        )));
    }
    Ok(())
}

/// Splits a locale code into (language, region, variant) subtags. Language
/// is lowercased; a two-letter subtag after it is the region, uppercased;
/// any later subtag is treated as a variant.
fn split_locale(code: &str) -> (String, Option<String>, Option<String>) {
    let mut parts = code.split(['-', '_']).filter(|p| !p.is_empty());
    let language = parts
        .next()
        .map(|p| p.to_ascii_lowercase())
        .unwrap_or_default();

    let mut region = None;
    let mut variant = None;
    for part in parts {
        if region.is_none()
            && variant.is_none()
            && part.len() == 2
            && part.chars().all(|c| c.is_ascii_alphabetic())
        {
            region = Some(part.to_ascii_uppercase());
        } else if variant.is_none() {
            variant = Some(part.to_ascii_uppercase());
        }
    }

    (language, region, variant)
}
