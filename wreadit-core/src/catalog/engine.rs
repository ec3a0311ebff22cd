use serde::{Deserialize, Serialize};

/// Speech synthesis engine tiers, ordered roughly by age of introduction.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Default,
    strum::VariantArray,
)]
#[serde(rename_all = "snake_case")]
pub enum Engine {
    #[default]
    Standard,
    Neural,
    Generative,
    LongForm,
}

impl Engine {
    /// Engines a site may select in its settings. Generative and long-form
    /// voices exist in the catalog data but are not offered for conversion.
    pub const SELECTABLE: [Engine; 2] = [Engine::Standard, Engine::Neural];

    pub const fn name(self) -> &'static str {
        match self {
            Self::Standard => "standard",
            Self::Neural => "neural",
            Self::Generative => "generative",
            Self::LongForm => "long_form",
        }
    }

    pub fn from_name(s: &str) -> Option<Self> {
        match s {
            "standard" => Some(Self::Standard),
            "neural" => Some(Self::Neural),
            "generative" => Some(Self::Generative),
            "long_form" | "long-form" => Some(Self::LongForm),
            _ => None,
        }
    }

    /// Human-readable label for select menus.
    pub const fn label(self) -> &'static str {
        match self {
            Self::Standard => "Standard",
            Self::Neural => "Neural",
            Self::Generative => "Generative",
            Self::LongForm => "Long-form",
        }
    }

    pub fn is_selectable(self) -> bool {
        Self::SELECTABLE.contains(&self)
    }
}
