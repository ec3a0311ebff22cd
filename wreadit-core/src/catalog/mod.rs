pub mod engine;
pub mod regions;
pub mod voices;


pub use engine::Engine;
pub use regions::{EngineSupport, Region};
pub use voices::{LanguageGroup, Voice};
