//! Field extractors run over normalized, segmented text.
//!
//! Every extractor is total: ambiguous input degrades to empty fields, never
//! to an error.

pub mod contact;
pub mod dates;
pub mod entity;
pub mod history;
pub mod skills;

pub use contact::{extract_contact, normalize_phone};
pub use entity::{
    Entities, EntityExtractor, EntityLabel, EntityRecognizer, EntityStrategy, HeuristicStrategy,
    RecognizedEntity, RecognizerStrategy,
};
pub use history::{parse_education, parse_experience};
pub use skills::{SkillMatcher, SkillMatches};
