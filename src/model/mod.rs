//! Data model for parsed resumes.
//!
//! These types are the hand-off points between pipeline stages. Every stage
//! returns a new value; nothing downstream mutates an upstream result.

mod document;
mod ordered_set;
mod resume;
mod section;

pub use document::RawDocument;
pub use ordered_set::{Membership, OrderedSet};
pub use resume::{ContactInfo, DateRange, EducationEntry, ExperienceEntry, ParsedResume};
pub use section::{Section, SectionMap};
