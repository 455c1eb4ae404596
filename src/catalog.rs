//! Skill ontology: canonical skills, their categories and surface forms.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

const EMBEDDED_CATALOG: &str = include_str!("../data/skills.json");

/// One canonical skill.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SkillEntry {
    pub canonical_name: String,
    pub category: String,
    /// Alternative spellings; the canonical name always matches as well
    #[serde(default)]
    pub variations: Vec<String>,
}

impl SkillEntry {
    pub fn new(canonical_name: impl Into<String>, category: impl Into<String>) -> Self {
        Self {
            canonical_name: canonical_name.into(),
            category: category.into(),
            variations: Vec::new(),
        }
    }

    /// Add an alternative spelling.
    pub fn with_variation(mut self, variation: impl Into<String>) -> Self {
        self.variations.push(variation.into());
        self
    }
}

/// The skill catalog read by [`SkillMatcher`](crate::extract::SkillMatcher).
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct SkillCatalog {
    pub skills: Vec<SkillEntry>,
}

impl SkillCatalog {
    pub fn new(skills: Vec<SkillEntry>) -> Self {
        Self { skills }
    }

    /// The catalog bundled with the library.
    pub fn embedded() -> Result<Self> {
        Self::from_json_str(EMBEDDED_CATALOG)
    }

    /// Load a catalog from a JSON file.
    ///
    /// A missing or unreadable file is reported as a malformed catalog.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let json = fs::read_to_string(path)
            .map_err(|e| Error::MalformedCatalog(format!("{}: {}", path.display(), e)))?;
        let catalog = Self::from_json_str(&json)?;
        log::debug!(
            "loaded {} skills from {}",
            catalog.skills.len(),
            path.display()
        );
        Ok(catalog)
    }

    /// Decode a catalog from its JSON form: `{"skills": [...]}`.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let catalog: SkillCatalog =
            serde_json::from_str(json).map_err(|e| Error::MalformedCatalog(e.to_string()))?;
        catalog.validate()?;
        Ok(catalog)
    }

    pub fn len(&self) -> usize {
        self.skills.len()
    }

    pub fn is_empty(&self) -> bool {
        self.skills.is_empty()
    }

    fn validate(&self) -> Result<()> {
        for (i, skill) in self.skills.iter().enumerate() {
            if skill.canonical_name.trim().is_empty() {
                return Err(Error::MalformedCatalog(format!(
                    "skill #{} has an empty canonical_name",
                    i
                )));
            }
            if skill.category.trim().is_empty() {
                return Err(Error::MalformedCatalog(format!(
                    "skill '{}' has an empty category",
                    skill.canonical_name
                )));
            }
        }
        Ok(())
    }
}
