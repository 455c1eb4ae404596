//! Canonical resume sections and the ordered map that holds their text.

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Canonical section names a heading can map to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Section {
    /// Text preceding the first recognised heading
    Header,
    Contact,
    Summary,
    Skills,
    Experience,
    Education,
    Projects,
    Certifications,
    Publications,
    Awards,
    Languages,
    Interests,
    References,
    Frameworks,
    Volunteer,
}

impl Section {
    /// Lowercase name used in JSON output.
    pub fn as_str(&self) -> &'static str {
        match self {
            Section::Header => "header",
            Section::Contact => "contact",
            Section::Summary => "summary",
            Section::Skills => "skills",
            Section::Experience => "experience",
            Section::Education => "education",
            Section::Projects => "projects",
            Section::Certifications => "certifications",
            Section::Publications => "publications",
            Section::Awards => "awards",
            Section::Languages => "languages",
            Section::Interests => "interests",
            Section::References => "references",
            Section::Frameworks => "frameworks",
            Section::Volunteer => "volunteer",
        }
    }
}

impl std::fmt::Display for Section {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Section text keyed by canonical name, in first-appearance order.
///
/// Serializes as a JSON object whose keys follow insertion order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SectionMap {
    entries: Vec<(Section, String)>,
}

impl SectionMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append text to a section, joining with a blank line if it recurs.
    pub fn append(&mut self, section: Section, text: &str) {
        if let Some((_, existing)) = self.entries.iter_mut().find(|(s, _)| *s == section) {
            existing.push_str("\n\n");
            existing.push_str(text);
        } else {
            self.entries.push((section, text.to_string()));
        }
    }

    pub fn get(&self, section: Section) -> Option<&str> {
        self.entries
            .iter()
            .find(|(s, _)| *s == section)
            .map(|(_, text)| text.as_str())
    }

    /// Section text if present and not blank.
    pub fn non_empty(&self, section: Section) -> Option<&str> {
        self.get(section).filter(|text| !text.trim().is_empty())
    }

    pub fn contains(&self, section: Section) -> bool {
        self.get(section).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Section, &str)> {
        self.entries.iter().map(|(s, text)| (*s, text.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Serialize for SectionMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (section, text) in &self.entries {
            map.serialize_entry(section.as_str(), text)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for SectionMap {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct SectionMapVisitor;

        impl<'de> Visitor<'de> for SectionMapVisitor {
            type Value = SectionMap;

            fn expecting(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str("a map of section names to text")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<SectionMap, A::Error> {
                let mut map = SectionMap::new();
                while let Some((section, text)) = access.next_entry::<Section, String>()? {
                    map.append(section, &text);
                }
                Ok(map)
            }
        }

        deserializer.deserialize_map(SectionMapVisitor)
    }
}
