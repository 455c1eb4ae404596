//! Structured resume record and its parts.

use super::{OrderedSet, SectionMap};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Contact details found near the top of a resume.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ContactInfo {
    /// Email addresses, case-insensitively unique
    #[serde(deserialize_with = "OrderedSet::deserialize_case_insensitive")]
    pub emails: OrderedSet,
    /// Normalized phone numbers
    pub phones: OrderedSet,
    /// LinkedIn profile URL
    pub linkedin: Option<String>,
    /// GitHub profile URL
    pub github: Option<String>,
    /// Other web addresses (LinkedIn and GitHub excluded)
    pub websites: OrderedSet,
}

impl Default for ContactInfo {
    fn default() -> Self {
        Self {
            emails: OrderedSet::case_insensitive(),
            phones: OrderedSet::new(),
            linkedin: None,
            github: None,
            websites: OrderedSet::new(),
        }
    }
}

/// Start and end tokens of a date range, as written in the document.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DateRange {
    pub start_date: String,
    pub end_date: String,
}

/// One position from the experience section.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ExperienceEntry {
    pub company: Option<String>,
    pub title: Option<String>,
    pub dates: Option<DateRange>,
    pub description: String,
}

/// One item from the education section.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct EducationEntry {
    pub institution: Option<String>,
    pub degree: Option<String>,
    pub dates: Option<DateRange>,
    pub gpa: Option<String>,
    pub details: String,
}

/// The structured profile produced for one document.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ParsedResume {
    /// Source file name
    pub file: String,

    /// Set when the document could not be structured
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,

    pub candidate_name: Option<String>,
    pub contact: ContactInfo,
    pub summary: Option<String>,

    /// Category to sorted skill names
    pub skills: BTreeMap<String, Vec<String>>,
    /// Sorted union of every matched skill
    pub skills_list: Vec<String>,

    pub experience: Vec<ExperienceEntry>,
    pub education: Vec<EducationEntry>,

    pub projects: Option<String>,
    pub frameworks: Option<String>,
    pub certifications: Option<String>,
    pub awards: Option<String>,
    pub languages: Option<String>,
    pub interests: Option<String>,

    pub organizations_detected: Vec<String>,
    pub degrees_detected: Vec<String>,
    pub universities_detected: Vec<String>,

    /// Section previews, truncated for display
    pub raw_sections: SectionMap,
}

impl ParsedResume {
    /// A record with every structured field empty and the error flag set.
    pub fn failed(file: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            file: file.into(),
            error: Some(error.into()),
            ..Self::default()
        }
    }

    /// Whether this record carries an error flag.
    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failed_record_shape() {
        let record = ParsedResume::failed("empty.txt", "No text could be extracted from the file.");
        assert!(record.is_error());
        assert!(record.candidate_name.is_none());
        assert!(record.skills_list.is_empty());

        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["file"], "empty.txt");
        assert_eq!(json["error"], "No text could be extracted from the file.");
        assert!(json["contact"]["emails"].as_array().unwrap().is_empty());
        assert!(json["candidate_name"].is_null());
        assert!(json["raw_sections"].as_object().unwrap().is_empty());
    }

    #[test]
    fn test_error_field_omitted_when_unset() {
        let record = ParsedResume {
            file: "ok.txt".to_string(),
            ..ParsedResume::default()
        };
        let json = serde_json::to_value(&record).unwrap();
        assert!(json.get("error").is_none());
        assert!(json.get("languages").unwrap().is_null());
    }

    #[test]
    fn test_contact_emails_ignore_case_after_json() {
        let mut contact = ContactInfo::default();
        contact.emails.insert("Jane@Example.com");
        let json = serde_json::to_string(&contact).unwrap();

        let mut back: ContactInfo = serde_json::from_str(&json).unwrap();
        assert_eq!(back, contact);
        assert!(!back.emails.insert("jane@example.com"));
        assert!(back.emails.contains("JANE@EXAMPLE.COM"));
    }
}
