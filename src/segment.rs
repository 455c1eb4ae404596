//! Heading-based section segmentation.
//!
//! Headings are recognised from a fixed synonym table. A heading must start
//! a line and be followed by a colon, the end of the line, or the end of the
//! text, so "Experience with Rust" inside a paragraph is never a heading.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::model::{Section, SectionMap};

/// Heading phrases for each canonical section (lowercase).
pub const SECTION_KEYWORDS: &[(Section, &[&str])] = &[
    (
        Section::Contact,
        &[
            "contact",
            "contact info",
            "contact information",
            "personal info",
            "personal information",
            "personal details",
        ],
    ),
    (
        Section::Summary,
        &[
            "summary",
            "profile",
            "professional profile",
            "about me",
            "objective",
            "career objective",
            "summary of experience",
            "technical summary",
            "executive summary",
        ],
    ),
    (
        Section::Skills,
        &[
            "skills",
            "technical skills",
            "tech skills",
            "competencies",
            "core competencies",
            "expertise",
            "areas of expertise",
            "it skills",
            "functional skills",
            "professional skills",
            "key skills",
            "specialties",
            "proficiencies",
            "skill set",
        ],
    ),
    (
        Section::Experience,
        &[
            "experience",
            "work experience",
            "employment history",
            "professional experience",
            "work history",
            "career history",
            "professional background",
            "experience history",
            "positions held",
        ],
    ),
    (
        Section::Education,
        &[
            "education",
            "academic background",
            "academic history",
            "qualification",
            "qualifications",
            "academic credentials",
            "academic qualifications",
            "academics",
        ],
    ),
    (
        Section::Projects,
        &[
            "projects",
            "key projects",
            "personal projects",
            "academic projects",
            "professional projects",
            "technical projects",
            "selected projects",
            "notable projects",
        ],
    ),
    (
        Section::Certifications,
        &[
            "certifications",
            "certificates",
            "professional certifications",
            "licenses",
            "licenses and certifications",
            "training",
            "professional development",
        ],
    ),
    (
        Section::Publications,
        &["publications", "papers", "research", "research papers", "conferences"],
    ),
    (
        Section::Awards,
        &["awards", "honors", "achievements", "accomplishments", "awards and honors"],
    ),
    (
        Section::Languages,
        &["languages", "language proficiency", "language skills"],
    ),
    (
        Section::Interests,
        &[
            "interests",
            "hobbies",
            "hobbies and interests",
            "extracurricular",
            "extracurricular activities",
            "activities",
        ],
    ),
    (Section::References, &["references"]),
    (
        Section::Frameworks,
        &[
            "frameworks",
            "tools",
            "technologies",
            "frameworks & tools",
            "technical environment",
            "tools & technologies",
            "it environment",
        ],
    ),
    (
        Section::Volunteer,
        &[
            "volunteer",
            "volunteer experience",
            "volunteering",
            "community service",
            "social work",
        ],
    ),
];

/// Every (phrase, section) pair, longest phrase first. Ties keep table order.
static KEYWORDS_BY_LENGTH: Lazy<Vec<(&'static str, Section)>> = Lazy::new(|| {
    let mut all: Vec<(&'static str, Section)> = SECTION_KEYWORDS
        .iter()
        .flat_map(|(section, phrases)| phrases.iter().map(move |p| (*p, *section)))
        .collect();
    all.sort_by(|a, b| b.0.len().cmp(&a.0.len()));
    all
});

static HEADING: Lazy<Regex> = Lazy::new(|| {
    let alternation = KEYWORDS_BY_LENGTH
        .iter()
        .map(|(phrase, _)| regex::escape(phrase))
        .collect::<Vec<_>>()
        .join("|");
    Regex::new(&format!(
        r"(?im)^[ \t]*(?:{})[ \t]*(?::[ \t]*|\n|$)",
        alternation
    ))
    .expect("valid heading regex")
});

/// A heading occurrence in normalized text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Heading {
    /// Byte offset where the heading line starts
    pub start: usize,
    /// Byte offset just past the heading (and its colon or newline)
    pub end: usize,
    pub section: Section,
}

/// Map heading text to its canonical section by longest contained phrase.
pub fn canonical_section(heading: &str) -> Option<Section> {
    let cleaned = heading.trim().to_lowercase();
    KEYWORDS_BY_LENGTH
        .iter()
        .find(|(phrase, _)| cleaned.contains(phrase))
        .map(|(_, section)| *section)
}

/// Find every heading in document order.
pub fn find_headings(text: &str) -> Vec<Heading> {
    HEADING
        .find_iter(text)
        .filter_map(|m| {
            canonical_section(m.as_str()).map(|section| Heading {
                start: m.start(),
                end: m.end(),
                section,
            })
        })
        .collect()
}

/// Split normalized text into canonical sections.
///
/// `header` is always the first entry: the text before the first heading, or
/// all of it when no heading is found.
pub fn segment(text: &str) -> SectionMap {
    let mut sections = SectionMap::new();
    let headings = find_headings(text);

    let Some(first) = headings.first() else {
        sections.append(Section::Header, text.trim());
        return sections;
    };

    sections.append(Section::Header, text[..first.start].trim());

    for (i, heading) in headings.iter().enumerate() {
        let content_end = headings
            .get(i + 1)
            .map(|next| next.start)
            .unwrap_or(text.len());
        sections.append(heading.section, text[heading.end..content_end].trim());
    }

    log::debug!(
        "segmented {} headings into {} sections",
        headings.len(),
        sections.len()
    );
    sections
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canonical_section_prefers_longest_phrase() {
        assert_eq!(canonical_section("Summary of Experience"), Some(Section::Summary));
        assert_eq!(canonical_section("WORK EXPERIENCE:"), Some(Section::Experience));
        assert_eq!(canonical_section("Volunteer Experience"), Some(Section::Volunteer));
        assert_eq!(canonical_section("Tools & Technologies"), Some(Section::Frameworks));
        assert_eq!(canonical_section("Nothing here"), None);
    }

    #[test]
    fn test_segment_basic_resume() {
        let text = "Jane Doe\njane@x.com\n\nEXPERIENCE\nEngineer at Acme\n\nEducation:\nMIT";
        let sections = segment(text);
        assert_eq!(sections.get(Section::Header), Some("Jane Doe\njane@x.com"));
        assert_eq!(sections.get(Section::Experience), Some("Engineer at Acme"));
        assert_eq!(sections.get(Section::Education), Some("MIT"));
        let order: Vec<Section> = sections.iter().map(|(s, _)| s).collect();
        assert_eq!(
            order,
            vec![Section::Header, Section::Experience, Section::Education]
        );
    }

    #[test]
    fn test_inline_heading_with_colon() {
        let sections = segment("Skills: Rust, Go\nLanguages: English");
        assert_eq!(sections.get(Section::Skills), Some("Rust, Go"));
        assert_eq!(sections.get(Section::Languages), Some("English"));
        assert_eq!(sections.get(Section::Header), Some(""));
    }

    #[test]
    fn test_heading_word_inside_sentence_is_not_a_heading() {
        let sections = segment("Experience with distributed systems\nand more");
        assert_eq!(sections.len(), 1);
        assert_eq!(
            sections.get(Section::Header),
            Some("Experience with distributed systems\nand more")
        );
    }

    #[test]
    fn test_recurring_section_concatenated() {
        let sections = segment("SKILLS\nRust\nPROJECTS\nA tool\nTECHNICAL SKILLS\nGo");
        assert_eq!(sections.get(Section::Skills), Some("Rust\n\nGo"));
        assert_eq!(sections.get(Section::Projects), Some("A tool"));
    }

    #[test]
    fn test_no_headings_and_empty_text() {
        let sections = segment("  just a name  ");
        assert_eq!(sections.get(Section::Header), Some("just a name"));

        let sections = segment("");
        assert_eq!(sections.len(), 1);
        assert_eq!(sections.get(Section::Header), Some(""));
    }

    #[test]
    fn test_sections_partition_text() {
        let text = "Jane\nSUMMARY\nBuilds things.\nSKILLS:\nRust, Go\nEXPERIENCE\nAcme\n2020 - 2021";
        let sections = segment(text);

        let rebuilt: Vec<&str> = sections
            .iter()
            .map(|(_, content)| content)
            .filter(|c| !c.is_empty())
            .collect();
        assert_eq!(
            rebuilt.join("\n"),
            "Jane\nBuilds things.\nRust, Go\nAcme\n2020 - 2021"
        );
    }
}
