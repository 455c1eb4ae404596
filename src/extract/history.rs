//! Experience and education entry parsing.
//!
//! A section is first split into entries, then each entry is read line by
//! line. Layouts vary wildly between resumes, so field assignment tries a
//! fixed sequence of layouts and takes the first that fits.

use once_cell::sync::Lazy;
use regex::Regex;

use super::dates::{
    date_range_offset, date_range_start, find_date_range, find_gpa, has_date_range,
    is_single_date, strip_date_ranges, strip_single_dates,
};
use super::entity::{has_institution_indicator, DEGREE};
use crate::model::{EducationEntry, ExperienceEntry};

/// A date range must start past this character on the first line to be
/// read as "Title    Jan 2020 - Present".
pub const TITLE_DATE_MIN_OFFSET: usize = 5;

/// Lines with a date range up to this length are dropped from descriptions.
const DATE_LINE_MAX_LEN: usize = 40;

/// Education fields are looked for in this many leading lines.
const EDUCATION_HEAD_LINES: usize = 3;

static BLANK_LINE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n\s*\n").expect("valid regex"));
static PIPE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s*\|\s*").expect("valid regex"));
static AT: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)\s+at\s+").expect("valid regex"));
static TRAILING_SEPARATOR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s*[|,]\s*$").expect("valid regex"));

/// Split section text into entries.
///
/// Blank lines separate entries. Text without any blank line is split again
/// line by line: a line carrying a date range starts a new entry when the
/// entry collected so far already has a date range of its own.
pub fn split_entries(text: &str) -> Vec<String> {
    let text = text.trim();
    if text.is_empty() {
        return Vec::new();
    }

    let blocks: Vec<&str> = BLANK_LINE.split(text).collect();
    if blocks.len() > 1 {
        return blocks.into_iter().map(str::to_string).collect();
    }

    let mut entries = Vec::new();
    let mut current: Vec<&str> = Vec::new();
    let mut current_dated = false;

    for line in text.lines().map(str::trim).filter(|l| !l.is_empty()) {
        let dated = has_date_range(line);
        if dated && current_dated {
            entries.push(current.join("\n"));
            current.clear();
            current_dated = false;
        }
        current.push(line);
        current_dated |= dated;
    }
    if !current.is_empty() {
        entries.push(current.join("\n"));
    }

    entries
}

/// Parse an experience section into positions.
///
/// Entries with neither a title nor a company are dropped.
pub fn parse_experience(text: &str) -> Vec<ExperienceEntry> {
    let entries: Vec<ExperienceEntry> = split_entries(text)
        .iter()
        .filter_map(|entry| parse_experience_entry(entry))
        .filter(|e| e.title.is_some() || e.company.is_some())
        .collect();
    log::debug!("parsed {} experience entries", entries.len());
    entries
}

/// Parse one experience entry.
pub fn parse_experience_entry(entry: &str) -> Option<ExperienceEntry> {
    let lines = non_empty_lines(entry);
    let first = *lines.first()?;
    let second = lines.get(1).copied();

    let inline_date = date_range_offset(first)
        .filter(|offset| *offset > TITLE_DATE_MIN_OFFSET)
        .and(date_range_start(first));

    let (title, company, description_start) = if let Some(start) = inline_date {
        // "Senior Developer    Jan 2020 - Present"
        let title = first[..start].trim().trim_end_matches('|').trim().to_string();
        match second.map(strip_date_ranges).filter(|c| !c.is_empty()) {
            Some(company) => (Some(title), Some(company), 2),
            None => (Some(title), None, 1),
        }
    } else if let Some(second) = second.filter(|l| has_date_range(l)) {
        // "Software Testing Engineer" / "Online Clump Jan 2016 - Mar 2018"
        (
            Some(strip_date_ranges(first)),
            Some(strip_date_ranges(second)),
            2,
        )
    } else if first.contains('|') {
        let parts: Vec<&str> = PIPE
            .split(first)
            .filter(|p| !p.is_empty() && !has_date_range(p) && !is_single_date(p))
            .collect();
        let title = parts.first().copied().unwrap_or(first).to_string();
        (Some(title), parts.get(1).map(|p| p.to_string()), 1)
    } else if first.to_lowercase().contains(" at ") {
        let mut parts = AT.splitn(first, 2);
        let title = parts.next().map(|p| p.trim().to_string());
        (title, parts.next().map(strip_date_ranges), 1)
    } else {
        let description_start = if second.is_some() { 2 } else { 1 };
        (
            Some(strip_date_ranges(first)),
            second.map(strip_date_ranges),
            description_start,
        )
    };

    let description = lines
        .iter()
        .skip(description_start)
        .filter(|l| !has_date_range(l) || l.chars().count() > DATE_LINE_MAX_LEN)
        .copied()
        .collect::<Vec<_>>()
        .join("\n");

    Some(ExperienceEntry {
        company: company.as_deref().and_then(clean_field),
        title: title.as_deref().and_then(clean_field),
        dates: find_date_range(entry),
        description,
    })
}

/// Parse an education section into entries.
///
/// Entries with neither an institution nor a degree are dropped.
pub fn parse_education(text: &str) -> Vec<EducationEntry> {
    let entries: Vec<EducationEntry> = split_entries(text)
        .iter()
        .filter_map(|entry| parse_education_entry(entry))
        .filter(|e| e.institution.is_some() || e.degree.is_some())
        .collect();
    log::debug!("parsed {} education entries", entries.len());
    entries
}

/// Parse one education entry.
pub fn parse_education_entry(entry: &str) -> Option<EducationEntry> {
    let lines = non_empty_lines(entry);
    if lines.is_empty() {
        return None;
    }

    let mut institution: Option<String> = None;
    let mut degree: Option<String> = None;
    let mut degree_line = None;

    for (i, line) in lines.iter().take(EDUCATION_HEAD_LINES).enumerate() {
        if institution.is_none() && has_institution_indicator(line) {
            institution = clean_field(&strip_date_ranges(line));
        }

        if degree.is_none() && DEGREE.is_match(line) {
            let stripped = strip_date_ranges(line);
            degree = Some(TRAILING_SEPARATOR.replace(&stripped, "").trim().to_string());
            degree_line = Some(i);
        }
    }

    if institution.is_none() {
        institution = lines
            .iter()
            .take(2)
            .enumerate()
            .filter(|(i, _)| Some(*i) != degree_line)
            .find_map(|(_, line)| clean_field(&strip_date_ranges(line)));
    }

    Some(EducationEntry {
        institution,
        degree: degree.filter(|d| !d.is_empty()),
        dates: find_date_range(entry),
        gpa: find_gpa(entry),
        details: lines.iter().skip(2).copied().collect::<Vec<_>>().join("\n"),
    })
}

fn non_empty_lines(text: &str) -> Vec<&str> {
    text.trim()
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .collect()
}

/// Drop leftover single dates and trailing commas; empty becomes `None`.
fn clean_field(value: &str) -> Option<String> {
    let cleaned = strip_single_dates(value);
    let cleaned = cleaned.trim_end_matches(',').trim();
    if cleaned.is_empty() {
        None
    } else {
        Some(cleaned.to_string())
    }
}
