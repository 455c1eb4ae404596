//! Contact details: emails, phone numbers, profile links, websites.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::model::ContactInfo;

static EMAIL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[a-zA-Z0-9._%+\-]+@[a-zA-Z0-9.\-]+\.[a-zA-Z]{2,}").expect("valid regex")
});

// +1-234-567-8901, (234) 567-8901, 234.567.8901, +91 98765 43210, 9876543210
static PHONE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?:\+?\d{1,3}[ \t\-.]?)?\(?\d{2,4}\)?[ \t\-.]?\d{3,5}[ \t\-.]?\d{3,5}")
        .expect("valid regex")
});

static LINKEDIN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)(?:https?://)?(?:www\.)?linkedin\.com/in/[a-zA-Z0-9\-_%]+/?")
        .expect("valid regex")
});

static GITHUB: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)(?:https?://)?(?:www\.)?github\.com/[a-zA-Z0-9\-_]+/?").expect("valid regex")
});

static WEBSITE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)https?://[a-zA-Z0-9\-]+(?:\.[a-zA-Z0-9\-]+)+(?:/[^\s]*)?")
        .expect("valid regex")
});

/// Digit count bounds for a plausible phone number.
const MIN_PHONE_DIGITS: usize = 7;
const MAX_PHONE_DIGITS: usize = 15;

/// Extract contact details from the top of a resume.
///
/// Never fails; anything not found is left empty.
pub fn extract_contact(text: &str) -> ContactInfo {
    let mut contact = ContactInfo::default();

    for m in EMAIL.find_iter(text) {
        contact.emails.insert(m.as_str());
    }

    for m in PHONE.find_iter(text) {
        if is_valid_phone(m.as_str()) {
            contact.phones.insert(normalize_phone(m.as_str()));
        }
    }

    contact.linkedin = LINKEDIN.find(text).map(|m| with_scheme(m.as_str()));
    contact.github = GITHUB.find(text).map(|m| with_scheme(m.as_str()));

    for m in WEBSITE.find_iter(text) {
        let lower = m.as_str().to_lowercase();
        if !lower.contains("linkedin.com") && !lower.contains("github.com") {
            contact.websites.insert(m.as_str());
        }
    }

    contact
}

/// Reject date ranges, zip codes and other short digit runs.
fn is_valid_phone(candidate: &str) -> bool {
    let digits = candidate.chars().filter(char::is_ascii_digit).count();
    (MIN_PHONE_DIGITS..=MAX_PHONE_DIGITS).contains(&digits) && !is_year_sequence(candidate)
}

/// "2019 2021-2023": every digit group is a 19xx/20xx year.
fn is_year_sequence(candidate: &str) -> bool {
    candidate
        .split(|c: char| !c.is_ascii_digit())
        .filter(|group| !group.is_empty())
        .all(|group| group.len() == 4 && (group.starts_with("19") || group.starts_with("20")))
}

/// Keep digits and `+`; prefix `+` on bare numbers of 11 or more digits.
pub fn normalize_phone(raw: &str) -> String {
    let digits: String = raw
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '+')
        .collect();

    if digits.starts_with('+') || digits.len() <= 10 {
        digits
    } else {
        format!("+{}", digits)
    }
}

fn with_scheme(url: &str) -> String {
    if url.starts_with("http") {
        url.to_string()
    } else {
        format!("https://{}", url)
    }
}
