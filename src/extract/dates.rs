//! Date-range, single-date and GPA patterns shared by the history parsers.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::model::DateRange;

const MONTH: &str = r"(?:Jan(?:uary)?|Feb(?:ruary)?|Mar(?:ch)?|Apr(?:il)?|May|Jun(?:e)?|Jul(?:y)?|Aug(?:ust)?|Sep(?:t(?:ember)?)?|Oct(?:ober)?|Nov(?:ember)?|Dec(?:ember)?)";

/// "Jan 2020 - Present", "March 2019 – Dec 2021", "2018 to 2022"
pub static DATE_RANGE: Lazy<Regex> = Lazy::new(|| {
    let point = format!(r"\b{MONTH}[\s,]*\d{{4}}\b|\b\d{{4}}\b");
    Regex::new(&format!(
        r"(?i)({point})\s*(?:[-\x{{2013}}\x{{2014}}]+|to)\s*({point}|\bpresent\b|\bcurrent\b|\bnow\b|\bongoing\b)"
    ))
    .expect("valid date range regex")
});

/// "May 2023" or "2023"
pub static SINGLE_DATE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(r"(?i)\b{MONTH}[\s,]*\d{{4}}\b|\b\d{{4}}\b")).expect("valid date regex")
});

/// Whole-string form of [`SINGLE_DATE`].
static SINGLE_DATE_EXACT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(r"(?i)^(?:{MONTH}[\s,]*\d{{4}}|\d{{4}})$")).expect("valid date regex")
});

/// "GPA: 3.8/4.0", "CGPA 9.2 / 10", "3.85 GPA". A decimal point is required.
static GPA: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)(?:(?:C?GPA|Grade)\s*:?\s*(\d+\.\d+)\s*(?:/\s*\d+\.?\d*)?|(\d+\.\d+)\s*(?:/\s*\d+\.?\d*)?\s*(?:C?GPA|Grade))",
    )
    .expect("valid gpa regex")
});

/// First date range in `text`.
pub fn find_date_range(text: &str) -> Option<DateRange> {
    DATE_RANGE.captures(text).map(|caps| DateRange {
        start_date: caps[1].trim().to_string(),
        end_date: caps[2].trim().to_string(),
    })
}

pub fn has_date_range(text: &str) -> bool {
    DATE_RANGE.is_match(text)
}

/// Character offset of the first date range, if any.
pub fn date_range_offset(text: &str) -> Option<usize> {
    DATE_RANGE
        .find(text)
        .map(|m| text[..m.start()].chars().count())
}

/// Byte offset of the first date range, if any.
pub fn date_range_start(text: &str) -> Option<usize> {
    DATE_RANGE.find(text).map(|m| m.start())
}

pub fn strip_date_ranges(text: &str) -> String {
    DATE_RANGE.replace_all(text, "").trim().to_string()
}

pub fn strip_single_dates(text: &str) -> String {
    SINGLE_DATE.replace_all(text, "").trim().to_string()
}

pub fn is_single_date(text: &str) -> bool {
    SINGLE_DATE_EXACT.is_match(text.trim())
}

/// GPA value (without scale) from the first GPA mention.
pub fn find_gpa(text: &str) -> Option<String> {
    GPA.captures(text).and_then(|caps| {
        caps.get(1)
            .or_else(|| caps.get(2))
            .map(|m| m.as_str().to_string())
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_month_year_range() {
        let range = find_date_range("Senior Engineer  Jan 2020 - Present").unwrap();
        assert_eq!(range.start_date, "Jan 2020");
        assert_eq!(range.end_date, "Present");

        let range = find_date_range("March, 2019 \u{2013} Dec 2021").unwrap();
        assert_eq!(range.start_date, "March, 2019");
        assert_eq!(range.end_date, "Dec 2021");
    }

    #[test]
    fn test_year_ranges() {
        let range = find_date_range("B.S. Computer Science  2016 - 2020").unwrap();
        assert_eq!((range.start_date.as_str(), range.end_date.as_str()), ("2016", "2020"));

        let range = find_date_range("2018 to 2022").unwrap();
        assert_eq!(range.end_date, "2022");

        let range = find_date_range("2021-ongoing").unwrap();
        assert_eq!(range.end_date, "ongoing");
    }

    #[test]
    fn test_no_range() {
        assert!(find_date_range("Acme Corp").is_none());
        assert!(find_date_range("Summary 2019").is_none());
        assert!(!has_date_range("Phone 4155550100"));
    }

    #[test]
    fn test_offsets() {
        assert_eq!(date_range_offset("Engineer Jan 2020 - Now"), Some(9));
        assert_eq!(date_range_start("2019 - 2020 Intern"), Some(0));
    }

    #[test]
    fn test_strip_dates() {
        assert_eq!(strip_date_ranges("Acme Corp  Jan 2016 - Mar 2018"), "Acme Corp");
        assert_eq!(strip_single_dates("Engineer, May 2023"), "Engineer,");
        assert!(is_single_date("Sept 2021"));
        assert!(is_single_date("2021"));
        assert!(!is_single_date("Acme 2021"));
    }

    #[test]
    fn test_gpa() {
        assert_eq!(find_gpa("GPA: 3.8/4.0").as_deref(), Some("3.8"));
        assert_eq!(find_gpa("CGPA 9.2 / 10").as_deref(), Some("9.2"));
        assert_eq!(find_gpa("graduated with 3.85 GPA").as_deref(), Some("3.85"));
        assert_eq!(find_gpa("Class of 2016"), None);
    }
}
