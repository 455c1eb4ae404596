//! Candidate name, organization, degree and institution detection.
//!
//! Detection runs through an [`EntityStrategy`]. The heuristic strategy is
//! always available; when an [`EntityRecognizer`] is supplied the
//! [`RecognizerStrategy`] consults it first and falls back to heuristics.

use std::fmt;
use std::sync::Arc;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::model::{OrderedSet, Section, SectionMap};

/// Degree titles: full names, dotted abbreviations and common fields of study.
pub static DEGREE: Lazy<Regex> = Lazy::new(|| {
    const PATTERNS: &[&str] = &[
        r"(?:Bachelor|Master|Doctor)(?:'?s)?(?:\s+of\s+\w+(?:\s+\w+)?)?",
        // dots are required so "Be", "Ma" and "Ms" never match
        r"B\.\s?(?:Tech|Eng|Sc|A|S|Com|Ed|Arch|Des|Pharm)",
        r"M\.\s?(?:Tech|Eng|Sc|A|S|Com|Ed|BA|Phil|Des|Pharm)",
        r"B\.E\.",
        r"M\.E\.",
        r"B\.?B\.?A\.?",
        r"M\.?B\.?A\.?",
        r"B\.?C\.?A\.?",
        r"M\.?C\.?A\.?",
        r"Ph\.?\s?D\.?",
        r"Diploma(?:\s+in\s+\w+(?:\s+\w+)?)?",
        r"Associate(?:'?s)?(?:\s+(?:of|in)\s+\w+(?:\s+\w+)?)?",
        r"(?:Computer Science|Information Technology|Electrical Engineering|Mechanical Engineering|Civil Engineering|Chemical Engineering|Electronics|Data Science|Artificial Intelligence|Business Administration|Commerce|Economics|Mathematics|Physics|Chemistry|Biology|Liberal Arts|Fine Arts|Communications)",
    ];
    let alternation = PATTERNS
        .iter()
        .map(|p| format!("(?:{})", p))
        .collect::<Vec<_>>()
        .join("|");
    Regex::new(&format!("(?i){}", alternation)).expect("valid degree regex")
});

/// Lowercase substrings that mark a line as naming an institution.
pub const UNIVERSITY_INDICATORS: &[&str] = &[
    "university",
    "institute",
    "college",
    "school",
    "academy",
    "iit",
    "nit",
    "iiit",
    "bits",
    "mit",
    "stanford",
    "harvard",
    "polytechnic",
    "conservatory",
];

/// Lines containing any of these are never a candidate name.
const TITLE_KEYWORDS: &[&str] = &[
    "resume",
    "cv",
    "curriculum",
    "vitae",
    "objective",
    "summary",
    "address",
    "phone",
    "email",
    "experience",
    "education",
    "skills",
    "contact",
    "profile",
    "http",
    "www",
    "linkedin",
    "github",
    "@",
    "certification",
    "project",
];

const JOB_TITLE_INDICATORS: &[&str] = &[
    "engineer",
    "developer",
    "analyst",
    "scientist",
    "manager",
    "designer",
    "architect",
    "consultant",
    "intern",
    "lead",
    "director",
    "officer",
    "specialist",
    "coordinator",
    "administrator",
    "senior",
    "junior",
    "staff",
    "principal",
    "vp",
    "executive",
];

const KNOWN_COMPANIES: &[&str] = &[
    "Google",
    "Microsoft",
    "Amazon",
    "Apple",
    "Meta",
    "Facebook",
    "Netflix",
    "Tesla",
    "IBM",
    "Oracle",
    "Intel",
    "Adobe",
    "Salesforce",
    "SAP",
    "Uber",
    "Airbnb",
    "Twitter",
    "LinkedIn",
    "Spotify",
    "Snap",
    "Stripe",
    "Shopify",
    "Atlassian",
    "Infosys",
    "TCS",
    "Wipro",
    "HCL",
    "Cognizant",
    "Accenture",
    "Deloitte",
    "McKinsey",
    "BCG",
    "Goldman Sachs",
    "JPMorgan",
    "Morgan Stanley",
    "Cisco",
    "VMware",
    "Nvidia",
    "AMD",
    "Samsung",
    "Sony",
    "Huawei",
    "Qualcomm",
    "PayPal",
];

const COMPANY_SUFFIXES: &[&str] = &[
    "Inc",
    "Inc.",
    "LLC",
    "Ltd",
    "Ltd.",
    "Corp",
    "Corp.",
    "Corporation",
    "Company",
    "Co.",
    "Group",
    "Technologies",
    "Solutions",
    "Services",
    "Systems",
    "Consulting",
    "Labs",
    "Software",
    "Tech",
    "Digital",
    "Global",
    "Pvt",
    "Private",
    "Limited",
];

/// Characters of leading text handed to a recognizer for name detection.
const NAME_WINDOW: usize = 500;
const NAME_SCAN_LINES: usize = 10;
const MAX_ORGANIZATION_LEN: usize = 80;
const MAX_INSTITUTION_LEN: usize = 150;
const MIN_DEGREE_LEN: usize = 4;

static KNOWN_COMPANY_PATTERNS: Lazy<Vec<(&'static str, Regex)>> = Lazy::new(|| {
    KNOWN_COMPANIES
        .iter()
        .map(|company| {
            let pattern = format!(r"(?i)\b{}\b", regex::escape(company));
            (*company, Regex::new(&pattern).expect("valid company regex"))
        })
        .collect()
});

static SUFFIXED_COMPANY: Lazy<Regex> = Lazy::new(|| {
    let suffixes = COMPANY_SUFFIXES
        .iter()
        .map(|s| regex::escape(s))
        .collect::<Vec<_>>()
        .join("|");
    Regex::new(&format!(r"([A-Z][a-zA-Z &#]+)\s+(?:{})\b", suffixes))
        .expect("valid company suffix regex")
});

static NAME_LABEL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^(?:name|candidate name|full name)\b\s*:?\s*").expect("valid regex")
});
static INLINE_EMAIL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[\w.\-]+@[\w.\-]+\.\w+").expect("valid regex"));
static INLINE_URL: Lazy<Regex> = Lazy::new(|| Regex::new(r"https?://\S+").expect("valid regex"));
static PIPE_SEPARATOR: Lazy<Regex> = Lazy::new(|| Regex::new(r"\|\s+").expect("valid regex"));

/// Entity classes a recognizer can report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityLabel {
    Person,
    Organization,
    Other,
}

/// One span reported by a recognizer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecognizedEntity {
    pub label: EntityLabel,
    pub text: String,
}

impl RecognizedEntity {
    pub fn new(label: EntityLabel, text: impl Into<String>) -> Self {
        Self {
            label,
            text: text.into(),
        }
    }
}

/// A named-entity recognizer, such as a statistical NER model.
///
/// Implementations must be thread-safe; one instance is shared by every
/// document a parser processes.
pub trait EntityRecognizer: Send + Sync {
    /// Recognize entities in `text`, in document order.
    fn recognize(&self, text: &str) -> Vec<RecognizedEntity>;
}

/// Name and organization detection contract shared by all strategies.
pub trait EntityStrategy: Send + Sync {
    /// Strategy name for logging.
    fn name(&self) -> &'static str;

    /// The candidate's name, if one can be identified.
    fn candidate_name(&self, text: &str) -> Option<String>;

    /// Organizations mentioned anywhere in `text`.
    fn organizations(&self, text: &str) -> Vec<String>;

    /// Institution names found by the strategy itself, before the line scan.
    fn institutions(&self, _text: &str) -> Vec<String> {
        Vec::new()
    }
}

/// Keyword and pattern based detection. Needs no external model.
#[derive(Debug, Clone, Copy, Default)]
pub struct HeuristicStrategy;

impl EntityStrategy for HeuristicStrategy {
    fn name(&self) -> &'static str {
        "heuristic"
    }

    fn candidate_name(&self, text: &str) -> Option<String> {
        text.trim()
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .take(NAME_SCAN_LINES)
            .find_map(name_from_line)
    }

    fn organizations(&self, text: &str) -> Vec<String> {
        let mut orgs = OrderedSet::case_insensitive();

        for (company, pattern) in KNOWN_COMPANY_PATTERNS.iter() {
            if pattern.is_match(text) {
                orgs.insert(*company);
            }
        }

        // per line, so matches never span a line break
        for line in text.lines() {
            for m in SUFFIXED_COMPANY.find_iter(line) {
                let full = m.as_str().trim();
                if full.len() < MAX_ORGANIZATION_LEN {
                    orgs.insert(full);
                }
            }
        }

        orgs.into_vec()
    }
}

/// Recognizer-backed detection with heuristic fallback.
pub struct RecognizerStrategy {
    recognizer: Arc<dyn EntityRecognizer>,
    fallback: HeuristicStrategy,
}

impl RecognizerStrategy {
    pub fn new(recognizer: Arc<dyn EntityRecognizer>) -> Self {
        Self {
            recognizer,
            fallback: HeuristicStrategy,
        }
    }

    fn organization_spans(&self, text: &str) -> impl Iterator<Item = String> {
        self.recognizer
            .recognize(text)
            .into_iter()
            .filter(|e| e.label == EntityLabel::Organization)
            .map(|e| e.text.trim().to_string())
    }
}

impl fmt::Debug for RecognizerStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RecognizerStrategy").finish_non_exhaustive()
    }
}

impl EntityStrategy for RecognizerStrategy {
    fn name(&self) -> &'static str {
        "recognizer"
    }

    fn candidate_name(&self, text: &str) -> Option<String> {
        let window: String = text.chars().take(NAME_WINDOW).collect();
        self.recognizer
            .recognize(&window)
            .into_iter()
            .filter(|e| e.label == EntityLabel::Person)
            .map(|e| e.text.trim().to_string())
            .find(|name| is_plausible_person(name))
            .or_else(|| self.fallback.candidate_name(text))
    }

    fn organizations(&self, text: &str) -> Vec<String> {
        let mut orgs = OrderedSet::case_insensitive();
        for name in self.organization_spans(text) {
            if name.chars().count() > 1 {
                orgs.insert(name);
            }
        }

        if orgs.is_empty() {
            self.fallback.organizations(text)
        } else {
            orgs.into_vec()
        }
    }

    fn institutions(&self, text: &str) -> Vec<String> {
        self.organization_spans(text)
            .filter(|name| has_institution_indicator(name))
            .collect()
    }
}

/// Everything the entity stage reports for one document.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Entities {
    pub name: Option<String>,
    pub organizations: Vec<String>,
    pub degrees: Vec<String>,
    pub universities: Vec<String>,
}

/// Runs the selected [`EntityStrategy`] plus the pattern-only degree and
/// institution scans.
#[derive(Clone)]
pub struct EntityExtractor {
    strategy: Arc<dyn EntityStrategy>,
}

impl EntityExtractor {
    /// Pick the strategy once: recognizer-backed when one is available.
    pub fn detect(recognizer: Option<Arc<dyn EntityRecognizer>>) -> Self {
        let extractor = match recognizer {
            Some(recognizer) => Self::with_strategy(Arc::new(RecognizerStrategy::new(recognizer))),
            None => Self::heuristic(),
        };
        log::debug!("entity strategy: {}", extractor.strategy.name());
        extractor
    }

    pub fn heuristic() -> Self {
        Self::with_strategy(Arc::new(HeuristicStrategy))
    }

    pub fn with_strategy(strategy: Arc<dyn EntityStrategy>) -> Self {
        Self { strategy }
    }

    pub fn strategy_name(&self) -> &'static str {
        self.strategy.name()
    }

    /// Extract entities from the full normalized text.
    ///
    /// Degrees and institutions are read from the education section when
    /// it has content, otherwise from the whole text.
    pub fn extract(&self, text: &str, sections: &SectionMap) -> Entities {
        let education = sections.non_empty(Section::Education).unwrap_or(text);

        let mut candidates = self.strategy.institutions(education);
        candidates.extend(scan_institution_lines(education));

        Entities {
            name: self.strategy.candidate_name(text),
            organizations: self.strategy.organizations(text),
            degrees: extract_degrees(education),
            universities: reconcile_institutions(candidates),
        }
    }
}

impl Default for EntityExtractor {
    fn default() -> Self {
        Self::heuristic()
    }
}

impl fmt::Debug for EntityExtractor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EntityExtractor")
            .field("strategy", &self.strategy.name())
            .finish()
    }
}

/// Degree mentions of at least four characters, case-insensitively unique.
pub fn extract_degrees(text: &str) -> Vec<String> {
    let mut degrees = OrderedSet::case_insensitive();
    for m in DEGREE.find_iter(text) {
        let cleaned = m.as_str().trim();
        if cleaned.chars().count() >= MIN_DEGREE_LEN {
            degrees.insert(cleaned);
        }
    }
    degrees.into_vec()
}

pub fn has_institution_indicator(text: &str) -> bool {
    let lower = text.to_lowercase();
    UNIVERSITY_INDICATORS.iter().any(|ind| lower.contains(ind))
}

fn scan_institution_lines(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|line| line.chars().count() < MAX_INSTITUTION_LEN)
        .filter(|line| has_institution_indicator(line))
        .map(str::to_string)
        .collect()
}

/// Merge institution candidates in order.
///
/// A candidate contained in an already collected entry is dropped; collected
/// entries contained in a new candidate are evicted in its favour.
pub fn reconcile_institutions<I>(candidates: I) -> Vec<String>
where
    I: IntoIterator<Item = String>,
{
    let mut collected: Vec<String> = Vec::new();
    let mut seen = OrderedSet::case_insensitive();

    for candidate in candidates {
        if candidate.is_empty() || !seen.insert(candidate.as_str()) {
            continue;
        }
        let lower = candidate.to_lowercase();
        if collected.iter().any(|u| u.to_lowercase().contains(&lower)) {
            continue;
        }
        collected.retain(|u| !lower.contains(&u.to_lowercase()));
        collected.push(candidate);
    }

    collected
}

fn name_from_line(line: &str) -> Option<String> {
    if line.chars().count() < 3 {
        return None;
    }

    let line = NAME_LABEL.replace(line, "");
    let line = INLINE_EMAIL.replace_all(&line, "");
    let line = INLINE_URL.replace_all(&line, "");
    let line = PIPE_SEPARATOR.replace_all(&line, " ");
    let candidate = line.trim();

    if candidate.chars().count() < 3 {
        return None;
    }

    let lower = candidate.to_lowercase();
    if TITLE_KEYWORDS.iter().any(|kw| lower.contains(kw)) {
        return None;
    }

    let words: Vec<&str> = candidate.split_whitespace().collect();
    if !(2..=5).contains(&words.len()) || !words.iter().all(|w| is_name_word(w)) {
        return None;
    }
    if JOB_TITLE_INDICATORS.iter().any(|jt| lower.contains(jt)) {
        return None;
    }
    if candidate.chars().any(|c| c.is_ascii_digit()) {
        return None;
    }

    Some(candidate.to_string())
}

/// Capitalized (or at most two characters) and alphabetic apart from `.-'`.
fn is_name_word(word: &str) -> bool {
    let capitalized = word.chars().next().map_or(false, char::is_uppercase);
    (capitalized || word.chars().count() <= 2) && is_alphabetic_ignoring(word, &['.', '-', '\''])
}

fn is_plausible_person(name: &str) -> bool {
    let words: Vec<&str> = name.split_whitespace().collect();
    (1..=5).contains(&words.len()) && words.iter().all(|w| is_alphabetic_ignoring(w, &['.', '-']))
}

fn is_alphabetic_ignoring(word: &str, ignored: &[char]) -> bool {
    let mut letters = word.chars().filter(|c| !ignored.contains(c)).peekable();
    letters.peek().is_some() && letters.all(char::is_alphabetic)
}
