//! Text normalization applied to every extracted document.
//!
//! PDF and DOCX extraction leave ligatures, decorative glyphs, letter-spaced
//! headings and page furniture in the text. [`TextNormalizer::clean`] turns
//! that into plain ASCII lines the section and field extractors can rely on.

use once_cell::sync::Lazy;
use regex::Regex;
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

const LIGATURES: &[(char, &str)] = &[
    ('\u{FB00}', "ff"),  // ﬀ
    ('\u{FB01}', "fi"),  // ﬁ
    ('\u{FB02}', "fl"),  // ﬂ
    ('\u{FB03}', "ffi"), // ﬃ
    ('\u{FB04}', "ffl"), // ﬄ
    ('\u{FB05}', "ft"),  // ﬅ
    ('\u{FB06}', "st"),  // ﬆ
];

/// Skill-rating and decorative glyphs (filled/hollow circles, stars, squares, checks).
const RATING_GLYPHS: &[char] = &[
    '\u{25CF}', '\u{25CB}', '\u{2605}', '\u{2606}', '\u{25AA}', '\u{25AB}', '\u{2B24}',
    '\u{25EF}', '\u{25C6}', '\u{25C7}', '\u{2713}', '\u{2714}', '\u{25CE}', '\u{25D0}',
    '\u{25D1}',
];

/// Bullet glyphs that start a new line. U+F0B7/U+F0A7 are Symbol-font bullets.
const BULLET_GLYPHS: &[char] = &[
    '\u{2022}', '\u{2023}', '\u{25E6}', '\u{2043}', '\u{00B7}', '\u{F0B7}', '\u{F0A7}',
];

const QUOTES_AND_DASHES: &[(char, char)] = &[
    ('\u{2018}', '\''),
    ('\u{2019}', '\''),
    ('\u{201A}', '\''),
    ('\u{201C}', '"'),
    ('\u{201D}', '"'),
    ('\u{201E}', '"'),
    ('\u{00B4}', '\''),
    ('\u{2010}', '-'),
    ('\u{2011}', '-'),
    ('\u{2012}', '-'),
    ('\u{2013}', '-'),
    ('\u{2014}', '-'),
    ('\u{2212}', '-'),
];

/// Runs of separator characters, including every dash glyph later mapped to `-`.
static SEPARATOR_RUN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[-_.=\x{2010}-\x{2014}\x{2212}]{3,}").expect("valid regex")
});
static SPACE_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r" {3,}").expect("valid regex"));
static PAGE_NUMBER_LINE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^[ \t]*\d{1,2}[ \t]*$").expect("valid regex"));
static BOILERPLATE_LINE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?im)^[ \t]*(?:page[ \t]*\d+.*|confidential.*|resume[ \t]*of[ \t]*.*|curriculum[ \t]*vitae.*)$",
    )
    .expect("valid regex")
});
static BLANK_LINES: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n\s*\n").expect("valid regex"));

/// Normalizes raw extracted text.
///
/// The transformation is total and idempotent on realistic input:
/// `clean(clean(t)) == clean(t)`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TextNormalizer;

impl TextNormalizer {
    pub fn new() -> Self {
        Self
    }

    /// Run the full normalization sequence.
    pub fn clean(&self, text: &str) -> String {
        // Stage 1: ligatures, line endings, composition
        let mut result = resolve_ligatures(text);
        result = result.nfc().collect();

        // Stage 2: separators and rating glyphs
        result = SEPARATOR_RUN.replace_all(&result, " ").into_owned();
        result = replace_chars(&result, RATING_GLYPHS, ' ');

        // Stage 3: characters outside ASCII and Latin-1
        result = drop_foreign_runs(&result);

        // Stage 4: "J o h n" -> "John"
        result = join_spaced_letters(&result);

        // Stage 5: bullets become line breaks
        result = replace_chars(&result, BULLET_GLYPHS, '\n');

        // Stage 6: typographic quotes and dashes
        result = result
            .chars()
            .map(|c| {
                QUOTES_AND_DASHES
                    .iter()
                    .find(|(from, _)| *from == c)
                    .map(|(_, to)| *to)
                    .unwrap_or(c)
            })
            .collect();

        // Stage 7: everything left must be ASCII. Dropped glyphs and spacing
        // accents can leave separator runs or spaced letters behind.
        if !result.is_ascii() {
            result = to_ascii(&result);
            result = SEPARATOR_RUN.replace_all(&result, " ").into_owned();
            result = join_spaced_letters(&result);
        }

        // Stage 8: whitespace
        result = result.replace('\t', "  ");
        result = SPACE_RUN.replace_all(&result, "  ").into_owned();

        // Stage 9: page furniture
        result = PAGE_NUMBER_LINE.replace_all(&result, "").into_owned();
        result = BOILERPLATE_LINE.replace_all(&result, "").into_owned();

        // Stage 10: blank lines
        result = BLANK_LINES.replace_all(&result, "\n\n").into_owned();

        result.trim().to_string()
    }
}

/// Normalize text with the default normalizer.
pub fn clean(text: &str) -> String {
    TextNormalizer::new().clean(text)
}

fn resolve_ligatures(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '\r' => {
                if chars.peek() == Some(&'\n') {
                    chars.next();
                }
                out.push('\n');
            }
            '\u{000C}' => out.push('\n'),
            _ => match LIGATURES.iter().find(|(lig, _)| *lig == c) {
                Some((_, expansion)) => out.push_str(expansion),
                None => out.push(c),
            },
        }
    }
    out
}

fn replace_chars(text: &str, targets: &[char], replacement: char) -> String {
    text.chars()
        .map(|c| if targets.contains(&c) { replacement } else { c })
        .collect()
}

/// Glyphs stage 3 must leave for the bullet and quote/dash stages.
fn is_translated_later(c: char) -> bool {
    BULLET_GLYPHS.contains(&c) || QUOTES_AND_DASHES.iter().any(|(from, _)| *from == c)
}

fn drop_foreign_runs(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut in_run = false;
    for c in text.chars() {
        let keep = (c as u32) <= 0xFF || c.is_whitespace() || is_translated_later(c);
        if keep {
            out.push(c);
            in_run = false;
        } else if !in_run {
            out.push(' ');
            in_run = true;
        }
    }
    out
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// Remove a single space between two isolated word characters.
fn join_spaced_letters(text: &str) -> String {
    let chars: Vec<char> = text.chars().collect();
    let isolated = |i: usize| -> bool {
        is_word_char(chars[i])
            && (i == 0 || !is_word_char(chars[i - 1]))
            && (i + 1 >= chars.len() || !is_word_char(chars[i + 1]))
    };

    let mut out = String::with_capacity(text.len());
    for (i, &c) in chars.iter().enumerate() {
        if c == ' ' && i > 0 && i + 1 < chars.len() && isolated(i - 1) && isolated(i + 1) {
            continue;
        }
        out.push(c);
    }
    out
}

/// Transliterate accented Latin-1 letters and strip any remaining non-ASCII.
fn to_ascii(text: &str) -> String {
    if text.is_ascii() {
        return text.to_string();
    }
    text.nfkd()
        .filter(|c| c.is_ascii() && !is_combining_mark(*c))
        .collect()
}
