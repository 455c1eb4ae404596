//! Reading-order reconstruction for positioned words.
//!
//! Resumes are often laid out in two columns. A page is split at the widest
//! empty vertical band (gutter) in its middle region when both sides carry a
//! meaningful share of the words; each column is then read top to bottom,
//! left column first.

use std::cmp::Ordering;

use super::options::LayoutConfig;

/// A word with its horizontal extent and distance from the page top.
#[derive(Debug, Clone, PartialEq)]
pub struct Word {
    pub text: String,
    /// Left edge
    pub x0: f32,
    /// Right edge
    pub x1: f32,
    /// Top edge, measured downwards from the top of the page
    pub top: f32,
}

impl Word {
    pub fn new(text: impl Into<String>, x0: f32, x1: f32, top: f32) -> Self {
        Self {
            text: text.into(),
            x0,
            x1,
            top,
        }
    }

    fn center(&self) -> f32 {
        (self.x0 + self.x1) / 2.0
    }
}

/// Find the x coordinate to split a page at, if it has a column gutter.
///
/// Builds a 1-unit occupancy histogram of word spans and returns the center
/// of the widest empty run inside the search band, provided the run is
/// preceded by text and is wider than `gutter_min_width`. A run still open at
/// the end of the band is not bounded by text on the right and is ignored.
pub fn find_column_split(words: &[Word], page_width: f32, config: &LayoutConfig) -> Option<f32> {
    if words.is_empty() || page_width <= 0.0 {
        return None;
    }

    let width = page_width as usize;
    let mut density = vec![0u32; width + 1];
    for word in words {
        let start = word.x0.max(0.0) as usize;
        let end = (word.x1.max(0.0) as usize).min(width);
        for slot in density.iter_mut().take(end + 1).skip(start) {
            *slot += 1;
        }
    }

    let search_start = ((page_width * config.search_band_start) as usize).min(width);
    let search_end = ((page_width * config.search_band_end) as usize).min(width);

    // Text left of the band counts as occupancy, so a narrow sidebar ending
    // before the band still opens a gutter at the band start.
    let mut occupied_left = density[..search_start].iter().any(|&d| d > 0);
    let mut current: Option<usize> = None;
    let mut best_start = 0;
    let mut best_width = 0;

    for (x, &d) in density.iter().enumerate().take(search_end).skip(search_start) {
        if d == 0 {
            if current.is_none() && occupied_left {
                current = Some(x);
            }
        } else {
            if let Some(start) = current.take() {
                if x - start > best_width {
                    best_width = x - start;
                    best_start = start;
                }
            }
            occupied_left = true;
        }
    }

    if best_width as f32 > config.gutter_min_width {
        let split = best_start as f32 + best_width as f32 / 2.0;
        log::debug!("column gutter {} units wide, split at x={:.1}", best_width, split);
        Some(split)
    } else {
        None
    }
}

/// Split a page's words into reading-order columns.
///
/// Returns one group for a single-column page, or the left and right columns.
/// Words straddling the split go to the side holding their center.
pub fn split_columns(words: Vec<Word>, page_width: f32, config: &LayoutConfig) -> Vec<Vec<Word>> {
    let Some(split) = find_column_split(&words, page_width, config) else {
        return vec![words];
    };

    let total = words.len() as f32;
    let (left, right): (Vec<Word>, Vec<Word>) = words.iter().cloned().partition(|w| {
        if w.x1 <= split {
            true
        } else if w.x0 > split {
            false
        } else {
            w.center() <= split
        }
    });

    let min_words = config.min_column_share * total;
    if left.len() as f32 > min_words && right.len() as f32 > min_words {
        log::debug!("two columns: {} / {} words", left.len(), right.len());
        vec![left, right]
    } else {
        log::debug!(
            "gutter rejected: {} / {} words below {:.0}% share",
            left.len(),
            right.len(),
            config.min_column_share * 100.0
        );
        vec![words]
    }
}

/// Group words into text lines, top to bottom.
///
/// A word joins the current line when its top is within `tolerance` of the
/// line's first word. Words within a line are ordered left to right.
pub fn format_lines(mut words: Vec<Word>, tolerance: f32) -> String {
    words.sort_by(|a, b| {
        a.top
            .partial_cmp(&b.top)
            .unwrap_or(Ordering::Equal)
            .then(a.x0.partial_cmp(&b.x0).unwrap_or(Ordering::Equal))
    });

    let mut lines: Vec<String> = Vec::new();
    let mut current: Vec<Word> = Vec::new();
    let mut line_top = 0.0;

    for word in words {
        if !current.is_empty() && (word.top - line_top).abs() >= tolerance {
            lines.push(join_line(std::mem::take(&mut current)));
        }
        if current.is_empty() {
            line_top = word.top;
        }
        current.push(word);
    }
    if !current.is_empty() {
        lines.push(join_line(current));
    }

    lines.join("\n")
}

fn join_line(mut words: Vec<Word>) -> String {
    words.sort_by(|a, b| a.x0.partial_cmp(&b.x0).unwrap_or(Ordering::Equal));
    words
        .iter()
        .map(|w| w.text.as_str())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Text of one page in reading order.
pub fn page_text(words: Vec<Word>, page_width: f32, config: &LayoutConfig) -> String {
    split_columns(words, page_width, config)
        .into_iter()
        .map(|column| format_lines(column, config.line_tolerance))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE_WIDTH: f32 = 612.0;

    fn two_column_words() -> Vec<Word> {
        let mut words = Vec::new();
        for i in 0..6 {
            let top = 100.0 + i as f32 * 14.0;
            words.push(Word::new(format!("left{}", i), 50.0, 120.0, top));
            words.push(Word::new("text", 125.0, 250.0, top));
            words.push(Word::new(format!("right{}", i), 320.0, 400.0, top));
            words.push(Word::new("more", 405.0, 550.0, top));
        }
        words
    }

    #[test]
    fn test_two_columns_detected() {
        let config = LayoutConfig::default();
        let split = find_column_split(&two_column_words(), PAGE_WIDTH, &config).unwrap();
        assert!(split > 250.0 && split < 320.0, "split at {}", split);

        let text = page_text(two_column_words(), PAGE_WIDTH, &config);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 12);
        assert_eq!(lines[0], "left0 text");
        assert_eq!(lines[5], "left5 text");
        assert_eq!(lines[6], "right0 more");
    }

    #[test]
    fn test_single_column_never_split() {
        let words: Vec<Word> = (0..10)
            .flat_map(|i| {
                let top = 72.0 + i as f32 * 14.0;
                vec![
                    Word::new("A", 72.0, 200.0, top),
                    Word::new("long", 204.0, 400.0, top),
                    Word::new("line", 404.0, 540.0, top),
                ]
            })
            .collect();
        let config = LayoutConfig::default();
        assert_eq!(find_column_split(&words, PAGE_WIDTH, &config), None);
        assert_eq!(split_columns(words, PAGE_WIDTH, &config).len(), 1);
    }

    #[test]
    fn test_narrow_gutter_ignored() {
        let words = vec![
            Word::new("left", 60.0, 300.0, 100.0),
            Word::new("right", 310.0, 540.0, 100.0),
        ];
        assert_eq!(
            find_column_split(&words, PAGE_WIDTH, &LayoutConfig::default()),
            None
        );
    }

    #[test]
    fn test_leading_margin_is_not_a_gutter() {
        let words = vec![
            Word::new("indented", 200.0, 350.0, 100.0),
            Word::new("text", 354.0, 520.0, 100.0),
        ];
        assert_eq!(
            find_column_split(&words, PAGE_WIDTH, &LayoutConfig::default()),
            None
        );
    }

    #[test]
    fn test_narrow_sidebar_opens_gutter_at_band_start() {
        let mut words = Vec::new();
        for i in 0..4 {
            let top = 100.0 + i as f32 * 14.0;
            words.push(Word::new(format!("side{}", i), 40.0, 110.0, top));
            words.push(Word::new(format!("main{}", i), 300.0, 560.0, top));
        }

        let config = LayoutConfig::default();
        // empty from x=111; the band starts at 122 and the run ends at 300
        assert_eq!(find_column_split(&words, PAGE_WIDTH, &config), Some(211.0));

        let columns = split_columns(words, PAGE_WIDTH, &config);
        assert_eq!(columns.len(), 2);
        assert!(columns[0].iter().all(|w| w.text.starts_with("side")));
    }

    #[test]
    fn test_lopsided_split_rejected() {
        let mut words: Vec<Word> = (0..20)
            .map(|i| Word::new(format!("w{}", i), 50.0, 250.0, 100.0 + i as f32 * 14.0))
            .collect();
        words.push(Word::new("lonely", 400.0, 450.0, 100.0));

        let config = LayoutConfig::default();
        assert!(find_column_split(&words, PAGE_WIDTH, &config).is_some());
        assert_eq!(split_columns(words, PAGE_WIDTH, &config).len(), 1);
    }

    #[test]
    fn test_format_lines_groups_by_top() {
        let words = vec![
            Word::new("Doe", 110.0, 140.0, 101.5),
            Word::new("Jane", 72.0, 105.0, 100.0),
            Word::new("Engineer", 72.0, 130.0, 103.0),
            Word::new("Acme", 72.0, 110.0, 115.0),
        ];
        assert_eq!(format_lines(words, 3.0), "Jane Doe\nEngineer\nAcme");
    }

    #[test]
    fn test_empty_page() {
        assert_eq!(page_text(Vec::new(), PAGE_WIDTH, &LayoutConfig::default()), "");
    }
}
