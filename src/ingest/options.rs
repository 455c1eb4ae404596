//! Extraction options and layout thresholds.

/// Thresholds for column detection and line grouping on PDF pages.
///
/// All distances are in PDF user-space units (1/72 inch).
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutConfig {
    /// A gutter must be wider than this to split a page into columns
    pub gutter_min_width: f32,

    /// Each column must hold more than this share of the page's words
    pub min_column_share: f32,

    /// Left edge of the gutter search band, as a fraction of page width
    pub search_band_start: f32,

    /// Right edge of the gutter search band, as a fraction of page width
    pub search_band_end: f32,

    /// Words whose tops differ by less than this share a line
    pub line_tolerance: f32,

    /// Fragments on one baseline closer than this are merged into a word
    pub merge_tolerance: f32,
}

impl LayoutConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the minimum gutter width.
    pub fn with_gutter_min_width(mut self, width: f32) -> Self {
        self.gutter_min_width = width;
        self
    }

    /// Set the minimum share of words per column.
    pub fn with_min_column_share(mut self, share: f32) -> Self {
        self.min_column_share = share;
        self
    }

    /// Set the gutter search band as fractions of the page width.
    pub fn with_search_band(mut self, start: f32, end: f32) -> Self {
        self.search_band_start = start;
        self.search_band_end = end;
        self
    }

    /// Set the line grouping tolerance.
    pub fn with_line_tolerance(mut self, tolerance: f32) -> Self {
        self.line_tolerance = tolerance;
        self
    }

    /// Set the fragment merge tolerance.
    pub fn with_merge_tolerance(mut self, tolerance: f32) -> Self {
        self.merge_tolerance = tolerance;
        self
    }
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            gutter_min_width: 15.0,
            min_column_share: 0.10,
            search_band_start: 0.2,
            search_band_end: 0.8,
            line_tolerance: 3.0,
            merge_tolerance: 1.5,
        }
    }
}

/// Error handling mode during extraction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ErrorMode {
    /// Fail on any error
    #[default]
    Strict,
    /// Skip unreadable pages and continue
    Lenient,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout_config_builder() {
        let config = LayoutConfig::new()
            .with_gutter_min_width(20.0)
            .with_min_column_share(0.25)
            .with_search_band(0.3, 0.7)
            .with_line_tolerance(2.0);

        assert_eq!(config.gutter_min_width, 20.0);
        assert_eq!(config.min_column_share, 0.25);
        assert_eq!((config.search_band_start, config.search_band_end), (0.3, 0.7));
        assert_eq!(config.line_tolerance, 2.0);
        assert_eq!(config.merge_tolerance, 1.5);
    }

    #[test]
    fn test_default_layout_config() {
        let config = LayoutConfig::default();
        assert_eq!(config.gutter_min_width, 15.0);
        assert_eq!(config.min_column_share, 0.10);
        assert_eq!(config.line_tolerance, 3.0);
        assert_eq!(ErrorMode::default(), ErrorMode::Strict);
    }
}
