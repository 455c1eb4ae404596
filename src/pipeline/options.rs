//! Parsing options and configuration.

use crate::ingest::{ErrorMode, LayoutConfig};

/// Characters of normalized text always fed to the contact extractor.
pub const DEFAULT_CONTACT_WINDOW: usize = 800;

/// Characters kept per section in `raw_sections`.
pub const DEFAULT_PREVIEW_LIMIT: usize = 200;

/// Options for parsing resumes.
#[derive(Debug, Clone)]
pub struct ParseOptions {
    /// PDF reading-order thresholds
    pub layout: LayoutConfig,

    /// Error handling mode for PDF pages
    pub error_mode: ErrorMode,

    /// Leading characters of the text added to the contact input
    pub contact_window: usize,

    /// Section preview length before truncation
    pub preview_limit: usize,

    /// Whether batches are parsed in parallel
    pub parallel: bool,
}

impl ParseOptions {
    /// Create new parse options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the layout thresholds.
    pub fn with_layout(mut self, layout: LayoutConfig) -> Self {
        self.layout = layout;
        self
    }

    /// Set error mode.
    pub fn with_error_mode(mut self, mode: ErrorMode) -> Self {
        self.error_mode = mode;
        self
    }

    /// Enable lenient mode (skip unreadable PDF pages).
    pub fn lenient(mut self) -> Self {
        self.error_mode = ErrorMode::Lenient;
        self
    }

    pub fn with_contact_window(mut self, chars: usize) -> Self {
        self.contact_window = chars;
        self
    }

    pub fn with_preview_limit(mut self, chars: usize) -> Self {
        self.preview_limit = chars;
        self
    }

    /// Enable or disable parallel processing.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Disable parallel processing.
    pub fn sequential(mut self) -> Self {
        self.parallel = false;
        self
    }
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            layout: LayoutConfig::default(),
            error_mode: ErrorMode::Strict,
            contact_window: DEFAULT_CONTACT_WINDOW,
            preview_limit: DEFAULT_PREVIEW_LIMIT,
            parallel: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_options_builder() {
        let options = ParseOptions::new()
            .lenient()
            .with_contact_window(400)
            .with_preview_limit(50)
            .sequential();

        assert_eq!(options.error_mode, ErrorMode::Lenient);
        assert_eq!(options.contact_window, 400);
        assert_eq!(options.preview_limit, 50);
        assert!(!options.parallel);
    }

    #[test]
    fn test_parse_options_defaults() {
        let options = ParseOptions::default();
        assert_eq!(options.error_mode, ErrorMode::Strict);
        assert_eq!(options.contact_window, 800);
        assert_eq!(options.preview_limit, 200);
        assert!(options.parallel);
        assert_eq!(options.layout.gutter_min_width, 15.0);
    }
}
