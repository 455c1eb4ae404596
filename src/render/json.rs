//! JSON rendering for parsed resumes.

use serde::Serialize;

use crate::error::{Error, Result};
use crate::model::ParsedResume;
use crate::pipeline::BatchItem;

/// JSON output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JsonFormat {
    /// Pretty-printed JSON with indentation
    #[default]
    Pretty,
    /// Compact JSON without extra whitespace
    Compact,
}

/// Convert a parsed resume to JSON.
pub fn to_json(resume: &ParsedResume, format: JsonFormat) -> Result<String> {
    serialize(resume, format)
}

/// Convert batch results to a JSON array, in input order.
pub fn batch_to_json(items: &[BatchItem], format: JsonFormat) -> Result<String> {
    serialize(items, format)
}

fn serialize<T: Serialize + ?Sized>(value: &T, format: JsonFormat) -> Result<String> {
    let result = match format {
        JsonFormat::Pretty => serde_json::to_string_pretty(value),
        JsonFormat::Compact => serde_json::to_string(value),
    };

    result.map_err(|e| Error::Render(format!("JSON serialization error: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resume() -> ParsedResume {
        ParsedResume {
            file: "jane.pdf".to_string(),
            candidate_name: Some("Jane Doe".to_string()),
            ..ParsedResume::default()
        }
    }

    #[test]
    fn test_to_json_pretty() {
        let json = to_json(&resume(), JsonFormat::Pretty).unwrap();
        assert!(json.contains("\"candidate_name\": \"Jane Doe\""));
        assert!(json.contains('\n')); // Pretty has newlines
    }

    #[test]
    fn test_to_json_compact() {
        let json = to_json(&resume(), JsonFormat::Compact).unwrap();
        assert!(!json.contains('\n')); // Compact has no newlines
        assert!(json.starts_with("{\"file\":\"jane.pdf\""));
    }

    #[test]
    fn test_batch_to_json_shapes() {
        let items = vec![
            BatchItem::Parsed(resume()),
            BatchItem::Failed {
                file: "cv.rtf".to_string(),
                error: "Unsupported file format 'rtf'".to_string(),
            },
        ];
        let json = batch_to_json(&items, JsonFormat::Compact).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value[0]["candidate_name"], "Jane Doe");
        assert_eq!(value[1]["file"], "cv.rtf");
        assert!(value[1].get("candidate_name").is_none());
    }
}
