//! Rendering parsed resumes to output formats.

mod json;

pub use json::{batch_to_json, to_json, JsonFormat};
