//! Input document as handed to the ingestor.

use std::fs;
use std::path::Path;

use crate::detect::DocumentFormat;
use crate::error::{Error, Result};

/// Bytes of one input file with its declared format.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawDocument {
    /// File contents
    pub bytes: Vec<u8>,
    /// Format declared by the file extension
    pub format: DocumentFormat,
    /// File name, without directories
    pub name: String,
}

impl RawDocument {
    pub fn new(bytes: Vec<u8>, format: DocumentFormat, name: impl Into<String>) -> Self {
        Self {
            bytes,
            format,
            name: name.into(),
        }
    }

    /// Read a document from disk.
    ///
    /// The path must exist and carry a supported extension; the extension is
    /// checked before the file is read.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(Error::SourceNotFound(path.to_path_buf()));
        }
        let format = DocumentFormat::from_path(path)?;
        let bytes = fs::read(path)?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        Ok(Self::new(bytes, format, name))
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}
