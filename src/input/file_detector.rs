//! Document format detection

use crate::error::{Result, ResumeTailorError};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Closed set of document formats the pipeline reads and writes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentFormat {
    Text,
    Markdown,
    Pdf,
    Docx,
}

impl DocumentFormat {
    pub const SUPPORTED: &'static [&'static str] = &["txt", "md", "pdf", "docx"];

    /// Parse a declared format: an extension (with or without dot) or a MIME type
    pub fn from_hint(hint: &str) -> Result<Self> {
        let normalized = hint.trim().trim_start_matches('.').to_lowercase();

        match normalized.as_str() {
            "txt" | "text" | "plain" | "text/plain" => Ok(DocumentFormat::Text),
            "md" | "markdown" | "text/markdown" | "text/x-markdown" => Ok(DocumentFormat::Markdown),
            "pdf" | "application/pdf" => Ok(DocumentFormat::Pdf),
            "docx" | "application/vnd.openxmlformats-officedocument.wordprocessingml.document" => {
                Ok(DocumentFormat::Docx)
            }
            _ => Err(ResumeTailorError::UnsupportedFormat(format!(
                "'{}'. Supported: {}",
                hint,
                Self::SUPPORTED.join(", ")
            ))),
        }
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .ok_or_else(|| ResumeTailorError::UnsupportedFormat(
                format!("File has no extension: {}", path.display())
            ))?;

        Self::from_hint(extension)
    }

    pub fn extension(&self) -> &'static str {
        match self {
            DocumentFormat::Text => "txt",
            DocumentFormat::Markdown => "md",
            DocumentFormat::Pdf => "pdf",
            DocumentFormat::Docx => "docx",
        }
    }
}

impl std::fmt::Display for DocumentFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.extension())
    }
}
