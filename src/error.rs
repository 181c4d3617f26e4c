//! Error handling for the resume tailor

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ResumeTailorError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("File format not supported: {0}")]
    UnsupportedFormat(String),

    #[error("Corrupt {format} document: {reason}")]
    CorruptDocument { format: String, reason: String },

    #[error("No additions to compose: select at least one missing point first")]
    EmptyAdditions,

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Session not found: {0}")]
    SessionNotFound(String),

    #[error("Output formatting error: {0}")]
    OutputFormatting(String),
}

pub type Result<T> = std::result::Result<T, ResumeTailorError>;

impl ResumeTailorError {
    pub fn corrupt(format: impl Into<String>, reason: impl Into<String>) -> Self {
        ResumeTailorError::CorruptDocument {
            format: format.into(),
            reason: reason.into(),
        }
    }

    /// Short stable name of the error kind, used by the CLI for exit messages
    pub fn kind(&self) -> &'static str {
        match self {
            ResumeTailorError::Io(_) => "io",
            ResumeTailorError::UnsupportedFormat(_) => "unsupported_format",
            ResumeTailorError::CorruptDocument { .. } => "corrupt_document",
            ResumeTailorError::EmptyAdditions => "empty_additions",
            ResumeTailorError::Configuration(_) => "configuration",
            ResumeTailorError::Serialization(_) => "serialization",
            ResumeTailorError::InvalidInput(_) => "invalid_input",
            ResumeTailorError::SessionNotFound(_) => "session_not_found",
            ResumeTailorError::OutputFormatting(_) => "output_formatting",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_kinds_are_distinct() {
        let unsupported = ResumeTailorError::UnsupportedFormat("odt".to_string());
        let corrupt = ResumeTailorError::corrupt("pdf", "bad xref");

        assert_eq!(unsupported.kind(), "unsupported_format");
        assert_eq!(corrupt.kind(), "corrupt_document");
        assert_ne!(unsupported.kind(), corrupt.kind());
        assert_eq!(corrupt.to_string(), "Corrupt pdf document: bad xref");
    }
}
