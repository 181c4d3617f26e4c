//! CLI interface for the resume tailor

use crate::config::ReportFormat;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

pub const RESUME_EXTENSIONS: &[&str] = &["pdf", "txt", "md", "docx"];
pub const JOB_EXTENSIONS: &[&str] = &["pdf", "txt", "md", "docx"];

#[derive(Parser)]
#[command(name = "resume-tailor")]
#[command(about = "Resume vs. job description gap analysis and tailoring tool")]
#[command(long_about = "Find the job requirements a resume does not cover, score its ATS readiness, and compose a tailored copy with the missing points added")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Configuration file path
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Compare a resume with a job description
    Analyze {
        /// Path to resume file (PDF, DOCX, TXT, MD)
        #[arg(short, long)]
        resume: PathBuf,

        /// Path to job description file (PDF, DOCX, TXT, MD)
        #[arg(short, long)]
        job: PathBuf,

        /// Output format: console, json, markdown
        #[arg(short, long)]
        output: Option<String>,

        /// Save output to file
        #[arg(short, long)]
        save: Option<PathBuf>,

        /// Output detailed analysis
        #[arg(short, long)]
        detailed: bool,
    },

    /// Score a resume's ATS readiness on its own
    Score {
        /// Path to resume file (PDF, DOCX, TXT, MD)
        #[arg(short, long)]
        resume: PathBuf,

        /// Output format: console, json, markdown
        #[arg(short, long)]
        output: Option<String>,

        /// Save output to file
        #[arg(short, long)]
        save: Option<PathBuf>,

        /// Output detailed analysis
        #[arg(short, long)]
        detailed: bool,
    },

    /// Compose a tailored resume from a JSON list of additions
    Compose {
        /// Path to resume file (PDF, DOCX, TXT, MD)
        #[arg(short, long)]
        resume: PathBuf,

        /// JSON file holding an array of additions
        #[arg(short, long)]
        additions: PathBuf,

        /// Output document format: txt, md, pdf, docx
        #[arg(short, long, default_value = "txt")]
        format: String,

        /// Where to write the composed document
        #[arg(short, long)]
        save: PathBuf,
    },

    /// Multi-step tailoring sessions
    Session {
        #[command(subcommand)]
        action: SessionAction,
    },

    /// Show or reset configuration
    Config {
        #[command(subcommand)]
        action: Option<ConfigAction>,
    },
}

#[derive(Subcommand)]
pub enum SessionAction {
    /// Analyze a resume against a job and start a session
    New {
        #[arg(short, long)]
        resume: PathBuf,

        #[arg(short, long)]
        job: PathBuf,
    },

    /// Accept a missing point into the session
    Add {
        /// Session id
        id: String,

        /// Keyword being added
        #[arg(short, long)]
        keyword: String,

        /// Target section name (e.g. Skills, Experience)
        #[arg(short, long)]
        target: String,

        /// Line to add; drafted from the keyword when omitted
        #[arg(short, long)]
        content: Option<String>,

        /// Context used when drafting content
        #[arg(long)]
        context: Option<String>,

        /// Requirement category; taken from the gap report when omitted
        #[arg(long)]
        category: Option<String>,
    },

    /// Show the session's gap report and pending additions
    Show {
        id: String,
    },

    /// Compose the session's resume with its additions
    Compose {
        id: String,

        /// Output document format: txt, md, pdf, docx
        #[arg(short, long, default_value = "txt")]
        format: String,

        #[arg(short, long)]
        save: PathBuf,
    },

    /// Drop all pending additions
    Clear {
        id: String,
    },

    /// Delete a session
    Delete {
        id: String,
    },

    /// Delete sessions older than the configured maximum age
    Purge,
}

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Reset configuration to defaults
    Reset,

    /// Print the configuration file path
    Path,
}

/// Parse and validate report output format
pub fn parse_output_format(format: &str) -> Result<ReportFormat, String> {
    match format.to_lowercase().as_str() {
        "console" | "text" => Ok(ReportFormat::Console),
        "json" => Ok(ReportFormat::Json),
        "markdown" | "md" => Ok(ReportFormat::Markdown),
        _ => Err(format!("Invalid output format: {}. Supported: console, json, markdown", format)),
    }
}

/// Validate file extension
pub fn validate_file_extension(path: &Path, allowed_extensions: &[&str]) -> Result<(), String> {
    match path.extension().and_then(|ext| ext.to_str()) {
        Some(ext) => {
            if allowed_extensions.contains(&ext.to_lowercase().as_str()) {
                Ok(())
            } else {
                Err(format!(
                    "Unsupported file extension: .{}. Allowed: {}",
                    ext,
                    allowed_extensions.join(", ")
                ))
            }
        }
        None => Err("File has no extension".to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_session_add() {
        let cli = Cli::parse_from([
            "resume-tailor",
            "session",
            "add",
            "abc-0001",
            "-k",
            "AWS",
            "-t",
            "Skills",
            "--context",
            "billing",
        ]);

        match cli.command {
            Commands::Session {
                action: SessionAction::Add { id, keyword, target, content, context, category },
            } => {
                assert_eq!(id, "abc-0001");
                assert_eq!(keyword, "AWS");
                assert_eq!(target, "Skills");
                assert!(content.is_none());
                assert_eq!(context.as_deref(), Some("billing"));
                assert!(category.is_none());
            }
            _ => panic!("expected session add"),
        }
    }

    #[test]
    fn test_parse_output_format() {
        assert_eq!(parse_output_format("MD"), Ok(ReportFormat::Markdown));
        assert_eq!(parse_output_format("json"), Ok(ReportFormat::Json));
        assert!(parse_output_format("html").is_err());
    }

    #[test]
    fn test_validate_file_extension() {
        assert!(validate_file_extension(Path::new("cv.PDF"), RESUME_EXTENSIONS).is_ok());
        assert!(validate_file_extension(Path::new("cv.docx"), RESUME_EXTENSIONS).is_ok());
        assert!(validate_file_extension(Path::new("cv.odt"), RESUME_EXTENSIONS).is_err());
        assert!(validate_file_extension(Path::new("README"), RESUME_EXTENSIONS).is_err());
    }
}
