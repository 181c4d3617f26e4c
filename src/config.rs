//! Configuration management for the resume tailor

use crate::error::{Result, ResumeTailorError};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub extraction: ExtractionConfig,
    pub matching: MatchingConfig,
    pub compliance: ComplianceConfig,
    pub output: OutputConfig,
    pub session: SessionConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractionConfig {
    /// Longest line (in characters) still considered a section header
    pub header_max_chars: usize,
    pub header_max_words: usize,
    /// Jaro-Winkler similarity needed to accept a header variant
    pub fuzzy_header_threshold: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchingConfig {
    /// Bytes scanned around a requirement for required/preferred cues
    pub importance_window: usize,
    /// Share of content words a responsibility needs to count as covered
    pub responsibility_coverage: f32,
    pub max_responsibilities: usize,
    pub extra_technical_skills: Vec<String>,
    /// Normalized term -> additional forms that also satisfy it
    pub synonyms: BTreeMap<String, Vec<String>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComplianceConfig {
    /// Dimensions scoring below this get a recommendation
    pub recommendation_threshold: f32,
    pub max_sentence_words: usize,
    pub long_paragraph_words: usize,
    pub min_quantified_bullets: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    pub format: ReportFormat,
    pub detailed: bool,
    pub color_output: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReportFormat {
    Console,
    Json,
    Markdown,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    pub sessions_dir: PathBuf,
    pub max_age_hours: i64,
}

impl Default for Config {
    fn default() -> Self {
        let sessions_dir = dirs::data_local_dir()
            .or_else(dirs::home_dir)
            .unwrap_or_else(|| PathBuf::from("."))
            .join("resume-tailor")
            .join("sessions");

        Self {
            extraction: ExtractionConfig::default(),
            matching: MatchingConfig::default(),
            compliance: ComplianceConfig::default(),
            output: OutputConfig {
                format: ReportFormat::Console,
                detailed: false,
                color_output: true,
            },
            session: SessionConfig {
                sessions_dir,
                max_age_hours: 24,
            },
        }
    }
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            header_max_chars: 48,
            header_max_words: 5,
            fuzzy_header_threshold: 0.9,
        }
    }
}

impl Default for MatchingConfig {
    fn default() -> Self {
        Self {
            importance_window: 80,
            responsibility_coverage: 0.5,
            max_responsibilities: 15,
            extra_technical_skills: Vec::new(),
            synonyms: default_synonyms(),
        }
    }
}

impl Default for ComplianceConfig {
    fn default() -> Self {
        Self {
            recommendation_threshold: 70.0,
            max_sentence_words: 30,
            long_paragraph_words: 60,
            min_quantified_bullets: 3,
        }
    }
}

/// Default equivalence table. Entries are directional: a higher degree
/// satisfies a lower one, never the reverse.
pub fn default_synonyms() -> BTreeMap<String, Vec<String>> {
    let higher_than_bachelor = [
        "master", "masters", "m.s.", "m.sc", "msc", "mba", "phd", "ph.d", "doctorate",
    ];
    let bachelor_forms = ["bachelor", "bachelors", "b.s.", "b.sc", "bsc", "b.a.", "b.eng", "b.tech"];

    let table: Vec<(&str, Vec<&str>)> = vec![
        ("javascript", vec!["js", "ecmascript"]),
        ("typescript", vec!["ts"]),
        ("kubernetes", vec!["k8s"]),
        ("postgresql", vec!["postgres"]),
        ("node.js", vec!["nodejs", "node"]),
        ("machine learning", vec!["ml"]),
        ("nlp", vec!["natural language processing"]),
        ("ci/cd", vec!["continuous integration", "continuous delivery", "continuous deployment"]),
        ("gcp", vec!["google cloud"]),
        ("google cloud", vec!["gcp"]),
        ("aws", vec!["amazon web services"]),
        ("rest api", vec!["restful", "rest apis"]),
        ("c#", vec!["csharp"]),
        ("c++", vec!["cpp"]),
        ("scikit learn", vec!["sklearn"]),
        ("golang", vec!["go lang"]),
        (
            "bachelor's degree",
            bachelor_forms.iter().chain(higher_than_bachelor.iter()).copied().collect(),
        ),
        ("master's degree", higher_than_bachelor.to_vec()),
        ("phd", vec!["ph.d", "doctorate", "doctoral"]),
        ("mba", vec!["master of business administration"]),
        (
            "associate degree",
            ["associate"]
                .iter()
                .chain(bachelor_forms.iter())
                .chain(higher_than_bachelor.iter())
                .copied()
                .collect(),
        ),
    ];

    table
        .into_iter()
        .map(|(term, forms)| (term.to_string(), forms.into_iter().map(String::from).collect()))
        .collect()
}

impl Config {
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path();

        if config_path.exists() {
            Self::load_from(&config_path)
        } else {
            let config = Self::default();
            config.save()?;
            Ok(config)
        }
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content)
            .map_err(|e| ResumeTailorError::Configuration(format!("Failed to parse config: {}", e)))
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path())
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)
            .map_err(|e| ResumeTailorError::Configuration(format!("Failed to serialize config: {}", e)))?;

        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| dirs::home_dir().unwrap_or_else(|| PathBuf::from(".")))
            .join("resume-tailor")
            .join("config.toml")
    }

    pub fn sessions_dir(&self) -> &PathBuf {
        &self.session.sessions_dir
    }
}
