//! Text processing and analysis module

pub mod compliance;
pub mod composer;
pub mod document;
pub mod drafting;
pub mod gap_analyzer;
pub mod requirements;
pub mod text_processor;
pub mod vocabulary;

pub use compliance::{ComplianceReport, ComplianceScorer, Grade};
pub use composer::{Addition, DocumentComposer};
pub use document::{DocumentExtractor, Section, SectionKind, StructuredResume};
pub use gap_analyzer::{GapAnalyzer, GapReport, MissingRequirement};
pub use requirements::{Importance, RequirementCategory, RequirementExtractor, RequirementKeyword};
