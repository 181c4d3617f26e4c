//! Report structures combining gap analysis and ATS compliance results

use crate::processing::compliance::{ComplianceReport, Dimension, Priority};
use crate::processing::document::{SectionKind, StructuredResume};
use crate::processing::gap_analyzer::GapReport;
use crate::processing::requirements::Importance;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

const MAX_IMPROVEMENT_AREAS: usize = 6;
const STRONG_DIMENSION_SCORE: f32 = 85.0;

/// Everything the `analyze` and `score` commands print
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TailorReport {
    pub summary: ReportSummary,

    /// Present only when a job description was analyzed
    pub gap_report: Option<GapReport>,

    pub compliance: ComplianceReport,

    /// Sections detected in the resume, in document order
    pub sections: Vec<SectionOverview>,

    pub metadata: ReportMetadata,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportSummary {
    /// Match score when a job was given, otherwise the ATS score (0-100)
    pub headline_score: u8,
    pub verdict: String,
    pub strengths: Vec<String>,
    pub improvement_areas: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SectionOverview {
    pub kind: SectionKind,
    pub heading: Option<String>,
    pub word_count: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportMetadata {
    pub generated_at: DateTime<Utc>,
    pub tool_version: String,
    pub resume_file: String,
    pub job_file: Option<String>,
    pub processing_time_ms: u64,
}

impl ReportMetadata {
    pub fn new(resume_file: impl Into<String>, job_file: Option<String>, processing_time_ms: u64) -> Self {
        Self {
            generated_at: Utc::now(),
            tool_version: env!("CARGO_PKG_VERSION").to_string(),
            resume_file: resume_file.into(),
            job_file,
            processing_time_ms,
        }
    }
}

impl TailorReport {
    pub fn new(
        resume: &StructuredResume,
        gap_report: Option<GapReport>,
        compliance: ComplianceReport,
        metadata: ReportMetadata,
    ) -> Self {
        let sections = resume
            .sections
            .iter()
            .map(|section| SectionOverview {
                kind: section.kind,
                heading: section.display_heading(),
                word_count: section.body.split_whitespace().count(),
            })
            .collect();

        let summary = Self::create_summary(gap_report.as_ref(), &compliance);

        Self {
            summary,
            gap_report,
            compliance,
            sections,
            metadata,
        }
    }

    fn create_summary(gap: Option<&GapReport>, compliance: &ComplianceReport) -> ReportSummary {
        let headline = gap.map_or(compliance.overall_score, |g| g.match_score);
        let headline_score = headline.round().clamp(0.0, 100.0) as u8;

        let verdict = match gap {
            Some(_) => Self::match_verdict(headline_score),
            None => format!("ATS readiness grade {}", compliance.grade),
        };

        let mut strengths = Vec::new();
        let mut improvement_areas = Vec::new();

        if let Some(gap) = gap {
            if gap.total() > 0 {
                strengths.push(format!(
                    "Covers {} of {} job requirements",
                    gap.matched.len(),
                    gap.total()
                ));
            }
            let required: Vec<&str> = gap
                .matched
                .iter()
                .filter(|k| k.importance == Importance::Required)
                .map(|k| k.term.as_str())
                .take(5)
                .collect();
            if !required.is_empty() {
                strengths.push(format!("Meets required: {}", required.join(", ")));
            }

            for missing in gap
                .missing
                .iter()
                .filter(|m| m.keyword.importance == Importance::Required)
            {
                improvement_areas.push(format!(
                    "Add required {}: {}",
                    missing.keyword.category.label().to_lowercase(),
                    missing.keyword.term
                ));
            }
        }

        for dimension in Dimension::ALL {
            if let Some(component) = compliance.components.get(&dimension) {
                if component.score >= STRONG_DIMENSION_SCORE {
                    strengths.push(format!("Strong ATS {} ({:.0}/100)", dimension.label().to_lowercase(), component.score));
                }
            }
        }

        improvement_areas.extend(
            compliance
                .recommendations
                .iter()
                .filter(|r| r.priority == Priority::High)
                .map(|r| r.message.clone()),
        );
        improvement_areas.truncate(MAX_IMPROVEMENT_AREAS);

        ReportSummary {
            headline_score,
            verdict,
            strengths,
            improvement_areas,
        }
    }

    fn match_verdict(score: u8) -> String {
        match score {
            85..=100 => "Strong match: the resume already covers nearly every requirement",
            70..=84 => "Good match: a few targeted additions would close the gap",
            50..=69 => "Partial match: several important requirements are missing",
            _ => "Weak match: the resume needs substantial tailoring for this job",
        }
        .to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::processing::compliance::ComplianceScorer;
    use crate::processing::document::DocumentExtractor;
    use crate::processing::gap_analyzer::GapAnalyzer;
    use crate::processing::requirements::RequirementExtractor;

    fn build(resume_text: &str, job_text: Option<&str>) -> TailorReport {
        let config = Config::default();
        let resume = DocumentExtractor::new(&config.extraction).structure(resume_text);
        let gap = job_text.map(|job| {
            let requirements = RequirementExtractor::new(&config.matching).unwrap().extract(job);
            GapAnalyzer::new(&config.matching).analyze(&resume, &requirements)
        });
        let compliance = ComplianceScorer::new(&config.compliance, &config.matching).unwrap().score(&resume);
        TailorReport::new(&resume, gap, compliance, ReportMetadata::new("resume.txt", None, 3))
    }

    #[test]
    fn test_headline_uses_match_score_with_job() {
        let report = build(
            "SKILLS\nPython, Docker",
            Some("Required: Python and Kubernetes."),
        );

        let gap = report.gap_report.as_ref().unwrap();
        assert_eq!(report.summary.headline_score, gap.match_score.round() as u8);
        assert!(report
            .summary
            .improvement_areas
            .iter()
            .any(|area| area.ends_with("Kubernetes")));
        assert_eq!(report.sections.len(), 1);
        assert_eq!(report.sections[0].kind, SectionKind::Skills);
    }

    #[test]
    fn test_headline_falls_back_to_compliance() {
        let report = build("i am a team player and hard worker", None);

        assert!(report.gap_report.is_none());
        assert_eq!(
            report.summary.headline_score,
            report.compliance.overall_score.round() as u8
        );
        assert!(report.summary.verdict.starts_with("ATS readiness grade"));
        assert!(report.summary.improvement_areas.len() <= MAX_IMPROVEMENT_AREAS);
    }
}
