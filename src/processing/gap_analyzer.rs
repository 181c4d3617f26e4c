//! Resume vs. job requirement gap analysis

use crate::config::MatchingConfig;
use crate::processing::document::{SectionKind, StructuredResume};
use crate::processing::requirements::{Importance, RequirementCategory, RequirementKeyword};
use crate::processing::text_processor::{contains_term, normalize_term, TextProcessor};
use crate::processing::vocabulary::STOP_WORDS;
use log::debug;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MissingRequirement {
    pub keyword: RequirementKeyword,
    pub suggested_sections: Vec<SectionKind>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GapReport {
    pub match_score: f32,
    pub matched: Vec<RequirementKeyword>,
    /// Required first, then category priority, then job-text order
    pub missing: Vec<MissingRequirement>,
}

impl GapReport {
    pub fn total(&self) -> usize {
        self.matched.len() + self.missing.len()
    }

    pub fn missing_required(&self) -> usize {
        self.missing
            .iter()
            .filter(|m| m.keyword.importance == Importance::Required)
            .count()
    }

    /// Find a missing requirement by (case-insensitive) term
    pub fn find_missing(&self, term: &str) -> Option<&MissingRequirement> {
        let wanted = normalize_term(term);
        self.missing.iter().find(|m| m.keyword.normalized() == wanted)
    }
}

pub struct GapAnalyzer {
    processor: TextProcessor,
    synonyms: BTreeMap<String, Vec<String>>,
    responsibility_coverage: f32,
    years_regex: Regex,
    experience_term_regex: Regex,
}

impl GapAnalyzer {
    pub fn new(config: &MatchingConfig) -> Self {
        let synonyms = config
            .synonyms
            .iter()
            .map(|(term, forms)| {
                (
                    normalize_term(term),
                    forms.iter().map(|form| normalize_term(form)).collect(),
                )
            })
            .collect();

        Self {
            processor: TextProcessor::new(),
            synonyms,
            responsibility_coverage: config.responsibility_coverage,
            years_regex: Regex::new(r"\b(\d{1,2})\s*\+?\s*(?:years?|yrs?)\b").expect("Invalid years regex"),
            experience_term_regex: Regex::new(r"^(\d{1,2})\+ years experience$").expect("Invalid experience term regex"),
        }
    }

    pub fn analyze(&self, resume: &StructuredResume, requirements: &[RequirementKeyword]) -> GapReport {
        let resume_text = self.processor.normalize(&resume.raw_text);
        let education_text = resume
            .section(SectionKind::Education)
            .map(|section| self.processor.normalize(&section.body))
            .unwrap_or_else(|| resume_text.clone());

        let mut seen: HashSet<(String, RequirementCategory)> = HashSet::new();
        let mut matched: Vec<RequirementKeyword> = Vec::new();
        let mut missing: Vec<MissingRequirement> = Vec::new();
        let mut total_weight = 0.0f32;
        let mut matched_weight = 0.0f32;

        for keyword in requirements {
            if !seen.insert((keyword.normalized(), keyword.category)) {
                continue;
            }

            let weight = keyword.importance.weight();
            total_weight += weight;

            let scope = match keyword.category {
                RequirementCategory::Education => &education_text,
                _ => &resume_text,
            };

            if self.is_satisfied(keyword, scope) {
                matched_weight += weight;
                matched.push(keyword.clone());
            } else {
                missing.push(MissingRequirement {
                    keyword: keyword.clone(),
                    suggested_sections: suggested_sections(resume, keyword.category),
                });
            }
        }

        missing.sort_by(|a, b| {
            rank(&a.keyword).cmp(&rank(&b.keyword))
        });

        let match_score = if total_weight > 0.0 {
            100.0 * matched_weight / total_weight
        } else {
            100.0
        };

        debug!(
            "Gap analysis: {} matched, {} missing, score {:.1}",
            matched.len(),
            missing.len(),
            match_score
        );

        GapReport {
            match_score,
            matched,
            missing,
        }
    }

    fn is_satisfied(&self, keyword: &RequirementKeyword, text: &str) -> bool {
        let term = keyword.normalized();

        match keyword.category {
            RequirementCategory::ExperienceLevel => self.experience_satisfied(&term, text),
            RequirementCategory::Responsibility => {
                contains_term(text, &term) || self.responsibility_covered(&term, text)
            }
            _ => self.forms(&term).iter().any(|form| contains_term(text, form)),
        }
    }

    /// The term itself plus its configured synonyms
    fn forms(&self, term: &str) -> Vec<String> {
        let mut forms = vec![term.to_string()];
        if let Some(extra) = self.synonyms.get(term) {
            forms.extend(extra.iter().cloned());
        }
        forms
    }

    fn experience_satisfied(&self, term: &str, text: &str) -> bool {
        if let Some(required) = self
            .experience_term_regex
            .captures(term)
            .and_then(|caps| caps.get(1))
            .and_then(|years| years.as_str().parse::<u32>().ok())
        {
            return self
                .years_regex
                .captures_iter(text)
                .filter_map(|caps| caps.get(1).and_then(|m| m.as_str().parse::<u32>().ok()))
                .any(|years| years >= required);
        }

        match term.strip_suffix(" level") {
            Some(level @ ("entry" | "mid")) => contains_term(text, &format!("{} level", level)),
            Some(level) => contains_term(text, level),
            None => contains_term(text, term),
        }
    }

    fn responsibility_covered(&self, term: &str, text: &str) -> bool {
        let content_words: Vec<&str> = term
            .split_whitespace()
            .filter(|word| word.len() > 3 && !STOP_WORDS.contains(word))
            .collect();

        if content_words.is_empty() {
            return false;
        }

        let covered = content_words.iter().filter(|word| contains_term(text, word)).count();
        covered as f32 / content_words.len() as f32 >= self.responsibility_coverage
    }
}

fn rank(keyword: &RequirementKeyword) -> (u8, u8, usize) {
    let importance = match keyword.importance {
        Importance::Required => 0,
        Importance::Preferred => 1,
    };
    (importance, keyword.category.priority(), keyword.offset)
}

/// Candidate sections for a category, narrowed to the ones the resume has
fn suggested_sections(resume: &StructuredResume, category: RequirementCategory) -> Vec<SectionKind> {
    let candidates = category.candidate_sections();
    let present: Vec<SectionKind> = candidates
        .iter()
        .copied()
        .filter(|kind| resume.has_section(*kind))
        .collect();

    if present.is_empty() {
        candidates.to_vec()
    } else {
        present
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::default_synonyms;
    use crate::processing::document::DocumentExtractor;
    use crate::processing::requirements::RequirementExtractor;

    fn keyword(term: &str, category: RequirementCategory, importance: Importance, offset: usize) -> RequirementKeyword {
        RequirementKeyword {
            term: term.to_string(),
            category,
            importance,
            offset,
        }
    }

    fn resume(text: &str) -> StructuredResume {
        DocumentExtractor::default().structure(text)
    }

    fn analyzer() -> GapAnalyzer {
        GapAnalyzer::new(&MatchingConfig::default())
    }

    #[test]
    fn test_empty_requirements_is_full_match() {
        let report = analyzer().analyze(&resume("Anything at all"), &[]);

        assert_eq!(report.match_score, 100.0);
        assert!(report.missing.is_empty());
        assert!(report.matched.is_empty());
    }

    #[test]
    fn test_matched_and_missing_partition_requirements() {
        let requirements = vec![
            keyword("Python", RequirementCategory::TechnicalSkill, Importance::Required, 0),
            keyword("Docker", RequirementCategory::TechnicalSkill, Importance::Required, 10),
            keyword("Communication", RequirementCategory::SoftSkill, Importance::Preferred, 20),
            keyword("Bachelor's Degree", RequirementCategory::Education, Importance::Preferred, 30),
        ];
        let report = analyzer().analyze(&resume("SKILLS\nPython, communication"), &requirements);

        assert_eq!(report.total(), requirements.len());
        let matched: HashSet<String> = report.matched.iter().map(|k| k.term.clone()).collect();
        let missing: HashSet<String> = report.missing.iter().map(|m| m.keyword.term.clone()).collect();
        assert!(matched.is_disjoint(&missing));
        let all: HashSet<String> = requirements.iter().map(|k| k.term.clone()).collect();
        assert_eq!(&matched | &missing, all);
    }

    #[test]
    fn test_score_is_monotonic() {
        let requirements = vec![
            keyword("Python", RequirementCategory::TechnicalSkill, Importance::Required, 0),
            keyword("AWS", RequirementCategory::TechnicalSkill, Importance::Required, 10),
            keyword("Leadership", RequirementCategory::SoftSkill, Importance::Preferred, 20),
        ];
        let analyzer = analyzer();

        let none = analyzer.analyze(&resume("Nothing relevant"), &requirements).match_score;
        let one = analyzer.analyze(&resume("Python"), &requirements).match_score;
        let two = analyzer.analyze(&resume("Python and AWS"), &requirements).match_score;

        assert!(none <= one && one <= two);
        assert_eq!(none, 0.0);
        assert!((one - 40.0).abs() < 1e-4);
        assert!((two - 80.0).abs() < 1e-4);
    }

    #[test]
    fn test_required_aws_ranks_above_preferred_leadership() {
        let requirements = RequirementExtractor::new(&MatchingConfig::default())
            .unwrap()
            .extract("Required: Python, 5+ years experience, AWS. Preferred: leadership.");
        let report = analyzer().analyze(
            &resume("EXPERIENCE\n- Built Python services\n- Led a team of four engineers"),
            &requirements,
        );

        let missing: Vec<&str> = report.missing.iter().map(|m| m.keyword.term.as_str()).collect();
        assert_eq!(missing, vec!["AWS", "5+ years experience", "Leadership"]);
        assert!(report.matched.iter().any(|k| k.term == "Python"));

        let aws = report.find_missing("aws").unwrap();
        assert_eq!(aws.keyword.importance, Importance::Required);
        assert_eq!(aws.suggested_sections, vec![SectionKind::Experience]);

        let leadership = report.find_missing("Leadership").unwrap();
        assert_eq!(leadership.keyword.importance, Importance::Preferred);
    }

    #[test]
    fn test_default_synonym_table_is_pinned() {
        let table = default_synonyms();
        let keys: Vec<&str> = table.keys().map(String::as_str).collect();

        assert_eq!(
            keys,
            vec![
                "associate degree", "aws", "bachelor's degree", "c#", "c++", "ci/cd", "gcp",
                "golang", "google cloud", "javascript", "kubernetes", "machine learning",
                "master's degree", "mba", "nlp", "node.js", "phd", "postgresql", "rest api",
                "scikit learn", "typescript",
            ]
        );
        assert_eq!(table["javascript"], vec!["js", "ecmascript"]);
        assert!(!table.contains_key("leadership"));
    }

    #[test]
    fn test_synonyms_are_directional() {
        let analyzer = analyzer();
        let bachelor = keyword("Bachelor's Degree", RequirementCategory::Education, Importance::Required, 0);
        let master = keyword("Master's Degree", RequirementCategory::Education, Importance::Required, 0);

        let with_master = resume("EDUCATION\nM.S. in Computer Science");
        assert!(analyzer.analyze(&with_master, &[bachelor.clone()]).missing.is_empty());

        let with_bachelor = resume("EDUCATION\nBachelor of Science");
        assert_eq!(analyzer.analyze(&with_bachelor, &[master]).missing.len(), 1);
        assert!(analyzer.analyze(&with_bachelor, &[bachelor]).missing.is_empty());
    }

    #[test]
    fn test_abbreviation_synonyms() {
        let js = keyword("JavaScript", RequirementCategory::TechnicalSkill, Importance::Required, 0);
        let report = analyzer().analyze(&resume("Wrote JS and TypeScript"), &[js]);
        assert!(report.missing.is_empty());
    }

    #[test]
    fn test_experience_years_threshold() {
        let analyzer = analyzer();
        let five = keyword("5+ years experience", RequirementCategory::ExperienceLevel, Importance::Required, 0);

        assert!(analyzer.analyze(&resume("7 years of backend work"), &[five.clone()]).missing.is_empty());
        assert_eq!(analyzer.analyze(&resume("3 years of backend work"), &[five]).missing.len(), 1);

        let senior = keyword("Senior level", RequirementCategory::ExperienceLevel, Importance::Preferred, 0);
        assert!(analyzer.analyze(&resume("Senior Engineer at Acme"), &[senior]).missing.is_empty());
    }

    #[test]
    fn test_responsibility_partial_coverage() {
        let duty = keyword(
            "Design scalable backend services",
            RequirementCategory::Responsibility,
            Importance::Required,
            0,
        );
        let covered = resume("Built scalable services for payments");
        let uncovered = resume("Wrote documentation");

        assert!(analyzer().analyze(&covered, &[duty.clone()]).missing.is_empty());
        assert_eq!(analyzer().analyze(&uncovered, &[duty]).missing.len(), 1);
    }

    #[test]
    fn test_responsibility_words_match_whole_words_only() {
        let analyzer = analyzer();
        let develop = keyword("Develop APIs", RequirementCategory::Responsibility, Importance::Required, 0);
        let test = keyword("Test mobile releases", RequirementCategory::Responsibility, Importance::Required, 0);

        let report = analyzer.analyze(
            &resume("Software Developer with the latest mobile tooling"),
            &[develop.clone(), test],
        );
        assert_eq!(report.missing.len(), 2);
        assert!(report.matched.is_empty());

        let report = analyzer.analyze(&resume("Develop internal APIs for billing"), &[develop]);
        assert!(report.missing.is_empty());
    }

    #[test]
    fn test_suggested_sections_fall_back_when_absent() {
        let degree = keyword("PhD", RequirementCategory::Education, Importance::Preferred, 0);
        let report = analyzer().analyze(&resume("SKILLS\nRust"), &[degree]);

        assert_eq!(report.missing[0].suggested_sections, vec![SectionKind::Education]);
    }
}
