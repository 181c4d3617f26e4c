//! ATS-style compliance scoring of a resume on its own

use crate::config::{ComplianceConfig, MatchingConfig};
use crate::error::Result;
use crate::processing::document::{SectionKind, StructuredResume};
use crate::processing::text_processor::{bullet_marker, TextProcessor};
use crate::processing::vocabulary::{KeywordMatcher, ACTION_VERBS, CLICHES, SOFT_SKILLS, TECHNICAL_SKILLS};
use log::debug;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Dimension {
    Format,
    Structure,
    Keywords,
    Content,
}

impl Dimension {
    pub const ALL: [Dimension; 4] = [
        Dimension::Format,
        Dimension::Structure,
        Dimension::Keywords,
        Dimension::Content,
    ];

    pub fn weight(self) -> f32 {
        match self {
            Dimension::Format => 0.30,
            Dimension::Structure => 0.30,
            Dimension::Keywords => 0.25,
            Dimension::Content => 0.15,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Dimension::Format => "Format",
            Dimension::Structure => "Structure",
            Dimension::Keywords => "Keywords",
            Dimension::Content => "Content",
        }
    }

    fn advice(self) -> &'static str {
        match self {
            Dimension::Format => "Simplify the layout: plain bullet points, short paragraphs, no tables or graphics",
            Dimension::Structure => "Use standard Experience, Education and Skills sections and put contact details at the top",
            Dimension::Keywords => "Start bullets with action verbs and name the technical and soft skills you use",
            Dimension::Content => "Quantify achievements and replace clichés with concrete results",
        }
    }
}

impl std::fmt::Display for Dimension {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComponentScore {
    pub score: f32,
    pub weight: f32,
    pub issues: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Grade {
    A,
    B,
    C,
    D,
    F,
}

impl Grade {
    pub fn from_score(score: f32) -> Self {
        if score >= 90.0 {
            Grade::A
        } else if score >= 80.0 {
            Grade::B
        } else if score >= 70.0 {
            Grade::C
        } else if score >= 60.0 {
            Grade::D
        } else {
            Grade::F
        }
    }
}

impl std::fmt::Display for Grade {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let letter = match self {
            Grade::A => "A",
            Grade::B => "B",
            Grade::C => "C",
            Grade::D => "D",
            Grade::F => "F",
        };
        write!(f, "{}", letter)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    High,
    Medium,
    Low,
}

impl Priority {
    fn from_value(value: f32) -> Self {
        if value >= 0.08 {
            Priority::High
        } else if value >= 0.04 {
            Priority::Medium
        } else {
            Priority::Low
        }
    }
}

impl std::fmt::Display for Priority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Priority::High => write!(f, "high"),
            Priority::Medium => write!(f, "medium"),
            Priority::Low => write!(f, "low"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub priority: Priority,
    pub category: String,
    pub message: String,
    pub issues: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComplianceReport {
    pub overall_score: f32,
    pub grade: Grade,
    pub components: BTreeMap<Dimension, ComponentScore>,
    pub recommendations: Vec<Recommendation>,
}

const SHORT_TEXT_CHARS: usize = 100;
const MIN_LINES: usize = 10;
const CONTACT_WINDOW_CHARS: usize = 300;
const MAX_FIRST_PERSON: usize = 5;
const VERB_TARGET: f32 = 6.0;
const TECH_TARGET: f32 = 5.0;
const SOFT_TARGET: f32 = 2.0;

/// Diminishing returns: approaches 1 as `count` passes `target`
fn saturation(count: usize, target: f32) -> f32 {
    1.0 - (-3.0 * count as f32 / target).exp()
}

/// Running 0..=100 score with the issues that lowered it
struct Tally {
    score: f32,
    issues: Vec<String>,
}

impl Tally {
    fn new() -> Self {
        Self {
            score: 100.0,
            issues: Vec::new(),
        }
    }

    fn penalize(&mut self, points: f32, issue: impl Into<String>) {
        self.score -= points;
        self.issues.push(issue.into());
    }

    fn finish(self, dimension: Dimension) -> ComponentScore {
        ComponentScore {
            score: self.score.clamp(0.0, 100.0),
            weight: dimension.weight(),
            issues: self.issues,
        }
    }
}

pub struct ComplianceScorer {
    config: ComplianceConfig,
    processor: TextProcessor,
    action_verbs: KeywordMatcher,
    technical: KeywordMatcher,
    soft: KeywordMatcher,
    cliches: KeywordMatcher,
    quantified_regex: Regex,
    first_person_regex: Regex,
}

impl ComplianceScorer {
    /// `matching` supplies the user's extra technical skills, so they count as resume keywords too
    pub fn new(config: &ComplianceConfig, matching: &MatchingConfig) -> Result<Self> {
        Ok(Self {
            config: config.clone(),
            processor: TextProcessor::new(),
            action_verbs: KeywordMatcher::from_words(ACTION_VERBS)?,
            technical: KeywordMatcher::with_extra(TECHNICAL_SKILLS, &matching.extra_technical_skills)?,
            soft: KeywordMatcher::new(SOFT_SKILLS)?,
            cliches: KeywordMatcher::from_words(CLICHES)?,
            quantified_regex: Regex::new(
                r"(?i)\d+(?:\.\d+)?\s?%|[$€£]\s?\d|\b\d+(?:,\d{3})*(?:\.\d+)?\+?(?:\s*(?:k|m|million|thousand|billion))?\s+(?:users|customers|clients|people|engineers|developers|members|projects|countries|teams|requests|transactions|downloads|students|hours)\b|\b\d+(?:\.\d+)?x\b",
            )
            .expect("Invalid quantified regex"),
            first_person_regex: Regex::new(r"(?i)\b(?:i|me|my|mine|myself)\b").expect("Invalid pronoun regex"),
        })
    }

    pub fn score(&self, resume: &StructuredResume) -> ComplianceReport {
        let mut components = BTreeMap::new();
        components.insert(Dimension::Format, self.score_format(resume));
        components.insert(Dimension::Structure, self.score_structure(resume));
        components.insert(Dimension::Keywords, self.score_keywords(resume));
        components.insert(Dimension::Content, self.score_content(resume));

        let overall_score: f32 = components.values().map(|c| c.score * c.weight).sum();
        let grade = Grade::from_score(overall_score);
        let recommendations = self.recommendations(&components);

        debug!("Compliance score {:.1} (grade {})", overall_score, grade);

        ComplianceReport {
            overall_score,
            grade,
            components,
            recommendations,
        }
    }

    fn score_format(&self, resume: &StructuredResume) -> ComponentScore {
        let text = &resume.raw_text;
        let lines: Vec<&str> = text.lines().map(str::trim).filter(|l| !l.is_empty()).collect();
        let mut tally = Tally::new();

        if text.chars().count() < SHORT_TEXT_CHARS {
            tally.penalize(30.0, "Resume text is very short");
        }

        if lines.iter().any(|line| looks_like_table_or_graphic(line)) {
            tally.penalize(20.0, "Tables, columns or graphics detected");
        }

        let markers: Vec<char> = lines.iter().filter_map(|line| bullet_marker(line)).collect();
        if markers.is_empty() {
            tally.penalize(15.0, "No bullet points");
        } else if lines.len() >= MIN_LINES && markers.len() as f32 > 0.8 * lines.len() as f32 {
            tally.penalize(10.0, "Almost every line is a bullet point");
        }

        let distinct_markers: BTreeSet<char> = markers.iter().copied().collect();
        if distinct_markers.len() > 1 {
            tally.penalize(5.0, "Inconsistent bullet markers");
        }

        let long_lines = lines
            .iter()
            .filter(|line| self.processor.word_count(line) > self.config.long_paragraph_words)
            .count();
        if long_lines > 0 {
            let penalty = (10.0 * long_lines as f32).min(20.0);
            tally.penalize(penalty, format!("{} overly long paragraph(s)", long_lines));
        }

        if lines.len() < MIN_LINES {
            tally.penalize(10.0, "Too few line breaks");
        }

        tally.finish(Dimension::Format)
    }

    fn score_structure(&self, resume: &StructuredResume) -> ComponentScore {
        let mut tally = Tally::new();

        for (kind, penalty) in [
            (SectionKind::Experience, 25.0),
            (SectionKind::Education, 20.0),
            (SectionKind::Skills, 20.0),
        ] {
            let present = resume
                .sections
                .iter()
                .any(|section| section.kind == kind && !section.body.trim().is_empty());
            if !present {
                tally.penalize(penalty, format!("Missing {} section", kind));
            }
        }

        let section_count = resume.sections.len();
        if section_count < 3 {
            tally.penalize(15.0, "Fewer than 3 sections");
        } else if section_count > 10 {
            tally.penalize(10.0, "More than 10 sections");
        }

        let top: String = resume.raw_text.chars().take(CONTACT_WINDOW_CHARS).collect();
        if !self.processor.has_email(&top) {
            tally.penalize(15.0, "No email address near the top");
        }
        if !self.processor.has_phone(&top) {
            tally.penalize(10.0, "No phone number near the top");
        }

        tally.finish(Dimension::Structure)
    }

    fn score_keywords(&self, resume: &StructuredResume) -> ComponentScore {
        let text = &resume.raw_text;
        let verbs = self.action_verbs.distinct(text).len();
        let technical = self.technical.distinct(text).len();
        let soft = self.soft.distinct(text).len();

        let score = 100.0
            * (0.40 * saturation(verbs, VERB_TARGET)
                + 0.35 * saturation(technical, TECH_TARGET)
                + 0.25 * saturation(soft, SOFT_TARGET));

        let mut issues = Vec::new();
        if (verbs as f32) < VERB_TARGET / 2.0 {
            issues.push(format!("Only {} distinct action verbs", verbs));
        }
        if (technical as f32) < TECH_TARGET / 2.0 {
            issues.push(format!("Only {} technical skills named", technical));
        }
        if soft == 0 {
            issues.push("No soft skills named".to_string());
        }

        ComponentScore {
            score: score.clamp(0.0, 100.0),
            weight: Dimension::Keywords.weight(),
            issues,
        }
    }

    fn score_content(&self, resume: &StructuredResume) -> ComponentScore {
        let text = &resume.raw_text;
        let mut tally = Tally::new();

        let quantified = text
            .lines()
            .filter(|line| self.quantified_regex.is_match(line))
            .count();
        if quantified < self.config.min_quantified_bullets {
            let shortfall = self.config.min_quantified_bullets - quantified;
            tally.penalize(
                10.0 * shortfall as f32,
                format!("Only {} quantified achievement(s)", quantified),
            );
        }

        let cliches = self.cliches.find_all(text);
        if !cliches.is_empty() {
            let penalty = (5.0 * cliches.len() as f32).min(25.0);
            let names: BTreeSet<&str> = cliches.iter().map(|hit| hit.display).collect();
            tally.penalize(
                penalty,
                format!("Clichéd phrases: {}", names.into_iter().collect::<Vec<_>>().join(", ")),
            );
        }

        let pronouns = self.first_person_regex.find_iter(text).count();
        if pronouns > MAX_FIRST_PERSON {
            tally.penalize(10.0, format!("{} first-person pronouns", pronouns));
        }

        let long_sentences = self
            .processor
            .sentences(text)
            .iter()
            .filter(|sentence| self.processor.word_count(sentence) > self.config.max_sentence_words)
            .count();
        if long_sentences > 0 {
            let penalty = (5.0 * long_sentences as f32).min(15.0);
            tally.penalize(penalty, format!("{} overly long sentence(s)", long_sentences));
        }

        tally.finish(Dimension::Content)
    }

    fn recommendations(&self, components: &BTreeMap<Dimension, ComponentScore>) -> Vec<Recommendation> {
        let mut ranked: Vec<(f32, Dimension, &ComponentScore)> = components
            .iter()
            .filter(|(_, component)| component.score < self.config.recommendation_threshold)
            .map(|(dimension, component)| ((1.0 - component.score / 100.0) * component.weight, *dimension, component))
            .collect();

        ranked.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(std::cmp::Ordering::Equal));

        let mut seen: BTreeSet<&'static str> = BTreeSet::new();
        ranked
            .into_iter()
            .filter(|(_, dimension, _)| seen.insert(dimension.label()))
            .map(|(value, dimension, component)| Recommendation {
                priority: Priority::from_value(value),
                category: dimension.label().to_string(),
                message: dimension.advice().to_string(),
                issues: component.issues.clone(),
            })
            .collect()
    }
}

fn looks_like_table_or_graphic(line: &str) -> bool {
    let lower = line.to_lowercase();
    line.matches('|').count() >= 2
        || line.contains('\t')
        || line.chars().any(|c| ('\u{2500}'..='\u{257F}').contains(&c))
        || ["[image]", "[table]", "[graphic]", "[logo]"].iter().any(|marker| lower.contains(marker))
}
