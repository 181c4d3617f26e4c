//! Requirement keyword extraction from job descriptions

use crate::config::MatchingConfig;
use crate::error::{Result, ResumeTailorError};
use crate::processing::document::SectionKind;
use crate::processing::text_processor::{bullet_marker, normalize_term};
use crate::processing::vocabulary::{
    KeywordMatcher, PREFERRED_CUES, REQUIRED_CUES, RESPONSIBILITY_VERBS, SOFT_SKILLS, STOP_WORDS,
    TECHNICAL_SKILLS,
};
use log::debug;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequirementCategory {
    TechnicalSkill,
    SoftSkill,
    Education,
    ExperienceLevel,
    Responsibility,
}

impl RequirementCategory {
    /// Lower sorts first when ranking gaps
    pub fn priority(self) -> u8 {
        match self {
            RequirementCategory::TechnicalSkill => 0,
            RequirementCategory::Responsibility => 1,
            RequirementCategory::SoftSkill => 2,
            RequirementCategory::Education => 3,
            RequirementCategory::ExperienceLevel => 4,
        }
    }

    /// Importance assumed when no cue phrase applies
    pub fn default_importance(self) -> Importance {
        match self {
            RequirementCategory::TechnicalSkill | RequirementCategory::Responsibility => Importance::Required,
            RequirementCategory::SoftSkill
            | RequirementCategory::Education
            | RequirementCategory::ExperienceLevel => Importance::Preferred,
        }
    }

    /// Sections where a missing keyword of this category belongs
    pub fn candidate_sections(self) -> &'static [SectionKind] {
        match self {
            RequirementCategory::TechnicalSkill | RequirementCategory::Responsibility => {
                &[SectionKind::Skills, SectionKind::Experience]
            }
            RequirementCategory::SoftSkill => &[SectionKind::Summary, SectionKind::Experience],
            RequirementCategory::Education => &[SectionKind::Education],
            RequirementCategory::ExperienceLevel => &[SectionKind::Experience],
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            RequirementCategory::TechnicalSkill => "technical_skill",
            RequirementCategory::SoftSkill => "soft_skill",
            RequirementCategory::Education => "education",
            RequirementCategory::ExperienceLevel => "experience_level",
            RequirementCategory::Responsibility => "responsibility",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            RequirementCategory::TechnicalSkill => "Technical skill",
            RequirementCategory::SoftSkill => "Soft skill",
            RequirementCategory::Education => "Education",
            RequirementCategory::ExperienceLevel => "Experience level",
            RequirementCategory::Responsibility => "Responsibility",
        }
    }

    pub fn from_name(name: &str) -> Result<Self> {
        match normalize_term(name).replace(' ', "_").as_str() {
            "technical_skill" | "technical" | "skill" => Ok(RequirementCategory::TechnicalSkill),
            "soft_skill" | "soft" => Ok(RequirementCategory::SoftSkill),
            "education" => Ok(RequirementCategory::Education),
            "experience_level" | "experience" => Ok(RequirementCategory::ExperienceLevel),
            "responsibility" => Ok(RequirementCategory::Responsibility),
            other => Err(ResumeTailorError::InvalidInput(format!("Unknown requirement category: {}", other))),
        }
    }
}

impl std::fmt::Display for RequirementCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Importance {
    Required,
    Preferred,
}

impl Importance {
    /// Weight of a keyword in the match score
    pub fn weight(self) -> f32 {
        match self {
            Importance::Required => 2.0,
            Importance::Preferred => 1.0,
        }
    }
}

impl std::fmt::Display for Importance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Importance::Required => write!(f, "required"),
            Importance::Preferred => write!(f, "preferred"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequirementKeyword {
    pub term: String,
    pub category: RequirementCategory,
    pub importance: Importance,
    /// Byte offset of the first occurrence in the job text
    pub offset: usize,
}

impl RequirementKeyword {
    pub fn normalized(&self) -> String {
        normalize_term(&self.term)
    }
}

const EXPERIENCE_PATTERN: &str = r"(?i)\b(\d{1,2})\s*(?:\+|plus)?\s*(?:(?:-|–|to)\s*\d{1,2}\s*\+?\s*)?years?(?:\s+of)?(?:\s+[a-z./+#-]+){0,3}?\s+experience\b";

const MINIMUM_YEARS_PATTERN: &str = r"(?i)\b(?:minimum|at\s+least)\s+(?:of\s+)?(\d{1,2})\s*\+?\s*years?\b";

const LEVEL_PATTERN: &str = r"(?i)\b(entry[- ]level|junior|mid[- ]level|senior|lead|principal|staff)(?:\s+level\b|(?:\s+[a-z]+)?\s+(?:engineer|developer|role|position|analyst|scientist|designer|architect|consultant)s?\b)";

const EDUCATION_PATTERNS: &[(&str, &str)] = &[
    (r"(?i)\bbachelor(?:'s|’s|s)?\b|\bb\.?(?:s|sc|a|eng|tech)\.?(?:/|\s+(?:degree|in)\b)", "Bachelor's Degree"),
    (r"(?i)\bmaster(?:'s|’s|s)\b|\bmaster\s+(?:degree|of)\b|\bm\.?(?:s|sc|eng)\.?\s+(?:degree|in)\b", "Master's Degree"),
    (r"(?i)\bph\.?\s?d\b|\bdoctorate\b|\bdoctoral\s+degree\b", "PhD"),
    (r"(?i)\bmba\b", "MBA"),
    (r"(?i)\bassociate(?:'s|’s)?\s+degree\b", "Associate Degree"),
];

const RESPONSIBILITY_LEAD_INS: &[&str] = &["you will ", "you'll ", "will "];

/// Words kept after a responsibility verb
const RESPONSIBILITY_TAIL_WORDS: usize = 4;

#[derive(Debug, Clone, Copy)]
struct Cue {
    start: usize,
    end: usize,
    importance: Importance,
}

struct Occurrence {
    term: String,
    category: RequirementCategory,
    start: usize,
    end: usize,
}

/// Scans job text for typed requirement keywords
pub struct RequirementExtractor {
    technical: KeywordMatcher,
    soft: KeywordMatcher,
    required_cues: KeywordMatcher,
    preferred_cues: KeywordMatcher,
    experience_regex: Regex,
    minimum_years_regex: Regex,
    level_regex: Regex,
    education_regexes: Vec<(Regex, &'static str)>,
    importance_window: usize,
    max_responsibilities: usize,
}

impl RequirementExtractor {
    pub fn new(config: &MatchingConfig) -> Result<Self> {
        let education_regexes = EDUCATION_PATTERNS
            .iter()
            .map(|(pattern, level)| Ok((compile(pattern)?, *level)))
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            technical: KeywordMatcher::with_extra(TECHNICAL_SKILLS, &config.extra_technical_skills)?,
            soft: KeywordMatcher::new(SOFT_SKILLS)?,
            required_cues: KeywordMatcher::from_words(REQUIRED_CUES)?,
            preferred_cues: KeywordMatcher::from_words(PREFERRED_CUES)?,
            experience_regex: compile(EXPERIENCE_PATTERN)?,
            minimum_years_regex: compile(MINIMUM_YEARS_PATTERN)?,
            level_regex: compile(LEVEL_PATTERN)?,
            education_regexes,
            importance_window: config.importance_window,
            max_responsibilities: config.max_responsibilities,
        })
    }

    /// Typed keywords in first-occurrence order, deduplicated by normalized term and category
    pub fn extract(&self, job_text: &str) -> Vec<RequirementKeyword> {
        if job_text.trim().is_empty() {
            return Vec::new();
        }

        let mut occurrences: Vec<Occurrence> = Vec::new();
        for (matcher, category) in [
            (&self.technical, RequirementCategory::TechnicalSkill),
            (&self.soft, RequirementCategory::SoftSkill),
        ] {
            occurrences.extend(matcher.find_all(job_text).into_iter().map(|hit| Occurrence {
                term: hit.display.to_string(),
                category,
                start: hit.start,
                end: hit.end,
            }));
        }
        occurrences.extend(self.experience_occurrences(job_text));
        occurrences.extend(self.education_occurrences(job_text));
        occurrences.extend(self.responsibility_occurrences(job_text));
        occurrences.sort_by_key(|occurrence| occurrence.start);

        let cues = self.cues(job_text);
        let headings = self.block_headings(job_text);

        let mut keywords: Vec<RequirementKeyword> = Vec::new();
        let mut index: HashMap<(String, RequirementCategory), usize> = HashMap::new();

        for occurrence in occurrences {
            let importance = self.importance_at(job_text, &cues, &headings, &occurrence);
            let key = (normalize_term(&occurrence.term), occurrence.category);

            match index.get(&key) {
                Some(&existing) => {
                    if importance == Importance::Required {
                        keywords[existing].importance = Importance::Required;
                    }
                }
                None => {
                    index.insert(key, keywords.len());
                    keywords.push(RequirementKeyword {
                        term: occurrence.term,
                        category: occurrence.category,
                        importance,
                        offset: occurrence.start,
                    });
                }
            }
        }

        debug!("Extracted {} requirement keywords", keywords.len());
        keywords
    }

    fn experience_occurrences(&self, text: &str) -> Vec<Occurrence> {
        let mut found = Vec::new();

        for regex in [&self.experience_regex, &self.minimum_years_regex] {
            for caps in regex.captures_iter(text) {
                if let (Some(whole), Some(years)) = (caps.get(0), caps.get(1)) {
                    found.push(Occurrence {
                        term: format!("{}+ years experience", years.as_str()),
                        category: RequirementCategory::ExperienceLevel,
                        start: whole.start(),
                        end: whole.end(),
                    });
                }
            }
        }

        for caps in self.level_regex.captures_iter(text) {
            if let (Some(whole), Some(level)) = (caps.get(0), caps.get(1)) {
                found.push(Occurrence {
                    term: level_term(level.as_str()),
                    category: RequirementCategory::ExperienceLevel,
                    start: whole.start(),
                    end: whole.end(),
                });
            }
        }

        found
    }

    fn education_occurrences(&self, text: &str) -> Vec<Occurrence> {
        self.education_regexes
            .iter()
            .flat_map(|(regex, level)| {
                regex.find_iter(text).map(move |mat| Occurrence {
                    term: level.to_string(),
                    category: RequirementCategory::Education,
                    start: mat.start(),
                    end: mat.end(),
                })
            })
            .collect()
    }

    fn responsibility_occurrences(&self, text: &str) -> Vec<Occurrence> {
        let mut found: Vec<Occurrence> = Vec::new();
        let mut seen: Vec<String> = Vec::new();

        for (clause_start, clause) in clauses(text) {
            if seen.len() >= self.max_responsibilities {
                break;
            }

            let mut rest = clause.trim_start();
            if let Some(marker) = bullet_marker(rest) {
                rest = rest[marker.len_utf8()..].trim_start();
            }
            for lead_in in RESPONSIBILITY_LEAD_INS {
                if rest.get(..lead_in.len()).map_or(false, |prefix| prefix.eq_ignore_ascii_case(lead_in)) {
                    rest = rest[lead_in.len()..].trim_start();
                    break;
                }
            }

            if let Some(term) = responsibility_term(rest) {
                let start = clause_start + (clause.len() - rest.len());
                let normalized = normalize_term(&term);
                if !seen.contains(&normalized) {
                    seen.push(normalized);
                }
                let end = start + term.find(' ').unwrap_or(term.len());
                found.push(Occurrence {
                    term,
                    category: RequirementCategory::Responsibility,
                    start,
                    end,
                });
            }
        }

        found
    }

    fn cues(&self, text: &str) -> Vec<Cue> {
        let mut cues: Vec<Cue> = Vec::new();
        for (matcher, importance) in [
            (&self.required_cues, Importance::Required),
            (&self.preferred_cues, Importance::Preferred),
        ] {
            cues.extend(matcher.find_all(text).into_iter().map(|hit| Cue {
                start: hit.start,
                end: hit.end,
                importance,
            }));
        }
        cues.sort_by_key(|cue| cue.start);
        cues
    }

    /// Heading-like lines and the cue each one carries, by line start offset
    fn block_headings(&self, text: &str) -> Vec<(usize, Option<Importance>)> {
        let mut headings = Vec::new();
        let mut line_start = 0;

        for line in text.split('\n') {
            if is_block_heading(line, self.line_has_cue(line)) {
                let cue = self
                    .cues(line)
                    .first()
                    .map(|cue| cue.importance);
                headings.push((line_start, cue));
            }
            line_start += line.len() + 1;
        }

        headings
    }

    fn line_has_cue(&self, line: &str) -> bool {
        !self.required_cues.find_all(line).is_empty() || !self.preferred_cues.find_all(line).is_empty()
    }

    fn importance_at(
        &self,
        text: &str,
        cues: &[Cue],
        headings: &[(usize, Option<Importance>)],
        occurrence: &Occurrence,
    ) -> Importance {
        let (clause_start, clause_end) = clause_bounds(text, occurrence.start, occurrence.end);

        let nearest = cues
            .iter()
            .filter_map(|cue| {
                if cue.start >= occurrence.start && cue.end <= occurrence.end {
                    Some((0, cue.importance))
                } else if cue.start >= clause_start && cue.end <= occurrence.start {
                    let distance = occurrence.start - cue.end;
                    (distance <= self.importance_window).then_some((distance, cue.importance))
                } else if cue.start >= occurrence.end && cue.end <= clause_end {
                    Some((cue.start - occurrence.end, cue.importance))
                } else {
                    None
                }
            })
            .min_by_key(|(distance, _)| *distance);

        if let Some((_, importance)) = nearest {
            return importance;
        }

        let governing = headings.partition_point(|(start, _)| *start <= occurrence.start);
        if governing > 0 {
            if let Some(importance) = headings[governing - 1].1 {
                return importance;
            }
        }

        occurrence.category.default_importance()
    }
}

fn compile(pattern: &str) -> Result<Regex> {
    Regex::new(pattern)
        .map_err(|e| ResumeTailorError::Configuration(format!("Invalid pattern {}: {}", pattern, e)))
}

fn level_term(level: &str) -> String {
    let word = level
        .split(|c: char| c == '-' || c.is_whitespace())
        .next()
        .unwrap_or(level)
        .to_lowercase();
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => format!("{}{} level", first.to_uppercase(), chars.as_str()),
        None => String::new(),
    }
}

/// Verb plus up to four following words, cut at punctuation, trailing stop words dropped
fn responsibility_term(clause: &str) -> Option<String> {
    let mut tokens = clause.split_whitespace();
    let verb_token = tokens.next()?;
    let verb = verb_token.trim_end_matches(|c: char| !c.is_alphanumeric());
    if verb.len() != verb_token.len() || !RESPONSIBILITY_VERBS.contains(&verb.to_lowercase().as_str()) {
        return None;
    }

    let mut words: Vec<&str> = Vec::new();
    for token in tokens {
        if words.len() == RESPONSIBILITY_TAIL_WORDS || token.starts_with('(') {
            break;
        }
        let word = token.trim_end_matches(|c: char| matches!(c, ',' | ':' | ')' | '.' | '"'));
        if !word.is_empty() {
            words.push(word);
        }
        if word.len() != token.len() {
            break;
        }
    }

    while words.last().map_or(false, |w| STOP_WORDS.contains(&w.to_lowercase().as_str())) {
        words.pop();
    }

    if words.is_empty() {
        return None;
    }

    Some(format!("{} {}", verb, words.join(" ")))
}

fn is_clause_break(text: &str, index: usize, c: char) -> bool {
    match c {
        '\n' | ';' | '!' | '?' => true,
        '.' => text[index + 1..].chars().next().map_or(true, char::is_whitespace),
        _ => false,
    }
}

/// Bounds of the clause enclosing `[start, end)`
fn clause_bounds(text: &str, start: usize, end: usize) -> (usize, usize) {
    let clause_start = text[..start]
        .char_indices()
        .rev()
        .find(|(i, c)| is_clause_break(text, *i, *c))
        .map_or(0, |(i, c)| i + c.len_utf8());
    let clause_end = text[end..]
        .char_indices()
        .find(|(i, c)| is_clause_break(text, end + *i, *c))
        .map_or(text.len(), |(i, _)| end + i);
    (clause_start, clause_end)
}

/// Clauses with their byte offsets
fn clauses(text: &str) -> Vec<(usize, &str)> {
    let mut out = Vec::new();
    let mut start = 0;
    for (i, c) in text.char_indices() {
        if is_clause_break(text, i, c) {
            if !text[start..i].trim().is_empty() {
                out.push((start, &text[start..i]));
            }
            start = i + c.len_utf8();
        }
    }
    if !text[start..].trim().is_empty() {
        out.push((start, &text[start..]));
    }
    out
}

fn is_block_heading(line: &str, has_cue: bool) -> bool {
    let trimmed = line.trim();
    if trimmed.is_empty() || bullet_marker(trimmed).is_some() {
        return false;
    }

    let word_count = trimmed.split_whitespace().count();
    if word_count > 6 {
        return false;
    }
    if trimmed.ends_with(':') {
        return true;
    }

    let letters: Vec<char> = trimmed.chars().filter(|c| c.is_alphabetic()).collect();
    if letters.len() >= 3 && letters.iter().all(|c| c.is_uppercase()) {
        return true;
    }

    let title_case = trimmed
        .split_whitespace()
        .all(|word| word.chars().next().map_or(true, |c| !c.is_lowercase()) || word.len() <= 3);
    has_cue && word_count <= 4 && title_case && !trimmed.ends_with('.')
}
