//! Document structures and section segmentation

use crate::config::ExtractionConfig;
use crate::error::Result;
use crate::input::file_detector::DocumentFormat;
use crate::input::text_extractor;
use crate::processing::text_processor::bullet_marker;
use log::debug;
use serde::{Deserialize, Serialize};
use strsim::jaro_winkler;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum SectionKind {
    Summary,
    Experience,
    Projects,
    Skills,
    Education,
    Other,
}

impl SectionKind {
    /// Order used when new sections are appended to a document
    pub const CANONICAL: [SectionKind; 6] = [
        SectionKind::Summary,
        SectionKind::Experience,
        SectionKind::Projects,
        SectionKind::Skills,
        SectionKind::Education,
        SectionKind::Other,
    ];

    pub fn rank(self) -> usize {
        Self::CANONICAL.iter().position(|kind| *kind == self).unwrap_or(Self::CANONICAL.len())
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SectionKind::Summary => "Summary",
            SectionKind::Experience => "Experience",
            SectionKind::Projects => "Projects",
            SectionKind::Skills => "Skills",
            SectionKind::Education => "Education",
            SectionKind::Other => "Other",
        }
    }

    /// Classify a free-form section name, falling back to `Other`
    pub fn from_name(name: &str) -> SectionKind {
        HeaderClassifier::default().classify(name).unwrap_or(SectionKind::Other)
    }
}

impl std::fmt::Display for SectionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Section {
    pub kind: SectionKind,
    /// Header line as written in the source; `None` for the preamble
    pub heading: Option<String>,
    pub body: String,
}

impl Section {
    pub fn new(kind: SectionKind, heading: Option<String>, body: impl Into<String>) -> Self {
        Self {
            kind,
            heading,
            body: body.into(),
        }
    }

    /// Heading to print when rendering, defaulting to the kind name
    pub fn display_heading(&self) -> Option<String> {
        match (&self.heading, self.kind) {
            (Some(heading), _) => Some(heading.clone()),
            (None, SectionKind::Other) => None,
            (None, kind) => Some(kind.to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StructuredResume {
    pub raw_text: String,
    pub sections: Vec<Section>,
}

impl StructuredResume {
    pub fn has_section(&self, kind: SectionKind) -> bool {
        self.sections.iter().any(|section| section.kind == kind)
    }

    /// First section of the given kind
    pub fn section(&self, kind: SectionKind) -> Option<&Section> {
        self.sections.iter().find(|section| section.kind == kind)
    }

    pub fn word_count(&self) -> usize {
        self.raw_text.split_whitespace().count()
    }
}

const EXPERIENCE_HEADERS: &[&str] = &[
    "experience", "work experience", "professional experience", "employment",
    "employment history", "work history", "career history", "relevant experience",
    "professional background",
];

const SKILLS_HEADERS: &[&str] = &[
    "skills", "technical skills", "core competencies", "competencies", "technologies",
    "expertise", "key skills", "skill set", "tools",
];

const EDUCATION_HEADERS: &[&str] = &[
    "education", "academic background", "qualifications", "academic qualifications", "degrees",
];

const SUMMARY_HEADERS: &[&str] = &[
    "summary", "professional summary", "profile", "professional profile", "objective",
    "career objective", "about me", "about",
];

const PROJECT_HEADERS: &[&str] = &[
    "projects", "personal projects", "key projects", "portfolio", "selected projects",
];

const OTHER_HEADERS: &[&str] = &[
    "certifications", "awards", "achievements", "publications", "languages", "interests",
    "hobbies", "references", "volunteer", "activities", "extracurricular", "leadership",
    "honors", "accomplishments", "licenses",
];

/// Single words that identify a section inside a longer header
const CANONICAL_KEYS: &[(&str, SectionKind)] = &[
    ("experience", SectionKind::Experience),
    ("skills", SectionKind::Skills),
    ("skill", SectionKind::Skills),
    ("education", SectionKind::Education),
    ("summary", SectionKind::Summary),
    ("profile", SectionKind::Summary),
    ("objective", SectionKind::Summary),
    ("projects", SectionKind::Projects),
    ("project", SectionKind::Projects),
];

const HEADER_DECORATION: &[char] = &['#', '=', '*'];

const MINOR_WORDS: &[&str] = &["and", "of", "the", "in", "for", "to", "with", "&"];

/// Maps header text to a section kind
#[derive(Debug, Clone)]
pub struct HeaderClassifier {
    threshold: f64,
}

impl Default for HeaderClassifier {
    fn default() -> Self {
        Self::new(ExtractionConfig::default().fuzzy_header_threshold)
    }
}

impl HeaderClassifier {
    pub fn new(threshold: f64) -> Self {
        Self { threshold }
    }

    fn vocabulary() -> impl Iterator<Item = (&'static str, SectionKind)> {
        let groups: [(&'static [&'static str], SectionKind); 6] = [
            (EXPERIENCE_HEADERS, SectionKind::Experience),
            (SKILLS_HEADERS, SectionKind::Skills),
            (EDUCATION_HEADERS, SectionKind::Education),
            (SUMMARY_HEADERS, SectionKind::Summary),
            (PROJECT_HEADERS, SectionKind::Projects),
            (OTHER_HEADERS, SectionKind::Other),
        ];
        groups
            .into_iter()
            .flat_map(|(names, kind)| names.iter().map(move |name| (*name, kind)))
    }

    /// Known section kind for `name`, or `None` when it is not a recognized header
    pub fn classify(&self, name: &str) -> Option<SectionKind> {
        let cleaned = clean_header(name).to_lowercase();
        self.lookup(&cleaned).or_else(|| self.trailing_key(&cleaned))
    }

    /// Exact or close match of the whole header against the vocabulary
    fn lookup(&self, cleaned: &str) -> Option<SectionKind> {
        if cleaned.is_empty() {
            return None;
        }

        if let Some((_, kind)) = Self::vocabulary().find(|(entry, _)| *entry == cleaned) {
            return Some(kind);
        }

        // Close variants only: prefixes like "technologies used" must not collapse into "technologies"
        Self::vocabulary()
            .filter(|(entry, _)| entry.len().abs_diff(cleaned.len()) <= 2)
            .map(|(entry, kind)| (jaro_winkler(entry, cleaned), kind))
            .filter(|(similarity, _)| *similarity >= self.threshold)
            .max_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(std::cmp::Ordering::Equal))
            .map(|(_, kind)| kind)
    }

    /// `<modifier> <key>` headers such as "Leadership Experience".
    /// A leading key word ("Project Manager") is a job title, not a header.
    fn trailing_key(&self, cleaned: &str) -> Option<SectionKind> {
        let last = cleaned.split_whitespace().next_back()?;
        CANONICAL_KEYS
            .iter()
            .find(|(key, _)| *key == last || jaro_winkler(key, last) >= self.threshold)
            .map(|(_, kind)| *kind)
    }
}

/// Strip markdown-ish decoration and a trailing colon from a header line
fn clean_header(line: &str) -> &str {
    let stripped = line.trim().trim_matches(HEADER_DECORATION).trim();
    let stripped = stripped.strip_suffix(':').unwrap_or(stripped);
    stripped.trim_matches(HEADER_DECORATION).trim()
}

struct HeaderCandidate<'a> {
    name: &'a str,
    all_caps: bool,
    ends_with_colon: bool,
}

/// Turns decoded document text into typed sections
#[derive(Debug, Clone)]
pub struct DocumentExtractor {
    config: ExtractionConfig,
    classifier: HeaderClassifier,
}

impl Default for DocumentExtractor {
    fn default() -> Self {
        Self::new(&ExtractionConfig::default())
    }
}

impl DocumentExtractor {
    pub fn new(config: &ExtractionConfig) -> Self {
        Self {
            config: config.clone(),
            classifier: HeaderClassifier::new(config.fuzzy_header_threshold),
        }
    }

    pub fn classifier(&self) -> &HeaderClassifier {
        &self.classifier
    }

    /// Decode `bytes` according to `format_hint` and split the text into sections
    pub fn extract(&self, bytes: &[u8], format_hint: &str) -> Result<StructuredResume> {
        let format = DocumentFormat::from_hint(format_hint)?;
        self.extract_as(bytes, format)
    }

    pub fn extract_as(&self, bytes: &[u8], format: DocumentFormat) -> Result<StructuredResume> {
        let text = text_extractor::extract_text(bytes, format)?;
        Ok(self.structure(&text))
    }

    /// Segment already-decoded text
    pub fn structure(&self, text: &str) -> StructuredResume {
        let mut sections: Vec<Section> = Vec::new();
        let mut current_kind = SectionKind::Other;
        let mut current_heading: Option<String> = None;
        let mut body_lines: Vec<&str> = Vec::new();
        let mut previous_blank = true;

        for line in text.lines() {
            if let Some(kind) = self.header_kind(line, previous_blank) {
                if current_heading.is_some() || !is_blank_body(&body_lines) {
                    sections.push(Section::new(current_kind, current_heading.take(), join_body(&body_lines)));
                }
                current_kind = kind;
                current_heading = Some(line.trim().to_string());
                body_lines.clear();
            } else {
                body_lines.push(line);
            }
            previous_blank = line.trim().is_empty();
        }

        if current_heading.is_some() || !is_blank_body(&body_lines) || sections.is_empty() {
            sections.push(Section::new(current_kind, current_heading, join_body(&body_lines)));
        }

        debug!(
            "Structured {} sections: {:?}",
            sections.len(),
            sections.iter().map(|s| s.kind).collect::<Vec<_>>()
        );

        StructuredResume {
            raw_text: text.to_string(),
            sections,
        }
    }

    fn header_kind(&self, line: &str, previous_blank: bool) -> Option<SectionKind> {
        let candidate = self.header_candidate(line)?;
        let cleaned = candidate.name.to_lowercase();

        if let Some(kind) = self.classifier.lookup(&cleaned) {
            return Some(kind);
        }

        // Key-word headers need layout evidence; a Title Case line inside a section is usually a role
        let set_apart = candidate.all_caps || candidate.ends_with_colon || previous_blank;
        if set_apart {
            if let Some(kind) = self.classifier.trailing_key(&cleaned) {
                return Some(kind);
            }
        }

        if (candidate.all_caps || candidate.ends_with_colon) && previous_blank {
            return Some(SectionKind::Other);
        }

        None
    }

    fn header_candidate<'a>(&self, line: &'a str) -> Option<HeaderCandidate<'a>> {
        let trimmed = line.trim();
        if trimmed.is_empty() || bullet_marker(trimmed).is_some() {
            return None;
        }

        let ends_with_colon = trimmed.trim_end_matches(HEADER_DECORATION).ends_with(':');
        let name = clean_header(trimmed);

        if name.is_empty()
            || name.chars().count() > self.config.header_max_chars
            || name.split_whitespace().count() > self.config.header_max_words
            || name.chars().any(|c| c.is_ascii_digit() || c == ',')
        {
            return None;
        }

        let letters: Vec<char> = name.chars().filter(|c| c.is_alphabetic()).collect();
        if letters.is_empty() {
            return None;
        }

        let all_caps = letters.iter().all(|c| c.is_uppercase());
        let title_case = name.split_whitespace().all(|word| {
            if MINOR_WORDS.contains(&word) {
                return true;
            }
            match word.chars().find(|c| c.is_alphanumeric()) {
                Some(first) => !first.is_alphabetic() || first.is_uppercase(),
                None => true,
            }
        });

        if all_caps || title_case || ends_with_colon {
            Some(HeaderCandidate {
                name,
                all_caps,
                ends_with_colon,
            })
        } else {
            None
        }
    }
}

fn is_blank_body(lines: &[&str]) -> bool {
    lines.iter().all(|line| line.trim().is_empty())
}

/// Join body lines, dropping blank lines at either end
fn join_body(lines: &[&str]) -> String {
    let start = lines.iter().position(|line| !line.trim().is_empty());
    let end = lines.iter().rposition(|line| !line.trim().is_empty());
    match (start, end) {
        (Some(start), Some(end)) => lines[start..=end].join("\n"),
        _ => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RESUME: &str = "Jane Doe\njane@example.com\n\nSUMMARY\nBackend engineer.\n\nWork Experience:\n- Built APIs in Python\n- Cut latency by 40%\n\nSKILLS\nPython, Rust\n\nCERTIFICATIONS\nAWS Solutions Architect\n";

    #[test]
    fn test_structure_splits_known_headers() {
        let resume = DocumentExtractor::default().structure(RESUME);
        let kinds: Vec<SectionKind> = resume.sections.iter().map(|s| s.kind).collect();

        assert_eq!(
            kinds,
            vec![
                SectionKind::Other,
                SectionKind::Summary,
                SectionKind::Experience,
                SectionKind::Skills,
                SectionKind::Other,
            ]
        );
        assert_eq!(resume.sections[0].heading, None);
        assert_eq!(resume.sections[0].body, "Jane Doe\njane@example.com");
        assert_eq!(resume.sections[2].heading.as_deref(), Some("Work Experience:"));
        assert_eq!(resume.sections[2].body, "- Built APIs in Python\n- Cut latency by 40%");
        assert_eq!(resume.sections[4].heading.as_deref(), Some("CERTIFICATIONS"));
    }

    #[test]
    fn test_empty_text_file_yields_one_empty_section() {
        let resume = DocumentExtractor::default().extract(b"", "txt").unwrap();

        assert_eq!(resume.sections.len(), 1);
        assert_eq!(resume.sections[0].kind, SectionKind::Other);
        assert!(resume.sections[0].body.is_empty());
    }

    #[test]
    fn test_no_headers_keeps_whole_text() {
        let text = "just a paragraph about me\nand another line";
        let resume = DocumentExtractor::default().structure(text);

        assert_eq!(resume.sections.len(), 1);
        assert_eq!(resume.sections[0].body, text);
    }

    #[test]
    fn test_fuzzy_headers() {
        let classifier = HeaderClassifier::default();

        assert_eq!(classifier.classify("Work Experiences"), Some(SectionKind::Experience));
        assert_eq!(classifier.classify("EXPERIANCE"), Some(SectionKind::Experience));
        assert_eq!(classifier.classify("Leadership Experience"), Some(SectionKind::Experience));
        assert_eq!(classifier.classify("## Technical Skills:"), Some(SectionKind::Skills));
        assert_eq!(classifier.classify("Awards"), Some(SectionKind::Other));
        assert_eq!(classifier.classify("Technologies Used"), None);
        assert_eq!(classifier.classify("Acme Corporation"), None);
    }

    #[test]
    fn test_unknown_all_caps_header_opens_other_section() {
        let text = "EXPERIENCE\n- Shipped things\n\nMISC NOTES\nLikes hiking";
        let resume = DocumentExtractor::default().structure(text);

        assert_eq!(resume.sections.len(), 2);
        assert_eq!(resume.sections[1].kind, SectionKind::Other);
        assert_eq!(resume.sections[1].heading.as_deref(), Some("MISC NOTES"));
    }

    #[test]
    fn test_title_case_body_lines_are_not_headers() {
        let text = "Experience\nSenior Engineer\nAcme Corp\n- Led migration";
        let resume = DocumentExtractor::default().structure(text);

        assert_eq!(resume.sections.len(), 1);
        assert_eq!(resume.sections[0].body, "Senior Engineer\nAcme Corp\n- Led migration");
    }

    #[test]
    fn test_job_titles_with_section_words_stay_in_experience() {
        let extractor = DocumentExtractor::default();
        let text = "EXPERIENCE\nProject Manager\nAcme Corp\n- Delivered 12 releases\n\nSoftware Engineer\nBeta Inc\n- Built APIs\n\nEducation Coordinator\nState University\n- Ran admissions events";
        let resume = extractor.structure(text);

        assert_eq!(resume.sections.len(), 1);
        let experience = resume.section(SectionKind::Experience).unwrap();
        assert!(experience.body.starts_with("Project Manager\nAcme Corp"));
        assert!(experience.body.contains("Education Coordinator\nState University"));
        assert!(!resume.has_section(SectionKind::Projects));
        assert!(!resume.has_section(SectionKind::Education));

        // A blank line alone does not turn a role into a header
        let spaced = extractor.structure("EXPERIENCE\n\nProject Manager\nAcme Corp\n- Delivered 12 releases");
        assert_eq!(spaced.sections.len(), 1);
        assert_eq!(spaced.sections[0].kind, SectionKind::Experience);

        let classifier = extractor.classifier();
        assert_eq!(classifier.classify("Project Manager"), None);
        assert_eq!(classifier.classify("Education Coordinator"), None);
    }

    #[test]
    fn test_key_word_header_needs_layout_evidence() {
        let extractor = DocumentExtractor::default();

        let spaced = extractor.structure("Jane Doe\n\nLeadership Experience\n- Led a guild of 30 engineers");
        assert_eq!(spaced.sections[1].kind, SectionKind::Experience);

        let inline = extractor.structure("SUMMARY\nBackend engineer\nLeadership Experience\nMentored interns");
        assert_eq!(inline.sections.len(), 1);
        assert!(inline.sections[0].body.contains("Leadership Experience"));
    }

    #[test]
    fn test_unsupported_hint() {
        let err = DocumentExtractor::default().extract(b"hello", "odt").unwrap_err();
        assert_eq!(err.kind(), "unsupported_format");
    }

    #[test]
    fn test_canonical_rank() {
        assert!(SectionKind::Summary.rank() < SectionKind::Experience.rank());
        assert!(SectionKind::Education.rank() < SectionKind::Other.rank());
        assert_eq!(SectionKind::from_name("Core Competencies"), SectionKind::Skills);
        assert_eq!(SectionKind::from_name("Open Source"), SectionKind::Other);
    }
}
