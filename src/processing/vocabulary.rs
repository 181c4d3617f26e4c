//! Static keyword tables and the matcher compiled from them

use crate::error::{Result, ResumeTailorError};
use crate::processing::text_processor::at_word_boundary;
use aho_corasick::AhoCorasick;

/// (display form, extra surface forms). The lowercased display form is always a pattern.
pub type VocabularyEntry = (&'static str, &'static [&'static str]);

pub const TECHNICAL_SKILLS: &[VocabularyEntry] = &[
    // Programming languages
    ("Python", &[]),
    ("Java", &[]),
    ("JavaScript", &[]),
    ("TypeScript", &[]),
    ("C++", &[]),
    ("C#", &[]),
    ("Ruby", &[]),
    ("Golang", &[]),
    ("Rust", &[]),
    ("Scala", &[]),
    ("Kotlin", &[]),
    ("Swift", &[]),
    ("PHP", &[]),
    ("Perl", &[]),
    ("MATLAB", &[]),
    // Web
    ("HTML", &[]),
    ("CSS", &[]),
    ("React", &["react.js", "reactjs"]),
    ("Angular", &[]),
    ("Vue", &["vue.js", "vuejs"]),
    ("Node.js", &["nodejs"]),
    ("Django", &[]),
    ("Flask", &[]),
    ("FastAPI", &[]),
    ("Spring Boot", &[]),
    ("Spring", &[]),
    (".NET", &[]),
    ("jQuery", &[]),
    ("Redux", &[]),
    ("Webpack", &[]),
    // Databases
    ("SQL", &[]),
    ("MySQL", &[]),
    ("PostgreSQL", &["postgres"]),
    ("MongoDB", &[]),
    ("Redis", &[]),
    ("Elasticsearch", &[]),
    ("Cassandra", &[]),
    ("DynamoDB", &[]),
    ("Oracle", &[]),
    ("SQLite", &[]),
    // Cloud and DevOps
    ("AWS", &[]),
    ("Azure", &[]),
    ("GCP", &[]),
    ("Google Cloud", &[]),
    ("Docker", &[]),
    ("Kubernetes", &["k8s"]),
    ("Jenkins", &[]),
    ("CI/CD", &["ci-cd"]),
    ("Terraform", &[]),
    ("Ansible", &[]),
    ("Linux", &[]),
    ("Unix", &[]),
    // Data and ML
    ("Machine Learning", &[]),
    ("Deep Learning", &[]),
    ("Data Science", &[]),
    ("NLP", &[]),
    ("TensorFlow", &[]),
    ("PyTorch", &[]),
    ("Keras", &[]),
    ("Pandas", &[]),
    ("NumPy", &[]),
    ("Scikit-learn", &["scikit learn", "sklearn"]),
    ("Spark", &[]),
    ("Hadoop", &[]),
    ("Kafka", &[]),
    ("Airflow", &[]),
    // Tooling and practices
    ("Git", &[]),
    ("GitHub", &[]),
    ("GitLab", &[]),
    ("JIRA", &[]),
    ("Confluence", &[]),
    ("Agile", &[]),
    ("Scrum", &[]),
    ("REST API", &["rest apis", "restful api", "restful apis"]),
    ("GraphQL", &[]),
    ("gRPC", &[]),
    ("Microservices", &[]),
];

pub const SOFT_SKILLS: &[VocabularyEntry] = &[
    ("Communication", &[]),
    ("Leadership", &[]),
    ("Teamwork", &[]),
    ("Problem Solving", &["problem-solving"]),
    ("Critical Thinking", &[]),
    ("Creativity", &[]),
    ("Adaptability", &[]),
    ("Time Management", &[]),
    ("Attention to Detail", &[]),
    ("Collaboration", &[]),
    ("Interpersonal", &[]),
    ("Presentation", &[]),
    ("Negotiation", &[]),
    ("Decision Making", &["decision-making"]),
    ("Conflict Resolution", &[]),
    ("Mentoring", &[]),
    ("Analytical", &[]),
    ("Project Management", &[]),
    ("Strategic Planning", &[]),
    ("Self-Motivated", &["self motivated"]),
];

pub const ACTION_VERBS: &[&str] = &[
    "achieved", "managed", "led", "developed", "created", "implemented", "designed",
    "improved", "increased", "reduced", "analyzed", "coordinated", "executed", "delivered",
    "optimized", "streamlined", "established", "collaborated", "initiated", "transformed",
    "spearheaded", "built", "launched", "mentored", "automated", "architected", "migrated",
    "deployed",
];

pub const RESPONSIBILITY_VERBS: &[&str] = &[
    "design", "develop", "build", "implement", "maintain", "manage", "lead", "mentor",
    "deploy", "monitor", "optimize", "troubleshoot", "automate", "architect", "integrate",
    "test", "document", "review", "analyze", "collaborate", "own", "drive", "create",
    "support",
];

pub const CLICHES: &[&str] = &[
    "references available upon request",
    "curriculum vitae",
    "team player",
    "hard worker",
    "hardworking",
    "hard-working",
    "go-getter",
    "think outside the box",
    "results-driven",
    "results driven",
    "self-starter",
    "synergy",
    "proven track record",
    "responsible for",
    "duties included",
];

pub const REQUIRED_CUES: &[&str] = &[
    "required", "requirements", "requirement", "must", "essential", "mandatory", "minimum",
    "at least",
];

pub const PREFERRED_CUES: &[&str] = &[
    "preferred", "nice to have", "nice-to-have", "bonus", "a plus", "desired", "desirable",
    "ideally", "optional",
];

/// Words ignored when judging responsibility coverage
pub const STOP_WORDS: &[&str] = &[
    "a", "an", "and", "or", "but", "in", "on", "at", "to", "for", "of", "with", "by", "from",
    "as", "is", "are", "be", "our", "your", "the", "this", "that", "these", "those", "we",
    "you", "they", "it", "its", "across", "within", "into", "new", "all",
];

/// A keyword found in text, with its canonical display form
#[derive(Debug, Clone, PartialEq)]
pub struct KeywordHit<'m> {
    pub display: &'m str,
    pub start: usize,
    pub end: usize,
}

/// Case-insensitive, whole-word multi-pattern matcher
pub struct KeywordMatcher {
    automaton: AhoCorasick,
    displays: Vec<String>,
}

impl KeywordMatcher {
    pub fn new(entries: &[VocabularyEntry]) -> Result<Self> {
        Self::with_extra(entries, &[])
    }

    /// Build from static entries plus user-supplied keywords
    pub fn with_extra(entries: &[VocabularyEntry], extra: &[String]) -> Result<Self> {
        let mut patterns: Vec<String> = Vec::new();
        let mut displays: Vec<String> = Vec::new();

        for (display, forms) in entries {
            patterns.push(display.to_lowercase());
            displays.push(display.to_string());
            for form in forms.iter() {
                patterns.push(form.to_lowercase());
                displays.push(display.to_string());
            }
        }

        for keyword in extra.iter().map(|k| k.trim()).filter(|k| !k.is_empty()) {
            patterns.push(keyword.to_lowercase());
            displays.push(keyword.to_string());
        }

        // Standard semantics so overlapping search can report every candidate
        let automaton = AhoCorasick::builder()
            .ascii_case_insensitive(true)
            .build(&patterns)
            .map_err(|e| ResumeTailorError::Configuration(format!("Failed to build keyword matcher: {}", e)))?;

        Ok(Self { automaton, displays })
    }

    pub fn from_words(words: &[&'static str]) -> Result<Self> {
        let entries: Vec<VocabularyEntry> = words.iter().map(|w| (*w, &[][..])).collect();
        Self::new(&entries)
    }

    /// All whole-word hits in document order, non-overlapping, longest first at each position.
    /// Boundary checks run before selection, so "Spring Bootcamp" still yields "Spring".
    pub fn find_all<'m>(&'m self, text: &str) -> Vec<KeywordHit<'m>> {
        let mut candidates: Vec<(usize, usize, usize)> = self
            .automaton
            .find_overlapping_iter(text)
            .filter(|mat| at_word_boundary(text, mat.start(), mat.end()))
            .map(|mat| (mat.start(), mat.end(), mat.pattern().as_usize()))
            .collect();
        candidates.sort_by(|a, b| a.0.cmp(&b.0).then(b.1.cmp(&a.1)).then(a.2.cmp(&b.2)));

        let mut hits: Vec<KeywordHit<'m>> = Vec::new();
        let mut covered_until = 0;
        for (start, end, pattern) in candidates {
            if start < covered_until {
                continue;
            }
            covered_until = end;
            hits.push(KeywordHit {
                display: self.displays[pattern].as_str(),
                start,
                end,
            });
        }
        hits
    }

    /// Distinct display forms present in `text`, in first-seen order
    pub fn distinct<'m>(&'m self, text: &str) -> Vec<&'m str> {
        let mut seen: Vec<&'m str> = Vec::new();
        for hit in self.find_all(text) {
            if !seen.contains(&hit.display) {
                seen.push(hit.display);
            }
        }
        seen
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_matcher_prefers_longest_and_reports_display() {
        let matcher = KeywordMatcher::new(TECHNICAL_SKILLS).unwrap();
        let hits = matcher.find_all("Built JavaScript apps on nodejs and Spring Boot");

        let displays: Vec<&str> = hits.iter().map(|h| h.display).collect();
        assert_eq!(displays, vec!["JavaScript", "Node.js", "Spring Boot"]);
    }

    #[test]
    fn test_matcher_skips_embedded_words() {
        let matcher = KeywordMatcher::new(TECHNICAL_SKILLS).unwrap();
        assert!(matcher.find_all("Gitter chat and mssql").is_empty());
    }

    #[test]
    fn test_shorter_keyword_survives_when_longer_one_is_embedded() {
        let matcher = KeywordMatcher::new(TECHNICAL_SKILLS).unwrap();

        let hits = matcher.find_all("Spring Bootcamp graduate");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].display, "Spring");
        assert_eq!((hits[0].start, hits[0].end), (0, 6));

        let displays: Vec<&str> = matcher.find_all("Spring Boot").iter().map(|h| h.display).collect();
        assert_eq!(displays, vec!["Spring Boot"]);
    }

    #[test]
    fn test_soft_skill_variants_collapse() {
        let matcher = KeywordMatcher::new(SOFT_SKILLS).unwrap();
        let distinct = matcher.distinct("problem-solving and Problem Solving");
        assert_eq!(distinct, vec!["Problem Solving"]);
    }

    #[test]
    fn test_extra_keywords() {
        let matcher = KeywordMatcher::with_extra(TECHNICAL_SKILLS, &["Bevy".to_string()]).unwrap();
        assert_eq!(matcher.distinct("games in bevy"), vec!["Bevy"]);
    }
}
