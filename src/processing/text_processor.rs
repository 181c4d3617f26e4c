//! Text processing and normalization

use regex::Regex;
use unicode_segmentation::UnicodeSegmentation;

/// Characters that open a bullet line
pub const BULLET_MARKERS: &[char] = &['-', '•', '*', '▪', '●', '◦', '‣', '–', '○', '■', '➢', '✓'];

pub struct TextProcessor {
    email_regex: Regex,
    phone_regex: Regex,
    whitespace_regex: Regex,
}

impl Default for TextProcessor {
    fn default() -> Self {
        Self::new()
    }
}

impl TextProcessor {
    pub fn new() -> Self {
        let email_regex = Regex::new(r"[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}")
            .expect("Invalid email regex");

        let phone_regex = Regex::new(r"(?:\+?\d{1,3}[-. ]?)?\(?\d{3}\)?[-. ]?\d{3}[-. ]?\d{4}\b")
            .expect("Invalid phone regex");

        let whitespace_regex = Regex::new(r"\s+").expect("Invalid whitespace regex");

        Self {
            email_regex,
            phone_regex,
            whitespace_regex,
        }
    }

    pub fn has_email(&self, text: &str) -> bool {
        self.email_regex.is_match(text)
    }

    pub fn has_phone(&self, text: &str) -> bool {
        self.phone_regex.is_match(text)
    }

    /// Lowercase, unify quotes, turn hyphens into spaces and collapse whitespace
    pub fn normalize(&self, text: &str) -> String {
        let mapped: String = text
            .chars()
            .map(|c| match c {
                '\u{2018}' | '\u{2019}' => '\'',
                '\u{201C}' | '\u{201D}' => '"',
                '-' | '_' | '\u{2010}' | '\u{2011}' => ' ',
                _ => c,
            })
            .collect::<String>()
            .to_lowercase();

        self.whitespace_regex.replace_all(&mapped, " ").trim().to_string()
    }

    /// Split text into sentences, never crossing a line break
    pub fn sentences(&self, text: &str) -> Vec<String> {
        text.lines()
            .flat_map(|line| line.unicode_sentences())
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect()
    }

    pub fn word_count(&self, text: &str) -> usize {
        text.unicode_words().count()
    }
}

/// Normalize a keyword for comparisons and deduplication
pub fn normalize_term(term: &str) -> String {
    let mapped: String = term
        .chars()
        .map(|c| match c {
            '\u{2018}' | '\u{2019}' => '\'',
            '-' | '_' | '\u{2010}' | '\u{2011}' => ' ',
            _ => c,
        })
        .collect();

    mapped.to_lowercase().split_whitespace().collect::<Vec<_>>().join(" ")
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric()
}

/// True when the match `[start, end)` of `haystack` is not glued to surrounding word characters
pub fn at_word_boundary(haystack: &str, start: usize, end: usize) -> bool {
    let before_ok = haystack[..start].chars().next_back().map_or(true, |c| !is_word_char(c));
    let after_ok = haystack[end..].chars().next().map_or(true, |c| !is_word_char(c));
    before_ok && after_ok
}

/// Whole-word, already-normalized containment check
pub fn contains_term(haystack: &str, needle: &str) -> bool {
    if needle.is_empty() {
        return false;
    }
    haystack
        .match_indices(needle)
        .any(|(start, matched)| at_word_boundary(haystack, start, start + matched.len()))
}

/// Bullet marker opening `line`, if any
pub fn bullet_marker(line: &str) -> Option<char> {
    let trimmed = line.trim_start();
    let mut chars = trimmed.chars();
    let first = chars.next()?;
    if !BULLET_MARKERS.contains(&first) {
        return None;
    }
    // "-5%" or "*args" are not bullets
    match chars.next() {
        Some(next) if next.is_whitespace() => Some(first),
        None => None,
        Some(_) if first == '-' || first == '*' => None,
        Some(_) => Some(first),
    }
}
