//! Re-emits a resume with user-approved additions

use crate::error::{Result, ResumeTailorError};
use crate::input::file_detector::DocumentFormat;
use crate::processing::document::{HeaderClassifier, Section, SectionKind, StructuredResume};
use docx_rs::{Docx, Paragraph, Run};
use log::debug;
use printpdf::{BuiltinFont, Color, IndirectFontRef, Mm, PdfDocument, PdfDocumentReference, PdfLayerReference, Rgb};
use serde::{Deserialize, Serialize};

/// Marker placed in front of every inserted line
pub const NEW_MARKER: &str = "[NEW]";

/// A user-approved line of content for one section
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Addition {
    pub keyword: String,
    pub target_section: String,
    pub content: String,
    #[serde(default)]
    pub category: String,
}

impl Addition {
    pub fn new(
        keyword: impl Into<String>,
        target_section: impl Into<String>,
        content: impl Into<String>,
        category: impl Into<String>,
    ) -> Self {
        Self {
            keyword: keyword.into(),
            target_section: target_section.into(),
            content: content.into(),
            category: category.into(),
        }
    }

    pub fn is_blank(&self) -> bool {
        self.content.trim().is_empty()
    }

    /// The line as it appears in the composed document
    pub fn rendered(&self) -> String {
        format!("- {} {}", NEW_MARKER, self.content.trim())
    }
}

/// A section ready for serialization: original body plus inserted lines
#[derive(Debug, Clone)]
struct ComposedSection {
    heading: Option<String>,
    body: String,
    added: Vec<String>,
}

impl ComposedSection {
    fn from_section(section: &Section) -> Self {
        Self {
            heading: section.heading.clone(),
            body: section.body.clone(),
            added: Vec::new(),
        }
    }
}

pub struct DocumentComposer {
    classifier: HeaderClassifier,
}

impl Default for DocumentComposer {
    fn default() -> Self {
        Self::new(HeaderClassifier::default())
    }
}

impl DocumentComposer {
    pub fn new(classifier: HeaderClassifier) -> Self {
        Self { classifier }
    }

    pub fn compose(&self, resume: &StructuredResume, additions: &[Addition], output_format: &str) -> Result<Vec<u8>> {
        let format = DocumentFormat::from_hint(output_format)?;

        if additions.iter().all(Addition::is_blank) {
            return Err(ResumeTailorError::EmptyAdditions);
        }

        let sections = self.merge(resume, additions);
        debug!(
            "Composing {} sections with {} additions as {}",
            sections.len(),
            additions.len(),
            format
        );

        match format {
            DocumentFormat::Text => Ok(write_text(&sections).into_bytes()),
            DocumentFormat::Markdown => Ok(write_markdown(&sections).into_bytes()),
            DocumentFormat::Pdf => write_pdf(&sections),
            DocumentFormat::Docx => write_docx(&sections),
        }
    }

    /// Place every addition in its target section, creating missing sections at the end
    fn merge(&self, resume: &StructuredResume, additions: &[Addition]) -> Vec<ComposedSection> {
        let mut existing: Vec<(SectionKind, ComposedSection)> = resume
            .sections
            .iter()
            .map(|section| (section.kind, ComposedSection::from_section(section)))
            .collect();
        let mut created: Vec<(SectionKind, ComposedSection)> = Vec::new();

        for addition in additions.iter().filter(|a| !a.is_blank()) {
            let target = addition.target_section.trim();
            let kind = self.classifier.classify(target).unwrap_or(SectionKind::Other);
            let line = addition.rendered();

            let matches = |(section_kind, section): &(SectionKind, ComposedSection)| {
                if kind == SectionKind::Other {
                    section
                        .heading
                        .as_deref()
                        .map_or(false, |heading| same_heading(heading, target))
                } else {
                    *section_kind == kind
                }
            };

            if let Some(index) = existing.iter().position(|entry| matches(entry)) {
                existing[index].1.added.push(line);
            } else if let Some(index) = created.iter().position(|entry| matches(entry)) {
                created[index].1.added.push(line);
            } else {
                let heading = match kind {
                    SectionKind::Other if !target.is_empty() => target.to_string(),
                    _ => kind.to_string(),
                };
                created.push((
                    kind,
                    ComposedSection {
                        heading: Some(heading),
                        body: String::new(),
                        added: vec![line],
                    },
                ));
            }
        }

        created.sort_by_key(|(kind, _)| kind.rank());
        existing
            .into_iter()
            .chain(created)
            .map(|(_, section)| section)
            .collect()
    }
}

fn same_heading(heading: &str, target: &str) -> bool {
    let clean = |s: &str| {
        s.trim()
            .trim_matches(|c: char| c == '#' || c == '*' || c == ':')
            .trim()
            .to_lowercase()
    };
    clean(heading) == clean(target)
}

fn section_lines(section: &ComposedSection) -> Vec<&str> {
    let mut lines: Vec<&str> = Vec::new();
    if !section.body.is_empty() {
        lines.extend(section.body.lines());
    }
    lines.extend(section.added.iter().map(String::as_str));
    lines
}

fn write_text(sections: &[ComposedSection]) -> String {
    let mut blocks: Vec<String> = Vec::new();
    for section in sections {
        let mut block: Vec<&str> = Vec::new();
        if let Some(heading) = &section.heading {
            block.push(heading);
        }
        block.extend(section_lines(section));
        if !block.is_empty() {
            blocks.push(block.join("\n"));
        }
    }

    let mut out = blocks.join("\n\n");
    out.push('\n');
    out
}

fn write_markdown(sections: &[ComposedSection]) -> String {
    let mut blocks: Vec<String> = Vec::new();
    for section in sections {
        let mut block = String::new();
        if let Some(heading) = &section.heading {
            block.push_str("## ");
            block.push_str(heading.trim_start_matches('#').trim());
            block.push_str("\n\n");
        }
        if !section.body.is_empty() {
            block.push_str(&section.body);
            block.push('\n');
        }
        // A bullet line continues a list or interrupts a paragraph, so no blank line is needed
        for line in &section.added {
            block.push_str(line);
            block.push('\n');
        }
        let block = block.trim_end().to_string();
        if !block.is_empty() {
            blocks.push(block);
        }
    }

    let mut out = blocks.join("\n\n");
    out.push('\n');
    out
}

const PAGE_WIDTH: f32 = 210.0;
const PAGE_HEIGHT: f32 = 297.0;
const MARGIN: f32 = 20.0;
const BODY_SIZE: f32 = 10.0;
const HEADING_SIZE: f32 = 13.0;
const LINE_HEIGHT: f32 = 5.5;
const WRAP_COLUMNS: usize = 95;

struct PdfCursor {
    layer: PdfLayerReference,
    y: f32,
}

impl PdfCursor {
    /// Write one line, starting a new page when the bottom margin is reached
    fn line(&mut self, doc: &PdfDocumentReference, text: &str, size: f32, font: &IndirectFontRef, color: &Color) {
        if self.y < MARGIN {
            let (page, layer) = doc.add_page(Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), "Layer 1");
            self.layer = doc.get_page(page).get_layer(layer);
            self.y = PAGE_HEIGHT - MARGIN;
        }
        self.layer.set_fill_color(color.clone());
        self.layer.use_text(text, size, Mm(MARGIN), Mm(self.y), font);
        self.y -= LINE_HEIGHT * size / BODY_SIZE;
    }
}

fn pdf_error(e: printpdf::Error) -> ResumeTailorError {
    ResumeTailorError::OutputFormatting(format!("PDF generation failed: {}", e))
}

fn write_pdf(sections: &[ComposedSection]) -> Result<Vec<u8>> {
    let (doc, page, layer) = PdfDocument::new("Resume", Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), "Layer 1");
    let regular = doc.add_builtin_font(BuiltinFont::Helvetica).map_err(pdf_error)?;
    let bold = doc.add_builtin_font(BuiltinFont::HelveticaBold).map_err(pdf_error)?;

    let black = Color::Rgb(Rgb::new(0.0, 0.0, 0.0, None));
    let dark_blue = Color::Rgb(Rgb::new(0.05, 0.15, 0.55, None));

    let mut cursor = PdfCursor {
        layer: doc.get_page(page).get_layer(layer),
        y: PAGE_HEIGHT - MARGIN,
    };

    for section in sections {
        if let Some(heading) = &section.heading {
            cursor.line(&doc, heading, HEADING_SIZE, &bold, &black);
        }
        for line in section.body.lines().filter(|l| !l.trim().is_empty()) {
            for wrapped in wrap(line, WRAP_COLUMNS) {
                cursor.line(&doc, &wrapped, BODY_SIZE, &regular, &black);
            }
        }
        for line in &section.added {
            for wrapped in wrap(line, WRAP_COLUMNS) {
                cursor.line(&doc, &wrapped, BODY_SIZE, &regular, &dark_blue);
            }
        }
        cursor.y -= LINE_HEIGHT;
    }

    doc.save_to_bytes().map_err(pdf_error)
}

/// Half-points, as DOCX measures font size
const DOCX_HEADING_SIZE: usize = 26;
const DOCX_ADDED_COLOR: &str = "0D268C";

fn write_docx(sections: &[ComposedSection]) -> Result<Vec<u8>> {
    let mut docx = Docx::new();

    for (index, section) in sections.iter().enumerate() {
        if index > 0 {
            docx = docx.add_paragraph(Paragraph::new());
        }
        if let Some(heading) = &section.heading {
            let run = Run::new().add_text(heading.as_str()).bold().size(DOCX_HEADING_SIZE);
            docx = docx.add_paragraph(Paragraph::new().add_run(run));
        }
        for line in section.body.lines() {
            docx = docx.add_paragraph(Paragraph::new().add_run(Run::new().add_text(line)));
        }
        for line in &section.added {
            let run = Run::new().add_text(line.as_str()).color(DOCX_ADDED_COLOR);
            docx = docx.add_paragraph(Paragraph::new().add_run(run));
        }
    }

    let mut buffer = std::io::Cursor::new(Vec::new());
    docx.build().pack(&mut buffer).map_err(|e| {
        ResumeTailorError::OutputFormatting(format!("DOCX generation failed: {}", e))
    })?;
    Ok(buffer.into_inner())
}

/// Greedy word wrap on character count
fn wrap(line: &str, columns: usize) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    let mut current = String::new();

    for word in line.split_whitespace() {
        let needed = if current.is_empty() {
            word.chars().count()
        } else {
            current.chars().count() + 1 + word.chars().count()
        };
        if needed > columns && !current.is_empty() {
            out.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(word);
    }

    if !current.is_empty() {
        out.push(current);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::text_extractor;
    use crate::processing::document::DocumentExtractor;

    const RESUME: &str = "Jane Doe\njane@example.com\n\nEXPERIENCE\n- Built payment APIs\n- Cut latency by 40%\n\nEDUCATION\nB.S. in Computer Science, State University";

    fn resume() -> StructuredResume {
        DocumentExtractor::default().structure(RESUME)
    }

    #[test]
    fn test_empty_additions_rejected() {
        let composer = DocumentComposer::default();
        let err = composer.compose(&resume(), &[], "txt").unwrap_err();
        assert!(matches!(err, ResumeTailorError::EmptyAdditions));

        let blank = vec![Addition::new("AWS", "Skills", "   ", "technical_skill")];
        let err = composer.compose(&resume(), &blank, "txt").unwrap_err();
        assert!(matches!(err, ResumeTailorError::EmptyAdditions));
    }

    #[test]
    fn test_unknown_format_rejected() {
        let additions = vec![Addition::new("AWS", "Skills", "AWS", "technical_skill")];
        let err = DocumentComposer::default().compose(&resume(), &additions, "odt").unwrap_err();
        assert!(matches!(err, ResumeTailorError::UnsupportedFormat(_)));
    }

    #[test]
    fn test_text_output_is_superset_and_orders_new_sections() {
        let additions = vec![
            Addition::new("AWS", "Skills", "AWS", "technical_skill"),
            Addition::new("Leadership", "Summary", "Led a team of four engineers", "soft_skill"),
            Addition::new("Docker", "Experience", "Containerized services with Docker", "technical_skill"),
        ];
        let bytes = DocumentComposer::default().compose(&resume(), &additions, "txt").unwrap();
        let text = String::from_utf8(bytes).unwrap();

        for line in RESUME.lines().filter(|l| !l.is_empty()) {
            assert!(text.contains(line), "missing original line {:?}", line);
        }
        assert!(text.contains("- Cut latency by 40%\n- [NEW] Containerized services with Docker"));

        let summary = text.find("Summary\n- [NEW] Led a team").unwrap();
        let skills = text.find("Skills\n- [NEW] AWS").unwrap();
        let education = text.find("EDUCATION").unwrap();
        assert!(education < summary);
        assert!(summary < skills);

        let reparsed = DocumentExtractor::default().extract(text.as_bytes(), "txt").unwrap();
        assert!(reparsed.has_section(SectionKind::Skills));
        assert!(reparsed.has_section(SectionKind::Summary));
    }

    #[test]
    fn test_markdown_round_trip_keeps_every_line() {
        let additions = vec![
            Addition::new("Kubernetes", "Experience", "Ran workloads on Kubernetes", "technical_skill"),
            Addition::new("AWS Certified", "Certifications", "AWS Certified Developer", "other"),
        ];
        let bytes = DocumentComposer::default().compose(&resume(), &additions, "md").unwrap();
        let markdown = String::from_utf8(bytes).unwrap();
        assert!(markdown.contains("## EXPERIENCE"));

        let reparsed = DocumentExtractor::default().extract(markdown.as_bytes(), "md").unwrap();
        for line in RESUME.lines().filter(|l| !l.is_empty()) {
            assert!(reparsed.raw_text.contains(line), "missing original line {:?}", line);
        }
        assert!(reparsed.raw_text.contains("- [NEW] Ran workloads on Kubernetes"));
        assert!(reparsed.raw_text.contains("Certifications\n- [NEW] AWS Certified Developer"));
    }

    #[test]
    fn test_unknown_target_reuses_created_section() {
        let additions = vec![
            Addition::new("Open source", "Open Source", "Maintainer of tokio-foo", "other"),
            Addition::new("Open source", "open source:", "Contributor to serde", "other"),
        ];
        let bytes = DocumentComposer::default().compose(&resume(), &additions, "txt").unwrap();
        let text = String::from_utf8(bytes).unwrap();

        assert_eq!(text.matches("Open Source").count(), 1);
        assert!(text.ends_with("Open Source\n- [NEW] Maintainer of tokio-foo\n- [NEW] Contributor to serde\n"));
    }

    #[test]
    fn test_pdf_round_trip_keeps_added_line() {
        let additions = vec![
            Addition::new("Kubernetes", "Experience", "Ran workloads on Kubernetes", "technical_skill"),
            Addition::new("AWS", "Skills", "AWS", "technical_skill"),
        ];
        let bytes = DocumentComposer::default().compose(&resume(), &additions, "pdf").unwrap();
        assert!(bytes.starts_with(b"%PDF"));

        let text = text_extractor::extract_text(&bytes, DocumentFormat::Pdf).unwrap();
        assert!(text.contains("[NEW] Ran workloads on Kubernetes"), "{:?}", text);
        assert!(text.contains("[NEW] AWS"), "{:?}", text);
        assert!(text.contains("Built payment APIs"), "{:?}", text);
    }

    #[test]
    fn test_docx_round_trip_keeps_every_line() {
        let additions = vec![
            Addition::new("Kubernetes", "Experience", "Ran workloads on Kubernetes", "technical_skill"),
            Addition::new("AWS", "Skills", "AWS", "technical_skill"),
        ];
        let bytes = DocumentComposer::default().compose(&resume(), &additions, "docx").unwrap();
        assert!(bytes.starts_with(b"PK"));

        let reparsed = DocumentExtractor::default().extract(&bytes, "docx").unwrap();
        for line in RESUME.lines().filter(|l| !l.is_empty()) {
            assert!(reparsed.raw_text.contains(line), "missing original line {:?}", line);
        }
        let experience = reparsed.section(SectionKind::Experience).unwrap();
        assert!(experience.body.ends_with("- Cut latency by 40%\n- [NEW] Ran workloads on Kubernetes"));
        assert!(reparsed.section(SectionKind::Skills).unwrap().body.contains("- [NEW] AWS"));
    }

    #[test]
    fn test_wrap() {
        assert_eq!(wrap("one two three", 7), vec!["one two", "three"]);
        assert_eq!(wrap("", 10), Vec::<String>::new());
    }
}
