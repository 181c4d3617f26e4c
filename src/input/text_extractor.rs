//! Text extraction from various document formats

use crate::error::{Result, ResumeTailorError};
use crate::input::file_detector::DocumentFormat;
use docx_rs::{DocumentChild, Paragraph, ParagraphChild, RunChild, TableCellContent, TableChild, TableRowChild};
use pulldown_cmark::{Event, Parser, Tag};

pub trait TextExtractor {
    /// Decode raw document bytes into a flat text stream
    fn extract(&self, bytes: &[u8]) -> Result<String>;
}

pub struct PdfExtractor;

impl TextExtractor for PdfExtractor {
    fn extract(&self, bytes: &[u8]) -> Result<String> {
        let text = pdf_extract::extract_text_from_mem(bytes).map_err(|e| {
            ResumeTailorError::corrupt("pdf", format!("Failed to extract text from PDF: {}", e))
        })?;
        Ok(normalize_newlines(&text))
    }
}

pub struct DocxExtractor;

impl TextExtractor for DocxExtractor {
    fn extract(&self, bytes: &[u8]) -> Result<String> {
        let docx = docx_rs::read_docx(bytes).map_err(|e| {
            ResumeTailorError::corrupt("docx", format!("Failed to read DOCX: {}", e))
        })?;

        let mut lines: Vec<String> = Vec::new();
        for child in &docx.document.children {
            match child {
                DocumentChild::Paragraph(paragraph) => lines.push(paragraph_text(paragraph)),
                DocumentChild::Table(table) => {
                    // One line per cell paragraph, rows separated by a blank line
                    for row in &table.rows {
                        if let TableChild::TableRow(row) = row {
                            for cell in &row.cells {
                                if let TableRowChild::TableCell(cell) = cell {
                                    for content in &cell.children {
                                        if let TableCellContent::Paragraph(paragraph) = content {
                                            lines.push(paragraph_text(paragraph));
                                        }
                                    }
                                }
                            }
                            lines.push(String::new());
                        }
                    }
                }
                _ => {}
            }
        }

        let lines: Vec<&str> = lines.iter().map(|line| line.trim_end()).collect();
        Ok(collapse_blank_runs(&lines))
    }
}

/// Visible text of a paragraph: runs, tabs, line breaks and hyperlink text
fn paragraph_text(paragraph: &Paragraph) -> String {
    let mut out = String::new();
    push_paragraph_children(&paragraph.children, &mut out);
    out
}

fn push_paragraph_children(children: &[ParagraphChild], out: &mut String) {
    for child in children {
        match child {
            ParagraphChild::Run(run) => {
                for run_child in &run.children {
                    match run_child {
                        RunChild::Text(text) => out.push_str(&text.text),
                        RunChild::Tab(_) => out.push('\t'),
                        RunChild::Break(_) => out.push('\n'),
                        _ => {}
                    }
                }
            }
            ParagraphChild::Hyperlink(link) => push_paragraph_children(&link.children, out),
            _ => {}
        }
    }
}

pub struct PlainTextExtractor;

impl TextExtractor for PlainTextExtractor {
    fn extract(&self, bytes: &[u8]) -> Result<String> {
        decode_utf8(bytes, "txt")
    }
}

pub struct MarkdownExtractor;

impl TextExtractor for MarkdownExtractor {
    fn extract(&self, bytes: &[u8]) -> Result<String> {
        let markdown_content = decode_utf8(bytes, "md")?;
        Ok(self.markdown_to_text(&markdown_content))
    }
}

impl MarkdownExtractor {
    /// Flatten markdown into lines: headings on their own line, list items as `- ` bullets
    fn markdown_to_text(&self, markdown: &str) -> String {
        let mut out = String::new();
        let mut list_depth: usize = 0;

        for event in Parser::new(markdown) {
            match event {
                Event::Start(Tag::Heading(..)) => ensure_line_start(&mut out),
                // Loose list items wrap their text in a paragraph
                Event::Start(Tag::Paragraph) if !out.ends_with("- ") => ensure_line_start(&mut out),
                Event::End(Tag::Heading(..)) => out.push('\n'),
                Event::End(Tag::Paragraph) => {
                    out.push('\n');
                    if list_depth == 0 {
                        out.push('\n');
                    }
                }
                Event::Start(Tag::List(_)) => {
                    ensure_line_start(&mut out);
                    list_depth += 1;
                }
                Event::End(Tag::List(_)) => {
                    list_depth = list_depth.saturating_sub(1);
                    if list_depth == 0 {
                        ensure_line_start(&mut out);
                        out.push('\n');
                    }
                }
                Event::Start(Tag::Item) => {
                    ensure_line_start(&mut out);
                    out.push_str(&"  ".repeat(list_depth.saturating_sub(1)));
                    out.push_str("- ");
                }
                Event::End(Tag::Item) => ensure_line_start(&mut out),
                Event::Text(text) | Event::Code(text) => out.push_str(&text),
                Event::SoftBreak | Event::HardBreak => out.push('\n'),
                Event::Rule => ensure_line_start(&mut out),
                _ => {}
            }
        }

        let lines: Vec<&str> = out.lines().map(|line| line.trim_end()).collect();
        collapse_blank_runs(&lines)
    }
}

/// Route bytes to the extractor for `format`
pub fn extract_text(bytes: &[u8], format: DocumentFormat) -> Result<String> {
    match format {
        DocumentFormat::Text => PlainTextExtractor.extract(bytes),
        DocumentFormat::Markdown => MarkdownExtractor.extract(bytes),
        DocumentFormat::Pdf => PdfExtractor.extract(bytes),
        DocumentFormat::Docx => DocxExtractor.extract(bytes),
    }
}

fn decode_utf8(bytes: &[u8], format: &str) -> Result<String> {
    let text = std::str::from_utf8(bytes).map_err(|e| {
        ResumeTailorError::corrupt(format, format!("Content is not valid UTF-8: {}", e))
    })?;
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    Ok(normalize_newlines(text))
}

fn normalize_newlines(text: &str) -> String {
    text.replace("\r\n", "\n").replace('\r', "\n")
}

fn ensure_line_start(out: &mut String) {
    if !out.is_empty() && !out.ends_with('\n') {
        out.push('\n');
    }
}

fn collapse_blank_runs(lines: &[&str]) -> String {
    let mut kept: Vec<&str> = Vec::with_capacity(lines.len());
    for line in lines {
        if line.is_empty() && kept.last().map_or(true, |last| last.is_empty()) {
            continue;
        }
        kept.push(line);
    }
    while kept.last().map_or(false, |last| last.is_empty()) {
        kept.pop();
    }
    kept.join("\n")
}
