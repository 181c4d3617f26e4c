//! Report formatters: colored console, JSON and Markdown

use crate::config::ReportFormat;
use crate::error::Result;
use crate::output::report::TailorReport;
use crate::processing::compliance::{ComplianceReport, Dimension, Priority};
use crate::processing::gap_analyzer::GapReport;
use crate::processing::requirements::Importance;
use colored::{Color, Colorize};
use std::path::Path;

/// Trait for rendering a finished report
pub trait OutputFormatter {
    fn format_report(&self, report: &TailorReport) -> Result<String>;
    fn supports_format(&self) -> ReportFormat;
}

/// Console formatter with optional colors and a detailed mode
pub struct ConsoleFormatter {
    use_colors: bool,
    detailed: bool,
}

pub struct JsonFormatter {
    pretty: bool,
}

pub struct MarkdownFormatter {
    include_metadata: bool,
}

/// Picks the formatter for a requested format
pub struct ReportGenerator {
    console_formatter: ConsoleFormatter,
    json_formatter: JsonFormatter,
    markdown_formatter: MarkdownFormatter,
}

impl ConsoleFormatter {
    pub fn new(use_colors: bool, detailed: bool) -> Self {
        Self { use_colors, detailed }
    }

    fn colorize(&self, text: &str, color: Color) -> String {
        if self.use_colors {
            text.color(color).to_string()
        } else {
            text.to_string()
        }
    }

    fn format_header(&self, title: &str, level: u8) -> String {
        let prefix = match level {
            1 => "█",
            2 => "▓",
            3 => "▒",
            _ => "░",
        };

        let color = match level {
            1 => Color::Blue,
            2 => Color::Green,
            3 => Color::Yellow,
            _ => Color::White,
        };

        if self.use_colors {
            format!("\n{} {}\n", prefix.color(color).bold(), title.color(color).bold())
        } else {
            format!("\n{} {}\n", prefix, title)
        }
    }

    fn format_score_badge(&self, score: u8) -> String {
        let (badge, color) = match score {
            90..=100 => ("EXCELLENT", Color::Green),
            80..=89 => ("VERY GOOD", Color::BrightGreen),
            70..=79 => ("GOOD", Color::Yellow),
            60..=69 => ("FAIR", Color::BrightYellow),
            50..=59 => ("BELOW AVG", Color::Red),
            _ => ("POOR", Color::BrightRed),
        };

        if self.use_colors {
            format!("[{}]", badge.color(color).bold())
        } else {
            format!("[{}]", badge)
        }
    }

    fn format_priority_tag(&self, priority: Priority) -> String {
        let (tag, color) = match priority {
            Priority::High => ("[!]", Color::Red),
            Priority::Medium => ("[*]", Color::Yellow),
            Priority::Low => ("[-]", Color::Blue),
        };
        self.colorize(tag, color)
    }

    fn format_gap(&self, gap: &GapReport, output: &mut String) {
        output.push_str(&self.format_header("Job Match", 2));
        output.push_str(&format!(
            "Match Score: {:.1}% {}\n",
            gap.match_score,
            self.format_score_badge(gap.match_score.round() as u8)
        ));
        output.push_str(&format!(
            "Requirements: {} matched, {} missing ({} required)\n",
            gap.matched.len(),
            gap.missing.len(),
            gap.missing_required()
        ));

        if !gap.missing.is_empty() {
            output.push_str(&self.format_header("Missing Requirements", 3));
            for (i, missing) in gap.missing.iter().enumerate() {
                let keyword = &missing.keyword;
                let term = match keyword.importance {
                    Importance::Required => self.colorize(&keyword.term, Color::Red),
                    Importance::Preferred => self.colorize(&keyword.term, Color::Yellow),
                };
                let sections: Vec<&str> = missing.suggested_sections.iter().map(|s| s.as_str()).collect();
                output.push_str(&format!(
                    "{:>3}. {} {}\n",
                    i + 1,
                    term,
                    self.colorize(
                        &format!("({}, {}) -> {}", keyword.category.label(), keyword.importance, sections.join(" / ")),
                        Color::BrightBlack
                    )
                ));
            }
        }

        if self.detailed && !gap.matched.is_empty() {
            output.push_str(&self.format_header("Matched Requirements", 3));
            for keyword in &gap.matched {
                output.push_str(&format!(
                    "  • {} {}\n",
                    self.colorize(&keyword.term, Color::Green),
                    self.colorize(&format!("({})", keyword.category.label()), Color::BrightBlack)
                ));
            }
        }
    }

    fn format_compliance(&self, compliance: &ComplianceReport, output: &mut String) {
        output.push_str(&self.format_header("ATS Compliance", 2));
        output.push_str(&format!(
            "Overall: {:.1}/100  Grade {} {}\n",
            compliance.overall_score,
            self.colorize(&compliance.grade.to_string(), Color::Cyan),
            self.format_score_badge(compliance.overall_score.round() as u8)
        ));

        for dimension in Dimension::ALL {
            if let Some(component) = compliance.components.get(&dimension) {
                output.push_str(&format!(
                    "  {:<10} {:>5.1} (weight: {:.0}%)\n",
                    dimension.label(),
                    component.score,
                    component.weight * 100.0
                ));
                if self.detailed {
                    for issue in &component.issues {
                        output.push_str(&format!("      - {}\n", self.colorize(issue, Color::BrightBlack)));
                    }
                }
            }
        }

        if !compliance.recommendations.is_empty() {
            output.push_str(&self.format_header("Recommendations", 3));
            for (i, rec) in compliance.recommendations.iter().enumerate() {
                output.push_str(&format!(
                    "{}. {} {}: {}\n",
                    i + 1,
                    self.format_priority_tag(rec.priority),
                    rec.category,
                    rec.message
                ));
            }
        }
    }
}

impl OutputFormatter for ConsoleFormatter {
    fn format_report(&self, report: &TailorReport) -> Result<String> {
        let mut output = String::new();

        output.push_str(&self.format_header("RESUME TAILOR REPORT", 1));
        output.push_str(&format!(
            "Generated: {} | Processing time: {}ms\n",
            report.metadata.generated_at.format("%Y-%m-%d %H:%M:%S UTC"),
            report.metadata.processing_time_ms
        ));

        output.push_str(&self.format_header("Summary", 2));
        output.push_str(&format!(
            "Score: {}% {}\n",
            report.summary.headline_score,
            self.format_score_badge(report.summary.headline_score)
        ));
        output.push_str(&format!("Verdict: {}\n", self.colorize(&report.summary.verdict, Color::Cyan)));

        if !report.summary.strengths.is_empty() {
            output.push_str(&self.format_header("Key Strengths", 3));
            for strength in &report.summary.strengths {
                output.push_str(&format!("  • {}\n", self.colorize(strength, Color::Green)));
            }
        }

        if !report.summary.improvement_areas.is_empty() {
            output.push_str(&self.format_header("Improvement Areas", 3));
            for area in &report.summary.improvement_areas {
                output.push_str(&format!("  • {}\n", self.colorize(area, Color::Yellow)));
            }
        }

        if let Some(gap) = &report.gap_report {
            self.format_gap(gap, &mut output);
        }

        self.format_compliance(&report.compliance, &mut output);

        if self.detailed {
            output.push_str(&self.format_header("Detected Sections", 3));
            for section in &report.sections {
                output.push_str(&format!(
                    "  {:<10} {:<30} {} words\n",
                    section.kind.as_str(),
                    section.heading.as_deref().unwrap_or("-"),
                    section.word_count
                ));
            }
        }

        output.push_str(&format!(
            "\n{} resume-tailor v{}\n",
            self.colorize("ℹ", Color::Blue),
            report.metadata.tool_version
        ));

        Ok(output)
    }

    fn supports_format(&self) -> ReportFormat {
        ReportFormat::Console
    }
}

impl JsonFormatter {
    pub fn new(pretty: bool) -> Self {
        Self { pretty }
    }
}

impl OutputFormatter for JsonFormatter {
    fn format_report(&self, report: &TailorReport) -> Result<String> {
        if self.pretty {
            Ok(serde_json::to_string_pretty(report)?)
        } else {
            Ok(serde_json::to_string(report)?)
        }
    }

    fn supports_format(&self) -> ReportFormat {
        ReportFormat::Json
    }
}

impl MarkdownFormatter {
    pub fn new(include_metadata: bool) -> Self {
        Self { include_metadata }
    }

    fn markdown_score_badge(score: u8) -> &'static str {
        match score {
            90..=100 => "🟢 Excellent",
            80..=89 => "🟡 Very Good",
            70..=79 => "🟠 Good",
            60..=69 => "🔴 Fair",
            50..=59 => "🔴 Below Average",
            _ => "🔴 Poor",
        }
    }

    fn file_name(path: &str) -> String {
        Path::new(path)
            .file_name()
            .map(|name| name.to_string_lossy().to_string())
            .unwrap_or_else(|| path.to_string())
    }
}

impl OutputFormatter for MarkdownFormatter {
    fn format_report(&self, report: &TailorReport) -> Result<String> {
        let mut output = String::new();

        output.push_str("# Resume Tailor Report\n\n");

        if self.include_metadata {
            output.push_str(&format!(
                "**Generated:** {} | **Processing Time:** {}ms\n",
                report.metadata.generated_at.format("%Y-%m-%d %H:%M:%S UTC"),
                report.metadata.processing_time_ms
            ));
            output.push_str(&format!("**Resume:** `{}`", Self::file_name(&report.metadata.resume_file)));
            if let Some(job) = &report.metadata.job_file {
                output.push_str(&format!(" | **Job:** `{}`", Self::file_name(job)));
            }
            output.push_str("\n\n");
        }

        output.push_str("## Summary\n\n");
        output.push_str(&format!(
            "**Score:** {}% {}\n\n",
            report.summary.headline_score,
            Self::markdown_score_badge(report.summary.headline_score)
        ));
        output.push_str(&format!("**Verdict:** {}\n\n", report.summary.verdict));

        if !report.summary.strengths.is_empty() {
            output.push_str("### Key Strengths\n\n");
            for strength in &report.summary.strengths {
                output.push_str(&format!("- {}\n", strength));
            }
            output.push('\n');
        }

        if !report.summary.improvement_areas.is_empty() {
            output.push_str("### Areas for Improvement\n\n");
            for area in &report.summary.improvement_areas {
                output.push_str(&format!("- {}\n", area));
            }
            output.push('\n');
        }

        if let Some(gap) = &report.gap_report {
            output.push_str("## Job Match\n\n");
            output.push_str(&format!(
                "**Match Score:** {:.1}% ({} of {} requirements)\n\n",
                gap.match_score,
                gap.matched.len(),
                gap.total()
            ));

            if !gap.missing.is_empty() {
                output.push_str("| Requirement | Category | Importance | Suggested Sections |\n");
                output.push_str("|-------------|----------|------------|--------------------|\n");
                for missing in &gap.missing {
                    let sections: Vec<&str> = missing.suggested_sections.iter().map(|s| s.as_str()).collect();
                    output.push_str(&format!(
                        "| {} | {} | {} | {} |\n",
                        missing.keyword.term,
                        missing.keyword.category.label(),
                        missing.keyword.importance,
                        sections.join(", ")
                    ));
                }
                output.push('\n');
            }

            if !gap.matched.is_empty() {
                let terms: Vec<&str> = gap.matched.iter().map(|k| k.term.as_str()).collect();
                output.push_str(&format!("**Matched:** `{}`\n\n", terms.join("`, `")));
            }
        }

        let compliance = &report.compliance;
        output.push_str("## ATS Compliance\n\n");
        output.push_str(&format!(
            "**Overall:** {:.1}/100 | **Grade:** {}\n\n",
            compliance.overall_score, compliance.grade
        ));
        output.push_str("| Component | Score | Weight |\n");
        output.push_str("|-----------|-------|--------|\n");
        for dimension in Dimension::ALL {
            if let Some(component) = compliance.components.get(&dimension) {
                output.push_str(&format!(
                    "| {} | {:.1} | {:.0}% |\n",
                    dimension.label(),
                    component.score,
                    component.weight * 100.0
                ));
            }
        }
        output.push('\n');

        if !compliance.recommendations.is_empty() {
            output.push_str("### Recommendations\n\n");
            for (i, rec) in compliance.recommendations.iter().enumerate() {
                output.push_str(&format!("{}. **{}** ({} priority): {}\n", i + 1, rec.category, rec.priority, rec.message));
                for issue in &rec.issues {
                    output.push_str(&format!("   - {}\n", issue));
                }
            }
            output.push('\n');
        }

        if self.include_metadata {
            output.push_str("---\n\n");
            output.push_str(&format!("*Generated by resume-tailor v{}*\n", report.metadata.tool_version));
        }

        Ok(output)
    }

    fn supports_format(&self) -> ReportFormat {
        ReportFormat::Markdown
    }
}

impl ReportGenerator {
    pub fn new() -> Self {
        Self {
            console_formatter: ConsoleFormatter::new(true, false),
            json_formatter: JsonFormatter::new(true),
            markdown_formatter: MarkdownFormatter::new(true),
        }
    }

    pub fn with_options(use_colors: bool, detailed: bool, pretty_json: bool, include_metadata: bool) -> Self {
        Self {
            console_formatter: ConsoleFormatter::new(use_colors, detailed),
            json_formatter: JsonFormatter::new(pretty_json),
            markdown_formatter: MarkdownFormatter::new(include_metadata),
        }
    }

    pub fn generate_report(&self, report: &TailorReport, format: ReportFormat) -> Result<String> {
        match format {
            ReportFormat::Console => self.console_formatter.format_report(report),
            ReportFormat::Json => self.json_formatter.format_report(report),
            ReportFormat::Markdown => self.markdown_formatter.format_report(report),
        }
    }
}

impl Default for ReportGenerator {
    fn default() -> Self {
        Self::new()
    }
}

pub fn save_report_to_file(content: &[u8], file_path: &Path) -> Result<()> {
    use std::fs;
    if let Some(parent) = file_path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(file_path, content)?;
    Ok(())
}

pub fn suggest_filename(format: ReportFormat, resume_name: &str, timestamp: bool) -> String {
    let base_name = Path::new(resume_name)
        .file_stem()
        .unwrap_or_default()
        .to_string_lossy();

    let timestamp_suffix = if timestamp {
        format!("_{}", chrono::Utc::now().format("%Y%m%d_%H%M%S"))
    } else {
        String::new()
    };

    match format {
        ReportFormat::Console => format!("{}_report{}.txt", base_name, timestamp_suffix),
        ReportFormat::Json => format!("{}_report{}.json", base_name, timestamp_suffix),
        ReportFormat::Markdown => format!("{}_report{}.md", base_name, timestamp_suffix),
    }
}
