//! Output formatters: console, JSON and Markdown

use crate::config::OutputFormat;
use crate::error::{Result, ResumeMatcherError};
use crate::output::report::AnalysisReport;
use crate::processing::analyzer::ScoreOutcome;
use colored::{Color, Colorize};
use std::path::{Path, PathBuf};

const BAR_WIDTH: usize = 30;

/// Trait for rendering an analysis report
pub trait OutputFormatter {
    fn format_report(&self, report: &AnalysisReport) -> Result<String>;
    fn supports_format(&self) -> OutputFormat;
}

/// Console formatter with optional colors
pub struct ConsoleFormatter {
    use_colors: bool,
    detailed: bool,
}

/// JSON formatter for structured output
pub struct JsonFormatter {
    pretty: bool,
}

/// Markdown formatter for saved reports
pub struct MarkdownFormatter {
    include_metadata: bool,
    detailed: bool,
}

/// Dispatches to the formatter for the requested format
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

    fn format_header(&self, title: &str) -> String {
        if self.use_colors {
            format!("\n{} {}\n", "▓".color(Color::Blue).bold(), title.color(Color::Blue).bold())
        } else {
            format!("\n▓ {}\n", title)
        }
    }

    fn format_skill_list(&self, skills: &[String]) -> String {
        if skills.is_empty() {
            "  (none)\n".to_string()
        } else {
            skills.iter().map(|s| format!("  • {}\n", s)).collect()
        }
    }

    fn format_bar(&self, label: &str, count: usize, max: usize, color: Color) -> String {
        let filled = if max == 0 { 0 } else { count * BAR_WIDTH / max };
        let bar = format!("{}{}", "█".repeat(filled), "░".repeat(BAR_WIDTH - filled));
        format!("  {:<8} {} {}\n", label, self.colorize(&bar, color), count)
    }
}

impl OutputFormatter for ConsoleFormatter {
    fn format_report(&self, report: &AnalysisReport) -> Result<String> {
        let mut output = String::new();

        output.push_str(&self.format_header("💼 RESUME / JOB DESCRIPTION MATCH"));
        output.push_str(&format!(
            "Resume: {} | Job: {} | Generated: {}\n",
            report.metadata.resume_file,
            report.metadata.job_file,
            report.metadata.generated_at.format("%Y-%m-%d %H:%M:%S UTC")
        ));

        if self.detailed {
            output.push_str(&self.format_header("📄 Resume Text"));
            output.push_str(&format!("{}\n", report.previews.resume));
            output.push_str(&self.format_header("📃 Job Description Text"));
            output.push_str(&format!("{}\n", report.previews.job));
        } else {
            for (label, failed, preview) in [
                ("Resume", report.previews.resume_extraction_failed, &report.previews.resume),
                ("Job description", report.previews.job_extraction_failed, &report.previews.job),
            ] {
                if failed {
                    output.push_str(&format!("{}: {}\n", label, self.colorize(preview, Color::Red)));
                }
            }
        }

        output.push_str(&self.format_header("🧠 Skills Found in Resume"));
        output.push_str(&self.format_skill_list(&report.resume_skills));

        output.push_str(&self.format_header("📌 Skills Required in JD"));
        output.push_str(&self.format_skill_list(&report.job_skills));

        let overview = &report.overview;
        let max = overview.matched_count.max(overview.missing_count);
        output.push_str(&self.format_header("📊 Skill Match Overview"));
        output.push_str(&format!(
            "Matched Skills: {} | Missing Skills: {}\n",
            self.colorize(&overview.matched_count.to_string(), Color::Green),
            self.colorize(&overview.missing_count.to_string(), Color::Yellow)
        ));
        output.push_str(&self.format_bar("Matched", overview.matched_count, max, Color::Green));
        output.push_str(&self.format_bar("Missing", overview.missing_count, max, Color::Yellow));

        output.push_str(&self.format_header("📈 Overall Resume-JD Match Score"));
        let score_color = match &report.score {
            ScoreOutcome::Scored { .. } => Color::Cyan,
            ScoreOutcome::Failed { .. } => Color::Red,
        };
        output.push_str(&format!(
            "Match %: {}\n",
            self.colorize(&report.score_label(), score_color)
        ));

        output.push_str(&self.format_header("💡 Suggestions to Improve Your Resume"));
        if report.suggestion.all_covered {
            output.push_str(&format!(
                "{}\n",
                self.colorize(&report.suggestion.message, Color::Green)
            ));
        } else {
            output.push_str(&format!(
                "{}\n",
                self.colorize(&report.suggestion.message, Color::Yellow)
            ));
            output.push_str(&self.format_skill_list(&report.suggestion.skills_to_add));
        }

        Ok(output)
    }

    fn supports_format(&self) -> OutputFormat {
        OutputFormat::Console
    }
}

impl JsonFormatter {
    pub fn new(pretty: bool) -> Self {
        Self { pretty }
    }
}

impl OutputFormatter for JsonFormatter {
    fn format_report(&self, report: &AnalysisReport) -> Result<String> {
        if self.pretty {
            Ok(serde_json::to_string_pretty(report)?)
        } else {
            Ok(serde_json::to_string(report)?)
        }
    }

    fn supports_format(&self) -> OutputFormat {
        OutputFormat::Json
    }
}

impl MarkdownFormatter {
    pub fn new(include_metadata: bool, detailed: bool) -> Self {
        Self {
            include_metadata,
            detailed,
        }
    }

    fn markdown_list(skills: &[String]) -> String {
        if skills.is_empty() {
            "_None_\n".to_string()
        } else {
            skills.iter().map(|s| format!("- {}\n", s)).collect()
        }
    }
}

impl OutputFormatter for MarkdownFormatter {
    fn format_report(&self, report: &AnalysisReport) -> Result<String> {
        let mut output = String::new();

        output.push_str("# 💼 Resume / Job Description Match Report\n\n");

        if self.include_metadata {
            output.push_str(&format!(
                "**Generated:** {} | **Processing Time:** {}ms\n",
                report.metadata.generated_at.format("%Y-%m-%d %H:%M:%S UTC"),
                report.metadata.processing_time_ms
            ));
            output.push_str(&format!(
                "**Resume:** `{}` | **Job:** `{}`\n\n",
                report.metadata.resume_file, report.metadata.job_file
            ));
        }

        if self.detailed {
            output.push_str("## 📄 Resume Text\n\n```text\n");
            output.push_str(&report.previews.resume);
            output.push_str("\n```\n\n## 📃 Job Description Text\n\n```text\n");
            output.push_str(&report.previews.job);
            output.push_str("\n```\n\n");
        }

        output.push_str("## 🧠 Skills Found in Resume\n\n");
        output.push_str(&Self::markdown_list(&report.resume_skills));
        output.push_str("\n## 📌 Skills Required in JD\n\n");
        output.push_str(&Self::markdown_list(&report.job_skills));

        output.push_str("\n## 📊 Skill Match Overview\n\n");
        output.push_str("| Skills | Count |\n");
        output.push_str("|--------|-------|\n");
        output.push_str(&format!("| Matched | {} |\n", report.overview.matched_count));
        output.push_str(&format!("| Missing | {} |\n\n", report.overview.missing_count));

        output.push_str("## 📈 Overall Resume-JD Match Score\n\n");
        output.push_str(&format!("**Match %:** {}\n\n", report.score_label()));

        output.push_str("## 💡 Suggestions to Improve Your Resume\n\n");
        output.push_str(&format!("{}\n\n", report.suggestion.message));
        if !report.suggestion.all_covered {
            output.push_str(&Self::markdown_list(&report.suggestion.skills_to_add));
        }

        Ok(output)
    }

    fn supports_format(&self) -> OutputFormat {
        OutputFormat::Markdown
    }
}

impl ReportGenerator {
    pub fn new() -> Self {
        Self::with_options(true, false, true, true)
    }

    pub fn with_options(use_colors: bool, detailed: bool, pretty_json: bool, include_metadata: bool) -> Self {
        Self {
            console_formatter: ConsoleFormatter::new(use_colors, detailed),
            json_formatter: JsonFormatter::new(pretty_json),
            markdown_formatter: MarkdownFormatter::new(include_metadata, detailed),
        }
    }

    pub fn generate_report(&self, report: &AnalysisReport, format: &OutputFormat) -> Result<String> {
        let formatter: &dyn OutputFormatter = match format {
            OutputFormat::Console => &self.console_formatter,
            OutputFormat::Json => &self.json_formatter,
            OutputFormat::Markdown => &self.markdown_formatter,
        };
        debug_assert_eq!(formatter.supports_format(), *format);
        formatter.format_report(report)
    }
}

impl Default for ReportGenerator {
    fn default() -> Self {
        Self::new()
    }
}

pub fn save_report_to_file(content: &str, file_path: &Path) -> Result<()> {
    use std::fs;
    if let Some(parent) = file_path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    fs::write(file_path, content).map_err(|e| {
        ResumeMatcherError::OutputFormatting(format!(
            "Failed to write report to '{}': {}",
            file_path.display(),
            e
        ))
    })
}

pub fn suggest_filename(format: &OutputFormat, resume_name: &str, timestamp: bool) -> String {
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
        OutputFormat::Console => format!("{}_match{}.txt", base_name, timestamp_suffix),
        OutputFormat::Json => format!("{}_match{}.json", base_name, timestamp_suffix),
        OutputFormat::Markdown => format!("{}_match{}.md", base_name, timestamp_suffix),
    }
}

/// Where `--save` writes: a directory gets a generated report file name,
/// any other path is used as given.
pub fn resolve_save_path(target: &Path, format: &OutputFormat, resume_name: &str) -> PathBuf {
    if target.is_dir() {
        target.join(suggest_filename(format, resume_name, true))
    } else {
        target.to_path_buf()
    }
}
