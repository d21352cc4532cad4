use crate::models::{
    AnalysisResult, IssueSummary, PageReport, Priority, Severity, SitemapEntry, Suggestion,
    ValidationReport,
};
use anyhow::{Context, Result, bail};
use colored::*;
use serde::Serialize;
use std::fs::File;
use std::io::Write;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
    Xml,
}

impl OutputFormat {
    pub fn parse(value: Option<&str>) -> Result<Self> {
        match value.map(str::to_lowercase).as_deref() {
            None | Some("text") => Ok(OutputFormat::Text),
            Some("json") => Ok(OutputFormat::Json),
            Some("xml") => Ok(OutputFormat::Xml),
            Some(other) => bail!("Unknown output format '{}': expected text, json or xml", other),
        }
    }
}

pub struct Reporter;

impl Reporter {
    pub fn generate_report(
        source: &str,
        analysis: AnalysisResult,
        extra_suggestions: Vec<Suggestion>,
    ) -> PageReport {
        let summary = Self::calculate_summary(&analysis, &extra_suggestions);
        let timestamp = chrono::Utc::now().to_rfc3339();

        PageReport {
            source: source.to_string(),
            analysis,
            extra_suggestions,
            summary,
            timestamp,
        }
    }

    fn calculate_summary(analysis: &AnalysisResult, extra: &[Suggestion]) -> IssueSummary {
        let mut summary = IssueSummary {
            suggestions: analysis.suggestions.len() + extra.len(),
            ..Default::default()
        };

        for issue in &analysis.issues {
            match issue.severity {
                Severity::Critical => summary.critical += 1,
                Severity::Warning => summary.warnings += 1,
                Severity::Info => summary.infos += 1,
            }
        }

        summary
    }

    pub fn print_text_report(report: &PageReport) {
        let analysis = &report.analysis;

        println!("\n{}", "=".repeat(80).bright_blue());
        println!("{}", "Pagelint - SEO Report".bright_cyan().bold());
        println!("{}", "=".repeat(80).bright_blue());
        println!();

        println!("{}: {}", "Page".bright_white().bold(), report.source);
        println!("{}: {}", "Timestamp".bright_white().bold(), report.timestamp);
        println!();

        let score = analysis.score.to_string();
        let score = if analysis.score >= 80 {
            score.bright_green()
        } else if analysis.score >= 50 {
            score.yellow()
        } else {
            score.bright_red()
        };
        println!(
            "{} {}/100  ({} of {} checks passed)",
            "Score:".bright_white().bold(),
            score.bold(),
            analysis.passed,
            analysis.total
        );
        println!();

        // Summary
        println!("{}", "Summary".bright_yellow().bold().underline());
        println!(
            "  Critical:      {}",
            if report.summary.critical > 0 {
                report.summary.critical.to_string().bright_red()
            } else {
                report.summary.critical.to_string().bright_green()
            }
        );
        println!(
            "  Warnings:      {}",
            if report.summary.warnings > 0 {
                report.summary.warnings.to_string().yellow()
            } else {
                report.summary.warnings.to_string().bright_green()
            }
        );
        println!(
            "  Info:          {}",
            report.summary.infos.to_string().bright_cyan()
        );
        println!(
            "  Suggestions:   {}",
            report.summary.suggestions.to_string().bright_cyan()
        );
        println!(
            "  Words:         {}   H1: {}   Images: {}   Links: {}",
            analysis.metrics.word_count,
            analysis.metrics.h1_count,
            analysis.metrics.image_count,
            analysis.metrics.link_count
        );
        println!(
            "  Est. weight:   {:.1} KB (~{} ms)",
            analysis.metrics.estimated_page_size_kb, analysis.metrics.estimated_load_time_ms
        );
        println!();

        if !analysis.issues.is_empty() {
            println!("{}", "Issues".bright_yellow().bold().underline());
            for issue in &analysis.issues {
                let severity_str = match issue.severity {
                    Severity::Critical => "CRIT ".bright_red(),
                    Severity::Warning => "WARN ".yellow(),
                    Severity::Info => "INFO ".bright_cyan(),
                };
                println!("  [{}] {} {}", severity_str, issue.category.to_string().dimmed(), issue.message);
                if let Some(fix) = &issue.fix {
                    println!("          {} {}", "fix:".dimmed(), fix);
                }
            }
            println!();
        }

        let suggestions: Vec<&Suggestion> = analysis
            .suggestions
            .iter()
            .chain(report.extra_suggestions.iter())
            .collect();
        if !suggestions.is_empty() {
            Self::print_suggestion_list(&suggestions);
        }

        println!("{}", "=".repeat(80).bright_blue());
    }

    pub fn print_suggestions(suggestions: &[Suggestion]) {
        if suggestions.is_empty() {
            println!("{}", "No suggestions, nice work.".bright_green());
            return;
        }
        let suggestions: Vec<&Suggestion> = suggestions.iter().collect();
        Self::print_suggestion_list(&suggestions);
    }

    fn print_suggestion_list(suggestions: &[&Suggestion]) {
        println!("{}", "Suggestions".bright_yellow().bold().underline());
        let mut sorted = suggestions.to_vec();
        sorted.sort_by_key(|suggestion| suggestion.priority);
        for suggestion in sorted {
            let priority = match suggestion.priority {
                Priority::High => "HIGH".bright_red(),
                Priority::Medium => "MED ".yellow(),
                Priority::Low => "LOW ".bright_cyan(),
            };
            println!("  [{}] {} {}", priority, suggestion.category.dimmed(), suggestion.message);
            println!("         {}", suggestion.impact.dimmed());
        }
        println!();
    }

    pub fn print_validation(report: &ValidationReport) {
        if report.valid {
            println!("{}", "Schema is valid".bright_green().bold());
        } else {
            println!("{}", "Schema is invalid".bright_red().bold());
        }
        for error in &report.errors {
            println!("  [{}] {}", "ERROR".bright_red(), error);
        }
        for warning in &report.warnings {
            println!("  [{}] {}", "WARN ".yellow(), warning);
        }
    }

    pub fn print_sitemap(entries: &[SitemapEntry]) {
        println!("{}", "Sitemap Entries".bright_yellow().bold().underline());
        for entry in entries {
            println!(
                "  {:.1}  {:<8} {}  {}",
                entry.priority,
                entry.changefreq.as_str(),
                entry.lastmod.dimmed(),
                entry.url
            );
        }
        println!(
            "{} {} URL(s)",
            "Total:".bright_white().bold(),
            entries.len().to_string().bright_green()
        );
    }

    pub fn print_json<T: Serialize>(value: &T) -> Result<()> {
        let json = serde_json::to_string_pretty(value)?;
        println!("{}", json);
        Ok(())
    }

    pub fn save_json_report<T: Serialize>(report: &T, filename: &str) -> Result<()> {
        let json = serde_json::to_string_pretty(report)?;
        let mut file = File::create(filename)
            .with_context(|| format!("Failed to create report file: {}", filename))?;
        file.write_all(json.as_bytes())?;
        println!("Report saved to: {}", filename.bright_green());
        Ok(())
    }
}
