//! Core formatting trait and the plain text implementation

use crate::{
    error::Result,
    models::{RunSummary, SamplerOutcome, Target},
    relay::{SubmissionOutcome, SubmissionReport, SubmissionResult},
};
use std::fmt::Write as _;

/// Main trait for output formatting
pub trait OutputFormatter {
    /// Format a header section
    fn format_header(&self, title: &str) -> Result<String>;

    /// Line printed before a target is sampled
    fn format_target_start(&self, target: &Target) -> Result<String>;

    /// Summary lines for a finished target, or the no-data line
    fn format_outcome(&self, outcome: &SamplerOutcome) -> Result<String>;

    /// One line per relay submission
    fn format_submission(&self, result: &SubmissionResult) -> Result<String>;

    /// Every submission of a plan, in plan order
    fn format_report(&self, report: &SubmissionReport) -> Result<String> {
        let mut lines = Vec::with_capacity(report.len());
        for result in &report.results {
            lines.push(self.format_submission(result)?);
        }
        Ok(lines.join("\n"))
    }
}

/// Configuration options for formatting
#[derive(Debug, Clone)]
pub struct FormattingOptions {
    pub enable_color: bool,
    /// Adds target URLs and success rates to the output
    pub verbose_mode: bool,
}

impl Default for FormattingOptions {
    fn default() -> Self {
        Self {
            enable_color: true,
            verbose_mode: false,
        }
    }
}

/// Seconds with microsecond precision
pub fn format_seconds(seconds: f64) -> String {
    format!("{:.6}", seconds)
}

/// Plain text formatter implementation
pub struct PlainFormatter {
    options: FormattingOptions,
}

impl PlainFormatter {
    pub fn new(options: FormattingOptions) -> Self {
        Self { options }
    }

    pub(crate) fn summary_lines(&self, summary: &RunSummary) -> Vec<(String, String)> {
        let mut lines = vec![
            ("Average time".to_string(), format_seconds(summary.mean_secs)),
            ("Minimum time".to_string(), format_seconds(summary.min_secs)),
            ("Maximum time".to_string(), format_seconds(summary.max_secs)),
        ];
        for p in &summary.percentiles {
            lines.push((format!("{}% percentile", p.rank), format_seconds(p.seconds)));
        }
        lines
    }
}

impl OutputFormatter for PlainFormatter {
    fn format_header(&self, title: &str) -> Result<String> {
        Ok(format!("{}\n{}", title, "=".repeat(title.len())))
    }

    fn format_target_start(&self, target: &Target) -> Result<String> {
        let mut output = format!("Testing {}...", target.label);
        if self.options.verbose_mode {
            write!(output, "\nURL: {}", target.url).ok();
        }
        Ok(output)
    }

    fn format_outcome(&self, outcome: &SamplerOutcome) -> Result<String> {
        let summary = match outcome {
            SamplerOutcome::Summary(summary) => summary,
            SamplerOutcome::NoData { .. } => return Ok("No successful requests.".to_string()),
        };

        let mut output = format!(
            "Successful requests: {}/{}",
            summary.successful, summary.attempted
        );
        if self.options.verbose_mode {
            write!(output, " ({:.1}%)", summary.success_rate()).ok();
        }
        for (name, value) in self.summary_lines(summary) {
            write!(output, "\n{}: {} seconds", name, value).ok();
        }
        Ok(output)
    }

    fn format_submission(&self, result: &SubmissionResult) -> Result<String> {
        let elapsed = format_seconds(result.elapsed.as_secs_f64());
        Ok(match &result.outcome {
            SubmissionOutcome::Accepted { response } => format!(
                "[{}] Transaction sent successfully: {} ({} seconds)",
                result.label, response, elapsed
            ),
            SubmissionOutcome::Rejected { reason } => format!(
                "[{}] Failed to send transaction: {} ({} seconds)",
                result.label, reason, elapsed
            ),
        })
    }
}
