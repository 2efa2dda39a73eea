//! Colored formatter implementation with terminal color support

use super::formatter::{format_seconds, FormattingOptions, OutputFormatter, PlainFormatter};
use crate::{
    error::Result,
    models::{SamplerOutcome, Target},
    relay::{SubmissionOutcome, SubmissionResult},
};
use colored::*;
use std::fmt::Write as _;

/// Latency classification for color coding
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PerformanceLevel {
    Excellent, // < 50ms
    Good,      // 50-100ms
    Fair,      // 100-300ms
    Poor,      // 300-1000ms
    VeryPoor,  // > 1000ms
}

impl PerformanceLevel {
    pub fn from_seconds(seconds: f64) -> Self {
        let time_ms = seconds * 1000.0;
        if time_ms < 50.0 {
            Self::Excellent
        } else if time_ms < 100.0 {
            Self::Good
        } else if time_ms < 300.0 {
            Self::Fair
        } else if time_ms < 1000.0 {
            Self::Poor
        } else {
            Self::VeryPoor
        }
    }

    pub fn color(&self) -> Color {
        match self {
            Self::Excellent => Color::Green,
            Self::Good => Color::Cyan,
            Self::Fair => Color::Yellow,
            Self::Poor => Color::Magenta,
            Self::VeryPoor => Color::Red,
        }
    }
}

/// Color scheme configuration
#[derive(Debug, Clone)]
pub struct ColorScheme {
    pub header: Color,
    pub success: Color,
    pub warning: Color,
    pub error: Color,
    pub info: Color,
    pub muted: Color,
}

impl Default for ColorScheme {
    fn default() -> Self {
        Self {
            header: Color::Blue,
            success: Color::Green,
            warning: Color::Yellow,
            error: Color::Red,
            info: Color::Cyan,
            muted: Color::BrightBlack,
        }
    }
}

/// Colored formatter; falls back to plain styling when color is disabled
pub struct ColoredFormatter {
    plain_formatter: PlainFormatter,
    options: FormattingOptions,
    color_scheme: ColorScheme,
}

impl ColoredFormatter {
    pub fn new(options: FormattingOptions) -> Self {
        Self::with_color_scheme(options, ColorScheme::default())
    }

    pub fn with_color_scheme(options: FormattingOptions, color_scheme: ColorScheme) -> Self {
        Self {
            plain_formatter: PlainFormatter::new(options.clone()),
            options,
            color_scheme,
        }
    }

    fn colorize(&self, text: &str, color: Color) -> ColoredString {
        if self.options.enable_color {
            text.color(color)
        } else {
            text.normal()
        }
    }

    fn bold(&self, text: &str) -> ColoredString {
        if self.options.enable_color {
            text.bold()
        } else {
            text.normal()
        }
    }

    fn label(&self, text: &str, color: Color) -> ColoredString {
        if self.options.enable_color {
            text.color(color).bold()
        } else {
            text.normal()
        }
    }

    fn seconds_colored(&self, seconds: f64) -> ColoredString {
        self.colorize(
            &format_seconds(seconds),
            PerformanceLevel::from_seconds(seconds).color(),
        )
    }

    fn rate_color(&self, percentage: f64) -> Color {
        if percentage >= 95.0 {
            self.color_scheme.success
        } else if percentage >= 80.0 {
            self.color_scheme.warning
        } else {
            self.color_scheme.error
        }
    }
}

impl OutputFormatter for ColoredFormatter {
    fn format_header(&self, title: &str) -> Result<String> {
        Ok(format!(
            "{}\n{}",
            self.label(title, self.color_scheme.header),
            self.colorize(&"=".repeat(title.len()), self.color_scheme.muted)
        ))
    }

    fn format_target_start(&self, target: &Target) -> Result<String> {
        let mut output = format!("Testing {}...", self.bold(&target.label));
        if self.options.verbose_mode {
            write!(output, "\nURL: {}", self.colorize(&target.url, self.color_scheme.info)).ok();
        }
        Ok(output)
    }

    fn format_outcome(&self, outcome: &SamplerOutcome) -> Result<String> {
        let summary = match outcome {
            SamplerOutcome::Summary(summary) => summary,
            SamplerOutcome::NoData { .. } => {
                return Ok(self
                    .colorize("No successful requests.", self.color_scheme.error)
                    .to_string())
            }
        };

        let counts = format!("{}/{}", summary.successful, summary.attempted);
        let mut output = format!(
            "Successful requests: {}",
            self.colorize(&counts, self.rate_color(summary.success_rate()))
        );
        if self.options.verbose_mode {
            write!(output, " ({:.1}%)", summary.success_rate()).ok();
        }

        let values = [summary.mean_secs, summary.min_secs, summary.max_secs]
            .into_iter()
            .chain(summary.percentiles.iter().map(|p| p.seconds));
        for ((name, _), seconds) in self.plain_formatter.summary_lines(summary).into_iter().zip(values) {
            write!(output, "\n{}: {} seconds", name, self.seconds_colored(seconds)).ok();
        }
        Ok(output)
    }

    fn format_submission(&self, result: &SubmissionResult) -> Result<String> {
        let label = self.bold(&format!("[{}]", result.label));
        let elapsed = self.seconds_colored(result.elapsed.as_secs_f64());
        Ok(match &result.outcome {
            SubmissionOutcome::Accepted { response } => format!(
                "{} {} {} ({} seconds)",
                label,
                self.colorize("Transaction sent successfully:", self.color_scheme.success),
                response,
                elapsed
            ),
            SubmissionOutcome::Rejected { reason } => format!(
                "{} {} {} ({} seconds)",
                label,
                self.colorize("Failed to send transaction:", self.color_scheme.error),
                reason,
                elapsed
            ),
        })
    }
}
