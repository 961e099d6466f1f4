// Author: Eshan Roy
// SPDX-License-Identifier: MIT

//! Lint report types.

use crate::config::{OutputFormat, Severity};
use console::{style, Style};

/// A single rule violation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LintIssue {
    /// Name of the violated rule.
    pub rule: String,
    /// Severity the rule is configured with.
    pub severity: Severity,
    /// Human-readable message, including the threshold where there is one.
    pub message: String,
    /// Optional suggestion for fixing.
    pub suggestion: Option<String>,
    /// 1-based line of the message where the issue was found.
    pub line: Option<usize>,
}

impl LintIssue {
    /// Whether this issue fails the check.
    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }

    /// Format the issue for terminal output.
    pub fn format(&self) -> String {
        let (prefix, code_style) = if self.is_error() {
            (style("✗").red().bold(), Style::new().red())
        } else {
            (style("⚠").yellow().bold(), Style::new().yellow())
        };

        let mut output = format!(
            "{} {} [{}]",
            prefix,
            self.message,
            code_style.apply_to(&self.rule)
        );

        if let Some(line) = self.line {
            output.push_str(&format!(" {}", style(format!("(line {})", line)).dim()));
        }

        if let Some(ref suggestion) = self.suggestion {
            output.push_str(&format!(
                "\n  {} {}",
                style("→").dim(),
                style(suggestion).dim()
            ));
        }

        output
    }

    fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "rule": self.rule,
            "severity": self.severity.to_string(),
            "level": u8::from(self.severity),
            "message": self.message,
            "suggestion": self.suggestion,
            "line": self.line,
        })
    }
}

/// Result of linting one commit message.
#[derive(Debug, Clone, Default)]
pub struct LintReport {
    /// The message after comment stripping.
    pub message: String,
    /// Commit SHA if linting an existing commit.
    pub commit_sha: Option<String>,
    /// Name of the ignore that exempted the message, if any.
    pub ignored_by: Option<String>,
    /// Error-level violations.
    pub errors: Vec<LintIssue>,
    /// Warning-level violations.
    pub warnings: Vec<LintIssue>,
    /// Link shown after a failed lint.
    pub help_url: Option<String>,
}

impl LintReport {
    /// Create an empty report.
    pub fn new(message: String) -> Self {
        Self {
            message,
            ..Self::default()
        }
    }

    /// Check if the lint passed (no errors).
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// Whether an ignore exempted the message.
    pub fn is_ignored(&self) -> bool {
        self.ignored_by.is_some()
    }

    /// Get the total number of issues.
    pub fn issue_count(&self) -> usize {
        self.errors.len() + self.warnings.len()
    }

    /// First line of the message.
    pub fn header(&self) -> &str {
        self.message.lines().next().unwrap_or("")
    }

    /// Print the report to stdout.
    pub fn print(&self, format: OutputFormat) {
        match format {
            OutputFormat::Json => println!(
                "{}",
                serde_json::to_string_pretty(&self.to_json()).unwrap_or_default()
            ),
            OutputFormat::Text => println!("{}", self.render_text()),
        }
    }

    /// Render in text format.
    pub fn render_text(&self) -> String {
        let mut lines = Vec::new();

        let label = match self.commit_sha {
            Some(ref sha) => style(sha[..7.min(sha.len())].to_string()).cyan(),
            None => style("input".to_string()).dim(),
        };
        let status = if self.is_ignored() {
            style("○").dim()
        } else if self.is_valid() {
            style("✓").green().bold()
        } else {
            style("✗").red().bold()
        };
        lines.push(format!("{} {} {}", status, label, self.header()));

        if let Some(ref ignore) = self.ignored_by {
            lines.push(format!("  {}", style(format!("skipped by ignore '{}'", ignore)).dim()));
            return lines.join("\n");
        }

        for issue in self.errors.iter().chain(&self.warnings) {
            lines.push(format!("  {}", issue.format()));
        }

        if self.issue_count() > 0 {
            lines.push(format!("  {}", self.summary()));
        }

        if !self.is_valid() {
            if let Some(ref url) = self.help_url {
                lines.push(format!("  {} Get help: {}", style("ⓘ").cyan(), url));
            }
        }

        lines.join("\n")
    }

    /// JSON representation.
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "valid": self.is_valid(),
            "ignored": self.is_ignored(),
            "ignored_by": self.ignored_by,
            "commit": self.commit_sha,
            "input": self.message,
            "errors": self.errors.iter().map(LintIssue::to_json).collect::<Vec<_>>(),
            "warnings": self.warnings.iter().map(LintIssue::to_json).collect::<Vec<_>>(),
        })
    }

    /// Get a summary string.
    pub fn summary(&self) -> String {
        if self.is_ignored() {
            "Ignored".to_string()
        } else if self.is_valid() {
            if self.warnings.is_empty() {
                "Valid".to_string()
            } else {
                format!("Valid ({} warnings)", self.warnings.len())
            }
        } else {
            format!(
                "Invalid ({} errors, {} warnings)",
                self.errors.len(),
                self.warnings.len()
            )
        }
    }
}
