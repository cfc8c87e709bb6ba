//! Output formatting for equivalency reports.

use crate::engine::{EquivalencyReport, Failure};
use crate::output::config::{OutputConfig, OutputMode};

// ANSI color codes
const RED: &str = "\x1b[31m";
const YELLOW: &str = "\x1b[33m";
const CYAN: &str = "\x1b[36m";
const RESET: &str = "\x1b[0m";

/// Formatter for equivalency reports.
pub struct ReportFormatter {
    config: OutputConfig,
}

impl ReportFormatter {
    /// Create a new formatter with the given configuration.
    pub fn new(config: OutputConfig) -> Self {
        Self { config }
    }

    /// Create a formatter with default configuration.
    pub fn with_defaults() -> Self {
        Self::new(OutputConfig::new())
    }

    /// Check if rendered values should be shown given the result.
    pub fn should_show_values(&self, passed: bool) -> bool {
        match self.config.values {
            OutputMode::Always => true,
            OutputMode::OnFailure => !passed,
            OutputMode::Never => false,
        }
    }

    /// Check if the configuration header should be shown given the result.
    pub fn should_show_configuration(&self, passed: bool) -> bool {
        match self.config.configuration {
            OutputMode::Always => true,
            OutputMode::OnFailure => !passed,
            OutputMode::Never => false,
        }
    }

    /// Format a single failure for display.
    pub fn format_failure(&self, failure: &Failure) -> String {
        let mut line = if self.config.colors_enabled {
            format!(
                "  {}{}{}: {}",
                CYAN, failure.path, RESET, failure.message
            )
        } else {
            format!("  {}: {}", failure.path, failure.message)
        };

        if self.should_show_values(false) {
            if let Some(subject) = &failure.subject {
                line.push_str(&format!("\n      subject: {}", self.truncate(subject)));
            }
            if let Some(expectation) = &failure.expectation {
                line.push_str(&format!(
                    "\n      expectation: {}",
                    self.truncate(expectation)
                ));
            }
        }

        line
    }

    /// Format a full report for display.
    pub fn format_report(&self, report: &EquivalencyReport) -> String {
        let passed = report.passed();
        let mut output = String::new();

        if self.should_show_configuration(passed) {
            if self.config.colors_enabled {
                output.push_str(&format!(
                    "{}configuration:{} {}\n",
                    YELLOW, RESET, report.description
                ));
            } else {
                output.push_str(&format!("configuration: {}\n", report.description));
            }
        }

        if let Some(reason) = &report.reason {
            output.push_str(&format!("because: {}\n", reason));
        }

        if passed {
            output.push_str("comparison passed\n");
        } else {
            let header = format!("mismatches ({}):", report.failures.len());
            if self.config.colors_enabled {
                output.push_str(&format!("{}{}{}\n", RED, header, RESET));
            } else {
                output.push_str(&format!("{}\n", header));
            }
            for failure in &report.failures {
                output.push_str(&self.format_failure(failure));
                output.push('\n');
            }
        }

        output
    }

    /// Print a report to stdout.
    pub fn print_report(&self, report: &EquivalencyReport) {
        print!("{}", self.format_report(report));
    }

    /// Truncate a string to the configured maximum length.
    /// Handles multi-byte UTF-8 characters safely.
    fn truncate(&self, s: &str) -> String {
        let max = self.config.truncate_at;
        let char_count = s.chars().count();

        if char_count <= max {
            s.to_string()
        } else {
            // Reserve 3 chars for "..."
            let truncated: String = s.chars().take(max.saturating_sub(3)).collect();
            format!("{}...", truncated)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{EquivalencyContext, EquivalencyOptions, EquivalencyValidator};
    use crate::graph::Node;
    use serde_json::json;

    fn failing_report() -> EquivalencyReport {
        let context = EquivalencyContext::root(
            Node::from_json(&json!({"a": 1})),
            Node::from_json(&json!({"a": 2})),
        );
        EquivalencyValidator::new(EquivalencyOptions::new())
            .assert_equality(&context)
            .unwrap()
    }

    #[test]
    fn test_truncate_short_string() {
        let formatter = ReportFormatter::new(OutputConfig::new().truncate_at(60));
        assert_eq!(formatter.truncate("hello"), "hello");
    }

    #[test]
    fn test_truncate_long_string() {
        let formatter = ReportFormatter::new(OutputConfig::new().truncate_at(10));
        assert_eq!(formatter.truncate("hello world!"), "hello w...");
    }

    #[test]
    fn test_truncate_unicode() {
        let formatter = ReportFormatter::new(OutputConfig::new().truncate_at(6));
        let result = formatter.truncate("日本語ですよね"); // 7 chars
        assert!(result.ends_with("..."));
        assert_eq!(result.chars().count(), 6); // 3 chars + "..."
        assert_eq!(result, "日本語...");
    }

    #[test]
    fn test_format_report_lists_failures() {
        let formatter = ReportFormatter::new(OutputConfig::new().colors(false));
        let rendered = formatter.format_report(&failing_report());
        assert!(rendered.contains("mismatches (1):"));
        assert!(rendered.contains("[\"a\"]"));
        assert!(rendered.contains("configuration:"));
    }

    #[test]
    fn test_format_report_passing_is_quiet() {
        let context = EquivalencyContext::root(Node::int(1), Node::int(1));
        let report = EquivalencyValidator::new(EquivalencyOptions::new())
            .assert_equality(&context)
            .unwrap();
        let formatter = ReportFormatter::new(OutputConfig::new().colors(false));
        let rendered = formatter.format_report(&report);
        assert!(rendered.contains("comparison passed"));
        assert!(!rendered.contains("configuration:"));
    }

    #[test]
    fn test_should_show_modes() {
        let formatter = ReportFormatter::new(OutputConfig::new().values(OutputMode::Always));
        assert!(formatter.should_show_values(true));
        assert!(formatter.should_show_values(false));

        let formatter = ReportFormatter::new(OutputConfig::new().values(OutputMode::OnFailure));
        assert!(!formatter.should_show_values(true));
        assert!(formatter.should_show_values(false));

        let formatter = ReportFormatter::new(OutputConfig::new().values(OutputMode::Never));
        assert!(!formatter.should_show_values(false));
    }

    #[test]
    fn test_failure_line_includes_values() {
        let formatter = ReportFormatter::new(
            OutputConfig::new().colors(false).values(OutputMode::Always),
        );
        let report = failing_report();
        let line = formatter.format_failure(&report.failures[0]);
        assert!(line.contains("subject: 1"));
        assert!(line.contains("expectation: 2"));
    }
}
