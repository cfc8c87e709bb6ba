//! Configuration for report display.

use std::io::IsTerminal;

/// When to display a piece of report output.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputMode {
    /// Always show regardless of the comparison result.
    Always,
    /// Only show when the comparison failed (default).
    #[default]
    OnFailure,
    /// Never show.
    Never,
}

/// Configuration for report display.
///
/// Use the builder pattern to configure what gets displayed:
///
/// ```rust
/// use likeness::{OutputConfig, OutputMode};
///
/// let config = OutputConfig::new()
///     .values(OutputMode::Always)
///     .truncate_at(80);
/// assert_eq!(config.truncate_at, 80);
/// ```
#[derive(Debug, Clone)]
pub struct OutputConfig {
    /// When to append rendered subject/expectation values to failure lines.
    pub values: OutputMode,
    /// When to show the configuration description header.
    pub configuration: OutputMode,
    /// Maximum characters before truncating rendered values.
    pub truncate_at: usize,
    /// Whether to use ANSI colors in output.
    pub colors_enabled: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            values: OutputMode::OnFailure,
            configuration: OutputMode::OnFailure,
            truncate_at: 60,
            colors_enabled: std::io::stdout().is_terminal(),
        }
    }
}

impl OutputConfig {
    /// Create a new output configuration with defaults.
    ///
    /// Default: `OnFailure` for values and configuration, 60 character
    /// truncation, colors auto-detected from TTY.
    pub fn new() -> Self {
        Self::default()
    }

    /// Configure when to show rendered values on failure lines.
    pub fn values(mut self, mode: OutputMode) -> Self {
        self.values = mode;
        self
    }

    /// Configure when to show the configuration description header.
    pub fn configuration(mut self, mode: OutputMode) -> Self {
        self.configuration = mode;
        self
    }

    /// Set the maximum characters before truncating rendered values.
    pub fn truncate_at(mut self, chars: usize) -> Self {
        self.truncate_at = chars;
        self
    }

    /// Enable or disable ANSI colors.
    pub fn colors(mut self, enabled: bool) -> Self {
        self.colors_enabled = enabled;
        self
    }

    /// Create a verbose configuration that always shows everything.
    pub fn verbose() -> Self {
        Self {
            values: OutputMode::Always,
            configuration: OutputMode::Always,
            ..Self::default()
        }
    }

    /// Create a quiet configuration that never shows extra detail.
    pub fn quiet() -> Self {
        Self {
            values: OutputMode::Never,
            configuration: OutputMode::Never,
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = OutputConfig::new();
        assert_eq!(config.values, OutputMode::OnFailure);
        assert_eq!(config.configuration, OutputMode::OnFailure);
        assert_eq!(config.truncate_at, 60);
    }

    #[test]
    fn test_verbose_config() {
        let config = OutputConfig::verbose();
        assert_eq!(config.values, OutputMode::Always);
        assert_eq!(config.configuration, OutputMode::Always);
    }

    #[test]
    fn test_quiet_config() {
        let config = OutputConfig::quiet();
        assert_eq!(config.values, OutputMode::Never);
        assert_eq!(config.configuration, OutputMode::Never);
    }

    #[test]
    fn test_builder_chain() {
        let config = OutputConfig::new()
            .values(OutputMode::Always)
            .configuration(OutputMode::Never)
            .truncate_at(100)
            .colors(false);

        assert_eq!(config.values, OutputMode::Always);
        assert_eq!(config.configuration, OutputMode::Never);
        assert_eq!(config.truncate_at, 100);
        assert!(!config.colors_enabled);
    }
}
