//! Output formatting utilities
//!
//! This module provides the formatter for shell output in both
//! human-readable and JSON formats.

mod formatter;

pub use formatter::Formatter;

use s5_core::config::Defaults;

/// When human output is colored
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ColorMode {
    /// Only when writing to a terminal
    #[default]
    Auto,
    Always,
    Never,
}

impl ColorMode {
    /// Read the `[defaults] color` value; unknown values behave as `auto`
    pub fn from_config(value: &str) -> Self {
        match value {
            "always" => Self::Always,
            "never" => Self::Never,
            _ => Self::Auto,
        }
    }
}

/// Output configuration derived from CLI flags and config defaults
#[derive(Debug, Clone, Default)]
pub struct OutputConfig {
    /// Use JSON output format
    pub json: bool,
    /// Color mode for human output
    pub color: ColorMode,
    /// Suppress non-error output
    pub quiet: bool,
}

impl OutputConfig {
    /// Combine command-line flags with the `[defaults]` config section
    ///
    /// Flags can only switch JSON on and colors off; they never undo the
    /// configured defaults.
    pub fn resolve(json: bool, no_color: bool, quiet: bool, defaults: &Defaults) -> Self {
        let color = if no_color {
            ColorMode::Never
        } else {
            ColorMode::from_config(&defaults.color)
        };
        Self {
            json: json || defaults.output == "json",
            color,
            quiet,
        }
    }
}
