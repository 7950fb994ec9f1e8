//! Output formatter for human-readable and JSON output
//!
//! Every command prints through a `Formatter` so JSON mode and quiet mode
//! behave the same everywhere. Coloring follows the configured
//! [`ColorMode`]; `auto` colors only streams attached to a terminal.

use console::{Term, style};
use serde::Serialize;

use super::{ColorMode, OutputConfig};

/// Formatter for shell output
///
/// When JSON mode is enabled, all output is strict JSON without colors.
#[derive(Debug, Clone)]
pub struct Formatter {
    config: OutputConfig,
}

impl Formatter {
    pub fn new(config: OutputConfig) -> Self {
        Self { config }
    }

    pub fn is_json(&self) -> bool {
        self.config.json
    }

    pub fn is_quiet(&self) -> bool {
        self.config.quiet
    }

    /// Whether standard output gets colors
    pub fn colors_enabled(&self) -> bool {
        self.colors_for(&Term::stdout())
    }

    fn colors_for(&self, term: &Term) -> bool {
        if self.config.json {
            return false;
        }
        match self.config.color {
            ColorMode::Always => true,
            ColorMode::Never => false,
            ColorMode::Auto => term.is_term(),
        }
    }

    /// Output a success message
    pub fn success(&self, message: &str) {
        if self.config.quiet || self.config.json {
            return;
        }
        let mark = style("✓").green().force_styling(self.colors_enabled());
        println!("{mark} {message}");
    }

    /// Output an error message
    ///
    /// Errors are always printed, even in quiet mode.
    pub fn error(&self, message: &str) {
        if self.config.json {
            let error = serde_json::json!({
                "error": message
            });
            eprintln!(
                "{}",
                serde_json::to_string_pretty(&error).unwrap_or_else(|_| message.to_string())
            );
        } else {
            let mark = style("✗")
                .red()
                .force_styling(self.colors_for(&Term::stderr()));
            eprintln!("{mark} {message}");
        }
    }

    /// Highlight a folder or bucket line in human output
    pub fn folder(&self, text: &str) -> String {
        style(text)
            .blue()
            .bold()
            .force_styling(self.colors_enabled())
            .to_string()
    }

    /// Output JSON directly
    pub fn json<T: Serialize>(&self, value: &T) {
        if self.config.quiet {
            return;
        }
        match serde_json::to_string_pretty(value) {
            Ok(json) => println!("{json}"),
            Err(e) => eprintln!("Error serializing output: {e}"),
        }
    }

    /// Print a line of text (respects quiet mode)
    pub fn println(&self, message: &str) {
        if self.config.quiet {
            return;
        }
        println!("{message}");
    }
}

impl Default for Formatter {
    fn default() -> Self {
        Self::new(OutputConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with_color(color: ColorMode) -> Formatter {
        Formatter::new(OutputConfig {
            color,
            ..Default::default()
        })
    }

    #[test]
    fn test_formatter_default() {
        let formatter = Formatter::default();
        assert!(!formatter.is_json());
        assert!(!formatter.is_quiet());
        assert_eq!(formatter.colors_enabled(), Term::stdout().is_term());
    }

    #[test]
    fn test_color_always_and_never() {
        assert!(with_color(ColorMode::Always).colors_enabled());
        assert!(!with_color(ColorMode::Never).colors_enabled());
    }

    #[test]
    fn test_json_mode_never_colors() {
        let formatter = Formatter::new(OutputConfig {
            json: true,
            color: ColorMode::Always,
            ..Default::default()
        });
        assert!(formatter.is_json());
        assert!(!formatter.colors_enabled());
    }

    #[test]
    fn test_folder_highlight_follows_color_mode() {
        let plain = with_color(ColorMode::Never).folder("docs/");
        assert_eq!(plain, "docs/");

        let colored = with_color(ColorMode::Always).folder("docs/");
        assert!(colored.contains("docs/"));
        assert!(colored.contains('\u{1b}'));
    }
}
