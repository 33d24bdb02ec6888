//! CLI presenter for output formatting

use colored::*;
use indicatif::{ProgressBar, ProgressStyle};

use crate::domain::audio::LevelFrame;

/// Meter glyphs from quiet to loud
const METER_GLYPHS: [char; 8] = ['▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];

/// Presenter for CLI output formatting
pub struct Presenter {
    spinner: Option<ProgressBar>,
}

impl Presenter {
    /// Create a new presenter
    pub fn new() -> Self {
        Self { spinner: None }
    }

    /// Start a spinner with message
    pub fn start_spinner(&mut self, message: &str) {
        let spinner = ProgressBar::new_spinner();
        spinner.set_style(
            ProgressStyle::default_spinner()
                .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏")
                .template("{spinner:.cyan} {msg}")
                .unwrap(),
        );
        spinner.set_message(message.to_string());
        spinner.enable_steady_tick(std::time::Duration::from_millis(80));
        self.spinner = Some(spinner);
    }

    /// Mark spinner as success and finish
    pub fn spinner_success(&mut self, message: &str) {
        if let Some(spinner) = self.spinner.take() {
            spinner.finish_with_message(format!("{} {}", "✓".green(), message));
        }
    }

    /// Mark spinner as failed and finish
    pub fn spinner_fail(&mut self, message: &str) {
        if let Some(spinner) = self.spinner.take() {
            spinner.finish_with_message(format!("{} {}", "✗".red(), message));
        }
    }

    /// Render a level frame as one meter line
    pub fn level_meter(frame: &LevelFrame) -> String {
        frame
            .slots()
            .iter()
            .map(|&level| {
                let index = ((level * METER_GLYPHS.len() as f32) as usize)
                    .min(METER_GLYPHS.len() - 1);
                METER_GLYPHS[index]
            })
            .collect()
    }

    /// Redraw the in-place level meter line
    pub fn show_levels(&self, frame: &LevelFrame) {
        eprint!("\r{} {}", "●".red(), Self::level_meter(frame).cyan());
    }

    /// Clear the in-place level meter line
    pub fn clear_levels(&self) {
        eprint!("\r{}\r", " ".repeat(LevelFrame::baseline().slots().len() + 4));
    }

    /// Print info message to stderr
    pub fn info(&self, message: &str) {
        eprintln!("{} {}", "ℹ".cyan(), message);
    }

    /// Print success message to stderr
    pub fn success(&self, message: &str) {
        eprintln!("{} {}", "✓".green(), message);
    }

    /// Print error message to stderr
    pub fn error(&self, message: &str) {
        eprintln!("{} {}", "✗".red(), message);
    }

    /// Print primary output to stdout
    pub fn output(&self, text: &str) {
        println!("{}", text);
    }

    /// Print a key-value pair (for config list)
    pub fn key_value(&self, key: &str, value: &str) {
        println!("{}: {}", key.cyan(), value);
    }
}

impl Default for Presenter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn baseline_meter_is_all_minimum_glyphs() {
        let meter = Presenter::level_meter(&LevelFrame::baseline());
        assert_eq!(meter.chars().count(), 20);
        assert!(meter.chars().all(|c| c == '▁'));
    }

    #[test]
    fn loud_meter_is_all_maximum_glyphs() {
        let meter = Presenter::level_meter(&LevelFrame::from_power_db(0.0));
        assert!(meter.chars().all(|c| c == '█'));
    }

    #[test]
    fn meter_scales_with_level() {
        let quiet = Presenter::level_meter(&LevelFrame::from_power_db(-50.0));
        let loud = Presenter::level_meter(&LevelFrame::from_power_db(-6.0));
        assert_ne!(quiet, loud);
    }
}
