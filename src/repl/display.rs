//! Display manager for the terminal chat UI
//!
//! Formatted output for turns, incremental fragments, errors, and the
//! throughput readout; a spinner covers the gap before the first token.

use crate::telemetry::StreamStats;
use crate::types::{ChatTurn, Role};
use colored::*;
use indicatif::{ProgressBar, ProgressStyle};
use std::io::{self, Write};
use std::time::Duration;

/// Display manager for the chat UI
pub struct DisplayManager {
    dark_theme: bool,
}

impl DisplayManager {
    /// Create new display manager
    pub fn new(dark_theme: bool) -> Self {
        DisplayManager { dark_theme }
    }

    /// Show welcome banner
    pub fn show_banner(&self, version: &str, base_url: &str) {
        let width = 64;
        let rule = "=".repeat(width);
        let rule = if self.dark_theme {
            rule.white()
        } else {
            rule.cyan()
        };
        let title = format!("  chatline {} - Terminal Chat", version);
        let info = format!("  Endpoint: {}", base_url);

        println!("\n{}", rule);
        println!("{}", title.bold());
        println!("{}", info.dimmed());
        println!("{}\n", rule);
        println!(
            "Type your message (or {} for commands, {} to quit)\n",
            "/help".green(),
            "/exit".green()
        );
    }

    /// Spinner shown between submission and the first fragment
    pub fn start_waiting(&self) -> ProgressBar {
        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.cyan} {msg}")
                .unwrap(),
        );
        pb.set_message("...");
        pb.enable_steady_tick(Duration::from_millis(100));
        pb
    }

    /// Label line opening an assistant response
    pub fn show_assistant_label(&self) {
        println!("{}", "Assistant".bold().green());
    }

    /// Print one incremental fragment in place
    pub fn show_fragment(&self, fragment: &str) {
        print!("{}", fragment);
        let _ = io::stdout().flush();
    }

    /// Terminate the streamed response block
    pub fn end_response(&self) {
        println!();
    }

    /// Throughput readout after a completed response
    pub fn show_stats(&self, stats: &StreamStats) {
        let line = format!(
            "Last response took {:.2} seconds and {} tokens, speed: {:.2} tokens/second",
            stats.elapsed.as_secs_f64(),
            stats.tokens,
            stats.tokens_per_second()
        );
        println!("{}", line.dimmed());
    }

    /// Print one past turn
    pub fn show_turn(&self, index: usize, turn: &ChatTurn) {
        let label = match turn.role {
            Role::User => turn.role.label().bold().blue(),
            Role::Assistant => turn.role.label().bold().green(),
            Role::System => turn.role.label().bold().yellow(),
        };
        let image_marker = if turn.image.is_some() { " [image]" } else { "" };
        println!("{:>3}. {}{}", index, label, image_marker.dimmed());
        println!("     {}", turn.content);
    }

    /// Show error message
    pub fn show_error(&self, message: &str) {
        eprintln!("{} {}", "error:".red().bold(), message);
    }

    /// Show informational message
    pub fn show_info(&self, message: &str) {
        println!("{}", message.dimmed());
    }

    /// Notice printed when a stream is cancelled
    pub fn show_cancelled(&self) {
        println!("\n{}", "Generation cancelled; partial response discarded".yellow());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_creation() {
        let _light = DisplayManager::new(false);
        let _dark = DisplayManager::new(true);
    }

    #[test]
    fn test_spinner_template_valid() {
        // Template parse panics inside start_waiting if the format is bad
        let display = DisplayManager::new(false);
        let pb = display.start_waiting();
        pb.finish_and_clear();
    }
}
