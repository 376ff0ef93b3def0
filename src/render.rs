//! Colored terminal rendering for command output.

use owo_colors::OwoColorize;
use zonecal_core::{CalError, Calendar};

/// Extension trait for terminal rendering with colors.
pub trait Render {
    fn render(&self) -> String;
}

impl Render for CalError {
    fn render(&self) -> String {
        format!("{} {}", "Error:".red().bold(), self)
    }
}

impl Render for Calendar {
    fn render(&self) -> String {
        format!("📅 {} {}", self.name(), self.timezone().name().dimmed())
    }
}

/// Success text from a handler: headers bold, warnings yellow.
impl Render for String {
    fn render(&self) -> String {
        self.trim_end()
            .lines()
            .map(|line| {
                if line.starts_with("WARNING:") {
                    line.yellow().to_string()
                } else if line.ends_with(':') {
                    line.bold().to_string()
                } else {
                    line.to_string()
                }
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}
