//! Output formatting utilities

use clap::ValueEnum;
use colored::Colorize;
use serde::Serialize;
use tabled::{settings::Style, Table, Tabled};

/// Output format for CLI commands
#[derive(Debug, Clone, Copy, Default, ValueEnum)]
pub enum OutputFormat {
    /// Table format (default)
    #[default]
    Table,
    /// JSON format
    Json,
}

/// Print rows as a table, or the serializable value as JSON
pub fn print_rows<R: Tabled, T: Serialize + ?Sized>(
    rows: Vec<R>,
    value: &T,
    empty_message: &str,
    format: OutputFormat,
) -> anyhow::Result<()> {
    match format {
        OutputFormat::Json => print_json(value)?,
        OutputFormat::Table => {
            if rows.is_empty() {
                print_warning(empty_message);
                return Ok(());
            }
            let table = Table::new(rows).with(Style::rounded()).to_string();
            println!("{}", table);
        }
    }
    Ok(())
}

pub fn print_json<T: Serialize + ?Sized>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Print a success message
pub fn print_success(message: &str) {
    println!("{} {}", "✓".green().bold(), message);
}

/// Print a warning message
pub fn print_warning(message: &str) {
    println!("{} {}", "⚠".yellow().bold(), message);
}

/// Print an info message
pub fn print_info(message: &str) {
    println!("{} {}", "ℹ".blue().bold(), message);
}

/// Format a prediction score as percentage
pub fn format_score(score: f64) -> String {
    format!("{:.1}%", score * 100.0)
}

/// Color a prediction score based on value
pub fn color_score(score: f64) -> String {
    let formatted = format_score(score);
    if score >= 0.8 {
        formatted.green().to_string()
    } else if score >= 0.5 {
        formatted.yellow().to_string()
    } else {
        formatted.red().to_string()
    }
}

/// Color a service status string
pub fn color_status(status: &str) -> String {
    match status.to_lowercase().as_str() {
        "ready" | "ok" => status.green().to_string(),
        "starting" => status.yellow().to_string(),
        "error" | "failed" => status.red().to_string(),
        _ => status.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_score() {
        assert_eq!(format_score(0.7123), "71.2%");
        assert_eq!(format_score(1.0), "100.0%");
        assert_eq!(format_score(0.0), "0.0%");
    }
}
