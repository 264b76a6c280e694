//! Output formatting utilities

use clap::ValueEnum;
use colored::Colorize;

/// Output format for CLI commands
#[derive(Debug, Clone, Copy, Default, ValueEnum)]
pub enum OutputFormat {
    /// Table format (default)
    #[default]
    Table,
    /// JSON format
    Json,
}

/// Print a success message
pub fn print_success(message: &str) {
    println!("{} {}", "✓".green().bold(), message);
}

/// Print an error message
pub fn print_error(message: &str) {
    eprintln!("{} {}", "✗".red().bold(), message);
}

/// Print a warning message
pub fn print_warning(message: &str) {
    println!("{} {}", "⚠".yellow().bold(), message);
}

/// Print an info message
pub fn print_info(message: &str) {
    println!("{} {}", "ℹ".blue().bold(), message);
}

/// Format an energy value in kilowatt-hours
pub fn format_kwh(value: f64) -> String {
    format!("{:.2} kWh", value)
}

/// Format a confidence score (0-100 scale) as a percentage
pub fn format_confidence(confidence: f64) -> String {
    format!("{:.1}%", confidence)
}

/// Color status based on value
pub fn color_status(status: &str) -> String {
    match status.to_lowercase().as_str() {
        "healthy" | "running" => status.green().to_string(),
        "degraded" | "warning" => status.yellow().to_string(),
        "unhealthy" | "error" | "failed" => status.red().to_string(),
        _ => status.to_string(),
    }
}

/// Color confidence based on value (0-100 scale)
pub fn color_confidence(confidence: f64) -> String {
    let formatted = format_confidence(confidence);
    if confidence > 90.0 {
        formatted.green().to_string()
    } else if confidence >= 70.0 {
        formatted.yellow().to_string()
    } else {
        formatted.red().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_kwh() {
        assert_eq!(format_kwh(63.5), "63.50 kWh");
        assert_eq!(format_kwh(5.0), "5.00 kWh");
    }

    #[test]
    fn test_format_confidence() {
        assert_eq!(format_confidence(85.3), "85.3%");
        assert_eq!(format_confidence(99.0), "99.0%");
    }
}
