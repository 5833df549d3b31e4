//! Output formatting utilities

use clap::ValueEnum;
use colored::Colorize;
use monitor_lib::alerts::Threshold;
use monitor_lib::{AlertLevel, ComponentStatus, Trend};

/// Output format for CLI commands
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
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

/// Print a warning message
pub fn print_warning(message: &str) {
    println!("{} {}", "⚠".yellow().bold(), message);
}

/// Print an info message
pub fn print_info(message: &str) {
    println!("{} {}", "ℹ".blue().bold(), message);
}

/// Format a number with thousands separators and no decimals
pub fn format_count(value: f64) -> String {
    let rounded = value.round();
    let digits = format!("{:.0}", rounded.abs());
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    if rounded < 0.0 {
        format!("-{}", grouped)
    } else {
        grouped
    }
}

/// Format a 0..1 ratio as a percentage with one decimal
pub fn format_percent(ratio: f64) -> String {
    format!("{:.1}%", ratio * 100.0)
}

/// Symbol shown in front of an alert
pub fn level_symbol(level: AlertLevel) -> &'static str {
    match level {
        AlertLevel::Info => "ℹ",
        AlertLevel::Warning => "⚠",
        AlertLevel::Critical => "🔴",
    }
}

/// Color an already padded alert level label
pub fn color_level(level: AlertLevel, text: &str) -> String {
    match level {
        AlertLevel::Info => text.blue().to_string(),
        AlertLevel::Warning => text.yellow().to_string(),
        AlertLevel::Critical => text.red().to_string(),
    }
}

/// Trend arrow and name, colored by direction
pub fn color_trend(trend: Trend) -> String {
    let text = format!("{} {}", trend.symbol(), trend);
    match trend {
        Trend::Improving => text.green().to_string(),
        Trend::Declining => text.red().to_string(),
        Trend::Stable => text.blue().to_string(),
    }
}

/// Color an already padded value by where it falls against its threshold
pub fn color_by_threshold(value: f64, threshold: &Threshold, text: &str) -> String {
    if value < threshold.critical {
        text.red().to_string()
    } else if value < threshold.warning {
        text.yellow().to_string()
    } else {
        text.green().to_string()
    }
}

/// Color component status
pub fn color_status(status: ComponentStatus) -> String {
    let text = status.to_string();
    match status {
        ComponentStatus::Healthy => text.green().to_string(),
        ComponentStatus::Degraded => text.yellow().to_string(),
        ComponentStatus::Unhealthy => text.red().to_string(),
    }
}
