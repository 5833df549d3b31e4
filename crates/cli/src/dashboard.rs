//! Console rendering of monitor snapshots

use std::fmt::{self, Write};

use colored::Colorize;
use monitor_lib::alerts::ThresholdTable;
use monitor_lib::{AlertLevel, HealthResponse, Snapshot};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::output::{
    color_by_threshold, color_level, color_status, color_trend, format_count, format_percent,
    level_symbol,
};

const WIDTH: usize = 80;
const SECTION_WIDTH: usize = 40;

/// ANSI sequence that clears the screen and homes the cursor
pub const CLEAR_SCREEN: &str = "\x1b[2J\x1b[H";

/// Closing reminders, one shown per redraw
pub const REMINDERS: [&str; 5] = [
    "Every problem is a learning opportunity",
    "Question assumptions continuously",
    "Seek external validation",
    "Maintain infinite curiosity",
    "Never stop improving",
];

/// Picks the reminder for each redraw; seeded runs repeat the same sequence
pub struct Reminders {
    rng: StdRng,
}

impl Reminders {
    pub fn new(seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self { rng }
    }

    pub fn pick(&mut self) -> &'static str {
        REMINDERS[self.rng.gen_range(0..REMINDERS.len())]
    }
}

/// Render a snapshot as the text dashboard
pub fn render(
    snapshot: &Snapshot,
    thresholds: &ThresholdTable,
    health: Option<&HealthResponse>,
    reminder: Option<&str>,
) -> String {
    let mut out = String::new();
    // Writing into a String never fails
    let _ = render_into(&mut out, snapshot, thresholds, health, reminder);
    out
}

/// Write the dashboard for a snapshot into `out`
pub fn render_into(
    out: &mut impl Write,
    snapshot: &Snapshot,
    thresholds: &ThresholdTable,
    health: Option<&HealthResponse>,
    reminder: Option<&str>,
) -> fmt::Result {
    let Some(data) = snapshot.data() else {
        return writeln!(out, "No data available");
    };

    let rule = "=".repeat(WIDTH);

    writeln!(out, "{}", rule)?;
    writeln!(
        out,
        "{:^width$}",
        "LFM AI UPGRADE SYSTEM - MONITORING DASHBOARD",
        width = WIDTH
    )?;
    writeln!(
        out,
        "{:^width$}",
        format!("Time: {}", data.timestamp.to_rfc3339()),
        width = WIDTH
    )?;
    writeln!(out, "{}", rule)?;
    writeln!(out)?;

    let current = &data.current;
    section(out, "📊 CURRENT METRICS")?;
    writeln!(
        out,
        "Operations Rate:  {} ops/sec",
        color_by_threshold(
            current.operations_rate,
            &thresholds.operations_rate,
            &format!("{:>12}", format_count(current.operations_rate)),
        )
    )?;
    writeln!(
        out,
        "Cache Hit Rate:   {}",
        color_by_threshold(
            current.cache_hit_rate,
            &thresholds.cache_hit_rate,
            &format!("{:>12}", format_percent(current.cache_hit_rate)),
        )
    )?;
    writeln!(
        out,
        "Confidence Score: {}",
        color_by_threshold(
            current.confidence,
            &thresholds.confidence,
            &format!("{:>12}", format_percent(current.confidence)),
        )
    )?;
    writeln!(
        out,
        "Axiom Usage:      {:>12}",
        format_count(current.axiom_usage as f64)
    )?;
    writeln!(out)?;

    let stats = &data.statistics;
    section(out, "📈 STATISTICS")?;
    for (label, rate) in [
        ("Avg Operations:", stats.avg_operations_rate),
        ("Max Operations:", stats.max_operations_rate),
        ("Min Operations:", stats.min_operations_rate),
    ] {
        writeln!(out, "{:<18}{:>12} ops/sec", label, format_count(rate))?;
    }
    writeln!(
        out,
        "Avg Cache Hit:    {:>12}",
        format_percent(stats.avg_cache_hit_rate)
    )?;
    writeln!(
        out,
        "Avg Confidence:   {:>12}",
        format_percent(stats.avg_confidence)
    )?;
    writeln!(out)?;

    section(out, "📉 TRENDS")?;
    for (label, trend) in data.trends.rows() {
        writeln!(out, "{:20} {}", label, color_trend(trend))?;
    }
    writeln!(out)?;

    if !data.alerts.recent.is_empty() {
        section(out, "⚠️  RECENT ALERTS")?;
        for alert in &data.alerts.recent {
            writeln!(
                out,
                "{} [{}] {}",
                level_symbol(alert.level),
                alert.timestamp.format("%H:%M:%S"),
                color_level(alert.level, &alert.message)
            )?;
        }
        writeln!(out)?;
    }

    let counts = &data.alerts.counts;
    section(out, "📋 ALERT SUMMARY")?;
    for level in AlertLevel::ALL {
        let label = format!("{}:", title_case(level.as_str()));
        writeln!(out, "{:<10}{:>6}", label, counts.get(level))?;
    }
    writeln!(out)?;

    if let Some(health) = health {
        section(out, "🩺 MONITOR STATUS")?;
        match health.first_problem() {
            Some(problem) => {
                writeln!(out, "Status: {} ({})", color_status(health.status), problem)?
            }
            None => writeln!(out, "Status: {}", color_status(health.status))?,
        }
        writeln!(out)?;
    }

    if let Some(reminder) = reminder {
        section(out, "💭 EPISTEMIC HUMILITY")?;
        writeln!(out, "  \"{}\"", reminder)?;
        writeln!(out)?;
    }

    writeln!(out, "{}", rule)
}

fn section(out: &mut impl Write, title: &str) -> fmt::Result {
    writeln!(out, "{}", title.bold())?;
    writeln!(out, "{}", "-".repeat(SECTION_WIDTH))
}

fn title_case(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
