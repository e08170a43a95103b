//! CLI output formatting utilities for human-readable and JSON output modes.

use chrono::{DateTime, Utc};
use chrono_humanize::HumanTime;
use colored::Colorize;
use is_terminal::IsTerminal;
use std::io;
use tabled::{builder::Builder, settings::Style};
use uuid::Uuid;

use crate::engine::EventKind;
use crate::frame::{SessionFrame, tiles_remaining};

/// Output format for CLI commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable output with tables, colors, and formatting.
    Human,
    /// Machine-readable JSON output.
    Json,
}

impl OutputFormat {
    /// Determine the output format based on CLI flag and TTY detection.
    ///
    /// - If `format` is Some("json"), return Json
    /// - If `format` is Some("human"), return Human
    /// - If `format` is None, auto-detect based on stdout being a TTY
    pub fn from_flag(format: Option<&str>) -> Result<Self, String> {
        match format {
            Some("json") => Ok(OutputFormat::Json),
            Some("human") => Ok(OutputFormat::Human),
            Some(other) => Err(format!(
                "Invalid format '{}'. Use 'json' or 'human'.",
                other
            )),
            None => {
                if io::stdout().is_terminal() {
                    Ok(OutputFormat::Human)
                } else {
                    Ok(OutputFormat::Json)
                }
            }
        }
    }
}

pub fn format_timestamp(dt: DateTime<Utc>) -> String {
    dt.format("%Y-%m-%d %H:%M:%S UTC").to_string()
}

/// Format a timestamp as relative time (e.g., "2 minutes ago").
pub fn format_relative_time(dt: DateTime<Utc>) -> String {
    HumanTime::from(dt).to_string()
}

pub fn format_uuid_short(id: Uuid) -> String {
    let s = id.to_string();
    if s.len() > 8 {
        format!("{}...", &s[..8])
    } else {
        s
    }
}

/// Snakes red, ladders green, wins bold.
pub fn event_colored(kind: EventKind, text: &str) -> String {
    match kind {
        EventKind::Snake | EventKind::ReverseLadder => text.red().to_string(),
        EventKind::Ladder => text.green().to_string(),
        EventKind::Win => text.yellow().bold().to_string(),
        EventKind::Move => text.to_string(),
    }
}

/// Build and print a table from headers and rows.
pub fn print_table(headers: Vec<&str>, rows: Vec<Vec<String>>) {
    let mut builder = Builder::default();
    builder.push_record(headers);
    for row in rows {
        builder.push_record(row);
    }
    let mut table = builder.build();
    table.with(Style::rounded());
    println!("{table}");
}

pub fn print_field(label: &str, value: &str) {
    println!("{}: {}", label.bold(), value);
}

pub fn print_success(message: &str) {
    println!("{}", message.green());
}

/// Print an error as JSON to stderr for machine consumption.
pub fn print_json_error(message: &str) {
    eprintln!(
        "{}",
        serde_json::json!({
            "error": message
        })
    );
}

/// One row per player: position, distance left, odds and stats
pub fn player_rows(frame: &SessionFrame) -> Vec<Vec<String>> {
    frame
        .players
        .iter()
        .map(|player| {
            let marker = if player.is_current { "▶" } else { "" };
            vec![
                format!("{marker}Player {}", player.player),
                player.position.to_string(),
                tiles_remaining(player.position).to_string(),
                player.winning_chance.as_str().to_string(),
                player.snake_bites.to_string(),
                player.ladders_climbed.to_string(),
                player.powerups_used.to_string(),
            ]
        })
        .collect()
}

pub const PLAYER_HEADERS: [&str; 7] = [
    "Player", "Tile", "To Go", "Chance", "Snakes", "Ladders", "Power-ups",
];

/// Print the board status panel for a frame
pub fn print_frame(frame: &SessionFrame) {
    print_table(PLAYER_HEADERS.to_vec(), player_rows(frame));

    let message = match &frame.last_move {
        Some(record) if frame.active_power_up.is_none() && frame.winner.is_none() => {
            event_colored(record.event_kind, &frame.message)
        }
        _ => frame.message.bold().to_string(),
    };
    println!("{message}");

    if let Some(countdown) = frame.rolls_until_power_up
        && countdown > 0
    {
        println!("{}", format!("Next power-up in {countdown} rolls").dimmed());
    }
}
