// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

use std::error::Error;
use std::path::{Path, PathBuf};

use clap::{Arg, ArgMatches, ValueHint, arg, value_parser};
use jiff::civil::{Date, DateTime};
use jiff::tz::TimeZone;
use jiff::{Timestamp, Zoned};
use tidecal_core::datetime::{from_local_datetime, resolve_zone, start_of_day, system_zone};
use tokio::fs;

/// The output format for commands
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum ArgOutputFormat {
    Json,
    Table,
}

impl ArgOutputFormat {
    pub fn arg() -> Arg {
        arg!(--"output-format" <FORMAT> "Output format")
            .value_parser(value_parser!(ArgOutputFormat))
            .default_value("table")
    }

    pub fn from(matches: &ArgMatches) -> Self {
        matches
            .get_one("output-format")
            .copied()
            .unwrap_or(ArgOutputFormat::Table)
    }
}

pub fn arg_file() -> Arg {
    arg!(file: <FILE> "Path to the iCalendar file")
        .value_parser(value_parser!(PathBuf))
        .value_hint(ValueHint::FilePath)
}

pub fn get_file(matches: &ArgMatches) -> Result<PathBuf, Box<dyn Error>> {
    matches
        .get_one::<PathBuf>("file")
        .cloned()
        .ok_or_else(|| "file is required".into())
}

pub async fn read_calendar(path: &Path) -> Result<String, Box<dyn Error>> {
    fs::read_to_string(path)
        .await
        .map_err(|e| format!("Failed to read calendar file at {}: {}", path.display(), e).into())
}

pub fn arg_tz() -> Arg {
    arg!(--tz <ZONE> "IANA time zone for floating times and output, defaults to the system zone")
}

pub fn get_tz(matches: &ArgMatches) -> Option<String> {
    matches.get_one("tz").cloned()
}

/// Resolve the zone given by `--tz`, or the system zone.
pub fn resolve_tz(tz: Option<&str>) -> Result<TimeZone, Box<dyn Error>> {
    match tz {
        Some(name) => resolve_zone(name).map_err(|e| format!("Unknown time zone {name}: {e}").into()),
        None => Ok(system_zone()),
    }
}

/// Parse a window bound: an instant such as `2025-03-01T08:00:00Z`, a local
/// `YYYY-MM-DD HH:MM`, or a date meaning its midnight in `tz`.
pub fn parse_datetime(dt: &str, tz: &TimeZone) -> Result<Timestamp, &'static str> {
    let dt = dt.trim();
    if let Ok(ts) = dt.parse::<Timestamp>() {
        Ok(ts)
    } else if let Ok(dt) = DateTime::strptime("%Y-%m-%d %H:%M", dt) {
        from_local_datetime(tz, dt)
            .map(|z| z.timestamp())
            .map_err(|_| "Date out of range")
    } else if let Ok(date) = Date::strptime("%Y-%m-%d", dt) {
        start_of_day(date, tz)
            .map(|z| z.timestamp())
            .map_err(|_| "Date out of range")
    } else {
        Err("Invalid date format. Expected format: YYYY-MM-DD, YYYY-MM-DD HH:MM or an RFC 3339 instant")
    }
}

/// Format a start or end for display; all-day values show the date only.
pub fn format_datetime(t: &Zoned, all_day: bool) -> String {
    if all_day {
        t.strftime("%Y-%m-%d").to_string()
    } else {
        t.strftime("%Y-%m-%d %H:%M").to_string()
    }
}
