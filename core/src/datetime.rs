// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! Time-zone-aware date/time helpers.

use jiff::civil::{Date, DateTime, Time};
use jiff::tz::TimeZone;
use jiff::{RoundMode, Timestamp, Unit, Zoned, ZonedRound};

/// NOTE: Used for display and logs, so it should be stable across different runs.
pub const STABLE_FORMAT_DATEONLY: &str = "%Y-%m-%d";
pub const STABLE_FORMAT_LOCAL: &str = "%Y-%m-%dT%H:%M:%S%:z";

/// Look up an IANA time zone by name.
///
/// # Errors
///
/// Returns an error if the zone is not in the time zone database.
pub fn resolve_zone(name: &str) -> Result<TimeZone, jiff::Error> {
    TimeZone::get(name)
}

/// The zone of the host system, UTC if it cannot be detected.
#[must_use]
pub fn system_zone() -> TimeZone {
    match iana_time_zone::get_timezone() {
        Ok(name) => match resolve_zone(&name) {
            Ok(tz) => return tz,
            Err(err) => tracing::warn!(%name, %err, "unknown system time zone"),
        },
        Err(err) => tracing::warn!(%err, "failed to detect the system time zone"),
    }
    TimeZone::UTC
}

/// The IANA name of a zone, `None` for UTC and for zones without a name
/// (fixed offsets, POSIX rules).
#[must_use]
pub fn zone_name(tz: &TimeZone) -> Option<&str> {
    tz.iana_name().filter(|name| !matches!(*name, "UTC" | "Etc/UTC"))
}

/// Convert a civil datetime to a zoned datetime, handling local time ambiguities:
/// - a fold (the clock is set back) takes the earlier instant;
/// - a gap (the clock jumps forward) is shifted forward by the length of the gap.
///
/// # Errors
///
/// Returns an error if the result is out of the supported range.
pub fn from_local_datetime(tz: &TimeZone, dt: DateTime) -> Result<Zoned, jiff::Error> {
    tz.to_ambiguous_zoned(dt).compatible()
}

/// The first instant of a date in the given zone.
///
/// # Errors
///
/// Returns an error if the result is out of the supported range.
pub fn start_of_day(date: Date, tz: &TimeZone) -> Result<Zoned, jiff::Error> {
    date.to_zoned(tz.clone())
}

/// Whether the zoned datetime sits exactly on a midnight boundary.
#[must_use]
pub fn is_midnight(zdt: &Zoned) -> bool {
    zdt.time() == Time::midnight()
}

/// Whether `[start, end)` covers whole days only, i.e. both ends are at
/// midnight and the end is on a later date.
#[must_use]
pub fn is_all_day_range(start: &Zoned, end: &Zoned) -> bool {
    is_midnight(start) && is_midnight(end) && end.date() > start.date()
}

/// Number of days from `start` to `end`, negative when `end` is earlier.
///
/// # Errors
///
/// Returns an error if the span cannot be computed.
pub fn days_between(start: Date, end: Date) -> Result<i32, jiff::Error> {
    Ok(start.until(end)?.get_days())
}

/// Drop the sub-second part of an instant.
///
/// # Errors
///
/// Returns an error if the result is out of the supported range.
pub fn truncate_timestamp(ts: Timestamp) -> Result<Timestamp, jiff::Error> {
    Timestamp::from_second(ts.as_second())
}

/// Drop the sub-second part of a zoned datetime.
///
/// # Errors
///
/// Returns an error if the result is out of the supported range.
pub fn truncate_zoned(zdt: &Zoned) -> Result<Zoned, jiff::Error> {
    zdt.round(
        ZonedRound::new()
            .smallest(Unit::Second)
            .mode(RoundMode::Trunc),
    )
}

/// Parse an ISO 8601 / RFC 3339 instant, e.g. `2025-01-15T09:30:00Z`.
///
/// # Errors
///
/// Returns an error if the text is not a valid instant.
pub fn parse_timestamp(s: &str) -> Result<Timestamp, jiff::Error> {
    s.trim().parse()
}

/// Format a zoned datetime with its UTC offset, e.g. `2025-01-15T09:30:00+01:00`.
#[must_use]
pub fn format_local(zdt: &Zoned) -> String {
    zdt.strftime(STABLE_FORMAT_LOCAL).to_string()
}

/// Format a date, e.g. `2025-01-15`.
#[must_use]
pub fn format_date(date: Date) -> String {
    date.strftime(STABLE_FORMAT_DATEONLY).to_string()
}
