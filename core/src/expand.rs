// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! Expansion of recurring events into occurrences inside a query window.
//!
//! Candidate `n` starts at `start + n * interval` frequency units, computed
//! from the series start every time so that monthly series do not drift.
//! Timed events step in the calendar of the master's own zone, which keeps
//! the wall-clock time fixed across DST transitions, and are then expressed
//! in the requested zone. All-day events step on plain dates.

use jiff::civil::Date;
use jiff::tz::TimeZone;
use jiff::{SignedDuration, Timestamp, Zoned};

use crate::datetime::{days_between, start_of_day};
use crate::event::MasterEvent;
use crate::recurrence::{Frequency, Moment, RecurrenceRule};

/// One concrete instance of a [`MasterEvent`].
#[derive(Debug, Clone, PartialEq)]
pub enum Occurrence {
    /// The master event itself, i.e. the first candidate of its series.
    Master {
        /// Identifier of the master event
        uid: String,
        /// Start of the occurrence
        start: Zoned,
        /// Exclusive end of the occurrence
        end: Zoned,
    },

    /// A later repetition generated from the recurrence rule.
    Derived {
        /// Identifier of the master event
        uid: String,
        /// Start of the occurrence
        start: Zoned,
        /// Exclusive end of the occurrence
        end: Zoned,
    },
}

impl Occurrence {
    /// Identifier of the master event.
    #[must_use]
    pub fn uid(&self) -> &str {
        match self {
            Self::Master { uid, .. } | Self::Derived { uid, .. } => uid,
        }
    }

    /// Start of the occurrence.
    #[must_use]
    pub const fn start(&self) -> &Zoned {
        match self {
            Self::Master { start, .. } | Self::Derived { start, .. } => start,
        }
    }

    /// Exclusive end of the occurrence.
    #[must_use]
    pub const fn end(&self) -> &Zoned {
        match self {
            Self::Master { end, .. } | Self::Derived { end, .. } => end,
        }
    }

    /// Whether this is the master event itself.
    #[must_use]
    pub const fn is_master(&self) -> bool {
        matches!(self, Self::Master { .. })
    }

    fn new(index: u64, uid: &str, start: Zoned, end: Zoned) -> Self {
        let uid = uid.to_string();
        if index == 0 {
            Self::Master { uid, start, end }
        } else {
            Self::Derived { uid, start, end }
        }
    }
}

/// Produce the occurrences of `master` overlapping the half-open window
/// `[window_start, window_end)`, in ascending order of start, expressed in
/// `zone`.
///
/// A zero-length occurrence overlaps the window when its start lies inside.
/// An empty window or a window with `window_start > window_end` yields
/// nothing.
#[tracing::instrument(skip(master, zone), fields(uid = master.uid()))]
pub fn expand(
    master: &MasterEvent,
    window_start: Timestamp,
    window_end: Timestamp,
    zone: &TimeZone,
) -> Vec<Occurrence> {
    if window_start > window_end {
        tracing::debug!("window ends before it starts");
        return Vec::new();
    }
    let window = Window {
        start: window_start,
        end: window_end,
    };

    let rule = master.rrule();
    if !rule.is_recurring() {
        let (start, end) = (master.start(), master.end());
        return if window.overlaps(start.timestamp(), end.timestamp()) {
            let start = start.with_time_zone(zone.clone());
            let end = end.with_time_zone(zone.clone());
            vec![Occurrence::new(0, master.uid(), start, end)]
        } else {
            Vec::new()
        };
    }

    let mut occurrences = Vec::new();
    let result = if master.is_all_day() {
        expand_all_day(master, rule, window, zone, &mut occurrences)
    } else {
        expand_timed(master, rule, window, zone, &mut occurrences)
    };

    // a candidate beyond the supported range ends the series
    if let Err(err) = result {
        tracing::debug!(
            %err,
            count = occurrences.len(),
            "series ends at the edge of the time range"
        );
    }
    occurrences
}

#[derive(Debug, Clone, Copy)]
struct Window {
    start: Timestamp,
    end: Timestamp,
}

impl Window {
    fn overlaps(self, start: Timestamp, end: Timestamp) -> bool {
        if start == end {
            self.start <= start && start < self.end
        } else {
            start < self.end && end > self.start
        }
    }
}

/// Iterator over candidate indexes `n` with their bounds.
#[derive(Debug)]
struct Candidates {
    next: u64,
    count: Option<u64>,
    frequency: Frequency,
    interval: i64,
}

impl Candidates {
    fn new(rule: &RecurrenceRule, first: u64) -> Self {
        Self {
            next: first,
            count: rule.count().map(|c| u64::from(c.get())),
            frequency: rule.frequency(),
            interval: i64::from(rule.interval().get()),
        }
    }

    /// The next index and the span from the series start to its candidate.
    fn advance(&mut self) -> Result<Option<(u64, jiff::Span)>, jiff::Error> {
        let n = self.next;
        if self.count.is_some_and(|count| n >= count) {
            return Ok(None);
        }
        self.next += 1;

        let units = i64::try_from(n)
            .ok()
            .and_then(|n| n.checked_mul(self.interval));
        let Some(units) = units else {
            return Ok(None);
        };
        Ok(self.frequency.span(units)?.map(|span| (n, span)))
    }
}

/// First candidate index that can overlap a window starting at `window_start`.
///
/// Every step is at most `max_step_seconds` long, so candidates below the
/// returned index end before the window.
fn first_candidate(
    rule: &RecurrenceRule,
    series_start: Timestamp,
    duration: SignedDuration,
    window_start: Timestamp,
) -> u64 {
    let step = rule
        .frequency()
        .max_step_seconds()
        .saturating_mul(i64::from(rule.interval().get()));
    if step <= 0 {
        return 0;
    }
    let gap = window_start.as_second() - series_start.as_second() - duration.as_secs();
    u64::try_from(gap / step).unwrap_or(0)
}

fn expand_timed(
    master: &MasterEvent,
    rule: &RecurrenceRule,
    window: Window,
    zone: &TimeZone,
    occurrences: &mut Vec<Occurrence>,
) -> Result<(), jiff::Error> {
    let series_start = master.start();
    let duration = series_start.duration_until(master.end());
    let until = rule.until().map(|until| match until {
        Moment::Instant(ts) => ts,
        // dates are only used by all-day series, take the end of the day
        Moment::Date(date) => date
            .to_datetime(jiff::civil::Time::MAX)
            .to_zoned(series_start.time_zone().clone())
            .map_or(Timestamp::MAX, |z| z.timestamp()),
    });

    let first = first_candidate(rule, series_start.timestamp(), duration, window.start);
    let mut candidates = Candidates::new(rule, first);

    while let Some((n, span)) = candidates.advance()? {
        let start = series_start.checked_add(span)?;
        let start_ts = start.timestamp();
        if until.is_some_and(|until| start_ts > until) || start_ts >= window.end {
            break;
        }

        if master.exdates().contains(&Moment::Instant(start_ts)) {
            tracing::debug!(%start, "occurrence excluded");
            continue;
        }

        let end_ts = start_ts.checked_add(duration)?;
        if window.overlaps(start_ts, end_ts) {
            let start = start.with_time_zone(zone.clone());
            let end = end_ts.to_zoned(zone.clone());
            occurrences.push(Occurrence::new(n, master.uid(), start, end));
        }
    }

    Ok(())
}

fn expand_all_day(
    master: &MasterEvent,
    rule: &RecurrenceRule,
    window: Window,
    zone: &TimeZone,
    occurrences: &mut Vec<Occurrence>,
) -> Result<(), jiff::Error> {
    let series_start: Date = master.start().date();
    let days = days_between(series_start, master.end().date())?;
    let until = rule.until().map(|until| until.date_in(master.start().time_zone()));

    let duration = master.start().duration_until(master.end());
    let first = first_candidate(rule, master.start().timestamp(), duration, window.start);
    let mut candidates = Candidates::new(rule, first);

    while let Some((n, span)) = candidates.advance()? {
        let date = series_start.checked_add(span)?;
        if until.is_some_and(|until| date > until) {
            break;
        }

        let start = start_of_day(date, zone)?;
        if start.timestamp() >= window.end {
            break;
        }

        if master.exdates().contains(&Moment::Date(date)) {
            tracing::debug!(%date, "occurrence excluded");
            continue;
        }

        let end = start_of_day(date.checked_add(jiff::Span::new().days(days))?, zone)?;
        if window.overlaps(start.timestamp(), end.timestamp()) {
            occurrences.push(Occurrence::new(n, master.uid(), start, end));
        }
    }

    Ok(())
}
