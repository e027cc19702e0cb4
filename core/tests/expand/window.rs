// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

use std::num::NonZeroU32;

use jiff::civil::datetime;
use jiff::tz::TimeZone;
use tidecal_core::{MasterEvent, RecurrenceRule, expand};

use crate::common::{assert_local_starts, at, berlin, dtstamp, timed_event, utc, weekly_from};

#[test]
fn weekly_series_is_bounded_by_the_window() {
    let tz = berlin();
    let master = weekly_from("sync", at(&tz, datetime(2012, 12, 21, 8, 30, 0, 0)), 1);

    let occurrences = expand(
        &master,
        at(&tz, datetime(2012, 12, 1, 0, 0, 0, 0)).timestamp(),
        at(&tz, datetime(2013, 1, 31, 0, 0, 0, 0)).timestamp(),
        &tz,
    );

    assert_local_starts(
        &occurrences,
        &[
            datetime(2012, 12, 21, 8, 30, 0, 0),
            datetime(2012, 12, 28, 8, 30, 0, 0),
            datetime(2013, 1, 4, 8, 30, 0, 0),
            datetime(2013, 1, 11, 8, 30, 0, 0),
            datetime(2013, 1, 18, 8, 30, 0, 0),
            datetime(2013, 1, 25, 8, 30, 0, 0),
        ],
    );
    assert!(occurrences[0].is_master());
    assert!(occurrences[1..].iter().all(|o| !o.is_master()));
    assert!(occurrences.iter().all(|o| o.uid() == "sync"));
    for o in &occurrences {
        assert_eq!(o.start().duration_until(o.end()).as_hours(), 1);
    }
}

#[test]
fn expansion_is_restartable() {
    let tz = berlin();
    let master = weekly_from("sync", at(&tz, datetime(2012, 12, 21, 8, 30, 0, 0)), 1);
    let (from, to) = (utc("2012-12-01T00:00:00Z"), utc("2013-01-31T00:00:00Z"));
    assert_eq!(expand(&master, from, to, &tz), expand(&master, from, to, &tz));
}

#[test]
fn inverted_window_is_empty() {
    let tz = berlin();
    let master = weekly_from("sync", at(&tz, datetime(2012, 12, 21, 8, 30, 0, 0)), 1);
    let occurrences = expand(
        &master,
        utc("2013-01-31T00:00:00Z"),
        utc("2012-12-01T00:00:00Z"),
        &tz,
    );
    assert!(occurrences.is_empty());
}

#[test]
fn single_event_appears_when_overlapping() {
    let tz = TimeZone::UTC;
    let event = timed_event(
        "once",
        at(&tz, datetime(2025, 5, 1, 23, 0, 0, 0)),
        at(&tz, datetime(2025, 5, 2, 1, 0, 0, 0)),
    );

    let hit = expand(&event, utc("2025-05-02T00:00:00Z"), utc("2025-05-03T00:00:00Z"), &tz);
    assert_eq!(hit.len(), 1);
    assert!(hit[0].is_master());

    let miss = expand(&event, utc("2025-05-02T01:00:00Z"), utc("2025-05-03T00:00:00Z"), &tz);
    assert!(miss.is_empty());
}

#[test]
fn occurrences_are_expressed_in_the_requested_zone() {
    let master = weekly_from("sync", at(&berlin(), datetime(2025, 1, 6, 9, 0, 0, 0)), 1);
    let tokyo = TimeZone::get("Asia/Tokyo").unwrap();
    let occurrences = expand(
        &master,
        utc("2025-01-01T00:00:00Z"),
        utc("2025-01-10T00:00:00Z"),
        &tokyo,
    );
    assert_eq!(occurrences.len(), 1);
    assert_eq!(occurrences[0].start().datetime(), datetime(2025, 1, 6, 17, 0, 0, 0));
    assert_eq!(occurrences[0].start().time_zone().iana_name(), Some("Asia/Tokyo"));
}

#[test]
fn count_limits_occurrences_across_windows() {
    let tz = TimeZone::UTC;
    let master = MasterEvent::builder()
        .uid("three")
        .timed(at(&tz, datetime(2025, 1, 1, 12, 0, 0, 0)), None)
        .dtstamp(dtstamp())
        .rrule(
            RecurrenceRule::new(tidecal_core::Frequency::Daily)
                .with_count(NonZeroU32::new(3).unwrap()),
        )
        .build()
        .unwrap();

    let all = expand(&master, utc("2024-12-01T00:00:00Z"), utc("2025-02-01T00:00:00Z"), &tz);
    assert_eq!(all.len(), 3);

    let later = expand(&master, utc("2025-01-02T13:00:00Z"), utc("2025-02-01T00:00:00Z"), &tz);
    assert_local_starts(&later, &[datetime(2025, 1, 3, 12, 0, 0, 0)]);
}

#[test]
fn until_is_inclusive() {
    let tz = TimeZone::UTC;
    let start = at(&tz, datetime(2025, 1, 1, 12, 0, 0, 0));
    let until = at(&tz, datetime(2025, 1, 3, 12, 0, 0, 0)).timestamp();
    let master = MasterEvent::builder()
        .timed(start, None)
        .dtstamp(dtstamp())
        .rrule(RecurrenceRule::new(tidecal_core::Frequency::Daily).with_until(until.into()))
        .build()
        .unwrap();

    let occurrences = expand(&master, utc("2024-12-01T00:00:00Z"), utc("2025-02-01T00:00:00Z"), &tz);
    assert_eq!(occurrences.len(), 3);
}

fn yearly(uid: &str, interval: u32) -> MasterEvent {
    let tz = TimeZone::UTC;
    MasterEvent::builder()
        .uid(uid)
        .timed(
            at(&tz, datetime(2025, 1, 1, 12, 0, 0, 0)),
            Some(at(&tz, datetime(2025, 1, 1, 13, 0, 0, 0))),
        )
        .dtstamp(dtstamp())
        .rrule(
            RecurrenceRule::new(tidecal_core::Frequency::Yearly)
                .with_interval(NonZeroU32::new(interval).unwrap()),
        )
        .build()
        .unwrap()
}

#[test]
fn huge_interval_keeps_the_master() {
    let master = yearly("decamillennial", 10_000);
    let occurrences = expand(
        &master,
        utc("2024-01-01T00:00:00Z"),
        utc("2026-01-01T00:00:00Z"),
        &TimeZone::UTC,
    );
    assert_local_starts(&occurrences, &[datetime(2025, 1, 1, 12, 0, 0, 0)]);
    assert!(occurrences[0].is_master());
}

#[test]
fn unbounded_window_stops_at_the_end_of_the_time_range() {
    let master = yearly("new-year", 1);
    let occurrences = expand(
        &master,
        utc("2024-01-01T00:00:00Z"),
        jiff::Timestamp::MAX,
        &TimeZone::UTC,
    );

    assert_eq!(occurrences.len(), 7975);
    assert!(occurrences[0].is_master());
    let last = occurrences.last().unwrap();
    assert_eq!(last.start().datetime(), datetime(9999, 1, 1, 12, 0, 0, 0));
}

#[test]
fn huge_interval_keeps_the_all_day_master() {
    let master = MasterEvent::builder()
        .uid("all-day-decamillennial")
        .all_day(jiff::civil::date(2025, 1, 1), None, TimeZone::UTC)
        .dtstamp(dtstamp())
        .rrule(
            RecurrenceRule::new(tidecal_core::Frequency::Yearly)
                .with_interval(NonZeroU32::new(10_000).unwrap()),
        )
        .build()
        .unwrap();

    let occurrences = expand(
        &master,
        utc("2024-01-01T00:00:00Z"),
        utc("2026-01-01T00:00:00Z"),
        &TimeZone::UTC,
    );
    assert_eq!(occurrences.len(), 1);
    assert!(occurrences[0].is_master());
}
