// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

use jiff::civil::datetime;
use tidecal_core::{Moment, expand};

use crate::common::{assert_local_starts, at, berlin, utc, weekly_from};

#[test]
fn exception_date_removes_exactly_one_occurrence() {
    let tz = berlin();
    let master = weekly_from("sync", at(&tz, datetime(2012, 12, 21, 8, 30, 0, 0)), 1);
    let (from, to) = (utc("2012-12-01T00:00:00Z"), utc("2013-01-31T00:00:00Z"));
    let before = expand(&master, from, to, &tz);

    let excluded = at(&tz, datetime(2013, 1, 4, 8, 30, 0, 0)).timestamp();
    let master = master
        .to_builder()
        .exdate(Moment::Instant(excluded))
        .build()
        .unwrap();
    let after = expand(&master, from, to, &tz);

    assert_eq!(after.len(), before.len() - 1);
    assert!(after.iter().all(|o| o.start().timestamp() != excluded));
}

#[test]
fn exception_date_can_suppress_the_master() {
    let tz = berlin();
    let start = at(&tz, datetime(2012, 12, 21, 8, 30, 0, 0));
    let master = weekly_from("sync", start.clone(), 1)
        .to_builder()
        .exdate(Moment::Instant(start.timestamp()))
        .build()
        .unwrap();

    let occurrences = expand(
        &master,
        utc("2012-12-20T00:00:00Z"),
        utc("2013-01-01T00:00:00Z"),
        &tz,
    );
    assert_local_starts(&occurrences, &[datetime(2012, 12, 28, 8, 30, 0, 0)]);
    assert!(!occurrences[0].is_master());
}

#[test]
fn exception_date_not_on_the_pattern_changes_nothing() {
    let tz = berlin();
    let master = weekly_from("sync", at(&tz, datetime(2012, 12, 21, 8, 30, 0, 0)), 1);
    let (from, to) = (utc("2012-12-01T00:00:00Z"), utc("2013-01-31T00:00:00Z"));
    let off_pattern = at(&tz, datetime(2013, 1, 4, 9, 30, 0, 0)).timestamp();
    let with_exdate = master
        .to_builder()
        .exdate(Moment::Instant(off_pattern))
        .build()
        .unwrap();
    assert_eq!(expand(&master, from, to, &tz).len(), expand(&with_exdate, from, to, &tz).len());
}
