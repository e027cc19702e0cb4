// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

use jiff::civil::datetime;
use tidecal_core::expand;

use crate::common::{at, new_york, utc, weekly_from};

#[test]
fn weekly_series_keeps_wall_clock_across_spring_forward() {
    let tz = new_york();
    // 2025-03-09 is the first Sunday on daylight saving time
    let master = weekly_from("evening", at(&tz, datetime(2025, 2, 26, 18, 30, 0, 0)), 1);

    let occurrences = expand(
        &master,
        utc("2025-02-20T00:00:00Z"),
        utc("2025-03-25T00:00:00Z"),
        &tz,
    );

    assert_eq!(occurrences.len(), 4);
    for o in &occurrences {
        assert_eq!(o.start().time(), jiff::civil::time(18, 30, 0, 0));
        assert_eq!(o.end().time(), jiff::civil::time(19, 30, 0, 0));
    }
    let offsets: Vec<_> = occurrences.iter().map(|o| o.start().offset().seconds()).collect();
    assert_eq!(offsets, [-5 * 3600, -5 * 3600, -4 * 3600, -4 * 3600]);
}

#[test]
fn weekly_series_keeps_wall_clock_across_fall_back() {
    let tz = new_york();
    let master = weekly_from("evening", at(&tz, datetime(2025, 10, 22, 18, 30, 0, 0)), 1);
    let occurrences = expand(
        &master,
        utc("2025-10-20T00:00:00Z"),
        utc("2025-11-10T00:00:00Z"),
        &tz,
    );
    assert_eq!(occurrences.len(), 3);
    assert!(
        occurrences
            .iter()
            .all(|o| o.start().time() == jiff::civil::time(18, 30, 0, 0))
    );
}
