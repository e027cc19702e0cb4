// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

use std::num::NonZeroU32;

use jiff::civil::date;
use tidecal_core::{Frequency, HandleMethod, MasterEvent, Moment, RecurrenceRule, decode, expand};

use crate::common::{at, dtstamp, ical, new_york};

fn biweekly(until: jiff::civil::Date) -> MasterEvent {
    MasterEvent::builder()
        .uid("biweekly")
        .all_day(date(2011, 3, 3), None, new_york())
        .dtstamp(dtstamp())
        .rrule(
            RecurrenceRule::new(Frequency::Weekly)
                .with_interval(NonZeroU32::new(2).unwrap())
                .with_until(Moment::Date(until)),
        )
        .build()
        .unwrap()
}

#[test]
fn biweekly_all_day_series_in_a_month() {
    let tz = new_york();
    let master = biweekly(date(2011, 4, 30));
    let occurrences = expand(
        &master,
        at(&tz, date(2011, 3, 1).at(0, 0, 0, 0)).timestamp(),
        at(&tz, date(2011, 3, 31).at(0, 0, 0, 0)).timestamp(),
        &tz,
    );
    let days: Vec<_> = occurrences.iter().map(|o| o.start().date()).collect();
    assert_eq!(days, [date(2011, 3, 3), date(2011, 3, 17)]);
}

#[test]
fn all_day_occurrences_start_at_local_midnight_across_dst() {
    // 2011-03-13 switches New York to daylight saving time
    let tz = new_york();
    let master = biweekly(date(2011, 4, 30));
    let occurrences = expand(
        &master,
        at(&tz, date(2011, 3, 1).at(0, 0, 0, 0)).timestamp(),
        at(&tz, date(2011, 5, 1).at(0, 0, 0, 0)).timestamp(),
        &tz,
    );
    let days: Vec<_> = occurrences.iter().map(|o| o.start().date()).collect();
    assert_eq!(
        days,
        [date(2011, 3, 3), date(2011, 3, 17), date(2011, 3, 31), date(2011, 4, 14), date(2011, 4, 28)]
    );
    for o in &occurrences {
        assert_eq!(o.start().time(), jiff::civil::Time::midnight());
        assert_eq!(o.end().date(), o.start().date().tomorrow().unwrap());
    }
}

#[test]
fn all_day_exception_is_a_date() {
    let tz = new_york();
    let master = biweekly(date(2011, 4, 30))
        .to_builder()
        .exdate(Moment::Date(date(2011, 3, 17)))
        .build()
        .unwrap();
    let occurrences = expand(
        &master,
        at(&tz, date(2011, 3, 1).at(0, 0, 0, 0)).timestamp(),
        at(&tz, date(2011, 3, 31).at(0, 0, 0, 0)).timestamp(),
        &tz,
    );
    assert_eq!(occurrences.len(), 1);
    assert_eq!(occurrences[0].start().date(), date(2011, 3, 3));
}

#[test]
fn decoded_utc_until_keeps_the_last_local_day() {
    // 2011-04-29T15:00Z is midnight of 2011-04-30 in Tokyo
    let tokyo = jiff::tz::TimeZone::get("Asia/Tokyo").unwrap();
    let text = ical(
        None,
        &["UID:daily
           DTSTAMP:20110401T000000Z
           DTSTART;VALUE=DATE:20110428
           RRULE:FREQ=DAILY;UNTIL=20110429T150000Z"],
    );
    let decoded = decode(&text, HandleMethod::AddUpdate, &tokyo).unwrap();
    let master = &decoded[0].event;

    let occurrences = expand(
        master,
        at(&tokyo, date(2011, 4, 1).at(0, 0, 0, 0)).timestamp(),
        at(&tokyo, date(2011, 5, 31).at(0, 0, 0, 0)).timestamp(),
        &tokyo,
    );
    let days: Vec<_> = occurrences.iter().map(|o| o.start().date()).collect();
    assert_eq!(days, [date(2011, 4, 28), date(2011, 4, 29), date(2011, 4, 30)]);
}
