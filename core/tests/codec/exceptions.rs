// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

use jiff::civil::datetime;
use tidecal_core::{FieldSet, HandleMethod, Moment, decode, encode};

use crate::common::{at, berlin, ical, weekly_from};

#[test]
fn recurrence_id_marks_an_exception() {
    let text = ical(
        None,
        &["UID:sync
           DTSTAMP:20130101T000000Z
           DTSTART;TZID=Europe/Berlin:20130104T100000
           DTEND;TZID=Europe/Berlin:20130104T110000
           RECURRENCE-ID;TZID=Europe/Berlin:20130104T083000
           RRULE:FREQ=DAILY
           SUMMARY:Moved"],
    );
    let tz = berlin();
    let decoded = decode(&text, HandleMethod::AddUpdate, &tz).unwrap();
    let event = &decoded[0].event;

    assert_eq!(event.uid(), "sync");
    let original = at(&tz, datetime(2013, 1, 4, 8, 30, 0, 0)).timestamp();
    assert_eq!(event.reference_id(), Some(Moment::Instant(original)));
    assert!(!event.rrule().is_recurring());
    assert!(event.exdates().is_empty());
}

#[test]
fn exception_round_trips_its_reference() {
    let tz = berlin();
    let master = weekly_from("sync", at(&tz, datetime(2012, 12, 21, 8, 30, 0, 0)), 1);
    let original = at(&tz, datetime(2013, 1, 4, 8, 30, 0, 0));
    let moved = original.checked_add(jiff::Span::new().hours(2)).unwrap();
    let exception = master
        .to_builder()
        .timed(moved.clone(), None)
        .rrule(tidecal_core::RecurrenceRule::none())
        .reference_id(Some(Moment::Instant(original.timestamp())))
        .build()
        .unwrap();

    let out = encode(std::slice::from_ref(&exception), FieldSet::AllFields).unwrap();
    assert!(out.text.contains("RECURRENCE-ID;TZID=Europe/Berlin:20130104T083000\r\n"));

    let decoded = decode(&out.text, HandleMethod::AddUpdate, &tz).unwrap();
    assert_eq!(decoded[0].event.reference_id(), exception.reference_id());
    assert_eq!(decoded[0].event.start(), &moved);
}

#[test]
fn per_event_cancellation_overrides_calendar_default() {
    let text = ical(
        Some("PUBLISH"),
        &[
            "UID:kept
             DTSTAMP:20130101T000000Z
             DTSTART:20130104T100000Z",
            "UID:dropped
             DTSTAMP:20130101T000000Z
             DTSTART:20130105T100000Z
             STATUS:CANCELLED",
        ],
    );
    let decoded = decode(&text, HandleMethod::AddUpdate, &berlin()).unwrap();
    let methods: Vec<_> = decoded.iter().map(|d| d.method).collect();
    assert_eq!(methods, [HandleMethod::AddUpdate, HandleMethod::Cancel]);
}

#[test]
fn unsupported_properties_are_ignored() {
    let text = ical(
        None,
        &["UID:x
           DTSTAMP:20130101T000000Z
           DTSTART:20130104T100000Z
           X-WR-CUSTOM;X-P=1:value
           CATEGORIES:WORK,TRAVEL
           RRULE:FREQ=WEEKLY;BYDAY=MO,WE"],
    );
    let decoded = decode(&text, HandleMethod::AddUpdate, &berlin()).unwrap();
    assert_eq!(decoded.len(), 1);
    assert!(decoded[0].event.rrule().is_recurring());
}
