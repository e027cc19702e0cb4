// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

use jiff::civil::{date, datetime};
use jiff::tz::TimeZone;
use tidecal_core::{
    ExceptionDates, FieldSet, HandleMethod, MasterEvent, Method, RecurrenceRule, decode, encode,
};

use crate::common::{assert_same_fields, at, berlin, dtstamp, full_event, timed_event};

#[test]
fn full_export_reproduces_every_field() {
    let event = full_event();
    let out = encode(std::slice::from_ref(&event), FieldSet::AllFields).unwrap();
    assert!(out.warnings.is_empty());

    let decoded = decode(&out.text, HandleMethod::AddUpdate, &berlin()).unwrap();
    assert_eq!(decoded.len(), 1);
    assert_eq!(decoded[0].method, HandleMethod::AddUpdate);
    assert_same_fields(&decoded[0].event, &event);
}

#[test]
fn cancel_set_reproduces_its_fields_only() {
    let event = full_event();
    let out = encode(std::slice::from_ref(&event), FieldSet::CANCEL).unwrap();

    let decoded = decode(&out.text, HandleMethod::AddUpdate, &berlin()).unwrap();
    assert_eq!(decoded[0].method, HandleMethod::Cancel);
    let got = &decoded[0].event;

    assert_eq!(got.uid(), event.uid());
    assert_eq!(got.dtstamp(), event.dtstamp());
    assert_eq!(got.start(), event.start());
    assert_eq!(got.sequence(), event.sequence());
    assert_eq!(got.organizer(), event.organizer());

    assert_eq!(got.summary(), None);
    assert_eq!(got.location(), None);
    assert_eq!(got.description(), None);
    assert!(got.attendees().is_empty());
    assert_eq!(got.reminder(), None);
    assert_eq!(got.rrule(), &RecurrenceRule::none());
    assert_eq!(got.exdates(), &ExceptionDates::new());
    // without DTEND the end defaults to the start
    assert_eq!(got.end(), got.start());
}

#[test]
fn encoding_is_idempotent() {
    let event = full_event();
    for fields in [
        FieldSet::AllFields,
        FieldSet::CANCEL,
        FieldSet::ForMethod(Method::Request),
    ] {
        let first = encode(std::slice::from_ref(&event), fields).unwrap();
        let second = encode(std::slice::from_ref(&event), fields).unwrap();
        assert_eq!(first.text, second.text, "{fields:?}");
    }
}

#[test]
fn reencoding_decoded_text_is_stable() {
    let event = full_event();
    let first = encode(std::slice::from_ref(&event), FieldSet::AllFields).unwrap();
    let decoded = decode(&first.text, HandleMethod::AddUpdate, &berlin()).unwrap();
    let events: Vec<MasterEvent> = decoded.into_iter().map(|d| d.event).collect();
    let second = encode(&events, FieldSet::AllFields).unwrap();
    assert_eq!(first.text, second.text);
}

#[test]
fn all_day_event_round_trips() {
    let tz = berlin();
    let event = MasterEvent::builder()
        .uid("holiday")
        .summary(Some("Holiday".to_string()))
        .all_day(date(2025, 12, 24), Some(date(2025, 12, 27)), tz.clone())
        .dtstamp(dtstamp())
        .build()
        .unwrap();
    let out = encode(std::slice::from_ref(&event), FieldSet::AllFields).unwrap();
    assert!(out.text.contains("DTSTART;VALUE=DATE:20251224\r\n"));
    assert!(out.text.contains("DTEND;VALUE=DATE:20251227\r\n"));

    let decoded = decode(&out.text, HandleMethod::AddUpdate, &tz).unwrap();
    assert_same_fields(&decoded[0].event, &event);
}

#[test]
fn utc_event_is_written_with_z_suffix() {
    let tz = TimeZone::UTC;
    let event = timed_event(
        "utc",
        at(&tz, datetime(2025, 1, 2, 10, 0, 0, 0)),
        at(&tz, datetime(2025, 1, 2, 11, 0, 0, 0)),
    );
    let out = encode(std::slice::from_ref(&event), FieldSet::AllFields).unwrap();
    assert!(out.text.contains("DTSTART:20250102T100000Z\r\n"));
    assert!(!out.text.contains("TZID"));

    let decoded = decode(&out.text, HandleMethod::AddUpdate, &berlin()).unwrap();
    assert_eq!(decoded[0].event.start(), event.start());
}

#[test]
fn several_events_share_one_calendar() {
    let tz = berlin();
    let a = timed_event(
        "a",
        at(&tz, datetime(2025, 1, 2, 10, 0, 0, 0)),
        at(&tz, datetime(2025, 1, 2, 11, 0, 0, 0)),
    );
    let b = timed_event(
        "b",
        at(&tz, datetime(2025, 1, 3, 10, 0, 0, 0)),
        at(&tz, datetime(2025, 1, 3, 11, 0, 0, 0)),
    );
    let out = encode(&[a, b], FieldSet::AllFields).unwrap();
    assert_eq!(out.text.matches("BEGIN:VCALENDAR").count(), 1);
    let decoded = decode(&out.text, HandleMethod::AddUpdate, &tz).unwrap();
    let uids: Vec<_> = decoded.iter().map(|d| d.event.uid()).collect();
    assert_eq!(uids, ["a", "b"]);
}

#[test]
fn quoted_attendee_parameters_keep_their_separators() {
    let event = full_event()
        .to_builder()
        .attendees([tidecal_core::Attendee {
            additional_params: Some(
                "DELEGATED-FROM=\"mailto:a;b@example.com\";X-NUM-GUESTS=1".to_string(),
            ),
            ..tidecal_core::Attendee::with_address("mailto:dave@example.com")
        }])
        .build()
        .unwrap();
    let out = encode(std::slice::from_ref(&event), FieldSet::AllFields).unwrap();

    let decoded = decode(&out.text, HandleMethod::AddUpdate, &berlin()).unwrap();
    let attendees = decoded[0].event.attendees();
    assert_eq!(attendees.len(), 1);
    assert_eq!(
        attendees[0].additional_params.as_deref(),
        Some("DELEGATED-FROM=\"mailto:a;b@example.com\";X-NUM-GUESTS=1")
    );
}
