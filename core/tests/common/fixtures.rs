// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! Test data factories for integration tests.
//!
//! This module provides helper functions to create zones, instants, events
//! and calendar text.

use std::num::NonZeroU32;

use jiff::civil::DateTime;
use jiff::tz::TimeZone;
use jiff::{Timestamp, Zoned};
use tidecal_core::{
    Action, Attendee, Frequency, MasterEvent, Organizer, ParticipationRole, ParticipationStatus,
    RecurrenceRule, Reminder, ReminderUnit, datetime::from_local_datetime,
};

#[must_use]
pub fn berlin() -> TimeZone {
    TimeZone::get("Europe/Berlin").unwrap()
}

#[must_use]
pub fn new_york() -> TimeZone {
    TimeZone::get("America/New_York").unwrap()
}

/// Parse an RFC 3339 instant.
#[must_use]
pub fn utc(s: &str) -> Timestamp {
    s.parse().unwrap()
}

/// A wall-clock time in the given zone.
#[must_use]
pub fn at(tz: &TimeZone, dt: DateTime) -> Zoned {
    from_local_datetime(tz, dt).unwrap()
}

/// The default modification stamp of fixture events.
#[must_use]
pub fn dtstamp() -> Timestamp {
    utc("2012-12-01T00:00:00Z")
}

/// A single timed event.
#[must_use]
pub fn timed_event(uid: &str, start: Zoned, end: Zoned) -> MasterEvent {
    MasterEvent::builder()
        .uid(uid)
        .summary(Some(format!("event {uid}")))
        .timed(start, Some(end))
        .dtstamp(dtstamp())
        .build()
        .unwrap()
}

/// A weekly series of one-hour events.
#[must_use]
pub fn weekly_from(uid: &str, start: Zoned, interval: u32) -> MasterEvent {
    let end = start.checked_add(jiff::Span::new().hours(1)).unwrap();
    let rule = RecurrenceRule::new(Frequency::Weekly)
        .with_interval(NonZeroU32::new(interval).unwrap());
    MasterEvent::builder()
        .uid(uid)
        .summary(Some("Weekly sync".to_string()))
        .timed(start, Some(end))
        .dtstamp(dtstamp())
        .rrule(rule)
        .build()
        .unwrap()
}

/// An event using every field the model has.
#[must_use]
pub fn full_event() -> MasterEvent {
    let tz = berlin();
    let start = at(&tz, jiff::civil::datetime(2025, 3, 3, 9, 0, 0, 0));
    let end = at(&tz, jiff::civil::datetime(2025, 3, 3, 10, 30, 0, 0));
    let exdate = at(&tz, jiff::civil::datetime(2025, 3, 17, 9, 0, 0, 0)).timestamp();
    let until = at(&tz, jiff::civil::datetime(2025, 6, 30, 9, 0, 0, 0)).timestamp();
    MasterEvent::builder()
        .uid("full@example.com")
        .summary(Some("Planning; Q2, all teams".to_string()))
        .location(Some("Room 4\nBuilding B".to_string()))
        .description(Some("Bring numbers.\\ Agenda follows".to_string()))
        .timed(start, Some(end))
        .organizer(Some(Organizer {
            address: "mailto:lead@example.com".to_string(),
            common_name: Some("Team Lead".to_string()),
            role: Some(ParticipationRole::Chair),
        }))
        .attendee(Attendee {
            status: ParticipationStatus::Accepted,
            rsvp: Some(true),
            common_name: Some("Bob, the builder".to_string()),
            ..Attendee::with_address("mailto:bob@example.com")
        })
        .attendee(Attendee {
            role: ParticipationRole::OptParticipant,
            status: ParticipationStatus::Tentative,
            additional_params: Some("X-NUM-GUESTS=2".to_string()),
            ..Attendee::with_address("mailto:carol@example.com")
        })
        .reminder(Some(Reminder::new(2, ReminderUnit::Hours, Action::Email)))
        .sequence(3)
        .dtstamp(utc("2025-02-27T08:15:00Z"))
        .rrule(
            RecurrenceRule::new(Frequency::Weekly)
                .with_interval(NonZeroU32::new(2).unwrap())
                .with_until(until.into()),
        )
        .exdate(exdate.into())
        .build()
        .unwrap()
}

/// Wrap `VEVENT` blocks into a calendar object.
#[must_use]
pub fn ical(method: Option<&str>, events: &[&str]) -> String {
    let mut text = String::from("BEGIN:VCALENDAR\r\nVERSION:2.0\r\nPRODID:-//test//EN\r\n");
    if let Some(method) = method {
        text.push_str(&format!("METHOD:{method}\r\n"));
    }
    for event in events {
        text.push_str("BEGIN:VEVENT\r\n");
        for line in event.lines() {
            let line = line.trim();
            if !line.is_empty() {
                text.push_str(line);
                text.push_str("\r\n");
            }
        }
        text.push_str("END:VEVENT\r\n");
    }
    text.push_str("END:VCALENDAR\r\n");
    text
}
