// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! Custom assertion helpers for integration tests.

use jiff::civil::DateTime;
use tidecal_core::{MasterEvent, Occurrence};

/// Asserts the local wall-clock starts of a list of occurrences.
///
/// # Panics
///
/// Panics if the starts differ.
pub fn assert_local_starts(occurrences: &[Occurrence], expected: &[DateTime]) {
    let starts: Vec<_> = occurrences.iter().map(|o| o.start().datetime()).collect();
    assert_eq!(starts, expected, "occurrence starts mismatch");
}

/// Asserts that two events agree on every field that travels in full
/// calendar text.
///
/// # Panics
///
/// Panics if any field differs.
pub fn assert_same_fields(actual: &MasterEvent, expected: &MasterEvent) {
    assert_eq!(actual.uid(), expected.uid(), "uid mismatch");
    assert_eq!(actual.summary(), expected.summary(), "summary mismatch");
    assert_eq!(actual.location(), expected.location(), "location mismatch");
    assert_eq!(actual.description(), expected.description(), "description mismatch");
    assert_eq!(actual.start(), expected.start(), "start mismatch");
    assert_eq!(
        actual.start().time_zone().iana_name(),
        expected.start().time_zone().iana_name(),
        "start zone mismatch"
    );
    assert_eq!(actual.end(), expected.end(), "end mismatch");
    assert_eq!(actual.is_all_day(), expected.is_all_day(), "all-day mismatch");
    assert_eq!(actual.organizer(), expected.organizer(), "organizer mismatch");
    assert_eq!(actual.attendees(), expected.attendees(), "attendees mismatch");
    assert_eq!(actual.reminder(), expected.reminder(), "reminder mismatch");
    assert_eq!(actual.sequence(), expected.sequence(), "sequence mismatch");
    assert_eq!(actual.dtstamp(), expected.dtstamp(), "dtstamp mismatch");
    assert_eq!(actual.rrule(), expected.rrule(), "rrule mismatch");
    assert_eq!(actual.exdates(), expected.exdates(), "exdates mismatch");
    assert_eq!(actual.reference_id(), expected.reference_id(), "reference id mismatch");
}
