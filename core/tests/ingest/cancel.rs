// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

use jiff::tz::TimeZone;
use tidecal_core::{
    CalendarRef, FieldSet, HandleMethod, IngestionHandler, ValidationWarning, encode,
};

use crate::common::{MemoryStore, StoreCall, full_event};

fn cancel_text() -> String {
    encode(&[full_event()], FieldSet::CANCEL).unwrap().text
}

#[test]
fn cancel_of_unknown_event_is_warned_and_not_deleted() {
    let mut store = MemoryStore::default();
    let mut h = IngestionHandler::new(Some(CalendarRef::new("home")), TimeZone::UTC);
    assert!(h.read_ical(&cancel_text(), HandleMethod::AddUpdate));
    assert_eq!(h.handles()[0].method(), HandleMethod::Cancel);

    h.validate(&store).unwrap();
    assert_eq!(
        h.handles()[0].warnings(),
        [ValidationWarning::EventToDeleteNotFound]
    );

    for force in [false, true] {
        let plan = h.persist(force).unwrap();
        plan.execute(&mut store).unwrap();
    }
    assert!(store.calls.is_empty());
}

#[test]
fn cancel_of_stored_event_marks_it_deleted() {
    let calendar = CalendarRef::new("home");
    let mut store = MemoryStore::with(&calendar, [full_event()]);
    let mut h = IngestionHandler::new(Some(calendar.clone()), TimeZone::UTC);
    assert!(h.read_ical(&cancel_text(), HandleMethod::AddUpdate));
    h.validate(&store).unwrap();
    assert!(h.handles()[0].warnings().is_empty());

    h.persist(false).unwrap().execute(&mut store).unwrap();
    assert_eq!(
        store.calls,
        [StoreCall::MarkDeleted("full@example.com".to_string())]
    );
    assert!(store.get(&calendar, "full@example.com").is_none());
}

#[test]
fn default_method_cancel_applies_to_plain_calendars() {
    let text = encode(&[full_event()], FieldSet::AllFields).unwrap().text;
    let mut h = IngestionHandler::new(Some(CalendarRef::new("home")), TimeZone::UTC);
    assert!(h.read_ical(&text, HandleMethod::Cancel));
    assert_eq!(h.handles()[0].method(), HandleMethod::Cancel);
}
