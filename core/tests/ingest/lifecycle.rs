// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

use jiff::civil::datetime;
use jiff::tz::TimeZone;
use tidecal_core::{
    CalendarRef, FieldSet, HandleMethod, HandleStatus, IngestError, IngestionHandler,
    PersistAction, ValidationError, encode,
};

use crate::common::{
    MemoryStore, StoreCall, UnreachableStore, at, berlin, full_event, ical, timed_event,
};

const TWO_EVENTS: [&str; 2] = [
    "UID:first
     DTSTAMP:20250101T000000Z
     DTSTART:20250102T100000Z",
    "UID:second
     DTSTAMP:20250101T000000Z
     DTSTART:20250103T100000Z",
];

#[test]
fn new_events_are_created_once() {
    let mut store = MemoryStore::default();
    let mut h = IngestionHandler::new(Some(CalendarRef::new("home")), TimeZone::UTC);
    assert!(h.read_ical(&ical(None, &TWO_EVENTS), HandleMethod::AddUpdate));
    assert_eq!(h.event_count(), 2);
    assert!(h.handles().iter().all(|x| x.status() == HandleStatus::Parsed));

    h.validate(&store).unwrap();
    assert!(h.handles().iter().all(|x| x.status() == HandleStatus::Validated));

    let plan = h.persist(false).unwrap();
    assert_eq!(plan.execute(&mut store).unwrap(), 2);
    assert!(h.handles().iter().all(|x| x.is_persisted()));

    // persisting again without reading emits nothing
    let again = h.persist(false).unwrap();
    assert!(again.is_empty());
    assert_eq!(
        store.calls,
        [
            StoreCall::Save("first".to_string()),
            StoreCall::Save("second".to_string())
        ]
    );
}

#[test]
fn revalidation_after_persist_is_safe() {
    let mut store = MemoryStore::default();
    let mut h = IngestionHandler::new(Some(CalendarRef::new("home")), TimeZone::UTC);
    assert!(h.read_ical(&ical(None, &TWO_EVENTS[..1]), HandleMethod::AddUpdate));
    h.validate(&store).unwrap();
    h.persist(false).unwrap().execute(&mut store).unwrap();

    // the stored copy now has the same dtstamp
    h.validate(&store).unwrap();
    assert_eq!(h.handles()[0].warnings().len(), 1);
    assert!(h.handles()[0].is_persisted());
    assert!(h.persist(true).unwrap().is_empty());
}

#[test]
fn one_batch_can_accept_and_reject() {
    let calendar = CalendarRef::new("home");
    let stored = full_event();
    let mut store = MemoryStore::with(&calendar, [stored.clone()]);

    let mut h = IngestionHandler::new(Some(calendar), berlin());
    // same version as stored: outdated
    let text = encode(&[stored], FieldSet::AllFields).unwrap().text;
    assert!(h.read_ical(&text, HandleMethod::AddUpdate));
    assert!(h.read_ical(&ical(None, &TWO_EVENTS[..1]), HandleMethod::AddUpdate));
    assert_eq!(h.event_count(), 2);

    h.validate(&store).unwrap();
    let plan = h.persist(false).unwrap();
    assert!(matches!(plan.actions.as_slice(), [PersistAction::Create(e)] if e.uid() == "first"));
    plan.execute(&mut store).unwrap();

    let statuses: Vec<_> = h.handles().iter().map(|x| x.status()).collect();
    assert_eq!(statuses, [HandleStatus::Rejected, HandleStatus::Accepted]);
}

#[test]
fn recurrence_exception_is_always_created() {
    let calendar = CalendarRef::new("home");
    let master = full_event();
    let mut store = MemoryStore::with(&calendar, [master.clone()]);

    let exception = master
        .to_builder()
        .rrule(tidecal_core::RecurrenceRule::none())
        .exdates(tidecal_core::ExceptionDates::new())
        .reference_id(Some(master.start_moment()))
        .summary(Some("Moved planning".to_string()))
        .build()
        .unwrap();
    let text = encode(&[exception], FieldSet::AllFields).unwrap().text;

    let mut h = IngestionHandler::new(Some(calendar), berlin());
    assert!(h.read_ical(&text, HandleMethod::AddUpdate));
    h.validate(&store).unwrap();
    assert!(h.handles()[0].warnings().is_empty());

    h.persist(false).unwrap().execute(&mut store).unwrap();
    assert_eq!(store.calls, [StoreCall::Save("full@example.com".to_string())]);
    assert_eq!(store.exceptions.len(), 1);
    assert_eq!(store.exceptions[0].summary(), Some("Moved planning"));
}

#[test]
fn missing_calendar_is_never_persisted() {
    let mut store = MemoryStore::default();
    let mut h = IngestionHandler::new(None, TimeZone::UTC);
    assert!(h.read_ical(&ical(None, &TWO_EVENTS), HandleMethod::AddUpdate));
    h.validate(&store).unwrap();
    assert!(
        h.handles()
            .iter()
            .all(|x| x.errors() == [ValidationError::CalendarNotSpecified])
    );
    h.persist(true).unwrap().execute(&mut store).unwrap();
    assert!(store.calls.is_empty());
}

#[test]
fn unparsable_text_creates_no_handles() {
    let mut h = IngestionHandler::new(Some(CalendarRef::new("home")), TimeZone::UTC);
    assert!(!h.read_ical("BEGIN:VCALENDAR\r\nBEGIN:VEVENT\r\n", HandleMethod::AddUpdate));
    assert_eq!(h.event_count(), 0);
    assert!(h.try_read_ical("no calendar here", HandleMethod::AddUpdate).is_err());
}

#[test]
fn failed_revalidation_keeps_the_stored_match() {
    let calendar = CalendarRef::new("home");
    let tz = TimeZone::UTC;
    let older = timed_event(
        "first",
        at(&tz, datetime(2025, 1, 2, 9, 0, 0, 0)),
        at(&tz, datetime(2025, 1, 2, 10, 0, 0, 0)),
    );
    let mut store = MemoryStore::with(&calendar, [older]);

    let mut h = IngestionHandler::new(Some(calendar), tz);
    assert!(h.read_ical(&ical(None, &TWO_EVENTS[..1]), HandleMethod::AddUpdate));
    h.validate(&store).unwrap();
    assert!(h.handles()[0].stored().is_some());

    let err = h.validate(&UnreachableStore).unwrap_err();
    assert!(matches!(err, IngestError::Store(_)));
    assert!(h.handles()[0].stored().is_some());
    assert!(matches!(h.persist(false), Err(IngestError::NotValidated)));

    h.validate(&store).unwrap();
    let plan = h.persist(false).unwrap();
    assert!(matches!(
        plan.actions.as_slice(),
        [PersistAction::Update { forced: false, .. }]
    ));
    plan.execute(&mut store).unwrap();
    assert_eq!(
        store.calls,
        [StoreCall::Update {
            uid: "first".to_string(),
            forced: false
        }]
    );
}

#[test]
fn calendar_without_events_validates_to_an_empty_plan() {
    let mut h = IngestionHandler::new(Some(CalendarRef::new("home")), TimeZone::UTC);
    assert!(h.read_ical(&ical(None, &[]), HandleMethod::AddUpdate));
    assert_eq!(h.event_count(), 0);

    h.validate(&MemoryStore::default()).unwrap();
    let plan = h.persist(false).unwrap();
    assert!(plan.is_empty());
    assert_eq!(plan.calendar, None);
}
