// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

use jiff::tz::TimeZone;
use tidecal_core::{
    CalendarRef, FieldSet, HandleMethod, IngestionHandler, PersistAction, ValidationWarning,
    encode,
};

use crate::common::{MemoryStore, StoreCall, full_event, utc};

fn handler() -> IngestionHandler {
    IngestionHandler::new(Some(CalendarRef::new("home")), TimeZone::UTC)
}

fn text_with_dtstamp(stamp: &str) -> String {
    let event = full_event()
        .to_builder()
        .dtstamp(utc(stamp))
        .build()
        .unwrap();
    encode(&[event], FieldSet::AllFields).unwrap().text
}

#[test]
fn update_stamped_at_the_stored_time_is_outdated() {
    let calendar = CalendarRef::new("home");
    let mut store = MemoryStore::with(&calendar, [full_event()]);

    let mut h = handler();
    assert!(h.read_ical(&text_with_dtstamp("2025-02-27T08:15:00Z"), HandleMethod::AddUpdate));
    h.validate(&store).unwrap();
    assert_eq!(h.handles()[0].warnings(), [ValidationWarning::Outdated]);
    assert!(h.handles()[0].errors().is_empty());

    let plan = h.persist(false).unwrap();
    assert!(plan.is_empty());
    plan.execute(&mut store).unwrap();
    assert!(store.calls.is_empty());
}

#[test]
fn earlier_update_is_outdated_and_forcible() {
    let calendar = CalendarRef::new("home");
    let mut store = MemoryStore::with(&calendar, [full_event()]);

    let mut h = handler();
    assert!(h.read_ical(&text_with_dtstamp("2025-01-01T00:00:00Z"), HandleMethod::AddUpdate));
    h.validate(&store).unwrap();
    assert_eq!(h.handles()[0].warnings(), [ValidationWarning::Outdated]);

    let plan = h.persist(true).unwrap();
    assert!(matches!(
        plan.actions.as_slice(),
        [PersistAction::Update { forced: true, .. }]
    ));
    plan.execute(&mut store).unwrap();
    assert_eq!(
        store.calls,
        [StoreCall::Update {
            uid: "full@example.com".to_string(),
            forced: true
        }]
    );
}

#[test]
fn newer_update_is_not_flagged() {
    let calendar = CalendarRef::new("home");
    let mut store = MemoryStore::with(&calendar, [full_event()]);

    let mut h = handler();
    assert!(h.read_ical(&text_with_dtstamp("2025-03-01T00:00:00Z"), HandleMethod::AddUpdate));
    h.validate(&store).unwrap();
    assert!(h.handles()[0].warnings().is_empty());

    let plan = h.persist(false).unwrap();
    plan.execute(&mut store).unwrap();
    assert_eq!(
        store.calls,
        [StoreCall::Update {
            uid: "full@example.com".to_string(),
            forced: false
        }]
    );
    let stored = store.get(&calendar, "full@example.com").unwrap();
    assert_eq!(stored.dtstamp(), utc("2025-03-01T00:00:00Z"));
}
