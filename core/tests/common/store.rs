// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! In-memory [`EventStore`] for ingestion tests.

use std::collections::BTreeMap;
use std::convert::Infallible;
use std::io;

use tidecal_core::{CalendarRef, EventStore, MasterEvent};

/// A call received by the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreCall {
    Save(String),
    Update { uid: String, forced: bool },
    MarkDeleted(String),
}

/// Masters keyed by `(calendar, uid)`, plus a log of every mutating call.
#[derive(Debug, Default)]
pub struct MemoryStore {
    pub masters: BTreeMap<(String, String), MasterEvent>,
    pub exceptions: Vec<MasterEvent>,
    pub calls: Vec<StoreCall>,
}

impl MemoryStore {
    /// A store already holding the given masters in `calendar`.
    #[must_use]
    pub fn with(calendar: &CalendarRef, events: impl IntoIterator<Item = MasterEvent>) -> Self {
        let mut store = Self::default();
        for event in events {
            store
                .masters
                .insert((calendar.id().to_string(), event.uid().to_string()), event);
        }
        store
    }

    #[must_use]
    pub fn get(&self, calendar: &CalendarRef, uid: &str) -> Option<&MasterEvent> {
        self.masters
            .get(&(calendar.id().to_string(), uid.to_string()))
    }
}

impl EventStore for MemoryStore {
    type Error = Infallible;

    fn find_master_by_uid(
        &self,
        calendar: &CalendarRef,
        uid: &str,
    ) -> Result<Option<MasterEvent>, Infallible> {
        Ok(self.get(calendar, uid).cloned())
    }

    fn save(&mut self, calendar: &CalendarRef, event: &MasterEvent) -> Result<(), Infallible> {
        self.calls.push(StoreCall::Save(event.uid().to_string()));
        if event.is_recurrence_exception() {
            self.exceptions.push(event.clone());
        } else {
            self.masters.insert(
                (calendar.id().to_string(), event.uid().to_string()),
                event.clone(),
            );
        }
        Ok(())
    }

    fn update(
        &mut self,
        calendar: &CalendarRef,
        event: &MasterEvent,
        forced: bool,
    ) -> Result<(), Infallible> {
        self.calls.push(StoreCall::Update {
            uid: event.uid().to_string(),
            forced,
        });
        self.masters.insert(
            (calendar.id().to_string(), event.uid().to_string()),
            event.clone(),
        );
        Ok(())
    }

    fn mark_deleted(&mut self, calendar: &CalendarRef, event: &MasterEvent) -> Result<(), Infallible> {
        self.calls.push(StoreCall::MarkDeleted(event.uid().to_string()));
        self.masters
            .remove(&(calendar.id().to_string(), event.uid().to_string()));
        Ok(())
    }
}

/// A store that is unreachable: every call fails.
#[derive(Debug, Default)]
pub struct UnreachableStore;

impl UnreachableStore {
    fn error() -> io::Error {
        io::Error::new(io::ErrorKind::ConnectionRefused, "store is unreachable")
    }
}

impl EventStore for UnreachableStore {
    type Error = io::Error;

    fn find_master_by_uid(&self, _: &CalendarRef, _: &str) -> io::Result<Option<MasterEvent>> {
        Err(Self::error())
    }

    fn save(&mut self, _: &CalendarRef, _: &MasterEvent) -> io::Result<()> {
        Err(Self::error())
    }

    fn update(&mut self, _: &CalendarRef, _: &MasterEvent, _: bool) -> io::Result<()> {
        Err(Self::error())
    }

    fn mark_deleted(&mut self, _: &CalendarRef, _: &MasterEvent) -> io::Result<()> {
        Err(Self::error())
    }
}
