// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! Calendar events with recurrence, their iCalendar representation, and the
//! ingestion of calendar text into a store.

mod codec;
mod config;
pub mod datetime;
mod error;
mod event;
mod expand;
mod ingest;
mod recurrence;

pub use crate::codec::{
    DecodedEvent, EncodeOutput, EncodeWarning, FieldSet, HandleMethod, PRODID, decode, encode,
};
pub use crate::config::{APP_NAME, Config};
pub use crate::error::{ConfigError, DecodeError, EncodeError, EventError, IngestError};
pub use crate::event::{
    Attendee, MasterEvent, MasterEventBuilder, Organizer, Reminder, ReminderUnit,
    must_increment_sequence, new_uid,
};
pub use crate::expand::{Occurrence, expand};
pub use crate::ingest::{
    CalendarRef, EventHandle, EventStore, HandleStatus, IngestionHandler, PersistAction,
    PersistPlan, ValidationError, ValidationWarning,
};
pub use crate::recurrence::{ExceptionDates, Frequency, Moment, RecurrenceRule};
pub use tidecal_ical::{
    Action, CalendarUserType, Method, ParticipationRole, ParticipationStatus,
};
