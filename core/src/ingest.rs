// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! Ingestion of calendar text into a store of events.
//!
//! Each decoded event is tracked by its own [`EventHandle`] through
//! `Parsed -> Validated -> Accepted | Rejected`. The handler decides what to
//! do; the caller-supplied [`EventStore`] performs it.

use std::error::Error;
use std::fmt;

use jiff::tz::TimeZone;

use crate::codec::{DecodedEvent, HandleMethod, decode};
use crate::error::{DecodeError, IngestError};
use crate::event::MasterEvent;

/// Reference to the calendar events are ingested into.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CalendarRef(pub String);

impl CalendarRef {
    /// Create a calendar reference.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The calendar identifier.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CalendarRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Persistence collaborator used by the [`IngestionHandler`].
pub trait EventStore {
    /// Error reported by the store.
    type Error: Error + Send + Sync + 'static;

    /// The stored master event with the given uid, if any.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read.
    fn find_master_by_uid(
        &self,
        calendar: &CalendarRef,
        uid: &str,
    ) -> Result<Option<MasterEvent>, Self::Error>;

    /// Store a new event.
    ///
    /// # Errors
    ///
    /// Returns an error if the event cannot be stored.
    fn save(&mut self, calendar: &CalendarRef, event: &MasterEvent) -> Result<(), Self::Error>;

    /// Replace the stored event with the same uid; `forced` is set when the
    /// update was flagged as outdated and pushed through anyway.
    ///
    /// # Errors
    ///
    /// Returns an error if the event cannot be stored.
    fn update(
        &mut self,
        calendar: &CalendarRef,
        event: &MasterEvent,
        forced: bool,
    ) -> Result<(), Self::Error>;

    /// Mark the stored event as deleted.
    ///
    /// # Errors
    ///
    /// Returns an error if the event cannot be changed.
    fn mark_deleted(&mut self, calendar: &CalendarRef, event: &MasterEvent) -> Result<(), Self::Error>;
}

/// A problem that keeps an event from being persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, thiserror::Error)]
pub enum ValidationError {
    /// No target calendar was given to the handler.
    #[error("no calendar specified")]
    CalendarNotSpecified,
}

impl ValidationError {
    /// Stable machine-readable code.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::CalendarNotSpecified => "CALANDER_NOT_SPECIFIED",
        }
    }
}

/// A problem that lets an event be persisted only when forced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, thiserror::Error)]
pub enum ValidationWarning {
    /// The stored version is at least as recent as the incoming one.
    #[error("the stored event is newer than this update")]
    Outdated,

    /// A cancellation refers to an event that is not stored.
    #[error("the event to delete does not exist")]
    EventToDeleteNotFound,
}

impl ValidationWarning {
    /// Stable machine-readable code.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::Outdated => "WARN_OUTDATED",
            Self::EventToDeleteNotFound => "WARN_EVENT_TO_DELETE_NOT_FOUND",
        }
    }
}

/// Where a handle is in its life cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HandleStatus {
    /// Decoded, not validated yet.
    Parsed,
    /// Validated, not persisted yet.
    Validated,
    /// Emitted by a persist call.
    Accepted,
    /// Not emitted by the last persist call because of errors or unforced
    /// warnings.
    Rejected,
}

/// Tracking state of one decoded event.
#[derive(Debug, Clone)]
pub struct EventHandle {
    decoded: DecodedEvent,
    stored: Option<MasterEvent>,
    errors: Vec<ValidationError>,
    warnings: Vec<ValidationWarning>,
    status: HandleStatus,
}

impl EventHandle {
    fn new(decoded: DecodedEvent) -> Self {
        Self {
            decoded,
            stored: None,
            errors: Vec::new(),
            warnings: Vec::new(),
            status: HandleStatus::Parsed,
        }
    }

    /// What should happen to the event.
    #[must_use]
    pub const fn method(&self) -> HandleMethod {
        self.decoded.method
    }

    /// The decoded event.
    #[must_use]
    pub const fn event(&self) -> &MasterEvent {
        &self.decoded.event
    }

    /// The stored event with the same uid found during validation.
    #[must_use]
    pub const fn stored(&self) -> Option<&MasterEvent> {
        self.stored.as_ref()
    }

    /// Fatal problems found by the last validation.
    #[must_use]
    pub fn errors(&self) -> &[ValidationError] {
        &self.errors
    }

    /// Non-fatal problems found by the last validation.
    #[must_use]
    pub fn warnings(&self) -> &[ValidationWarning] {
        &self.warnings
    }

    /// Whether a persist call emitted this event.
    #[must_use]
    pub const fn is_persisted(&self) -> bool {
        matches!(self.status, HandleStatus::Accepted)
    }

    /// Current life-cycle state.
    #[must_use]
    pub const fn status(&self) -> HandleStatus {
        self.status
    }

    fn check<S: EventStore>(
        &self,
        calendar: Option<&CalendarRef>,
        store: &S,
    ) -> Result<Checked, S::Error> {
        let mut checked = Checked::default();
        let Some(calendar) = calendar else {
            checked.errors.push(ValidationError::CalendarNotSpecified);
            return Ok(checked);
        };

        let event = &self.decoded.event;
        if event.is_recurrence_exception() {
            // stored on its own, never compared with the series
            return Ok(checked);
        }

        checked.stored = store.find_master_by_uid(calendar, event.uid())?;
        match (self.decoded.method, &checked.stored) {
            (HandleMethod::Cancel, None) => {
                tracing::warn!(uid = event.uid(), "event to delete not found");
                checked.warnings.push(ValidationWarning::EventToDeleteNotFound);
            }
            (HandleMethod::AddUpdate, Some(stored))
                if event.dtstamp() <= stored.dtstamp() || event.sequence() < stored.sequence() =>
            {
                tracing::warn!(
                    uid = event.uid(),
                    incoming = %event.dtstamp(),
                    stored = %stored.dtstamp(),
                    "outdated update"
                );
                checked.warnings.push(ValidationWarning::Outdated);
            }
            _ => {}
        }
        Ok(checked)
    }

    fn apply(&mut self, checked: Checked) {
        self.stored = checked.stored;
        self.errors = checked.errors;
        self.warnings = checked.warnings;
        self.settle_validation();
    }

    fn settle_validation(&mut self) {
        if !self.is_persisted() {
            self.status = HandleStatus::Validated;
        }
    }

    fn plan(&self, force: bool) -> Option<PersistAction> {
        let event = self.decoded.event.clone();
        if event.is_recurrence_exception() {
            return Some(PersistAction::Create(event));
        }
        match (self.decoded.method, &self.stored) {
            (HandleMethod::Cancel, Some(stored)) => Some(PersistAction::Delete(stored.clone())),
            (HandleMethod::Cancel, None) => None,
            (HandleMethod::AddUpdate, Some(_)) => Some(PersistAction::Update {
                event,
                forced: force && !self.warnings.is_empty(),
            }),
            (HandleMethod::AddUpdate, None) => Some(PersistAction::Create(event)),
        }
    }
}

/// Outcome of validating one handle, applied once the whole batch is checked.
#[derive(Debug, Default)]
struct Checked {
    stored: Option<MasterEvent>,
    errors: Vec<ValidationError>,
    warnings: Vec<ValidationWarning>,
}

/// One call to make on the [`EventStore`].
#[derive(Debug, Clone, PartialEq)]
pub enum PersistAction {
    /// Store a new event.
    Create(MasterEvent),

    /// Replace the stored event.
    Update {
        /// The new version
        event: MasterEvent,
        /// Whether an outdated update is pushed through
        forced: bool,
    },

    /// Mark the stored event as deleted.
    Delete(MasterEvent),
}

impl PersistAction {
    /// The event the action applies to.
    #[must_use]
    pub const fn event(&self) -> &MasterEvent {
        match self {
            Self::Create(event) | Self::Update { event, .. } | Self::Delete(event) => event,
        }
    }
}

impl fmt::Display for PersistAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PersistAction::Create(event) => write!(f, "create {}", event.uid()),
            PersistAction::Update { event, forced: false } => write!(f, "update {}", event.uid()),
            PersistAction::Update { event, forced: true } => {
                write!(f, "update {} (forced)", event.uid())
            }
            PersistAction::Delete(event) => write!(f, "delete {}", event.uid()),
        }
    }
}

/// The store calls decided by [`IngestionHandler::persist`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PersistPlan {
    /// Target calendar; `None` only when there is nothing to do.
    pub calendar: Option<CalendarRef>,

    /// Calls in the order of the decoded events.
    pub actions: Vec<PersistAction>,
}

impl PersistPlan {
    /// Whether the plan makes no calls.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    /// Perform the calls on `store`, returning how many were made.
    ///
    /// # Errors
    ///
    /// Stops at and returns the first store error.
    pub fn execute<S: EventStore>(&self, store: &mut S) -> Result<usize, S::Error> {
        let Some(calendar) = &self.calendar else {
            return Ok(0);
        };
        for action in &self.actions {
            tracing::debug!(%calendar, %action, "persisting");
            match action {
                PersistAction::Create(event) => store.save(calendar, event)?,
                PersistAction::Update { event, forced } => store.update(calendar, event, *forced)?,
                PersistAction::Delete(event) => store.mark_deleted(calendar, event)?,
            }
        }
        Ok(self.actions.len())
    }
}

/// Reads calendar text, validates it against a store, and plans the store
/// calls for one ingestion batch.
#[derive(Debug)]
pub struct IngestionHandler {
    calendar: Option<CalendarRef>,
    zone: TimeZone,
    handles: Vec<EventHandle>,
    read: bool,
    validated: bool,
}

impl IngestionHandler {
    /// Create a handler for the given target calendar. Floating times in the
    /// text are read in `zone`.
    #[must_use]
    pub const fn new(calendar: Option<CalendarRef>, zone: TimeZone) -> Self {
        Self {
            calendar,
            zone,
            handles: Vec::new(),
            read: false,
            validated: false,
        }
    }

    /// Decode `text` and track its events; see [`try_read_ical`](Self::try_read_ical).
    ///
    /// Returns `false`, leaving the handler unchanged, if the text cannot be
    /// decoded.
    pub fn read_ical(&mut self, text: &str, default_method: HandleMethod) -> bool {
        match self.try_read_ical(text, default_method) {
            Ok(_) => true,
            Err(err) => {
                tracing::warn!(%err, "failed to read calendar text");
                false
            }
        }
    }

    /// Decode `text` and track its events, returning how many were added.
    ///
    /// # Errors
    ///
    /// Returns the decode error, leaving the handler unchanged.
    #[tracing::instrument(skip(self, text), fields(len = text.len()))]
    pub fn try_read_ical(
        &mut self,
        text: &str,
        default_method: HandleMethod,
    ) -> Result<usize, DecodeError> {
        let decoded = decode(text, default_method, &self.zone)?;
        let count = decoded.len();
        self.handles.extend(decoded.into_iter().map(EventHandle::new));
        self.read = true;
        self.validated = false;
        Ok(count)
    }

    /// Check every handle against the store and record errors and warnings.
    /// May be called again at any time; outcomes are derived afresh.
    ///
    /// Handles are only updated once every lookup succeeded. After a failed
    /// call the handler must be validated again before it can persist.
    ///
    /// # Errors
    ///
    /// Returns [`IngestError::NotParsed`] if no calendar text has been read,
    /// or the store error.
    #[tracing::instrument(skip_all, fields(calendar = ?self.calendar))]
    pub fn validate<S: EventStore>(&mut self, store: &S) -> Result<(), IngestError> {
        if !self.read {
            return Err(IngestError::NotParsed);
        }

        self.validated = false;
        let calendar = self.calendar.as_ref();
        let checked = self
            .handles
            .iter()
            .map(|handle| handle.check(calendar, store))
            .collect::<Result<Vec<_>, _>>()
            .map_err(|err| IngestError::Store(Box::new(err)))?;

        for (handle, checked) in self.handles.iter_mut().zip(checked) {
            handle.apply(checked);
        }
        self.validated = true;
        Ok(())
    }

    /// Decide the store calls for every handle not emitted before.
    ///
    /// Handles with errors are never emitted; handles with warnings only
    /// when `force` is set. Emitted handles are not emitted again.
    ///
    /// # Errors
    ///
    /// Returns [`IngestError::NotValidated`] if the handles read last have
    /// not been validated.
    #[tracing::instrument(skip(self))]
    pub fn persist(&mut self, force: bool) -> Result<PersistPlan, IngestError> {
        if !self.validated {
            return Err(IngestError::NotValidated);
        }

        let mut actions = Vec::new();
        for handle in &mut self.handles {
            if handle.is_persisted() {
                continue;
            }
            if !handle.errors.is_empty() || (!handle.warnings.is_empty() && !force) {
                tracing::debug!(uid = handle.event().uid(), "skipping event");
                handle.status = HandleStatus::Rejected;
                continue;
            }
            if let Some(action) = handle.plan(force) {
                actions.push(action);
            }
            handle.status = HandleStatus::Accepted;
        }

        Ok(PersistPlan {
            calendar: self.calendar.clone().filter(|_| !actions.is_empty()),
            actions,
        })
    }

    /// Number of tracked events.
    #[must_use]
    pub fn event_count(&self) -> usize {
        self.handles.len()
    }

    /// The tracked events, in the order they were read.
    #[must_use]
    pub fn handles(&self) -> &[EventHandle] {
        &self.handles
    }

    /// Target calendar.
    #[must_use]
    pub const fn calendar(&self) -> Option<&CalendarRef> {
        self.calendar.as_ref()
    }
}
