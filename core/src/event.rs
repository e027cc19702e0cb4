// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

use jiff::civil::Date;
use jiff::tz::TimeZone;
use jiff::{Timestamp, Zoned};
use tidecal_ical::{Action, CalendarUserType, ParticipationRole, ParticipationStatus};

use crate::datetime::{start_of_day, truncate_timestamp, truncate_zoned};
use crate::error::EventError;
use crate::recurrence::{ExceptionDates, Moment, RecurrenceRule};

/// Create a fresh unique identifier for an event.
#[must_use]
pub fn new_uid() -> String {
    uuid::Uuid::new_v4().to_string()
}

/// The organizer of an event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Organizer {
    /// Calendar address, e.g. `mailto:jane@example.com`.
    pub address: String,

    /// Display name (`CN`).
    pub common_name: Option<String>,

    /// Participation role (`ROLE`).
    pub role: Option<ParticipationRole>,
}

impl Organizer {
    /// An organizer with an address only.
    pub fn new(address: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            common_name: None,
            role: None,
        }
    }
}

/// A participant of an event.
///
/// An attendee is identified by its address, a known-user id, or the id of
/// the stored record. Only the address travels in calendar text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Attendee {
    /// Calendar address, e.g. `mailto:bob@example.com`.
    pub address: Option<String>,

    /// Identifier of a known user of the hosting application.
    pub user_id: Option<String>,

    /// Identifier of the stored attendee record.
    pub storage_id: Option<u64>,

    /// Participation status (`PARTSTAT`).
    pub status: ParticipationStatus,

    /// Participation role (`ROLE`).
    pub role: ParticipationRole,

    /// Display name (`CN`).
    pub common_name: Option<String>,

    /// Whether a reply is expected (`RSVP`).
    pub rsvp: Option<bool>,

    /// Kind of calendar user (`CUTYPE`).
    pub user_type: CalendarUserType,

    /// Further parameters, written as `NAME=VALUE;NAME=VALUE`.
    pub additional_params: Option<String>,
}

impl Attendee {
    /// An attendee with an address and default parameters.
    pub fn with_address(address: impl Into<String>) -> Self {
        Self {
            address: Some(address.into()),
            ..Self::default()
        }
    }

    /// Whether both values denote the same participant.
    ///
    /// Addresses are compared first (ignoring ASCII case), then known-user
    /// ids, then storage ids. Attendees without any identifying field are
    /// never the same, not even as themselves.
    #[must_use]
    pub fn is_same_attendee(&self, other: &Self) -> bool {
        if let (Some(a), Some(b)) = (&self.address, &other.address) {
            return a.eq_ignore_ascii_case(b);
        }
        if let (Some(a), Some(b)) = (&self.user_id, &other.user_id) {
            return a == b;
        }
        if let (Some(a), Some(b)) = (self.storage_id, other.storage_id) {
            return a == b;
        }
        false
    }
}

/// Unit of a reminder offset.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum ReminderUnit {
    /// Minutes before the start.
    #[default]
    Minutes,
    /// Hours before the start.
    Hours,
    /// Days before the start.
    Days,
    /// Weeks before the start.
    Weeks,
}

/// An alarm that fires some time before the event starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Reminder {
    /// How many units before the start.
    pub amount: u32,

    /// Unit of `amount`.
    pub unit: ReminderUnit,

    /// What the alarm does.
    pub action: Action,
}

impl Reminder {
    /// Create a reminder.
    #[must_use]
    pub const fn new(amount: u32, unit: ReminderUnit, action: Action) -> Self {
        Self {
            amount,
            unit,
            action,
        }
    }

    /// Offset before the start in seconds.
    #[must_use]
    pub fn seconds_before(&self) -> i64 {
        let unit: i64 = match self.unit {
            ReminderUnit::Minutes => 60,
            ReminderUnit::Hours => 3_600,
            ReminderUnit::Days => 86_400,
            ReminderUnit::Weeks => 7 * 86_400,
        };
        i64::from(self.amount) * unit
    }
}

/// The canonical definition of a (possibly recurring) calendar event.
///
/// Values are immutable once built; use [`MasterEvent::to_builder`] to derive
/// a changed copy.
#[derive(Debug, Clone, PartialEq)]
pub struct MasterEvent {
    uid: String,
    summary: Option<String>,
    location: Option<String>,
    description: Option<String>,
    start: Zoned,
    end: Zoned,
    all_day: bool,
    organizer: Option<Organizer>,
    attendees: Vec<Attendee>,
    reminder: Option<Reminder>,
    sequence: u32,
    dtstamp: Timestamp,
    rrule: RecurrenceRule,
    exdates: ExceptionDates,
    reference_id: Option<Moment>,
}

impl MasterEvent {
    /// Start building an event.
    #[must_use]
    pub fn builder() -> MasterEventBuilder {
        MasterEventBuilder::default()
    }

    /// Copy this event into a builder.
    #[must_use]
    pub fn to_builder(&self) -> MasterEventBuilder {
        MasterEventBuilder {
            uid: Some(self.uid.clone()),
            summary: self.summary.clone(),
            location: self.location.clone(),
            description: self.description.clone(),
            timing: Some(Timing::Zoned {
                start: self.start.clone(),
                end: Some(self.end.clone()),
                all_day: self.all_day,
            }),
            organizer: self.organizer.clone(),
            attendees: self.attendees.clone(),
            reminder: self.reminder,
            sequence: self.sequence,
            dtstamp: Some(self.dtstamp),
            rrule: self.rrule,
            exdates: self.exdates.clone(),
            reference_id: self.reference_id,
        }
    }

    /// The stable unique identifier.
    #[must_use]
    pub fn uid(&self) -> &str {
        &self.uid
    }

    /// Short summary, if any.
    #[must_use]
    pub fn summary(&self) -> Option<&str> {
        self.summary.as_deref()
    }

    /// Location, if any.
    #[must_use]
    pub fn location(&self) -> Option<&str> {
        self.location.as_deref()
    }

    /// Free-form note, if any.
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Start of the event; midnight in the event zone for all-day events.
    #[must_use]
    pub const fn start(&self) -> &Zoned {
        &self.start
    }

    /// Exclusive end of the event; midnight for all-day events.
    #[must_use]
    pub const fn end(&self) -> &Zoned {
        &self.end
    }

    /// Whether the event covers whole days.
    #[must_use]
    pub const fn is_all_day(&self) -> bool {
        self.all_day
    }

    /// The organizer, if any.
    #[must_use]
    pub const fn organizer(&self) -> Option<&Organizer> {
        self.organizer.as_ref()
    }

    /// The participants.
    #[must_use]
    pub fn attendees(&self) -> &[Attendee] {
        &self.attendees
    }

    /// The reminder, if any.
    #[must_use]
    pub const fn reminder(&self) -> Option<&Reminder> {
        self.reminder.as_ref()
    }

    /// Revision counter for recipient-visible changes.
    #[must_use]
    pub const fn sequence(&self) -> u32 {
        self.sequence
    }

    /// When this version of the event was produced.
    #[must_use]
    pub const fn dtstamp(&self) -> Timestamp {
        self.dtstamp
    }

    /// The recurrence rule.
    #[must_use]
    pub const fn rrule(&self) -> &RecurrenceRule {
        &self.rrule
    }

    /// Moments excluded from the recurrence set.
    #[must_use]
    pub const fn exdates(&self) -> &ExceptionDates {
        &self.exdates
    }

    /// Original start of the occurrence this record overrides, if it is a
    /// recurrence exception.
    #[must_use]
    pub const fn reference_id(&self) -> Option<Moment> {
        self.reference_id
    }

    /// Whether this record overrides one occurrence of another series.
    #[must_use]
    pub const fn is_recurrence_exception(&self) -> bool {
        self.reference_id.is_some()
    }

    /// The start expressed as a [`Moment`] matching the all-day mode.
    #[must_use]
    pub fn start_moment(&self) -> Moment {
        if self.all_day {
            Moment::Date(self.start.date())
        } else {
            Moment::Instant(self.start.timestamp())
        }
    }

    /// Projection for viewers that may only see when the event happens:
    /// summary, location, description, organizer, attendees and reminder
    /// are dropped.
    #[must_use]
    pub fn minimal_view(&self) -> Self {
        Self {
            summary: None,
            location: None,
            description: None,
            organizer: None,
            attendees: Vec::new(),
            reminder: None,
            ..self.clone()
        }
    }

    /// Give a recurrence exception the reminder of its series when it has
    /// none of its own. Other events are returned unchanged.
    #[must_use]
    pub fn inherit_reminder_from(&self, master: &MasterEvent) -> Self {
        let mut event = self.clone();
        if event.is_recurrence_exception() && event.reminder.is_none() {
            event.reminder = master.reminder;
        }
        event
    }

    /// Produce the next revision of `previous` with the contents of `self`:
    /// the sequence continues from the higher of both and is bumped when the
    /// change is visible to recipients, and `dtstamp` becomes `now`.
    ///
    /// # Errors
    ///
    /// Returns an error if `now` is out of range.
    pub fn revise(&self, previous: &MasterEvent, now: Timestamp) -> Result<Self, EventError> {
        let base = self.sequence.max(previous.sequence);
        let sequence = if must_increment_sequence(previous, self) {
            base.saturating_add(1)
        } else {
            base
        };
        Ok(Self {
            sequence,
            dtstamp: truncate_timestamp(now)?,
            ..self.clone()
        })
    }
}

/// Whether `candidate` differs from `previous` in a way recipients must see:
/// location, timing, exception dates or recurrence rule (including its bound).
#[must_use]
pub fn must_increment_sequence(previous: &MasterEvent, candidate: &MasterEvent) -> bool {
    previous.location != candidate.location
        || previous.start.timestamp() != candidate.start.timestamp()
        || previous.end.timestamp() != candidate.end.timestamp()
        || previous.all_day != candidate.all_day
        || previous.exdates != candidate.exdates
        || previous.rrule != candidate.rrule
}

#[derive(Debug, Clone)]
enum Timing {
    Zoned {
        start: Zoned,
        end: Option<Zoned>,
        all_day: bool,
    },
    Dates {
        start: Date,
        end: Option<Date>,
        tz: TimeZone,
    },
}

/// Builder for [`MasterEvent`], checking its invariants on [`build`](Self::build).
#[derive(Debug, Clone, Default)]
pub struct MasterEventBuilder {
    uid: Option<String>,
    summary: Option<String>,
    location: Option<String>,
    description: Option<String>,
    timing: Option<Timing>,
    organizer: Option<Organizer>,
    attendees: Vec<Attendee>,
    reminder: Option<Reminder>,
    sequence: u32,
    dtstamp: Option<Timestamp>,
    rrule: RecurrenceRule,
    exdates: ExceptionDates,
    reference_id: Option<Moment>,
}

impl MasterEventBuilder {
    /// Set the unique identifier; a fresh one is generated when unset.
    #[must_use]
    pub fn uid(mut self, uid: impl Into<String>) -> Self {
        self.uid = Some(uid.into());
        self
    }

    /// Set the summary.
    #[must_use]
    pub fn summary(mut self, summary: Option<String>) -> Self {
        self.summary = summary;
        self
    }

    /// Set the location.
    #[must_use]
    pub fn location(mut self, location: Option<String>) -> Self {
        self.location = location;
        self
    }

    /// Set the note.
    #[must_use]
    pub fn description(mut self, description: Option<String>) -> Self {
        self.description = description;
        self
    }

    /// A timed event from `start` to `end`; without an end the event takes
    /// no time.
    #[must_use]
    pub fn timed(mut self, start: Zoned, end: Option<Zoned>) -> Self {
        self.timing = Some(Timing::Zoned {
            start,
            end,
            all_day: false,
        });
        self
    }

    /// An all-day event from `start` up to the exclusive `end` date; without
    /// an end the event lasts one day. `tz` anchors the dates to instants.
    #[must_use]
    pub fn all_day(mut self, start: Date, end: Option<Date>, tz: TimeZone) -> Self {
        self.timing = Some(Timing::Dates { start, end, tz });
        self
    }

    /// Set the organizer.
    #[must_use]
    pub fn organizer(mut self, organizer: Option<Organizer>) -> Self {
        self.organizer = organizer;
        self
    }

    /// Add a participant, replacing an existing entry for the same attendee.
    #[must_use]
    pub fn attendee(mut self, attendee: Attendee) -> Self {
        match self
            .attendees
            .iter_mut()
            .find(|a| a.is_same_attendee(&attendee))
        {
            Some(existing) => *existing = attendee,
            None => self.attendees.push(attendee),
        }
        self
    }

    /// Replace the participant list.
    #[must_use]
    pub fn attendees(mut self, attendees: impl IntoIterator<Item = Attendee>) -> Self {
        self.attendees.clear();
        attendees.into_iter().fold(self, Self::attendee)
    }

    /// Set the reminder.
    #[must_use]
    pub const fn reminder(mut self, reminder: Option<Reminder>) -> Self {
        self.reminder = reminder;
        self
    }

    /// Set the revision counter.
    #[must_use]
    pub const fn sequence(mut self, sequence: u32) -> Self {
        self.sequence = sequence;
        self
    }

    /// Set when this version was produced.
    #[must_use]
    pub const fn dtstamp(mut self, dtstamp: Timestamp) -> Self {
        self.dtstamp = Some(dtstamp);
        self
    }

    /// Set the recurrence rule.
    #[must_use]
    pub const fn rrule(mut self, rrule: RecurrenceRule) -> Self {
        self.rrule = rrule;
        self
    }

    /// Exclude a moment from the recurrence set.
    #[must_use]
    pub fn exdate(mut self, moment: Moment) -> Self {
        self.exdates.insert(moment);
        self
    }

    /// Replace the excluded moments.
    #[must_use]
    pub fn exdates(mut self, exdates: ExceptionDates) -> Self {
        self.exdates = exdates;
        self
    }

    /// Mark the event as overriding the occurrence that originally started at
    /// `reference_id`.
    #[must_use]
    pub const fn reference_id(mut self, reference_id: Option<Moment>) -> Self {
        self.reference_id = reference_id;
        self
    }

    /// Check the invariants and build the event.
    ///
    /// Sub-second precision is dropped from all instants.
    ///
    /// # Errors
    ///
    /// Returns an error if the uid is empty, the start or dtstamp is missing,
    /// the end is before the start, the recurrence bound is before the start
    /// or combined with a count, or a moment does not match the all-day mode.
    pub fn build(self) -> Result<MasterEvent, EventError> {
        let uid = match self.uid {
            Some(uid) if uid.trim().is_empty() => return Err(EventError::EmptyUid),
            Some(uid) => uid,
            None => new_uid(),
        };

        let (start, end, all_day) = match self.timing {
            None => return Err(EventError::MissingStart { uid }),
            Some(Timing::Dates { start, end, tz }) => {
                let end = match end {
                    Some(end) => end,
                    None => start.tomorrow()?,
                };
                (start_of_day(start, &tz)?, start_of_day(end, &tz)?, true)
            }
            Some(Timing::Zoned {
                start,
                end,
                all_day,
            }) => {
                let start = truncate_zoned(&start)?;
                let end = match end {
                    Some(end) => truncate_zoned(&end)?,
                    None if all_day => start.tomorrow()?,
                    None => start.clone(),
                };
                (start, end, all_day)
            }
        };

        if end.timestamp() < start.timestamp() {
            return Err(EventError::EndBeforeStart { uid });
        }

        let Some(dtstamp) = self.dtstamp else {
            return Err(EventError::MissingDtstamp { uid });
        };
        let dtstamp = truncate_timestamp(dtstamp)?;

        let aligned = |moment: &Moment| moment.is_date() == all_day;
        if let Some(until) = self.rrule.until() {
            if !aligned(&until) {
                return Err(EventError::MisalignedMoment {
                    uid,
                    field: "until",
                    moment: until,
                });
            }
            let before_start = match until {
                Moment::Date(date) => date < start.date(),
                Moment::Instant(ts) => ts < start.timestamp(),
            };
            if before_start {
                return Err(EventError::UntilBeforeStart { uid, until });
            }
            if self.rrule.count().is_some() {
                return Err(EventError::UntilAndCount { uid });
            }
        }
        if let Some(moment) = self.exdates.iter().find(|m| !aligned(m)) {
            return Err(EventError::MisalignedMoment {
                uid,
                field: "exception date",
                moment: *moment,
            });
        }
        if let Some(moment) = self.reference_id.filter(|m| !aligned(m)) {
            return Err(EventError::MisalignedMoment {
                uid,
                field: "reference id",
                moment,
            });
        }

        Ok(MasterEvent {
            uid,
            summary: self.summary,
            location: self.location,
            description: self.description,
            start,
            end,
            all_day,
            organizer: self.organizer,
            attendees: self.attendees,
            reminder: self.reminder,
            sequence: self.sequence,
            dtstamp,
            rrule: self.rrule,
            exdates: self.exdates,
            reference_id: self.reference_id,
        })
    }
}
