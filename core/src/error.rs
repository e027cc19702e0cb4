// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

use std::error::Error;
use std::io;

use tidecal_ical::{ParseError, ValueError};

use crate::recurrence::Moment;

/// A [`crate::MasterEvent`] could not be built because an invariant does not hold.
#[derive(Debug, thiserror::Error)]
pub enum EventError {
    /// The event has no start.
    #[error("event {uid} has no start")]
    MissingStart {
        /// Identifier of the event
        uid: String,
    },

    /// The event has no `dtstamp`.
    #[error("event {uid} has no dtstamp")]
    MissingDtstamp {
        /// Identifier of the event
        uid: String,
    },

    /// The unique identifier is empty.
    #[error("event uid must not be empty")]
    EmptyUid,

    /// `end` is before `start`.
    #[error("event {uid} ends before it starts")]
    EndBeforeStart {
        /// Identifier of the event
        uid: String,
    },

    /// The recurrence bound is before the first occurrence.
    #[error("event {uid} has a recurrence bound {until} before its start")]
    UntilBeforeStart {
        /// Identifier of the event
        uid: String,
        /// The offending bound
        until: Moment,
    },

    /// A rule sets both `until` and `count`.
    #[error("event {uid} has both a recurrence bound and a count")]
    UntilAndCount {
        /// Identifier of the event
        uid: String,
    },

    /// A moment is a date on a timed event or an instant on an all-day event.
    #[error("{field} {moment} of event {uid} does not match its all-day mode")]
    MisalignedMoment {
        /// Identifier of the event
        uid: String,
        /// Which field holds the moment
        field: &'static str,
        /// The offending moment
        moment: Moment,
    },

    /// Date/time arithmetic went out of range.
    #[error("date/time out of range: {0}")]
    Time(#[from] jiff::Error),
}

/// Calendar text could not be turned into events.
#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    /// The text is not well-formed iCalendar.
    #[error("malformed calendar text: {}", first_message(.0))]
    Parse(Vec<ParseError>),

    /// There is no `VCALENDAR` object.
    #[error("no VCALENDAR object found")]
    NoCalendar,

    /// A required property is missing from an event.
    #[error("event {uid} is missing required property {property}")]
    MissingProperty {
        /// Identifier of the event, empty when unknown
        uid: String,
        /// Name of the property
        property: &'static str,
    },

    /// A property value does not match its grammar.
    #[error("invalid {property} in event {uid}: {source}")]
    InvalidValue {
        /// Identifier of the event, empty when unknown
        uid: String,
        /// Name of the property
        property: &'static str,
        /// Underlying value error
        source: ValueError,
    },

    /// A `TZID` that is not in the time zone database.
    #[error("unknown time zone {tzid}")]
    UnknownTimeZone {
        /// The zone identifier
        tzid: String,
        /// Lookup error
        source: jiff::Error,
    },

    /// The decoded fields violate an event invariant.
    #[error(transparent)]
    Event(#[from] EventError),
}

fn first_message(errors: &[ParseError]) -> String {
    match errors {
        [] => String::new(),
        [only] => only.to_string(),
        [first, rest @ ..] => format!("{first} (and {} more)", rest.len()),
    }
}

/// Encoding failed as a whole.
#[derive(Debug, thiserror::Error)]
pub enum EncodeError {
    /// Writing the calendar text failed.
    #[error("failed to write calendar text: {0}")]
    Format(#[from] io::Error),
}

/// The ingestion handler was misused or its collaborator failed.
#[derive(Debug, thiserror::Error)]
pub enum IngestError {
    /// `validate` was called before any calendar text was read.
    #[error("no calendar text has been read")]
    NotParsed,

    /// `persist` was called before `validate`.
    #[error("events must be validated before they are persisted")]
    NotValidated,

    /// The calendar text could not be decoded.
    #[error(transparent)]
    Decode(#[from] DecodeError),

    /// The persistence collaborator failed.
    #[error("event store failed: {0}")]
    Store(#[source] Box<dyn Error + Send + Sync>),
}

/// Configuration could not be normalized or applied.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// A path could not be expanded.
    #[error("failed to expand path {path}: {reason}")]
    Path {
        /// The path as configured
        path: String,
        /// Why expansion failed
        reason: &'static str,
    },

    /// The configured time zone is unknown.
    #[error("unknown time zone {name}")]
    UnknownTimeZone {
        /// The configured zone name
        name: String,
        /// Lookup error
        source: jiff::Error,
    },
}
