// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! Value type parsing module for iCalendar property values.
//!
//! This module handles the parsing and formatting of the iCalendar value
//! types used by events, as defined in RFC 5545 Section 3.3.

mod datetime;
mod duration;
mod rrule;
mod text;

pub use datetime::{ValueDateTime, parse_date_time_list};
pub use duration::ValueDuration;
pub use rrule::{RecurrenceFrequency, ValueRecurrenceRule};
pub use text::{escape_text, quote_param_value, unescape_text};

/// Error produced when a property value does not match its grammar.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValueError {
    /// Not a `DATE` value (RFC 5545 Section 3.3.4).
    #[error("invalid date value: {0}")]
    Date(String),

    /// Not a `DATE-TIME` value (RFC 5545 Section 3.3.5).
    #[error("invalid date-time value: {0}")]
    DateTime(String),

    /// Not a `DURATION` value (RFC 5545 Section 3.3.6).
    #[error("invalid duration value: {0}")]
    Duration(String),

    /// Not a `RECUR` value (RFC 5545 Section 3.3.10).
    #[error("invalid recurrence rule: {0}")]
    RecurrenceRule(String),

    /// Not an `INTEGER` value (RFC 5545 Section 3.3.8).
    #[error("invalid integer value: {0}")]
    Integer(String),
}

/// Parse a run of ASCII digits into an integer.
pub(crate) fn parse_digits<N: lexical::FromLexical>(s: &str) -> Option<N> {
    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    lexical::parse(s).ok()
}
