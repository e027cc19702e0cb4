// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! Parse and format iCalendar (RFC 5545) text.
//!
//! This crate knows nothing about events or recurrence semantics. It turns
//! calendar text into a tree of [`Component`]s holding raw [`Property`]
//! values, offers typed parsers for the value grammars (dates, durations,
//! recurrence rules, escaped text), and renders a tree back into folded
//! content lines.

#![warn(
    trivial_casts,
    trivial_numeric_casts,
    missing_copy_implementations,
    missing_debug_implementations,
    missing_docs,
    unsafe_code,
    unstable_features,
    unused_import_braces,
    unused_qualifications,
    clippy::dbg_macro,
    clippy::indexing_slicing,
    clippy::pedantic
)]
// Allow certain clippy lints that are too restrictive for this crate
#![allow(clippy::similar_names, clippy::single_match_else, clippy::match_bool)]

pub mod formatter;
pub mod keyword;
pub mod parameter;
mod parser;
pub mod syntax;
pub mod value;

pub use crate::formatter::{FoldingStyle, FormatOptions, Formatter, format};
pub use crate::parameter::{Action, CalendarUserType, Method, ParticipationRole, ParticipationStatus};
pub use crate::parser::{ParseError, parse};
pub use crate::syntax::{Component, Parameter, ParameterValue, Property, Span};
pub use crate::value::{
    RecurrenceFrequency, ValueDateTime, ValueDuration, ValueError, ValueRecurrenceRule,
    escape_text, unescape_text,
};
