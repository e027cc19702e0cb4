// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! Mapping between [`MasterEvent`](crate::MasterEvent)s and calendar text.

mod decode;
mod encode;

use std::fmt;

use tidecal_ical::Method;

pub use self::decode::{DecodedEvent, decode};
pub use self::encode::{EncodeOutput, EncodeWarning, encode};

/// Product identifier written into every encoded calendar.
pub const PRODID: &str = concat!("-//tidecal//tidecal ", env!("CARGO_PKG_VERSION"), "//EN");

/// Which properties of an event are written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldSet {
    /// Everything the model holds, for a full export.
    AllFields,

    /// The properties an iTIP message with the given method needs.
    ///
    /// [`Method::Cancel`] selects the minimal set identifying the occurrence
    /// to cancel: uid, dtstamp, start, sequence, organizer and the
    /// recurrence id. Other methods write all fields.
    ForMethod(Method),
}

impl FieldSet {
    /// The cancellation field set.
    pub const CANCEL: Self = Self::ForMethod(Method::Cancel);

    pub(crate) const fn is_minimal(self) -> bool {
        matches!(self, Self::ForMethod(Method::Cancel))
    }

    pub(crate) const fn method(self) -> Method {
        match self {
            Self::AllFields => Method::Publish,
            Self::ForMethod(method) => method,
        }
    }
}

/// What the ingestion of a decoded event should do.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum HandleMethod {
    /// Create the event, or update the stored one.
    #[default]
    AddUpdate,

    /// Remove the stored event.
    Cancel,
}

impl fmt::Display for HandleMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HandleMethod::AddUpdate => write!(f, "add/update"),
            HandleMethod::Cancel => write!(f, "cancel"),
        }
    }
}
