// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! Enumerated parameter and property values defined in RFC 5545.
//!
//! All enums parse case-insensitively and display in the canonical upper
//! case form. Values outside the enumeration (`x-name` and `iana-token`) are
//! rejected; callers decide whether to fall back to a default.

use strum::{AsRefStr, Display, EnumString};

/// Participation status (RFC 5545 Section 3.2.12, `PARTSTAT`)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, AsRefStr, Display, EnumString)]
#[strum(serialize_all = "SCREAMING-KEBAB-CASE", ascii_case_insensitive)]
#[expect(missing_docs)]
pub enum ParticipationStatus {
    #[default]
    NeedsAction,
    Accepted,
    Declined,
    Tentative,
    Delegated,
    Completed,
    InProcess,
}

/// Participation role (RFC 5545 Section 3.2.16, `ROLE`)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, AsRefStr, Display, EnumString)]
#[strum(serialize_all = "SCREAMING-KEBAB-CASE", ascii_case_insensitive)]
#[expect(missing_docs)]
pub enum ParticipationRole {
    Chair,
    #[default]
    ReqParticipant,
    OptParticipant,
    NonParticipant,
}

/// Calendar user type (RFC 5545 Section 3.2.3, `CUTYPE`)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, AsRefStr, Display, EnumString)]
#[strum(serialize_all = "SCREAMING-KEBAB-CASE", ascii_case_insensitive)]
#[expect(missing_docs)]
pub enum CalendarUserType {
    #[default]
    Individual,
    Group,
    Resource,
    Room,
    Unknown,
}

/// iTIP method (RFC 5546 Section 1.4, `METHOD`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, AsRefStr, Display, EnumString)]
#[strum(serialize_all = "SCREAMING-KEBAB-CASE", ascii_case_insensitive)]
#[expect(missing_docs)]
pub enum Method {
    Publish,
    Request,
    Reply,
    Add,
    Cancel,
    Refresh,
    Counter,
    #[strum(serialize = "DECLINECOUNTER")]
    DeclineCounter,
}

/// Alarm action (RFC 5545 Section 3.8.6.1, `ACTION`)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, AsRefStr, Display, EnumString)]
#[strum(serialize_all = "SCREAMING-KEBAB-CASE", ascii_case_insensitive)]
#[expect(missing_docs)]
pub enum Action {
    Audio,
    #[default]
    Display,
    Email,
}
