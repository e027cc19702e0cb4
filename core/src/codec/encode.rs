// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

use jiff::Zoned;
use jiff::tz::TimeZone;
use tidecal_ical::keyword::{
    KW_ACTION, KW_ATTENDEE, KW_CALSCALE, KW_CALSCALE_GREGORIAN, KW_CN, KW_CUTYPE, KW_DATE,
    KW_DESCRIPTION, KW_DTEND, KW_DTSTAMP, KW_DTSTART, KW_EXDATE, KW_LOCATION, KW_METHOD,
    KW_ORGANIZER, KW_PARTSTAT, KW_PRODID, KW_RECURRENCE_ID, KW_ROLE, KW_RRULE, KW_RSVP,
    KW_RSVP_FALSE, KW_RSVP_TRUE, KW_SEQUENCE, KW_SUMMARY, KW_TRIGGER, KW_TZID, KW_UID,
    KW_VALARM, KW_VALUE, KW_VCALENDAR, KW_VERSION, KW_VERSION_2_0, KW_VEVENT,
};
use tidecal_ical::{
    Component, Parameter, ParameterValue, Property, RecurrenceFrequency, ValueDateTime,
    ValueDuration, ValueRecurrenceRule, escape_text, format,
};

use crate::codec::{FieldSet, PRODID};
use crate::datetime::zone_name;
use crate::error::EncodeError;
use crate::event::{Attendee, MasterEvent, Organizer, Reminder, ReminderUnit};
use crate::recurrence::{Frequency, Moment, RecurrenceRule};

/// Calendar text together with the problems met while producing it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodeOutput {
    /// The encoded `VCALENDAR` object.
    pub text: String,

    /// Parts of events that could not be written.
    pub warnings: Vec<EncodeWarning>,
}

/// A part of an event that was left out of the encoded text.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EncodeWarning {
    /// An attendee without a calendar address cannot be addressed by
    /// recipients and is skipped.
    #[error("attendee #{index} of event {uid} has no address")]
    AttendeeWithoutAddress {
        /// Identifier of the event
        uid: String,
        /// Position of the attendee in the event's attendee list
        index: usize,
    },
}

/// Encode events into a single `VCALENDAR` object.
///
/// The output depends only on the events and the field set; encoding the
/// same input twice yields identical text.
///
/// # Errors
///
/// Returns an error if the text cannot be written. Attendees that cannot be
/// encoded are reported as warnings instead.
#[tracing::instrument(skip(events), fields(events = events.len()))]
pub fn encode(events: &[MasterEvent], fields: FieldSet) -> Result<EncodeOutput, EncodeError> {
    let mut calendar = Component::new(KW_VCALENDAR)
        .with_property(Property::new(KW_PRODID, PRODID))
        .with_property(Property::new(KW_VERSION, KW_VERSION_2_0))
        .with_property(Property::new(KW_CALSCALE, KW_CALSCALE_GREGORIAN))
        .with_property(Property::new(KW_METHOD, fields.method().as_ref()));

    let mut warnings = Vec::new();
    for event in events {
        calendar.push_child(encode_event(event, fields, &mut warnings));
    }

    for warning in &warnings {
        tracing::warn!(%warning, "skipped while encoding");
    }

    let text = format(&calendar)?;
    Ok(EncodeOutput { text, warnings })
}

fn encode_event(event: &MasterEvent, fields: FieldSet, warnings: &mut Vec<EncodeWarning>) -> Component {
    let zone = event.start().time_zone();
    let mut vevent = Component::new(KW_VEVENT)
        .with_property(Property::new(KW_UID, escape_text(event.uid())))
        .with_property(Property::new(
            KW_DTSTAMP,
            ValueDateTime::Utc(event.dtstamp()).to_string(),
        ))
        .with_property(time_property(KW_DTSTART, event.start(), event.is_all_day()));

    if !fields.is_minimal() {
        vevent.push_property(time_property(KW_DTEND, event.end(), event.is_all_day()));
    }

    vevent.push_property(Property::new(KW_SEQUENCE, event.sequence().to_string()));

    if !fields.is_minimal() {
        let texts = [
            (KW_SUMMARY, event.summary()),
            (KW_LOCATION, event.location()),
            (KW_DESCRIPTION, event.description()),
        ];
        for (name, text) in texts {
            if let Some(text) = text {
                vevent.push_property(Property::new(name, escape_text(text)));
            }
        }
    }

    if let Some(organizer) = event.organizer() {
        vevent.push_property(organizer_property(organizer));
    }

    if !fields.is_minimal() {
        for (index, attendee) in event.attendees().iter().enumerate() {
            match attendee_property(attendee) {
                Some(property) => vevent.push_property(property),
                None => warnings.push(EncodeWarning::AttendeeWithoutAddress {
                    uid: event.uid().to_string(),
                    index,
                }),
            }
        }

        if let Some(rrule) = rrule_property(event.rrule()) {
            vevent.push_property(rrule);
        }

        if !event.exdates().is_empty() {
            let moments: Vec<_> = event.exdates().iter().copied().collect();
            vevent.push_property(moments_property(KW_EXDATE, &moments, zone));
        }
    }

    if let Some(reference_id) = event.reference_id() {
        vevent.push_property(moments_property(KW_RECURRENCE_ID, &[reference_id], zone));
    }

    if let Some(reminder) = event.reminder().filter(|_| !fields.is_minimal()) {
        vevent.push_child(alarm(reminder));
    }

    vevent
}

/// `DTSTART`/`DTEND`: a bare date, a local time with `TZID`, or UTC when the
/// zone has no IANA name.
fn time_property(name: &str, zdt: &Zoned, all_day: bool) -> Property {
    if all_day {
        return Property::new(name, ValueDateTime::Date(zdt.date()).to_string())
            .with_param(KW_VALUE, KW_DATE);
    }
    match zone_name(zdt.time_zone()) {
        Some(tzid) => Property::new(name, ValueDateTime::Floating(zdt.datetime()).to_string())
            .with_param(KW_TZID, tzid),
        None => Property::new(name, ValueDateTime::Utc(zdt.timestamp()).to_string()),
    }
}

/// A list of moments sharing the parameters of the event's start.
fn moments_property(name: &str, moments: &[Moment], zone: &TimeZone) -> Property {
    let tzid = zone_name(zone);
    let all_dates = moments.iter().all(Moment::is_date);
    let value = moments
        .iter()
        .map(|moment| match (moment, tzid) {
            (Moment::Date(date), _) => ValueDateTime::Date(*date),
            (Moment::Instant(ts), Some(_)) => ValueDateTime::Floating(zone.to_datetime(*ts)),
            (Moment::Instant(ts), None) => ValueDateTime::Utc(*ts),
        })
        .map(|value| value.to_string())
        .collect::<Vec<_>>()
        .join(",");

    let property = Property::new(name, value);
    match tzid {
        _ if all_dates => property.with_param(KW_VALUE, KW_DATE),
        Some(tzid) => property.with_param(KW_TZID, tzid),
        None => property,
    }
}

fn organizer_property(organizer: &Organizer) -> Property {
    let mut property = Property::new(KW_ORGANIZER, organizer.address.as_str());
    if let Some(cn) = &organizer.common_name {
        property = property.with_param(KW_CN, cn.as_str());
    }
    if let Some(role) = organizer.role {
        property = property.with_param(KW_ROLE, role.as_ref());
    }
    property
}

fn attendee_property(attendee: &Attendee) -> Option<Property> {
    let address = attendee.address.as_deref().filter(|a| !a.trim().is_empty())?;
    let mut property = Property::new(KW_ATTENDEE, address)
        .with_param(KW_CUTYPE, attendee.user_type.as_ref())
        .with_param(KW_ROLE, attendee.role.as_ref())
        .with_param(KW_PARTSTAT, attendee.status.as_ref());
    if let Some(rsvp) = attendee.rsvp {
        property = property.with_param(KW_RSVP, if rsvp { KW_RSVP_TRUE } else { KW_RSVP_FALSE });
    }
    if let Some(cn) = &attendee.common_name {
        property = property.with_param(KW_CN, cn.as_str());
    }
    if let Some(params) = &attendee.additional_params {
        property.parameters.extend(additional_params(params));
    }
    Some(property)
}

/// Split `NAME=VALUE;NAME="VALUE"` into parameters. Pieces without a name
/// are dropped.
fn additional_params(params: &str) -> impl Iterator<Item = Parameter> + '_ {
    split_unquoted(params, ';').filter_map(|piece| {
        let (name, value) = piece.split_once('=')?;
        let name = name.trim();
        if name.is_empty() {
            return None;
        }
        let value = value.trim();
        let (value, quoted) = match value.strip_prefix('"').and_then(|v| v.strip_suffix('"')) {
            Some(inner) => (inner, true),
            None => (value, false),
        };
        Some(Parameter {
            name: name.to_string(),
            values: vec![ParameterValue {
                value: value.to_string(),
                quoted,
            }],
        })
    })
}

/// Split on `sep` outside double quotes.
fn split_unquoted(s: &str, sep: char) -> impl Iterator<Item = &str> {
    let mut quoted = false;
    s.split(move |c: char| {
        if c == '"' {
            quoted = !quoted;
        }
        c == sep && !quoted
    })
}

fn rrule_property(rule: &RecurrenceRule) -> Option<Property> {
    let freq = match rule.frequency() {
        Frequency::None => return None,
        Frequency::Daily => RecurrenceFrequency::Daily,
        Frequency::Weekly => RecurrenceFrequency::Weekly,
        Frequency::Monthly => RecurrenceFrequency::Monthly,
        Frequency::Yearly => RecurrenceFrequency::Yearly,
    };

    let mut value = ValueRecurrenceRule::new(freq);
    value.interval = Some(rule.interval().get()).filter(|&i| i > 1);
    value.count = rule.count().map(|c| c.get());
    value.until = rule.until().map(|until| match until {
        Moment::Date(date) => ValueDateTime::Date(date),
        Moment::Instant(ts) => ValueDateTime::Utc(ts),
    });
    Some(Property::new(KW_RRULE, value.to_string()))
}

fn alarm(reminder: &Reminder) -> Component {
    let amount = reminder.amount;
    let trigger = match reminder.unit {
        ReminderUnit::Weeks => ValueDuration::Week {
            positive: false,
            week: amount,
        },
        unit => {
            let (mut day, mut hour, mut minute) = (0, 0, 0);
            match unit {
                ReminderUnit::Days => day = amount,
                ReminderUnit::Hours => hour = amount,
                _ => minute = amount,
            }
            ValueDuration::DateTime {
                positive: false,
                day,
                hour,
                minute,
                second: 0,
            }
        }
    };

    Component::new(KW_VALARM)
        .with_property(Property::new(KW_ACTION, reminder.action.as_ref()))
        .with_property(Property::new(KW_TRIGGER, trigger.to_string()))
        .with_property(Property::new(KW_DESCRIPTION, "Reminder"))
}
