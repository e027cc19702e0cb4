// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

use std::num::NonZeroU32;
use std::str::FromStr;

use jiff::civil::{Date, DateTime, time};
use jiff::tz::TimeZone;
use jiff::{Timestamp, Zoned};
use tidecal_ical::keyword::{
    KW_ACTION, KW_ATTENDEE, KW_CALSCALE, KW_CN, KW_CUTYPE, KW_DESCRIPTION, KW_DTEND, KW_DTSTAMP,
    KW_DTSTART, KW_DURATION, KW_EXDATE, KW_LAST_MODIFIED, KW_LOCATION, KW_METHOD, KW_ORGANIZER,
    KW_PARTSTAT, KW_PRODID, KW_RECURRENCE_ID, KW_ROLE, KW_RRULE, KW_RSVP, KW_SEQUENCE, KW_STATUS,
    KW_STATUS_CANCELLED, KW_SUMMARY, KW_TRIGGER, KW_TZID, KW_UID, KW_VALARM, KW_VCALENDAR,
    KW_VERSION, KW_VEVENT,
};
use tidecal_ical::value::parse_date_time_list;
use tidecal_ical::{
    Action, Component, Method, Property, RecurrenceFrequency, ValueDateTime, ValueDuration,
    ValueError, ValueRecurrenceRule, parse, unescape_text,
};

use crate::codec::HandleMethod;
use crate::datetime::{from_local_datetime, resolve_zone, start_of_day};
use crate::error::{DecodeError, EventError};
use crate::event::{Attendee, MasterEvent, Organizer, Reminder, ReminderUnit};
use crate::recurrence::{ExceptionDates, Frequency, Moment, RecurrenceRule};

/// An event read from calendar text with the handling its text asks for.
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedEvent {
    /// The decoded event.
    pub event: MasterEvent,

    /// Whether the event is added/updated or cancelled.
    pub method: HandleMethod,
}

/// Decode every `VEVENT` of the first `VCALENDAR` object in `text`.
///
/// `METHOD:CANCEL` on the calendar turns the default method into a
/// cancellation; `STATUS:CANCELLED` does so for a single event. Floating
/// date-times and bare dates are anchored in `zone`.
///
/// An event without `UID`, or with a `RECURRENCE-ID`, overrides a single
/// occurrence of a series. It carries no recurrence of its own.
///
/// # Errors
///
/// Fails as a whole, without partial results, if the text is not
/// well-formed, contains no calendar, or any event lacks a required property
/// or has an invalid value.
#[tracing::instrument(skip(text, zone), fields(len = text.len()))]
pub fn decode(
    text: &str,
    default_method: HandleMethod,
    zone: &TimeZone,
) -> Result<Vec<DecodedEvent>, DecodeError> {
    let roots = parse(text).map_err(DecodeError::Parse)?;
    let calendar = roots
        .iter()
        .find(|c| c.is(KW_VCALENDAR))
        .ok_or(DecodeError::NoCalendar)?;

    let method = match calendar.property(KW_METHOD) {
        Some(p) if Method::from_str(p.value.trim()) == Ok(Method::Cancel) => HandleMethod::Cancel,
        _ => default_method,
    };

    calendar
        .children(KW_VEVENT)
        .map(|vevent| {
            let event = EventReader::new(vevent, zone).read()?;
            let cancelled = vevent
                .property(KW_STATUS)
                .is_some_and(|p| p.value.trim().eq_ignore_ascii_case(KW_STATUS_CANCELLED));
            let method = if cancelled {
                HandleMethod::Cancel
            } else {
                method
            };
            tracing::debug!(uid = event.uid(), %method, "decoded event");
            Ok(DecodedEvent { event, method })
        })
        .collect()
}

/// The start of an event as written: a bare date or a zoned time.
#[derive(Debug, Clone)]
enum When {
    Date(Date),
    At(Zoned),
}

struct EventReader<'a> {
    vevent: &'a Component,
    zone: &'a TimeZone,
    uid: String,
}

impl<'a> EventReader<'a> {
    fn new(vevent: &'a Component, zone: &'a TimeZone) -> Self {
        let uid = vevent
            .property(KW_UID)
            .map(|p| unescape_text(p.value.trim()).into_owned())
            .unwrap_or_default();
        Self { vevent, zone, uid }
    }

    fn read(self) -> Result<MasterEvent, DecodeError> {
        self.log_unsupported();

        let start = match self.vevent.property(KW_DTSTART) {
            Some(p) => self.when(p, KW_DTSTART)?,
            None => return Err(self.missing(KW_DTSTART)),
        };

        let mut builder = MasterEvent::builder()
            .summary(self.text(KW_SUMMARY))
            .location(self.text(KW_LOCATION))
            .description(self.text(KW_DESCRIPTION))
            .organizer(self.organizer())
            .attendees(self.vevent.properties(KW_ATTENDEE).map(attendee))
            .reminder(self.reminder())
            .sequence(self.sequence()?)
            .dtstamp(self.dtstamp()?);

        builder = match &start {
            When::Date(date) => builder.all_day(*date, self.end_date(*date)?, self.zone.clone()),
            When::At(zdt) => builder.timed(zdt.clone(), self.end_time(zdt)?),
        };

        let start_moment = match &start {
            When::Date(date) => Moment::Date(*date),
            When::At(zdt) => Moment::Instant(zdt.timestamp()),
        };
        let reference_id = match self.vevent.property(KW_RECURRENCE_ID) {
            Some(p) => self.moments(p, KW_RECURRENCE_ID, &start)?.into_iter().next(),
            None => None,
        };

        if self.uid.is_empty() || reference_id.is_some() {
            let reference_id = reference_id.unwrap_or(start_moment);
            tracing::debug!(uid = %self.uid, %reference_id, "recurrence exception");
            if !self.uid.is_empty() {
                builder = builder.uid(self.uid.clone());
            }
            return Ok(builder
                .reference_id(Some(reference_id))
                .rrule(RecurrenceRule::none())
                .exdates(ExceptionDates::new())
                .build()?);
        }

        let mut exdates = ExceptionDates::new();
        for p in self.vevent.properties(KW_EXDATE) {
            exdates.extend(self.moments(p, KW_EXDATE, &start)?);
        }

        Ok(builder
            .uid(self.uid.clone())
            .rrule(self.rrule(&start)?)
            .exdates(exdates)
            .build()?)
    }

    fn missing(&self, property: &'static str) -> DecodeError {
        DecodeError::MissingProperty {
            uid: self.uid.clone(),
            property,
        }
    }

    fn invalid(&self, property: &'static str, source: ValueError) -> DecodeError {
        DecodeError::InvalidValue {
            uid: self.uid.clone(),
            property,
            source,
        }
    }

    fn log_unsupported(&self) {
        const KNOWN: &[&str] = &[
            KW_UID,
            KW_DTSTAMP,
            KW_LAST_MODIFIED,
            KW_DTSTART,
            KW_DTEND,
            KW_DURATION,
            KW_SEQUENCE,
            KW_SUMMARY,
            KW_LOCATION,
            KW_DESCRIPTION,
            KW_ORGANIZER,
            KW_ATTENDEE,
            KW_RRULE,
            KW_EXDATE,
            KW_RECURRENCE_ID,
            KW_STATUS,
            // calendar level properties misplaced into an event
            KW_PRODID,
            KW_VERSION,
            KW_CALSCALE,
        ];
        for p in &self.vevent.properties {
            if !KNOWN.iter().any(|k| p.is(k)) {
                tracing::debug!(uid = %self.uid, property = %p.name, "ignoring unsupported property");
            }
        }
    }

    fn text(&self, name: &str) -> Option<String> {
        self.vevent
            .property(name)
            .map(|p| unescape_text(&p.value).into_owned())
    }

    fn sequence(&self) -> Result<u32, DecodeError> {
        match self.vevent.property(KW_SEQUENCE) {
            None => Ok(0),
            Some(p) => p
                .value
                .trim()
                .parse()
                .map_err(|_| self.invalid(KW_SEQUENCE, ValueError::Integer(p.value.clone()))),
        }
    }

    fn dtstamp(&self) -> Result<Timestamp, DecodeError> {
        let (name, p) = match self.vevent.property(KW_DTSTAMP) {
            Some(p) => (KW_DTSTAMP, p),
            None => match self.vevent.property(KW_LAST_MODIFIED) {
                Some(p) => (KW_LAST_MODIFIED, p),
                None => return Err(self.missing(KW_DTSTAMP)),
            },
        };
        match self.when(p, name)? {
            When::At(zdt) => Ok(zdt.timestamp()),
            When::Date(_) => Err(self.invalid(name, ValueError::DateTime(p.value.clone()))),
        }
    }

    fn time_zone(&self, p: &Property) -> Result<TimeZone, DecodeError> {
        match p.param(KW_TZID) {
            None => Ok(self.zone.clone()),
            Some(tzid) => resolve_zone(tzid).map_err(|source| DecodeError::UnknownTimeZone {
                tzid: tzid.to_string(),
                source,
            }),
        }
    }

    fn when(&self, p: &Property, name: &'static str) -> Result<When, DecodeError> {
        let value: ValueDateTime = p.value.parse().map_err(|e| self.invalid(name, e))?;
        self.resolve(value, &self.time_zone(p)?)
    }

    fn resolve(&self, value: ValueDateTime, tz: &TimeZone) -> Result<When, DecodeError> {
        Ok(match value {
            ValueDateTime::Date(date) => When::Date(date),
            ValueDateTime::Floating(dt) => When::At(local(tz, dt)?),
            ValueDateTime::Utc(ts) => When::At(ts.to_zoned(TimeZone::UTC)),
        })
    }

    fn end_date(&self, start: Date) -> Result<Option<Date>, DecodeError> {
        if let Some(p) = self.vevent.property(KW_DTEND) {
            return Ok(Some(match self.when(p, KW_DTEND)? {
                When::Date(date) => date,
                When::At(zdt) => zdt.date(),
            }));
        }
        if let Some(p) = self.vevent.property(KW_DURATION) {
            let duration: ValueDuration = p.value.parse().map_err(|e| self.invalid(KW_DURATION, e))?;
            let span = duration.to_span().map_err(EventError::from)?;
            return Ok(Some(start.checked_add(span).map_err(EventError::from)?));
        }
        Ok(None)
    }

    fn end_time(&self, start: &Zoned) -> Result<Option<Zoned>, DecodeError> {
        if let Some(p) = self.vevent.property(KW_DTEND) {
            return Ok(Some(match self.when(p, KW_DTEND)? {
                When::At(zdt) => zdt,
                When::Date(date) => start_of_day(date, start.time_zone()).map_err(EventError::from)?,
            }));
        }
        if let Some(p) = self.vevent.property(KW_DURATION) {
            let duration: ValueDuration = p.value.parse().map_err(|e| self.invalid(KW_DURATION, e))?;
            let span = duration.to_span().map_err(EventError::from)?;
            return Ok(Some(start.checked_add(span).map_err(EventError::from)?));
        }
        Ok(None)
    }

    /// Moments of an `EXDATE` or `RECURRENCE-ID`, aligned with the all-day
    /// mode of the event.
    fn moments(
        &self,
        p: &Property,
        name: &'static str,
        start: &When,
    ) -> Result<Vec<Moment>, DecodeError> {
        let tz = self.time_zone(p)?;
        parse_date_time_list(&p.value)
            .map_err(|e| self.invalid(name, e))?
            .into_iter()
            .map(|value| {
                Ok(match (self.resolve(value, &tz)?, start) {
                    (When::Date(date), When::Date(_)) => Moment::Date(date),
                    (When::At(zdt), When::Date(_)) => {
                        Moment::Date(zdt.with_time_zone(self.zone.clone()).date())
                    }
                    (When::At(zdt), When::At(_)) => Moment::Instant(zdt.timestamp()),
                    (When::Date(date), When::At(start)) => {
                        let zdt = local(start.time_zone(), date.to_datetime(start.time()))?;
                        Moment::Instant(zdt.timestamp())
                    }
                })
            })
            .collect()
    }

    fn rrule(&self, start: &When) -> Result<RecurrenceRule, DecodeError> {
        let Some(p) = self.vevent.property(KW_RRULE) else {
            return Ok(RecurrenceRule::none());
        };
        let value: ValueRecurrenceRule = p.value.parse().map_err(|e| self.invalid(KW_RRULE, e))?;

        let frequency = match value.freq {
            RecurrenceFrequency::Daily => Frequency::Daily,
            RecurrenceFrequency::Weekly => Frequency::Weekly,
            RecurrenceFrequency::Monthly => Frequency::Monthly,
            RecurrenceFrequency::Yearly => Frequency::Yearly,
            freq @ (RecurrenceFrequency::Secondly
            | RecurrenceFrequency::Minutely
            | RecurrenceFrequency::Hourly) => {
                tracing::warn!(uid = %self.uid, %freq, "unsupported recurrence frequency, treating event as single");
                return Ok(RecurrenceRule::none());
            }
        };
        for (name, value) in &value.other {
            tracing::warn!(uid = %self.uid, part = %name, %value, "ignoring unsupported recurrence rule part");
        }

        let mut rule = RecurrenceRule::new(frequency);
        if let Some(interval) = value.interval.and_then(NonZeroU32::new) {
            rule = rule.with_interval(interval);
        }
        if let Some(count) = value.count.and_then(NonZeroU32::new) {
            rule = rule.with_count(count);
        }
        if let Some(until) = value.until {
            let tz = match start {
                When::At(start) => start.time_zone().clone(),
                When::Date(_) => self.zone.clone(),
            };
            let until = match (self.resolve(until, &tz)?, start) {
                (When::At(zdt), When::At(_)) => Moment::Instant(zdt.timestamp()),
                (When::At(zdt), When::Date(_)) => Moment::Date(zdt.with_time_zone(tz).date()),
                (When::Date(date), When::At(start)) => {
                    let end_of_day = date.to_datetime(time(23, 59, 59, 0));
                    Moment::Instant(local(start.time_zone(), end_of_day)?.timestamp())
                }
                (When::Date(date), When::Date(_)) => Moment::Date(date),
            };
            rule = rule.with_until(until);
        }
        Ok(rule)
    }

    fn organizer(&self) -> Option<Organizer> {
        let p = self.vevent.property(KW_ORGANIZER)?;
        Some(Organizer {
            address: p.value.trim().to_string(),
            common_name: p.param(KW_CN).map(str::to_string),
            role: p.param(KW_ROLE).and_then(|v| enum_param(KW_ROLE, v)),
        })
    }

    fn reminder(&self) -> Option<Reminder> {
        let alarm = self.vevent.children(KW_VALARM).next()?;
        let action = alarm
            .property(KW_ACTION)
            .and_then(|p| enum_param::<Action>(KW_ACTION, p.value.trim()))
            .unwrap_or_default();
        let trigger = alarm.property(KW_TRIGGER)?;
        match trigger.value.parse::<ValueDuration>() {
            Ok(duration)
                if !duration.is_positive() || duration.to_signed_duration().is_zero() =>
            {
                Some(reminder(duration, action))
            }
            Ok(_) => {
                tracing::debug!(uid = %self.uid, "ignoring alarm triggered after the start");
                None
            }
            Err(err) => {
                tracing::debug!(uid = %self.uid, %err, "ignoring alarm without relative trigger");
                None
            }
        }
    }
}

fn local(tz: &TimeZone, dt: DateTime) -> Result<Zoned, DecodeError> {
    Ok(from_local_datetime(tz, dt).map_err(EventError::from)?)
}

/// Parse an enumerated parameter, logging values outside the enumeration.
fn enum_param<T: FromStr>(name: &str, value: &str) -> Option<T> {
    let parsed = value.parse().ok();
    if parsed.is_none() {
        tracing::debug!(name, value, "unknown parameter value, using the default");
    }
    parsed
}

fn attendee(p: &Property) -> Attendee {
    const KNOWN: &[&str] = &[KW_CN, KW_CUTYPE, KW_ROLE, KW_PARTSTAT, KW_RSVP];

    let address = p.value.trim();
    let additional: Vec<String> = p
        .parameters
        .iter()
        .filter(|param| !KNOWN.iter().any(|k| param.name.eq_ignore_ascii_case(k)))
        .map(|param| {
            let values: Vec<String> = param
                .values
                .iter()
                .map(|v| {
                    if v.quoted {
                        format!("\"{}\"", v.value)
                    } else {
                        v.value.clone()
                    }
                })
                .collect();
            format!("{}={}", param.name, values.join(","))
        })
        .collect();

    Attendee {
        address: (!address.is_empty()).then(|| address.to_string()),
        user_id: None,
        storage_id: None,
        status: p
            .param(KW_PARTSTAT)
            .and_then(|v| enum_param(KW_PARTSTAT, v))
            .unwrap_or_default(),
        role: p
            .param(KW_ROLE)
            .and_then(|v| enum_param(KW_ROLE, v))
            .unwrap_or_default(),
        common_name: p.param(KW_CN).map(str::to_string),
        rsvp: p.param(KW_RSVP).map(|v| v.eq_ignore_ascii_case("TRUE")),
        user_type: p
            .param(KW_CUTYPE)
            .and_then(|v| enum_param(KW_CUTYPE, v))
            .unwrap_or_default(),
        additional_params: (!additional.is_empty()).then(|| additional.join(";")),
    }
}

/// A reminder before the start, in the unit the trigger is written in.
fn reminder(trigger: ValueDuration, action: Action) -> Reminder {
    let (amount, unit) = match trigger {
        ValueDuration::Week { week, .. } => (week, ReminderUnit::Weeks),
        ValueDuration::DateTime {
            day,
            hour: 0,
            minute: 0,
            second: 0,
            ..
        } if day > 0 => (day, ReminderUnit::Days),
        ValueDuration::DateTime {
            day: 0,
            hour,
            minute: 0,
            second: 0,
            ..
        } if hour > 0 => (hour, ReminderUnit::Hours),
        _ => {
            let minutes = trigger.to_signed_duration().as_secs().unsigned_abs().div_ceil(60);
            (u32::try_from(minutes).unwrap_or(u32::MAX), ReminderUnit::Minutes)
        }
    };
    Reminder::new(amount, unit, action)
}
