// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

use std::collections::HashSet;
use std::error::Error;
use std::path::PathBuf;

use clap::{ArgMatches, Command, arg};
use jiff::Timestamp;
use jiff::tz::TimeZone;
use tidecal_core::{HandleMethod, MasterEvent, Moment, decode, expand};

use crate::occurrence_formatter::{OccurrenceFormatter, OccurrenceRow};
use crate::util::{
    ArgOutputFormat, arg_file, arg_tz, get_file, get_tz, parse_datetime, read_calendar,
    resolve_tz,
};

#[derive(Debug, Clone)]
pub struct CmdExpand {
    pub file: PathBuf,
    pub from: String,
    pub to: String,
    pub tz: Option<String>,
    pub output_format: ArgOutputFormat,
}

impl CmdExpand {
    pub const NAME: &str = "expand";

    pub fn command() -> Command {
        Command::new(Self::NAME)
            .about("List the occurrences of the events in a time window")
            .arg(arg_file())
            .arg(arg!(--from <DATE> "Start of the window (inclusive)").required(true))
            .arg(arg!(--to <DATE> "End of the window (exclusive)").required(true))
            .arg(arg_tz())
            .arg(ArgOutputFormat::arg())
    }

    pub fn from(matches: &ArgMatches) -> Result<Self, Box<dyn Error>> {
        let bound = |name: &str| -> Result<String, Box<dyn Error>> {
            matches
                .get_one::<String>(name)
                .cloned()
                .ok_or_else(|| format!("--{name} is required").into())
        };

        Ok(Self {
            file: get_file(matches)?,
            from: bound("from")?,
            to: bound("to")?,
            tz: get_tz(matches),
            output_format: ArgOutputFormat::from(matches),
        })
    }

    pub async fn run(self) -> Result<(), Box<dyn Error>> {
        tracing::debug!(?self, "expanding events...");
        let zone = resolve_tz(self.tz.as_deref())?;
        let from = parse_datetime(&self.from, &zone)?;
        let to = parse_datetime(&self.to, &zone)?;
        if from > to {
            return Err("The start of the window is after its end".into());
        }

        let text = read_calendar(&self.file).await?;
        let events: Vec<MasterEvent> = decode(&text, HandleMethod::AddUpdate, &zone)?
            .into_iter()
            .map(|d| d.event)
            .collect();

        let rows = occurrences(&events, from, to, &zone);
        let formatter = OccurrenceFormatter::new().with_output_format(self.output_format);
        print!("{}", formatter.format(&rows));
        Ok(())
    }
}

/// Expand every event in the window, ordered by start. Occurrences of a
/// series that are overridden by one of its recurrence exceptions are
/// replaced by the exception.
fn occurrences<'a>(
    events: &'a [MasterEvent],
    from: Timestamp,
    to: Timestamp,
    zone: &TimeZone,
) -> Vec<OccurrenceRow<'a>> {
    let overridden: HashSet<(&str, Moment)> = events
        .iter()
        .filter_map(|e| e.reference_id().map(|r| (e.uid(), r)))
        .collect();

    let mut rows: Vec<OccurrenceRow<'a>> = events
        .iter()
        .flat_map(|event| {
            expand(event, from, to, zone)
                .into_iter()
                .map(move |occurrence| OccurrenceRow { occurrence, event })
        })
        .filter(|row| {
            row.event.is_recurrence_exception()
                || !overridden.contains(&(row.event.uid(), moment_of(row)))
        })
        .collect();

    rows.sort_by(|a, b| {
        let (sa, sb) = (a.occurrence.start(), b.occurrence.start());
        sa.timestamp()
            .cmp(&sb.timestamp())
            .then_with(|| a.occurrence.uid().cmp(b.occurrence.uid()))
    });
    rows
}

fn moment_of(row: &OccurrenceRow<'_>) -> Moment {
    let start = row.occurrence.start();
    if row.event.is_all_day() {
        Moment::Date(start.date())
    } else {
        Moment::Instant(start.timestamp())
    }
}
