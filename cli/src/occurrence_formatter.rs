// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

use std::{borrow::Cow, fmt};

use colored::Color;
use tidecal_core::{MasterEvent, Occurrence};

use crate::table::{PaddingDirection, Table, TableColumn, TableStyleBasic, TableStyleJson};
use crate::util::{ArgOutputFormat, format_datetime};

/// An occurrence together with the event it was expanded from.
#[derive(Debug, Clone)]
pub struct OccurrenceRow<'a> {
    pub occurrence: Occurrence,
    pub event: &'a MasterEvent,
}

#[derive(Debug)]
pub struct OccurrenceFormatter {
    columns: Vec<OccurrenceColumn>,
    format: ArgOutputFormat,
}

impl OccurrenceFormatter {
    pub fn new() -> Self {
        Self {
            columns: vec![
                OccurrenceColumn::Kind,
                OccurrenceColumn::Start,
                OccurrenceColumn::End,
                OccurrenceColumn::Uid,
                OccurrenceColumn::Summary,
            ],
            format: ArgOutputFormat::Table,
        }
    }

    pub fn with_output_format(mut self, format: ArgOutputFormat) -> Self {
        self.format = format;
        self
    }

    pub fn format<'a>(&'a self, rows: &'a [OccurrenceRow<'a>]) -> Display<'a> {
        Display {
            rows,
            formatter: self,
        }
    }
}

#[derive(Debug)]
pub struct Display<'a> {
    rows: &'a [OccurrenceRow<'a>],
    formatter: &'a OccurrenceFormatter,
}

impl fmt::Display for Display<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let columns = &self.formatter.columns;
        match self.formatter.format {
            ArgOutputFormat::Json => write!(
                f,
                "{}",
                Table::new(TableStyleJson::new(), columns, self.rows)
            ),
            ArgOutputFormat::Table => write!(
                f,
                "{}",
                Table::new(TableStyleBasic::new(), columns, self.rows)
            ),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OccurrenceColumn {
    Kind,
    Start,
    End,
    Uid,
    Summary,
}

impl<'r> TableColumn<OccurrenceRow<'r>> for OccurrenceColumn {
    fn name(&self) -> Cow<'_, str> {
        match self {
            OccurrenceColumn::Kind => "Kind",
            OccurrenceColumn::Start => "Start",
            OccurrenceColumn::End => "End",
            OccurrenceColumn::Uid => "UID",
            OccurrenceColumn::Summary => "Summary",
        }
        .into()
    }

    fn format<'a>(&self, data: &'a OccurrenceRow<'r>) -> Cow<'a, str> {
        let all_day = data.event.is_all_day();
        match self {
            OccurrenceColumn::Kind if data.event.is_recurrence_exception() => "exception".into(),
            OccurrenceColumn::Kind if data.occurrence.is_master() => "master".into(),
            OccurrenceColumn::Kind => "derived".into(),
            OccurrenceColumn::Start => format_datetime(data.occurrence.start(), all_day).into(),
            OccurrenceColumn::End => format_datetime(data.occurrence.end(), all_day).into(),
            OccurrenceColumn::Uid => data.occurrence.uid().into(),
            OccurrenceColumn::Summary => data.event.summary().unwrap_or_default().into(),
        }
    }

    fn padding_direction(&self) -> PaddingDirection {
        PaddingDirection::Left
    }

    fn color(&self, data: &OccurrenceRow<'r>) -> Option<Color> {
        match self {
            OccurrenceColumn::Kind if data.event.is_recurrence_exception() => Some(Color::Yellow),
            OccurrenceColumn::Kind if data.occurrence.is_master() => Some(Color::Green),
            _ => None,
        }
    }
}
