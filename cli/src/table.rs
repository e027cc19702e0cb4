// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

use std::{borrow::Cow, fmt};

use colored::{Color, Colorize};
use unicode_width::UnicodeWidthStr;

pub trait TableColumn<T> {
    fn name(&self) -> Cow<'_, str>;
    fn format<'a>(&self, data: &'a T) -> Cow<'a, str>;

    fn padding_direction(&self) -> PaddingDirection {
        PaddingDirection::Left
    }

    fn color(&self, _data: &T) -> Option<Color> {
        None
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaddingDirection {
    Left,
    Right,
}

pub trait TableStyle {
    fn fmt_table<T, C: TableColumn<T>>(
        &self,
        f: &mut fmt::Formatter<'_>,
        columns: &[C],
        data: &[T],
    ) -> fmt::Result;
}

/// Renders rows of `data`, one cell per column, in the given style.
#[derive(Debug)]
pub struct Table<'a, S, T, C> {
    style: S,
    columns: &'a [C],
    data: &'a [T],
}

impl<'a, S: TableStyle, T, C: TableColumn<T>> Table<'a, S, T, C> {
    pub fn new(style: S, columns: &'a [C], data: &'a [T]) -> Self {
        Self {
            style,
            columns,
            data,
        }
    }
}

impl<S: TableStyle, T, C: TableColumn<T>> fmt::Display for Table<'_, S, T, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.style.fmt_table(f, self.columns, self.data)
    }
}

/// Aligned plain-text columns with a header row.
#[derive(Debug, Clone)]
pub struct TableStyleBasic {
    separator: &'static str,
}

impl TableStyleBasic {
    pub const fn new() -> Self {
        Self { separator: "  " }
    }
}

impl TableStyle for TableStyleBasic {
    fn fmt_table<T, C: TableColumn<T>>(
        &self,
        f: &mut fmt::Formatter<'_>,
        columns: &[C],
        data: &[T],
    ) -> fmt::Result {
        let header: Vec<Cow<'_, str>> = columns.iter().map(|c| c.name()).collect();
        let rows: Vec<Vec<Cow<'_, str>>> = data
            .iter()
            .map(|row| columns.iter().map(|c| c.format(row)).collect())
            .collect();

        let mut widths: Vec<usize> = header.iter().map(|h| h.width()).collect();
        for row in &rows {
            for (i, cell) in row.iter().enumerate() {
                widths[i] = widths[i].max(cell.width());
            }
        }

        let last = columns.len().saturating_sub(1);
        let write_cell = |f: &mut fmt::Formatter<'_>,
                          i: usize,
                          col: &C,
                          cell: &str,
                          color: Option<Color>|
         -> fmt::Result {
            let fill = " ".repeat(widths[i].saturating_sub(cell.width()));
            let cell = match color {
                Some(color) => cell.color(color).to_string(),
                None => cell.to_string(),
            };
            match col.padding_direction() {
                // Last column does not need padding if it's left-aligned
                PaddingDirection::Left if i == last => write!(f, "{cell}")?,
                PaddingDirection::Left => write!(f, "{cell}{fill}")?,
                PaddingDirection::Right => write!(f, "{fill}{cell}")?,
            }
            if i < last {
                write!(f, "{}", self.separator)
            } else {
                writeln!(f)
            }
        };

        for (i, (col, name)) in columns.iter().zip(&header).enumerate() {
            write_cell(f, i, col, name, None)?;
        }
        for (row, cells) in data.iter().zip(&rows) {
            for (i, (col, cell)) in columns.iter().zip(cells).enumerate() {
                write_cell(f, i, col, cell, col.color(row))?;
            }
        }
        Ok(())
    }
}

/// A JSON array with one object per row, keyed by column name.
#[derive(Debug, Clone)]
pub struct TableStyleJson;

impl TableStyleJson {
    pub const fn new() -> Self {
        Self
    }
}

impl TableStyle for TableStyleJson {
    fn fmt_table<T, C: TableColumn<T>>(
        &self,
        f: &mut fmt::Formatter<'_>,
        columns: &[C],
        data: &[T],
    ) -> fmt::Result {
        let rows: Vec<serde_json::Map<String, serde_json::Value>> = data
            .iter()
            .map(|row| {
                columns
                    .iter()
                    .map(|c| {
                        let cell = serde_json::Value::from(c.format(row).into_owned());
                        (c.name().into_owned(), cell)
                    })
                    .collect::<serde_json::Map<_, _>>()
            })
            .collect();

        let json = serde_json::to_string_pretty(&rows).map_err(|_| fmt::Error)?;
        writeln!(f, "{json}")
    }
}
