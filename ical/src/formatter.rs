// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! iCalendar (RFC 5545) formatter module.
//!
//! This module writes a [`Component`] tree as RFC 5545 content lines to any
//! `std::io::Write` implementer, folding long lines.
//!
//! # Example
//!
//! ```
//! use tidecal_ical::{Component, Property, format};
//!
//! let calendar = Component::new("VCALENDAR").with_property(Property::new("VERSION", "2.0"));
//! let ics = format(&calendar).unwrap();
//! assert_eq!(ics, "BEGIN:VCALENDAR\r\nVERSION:2.0\r\nEND:VCALENDAR\r\n");
//! ```

use std::io::{self, Write};

use crate::keyword::{KW_BEGIN, KW_END};
use crate::syntax::{Component, Parameter, Property};
use crate::value::quote_param_value;

/// Convenience function to format a component to a `String` (uses default options).
///
/// # Errors
///
/// Returns an error if writing to the internal buffer fails or if the output
/// contains invalid UTF-8 data.
pub fn format(component: &Component) -> io::Result<String> {
    FormatOptions::default().write_to_string(component)
}

/// Formatting options for the iCalendar formatter.
#[derive(Debug, Clone, Copy)]
pub struct FormatOptions {
    /// Maximum line length in octets before folding.
    /// - `None`: no line folding
    /// - `Some(n)`: fold lines longer than n octets
    ///
    /// Default: `Some(75)` for RFC 5545 compliance.
    pub folding: Option<usize>,

    /// Line folding style.
    ///
    /// Default: `FoldingStyle::Space` (CRLF + SPACE).
    pub folding_style: FoldingStyle,
}

impl Default for FormatOptions {
    fn default() -> Self {
        Self {
            folding: Some(75),
            folding_style: FoldingStyle::default(),
        }
    }
}

impl FormatOptions {
    /// Set the line folding option.
    #[must_use]
    pub const fn folding(mut self, folding: Option<usize>) -> Self {
        self.folding = folding;
        self
    }

    /// Set the line folding style.
    #[must_use]
    pub const fn folding_style(mut self, style: FoldingStyle) -> Self {
        self.folding_style = style;
        self
    }

    /// Write a component to any `Write` implementer.
    ///
    /// # Errors
    /// Returns an error if writing fails.
    pub fn write(&self, component: &Component, w: &mut impl Write) -> io::Result<()> {
        let mut formatter = Formatter::new(w, *self);
        formatter.write_component(component)
    }

    /// Write a component to a `String`.
    ///
    /// # Errors
    /// Returns an error if writing fails or if the output contains invalid UTF-8 data.
    pub fn write_to_string(&self, component: &Component) -> io::Result<String> {
        let mut buffer = Vec::new();
        self.write(component, &mut buffer)?;
        String::from_utf8(buffer).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
    }
}

/// Line folding style for RFC 5545 formatting.
///
/// RFC 5545 specifies that folded lines should start with CRLF followed by
/// a whitespace character (SPACE or TAB).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FoldingStyle {
    /// CRLF + SPACE (RFC 5545 default)
    #[default]
    Space,
    /// CRLF + TAB
    Tab,
}

impl FoldingStyle {
    const fn as_bytes(self) -> &'static [u8] {
        match self {
            Self::Space => b"\r\n ",
            Self::Tab => b"\r\n\t",
        }
    }

    /// Length of the continuation character after CRLF.
    const fn continuation_len() -> usize {
        1 // Both SPACE and TAB are 1 byte
    }
}

/// iCalendar formatter that writes to any `Write` implementer.
///
/// Bytes written through the [`Write`] impl count toward the current line and
/// are folded once the line exceeds the limit. A fold never splits a UTF-8
/// sequence or a backslash escape.
#[derive(Debug)]
pub struct Formatter<W: Write> {
    writer: W,
    options: FormatOptions,
    /// Current line length in bytes (excluding the pending CRLF).
    line_length: usize,
    /// Whether the last byte written was an unpaired backslash.
    in_escape: bool,
}

impl<W: Write> Formatter<W> {
    /// Create a new formatter with options.
    #[must_use]
    pub const fn new(writer: W, options: FormatOptions) -> Self {
        Self {
            writer,
            options,
            line_length: 0,
            in_escape: false,
        }
    }

    /// Consumes this formatter, returning the underlying writer.
    #[must_use]
    pub fn into_writer(self) -> W {
        self.writer
    }

    /// Write a component, its properties and its children.
    ///
    /// # Errors
    /// Returns an error if writing fails.
    pub fn write_component(&mut self, component: &Component) -> io::Result<()> {
        self.with_block(&component.name, |f| {
            for property in &component.properties {
                f.write_property(property)?;
            }
            for child in &component.children {
                f.write_component(child)?;
            }
            Ok(())
        })
    }

    /// Write a single content line.
    ///
    /// The value is written as is, so `TEXT` values must already be escaped.
    ///
    /// # Errors
    /// Returns an error if writing fails.
    pub fn write_property(&mut self, property: &Property) -> io::Result<()> {
        write!(self, "{}", property.name)?;
        for param in &property.parameters {
            self.write_parameter(param)?;
        }
        write!(self, ":{}", property.value)?;
        self.writeln()
    }

    fn write_parameter(&mut self, param: &Parameter) -> io::Result<()> {
        write!(self, ";{}=", param.name)?;
        for (i, v) in param.values.iter().enumerate() {
            if i > 0 {
                write!(self, ",")?;
            }
            let quoted = quote_param_value(&v.value);
            if v.quoted && !quoted.starts_with('"') {
                write!(self, "\"{quoted}\"")?;
            } else {
                write!(self, "{quoted}")?;
            }
        }
        Ok(())
    }

    fn with_block<F>(&mut self, name: &str, write_content: F) -> io::Result<()>
    where
        F: FnOnce(&mut Self) -> io::Result<()>,
    {
        write!(self, "{KW_BEGIN}:{name}")?;
        self.writeln()?;

        write_content(self)?;

        write!(self, "{KW_END}:{name}")?;
        self.writeln()
    }

    /// Write a CRLF line ending.
    fn writeln(&mut self) -> io::Result<()> {
        self.writer.write_all(b"\r\n")?;
        self.line_length = 0;
        self.in_escape = false;
        Ok(())
    }

    /// Insert line folding: CRLF + whitespace.
    fn insert_fold(&mut self) -> io::Result<()> {
        self.writer
            .write_all(self.options.folding_style.as_bytes())?;
        self.line_length = FoldingStyle::continuation_len();
        Ok(())
    }
}

impl<W: Write> Write for Formatter<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let Some(max_len) = self.options.folding else {
            // Folding disabled, write directly
            return self.writer.write(buf);
        };

        let mut remaining = buf;
        while let Some((&first, _)) = remaining.split_first() {
            let available = max_len.saturating_sub(self.line_length);
            let mut bytes_to_write = if self.in_escape {
                // complete the escape sequence started by the previous write
                1
            } else {
                find_safe_write_length(remaining, available)
            };

            if bytes_to_write == 0 {
                if self.line_length > FoldingStyle::continuation_len() {
                    self.insert_fold()?;
                    continue;
                }
                // a single character wider than a whole line
                bytes_to_write = unit_len(first, remaining);
            }

            let (chunk, rest) = remaining.split_at(bytes_to_write.min(remaining.len()));
            self.writer.write_all(chunk)?;
            self.line_length += chunk.len();

            for &byte in chunk {
                self.in_escape = byte == b'\\' && !self.in_escape;
            }
            remaining = rest;
        }

        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.writer.flush()
    }
}

/// UTF-8 continuation byte (10xxxxxx).
const fn is_continuation(byte: u8) -> bool {
    (byte & 0xC0) == 0x80
}

/// Length of the escape pair or UTF-8 sequence starting at `first`.
fn unit_len(first: u8, buf: &[u8]) -> usize {
    if first == b'\\' {
        return 2;
    }
    1 + buf
        .iter()
        .skip(1)
        .take_while(|&&b| is_continuation(b))
        .count()
}

/// Find the maximum number of bytes we can write without breaking a UTF-8
/// sequence or separating a backslash from the character it escapes.
///
/// UTF-8 encoding:
/// - 0xxxxxxx: 1 byte (ASCII)
/// - 110xxxxx: 2 bytes (starts with 0b110xxxxx)
/// - 1110xxxx: 3 bytes (starts with 0b1110xxxx)
/// - 11110xxx: 4 bytes (starts with 0b11110xxx)
/// - 10xxxxxx: continuation byte (not a start byte)
fn find_safe_write_length(buf: &[u8], max_bytes: usize) -> usize {
    if max_bytes >= buf.len() {
        return buf.len();
    }

    let mut pos = max_bytes;
    while pos > 0 && buf.get(pos).is_some_and(|&b| is_continuation(b)) {
        pos -= 1;
    }

    // An odd run of backslashes right before pos means the last one is unpaired
    let backslashes = buf
        .get(..pos)
        .map_or(0, |head| head.iter().rev().take_while(|&&b| b == b'\\').count());
    if backslashes % 2 == 1 {
        pos -= 1;
    }

    pos
}
