// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! Scanner for iCalendar content lines.
//!
//! Converts the token stream into content lines. Per RFC 5545, a content line
//! has the format:
//!
//! ```text
//! contentline = name *(";" param) ":" value CRLF
//! ```
//!
//! Errors are stored on the offending [`ContentLine`] rather than aborting the
//! scan, so a caller can report every bad line at once.

use std::iter::Peekable;

use crate::syntax::lexer::{SpannedToken, Token};
use crate::syntax::{Parameter, ParameterValue, Span};

/// A scanned iCalendar content line.
#[derive(Debug, Clone)]
pub struct ContentLine {
    /// Property name (e.g., "DTSTART", "SUMMARY")
    pub name: String,

    /// Property parameters (semicolon-separated)
    pub parameters: Vec<Parameter>,

    /// Property value, unfolded but still escaped
    pub value: String,

    /// Span of the entire content line (from name start to newline end)
    pub span: Span,

    /// Error information if parsing this line failed
    pub error: Option<ContentLineError>,
}

impl ContentLine {
    /// Check if this content line is valid (no errors).
    #[must_use]
    pub const fn is_valid(&self) -> bool {
        self.error.is_none()
    }

    /// Check if this line carries no content at all.
    #[must_use]
    pub const fn is_blank(&self) -> bool {
        matches!(self.error, Some(ContentLineError::EmptyLine { .. }))
    }
}

/// Errors that can occur when scanning a content line.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ContentLineError {
    /// Missing colon separator, e.g. `PROPNAME value` instead of `PROPNAME:value`.
    #[error("missing colon in property at {expected_at}")]
    MissingColon {
        /// Span where colon was expected
        expected_at: Span,
        /// Description of what was found instead
        found: Option<String>,
    },

    /// Empty content line (no name).
    #[error("empty content line at {span}")]
    EmptyLine {
        /// Span of the empty line
        span: Span,
    },

    /// Invalid parameter syntax.
    #[error("{kind} at {span}")]
    InvalidParameter {
        /// Span of the invalid parameter
        span: Span,
        /// Specific error details
        kind: ParameterErrorKind,
    },

    /// Malformed line.
    #[error("{message} at {span}")]
    MalformedLine {
        /// Span of the malformed content
        span: Span,
        /// Description of the issue
        message: String,
    },
}

/// Specific parameter parsing errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ParameterErrorKind {
    /// Missing equals sign, e.g. `TZID America/New_York`
    #[error("missing equals in parameter")]
    MissingEquals,

    /// Missing parameter value, e.g. `TZID=`
    #[error("missing parameter value")]
    MissingValue,

    /// Empty parameter name, e.g. `;=value`
    #[error("empty parameter name")]
    EmptyName,

    /// Unterminated quoted string, e.g. `PARAM="unclosed value`
    #[error("unterminated quoted string")]
    UnterminatedQuote,
}

/// Result of scanning content lines.
#[derive(Debug, Clone)]
pub struct ScanResult {
    /// All scanned content lines (including ones with errors)
    pub lines: Vec<ContentLine>,

    /// Whether any errors other than blank lines were encountered
    pub has_errors: bool,
}

/// Scan a token stream into content lines.
pub fn scan_content_lines<'src>(tokens: impl IntoIterator<Item = SpannedToken<'src>>) -> ScanResult {
    let mut tokens = tokens.into_iter().peekable();
    let mut lines = Vec::new();
    let mut has_errors = false;

    while let Some(line) = scan_one_content_line(&mut tokens) {
        if line.error.is_some() && !line.is_blank() {
            has_errors = true;
        }
        lines.push(line);
    }

    ScanResult { lines, has_errors }
}

type Tokens<'src, I> = Peekable<I>;

/// Scan a single content line, `None` at end of input.
fn scan_one_content_line<'src, I>(tokens: &mut Tokens<'src, I>) -> Option<ContentLine>
where
    I: Iterator<Item = SpannedToken<'src>>,
{
    let SpannedToken(first, line_start) = *tokens.peek()?;

    if matches!(first, Token::Newline) {
        tokens.next();
        return Some(ContentLine {
            name: String::new(),
            parameters: Vec::new(),
            value: String::new(),
            span: line_start,
            error: Some(ContentLineError::EmptyLine { span: line_start }),
        });
    }

    Some(scan_content_line_structure(tokens, line_start))
}

fn scan_content_line_structure<'src, I>(tokens: &mut Tokens<'src, I>, line_start: Span) -> ContentLine
where
    I: Iterator<Item = SpannedToken<'src>>,
{
    let name = scan_name(tokens);
    let mut line = ContentLine {
        name,
        parameters: Vec::new(),
        value: String::new(),
        span: line_start,
        error: None,
    };

    if line.name.is_empty() {
        let end = consume_until_newline(tokens).unwrap_or(line_start.end);
        line.span = Span::new(line_start.start, end);
        line.error = Some(ContentLineError::MalformedLine {
            span: line.span,
            message: "missing property name".to_string(),
        });
        return line;
    }

    while let Some(&SpannedToken(Token::Semicolon, semi_span)) = tokens.peek() {
        tokens.next();
        match scan_parameter(tokens) {
            Ok(param) => line.parameters.push(param),
            Err(kind) => {
                let end = consume_until_newline(tokens).unwrap_or(semi_span.end);
                line.span = Span::new(line_start.start, end);
                line.error = Some(ContentLineError::InvalidParameter {
                    span: semi_span,
                    kind,
                });
                return line;
            }
        }
    }

    match tokens.next() {
        Some(SpannedToken(Token::Colon, _)) => {}
        Some(SpannedToken(token, span)) => {
            let end = if matches!(token, Token::Newline) {
                span.end
            } else {
                consume_until_newline(tokens).unwrap_or(span.end)
            };
            line.span = Span::new(line_start.start, end);
            line.error = Some(ContentLineError::MissingColon {
                expected_at: span,
                found: Some(token.to_string()),
            });
            return line;
        }
        None => {
            line.error = Some(ContentLineError::MissingColon {
                expected_at: Span::new(line_start.end, line_start.end),
                found: None,
            });
            return line;
        }
    }

    let mut end = line_start.end;
    while let Some(SpannedToken(token, span)) = tokens.next() {
        end = span.end;
        match token {
            Token::Newline => break,
            Token::Error => {
                line.error = Some(ContentLineError::MalformedLine {
                    span,
                    message: "invalid character in value".to_string(),
                });
            }
            _ => line.value.push_str(token.text()),
        }
    }
    line.span = Span::new(line_start.start, end);
    line
}

/// Property and parameter names are consecutive word tokens, e.g. `PERCENT-COMPLETE`.
fn scan_name<'src, I>(tokens: &mut Tokens<'src, I>) -> String
where
    I: Iterator<Item = SpannedToken<'src>>,
{
    let mut name = String::new();
    while let Some(&SpannedToken(Token::Word(text), _)) = tokens.peek() {
        name.push_str(text);
        tokens.next();
    }
    name
}

/// Parse a single parameter: `name=value` or `name=value1,value2`
fn scan_parameter<'src, I>(tokens: &mut Tokens<'src, I>) -> Result<Parameter, ParameterErrorKind>
where
    I: Iterator<Item = SpannedToken<'src>>,
{
    let name = scan_name(tokens);
    if name.is_empty() {
        return Err(ParameterErrorKind::EmptyName);
    }

    match tokens.next() {
        Some(SpannedToken(Token::Equal, _)) => {}
        Some(_) | None => return Err(ParameterErrorKind::MissingEquals),
    }

    let mut values = Vec::new();
    loop {
        match scan_parameter_value(tokens)? {
            Some(value) => values.push(value),
            None => break,
        }

        match tokens.peek() {
            Some(&SpannedToken(Token::Comma, _)) => {
                tokens.next();
            }
            _ => break,
        }
    }

    if values.is_empty() {
        return Err(ParameterErrorKind::MissingValue);
    }
    Ok(Parameter { name, values })
}

/// Parse a single parameter value, `Ok(None)` if there is nothing to parse.
fn scan_parameter_value<'src, I>(
    tokens: &mut Tokens<'src, I>,
) -> Result<Option<ParameterValue>, ParameterErrorKind>
where
    I: Iterator<Item = SpannedToken<'src>>,
{
    let mut value = String::new();

    if let Some(&SpannedToken(Token::DQuote, _)) = tokens.peek() {
        tokens.next();
        loop {
            match tokens.next() {
                Some(SpannedToken(Token::DQuote, _)) => {
                    return Ok(Some(ParameterValue {
                        value,
                        quoted: true,
                    }));
                }
                Some(SpannedToken(Token::Newline | Token::Error, _)) | None => {
                    return Err(ParameterErrorKind::UnterminatedQuote);
                }
                Some(SpannedToken(token, _)) => value.push_str(token.text()),
            }
        }
    }

    while let Some(&SpannedToken(token, _)) = tokens.peek() {
        match token {
            Token::Semicolon | Token::Colon | Token::Comma | Token::Equal | Token::Newline => break,
            _ => {
                value.push_str(token.text());
                tokens.next();
            }
        }
    }

    if value.is_empty() {
        Ok(None)
    } else {
        Ok(Some(ParameterValue {
            value,
            quoted: false,
        }))
    }
}

/// Consume all tokens through the next newline, returning the end position.
fn consume_until_newline<'src, I>(tokens: &mut Tokens<'src, I>) -> Option<usize>
where
    I: Iterator<Item = SpannedToken<'src>>,
{
    let mut end = None;
    for SpannedToken(token, span) in tokens.by_ref() {
        end = Some(span.end);
        if matches!(token, Token::Newline) {
            break;
        }
    }
    end
}
