// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

use crate::syntax::{
    Component, ContentLineError, Span, TreeBuildError, build_tree, scan_content_lines, tokenize,
};

/// Parse iCalendar source into its root components.
///
/// ## Errors
///
/// Every malformed content line and every nesting problem is reported; blank
/// lines are tolerated.
///
/// ## Examples
///
/// Parsing valid iCalendar source will return the root component
///
/// ```
/// # use tidecal_ical::parse;
/// let ical_src = "\
/// BEGIN:VCALENDAR\r\n\
/// BEGIN:VEVENT\r\n\
/// SUMMARY:Test Event\r\n\
/// END:VEVENT\r\n\
/// END:VCALENDAR\r\n\
/// ";
/// let roots = parse(ical_src).unwrap();
/// assert_eq!(roots[0].children("VEVENT").count(), 1);
/// ```
///
/// Parsing invalid iCalendar source will return every error found
///
/// ```
/// # use tidecal_ical::parse;
/// let invalid_ical_src = "\
/// BEGIN:VCALENDAR\r\n\
/// BEGIN:VEVENT\r\n\
/// END:VCALENDAR\r\n\
/// END:VEVENT\r\n\
/// ";
/// let errors = parse(invalid_ical_src).unwrap_err();
/// for e in errors {
///     eprintln!("{e} ({:?})", e.span().into_range());
/// }
/// ```
pub fn parse(src: &str) -> Result<Vec<Component>, Vec<ParseError>> {
    let scanned = scan_content_lines(tokenize(src));

    let mut errors: Vec<ParseError> = scanned
        .lines
        .iter()
        .filter(|line| !line.is_blank())
        .filter_map(|line| line.error.clone())
        .map(ParseError::ContentLine)
        .collect();

    let tree = build_tree(&scanned.lines);
    errors.extend(tree.errors.into_iter().map(ParseError::Tree));

    if errors.is_empty() {
        Ok(tree.roots)
    } else {
        Err(errors)
    }
}

/// Error produced by [`parse`].
#[derive(Debug, Clone, thiserror::Error)]
pub enum ParseError {
    /// A content line could not be scanned.
    #[error(transparent)]
    ContentLine(ContentLineError),

    /// Components are not properly nested.
    #[error(transparent)]
    Tree(TreeBuildError),
}

impl ParseError {
    /// Location of the error in the source.
    #[must_use]
    pub const fn span(&self) -> Span {
        match self {
            Self::ContentLine(
                ContentLineError::MissingColon {
                    expected_at: span, ..
                }
                | ContentLineError::EmptyLine { span }
                | ContentLineError::InvalidParameter { span, .. }
                | ContentLineError::MalformedLine { span, .. },
            )
            | Self::Tree(
                TreeBuildError::UnmatchedEnd { span, .. }
                | TreeBuildError::UnmatchedBegin { span, .. }
                | TreeBuildError::MismatchedNesting { span, .. }
                | TreeBuildError::BeginEndWithParameters { span, .. },
            ) => *span,
        }
    }
}
