// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! Syntax layer for iCalendar text as defined in RFC 5545, no value types.
//!
//! ```text
//! Source Text → Lexer → Token Stream → Scanner → Content Lines → Tree Builder → Components
//! ```

mod lexer;
mod scanner;
mod tree_builder;

use std::fmt::{self, Display};
use std::ops::Range;

pub use lexer::{SpannedToken, Token, tokenize};
pub use scanner::{ContentLine, ContentLineError, ParameterErrorKind, ScanResult, scan_content_lines};
pub use tree_builder::{
    Component, Parameter, ParameterValue, Property, TreeBuildError, TreeBuilderResult, build_tree,
};

/// A span representing a byte range in the source text
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Span {
    /// Start position of the span
    pub start: usize,
    /// End position of the span
    pub end: usize,
}

impl Span {
    /// Create a new span from start and end positions
    #[must_use]
    pub const fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Convert to a standard range
    #[must_use]
    pub const fn into_range(self) -> Range<usize> {
        self.start..self.end
    }
}

impl From<Range<usize>> for Span {
    fn from(range: Range<usize>) -> Self {
        Self {
            start: range.start,
            end: range.end,
        }
    }
}

impl Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.start, self.end)
    }
}
