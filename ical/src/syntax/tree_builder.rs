// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! Tree builder for constructing component hierarchy from content lines.
//!
//! The builder keeps a stack of open components:
//! 1. On BEGIN:X, push a new component onto the stack
//! 2. On property, add to the current component (top of stack)
//! 3. On END:X, pop from stack and add to parent component
//!
//! The same [`Component`] type is used by the formatter, so a tree built here
//! can be written back out unchanged.

use crate::keyword::{KW_BEGIN, KW_END};
use crate::syntax::Span;
use crate::syntax::scanner::ContentLine;

/// An iCalendar component (e.g., VCALENDAR, VEVENT, VALARM)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Component {
    /// Component name, original casing preserved
    pub name: String,
    /// Properties in original order
    pub properties: Vec<Property>,
    /// Nested child components
    pub children: Vec<Component>,
    /// Span of the entire component (from BEGIN to END), default when built in code
    pub span: Span,
}

impl Component {
    /// Create an empty component.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Append a property and return the component.
    #[must_use]
    pub fn with_property(mut self, property: Property) -> Self {
        self.properties.push(property);
        self
    }

    /// Append a property.
    pub fn push_property(&mut self, property: Property) {
        self.properties.push(property);
    }

    /// Append a nested component.
    pub fn push_child(&mut self, child: Component) {
        self.children.push(child);
    }

    /// Whether the component has the given name, ignoring case.
    #[must_use]
    pub fn is(&self, name: &str) -> bool {
        self.name.eq_ignore_ascii_case(name)
    }

    /// First property with the given name.
    #[must_use]
    pub fn property(&self, name: &str) -> Option<&Property> {
        self.properties.iter().find(|p| p.is(name))
    }

    /// All properties with the given name, in source order.
    pub fn properties<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Property> + 'a {
        self.properties.iter().filter(move |p| p.is(name))
    }

    /// All child components with the given name.
    pub fn children<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Component> + 'a {
        self.children.iter().filter(move |c| c.is(name))
    }
}

/// An iCalendar property (name, optional parameters, and value)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Property {
    /// Property name (case-insensitive, original casing preserved)
    pub name: String,
    /// Property parameters (allow duplicates & multi-values)
    pub parameters: Vec<Parameter>,
    /// Property value as it appears on the wire, still escaped
    pub value: String,
}

impl Property {
    /// Create a property without parameters.
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            parameters: Vec::new(),
            value: value.into(),
        }
    }

    /// Append a single-valued parameter.
    #[must_use]
    pub fn with_param(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.parameters.push(Parameter {
            name: name.into(),
            values: vec![ParameterValue {
                value: value.into(),
                quoted: false,
            }],
        });
        self
    }

    /// Whether the property has the given name, ignoring case.
    #[must_use]
    pub fn is(&self, name: &str) -> bool {
        self.name.eq_ignore_ascii_case(name)
    }

    /// First value of the first parameter with the given name.
    #[must_use]
    pub fn param(&self, name: &str) -> Option<&str> {
        self.parameters
            .iter()
            .find(|p| p.name.eq_ignore_ascii_case(name))
            .and_then(|p| p.values.first())
            .map(|v| v.value.as_str())
    }

    /// All values of every parameter with the given name.
    pub fn param_values<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.parameters
            .iter()
            .filter(move |p| p.name.eq_ignore_ascii_case(name))
            .flat_map(|p| p.values.iter().map(|v| v.value.as_str()))
    }
}

/// An iCalendar parameter (e.g., `TZID=America/New_York`)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Parameter {
    /// Parameter name (e.g., "TZID", "VALUE", "CN", "ROLE", "PARTSTAT")
    pub name: String,
    /// Parameter values split by commas
    pub values: Vec<ParameterValue>,
}

/// A single parameter value with optional quoting
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParameterValue {
    /// The parameter value, without surrounding quotes
    pub value: String,
    /// Whether the value was quoted in the source
    pub quoted: bool,
}

/// Build a component tree from scanned content lines.
///
/// Lines carrying a scan error are skipped, as are properties outside of any
/// component.
#[must_use]
pub fn build_tree(lines: &[ContentLine]) -> TreeBuilderResult {
    let mut stack: Vec<Component> = Vec::new();
    let mut roots: Vec<Component> = Vec::new();
    let mut errors: Vec<TreeBuildError> = Vec::new();

    for line in lines.iter().filter(|l| l.is_valid()) {
        let is_begin = line.name.eq_ignore_ascii_case(KW_BEGIN);
        let is_end = line.name.eq_ignore_ascii_case(KW_END);

        if (is_begin || is_end) && !line.parameters.is_empty() {
            errors.push(TreeBuildError::BeginEndWithParameters {
                name: line.name.clone(),
                span: line.span,
            });
        }

        if is_begin {
            stack.push(Component {
                name: line.value.clone(),
                properties: Vec::new(),
                children: Vec::new(),
                span: line.span,
            });
        } else if is_end {
            let Some(mut component) = stack.pop() else {
                errors.push(TreeBuildError::UnmatchedEnd {
                    name: line.value.clone(),
                    span: line.span,
                });
                continue;
            };

            if !component.is(&line.value) {
                errors.push(TreeBuildError::MismatchedNesting {
                    expected: component.name.clone(),
                    found: line.value.clone(),
                    span: line.span,
                });
            }

            component.span = Span::new(component.span.start, line.span.end);
            match stack.last_mut() {
                Some(parent) => parent.children.push(component),
                None => roots.push(component),
            }
        } else if let Some(current) = stack.last_mut() {
            current.properties.push(Property {
                name: line.name.clone(),
                parameters: line.parameters.clone(),
                value: line.value.clone(),
            });
        }
    }

    // Any remaining components on stack are unmatched BEGINs
    for component in stack {
        errors.push(TreeBuildError::UnmatchedBegin {
            name: component.name,
            span: component.span,
        });
    }

    TreeBuilderResult { roots, errors }
}

/// Errors that can occur during tree building.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TreeBuildError {
    /// Unmatched END (no corresponding BEGIN)
    #[error("unmatched END:{name} at {span} (no corresponding BEGIN)")]
    UnmatchedEnd {
        /// Component name that was being closed
        name: String,
        /// Span of the END line
        span: Span,
    },

    /// Unmatched BEGIN (component not closed)
    #[error("unmatched BEGIN:{name} at {span} (component not closed)")]
    UnmatchedBegin {
        /// Component name that was not closed
        name: String,
        /// Span of the BEGIN line
        span: Span,
    },

    /// Mismatched BEGIN/END names
    #[error("mismatched nesting at {span}: expected END:{expected}, found END:{found}")]
    MismatchedNesting {
        /// Expected component name
        expected: String,
        /// Actual component name found
        found: String,
        /// Span of the END line
        span: Span,
    },

    /// BEGIN or END line with parameters (not allowed per RFC 5545)
    #[error("{name} line with parameters at {span} (not allowed per RFC 5545)")]
    BeginEndWithParameters {
        /// The line name, BEGIN or END
        name: String,
        /// Span of the line
        span: Span,
    },
}

/// Result of building a tree.
#[derive(Debug, Clone)]
pub struct TreeBuilderResult {
    /// The root components (typically one VCALENDAR)
    pub roots: Vec<Component>,
    /// Errors encountered during tree building
    pub errors: Vec<TreeBuildError>,
}
