// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! Text values (RFC 5545 Section 3.3.11) and parameter value quoting.

use std::borrow::Cow;

/// Escape text for a `TEXT` property value.
///
/// ```txt
/// ESCAPED-CHAR = ("\\" / "\;" / "\," / "\N" / "\n")
/// ```
#[must_use]
pub fn escape_text(text: &str) -> Cow<'_, str> {
    if !text.contains(['\\', ';', ',', '\n', '\r']) {
        return Cow::Borrowed(text);
    }

    let mut result = String::with_capacity(text.len() + 8);
    for c in text.chars() {
        match c {
            '\\' => result.push_str("\\\\"),
            ';' => result.push_str("\\;"),
            ',' => result.push_str("\\,"),
            '\n' => result.push_str("\\n"),
            '\r' => {} // line breaks are written as a bare \n
            _ => result.push(c),
        }
    }
    Cow::Owned(result)
}

/// Resolve escape sequences in a `TEXT` property value.
///
/// Unknown escapes are kept as they are.
#[must_use]
pub fn unescape_text(text: &str) -> Cow<'_, str> {
    if !text.contains('\\') {
        return Cow::Borrowed(text);
    }

    let mut result = String::with_capacity(text.len());
    let mut chars = text.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            result.push(c);
            continue;
        }
        match chars.next() {
            Some('n' | 'N') => result.push('\n'),
            Some(c @ ('\\' | ';' | ',')) => result.push(c),
            Some(c) => {
                result.push('\\');
                result.push(c);
            }
            None => result.push('\\'),
        }
    }
    Cow::Owned(result)
}

/// Quote a parameter value if it contains characters that are not allowed
/// in an unquoted `paramtext`.
///
/// DQUOTE is not allowed inside a quoted value at all, so it is replaced by
/// a single quote.
#[must_use]
pub fn quote_param_value(value: &str) -> Cow<'_, str> {
    let needs_quoting = value
        .chars()
        .any(|c| c.is_ascii_control() || matches!(c, '"' | ';' | ':' | ','));

    if needs_quoting {
        let cleaned: String = value
            .chars()
            .filter(|c| !c.is_ascii_control())
            .map(|c| if c == '"' { '\'' } else { c })
            .collect();
        Cow::Owned(format!("\"{cleaned}\""))
    } else {
        Cow::Borrowed(value)
    }
}
