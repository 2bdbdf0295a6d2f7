//! Quote-aware lexical scanning primitives.
//!
//! Everything here operates on raw source text without a real parser:
//! a depth counter plus an in-string state that records which quote
//! character opened the current literal. Delimiters inside string literals
//! never count toward nesting depth, which is what makes block location
//! survive descriptions containing unbalanced `{` or `}`.
//!
//! Quote rules follow the host language: `'` and `"` literals end at an
//! unescaped closing quote or at a newline; backtick templates span lines.
//! Template `${…}` expressions are not parsed; a template ends at the next
//! unescaped backtick.
//!
//! Outside strings, `//` line comments and `/* … */` block comments are
//! skipped whole, so a quote or delimiter inside a comment never changes
//! scanner state.

use std::ops::Range;

/// Find the matching closing delimiter for the opener at `open_index`.
///
/// `text[open_index]` must be one of `{`, `(` or `[`. Scans forward from
/// `open_index + 1` counting only that delimiter pair, skipping string
/// literals. Returns the byte index of the close at depth 0, or `None`
/// when the text ends first.
pub fn find_matching_close(text: &str, open_index: usize) -> Option<usize> {
    let bytes = text.as_bytes();
    let open = *bytes.get(open_index)?;
    let close = match open {
        b'{' => b'}',
        b'(' => b')',
        b'[' => b']',
        _ => return None,
    };

    let mut depth = 1usize;
    let mut in_string: Option<u8> = None;
    let mut escaped = false;
    let mut i = open_index + 1;

    while i < bytes.len() {
        let b = bytes[i];
        match in_string {
            Some(quote) => {
                if escaped {
                    escaped = false;
                } else if b == b'\\' {
                    escaped = true;
                } else if b == quote {
                    in_string = None;
                } else if b == b'\n' && quote != b'`' {
                    // '…' and "…" cannot span lines; treat as closed so one
                    // unterminated quote cannot swallow the rest of the file.
                    in_string = None;
                }
            }
            None => {
                if let Some(end) = comment_end(text, i) {
                    i = end;
                    continue;
                }
                if b == b'\'' || b == b'"' || b == b'`' {
                    in_string = Some(b);
                } else if b == open {
                    depth += 1;
                } else if b == close {
                    depth -= 1;
                    if depth == 0 {
                        return Some(i);
                    }
                }
            }
        }
        i += 1;
    }
    None
}

/// Read the string literal whose opening quote sits at `quote_index`.
///
/// Returns the byte index of the closing quote and the unescaped contents:
/// `\n`, `\t` and `\r` decode to control characters; for any other escaped
/// character the backslash drops. `None` when the literal is unterminated
/// (for `'` and `"`, a newline counts as unterminated).
pub fn read_string_literal(text: &str, quote_index: usize) -> Option<(usize, String)> {
    let mut chars = text[quote_index..].char_indices();
    let (_, quote) = chars.next()?;
    if !matches!(quote, '\'' | '"' | '`') {
        return None;
    }

    let mut out = String::new();
    let mut escaped = false;
    for (off, c) in chars {
        if escaped {
            out.push(match c {
                'n' => '\n',
                't' => '\t',
                'r' => '\r',
                other => other,
            });
            escaped = false;
        } else if c == '\\' {
            escaped = true;
        } else if c == quote {
            return Some((quote_index + off, out));
        } else if c == '\n' && quote != '`' {
            return None;
        } else {
            out.push(c);
        }
    }
    None
}

/// Advance past ASCII whitespace.
pub fn skip_ws(text: &str, mut i: usize) -> usize {
    let bytes = text.as_bytes();
    while i < bytes.len() && bytes[i].is_ascii_whitespace() {
        i += 1;
    }
    i
}

/// When a comment starts at `i`, the byte index scanning should resume at:
/// the terminating newline of a `//` comment (the newline itself is left to
/// be scanned), or just past the `*/` of a block comment (text end when
/// unterminated). `None` when `text[i..]` does not start a comment.
pub fn comment_end(text: &str, i: usize) -> Option<usize> {
    let bytes = text.as_bytes();
    if bytes.get(i) != Some(&b'/') {
        return None;
    }
    match bytes.get(i + 1) {
        Some(&b'/') => {
            let mut j = i + 2;
            while j < bytes.len() && bytes[j] != b'\n' {
                j += 1;
            }
            Some(j)
        }
        Some(&b'*') => {
            let mut j = i + 2;
            while j < bytes.len() {
                if bytes[j] == b'*' && bytes.get(j + 1) == Some(&b'/') {
                    return Some(j + 2);
                }
                j += 1;
            }
            Some(bytes.len())
        }
        _ => None,
    }
}

/// Advance past ASCII whitespace and comments.
pub fn skip_trivia(text: &str, mut i: usize) -> usize {
    loop {
        i = skip_ws(text, i);
        match comment_end(text, i) {
            Some(end) => i = end,
            None => return i,
        }
    }
}

pub fn is_ident_start(b: u8) -> bool {
    b.is_ascii_alphabetic() || b == b'_' || b == b'$'
}

pub fn is_ident_char(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_' || b == b'$'
}

/// Find the next comma at bracket depth 0, quote-aware, tracking all three
/// bracket kinds. Returns `None` when the text ends first.
pub fn next_top_level_comma(text: &str, from: usize) -> Option<usize> {
    let bytes = text.as_bytes();
    let mut braces = 0i32;
    let mut parens = 0i32;
    let mut brackets = 0i32;
    let mut in_string: Option<u8> = None;
    let mut escaped = false;
    let mut i = from;

    while i < bytes.len() {
        let b = bytes[i];
        match in_string {
            Some(quote) => {
                if escaped {
                    escaped = false;
                } else if b == b'\\' {
                    escaped = true;
                } else if b == quote || (b == b'\n' && quote != b'`') {
                    in_string = None;
                }
            }
            None => {
                if let Some(end) = comment_end(text, i) {
                    i = end;
                    continue;
                }
                match b {
                    b'\'' | b'"' | b'`' => in_string = Some(b),
                    b'{' => braces += 1,
                    b'}' => braces -= 1,
                    b'(' => parens += 1,
                    b')' => parens -= 1,
                    b'[' => brackets += 1,
                    b']' => brackets -= 1,
                    b',' if braces == 0 && parens == 0 && brackets == 0 => return Some(i),
                    _ => {}
                }
            }
        }
        i += 1;
    }
    None
}

/// One `name: value` pair from an object literal's interior.
#[derive(Debug, PartialEq, Eq)]
pub struct Field {
    pub name: String,
    /// Byte range of the value expression, trailing whitespace trimmed.
    pub value: Range<usize>,
}

/// Walk the interior of one object literal (text between its braces) and
/// yield its top-level `name: value` fields in source order.
///
/// Field names may be bare identifiers or quoted strings. Entries that are
/// not `name: value` pairs (spreads, shorthand properties, methods) are
/// skipped without aborting the walk.
pub fn object_fields(text: &str) -> Vec<Field> {
    let bytes = text.as_bytes();
    let mut fields = Vec::new();
    let mut i = skip_trivia(text, 0);

    while i < bytes.len() {
        // Field name: identifier or quoted string.
        let name_end;
        let name = if matches!(bytes[i], b'\'' | b'"' | b'`') {
            match read_string_literal(text, i) {
                Some((close, contents)) => {
                    name_end = close + 1;
                    Some(contents)
                }
                None => {
                    name_end = i;
                    None
                }
            }
        } else if is_ident_start(bytes[i]) {
            let mut j = i + 1;
            while j < bytes.len() && is_ident_char(bytes[j]) {
                j += 1;
            }
            name_end = j;
            Some(text[i..j].to_string())
        } else {
            name_end = i;
            None
        };

        let colon = skip_trivia(text, name_end);
        match name {
            Some(name) if bytes.get(colon) == Some(&b':') => {
                let value_start = skip_trivia(text, colon + 1);
                let value_end = next_top_level_comma(text, value_start).unwrap_or(bytes.len());
                let trimmed = text[value_start..value_end].trim_end();
                fields.push(Field {
                    name,
                    value: value_start..value_start + trimmed.len(),
                });
                i = skip_trivia(text, value_end + 1);
            }
            _ => {
                // Not a name:value pair — skip to the next top-level entry.
                match next_top_level_comma(text, i) {
                    Some(comma) => i = skip_trivia(text, comma + 1),
                    None => break,
                }
            }
        }
    }
    fields
}
