//! Module-scope string constants.
//!
//! Annotation descriptions may name an identifier instead of carrying a
//! string literal. One pass over the file collects every top-level
//! `const`/`let`/`var` binding whose initializer is a plain string literal;
//! later bindings of the same name win.

use crate::scan::{comment_end, is_ident_char, read_string_literal};
use regex::Regex;
use std::collections::HashMap;
use std::sync::LazyLock;

static RE_DECL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:const|let|var)\s+([A-Za-z_$][A-Za-z0-9_$]*)\s*=\s*").unwrap()
});

#[derive(Debug, Default)]
pub struct ConstantTable {
    bindings: HashMap<String, String>,
}

impl ConstantTable {
    /// Collect top-level string bindings from `text`.
    ///
    /// Top level means bracket depth 0 outside string literals, so bindings
    /// inside callbacks, blocks, or call arguments are not recorded, and
    /// declarations inside comments are invisible. Template literals
    /// containing a `${` substitution are not plain strings and are
    /// skipped. Multi-declarator statements record only their first
    /// binding.
    pub fn scan(text: &str) -> Self {
        let bytes = text.as_bytes();
        let mut bindings = HashMap::new();
        let mut depth = 0i32;
        let mut in_string: Option<u8> = None;
        let mut escaped = false;
        let mut i = 0;

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
                        b'{' | b'(' | b'[' => depth += 1,
                        b'}' | b')' | b']' => depth -= 1,
                        b'c' | b'l' | b'v' if depth == 0 => {
                            let bounded = i == 0 || !is_ident_char(bytes[i - 1]);
                            if bounded {
                                if let Some(m) = RE_DECL.captures(&text[i..]) {
                                    let value_pos = i + m.get(0).map_or(0, |w| w.end());
                                    if let Some((close, value)) =
                                        read_string_literal(text, value_pos)
                                    {
                                        let raw = &text[value_pos + 1..close];
                                        if !(bytes[value_pos] == b'`' && raw.contains("${")) {
                                            bindings.insert(m[1].to_string(), value);
                                        }
                                        // The literal is consumed either way.
                                        i = close + 1;
                                        continue;
                                    }
                                }
                            }
                        }
                        _ => {}
                    }
                }
            }
            i += 1;
        }

        Self { bindings }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.bindings.get(name).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}
