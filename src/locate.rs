//! Declaration-block location: signature pattern plus balanced-brace
//! matching, built on the quote-aware scanner.
//!
//! A suite declaration looks like
//! `test.describe('Name', { …options… }, () => { …body… })` and a test
//! declaration like `test('title', async ({ page }) => { …body… })`; the
//! options object is optional in both shapes. Block boundaries come from
//! the scanner alone, never from regexes.

use crate::scan::{
    comment_end, find_matching_close, is_ident_char, read_string_literal, skip_trivia,
};
use std::ops::Range;

/// A located suite or test declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block {
    /// Unescaped title literal.
    pub name: String,
    /// Interior byte range of the options object literal, when present.
    pub options: Option<Range<usize>>,
    /// Interior byte range of the callback body.
    pub body: Range<usize>,
    /// Full byte range, keyword through the closing body brace.
    pub span: Range<usize>,
}

/// Find the first block for `keyword` at or after `from`.
///
/// A keyword occurrence counts only outside string literals and comments,
/// not preceded by an identifier character or `.`, and followed (after
/// whitespace or comments) by `(`. Occurrences that do not parse as
/// `keyword('title', …body…)` are skipped and the walk continues.
pub fn find_block(text: &str, keyword: &str, from: usize) -> Option<Block> {
    let bytes = text.as_bytes();
    let first = *keyword.as_bytes().first()?;
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
                if b == b'\'' || b == b'"' || b == b'`' {
                    in_string = Some(b);
                } else if b == first && text[i..].starts_with(keyword) {
                    let bounded = i == 0 || {
                        let prev = bytes[i - 1];
                        !is_ident_char(prev) && prev != b'.'
                    };
                    if bounded {
                        if let Some(block) = parse_block_at(text, keyword, i) {
                            return Some(block);
                        }
                    }
                }
            }
        }
        i += 1;
    }
    None
}

/// Parse one candidate occurrence with the keyword at `start`.
fn parse_block_at(text: &str, keyword: &str, start: usize) -> Option<Block> {
    let bytes = text.as_bytes();

    let paren = skip_trivia(text, start + keyword.len());
    if bytes.get(paren) != Some(&b'(') {
        return None;
    }

    // Title literal.
    let title_pos = skip_trivia(text, paren + 1);
    let (title_close, name) = read_string_literal(text, title_pos)?;

    let comma = skip_trivia(text, title_close + 1);
    if bytes.get(comma) != Some(&b',') {
        return None;
    }

    // Optional options object between title and callback.
    let mut cursor = skip_trivia(text, comma + 1);
    let mut options = None;
    if bytes.get(cursor) == Some(&b'{') {
        let close = find_matching_close(text, cursor)?;
        options = Some(cursor + 1..close);
        let next = skip_trivia(text, close + 1);
        if bytes.get(next) != Some(&b',') {
            return None;
        }
        cursor = skip_trivia(text, next + 1);
    }

    // Callback body: the first `{` at parenthesis-delta 0, which skips
    // parameter destructuring like `async ({ page }) =>` without special
    // cases. Hitting the call's own `)` first means there is no body.
    let body_open = find_body_open(text, cursor)?;
    let body_close = find_matching_close(text, body_open)?;

    Some(Block {
        name,
        options,
        body: body_open + 1..body_close,
        span: start..body_close + 1,
    })
}

fn find_body_open(text: &str, from: usize) -> Option<usize> {
    let bytes = text.as_bytes();
    let mut parens = 0i32;
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
                    b'(' => parens += 1,
                    b')' => {
                        if parens == 0 {
                            return None;
                        }
                        parens -= 1;
                    }
                    b'{' if parens == 0 => return Some(i),
                    _ => {}
                }
            }
        }
        i += 1;
    }
    None
}

/// Find the first block whose title equals `name` exactly (not partial).
///
/// On a title mismatch the search resumes just past the keyword, so blocks
/// nested inside another block's body are still reachable.
pub fn locate_named_block(text: &str, keyword: &str, name: &str) -> Option<Block> {
    let mut from = 0;
    while let Some(block) = find_block(text, keyword, from) {
        if block.name == name {
            return Some(block);
        }
        from = block.span.start + keyword.len();
    }
    None
}

/// Iterate blocks left to right, non-overlapping: each search resumes after
/// the previous block's closing brace.
pub fn blocks<'t>(text: &'t str, keyword: &'t str) -> Blocks<'t> {
    Blocks {
        text,
        keyword,
        pos: 0,
    }
}

pub struct Blocks<'t> {
    text: &'t str,
    keyword: &'t str,
    pos: usize,
}

impl Iterator for Blocks<'_> {
    type Item = Block;

    fn next(&mut self) -> Option<Block> {
        let block = find_block(self.text, self.keyword, self.pos)?;
        self.pos = block.span.end;
        Some(block)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SUITE: &str = r#"import { test, expect } from '@playwright/test';

test.describe('App E2E', {
  tag: '@feature1',
  annotation: {
    type: 'feature',
    description: 'Initial page',
  }
}, () => {
  test('displays welcome message', async ({ page }) => {
    await page.goto('/');
  });

  test('has title', async ({ page }) => {
    await expect(page).toHaveTitle(/app/i);
  });
})
"#;

    #[test]
    fn finds_suite_with_options() {
        let block = find_block(SUITE, "test.describe", 0).unwrap();
        assert_eq!(block.name, "App E2E");
        let options = block.options.clone().unwrap();
        assert!(SUITE[options].contains("tag: '@feature1'"));
        assert!(SUITE[block.body.clone()].contains("displays welcome message"));
    }

    #[test]
    fn finds_tests_in_order() {
        let suite = find_block(SUITE, "test.describe", 0).unwrap();
        let body = &SUITE[suite.body];
        let titles: Vec<String> = blocks(body, "test").map(|b| b.name).collect();
        assert_eq!(titles, ["displays welcome message", "has title"]);
    }

    #[test]
    fn destructured_params_are_not_the_body() {
        let text = "test('t', async ({ page }) => { await page.goto('/'); })";
        let block = find_block(text, "test", 0).unwrap();
        assert_eq!(&text[block.body], " await page.goto('/'); ");
    }

    #[test]
    fn non_async_destructured_params() {
        let text = "test('t', ({ page }) => { step(); })";
        let block = find_block(text, "test", 0).unwrap();
        assert_eq!(&text[block.body], " step(); ");
    }

    #[test]
    fn suite_without_options() {
        let text = "test.describe('Bare', () => { test('x', () => { a(); }); })";
        let block = find_block(text, "test.describe", 0).unwrap();
        assert_eq!(block.name, "Bare");
        assert!(block.options.is_none());
    }

    #[test]
    fn keyword_requires_boundary_and_paren() {
        // `test.describe(` must not count as a `test(` occurrence, and
        // `mytest(` must not count at all.
        let text = "test.describe('S', () => { mytest('no'); test('yes', () => { t(); }); })";
        let block = find_block(text, "test", 0).unwrap();
        assert_eq!(block.name, "yes");
    }

    #[test]
    fn keyword_inside_string_is_ignored() {
        let text = r#"log("call test('trap', () => {") ; test('real', () => { a(); })"#;
        let block = find_block(text, "test", 0).unwrap();
        assert_eq!(block.name, "real");
    }

    #[test]
    fn commented_out_test_is_ignored() {
        let text = "// test('dead', () => { x(); })\ntest('live', () => { y(); })";
        let titles: Vec<String> = blocks(text, "test").map(|b| b.name).collect();
        assert_eq!(titles, ["live"]);
    }

    #[test]
    fn backtick_in_comment_does_not_derail_the_walk() {
        // A lone backtick in a comment must not open template-string state
        // and swallow everything after it.
        let text = "// watch the ` here\ntest('real', () => { a(); })";
        let block = find_block(text, "test", 0).unwrap();
        assert_eq!(block.name, "real");
    }

    #[test]
    fn comment_between_declaration_tokens() {
        let text = "test('t', /* slow */ () => { a(); })";
        let block = find_block(text, "test", 0).unwrap();
        assert_eq!(&text[block.body], " a(); ");
    }

    #[test]
    fn brace_in_title_and_body_strings() {
        let text = "test('weird { title', () => { log('open { and close }'); })";
        let block = find_block(text, "test", 0).unwrap();
        assert_eq!(block.name, "weird { title");
        assert_eq!(&text[block.body], " log('open { and close }'); ");
    }

    #[test]
    fn named_lookup_is_exact() {
        let text =
            "test('has title 2', () => { a(); }); test('has title', () => { b(); });";
        let block = locate_named_block(text, "test", "has title").unwrap();
        assert!(&text[block.body].contains("b()"));
        assert!(locate_named_block(text, "test", "has").is_none());
    }

    #[test]
    fn named_lookup_reaches_nested_blocks() {
        let text = "test.describe('Outer', () => { test.describe('Inner', () => { x(); }); })";
        let block = locate_named_block(text, "test.describe", "Inner").unwrap();
        assert_eq!(&text[block.body], " x(); ");
    }

    #[test]
    fn unparsable_occurrences_are_skipped() {
        // Variable title, then a call without a body, then a real block.
        let text = "test(dynamicTitle, fn); test('no body'); test('ok', () => { r(); })";
        let block = find_block(text, "test", 0).unwrap();
        assert_eq!(block.name, "ok");
    }

    #[test]
    fn escaped_quote_in_title() {
        let text = r"test('it\'s fine', () => { a(); })";
        let block = find_block(text, "test", 0).unwrap();
        assert_eq!(block.name, "it's fine");
    }
}
