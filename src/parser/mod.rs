//! Static extraction: suites, tests, and annotations from spec source text.

pub mod annotation;
pub mod consts;
pub mod merge;
pub mod metadata;

use crate::locate;
use crate::model::{Annotation, Suite, Test};
use crate::scan::{find_matching_close, read_string_literal};
use consts::ConstantTable;
use thiserror::Error;

/// Call keyword declaring a suite.
pub const SUITE_KEYWORD: &str = "test.describe";
/// Call keyword declaring a test.
pub const TEST_KEYWORD: &str = "test";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("no suite declaration found")]
    SuiteNotFound,
    #[error("test {0:?} not found")]
    TestBodyNotFound(String),
}

/// Parse one source file into a suite with its tests' static annotations.
///
/// The first suite declaration wins. Tests anywhere inside its body are
/// collected in source order, so tests of nested suites collapse into the
/// file's single entry. `file_path` is carried verbatim for display.
pub fn parse_source(text: &str, file_path: &str) -> Result<Suite, ParseError> {
    let suite =
        locate::find_block(text, SUITE_KEYWORD, 0).ok_or(ParseError::SuiteNotFound)?;
    let consts = ConstantTable::scan(text);
    let meta = suite
        .options
        .as_ref()
        .map(|range| metadata::extract_suite_metadata(&text[range.clone()]))
        .unwrap_or_default();

    let body = &text[suite.body.clone()];
    let mut tests = Vec::new();
    for block in locate::blocks(body, TEST_KEYWORD) {
        let annotations = annotation::extract_annotations(&body[block.body.clone()], &consts);
        tests.push(Test {
            title: block.name,
            annotations,
        });
    }

    tracing::debug!(
        file = file_path,
        tests = tests.len(),
        constants = consts.len(),
        "parsed suite"
    );

    Ok(Suite {
        name: suite.name,
        tag: meta.tag,
        description: meta.description,
        file_path: file_path.to_string(),
        tests,
    })
}

/// Static annotation baseline for one named test, used when the host
/// framework supplies the suite/test hierarchy instead of a file scan.
pub fn static_annotations(
    text: &str,
    title: &str,
    consts: &ConstantTable,
) -> Result<Vec<Annotation>, ParseError> {
    let block = locate::locate_named_block(text, TEST_KEYWORD, title)
        .ok_or_else(|| ParseError::TestBodyNotFound(title.to_string()))?;
    Ok(annotation::extract_annotations(&text[block.body], consts))
}

/// Metadata for a named suite declaration. Defaults when the declaration or
/// its options object cannot be located.
pub fn named_suite_metadata(text: &str, name: &str) -> metadata::SuiteMetadata {
    locate::locate_named_block(text, SUITE_KEYWORD, name)
        .and_then(|block| {
            block
                .options
                .map(|range| metadata::extract_suite_metadata(&text[range]))
        })
        .unwrap_or_default()
}

/// Contents of `expr` when it is exactly one quoted string literal.
pub(crate) fn literal_contents(expr: &str) -> Option<String> {
    let first = *expr.as_bytes().first()?;
    if !matches!(first, b'\'' | b'"' | b'`') {
        return None;
    }
    let (close, contents) = read_string_literal(expr, 0)?;
    (close == expr.len() - 1).then_some(contents)
}

/// Interior of `expr` when it is exactly one `{ … }` object literal.
pub(crate) fn object_interior(expr: &str) -> Option<&str> {
    if *expr.as_bytes().first()? != b'{' {
        return None;
    }
    let close = find_matching_close(expr, 0)?;
    (close == expr.len() - 1).then(|| &expr[1..close])
}
