//! Annotation-registration calls inside a test body.
//!
//! Each `test.info().annotations.push(…)` call carries one or more object
//! literals of the shape `{ type: AnnotationType.Step, description: '…' }`.
//! One exhaustive scan walks every call in source order and splits its
//! argument list on top-level commas, so a call with four objects and a call
//! with one are handled by the same path.

use crate::model::Annotation;
use crate::parser::consts::ConstantTable;
use crate::parser::{literal_contents, object_interior};
use crate::scan::{
    comment_end, find_matching_close, is_ident_char, is_ident_start, next_top_level_comma,
    object_fields,
};
use regex::Regex;
use std::sync::LazyLock;

static RE_PUSH: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^test\s*\.\s*info\s*\(\s*\)\s*\.\s*annotations\s*\.\s*push\s*\(").unwrap()
});

/// Extract ordered annotation records from every registration call in `body`.
///
/// Returns an empty list when no call is present. Arguments that are not
/// `{ type, description }` object literals are skipped without aborting the
/// call.
pub fn extract_annotations(body: &str, consts: &ConstantTable) -> Vec<Annotation> {
    let bytes = body.as_bytes();
    let mut annotations = Vec::new();
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
                if let Some(end) = comment_end(body, i) {
                    i = end;
                    continue;
                }
                if matches!(b, b'\'' | b'"' | b'`') {
                    in_string = Some(b);
                } else if b == b't' && bounded(bytes, i) {
                    if let Some(m) = RE_PUSH.find(&body[i..]) {
                        let open = i + m.end() - 1;
                        if let Some(close) = find_matching_close(body, open) {
                            collect_call(&body[open + 1..close], consts, &mut annotations);
                            i = close + 1;
                            continue;
                        }
                    }
                }
            }
        }
        i += 1;
    }
    annotations
}

fn bounded(bytes: &[u8], i: usize) -> bool {
    i == 0 || {
        let prev = bytes[i - 1];
        !is_ident_char(prev) && prev != b'.'
    }
}

/// Split one call's argument list on top-level commas and parse each piece.
fn collect_call(args: &str, consts: &ConstantTable, out: &mut Vec<Annotation>) {
    let mut start = 0;
    loop {
        let end = next_top_level_comma(args, start).unwrap_or(args.len());
        let piece = args[start..end].trim();
        if !piece.is_empty() {
            match parse_annotation_object(piece, consts) {
                Some(annotation) => out.push(annotation),
                None => tracing::debug!(argument = piece, "not an annotation object, skipping"),
            }
        }
        if end >= args.len() {
            break;
        }
        start = end + 1;
    }
}

fn parse_annotation_object(expr: &str, consts: &ConstantTable) -> Option<Annotation> {
    let interior = object_interior(expr)?;
    let mut kind = None;
    let mut description = None;
    for field in object_fields(interior) {
        let value = &interior[field.value.clone()];
        match field.name.as_str() {
            "type" => kind = annotation_kind(value),
            "description" => description = Some(resolve_description(value, consts)),
            _ => {}
        }
    }
    Some(Annotation::new(kind?, description?))
}

/// The type tag: a string literal's contents, or the final identifier
/// segment of a symbolic reference like `AnnotationType.Step`.
fn annotation_kind(value: &str) -> Option<String> {
    if let Some(text) = literal_contents(value) {
        return Some(text);
    }
    let segment = value.rsplit('.').next().unwrap_or(value).trim();
    is_identifier(segment).then(|| segment.to_string())
}

/// A description is a string literal's contents, a constant reference, or,
/// when neither applies, the raw expression text.
fn resolve_description(value: &str, consts: &ConstantTable) -> String {
    if let Some(text) = literal_contents(value) {
        return text;
    }
    if is_identifier(value) {
        if let Some(text) = consts.get(value) {
            return text.to_string();
        }
        tracing::warn!(identifier = value, "constant not found, keeping raw text");
    }
    value.to_string()
}

fn is_identifier(expr: &str) -> bool {
    let bytes = expr.as_bytes();
    match bytes.first() {
        Some(&first) => is_ident_start(first) && bytes[1..].iter().all(|&b| is_ident_char(b)),
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(annotations: &[Annotation]) -> Vec<&str> {
        annotations.iter().map(|a| a.kind.as_str()).collect()
    }

    #[test]
    fn multi_object_call_in_order() {
        let body = r#"
    test.info().annotations.push(
      { type: AnnotationType.Description, description: 'Navigate to the home page and see the welcome message.' },
      { type: AnnotationType.Step, description: 'Navigate to the home page' },
      { type: AnnotationType.Expected, description: 'Welcome test should be "Hello"' },
      { type: AnnotationType.Expected, description: 'Page title should be "app"' }
    );
    await page.goto('/');
"#;
        let annotations = extract_annotations(body, &ConstantTable::default());
        assert_eq!(
            kinds(&annotations),
            ["Description", "Step", "Expected", "Expected"]
        );
        assert_eq!(
            annotations[2].description,
            "Welcome test should be \"Hello\""
        );
    }

    #[test]
    fn single_object_with_constant_reference() {
        let consts = ConstantTable::scan("const description = `Resolved text.`\n");
        let body = "test.info().annotations.push({\n  type: AnnotationType.Feature,\n  description: description\n})";
        let annotations = extract_annotations(body, &consts);
        assert_eq!(annotations.len(), 1);
        assert_eq!(annotations[0].kind, "Feature");
        assert_eq!(annotations[0].description, "Resolved text.");
    }

    #[test]
    fn unresolved_reference_keeps_raw_text() {
        let body = "test.info().annotations.push({ type: AnnotationType.Step, description: missing })";
        let annotations = extract_annotations(body, &ConstantTable::default());
        assert_eq!(annotations[0].description, "missing");
    }

    #[test]
    fn non_identifier_expression_keeps_raw_text() {
        let body =
            "test.info().annotations.push({ type: AnnotationType.Step, description: steps.join(', ') })";
        let annotations = extract_annotations(body, &ConstantTable::default());
        assert_eq!(annotations[0].description, "steps.join(', ')");
    }

    #[test]
    fn no_call_means_empty() {
        let body = "await page.goto('/');\nexpect(title).toBeTruthy();";
        assert!(extract_annotations(body, &ConstantTable::default()).is_empty());
    }

    #[test]
    fn calls_processed_in_source_order() {
        let body = "
    test.info().annotations.push({ type: AnnotationType.Step, description: 'first' });
    doSomething();
    test.info().annotations.push({ type: AnnotationType.Step, description: 'second' });
";
        let annotations = extract_annotations(body, &ConstantTable::default());
        assert_eq!(annotations[0].description, "first");
        assert_eq!(annotations[1].description, "second");
    }

    #[test]
    fn paren_inside_description_string() {
        let body =
            "test.info().annotations.push({ type: AnnotationType.Step, description: 'click (twice)' });";
        let annotations = extract_annotations(body, &ConstantTable::default());
        assert_eq!(annotations[0].description, "click (twice)");
    }

    #[test]
    fn multiline_template_description() {
        let body = "test.info().annotations.push({ type: AnnotationType.Description, description: `line one\nline two` })";
        let annotations = extract_annotations(body, &ConstantTable::default());
        assert_eq!(annotations[0].description, "line one\nline two");
    }

    #[test]
    fn quoted_type_and_trailing_comma() {
        let body = "test.info().annotations.push({ type: 'issue', description: 'GH-12' },)";
        let annotations = extract_annotations(body, &ConstantTable::default());
        assert_eq!(kinds(&annotations), ["issue"]);
    }

    #[test]
    fn object_without_description_is_skipped() {
        let body = "test.info().annotations.push({ type: AnnotationType.Step }, { type: AnnotationType.Step, description: 'kept' })";
        let annotations = extract_annotations(body, &ConstantTable::default());
        assert_eq!(annotations.len(), 1);
        assert_eq!(annotations[0].description, "kept");
    }

    #[test]
    fn call_text_inside_string_is_ignored() {
        let body = "const s = \"test.info().annotations.push({ type: AnnotationType.Step, description: 'fake' })\";";
        assert!(extract_annotations(body, &ConstantTable::default()).is_empty());
    }

    #[test]
    fn comment_between_object_fields() {
        let body = "test.info().annotations.push({ type: AnnotationType.Step, // note\n  description: 'go' })";
        let annotations = extract_annotations(body, &ConstantTable::default());
        assert_eq!(annotations.len(), 1);
        assert_eq!(annotations[0].kind, "Step");
        assert_eq!(annotations[0].description, "go");
    }

    #[test]
    fn commented_out_call_is_ignored() {
        let body = "// test.info().annotations.push({ type: AnnotationType.Step, description: 'dead' })\ntest.info().annotations.push({ type: AnnotationType.Step, description: 'live' })";
        let annotations = extract_annotations(body, &ConstantTable::default());
        assert_eq!(annotations.len(), 1);
        assert_eq!(annotations[0].description, "live");
    }

    #[test]
    fn other_receivers_are_ignored() {
        let body = "mytest.info().annotations.push({ type: AnnotationType.Step, description: 'no' });";
        assert!(extract_annotations(body, &ConstantTable::default()).is_empty());
    }

    #[test]
    fn spaced_call_chain_matches() {
        let body = "test . info( ) . annotations . push({ type: AnnotationType.Step, description: 'ok' })";
        let annotations = extract_annotations(body, &ConstantTable::default());
        assert_eq!(annotations[0].description, "ok");
    }
}
