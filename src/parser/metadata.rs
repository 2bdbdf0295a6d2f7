//! Suite-level metadata from the options object of a suite declaration.

use crate::parser::{literal_contents, object_interior};
use crate::scan::object_fields;

/// Tag and description carried by a suite's options. Both default to empty.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SuiteMetadata {
    pub tag: String,
    pub description: String,
}

/// Extract metadata from the interior text of a suite's options object.
///
/// `tag` must be a quoted string; the description comes from a nested
/// `annotation` object's `description` field, also a quoted string. No
/// constant resolution happens here and non-literal values are ignored.
pub fn extract_suite_metadata(options: &str) -> SuiteMetadata {
    let mut meta = SuiteMetadata::default();
    for field in object_fields(options) {
        let value = &options[field.value.clone()];
        match field.name.as_str() {
            "tag" => {
                if let Some(text) = literal_contents(value) {
                    meta.tag = text;
                }
            }
            "annotation" => {
                if let Some(interior) = object_interior(value) {
                    for inner in object_fields(interior) {
                        if inner.name == "description" {
                            if let Some(text) = literal_contents(&interior[inner.value.clone()]) {
                                meta.description = text;
                            }
                        }
                    }
                }
            }
            _ => {}
        }
    }
    meta
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_tag_and_description() {
        let options = "\n  tag: '@feature1',\n  annotation: {\n    type: 'feature',\n    description: 'Initial page',\n  }\n";
        let meta = extract_suite_metadata(options);
        assert_eq!(meta.tag, "@feature1");
        assert_eq!(meta.description, "Initial page");
    }

    #[test]
    fn defaults_when_absent() {
        assert_eq!(extract_suite_metadata(""), SuiteMetadata::default());
        assert_eq!(
            extract_suite_metadata("retries: 2"),
            SuiteMetadata::default()
        );
    }

    #[test]
    fn non_literal_values_are_ignored() {
        let options = "tag: tagVar, annotation: { description: descVar }";
        assert_eq!(extract_suite_metadata(options), SuiteMetadata::default());
    }

    #[test]
    fn annotation_without_description() {
        let meta = extract_suite_metadata("tag: '@x', annotation: { type: 'feature' }");
        assert_eq!(meta.tag, "@x");
        assert_eq!(meta.description, "");
    }

    #[test]
    fn field_order_does_not_matter() {
        let meta = extract_suite_metadata(
            "annotation: { description: \"Later\", type: 'feature' }, tag: `@t`",
        );
        assert_eq!(meta.tag, "@t");
        assert_eq!(meta.description, "Later");
    }

    #[test]
    fn quoted_keys_and_escapes() {
        let meta = extract_suite_metadata(r"'tag': '@a\'b'");
        assert_eq!(meta.tag, "@a'b");
    }

    #[test]
    fn braces_inside_description_string() {
        let meta =
            extract_suite_metadata("annotation: { description: 'uses { and } freely' }");
        assert_eq!(meta.description, "uses { and } freely");
    }
}
