//! Markdown renderer — one document per suite.
//!
//! Layout: suite heading, optional tag line, optional description section,
//! then every test with its annotations grouped into the four recognized
//! buckets (Feature, Description, Steps, Expected Results). Steps become a
//! 1-based numbered list and expected results a bullet list, both in
//! extraction order. Unrecognized annotation types are not rendered.

use crate::model::{Annotation, Suite, Test};
use crate::render::Renderer;
use chrono::{DateTime, SecondsFormat, Utc};

pub struct MarkdownRenderer {
    generated_by: String,
    timestamp: Option<DateTime<Utc>>,
}

impl MarkdownRenderer {
    pub fn new(generated_by: impl Into<String>) -> Self {
        Self {
            generated_by: generated_by.into(),
            timestamp: None,
        }
    }

    /// Pin the footer timestamp instead of reading the clock.
    pub fn with_timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = Some(timestamp);
        self
    }

    /// Footer timestamp: pinned value, then `SOURCE_DATE_EPOCH` for
    /// reproducible output, then the wall clock.
    fn timestamp(&self) -> DateTime<Utc> {
        if let Some(ts) = self.timestamp {
            return ts;
        }
        if let Some(ts) = std::env::var("SOURCE_DATE_EPOCH")
            .ok()
            .and_then(|raw| raw.parse::<i64>().ok())
            .and_then(|secs| DateTime::from_timestamp(secs, 0))
        {
            return ts;
        }
        Utc::now()
    }
}

impl Renderer for MarkdownRenderer {
    fn render(&self, suite: &Suite) -> String {
        let mut output = String::new();

        output.push_str(&format!("# {}\n\n", suite.name));

        if !suite.tag.is_empty() {
            output.push_str(&format!("**Tag:** `{}`\n\n", suite.tag));
        }

        if !suite.description.is_empty() {
            output.push_str(&format!("## Description\n\n{}\n\n", suite.description));
        }

        output.push_str("## Test Cases\n\n");

        for test in &suite.tests {
            output.push_str(&render_test(test));
            output.push_str("---\n\n");
        }

        let timestamp = self
            .timestamp()
            .to_rfc3339_opts(SecondsFormat::Millis, true);
        output.push_str("---\n\n");
        output.push_str(&format!(
            "*Generated on {} by {}*\n",
            timestamp, self.generated_by
        ));
        output.push_str(&format!("*Source file: `{}`*\n", suite.file_path));

        output
    }

    fn file_extension(&self) -> &str {
        "md"
    }
}

fn render_test(test: &Test) -> String {
    let mut out = String::new();
    out.push_str(&format!("### {}\n\n", test.title));

    if test.annotations.is_empty() {
        out.push_str("*No annotations found for this test.*\n\n");
        return out;
    }

    let of_kind = |kind: &str| -> Vec<&Annotation> {
        test.annotations.iter().filter(|a| a.kind == kind).collect()
    };

    let features = of_kind("Feature");
    if !features.is_empty() {
        out.push_str("#### Feature\n\n");
        for annotation in features {
            out.push_str(&format!("{}\n\n", annotation.description));
        }
    }

    let descriptions = of_kind("Description");
    if !descriptions.is_empty() {
        out.push_str("#### Description\n\n");
        for annotation in descriptions {
            out.push_str(&format!("{}\n\n", annotation.description));
        }
    }

    let steps = of_kind("Step");
    if !steps.is_empty() {
        out.push_str("#### Steps\n\n");
        for (index, annotation) in steps.iter().enumerate() {
            out.push_str(&format!("{}. {}\n", index + 1, annotation.description));
        }
        out.push('\n');
    }

    let expected = of_kind("Expected");
    if !expected.is_empty() {
        out.push_str("#### Expected Results\n\n");
        for annotation in expected {
            out.push_str(&format!("- {}\n", annotation.description));
        }
        out.push('\n');
    }

    out
}
