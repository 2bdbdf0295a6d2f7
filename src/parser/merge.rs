//! Overlay of execution-reported annotations onto a test's static baseline.

use crate::model::{Annotation, RuntimeAnnotation, Test};

/// Apply the runtime precedence rule to one test.
///
/// Records without a description are dropped. When the remainder is
/// non-empty it replaces the static annotations wholesale; when empty the
/// baseline stays, even if that baseline was itself empty. The two lists are
/// never interleaved.
pub fn merge_runtime_annotations(test: &mut Test, records: Vec<RuntimeAnnotation>) {
    let reported: Vec<Annotation> = records
        .into_iter()
        .filter_map(|record| {
            record
                .description
                .map(|description| Annotation::new(record.kind, description))
        })
        .collect();

    if !reported.is_empty() {
        test.annotations = reported;
    }
}
