//! Data model for extracted documentation — format-agnostic.

use serde::Serialize;
use std::collections::BTreeMap;
use std::path::PathBuf;

/// A single (type, description) record attached to a test, either parsed
/// from source or reported by the host framework at execution time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Annotation {
    /// Annotation type tag, e.g. `Step` or `Expected`. Case-sensitive.
    #[serde(rename = "type")]
    pub kind: String,
    pub description: String,
}

impl Annotation {
    pub fn new(kind: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            description: description.into(),
        }
    }
}

/// An annotation record as observed by the host framework during execution.
/// The description may be absent; such records are dropped on merge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuntimeAnnotation {
    pub kind: String,
    pub description: Option<String>,
}

/// A single named test and its ordered annotations.
///
/// Titles identify tests within a file; the host framework is expected to
/// keep them unique per file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Test {
    pub title: String,
    pub annotations: Vec<Annotation>,
}

/// A documented suite: one per source file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Suite {
    pub name: String,
    /// Suite tag, empty when the declaration carries none.
    pub tag: String,
    /// Suite prose description, empty when absent. May contain Markdown.
    pub description: String,
    /// Relative display path of the source file.
    pub file_path: String,
    pub tests: Vec<Test>,
}

/// In-memory mapping from source file to its Suite. BTreeMap keeps model
/// iteration, and therefore output writing, deterministic by path.
pub type DocumentationModel = BTreeMap<PathBuf, Suite>;
