//! Execution-hooked documentation collection.
//!
//! The host test framework drives three entry points: [`DocumentationReporter::on_begin`]
//! with the discovered suite tree, [`DocumentationReporter::on_test_end`] once per
//! finished test with the annotations observed at runtime, and
//! [`DocumentationReporter::on_end`] to write one document per source file.
//! Static parsing fills each test's annotation baseline at discovery time;
//! runtime records override it per the merge rule in [`crate::parser::merge`].

use crate::model::{DocumentationModel, RuntimeAnnotation, Suite, Test};
use crate::parser::{self, consts::ConstantTable, merge};
use crate::render::{self, markdown::MarkdownRenderer, REPORTER_LABEL};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Per-run cache of source text and constant table; `None` records a failed
/// read so it is not retried.
type SourceCache = HashMap<PathBuf, Option<(String, ConstantTable)>>;

/// One node of the host framework's discovered suite tree.
#[derive(Debug, Clone, Default)]
pub struct DiscoveredSuite {
    pub title: String,
    /// Source file backing this suite; absent on synthetic root nodes.
    pub file: Option<PathBuf>,
    /// Test titles in declaration order.
    pub tests: Vec<String>,
    pub suites: Vec<DiscoveredSuite>,
}

/// Totals from [`DocumentationReporter::on_end`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    pub suites: usize,
    pub files_written: usize,
}

pub struct DocumentationReporter {
    output_dir: PathBuf,
    base_dir: PathBuf,
    model: DocumentationModel,
}

impl DocumentationReporter {
    /// `output_dir` receives the rendered tree; file paths are displayed
    /// relative to `base_dir` (typically the project root).
    pub fn new(output_dir: impl Into<PathBuf>, base_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
            base_dir: base_dir.into(),
            model: DocumentationModel::new(),
        }
    }

    /// Build the per-file skeleton from the discovered tree, filling each
    /// test's static annotation baseline from its source file. Each file is
    /// read at most once per run, however many suite nodes share it.
    ///
    /// Nested suites of the same file each rebuild that file's entry, so the
    /// innermost declaration wins — the model stays one Suite per file.
    pub fn on_begin(&mut self, root: &DiscoveredSuite) {
        let mut sources = SourceCache::new();
        self.discover(root, &mut sources);
    }

    fn discover(&mut self, node: &DiscoveredSuite, sources: &mut SourceCache) {
        if let Some(file) = &node.file {
            self.add_suite(file, node, sources);
        }
        for child in &node.suites {
            self.discover(child, sources);
        }
    }

    fn add_suite(&mut self, file: &Path, node: &DiscoveredSuite, sources: &mut SourceCache) {
        let mut suite = Suite {
            name: node.title.clone(),
            file_path: self.display_path(file),
            ..Default::default()
        };

        let source = sources
            .entry(file.to_path_buf())
            .or_insert_with(|| match fs::read_to_string(file) {
                Ok(text) => {
                    let consts = ConstantTable::scan(&text);
                    Some((text, consts))
                }
                Err(err) => {
                    tracing::warn!(file = %file.display(), error = %err, "cannot read source file");
                    None
                }
            });

        match source.as_ref() {
            Some((text, consts)) => {
                let meta = parser::named_suite_metadata(text, &node.title);
                suite.tag = meta.tag;
                suite.description = meta.description;
                for title in &node.tests {
                    let annotations = match parser::static_annotations(text, title, consts) {
                        Ok(annotations) => annotations,
                        Err(err) => {
                            tracing::warn!(
                                file = %file.display(),
                                %err,
                                "static annotation baseline unavailable"
                            );
                            Vec::new()
                        }
                    };
                    suite.tests.push(Test {
                        title: title.clone(),
                        annotations,
                    });
                }
            }
            None => {
                // Unreadable source: keep the entry so runtime annotations
                // can still fill it.
                for title in &node.tests {
                    suite.tests.push(Test {
                        title: title.clone(),
                        annotations: Vec::new(),
                    });
                }
            }
        }

        self.model.insert(file.to_path_buf(), suite);
    }

    /// Record the annotations observed while running one test. Unknown
    /// files or titles are ignored.
    pub fn on_test_end(&mut self, file: &Path, title: &str, annotations: Vec<RuntimeAnnotation>) {
        let Some(suite) = self.model.get_mut(file) else {
            tracing::debug!(file = %file.display(), "test end for an undiscovered file");
            return;
        };
        match suite.tests.iter_mut().find(|t| t.title == title) {
            Some(test) => merge::merge_runtime_annotations(test, annotations),
            None => tracing::debug!(title, "test end for an undiscovered title"),
        }
    }

    /// Render and write every collected suite. A failed write is logged and
    /// does not stop the remaining files.
    pub fn on_end(&self) -> RunSummary {
        let renderer = MarkdownRenderer::new(REPORTER_LABEL);
        let mut files_written = 0;
        for suite in self.model.values() {
            match render::write_suite(suite, &renderer, &self.output_dir) {
                Ok(path) => {
                    tracing::info!(path = %path.display(), "generated");
                    files_written += 1;
                }
                Err(err) => {
                    tracing::error!(error = %err, file = %suite.file_path, "write failed");
                }
            }
        }
        tracing::info!(
            dir = %self.output_dir.display(),
            suites = self.model.len(),
            "documentation generated"
        );
        RunSummary {
            suites: self.model.len(),
            files_written,
        }
    }

    /// The collected model, keyed by source file path.
    pub fn model(&self) -> &DocumentationModel {
        &self.model
    }

    fn display_path(&self, file: &Path) -> String {
        file.strip_prefix(&self.base_dir)
            .unwrap_or(file)
            .to_string_lossy()
            .into_owned()
    }
}
