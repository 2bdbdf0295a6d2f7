//! specdoc — documentation extracted from annotated end-to-end spec files.
//!
//! Spec files declare suites and tests whose bodies register
//! `(type, description)` annotation records. This crate locates those
//! declarations with a quote-aware lexical scanner (no full language
//! parser), builds a per-file documentation model, optionally overlays
//! annotations reported by an actual test run, and renders deterministic
//! Markdown mirroring the source tree.
//!
//! Two front ends share the pipeline:
//!
//! - the `specdoc` binary scans a file tree by glob pattern
//! - [`reporter::DocumentationReporter`] hooks a live test run through its
//!   discovery and test-completion callbacks

pub mod locate;
pub mod model;
pub mod parser;
pub mod render;
pub mod reporter;
pub mod scan;
