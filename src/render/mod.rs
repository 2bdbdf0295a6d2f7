//! Renderer module — trait-based format dispatch plus output writing.

pub mod json;
pub mod markdown;

use crate::model::Suite;
use anyhow::{anyhow, Context, Result};
use std::fs;
use std::path::{Component, Path, PathBuf};

/// Footer label used by the batch generator.
pub const GENERATOR_LABEL: &str = "Documentation Generator";
/// Footer label used by the execution-hooked reporter.
pub const REPORTER_LABEL: &str = "Documentation Reporter";

/// Trait for rendering a Suite into a specific output format.
pub trait Renderer {
    fn render(&self, suite: &Suite) -> String;
    fn file_extension(&self) -> &str;
}

/// Create a renderer for the given format name. `generated_by` labels the
/// document footer where the format has one.
pub fn create_renderer(format: &str, generated_by: &str) -> Result<Box<dyn Renderer>> {
    match format {
        "markdown" | "md" => Ok(Box::new(markdown::MarkdownRenderer::new(generated_by))),
        "json" => Ok(Box::new(json::JsonRenderer)),
        _ => Err(anyhow!("unknown format: {}. Use markdown or json", format)),
    }
}

/// Write one suite's rendered document under `output_root`, mirroring the
/// source directory structure. Directories are created as needed. Returns
/// the path written.
pub fn write_suite(
    suite: &Suite,
    renderer: &dyn Renderer,
    output_root: &Path,
) -> Result<PathBuf> {
    let source = sanitized(Path::new(&suite.file_path));
    let dir = match source.parent() {
        Some(parent) => output_root.join(parent),
        None => output_root.to_path_buf(),
    };
    fs::create_dir_all(&dir)
        .with_context(|| format!("failed to create output directory: {}", dir.display()))?;

    let stem = source
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "suite".to_string());
    let out_path = dir.join(format!("{}.{}", stem, renderer.file_extension()));
    fs::write(&out_path, renderer.render(suite))
        .with_context(|| format!("failed to write {}", out_path.display()))?;
    Ok(out_path)
}

/// Keep only normal path components so absolute or dotted source paths
/// cannot place output outside the output root.
fn sanitized(path: &Path) -> PathBuf {
    path.components()
        .filter(|c| matches!(c, Component::Normal(_)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renderer_dispatch() {
        assert_eq!(
            create_renderer("markdown", "x").unwrap().file_extension(),
            "md"
        );
        assert_eq!(create_renderer("md", "x").unwrap().file_extension(), "md");
        assert_eq!(
            create_renderer("json", "x").unwrap().file_extension(),
            "json"
        );
        assert!(create_renderer("yaml", "x").is_err());
    }

    #[test]
    fn sanitized_strips_escapes() {
        assert_eq!(
            sanitized(Path::new("/abs/e2e/app.spec.ts")),
            PathBuf::from("abs/e2e/app.spec.ts")
        );
        assert_eq!(
            sanitized(Path::new("../up/x.spec.ts")),
            PathBuf::from("up/x.spec.ts")
        );
        assert_eq!(
            sanitized(Path::new("e2e/app.spec.ts")),
            PathBuf::from("e2e/app.spec.ts")
        );
    }

    #[test]
    fn writes_into_mirrored_directory() {
        let tmp = tempfile::tempdir().unwrap();
        let suite = Suite {
            name: "S".into(),
            file_path: "e2e/feature-b/app2.spec.ts".into(),
            ..Default::default()
        };
        let renderer = markdown::MarkdownRenderer::new("test");
        let path = write_suite(&suite, &renderer, tmp.path()).unwrap();
        assert_eq!(path, tmp.path().join("e2e/feature-b/app2.spec.md"));
        assert!(path.is_file());
    }
}
