//! specdoc — generate documentation from annotated spec files.
//!
//! Two modes:
//!
//! - **stdin mode**: `specdoc < e2e/app.spec.ts` renders one document to
//!   stdout.
//! - **file mode**: `specdoc 'e2e/**/*.spec.ts' -o report` writes one
//!   document per suite, mirroring the source tree under the output root.

use anyhow::{Context, Result};
use clap::Parser;
use specdoc::model::DocumentationModel;
use specdoc::parser;
use specdoc::render::{self, GENERATOR_LABEL};
use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "specdoc",
    version,
    about = "Generate documentation from annotated spec files"
)]
struct Cli {
    /// Input files (glob patterns supported). If omitted, reads from stdin.
    patterns: Vec<String>,

    /// Output directory root
    #[arg(short = 'o', long, default_value = "report")]
    output: PathBuf,

    /// Output format: markdown (default), json
    #[arg(short = 'f', long, default_value = "markdown")]
    format: String,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    if cli.patterns.is_empty() {
        return stdin_mode(&cli);
    }

    file_mode(&cli)
}

/// stdin mode: read one spec from stdin, render to stdout.
fn stdin_mode(cli: &Cli) -> Result<()> {
    let mut input = String::new();
    io::stdin()
        .read_to_string(&mut input)
        .context("failed to read stdin")?;

    let suite = parser::parse_source(&input, "stdin")?;
    let renderer = render::create_renderer(&cli.format, GENERATOR_LABEL)?;
    print!("{}", renderer.render(&suite));
    Ok(())
}

/// file mode: parse every matched file, then write one document per suite.
/// A file that fails to read or holds no suite is skipped with a warning;
/// the run still succeeds.
fn file_mode(cli: &Cli) -> Result<()> {
    let input_files = expand_globs(&cli.patterns)?;
    let renderer = render::create_renderer(&cli.format, GENERATOR_LABEL)?;

    let mut model = DocumentationModel::new();
    let mut skipped = 0usize;
    for path in &input_files {
        let text = match fs::read_to_string(path) {
            Ok(text) => text,
            Err(err) => {
                tracing::warn!(file = %path.display(), error = %err, "skipping unreadable file");
                skipped += 1;
                continue;
            }
        };
        match parser::parse_source(&text, &display_path(path)) {
            Ok(suite) => {
                model.insert(path.clone(), suite);
            }
            Err(err) => {
                tracing::warn!(file = %path.display(), %err, "skipping file");
                skipped += 1;
            }
        }
    }

    let mut written = 0usize;
    for suite in model.values() {
        match render::write_suite(suite, renderer.as_ref(), &cli.output) {
            Ok(out_path) => {
                tracing::info!(path = %out_path.display(), "generated");
                written += 1;
            }
            Err(err) => {
                tracing::error!(error = %err, file = %suite.file_path, "write failed");
            }
        }
    }

    println!(
        "Documentation generated in '{}' ({} files, {} skipped)",
        cli.output.display(),
        written,
        skipped
    );
    Ok(())
}

/// Suffix scanned for when a bare directory is given.
const SPEC_SUFFIX: &str = ".spec.ts";

/// Expand glob patterns into a sorted, deduplicated list of files.
/// Bare directories are scanned recursively for `*.spec.ts`.
fn expand_globs(patterns: &[String]) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for pattern in patterns {
        let path = Path::new(pattern);
        if path.is_file() {
            files.push(path.to_path_buf());
            continue;
        }
        let expanded = if path.is_dir() {
            format!("{}/**/*{}", pattern.trim_end_matches('/'), SPEC_SUFFIX)
        } else {
            pattern.clone()
        };
        let matches: Vec<PathBuf> = glob::glob(&expanded)
            .with_context(|| format!("invalid glob pattern: {}", expanded))?
            .filter_map(|entry| entry.ok())
            .filter(|p| p.is_file())
            .collect();
        if matches.is_empty() {
            tracing::warn!(pattern = %expanded, "no files matched");
        }
        files.extend(matches);
    }
    // Sort for deterministic output
    files.sort();
    files.dedup();
    Ok(files)
}

/// Source path as displayed in documents: relative to the working directory
/// when possible.
fn display_path(path: &Path) -> String {
    std::env::current_dir()
        .ok()
        .and_then(|cwd| path.strip_prefix(cwd).ok())
        .unwrap_or(path)
        .to_string_lossy()
        .into_owned()
}
