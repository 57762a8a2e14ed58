//! `capigen generate`: header → binding files.

use anyhow::{Context, Result};
use capigen_core::{Model, Preprocessor, Registry, load_header};
use std::path::{Path, PathBuf};
use tracing::info;

use crate::codegen::{self, BindingKind};

/// Generate bindings of `kind` for `header` into `output_dir`.
pub fn run(header: &Path, kind: BindingKind, output_dir: &Path, registry: &Registry) -> Result<()> {
    let model = load(header, registry)?;
    let written = write_bindings(&model, kind, registry, output_dir)?;

    for path in &written {
        println!("Generated {}", path.display());
    }

    Ok(())
}

/// Preprocess, parse and extract the model of `header`.
pub fn load(header: &Path, registry: &Registry) -> Result<Model> {
    let preprocessor = Preprocessor::detect().context("Failed to find a C preprocessor")?;

    load_header(header, registry, &preprocessor)
        .with_context(|| format!("Failed to read C API from {header:?}"))
}

/// Render every file first, then write them all.
fn write_bindings(
    model: &Model,
    kind: BindingKind,
    registry: &Registry,
    output_dir: &Path,
) -> Result<Vec<PathBuf>> {
    info!(%kind, "rendering bindings");

    let files = codegen::emitter(kind, registry)
        .render(model)
        .with_context(|| format!("Failed to generate {kind} bindings"))?;

    codegen::write_files(output_dir, &files)?;

    Ok(files.iter().map(|f| output_dir.join(&f.path)).collect())
}
