//! Binding generation from the extracted C API model.
//!
//! # Architecture
//!
//! ```text
//! C header
//!     ↓
//!  [capigen-core]
//!     ↓
//!   Model (enums, functions)
//!     ↓
//!  ├─→ [Python emitter] → ffi.py
//!  └─→ [JS emitter]     → index.d.ts, index.js, exported.cmake
//! ```
//!
//! Emitters render every file in memory. Files are only written once all of
//! them rendered, so a failing run leaves the output directory untouched.
//!
//! # Supported Targets
//!
//! - **python**: ctypes declarations, with numpy `ndpointer` for arrays
//! - **js**: TypeScript declarations for an Emscripten build of the library

pub mod javascript;
pub mod python;
pub mod types;

use anyhow::{Context, Result};
use capigen_core::{ManualBlock, Model, Registry};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use thiserror::Error;
use tracing::{debug, info};

pub use javascript::JsEmitter;
pub use python::PythonEmitter;

/// Errors raised while rendering bindings.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CodegenError {
    /// A C base type name has no entry in the target's table
    #[error("no {target} type for C type '{name}'")]
    UnknownType { target: &'static str, name: String },

    /// A hand-maintained symbol is used but not declared
    #[error("'{symbol}' is not declared in the {target} manual declarations")]
    MissingManualDeclaration { target: &'static str, symbol: String },

    /// The manual block uses a handle type the registry does not list
    #[error("the {target} manual declarations use '{name}', which is not a registered handle type")]
    UnregisteredHandle { target: &'static str, name: String },

    /// The binding kind given on the command line
    #[error("unknown binding kind '{0}', expected one of: python, js")]
    UnknownBindingKind(String),
}

/// Target language of a generation run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BindingKind {
    Python,
    Js,
}

impl FromStr for BindingKind {
    type Err = CodegenError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "python" => Ok(BindingKind::Python),
            "js" => Ok(BindingKind::Js),
            other => Err(CodegenError::UnknownBindingKind(other.to_string())),
        }
    }
}

impl fmt::Display for BindingKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BindingKind::Python => write!(f, "python"),
            BindingKind::Js => write!(f, "js"),
        }
    }
}

/// A rendered file, relative to the output directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedFile {
    pub path: PathBuf,
    pub content: String,
}

impl GeneratedFile {
    pub fn new(path: impl Into<PathBuf>, content: String) -> Self {
        Self {
            path: path.into(),
            content,
        }
    }
}

/// A binding target.
pub trait Emitter {
    /// Render all files for `model`, or fail without side effects.
    fn render(&self, model: &Model) -> Result<Vec<GeneratedFile>, CodegenError>;
}

/// Create the emitter for `kind`.
pub fn emitter(kind: BindingKind, registry: &Registry) -> Box<dyn Emitter + '_> {
    match kind {
        BindingKind::Python => Box::new(PythonEmitter::new(registry)),
        BindingKind::Js => Box::new(JsEmitter::new(registry)),
    }
}

/// Write rendered files below `output_dir`, creating it if needed.
pub fn write_files(output_dir: &Path, files: &[GeneratedFile]) -> Result<()> {
    fs::create_dir_all(output_dir)
        .with_context(|| format!("Failed to create directory: {output_dir:?}"))?;

    for file in files {
        let path = output_dir.join(&file.path);
        fs::write(&path, &file.content).with_context(|| format!("Failed to write {path:?}"))?;
        debug!(path = %path.display(), bytes = file.content.len(), "wrote file");
    }

    info!(count = files.len(), dir = %output_dir.display(), "bindings written");
    Ok(())
}

/// Fail unless every symbol occurs in the hand-maintained `block`.
pub fn check_manual_block<S: AsRef<str>>(
    target: &'static str,
    block: &str,
    symbols: impl IntoIterator<Item = S>,
) -> Result<(), CodegenError> {
    for symbol in symbols {
        let symbol = symbol.as_ref();
        if !block.contains(symbol) {
            return Err(CodegenError::MissingManualDeclaration {
                target,
                symbol: symbol.to_string(),
            });
        }
    }
    Ok(())
}

/// Fail if the manual block names a handle type the registry does not list.
pub fn check_handle_references(
    target: &'static str,
    manual: &ManualBlock,
    registry: &Registry,
) -> Result<(), CodegenError> {
    match manual
        .handle_references()
        .into_iter()
        .find(|name| !registry.is_handle_type(name))
    {
        Some(name) => Err(CodegenError::UnregisteredHandle {
            target,
            name: name.to_string(),
        }),
        None => Ok(()),
    }
}

/// "Do not edit" banner, with each line starting with `comment`.
pub fn banner(comment: &str, description: &str) -> String {
    let rule = "=".repeat(75);
    format!(
        "{comment} {rule}\n\
         {comment} !!!! AUTO-GENERATED FILE !!!! Do not edit. This file was generated\n\
         {comment} by capigen {version}.\n\
         {comment} {description}\n\
         {comment} {rule}\n",
        version = env!("CARGO_PKG_VERSION"),
    )
}

/// Substitute `{{module-name}}` style placeholders in a template.
pub fn apply_template(template: &str, values: &[(&str, &str)]) -> String {
    values
        .iter()
        .fold(template.to_string(), |text, (key, value)| {
            text.replace(&format!("{{{{{key}}}}}"), value)
        })
}
