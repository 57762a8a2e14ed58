//! capigen-core - C header model for binding generation
//!
//! This crate turns a C API header into a language-neutral model:
//! - [`preprocess`] runs the system C preprocessor with stand-in includes
//! - [`frontend`] parses the result into a raw [`Header`]
//! - [`classify()`] maps each declarator to a canonical [`CType`]
//! - [`extract()`] builds the [`Model`] of enums and functions
//!
//! Names that are specific to one C library live in a [`Registry`].

pub mod ast;
pub mod classify;
pub mod ctype;
pub mod error;
pub mod extract;
pub mod frontend;
pub mod model;
pub mod preprocess;
pub mod registry;

use std::path::Path;
use tracing::info;

pub use ast::{Coord, Header};
pub use classify::classify;
pub use ctype::{CType, Dim};
pub use error::{ClassifyError, Error, ExtractError, FrontendError, RegistryError, Result};
pub use extract::extract;
pub use model::{Argument, Enum, Enumerator, Function, Model};
pub use preprocess::{Preprocessed, Preprocessor};
pub use registry::{ManualBlock, Registry};

/// Preprocess, parse and extract a header in one go.
pub fn load_header(
    header: &Path,
    registry: &Registry,
    preprocessor: &Preprocessor,
) -> Result<Model> {
    let pre = preprocessor.run(header)?;
    let model = load_source(&pre, registry)?;
    info!(header = %header.display(), "loaded header");
    Ok(model)
}

/// Parse and extract already preprocessed text.
pub fn load_source(pre: &Preprocessed, registry: &Registry) -> Result<Model> {
    let header = frontend::parse(pre)?;
    Ok(extract(&header, registry)?)
}

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{
        CType, Dim, Enum, Error, Function, Model, Preprocessed, Preprocessor, Registry, Result,
        load_header, load_source,
    };
}

#[cfg(test)]
mod lib_tests;
