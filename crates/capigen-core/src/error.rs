//! Error types for header processing

use std::path::PathBuf;
use thiserror::Error;

use crate::ast::Coord;

/// Result type alias for header processing
pub type Result<T> = std::result::Result<T, Error>;

/// A declarator shape the classifier does not handle.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ClassifyError {
    /// Shape outside the supported set, e.g. a pointer to a function
    #[error("unhandled declarator shape: {0}")]
    UnhandledShape(String),

    /// Two levels of pointers to a base type that is not allowlisted
    #[error("pointer to pointer to '{0}' is not an allowed shape")]
    PointerToPointer(String),

    /// Row width of a pointer to array that is not a literal
    #[error("row width of pointer to array must be an integer literal, got '{0}'")]
    NonLiteralRowWidth(String),
}

/// Errors raised while building the model from the raw declarations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExtractError {
    /// The first enumerator of an enum is missing from the registry
    #[error("enum at {coord} starting with '{first}' is not registered")]
    UnregisteredEnum { first: String, coord: Coord },

    /// Enum body without enumerators
    #[error("enum at {coord} has no enumerators")]
    EmptyEnum { coord: Coord },

    /// A parameter or return type could not be classified
    #[error("in '{function}' at {coord}: {source}")]
    Type {
        function: String,
        coord: Coord,
        #[source]
        source: ClassifyError,
    },

    /// A parameter follows `void`, or `void` appears twice
    #[error("function '{function}' declares a parameter after 'void'")]
    ArgumentAfterVoid { function: String },

    /// `void` follows real parameters
    #[error("function '{function}' declares 'void' after other parameters")]
    VoidAfterArguments { function: String },

    /// `...` in the parameter list
    #[error("variadic function '{function}' at {coord} is not supported")]
    Variadic { function: String, coord: Coord },
}

/// Errors raised while preprocessing and parsing the header.
#[derive(Error, Debug)]
pub enum FrontendError {
    /// No usable C compiler to run the preprocessor
    #[error("no C compiler found: {0}")]
    CompilerNotFound(String),

    /// The preprocessor could not be started
    #[error("failed to run preprocessor '{program}': {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// The preprocessor exited with an error
    #[error("preprocessing {path} failed:\n{stderr}")]
    Preprocess { path: PathBuf, stderr: String },

    /// I/O error around the preprocessor run
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The tree-sitter grammar could not be loaded
    #[error("failed to load the C grammar: {0}")]
    Language(#[from] tree_sitter::LanguageError),

    /// tree-sitter returned no tree
    #[error("the C parser produced no syntax tree")]
    NoTree,

    /// The preprocessed header does not parse
    #[error("syntax error at {0}")]
    Syntax(Coord),
}

/// Errors raised while loading a registry file.
#[derive(Error, Debug)]
pub enum RegistryError {
    /// Reading the file failed
    #[error("failed to read registry {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The file is not a valid registry
    #[error("failed to parse registry: {0}")]
    Parse(#[from] toml::de::Error),

    /// The tables are inconsistent
    #[error("invalid registry: {0}")]
    Invalid(String),
}

/// Any error from the header-to-model pipeline.
#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Frontend(#[from] FrontendError),

    #[error(transparent)]
    Extract(#[from] ExtractError),

    #[error(transparent)]
    Registry(#[from] RegistryError),
}
