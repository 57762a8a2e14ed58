//! Raw declaration tree produced by the front end.
//!
//! The shapes here follow C's declarator grammar in type-derivation order:
//! `double (*x)[3]` is a [`Declarator::Pointer`] to a [`Declarator::Array`]
//! of a [`Declarator::Type`], while `double *x[3]` is an array of pointers.
//! Names are stripped from declarators; they live on the owning node.

use serde::Serialize;
use std::fmt;

/// Location of a declaration in the original (not preprocessed) sources.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Coord {
    /// Base name of the file, without directories.
    pub file: String,
    /// One-based line number.
    pub line: usize,
}

impl Coord {
    pub fn new(file: impl Into<String>, line: usize) -> Self {
        Self {
            file: file.into(),
            line,
        }
    }
}

impl fmt::Display for Coord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.file, self.line)
    }
}

/// Size expression between the brackets of an array declarator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArraySize {
    /// An integer literal, after macro expansion.
    Literal(u64),
    /// Any other expression (identifiers, arithmetic, ...).
    Expression(String),
    /// `[]`
    Unspecified,
}

/// Type shape of a declaration, outermost derivation first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Declarator {
    /// A named base type, e.g. `const double` or `unsigned int`.
    Type { names: Vec<String>, is_const: bool },
    /// Pointer to `inner`. `is_const` qualifies the pointer itself.
    Pointer { is_const: bool, inner: Box<Declarator> },
    /// Array of `inner`.
    Array { size: ArraySize, inner: Box<Declarator> },
    /// Function returning `signature.ret`.
    Function(Box<Signature>),
}

impl Declarator {
    /// Shorthand for a non-const base type.
    pub fn base(name: &str) -> Self {
        Declarator::Type {
            names: name.split_whitespace().map(str::to_string).collect(),
            is_const: false,
        }
    }

    /// Shorthand for a const-qualified base type.
    pub fn const_base(name: &str) -> Self {
        Declarator::Type {
            names: name.split_whitespace().map(str::to_string).collect(),
            is_const: true,
        }
    }

    pub fn pointer_to(inner: Declarator) -> Self {
        Declarator::Pointer {
            is_const: false,
            inner: Box::new(inner),
        }
    }

    pub fn array_of(size: ArraySize, inner: Declarator) -> Self {
        Declarator::Array {
            size,
            inner: Box::new(inner),
        }
    }

    /// Short name of the outermost derivation, used in diagnostics.
    pub fn shape(&self) -> &'static str {
        match self {
            Declarator::Type { .. } => "type",
            Declarator::Pointer { .. } => "pointer",
            Declarator::Array { .. } => "array",
            Declarator::Function(_) => "function",
        }
    }
}

/// Parameter list and return type of a function declarator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Signature {
    pub ret: Declarator,
    pub params: Vec<Param>,
    /// Whether the list ends with `...`.
    pub variadic: bool,
}

/// One declared parameter. Abstract parameters (`double*`) have no name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Param {
    pub name: Option<String>,
    pub ty: Declarator,
}

/// A function declarator found at file scope.
///
/// This covers prototypes, inline definitions, and typedefs or variables
/// whose type is a function or a pointer to a function.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FuncDecl {
    pub name: String,
    pub coord: Coord,
    pub signature: Signature,
}

/// An enum specifier with a body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumDecl {
    /// The `enum tag { ... }` tag, usually absent in `typedef enum { ... } x;`.
    pub tag: Option<String>,
    pub coord: Coord,
    pub enumerators: Vec<EnumeratorDecl>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumeratorDecl {
    pub name: String,
    /// Source text of the value expression, if any.
    pub value: Option<String>,
}

/// Top-level nodes the extractors care about.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Enum(EnumDecl),
    Function(FuncDecl),
}

/// Everything lowered from one header, in source order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Header {
    pub nodes: Vec<Node>,
}

impl Header {
    pub fn enums(&self) -> impl Iterator<Item = &EnumDecl> {
        self.nodes.iter().filter_map(|node| match node {
            Node::Enum(decl) => Some(decl),
            Node::Function(_) => None,
        })
    }

    pub fn functions(&self) -> impl Iterator<Item = &FuncDecl> {
        self.nodes.iter().filter_map(|node| match node {
            Node::Function(decl) => Some(decl),
            Node::Enum(_) => None,
        })
    }
}
