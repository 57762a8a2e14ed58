//! Language-neutral model of a C API: enums and functions.
//!
//! Entities are built once by the extractors and never mutated afterwards;
//! fields are private and exposed through accessors.

use serde::Serialize;

use crate::ast::Coord;
use crate::ctype::CType;
use crate::error::ExtractError;
use crate::registry::Registry;

/// A function argument.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Argument {
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub ty: CType,
    /// Set from the registry allowlist only.
    pub is_optional: bool,
}

impl Argument {
    pub fn new(name: Option<String>, ty: CType) -> Self {
        Self {
            name,
            ty,
            is_optional: false,
        }
    }

    /// Argument name, or `arg<index>` for abstract parameters.
    pub fn name_or(&self, index: usize) -> String {
        self.name.clone().unwrap_or_else(|| format!("arg{index}"))
    }
}

/// A function of the C API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Function {
    name: String,
    coord: Coord,
    args: Vec<Argument>,
    rettype: CType,
    is_void_fun: bool,
    typename: Option<String>,
    member_name: Option<String>,
    is_constructor: bool,
}

impl Function {
    /// Create a function without arguments; naming-derived metadata is
    /// computed here against the registry.
    pub fn new(name: impl Into<String>, coord: Coord, rettype: CType, registry: &Registry) -> Self {
        let name = name.into();
        let typename = typename_of(&name, registry);
        let member_name = typename
            .as_deref()
            .and_then(|typename| member_name_of(&name, typename));
        let is_constructor = rettype.name().starts_with(&registry.handle_prefix);

        Self {
            name,
            coord,
            args: Vec::new(),
            rettype,
            is_void_fun: false,
            typename,
            member_name,
            is_constructor,
        }
    }

    /// Append a declared parameter.
    ///
    /// A lone non-pointer `void` marks a function without parameters; any
    /// other parameter alongside it is rejected.
    pub fn add_arg(&mut self, arg: Argument) -> Result<(), ExtractError> {
        if self.is_void_fun {
            return Err(ExtractError::ArgumentAfterVoid {
                function: self.name.clone(),
            });
        }

        if arg.ty.is_void() {
            if !self.args.is_empty() {
                return Err(ExtractError::VoidAfterArguments {
                    function: self.name.clone(),
                });
            }
            self.is_void_fun = true;
        } else {
            self.args.push(arg);
        }

        Ok(())
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn coord(&self) -> &Coord {
        &self.coord
    }

    pub fn args(&self) -> &[Argument] {
        &self.args
    }

    pub fn rettype(&self) -> &CType {
        &self.rettype
    }

    /// True for `f(void)`.
    pub fn is_void_fun(&self) -> bool {
        self.is_void_fun
    }

    /// Handle type this function belongs to, e.g. `CHFL_FRAME` for
    /// `chfl_frame_add_atom`. `None` for free functions.
    pub fn typename(&self) -> Option<&str> {
        self.typename.as_deref()
    }

    /// Name without the `typename_` part, e.g. `add_atom`. `None` for free
    /// functions and for the default constructor (`chfl_frame`).
    pub fn member_name(&self) -> Option<&str> {
        self.member_name.as_deref()
    }

    /// True if the function returns one of the handle types.
    pub fn is_constructor(&self) -> bool {
        self.is_constructor
    }

    /// Comma-separated argument names.
    pub fn args_str(&self) -> String {
        self.args
            .iter()
            .enumerate()
            .map(|(i, arg)| arg.name_or(i))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

fn typename_of(name: &str, registry: &Registry) -> Option<String> {
    let typename = name
        .split('_')
        .take(2)
        .collect::<Vec<_>>()
        .join("_")
        .to_uppercase();

    registry.is_handle_type(&typename).then_some(typename)
}

fn member_name_of(name: &str, typename: &str) -> Option<String> {
    if name.eq_ignore_ascii_case(typename) {
        return None;
    }
    name.get(typename.len() + 1..).map(str::to_string)
}

/// One enum constant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Enumerator {
    pub name: String,
    /// Literal value expression, as written in the header.
    pub value: Option<String>,
}

/// A C enum with its logical name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Enum {
    name: String,
    enumerators: Vec<Enumerator>,
}

impl Enum {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            enumerators: Vec::new(),
        }
    }

    pub fn push(&mut self, name: impl Into<String>, value: Option<String>) {
        self.enumerators.push(Enumerator {
            name: name.into(),
            value,
        });
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn enumerators(&self) -> &[Enumerator] {
        &self.enumerators
    }

    /// Enumerator names with the value each one gets in generated code.
    ///
    /// Explicit values are kept verbatim. Enumerators without a value take
    /// the next number of a counter that starts at 0 and only advances on
    /// such enumerators, so `{A, B = 10, C}` gives `A = 0, B = 10, C = 1`.
    pub fn values(&self) -> Vec<(&str, String)> {
        let mut next = 0u64;
        self.enumerators
            .iter()
            .map(|e| {
                let value = match &e.value {
                    Some(value) => value.clone(),
                    None => {
                        let value = next.to_string();
                        next += 1;
                        value
                    }
                };
                (e.name.as_str(), value)
            })
            .collect()
    }
}

/// Everything extracted from one header.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Model {
    enums: Vec<Enum>,
    functions: Vec<Function>,
}

impl Model {
    pub fn new(enums: Vec<Enum>, functions: Vec<Function>) -> Self {
        Self { enums, functions }
    }

    pub fn enums(&self) -> &[Enum] {
        &self.enums
    }

    pub fn functions(&self) -> &[Function] {
        &self.functions
    }

    pub fn function(&self, name: &str) -> Option<&Function> {
        self.functions.iter().find(|f| f.name == name)
    }
}
