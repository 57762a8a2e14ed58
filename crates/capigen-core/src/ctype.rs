//! Canonical, target-independent description of C types.

use serde::Serialize;
use std::fmt;

/// Name of the C character type; pointers to it are strings.
pub const CHAR: &str = "char";

/// Name of the C `void` type.
pub const VOID: &str = "void";

/// One array dimension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Dim {
    /// Size known from the header.
    Fixed(u64),
    /// Size only known at runtime.
    Unknown,
}

impl fmt::Display for Dim {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Dim::Fixed(n) => write!(f, "{n}"),
            Dim::Unknown => f.write_str("?"),
        }
    }
}

/// A scalar or string type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Scalar {
    pub name: String,
    pub is_const: bool,
    pub is_ptr: bool,
}

/// An array, or a pointer to rows of array data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Array {
    pub name: String,
    pub is_const: bool,
    pub dims: Vec<Dim>,
    /// Pointers declared in front of the rows: 0 for arrays, 1 for
    /// `T (*x)[N]`, 2 for `T (**x)[N]` and `T **x`.
    pub indirection: u8,
}

/// Canonical type of an argument or return value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CType {
    Scalar(Scalar),
    /// `char*`, `const char*`
    String(Scalar),
    /// Caller-provided array, passed as a pointer to its first element.
    Array(Array),
    /// Pointer to rows of runtime-known count. With one level of
    /// indirection the caller provides the rows; with two the library
    /// hands out a view of rows it owns.
    PtrToArray(Array),
}

impl CType {
    pub fn scalar(name: impl Into<String>, is_const: bool) -> Self {
        CType::Scalar(Scalar {
            name: name.into(),
            is_const,
            is_ptr: false,
        })
    }

    pub fn pointer(name: impl Into<String>, is_const: bool) -> Self {
        CType::Scalar(Scalar {
            name: name.into(),
            is_const,
            is_ptr: true,
        })
    }

    pub fn string(is_const: bool) -> Self {
        CType::String(Scalar {
            name: CHAR.to_string(),
            is_const,
            is_ptr: true,
        })
    }

    pub fn array(name: impl Into<String>, is_const: bool, dims: Vec<Dim>) -> Self {
        CType::Array(Array {
            name: name.into(),
            is_const,
            dims,
            indirection: 0,
        })
    }

    /// `T (*x)[N]`: rows provided by the caller.
    pub fn ptr_to_array(name: impl Into<String>, is_const: bool, dims: Vec<Dim>) -> Self {
        CType::PtrToArray(Array {
            name: name.into(),
            is_const,
            dims,
            indirection: 1,
        })
    }

    /// `T (**x)[N]` or `T **x`: a view of library-owned rows.
    pub fn ptr_to_rows_view(name: impl Into<String>, is_const: bool, dims: Vec<Dim>) -> Self {
        CType::PtrToArray(Array {
            name: name.into(),
            is_const,
            dims,
            indirection: 2,
        })
    }

    /// Base type name, e.g. `double` for `const double (*)[3]`.
    pub fn name(&self) -> &str {
        match self {
            CType::Scalar(s) | CType::String(s) => &s.name,
            CType::Array(a) | CType::PtrToArray(a) => &a.name,
        }
    }

    pub fn is_const(&self) -> bool {
        match self {
            CType::Scalar(s) | CType::String(s) => s.is_const,
            CType::Array(a) | CType::PtrToArray(a) => a.is_const,
        }
    }

    /// Whether the value crosses the ABI as a pointer. Always true for arrays.
    pub fn is_ptr(&self) -> bool {
        match self {
            CType::Scalar(s) | CType::String(s) => s.is_ptr,
            CType::Array(_) | CType::PtrToArray(_) => true,
        }
    }

    pub fn dims(&self) -> &[Dim] {
        match self {
            CType::Scalar(_) | CType::String(_) => &[],
            CType::Array(a) | CType::PtrToArray(a) => &a.dims,
        }
    }

    /// Pointers declared in front of the data. Scalar pointers count as one.
    pub fn indirection(&self) -> u8 {
        match self {
            CType::Scalar(s) | CType::String(s) => u8::from(s.is_ptr),
            CType::Array(a) | CType::PtrToArray(a) => a.indirection,
        }
    }

    pub fn unknown_dims(&self) -> bool {
        self.dims().contains(&Dim::Unknown)
    }

    /// `void` by value, which only appears as a return type or in `(void)`.
    pub fn is_void(&self) -> bool {
        matches!(self, CType::Scalar(s) if s.name == VOID && !s.is_ptr)
    }

    /// Untyped `void*`.
    pub fn is_void_ptr(&self) -> bool {
        matches!(self, CType::Scalar(s) if s.name == VOID && s.is_ptr)
    }
}

impl fmt::Display for CType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_const() {
            f.write_str("const ")?;
        }
        f.write_str(self.name())?;
        match self {
            CType::Scalar(s) | CType::String(s) => {
                if s.is_ptr {
                    f.write_str("*")?;
                }
            }
            CType::Array(a) => {
                for dim in &a.dims {
                    write!(f, "[{dim}]")?;
                }
            }
            CType::PtrToArray(a) => {
                let stars = "*".repeat(usize::from(a.indirection));
                match a.dims.get(1) {
                    Some(Dim::Fixed(width)) => write!(f, "({stars})[{width}]")?,
                    _ => f.write_str(&stars)?,
                }
            }
        }
        Ok(())
    }
}
