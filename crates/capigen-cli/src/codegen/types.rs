//! Per-target C type vocabularies.
//!
//! Each target maps a C base type name to exactly one token. The table is a
//! fixed set of primitive entries, the hand-written types of the registry's
//! manual block for the target, and the registry's handle and enum names,
//! which map to themselves.
//!
//! | C                  | Python       | numpy        | JS           |
//! |--------------------|--------------|--------------|--------------|
//! | `double`           | `c_double`   | `np.float64` | `c_double`   |
//! | `uint64_t`         | `c_uint64`   | `np.uint64`  | `c_uint64`   |
//! | `int64_t`          | `c_int64`    |              |              |
//! | `int`              | `c_int`      |              | `c_int`      |
//! | `bool`             | `c_bool`     | `np.bool_`   | `c_bool`     |
//! | `char`             | `c_char`     | `c_char`     | `c_char`     |
//! | `void`             | `None`       |              | `void`       |
//! | hand-written types | manual block |              | manual block |
//! | handles, enums     | same name    |              | same name    |

use capigen_core::Registry;
use std::collections::BTreeMap;

use super::CodegenError;

/// Python ctypes names.
pub const PYTHON: &[(&str, &str)] = &[
    ("double", "c_double"),
    ("uint64_t", "c_uint64"),
    ("int64_t", "c_int64"),
    ("int", "c_int"),
    ("bool", "c_bool"),
    ("char", "c_char"),
    ("void", "None"),
];

/// numpy dtypes, for arrays passed as `ndpointer`.
pub const NUMPY: &[(&str, &str)] = &[
    ("double", "np.float64"),
    ("uint64_t", "np.uint64"),
    ("bool", "np.bool_"),
    ("char", "c_char"),
];

/// TypeScript aliases declared in the JS prologue.
pub const JS: &[(&str, &str)] = &[
    ("double", "c_double"),
    ("uint64_t", "c_uint64"),
    ("int", "c_int"),
    ("bool", "c_bool"),
    ("char", "c_char"),
    ("void", "void"),
];

/// C base type name → target token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeTable {
    target: &'static str,
    entries: BTreeMap<String, String>,
}

impl TypeTable {
    /// Only the fixed entries.
    pub fn fixed(target: &'static str, fixed: &[(&str, &str)]) -> Self {
        let entries = fixed
            .iter()
            .map(|(name, token)| (name.to_string(), token.to_string()))
            .collect();
        Self { target, entries }
    }

    /// Fixed entries, then the manual block's types, then the registry's
    /// handle and enum names. Earlier entries win.
    pub fn new(target: &'static str, fixed: &[(&str, &str)], registry: &Registry) -> Self {
        let mut table = Self::fixed(target, fixed);

        for (name, token) in &registry.manual_block(target).types {
            table
                .entries
                .entry(name.clone())
                .or_insert_with(|| token.clone());
        }

        let registered = registry
            .handle_types
            .iter()
            .map(String::as_str)
            .chain(registry.enum_type_names());
        for name in registered {
            table
                .entries
                .entry(name.to_string())
                .or_insert_with(|| name.to_string());
        }

        table
    }

    /// Token for a C base type name.
    pub fn get(&self, name: &str) -> Result<&str, CodegenError> {
        self.entries
            .get(name)
            .map(String::as_str)
            .ok_or_else(|| CodegenError::UnknownType {
                target: self.target,
                name: name.to_string(),
            })
    }
}
