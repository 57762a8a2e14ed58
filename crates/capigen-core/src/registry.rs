//! Closed-world tables describing the library whose header is processed.
//!
//! Everything the header cannot tell us by itself lives here: which typedef
//! names are object handles, which logical name each anonymous enum has, which
//! pointer parameters may be NULL, and the hand-written declarations each
//! binding target needs. The built-in tables describe the chemfiles C API; a
//! TOML file with the same keys replaces them.

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

use crate::error::RegistryError;

/// A parameter that accepts NULL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptionalParam {
    pub function: String,
    pub parameter: String,
}

/// Declarations written by hand for one binding target, for the parts of
/// the API the generator cannot derive from the header.
///
/// ```toml
/// [manual.python]
/// types = { mol_vec3 = "mol_vec3" }
/// types_block = "mol_vec3 = ARRAY(c_double, 3)\n"
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ManualBlock {
    /// Functions declared in `functions_block` instead of from the header.
    pub functions: Vec<String>,

    /// Target code declaring `functions`.
    pub functions_block: String,

    /// Hand-defined C type name → target token.
    pub types: BTreeMap<String, String>,

    /// Token for a pointer to a hand-defined type, where the target's own
    /// pointer spelling does not apply.
    pub pointer_types: BTreeMap<String, String>,

    /// Target code defining the tokens of `types` and `pointer_types`.
    pub types_block: String,
}

impl ManualBlock {
    /// Identifiers in either block spelled like handle types: upper case
    /// words joined by `_`, such as `CHFL_TRAJECTORY`.
    pub fn handle_references(&self) -> Vec<&str> {
        let mut names: Vec<&str> = Vec::new();
        let words = [&self.types_block, &self.functions_block]
            .into_iter()
            .flat_map(|block| block.split(|c: char| !(c.is_ascii_alphanumeric() || c == '_')));
        for word in words {
            let spelled_like_handle = word.starts_with(|c: char| c.is_ascii_uppercase())
                && word.contains('_')
                && word
                    .chars()
                    .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit() || c == '_');
            if spelled_like_handle && !names.contains(&word) {
                names.push(word);
            }
        }
        names
    }
}

static NO_MANUAL_BLOCK: ManualBlock = ManualBlock {
    functions: Vec::new(),
    functions_block: String::new(),
    types: BTreeMap::new(),
    pointer_types: BTreeMap::new(),
    types_block: String::new(),
};

mod chemfiles {
    pub const PYTHON_TYPES: &str = include_str!("../manual/chemfiles/types.py");
    pub const PYTHON_FUNCTIONS: &str = include_str!("../manual/chemfiles/functions.py");
    pub const JS_TYPES: &str = include_str!("../manual/chemfiles/types.d.ts");
}

/// Static configuration for one C library.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Registry {
    /// Prefix shared by all object handle type names, e.g. `CHFL_`.
    pub handle_prefix: String,

    /// Object handle type names, in emission order.
    pub handle_types: Vec<String>,

    /// First enumerator name → logical enum name.
    pub enum_names: BTreeMap<String, String>,

    /// Parameters flagged as optional. Never inferred from the header.
    pub optional_params: Vec<OptionalParam>,

    /// Typedef names of callback types. Their function declarators are
    /// not functions of the library.
    pub callback_typedefs: Vec<String>,

    /// Base types allowed behind two levels of pointers.
    pub pointer_to_pointer_bases: Vec<String>,

    /// Return type signalling a status code.
    pub status_type: String,

    /// Name of the generated host module (JS target).
    pub module_name: String,

    /// Binding target (`python`, `js`) → hand-written declarations.
    pub manual: BTreeMap<String, ManualBlock>,
}

fn pairs(entries: &[(&str, &str)]) -> BTreeMap<String, String> {
    entries
        .iter()
        .map(|(key, value)| (key.to_string(), value.to_string()))
        .collect()
}

static CHEMFILES: Lazy<Registry> = Lazy::new(|| {
    let enum_names = [
        ("CHFL_SUCCESS", "chfl_status"),
        ("CHFL_CELL_ORTHORHOMBIC", "chfl_cellshape"),
        ("CHFL_PROPERTY_BOOL", "chfl_property_kind"),
        ("CHFL_BOND_UNKNOWN", "chfl_bond_order"),
    ];
    let optional_params = [
        ("chfl_frame_add_atom", "velocity"),
        ("chfl_residue", "resid"),
    ];
    let python = ManualBlock {
        functions: vec!["chfl_free".to_string(), "chfl_trajectory_close".to_string()],
        functions_block: chemfiles::PYTHON_FUNCTIONS.to_string(),
        types: pairs(&[
            ("chfl_vector3d", "chfl_vector3d"),
            ("chfl_match", "chfl_match"),
            ("chfl_format_metadata", "chfl_format_metadata"),
            ("chfl_warning_callback", "chfl_warning_callback"),
        ]),
        pointer_types: BTreeMap::new(),
        types_block: chemfiles::PYTHON_TYPES.to_string(),
    };
    let js = ManualBlock {
        functions: Vec::new(),
        functions_block: String::new(),
        types: pairs(&[
            ("chfl_vector3d", "chfl_vector3d"),
            ("chfl_match", "chfl_match"),
            ("chfl_format_metadata", "chfl_format_metadata"),
            ("chfl_warning_callback", "number"),
        ]),
        // Already a pointer to the first coordinate
        pointer_types: pairs(&[("chfl_vector3d", "chfl_vector3d")]),
        types_block: chemfiles::JS_TYPES.to_string(),
    };

    Registry {
        handle_prefix: "CHFL_".to_string(),
        handle_types: [
            "CHFL_TRAJECTORY",
            "CHFL_CELL",
            "CHFL_ATOM",
            "CHFL_FRAME",
            "CHFL_TOPOLOGY",
            "CHFL_SELECTION",
            "CHFL_RESIDUE",
            "CHFL_PROPERTY",
        ]
        .into_iter()
        .map(String::from)
        .collect(),
        enum_names: pairs(&enum_names),
        optional_params: optional_params
            .into_iter()
            .map(|(function, parameter)| OptionalParam {
                function: function.to_string(),
                parameter: parameter.to_string(),
            })
            .collect(),
        callback_typedefs: vec!["chfl_warning_callback".to_string()],
        pointer_to_pointer_bases: ["chfl_vector3d", "chfl_format_metadata", "char"]
            .into_iter()
            .map(String::from)
            .collect(),
        status_type: "chfl_status".to_string(),
        module_name: "Chemfiles".to_string(),
        manual: [("python".to_string(), python), ("js".to_string(), js)]
            .into_iter()
            .collect(),
    }
});

impl Default for Registry {
    fn default() -> Self {
        Self::builtin().clone()
    }
}

impl Registry {
    /// The built-in chemfiles tables.
    pub fn builtin() -> &'static Registry {
        &CHEMFILES
    }

    /// Load a registry from a TOML file. Missing keys keep their built-in value.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, RegistryError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| RegistryError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        Self::from_toml(&content)
    }

    /// Parse a registry from TOML text.
    pub fn from_toml(content: &str) -> Result<Self, RegistryError> {
        let registry: Registry = toml::from_str(content)?;
        registry.validate()?;
        Ok(registry)
    }

    /// Check the tables agree with each other.
    pub fn validate(&self) -> Result<(), RegistryError> {
        if self.handle_prefix.is_empty() {
            return Err(RegistryError::Invalid(
                "handle_prefix cannot be empty".to_string(),
            ));
        }

        for handle in &self.handle_types {
            if !handle.starts_with(&self.handle_prefix) {
                return Err(RegistryError::Invalid(format!(
                    "handle type '{handle}' does not start with '{}'",
                    self.handle_prefix
                )));
            }
        }

        if self.module_name.is_empty() {
            return Err(RegistryError::Invalid(
                "module_name cannot be empty".to_string(),
            ));
        }

        for (target, block) in &self.manual {
            if let Some(name) = block
                .handle_references()
                .into_iter()
                .find(|name| !self.is_handle_type(name))
            {
                return Err(RegistryError::Invalid(format!(
                    "manual {target} block uses '{name}', which is not a handle type"
                )));
            }
        }

        Ok(())
    }

    pub fn is_handle_type(&self, name: &str) -> bool {
        self.handle_types.iter().any(|h| h == name)
    }

    /// Logical enum name registered for a first enumerator.
    pub fn enum_name(&self, first_enumerator: &str) -> Option<&str> {
        self.enum_names.get(first_enumerator).map(String::as_str)
    }

    /// Logical enum names, deduplicated, in table order.
    pub fn enum_type_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = Vec::new();
        for name in self.enum_names.values() {
            if !names.contains(&name.as_str()) {
                names.push(name);
            }
        }
        names
    }

    pub fn is_optional(&self, function: &str, parameter: &str) -> bool {
        self.optional_params
            .iter()
            .any(|p| p.function == function && p.parameter == parameter)
    }

    pub fn is_callback_typedef(&self, name: &str) -> bool {
        self.callback_typedefs.iter().any(|c| c == name)
    }

    pub fn allows_pointer_to_pointer(&self, base: &str) -> bool {
        self.pointer_to_pointer_bases.iter().any(|b| b == base)
    }

    /// Hand-written declarations for a binding target; empty when the
    /// registry has none.
    pub fn manual_block(&self, target: &str) -> &ManualBlock {
        self.manual.get(target).unwrap_or(&NO_MANUAL_BLOCK)
    }

    /// Name of the untyped pointer all handle types derive from, e.g. `CHFL_PTR`.
    pub fn pointer_type(&self) -> String {
        format!("{}PTR", self.handle_prefix)
    }

}
