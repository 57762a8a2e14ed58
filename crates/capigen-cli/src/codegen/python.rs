//! Python ctypes interface generation (`ffi.py`).

use capigen_core::{CType, Dim, Enum, Function, ManualBlock, Model, Registry};
use tracing::debug;

use super::types::{self, TypeTable};
use super::{
    CodegenError, Emitter, GeneratedFile, apply_template, banner, check_handle_references,
    check_manual_block,
};

const TARGET: &str = "python";

mod templates {
    pub const HEADER: &str = include_str!("../../templates/python/header.py");
}

/// Emits `ffi.py`.
pub struct PythonEmitter<'a> {
    registry: &'a Registry,
    manual: &'a ManualBlock,
    types: TypeTable,
    numpy: TypeTable,
}

impl<'a> PythonEmitter<'a> {
    pub fn new(registry: &'a Registry) -> Self {
        Self {
            registry,
            manual: registry.manual_block(TARGET),
            types: TypeTable::new(TARGET, types::PYTHON, registry),
            numpy: TypeTable::fixed("numpy", types::NUMPY),
        }
    }

    fn ndpointer(&self, ty: &CType) -> Result<String, CodegenError> {
        Ok(format!(
            "ndpointer({}, flags=\"C_CONTIGUOUS\", ndim={})",
            self.numpy.get(ty.name())?,
            ty.dims().len()
        ))
    }

    /// ctypes expression for a parameter or return type.
    pub fn convert(&self, ty: &CType) -> Result<String, CodegenError> {
        match ty {
            CType::String(_) => Ok("c_char_p".to_string()),
            CType::Array(_) | CType::PtrToArray(_) if ty.name() == "char" => {
                Ok("POINTER(c_char_p)".to_string())
            }
            // Rows the caller allocates travel like any other numpy array
            CType::PtrToArray(_) if ty.indirection() == 1 => self.ndpointer(ty),
            CType::PtrToArray(_) => Ok(format!("POINTER(POINTER({}))", self.types.get(ty.name())?)),
            CType::Array(_) if ty.unknown_dims() => self.ndpointer(ty),
            CType::Array(_) => {
                // Innermost dimension wraps the element type first
                let element = self.types.get(ty.name())?.to_string();
                Ok(ty.dims().iter().rev().fold(element, |inner, dim| match dim {
                    Dim::Fixed(n) => format!("ARRAY({inner}, {n})"),
                    Dim::Unknown => inner,
                }))
            }
            CType::Scalar(scalar) if scalar.is_ptr => {
                if ty.is_void_ptr() {
                    Ok("c_void_p".to_string())
                } else {
                    Ok(format!("POINTER({})", self.types.get(ty.name())?))
                }
            }
            CType::Scalar(_) => Ok(self.types.get(ty.name())?.to_string()),
        }
    }

    fn render_enum(&self, e: &Enum) -> String {
        let mut code = format!("\n\nclass {}(c_int):\n", e.name());
        for (name, value) in e.values() {
            code.push_str(&format!("    {name} = {value}\n"));
        }
        code
    }

    fn render_function(&self, function: &Function) -> Result<String, CodegenError> {
        let argtypes = function
            .args()
            .iter()
            .map(|arg| self.convert(&arg.ty))
            .collect::<Result<Vec<_>, _>>()?
            .join(", ");
        let restype = self.convert(function.rettype())?;
        let name = function.name();

        let mut code = format!(
            "\n    # Function \"{name}\", at {coord}\n    \
             c_lib.{name}.argtypes = [{argtypes}]\n    \
             c_lib.{name}.restype = {restype}\n",
            coord = function.coord(),
        );
        if function.rettype().name() == self.registry.status_type {
            code.push_str(&format!(
                "    c_lib.{name}.errcheck = _check_return_code\n"
            ));
        }

        Ok(code)
    }
}

impl Emitter for PythonEmitter<'_> {
    fn render(&self, model: &Model) -> Result<Vec<GeneratedFile>, CodegenError> {
        check_manual_block(TARGET, &self.manual.functions_block, &self.manual.functions)?;
        check_manual_block(TARGET, &self.manual.types_block, self.manual.types.values())?;
        check_handle_references(TARGET, self.manual, self.registry)?;

        let mut code = String::from("# -*- coding: utf-8 -*-\n");
        code.push_str(&banner("#", "This file contains the Python ctypes interface to the C API"));
        code.push_str(&apply_template(
            templates::HEADER,
            &[("module-name", &self.registry.module_name)],
        ));

        for e in model.enums() {
            code.push_str(&self.render_enum(e));
        }

        for handle in &self.registry.handle_types {
            code.push_str(&format!("\n\nclass {handle}(Structure):\n    pass\n"));
        }

        code.push('\n');
        code.push_str(&self.manual.types_block);

        code.push_str("\n\ndef set_interface(c_lib):\n");
        code.push_str(&self.manual.functions_block);
        if self.manual.functions_block.is_empty() && model.functions().is_empty() {
            code.push_str("    pass\n");
        }

        for function in model.functions() {
            if self.manual.functions.iter().any(|f| f == function.name()) {
                debug!(name = function.name(), "declared manually");
                continue;
            }
            code.push_str(&self.render_function(function)?);
        }

        Ok(vec![GeneratedFile::new("ffi.py", code)])
    }
}
