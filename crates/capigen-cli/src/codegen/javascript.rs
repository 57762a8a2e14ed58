//! Emscripten/TypeScript interface generation.
//!
//! Three files are produced:
//! - `index.d.ts`: type declarations for the Emscripten module
//! - `index.js`: the enum values as plain numbers
//! - `exported.cmake`: the symbol lists passed to the Emscripten linker

use capigen_core::{CType, Enum, Function, ManualBlock, Model, Registry};

use super::types::{self, TypeTable};
use super::{
    CodegenError, Emitter, GeneratedFile, apply_template, banner, check_handle_references,
    check_manual_block,
};

const TARGET: &str = "js";

mod templates {
    pub const MANUAL_DECLARATIONS: &str = include_str!("../../templates/js/manual_declarations.d.ts");
    pub const INDEX_JS: &str = include_str!("../../templates/js/index.js");
}

/// Runtime support symbols the generated module must export.
pub const EXTRA_EXPORTED_RUNTIME_METHODS: &[&str] = &[
    "stringToUTF8",
    "UTF8ToString",
    "getValue",
    "setValue",
    "stackSave",
    "stackAlloc",
    "stackRestore",
    "addFunction",
    "FS",
];

/// TypeScript primitives, which no manual block has to declare.
const PRIMITIVES: &[&str] = &["number", "string", "boolean", "void"];

/// Emits `index.d.ts`, `index.js` and `exported.cmake`.
pub struct JsEmitter<'a> {
    registry: &'a Registry,
    manual: &'a ManualBlock,
    types: TypeTable,
}

impl<'a> JsEmitter<'a> {
    pub fn new(registry: &'a Registry) -> Self {
        Self {
            registry,
            manual: registry.manual_block(TARGET),
            types: TypeTable::new(TARGET, types::JS, registry),
        }
    }

    /// TypeScript type of a parameter or return value.
    pub fn convert(&self, ty: &CType) -> Result<String, CodegenError> {
        let name = ty.name();
        match ty {
            CType::String(_) => Ok("c_char_ptr".to_string()),
            CType::Array(_) | CType::PtrToArray(_) if name == "char" => {
                Ok("c_char_ptr_ptr".to_string())
            }
            _ if ty.is_ptr() => {
                if self.registry.is_handle_type(name) {
                    Ok(name.to_string())
                } else if ty.is_void_ptr() {
                    Ok(self.registry.pointer_type())
                } else if let Some(token) = self.manual.pointer_types.get(name) {
                    Ok(token.clone())
                } else {
                    Ok(format!("{}_ptr", self.types.get(name)?))
                }
            }
            _ => Ok(self.types.get(name)?.to_string()),
        }
    }

    /// `name: type` pairs; `uint64_t` values travel as two 32-bit halves.
    fn parameters(&self, function: &Function) -> Result<Vec<String>, CodegenError> {
        let mut params = Vec::new();
        for (i, arg) in function.args().iter().enumerate() {
            let name = arg.name_or(i);
            if !arg.ty.is_ptr() && arg.ty.name() == "uint64_t" {
                params.push(format!("{name}_lo: number"));
                params.push(format!("{name}_hi: number"));
            } else {
                params.push(format!("{name}: {}", self.convert(&arg.ty)?));
            }
        }
        Ok(params)
    }

    fn module_interface(&self) -> String {
        format!("{}Module", self.registry.module_name)
    }

    fn render_dts(&self, model: &Model) -> Result<String, CodegenError> {
        let module = self.registry.module_name.as_str();
        let pointer = self.registry.pointer_type();
        let pointer_tag = format!("{} pointer", module.to_lowercase());

        let mut code = banner("//", "This file contains the emscripten/typescript interface to the C API");
        code.push('\n');
        code.push_str(&apply_template(
            templates::MANUAL_DECLARATIONS,
            &[
                ("module-name", module),
                ("pointer-type", &pointer),
                ("pointer-tag", &pointer_tag),
                ("library-declarations", &self.manual.types_block),
            ],
        ));
        code.push('\n');

        for handle in &self.registry.handle_types {
            code.push_str(&format!(
                "export type {handle} = {pointer} & {{ readonly [tag]: '{handle}' }};\n"
            ));
        }

        for e in model.enums() {
            code.push_str(&render_enum_types(e));
        }

        code.push_str(&format!(
            "\nexport interface {} extends EmscriptenModule {{\n",
            self.module_interface()
        ));
        code.push_str(&self.manual.functions_block);
        for function in model.functions() {
            if self.manual.functions.iter().any(|f| f == function.name()) {
                continue;
            }
            let params = self.parameters(function)?.join(", ");
            let restype = self.convert(function.rettype())?;
            code.push_str(&format!(
                "    // '{name}' at {coord}\n    _{name}({params}): {restype};\n",
                name = function.name(),
                coord = function.coord(),
            ));
        }
        code.push_str("}\n");

        Ok(code)
    }

    fn render_index_js(&self, model: &Model) -> String {
        let module = self.registry.module_name.as_str();
        let library = format!("lib{}", module.to_lowercase());

        let mut code = banner("//", "This file contains the enum values of the C API");
        code.push('\n');
        code.push_str(&apply_template(
            templates::INDEX_JS,
            &[("module-name", module), ("library-name", &library)],
        ));

        for e in model.enums() {
            code.push_str(&format!("    // {} values\n", e.name()));
            for (name, value) in e.values() {
                code.push_str(&format!("    {name}: {value},\n"));
            }
        }
        code.push_str("};\n");

        code
    }

    fn render_cmake(&self, model: &Model) -> String {
        let functions = model
            .functions()
            .iter()
            .map(|f| format!("'_{}'", f.name()))
            .collect::<Vec<_>>()
            .join(", ");
        let methods = EXTRA_EXPORTED_RUNTIME_METHODS
            .iter()
            .map(|m| format!("'{m}'"))
            .collect::<Vec<_>>()
            .join(", ");

        let mut code = banner("#", "This file contains the functions exported by emscripten");
        code.push_str(&format!("set(EXPORTED_FUNCTIONS\n\"{functions}\"\n)\n"));
        code.push_str(&format!(
            "set(EXTRA_EXPORTED_RUNTIME_METHODS\n\"{methods}\"\n)\n"
        ));
        code
    }
}

/// Tagged number type, pointer type and one constant per enumerator.
fn render_enum_types(e: &Enum) -> String {
    let name = e.name();
    let mut code = format!(
        "export type {name} = number & {{ readonly [tag]: '{name}' }};\n\
         type {name}_ptr = POINTER & {{ readonly [tag]: '{name} pointer' }};\n"
    );
    for enumerator in e.enumerators() {
        code.push_str(&format!(
            "export declare const {}: {name};\n",
            enumerator.name
        ));
    }
    code
}

impl Emitter for JsEmitter<'_> {
    fn render(&self, model: &Model) -> Result<Vec<GeneratedFile>, CodegenError> {
        check_manual_block(
            TARGET,
            templates::MANUAL_DECLARATIONS,
            EXTRA_EXPORTED_RUNTIME_METHODS,
        )?;
        check_manual_block(TARGET, &self.manual.functions_block, &self.manual.functions)?;
        let declared = self
            .manual
            .types
            .values()
            .chain(self.manual.pointer_types.values())
            .filter(|token| !PRIMITIVES.contains(&token.as_str()));
        check_manual_block(TARGET, &self.manual.types_block, declared)?;
        check_handle_references(TARGET, self.manual, self.registry)?;

        Ok(vec![
            GeneratedFile::new("index.d.ts", self.render_dts(model)?),
            GeneratedFile::new("index.js", self.render_index_js(model)),
            GeneratedFile::new("exported.cmake", self.render_cmake(model)),
        ])
    }
}

#[cfg(test)]
#[path = "javascript/javascript_tests.rs"]
mod javascript_tests;
