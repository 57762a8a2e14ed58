#![allow(non_snake_case)]

use super::*;
use capigen_core::{Dim, Preprocessed, load_source};
use test_case::test_case;

fn foo_registry() -> Registry {
    let mut registry = Registry::default();
    registry
        .enum_names
        .insert("FOO_A".to_string(), "foo_kind".to_string());
    registry.module_name = "Foo".to_string();
    registry
}

fn render(registry: &Registry, source: &str) -> Vec<GeneratedFile> {
    let pre = Preprocessed::from_source("foo.h", source);
    let model = load_source(&pre, registry).unwrap();
    JsEmitter::new(registry).render(&model).unwrap()
}

fn content<'a>(files: &'a [GeneratedFile], name: &str) -> &'a str {
    files
        .iter()
        .find(|f| f.path.to_str() == Some(name))
        .map(|f| f.content.as_str())
        .unwrap()
}

#[test_case(CType::string(true), "c_char_ptr" ; "string")]
#[test_case(CType::array("char", false, vec![Dim::Unknown, Dim::Unknown]), "c_char_ptr_ptr" ; "char array")]
#[test_case(CType::pointer("CHFL_FRAME", false), "CHFL_FRAME" ; "handle pointer")]
#[test_case(CType::pointer("void", true), "CHFL_PTR" ; "void pointer")]
#[test_case(CType::ptr_to_rows_view("chfl_vector3d", false, vec![Dim::Unknown, Dim::Unknown]), "chfl_vector3d" ; "vector rows")]
#[test_case(CType::ptr_to_array("uint64_t", false, vec![Dim::Unknown, Dim::Fixed(2)]), "c_uint64_ptr" ; "caller provided rows")]
#[test_case(CType::array("double", false, vec![Dim::Fixed(3)]), "c_double_ptr" ; "double array")]
#[test_case(CType::pointer("uint64_t", false), "c_uint64_ptr" ; "uint64 pointer")]
#[test_case(CType::pointer("chfl_bond_order", false), "chfl_bond_order_ptr" ; "enum pointer")]
#[test_case(CType::pointer("chfl_match", false), "chfl_match_ptr" ; "match pointer")]
#[test_case(CType::scalar("chfl_warning_callback", false), "number" ; "callback")]
#[test_case(CType::scalar("chfl_cellshape", false), "chfl_cellshape" ; "enum value")]
#[test_case(CType::scalar("double", false), "c_double" ; "double value")]
#[test_case(CType::scalar("void", false), "void" ; "void")]
fn JsEmitter___convert___maps_canonical_types(ty: CType, expected: &str) {
    let emitter = JsEmitter::new(Registry::builtin());

    assert_eq!(emitter.convert(&ty).unwrap(), expected);
}

#[test]
fn JsEmitter___convert___rejects_unknown_names() {
    let emitter = JsEmitter::new(Registry::builtin());

    let error = emitter.convert(&CType::pointer("float", false)).unwrap_err();

    assert_eq!(
        error,
        CodegenError::UnknownType {
            target: "js",
            name: "float".to_string(),
        }
    );
}

#[test]
fn JsEmitter___enum_and_function___renders_end_to_end() {
    let registry = foo_registry();

    let files = render(
        &registry,
        "typedef enum { FOO_A, FOO_B } foo_kind;\nint bar(double x);\n",
    );

    let dts = content(&files, "index.d.ts");
    assert!(dts.starts_with("// ="));
    assert!(dts.contains("AUTO-GENERATED FILE"));
    assert!(dts.contains("export declare function loadFoo(): Promise<FooModule>;"));
    assert!(dts.contains("export type foo_kind = number & { readonly [tag]: 'foo_kind' };\n"));
    assert!(dts.contains("type foo_kind_ptr = POINTER & { readonly [tag]: 'foo_kind pointer' };\n"));
    assert!(dts.contains("export declare const FOO_A: foo_kind;\nexport declare const FOO_B: foo_kind;\n"));
    assert!(dts.contains(
        "export interface FooModule extends EmscriptenModule {\n    \
         // 'bar' at foo.h:2\n    \
         _bar(x: c_double): c_int;\n}\n"
    ));

    let js = content(&files, "index.js");
    assert!(js.contains("const loadFoo = require('../../lib/libfoo');"));
    assert!(js.contains("    // foo_kind values\n    FOO_A: 0,\n    FOO_B: 1,\n};\n"));

    let cmake = content(&files, "exported.cmake");
    assert!(cmake.contains("set(EXPORTED_FUNCTIONS\n\"'_bar'\"\n)\n"));
}

#[test]
fn JsEmitter___uint64_value___splits_into_halves() {
    let files = render(
        Registry::builtin(),
        "void chfl_resize(uint64_t size, uint64_t* count);\n",
    );

    assert!(content(&files, "index.d.ts").contains(
        "_chfl_resize(size_lo: number, size_hi: number, count: c_uint64_ptr): void;"
    ));
}

#[test]
fn JsEmitter___unnamed_parameter___gets_positional_name() {
    let files = render(Registry::builtin(), "void chfl_touch(double, const char*);\n");

    assert!(content(&files, "index.d.ts").contains("_chfl_touch(arg0: c_double, arg1: c_char_ptr): void;"));
}

#[test]
fn JsEmitter___handles___get_phantom_pointer_types() {
    let files = render(Registry::builtin(), "");

    let dts = content(&files, "index.d.ts");
    assert!(dts.contains("export type CHFL_FRAME = CHFL_PTR & { readonly [tag]: 'CHFL_FRAME' };\n"));
    assert!(dts.contains("export interface ChemfilesModule extends EmscriptenModule {\n}\n"));
}

#[test]
fn JsEmitter___cmake___lists_functions_and_runtime_methods() {
    let files = render(Registry::builtin(), "void a(void);\nvoid b(void);\n");

    let cmake = content(&files, "exported.cmake");
    assert!(cmake.starts_with("# ="));
    assert!(cmake.contains("set(EXPORTED_FUNCTIONS\n\"'_a', '_b'\"\n)\n"));
    assert!(cmake.contains(
        "set(EXTRA_EXPORTED_RUNTIME_METHODS\n\"'stringToUTF8', 'UTF8ToString', 'getValue', \
         'setValue', 'stackSave', 'stackAlloc', 'stackRestore', 'addFunction', 'FS'\"\n)\n"
    ));
}

#[test]
fn JsEmitter___runtime_methods___are_declared_in_manual_block() {
    for method in EXTRA_EXPORTED_RUNTIME_METHODS {
        assert!(templates::MANUAL_DECLARATIONS.contains(method), "{method}");
    }
}

#[test]
fn JsEmitter___builtin_registry___declares_chemfiles_pointer() {
    let files = render(Registry::builtin(), "");

    let dts = content(&files, "index.d.ts");
    assert!(dts.contains("export type CHFL_PTR = POINTER & { readonly [tag]: 'chemfiles pointer' };\n"));
    assert!(dts.contains("type c_double = number;\n\ntype chfl_vector3d = c_double_ptr;\n"));
    assert!(dts.contains("type chfl_format_metadata_ptr = POINTER;\n\ntype LLVMType"));
}

#[test]
fn JsEmitter___other_registry___derives_pointer_brand_and_manual_types() {
    let registry =
        Registry::from_toml(include_str!("../../../../../registries/molcpp.toml")).unwrap();

    let files = render(
        &registry,
        "typedef struct MOL_BOX MOL_BOX;\n\
         MOL_BOX* mol_box(const mol_vec3 lengths);\n\
         void mol_free(void* object);\n",
    );

    let dts = content(&files, "index.d.ts");
    assert!(dts.contains("export type MOL_PTR = POINTER & { readonly [tag]: 'molcpp pointer' };\n"));
    assert!(dts.contains("type mol_vec3 = c_double_ptr;\n"));
    assert!(dts.contains("export type MOL_BOX = MOL_PTR & { readonly [tag]: 'MOL_BOX' };\n"));
    assert!(dts.contains("_mol_box(lengths: mol_vec3): MOL_BOX;"));
    assert!(dts.contains("_mol_free(object: MOL_PTR): void;"));
    assert!(dts.contains("export declare function loadMolcpp(): Promise<MolcppModule>;"));
    assert!(!dts.contains("CHFL"));
    assert!(!dts.contains("chfl_"));
}

#[test]
fn JsEmitter___manual_type_token_not_declared___fails() {
    let mut registry = Registry::default();
    if let Some(js) = registry.manual.get_mut("js") {
        js.types.insert("chfl_quaternion".to_string(), "chfl_quaternion".to_string());
    }

    let error = JsEmitter::new(&registry)
        .render(&Model::default())
        .unwrap_err();

    assert_eq!(
        error,
        CodegenError::MissingManualDeclaration {
            target: "js",
            symbol: "chfl_quaternion".to_string(),
        }
    );
}

#[test]
fn JsEmitter___manual_functions___replace_generated_members() {
    let mut registry = Registry::default();
    if let Some(js) = registry.manual.get_mut("js") {
        js.functions.push("chfl_free".to_string());
        js.functions_block = "    _chfl_free(object: POINTER): void;\n".to_string();
    }

    let files = render(&registry, "void chfl_free(const void* object);\n");

    let dts = content(&files, "index.d.ts");
    assert_eq!(dts.matches("_chfl_free(").count(), 1);
    assert!(!dts.contains("// 'chfl_free' at"));
    assert!(content(&files, "exported.cmake").contains("'_chfl_free'"));
}
