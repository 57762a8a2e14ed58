#![allow(non_snake_case)]

use super::*;
use crate::ast::{ArraySize, Coord, Declarator, EnumeratorDecl, Node, Param, Signature};
use crate::ctype::{CType, Dim};

fn enum_node(names: &[(&str, Option<&str>)]) -> Node {
    Node::Enum(EnumDecl {
        tag: None,
        coord: Coord::new("chemfiles.h", 10),
        enumerators: names
            .iter()
            .map(|(name, value)| EnumeratorDecl {
                name: name.to_string(),
                value: value.map(str::to_string),
            })
            .collect(),
    })
}

fn function_node(name: &str, ret: Declarator, params: Vec<Param>) -> Node {
    Node::Function(FuncDecl {
        name: name.to_string(),
        coord: Coord::new("chemfiles.h", 20),
        signature: Signature {
            ret,
            params,
            variadic: false,
        },
    })
}

fn param(name: &str, ty: Declarator) -> Param {
    Param {
        name: Some(name.to_string()),
        ty,
    }
}

#[test]
fn extract_enums___registered_first_enumerator___uses_logical_name() {
    let header = Header {
        nodes: vec![enum_node(&[
            ("CHFL_SUCCESS", Some("0")),
            ("CHFL_MEMORY_ERROR", Some("1")),
        ])],
    };

    let enums = extract_enums(&header, Registry::builtin()).unwrap();

    assert_eq!(enums.len(), 1);
    assert_eq!(enums[0].name(), "chfl_status");
    assert_eq!(enums[0].enumerators()[1].name, "CHFL_MEMORY_ERROR");
}

#[test]
fn extract_enums___unregistered_first_enumerator___fails() {
    let header = Header {
        nodes: vec![enum_node(&[("MYSTERY_A", None)])],
    };

    let err = extract_enums(&header, Registry::builtin()).unwrap_err();

    assert!(matches!(err, ExtractError::UnregisteredEnum { first, .. } if first == "MYSTERY_A"));
}

#[test]
fn extract_enums___keeps_declaration_order() {
    let header = Header {
        nodes: vec![
            enum_node(&[("CHFL_BOND_UNKNOWN", None)]),
            enum_node(&[("CHFL_CELL_ORTHORHOMBIC", None)]),
        ],
    };

    let enums = extract_enums(&header, Registry::builtin()).unwrap();

    let names: Vec<&str> = enums.iter().map(|e| e.name()).collect();
    assert_eq!(names, vec!["chfl_bond_order", "chfl_cellshape"]);
}

#[test]
fn extract_functions___applies_optional_allowlist() {
    let header = Header {
        nodes: vec![function_node(
            "chfl_frame_add_atom",
            Declarator::base("chfl_status"),
            vec![
                param("frame", Declarator::pointer_to(Declarator::base("CHFL_FRAME"))),
                param("atom", Declarator::pointer_to(Declarator::const_base("CHFL_ATOM"))),
                param("position", Declarator::array_of(ArraySize::Literal(3), Declarator::const_base("double"))),
                param("velocity", Declarator::array_of(ArraySize::Literal(3), Declarator::const_base("double"))),
            ],
        )],
    };

    let functions = extract_functions(&header, Registry::builtin()).unwrap();

    let optional: Vec<bool> = functions[0].args().iter().map(|a| a.is_optional).collect();
    assert_eq!(optional, vec![false, false, false, true]);
    assert_eq!(
        functions[0].args()[3].ty,
        CType::array("double", true, vec![Dim::Fixed(3)])
    );
}

#[test]
fn extract_functions___skips_callback_typedef() {
    let header = Header {
        nodes: vec![
            function_node(
                "chfl_warning_callback",
                Declarator::base("void"),
                vec![param("message", Declarator::pointer_to(Declarator::const_base("char")))],
            ),
            function_node("chfl_version", Declarator::pointer_to(Declarator::const_base("char")), vec![]),
        ],
    };

    let functions = extract_functions(&header, Registry::builtin()).unwrap();

    assert_eq!(functions.len(), 1);
    assert_eq!(functions[0].name(), "chfl_version");
    assert_eq!(functions[0].rettype(), &CType::string(true));
}

#[test]
fn extract_functions___void_parameter_list___has_no_arguments() {
    let header = Header {
        nodes: vec![function_node(
            "chfl_last_error",
            Declarator::pointer_to(Declarator::const_base("char")),
            vec![Param {
                name: None,
                ty: Declarator::base("void"),
            }],
        )],
    };

    let functions = extract_functions(&header, Registry::builtin()).unwrap();

    assert!(functions[0].is_void_fun());
    assert!(functions[0].args().is_empty());
}

#[test]
fn extract_functions___variadic___fails() {
    let mut node = function_node("chfl_printf", Declarator::base("void"), vec![]);
    if let Node::Function(decl) = &mut node {
        decl.signature.variadic = true;
    }
    let header = Header { nodes: vec![node] };

    let result = extract_functions(&header, Registry::builtin());

    assert!(matches!(result, Err(ExtractError::Variadic { .. })));
}

#[test]
fn extract_functions___unhandled_parameter_shape___reports_function() {
    let header = Header {
        nodes: vec![function_node(
            "chfl_bad",
            Declarator::base("chfl_status"),
            vec![param(
                "data",
                Declarator::pointer_to(Declarator::pointer_to(Declarator::base("double"))),
            )],
        )],
    };

    let err = extract_functions(&header, Registry::builtin()).unwrap_err();

    assert!(matches!(err, ExtractError::Type { function, .. } if function == "chfl_bad"));
}

#[test]
fn extract___builds_model_with_both_passes() {
    let header = Header {
        nodes: vec![
            enum_node(&[("CHFL_SUCCESS", None)]),
            function_node("chfl_version", Declarator::pointer_to(Declarator::const_base("char")), vec![]),
        ],
    };

    let model = extract(&header, Registry::builtin()).unwrap();

    assert_eq!(model.enums().len(), 1);
    assert_eq!(model.functions().len(), 1);
}
