#![allow(non_snake_case)]

use super::*;

const FRAME_H: &str = r#"
typedef enum {
    CHFL_SUCCESS = 0,
    CHFL_MEMORY_ERROR = 1,
    CHFL_FORMAT_ERROR,
} chfl_status;

typedef struct CHFL_FRAME CHFL_FRAME;
typedef struct CHFL_ATOM CHFL_ATOM;
typedef double chfl_vector3d[3];
typedef void (*chfl_warning_callback)(const char* message);

CHFL_FRAME* chfl_frame(void);
chfl_status chfl_frame_atoms_count(const CHFL_FRAME* frame, uint64_t* count);
chfl_status chfl_frame_positions(CHFL_FRAME* frame, chfl_vector3d** positions, uint64_t* size);
chfl_status chfl_frame_add_atom(CHFL_FRAME* frame, const CHFL_ATOM* atom, const chfl_vector3d position, const chfl_vector3d velocity);
chfl_status chfl_set_warning_callback(chfl_warning_callback callback);
"#;

fn model() -> Model {
    let pre = Preprocessed::from_source("chemfiles.h", FRAME_H);
    load_source(&pre, Registry::builtin()).expect("header should load")
}

#[test]
fn load_source___chemfiles_excerpt___extracts_enums_and_functions() {
    let model = model();

    assert_eq!(model.enums().len(), 1);
    assert_eq!(model.enums()[0].name(), "chfl_status");

    let names: Vec<_> = model.functions().iter().map(Function::name).collect();
    assert_eq!(
        names,
        vec![
            "chfl_frame",
            "chfl_frame_atoms_count",
            "chfl_frame_positions",
            "chfl_frame_add_atom",
            "chfl_set_warning_callback",
        ]
    );
}

#[test]
fn load_source___default_constructor___has_no_member_name() {
    let model = model();
    let frame = model.function("chfl_frame").expect("chfl_frame");

    assert!(frame.is_void_fun());
    assert!(frame.is_constructor());
    assert_eq!(frame.typename(), Some("CHFL_FRAME"));
    assert_eq!(frame.member_name(), None);
}

#[test]
fn load_source___pointer_to_pointer___on_allowlisted_base() {
    let model = model();
    let positions = model.function("chfl_frame_positions").expect("positions");

    assert_eq!(
        positions.args()[1].ty,
        CType::ptr_to_rows_view("chfl_vector3d", false, vec![Dim::Unknown, Dim::Unknown])
    );
    assert_eq!(positions.member_name(), Some("positions"));
}

#[test]
fn load_source___optional_parameter___comes_from_registry() {
    let model = model();
    let add_atom = model.function("chfl_frame_add_atom").expect("add_atom");

    let optional: Vec<_> = add_atom.args().iter().map(|a| a.is_optional).collect();
    assert_eq!(optional, vec![false, false, false, true]);
}

#[test]
fn load_source___callback_typedef___is_not_a_function() {
    let model = model();

    assert!(model.function("chfl_warning_callback").is_none());
    let setter = model
        .function("chfl_set_warning_callback")
        .expect("setter");
    assert_eq!(
        setter.args()[0].ty,
        CType::scalar("chfl_warning_callback", false)
    );
}

#[test]
fn load_source___unregistered_enum___is_an_error() {
    let pre = Preprocessed::from_source("other.h", "typedef enum { OTHER_A } other;\n");

    let error = load_source(&pre, Registry::builtin()).expect_err("should fail");

    assert!(matches!(
        error,
        Error::Extract(ExtractError::UnregisteredEnum { .. })
    ));
}

#[test]
fn load_source___syntax_error___is_a_frontend_error() {
    let pre = Preprocessed::from_source("broken.h", "int (;\n");

    let error = load_source(&pre, Registry::builtin()).expect_err("should fail");

    assert!(matches!(error, Error::Frontend(FrontendError::Syntax(_))));
}
