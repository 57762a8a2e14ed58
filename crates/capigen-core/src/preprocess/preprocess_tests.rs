#![allow(non_snake_case)]

use super::*;
use test_case::test_case;

#[test_case("# 1 \"chemfiles.h\"", 1, "chemfiles.h" ; "gcc marker")]
#[test_case("# 42 \"/usr/include/chemfiles.h\" 1 3", 42, "/usr/include/chemfiles.h" ; "gcc marker with flags")]
#[test_case("#line 7 \"C:\\\\include\\\\chemfiles.h\"", 7, "C:\\include\\chemfiles.h" ; "msvc marker")]
fn parse_line_marker___recognizes_markers(text: &str, line: usize, file: &str) {
    assert_eq!(parse_line_marker(text), Some((line, file.to_string())));
}

#[test_case("#pragma once" ; "pragma")]
#[test_case("int x;" ; "code")]
#[test_case("# \"no-number.h\"" ; "missing line number")]
fn parse_line_marker___ignores_other_lines(text: &str) {
    assert_eq!(parse_line_marker(text), None);
}

#[test]
fn Preprocessed___from_output___maps_rows_to_original_lines() {
    let output = "\
# 1 \"/src/chemfiles.h\"
int a;
# 10 \"/src/chemfiles/types.h\" 1
double b;
double c;
# 3 \"/src/chemfiles.h\" 2
void d(void);
";

    let pre = Preprocessed::from_output(output);

    assert_eq!(pre.lines.coord(1), Coord::new("chemfiles.h", 1));
    assert_eq!(pre.lines.coord(3), Coord::new("types.h", 10));
    assert_eq!(pre.lines.coord(4), Coord::new("types.h", 11));
    assert_eq!(pre.lines.coord(6), Coord::new("chemfiles.h", 3));
}

#[test]
fn Preprocessed___from_output___blanks_marker_rows() {
    let pre = Preprocessed::from_output("# 1 \"a.h\"\nint a;\n");

    assert_eq!(pre.source, "\nint a;\n");
}

#[test]
fn Preprocessed___from_source___attributes_rows_to_file() {
    let pre = Preprocessed::from_source("test.h", "int a;\nint b;\n");

    assert_eq!(pre.source, "int a;\nint b;\n");
    assert_eq!(pre.lines.coord(0), Coord::new("test.h", 1));
    assert_eq!(pre.lines.coord(1), Coord::new("test.h", 2));
}

#[test]
fn LineMap___coord___out_of_range___is_unknown() {
    let pre = Preprocessed::from_source("test.h", "int a;\n");

    assert_eq!(pre.lines.coord(99).file, "<unknown>");
}

#[test]
fn stand_in_includes___writes_every_file() {
    let dir = stand_in_includes().unwrap();

    assert!(dir.path().join("stdint.h").is_file());
    assert!(dir.path().join("stdbool.h").is_file());
    assert!(dir.path().join("chemfiles/exports.h").is_file());
    assert!(dir.path().join("molcpp/export.hpp").is_file());
}

#[test]
fn Preprocessor___args___puts_includes_before_header() {
    let pre = Preprocessor::with_program("gcc");

    let args = pre.args(
        Path::new("/src/chemfiles.h"),
        &[Path::new("/tmp/stand-in"), Path::new("/src")],
    );

    assert_eq!(
        args,
        vec!["-E", "-nostdinc", "-I/tmp/stand-in", "-I/src", "/src/chemfiles.h"]
    );
}

#[test]
fn Preprocessor___args___msvc_ignores_standard_include_path() {
    let pre = Preprocessor {
        program: PathBuf::from("cl.exe"),
        is_msvc: true,
    };

    let args = pre.args(Path::new("chemfiles.h"), &[Path::new("stand-in")]);

    assert_eq!(args, vec!["/E", "/X", "/Istand-in", "chemfiles.h"]);
}

#[test]
fn Preprocessor___run___missing_program___returns_spawn_error() {
    let pre = Preprocessor::with_program("/definitely/not/a/compiler");

    let result = pre.run(Path::new("header.h"));

    assert!(matches!(result, Err(FrontendError::Spawn { .. })));
}

#[test]
fn base_name___strips_directories() {
    assert_eq!(base_name("/a/b/chemfiles.h"), "chemfiles.h");
    assert_eq!(base_name("C:\\a\\types.h"), "types.h");
    assert_eq!(base_name("plain.h"), "plain.h");
}
