//! C preprocessing of the input header.
//!
//! The header is run through the system C compiler in preprocess-only mode
//! with two include directories: a bundled set of stand-in headers (so the
//! header preprocesses without the real library or libc headers) and the
//! header's own directory. The system include path is switched off, so an
//! `#include` of anything else (`<stdio.h>`, say) is a preprocessing error. Line markers in the output are stripped and kept
//! in a [`LineMap`] so later stages can report `file:line` positions in the
//! original sources.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::TempDir;
use tracing::{debug, info};

use crate::ast::Coord;
use crate::error::FrontendError;

mod stand_in {
    pub const STDINT_H: &str = include_str!("../include/stdint.h");
    pub const STDDEF_H: &str = include_str!("../include/stddef.h");
    pub const STDBOOL_H: &str = include_str!("../include/stdbool.h");
    pub const CHEMFILES_EXPORTS_H: &str = include_str!("../include/chemfiles/exports.h");
    pub const MOLCPP_EXPORT_HPP: &str = include_str!("../include/molcpp/export.hpp");

    /// Relative path → content
    pub const FILES: &[(&str, &str)] = &[
        ("stdint.h", STDINT_H),
        ("stddef.h", STDDEF_H),
        ("stdbool.h", STDBOOL_H),
        ("chemfiles/exports.h", CHEMFILES_EXPORTS_H),
        ("molcpp/export.hpp", MOLCPP_EXPORT_HPP),
    ];
}

/// Write the stand-in headers to a fresh temporary directory.
///
/// The directory is removed when the returned value is dropped.
pub fn stand_in_includes() -> Result<TempDir, FrontendError> {
    let dir = tempfile::Builder::new()
        .prefix("capigen-include-")
        .tempdir()?;

    for (relative, content) in stand_in::FILES {
        let path = dir.path().join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, content)?;
    }

    Ok(dir)
}

/// A C compiler used in preprocess-only mode.
#[derive(Debug, Clone)]
pub struct Preprocessor {
    program: PathBuf,
    is_msvc: bool,
}

impl Preprocessor {
    /// Find a C compiler the way build scripts do (honours `CC`).
    pub fn detect() -> Result<Self, FrontendError> {
        let target = current_target();

        let compiler = cc::Build::new()
            .cargo_metadata(false)
            .target(&target)
            .host(&target)
            .opt_level(0)
            .debug(false)
            .try_get_compiler()
            .map_err(|e| FrontendError::CompilerNotFound(e.to_string()))?;

        debug!(compiler = %compiler.path().display(), "found C compiler");

        Ok(Self {
            program: compiler.path().to_path_buf(),
            is_msvc: compiler.is_like_msvc(),
        })
    }

    /// Use a specific gcc/clang-compatible program.
    pub fn with_program(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            is_msvc: false,
        }
    }

    pub fn program(&self) -> &Path {
        &self.program
    }

    /// Command-line arguments for preprocessing `header`.
    pub fn args(&self, header: &Path, include_dirs: &[&Path]) -> Vec<String> {
        let (preprocess, no_system_includes, include) = if self.is_msvc {
            ("/E", "/X", "/I")
        } else {
            ("-E", "-nostdinc", "-I")
        };

        let mut args = vec![preprocess.to_string(), no_system_includes.to_string()];
        for dir in include_dirs {
            args.push(format!("{include}{}", dir.display()));
        }
        args.push(header.display().to_string());
        args
    }

    /// Preprocess `header` and return the expanded source.
    pub fn run(&self, header: &Path) -> Result<Preprocessed, FrontendError> {
        let stand_ins = stand_in_includes()?;
        let header_dir = header
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));

        let args = self.args(header, &[stand_ins.path(), header_dir]);
        info!(header = %header.display(), program = %self.program.display(), "preprocessing");

        let output = Command::new(&self.program)
            .args(&args)
            .output()
            .map_err(|source| FrontendError::Spawn {
                program: self.program.display().to_string(),
                source,
            })?;

        if !output.status.success() {
            return Err(FrontendError::Preprocess {
                path: header.to_path_buf(),
                stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            });
        }

        let text = String::from_utf8_lossy(&output.stdout);
        Ok(Preprocessed::from_output(&text))
    }
}

/// Preprocessed source with line markers removed.
#[derive(Debug, Clone, Default)]
pub struct Preprocessed {
    /// Source text; marker lines are replaced by empty lines so that rows
    /// keep their numbering.
    pub source: String,
    pub lines: LineMap,
}

impl Preprocessed {
    /// Split preprocessor output into source text and line map.
    pub fn from_output(output: &str) -> Self {
        let mut source = String::with_capacity(output.len());
        let mut lines = LineMap::default();
        let mut file = lines.intern("<stdin>");
        let mut line = 1;

        for text in output.lines() {
            match parse_line_marker(text) {
                Some((marker_line, marker_file)) => {
                    lines.rows.push((file, line));
                    file = lines.intern(&base_name(&marker_file));
                    line = marker_line;
                }
                None => {
                    source.push_str(text);
                    lines.rows.push((file, line));
                    line += 1;
                }
            }
            source.push('\n');
        }

        Self { source, lines }
    }

    /// Use already preprocessed text, attributing every row to `file`.
    pub fn from_source(file: &str, source: &str) -> Self {
        let mut result = Self::from_output(&format!("# 1 \"{file}\"\n{source}"));
        // Drop the synthetic marker row
        result.source.remove(0);
        result.lines.rows.remove(0);
        result
    }
}

/// Preprocessed row → original `file:line`.
#[derive(Debug, Clone, Default)]
pub struct LineMap {
    files: Vec<String>,
    rows: Vec<(usize, usize)>,
}

impl LineMap {
    fn intern(&mut self, file: &str) -> usize {
        match self.files.iter().position(|f| f == file) {
            Some(index) => index,
            None => {
                self.files.push(file.to_string());
                self.files.len() - 1
            }
        }
    }

    /// Coordinate of a zero-based preprocessed row.
    pub fn coord(&self, row: usize) -> Coord {
        match self.rows.get(row) {
            Some(&(file, line)) => Coord::new(self.files[file].clone(), line),
            None => Coord::new("<unknown>", row + 1),
        }
    }
}

/// Parse `# 12 "file.h" 1 3` or `#line 12 "file.h"`.
fn parse_line_marker(text: &str) -> Option<(usize, String)> {
    let rest = text.trim_start().strip_prefix('#')?.trim_start();
    let rest = rest.strip_prefix("line").unwrap_or(rest).trim_start();

    let digits = rest.chars().take_while(char::is_ascii_digit).count();
    if digits == 0 {
        return None;
    }
    let line = rest[..digits].parse().ok()?;

    let quoted = rest[digits..].trim_start().strip_prefix('"')?;
    let end = quoted.find('"')?;
    let file = quoted[..end].replace("\\\\", "\\");

    Some((line, file))
}

fn base_name(path: &str) -> String {
    path.rsplit(['/', '\\']).next().unwrap_or(path).to_string()
}

/// Host target triple, for compiler discovery outside of build scripts.
fn current_target() -> String {
    let arch = std::env::consts::ARCH;
    let os = std::env::consts::OS;

    match (arch, os) {
        ("x86_64", "linux") => "x86_64-unknown-linux-gnu".to_string(),
        ("x86_64", "macos") => "x86_64-apple-darwin".to_string(),
        ("x86_64", "windows") => "x86_64-pc-windows-msvc".to_string(),
        ("aarch64", "linux") => "aarch64-unknown-linux-gnu".to_string(),
        ("aarch64", "macos") => "aarch64-apple-darwin".to_string(),
        ("aarch64", "windows") => "aarch64-pc-windows-msvc".to_string(),
        _ => format!("{arch}-unknown-{os}"),
    }
}

#[cfg(test)]
#[path = "preprocess/preprocess_tests.rs"]
mod preprocess_tests;
