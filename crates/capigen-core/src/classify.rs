//! Declarator → canonical type classification.
//!
//! The supported shapes form a closed set:
//!
//! | C declarator            | Canonical type                       |
//! |-------------------------|--------------------------------------|
//! | `T (*x)[N]`             | pointer to array, dims `(?, N)`      |
//! | `T (**x)[N]`            | rows view, dims `(?, N)`             |
//! | `T **x` (allowlisted T) | rows view, dims `(?, ?)`             |
//! | `char *x`               | string                               |
//! | `T *x`                  | pointer scalar                       |
//! | `T x[N][M]`             | array, dims `(N, M)`                 |
//! | `T *x[N]`               | array, dims `(?, ?)`                 |
//! | `T x[N]`, `T x[]`       | array, dims `(N)` or `(?)`           |
//! | `T x`                   | scalar                               |
//!
//! Anything else is a [`ClassifyError`].

use crate::ast::{ArraySize, Declarator};
use crate::ctype::{CType, CHAR, Dim};
use crate::error::ClassifyError;
use crate::registry::Registry;

/// Classify a declarator into exactly one canonical type.
pub fn classify(decl: &Declarator, registry: &Registry) -> Result<CType, ClassifyError> {
    match decl {
        Declarator::Pointer { inner, .. } => classify_pointer(inner, registry),
        Declarator::Array { size, inner } => classify_array(size, inner),
        Declarator::Type { names, is_const } => Ok(CType::scalar(names.join(" "), *is_const)),
        Declarator::Function(_) => Err(ClassifyError::UnhandledShape(
            "function used as a value type".to_string(),
        )),
    }
}

/// `pointee` is what the outermost pointer points to.
fn classify_pointer(pointee: &Declarator, registry: &Registry) -> Result<CType, ClassifyError> {
    match pointee {
        Declarator::Array { size, inner } => {
            let (name, is_const) = base_type(inner, "pointer to array")?;
            Ok(CType::ptr_to_array(
                name,
                is_const,
                vec![Dim::Unknown, row_width(size)?],
            ))
        }
        Declarator::Pointer { inner, .. } => match inner.as_ref() {
            Declarator::Array { size, inner } => {
                let (name, is_const) = base_type(inner, "pointer to pointer to array")?;
                Ok(CType::ptr_to_rows_view(
                    name,
                    is_const,
                    vec![Dim::Unknown, row_width(size)?],
                ))
            }
            Declarator::Type { names, is_const } => {
                let name = names.join(" ");
                if !registry.allows_pointer_to_pointer(&name) {
                    return Err(ClassifyError::PointerToPointer(name));
                }
                Ok(CType::ptr_to_rows_view(
                    name,
                    *is_const,
                    vec![Dim::Unknown, Dim::Unknown],
                ))
            }
            other => Err(ClassifyError::UnhandledShape(format!(
                "pointer to pointer to {}",
                other.shape()
            ))),
        },
        Declarator::Type { names, is_const } => {
            let name = names.join(" ");
            if name == CHAR {
                Ok(CType::string(*is_const))
            } else {
                Ok(CType::pointer(name, *is_const))
            }
        }
        Declarator::Function(_) => Err(ClassifyError::UnhandledShape(
            "pointer to function (use a callback typedef)".to_string(),
        )),
    }
}

fn classify_array(size: &ArraySize, element: &Declarator) -> Result<CType, ClassifyError> {
    match element {
        Declarator::Array {
            size: inner_size,
            inner,
        } => {
            let (name, is_const) = base_type(inner, "array of array")?;
            Ok(CType::array(
                name,
                is_const,
                vec![static_dim(size), static_dim(inner_size)],
            ))
        }
        Declarator::Pointer { inner, .. } => {
            let (name, is_const) = base_type(inner, "array of pointers")?;
            Ok(CType::array(
                name,
                is_const,
                vec![Dim::Unknown, Dim::Unknown],
            ))
        }
        Declarator::Type { names, is_const } => {
            Ok(CType::array(names.join(" "), *is_const, vec![static_dim(size)]))
        }
        Declarator::Function(_) => Err(ClassifyError::UnhandledShape(
            "array of functions".to_string(),
        )),
    }
}

fn base_type(decl: &Declarator, context: &str) -> Result<(String, bool), ClassifyError> {
    match decl {
        Declarator::Type { names, is_const } => Ok((names.join(" "), *is_const)),
        other => Err(ClassifyError::UnhandledShape(format!(
            "{context} of {}",
            other.shape()
        ))),
    }
}

fn static_dim(size: &ArraySize) -> Dim {
    match size {
        ArraySize::Literal(n) => Dim::Fixed(*n),
        ArraySize::Expression(_) | ArraySize::Unspecified => Dim::Unknown,
    }
}

fn row_width(size: &ArraySize) -> Result<Dim, ClassifyError> {
    match size {
        ArraySize::Literal(n) => Ok(Dim::Fixed(*n)),
        ArraySize::Expression(expr) => Err(ClassifyError::NonLiteralRowWidth(expr.clone())),
        ArraySize::Unspecified => Err(ClassifyError::NonLiteralRowWidth(String::new())),
    }
}
