//! Enum and function extraction from the raw declarations.
//!
//! Each concern is one pass over [`Header::nodes`].

use tracing::{debug, info};

use crate::ast::{EnumDecl, FuncDecl, Header};
use crate::classify::classify;
use crate::error::ExtractError;
use crate::model::{Argument, Enum, Function, Model};
use crate::registry::Registry;

/// Build the model from a lowered header.
pub fn extract(header: &Header, registry: &Registry) -> Result<Model, ExtractError> {
    let enums = extract_enums(header, registry)?;
    let functions = extract_functions(header, registry)?;

    info!(
        enums = enums.len(),
        functions = functions.len(),
        "extracted C API model"
    );

    Ok(Model::new(enums, functions))
}

/// Collect every enum, named through its first enumerator.
pub fn extract_enums(header: &Header, registry: &Registry) -> Result<Vec<Enum>, ExtractError> {
    header
        .enums()
        .map(|decl| extract_enum(decl, registry))
        .collect()
}

fn extract_enum(decl: &EnumDecl, registry: &Registry) -> Result<Enum, ExtractError> {
    let first = decl
        .enumerators
        .first()
        .ok_or_else(|| ExtractError::EmptyEnum {
            coord: decl.coord.clone(),
        })?;

    let name = registry
        .enum_name(&first.name)
        .ok_or_else(|| ExtractError::UnregisteredEnum {
            first: first.name.clone(),
            coord: decl.coord.clone(),
        })?;

    let mut result = Enum::new(name);
    for enumerator in &decl.enumerators {
        result.push(enumerator.name.clone(), enumerator.value.clone());
    }

    debug!(name, count = decl.enumerators.len(), "enum");
    Ok(result)
}

/// Collect every function, skipping callback typedefs.
pub fn extract_functions(
    header: &Header,
    registry: &Registry,
) -> Result<Vec<Function>, ExtractError> {
    let mut functions = Vec::new();

    for decl in header.functions() {
        if registry.is_callback_typedef(&decl.name) {
            debug!(name = %decl.name, "skipping callback typedef");
            continue;
        }
        functions.push(extract_function(decl, registry)?);
    }

    Ok(functions)
}

fn extract_function(decl: &FuncDecl, registry: &Registry) -> Result<Function, ExtractError> {
    let type_error = |source| ExtractError::Type {
        function: decl.name.clone(),
        coord: decl.coord.clone(),
        source,
    };

    if decl.signature.variadic {
        return Err(ExtractError::Variadic {
            function: decl.name.clone(),
            coord: decl.coord.clone(),
        });
    }

    let rettype = classify(&decl.signature.ret, registry).map_err(type_error)?;
    let mut function = Function::new(decl.name.clone(), decl.coord.clone(), rettype, registry);

    for param in &decl.signature.params {
        let ty = classify(&param.ty, registry).map_err(type_error)?;
        let mut arg = Argument::new(param.name.clone(), ty);
        if let Some(name) = &param.name {
            arg.is_optional = registry.is_optional(&decl.name, name);
        }
        function.add_arg(arg)?;
    }

    debug!(
        name = %decl.name,
        coord = %decl.coord,
        args = function.args().len(),
        "function"
    );
    Ok(function)
}

#[cfg(test)]
#[path = "extract/extract_tests.rs"]
mod extract_tests;
