//! `capigen inspect`: print the extracted model as JSON.

use anyhow::{Context, Result};
use capigen_core::{Function, Model, Registry};
use serde::Serialize;
use std::path::Path;

use crate::generate;

#[derive(Serialize)]
struct Report<'a> {
    enums: Vec<EnumReport<'a>>,
    functions: &'a [Function],
}

#[derive(Serialize)]
struct EnumReport<'a> {
    name: &'a str,
    values: Vec<ValueReport<'a>>,
}

/// An enumerator with the value generated code will use.
#[derive(Serialize)]
struct ValueReport<'a> {
    name: &'a str,
    value: String,
}

impl<'a> Report<'a> {
    fn new(model: &'a Model) -> Self {
        let enums = model
            .enums()
            .iter()
            .map(|e| EnumReport {
                name: e.name(),
                values: e
                    .values()
                    .into_iter()
                    .map(|(name, value)| ValueReport { name, value })
                    .collect(),
            })
            .collect();

        Self {
            enums,
            functions: model.functions(),
        }
    }
}

pub fn run(header: &Path, registry: &Registry) -> Result<()> {
    let model = generate::load(header, registry)?;
    println!("{}", render(&model)?);
    Ok(())
}

/// Pretty JSON for `model`.
pub fn render(model: &Model) -> Result<String> {
    serde_json::to_string_pretty(&Report::new(model)).context("Failed to serialize the model")
}
