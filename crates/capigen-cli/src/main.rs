//! capigen CLI - Binding generator for C API headers
//!
//! Commands:
//! - `capigen generate <header> <python|js> <outdir>` - Generate bindings
//! - `capigen inspect <header>` - Print the extracted model as JSON
//!
//! Exit codes: 0 on success, 1 for a malformed command line, 2 for an
//! unknown binding kind and 3 when generation fails.

use anyhow::{Context, Result};
use capigen_core::Registry;
use clap::{ArgAction, CommandFactory, Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

mod codegen;
mod generate;
mod inspect;
mod logging;

use codegen::BindingKind;

const EXIT_USAGE: u8 = 1;
const EXIT_UNKNOWN_BINDING: u8 = 2;
const EXIT_FAILURE: u8 = 3;

#[derive(Parser)]
#[command(name = "capigen")]
#[command(author, version, about = "Binding generator for C API headers", long_about = None)]
struct Cli {
    /// TOML registry replacing the built-in chemfiles tables
    #[arg(long, global = true, value_name = "FILE")]
    registry: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate host language bindings for a C header
    Generate {
        /// Path to the C header
        header: PathBuf,

        /// Binding kind (python, js)
        kind: String,

        /// Output directory for generated files
        outdir: PathBuf,
    },

    /// Print the model extracted from a C header as JSON
    Inspect {
        /// Path to the C header
        header: PathBuf,
    },
}

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let _ = e.print();
            // --help and --version land here too
            return if e.use_stderr() {
                ExitCode::from(EXIT_USAGE)
            } else {
                ExitCode::SUCCESS
            };
        }
    };

    logging::init_logging(cli.verbose);

    let result = match &cli.command {
        Commands::Generate {
            header,
            kind,
            outdir,
        } => {
            // Checked before reading anything so a typo never touches `outdir`
            let kind = match kind.parse::<BindingKind>() {
                Ok(kind) => kind,
                Err(e) => {
                    eprintln!("error: {e}\n");
                    print_generate_usage();
                    return ExitCode::from(EXIT_UNKNOWN_BINDING);
                }
            };
            load_registry(cli.registry.as_deref())
                .and_then(|registry| generate::run(header, kind, outdir, &registry))
        }
        Commands::Inspect { header } => load_registry(cli.registry.as_deref())
            .and_then(|registry| inspect::run(header, &registry)),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e:#}");
            ExitCode::from(EXIT_FAILURE)
        }
    }
}

fn load_registry(path: Option<&Path>) -> Result<Registry> {
    match path {
        Some(path) => Registry::from_file(path)
            .with_context(|| format!("Failed to load registry {path:?}")),
        None => Ok(Registry::default()),
    }
}

fn print_generate_usage() {
    let mut command = Cli::command();
    command.build();
    if let Some(generate) = command.find_subcommand_mut("generate") {
        eprintln!("{}", generate.render_usage());
    }
}
