//! The specsuite command-line interface.
//!
//! A thin shell over the library: load a document, compile it, print the
//! result or the diagnostics.

use std::path::Path;
use std::process;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::cli::args::{Command, SpecsuiteArgs};
use crate::spec::loader;
use crate::{err_msg, CompileOptions, Compiler, SpecError};

pub mod args;
pub mod output;

/// Environment variable holding a tracing filter directive.
pub const LOG_ENV: &str = "SPECSUITE_LOG";

/// The main entry point for the CLI.
pub fn run() {
    let args = SpecsuiteArgs::parse();
    init_logging(args.verbose);

    let result = build_compiler(&args).and_then(|compiler| match &args.command {
        Command::Emit { file } => handle_emit(&compiler, file),
        Command::Blocks { file } => handle_blocks(&compiler, file),
        Command::Check { path } => handle_check(&compiler, path),
    });

    if let Err(e) = result {
        output::print_error(e);
        process::exit(1);
    }
}

fn init_logging(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter =
        EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(default));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn build_compiler(args: &SpecsuiteArgs) -> Result<Compiler, SpecError> {
    let options = match &args.config {
        Some(path) => CompileOptions::from_file(path)?,
        None => CompileOptions::default(),
    };
    let debug = options.debug || args.debug;
    Ok(Compiler::with_options(options).debug(debug))
}

/// Handles the `emit` subcommand.
fn handle_emit(compiler: &Compiler, file: &Path) -> Result<(), SpecError> {
    let spec = loader::from_file(file)?;
    let program = compiler.program(&spec)?;
    output::print_dropped(&program.dropped);
    println!("{}", program.text);
    Ok(())
}

/// Handles the `blocks` subcommand.
fn handle_blocks(compiler: &Compiler, file: &Path) -> Result<(), SpecError> {
    let spec = loader::from_file(file)?;
    let program = compiler.program(&spec)?;
    output::print_dropped(&program.dropped);
    let json = serde_json::to_string_pretty(&program.blocks)
        .map_err(|e| err_msg!(Load, "failed to serialize blocks").with_cause(e))?;
    println!("{json}");
    Ok(())
}

/// Handles the `check` subcommand.
fn handle_check(compiler: &Compiler, root: &Path) -> Result<(), SpecError> {
    let files = loader::discover_spec_files(root)?;
    let (mut passed, mut failed) = (0, 0);
    for file in &files {
        match loader::from_file(file).and_then(|spec| compiler.program(&spec)) {
            Ok(program) => {
                passed += 1;
                output::print_check_line(file, true);
                output::print_dropped(&program.dropped);
            }
            Err(e) => {
                failed += 1;
                output::print_check_line(file, false);
                output::print_error(e);
            }
        }
    }
    output::print_summary(passed, failed);
    if failed > 0 {
        return Err(err_msg!(
            Format,
            "{} of {} spec files failed to compile",
            failed,
            files.len()
        ));
    }
    Ok(())
}
