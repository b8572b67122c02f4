mod args;

use std::{io, process::ExitCode};

use clap::Parser;
use tracing::Level;
use wmoc::{driver, Options};

use crate::args::Args;

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(io::stderr)
        .with_target(false)
        .without_time()
        .init();
}

fn run(args: &Args) -> Result<(), wmoc::error::Error> {
    let output = match &args.output {
        Some(output) if !args.tokens => output,
        _ => return driver::dump_tokens(&args.input, io::stdout().lock()),
    };
    let options = Options {
        max_depth: args.max_depth as usize,
    };
    let translation = driver::translate_file(&args.input, output, &options)?;
    for warning in &translation.warnings {
        tracing::warn!("{}", warning);
    }
    Ok(())
}

fn main() -> ExitCode {
    let args = match Args::try_parse() {
        Ok(args) => args,
        // --help and --version
        Err(err) if !err.use_stderr() => err.exit(),
        Err(err) => {
            let _ = err.print();
            return ExitCode::FAILURE;
        }
    };
    init_logging(args.verbose);

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!("{}", err);
            ExitCode::FAILURE
        }
    }
}
