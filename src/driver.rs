//! File-level entry points used by the `wmoc` binary.

use std::{
    fs,
    io::Write,
    path::{Path, PathBuf},
};

use crate::{
    compile_with,
    error::{CompileError, ConfigError, Error},
    lexer::Lexer,
    Options, Translation,
};

pub const SOURCE_EXTENSION: &str = "pl0";

/// Rejects anything not named `*.pl0`.
pub fn check_extension(path: &Path) -> Result<(), ConfigError> {
    match path.extension() {
        None => Err(ConfigError::MissingExtension(path.to_path_buf())),
        Some(ext) if ext == SOURCE_EXTENSION => Ok(()),
        Some(ext) => Err(ConfigError::WrongExtension {
            path: path.to_path_buf(),
            found: ext.to_string_lossy().into_owned(),
        }),
    }
}

fn read_source(path: &Path) -> Result<Vec<u8>, ConfigError> {
    check_extension(path)?;
    fs::read(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })
}

/// Translates `input` into C at `output`.
///
/// The translation is buffered, so `output` is only created once the whole
/// program has been accepted.
pub fn translate_file(input: &Path, output: &Path, options: &Options) -> Result<Translation, Error> {
    let src = read_source(input)?;
    tracing::info!(input = %input.display(), bytes = src.len(), "translating");

    let translation = compile_with(&src, options)?;
    fs::write(output, &translation.code).map_err(|source| ConfigError::Write {
        path: PathBuf::from(output),
        source,
    })?;

    tracing::info!(output = %output.display(), "wrote translation");
    Ok(translation)
}

/// Prints every token of `input`, one per line, as `line|kind<TAB>text`.
pub fn dump_tokens(input: &Path, mut out: impl Write) -> Result<(), Error> {
    let src = read_source(input)?;
    let tokens = Lexer::tokenize(&src).map_err(CompileError::from)?;
    for token in tokens {
        writeln!(out, "{}", token).map_err(CompileError::from)?;
    }
    Ok(())
}
