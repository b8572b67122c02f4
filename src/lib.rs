pub mod analyzer;
pub mod codegen;
pub mod driver;
pub mod error;
pub mod lexer;
pub mod parser;

use codegen::{Codegen, Emitter};
use error::{CompileError, Warning};
use parser::Parser;

/// Blocks allowed to be open at once: the program block plus one level of
/// procedures, which is as deep as ISO C functions go.
pub const DEFAULT_MAX_DEPTH: usize = 2;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Options {
    /// Maximum number of nested blocks, counting the program block.
    pub max_depth: usize,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

/// A successful translation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Translation {
    pub code: String,
    pub warnings: Vec<Warning>,
}

/// Runs the single-pass translator over `src`, emitting through `emitter`.
///
/// Emission is streamed: on error, whatever the emitter already wrote stays
/// written.
pub fn translate<E: Emitter>(
    src: &[u8],
    options: &Options,
    emitter: E,
) -> Result<(E, Vec<Warning>), CompileError> {
    Parser::new(src, emitter, options).parse()
}

/// Translates `src` to C in memory. Nothing is returned unless the whole
/// program translated.
pub fn compile_with(src: &[u8], options: &Options) -> Result<Translation, CompileError> {
    let (codegen, warnings) = translate(src, options, Codegen::new(vec![]))?;
    let code = String::from_utf8_lossy(&codegen.into_inner()).into_owned();
    Ok(Translation { code, warnings })
}

pub fn compile(src: &[u8]) -> Result<Translation, CompileError> {
    compile_with(src, &Options::default())
}
