mod codegen;
mod emitter;

pub use codegen::*;
pub use emitter::*;
