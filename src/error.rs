use std::{fmt, io, path::PathBuf};

use thiserror::Error;

use crate::{
    analyzer::{SymbolKind, Usage},
    lexer::TokenKind,
};

/// Anything that can stop a `wmoc` invocation.
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Compile(#[from] CompileError),
}

/// Problems with the files handed to the translator, raised before any lexing.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{}: .pl0 file extension required", .0.display())]
    MissingExtension(PathBuf),

    #[error("{}: .pl0 file extension required, found .{found}", .path.display())]
    WrongExtension { path: PathBuf, found: String },

    #[error("error reading {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("error writing {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

#[derive(Debug, Error)]
pub enum CompileError {
    #[error(transparent)]
    Lex(#[from] LexError),

    #[error(transparent)]
    Syntax(#[from] SyntaxError),

    #[error(transparent)]
    Semantic(#[from] SemanticError),

    #[error("error writing output: {0}")]
    Output(#[from] io::Error),
}

impl CompileError {
    pub fn line(&self) -> Option<usize> {
        match self {
            CompileError::Lex(e) => Some(e.line()),
            CompileError::Syntax(e) => Some(e.line),
            CompileError::Semantic(e) => Some(e.line()),
            CompileError::Output(_) => None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum LexError {
    #[error("error on line {line}: unterminated comment")]
    UnterminatedComment { line: usize },

    #[error("error on line {line}: unexpected character {found:?}")]
    UnexpectedCharacter { line: usize, found: char },

    #[error("error on line {line}: invalid token ':{}'", found.map(String::from).unwrap_or_default())]
    MalformedAssignment { line: usize, found: Option<char> },

    #[error("error on line {line}: number too large: {text}")]
    NumberTooLarge { line: usize, text: String },
}

impl LexError {
    pub fn line(&self) -> usize {
        match self {
            LexError::UnterminatedComment { line }
            | LexError::UnexpectedCharacter { line, .. }
            | LexError::MalformedAssignment { line, .. }
            | LexError::NumberTooLarge { line, .. } => *line,
        }
    }
}

/// What the parser was looking for when it gave up.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Expected {
    Token(TokenKind),
    Factor,
    Relation,
    Operand,
}

impl fmt::Display for Expected {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expected::Token(kind) => kind.fmt(f),
            Expected::Factor => f.write_str("identifier, number or `(`"),
            Expected::Relation => f.write_str("one of `=`, `#`, `<`, `>`"),
            Expected::Operand => f.write_str("identifier or number"),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("error on line {line}: syntax error: expected {expected}, found {found}")]
pub struct SyntaxError {
    pub line: usize,
    pub expected: Expected,
    pub found: TokenKind,
}

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum SemanticError {
    #[error("error on line {line}: undefined symbol: {name}")]
    UndeclaredIdentifier { line: usize, name: String },

    #[error("error on line {line}: duplicate symbol: {kind} {name}")]
    DuplicateSymbol {
        line: usize,
        name: String,
        kind: SymbolKind,
    },

    #[error("error on line {line}: {name} is a {found}, {}", usage.requirement())]
    KindMismatch {
        line: usize,
        name: String,
        found: SymbolKind,
        usage: Usage,
    },

    #[error("error on line {line}: nesting depth exceeded (at most {max} nested blocks)")]
    NestingTooDeep { line: usize, max: usize },
}

impl SemanticError {
    pub fn line(&self) -> usize {
        match self {
            SemanticError::UndeclaredIdentifier { line, .. }
            | SemanticError::DuplicateSymbol { line, .. }
            | SemanticError::KindMismatch { line, .. }
            | SemanticError::NestingTooDeep { line, .. } => *line,
        }
    }
}

/// Diagnostics that do not abort a compilation.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum Warning {
    #[error("line {line}: ignoring input after the final `.`")]
    TrailingInput { line: usize },

    #[error("line {line}: procedure {name} is called outside the procedure that declares it; the generated C will not compile")]
    HiddenProcedure { line: usize, name: String },
}
