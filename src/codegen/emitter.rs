use std::io;

/// A callable unit of the source program.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Unit<'a> {
    /// The outermost block, i.e. the program's entry point.
    Entry,
    Procedure(&'a str),
}

/// A primary operand, with identifiers already resolved to their kind.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Operand<'a> {
    Constant(&'a str),
    Variable(&'a str),
    /// Decimal digits, no sign or separators.
    Num(&'a str),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Sign {
    Plus,
    Minus,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BinOpKind {
    Add,
    Sub,
    Mul,
    Div,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Relation {
    Equal,
    NotEqual,
    LessThan,
    GreaterThan,
}

/// Emission actions invoked by the parser as it recognizes each construct.
///
/// Implementations only translate; every decision about *when* something is
/// emitted belongs to the parser. Calls arrive in source order, so a
/// streaming implementation can write straight to its sink.
pub trait Emitter {
    fn prologue(&mut self) -> io::Result<()>;
    fn epilogue(&mut self) -> io::Result<()>;

    fn constant(&mut self, name: &str, value: &str) -> io::Result<()>;
    fn variable(&mut self, name: &str) -> io::Result<()>;

    /// Opens `unit`. Procedures are opened before their declarations, the
    /// entry point right before its statement.
    fn begin_unit(&mut self, unit: Unit<'_>) -> io::Result<()>;
    fn end_unit(&mut self, unit: Unit<'_>) -> io::Result<()>;

    fn begin_assignment(&mut self, target: &str) -> io::Result<()>;
    fn end_assignment(&mut self) -> io::Result<()>;
    fn call(&mut self, name: &str) -> io::Result<()>;
    fn begin_compound(&mut self) -> io::Result<()>;
    fn end_compound(&mut self) -> io::Result<()>;
    fn begin_if(&mut self) -> io::Result<()>;
    fn begin_while(&mut self) -> io::Result<()>;
    /// Closes the condition of an `if`/`while`; the body follows.
    fn end_condition(&mut self) -> io::Result<()>;
    fn end_body(&mut self) -> io::Result<()>;
    fn empty_statement(&mut self) -> io::Result<()>;

    fn print_int(&mut self, operand: Operand<'_>) -> io::Result<()>;
    fn print_char(&mut self, operand: Operand<'_>) -> io::Result<()>;
    fn read_int(&mut self, target: &str) -> io::Result<()>;
    fn read_char(&mut self, target: &str) -> io::Result<()>;

    fn begin_odd(&mut self) -> io::Result<()>;
    fn end_odd(&mut self) -> io::Result<()>;
    fn relation(&mut self, relation: Relation) -> io::Result<()>;

    fn sign(&mut self, sign: Sign) -> io::Result<()>;
    fn binop(&mut self, op: BinOpKind) -> io::Result<()>;
    fn operand(&mut self, operand: Operand<'_>) -> io::Result<()>;
    fn open_paren(&mut self) -> io::Result<()>;
    fn close_paren(&mut self) -> io::Result<()>;
}
