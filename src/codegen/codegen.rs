use std::{
    fmt,
    io::{self, Write},
};

use super::{BinOpKind, Emitter, Operand, Relation, Sign, Unit};
use crate::analyzer::SymbolKind;

const BANNER: &str = "/* Generated by wmoc. Do not edit. */";

/// C spelling of a source identifier.
///
/// Every user name gets a per-kind prefix, so it can never be a C keyword, a
/// `<stdio.h>` function, `main`, or a same-named symbol of another kind.
struct CName<'a>(SymbolKind, &'a str);

impl fmt::Display for CName<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let prefix = match self.0 {
            SymbolKind::Constant => "c_",
            SymbolKind::Variable => "v_",
            SymbolKind::Procedure => "p_",
        };
        write!(f, "{}{}", prefix, self.1)
    }
}

fn var(name: &str) -> CName<'_> {
    CName(SymbolKind::Variable, name)
}

fn proc(name: &str) -> CName<'_> {
    CName(SymbolKind::Procedure, name)
}

/// Writes C source to `out` as emission actions arrive.
pub struct Codegen<W> {
    out: W,
    indent: usize,
}

impl<W: Write> Codegen<W> {
    pub fn new(out: W) -> Self {
        Self { out, indent: 0 }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn line_start(&mut self) -> io::Result<()> {
        for _ in 0..self.indent {
            self.out.write_all(b"\t")?;
        }
        Ok(())
    }

    fn line(&mut self, s: &str) -> io::Result<()> {
        self.line_start()?;
        writeln!(self.out, "{}", s)
    }

    fn write_operand(&mut self, operand: Operand<'_>) -> io::Result<()> {
        match operand {
            Operand::Constant(name) => write!(self.out, "{}", CName(SymbolKind::Constant, name)),
            Operand::Variable(name) => write!(self.out, "{}", var(name)),
            Operand::Num(digits) => self.out.write_all(digits.as_bytes()),
        }
    }

    fn dedent(&mut self) {
        self.indent = self.indent.saturating_sub(1);
    }
}

impl<W: Write> Emitter for Codegen<W> {
    fn prologue(&mut self) -> io::Result<()> {
        writeln!(self.out, "{}", BANNER)?;
        writeln!(self.out)?;
        writeln!(self.out, "#include <stdio.h>")
    }

    fn epilogue(&mut self) -> io::Result<()> {
        self.out.flush()
    }

    fn constant(&mut self, name: &str, value: &str) -> io::Result<()> {
        self.line(&format!(
            "const long {} = {};",
            CName(SymbolKind::Constant, name),
            value
        ))
    }

    fn variable(&mut self, name: &str) -> io::Result<()> {
        self.line(&format!("long {} = 0;", var(name)))
    }

    fn begin_unit(&mut self, unit: Unit<'_>) -> io::Result<()> {
        writeln!(self.out)?;
        match unit {
            Unit::Entry => {
                self.line("int")?;
                self.line("main(void)")?;
            }
            Unit::Procedure(name) => {
                self.line("void")?;
                self.line(&format!("{}(void)", proc(name)))?;
            }
        }
        self.line("{")?;
        self.indent += 1;
        Ok(())
    }

    fn end_unit(&mut self, unit: Unit<'_>) -> io::Result<()> {
        if unit == Unit::Entry {
            self.line("return 0;")?;
        }
        self.dedent();
        self.line("}")
    }

    fn begin_assignment(&mut self, target: &str) -> io::Result<()> {
        self.line_start()?;
        write!(self.out, "{} = ", var(target))
    }

    fn end_assignment(&mut self) -> io::Result<()> {
        writeln!(self.out, ";")
    }

    fn call(&mut self, name: &str) -> io::Result<()> {
        self.line(&format!("{}();", proc(name)))
    }

    fn begin_compound(&mut self) -> io::Result<()> {
        self.line("{")?;
        self.indent += 1;
        Ok(())
    }

    fn end_compound(&mut self) -> io::Result<()> {
        self.dedent();
        self.line("}")
    }

    fn begin_if(&mut self) -> io::Result<()> {
        self.line_start()?;
        write!(self.out, "if (")
    }

    fn begin_while(&mut self) -> io::Result<()> {
        self.line_start()?;
        write!(self.out, "while (")
    }

    fn end_condition(&mut self) -> io::Result<()> {
        writeln!(self.out, ")")?;
        self.indent += 1;
        Ok(())
    }

    fn end_body(&mut self) -> io::Result<()> {
        self.dedent();
        Ok(())
    }

    fn empty_statement(&mut self) -> io::Result<()> {
        self.line(";")
    }

    fn print_int(&mut self, operand: Operand<'_>) -> io::Result<()> {
        self.line_start()?;
        write!(self.out, "(void) printf(\"%ld\\n\", (long) (")?;
        self.write_operand(operand)?;
        writeln!(self.out, "));")
    }

    fn print_char(&mut self, operand: Operand<'_>) -> io::Result<()> {
        self.line_start()?;
        write!(self.out, "(void) putchar((int) (")?;
        self.write_operand(operand)?;
        writeln!(self.out, "));")
    }

    fn read_int(&mut self, target: &str) -> io::Result<()> {
        self.line(&format!(
            "if (scanf(\"%ld\", &{0}) != 1) {0} = 0;",
            var(target)
        ))
    }

    fn read_char(&mut self, target: &str) -> io::Result<()> {
        self.line(&format!("{} = getchar();", var(target)))
    }

    fn begin_odd(&mut self) -> io::Result<()> {
        write!(self.out, "((")
    }

    fn end_odd(&mut self) -> io::Result<()> {
        write!(self.out, ") & 1)")
    }

    fn relation(&mut self, relation: Relation) -> io::Result<()> {
        let op = match relation {
            Relation::Equal => "==",
            Relation::NotEqual => "!=",
            Relation::LessThan => "<",
            Relation::GreaterThan => ">",
        };
        write!(self.out, " {} ", op)
    }

    fn sign(&mut self, sign: Sign) -> io::Result<()> {
        match sign {
            Sign::Plus => write!(self.out, "+"),
            Sign::Minus => write!(self.out, "-"),
        }
    }

    fn binop(&mut self, op: BinOpKind) -> io::Result<()> {
        let op = match op {
            BinOpKind::Add => "+",
            BinOpKind::Sub => "-",
            BinOpKind::Mul => "*",
            BinOpKind::Div => "/",
        };
        write!(self.out, " {} ", op)
    }

    fn operand(&mut self, operand: Operand<'_>) -> io::Result<()> {
        self.write_operand(operand)
    }

    fn open_paren(&mut self) -> io::Result<()> {
        write!(self.out, "(")
    }

    fn close_paren(&mut self) -> io::Result<()> {
        write!(self.out, ")")
    }
}
