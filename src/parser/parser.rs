use crate::{
    analyzer::{SymbolKind, SymbolTable, Usage},
    codegen::{BinOpKind, Emitter, Operand, Relation, Sign, Unit},
    error::{CompileError, Expected, SemanticError, SyntaxError, Warning},
    lexer::{Lexer, Token, TokenKind},
    Options,
};

type Result<T> = std::result::Result<T, CompileError>;

/// An identifier or number taken off the token stream.
struct Lexeme {
    kind: TokenKind,
    text: String,
    line: usize,
}

/// A checked expression operand.
struct Value {
    lexeme: Lexeme,
    symbol: Option<SymbolKind>,
}

impl Value {
    fn operand(&self) -> Operand<'_> {
        let text = &self.lexeme.text;
        match (self.lexeme.kind, self.symbol) {
            (TokenKind::Num, _) => Operand::Num(text),
            (_, Some(SymbolKind::Constant)) => Operand::Constant(text),
            _ => Operand::Variable(text),
        }
    }
}

/// Single-pass translator: recognizes the grammar, checks names against the
/// symbol table and drives the emitter, all in one walk over the tokens.
pub struct Parser<'src, E> {
    lexer: Lexer<'src>,
    token: Token,
    symbols: SymbolTable,
    emitter: E,
    max_depth: usize,
    warnings: Vec<Warning>,
}

impl<'src, E: Emitter> Parser<'src, E> {
    pub fn new(src: &'src [u8], emitter: E, options: &Options) -> Self {
        Self {
            lexer: Lexer::new(src),
            token: Token::new(TokenKind::Eof, 1),
            symbols: SymbolTable::new(),
            emitter,
            max_depth: options.max_depth,
            warnings: vec![],
        }
    }

    /// Translates the whole program, handing back the emitter and any warnings.
    pub fn parse(mut self) -> Result<(E, Vec<Warning>)> {
        self.advance()?;
        self.emitter.prologue()?;
        self.parse_program()?;
        self.emitter.epilogue()?;
        Ok((self.emitter, self.warnings))
    }

    fn advance(&mut self) -> Result<()> {
        self.token = self.lexer.next_token()?;
        Ok(())
    }

    fn syntax_error(&self, expected: Expected) -> CompileError {
        SyntaxError {
            line: self.token.line,
            expected,
            found: self.token.kind,
        }
        .into()
    }

    fn consume(&mut self, kind: TokenKind) -> Result<bool> {
        if self.token.kind != kind {
            return Ok(false);
        }
        self.advance()?;
        Ok(true)
    }

    fn expect(&mut self, kind: TokenKind) -> Result<()> {
        if !self.consume(kind)? {
            return Err(self.syntax_error(Expected::Token(kind)));
        }
        Ok(())
    }

    fn expect_lexeme(&mut self, kind: TokenKind) -> Result<Lexeme> {
        if self.token.kind != kind {
            return Err(self.syntax_error(Expected::Token(kind)));
        }
        let lexeme = Lexeme {
            kind,
            text: self.token.lexeme.take().unwrap_or_default(),
            line: self.token.line,
        };
        self.advance()?;
        Ok(lexeme)
    }

    fn expect_ident(&mut self) -> Result<Lexeme> {
        self.expect_lexeme(TokenKind::Ident)
    }

    /// program = block "." .
    fn parse_program(&mut self) -> Result<()> {
        self.parse_block(Unit::Entry)?;
        if self.token.kind != TokenKind::Dot {
            return Err(self.syntax_error(Expected::Token(TokenKind::Dot)));
        }
        self.check_trailing_input();
        Ok(())
    }

    /// Anything after the final `.` is ignored with a warning, even input the
    /// lexer would reject.
    fn check_trailing_input(&mut self) {
        let line = match self.lexer.next_token() {
            Ok(token) if token.kind == TokenKind::Eof => return,
            Ok(token) => token.line,
            Err(err) => err.line(),
        };
        self.warnings.push(Warning::TrailingInput { line });
    }

    /// block = [ "const" ident "=" number { "," ident "=" number } ";" ]
    ///         [ "var" ident { "," ident } ";" ]
    ///         { "procedure" ident ";" block ";" }
    ///         statement .
    fn parse_block(&mut self, unit: Unit<'_>) -> Result<()> {
        if self.symbols.depth() >= self.max_depth {
            return Err(SemanticError::NestingTooDeep {
                line: self.token.line,
                max: self.max_depth,
            }
            .into());
        }
        self.symbols.enter_block();

        if let Unit::Procedure(_) = unit {
            self.emitter.begin_unit(unit)?;
        }
        if self.consume(TokenKind::Const)? {
            self.parse_constants()?;
        }
        if self.consume(TokenKind::Var)? {
            self.parse_variables()?;
        }
        while self.consume(TokenKind::Procedure)? {
            self.parse_procedure()?;
        }
        if unit == Unit::Entry {
            self.emitter.begin_unit(unit)?;
        }

        self.parse_stmt()?;
        self.emitter.end_unit(unit)?;
        self.symbols.exit_block();
        Ok(())
    }

    fn parse_constants(&mut self) -> Result<()> {
        loop {
            let ident = self.expect_ident()?;
            self.symbols
                .declare(&ident.text, SymbolKind::Constant, ident.line)?;
            self.expect(TokenKind::Equal)?;
            let value = self.expect_lexeme(TokenKind::Num)?;
            self.emitter.constant(&ident.text, &value.text)?;
            if !self.consume(TokenKind::Comma)? {
                break;
            }
        }
        self.expect(TokenKind::SemiColon)
    }

    fn parse_variables(&mut self) -> Result<()> {
        loop {
            let ident = self.expect_ident()?;
            self.symbols
                .declare(&ident.text, SymbolKind::Variable, ident.line)?;
            self.emitter.variable(&ident.text)?;
            if !self.consume(TokenKind::Comma)? {
                break;
            }
        }
        self.expect(TokenKind::SemiColon)
    }

    /// The name is declared before the body so the procedure can call itself.
    fn parse_procedure(&mut self) -> Result<()> {
        let ident = self.expect_ident()?;
        self.symbols
            .declare(&ident.text, SymbolKind::Procedure, ident.line)?;
        self.expect(TokenKind::SemiColon)?;
        self.parse_block(Unit::Procedure(&ident.text))?;
        self.expect(TokenKind::SemiColon)
    }

    /// statement = [ ident ":=" expression
    ///             | "call" ident
    ///             | "begin" statement { ";" statement } "end"
    ///             | "if" condition "then" statement
    ///             | "while" condition "do" statement
    ///             | "printInt" ( ident | number )
    ///             | "printChar" ( ident | number )
    ///             | "readInt" "into" ident
    ///             | "readChar" "into" ident ] .
    fn parse_stmt(&mut self) -> Result<()> {
        match self.token.kind {
            TokenKind::Ident => {
                let target = self.expect_ident()?;
                self.symbols.check(&target.text, Usage::Assign, target.line)?;
                self.emitter.begin_assignment(&target.text)?;
                self.expect(TokenKind::Assign)?;
                self.parse_expr()?;
                self.emitter.end_assignment()?;
            }
            TokenKind::Call => {
                self.advance()?;
                let callee = self.expect_ident()?;
                let entry = self.symbols.check(&callee.text, Usage::Call, callee.line)?;
                if !self.symbols.declared_in_open_block(entry) {
                    self.warnings.push(Warning::HiddenProcedure {
                        line: callee.line,
                        name: callee.text.clone(),
                    });
                }
                self.emitter.call(&callee.text)?;
            }
            TokenKind::Begin => {
                self.advance()?;
                self.emitter.begin_compound()?;
                self.parse_stmt()?;
                while self.consume(TokenKind::SemiColon)? {
                    self.parse_stmt()?;
                }
                self.expect(TokenKind::End)?;
                self.emitter.end_compound()?;
            }
            TokenKind::If => {
                self.advance()?;
                self.emitter.begin_if()?;
                self.parse_condition()?;
                self.expect(TokenKind::Then)?;
                self.parse_body()?;
            }
            TokenKind::While => {
                self.advance()?;
                self.emitter.begin_while()?;
                self.parse_condition()?;
                self.expect(TokenKind::Do)?;
                self.parse_body()?;
            }
            TokenKind::PrintInt => {
                self.advance()?;
                let operand = self.parse_operand()?;
                self.emitter.print_int(operand.operand())?;
            }
            TokenKind::PrintChar => {
                self.advance()?;
                let operand = self.parse_operand()?;
                self.emitter.print_char(operand.operand())?;
            }
            TokenKind::ReadInt => {
                self.advance()?;
                let target = self.parse_read_target()?;
                self.emitter.read_int(&target.text)?;
            }
            TokenKind::ReadChar => {
                self.advance()?;
                let target = self.parse_read_target()?;
                self.emitter.read_char(&target.text)?;
            }
            _ => self.emitter.empty_statement()?,
        }
        Ok(())
    }

    fn parse_body(&mut self) -> Result<()> {
        self.emitter.end_condition()?;
        self.parse_stmt()?;
        self.emitter.end_body()?;
        Ok(())
    }

    fn parse_operand(&mut self) -> Result<Value> {
        match self.token.kind {
            TokenKind::Ident => {
                let ident = self.expect_ident()?;
                let kind = self.symbols.check(&ident.text, Usage::Value, ident.line)?.kind;
                Ok(Value {
                    lexeme: ident,
                    symbol: Some(kind),
                })
            }
            TokenKind::Num => Ok(Value {
                lexeme: self.expect_lexeme(TokenKind::Num)?,
                symbol: None,
            }),
            _ => Err(self.syntax_error(Expected::Operand)),
        }
    }

    fn parse_read_target(&mut self) -> Result<Lexeme> {
        self.expect(TokenKind::Into)?;
        let target = self.expect_ident()?;
        self.symbols.check(&target.text, Usage::Assign, target.line)?;
        Ok(target)
    }

    /// condition = "odd" expression
    ///           | expression ( "=" | "#" | "<" | ">" ) expression .
    fn parse_condition(&mut self) -> Result<()> {
        if self.consume(TokenKind::Odd)? {
            self.emitter.begin_odd()?;
            self.parse_expr()?;
            self.emitter.end_odd()?;
            return Ok(());
        }

        self.parse_expr()?;
        let relation = match self.token.kind {
            TokenKind::Equal => Relation::Equal,
            TokenKind::Hash => Relation::NotEqual,
            TokenKind::LessThan => Relation::LessThan,
            TokenKind::GreaterThan => Relation::GreaterThan,
            _ => return Err(self.syntax_error(Expected::Relation)),
        };
        self.advance()?;
        self.emitter.relation(relation)?;
        self.parse_expr()
    }

    fn parse_add_op(&self) -> Option<BinOpKind> {
        match self.token.kind {
            TokenKind::Plus => Some(BinOpKind::Add),
            TokenKind::Minus => Some(BinOpKind::Sub),
            _ => None,
        }
    }

    fn parse_mul_op(&self) -> Option<BinOpKind> {
        match self.token.kind {
            TokenKind::Star => Some(BinOpKind::Mul),
            TokenKind::Slash => Some(BinOpKind::Div),
            _ => None,
        }
    }

    /// expression = [ "+" | "-" ] term { ( "+" | "-" ) term } .
    fn parse_expr(&mut self) -> Result<()> {
        if let Some(op) = self.parse_add_op() {
            self.advance()?;
            self.emitter.sign(if op == BinOpKind::Add {
                Sign::Plus
            } else {
                Sign::Minus
            })?;
        }
        self.parse_term()?;
        while let Some(op) = self.parse_add_op() {
            self.advance()?;
            self.emitter.binop(op)?;
            self.parse_term()?;
        }
        Ok(())
    }

    /// term = factor { ( "*" | "/" ) factor } .
    fn parse_term(&mut self) -> Result<()> {
        self.parse_factor()?;
        while let Some(op) = self.parse_mul_op() {
            self.advance()?;
            self.emitter.binop(op)?;
            self.parse_factor()?;
        }
        Ok(())
    }

    /// factor = ident | number | "(" expression ")" .
    fn parse_factor(&mut self) -> Result<()> {
        match self.token.kind {
            TokenKind::Ident | TokenKind::Num => {
                let operand = self.parse_operand()?;
                self.emitter.operand(operand.operand())?;
            }
            TokenKind::OpenParen => {
                self.advance()?;
                self.emitter.open_paren()?;
                self.parse_expr()?;
                self.expect(TokenKind::CloseParen)?;
                self.emitter.close_paren()?;
            }
            _ => return Err(self.syntax_error(Expected::Factor)),
        }
        Ok(())
    }
}
