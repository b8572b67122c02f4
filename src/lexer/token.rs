use std::fmt;

use phf::phf_map;

pub(super) static KEYWORDS: phf::Map<&'static str, TokenKind> = phf_map! {
    "const" => TokenKind::Const,
    "var" => TokenKind::Var,
    "procedure" => TokenKind::Procedure,
    "call" => TokenKind::Call,
    "begin" => TokenKind::Begin,
    "end" => TokenKind::End,
    "if" => TokenKind::If,
    "then" => TokenKind::Then,
    "while" => TokenKind::While,
    "do" => TokenKind::Do,
    "odd" => TokenKind::Odd,
    "printInt" => TokenKind::PrintInt,
    "printChar" => TokenKind::PrintChar,
    "readInt" => TokenKind::ReadInt,
    "readChar" => TokenKind::ReadChar,
    "into" => TokenKind::Into,
};

pub(super) static ONE_SYMBOL_TOKENS: phf::Map<char, TokenKind> = phf_map! {
    '+' => TokenKind::Plus,
    '-' => TokenKind::Minus,
    '*' => TokenKind::Star,
    '/' => TokenKind::Slash,
    '(' => TokenKind::OpenParen,
    ')' => TokenKind::CloseParen,
    '=' => TokenKind::Equal,
    '#' => TokenKind::Hash,
    '<' => TokenKind::LessThan,
    '>' => TokenKind::GreaterThan,
    ',' => TokenKind::Comma,
    ';' => TokenKind::SemiColon,
    '.' => TokenKind::Dot,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TokenKind {
    Ident,
    Num,

    Const,
    Var,
    Procedure,
    Call,
    Begin,
    End,
    If,
    Then,
    While,
    Do,
    Odd,
    PrintInt,
    PrintChar,
    ReadInt,
    ReadChar,
    Into,

    Plus,
    Minus,
    Star,
    Slash,
    OpenParen,
    CloseParen,
    Equal,
    Hash,
    LessThan,
    GreaterThan,
    Comma,
    SemiColon,
    Dot,
    Assign,

    Eof,
}

impl TokenKind {
    /// Source spelling, or a description for the token classes.
    pub fn as_str(&self) -> &'static str {
        match self {
            TokenKind::Ident => "identifier",
            TokenKind::Num => "number",
            TokenKind::Const => "const",
            TokenKind::Var => "var",
            TokenKind::Procedure => "procedure",
            TokenKind::Call => "call",
            TokenKind::Begin => "begin",
            TokenKind::End => "end",
            TokenKind::If => "if",
            TokenKind::Then => "then",
            TokenKind::While => "while",
            TokenKind::Do => "do",
            TokenKind::Odd => "odd",
            TokenKind::PrintInt => "printInt",
            TokenKind::PrintChar => "printChar",
            TokenKind::ReadInt => "readInt",
            TokenKind::ReadChar => "readChar",
            TokenKind::Into => "into",
            TokenKind::Plus => "+",
            TokenKind::Minus => "-",
            TokenKind::Star => "*",
            TokenKind::Slash => "/",
            TokenKind::OpenParen => "(",
            TokenKind::CloseParen => ")",
            TokenKind::Equal => "=",
            TokenKind::Hash => "#",
            TokenKind::LessThan => "<",
            TokenKind::GreaterThan => ">",
            TokenKind::Comma => ",",
            TokenKind::SemiColon => ";",
            TokenKind::Dot => ".",
            TokenKind::Assign => ":=",
            TokenKind::Eof => "end of input",
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenKind::Ident | TokenKind::Num | TokenKind::Eof => f.write_str(self.as_str()),
            _ => write!(f, "`{}`", self.as_str()),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    /// Source text of identifiers and numbers; `None` for everything else.
    pub lexeme: Option<String>,
    pub line: usize,
}

impl Token {
    pub fn new(kind: TokenKind, line: usize) -> Self {
        Self {
            kind,
            lexeme: None,
            line,
        }
    }

    pub fn with_lexeme(kind: TokenKind, lexeme: String, line: usize) -> Self {
        Self {
            kind,
            lexeme: Some(lexeme),
            line,
        }
    }

    pub fn text(&self) -> &str {
        self.lexeme.as_deref().unwrap_or(self.kind.as_str())
    }
}

/// `line|kind<TAB>text`, the layout of the token dump.
impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}|{:?}\t{}", self.line, self.kind, self.text())
    }
}
