use crate::error::LexError;

use super::{
    token::{KEYWORDS, ONE_SYMBOL_TOKENS},
    Token, TokenKind,
};

/// Pull-based tokenizer over a byte buffer.
#[derive(Debug)]
pub struct Lexer<'src> {
    src: &'src [u8],
    index: usize,
    line: usize,
}

impl<'src> Lexer<'src> {
    pub fn new(src: &'src [u8]) -> Self {
        Self {
            src,
            index: 0,
            line: 1,
        }
    }

    fn peek(&self) -> Option<u8> {
        self.src.get(self.index).copied()
    }

    fn take_while(&mut self, f: impl Fn(u8) -> bool) -> &'src [u8] {
        let src = self.src;
        let start = self.index;
        while self.peek().is_some_and(&f) {
            self.index += 1;
        }
        &src[start..self.index]
    }

    fn skip_whitespace(&mut self) {
        while let Some(c) = self.peek() {
            match c {
                b'\n' => self.line += 1,
                b' ' | b'\t' | b'\r' => (),
                _ => return,
            }
            self.index += 1;
        }
    }

    /// Called with the cursor just past `{`.
    fn skip_comment(&mut self) -> Result<(), LexError> {
        let start = self.line;
        loop {
            match self.peek() {
                None => return Err(LexError::UnterminatedComment { line: start }),
                Some(b'}') => {
                    self.index += 1;
                    return Ok(());
                }
                Some(b'\n') => self.line += 1,
                Some(_) => (),
            }
            self.index += 1;
        }
    }

    fn parse_identifier(&mut self) -> Token {
        let s = self.take_while(|c| c.is_ascii_alphanumeric() || c == b'_');
        let s = String::from_utf8_lossy(s);

        if let Some(kind) = KEYWORDS.get(&*s) {
            Token::new(*kind, self.line)
        } else {
            Token::with_lexeme(TokenKind::Ident, s.into_owned(), self.line)
        }
    }

    /// The lexeme is the canonical decimal value: underscores are digit
    /// separators and leading zeros are dropped.
    fn parse_number(&mut self) -> Result<Token, LexError> {
        let s = self.take_while(|c| c.is_ascii_digit() || c == b'_');
        let digits: String = s
            .iter()
            .filter(|&&c| c != b'_')
            .map(|&c| c as char)
            .collect();

        let value = digits.parse::<i64>().map_err(|_| LexError::NumberTooLarge {
            line: self.line,
            text: String::from_utf8_lossy(s).into_owned(),
        })?;
        Ok(Token::with_lexeme(TokenKind::Num, value.to_string(), self.line))
    }

    pub fn next_token(&mut self) -> Result<Token, LexError> {
        loop {
            self.skip_whitespace();
            if self.peek() != Some(b'{') {
                break;
            }
            self.index += 1;
            self.skip_comment()?;
        }

        let Some(c) = self.peek() else {
            return Ok(Token::new(TokenKind::Eof, self.line));
        };

        let token = if c.is_ascii_alphabetic() || c == b'_' {
            self.parse_identifier()
        } else if c.is_ascii_digit() {
            self.parse_number()?
        } else if c == b':' {
            self.index += 1;
            match self.peek() {
                Some(b'=') => {
                    self.index += 1;
                    Token::new(TokenKind::Assign, self.line)
                }
                found => {
                    return Err(LexError::MalformedAssignment {
                        line: self.line,
                        found: found.map(char::from),
                    })
                }
            }
        } else if let Some(kind) = ONE_SYMBOL_TOKENS.get(&char::from(c)) {
            self.index += 1;
            Token::new(*kind, self.line)
        } else {
            return Err(LexError::UnexpectedCharacter {
                line: self.line,
                found: char::from(c),
            });
        };

        tracing::trace!(kind = ?token.kind, line = token.line, "token");
        Ok(token)
    }

    /// Lexes the whole input, stopping after the first `Eof`.
    pub fn tokenize(src: &[u8]) -> Result<Vec<Token>, LexError> {
        let mut lexer = Lexer::new(src);
        let mut tokens = vec![];
        loop {
            let token = lexer.next_token()?;
            let done = token.kind == TokenKind::Eof;
            tokens.push(token);
            if done {
                return Ok(tokens);
            }
        }
    }
}
