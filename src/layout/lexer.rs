//! Layout script tokenizer

use crate::error::ParseError;
use std::iter::Peekable;
use std::str::Chars;

/// Token kinds
#[derive(Clone, Debug, PartialEq)]
pub enum TokenKind {
    // Literals
    Number(f64),
    Str(String),
    True,
    False,

    // Identifiers and keywords
    Ident(String),
    KwVar,
    KwNew,

    // Operators
    Equal,
    Plus,
    Minus,
    Star,
    Slash,

    // Punctuation
    Dot,
    Comma,
    LeftParen,
    RightParen,
    LeftBracket,
    RightBracket,

    // Special
    Newline,
    Eof,
}

/// A token with position info
#[derive(Clone, Debug, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub line: usize,
    pub column: usize,
}

impl Token {
    pub fn new(kind: TokenKind, line: usize, column: usize) -> Self {
        Self { kind, line, column }
    }
}

/// The lexer
pub struct Lexer<'a> {
    input: Peekable<Chars<'a>>,
    line: usize,
    column: usize,
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a str) -> Self {
        Self {
            input: input.chars().peekable(),
            line: 1,
            column: 1,
        }
    }

    /// Tokenize the whole source, ending with a single `Eof` token.
    pub fn tokenize(mut self) -> Result<Vec<Token>, ParseError> {
        let mut tokens = Vec::new();
        loop {
            let token = self.next_token()?;
            let done = token.kind == TokenKind::Eof;
            tokens.push(token);
            if done {
                return Ok(tokens);
            }
        }
    }

    fn advance(&mut self) -> Option<char> {
        let c = self.input.next();
        match c {
            Some('\n') => {
                self.line += 1;
                self.column = 1;
            }
            Some(_) => self.column += 1,
            None => {}
        }
        c
    }

    fn peek(&mut self) -> Option<char> {
        self.input.peek().copied()
    }

    fn skip_whitespace_and_comments(&mut self) {
        while let Some(c) = self.peek() {
            // semicolon statement terminators are optional trivia
            if c == ' ' || c == '\t' || c == '\r' || c == ';' {
                self.advance();
            } else if c == '/' {
                let mut lookahead = self.input.clone();
                lookahead.next();
                if lookahead.peek() == Some(&'/') {
                    // line comment, runs to end of line
                    while let Some(c) = self.peek() {
                        if c == '\n' {
                            break;
                        }
                        self.advance();
                    }
                } else {
                    break;
                }
            } else {
                break;
            }
        }
    }

    fn next_token(&mut self) -> Result<Token, ParseError> {
        self.skip_whitespace_and_comments();

        let line = self.line;
        let column = self.column;

        let c = match self.peek() {
            Some(c) => c,
            None => return Ok(Token::new(TokenKind::Eof, line, column)),
        };

        if c == '\n' {
            self.advance();
            return Ok(Token::new(TokenKind::Newline, line, column));
        }
        if c.is_ascii_digit() {
            return Ok(Token::new(self.read_number(), line, column));
        }
        if c == '"' || c == '\'' {
            let kind = self.read_string(c, line)?;
            return Ok(Token::new(kind, line, column));
        }
        if c.is_ascii_alphabetic() || c == '_' {
            return Ok(Token::new(self.read_identifier(), line, column));
        }

        self.advance();
        let kind = match c {
            '=' => TokenKind::Equal,
            '+' => TokenKind::Plus,
            '-' => TokenKind::Minus,
            '*' => TokenKind::Star,
            '/' => TokenKind::Slash,
            '.' => TokenKind::Dot,
            ',' => TokenKind::Comma,
            '(' => TokenKind::LeftParen,
            ')' => TokenKind::RightParen,
            '[' => TokenKind::LeftBracket,
            ']' => TokenKind::RightBracket,
            other => {
                return Err(ParseError::Syntax {
                    message: format!("unexpected character '{}'", other),
                    line,
                });
            }
        };
        Ok(Token::new(kind, line, column))
    }

    fn read_number(&mut self) -> TokenKind {
        let mut num_str = String::new();

        while let Some(c) = self.peek() {
            if c.is_ascii_digit() {
                num_str.push(c);
                self.advance();
            } else {
                break;
            }
        }

        if self.peek() == Some('.') {
            let mut lookahead = self.input.clone();
            lookahead.next();
            if lookahead.peek().is_some_and(|c| c.is_ascii_digit()) {
                num_str.push('.');
                self.advance();
                while let Some(c) = self.peek() {
                    if c.is_ascii_digit() {
                        num_str.push(c);
                        self.advance();
                    } else {
                        break;
                    }
                }
            }
        }

        // digits-and-dot strings always parse
        TokenKind::Number(num_str.parse().unwrap_or(0.0))
    }

    fn read_string(&mut self, quote: char, line: usize) -> Result<TokenKind, ParseError> {
        self.advance(); // opening quote
        let mut s = String::new();
        loop {
            match self.peek() {
                Some(c) if c == quote => {
                    self.advance();
                    return Ok(TokenKind::Str(s));
                }
                Some('\n') | None => {
                    return Err(ParseError::Syntax {
                        message: "unterminated string literal".to_string(),
                        line,
                    });
                }
                Some('\\') => {
                    self.advance();
                    match self.advance() {
                        Some('n') => s.push('\n'),
                        Some('t') => s.push('\t'),
                        Some(c) => s.push(c),
                        None => {
                            return Err(ParseError::Syntax {
                                message: "unterminated string literal".to_string(),
                                line,
                            });
                        }
                    }
                }
                Some(c) => {
                    s.push(c);
                    self.advance();
                }
            }
        }
    }

    fn read_identifier(&mut self) -> TokenKind {
        let mut ident = String::new();
        while let Some(c) = self.peek() {
            if c.is_ascii_alphanumeric() || c == '_' {
                ident.push(c);
                self.advance();
            } else {
                break;
            }
        }

        match ident.as_str() {
            "var" => TokenKind::KwVar,
            "new" => TokenKind::KwNew,
            "true" => TokenKind::True,
            "false" => TokenKind::False,
            _ => TokenKind::Ident(ident),
        }
    }
}
