//! Lexical analyzer

use crate::diag::{Diagnostics, Position, SyntaxError};
use crate::token::{self, Literal, Token, TokenKind};

/// Turn source text into a sequence of tokens terminated by `TokenKind::Eof`.
///
/// Scanning never stops on error: bad characters and unterminated strings are reported and
/// skipped.
#[derive(Debug)]
pub struct Scanner<'a> {
    source: &'a str,
    // Byte offsets of the first character of the current lexeme and of the next character to
    // consume.
    start: usize,
    current: usize,
    line: Position,
    tokens: Vec<Token>,
}

impl<'a> Scanner<'a> {
    /// Creates a new scanner operating on `source`.
    pub fn new(source: &'a str) -> Scanner<'a> {
        Scanner {
            source,
            start: 0,
            current: 0,
            line: 1,
            tokens: vec![],
        }
    }

    /// Scan the whole input.
    pub fn scan_tokens(mut self, diag: &mut Diagnostics) -> Vec<Token> {
        while !self.is_at_end() {
            self.start = self.current;
            self.scan_token(diag);
        }
        self.tokens.push(Token::eof(self.line));
        self.tokens
    }

    fn scan_token(&mut self, diag: &mut Diagnostics) {
        let ch = match self.advance() {
            Some(ch) => ch,
            None => return,
        };
        match ch {
            '(' => self.add_token(TokenKind::LeftParen),
            ')' => self.add_token(TokenKind::RightParen),
            '{' => self.add_token(TokenKind::LeftBrace),
            '}' => self.add_token(TokenKind::RightBrace),
            ',' => self.add_token(TokenKind::Comma),
            '.' => self.add_token(TokenKind::Dot),
            '-' => self.add_token(TokenKind::Minus),
            '+' => self.add_token(TokenKind::Plus),
            ';' => self.add_token(TokenKind::Semicolon),
            '*' => self.add_token(TokenKind::Star),
            '!' => self.add_one_or_two('=', TokenKind::BangEqual, TokenKind::Bang),
            '=' => self.add_one_or_two('=', TokenKind::EqualEqual, TokenKind::Equal),
            '<' => self.add_one_or_two('=', TokenKind::LessEqual, TokenKind::Less),
            '>' => self.add_one_or_two('=', TokenKind::GreaterEqual, TokenKind::Greater),
            '/' => {
                if self.match_char('/') {
                    self.skip_comment();
                } else {
                    self.add_token(TokenKind::Slash);
                }
            }
            ' ' | '\t' | '\r' => (),
            '\n' => self.line += 1,
            '"' => self.scan_string(diag),
            '0'..='9' => self.scan_number(diag),
            'a'..='z' | 'A'..='Z' | '_' => self.scan_identifier(),
            _ => diag.error(SyntaxError::lexical(self.line, "Unexpected token.")),
        }
    }

    fn scan_string(&mut self, diag: &mut Diagnostics) {
        loop {
            match self.peek() {
                None => {
                    diag.error(SyntaxError::lexical(self.line, "String not closed properly"));
                    return;
                }
                Some('"') => break,
                Some('\n') => {
                    self.line += 1;
                    self.advance();
                }
                Some(_) => {
                    self.advance();
                }
            }
        }

        // closing quote
        self.advance();

        let value = &self.source[self.start + 1..self.current - 1];
        self.add_literal(TokenKind::String, Literal::Str(value.to_owned()));
    }

    fn scan_number(&mut self, diag: &mut Diagnostics) {
        self.skip_digits();

        // A trailing '.' without digits after it is not part of the number.
        if self.peek() == Some('.') && self.peek_next().map_or(false, |ch| ch.is_ascii_digit()) {
            self.advance();
            self.skip_digits();
        }

        match self.lexeme().parse::<f64>() {
            Ok(n) => self.add_literal(TokenKind::Number, Literal::Number(n)),
            Err(_) => diag.error(SyntaxError::lexical(self.line, "Invalid number literal.")),
        }
    }

    fn scan_identifier(&mut self) {
        while self
            .peek()
            .map_or(false, |ch| ch.is_ascii_alphanumeric() || ch == '_')
        {
            self.advance();
        }

        let kind = token::keyword(self.lexeme()).unwrap_or(TokenKind::Identifier);
        self.add_token(kind);
    }

    fn skip_digits(&mut self) {
        while self.peek().map_or(false, |ch| ch.is_ascii_digit()) {
            self.advance();
        }
    }

    fn skip_comment(&mut self) {
        while self.peek().map_or(false, |ch| ch != '\n') {
            self.advance();
        }
    }

    fn add_one_or_two(&mut self, second: char, long: TokenKind, short: TokenKind) {
        let kind = if self.match_char(second) { long } else { short };
        self.add_token(kind);
    }

    fn add_token(&mut self, kind: TokenKind) {
        let token = Token::new(kind, self.lexeme(), None, self.line);
        self.tokens.push(token);
    }

    fn add_literal(&mut self, kind: TokenKind, literal: Literal) {
        let token = Token::new(kind, self.lexeme(), Some(literal), self.line);
        self.tokens.push(token);
    }

    fn lexeme(&self) -> &'a str {
        &self.source[self.start..self.current]
    }

    fn is_at_end(&self) -> bool {
        self.current >= self.source.len()
    }

    fn advance(&mut self) -> Option<char> {
        let ch = self.peek()?;
        self.current += ch.len_utf8();
        Some(ch)
    }

    /// Consume the next character if it is `expected`.
    fn match_char(&mut self, expected: char) -> bool {
        if self.peek() == Some(expected) {
            self.current += expected.len_utf8();
            true
        } else {
            false
        }
    }

    fn peek(&self) -> Option<char> {
        self.source[self.current..].chars().next()
    }

    fn peek_next(&self) -> Option<char> {
        self.source[self.current..].chars().nth(1)
    }
}
