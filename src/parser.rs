//! Recursive-descent parser.
//!
//! Grammar, from lowest to highest precedence:
//!
//! ```text
//! program    -> statement* EOF
//! statement  -> "print" expression ";" | expression ";"
//! expression -> equality
//! equality   -> comparison ( ( "!=" | "==" ) comparison )*
//! comparison -> term ( ( ">" | ">=" | "<" | "<=" ) term )*
//! term       -> factor ( ( "-" | "+" ) factor )*
//! factor     -> unary ( ( "/" | "*" ) unary )*
//! unary      -> ( "!" | "-" ) unary | primary
//! primary    -> NUMBER | STRING | "true" | "false" | "nil" | "(" expression ")"
//! ```

use crate::ast::{Expr, Literal, Stmt};
use crate::diag::{Diagnostics, SyntaxError};
use crate::token::{self, Token, TokenKind};

type ParseResult<T> = Result<T, SyntaxError>;

/// Deepest chain of parenthesized groups and prefix operators accepted.
const MAX_NESTING: usize = 100;

#[derive(Debug)]
pub struct Parser<'t> {
    // Always terminated by an end marker.
    tokens: &'t [Token],
    current: usize,
    // Number of nested groups and prefix operators being parsed.
    depth: usize,
}

impl<'t> Parser<'t> {
    /// Creates a parser over the output of `Scanner::scan_tokens`.
    ///
    /// # Panics
    ///
    /// If `tokens` is not terminated by a `TokenKind::Eof` token.
    pub fn new(tokens: &'t [Token]) -> Parser<'t> {
        assert!(
            tokens.last().map_or(false, |t| t.kind == TokenKind::Eof),
            "token sequence without end marker"
        );
        Parser {
            tokens,
            current: 0,
            depth: 0,
        }
    }

    /// Parse a whole program.
    ///
    /// Syntax errors are recorded in `diag`.  After each error the parser skips to the next
    /// statement boundary and carries on, so the returned program lacks the malformed
    /// statements.
    pub fn parse(&mut self, diag: &mut Diagnostics) -> Vec<Stmt<'t>> {
        let mut prg = vec![];
        while !self.is_at_end() {
            match self.statement() {
                Ok(stmt) => prg.push(stmt),
                Err(e) => {
                    diag.error(e);
                    self.synchronize();
                }
            }
        }
        prg
    }

    /// Parse a single expression spanning all the input.
    pub fn parse_expression(&mut self) -> ParseResult<Expr<'t>> {
        let expr = self.expression()?;
        if !self.is_at_end() {
            return Err(SyntaxError::at(self.peek(), "Expect end of expression."));
        }
        Ok(expr)
    }

    fn statement(&mut self) -> ParseResult<Stmt<'t>> {
        match self.peek().kind {
            TokenKind::Print => {
                self.advance();
                let expr = self.expression()?;
                self.consume(TokenKind::Semicolon, "Expect ';' after value.")?;
                Ok(Stmt::Print(expr))
            }
            _ => {
                let expr = self.expression()?;
                self.consume(TokenKind::Semicolon, "Expect ';' after expression.")?;
                Ok(Stmt::Expr(expr))
            }
        }
    }

    fn expression(&mut self) -> ParseResult<Expr<'t>> {
        self.nested(Self::equality)
    }

    fn equality(&mut self) -> ParseResult<Expr<'t>> {
        self.left_assoc(
            &[TokenKind::BangEqual, TokenKind::EqualEqual],
            Self::comparison,
        )
    }

    fn comparison(&mut self) -> ParseResult<Expr<'t>> {
        self.left_assoc(
            &[
                TokenKind::Greater,
                TokenKind::GreaterEqual,
                TokenKind::Less,
                TokenKind::LessEqual,
            ],
            Self::term,
        )
    }

    fn term(&mut self) -> ParseResult<Expr<'t>> {
        self.left_assoc(&[TokenKind::Minus, TokenKind::Plus], Self::factor)
    }

    fn factor(&mut self) -> ParseResult<Expr<'t>> {
        self.left_assoc(&[TokenKind::Slash, TokenKind::Star], Self::unary)
    }

    /// Parse `operand ( op operand )*` folding into left-associative binary nodes.
    fn left_assoc(
        &mut self,
        operators: &[TokenKind],
        operand: fn(&mut Self) -> ParseResult<Expr<'t>>,
    ) -> ParseResult<Expr<'t>> {
        let mut expr = operand(self)?;
        while let Some(operator) = self.match_any(operators) {
            let right = operand(self)?;
            expr = Expr::binary(expr, operator, right);
        }
        Ok(expr)
    }

    /// Apply `rule` one level deeper, failing once `MAX_NESTING` is exceeded.
    fn nested(
        &mut self,
        rule: fn(&mut Self) -> ParseResult<Expr<'t>>,
    ) -> ParseResult<Expr<'t>> {
        self.depth += 1;
        let res = if self.depth > MAX_NESTING {
            Err(SyntaxError::at(self.peek(), "Too much nesting."))
        } else {
            rule(self)
        };
        self.depth -= 1;
        res
    }

    fn unary(&mut self) -> ParseResult<Expr<'t>> {
        match self.match_any(&[TokenKind::Bang, TokenKind::Minus]) {
            Some(operator) => Ok(Expr::unary(operator, self.nested(Self::unary)?)),
            None => self.primary(),
        }
    }

    fn primary(&mut self) -> ParseResult<Expr<'t>> {
        let next = self.peek();
        let lit = match next.kind {
            TokenKind::False => Literal::Bool(false),
            TokenKind::True => Literal::Bool(true),
            TokenKind::Nil => Literal::Nil,
            TokenKind::Number | TokenKind::String => match &next.literal {
                Some(token::Literal::Number(n)) => Literal::Number(*n),
                Some(token::Literal::Str(s)) => Literal::Str(s.clone()),
                None => return Err(SyntaxError::at(next, "Expect expression.")),
            },
            TokenKind::LeftParen => {
                self.advance();
                let expr = self.expression()?;
                self.consume(TokenKind::RightParen, "Expect ')' after expression.")?;
                return Ok(Expr::grouping(expr));
            }
            _ => return Err(SyntaxError::at(next, "Expect expression.")),
        };
        self.advance();
        Ok(Expr::Literal(lit))
    }

    /// Skip tokens until the probable start of the next statement.
    fn synchronize(&mut self) {
        self.advance();
        while !self.is_at_end() {
            if self.previous().kind == TokenKind::Semicolon || self.peek().kind.starts_statement()
            {
                return;
            }
            self.advance();
        }
    }

    fn match_any(&mut self, kinds: &[TokenKind]) -> Option<&'t Token> {
        if kinds.contains(&self.peek().kind) {
            Some(self.advance())
        } else {
            None
        }
    }

    fn consume(&mut self, expected: TokenKind, message: &str) -> ParseResult<&'t Token> {
        if self.peek().kind == expected {
            Ok(self.advance())
        } else {
            Err(SyntaxError::at(self.peek(), message))
        }
    }

    /// Consume the current token and return it.  The end marker is never consumed.
    fn advance(&mut self) -> &'t Token {
        let token = self.peek();
        if !self.is_at_end() {
            self.current += 1;
        }
        token
    }

    fn is_at_end(&self) -> bool {
        self.peek().kind == TokenKind::Eof
    }

    fn peek(&self) -> &'t Token {
        let tokens = self.tokens;
        &tokens[self.current]
    }

    fn previous(&self) -> &'t Token {
        let tokens = self.tokens;
        &tokens[self.current.saturating_sub(1)]
    }
}
