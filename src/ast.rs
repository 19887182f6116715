//! Syntax tree.
//!
//! Operator tokens are borrowed from the token sequence the tree was parsed from, so a tree
//! cannot outlive its tokens.

use std::fmt;

use crate::token::Token;

#[derive(Debug, PartialEq, Clone)]
pub enum Stmt<'t> {
    /// Evaluated for its side effects, the value is discarded.
    Expr(Expr<'t>),
    Print(Expr<'t>),
}

#[derive(Debug, PartialEq, Clone)]
pub enum Expr<'t> {
    Literal(Literal),
    Grouping(Box<Expr<'t>>),
    Unary {
        operator: &'t Token,
        right: Box<Expr<'t>>,
    },
    Binary {
        left: Box<Expr<'t>>,
        operator: &'t Token,
        right: Box<Expr<'t>>,
    },
}

/// Constant appearing in source text.
#[derive(Debug, PartialEq, Clone)]
pub enum Literal {
    Nil,
    Bool(bool),
    Number(f64),
    Str(String),
}

impl<'t> Expr<'t> {
    pub fn unary(operator: &'t Token, right: Expr<'t>) -> Expr<'t> {
        Expr::Unary {
            operator,
            right: Box::new(right),
        }
    }

    pub fn binary(left: Expr<'t>, operator: &'t Token, right: Expr<'t>) -> Expr<'t> {
        Expr::Binary {
            left: Box::new(left),
            operator,
            right: Box::new(right),
        }
    }

    pub fn grouping(inner: Expr<'t>) -> Expr<'t> {
        Expr::Grouping(Box::new(inner))
    }
}

// Debug rendering in fully parenthesized prefix form, e.g. `(* (- 123.0) (group 45.67))`.

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Literal::Nil => write!(f, "nil"),
            Literal::Bool(b) => write!(f, "{}", b),
            Literal::Number(n) => write!(f, "{:?}", n),
            Literal::Str(s) => write!(f, "{}", s),
        }
    }
}

impl fmt::Display for Expr<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Literal(lit) => write!(f, "{}", lit),
            Expr::Grouping(inner) => write!(f, "(group {})", inner),
            Expr::Unary { operator, right } => write!(f, "({} {})", operator.lexeme, right),
            Expr::Binary {
                left,
                operator,
                right,
            } => write!(f, "({} {} {})", operator.lexeme, left, right),
        }
    }
}

impl fmt::Display for Stmt<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stmt::Expr(e) => write!(f, "(; {})", e),
            Stmt::Print(e) => write!(f, "(print {})", e),
        }
    }
}
