use std::fmt;
use std::io;
use std::io::prelude::*;

use thiserror::Error;

use crate::ast::{Expr, Literal, Stmt};
use crate::diag::Position;
use crate::token::{Token, TokenKind};

/// Runtime value.
#[derive(Debug, PartialEq, Clone)]
pub enum Value {
    Nil,
    Bool(bool),
    Number(f64),
    Str(String),
}

impl Value {
    /// `nil` and `false` are falsey, everything else is truthy.
    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Nil => false,
            Value::Bool(b) => *b,
            Value::Number(_) | Value::Str(_) => true,
        }
    }
}

impl From<&Literal> for Value {
    fn from(lit: &Literal) -> Value {
        match lit {
            Literal::Nil => Value::Nil,
            Literal::Bool(b) => Value::Bool(*b),
            Literal::Number(n) => Value::Number(*n),
            Literal::Str(s) => Value::Str(s.clone()),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Nil => write!(f, "nil"),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Number(n) if n.is_nan() => write!(f, "NaN"),
            Value::Number(n) if n.is_infinite() => {
                write!(f, "{}Infinity", if *n < 0.0 { "-" } else { "" })
            }
            Value::Number(n) => write!(f, "{}", n),
            Value::Str(s) => write!(f, "{}", s),
        }
    }
}

const NUMBER_OPERAND: &str = "Operand must be a number.";

#[derive(Debug, Error)]
pub enum RuntimeError {
    /// Operator applied to a value of the wrong type.
    #[error("{message}")]
    Operand {
        operator: Token,
        message: &'static str,
    },

    /// Failure writing print output.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

impl RuntimeError {
    fn number_operand(operator: &Token) -> RuntimeError {
        RuntimeError::Operand {
            operator: operator.clone(),
            message: NUMBER_OPERAND,
        }
    }

    /// Line of the offending operator, if the error comes from the program.
    pub fn line(&self) -> Option<Position> {
        match self {
            RuntimeError::Operand { operator, .. } => Some(operator.line),
            RuntimeError::Io(_) => None,
        }
    }
}

/// Tree-walk evaluator.  `print` statements write to `output`.
#[derive(Debug)]
pub struct Evaluator<'o, W: Write> {
    output: &'o mut W,
}

impl<'o, W: Write> Evaluator<'o, W> {
    pub fn new(output: &'o mut W) -> Evaluator<'o, W> {
        Evaluator { output }
    }

    /// Execute statements in order, stopping at the first error.
    pub fn interpret(&mut self, stmts: &[Stmt<'_>]) -> Result<(), RuntimeError> {
        for stmt in stmts {
            self.execute(stmt)?;
        }
        Ok(())
    }

    fn execute(&mut self, stmt: &Stmt<'_>) -> Result<(), RuntimeError> {
        match stmt {
            Stmt::Expr(e) => {
                self.evaluate(e)?;
            }
            Stmt::Print(e) => {
                let v = self.evaluate(e)?;
                writeln!(self.output, "{}", v)?;
            }
        }
        Ok(())
    }

    pub fn evaluate(&self, expr: &Expr<'_>) -> Result<Value, RuntimeError> {
        match expr {
            Expr::Literal(lit) => Ok(Value::from(lit)),
            Expr::Grouping(inner) => self.evaluate(inner),
            Expr::Unary { operator, right } => {
                let right = self.evaluate(right)?;
                match operator.kind {
                    TokenKind::Bang => Ok(Value::Bool(!right.is_truthy())),
                    TokenKind::Minus => match right {
                        Value::Number(n) => Ok(Value::Number(-n)),
                        _ => Err(RuntimeError::number_operand(operator)),
                    },
                    kind => unreachable!("unary operator {} not produced by the parser", kind),
                }
            }
            Expr::Binary {
                left,
                operator,
                right,
            } => {
                let l = self.evaluate(left)?;
                let r = self.evaluate(right)?;
                match operator.kind {
                    TokenKind::Plus => Ok(match (l, r) {
                        (Value::Number(a), Value::Number(b)) => Value::Number(a + b),
                        (Value::Str(a), Value::Str(b)) => Value::Str(a + &b),
                        // mixed operands
                        _ => Value::Nil,
                    }),
                    TokenKind::Minus => arithmetic(operator, l, r, |a, b| a - b),
                    TokenKind::Star => arithmetic(operator, l, r, |a, b| a * b),
                    TokenKind::Slash => arithmetic(operator, l, r, |a, b| a / b),
                    TokenKind::Greater => comparison(operator, l, r, |a, b| a > b),
                    TokenKind::GreaterEqual => comparison(operator, l, r, |a, b| a >= b),
                    TokenKind::Less => comparison(operator, l, r, |a, b| a < b),
                    TokenKind::LessEqual => comparison(operator, l, r, |a, b| a <= b),
                    TokenKind::EqualEqual => Ok(Value::Bool(l == r)),
                    TokenKind::BangEqual => Ok(Value::Bool(l != r)),
                    kind => unreachable!("binary operator {} not produced by the parser", kind),
                }
            }
        }
    }
}

fn number_operands(operator: &Token, l: Value, r: Value) -> Result<(f64, f64), RuntimeError> {
    match (l, r) {
        (Value::Number(a), Value::Number(b)) => Ok((a, b)),
        _ => Err(RuntimeError::number_operand(operator)),
    }
}

fn arithmetic(
    operator: &Token,
    l: Value,
    r: Value,
    op: fn(f64, f64) -> f64,
) -> Result<Value, RuntimeError> {
    let (a, b) = number_operands(operator, l, r)?;
    Ok(Value::Number(op(a, b)))
}

fn comparison(
    operator: &Token,
    l: Value,
    r: Value,
    op: fn(f64, f64) -> bool,
) -> Result<Value, RuntimeError> {
    let (a, b) = number_operands(operator, l, r)?;
    Ok(Value::Bool(op(a, b)))
}
