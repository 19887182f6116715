//! Error reporting shared by the scanner, the parser and the evaluator.

use std::fmt;
use std::io;
use std::io::prelude::*;

use thiserror::Error;

use crate::token::{Token, TokenKind};

/// Line number (starting at one).
pub type Position = u32;

/// Where on its line a syntax error was detected.
#[derive(Debug, PartialEq, Clone)]
pub enum Location {
    /// Lexical errors do not point at a token.
    Unknown,
    /// The end marker.
    AtEnd,
    /// A token, identified by its lexeme.
    At(String),
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Location::Unknown => Ok(()),
            Location::AtEnd => write!(f, " at end"),
            Location::At(lexeme) => write!(f, " at '{}'", lexeme),
        }
    }
}

/// Lexical or syntax error.
///
/// Returned by parser productions to unwind to the enclosing statement.
#[derive(Debug, PartialEq, Clone, Error)]
#[error("[line {line}] Error{location}: {message}")]
pub struct SyntaxError {
    pub line: Position,
    pub location: Location,
    pub message: String,
}

impl SyntaxError {
    /// Error raised by the scanner, not attached to any token.
    pub fn lexical(line: Position, message: &str) -> SyntaxError {
        SyntaxError {
            line,
            location: Location::Unknown,
            message: message.to_owned(),
        }
    }

    /// Error raised by the parser while looking at `token`.
    pub fn at(token: &Token, message: &str) -> SyntaxError {
        let location = match token.kind {
            TokenKind::Eof => Location::AtEnd,
            _ => Location::At(token.lexeme.clone()),
        };
        SyntaxError {
            line: token.line,
            location,
            message: message.to_owned(),
        }
    }
}

/// One entry written to the diagnostics channel.
#[derive(Debug, PartialEq, Clone)]
pub enum Report {
    Syntax(SyntaxError),
    Runtime { line: Position, message: String },
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Report::Syntax(e) => write!(f, "{}", e),
            Report::Runtime { line, message } => write!(f, "{}\n[line {}]", message, line),
        }
    }
}

/// Errors reported during a single run.
///
/// A fresh value is created for every run so that nothing leaks from one prompt line to the
/// next.
#[derive(Debug, Default)]
pub struct Diagnostics {
    reports: Vec<Report>,
    had_error: bool,
    had_runtime_error: bool,
}

impl Diagnostics {
    pub fn new() -> Diagnostics {
        Diagnostics::default()
    }

    /// Record a lexical or syntax error.
    pub fn error(&mut self, error: SyntaxError) {
        self.had_error = true;
        self.reports.push(Report::Syntax(error));
    }

    /// Record a runtime error.
    pub fn runtime_error(&mut self, line: Position, message: &str) {
        self.had_runtime_error = true;
        self.reports.push(Report::Runtime {
            line,
            message: message.to_owned(),
        });
    }

    /// True if a lexical or syntax error was recorded.
    pub fn had_error(&self) -> bool {
        self.had_error
    }

    pub fn had_runtime_error(&self) -> bool {
        self.had_runtime_error
    }

    pub fn reports(&self) -> &[Report] {
        &self.reports
    }

    /// Number of lexical and syntax errors.
    pub fn error_count(&self) -> usize {
        self.reports
            .iter()
            .filter(|r| matches!(r, Report::Syntax(_)))
            .count()
    }

    /// Write every report, one per line, in the order they were recorded.
    pub fn write_to<W: Write>(&self, out: &mut W) -> io::Result<()> {
        for report in &self.reports {
            writeln!(out, "{}", report)?;
        }
        Ok(())
    }
}
