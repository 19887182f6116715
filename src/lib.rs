//! A tree-walking interpreter for the expression core of the Lox language.
//!
//! See [Crafting Interpreters](https://craftinginterpreters.com/).
//!
//! Source text goes through three stages: [`scanner`] turns it into tokens, [`parser`] builds
//! a syntax tree and [`eval`] walks the tree.  Errors from all stages are collected in a
//! [`diag::Diagnostics`] value created for each run.
//!
//! # Examples
//!
//! See [`crate::interpreter::Interpreter`].
//!
//! # Limitations
//!
//! - Only expressions, expression statements and `print` statements are supported.  There are
//! no variables, control flow, functions or classes even though their keywords are reserved.

#![warn(rust_2018_idioms)]
#![warn(missing_debug_implementations)]

pub mod ast;
pub mod diag;
pub mod eval;
pub mod interpreter;
pub mod parser;
pub mod scanner;
pub mod token;
