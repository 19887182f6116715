//! API to control the interpreter.

use std::io;
use std::io::prelude::*;

use thiserror::Error;

use crate::diag::Diagnostics;
use crate::eval::{Evaluator, RuntimeError};
use crate::parser::Parser;
use crate::scanner::Scanner;

/// Tree-walk interpreter.
///
/// Every call to [`Interpreter::run`] is independent: it scans, parses and evaluates its input
/// from scratch.  Print output goes to `output`, diagnostics to `errors`.
///
/// # Example
///
/// ```
/// # use tlox::interpreter::{Interpreter, LoxError};
///
/// let mut output: Vec<u8> = Vec::new();
/// let mut errors: Vec<u8> = Vec::new();
/// let mut interp = Interpreter::new(&mut output, &mut errors);
///
/// interp.run("print (1 + 2) * 3;")?;
/// interp.run("print \"con\" + \"cat\";")?;
///
/// match interp.run("print -\"x\";") {
///     Err(e @ LoxError::Runtime(_)) => assert_eq!(e.exit_code(), 70),
///     r => panic!("unexpected output: {:?}", r),
/// }
///
/// assert_eq!(output, b"9\nconcat\n");
/// assert_eq!(errors, b"Operand must be a number.\n[line 1]\n");
/// # Ok::<(), LoxError>(())
/// ```
#[derive(Debug)]
pub struct Interpreter<'t, W: Write, E: Write> {
    output: &'t mut W,
    errors: &'t mut E,
}

/// Errors the interpreter can raise.
///
/// Lexical, syntax and runtime errors have already been written to the diagnostics stream when
/// they are returned.
#[derive(Debug, Error)]
pub enum LoxError {
    /// Failure reading the program or writing its output.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The program has lexical or syntax errors and was not evaluated.
    #[error("{count} error(s) before evaluation")]
    Syntax { count: usize },

    /// Error occurring during evaluation.
    #[error("runtime error: {0}")]
    Runtime(RuntimeError),
}

impl LoxError {
    /// Process exit status for this error, following `sysexits.h`.
    pub fn exit_code(&self) -> i32 {
        match self {
            LoxError::Syntax { .. } => 65,
            LoxError::Runtime(_) => 70,
            LoxError::Io(_) => 74,
        }
    }
}

impl<'t, W: Write, E: Write> Interpreter<'t, W, E> {
    pub fn new(output: &'t mut W, errors: &'t mut E) -> Interpreter<'t, W, E> {
        Interpreter { output, errors }
    }

    /// Read all of `input` and run it.
    ///
    /// Bytes that are not valid UTF-8 are replaced with U+FFFD: harmless inside comments and
    /// strings, a lexical error anywhere else.
    pub fn eval<R: BufRead>(&mut self, mut input: R) -> Result<(), LoxError> {
        let mut bytes = Vec::new();
        input.read_to_end(&mut bytes)?;
        self.run(&String::from_utf8_lossy(&bytes))
    }

    /// Run a program.
    pub fn run(&mut self, source: &str) -> Result<(), LoxError> {
        let mut diag = Diagnostics::new();
        let res = self.run_with(source, &mut diag);
        // Diagnostics are written even if flushing the output failed.
        let flushed = self.output.flush();
        diag.write_to(&mut *self.errors)?;
        flushed?;
        res
    }

    fn run_with(&mut self, source: &str, diag: &mut Diagnostics) -> Result<(), LoxError> {
        let tokens = Scanner::new(source).scan_tokens(diag);
        let prg = Parser::new(&tokens).parse(diag);
        if diag.had_error() {
            return Err(LoxError::Syntax {
                count: diag.error_count(),
            });
        }

        match Evaluator::new(&mut *self.output).interpret(&prg) {
            Ok(()) => Ok(()),
            Err(RuntimeError::Io(e)) => Err(LoxError::Io(e)),
            Err(e) => {
                if let Some(line) = e.line() {
                    diag.runtime_error(line, &e.to_string());
                }
                Err(LoxError::Runtime(e))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Run `input` and return print output and diagnostics.
    fn interpret(input: &str) -> (String, String, Result<(), LoxError>) {
        let mut raw_output: Vec<u8> = Vec::new();
        let mut raw_errors: Vec<u8> = Vec::new();
        let res = Interpreter::new(&mut raw_output, &mut raw_errors).run(input);
        let output = String::from_utf8(raw_output).expect("cannot convert output to string");
        let errors = String::from_utf8(raw_errors).expect("cannot convert errors to string");
        (output, errors, res)
    }

    #[test]
    fn print_expr() -> Result<(), LoxError> {
        let (out, errors, res) = interpret("print 3*2;");
        res?;
        assert_eq!(out, "6\n");
        assert_eq!(errors, "");
        Ok(())
    }

    #[test]
    fn several_statements() -> Result<(), LoxError> {
        let (out, _, res) = interpret("print 1;\n2;\nprint \"two\" + \"!\";\nprint 1 == 1;");
        res?;
        assert_eq!(out, "1\ntwo!\ntrue\n");
        Ok(())
    }

    #[test]
    fn empty_program() -> Result<(), LoxError> {
        let (out, errors, res) = interpret("");
        res?;
        assert_eq!((out.as_str(), errors.as_str()), ("", ""));
        Ok(())
    }

    #[test]
    fn lexical_error_prevents_evaluation() {
        let (out, errors, res) = interpret("print 1;\nprint 2 @;");
        assert_eq!(out, "");
        assert_eq!(errors, "[line 2] Error: Unexpected token.\n");
        match res {
            Err(e @ LoxError::Syntax { count: 1 }) => assert_eq!(e.exit_code(), 65),
            r => panic!("unexpected output: {:?}", r),
        }
    }

    #[test]
    fn unterminated_string() {
        let (out, errors, res) = interpret("print \"abc");
        assert_eq!(out, "");
        assert_eq!(
            errors,
            "[line 1] Error: String not closed properly\n[line 1] Error at end: Expect expression.\n"
        );
        match res {
            Err(LoxError::Syntax { count: 2 }) => (),
            r => panic!("unexpected output: {:?}", r),
        }
    }

    #[test]
    fn syntax_errors_are_all_reported() {
        let (out, errors, res) = interpret("print (1 + 2;\nprint 3;\nprint ;");
        assert_eq!(out, "");
        assert_eq!(
            errors,
            "[line 1] Error at ';': Expect ')' after expression.\n\
             [line 3] Error at ';': Expect expression.\n"
        );
        match res {
            Err(LoxError::Syntax { count: 2 }) => (),
            r => panic!("unexpected output: {:?}", r),
        }
    }

    #[test]
    fn runtime_error_keeps_earlier_output() {
        let (out, errors, res) = interpret("print 1;\nprint 2 < \"3\";\nprint 3;");
        assert_eq!(out, "1\n");
        assert_eq!(errors, "Operand must be a number.\n[line 2]\n");
        match res {
            Err(e @ LoxError::Runtime(_)) => assert_eq!(e.exit_code(), 70),
            r => panic!("unexpected output: {:?}", r),
        }
    }

    #[test]
    fn runs_are_independent() {
        let mut output: Vec<u8> = Vec::new();
        let mut errors: Vec<u8> = Vec::new();
        let mut interp = Interpreter::new(&mut output, &mut errors);
        assert!(interp.run("print ;").is_err());
        assert!(interp.run("print 5;").is_ok());
        assert_eq!(output, b"5\n");
    }

    #[test]
    fn same_source_same_result() {
        let src = "print (4 - 1) * 2 >= 6;\nprint \"a\" + 1;";
        let first = interpret(src);
        let second = interpret(src);
        assert_eq!((first.0, first.1), (second.0, second.1));
        assert!(first.2.is_ok() && second.2.is_ok());
    }

    #[test]
    fn eval_reads_input() -> Result<(), LoxError> {
        let mut output: Vec<u8> = Vec::new();
        let mut errors: Vec<u8> = Vec::new();
        Interpreter::new(&mut output, &mut errors).eval("print !nil;".as_bytes())?;
        assert_eq!(output, b"true\n");
        Ok(())
    }

    #[test]
    fn eval_replaces_invalid_utf8_in_comment() -> Result<(), LoxError> {
        let mut output: Vec<u8> = Vec::new();
        let mut errors: Vec<u8> = Vec::new();
        Interpreter::new(&mut output, &mut errors).eval(&b"// caf\xe9\nprint 1;"[..])?;
        assert_eq!(output, b"1\n");
        assert_eq!(errors, b"");
        Ok(())
    }

    #[test]
    fn eval_reports_invalid_utf8_in_code() {
        let mut output: Vec<u8> = Vec::new();
        let mut errors: Vec<u8> = Vec::new();
        let res = Interpreter::new(&mut output, &mut errors).eval(&b"print 1;\n\xff\n"[..]);
        match res {
            Err(LoxError::Syntax { count: 1 }) => (),
            r => panic!("unexpected output: {:?}", r),
        }
        assert_eq!(output, b"");
        assert_eq!(errors, b"[line 2] Error: Unexpected token.\n");
    }

    /// Accepts writes but fails to flush.
    struct NoFlush(Vec<u8>);

    impl Write for NoFlush {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.write(buf)
        }

        fn flush(&mut self) -> io::Result<()> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed"))
        }
    }

    #[test]
    fn diagnostics_written_when_flush_fails() {
        let mut output = NoFlush(Vec::new());
        let mut errors: Vec<u8> = Vec::new();
        let res = Interpreter::new(&mut output, &mut errors).run("print 1;\nprint -nil;");
        match res {
            Err(e @ LoxError::Io(_)) => assert_eq!(e.exit_code(), 74),
            r => panic!("unexpected output: {:?}", r),
        }
        assert_eq!(output.0, b"1\n");
        assert_eq!(errors, b"Operand must be a number.\n[line 2]\n");
    }

    #[test]
    fn exit_code_for_io_error() {
        let e = LoxError::from(io::Error::new(io::ErrorKind::NotFound, "gone"));
        assert_eq!(e.exit_code(), 74);
    }
}
