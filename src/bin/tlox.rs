//! Lox interpreter command-line.
//!
//! When called without argument it drops into an interactive read-evaluate-print loop, left on
//! end of input or on `exit()`.
//!
//! When called with a single argument, it runs the corresponding file and exits with status 65
//! on lexical or syntax errors and 70 on runtime errors.

use std::env;
use std::fs::File;
use std::io;
use std::io::prelude::*;
use std::io::BufReader;
use std::process;

use anyhow::{self, Context};

use tlox::interpreter::{Interpreter, LoxError};

const EX_USAGE: i32 = 64;
const EX_IOERR: i32 = 74;

fn main() -> Result<(), anyhow::Error> {
    let args = env::args().skip(1).collect::<Vec<_>>();
    match args.as_slice() {
        [] => run_prompt()?,
        [path] => {
            let status = run_file(path).unwrap_or_else(|e| {
                eprintln!("Error: {:#}", e);
                EX_IOERR
            });
            process::exit(status);
        }
        _ => {
            eprintln!("Usage: tlox [script]");
            process::exit(EX_USAGE);
        }
    }
    Ok(())
}

/// Run a script and return the process exit status.
fn run_file(path: &str) -> Result<i32, anyhow::Error> {
    let reader =
        BufReader::new(File::open(path).with_context(|| format!("failed to open {}", path))?);

    let mut interp_stdout = io::stdout();
    let mut interp_stderr = io::stderr();
    let mut interp = Interpreter::new(&mut interp_stdout, &mut interp_stderr);

    match interp.eval(reader) {
        Ok(()) => Ok(0),
        Err(LoxError::Io(e)) => Err(e).with_context(|| format!("failed to run {}", path)),
        Err(e) => Ok(e.exit_code()),
    }
}

fn run_prompt() -> Result<(), anyhow::Error> {
    let stdin = io::stdin();
    let mut repl_stdout = io::stdout();
    let mut interp_stdout = io::stdout();
    let mut interp_stderr = io::stderr();

    let mut interp = Interpreter::new(&mut interp_stdout, &mut interp_stderr);

    let mut input: Vec<u8> = Vec::new();
    loop {
        repl_stdout.write_all(b"> ")?;
        repl_stdout.flush()?;

        input.clear();
        let nbytes = stdin.lock().read_until(b'\n', &mut input)?;
        if nbytes == 0 {
            break;
        }

        // Invalid UTF-8 becomes U+FFFD and is reported by the scanner.
        let decoded = String::from_utf8_lossy(&input);
        let line = decoded.trim_end_matches(&['\n', '\r'][..]);
        if line == "exit()" {
            break;
        }

        // Errors were reported by the interpreter, the session goes on.
        match interp.run(line) {
            Err(LoxError::Io(e)) => return Err(e).context("failed to write output"),
            Ok(()) | Err(_) => (),
        }
    }

    Ok(())
}
