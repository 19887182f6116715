//! Runs the `tlox` binary in file and prompt mode.

use std::fs;
use std::io;
use std::io::prelude::*;
use std::path::{Path, PathBuf};
use std::process::{Command, Output, Stdio};

/// Run the binary with `args`, feeding it `input` on stdin.
fn tlox(args: &[&str], input: &[u8]) -> Result<Output, io::Error> {
    let mut child = Command::new(env!("CARGO_BIN_EXE_tlox"))
        .args(args)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()?;
    if let Some(mut stdin) = child.stdin.take() {
        stdin.write_all(input)?;
    }
    child.wait_with_output()
}

fn script(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("scripts")
        .join(name)
}

fn run_script(name: &str) -> Result<Output, io::Error> {
    let path = script(name);
    tlox(&[&path.to_string_lossy()], b"")
}

fn text(bytes: &[u8]) -> String {
    String::from_utf8(bytes.to_vec()).expect("cannot convert output to string")
}

#[test]
fn prompt_stops_at_exit_sentinel() -> Result<(), io::Error> {
    let out = tlox(&[], b"print -\"x\";\nprint 1;\nexit()\nprint 2;\n")?;
    assert_eq!(out.status.code(), Some(0));
    assert_eq!(text(&out.stdout), "> > 1\n> ");
    assert_eq!(text(&out.stderr), "Operand must be a number.\n[line 1]\n");
    Ok(())
}

#[test]
fn prompt_continues_after_syntax_error() -> Result<(), io::Error> {
    let out = tlox(&[], b"print (1;\nprint 2;\n")?;
    assert_eq!(out.status.code(), Some(0));
    assert_eq!(text(&out.stdout), "> > 2\n> ");
    assert_eq!(
        text(&out.stderr),
        "[line 1] Error at ';': Expect ')' after expression.\n"
    );
    Ok(())
}

#[test]
fn prompt_ends_at_end_of_input() -> Result<(), io::Error> {
    let out = tlox(&[], b"")?;
    assert_eq!(out.status.code(), Some(0));
    assert_eq!(text(&out.stdout), "> ");
    Ok(())
}

#[test]
fn prompt_survives_invalid_utf8() -> Result<(), io::Error> {
    let out = tlox(&[], b"print 1;\n\xff\xfe\nprint 2;\n")?;
    assert_eq!(out.status.code(), Some(0));
    assert_eq!(text(&out.stdout), "> 1\n> > 2\n> ");
    assert_eq!(
        text(&out.stderr),
        "[line 1] Error: Unexpected token.\n[line 1] Error: Unexpected token.\n"
    );
    Ok(())
}

#[test]
fn too_many_arguments() -> Result<(), io::Error> {
    let out = tlox(&["a.lox", "b.lox"], b"")?;
    assert_eq!(out.status.code(), Some(64));
    assert_eq!(text(&out.stdout), "");
    assert_eq!(text(&out.stderr), "Usage: tlox [script]\n");
    Ok(())
}

#[test]
fn file_exit_statuses() -> Result<(), io::Error> {
    let ok = run_script("arithmetic.lox")?;
    assert_eq!(ok.status.code(), Some(0));
    assert!(text(&ok.stdout).starts_with("3\n3\n10\n"));

    let runtime = run_script("runtime_error.lox")?;
    assert_eq!(runtime.status.code(), Some(70));
    assert_eq!(text(&runtime.stdout), "before\n");

    let syntax = run_script("syntax_errors.lox")?;
    assert_eq!(syntax.status.code(), Some(65));
    assert_eq!(text(&syntax.stdout), "");
    Ok(())
}

#[test]
fn missing_file() -> Result<(), io::Error> {
    let out = run_script("no_such_script.lox")?;
    assert_eq!(out.status.code(), Some(74));
    assert!(text(&out.stderr).starts_with("Error: failed to open"));
    Ok(())
}

#[test]
fn file_with_invalid_utf8_in_comment() -> Result<(), io::Error> {
    let path = Path::new(env!("CARGO_TARGET_TMPDIR")).join("latin1_comment.lox");
    fs::write(&path, b"// caf\xe9\nprint \"ok\";\n")?;
    let out = tlox(&[&path.to_string_lossy()], b"")?;
    assert_eq!(out.status.code(), Some(0));
    assert_eq!(text(&out.stdout), "ok\n");
    assert_eq!(text(&out.stderr), "");
    Ok(())
}
