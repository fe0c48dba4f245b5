use std::fs;
use std::path::Path;
use std::process::{Command, Output};

use tempfile::tempdir;

fn leibniz_binary() -> &'static str {
    env!("CARGO_BIN_EXE_leibniz")
}

fn run(script: &Path, args: &[&str]) -> Output {
    Command::new(leibniz_binary())
        .arg(script)
        .args(args)
        .output()
        .expect("run leibniz")
}

#[test]
fn prints_javascript_to_stdout() -> anyhow::Result<()> {
    let tmp = tempdir()?;
    let script_path = tmp.path().join("hello.lbz");
    fs::write(&script_path, "let x = 2 * 3;\nprint(x);\n")?;

    let output = run(&script_path, &[]);

    assert!(output.status.success(), "compilation should succeed");
    assert_eq!(
        String::from_utf8_lossy(&output.stdout),
        "const math = require('mathjs');\nlet x_1 = 6;\nconsole.log(x_1);\n"
    );
    Ok(())
}

#[test]
fn no_optimize_keeps_expressions_intact() -> anyhow::Result<()> {
    let tmp = tempdir()?;
    let script_path = tmp.path().join("plain.lbz");
    fs::write(&script_path, "print(2 * 3);\n")?;

    let output = run(&script_path, &["--no-optimize"]);

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("console.log(2 * 3);"), "{stdout}");
    Ok(())
}

#[test]
fn writes_javascript_to_the_output_path() -> anyhow::Result<()> {
    let tmp = tempdir()?;
    let script_path = tmp.path().join("area.lbz");
    fs::write(&script_path, "obj c = Circle(1);\nprint(c.area());\n")?;
    let output_path = tmp.path().join("build").join("area.js");

    let output = run(
        &script_path,
        &["--output", output_path.to_str().expect("utf-8 temp path")],
    );

    assert!(output.status.success(), "compilation should succeed");
    assert!(output.stdout.is_empty(), "nothing is printed when writing a file");
    let written = fs::read_to_string(&output_path)?;
    assert!(written.starts_with("const math = require('mathjs');\n"));
    assert!(written.ends_with("console.log(c_1.area());\n"));
    Ok(())
}

#[test]
fn check_mode_reports_success_without_output() -> anyhow::Result<()> {
    let tmp = tempdir()?;
    let script_path = tmp.path().join("ok.lbz");
    fs::write(&script_path, "print(sqrt(2));\n")?;

    let output = run(&script_path, &["--check"]);

    assert!(output.status.success());
    assert!(output.stdout.is_empty());
    Ok(())
}

#[test]
fn emits_the_typed_ast_as_json() -> anyhow::Result<()> {
    let tmp = tempdir()?;
    let script_path = tmp.path().join("typed.lbz");
    fs::write(&script_path, "let n: number = 1;\n")?;

    let output = run(&script_path, &["--emit", "typed-ast"]);

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("\"kind\": \"VariableDeclaration\""), "{stdout}");
    assert!(stdout.contains("\"type\": \"Number\""), "{stdout}");
    assert!(!stdout.contains("console.log"), "{stdout}");
    Ok(())
}

#[test]
fn emits_tokens_and_javascript_together() -> anyhow::Result<()> {
    let tmp = tempdir()?;
    let script_path = tmp.path().join("tokens.lbz");
    fs::write(&script_path, "print(1);\n")?;

    let output = run(&script_path, &["--emit", "tokens", "--emit", "js"]);

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Keyword(Print)"), "{stdout}");
    assert!(stdout.contains("console.log(1);"), "{stdout}");
    Ok(())
}

#[test]
fn highlights_semantic_errors_with_a_caret() -> anyhow::Result<()> {
    let tmp = tempdir()?;
    let script_path = tmp.path().join("bad.lbz");
    fs::write(&script_path, "let ok = 1;\nlet x: integer = 3.14;\n")?;

    let output = run(&script_path, &[]);

    assert!(!output.status.success(), "type errors fail the build");
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("error: TypeError: Cannot assign float to integer"),
        "expected the analysis message, got: {stderr}"
    );
    assert!(stderr.contains("bad.lbz:2:"), "expected a location: {stderr}");
    assert!(
        stderr.contains("let x: integer = 3.14;"),
        "expected the source line: {stderr}"
    );
    assert!(stderr.contains('^'), "expected a caret underline: {stderr}");
    assert!(stderr.contains("Compilation failed"), "{stderr}");
    assert!(output.stdout.is_empty());
    Ok(())
}

#[test]
fn reports_lexer_errors_at_their_position() -> anyhow::Result<()> {
    let tmp = tempdir()?;
    let script_path = tmp.path().join("lex.lbz");
    fs::write(&script_path, "let y = @;\n")?;

    let output = run(&script_path, &[]);

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Unexpected character '@'"), "{stderr}");
    assert!(stderr.contains("lex.lbz:1:9"), "{stderr}");
    Ok(())
}

#[test]
fn fails_cleanly_on_a_missing_file() -> anyhow::Result<()> {
    let tmp = tempdir()?;
    let output = run(&tmp.path().join("absent.lbz"), &[]);

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Failed to read"), "{stderr}");
    Ok(())
}
