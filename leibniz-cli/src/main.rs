use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{ArgAction, Parser, ValueEnum};
use leibniz_compiler::{CompileOptions, Compiler, Diagnostic, SourceFile, SourceId};
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Emit {
    Tokens,
    Ast,
    TypedAst,
    Js,
}

#[derive(Parser)]
#[command(
    name = "leibniz",
    version,
    about = "Compile Leibniz math scripts to JavaScript.",
    long_about = "Check a Leibniz source file and translate it to JavaScript that runs on Node with mathjs."
)]
struct Cli {
    /// Path to a Leibniz source file.
    input: PathBuf,

    /// Write the generated JavaScript to PATH instead of stdout.
    #[arg(short, long, value_name = "PATH")]
    output: Option<PathBuf>,

    /// Compiler output to print (`tokens`, `ast`, `typed-ast`, `js`). Defaults to `js`.
    #[arg(long, value_enum)]
    emit: Vec<Emit>,

    /// Skip constant folding and dead-code removal.
    #[arg(long, action = ArgAction::SetTrue)]
    no_optimize: bool,

    /// Analyze only; report errors without writing JavaScript.
    #[arg(long, action = ArgAction::SetTrue)]
    check: bool,
}

fn main() -> Result<()> {
    if let Ok(filter) = EnvFilter::try_from_env("LEIBNIZ_LOG") {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(true)
            .with_span_events(FmtSpan::CLOSE)
            .with_writer(std::io::stderr)
            .init();
        tracing::debug!("tracing initialized");
    }

    run(Cli::parse())
}

fn run(cli: Cli) -> Result<()> {
    let contents = fs::read_to_string(&cli.input)
        .with_context(|| format!("Failed to read {:?}", cli.input))?;

    let source = SourceFile::new(SourceId(0), cli.input.clone(), contents);
    let emit = if cli.emit.is_empty() {
        vec![Emit::Js]
    } else {
        cli.emit.clone()
    };

    let mut compiler = Compiler::new(CompileOptions {
        dump_tokens: emit.contains(&Emit::Tokens),
        optimize: !cli.no_optimize,
    });

    let compilation = match compiler.compile(&source) {
        Ok(compilation) => compilation,
        Err(err) => {
            if !compiler.diagnostics().is_empty() {
                eprintln!("Diagnostics:");
                for diagnostic in compiler.diagnostics().entries() {
                    print_diagnostic(&source, diagnostic);
                }
            }
            return Err(err.context("Compilation failed"));
        }
    };

    if cli.check {
        return Ok(());
    }

    if emit.contains(&Emit::Ast) {
        println!("{:#?}", compilation.syntax);
    }

    if emit.contains(&Emit::TypedAst) {
        let json = compilation
            .program
            .to_json()
            .context("Failed to serialize the typed AST")?;
        println!("{json}");
    }

    if emit.contains(&Emit::Js) || cli.output.is_some() {
        match &cli.output {
            Some(path) => {
                if let Some(parent) = path.parent() {
                    if !parent.as_os_str().is_empty() {
                        fs::create_dir_all(parent)?;
                    }
                }
                fs::write(path, format!("{}\n", compilation.javascript))
                    .with_context(|| format!("Failed to write {}", path.display()))?;
            }
            None => println!("{}", compilation.javascript),
        }
    }

    Ok(())
}

fn print_diagnostic(source: &SourceFile, diagnostic: &Diagnostic) {
    eprintln!("  - error: {}", diagnostic.message);
    let Some(span) = diagnostic.span else {
        return;
    };
    eprintln!("     --> {}:{}:{}", source.path.display(), span.line, span.column);

    let Some(raw_line) = source.line(span.line) else {
        return;
    };
    let display_line = raw_line.replace('\t', "    ");
    eprintln!("      {}", display_line);

    let mut caret_line = String::from("      ");
    for ch in raw_line.chars().take(span.column.saturating_sub(1)) {
        match ch {
            '\t' => caret_line.push_str("    "),
            _ => caret_line.push(' '),
        }
    }

    let highlight_len = if span.end_line == span.line {
        span.end_column.saturating_sub(span.column).saturating_add(1)
    } else {
        display_line
            .chars()
            .count()
            .saturating_sub(span.column.saturating_sub(1))
    };
    caret_line.push_str(&"^".repeat(highlight_len.max(1)));
    eprintln!("{}", caret_line);
}
