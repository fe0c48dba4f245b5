use anyhow::{bail, Result};
use tracing::debug;

use crate::analyzer;
use crate::ast::{self, SourceSpan};
use crate::diagnostics::Diagnostics;
use crate::generator;
use crate::lexer::{Lexer, LexerError};
use crate::optimizer;
use crate::parser::Parser;
use crate::source::SourceFile;
use crate::typed_ast;

#[derive(Debug, Clone)]
pub struct CompileOptions {
    pub dump_tokens: bool,
    pub optimize: bool,
}

impl Default for CompileOptions {
    fn default() -> Self {
        Self {
            dump_tokens: false,
            optimize: true,
        }
    }
}

/// Everything one successful run of the pipeline produced.
pub struct Compilation {
    pub syntax: ast::Program,
    pub program: typed_ast::Program,
    pub javascript: String,
}

pub struct Compiler {
    diagnostics: Diagnostics,
    options: CompileOptions,
}

impl Compiler {
    pub fn new(options: CompileOptions) -> Self {
        Self {
            diagnostics: Diagnostics::new(),
            options,
        }
    }

    pub fn diagnostics(&self) -> &Diagnostics {
        &self.diagnostics
    }

    pub fn compile(&mut self, source: &SourceFile) -> Result<Compilation> {
        let mut lexer = Lexer::new(source);
        let tokens = match lexer.tokenize() {
            Ok(tokens) => tokens,
            Err(err) => {
                if let Some(lexer_error) = err.downcast_ref::<LexerError>() {
                    self.diagnostics.push_error_with_span(
                        lexer_error.to_string(),
                        Some(SourceSpan::single_point(
                            lexer_error.line(),
                            lexer_error.column(),
                        )),
                    );
                } else {
                    self.diagnostics.push_error_with_span(err.to_string(), None);
                }
                bail!("Lexing failed");
            }
        };
        debug!(tokens = tokens.len(), "lexing complete");

        if self.options.dump_tokens {
            for token in &tokens {
                println!("{token:?}");
            }
        }

        let mut parser = Parser::new(source, tokens);
        let parsed = parser.parse();
        self.diagnostics.extend(parser.into_diagnostics());
        let syntax = parsed?;
        debug!(statements = syntax.statements.len(), "parsing complete");

        let program = match analyzer::analyze(&syntax) {
            Ok(program) => program,
            Err(error) => {
                self.diagnostics.push_analysis_error(&error);
                bail!("Semantic analysis failed");
            }
        };

        let program = if self.options.optimize {
            optimizer::optimize(program)
        } else {
            program
        };

        let javascript = generator::generate(&program);

        Ok(Compilation {
            syntax,
            program,
            javascript,
        })
    }
}
