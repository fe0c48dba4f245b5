mod analyzer;
mod ast;
mod compiler;
mod diagnostics;
mod errors;
mod generator;
mod lexer;
mod optimizer;
mod parser;
mod scope;
mod source;
mod stdlib;
mod typed_ast;
mod types;

pub use crate::analyzer::{always_returns, analyze, Analyzer};
pub use crate::ast::{
    AssignmentStatement, BinaryExpression, BinaryOperator, BreakStatement, CallExpression,
    ConditionalStatement, ElseBranch, ExpressionStatement, ForStatement, FunctionParameter,
    FunctionStatement, Identifier, IndexExpression, LambdaExpression, MethodCallExpression,
    ObjectStatement, PrintStatement, ReturnStatement, SourceSpan, TypeExpression,
    UnaryExpression, UnaryOperator, UpdateOperator, UpdateStatement, VarStatement,
    WhileStatement,
};
pub use crate::compiler::{Compilation, CompileOptions, Compiler};
pub use crate::diagnostics::{Diagnostic, Diagnostics};
pub use crate::errors::{AnalysisError, AnalysisResult, ErrorKind};
pub use crate::generator::{generate, PRELUDE};
pub use crate::lexer::{Keyword, Lexer, LexerError, Token, TokenKind};
pub use crate::optimizer::optimize;
pub use crate::parser::Parser;
pub use crate::scope::{DuplicateName, Entity, FunctionContext, ScopeChain, ScopeKind};
pub use crate::source::{SourceFile, SourceId};
pub use crate::stdlib::{
    find_class, find_constant, find_function, ShapeClass, ShapeMethod, StdArity, StdFunction,
    StdReturn, StdType,
};
pub use crate::types::Type;

/// The parse tree, as produced by [`Parser`].
pub mod syntax {
    pub use crate::ast::*;
}

/// The typed tree, as produced by [`analyze`].
pub mod typed {
    pub use crate::typed_ast::*;
}
