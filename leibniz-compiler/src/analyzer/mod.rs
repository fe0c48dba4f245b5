//! Semantic analysis: name resolution, type checking and lowering of the parse
//! tree into the typed AST.
//!
//! The walk is a single recursive pass. Statements are analyzed top-down in
//! source order against the current scope; expressions are analyzed bottom-up so
//! each parent sees its children's resolved types. The first violation aborts
//! analysis.

mod calls;
mod control_flow;
mod expressions;
mod statements;

use tracing::{debug, instrument};

use crate::ast::{self, SourceSpan, TypeExpression};
use crate::errors::{AnalysisError, AnalysisResult};
use crate::scope::{Entity, ScopeChain, ScopeKind};
use crate::stdlib;
use crate::typed_ast::{self, Expression, ExpressionKind};
use crate::types::Type;

pub use control_flow::always_returns;

/// Analyzes a whole program with a fresh root scope.
#[instrument(skip_all, fields(statements = program.statements.len()))]
pub fn analyze(program: &ast::Program) -> AnalysisResult<typed_ast::Program> {
    let mut analyzer = Analyzer::new();
    let statements = analyzer.analyze_statements(&program.statements)?;
    debug!(statements = statements.len(), "analysis complete");
    Ok(typed_ast::Program { statements })
}

pub struct Analyzer {
    scopes: ScopeChain,
}

impl Default for Analyzer {
    fn default() -> Self {
        Self::new()
    }
}

impl Analyzer {
    pub fn new() -> Self {
        Self {
            scopes: ScopeChain::new(),
        }
    }

    /// Runs `f` inside a child scope of the given kind, popping it on every exit path.
    fn with_scope<T>(
        &mut self,
        kind: ScopeKind,
        f: impl FnOnce(&mut Self) -> AnalysisResult<T>,
    ) -> AnalysisResult<T> {
        self.scopes.push(kind);
        let result = f(self);
        self.scopes.pop();
        result
    }

    fn declare(&mut self, name: &str, entity: Entity, span: SourceSpan) -> AnalysisResult<()> {
        self.scopes
            .declare(name, entity)
            .map_err(|duplicate| AnalysisError::name(duplicate.to_string(), span))
    }

    fn ensure_undeclared(&self, name: &str, span: SourceSpan) -> AnalysisResult<()> {
        if self.scopes.is_declared_locally(name) {
            return Err(AnalysisError::name(
                format!("Identifier {name} already declared in this scope"),
                span,
            ));
        }
        Ok(())
    }

    fn resolve_type(&self, annotation: &TypeExpression) -> AnalysisResult<Type> {
        let base = match annotation.name.as_str() {
            "integer" => Type::Integer,
            "float" => Type::Float,
            "number" => Type::Number,
            "boolean" => Type::Boolean,
            "string" => Type::String,
            "matrix" => Type::Matrix,
            "void" => Type::Void,
            other => match stdlib::find_class(other) {
                Some(class) => Type::Object(class),
                None => {
                    return Err(AnalysisError::name(
                        format!("Unknown type {other}"),
                        annotation.span,
                    ))
                }
            },
        };

        if base == Type::Void && annotation.dimensions > 0 {
            return Err(AnalysisError::type_error(
                "Arrays of void are not allowed",
                annotation.span,
            ));
        }

        Ok((0..annotation.dimensions).fold(base, |ty, _| Type::array_of(ty)))
    }

    /// Checks that `source` may flow into a slot of type `target`.
    ///
    /// A matrix literal flowing into a `T[][]` slot is retyped as nested arrays.
    fn coerce(
        &self,
        source: Expression,
        target: &Type,
        span: SourceSpan,
    ) -> AnalysisResult<Expression> {
        let source = retype_matrix_literal(source, target);
        if Type::assignable(&source.ty, target) {
            Ok(source)
        } else {
            Err(AnalysisError::type_error(
                format!("Cannot assign {} to {}", source.ty, target),
                span,
            ))
        }
    }
}

/// Lowers matrix literals into `T[][]` where the destination asks for nested
/// arrays, including matrices nested inside array literals.
fn retype_matrix_literal(expression: Expression, target: &Type) -> Expression {
    let Type::Array(row_target) = target else {
        return expression;
    };

    match expression.kind {
        ExpressionKind::Matrix(rows) if matches!(row_target.as_ref(), Type::Array(_)) => {
            let element = rows
                .iter()
                .flatten()
                .map(|cell| cell.ty.clone())
                .reduce(|a, b| Type::join(&a, &b).unwrap_or(Type::Number))
                .unwrap_or(Type::Number);
            let row_type = Type::array_of(element);
            let rows = rows
                .into_iter()
                .map(|row| Expression::new(ExpressionKind::Array(row), row_type.clone()))
                .collect();
            Expression::new(ExpressionKind::Array(rows), Type::array_of(row_type))
        }
        ExpressionKind::Array(elements) => {
            let elements: Vec<Expression> = elements
                .into_iter()
                .map(|element| retype_matrix_literal(element, row_target))
                .collect();
            let ty = elements
                .iter()
                .try_fold(Type::Unknown, |joined, element| Type::join(&joined, &element.ty))
                .map_or(expression.ty, Type::array_of);
            Expression::new(ExpressionKind::Array(elements), ty)
        }
        kind => Expression::new(kind, expression.ty),
    }
}
