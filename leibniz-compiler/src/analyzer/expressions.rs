use super::Analyzer;
use crate::ast::{self, BinaryOperator, UnaryOperator};
use crate::errors::{AnalysisError, AnalysisResult};
use crate::scope::Entity;
use crate::stdlib;
use crate::typed_ast::{Expression, ExpressionKind, Literal};
use crate::types::Type;

impl Analyzer {
    pub(super) fn analyze_expression(
        &mut self,
        expression: &ast::Expression,
    ) -> AnalysisResult<Expression> {
        match &expression.kind {
            ast::ExpressionKind::Identifier(identifier) => self.analyze_identifier(identifier),
            ast::ExpressionKind::Literal(literal) => Ok(Expression::literal(lower_literal(literal))),
            ast::ExpressionKind::Grouping(inner) => self.analyze_expression(inner),
            ast::ExpressionKind::Array(array) => self.analyze_array(array),
            ast::ExpressionKind::Unary(unary) => self.analyze_unary(unary, expression),
            ast::ExpressionKind::Binary(binary) => self.analyze_binary(binary, expression),
            ast::ExpressionKind::Index(index) => self.analyze_index(index),
            ast::ExpressionKind::Call(call) => self.analyze_call(call, expression.span),
            ast::ExpressionKind::MethodCall(call) => self.analyze_method_call(call, expression.span),
            ast::ExpressionKind::Lambda(_) => Err(AnalysisError::type_error(
                "Lambdas are only allowed as the argument of map or filter",
                expression.span,
            )),
        }
    }

    fn analyze_identifier(&mut self, identifier: &ast::Identifier) -> AnalysisResult<Expression> {
        match self.scopes.lookup(&identifier.name) {
            Some(Entity::Variable(variable)) => Ok(Expression::variable(variable.clone())),
            Some(Entity::Object(object)) => Ok(Expression::variable(object.clone())),
            Some(Entity::Function(function)) => Err(AnalysisError::type_error(
                format!("Function {} cannot be used as a value", function.name),
                identifier.span,
            )),
            None => {
                if let Some(constant) = stdlib::find_constant(&identifier.name) {
                    return Ok(Expression::literal(Literal::Float(constant.value)));
                }
                if stdlib::find_function(&identifier.name).is_some() {
                    return Err(AnalysisError::type_error(
                        format!("Function {} cannot be used as a value", identifier.name),
                        identifier.span,
                    ));
                }
                Err(AnalysisError::name(
                    format!("Identifier {} not declared", identifier.name),
                    identifier.span,
                ))
            }
        }
    }

    fn analyze_array(&mut self, array: &ast::ArrayLiteral) -> AnalysisResult<Expression> {
        let rows: Option<Vec<&ast::ArrayLiteral>> = array
            .elements
            .iter()
            .map(|element| match &element.kind {
                ast::ExpressionKind::Array(row) => Some(row),
                _ => None,
            })
            .collect();
        if let Some(rows) = rows.filter(|rows| !rows.is_empty()) {
            return self.analyze_rows(array, &rows);
        }

        let elements = array
            .elements
            .iter()
            .map(|element| self.analyze_expression(element))
            .collect::<AnalysisResult<Vec<_>>>()?;
        array_expression(elements, &array.elements)
    }

    /// An array literal whose every element is itself an array literal.
    ///
    /// Rows of scalars form a matrix. Rows holding arrays, or only empty rows,
    /// form nested arrays instead.
    fn analyze_rows(
        &mut self,
        array: &ast::ArrayLiteral,
        rows: &[&ast::ArrayLiteral],
    ) -> AnalysisResult<Expression> {
        let mut typed_rows = Vec::with_capacity(rows.len());
        for row in rows {
            let cells = row
                .elements
                .iter()
                .map(|cell| self.analyze_expression(cell))
                .collect::<AnalysisResult<Vec<_>>>()?;
            typed_rows.push(cells);
        }

        let has_cells = typed_rows.iter().any(|cells| !cells.is_empty());
        let scalar_cells = typed_rows
            .iter()
            .flatten()
            .all(|cell| !matches!(cell.ty, Type::Array(_) | Type::Matrix));
        if has_cells && scalar_cells {
            return matrix_expression(typed_rows, array, rows);
        }

        let elements = typed_rows
            .into_iter()
            .zip(rows)
            .map(|(cells, row)| array_expression(cells, &row.elements))
            .collect::<AnalysisResult<Vec<_>>>()?;
        array_expression(elements, &array.elements)
    }

    fn analyze_unary(
        &mut self,
        unary: &ast::UnaryExpression,
        expression: &ast::Expression,
    ) -> AnalysisResult<Expression> {
        let operand = self.analyze_expression(&unary.operand)?;
        let ty = match unary.operator {
            UnaryOperator::Negative if operand.ty.is_numeric() => operand.ty.clone(),
            UnaryOperator::Not if operand.ty == Type::Boolean => Type::Boolean,
            UnaryOperator::Length
                if matches!(operand.ty, Type::String | Type::Array(_) | Type::Matrix) =>
            {
                Type::Integer
            }
            operator => {
                let expected = match operator {
                    UnaryOperator::Negative => "a number",
                    UnaryOperator::Not => "a boolean",
                    UnaryOperator::Length => "a string, array or matrix",
                };
                return Err(AnalysisError::type_error(
                    format!(
                        "Operator {} expects {}, but got {}",
                        unary_symbol(operator),
                        expected,
                        operand.ty
                    ),
                    expression.span,
                ));
            }
        };

        Ok(Expression::new(
            ExpressionKind::Unary {
                operator: unary.operator,
                operand: Box::new(operand),
            },
            ty,
        ))
    }

    fn analyze_binary(
        &mut self,
        binary: &ast::BinaryExpression,
        expression: &ast::Expression,
    ) -> AnalysisResult<Expression> {
        let left = self.analyze_expression(&binary.left)?;
        let right = self.analyze_expression(&binary.right)?;
        let ty = binary_result_type(binary.operator, &left.ty, &right.ty).ok_or_else(|| {
            let symbol = binary_symbol(binary.operator);
            let message = match binary.operator {
                BinaryOperator::Equal | BinaryOperator::NotEqual => {
                    format!("Cannot compare {} with {}", left.ty, right.ty)
                }
                BinaryOperator::And | BinaryOperator::Or => format!(
                    "Operator {symbol} expects booleans, but got {} and {}",
                    left.ty, right.ty
                ),
                BinaryOperator::Add => format!(
                    "Operator + expects two numbers or two strings, but got {} and {}",
                    left.ty, right.ty
                ),
                _ => format!(
                    "Operator {symbol} expects numbers, but got {} and {}",
                    left.ty, right.ty
                ),
            };
            AnalysisError::type_error(message, expression.span)
        })?;

        Ok(Expression::new(
            ExpressionKind::Binary {
                operator: binary.operator,
                left: Box::new(left),
                right: Box::new(right),
            },
            ty,
        ))
    }

    fn analyze_index(&mut self, index: &ast::IndexExpression) -> AnalysisResult<Expression> {
        let object = self.analyze_expression(&index.object)?;
        let subscript = self.analyze_expression(&index.index)?;

        if !subscript.ty.is_numeric() {
            return Err(AnalysisError::type_error(
                format!("Index must be a number, but got {}", subscript.ty),
                index.index.span,
            ));
        }

        let ty = match &object.ty {
            Type::String => Type::String,
            Type::Array(element) if **element == Type::Unknown => {
                return Err(AnalysisError::type_error(
                    "Cannot index into an empty array of unknown element type",
                    index.object.span,
                ))
            }
            Type::Array(element) => (**element).clone(),
            Type::Matrix => Type::array_of(Type::Number),
            other => {
                return Err(AnalysisError::type_error(
                    format!("Cannot index into a value of type {other}"),
                    index.object.span,
                ))
            }
        };

        Ok(Expression::new(
            ExpressionKind::Subscript {
                object: Box::new(object),
                index: Box::new(subscript),
            },
            ty,
        ))
    }
}

/// `T[]` where `T` joins every element type.
fn array_expression(
    elements: Vec<Expression>,
    sources: &[ast::Expression],
) -> AnalysisResult<Expression> {
    let mut element_type = Type::Unknown;
    for (typed, source) in elements.iter().zip(sources) {
        element_type = match Type::join(&element_type, &typed.ty) {
            Some(joined) if joined != Type::Void => joined,
            _ => {
                return Err(AnalysisError::type_error(
                    format!(
                        "Array elements must share a type: expected {}, but got {}",
                        element_type, typed.ty
                    ),
                    source.span,
                ))
            }
        };
    }

    Ok(Expression::new(
        ExpressionKind::Array(elements),
        Type::array_of(element_type),
    ))
}

fn matrix_expression(
    rows: Vec<Vec<Expression>>,
    array: &ast::ArrayLiteral,
    sources: &[&ast::ArrayLiteral],
) -> AnalysisResult<Expression> {
    let width = rows.first().map_or(0, Vec::len);
    let lines = rows.iter().zip(sources).zip(&array.elements);
    for (index, ((cells, source), row)) in lines.enumerate() {
        if cells.len() != width {
            return Err(AnalysisError::type_error(
                format!(
                    "Matrix rows must have equal length: expected {}, but row {} has {}",
                    width,
                    index + 1,
                    cells.len()
                ),
                row.span,
            ));
        }
        for (cell, cell_source) in cells.iter().zip(&source.elements) {
            if !cell.ty.is_numeric() {
                return Err(AnalysisError::type_error(
                    format!("Matrix elements must be numeric, but got {}", cell.ty),
                    cell_source.span,
                ));
            }
        }
    }

    Ok(Expression::new(ExpressionKind::Matrix(rows), Type::Matrix))
}

/// Result type of `left <op> right`, or `None` when the operands are rejected.
pub fn binary_result_type(operator: BinaryOperator, left: &Type, right: &Type) -> Option<Type> {
    let numeric = left.is_numeric() && right.is_numeric();
    match operator {
        BinaryOperator::Add if *left == Type::String && *right == Type::String => Some(Type::String),
        BinaryOperator::Divide if *left == Type::Integer && *right == Type::Integer => {
            Some(Type::Float)
        }
        BinaryOperator::Add
        | BinaryOperator::Subtract
        | BinaryOperator::Multiply
        | BinaryOperator::Divide
        | BinaryOperator::Modulo
        | BinaryOperator::Power
            if numeric =>
        {
            Type::join(left, right)
        }
        BinaryOperator::Greater
        | BinaryOperator::GreaterEqual
        | BinaryOperator::Less
        | BinaryOperator::LessEqual
            if numeric =>
        {
            Some(Type::Boolean)
        }
        BinaryOperator::Equal | BinaryOperator::NotEqual => match Type::join(left, right) {
            Some(joined) if joined != Type::Void => Some(Type::Boolean),
            _ => None,
        },
        BinaryOperator::And | BinaryOperator::Or
            if *left == Type::Boolean && *right == Type::Boolean =>
        {
            Some(Type::Boolean)
        }
        _ => None,
    }
}

pub(crate) fn binary_symbol(operator: BinaryOperator) -> &'static str {
    match operator {
        BinaryOperator::Add => "+",
        BinaryOperator::Subtract => "-",
        BinaryOperator::Multiply => "*",
        BinaryOperator::Divide => "/",
        BinaryOperator::Modulo => "%",
        BinaryOperator::Power => "**",
        BinaryOperator::Equal => "==",
        BinaryOperator::NotEqual => "!=",
        BinaryOperator::Greater => ">",
        BinaryOperator::GreaterEqual => ">=",
        BinaryOperator::Less => "<",
        BinaryOperator::LessEqual => "<=",
        BinaryOperator::And => "&&",
        BinaryOperator::Or => "||",
    }
}

fn unary_symbol(operator: UnaryOperator) -> &'static str {
    match operator {
        UnaryOperator::Negative => "-",
        UnaryOperator::Not => "!",
        UnaryOperator::Length => "#",
    }
}

fn lower_literal(literal: &ast::Literal) -> Literal {
    match literal {
        ast::Literal::Integer(value) => Literal::Integer(*value),
        ast::Literal::Float(value) => Literal::Float(*value),
        ast::Literal::String(value) => Literal::String(value.clone()),
        ast::Literal::Boolean(value) => Literal::Boolean(*value),
    }
}
