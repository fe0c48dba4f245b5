//! Machine-independent rewrites over the typed AST.
//!
//! - constant folding of unary and binary expressions over literals
//! - strength reductions (`x + 0`, `x * 1`, `0 - x`, `x ** 0`, ...)
//! - `true || ...` and `false && ...` short-circuits
//! - self assignments `x = x` become no-ops
//! - `if` with a literal test reduces to the taken arm
//! - `while false` and `for` over an empty literal domain are removed
//!
//! Anything not rewritten keeps its kind and type.

use tracing::{debug, instrument};

use crate::ast::{BinaryOperator, UnaryOperator};
use crate::typed_ast::{
    Alternate, Block, Expression, ExpressionKind, IfStatement, Lambda, Literal, Program,
    Statement,
};
use crate::types::Type;

#[instrument(skip_all, fields(statements = program.statements.len()))]
pub fn optimize(program: Program) -> Program {
    let mut optimizer = Optimizer::default();
    let statements = optimizer.statements(program.statements);
    debug!(
        folded = optimizer.folded,
        removed = optimizer.removed,
        "optimization complete"
    );
    Program { statements }
}

#[derive(Default)]
struct Optimizer {
    folded: usize,
    removed: usize,
}

impl Optimizer {
    fn statements(&mut self, statements: Vec<Statement>) -> Vec<Statement> {
        let mut output = Vec::with_capacity(statements.len());
        for statement in statements {
            self.statement(statement, &mut output);
        }
        output
    }

    fn block(&mut self, block: Block) -> Block {
        Block::new(self.statements(block.statements))
    }

    /// Pushes the rewrite of `statement` onto `output`: nothing, itself, or the
    /// statements of a taken branch.
    fn statement(&mut self, statement: Statement, output: &mut Vec<Statement>) {
        match statement {
            Statement::VariableDeclaration {
                variable,
                initializer,
            } => output.push(Statement::VariableDeclaration {
                variable,
                initializer: self.expression(initializer),
            }),
            Statement::FunctionDeclaration { function, body } => {
                output.push(Statement::FunctionDeclaration {
                    function,
                    body: self.block(body),
                })
            }
            Statement::ObjectCreation {
                object,
                class,
                arguments,
            } => output.push(Statement::ObjectCreation {
                object,
                class,
                arguments: self.expressions(arguments),
            }),
            Statement::If(conditional) => self.conditional(conditional, output),
            Statement::While { test, body } => {
                let test = self.expression(test);
                if matches!(test.as_literal(), Some(Literal::Boolean(false))) {
                    self.removed += 1;
                    return;
                }
                output.push(Statement::While {
                    test,
                    body: self.block(body),
                });
            }
            Statement::ForLoop {
                iterator,
                start,
                stop,
                step,
                body,
            } => {
                let start = self.expression(start);
                let stop = self.expression(stop);
                let step = self.expression(step);
                if is_empty_domain(&start, &stop, &step) {
                    self.removed += 1;
                    return;
                }
                output.push(Statement::ForLoop {
                    iterator,
                    start,
                    stop,
                    step,
                    body: self.block(body),
                });
            }
            Statement::Print { argument } => output.push(Statement::Print {
                argument: self.expression(argument),
            }),
            Statement::Assignment { target, source } => {
                let target = self.expression(target);
                let source = self.expression(source);
                let is_self_assignment = matches!(
                    (target.as_variable(), source.as_variable()),
                    (Some(left), Some(right)) if left.id == right.id
                );
                if is_self_assignment {
                    self.removed += 1;
                    return;
                }
                output.push(Statement::Assignment { target, source });
            }
            Statement::Increment { target } => output.push(Statement::Increment {
                target: self.expression(target),
            }),
            Statement::Decrement { target } => output.push(Statement::Decrement {
                target: self.expression(target),
            }),
            Statement::Break => output.push(Statement::Break),
            Statement::Return { expression } => output.push(Statement::Return {
                expression: expression.map(|expression| self.expression(expression)),
            }),
            Statement::Call { call } => output.push(Statement::Call {
                call: self.expression(call),
            }),
        }
    }

    fn conditional(&mut self, conditional: IfStatement, output: &mut Vec<Statement>) {
        let test = self.expression(conditional.test);
        let consequent = self.block(conditional.consequent);
        let alternate = conditional.alternate.and_then(|alternate| match alternate {
            Alternate::Block(block) => Some(Alternate::Block(self.block(block))),
            Alternate::If(nested) => {
                let mut rewritten = Vec::new();
                self.conditional(*nested, &mut rewritten);
                match single_if(rewritten) {
                    Ok(nested) => Some(Alternate::If(Box::new(nested))),
                    Err(statements) if statements.is_empty() => None,
                    Err(statements) => Some(Alternate::Block(Block::new(statements))),
                }
            }
        });

        match test.as_literal() {
            Some(Literal::Boolean(true)) => {
                self.removed += 1;
                output.extend(consequent.statements);
            }
            Some(Literal::Boolean(false)) => {
                self.removed += 1;
                match alternate {
                    Some(Alternate::Block(block)) => output.extend(block.statements),
                    Some(Alternate::If(nested)) => output.push(Statement::If(*nested)),
                    None => {}
                }
            }
            _ => output.push(Statement::If(IfStatement {
                test,
                consequent,
                alternate,
            })),
        }
    }

    fn expressions(&mut self, expressions: Vec<Expression>) -> Vec<Expression> {
        expressions
            .into_iter()
            .map(|expression| self.expression(expression))
            .collect()
    }

    fn expression(&mut self, expression: Expression) -> Expression {
        let Expression { kind, ty } = expression;
        match kind {
            ExpressionKind::Unary { operator, operand } => {
                let operand = self.expression(*operand);
                if let Some(literal) = operand.as_literal().and_then(|l| fold_unary(operator, l))
                {
                    self.folded += 1;
                    return Expression::literal(literal);
                }
                Expression::new(
                    ExpressionKind::Unary {
                        operator,
                        operand: Box::new(operand),
                    },
                    ty,
                )
            }
            ExpressionKind::Binary {
                operator,
                left,
                right,
            } => {
                let left = self.expression(*left);
                let right = self.expression(*right);
                self.binary(operator, left, right, ty)
            }
            ExpressionKind::Array(elements) => {
                Expression::new(ExpressionKind::Array(self.expressions(elements)), ty)
            }
            ExpressionKind::Matrix(rows) => {
                let rows = rows.into_iter().map(|row| self.expressions(row)).collect();
                Expression::new(ExpressionKind::Matrix(rows), ty)
            }
            ExpressionKind::Subscript { object, index } => Expression::new(
                ExpressionKind::Subscript {
                    object: Box::new(self.expression(*object)),
                    index: Box::new(self.expression(*index)),
                },
                ty,
            ),
            ExpressionKind::Call { callee, arguments } => Expression::new(
                ExpressionKind::Call {
                    callee,
                    arguments: self.expressions(arguments),
                },
                ty,
            ),
            ExpressionKind::MethodCall {
                receiver,
                class,
                method,
            } => Expression::new(
                ExpressionKind::MethodCall {
                    receiver: Box::new(self.expression(*receiver)),
                    class,
                    method,
                },
                ty,
            ),
            ExpressionKind::MapOrFilter {
                receiver,
                operation,
                lambda,
            } => Expression::new(
                ExpressionKind::MapOrFilter {
                    receiver: Box::new(self.expression(*receiver)),
                    operation,
                    lambda: Lambda {
                        parameter: lambda.parameter,
                        body: Box::new(self.expression(*lambda.body)),
                    },
                },
                ty,
            ),
            kind @ (ExpressionKind::Literal(_) | ExpressionKind::Variable(_)) => {
                Expression::new(kind, ty)
            }
        }
    }

    fn binary(
        &mut self,
        operator: BinaryOperator,
        left: Expression,
        right: Expression,
        ty: Type,
    ) -> Expression {
        if let (Some(l), Some(r)) = (left.as_literal(), right.as_literal()) {
            if let Some(folded) = fold_binary(operator, l, r) {
                self.folded += 1;
                return Expression::literal(folded);
            }
        }

        match self.reduce(operator, left, right, &ty) {
            Ok(reduced) => {
                self.folded += 1;
                reduced
            }
            Err((left, right)) => Expression::new(
                ExpressionKind::Binary {
                    operator,
                    left: Box::new(left),
                    right: Box::new(right),
                },
                ty,
            ),
        }
    }

    /// Strength reductions and boolean short-circuits. Hands the operands back
    /// untouched when no rule applies.
    fn reduce(
        &mut self,
        operator: BinaryOperator,
        left: Expression,
        right: Expression,
        ty: &Type,
    ) -> Result<Expression, (Expression, Expression)> {
        use BinaryOperator::*;

        let left_value = left.as_literal().cloned();
        let right_value = right.as_literal().cloned();
        let is = |value: &Option<Literal>, n: f64| {
            value.as_ref().and_then(Literal::as_f64) == Some(n)
        };
        let keeps = |kept: &Expression| kept.ty == *ty;

        if ty.is_numeric() {
            match operator {
                Add if is(&right_value, 0.0) && keeps(&left) => return Ok(left),
                Add if is(&left_value, 0.0) && keeps(&right) => return Ok(right),
                Subtract if is(&right_value, 0.0) && keeps(&left) => return Ok(left),
                Subtract if is(&left_value, 0.0) && keeps(&right) => {
                    return Ok(Expression::new(
                        ExpressionKind::Unary {
                            operator: UnaryOperator::Negative,
                            operand: Box::new(right),
                        },
                        ty.clone(),
                    ))
                }
                Multiply if is(&right_value, 1.0) && keeps(&left) => return Ok(left),
                Multiply if is(&left_value, 1.0) && keeps(&right) => return Ok(right),
                Divide if is(&right_value, 1.0) && keeps(&left) => return Ok(left),
                Multiply if is(&right_value, 0.0) && left.is_pure() => return Ok(zero(ty)),
                Multiply if is(&left_value, 0.0) && right.is_pure() => return Ok(zero(ty)),
                Power if is(&right_value, 0.0) && left.is_pure() => return Ok(one(ty)),
                Power if is(&left_value, 1.0) && right.is_pure() => return Ok(one(ty)),
                _ => {}
            }
        }

        match (operator, &left_value) {
            (Or, Some(Literal::Boolean(true))) | (And, Some(Literal::Boolean(false))) => {
                return Ok(left)
            }
            (Or, Some(Literal::Boolean(false))) | (And, Some(Literal::Boolean(true))) => {
                return Ok(right)
            }
            _ => {}
        }

        Err((left, right))
    }
}

/// Unwraps a rewrite that kept a single `if`.
fn single_if(statements: Vec<Statement>) -> Result<IfStatement, Vec<Statement>> {
    match <[Statement; 1]>::try_from(statements) {
        Ok([Statement::If(conditional)]) => Ok(conditional),
        Ok([other]) => Err(vec![other]),
        Err(statements) => Err(statements),
    }
}

fn is_empty_domain(start: &Expression, stop: &Expression, step: &Expression) -> bool {
    matches!(
        (start.as_literal(), stop.as_literal(), step.as_literal()),
        (
            Some(Literal::Integer(start)),
            Some(Literal::Integer(stop)),
            Some(Literal::Integer(step)),
        ) if (*step > 0 && start >= stop) || (*step < 0 && start <= stop)
    )
}

fn zero(ty: &Type) -> Expression {
    match ty {
        Type::Integer => Expression::literal(Literal::Integer(0)),
        _ => Expression::literal(Literal::Float(0.0)),
    }
}

fn one(ty: &Type) -> Expression {
    match ty {
        Type::Integer => Expression::literal(Literal::Integer(1)),
        _ => Expression::literal(Literal::Float(1.0)),
    }
}

fn fold_unary(operator: UnaryOperator, operand: &Literal) -> Option<Literal> {
    match (operator, operand) {
        (UnaryOperator::Negative, Literal::Integer(value)) => {
            value.checked_neg().map(Literal::Integer)
        }
        (UnaryOperator::Negative, Literal::Float(value)) => Some(Literal::Float(-value)),
        (UnaryOperator::Not, Literal::Boolean(value)) => Some(Literal::Boolean(!value)),
        (UnaryOperator::Length, Literal::String(value)) => {
            i64::try_from(value.encode_utf16().count())
                .ok()
                .map(Literal::Integer)
        }
        _ => None,
    }
}

fn fold_binary(operator: BinaryOperator, left: &Literal, right: &Literal) -> Option<Literal> {
    use BinaryOperator::*;

    match (left, right) {
        (Literal::Integer(l), Literal::Integer(r)) => fold_integers(operator, *l, *r),
        (Literal::String(l), Literal::String(r)) => match operator {
            Add => Some(Literal::String(format!("{l}{r}"))),
            Equal => Some(Literal::Boolean(l == r)),
            NotEqual => Some(Literal::Boolean(l != r)),
            _ => None,
        },
        (Literal::Boolean(l), Literal::Boolean(r)) => match operator {
            And => Some(Literal::Boolean(*l && *r)),
            Or => Some(Literal::Boolean(*l || *r)),
            Equal => Some(Literal::Boolean(l == r)),
            NotEqual => Some(Literal::Boolean(l != r)),
            _ => None,
        },
        _ => {
            let (l, r) = (left.as_f64()?, right.as_f64()?);
            fold_floats(operator, l, r)
        }
    }
}

fn fold_integers(operator: BinaryOperator, left: i64, right: i64) -> Option<Literal> {
    use BinaryOperator::*;

    let value = match operator {
        Add => left.checked_add(right)?,
        Subtract => left.checked_sub(right)?,
        Multiply => left.checked_mul(right)?,
        Modulo => left.checked_rem(right)?,
        Power if right >= 0 => left.checked_pow(u32::try_from(right).ok()?)?,
        // Integer division yields a float.
        Divide | Power => return fold_floats(operator, left as f64, right as f64),
        _ => return compare(operator, left.cmp(&right)),
    };
    Some(Literal::Integer(value))
}

fn fold_floats(operator: BinaryOperator, left: f64, right: f64) -> Option<Literal> {
    use BinaryOperator::*;

    let value = match operator {
        Add => left + right,
        Subtract => left - right,
        Multiply => left * right,
        Divide if right != 0.0 => left / right,
        Modulo if right != 0.0 => left % right,
        Power => left.powf(right),
        Divide | Modulo => return None,
        _ => return compare(operator, left.partial_cmp(&right)?),
    };
    value.is_finite().then_some(Literal::Float(value))
}

fn compare(operator: BinaryOperator, ordering: std::cmp::Ordering) -> Option<Literal> {
    use std::cmp::Ordering;
    use BinaryOperator::*;

    let result = match operator {
        Equal => ordering == Ordering::Equal,
        NotEqual => ordering != Ordering::Equal,
        Less => ordering == Ordering::Less,
        LessEqual => ordering != Ordering::Greater,
        Greater => ordering == Ordering::Greater,
        GreaterEqual => ordering != Ordering::Less,
        _ => return None,
    };
    Some(Literal::Boolean(result))
}
