use super::{retype_matrix_literal, Analyzer};
use crate::ast::{self, SourceSpan};
use crate::errors::{AnalysisError, AnalysisResult};
use crate::scope::{Entity, ScopeKind};
use crate::stdlib::{self, StdFunction};
use crate::typed_ast::{
    ArrayOperation, Callee, Expression, ExpressionKind, Function, Lambda, Variable,
};
use crate::types::Type;

/// Parameter name given to the synthesized lambda of `xs.map(f)`.
const IMPLICIT_PARAMETER: &str = "x";

impl Analyzer {
    pub(super) fn analyze_call(
        &mut self,
        call: &ast::CallExpression,
        span: SourceSpan,
    ) -> AnalysisResult<Expression> {
        let arguments = call
            .arguments
            .iter()
            .map(|argument| self.analyze_expression(argument))
            .collect::<AnalysisResult<Vec<_>>>()?;
        self.resolve_call(&call.callee, arguments, span)
    }

    /// Binds `callee` and checks already-analyzed `arguments` against its signature.
    ///
    /// User declarations shadow built-ins of the same name.
    fn resolve_call(
        &self,
        callee: &ast::Identifier,
        arguments: Vec<Expression>,
        span: SourceSpan,
    ) -> AnalysisResult<Expression> {
        match self.scopes.lookup(&callee.name) {
            Some(Entity::Function(function)) => check_user_call(function, arguments, span),
            Some(_) => Err(AnalysisError::type_error(
                format!("{} is not a function", callee.name),
                callee.span,
            )),
            None => match stdlib::find_function(&callee.name) {
                Some(function) => check_intrinsic_call(function, arguments, span),
                None => Err(AnalysisError::name(
                    format!("Function {} not declared", callee.name),
                    callee.span,
                )),
            },
        }
    }

    /// Whether `name` currently refers to a user function or a built-in one.
    fn names_function(&self, name: &str) -> bool {
        match self.scopes.lookup(name) {
            Some(Entity::Function(_)) => true,
            Some(_) => false,
            None => stdlib::find_function(name).is_some(),
        }
    }

    pub(super) fn analyze_method_call(
        &mut self,
        call: &ast::MethodCallExpression,
        span: SourceSpan,
    ) -> AnalysisResult<Expression> {
        if let Some(operation) = array_operation(&call.method.name) {
            return self.analyze_map_or_filter(call, operation, span);
        }

        if let ast::ExpressionKind::Identifier(identifier) = &call.receiver.kind {
            if self.scopes.lookup(&identifier.name).is_none() {
                return Err(AnalysisError::name(
                    format!("Object {} not found", identifier.name),
                    identifier.span,
                ));
            }
        }

        let receiver = self.analyze_expression(&call.receiver)?;
        let Type::Object(class) = receiver.ty else {
            return Err(AnalysisError::type_error(
                format!(
                    "Cannot call method {} on a value of type {}",
                    call.method.name, receiver.ty
                ),
                call.receiver.span,
            ));
        };

        let method = class.method(&call.method.name).ok_or_else(|| {
            AnalysisError::name(
                format!("{} is not a valid method for {}", call.method.name, class),
                call.method.span,
            )
        })?;

        if !call.arguments.is_empty() {
            return Err(AnalysisError::arity(
                format!(
                    "Method {} of {} expects 0 argument(s), but received {}",
                    method.name(),
                    class,
                    call.arguments.len()
                ),
                span,
            ));
        }

        Ok(Expression::new(
            ExpressionKind::MethodCall {
                receiver: Box::new(receiver),
                class,
                method,
            },
            Type::Float,
        ))
    }

    fn analyze_map_or_filter(
        &mut self,
        call: &ast::MethodCallExpression,
        operation: ArrayOperation,
        span: SourceSpan,
    ) -> AnalysisResult<Expression> {
        let receiver = self.analyze_expression(&call.receiver)?;
        let Type::Array(element) = &receiver.ty else {
            return Err(AnalysisError::type_error(
                format!(
                    "{} expects an array receiver, but got {}",
                    operation.name(),
                    receiver.ty
                ),
                call.receiver.span,
            ));
        };
        let element = (**element).clone();

        let [argument] = call.arguments.as_slice() else {
            return Err(AnalysisError::arity(
                format!(
                    "{} expects 1 argument(s), but received {}",
                    operation.name(),
                    call.arguments.len()
                ),
                span,
            ));
        };

        let lambda = match &argument.kind {
            ast::ExpressionKind::Lambda(lambda) => self.analyze_lambda(lambda, &element)?,
            ast::ExpressionKind::Identifier(callee) if self.names_function(&callee.name) => {
                if element == Type::Unknown {
                    return Err(AnalysisError::type_error(
                        format!(
                            "{} over an empty array needs a typed lambda such as x: number => {}",
                            operation.name(),
                            callee.name
                        ),
                        argument.span,
                    ));
                }
                let parameter = Variable {
                    id: self.scopes.allocate_id(),
                    name: IMPLICIT_PARAMETER.to_string(),
                    ty: element.clone(),
                    mutable: false,
                };
                let body = self.resolve_call(
                    callee,
                    vec![Expression::variable(parameter.clone())],
                    argument.span,
                )?;
                Lambda {
                    parameter,
                    body: Box::new(body),
                }
            }
            _ => {
                return Err(AnalysisError::type_error(
                    format!(
                        "{} expects a lambda or a function name as its argument",
                        operation.name()
                    ),
                    argument.span,
                ))
            }
        };

        let ty = match operation {
            ArrayOperation::Map => {
                if lambda.body.ty == Type::Void {
                    return Err(AnalysisError::type_error(
                        "map callback cannot return void",
                        argument.span,
                    ));
                }
                Type::array_of(lambda.body.ty.clone())
            }
            ArrayOperation::Filter => {
                if lambda.body.ty != Type::Boolean {
                    return Err(AnalysisError::type_error(
                        format!(
                            "filter callback must return boolean, but got {}",
                            lambda.body.ty
                        ),
                        argument.span,
                    ));
                }
                receiver.ty.clone()
            }
        };

        Ok(Expression::new(
            ExpressionKind::MapOrFilter {
                receiver: Box::new(receiver),
                operation,
                lambda,
            },
            ty,
        ))
    }

    fn analyze_lambda(
        &mut self,
        lambda: &ast::LambdaExpression,
        element: &Type,
    ) -> AnalysisResult<Lambda> {
        let declared = self.resolve_type(&lambda.type_annotation)?;
        if !Type::element_assignable(element, &declared) {
            return Err(AnalysisError::type_error(
                format!(
                    "Lambda parameter {}: cannot accept elements of type {} as {}",
                    lambda.parameter.name, element, declared
                ),
                lambda.type_annotation.span,
            ));
        }

        let parameter = Variable {
            id: self.scopes.allocate_id(),
            name: lambda.parameter.name.clone(),
            ty: declared,
            mutable: false,
        };

        self.with_scope(ScopeKind::Block, |analyzer| {
            analyzer.declare(
                &parameter.name,
                Entity::Variable(parameter.clone()),
                lambda.parameter.span,
            )?;

            // `x: T => f` applies the named function to the parameter.
            let body = match &lambda.body.kind {
                ast::ExpressionKind::Identifier(callee)
                    if analyzer.names_function(&callee.name) =>
                {
                    analyzer.resolve_call(
                        callee,
                        vec![Expression::variable(parameter.clone())],
                        lambda.body.span,
                    )?
                }
                _ => analyzer.analyze_expression(&lambda.body)?,
            };

            Ok(Lambda {
                parameter: parameter.clone(),
                body: Box::new(body),
            })
        })
    }
}

fn array_operation(name: &str) -> Option<ArrayOperation> {
    match name {
        "map" => Some(ArrayOperation::Map),
        "filter" => Some(ArrayOperation::Filter),
        _ => None,
    }
}

fn check_user_call(
    function: &Function,
    arguments: Vec<Expression>,
    span: SourceSpan,
) -> AnalysisResult<Expression> {
    if arguments.len() != function.parameters.len() {
        return Err(AnalysisError::arity(
            format!(
                "Function {} expects {} argument(s), but received {}",
                function.name,
                function.parameters.len(),
                arguments.len()
            ),
            span,
        ));
    }

    let arguments = arguments
        .into_iter()
        .zip(&function.parameters)
        .enumerate()
        .map(|(index, (argument, parameter))| {
            let argument = retype_matrix_literal(argument, &parameter.ty);
            if Type::assignable(&argument.ty, &parameter.ty) {
                Ok(argument)
            } else {
                Err(AnalysisError::type_error(
                    format!(
                        "Argument {} of {}: cannot pass {} as {}",
                        index + 1,
                        function.name,
                        argument.ty,
                        parameter.ty
                    ),
                    span,
                ))
            }
        })
        .collect::<AnalysisResult<Vec<_>>>()?;

    Ok(Expression::new(
        ExpressionKind::Call {
            callee: Callee::User(function.clone()),
            arguments,
        },
        function.return_type.clone(),
    ))
}

fn check_intrinsic_call(
    function: &'static StdFunction,
    arguments: Vec<Expression>,
    span: SourceSpan,
) -> AnalysisResult<Expression> {
    let count = arguments.len();
    if !function.arity.allows(count) {
        return Err(AnalysisError::arity(
            format!(
                "Function {} expects {} argument(s), but received {}",
                function.name, function.arity, count
            ),
            span,
        ));
    }

    for (index, argument) in arguments.iter().enumerate() {
        let Some(expected) = function.param(index, count) else {
            continue;
        };
        if !expected.accepts(&argument.ty) {
            return Err(AnalysisError::type_error(
                format!(
                    "Argument {} of {}: cannot pass {} as {}",
                    index + 1,
                    function.name,
                    argument.ty,
                    expected.describe()
                ),
                span,
            ));
        }
    }

    let argument_types: Vec<Type> = arguments.iter().map(|argument| argument.ty.clone()).collect();
    Ok(Expression::new(
        ExpressionKind::Call {
            callee: Callee::Intrinsic(function),
            arguments,
        },
        function.return_type.resolve(&argument_types),
    ))
}
