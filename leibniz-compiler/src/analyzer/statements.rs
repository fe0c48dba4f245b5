use tracing::trace;

use super::control_flow::always_returns;
use super::Analyzer;
use crate::ast::{self, ElseBranch, UpdateOperator};
use crate::errors::{AnalysisError, AnalysisResult};
use crate::scope::{Entity, FunctionContext, ScopeKind};
use crate::stdlib;
use crate::typed_ast::{
    Alternate, Block, Expression, ExpressionKind, Function, IfStatement, Literal, Statement,
    Variable,
};
use crate::types::Type;

impl Analyzer {
    pub(super) fn analyze_statements(
        &mut self,
        statements: &[ast::Statement],
    ) -> AnalysisResult<Vec<Statement>> {
        statements
            .iter()
            .map(|statement| self.analyze_statement(statement))
            .collect()
    }

    fn analyze_block(&mut self, block: &ast::Block, kind: ScopeKind) -> AnalysisResult<Block> {
        self.with_scope(kind, |analyzer| {
            analyzer
                .analyze_statements(&block.statements)
                .map(Block::new)
        })
    }

    fn analyze_statement(&mut self, statement: &ast::Statement) -> AnalysisResult<Statement> {
        match statement {
            ast::Statement::Var(var) => self.analyze_var(var),
            ast::Statement::Function(function) => self.analyze_function(function),
            ast::Statement::Object(object) => self.analyze_object(object),
            ast::Statement::Print(print) => {
                let argument = self.analyze_expression(&print.expression)?;
                if argument.ty == Type::Void {
                    return Err(AnalysisError::type_error(
                        "Cannot print a void value",
                        print.expression.span,
                    ));
                }
                Ok(Statement::Print { argument })
            }
            ast::Statement::Conditional(conditional) => {
                Ok(Statement::If(self.analyze_conditional(conditional)?))
            }
            ast::Statement::While(while_statement) => {
                let test = self.analyze_condition(&while_statement.condition)?;
                let body = self.analyze_block(&while_statement.body, ScopeKind::Loop)?;
                Ok(Statement::While { test, body })
            }
            ast::Statement::For(for_statement) => self.analyze_for(for_statement),
            ast::Statement::Break(break_statement) => {
                if !self.scopes.in_loop() {
                    return Err(AnalysisError::control_flow(
                        "break can only appear inside a loop",
                        break_statement.span,
                    ));
                }
                Ok(Statement::Break)
            }
            ast::Statement::Return(return_statement) => self.analyze_return(return_statement),
            ast::Statement::Update(update) => self.analyze_update(update),
            ast::Statement::Assignment(assignment) => self.analyze_assignment(assignment),
            ast::Statement::Expression(expression) => {
                let call = self.analyze_expression(&expression.expression)?;
                Ok(Statement::Call { call })
            }
        }
    }

    fn analyze_var(&mut self, var: &ast::VarStatement) -> AnalysisResult<Statement> {
        self.ensure_undeclared(&var.name, var.name_span)?;

        let initializer = self.analyze_expression(&var.initializer)?;
        let declared = match &var.type_annotation {
            Some(annotation) => Some(self.resolve_type(annotation)?),
            None => None,
        };

        if initializer.ty == Type::Void {
            return Err(AnalysisError::type_error(
                format!("Cannot assign void to {}", var.name),
                var.initializer.span,
            ));
        }

        let (initializer, ty) = match declared {
            Some(ty) => (self.coerce(initializer, &ty, var.span)?, ty),
            None => {
                let ty = initializer.ty.clone();
                (initializer, ty)
            }
        };

        let variable = Variable {
            id: self.scopes.allocate_id(),
            name: var.name.clone(),
            ty,
            mutable: !var.is_const,
        };
        trace!(name = %variable.name, ty = %variable.ty, "declare variable");
        self.declare(
            &var.name,
            Entity::Variable(variable.clone()),
            var.name_span,
        )?;

        Ok(Statement::VariableDeclaration {
            variable,
            initializer,
        })
    }

    fn analyze_function(&mut self, function: &ast::FunctionStatement) -> AnalysisResult<Statement> {
        self.ensure_undeclared(&function.name, function.name_span)?;

        let return_type = match &function.return_type {
            Some(annotation) => self.resolve_type(annotation)?,
            None => Type::Void,
        };

        let mut parameters = Vec::with_capacity(function.parameters.len());
        for (index, parameter) in function.parameters.iter().enumerate() {
            if function.parameters[..index]
                .iter()
                .any(|earlier| earlier.name == parameter.name)
            {
                return Err(AnalysisError::name(
                    format!(
                        "Parameter {} declared more than once in {}",
                        parameter.name, function.name
                    ),
                    parameter.span,
                ));
            }
            let ty = self.resolve_type(&parameter.type_annotation)?;
            if ty == Type::Void {
                return Err(AnalysisError::type_error(
                    format!("Parameter {} cannot have type void", parameter.name),
                    parameter.type_annotation.span,
                ));
            }
            parameters.push(Variable {
                id: self.scopes.allocate_id(),
                name: parameter.name.clone(),
                ty,
                mutable: false,
            });
        }

        let signature = Function {
            id: self.scopes.allocate_id(),
            name: function.name.clone(),
            parameters,
            return_type: return_type.clone(),
        };
        // Bound before the body so the function may call itself.
        self.declare(
            &function.name,
            Entity::Function(signature.clone()),
            function.name_span,
        )?;

        self.scopes.push_function(FunctionContext {
            name: function.name.clone(),
            return_type: return_type.clone(),
        });
        let body = self.analyze_function_body(&signature, &function.body);
        self.scopes.pop();
        let body = body?;

        if return_type != Type::Void && !always_returns(&body.statements) {
            return Err(AnalysisError::control_flow(
                format!(
                    "Function {} must return a value of type {} on every path",
                    function.name, return_type
                ),
                function.name_span,
            ));
        }

        Ok(Statement::FunctionDeclaration {
            function: signature,
            body,
        })
    }

    fn analyze_function_body(
        &mut self,
        signature: &Function,
        body: &ast::Block,
    ) -> AnalysisResult<Block> {
        for parameter in &signature.parameters {
            self.declare(
                &parameter.name,
                Entity::Variable(parameter.clone()),
                body.span,
            )?;
        }
        self.analyze_statements(&body.statements).map(Block::new)
    }

    fn analyze_object(&mut self, object: &ast::ObjectStatement) -> AnalysisResult<Statement> {
        self.ensure_undeclared(&object.name, object.name_span)?;

        let class = stdlib::find_class(&object.class_name).ok_or_else(|| {
            AnalysisError::name(
                format!(
                    "Unknown class {}; expected Circle, Rectangle, or Triangle",
                    object.class_name
                ),
                object.class_span,
            )
        })?;

        let fields = class.definition().fields;
        if object.arguments.len() != fields.len() {
            return Err(AnalysisError::arity(
                format!(
                    "{} requires exactly {} argument(s) ({}), but got {}",
                    class,
                    fields.len(),
                    fields.join(", "),
                    object.arguments.len()
                ),
                object.span,
            ));
        }

        let mut arguments = Vec::with_capacity(object.arguments.len());
        for (index, argument) in object.arguments.iter().enumerate() {
            let typed = self.analyze_expression(argument)?;
            if !typed.ty.is_numeric() {
                return Err(AnalysisError::type_error(
                    format!(
                        "Argument {} of {}: cannot pass {} as number",
                        index + 1,
                        class,
                        typed.ty
                    ),
                    argument.span,
                ));
            }
            arguments.push(typed);
        }

        let variable = Variable {
            id: self.scopes.allocate_id(),
            name: object.name.clone(),
            ty: Type::Object(class),
            mutable: false,
        };
        self.declare(
            &object.name,
            Entity::Object(variable.clone()),
            object.name_span,
        )?;

        Ok(Statement::ObjectCreation {
            object: variable,
            class,
            arguments,
        })
    }

    fn analyze_condition(&mut self, condition: &ast::Expression) -> AnalysisResult<Expression> {
        let test = self.analyze_expression(condition)?;
        if test.ty != Type::Boolean {
            return Err(AnalysisError::type_error(
                format!("Expected a boolean condition, but got {}", test.ty),
                condition.span,
            ));
        }
        Ok(test)
    }

    fn analyze_conditional(
        &mut self,
        conditional: &ast::ConditionalStatement,
    ) -> AnalysisResult<IfStatement> {
        let test = self.analyze_condition(&conditional.condition)?;
        let consequent = self.analyze_block(&conditional.consequent, ScopeKind::Block)?;
        let alternate = match &conditional.alternative {
            Some(ElseBranch::Block(block)) => {
                Some(Alternate::Block(self.analyze_block(block, ScopeKind::Block)?))
            }
            Some(ElseBranch::If(nested)) => {
                Some(Alternate::If(Box::new(self.analyze_conditional(nested)?)))
            }
            None => None,
        };

        Ok(IfStatement {
            test,
            consequent,
            alternate,
        })
    }

    fn analyze_for(&mut self, for_statement: &ast::ForStatement) -> AnalysisResult<Statement> {
        let arguments = for_statement.domain_arguments.as_slice();
        let (start, stop, step) = match arguments {
            [stop] => (integer(0), self.domain_bound(stop, 1)?, integer(1)),
            [start, stop] => (
                self.domain_bound(start, 1)?,
                self.domain_bound(stop, 2)?,
                integer(1),
            ),
            [start, stop, step] => {
                let bounds = (
                    self.domain_bound(start, 1)?,
                    self.domain_bound(stop, 2)?,
                    self.domain_bound(step, 3)?,
                );
                if bounds.2.as_integer_constant() == Some(0) {
                    return Err(AnalysisError::type_error(
                        "domain() step cannot be zero",
                        step.span,
                    ));
                }
                bounds
            }
            _ => {
                return Err(AnalysisError::arity(
                    format!(
                        "domain() expects 1 to 3 arguments, but got {}",
                        arguments.len()
                    ),
                    for_statement.domain_span,
                ))
            }
        };

        let iterator = Variable {
            id: self.scopes.allocate_id(),
            name: for_statement.variable.name.clone(),
            ty: Type::Integer,
            mutable: false,
        };

        let body = self.with_scope(ScopeKind::Loop, |analyzer| {
            analyzer.declare(
                &iterator.name,
                Entity::Variable(iterator.clone()),
                for_statement.variable.span,
            )?;
            analyzer
                .analyze_statements(&for_statement.body.statements)
                .map(Block::new)
        })?;

        Ok(Statement::ForLoop {
            iterator,
            start,
            stop,
            step,
            body,
        })
    }

    fn domain_bound(
        &mut self,
        argument: &ast::Expression,
        position: usize,
    ) -> AnalysisResult<Expression> {
        let typed = self.analyze_expression(argument)?;
        if typed.ty != Type::Integer {
            return Err(AnalysisError::type_error(
                format!(
                    "domain() argument {position} must be integer, but got {}",
                    typed.ty
                ),
                argument.span,
            ));
        }
        Ok(typed)
    }

    fn analyze_return(&mut self, statement: &ast::ReturnStatement) -> AnalysisResult<Statement> {
        let context = self.scopes.enclosing_function().cloned().ok_or_else(|| {
            AnalysisError::control_flow("return can only appear inside a function", statement.span)
        })?;

        match &statement.expression {
            None if context.return_type == Type::Void => Ok(Statement::Return { expression: None }),
            None => Err(AnalysisError::control_flow(
                format!(
                    "Function {} must return a value of type {}",
                    context.name, context.return_type
                ),
                statement.span,
            )),
            Some(_) if context.return_type == Type::Void => {
                Err(AnalysisError::control_flow(
                    format!("Void function {} cannot return a value", context.name),
                    statement.span,
                ))
            }
            Some(expression) => {
                let typed = self.analyze_expression(expression)?;
                let typed = self.coerce(typed, &context.return_type, expression.span)?;
                Ok(Statement::Return {
                    expression: Some(typed),
                })
            }
        }
    }

    fn analyze_update(&mut self, update: &ast::UpdateStatement) -> AnalysisResult<Statement> {
        let target = self.analyze_target(&update.target)?;
        if !target.ty.is_numeric() {
            let verb = match update.operator {
                UpdateOperator::Increment => "increment",
                UpdateOperator::Decrement => "decrement",
            };
            return Err(AnalysisError::type_error(
                format!("Cannot {verb} a value of type {}", target.ty),
                update.span,
            ));
        }

        Ok(match update.operator {
            UpdateOperator::Increment => Statement::Increment { target },
            UpdateOperator::Decrement => Statement::Decrement { target },
        })
    }

    fn analyze_assignment(
        &mut self,
        assignment: &ast::AssignmentStatement,
    ) -> AnalysisResult<Statement> {
        let target = self.analyze_target(&assignment.target)?;
        let source = self.analyze_expression(&assignment.value)?;
        let source = self.coerce(source, &target.ty, assignment.span)?;
        Ok(Statement::Assignment { target, source })
    }

    /// Analyzes an assignable place: a mutable variable, optionally subscripted.
    fn analyze_target(&mut self, target: &ast::Expression) -> AnalysisResult<Expression> {
        let root = root_identifier(target).ok_or_else(|| {
            AnalysisError::type_error("Invalid assignment target", target.span)
        })?;

        match self.scopes.lookup(&root.name) {
            None => {
                return Err(AnalysisError::name(
                    format!("Identifier {} not declared", root.name),
                    root.span,
                ))
            }
            Some(Entity::Function(function)) => {
                return Err(AnalysisError::type_error(
                    format!("Cannot assign to function {}", function.name),
                    root.span,
                ))
            }
            Some(Entity::Object(object)) => {
                return Err(AnalysisError::type_error(
                    format!("Cannot assign to constant {}", object.name),
                    root.span,
                ))
            }
            Some(Entity::Variable(variable)) if !variable.mutable => {
                return Err(AnalysisError::type_error(
                    format!("Cannot assign to constant {}", variable.name),
                    root.span,
                ))
            }
            Some(Entity::Variable(_)) => {}
        }

        let typed = self.analyze_expression(target)?;
        if let ExpressionKind::Subscript { object, .. } = &typed.kind {
            if object.ty == Type::String {
                return Err(AnalysisError::type_error(
                    "Cannot assign to a character of a string",
                    target.span,
                ));
            }
        }
        Ok(typed)
    }
}

fn root_identifier(expression: &ast::Expression) -> Option<&ast::Identifier> {
    match &expression.kind {
        ast::ExpressionKind::Identifier(identifier) => Some(identifier),
        ast::ExpressionKind::Index(index) => root_identifier(&index.object),
        ast::ExpressionKind::Grouping(inner) => root_identifier(inner),
        _ => None,
    }
}

fn integer(value: i64) -> Expression {
    Expression::literal(Literal::Integer(value))
}
