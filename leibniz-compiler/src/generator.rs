//! JavaScript emission for Node with the `mathjs` package.
//!
//! Every variable and function renders as `<name>_<n>`, with `n` counted in
//! order of first appearance, so source names never collide with JavaScript
//! keywords or with each other across scopes.

use std::collections::HashMap;

use tracing::{debug, instrument};

use crate::ast::{BinaryOperator, UnaryOperator};
use crate::stdlib::{ShapeClass, ShapeMethod, StdFunction, StdRuntime};
use crate::typed_ast::{
    Alternate, Block, Callee, EntityId, Expression, ExpressionKind, IfStatement,
    Literal, Program, Statement,
};

pub const PRELUDE: &str = "const math = require('mathjs');";

const INDENT: &str = "  ";

#[instrument(skip_all, fields(statements = program.statements.len()))]
pub fn generate(program: &Program) -> String {
    let mut generator = Generator::default();
    generator.output.push(PRELUDE.to_string());
    for statement in &program.statements {
        generator.statement(statement);
    }
    debug!(lines = generator.output.len(), "generation complete");
    generator.output.join("\n")
}

/// Binding strength of a rendered JavaScript expression, loosest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum Precedence {
    Or,
    And,
    Equality,
    Relational,
    Additive,
    Multiplicative,
    Exponent,
    Unary,
    Postfix,
    Primary,
}

#[derive(Default)]
struct Generator {
    output: Vec<String>,
    depth: usize,
    names: HashMap<EntityId, usize>,
}

impl Generator {
    fn emit(&mut self, line: impl AsRef<str>) {
        self.output
            .push(format!("{}{}", INDENT.repeat(self.depth), line.as_ref()));
    }

    fn target_name(&mut self, id: EntityId, name: &str) -> String {
        let next = self.names.len() + 1;
        let suffix = *self.names.entry(id).or_insert(next);
        format!("{name}_{suffix}")
    }

    fn block_body(&mut self, block: &Block) {
        self.depth += 1;
        for statement in &block.statements {
            self.statement(statement);
        }
        self.depth -= 1;
    }

    fn statement(&mut self, statement: &Statement) {
        match statement {
            Statement::VariableDeclaration {
                variable,
                initializer,
            } => {
                let name = self.target_name(variable.id, &variable.name);
                let value = self.expression(initializer);
                self.emit(format!("let {name} = {value};"));
            }
            Statement::FunctionDeclaration { function, body } => {
                let name = self.target_name(function.id, &function.name);
                let parameters = function
                    .parameters
                    .iter()
                    .map(|parameter| self.target_name(parameter.id, &parameter.name))
                    .collect::<Vec<_>>()
                    .join(", ");
                self.emit(format!("function {name}({parameters}) {{"));
                self.block_body(body);
                self.emit("}");
            }
            Statement::ObjectCreation {
                object,
                class,
                arguments,
            } => {
                let name = self.target_name(object.id, &object.name);
                let arguments: Vec<String> =
                    arguments.iter().map(|argument| self.expression(argument)).collect();
                self.emit(format!("let {name} = {};", object_literal(*class, &arguments)));
            }
            Statement::If(conditional) => self.conditional(conditional),
            Statement::While { test, body } => {
                let test = self.expression(test);
                self.emit(format!("while ({test}) {{"));
                self.block_body(body);
                self.emit("}");
            }
            Statement::ForLoop {
                iterator,
                start,
                stop,
                step,
                body,
            } => {
                let name = self.target_name(iterator.id, &iterator.name);
                let start = self.expression(start);
                let stop = self.expression(stop);
                let test = match step.as_integer_constant() {
                    Some(value) if value < 0 => format!("{name} > {stop}"),
                    Some(_) => format!("{name} < {stop}"),
                    None => format!(
                        "{} > 0 ? {name} < {stop} : {name} > {stop}",
                        self.operand(step, Precedence::Additive)
                    ),
                };
                let step = self.expression(step);
                self.emit(format!(
                    "for (let {name} = {start}; {test}; {name} += {step}) {{"
                ));
                self.block_body(body);
                self.emit("}");
            }
            Statement::Print { argument } => {
                let argument = self.expression(argument);
                self.emit(format!("console.log({argument});"));
            }
            Statement::Assignment { target, source } => {
                let target = self.expression(target);
                let source = self.expression(source);
                self.emit(format!("{target} = {source};"));
            }
            Statement::Increment { target } => {
                let target = self.expression(target);
                self.emit(format!("{target}++;"));
            }
            Statement::Decrement { target } => {
                let target = self.expression(target);
                self.emit(format!("{target}--;"));
            }
            Statement::Break => self.emit("break;"),
            Statement::Return { expression: None } => self.emit("return;"),
            Statement::Return {
                expression: Some(expression),
            } => {
                let value = self.expression(expression);
                self.emit(format!("return {value};"));
            }
            Statement::Call { call } => {
                let call = self.expression(call);
                self.emit(format!("{call};"));
            }
        }
    }

    fn conditional(&mut self, conditional: &IfStatement) {
        let test = self.expression(&conditional.test);
        self.emit(format!("if ({test}) {{"));
        self.block_body(&conditional.consequent);
        match &conditional.alternate {
            None => self.emit("}"),
            Some(Alternate::Block(block)) => {
                self.emit("} else {");
                self.block_body(block);
                self.emit("}");
            }
            Some(Alternate::If(nested)) => {
                self.emit("} else");
                self.conditional(nested);
            }
        }
    }

    fn expression(&mut self, expression: &Expression) -> String {
        self.expression_with_precedence(expression).0
    }

    /// Renders `expression`, wrapping it in parentheses when it binds looser than
    /// `minimum`.
    fn operand(&mut self, expression: &Expression, minimum: Precedence) -> String {
        let (text, precedence) = self.expression_with_precedence(expression);
        if precedence < minimum {
            format!("({text})")
        } else {
            text
        }
    }

    fn expression_with_precedence(&mut self, expression: &Expression) -> (String, Precedence) {
        match &expression.kind {
            ExpressionKind::Literal(literal) => render_literal(literal),
            ExpressionKind::Variable(variable) => (
                self.target_name(variable.id, &variable.name),
                Precedence::Primary,
            ),
            ExpressionKind::Unary { operator, operand } => match operator {
                UnaryOperator::Length => {
                    let operand = self.operand(operand, Precedence::Postfix);
                    (format!("{operand}.length"), Precedence::Postfix)
                }
                UnaryOperator::Negative => {
                    let operand = self.expression(operand);
                    (format!("-({operand})"), Precedence::Unary)
                }
                UnaryOperator::Not => {
                    let operand = self.expression(operand);
                    (format!("!({operand})"), Precedence::Unary)
                }
            },
            ExpressionKind::Binary {
                operator,
                left,
                right,
            } => self.binary(*operator, left, right),
            ExpressionKind::Array(elements) => (self.list(elements), Precedence::Primary),
            ExpressionKind::Matrix(rows) => {
                let rows = rows
                    .iter()
                    .map(|row| self.list(row))
                    .collect::<Vec<_>>()
                    .join(", ");
                (format!("[{rows}]"), Precedence::Primary)
            }
            ExpressionKind::Subscript { object, index } => {
                let object = self.operand(object, Precedence::Postfix);
                let index = self.expression(index);
                (format!("{object}[{index}]"), Precedence::Postfix)
            }
            ExpressionKind::Call { callee, arguments } => {
                let arguments: Vec<String> =
                    arguments.iter().map(|argument| self.expression(argument)).collect();
                let text = match callee {
                    Callee::User(function) => format!(
                        "{}({})",
                        self.target_name(function.id, &function.name),
                        arguments.join(", ")
                    ),
                    Callee::Intrinsic(function) => intrinsic_call(function, &arguments),
                };
                (text, Precedence::Postfix)
            }
            ExpressionKind::MethodCall {
                receiver, method, ..
            } => {
                let receiver = self.operand(receiver, Precedence::Postfix);
                (format!("{receiver}.{}()", method.name()), Precedence::Postfix)
            }
            ExpressionKind::MapOrFilter {
                receiver,
                operation,
                lambda,
            } => {
                let receiver = self.operand(receiver, Precedence::Postfix);
                let parameter = self.target_name(lambda.parameter.id, &lambda.parameter.name);
                let body = self.expression(&lambda.body);
                (
                    format!("{receiver}.{}({parameter} => {body})", operation.name()),
                    Precedence::Postfix,
                )
            }
        }
    }

    fn binary(
        &mut self,
        operator: BinaryOperator,
        left: &Expression,
        right: &Expression,
    ) -> (String, Precedence) {
        let (symbol, precedence) = binary_operator(operator);
        let (left, right) = if operator == BinaryOperator::Power {
            // `**` is right associative and rejects a unary left operand.
            (
                self.operand(left, Precedence::Postfix),
                self.operand(right, Precedence::Exponent),
            )
        } else {
            (
                self.operand(left, precedence),
                self.operand(right, next_tighter(precedence)),
            )
        };
        (format!("{left} {symbol} {right}"), precedence)
    }

    fn list(&mut self, elements: &[Expression]) -> String {
        let elements = elements
            .iter()
            .map(|element| self.expression(element))
            .collect::<Vec<_>>()
            .join(", ");
        format!("[{elements}]")
    }
}

fn next_tighter(precedence: Precedence) -> Precedence {
    match precedence {
        Precedence::Or => Precedence::And,
        Precedence::And => Precedence::Equality,
        Precedence::Equality => Precedence::Relational,
        Precedence::Relational => Precedence::Additive,
        Precedence::Additive => Precedence::Multiplicative,
        Precedence::Multiplicative => Precedence::Exponent,
        Precedence::Exponent => Precedence::Unary,
        Precedence::Unary => Precedence::Postfix,
        Precedence::Postfix | Precedence::Primary => Precedence::Primary,
    }
}

fn binary_operator(operator: BinaryOperator) -> (&'static str, Precedence) {
    match operator {
        BinaryOperator::Or => ("||", Precedence::Or),
        BinaryOperator::And => ("&&", Precedence::And),
        BinaryOperator::Equal => ("===", Precedence::Equality),
        BinaryOperator::NotEqual => ("!==", Precedence::Equality),
        BinaryOperator::Less => ("<", Precedence::Relational),
        BinaryOperator::LessEqual => ("<=", Precedence::Relational),
        BinaryOperator::Greater => (">", Precedence::Relational),
        BinaryOperator::GreaterEqual => (">=", Precedence::Relational),
        BinaryOperator::Add => ("+", Precedence::Additive),
        BinaryOperator::Subtract => ("-", Precedence::Additive),
        BinaryOperator::Multiply => ("*", Precedence::Multiplicative),
        BinaryOperator::Divide => ("/", Precedence::Multiplicative),
        BinaryOperator::Modulo => ("%", Precedence::Multiplicative),
        BinaryOperator::Power => ("**", Precedence::Exponent),
    }
}

fn intrinsic_call(function: &StdFunction, arguments: &[String]) -> String {
    let joined = arguments.join(", ");
    match function.runtime {
        StdRuntime::Call(path) => format!("{path}({joined})"),
        StdRuntime::Projected(path, suffix) => format!("{path}({joined}){suffix}"),
        StdRuntime::Stringify => format!("String({joined})"),
        StdRuntime::Derivative => match arguments {
            [expression, variable, point] => {
                let key = unquote_identifier(variable)
                    .map(str::to_string)
                    .unwrap_or_else(|| format!("[{variable}]"));
                format!("math.derivative({expression}, {variable}).evaluate({{{key}: {point}}})")
            }
            _ => format!("math.derivative({joined})"),
        },
    }
}

/// The contents of a rendered string literal when they form a plain identifier.
fn unquote_identifier(rendered: &str) -> Option<&str> {
    let inner = rendered.strip_prefix('"')?.strip_suffix('"')?;
    let mut chars = inner.chars();
    let first = chars.next()?;
    let valid = (first.is_ascii_alphabetic() || first == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_');
    valid.then_some(inner)
}

fn object_literal(class: ShapeClass, arguments: &[String]) -> String {
    let definition = class.definition();
    let fields = definition
        .fields
        .iter()
        .zip(arguments)
        .map(|(field, value)| format!("{field}: {value}"));
    let methods = definition
        .methods
        .iter()
        .map(|method| format!("{}: function() {{{}}}", method.name(), method_body(class, *method)));
    let members: Vec<String> = fields.chain(methods).collect();
    format!("{{{}}}", members.join(", "))
}

fn method_body(class: ShapeClass, method: ShapeMethod) -> &'static str {
    match (class, method) {
        (ShapeClass::Circle, ShapeMethod::Area) => "return Math.PI * this.radius ** 2;",
        (ShapeClass::Circle, _) => "return 2 * Math.PI * this.radius;",
        (ShapeClass::Rectangle, ShapeMethod::Area) => "return this.base * this.height;",
        (ShapeClass::Rectangle, _) => "return 2 * (this.base + this.height);",
        (ShapeClass::Triangle, ShapeMethod::Area) => {
            "const s = (this.side1 + this.side2 + this.side3) / 2; \
             return Math.sqrt(s * (s - this.side1) * (s - this.side2) * (s - this.side3));"
        }
        (ShapeClass::Triangle, _) => "return this.side1 + this.side2 + this.side3;",
    }
}

fn render_literal(literal: &Literal) -> (String, Precedence) {
    match literal {
        Literal::Integer(value) => (value.to_string(), numeric_precedence(*value < 0)),
        Literal::Float(value) => (
            render_float(*value),
            numeric_precedence(value.is_sign_negative() && *value != 0.0),
        ),
        Literal::String(value) => (quote(value), Precedence::Primary),
        Literal::Boolean(value) => (value.to_string(), Precedence::Primary),
    }
}

/// A negative number literal renders with a leading `-` and binds like a unary.
fn numeric_precedence(negative: bool) -> Precedence {
    if negative {
        Precedence::Unary
    } else {
        Precedence::Primary
    }
}

fn render_float(value: f64) -> String {
    match value {
        v if v.is_nan() => "NaN".to_string(),
        v if v == f64::INFINITY => "Infinity".to_string(),
        v if v == f64::NEG_INFINITY => "-Infinity".to_string(),
        v => v.to_string(),
    }
}

fn quote(value: &str) -> String {
    let mut quoted = String::with_capacity(value.len() + 2);
    quoted.push('"');
    for c in value.chars() {
        match c {
            '"' => quoted.push_str("\\\""),
            '\\' => quoted.push_str("\\\\"),
            '\n' => quoted.push_str("\\n"),
            '\t' => quoted.push_str("\\t"),
            '\r' => quoted.push_str("\\r"),
            c if c.is_control() => quoted.push_str(&format!("\\u{:04x}", c as u32)),
            c => quoted.push(c),
        }
    }
    quoted.push('"');
    quoted
}
