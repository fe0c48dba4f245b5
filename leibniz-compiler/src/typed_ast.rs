//! Typed AST produced by the analyzer.
//!
//! Every expression carries its resolved [`Type`] and every name reference
//! carries the entity it resolved to. The optimizer and generator consume this
//! tree; nothing here refers back to the parse tree.

use serde::{Serialize, Serializer};

use crate::ast::{BinaryOperator, UnaryOperator};
use crate::stdlib::{ShapeClass, ShapeMethod, StdFunction};
use crate::types::Type;

/// Identity of a declared entity, unique within one analysis run.
pub type EntityId = usize;

#[derive(Debug, Clone, Default, Serialize)]
pub struct Program {
    pub statements: Vec<Statement>,
}

impl Program {
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Variable {
    pub id: EntityId,
    pub name: String,
    #[serde(rename = "type")]
    pub ty: Type,
    pub mutable: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Function {
    pub id: EntityId,
    pub name: String,
    pub parameters: Vec<Variable>,
    pub return_type: Type,
}

impl Function {
    pub fn ty(&self) -> Type {
        Type::Function {
            parameters: self
                .parameters
                .iter()
                .map(|parameter| parameter.ty.clone())
                .collect(),
            return_type: Box::new(self.return_type.clone()),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct Block {
    pub statements: Vec<Statement>,
}

impl Block {
    pub fn new(statements: Vec<Statement>) -> Self {
        Self { statements }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "kind")]
pub enum Statement {
    VariableDeclaration {
        variable: Variable,
        initializer: Expression,
    },
    FunctionDeclaration {
        function: Function,
        body: Block,
    },
    ObjectCreation {
        object: Variable,
        class: ShapeClass,
        arguments: Vec<Expression>,
    },
    If(IfStatement),
    While {
        test: Expression,
        body: Block,
    },
    ForLoop {
        iterator: Variable,
        start: Expression,
        stop: Expression,
        step: Expression,
        body: Block,
    },
    Print {
        argument: Expression,
    },
    Assignment {
        target: Expression,
        source: Expression,
    },
    Increment {
        target: Expression,
    },
    Decrement {
        target: Expression,
    },
    Break,
    Return {
        expression: Option<Expression>,
    },
    Call {
        call: Expression,
    },
}

#[derive(Debug, Clone, Serialize)]
pub struct IfStatement {
    pub test: Expression,
    pub consequent: Block,
    pub alternate: Option<Alternate>,
}

#[derive(Debug, Clone, Serialize)]
pub enum Alternate {
    Block(Block),
    If(Box<IfStatement>),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Literal {
    Integer(i64),
    Float(f64),
    String(String),
    Boolean(bool),
}

impl Literal {
    pub fn ty(&self) -> Type {
        match self {
            Literal::Integer(_) => Type::Integer,
            Literal::Float(_) => Type::Float,
            Literal::String(_) => Type::String,
            Literal::Boolean(_) => Type::Boolean,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Literal::Integer(value) => Some(*value as f64),
            Literal::Float(value) => Some(*value),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Expression {
    pub kind: ExpressionKind,
    #[serde(rename = "type")]
    pub ty: Type,
}

impl Expression {
    pub fn new(kind: ExpressionKind, ty: Type) -> Self {
        Self { kind, ty }
    }

    pub fn literal(literal: Literal) -> Self {
        let ty = literal.ty();
        Self::new(ExpressionKind::Literal(literal), ty)
    }

    pub fn variable(variable: Variable) -> Self {
        let ty = variable.ty.clone();
        Self::new(ExpressionKind::Variable(variable), ty)
    }

    pub fn as_literal(&self) -> Option<&Literal> {
        match &self.kind {
            ExpressionKind::Literal(literal) => Some(literal),
            _ => None,
        }
    }

    /// True when evaluating the expression cannot observe or change program state
    /// beyond reading variables.
    pub fn is_pure(&self) -> bool {
        match &self.kind {
            ExpressionKind::Literal(_) | ExpressionKind::Variable(_) => true,
            ExpressionKind::Unary { operand, .. } => operand.is_pure(),
            ExpressionKind::Binary { left, right, .. } => left.is_pure() && right.is_pure(),
            ExpressionKind::Array(elements) => elements.iter().all(Expression::is_pure),
            ExpressionKind::Matrix(rows) => rows.iter().flatten().all(Expression::is_pure),
            ExpressionKind::Subscript { object, index } => object.is_pure() && index.is_pure(),
            ExpressionKind::Call { .. }
            | ExpressionKind::MethodCall { .. }
            | ExpressionKind::MapOrFilter { .. } => false,
        }
    }

    /// The value of an integer literal, looking through negation.
    pub fn as_integer_constant(&self) -> Option<i64> {
        match &self.kind {
            ExpressionKind::Literal(Literal::Integer(value)) => Some(*value),
            ExpressionKind::Unary {
                operator: UnaryOperator::Negative,
                operand,
            } => operand.as_integer_constant().and_then(i64::checked_neg),
            _ => None,
        }
    }

    /// The variable this expression names, if it is a bare variable reference.
    pub fn as_variable(&self) -> Option<&Variable> {
        match &self.kind {
            ExpressionKind::Variable(variable) => Some(variable),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub enum ExpressionKind {
    Literal(Literal),
    Variable(Variable),
    Unary {
        operator: UnaryOperator,
        operand: Box<Expression>,
    },
    Binary {
        operator: BinaryOperator,
        left: Box<Expression>,
        right: Box<Expression>,
    },
    Array(Vec<Expression>),
    Matrix(Vec<Vec<Expression>>),
    Subscript {
        object: Box<Expression>,
        index: Box<Expression>,
    },
    Call {
        callee: Callee,
        arguments: Vec<Expression>,
    },
    MethodCall {
        receiver: Box<Expression>,
        class: ShapeClass,
        method: ShapeMethod,
    },
    MapOrFilter {
        receiver: Box<Expression>,
        operation: ArrayOperation,
        lambda: Lambda,
    },
}

#[derive(Debug, Clone, Serialize)]
pub enum Callee {
    User(Function),
    Intrinsic(#[serde(serialize_with = "serialize_intrinsic")] &'static StdFunction),
}

impl Callee {
    pub fn name(&self) -> &str {
        match self {
            Callee::User(function) => &function.name,
            Callee::Intrinsic(function) => function.name,
        }
    }
}

fn serialize_intrinsic<S: Serializer>(
    function: &&'static StdFunction,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(function.name)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ArrayOperation {
    Map,
    Filter,
}

impl ArrayOperation {
    pub fn name(self) -> &'static str {
        match self {
            ArrayOperation::Map => "map",
            ArrayOperation::Filter => "filter",
        }
    }
}

/// Single-parameter function applied per element by `map`/`filter`.
#[derive(Debug, Clone, Serialize)]
pub struct Lambda {
    pub parameter: Variable,
    pub body: Box<Expression>,
}
