//! Parse tree produced by [`crate::parser::Parser`].
//!
//! Nodes mirror the surface syntax one-to-one and carry source spans; no name
//! resolution or typing has happened yet. The analyzer lowers this tree into
//! [`crate::typed_ast`].

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SourceSpan {
    pub line: usize,
    pub column: usize,
    pub end_line: usize,
    pub end_column: usize,
}

impl SourceSpan {
    pub fn new(line: usize, column: usize, end_line: usize, end_column: usize) -> Self {
        Self {
            line,
            column,
            end_line,
            end_column,
        }
    }

    pub fn single_point(line: usize, column: usize) -> Self {
        Self::new(line, column, line, column)
    }

    /// Smallest span covering both inputs; a zeroed span counts as absent.
    pub fn union(a: &Self, b: &Self) -> Self {
        if a.line == 0 {
            return *b;
        }
        if b.line == 0 {
            return *a;
        }

        let (line, column) = if (a.line, a.column) <= (b.line, b.column) {
            (a.line, a.column)
        } else {
            (b.line, b.column)
        };
        let (end_line, end_column) = if (a.end_line, a.end_column) >= (b.end_line, b.end_column) {
            (a.end_line, a.end_column)
        } else {
            (b.end_line, b.end_column)
        };

        Self::new(line, column, end_line, end_column)
    }
}

impl Default for SourceSpan {
    fn default() -> Self {
        Self::new(0, 0, 0, 0)
    }
}

#[derive(Debug, Clone, Default)]
pub struct Program {
    pub statements: Vec<Statement>,
}

impl Program {
    pub fn new(statements: Vec<Statement>) -> Self {
        Self { statements }
    }
}

#[derive(Debug, Clone)]
pub enum Statement {
    Var(VarStatement),
    Function(FunctionStatement),
    Object(ObjectStatement),
    Print(PrintStatement),
    Conditional(ConditionalStatement),
    While(WhileStatement),
    For(ForStatement),
    Break(BreakStatement),
    Return(ReturnStatement),
    Update(UpdateStatement),
    Assignment(AssignmentStatement),
    Expression(ExpressionStatement),
}

#[derive(Debug, Clone)]
pub struct VarStatement {
    pub is_const: bool,
    pub name: String,
    pub name_span: SourceSpan,
    pub type_annotation: Option<TypeExpression>,
    pub initializer: Expression,
    pub span: SourceSpan,
}

/// A written type such as `integer`, `Circle` or `float[][]`.
#[derive(Debug, Clone)]
pub struct TypeExpression {
    pub name: String,
    pub dimensions: usize,
    pub span: SourceSpan,
}

#[derive(Debug, Clone)]
pub struct FunctionStatement {
    pub name: String,
    pub name_span: SourceSpan,
    pub parameters: Vec<FunctionParameter>,
    pub return_type: Option<TypeExpression>,
    pub body: Block,
    pub span: SourceSpan,
}

#[derive(Debug, Clone)]
pub struct FunctionParameter {
    pub name: String,
    pub span: SourceSpan,
    pub type_annotation: TypeExpression,
}

#[derive(Debug, Clone)]
pub struct ObjectStatement {
    pub name: String,
    pub name_span: SourceSpan,
    pub class_name: String,
    pub class_span: SourceSpan,
    pub arguments: Vec<Expression>,
    pub span: SourceSpan,
}

#[derive(Debug, Clone)]
pub struct PrintStatement {
    pub expression: Expression,
    pub span: SourceSpan,
}

#[derive(Debug, Clone)]
pub struct ConditionalStatement {
    pub condition: Expression,
    pub consequent: Block,
    pub alternative: Option<ElseBranch>,
    pub span: SourceSpan,
}

#[derive(Debug, Clone)]
pub enum ElseBranch {
    Block(Block),
    If(Box<ConditionalStatement>),
}

#[derive(Debug, Clone)]
pub struct WhileStatement {
    pub condition: Expression,
    pub body: Block,
    pub span: SourceSpan,
}

#[derive(Debug, Clone)]
pub struct ForStatement {
    pub variable: Identifier,
    pub domain_arguments: Vec<Expression>,
    pub domain_span: SourceSpan,
    pub body: Block,
    pub span: SourceSpan,
}

#[derive(Debug, Clone)]
pub struct BreakStatement {
    pub span: SourceSpan,
}

#[derive(Debug, Clone)]
pub struct ReturnStatement {
    pub span: SourceSpan,
    pub expression: Option<Expression>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateOperator {
    Increment,
    Decrement,
}

#[derive(Debug, Clone)]
pub struct UpdateStatement {
    pub operator: UpdateOperator,
    pub target: Expression,
    pub span: SourceSpan,
}

#[derive(Debug, Clone)]
pub struct AssignmentStatement {
    pub target: Expression,
    pub value: Expression,
    pub span: SourceSpan,
}

#[derive(Debug, Clone)]
pub struct ExpressionStatement {
    pub expression: Expression,
}

#[derive(Debug, Clone, Default)]
pub struct Block {
    pub statements: Vec<Statement>,
    pub span: SourceSpan,
}

#[derive(Debug, Clone)]
pub struct Identifier {
    pub name: String,
    pub span: SourceSpan,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Integer(i64),
    Float(f64),
    String(String),
    Boolean(bool),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum UnaryOperator {
    Negative,
    Not,
    Length,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum BinaryOperator {
    Add,
    Subtract,
    Multiply,
    Divide,
    Modulo,
    Power,
    Equal,
    NotEqual,
    Greater,
    GreaterEqual,
    Less,
    LessEqual,
    And,
    Or,
}

#[derive(Debug, Clone)]
pub struct Expression {
    pub span: SourceSpan,
    pub kind: ExpressionKind,
}

#[derive(Debug, Clone)]
pub enum ExpressionKind {
    Identifier(Identifier),
    Literal(Literal),
    Array(ArrayLiteral),
    Unary(UnaryExpression),
    Binary(BinaryExpression),
    Call(CallExpression),
    MethodCall(MethodCallExpression),
    Index(IndexExpression),
    Lambda(LambdaExpression),
    Grouping(Box<Expression>),
}

#[derive(Debug, Clone)]
pub struct ArrayLiteral {
    pub elements: Vec<Expression>,
}

#[derive(Debug, Clone)]
pub struct UnaryExpression {
    pub operator: UnaryOperator,
    pub operand: Box<Expression>,
}

#[derive(Debug, Clone)]
pub struct BinaryExpression {
    pub operator: BinaryOperator,
    pub left: Box<Expression>,
    pub right: Box<Expression>,
}

#[derive(Debug, Clone)]
pub struct CallExpression {
    pub callee: Identifier,
    pub arguments: Vec<Expression>,
}

#[derive(Debug, Clone)]
pub struct MethodCallExpression {
    pub receiver: Box<Expression>,
    pub method: Identifier,
    pub arguments: Vec<Expression>,
}

#[derive(Debug, Clone)]
pub struct IndexExpression {
    pub object: Box<Expression>,
    pub index: Box<Expression>,
}

/// `x: T => body`, accepted only as the argument of `map`/`filter`.
#[derive(Debug, Clone)]
pub struct LambdaExpression {
    pub parameter: Identifier,
    pub type_annotation: TypeExpression,
    pub body: Box<Expression>,
}
