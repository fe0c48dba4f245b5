//! Built-in functions, math constants and geometric classes.
//!
//! The tables are fixed and read-only. The analyzer consults them for name and
//! call resolution and the generator reads each entry's [`StdRuntime`] to emit
//! the JavaScript equivalent.

mod aggregate;
mod constants;
mod linalg;
mod math;
mod random;
mod shapes;

use crate::types::Type;

pub use constants::find_constant;
pub use shapes::{find_class, ShapeClass, ShapeMethod};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum StdArity {
    Exact(usize),
    Range { min: usize, max: usize },
}

impl StdArity {
    pub fn allows(self, count: usize) -> bool {
        match self {
            StdArity::Exact(expected) => expected == count,
            StdArity::Range { min, max } => (min..=max).contains(&count),
        }
    }
}

impl std::fmt::Display for StdArity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StdArity::Exact(count) => write!(f, "{count}"),
            StdArity::Range { min, max } => write!(f, "{min} to {max}"),
        }
    }
}

/// Parameter category accepted by a built-in.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum StdType {
    /// Any value except `void`.
    Any,
    Integer,
    Numeric,
    String,
    /// `T[]` for numeric `T`.
    NumericArray,
    /// `T[]` for any `T`.
    Array,
    Matrix,
    /// Numeric array or matrix.
    NumericCollection,
    /// String, array or matrix.
    Countable,
}

impl StdType {
    pub fn accepts(self, ty: &Type) -> bool {
        match self {
            StdType::Any => !matches!(ty, Type::Void),
            StdType::Integer => matches!(ty, Type::Integer),
            StdType::Numeric => ty.is_numeric(),
            StdType::String => matches!(ty, Type::String),
            StdType::NumericArray => ty.is_numeric_array(),
            StdType::Array => matches!(ty, Type::Array(_)),
            StdType::Matrix => matches!(ty, Type::Matrix),
            StdType::NumericCollection => ty.is_numeric_array() || matches!(ty, Type::Matrix),
            StdType::Countable => {
                matches!(ty, Type::String | Type::Array(_) | Type::Matrix)
            }
        }
    }

    pub fn describe(self) -> &'static str {
        match self {
            StdType::Any => "any value",
            StdType::Integer => "integer",
            StdType::Numeric => "number",
            StdType::String => "string",
            StdType::NumericArray => "number[]",
            StdType::Array => "array",
            StdType::Matrix => "matrix",
            StdType::NumericCollection => "number[] or matrix",
            StdType::Countable => "string, array or matrix",
        }
    }
}

/// How a built-in's result type follows from its arguments.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum StdReturn {
    Fixed(FixedType),
    /// Type of the first argument (`abs`, `sort`).
    SameAsFirst,
    /// Element type of the first argument, `number` for matrices.
    ElementOfFirst,
    /// Join of two numeric arguments, or the element type of a single collection.
    JoinOrElement,
    /// `diag(array) -> matrix`, `diag(matrix) -> number[]`.
    Diagonal,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FixedType {
    Integer,
    Float,
    String,
    Matrix,
    IntegerArray,
    FloatArray,
    NumberArray,
}

impl FixedType {
    pub fn to_type(self) -> Type {
        match self {
            FixedType::Integer => Type::Integer,
            FixedType::Float => Type::Float,
            FixedType::String => Type::String,
            FixedType::Matrix => Type::Matrix,
            FixedType::IntegerArray => Type::array_of(Type::Integer),
            FixedType::FloatArray => Type::array_of(Type::Float),
            FixedType::NumberArray => Type::array_of(Type::Number),
        }
    }
}

impl StdReturn {
    pub fn resolve(self, arguments: &[Type]) -> Type {
        let first = arguments.first().cloned().unwrap_or(Type::Unknown);
        match self {
            StdReturn::Fixed(fixed) => fixed.to_type(),
            StdReturn::SameAsFirst => first,
            StdReturn::ElementOfFirst => element_or_number(&first),
            StdReturn::JoinOrElement => match arguments {
                [left, right] => Type::join(left, right).unwrap_or(Type::Number),
                _ => element_or_number(&first),
            },
            StdReturn::Diagonal => match first {
                Type::Matrix => Type::array_of(Type::Number),
                _ => Type::Matrix,
            },
        }
    }
}

/// Element type of a collection argument; an empty literal yields `number`.
fn element_or_number(collection: &Type) -> Type {
    match collection.element_type() {
        Type::Unknown => Type::Number,
        element => element,
    }
}

/// JavaScript rendering of a built-in call.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum StdRuntime {
    /// `path(args)`, e.g. `Math.sqrt` or `math.mean`.
    Call(&'static str),
    /// `path(args)<suffix>`, e.g. `math.ones(n)._data`.
    Projected(&'static str, &'static str),
    /// `math.derivative(expr, var).evaluate({var: point})`.
    Derivative,
    /// `String(value)`.
    Stringify,
}

#[derive(Clone, Copy, Debug)]
pub struct StdFunction {
    pub name: &'static str,
    pub arity: StdArity,
    pub params: &'static [StdType],
    pub return_type: StdReturn,
    pub runtime: StdRuntime,
}

impl StdFunction {
    /// Parameter category for argument `index` of a call with `count` arguments.
    /// `min`/`max` take either two numbers or a single collection.
    pub fn param(&self, index: usize, count: usize) -> Option<StdType> {
        if self.return_type == StdReturn::JoinOrElement && count == 1 {
            return Some(StdType::NumericCollection);
        }
        self.params.get(index).copied()
    }
}

pub(crate) const fn std_function(
    name: &'static str,
    arity: StdArity,
    params: &'static [StdType],
    return_type: StdReturn,
    runtime: StdRuntime,
) -> StdFunction {
    StdFunction {
        name,
        arity,
        params,
        return_type,
        runtime,
    }
}

/// Every built-in function table, in lookup order.
static TABLES: &[&[StdFunction]] = &[
    math::FUNCTIONS,
    aggregate::FUNCTIONS,
    linalg::FUNCTIONS,
    random::FUNCTIONS,
];

pub fn find_function(name: &str) -> Option<&'static StdFunction> {
    TABLES
        .iter()
        .flat_map(|table| table.iter())
        .find(|function| function.name == name)
}
