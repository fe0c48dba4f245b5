use super::{std_function, FixedType, StdArity, StdFunction, StdReturn, StdRuntime, StdType};

const NUMERIC: &[StdType] = &[StdType::Numeric];
const FLOAT: StdReturn = StdReturn::Fixed(FixedType::Float);
const INTEGER: StdReturn = StdReturn::Fixed(FixedType::Integer);

const fn unary(
    name: &'static str,
    return_type: StdReturn,
    runtime: &'static str,
) -> StdFunction {
    std_function(
        name,
        StdArity::Exact(1),
        NUMERIC,
        return_type,
        StdRuntime::Call(runtime),
    )
}

pub(super) const FUNCTIONS: &[StdFunction] = &[
    unary("sin", FLOAT, "Math.sin"),
    unary("cos", FLOAT, "Math.cos"),
    unary("tan", FLOAT, "Math.tan"),
    unary("arcsin", FLOAT, "Math.asin"),
    unary("arccos", FLOAT, "Math.acos"),
    unary("arctan", FLOAT, "Math.atan"),
    unary("sqrt", FLOAT, "Math.sqrt"),
    unary("exp", FLOAT, "Math.exp"),
    unary("ln", FLOAT, "Math.log"),
    unary("log10", FLOAT, "Math.log10"),
    unary("abs", StdReturn::SameAsFirst, "Math.abs"),
    unary("floor", INTEGER, "Math.floor"),
    unary("ceil", INTEGER, "Math.ceil"),
    unary("round", INTEGER, "Math.round"),
    unary("zeta", FLOAT, "math.zeta"),
    std_function(
        "pow",
        StdArity::Exact(2),
        &[StdType::Numeric, StdType::Numeric],
        FLOAT,
        StdRuntime::Call("Math.pow"),
    ),
    std_function(
        "min",
        StdArity::Range { min: 1, max: 2 },
        &[StdType::Numeric, StdType::Numeric],
        StdReturn::JoinOrElement,
        StdRuntime::Call("math.min"),
    ),
    std_function(
        "max",
        StdArity::Range { min: 1, max: 2 },
        &[StdType::Numeric, StdType::Numeric],
        StdReturn::JoinOrElement,
        StdRuntime::Call("math.max"),
    ),
    std_function(
        "derivative",
        StdArity::Exact(3),
        &[StdType::String, StdType::String, StdType::Numeric],
        FLOAT,
        StdRuntime::Derivative,
    ),
    std_function(
        "str",
        StdArity::Exact(1),
        &[StdType::Any],
        StdReturn::Fixed(FixedType::String),
        StdRuntime::Stringify,
    ),
];
