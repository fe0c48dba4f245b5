use super::{std_function, FixedType, StdArity, StdFunction, StdReturn, StdRuntime, StdType};

pub(super) const FUNCTIONS: &[StdFunction] = &[
    std_function(
        "dot",
        StdArity::Exact(2),
        &[StdType::NumericArray, StdType::NumericArray],
        StdReturn::Fixed(FixedType::Float),
        StdRuntime::Call("math.dot"),
    ),
    std_function(
        "cross",
        StdArity::Exact(2),
        &[StdType::NumericArray, StdType::NumericArray],
        StdReturn::Fixed(FixedType::FloatArray),
        StdRuntime::Call("math.cross"),
    ),
    std_function(
        "det",
        StdArity::Exact(1),
        &[StdType::Matrix],
        StdReturn::Fixed(FixedType::Float),
        StdRuntime::Call("math.det"),
    ),
    std_function(
        "inv",
        StdArity::Exact(1),
        &[StdType::Matrix],
        StdReturn::Fixed(FixedType::Matrix),
        StdRuntime::Call("math.inv"),
    ),
    std_function(
        "transpose",
        StdArity::Exact(1),
        &[StdType::Matrix],
        StdReturn::Fixed(FixedType::Matrix),
        StdRuntime::Call("math.transpose"),
    ),
    std_function(
        "diag",
        StdArity::Exact(1),
        &[StdType::NumericCollection],
        StdReturn::Diagonal,
        StdRuntime::Call("math.diag"),
    ),
    std_function(
        "identity",
        StdArity::Exact(1),
        &[StdType::Integer],
        StdReturn::Fixed(FixedType::Matrix),
        StdRuntime::Projected("math.identity", "._data"),
    ),
    std_function(
        "ones",
        StdArity::Exact(1),
        &[StdType::Integer],
        StdReturn::Fixed(FixedType::IntegerArray),
        StdRuntime::Projected("math.ones", "._data"),
    ),
    std_function(
        "zeros",
        StdArity::Exact(1),
        &[StdType::Integer],
        StdReturn::Fixed(FixedType::IntegerArray),
        StdRuntime::Projected("math.zeros", "._data"),
    ),
    std_function(
        "arange",
        StdArity::Exact(2),
        &[StdType::Integer, StdType::Integer],
        StdReturn::Fixed(FixedType::IntegerArray),
        StdRuntime::Projected("math.range", "._data"),
    ),
    std_function(
        "shape",
        StdArity::Exact(1),
        &[StdType::NumericCollection],
        StdReturn::Fixed(FixedType::IntegerArray),
        StdRuntime::Call("math.size"),
    ),
    std_function(
        "eigs",
        StdArity::Exact(1),
        &[StdType::Matrix],
        StdReturn::Fixed(FixedType::FloatArray),
        StdRuntime::Projected("math.eigs", ".values"),
    ),
    std_function(
        "column",
        StdArity::Exact(2),
        &[StdType::Matrix, StdType::Integer],
        StdReturn::Fixed(FixedType::NumberArray),
        StdRuntime::Call("math.column"),
    ),
];
