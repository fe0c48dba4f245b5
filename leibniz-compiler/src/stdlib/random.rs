use super::{std_function, FixedType, StdArity, StdFunction, StdReturn, StdRuntime, StdType};

pub(super) const FUNCTIONS: &[StdFunction] = &[
    std_function(
        "choose",
        StdArity::Exact(2),
        &[StdType::Integer, StdType::Integer],
        StdReturn::Fixed(FixedType::Integer),
        StdRuntime::Call("math.combinations"),
    ),
    std_function(
        "perm",
        StdArity::Exact(2),
        &[StdType::Integer, StdType::Integer],
        StdReturn::Fixed(FixedType::Integer),
        StdRuntime::Call("math.permutations"),
    ),
    std_function(
        "rand",
        StdArity::Exact(2),
        &[StdType::Numeric, StdType::Numeric],
        StdReturn::Fixed(FixedType::Float),
        StdRuntime::Call("math.random"),
    ),
    std_function(
        "randint",
        StdArity::Exact(2),
        &[StdType::Integer, StdType::Integer],
        StdReturn::Fixed(FixedType::Integer),
        StdRuntime::Call("math.randomInt"),
    ),
    std_function(
        "arandom",
        StdArity::Exact(1),
        &[StdType::Array],
        StdReturn::ElementOfFirst,
        StdRuntime::Call("math.pickRandom"),
    ),
];
