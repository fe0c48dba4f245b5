use super::{std_function, FixedType, StdArity, StdFunction, StdReturn, StdRuntime, StdType};

const COLLECTION: &[StdType] = &[StdType::NumericCollection];

const fn float_aggregate(
    name: &'static str,
    runtime: StdRuntime,
) -> StdFunction {
    std_function(
        name,
        StdArity::Exact(1),
        COLLECTION,
        StdReturn::Fixed(FixedType::Float),
        runtime,
    )
}

pub(super) const FUNCTIONS: &[StdFunction] = &[
    float_aggregate("sum", StdRuntime::Call("math.sum")),
    float_aggregate("prod", StdRuntime::Call("math.prod")),
    float_aggregate("mean", StdRuntime::Call("math.mean")),
    float_aggregate(
        "median",
        StdRuntime::Call("math.median"),
    ),
    // mathjs returns every mode; the language exposes the first.
    float_aggregate(
        "mode",
        StdRuntime::Projected("math.mode", "[0]"),
    ),
    float_aggregate("std", StdRuntime::Call("math.std")),
    float_aggregate(
        "variance",
        StdRuntime::Call("math.variance"),
    ),
    std_function(
        "sort",
        StdArity::Exact(1),
        COLLECTION,
        StdReturn::SameAsFirst,
        StdRuntime::Call("math.sort"),
    ),
    std_function(
        "count",
        StdArity::Exact(1),
        &[StdType::Countable],
        StdReturn::Fixed(FixedType::Integer),
        StdRuntime::Call("math.count"),
    ),
];
