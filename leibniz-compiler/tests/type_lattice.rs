//! Property-based tests for the numeric lattice and structural assignability.

use leibniz_compiler::{ShapeClass, Type};
use proptest::prelude::*;

fn leaf_type() -> impl Strategy<Value = Type> {
    prop_oneof![
        Just(Type::Integer),
        Just(Type::Float),
        Just(Type::Number),
        Just(Type::Boolean),
        Just(Type::String),
        Just(Type::Void),
        Just(Type::Matrix),
        Just(Type::Object(ShapeClass::Circle)),
        Just(Type::Object(ShapeClass::Triangle)),
    ]
}

/// Types without `unknown`, whose arrays match any array and so break transitivity.
fn known_type() -> impl Strategy<Value = Type> {
    leaf_type().prop_recursive(3, 32, 3, |inner| {
        prop_oneof![
            inner.clone().prop_map(Type::array_of),
            (prop::collection::vec(inner.clone(), 0..3), inner).prop_map(
                |(parameters, return_type)| Type::Function {
                    parameters,
                    return_type: Box::new(return_type),
                }
            ),
        ]
    })
}

fn any_type() -> impl Strategy<Value = Type> {
    prop_oneof![
        4 => known_type(),
        1 => Just(Type::array_of(Type::Unknown)),
    ]
}

fn numeric_type() -> impl Strategy<Value = Type> {
    prop_oneof![Just(Type::Integer), Just(Type::Float), Just(Type::Number)]
}

proptest! {
    #[test]
    fn every_type_is_assignable_to_itself(ty in any_type()) {
        prop_assert!(Type::assignable(&ty, &ty), "{} should accept itself", ty);
    }

    #[test]
    fn join_is_commutative(a in any_type(), b in any_type()) {
        prop_assert_eq!(Type::join(&a, &b), Type::join(&b, &a));
    }

    #[test]
    fn join_is_an_upper_bound(a in any_type(), b in any_type()) {
        if let Some(joined) = Type::join(&a, &b) {
            prop_assert!(Type::assignable(&a, &joined), "{} into {}", a, joined);
            prop_assert!(Type::assignable(&b, &joined), "{} into {}", b, joined);
        }
    }

    #[test]
    fn join_with_itself_is_identity(ty in known_type()) {
        prop_assert_eq!(Type::join(&ty, &ty), Some(ty.clone()));
    }

    #[test]
    fn assignability_is_transitive(
        a in known_type(),
        b in known_type(),
        c in known_type(),
    ) {
        if Type::assignable(&a, &b) && Type::assignable(&b, &c) {
            prop_assert!(Type::assignable(&a, &c), "{} -> {} -> {}", a, b, c);
        }
    }

    #[test]
    fn numeric_widening_follows_the_chain(a in numeric_type(), b in numeric_type()) {
        let widens = Type::assignable(&a, &b);
        let narrows = Type::assignable(&b, &a);
        if a == b {
            prop_assert!(widens && narrows);
        } else {
            prop_assert!(widens != narrows, "exactly one direction of {} / {} holds", a, b);
        }
    }

    #[test]
    fn arrays_follow_their_elements(a in known_type(), b in known_type()) {
        prop_assert_eq!(
            Type::assignable(&Type::array_of(a.clone()), &Type::array_of(b.clone())),
            Type::assignable(&a, &b)
        );
    }

    #[test]
    fn non_numeric_leaves_never_coerce(a in leaf_type(), b in leaf_type()) {
        if !(a.is_numeric() && b.is_numeric()) && a != b {
            prop_assert!(!Type::assignable(&a, &b), "{} must not flow into {}", a, b);
        }
    }
}

proptest! {
    #[test]
    fn bare_unknown_never_mixes_with_known_types(ty in known_type()) {
        prop_assert!(!Type::assignable(&Type::Unknown, &ty), "unknown into {}", ty);
        prop_assert!(!Type::assignable(&ty, &Type::Unknown), "{} into unknown", ty);
        prop_assert!(Type::assignable(
            &Type::array_of(Type::Unknown),
            &Type::array_of(ty.clone())
        ));
    }
}

#[test]
fn numeric_chain_runs_integer_float_number() {
    assert!(Type::assignable(&Type::Integer, &Type::Float));
    assert!(Type::assignable(&Type::Float, &Type::Number));
    assert!(Type::assignable(&Type::Integer, &Type::Number));
    assert!(!Type::assignable(&Type::Float, &Type::Integer));
    assert!(!Type::assignable(&Type::Number, &Type::Float));
    assert_eq!(
        Type::join(&Type::Integer, &Type::Float),
        Some(Type::Float)
    );
    assert_eq!(Type::join(&Type::Boolean, &Type::Integer), None);
}

#[test]
fn describes_types_in_source_syntax() {
    assert_eq!(Type::array_of(Type::array_of(Type::Integer)).to_string(), "integer[][]");
    assert_eq!(Type::Object(ShapeClass::Rectangle).to_string(), "Rectangle");
    let function = Type::Function {
        parameters: vec![Type::Integer, Type::String],
        return_type: Box::new(Type::Boolean),
    };
    assert_eq!(function.to_string(), "(integer, string) -> boolean");
}
