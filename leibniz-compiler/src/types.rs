//! The type lattice.
//!
//! Numeric types form the chain `integer < float < number`. Everything else is
//! compared structurally and never coerces.

use std::fmt;

use serde::Serialize;

use crate::stdlib::ShapeClass;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub enum Type {
    Integer,
    Float,
    Number,
    Boolean,
    String,
    Void,
    Array(Box<Type>),
    Matrix,
    Object(ShapeClass),
    Function {
        parameters: Vec<Type>,
        return_type: Box<Type>,
    },
    /// Element type of an empty array literal. Only compatible with other
    /// types from inside an array.
    Unknown,
}

impl Type {
    pub fn array_of(element: Type) -> Type {
        Type::Array(Box::new(element))
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self, Type::Integer | Type::Float | Type::Number)
    }

    pub fn is_numeric_array(&self) -> bool {
        match self {
            Type::Array(element) => element.is_numeric() || **element == Type::Unknown,
            _ => false,
        }
    }

    fn numeric_rank(&self) -> Option<u8> {
        match self {
            Type::Integer => Some(0),
            Type::Float => Some(1),
            Type::Number => Some(2),
            _ => None,
        }
    }

    /// Element type for arrays, `number` for matrices, `unknown` otherwise.
    pub fn element_type(&self) -> Type {
        match self {
            Type::Array(element) => (**element).clone(),
            Type::Matrix => Type::Number,
            _ => Type::Unknown,
        }
    }

    /// Most general common type of `a` and `b`, if any.
    pub fn join(a: &Type, b: &Type) -> Option<Type> {
        if let (Some(left), Some(right)) = (a.numeric_rank(), b.numeric_rank()) {
            return Some(if left >= right { a.clone() } else { b.clone() });
        }
        match (a, b) {
            (Type::Unknown, other) | (other, Type::Unknown) => Some(other.clone()),
            (Type::Array(left), Type::Array(right)) => {
                Type::join(left, right).map(Type::array_of)
            }
            _ if a == b => Some(a.clone()),
            _ => None,
        }
    }

    /// Whether a value of type `source` may be stored where `target` is expected.
    pub fn assignable(source: &Type, target: &Type) -> bool {
        if source == target {
            return true;
        }
        if let (Some(from), Some(to)) = (source.numeric_rank(), target.numeric_rank()) {
            return from <= to;
        }
        match (source, target) {
            (Type::Array(from), Type::Array(to)) => Type::element_assignable(from, to),
            (
                Type::Function {
                    parameters: source_params,
                    return_type: source_return,
                },
                Type::Function {
                    parameters: target_params,
                    return_type: target_return,
                },
            ) => {
                source_params.len() == target_params.len()
                    && source_params
                        .iter()
                        .zip(target_params)
                        .all(|(from, to)| Type::assignable(to, from))
                    && Type::assignable(source_return, target_return)
            }
            _ => false,
        }
    }

    /// [`Type::assignable`] for array elements, where `unknown` matches anything.
    pub fn element_assignable(source: &Type, target: &Type) -> bool {
        matches!(source, Type::Unknown)
            || matches!(target, Type::Unknown)
            || Type::assignable(source, target)
    }

    pub fn describe(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Type::Integer => f.write_str("integer"),
            Type::Float => f.write_str("float"),
            Type::Number => f.write_str("number"),
            Type::Boolean => f.write_str("boolean"),
            Type::String => f.write_str("string"),
            Type::Void => f.write_str("void"),
            Type::Array(element) => write!(f, "{element}[]"),
            Type::Matrix => f.write_str("matrix"),
            Type::Object(class) => write!(f, "{class}"),
            Type::Function {
                parameters,
                return_type,
            } => {
                let joined = parameters
                    .iter()
                    .map(Type::describe)
                    .collect::<Vec<_>>()
                    .join(", ");
                write!(f, "({joined}) -> {return_type}")
            }
            Type::Unknown => f.write_str("unknown"),
        }
    }
}
