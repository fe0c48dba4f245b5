use crate::typed_ast::{Alternate, Block, IfStatement, Literal, Statement};

/// How control leaves a statement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Exit {
    FallsThrough,
    Breaks,
    Returns,
}

/// True when every path through `statements` ends in a `return`.
///
/// A loop counts when no `break` leaves it and either its body always returns
/// or it is a `while true`.
pub fn always_returns(statements: &[Statement]) -> bool {
    sequence_exit(statements) == Exit::Returns
}

fn sequence_exit(statements: &[Statement]) -> Exit {
    statements
        .iter()
        .map(statement_exit)
        .find(|exit| *exit != Exit::FallsThrough)
        .unwrap_or(Exit::FallsThrough)
}

fn statement_exit(statement: &Statement) -> Exit {
    match statement {
        Statement::Return { .. } => Exit::Returns,
        Statement::Break => Exit::Breaks,
        Statement::If(conditional) => if_exit(conditional),
        Statement::While { test, body } => {
            let infinite = matches!(test.as_literal(), Some(Literal::Boolean(true)));
            loop_exit(body, infinite)
        }
        Statement::ForLoop { body, .. } => loop_exit(body, false),
        _ => Exit::FallsThrough,
    }
}

fn loop_exit(body: &Block, infinite: bool) -> Exit {
    if breaks_out(&body.statements) {
        return Exit::FallsThrough;
    }
    if infinite || sequence_exit(&body.statements) == Exit::Returns {
        Exit::Returns
    } else {
        Exit::FallsThrough
    }
}

fn if_exit(conditional: &IfStatement) -> Exit {
    let consequent = sequence_exit(&conditional.consequent.statements);
    let alternate = match &conditional.alternate {
        None => Exit::FallsThrough,
        Some(Alternate::Block(block)) => sequence_exit(&block.statements),
        Some(Alternate::If(nested)) => if_exit(nested),
    };

    match (consequent, alternate) {
        (Exit::Returns, Exit::Returns) => Exit::Returns,
        (Exit::FallsThrough, _) | (_, Exit::FallsThrough) => Exit::FallsThrough,
        _ => Exit::Breaks,
    }
}

/// Whether a `break` targeting the enclosing loop occurs in `statements`.
/// Nested loops own their own breaks.
fn breaks_out(statements: &[Statement]) -> bool {
    statements.iter().any(|statement| match statement {
        Statement::Break => true,
        Statement::If(conditional) => if_breaks_out(conditional),
        _ => false,
    })
}

fn if_breaks_out(conditional: &IfStatement) -> bool {
    breaks_out(&conditional.consequent.statements)
        || match &conditional.alternate {
            None => false,
            Some(Alternate::Block(block)) => breaks_out(&block.statements),
            Some(Alternate::If(nested)) => if_breaks_out(nested),
        }
}
