//! Semantic analysis errors.
//!
//! Analysis is fail-fast: the first [`AnalysisError`] aborts the walk and is
//! surfaced verbatim to the caller.

use std::fmt;

use thiserror::Error;

use crate::ast::SourceSpan;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Name,
    Type,
    Arity,
    ControlFlow,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ErrorKind::Name => "NameError",
            ErrorKind::Type => "TypeError",
            ErrorKind::Arity => "ArityError",
            ErrorKind::ControlFlow => "ControlFlowError",
        };
        f.write_str(label)
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{kind}: {message}")]
pub struct AnalysisError {
    pub kind: ErrorKind,
    pub message: String,
    pub span: Option<SourceSpan>,
}

impl AnalysisError {
    pub fn new(kind: ErrorKind, message: impl Into<String>, span: SourceSpan) -> Self {
        Self {
            kind,
            message: message.into(),
            span: (span.line != 0).then_some(span),
        }
    }

    pub fn name(message: impl Into<String>, span: SourceSpan) -> Self {
        Self::new(ErrorKind::Name, message, span)
    }

    pub fn type_error(message: impl Into<String>, span: SourceSpan) -> Self {
        Self::new(ErrorKind::Type, message, span)
    }

    pub fn arity(message: impl Into<String>, span: SourceSpan) -> Self {
        Self::new(ErrorKind::Arity, message, span)
    }

    pub fn control_flow(message: impl Into<String>, span: SourceSpan) -> Self {
        Self::new(ErrorKind::ControlFlow, message, span)
    }
}

pub type AnalysisResult<T> = Result<T, AnalysisError>;
