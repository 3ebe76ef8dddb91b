// SPDX-License-Identifier: Unlicense
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    #[error("syntax error: {0}")]
    Syntax(String),

    #[error("division by zero")]
    DivisionByZero,

    #[error("type mismatch: {0}")]
    TypeMismatch(String),

    #[error("unknown operator `{op}` with {arity} operand(s)")]
    UnknownOperator { op: String, arity: usize },

    #[error("integer overflow")]
    Overflow,
}

impl Error {
    /// Division by zero is an expected outcome for randomly built programs,
    /// so callers usually want to tell it apart from real failures.
    pub fn is_division_by_zero(&self) -> bool {
        matches!(self, Self::DivisionByZero)
    }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
