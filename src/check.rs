// SPDX-License-Identifier: Unlicense
//! Comparison of a candidate program against a reference one.
use crate::ast::Expr;
use crate::error::Error;
use crate::parser::parse_constructor;
use crate::sexpr::parse_sexpr;
use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub enum ValueOutcome {
    Match(i64),
    Mismatch { expected: i64, actual: i64 },
    /// One side divided by zero; left out of accuracy figures.
    Skipped,
    Invalid(Error),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Outcome {
    pub code_match: bool,
    pub value: ValueOutcome,
}

impl Outcome {
    pub fn is_evaluable(&self) -> bool {
        matches!(
            self.value,
            ValueOutcome::Match(_) | ValueOutcome::Mismatch { .. }
        )
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let code = if self.code_match { "match" } else { "mismatch" };
        write!(f, "code: {code}, value: ")?;
        match &self.value {
            ValueOutcome::Match(v) => write!(f, "match ({v})"),
            ValueOutcome::Mismatch { expected, actual } => {
                write!(f, "mismatch (expected {expected}, got {actual})")
            }
            ValueOutcome::Skipped => f.write_str("skipped (division by zero)"),
            ValueOutcome::Invalid(e) => write!(f, "invalid ({e})"),
        }
    }
}

/// Compares two S-expression programs. The code check is textual, ignoring
/// surrounding whitespace.
pub fn compare(reference: &str, candidate: &str) -> Outcome {
    let code_match = reference.trim() == candidate.trim();
    let value = value_outcome(evaluate(reference), evaluate(candidate));
    Outcome { code_match, value }
}

/// Compares a candidate in constructor form (`Add(Number(2), Number(3))`)
/// against a reference tree. The code check passes when both render to the
/// same infix text and the same phrase.
pub fn compare_constructor(reference: &Expr, candidate: &str) -> Outcome {
    let candidate = match parse_constructor(candidate) {
        Ok(expr) => expr,
        Err(e) => {
            return Outcome {
                code_match: false,
                value: ValueOutcome::Invalid(e),
            }
        }
    };
    let code_match = reference.to_infix() == candidate.to_infix()
        && reference.to_phrase() == candidate.to_phrase();
    let value = value_outcome(reference.eval(), candidate.eval());
    Outcome { code_match, value }
}

// A reference failure decides the outcome before anything the candidate did.
fn value_outcome(expected: Result<i64, Error>, actual: Result<i64, Error>) -> ValueOutcome {
    match (expected, actual) {
        (Ok(expected), Ok(actual)) if expected == actual => ValueOutcome::Match(expected),
        (Ok(expected), Ok(actual)) => ValueOutcome::Mismatch { expected, actual },
        (Err(e), _) if e.is_division_by_zero() => ValueOutcome::Skipped,
        (Err(e), _) => ValueOutcome::Invalid(e),
        (Ok(_), Err(e)) if e.is_division_by_zero() => ValueOutcome::Skipped,
        (Ok(_), Err(e)) => ValueOutcome::Invalid(e),
    }
}

fn evaluate(source: &str) -> Result<i64, Error> {
    parse_sexpr(source)?.eval()
}

/// Running totals over many comparisons.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Tally {
    pub total: usize,
    pub evaluable: usize,
    pub value_matches: usize,
    pub code_matches: usize,
}

impl Tally {
    pub fn record(&mut self, outcome: &Outcome) {
        self.total += 1;
        if outcome.code_match {
            self.code_matches += 1;
        }
        if outcome.is_evaluable() {
            self.evaluable += 1;
        }
        if let ValueOutcome::Match(_) = outcome.value {
            self.value_matches += 1;
        }
    }

    pub fn value_rate(&self) -> f64 {
        ratio(self.value_matches, self.evaluable)
    }

    pub fn code_rate(&self) -> f64 {
        ratio(self.code_matches, self.total)
    }
}

fn ratio(num: usize, den: usize) -> f64 {
    if den == 0 {
        0.0
    } else {
        num as f64 / den as f64
    }
}
