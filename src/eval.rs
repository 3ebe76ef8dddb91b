// SPDX-License-Identifier: Unlicense
use crate::ast::{Arena, BiOpKind, Expr, Id, LitKind, NodeKind};
use crate::error::{Error, Result};
use std::collections::HashMap;

pub type OpFn = fn(i64, i64) -> Result<i64>;

fn add(lhs: i64, rhs: i64) -> Result<i64> {
    lhs.checked_add(rhs).ok_or(Error::Overflow)
}

fn sub(lhs: i64, rhs: i64) -> Result<i64> {
    lhs.checked_sub(rhs).ok_or(Error::Overflow)
}

fn mul(lhs: i64, rhs: i64) -> Result<i64> {
    lhs.checked_mul(rhs).ok_or(Error::Overflow)
}

// Rust's `/` on integers already truncates toward zero.
fn div(lhs: i64, rhs: i64) -> Result<i64> {
    if rhs == 0 {
        return Err(Error::DivisionByZero);
    }
    lhs.checked_div(rhs).ok_or(Error::Overflow)
}

/// Operator table consulted by the [`Evaluator`].
#[derive(Debug, Clone)]
pub struct Env {
    ops: HashMap<BiOpKind, OpFn>,
}

impl Env {
    pub fn empty() -> Self {
        Self {
            ops: HashMap::new(),
        }
    }

    pub fn standard() -> Self {
        Self::empty()
            .with(BiOpKind::Add, add)
            .with(BiOpKind::Sub, sub)
            .with(BiOpKind::Mul, mul)
            .with(BiOpKind::Div, div)
    }

    pub fn with(mut self, kind: BiOpKind, op: OpFn) -> Self {
        self.ops.insert(kind, op);
        self
    }

    pub fn get(&self, kind: BiOpKind) -> Option<OpFn> {
        self.ops.get(&kind).copied()
    }
}

impl Default for Env {
    fn default() -> Self {
        Self::standard()
    }
}

pub struct Evaluator<'e> {
    env: &'e Env,
}

impl<'e> Evaluator<'e> {
    pub fn new(env: &'e Env) -> Self {
        Self { env }
    }

    pub fn eval(&self, expr: &Expr) -> Result<i64> {
        self.eval_impl(expr.arena(), expr.root())
    }

    pub(crate) fn eval_impl(&self, arena: &Arena, id: Id) -> Result<i64> {
        match &arena[id].kind {
            &NodeKind::Lit(LitKind::IntLit(i)) => Ok(i),
            &NodeKind::BiOp(kind, lhs, rhs) => {
                let op = self.env.get(kind).ok_or_else(|| Error::UnknownOperator {
                    op: kind.keyword().to_string(),
                    arity: 2,
                })?;
                // the divisor is checked before the dividend is computed
                let (lhs, rhs) = if kind == BiOpKind::Div {
                    let rhs = self.eval_impl(arena, rhs)?;
                    (self.eval_impl(arena, lhs)?, rhs)
                } else {
                    (self.eval_impl(arena, lhs)?, self.eval_impl(arena, rhs)?)
                };
                op(lhs, rhs)
            }
        }
    }
}

impl Expr {
    /// Evaluates with the standard operator table.
    pub fn eval(&self) -> Result<i64> {
        Evaluator::new(&Env::standard()).eval(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sexpr::parse_sexpr;
    use anyhow::Result;

    fn n(v: i64) -> Expr {
        Expr::number(v)
    }

    #[test]
    fn division_should_truncate_toward_zero() -> Result<()> {
        assert_eq!(Expr::div(&n(10), &n(2))?.eval()?, 5);
        assert_eq!(Expr::div(&n(7), &n(2))?.eval()?, 3);
        assert_eq!(Expr::div(&n(-7), &n(2))?.eval()?, -3);
        assert_eq!(Expr::div(&n(7), &n(-2))?.eval()?, -3);
        Ok(())
    }

    #[test]
    fn division_by_zero_should_be_distinct() -> Result<()> {
        let err = Expr::div(&n(5), &n(0))?.eval().unwrap_err();
        assert_eq!(err, Error::DivisionByZero);
        assert!(err.is_division_by_zero());

        let nested = Expr::add(&n(1), &Expr::div(&n(1), &Expr::sub(&n(2), &n(2))?)?)?;
        assert_eq!(nested.eval(), Err(Error::DivisionByZero));
        Ok(())
    }

    #[test]
    fn evaluator_should_compute_nested_programs() -> Result<()> {
        let cases = [
            ("(number 5)", 5),
            ("(add (number 2) (number 3))", 5),
            ("(sub (number 5) (number 3))", 2),
            ("(mul (number 4) (number 2))", 8),
            ("(add (mul (number 2) (number 3)) (number 4))", 10),
            ("(mul (add (number 2) (number 3)) (sub (number 10) (number 5)))", 25),
            ("(div (mul (number 4) (number 6)) (add (number 2) (number 2)))", 6),
            (
                "(add (mul (sub (number 10) (number 5)) (number 2)) (div (number 20) (number 4)))",
                15,
            ),
        ];
        for (src, expected) in cases {
            assert_eq!(parse_sexpr(src)?.eval()?, expected, "{src}");
        }
        Ok(())
    }

    #[test]
    fn overflow_should_be_reported() -> Result<()> {
        let big = Expr::mul(&n(i64::MAX), &n(2))?;
        assert_eq!(big.eval(), Err(Error::Overflow));
        assert_eq!(Expr::div(&n(i64::MIN), &n(-1))?.eval(), Err(Error::Overflow));
        Ok(())
    }

    #[test]
    fn custom_env_should_override_operators() -> Result<()> {
        fn floor_div(lhs: i64, rhs: i64) -> crate::error::Result<i64> {
            if rhs == 0 {
                return Err(Error::DivisionByZero);
            }
            Ok(lhs.div_euclid(rhs))
        }
        let env = Env::standard().with(BiOpKind::Div, floor_div);
        let expr = Expr::div(&n(-7), &n(2))?;
        assert_eq!(Evaluator::new(&env).eval(&expr)?, -4);
        assert_eq!(expr.eval()?, -3);
        Ok(())
    }

    #[test]
    fn missing_operator_should_be_unknown() -> Result<()> {
        let env = Env::empty().with(BiOpKind::Add, |a, b| Ok(a + b));
        let expr = Expr::mul(&n(2), &n(3))?;
        assert_eq!(
            Evaluator::new(&env).eval(&expr),
            Err(Error::UnknownOperator {
                op: "mul".into(),
                arity: 2
            })
        );
        Ok(())
    }

    #[test]
    fn evaluation_should_be_repeatable() -> Result<()> {
        let expr = parse_sexpr("(sub (div (number 9) (number 4)) (number 7))")?;
        assert_eq!(expr.eval()?, expr.eval()?);
        Ok(())
    }
}
