// SPDX-License-Identifier: Unlicense
use crate::ast::{BiOpKind, Expr, Id, LitKind, NodeKind};
use std::fmt::{self, Write};

/// Parenthesization policy for infix output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Parens {
    /// `+`/`-` wrap additive operands, `*`/`/` wrap every non-literal operand.
    #[default]
    Strict,
    /// Only additive operands of `*`/`/` are wrapped.
    Minimal,
}

struct Writer<'a> {
    expr: &'a Expr,
    output: String,
}

impl<'a> Writer<'a> {
    fn new(expr: &'a Expr) -> Self {
        Self {
            expr,
            output: String::new(),
        }
    }

    fn write_lit(&mut self, lit: &LitKind) {
        match lit {
            LitKind::IntLit(i) => write!(self.output, "{i}").unwrap(),
        }
    }

    fn write_infix(&mut self, id: Id, parens: Parens) {
        match self.expr.kind(id) {
            NodeKind::Lit(lit) => self.write_lit(lit),
            &NodeKind::BiOp(kind, lhs, rhs) => {
                self.write_operand(kind, lhs, parens);
                write!(self.output, " {} ", kind.symbol()).unwrap();
                self.write_operand(kind, rhs, parens);
            }
        }
    }

    fn write_operand(&mut self, parent: BiOpKind, id: Id, parens: Parens) {
        let wrap = match (self.expr.kind(id), parens) {
            (NodeKind::Lit(_), _) => false,
            (&NodeKind::BiOp(child, ..), Parens::Strict) => {
                !parent.is_additive() || child.is_additive()
            }
            (&NodeKind::BiOp(child, ..), Parens::Minimal) => {
                !parent.is_additive() && child.is_additive()
            }
        };
        if wrap {
            self.output.push('(');
            self.write_infix(id, parens);
            self.output.push(')');
        } else {
            self.write_infix(id, parens);
        }
    }

    fn write_phrase(&mut self, id: Id) {
        match self.expr.kind(id) {
            NodeKind::Lit(lit) => self.write_lit(lit),
            &NodeKind::BiOp(kind, lhs, rhs) => {
                write!(self.output, "the {} of ", kind.noun()).unwrap();
                self.write_phrase(lhs);
                self.output.push_str(" and ");
                self.write_phrase(rhs);
            }
        }
    }

    fn write_sexpr(&mut self, id: Id) {
        match self.expr.kind(id) {
            NodeKind::Lit(lit) => {
                self.output.push_str("(number ");
                self.write_lit(lit);
                self.output.push(')');
            }
            &NodeKind::BiOp(kind, lhs, rhs) => {
                write!(self.output, "({} ", kind.keyword()).unwrap();
                self.write_sexpr(lhs);
                self.output.push(' ');
                self.write_sexpr(rhs);
                self.output.push(')');
            }
        }
    }

    fn write_constructor(&mut self, id: Id) {
        match self.expr.kind(id) {
            NodeKind::Lit(lit) => {
                self.output.push_str("Number(");
                self.write_lit(lit);
                self.output.push(')');
            }
            &NodeKind::BiOp(kind, lhs, rhs) => {
                write!(self.output, "{}(", kind.constructor()).unwrap();
                self.write_constructor(lhs);
                self.output.push_str(", ");
                self.write_constructor(rhs);
                self.output.push(')');
            }
        }
    }
}

pub fn render_infix(expr: &Expr, parens: Parens) -> String {
    let mut w = Writer::new(expr);
    w.write_infix(expr.root(), parens);
    w.output
}

pub fn render_phrase(expr: &Expr) -> String {
    let mut w = Writer::new(expr);
    w.write_phrase(expr.root());
    w.output
}

pub fn render_sexpr(expr: &Expr) -> String {
    let mut w = Writer::new(expr);
    w.write_sexpr(expr.root());
    w.output
}

pub fn render_constructor(expr: &Expr) -> String {
    let mut w = Writer::new(expr);
    w.write_constructor(expr.root());
    w.output
}

impl Expr {
    pub fn to_infix(&self) -> String {
        render_infix(self, Parens::Strict)
    }

    pub fn to_phrase(&self) -> String {
        render_phrase(self)
    }

    pub fn to_sexpr(&self) -> String {
        render_sexpr(self)
    }

    pub fn to_constructor(&self) -> String {
        render_constructor(self)
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&render_sexpr(self))
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
    fn strict_infix_should_match_reference_strings() -> Result<()> {
        assert_eq!(Expr::add(&n(2), &n(3))?.to_infix(), "2 + 3");
        assert_eq!(
            Expr::mul(&Expr::add(&n(2), &n(3))?, &Expr::sub(&n(10), &n(5))?)?.to_infix(),
            "(2 + 3) * (10 - 5)"
        );
        assert_eq!(Expr::add(&Expr::mul(&n(2), &n(3))?, &n(4))?.to_infix(), "2 * 3 + 4");
        Ok(())
    }

    #[test]
    fn strict_infix_should_wrap_additive_chains() -> Result<()> {
        let chain = Expr::add(&Expr::add(&n(1), &n(2))?, &n(3))?;
        assert_eq!(chain.to_infix(), "(1 + 2) + 3");
        let product = Expr::mul(&Expr::mul(&n(2), &n(3))?, &n(4))?;
        assert_eq!(product.to_infix(), "(2 * 3) * 4");
        let quotient = Expr::div(&Expr::sub(&Expr::mul(&n(10), &n(2))?, &n(3))?, &n(2))?;
        assert_eq!(quotient.to_infix(), "(10 * 2 - 3) / 2");
        Ok(())
    }

    #[test]
    fn minimal_infix_should_only_wrap_additive_factors() -> Result<()> {
        let cases = [
            ("(number 5)", "5"),
            ("(div (number 10) (number 2))", "10 / 2"),
            ("(add (add (number 1) (number 2)) (number 3))", "1 + 2 + 3"),
            ("(mul (mul (number 2) (number 3)) (number 4))", "2 * 3 * 4"),
            (
                "(mul (add (number 2) (number 3)) (sub (number 10) (number 5)))",
                "(2 + 3) * (10 - 5)",
            ),
            (
                "(add (mul (sub (number 10) (number 5)) (number 2)) (div (number 20) (number 4)))",
                "(10 - 5) * 2 + 20 / 4",
            ),
        ];
        for (src, expected) in cases {
            assert_eq!(render_infix(&parse_sexpr(src)?, Parens::Minimal), expected);
        }
        Ok(())
    }

    #[test]
    fn phrase_should_nest_without_parens() -> Result<()> {
        let expr = Expr::mul(&n(4), &Expr::sub(&n(7), &n(2))?)?;
        assert_eq!(
            expr.to_phrase(),
            "the product of 4 and the difference of 7 and 2"
        );
        let quotient = Expr::div(&Expr::add(&n(2), &n(3))?, &n(4))?;
        assert_eq!(quotient.to_phrase(), "the quotient of the sum of 2 and 3 and 4");
        assert_eq!(n(-3).to_phrase(), "-3");
        Ok(())
    }

    #[test]
    fn constructor_should_nest_calls() -> Result<()> {
        let expr = Expr::mul(&n(4), &Expr::sub(&n(7), &n(-2))?)?;
        assert_eq!(
            expr.to_constructor(),
            "Mul(Number(4), Sub(Number(7), Number(-2)))"
        );
        assert_eq!(n(5).to_constructor(), "Number(5)");
        Ok(())
    }

    #[test]
    fn sexpr_should_round_trip() -> Result<()> {
        let src = "(sub (div (number -7) (number 2)) (mul (number 3) (add (number 1) (number 1))))";
        let expr = parse_sexpr(src)?;
        assert_eq!(expr.to_sexpr(), src);
        assert_eq!(expr.to_string(), src);
        assert_eq!(parse_sexpr(&expr.to_sexpr())?.eval()?, expr.eval()?);
        Ok(())
    }
}
