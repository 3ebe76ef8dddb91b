// SPDX-License-Identifier: Unlicense
use crate::ast::{BiOpKind, Expr, ExprBuilder, Id, MAX_DEPTH};
use crate::error::Result;
use crate::eval::{Env, Evaluator};
use rand::{rngs::SmallRng, Rng, SeedableRng};

/// Literals are drawn uniformly from this range.
pub const LIT_RANGE: std::ops::RangeInclusive<i64> = 1..=10;

/// Random expression generator.
pub struct Generator<R: Rng = SmallRng> {
    rng: R,
    env: Env,
}

impl Generator<SmallRng> {
    pub fn seeded(seed: u64) -> Self {
        Self::with_rng(SmallRng::seed_from_u64(seed))
    }

    pub fn from_entropy() -> Self {
        Self::with_rng(SmallRng::from_entropy())
    }
}

impl<R: Rng> Generator<R> {
    pub fn with_rng(rng: R) -> Self {
        Self {
            rng,
            env: Env::standard(),
        }
    }

    /// Builds a random tree no deeper than `max_depth` nodes. Depth 0 is
    /// treated like depth 1, and anything past [`MAX_DEPTH`] like `MAX_DEPTH`.
    ///
    /// A divisor that evaluates to zero (or fails to evaluate) is swapped for
    /// a fresh literal once. The swap is not repeated further up the tree, so
    /// a generated program can still divide by zero at a higher level.
    pub fn generate(&mut self, max_depth: usize) -> Result<Expr> {
        let mut builder = ExprBuilder::new();
        let root = self.generate_impl(&mut builder, max_depth.min(MAX_DEPTH))?;
        builder.finish(root)
    }

    fn generate_impl(&mut self, builder: &mut ExprBuilder, max_depth: usize) -> Result<Id> {
        if max_depth <= 1 {
            return Ok(self.lit(builder));
        }
        let kind = BiOpKind::ALL[self.rng.gen_range(0..BiOpKind::ALL.len())];
        let lhs = self.generate_impl(builder, max_depth - 1)?;
        let mut rhs = self.generate_impl(builder, max_depth - 1)?;
        if kind == BiOpKind::Div {
            let divisor = Evaluator::new(&self.env).eval_impl(builder.arena(), rhs);
            if !matches!(divisor, Ok(v) if v != 0) {
                rhs = self.lit(builder);
            }
        }
        builder.binop(kind, lhs, rhs)
    }

    fn lit(&mut self, builder: &mut ExprBuilder) -> Id {
        builder.lit(self.rng.gen_range(LIT_RANGE))
    }
}
