// SPDX-License-Identifier: Unlicense
pub mod ast;
pub mod check;
pub mod driver;
pub mod error;
pub mod eval;
pub mod parser;
pub mod random;
pub mod render;
pub mod sexpr;

pub use ast::{BiOpKind, Expr, ExprBuilder};
pub use error::{Error, Result};
pub use eval::{Env, Evaluator};
pub use parser::{parse_constructor, parse_infix, parse_phrase};
pub use random::Generator;
pub use render::{render_constructor, render_infix, render_phrase, render_sexpr, Parens};
pub use sexpr::{parse_sexpr, tokenize};
