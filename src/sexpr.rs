// SPDX-License-Identifier: Unlicense
use crate::ast::{too_deep, BiOpKind, Expr, ExprBuilder, Id, MAX_DEPTH};
use crate::error::{Error, Result};
use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub enum Atom {
    Int(i64),
    Real(f64),
    Symbol(String),
}

impl Atom {
    fn classify(token: &str) -> Self {
        if let Ok(i) = token.parse::<i64>() {
            Atom::Int(i)
        } else if let Ok(r) = token.parse::<f64>() {
            Atom::Real(r)
        } else {
            Atom::Symbol(token.to_string())
        }
    }
}

impl fmt::Display for Atom {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Atom::Int(i) => write!(f, "{i}"),
            Atom::Real(r) => write!(f, "{r}"),
            Atom::Symbol(s) => f.write_str(s),
        }
    }
}

/// Untyped result of reading tokens, before operator keywords are checked.
#[derive(Debug, Clone, PartialEq)]
pub enum SExpr {
    Atom(Atom),
    List(Vec<SExpr>),
}

impl fmt::Display for SExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SExpr::Atom(a) => write!(f, "{a}"),
            SExpr::List(items) => {
                f.write_str("(")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(" ")?;
                    }
                    write!(f, "{item}")?;
                }
                f.write_str(")")
            }
        }
    }
}

/// Splits a program into tokens. Parentheses always stand alone; everything
/// else is separated by whitespace. Balance is not checked here.
pub fn tokenize(source: &str) -> Vec<String> {
    source
        .replace('(', " ( ")
        .replace(')', " ) ")
        .split_whitespace()
        .map(str::to_string)
        .collect()
}

struct Reader<'a> {
    tokens: &'a [String],
    pos: usize,
    depth: usize,
}

impl<'a> Reader<'a> {
    fn new(tokens: &'a [String]) -> Self {
        Self {
            tokens,
            pos: 0,
            depth: 0,
        }
    }

    fn peek(&self) -> Option<&'a str> {
        self.tokens.get(self.pos).map(String::as_str)
    }

    fn next(&mut self) -> Result<&'a str> {
        let token = self
            .peek()
            .ok_or_else(|| Error::Syntax("unexpected EOF".into()))?;
        self.pos += 1;
        Ok(token)
    }

    fn read_form(&mut self) -> Result<SExpr> {
        match self.next()? {
            "(" => {
                if self.depth == MAX_DEPTH {
                    return Err(too_deep());
                }
                self.depth += 1;
                let mut items = Vec::new();
                while self.peek() != Some(")") {
                    items.push(self.read_form()?);
                }
                self.pos += 1;
                self.depth -= 1;
                Ok(SExpr::List(items))
            }
            ")" => Err(Error::Syntax("unexpected )".into())),
            token => Ok(SExpr::Atom(Atom::classify(token))),
        }
    }
}

/// Reads the first complete form from `tokens`. Anything after it is ignored.
pub fn read(tokens: &[String]) -> Result<SExpr> {
    Reader::new(tokens).read_form()
}

/// Like [`read`], also returning how many tokens the form used.
pub fn read_counted(tokens: &[String]) -> Result<(SExpr, usize)> {
    let mut reader = Reader::new(tokens);
    let form = reader.read_form()?;
    Ok((form, reader.pos))
}

/// Builds the typed tree from a read form.
pub fn lower(form: &SExpr) -> Result<Expr> {
    let mut builder = ExprBuilder::new();
    let root = lower_impl(&mut builder, form, 1)?;
    builder.finish(root)
}

fn lower_impl(builder: &mut ExprBuilder, form: &SExpr, depth: usize) -> Result<Id> {
    if depth > MAX_DEPTH {
        return Err(too_deep());
    }
    let items = match form {
        SExpr::List(items) => items,
        SExpr::Atom(atom) => {
            return Err(Error::TypeMismatch(format!(
                "expected a form, found atom `{atom}`"
            )))
        }
    };
    let (head, args) = items
        .split_first()
        .ok_or_else(|| Error::Syntax("empty form ()".into()))?;
    let unknown = || Error::UnknownOperator {
        op: head.to_string(),
        arity: args.len(),
    };
    let keyword = match head {
        SExpr::Atom(Atom::Symbol(s)) => s.as_str(),
        _ => return Err(unknown()),
    };

    if keyword == "number" {
        return match args {
            [SExpr::Atom(Atom::Int(i))] => Ok(builder.lit(*i)),
            [other] => Err(Error::TypeMismatch(format!(
                "number expects an integer, found `{other}`"
            ))),
            _ => Err(unknown()),
        };
    }

    let kind = BiOpKind::from_keyword(keyword).ok_or_else(unknown)?;
    match args {
        [lhs, rhs] => {
            let lhs = lower_impl(builder, lhs, depth + 1)?;
            let rhs = lower_impl(builder, rhs, depth + 1)?;
            builder.binop(kind, lhs, rhs)
        }
        _ => Err(unknown()),
    }
}

/// Tokenizes, reads and lowers an S-expression program.
pub fn parse_sexpr(source: &str) -> Result<Expr> {
    let tokens = tokenize(source);
    lower(&read(&tokens)?)
}
