// SPDX-License-Identifier: Unlicense
use crate::ast::{too_deep, BiOpKind, Expr, ExprBuilder, Id, MAX_DEPTH};
use crate::error::{Error, Result};
use std::cell::{Cell, RefCell};

#[derive(Debug)]
pub struct Context {
    pub builder: RefCell<ExprBuilder>,
    depth: Cell<usize>,
    // first failure seen by a grammar action, which cannot return it itself
    error: RefCell<Option<Error>>,
}

impl Context {
    fn new() -> Self {
        Self {
            builder: RefCell::new(ExprBuilder::new()),
            depth: Cell::new(0),
            error: RefCell::new(None),
        }
    }

    fn lit(&self, value: i64) -> Id {
        self.builder.borrow_mut().lit(value)
    }

    fn binop(&self, kind: BiOpKind, lhs: Id, rhs: Id) -> Id {
        let result = self.builder.borrow_mut().binop(kind, lhs, rhs);
        result.unwrap_or_else(|e| {
            self.fail(e);
            lhs
        })
    }

    fn fail(&self, error: Error) {
        self.error.borrow_mut().get_or_insert(error);
    }

    fn enter(&self) -> Result<(), &'static str> {
        if self.depth.get() == MAX_DEPTH {
            self.fail(too_deep());
            return Err("nesting too deep");
        }
        self.depth.set(self.depth.get() + 1);
        Ok(())
    }

    fn leave(&self) {
        self.depth.set(self.depth.get() - 1);
    }

    fn finish(self, root: Result<Id>) -> Result<Expr> {
        if let Some(e) = self.error.into_inner() {
            return Err(e);
        }
        self.builder.into_inner().finish(root?)
    }
}

peg::parser! {
    grammar infix_parser(context: &Context) for str {
        #[cache]
        rule _() = quiet!{[' '|'\t'|'\r'|'\n']*{}}

        rule enter() = {? context.enter() }
        rule leave() = { context.leave() }

        rule nested<T>(r: rule<T>) -> T = enter() v:r()? leave() {?
            v.ok_or("nested expression")
        }

        rule int_lit() -> i64 = _ n:$("-"? ['0' ..= '9']+) {?
            n.parse().or(Err("integer literal"))
        }

        rule expr() -> Id = precedence! {
            x:(@) (_ "+") y:@ { context.binop(BiOpKind::Add, x, y) }
            x:(@) (_ "-") y:@ { context.binop(BiOpKind::Sub, x, y) }
            --
            x:(@) (_ "*") y:@ { context.binop(BiOpKind::Mul, x, y) }
            x:(@) (_ "/") y:@ { context.binop(BiOpKind::Div, x, y) }
            --
            n:int_lit() { context.lit(n) }

            _ "(" e:nested(<expr()>) _ ")" { e }
        }
        pub rule parse() -> Id = n:expr() _ { n }
    }
}

peg::parser! {
    grammar phrase_parser(context: &Context) for str {
        #[cache]
        rule _() = quiet!{[' '|'\t'|'\r'|'\n']*{}}

        rule __() = quiet!{[' '|'\t'|'\r'|'\n']+{}}

        rule enter() = {? context.enter() }
        rule leave() = { context.leave() }

        rule nested<T>(r: rule<T>) -> T = enter() v:r()? leave() {?
            v.ok_or("nested phrase")
        }

        rule int_lit() -> i64 = _ n:$("-"? ['0' ..= '9']+) {?
            n.parse().or(Err("integer literal"))
        }

        rule noun() -> BiOpKind
            = "sum" { BiOpKind::Add }
            / "difference" { BiOpKind::Sub }
            / "product" { BiOpKind::Mul }
            / "quotient" { BiOpKind::Div }

        rule binary() -> Id
            = k:noun() __ "of" __ x:phrase() __ "and" __ y:phrase() {
                context.binop(k, x, y)
            }

        rule phrase() -> Id
            = _ "the" __ b:nested(<binary()>) { b }
            / n:int_lit() { context.lit(n) }

        pub rule parse() -> Id = n:phrase() _ { n }
    }
}

peg::parser! {
    grammar constructor_parser(context: &Context) for str {
        #[cache]
        rule _() = quiet!{[' '|'\t'|'\r'|'\n']*{}}

        rule enter() = {? context.enter() }
        rule leave() = { context.leave() }

        rule nested<T>(r: rule<T>) -> T = enter() v:r()? leave() {?
            v.ok_or("nested constructor")
        }

        rule int_lit() -> i64 = _ n:$("-"? ['0' ..= '9']+) {?
            n.parse().or(Err("integer literal"))
        }

        rule name() -> BiOpKind
            = "Add" { BiOpKind::Add }
            / "Sub" { BiOpKind::Sub }
            / "Mul" { BiOpKind::Mul }
            / "Div" { BiOpKind::Div }

        rule operands() -> (Id, Id) = x:call() _ "," y:call() { (x, y) }

        rule call() -> Id
            = _ "Number" _ "(" n:int_lit() _ ")" { context.lit(n) }
            / _ k:name() _ "(" args:nested(<operands()>) _ ")" {
                context.binop(k, args.0, args.1)
            }

        pub rule parse() -> Id = n:call() _ { n }
    }
}

/// Parses conventional infix notation: `+ - * /`, left-associative, with
/// `*` and `/` binding tighter. Parentheses only group.
pub fn parse_infix(source: &str) -> Result<Expr> {
    let context = Context::new();
    let root = infix_parser::parse(source, &context)
        .map_err(|e| Error::Syntax(format!("failed to parse infix: {}", e)));
    context.finish(root)
}

/// Parses nested phrases such as `the sum of 2 and the product of 3 and 4`.
pub fn parse_phrase(source: &str) -> Result<Expr> {
    let context = Context::new();
    let root = phrase_parser::parse(source, &context)
        .map_err(|e| Error::Syntax(format!("failed to parse phrase: {}", e)));
    context.finish(root)
}

/// Parses constructor calls such as `Add(Number(2), Mul(Number(3), Number(4)))`.
pub fn parse_constructor(source: &str) -> Result<Expr> {
    let context = Context::new();
    let root = constructor_parser::parse(source, &context)
        .map_err(|e| Error::Syntax(format!("failed to parse constructor: {}", e)));
    context.finish(root)
}
