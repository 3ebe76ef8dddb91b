// SPDX-License-Identifier: Unlicense
use crate::error::{Error, Result};

#[derive(Debug, Clone, PartialEq)]
pub enum LitKind {
    IntLit(i64),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BiOpKind {
    Add,
    Sub,
    Mul,
    Div,
}

impl BiOpKind {
    pub const ALL: [BiOpKind; 4] = [Self::Add, Self::Sub, Self::Mul, Self::Div];

    /// Keyword used by the S-expression syntax.
    pub fn keyword(self) -> &'static str {
        match self {
            Self::Add => "add",
            Self::Sub => "sub",
            Self::Mul => "mul",
            Self::Div => "div",
        }
    }

    pub fn from_keyword(keyword: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.keyword() == keyword)
    }

    /// Constructor name used by the `Add(Number(1), Number(2))` syntax.
    pub fn constructor(self) -> &'static str {
        match self {
            Self::Add => "Add",
            Self::Sub => "Sub",
            Self::Mul => "Mul",
            Self::Div => "Div",
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            Self::Add => "+",
            Self::Sub => "-",
            Self::Mul => "*",
            Self::Div => "/",
        }
    }

    /// Noun used by the English phrase syntax ("the sum of ...").
    pub fn noun(self) -> &'static str {
        match self {
            Self::Add => "sum",
            Self::Sub => "difference",
            Self::Mul => "product",
            Self::Div => "quotient",
        }
    }

    pub fn is_additive(self) -> bool {
        matches!(self, Self::Add | Self::Sub)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    Lit(LitKind),
    BiOp(BiOpKind, Id, Id),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub kind: NodeKind,
}

pub type Id = id_arena::Id<Node>;
pub type Arena = id_arena::Arena<Node>;

/// Deepest tree, counted in nodes, that any builder or parser will produce.
pub const MAX_DEPTH: usize = 100;

pub(crate) fn too_deep() -> Error {
    Error::Syntax("nesting too deep".into())
}

/// An immutable expression tree.
///
/// Every node reachable from `root` lives in `arena` and is referenced by
/// exactly one parent. Only [`ExprBuilder::finish`] creates values of this
/// type, so the invariant holds for every `Expr` a caller can see.
#[derive(Debug, Clone)]
pub struct Expr {
    arena: Arena,
    root: Id,
}

impl Expr {
    pub fn number(value: i64) -> Self {
        let mut builder = ExprBuilder::new();
        let root = builder.lit(value);
        Self {
            arena: builder.arena,
            root,
        }
    }

    /// Fails once the combined tree would be deeper than [`MAX_DEPTH`].
    pub fn binop(kind: BiOpKind, lhs: &Expr, rhs: &Expr) -> Result<Self> {
        let mut builder = ExprBuilder::new();
        let lhs = builder.graft(lhs);
        let rhs = builder.graft(rhs);
        let root = builder.binop(kind, lhs, rhs)?;
        Ok(Self {
            arena: builder.arena,
            root,
        })
    }

    pub fn add(lhs: &Expr, rhs: &Expr) -> Result<Self> {
        Self::binop(BiOpKind::Add, lhs, rhs)
    }

    pub fn sub(lhs: &Expr, rhs: &Expr) -> Result<Self> {
        Self::binop(BiOpKind::Sub, lhs, rhs)
    }

    pub fn mul(lhs: &Expr, rhs: &Expr) -> Result<Self> {
        Self::binop(BiOpKind::Mul, lhs, rhs)
    }

    pub fn div(lhs: &Expr, rhs: &Expr) -> Result<Self> {
        Self::binop(BiOpKind::Div, lhs, rhs)
    }

    pub fn root(&self) -> Id {
        self.root
    }

    pub fn node(&self, id: Id) -> Option<&Node> {
        self.arena.get(id)
    }

    pub(crate) fn arena(&self) -> &Arena {
        &self.arena
    }

    pub(crate) fn kind(&self, id: Id) -> &NodeKind {
        &self.arena[id].kind
    }

    pub fn node_count(&self) -> usize {
        self.arena.len()
    }

    /// Longest root-to-leaf path, counted in nodes. A lone literal has depth 1.
    pub fn depth(&self) -> usize {
        self.depth_impl(self.root)
    }

    fn depth_impl(&self, id: Id) -> usize {
        match self.kind(id) {
            NodeKind::Lit(_) => 1,
            &NodeKind::BiOp(_, lhs, rhs) => 1 + self.depth_impl(lhs).max(self.depth_impl(rhs)),
        }
    }

    fn same_shape(&self, id: Id, other: &Expr, other_id: Id) -> bool {
        match (self.kind(id), other.kind(other_id)) {
            (NodeKind::Lit(a), NodeKind::Lit(b)) => a == b,
            (&NodeKind::BiOp(k1, l1, r1), &NodeKind::BiOp(k2, l2, r2)) => {
                k1 == k2 && self.same_shape(l1, other, l2) && self.same_shape(r1, other, r2)
            }
            _ => false,
        }
    }
}

impl PartialEq for Expr {
    fn eq(&self, other: &Self) -> bool {
        self.same_shape(self.root, other, other.root)
    }
}

/// Incrementally allocates nodes and seals them into an [`Expr`].
#[derive(Debug)]
pub struct ExprBuilder {
    arena: Arena,
    // depth of the subtree under each node, indexed like `arena`
    depths: Vec<usize>,
}

impl Default for ExprBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ExprBuilder {
    pub fn new() -> Self {
        Self {
            arena: Arena::new(),
            depths: Vec::new(),
        }
    }

    fn new_node(&mut self, kind: NodeKind) -> Id {
        self.depths.push(self.depth_of(&kind));
        self.arena.alloc(Node { kind })
    }

    fn depth_of(&self, kind: &NodeKind) -> usize {
        match kind {
            NodeKind::Lit(_) => 1,
            NodeKind::BiOp(_, lhs, rhs) => {
                1 + self.depths[lhs.index()].max(self.depths[rhs.index()])
            }
        }
    }

    pub fn lit(&mut self, value: i64) -> Id {
        self.new_node(NodeKind::Lit(LitKind::IntLit(value)))
    }

    pub fn binop(&mut self, kind: BiOpKind, lhs: Id, rhs: Id) -> Result<Id> {
        self.check_owned(lhs)?;
        self.check_owned(rhs)?;
        let kind = NodeKind::BiOp(kind, lhs, rhs);
        if self.depth_of(&kind) > MAX_DEPTH {
            return Err(too_deep());
        }
        Ok(self.new_node(kind))
    }

    /// Copies `expr` into this builder and returns the id of its root.
    pub fn graft(&mut self, expr: &Expr) -> Id {
        self.graft_at(expr, expr.root)
    }

    fn graft_at(&mut self, expr: &Expr, id: Id) -> Id {
        let kind = match expr.kind(id) {
            NodeKind::Lit(lit) => NodeKind::Lit(lit.clone()),
            &NodeKind::BiOp(kind, lhs, rhs) => {
                let lhs = self.graft_at(expr, lhs);
                let rhs = self.graft_at(expr, rhs);
                NodeKind::BiOp(kind, lhs, rhs)
            }
        };
        self.new_node(kind)
    }

    pub(crate) fn arena(&self) -> &Arena {
        &self.arena
    }

    /// Seals the tree rooted at `root`. Only nodes reachable from `root` are
    /// kept, and a node used under several parents is duplicated.
    pub fn finish(self, root: Id) -> Result<Expr> {
        self.check_owned(root)?;
        let mut arena = Arena::new();
        let root = copy_tree(&self.arena, root, &mut arena);
        Ok(Expr { arena, root })
    }

    fn check_owned(&self, id: Id) -> Result<()> {
        if self.arena.get(id).is_none() {
            return Err(Error::TypeMismatch(
                "operand is not a node of this expression".into(),
            ));
        }
        Ok(())
    }
}

fn copy_tree(src: &Arena, id: Id, dst: &mut Arena) -> Id {
    let kind = match &src[id].kind {
        NodeKind::Lit(lit) => NodeKind::Lit(lit.clone()),
        &NodeKind::BiOp(kind, lhs, rhs) => {
            let lhs = copy_tree(src, lhs, dst);
            let rhs = copy_tree(src, rhs, dst);
            NodeKind::BiOp(kind, lhs, rhs)
        }
    };
    dst.alloc(Node { kind })
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;

    #[test]
    fn builder_should_drop_unreachable_nodes() -> Result<()> {
        let mut b = ExprBuilder::new();
        let two = b.lit(2);
        let three = b.lit(3);
        let _orphan = b.lit(99);
        let root = b.binop(BiOpKind::Add, two, three)?;
        let expr = b.finish(root)?;
        assert_eq!(expr.node_count(), 3);
        assert_eq!(expr, Expr::add(&Expr::number(2), &Expr::number(3))?);
        Ok(())
    }

    #[test]
    fn builder_should_reject_foreign_operand() {
        let mut other = ExprBuilder::new();
        let foreign = other.lit(1);

        let mut b = ExprBuilder::new();
        let one = b.lit(1);
        let err = b.binop(BiOpKind::Mul, one, foreign).unwrap_err();
        assert!(matches!(err, Error::TypeMismatch(_)));
    }

    #[test]
    fn shared_operand_should_become_two_nodes() -> Result<()> {
        let mut b = ExprBuilder::new();
        let four = b.lit(4);
        let root = b.binop(BiOpKind::Mul, four, four)?;
        let expr = b.finish(root)?;
        assert_eq!(expr.node_count(), 3);
        match expr.kind(expr.root()) {
            NodeKind::BiOp(_, lhs, rhs) => assert_ne!(lhs, rhs),
            other => panic!("expected a binary node, got {other:?}"),
        }
        Ok(())
    }

    #[test]
    fn depth_should_count_nodes_on_longest_path() -> Result<()> {
        let leaf = Expr::number(1);
        assert_eq!(leaf.depth(), 1);
        let nested = Expr::sub(&Expr::mul(&leaf, &leaf)?, &leaf)?;
        assert_eq!(nested.depth(), 3);
        Ok(())
    }

    #[test]
    fn builder_should_stop_at_max_depth() -> Result<()> {
        let mut b = ExprBuilder::new();
        let mut spine = b.lit(1);
        for _ in 1..MAX_DEPTH {
            let one = b.lit(1);
            spine = b.binop(BiOpKind::Add, spine, one)?;
        }
        let one = b.lit(1);
        assert_eq!(b.binop(BiOpKind::Add, spine, one), Err(too_deep()));
        assert_eq!(b.finish(spine)?.depth(), MAX_DEPTH);
        Ok(())
    }

    #[test]
    fn combining_deep_exprs_should_fail() -> Result<()> {
        let mut deep = Expr::number(0);
        for _ in 1..MAX_DEPTH {
            deep = Expr::mul(&Expr::number(2), &deep)?;
        }
        assert_eq!(deep.depth(), MAX_DEPTH);
        assert_eq!(Expr::add(&deep, &Expr::number(1)), Err(too_deep()));
        Ok(())
    }

    #[test]
    fn keywords_should_map_back_to_kinds() {
        for kind in BiOpKind::ALL {
            assert_eq!(BiOpKind::from_keyword(kind.keyword()), Some(kind));
        }
        assert_eq!(BiOpKind::from_keyword("number"), None);
    }
}
