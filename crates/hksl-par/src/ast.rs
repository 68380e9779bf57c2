//! AST node definitions.
//!
//! HKSL's AST is two sum types, `Expr` and `Statement`, stored in arenas
//! rather than linked through owned `Box`es. An arena index is `Copy`,
//! small, and stable for the lifetime of the [`Ast`] — exactly the identity
//! guarantee the resolver and type checker need to key their maps by node
//! rather than by (unstable, unclonable) pointer.

use hksl_util::{define_idx, IndexVec, Span, Symbol, TypeId};

define_idx!(ExprId);
define_idx!(StmtId);

/// The parsed program: an arena of expressions, an arena of statements, and
/// the ordered list of top-level statements that make up the program.
#[derive(Debug, Default)]
pub struct Ast {
    pub exprs: IndexVec<ExprId, ExprNode>,
    pub stmts: IndexVec<StmtId, StmtNode>,
    pub top_level: Vec<StmtId>,
}

impl Ast {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn expr(&self, id: ExprId) -> &ExprNode {
        &self.exprs[id]
    }

    /// Mutable access, used by the type checker to backfill an inferred
    /// type onto a `VarDecl` once its `LetExpr` has been resolved.
    pub fn expr_mut(&mut self, id: ExprId) -> &mut ExprNode {
        &mut self.exprs[id]
    }

    pub fn stmt(&self, id: StmtId) -> &StmtNode {
        &self.stmts[id]
    }

    pub(crate) fn push_expr(&mut self, kind: ExprKind, span: Span) -> ExprId {
        self.exprs.push(ExprNode { kind, span })
    }

    pub(crate) fn push_stmt(&mut self, kind: StmtKind, span: Span) -> StmtId {
        self.stmts.push(StmtNode { kind, span })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    Negate,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinOp {
    Add,
    Subtract,
    Multiply,
    Divide,
    Equals,
}

#[derive(Debug)]
pub struct ExprNode {
    pub kind: ExprKind,
    pub span: Span,
}

#[derive(Debug)]
pub enum ExprKind {
    NumberConstant {
        value: f64,
    },
    /// A *use* of a name.
    Variable {
        name: Symbol,
    },
    /// A declaration; appears as a `LetExpr`'s binding and as a `Function`
    /// parameter. `ty` is already resolved to a primitive [`TypeId`] — the
    /// grammar's `type := IDENT` production looks it up in the
    /// [`hksl_util::TypeRegistry`] at parse time, not later.
    VarDecl {
        name: Symbol,
        name_span: Span,
        ty: Option<TypeId>,
    },
    UnaryExpr {
        op: UnaryOp,
        expr: ExprId,
        op_token: Span,
    },
    BinExpr {
        op: BinOp,
        left: ExprId,
        right: ExprId,
        op_token: Span,
    },
    CallExpr {
        fn_name: Symbol,
        name_span: Span,
        args: Vec<ExprId>,
    },
    /// `lhs` must be a *place* — `Variable` or `CallExpr` — enforced by the
    /// parser, not the resolver.
    AssignmentExpr {
        lhs: ExprId,
        rhs: ExprId,
        eq_token: Span,
    },
    LetExpr {
        var_decl: ExprId,
        rhs: Option<ExprId>,
    },
}

impl ExprKind {
    pub fn is_place(&self) -> bool {
        matches!(self, ExprKind::Variable { .. } | ExprKind::CallExpr { .. })
    }
}

#[derive(Debug)]
pub struct StmtNode {
    pub kind: StmtKind,
    pub span: Span,
}

#[derive(Debug)]
pub enum StmtKind {
    ExprStatement {
        expr: ExprId,
    },
    BlockStatement {
        statements: Vec<StmtId>,
    },
    IfStatement {
        condition: ExprId,
        then_block: StmtId,
        else_stmt: Option<StmtId>,
    },
    /// Wraps either a `BlockStatement` or another `IfStatement` — the latter
    /// is how `else if` is represented, rather than as its own node kind.
    ElseStatement {
        statement: StmtId,
    },
    Function {
        name: Symbol,
        name_span: Span,
        args: Vec<ExprId>,
        block: StmtId,
        return_type: TypeId,
    },
    ReturnStatement {
        value: Option<ExprId>,
        ret_token: Span,
    },
}
