//! Generic AST traversal.
//!
//! A [`Visitor`] overrides only the node kinds it cares about; anything it
//! doesn't override falls through to [`walk_expr`]/[`walk_stmt`], which
//! descend into children in source order. Both the resolver and the type
//! checker are built on this one traversal: the resolver intercepts scope
//! boundaries and declarations, the type checker intercepts every
//! expression to compute and record its type.
//!
//! The free `walk_*` functions read a node's children out as a small owned
//! value (ids are `Copy`) before recursing, so the borrow on `v.ast()` ends
//! before `v` is reborrowed mutably for the recursive call.

use hksl_par::ast::{Ast, ExprId, ExprKind, StmtId, StmtKind};

pub trait Visitor {
    fn ast(&self) -> &Ast;

    fn visit_expr(&mut self, id: ExprId) {
        walk_expr(self, id);
    }

    fn visit_stmt(&mut self, id: StmtId) {
        walk_stmt(self, id);
    }
}

enum ExprChildren {
    None,
    One(ExprId),
    Two(ExprId, ExprId),
    Many(Vec<ExprId>),
    Let(ExprId, Option<ExprId>),
}

fn expr_children(ast: &Ast, id: ExprId) -> ExprChildren {
    match &ast.expr(id).kind {
        ExprKind::NumberConstant { .. } => ExprChildren::None,
        ExprKind::Variable { .. } => ExprChildren::None,
        ExprKind::VarDecl { .. } => ExprChildren::None,
        ExprKind::UnaryExpr { expr, .. } => ExprChildren::One(*expr),
        ExprKind::BinExpr { left, right, .. } => ExprChildren::Two(*left, *right),
        ExprKind::CallExpr { args, .. } => ExprChildren::Many(args.clone()),
        ExprKind::AssignmentExpr { lhs, rhs, .. } => ExprChildren::Two(*lhs, *rhs),
        ExprKind::LetExpr { var_decl, rhs } => ExprChildren::Let(*var_decl, *rhs),
    }
}

pub fn walk_expr<V: Visitor + ?Sized>(v: &mut V, id: ExprId) {
    match expr_children(v.ast(), id) {
        ExprChildren::None => {}
        ExprChildren::One(e) => v.visit_expr(e),
        ExprChildren::Two(a, b) => {
            v.visit_expr(a);
            v.visit_expr(b);
        }
        ExprChildren::Many(ids) => {
            for e in ids {
                v.visit_expr(e);
            }
        }
        ExprChildren::Let(var_decl, rhs) => {
            v.visit_expr(var_decl);
            if let Some(rhs) = rhs {
                v.visit_expr(rhs);
            }
        }
    }
}

enum StmtChildren {
    None,
    Expr(ExprId),
    Stmts(Vec<StmtId>),
    If(ExprId, StmtId, Option<StmtId>),
    Stmt(StmtId),
    Function(Vec<ExprId>, StmtId),
}

fn stmt_children(ast: &Ast, id: StmtId) -> StmtChildren {
    match &ast.stmt(id).kind {
        StmtKind::ExprStatement { expr } => StmtChildren::Expr(*expr),
        StmtKind::BlockStatement { statements } => StmtChildren::Stmts(statements.clone()),
        StmtKind::IfStatement { condition, then_block, else_stmt } => {
            StmtChildren::If(*condition, *then_block, *else_stmt)
        }
        StmtKind::ElseStatement { statement } => StmtChildren::Stmt(*statement),
        StmtKind::Function { args, block, .. } => StmtChildren::Function(args.clone(), *block),
        StmtKind::ReturnStatement { value, .. } => match value {
            Some(e) => StmtChildren::Expr(*e),
            None => StmtChildren::None,
        },
    }
}

pub fn walk_stmt<V: Visitor + ?Sized>(v: &mut V, id: StmtId) {
    match stmt_children(v.ast(), id) {
        StmtChildren::None => {}
        StmtChildren::Expr(e) => v.visit_expr(e),
        StmtChildren::Stmts(ids) => {
            for s in ids {
                v.visit_stmt(s);
            }
        }
        StmtChildren::If(cond, then_block, else_stmt) => {
            v.visit_expr(cond);
            v.visit_stmt(then_block);
            if let Some(else_stmt) = else_stmt {
                v.visit_stmt(else_stmt);
            }
        }
        StmtChildren::Stmt(s) => v.visit_stmt(s),
        StmtChildren::Function(args, block) => {
            for a in args {
                v.visit_expr(a);
            }
            v.visit_stmt(block);
        }
    }
}
