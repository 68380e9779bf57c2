//! Type inference and checking.
//!
//! Runs after the resolver has populated `ref_to_decl`/`call_to_function`
//! and the driver has confirmed resolution produced no errors. Walks the
//! AST post-order through the same [`Visitor`] framework — a node's
//! children are always typed before the node itself, so `type_of` on a
//! child is always either a recorded type or a deliberate "unknown"
//! (`None`), never a hole.
//!
//! Unknown types short-circuit silently: once a subexpression couldn't be
//! typed (because an earlier phase already reported an error about it),
//! nothing downstream emits a second, confusing error about the same root
//! cause.

use crate::visitor::{walk_expr, walk_stmt, Visitor};
use hksl_par::ast::{Ast, ExprId, ExprKind, StmtId, StmtKind, UnaryOp};
use hksl_util::diagnostic::{
    DiagnosticCode, E_TYPE_ARITY, E_TYPE_MISMATCH, E_TYPE_UNINFERABLE,
};
use hksl_util::types::{TypeId, TypeRegistry, VOID};
use hksl_util::{FxHashMap, Handler, Span};

pub struct TypeChecker<'a> {
    ast: &'a mut Ast,
    handler: &'a Handler,
    ref_to_decl: &'a FxHashMap<ExprId, ExprId>,
    call_to_function: &'a FxHashMap<ExprId, StmtId>,
    types: TypeRegistry,
    expr_to_type: FxHashMap<ExprId, TypeId>,
    return_type_stack: Vec<TypeId>,
}

impl<'a> TypeChecker<'a> {
    pub fn new(
        ast: &'a mut Ast,
        handler: &'a Handler,
        ref_to_decl: &'a FxHashMap<ExprId, ExprId>,
        call_to_function: &'a FxHashMap<ExprId, StmtId>,
    ) -> Self {
        Self {
            ast,
            handler,
            ref_to_decl,
            call_to_function,
            types: TypeRegistry::new(),
            expr_to_type: FxHashMap::default(),
            return_type_stack: Vec::new(),
        }
    }

    pub fn run(&mut self, top_level: &[StmtId]) {
        for &stmt in top_level {
            self.visit_stmt(stmt);
        }
    }

    pub fn into_type_map(self) -> FxHashMap<ExprId, TypeId> {
        self.expr_to_type
    }

    fn report(&self, code: DiagnosticCode, msg: impl Into<String>, span: Span) {
        self.handler.build_error(span, msg).code(code).emit(self.handler);
    }

    fn type_of(&self, id: ExprId) -> Option<TypeId> {
        self.expr_to_type.get(&id).copied()
    }

    /// The declared type carried by a `VarDecl` node, read straight off the
    /// AST rather than `expr_to_type` — a `VarDecl`'s own expression type is
    /// always `void` (see the inference table), but the type a `Variable`
    /// reference resolves to is this field, possibly backfilled by
    /// [`Self::finalize_let`].
    fn declared_type(&self, decl: ExprId) -> Option<TypeId> {
        match &self.ast.expr(decl).kind {
            ExprKind::VarDecl { ty, .. } => *ty,
            _ => unreachable!("ref_to_decl always points at a VarDecl"),
        }
    }

    fn function_signature(&self, func: StmtId) -> (Vec<TypeId>, TypeId) {
        match &self.ast.stmt(func).kind {
            StmtKind::Function { args, return_type, .. } => {
                let params = args
                    .iter()
                    .map(|&a| self.declared_type(a).expect("function parameters are always typed"))
                    .collect();
                (params, *return_type)
            }
            _ => unreachable!("call_to_function always points at a Function statement"),
        }
    }

    /// `LetExpr`'s four-way inference: explicit type and/or an initializer
    /// may be present; exactly one of them is required, and when both are
    /// present they must agree.
    fn finalize_let(&mut self, var_decl: ExprId, rhs: Option<ExprId>) {
        let (name, span, explicit_ty) = match &self.ast.expr(var_decl).kind {
            ExprKind::VarDecl { name, name_span, ty } => (*name, *name_span, *ty),
            _ => unreachable!("LetExpr.var_decl is always a VarDecl"),
        };
        self.expr_to_type.insert(var_decl, VOID);

        let rhs_ty = rhs.and_then(|r| self.type_of(r));
        match (explicit_ty, rhs_ty) {
            (Some(expected), Some(found)) => {
                if expected != found {
                    self.report(
                        E_TYPE_MISMATCH,
                        format!(
                            "variable `{}` declared as `{}`, initializer has type `{}`",
                            name.as_str(),
                            self.types.name_of(expected),
                            self.types.name_of(found)
                        ),
                        span,
                    );
                }
            }
            (None, Some(found)) => {
                if let ExprKind::VarDecl { ty, .. } = &mut self.ast.expr_mut(var_decl).kind {
                    *ty = Some(found);
                }
            }
            (Some(_), None) => {}
            (None, None) => {
                if rhs.is_none() {
                    self.report(
                        E_TYPE_UNINFERABLE,
                        format!("couldn't infer type for variable `{}`", name.as_str()),
                        span,
                    );
                }
                // rhs present but its type is unknown: an earlier error
                // already explains why, so stay silent here.
            }
        }
    }

    fn check_call(&mut self, id: ExprId, name_span: Span, args: &[ExprId]) -> Option<TypeId> {
        let func = *self.call_to_function.get(&id)?;
        let (params, ret) = self.function_signature(func);

        if params.len() != args.len() {
            self.report(
                E_TYPE_ARITY,
                format!("expected {} argument(s), found {}", params.len(), args.len()),
                name_span,
            );
        }

        for (i, (&arg, &expected)) in args.iter().zip(params.iter()).enumerate() {
            if let Some(found) = self.type_of(arg) {
                if found != expected {
                    self.report(
                        E_TYPE_MISMATCH,
                        format!(
                            "argument {} has type `{}`, expected `{}`",
                            i + 1,
                            self.types.name_of(found),
                            self.types.name_of(expected)
                        ),
                        name_span,
                    );
                }
            }
        }

        Some(ret)
    }

    fn compute_expr_type(&mut self, id: ExprId) -> Option<TypeId> {
        match &self.ast.expr(id).kind {
            ExprKind::NumberConstant { .. } => Some(hksl_util::types::FLOAT),
            ExprKind::Variable { .. } => {
                let decl = *self.ref_to_decl.get(&id)?;
                self.declared_type(decl)
            }
            ExprKind::VarDecl { .. } => Some(VOID),
            ExprKind::LetExpr { var_decl, rhs } => {
                let (var_decl, rhs) = (*var_decl, *rhs);
                self.finalize_let(var_decl, rhs);
                Some(VOID)
            }
            ExprKind::UnaryExpr { op: UnaryOp::Negate, expr, op_token } => {
                let (expr, op_token) = (*expr, *op_token);
                match self.type_of(expr) {
                    Some(t) if t == VOID => {
                        self.report(E_TYPE_MISMATCH, "cannot negate type `void`", op_token);
                        None
                    }
                    Some(t) => Some(t),
                    None => None,
                }
            }
            ExprKind::BinExpr { op: _, left, right, op_token } => {
                let (left, right, op_token) = (*left, *right, *op_token);
                match (self.type_of(left), self.type_of(right)) {
                    (Some(l), Some(r)) if l == r => Some(l),
                    (Some(l), Some(r)) => {
                        self.report(
                            E_TYPE_MISMATCH,
                            format!(
                                "operand types differ: `{}` vs `{}`",
                                self.types.name_of(l),
                                self.types.name_of(r)
                            ),
                            op_token,
                        );
                        None
                    }
                    _ => None,
                }
            }
            ExprKind::CallExpr { name_span, args, .. } => {
                let (name_span, args) = (*name_span, args.clone());
                self.check_call(id, name_span, &args)
            }
            ExprKind::AssignmentExpr { lhs, rhs, eq_token } => {
                let (lhs, rhs, eq_token) = (*lhs, *rhs, *eq_token);
                match (self.type_of(lhs), self.type_of(rhs)) {
                    (Some(l), Some(r)) if l == r => Some(l),
                    (Some(l), Some(r)) => {
                        self.report(
                            E_TYPE_MISMATCH,
                            format!(
                                "cannot assign `{}` to a place of type `{}`",
                                self.types.name_of(r),
                                self.types.name_of(l)
                            ),
                            eq_token,
                        );
                        None
                    }
                    _ => None,
                }
            }
        }
    }
}

impl<'a> Visitor for TypeChecker<'a> {
    fn ast(&self) -> &Ast {
        self.ast
    }

    fn visit_expr(&mut self, id: ExprId) {
        walk_expr(self, id);
        if let Some(ty) = self.compute_expr_type(id) {
            self.expr_to_type.insert(id, ty);
        }
    }

    fn visit_stmt(&mut self, id: StmtId) {
        match &self.ast.stmt(id).kind {
            StmtKind::Function { args, block, return_type, .. } => {
                let (args, block, return_type) = (args.clone(), *block, *return_type);
                for &arg in &args {
                    self.expr_to_type.insert(arg, VOID);
                }
                self.return_type_stack.push(return_type);
                self.visit_stmt(block);
                self.return_type_stack.pop();
            }
            StmtKind::ReturnStatement { value, ret_token } => {
                let (value, ret_token) = (*value, *ret_token);
                let expected = self.return_type_stack.last().copied();
                match value {
                    Some(e) => {
                        self.visit_expr(e);
                        if let (Some(found), Some(expected)) = (self.type_of(e), expected) {
                            if found != expected {
                                self.report(
                                    E_TYPE_MISMATCH,
                                    format!(
                                        "incorrect return type, expected `{}`, got `{}`",
                                        self.types.name_of(expected),
                                        self.types.name_of(found)
                                    ),
                                    ret_token,
                                );
                            }
                        }
                    }
                    None => {
                        if let Some(expected) = expected {
                            if expected != VOID {
                                self.report(
                                    E_TYPE_MISMATCH,
                                    format!(
                                        "incorrect return type, expected `{}`, got `void`",
                                        self.types.name_of(expected)
                                    ),
                                    ret_token,
                                );
                            }
                        }
                    }
                }
            }
            _ => walk_stmt(self, id),
        }
    }
}
