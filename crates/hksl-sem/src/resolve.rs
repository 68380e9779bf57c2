//! Name resolution and definite-initialization checking.
//!
//! The resolver walks the AST once, maintaining a [`ScopeStack`], and
//! populates two maps on behalf of [`crate::context::CompilationContext`]:
//! `Variable` use → its `VarDecl`, and `CallExpr` → the `Function` it
//! names. It never aborts on its own account — every rule below
//! accumulates a diagnostic and keeps walking, so a single source file can
//! report more than one mistake per run. The driver is expected to call
//! `abort_if_failure` before handing off to the type checker.

use crate::scope::{ScopeKind, ScopeStack};
use crate::visitor::{walk_expr, walk_stmt, Visitor};
use hksl_par::ast::{Ast, ExprId, ExprKind, StmtId, StmtKind};
use hksl_util::diagnostic::{
    DiagnosticCode, E_SEM_NESTED_FN, E_SEM_REDEFINITION, E_SEM_UNDECLARED_FN, E_SEM_UNDECLARED_VAR,
    E_SEM_UNINITIALIZED,
};
use hksl_util::{FxHashMap, Handler, Symbol};

pub struct Resolver<'a> {
    ast: &'a Ast,
    handler: &'a Handler,
    scopes: ScopeStack,
    ref_to_decl: FxHashMap<ExprId, ExprId>,
    call_to_function: FxHashMap<ExprId, StmtId>,
}

impl<'a> Resolver<'a> {
    pub fn new(ast: &'a Ast, handler: &'a Handler) -> Self {
        Self {
            ast,
            handler,
            scopes: ScopeStack::new(),
            ref_to_decl: FxHashMap::default(),
            call_to_function: FxHashMap::default(),
        }
    }

    pub fn run(&mut self) {
        self.scopes.push(ScopeKind::Global);
        for &stmt in &self.ast.top_level.clone() {
            self.visit_stmt(stmt);
        }
        self.pop_and_check(ScopeKind::Global);
    }

    pub fn into_maps(self) -> (FxHashMap<ExprId, ExprId>, FxHashMap<ExprId, StmtId>) {
        (self.ref_to_decl, self.call_to_function)
    }

    fn report(&self, code: DiagnosticCode, msg: impl Into<String>, span: hksl_util::Span) {
        self.handler.build_error(span, msg).code(code).emit(self.handler);
    }

    fn pop_and_check(&mut self, expected: ScopeKind) {
        let scope = self.scopes.pop();
        debug_assert_eq!(scope.kind, expected);
        for (name, data) in &scope.variables {
            if !data.initialized {
                self.report(
                    E_SEM_UNINITIALIZED,
                    format!("variable `{}` has not been initialized", name.as_str()),
                    data.span,
                );
            }
        }
    }

    fn declare_variable(&mut self, name: Symbol, span: hksl_util::Span, decl: ExprId, initialized: bool) {
        if self.scopes.find_var_decl(name).is_some() {
            self.report(
                E_SEM_REDEFINITION,
                format!("redefinition of variable `{}`", name.as_str()),
                span,
            );
        }
        self.scopes
            .top_mut()
            .variables
            .insert(name, crate::scope::VariableData { decl, span, initialized });
    }
}

impl<'a> Visitor for Resolver<'a> {
    fn ast(&self) -> &Ast {
        self.ast
    }

    fn visit_expr(&mut self, id: ExprId) {
        match &self.ast.expr(id).kind {
            ExprKind::Variable { name } => {
                let name = *name;
                let span = self.ast.expr(id).span;
                match self.scopes.find_var_decl(name) {
                    Some(data) => {
                        self.ref_to_decl.insert(id, data.decl);
                    }
                    None => self.report(
                        E_SEM_UNDECLARED_VAR,
                        format!("use of undeclared variable `{}`", name.as_str()),
                        span,
                    ),
                }
            }
            ExprKind::CallExpr { fn_name, name_span, args } => {
                let (fn_name, name_span, args) = (*fn_name, *name_span, args.clone());
                for arg in &args {
                    self.visit_expr(*arg);
                }
                match self.scopes.find_function(fn_name) {
                    Some(func) => {
                        self.call_to_function.insert(id, func);
                    }
                    None => self.report(
                        E_SEM_UNDECLARED_FN,
                        format!("use of undeclared function `{}`", fn_name.as_str()),
                        name_span,
                    ),
                }
            }
            ExprKind::AssignmentExpr { lhs, rhs, .. } => {
                let (lhs, rhs) = (*lhs, *rhs);
                self.visit_expr(rhs);
                self.visit_expr(lhs);
                if let ExprKind::Variable { name } = self.ast.expr(lhs).kind {
                    self.scopes.mark_initialized(name);
                }
            }
            ExprKind::LetExpr { var_decl, rhs } => {
                let (var_decl, rhs) = (*var_decl, *rhs);
                if let Some(rhs) = rhs {
                    self.visit_expr(rhs);
                }
                let (name, span) = match &self.ast.expr(var_decl).kind {
                    ExprKind::VarDecl { name, name_span, .. } => (*name, *name_span),
                    _ => unreachable!("LetExpr.var_decl is always a VarDecl"),
                };
                self.declare_variable(name, span, var_decl, rhs.is_some());
            }
            ExprKind::VarDecl { .. } => {
                // Reached only through `Function` params, which the
                // resolver's `visit_stmt` override registers directly —
                // a bare `VarDecl` never appears anywhere else.
            }
            _ => walk_expr(self, id),
        }
    }

    fn visit_stmt(&mut self, id: StmtId) {
        match &self.ast.stmt(id).kind {
            StmtKind::BlockStatement { .. } => {
                self.scopes.push(ScopeKind::Block);
                walk_stmt(self, id);
                self.pop_and_check(ScopeKind::Block);
            }
            StmtKind::Function { name, name_span, args, block, .. } => {
                let (name, name_span, args, block) = (*name, *name_span, args.clone(), *block);
                if self.scopes.inside_nested_scope() {
                    self.report(
                        E_SEM_NESTED_FN,
                        "nested function declarations are not allowed",
                        name_span,
                    );
                } else if self.scopes.find_function(name).is_some() {
                    self.report(
                        E_SEM_REDEFINITION,
                        format!("redefinition of function `{}`", name.as_str()),
                        name_span,
                    );
                } else {
                    self.scopes.top_mut().functions.insert(name, id);
                }

                self.scopes.push(ScopeKind::Function);
                for &arg in &args {
                    let (pname, pspan) = match &self.ast.expr(arg).kind {
                        ExprKind::VarDecl { name, name_span, .. } => (*name, *name_span),
                        _ => unreachable!("Function.args entries are always VarDecl"),
                    };
                    self.declare_variable(pname, pspan, arg, true);
                }
                self.visit_stmt(block);
                self.pop_and_check(ScopeKind::Function);
            }
            _ => walk_stmt(self, id),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hksl_lex::Lexer;
    use hksl_par::Parser;
    use hksl_util::diagnostic::Handler;

    #[test]
    fn parameters_resolve_without_error() {
        let handler = Handler::new();
        let tokens = Lexer::collect_tokens("fn f(x: float) -> float { return x; }", &handler);
        let ast = Parser::new(tokens, &handler).parse().unwrap();
        let mut resolver = Resolver::new(&ast, &handler);
        resolver.run();
        assert!(!handler.has_errors());
    }

    #[test]
    fn undeclared_variable_is_reported() {
        let handler = Handler::new();
        let tokens = Lexer::collect_tokens("fn main() { a = 1.0; }", &handler);
        let ast = Parser::new(tokens, &handler).parse().unwrap();
        let mut resolver = Resolver::new(&ast, &handler);
        resolver.run();
        assert!(handler.has_errors());
        assert_eq!(handler.diagnostics()[0].code, Some(E_SEM_UNDECLARED_VAR));
    }

    #[test]
    fn redefinition_of_a_variable_is_reported() {
        let handler = Handler::new();
        let tokens =
            Lexer::collect_tokens("fn main() { let a = 1.0; let a = 2.0; }", &handler);
        let ast = Parser::new(tokens, &handler).parse().unwrap();
        let mut resolver = Resolver::new(&ast, &handler);
        resolver.run();
        assert_eq!(handler.error_count(), 1);
        assert_eq!(handler.diagnostics()[0].code, Some(E_SEM_REDEFINITION));
    }

    #[test]
    fn uninitialized_variable_is_reported_at_scope_exit() {
        let handler = Handler::new();
        let tokens = Lexer::collect_tokens("fn main() { let a: float; }", &handler);
        let ast = Parser::new(tokens, &handler).parse().unwrap();
        let mut resolver = Resolver::new(&ast, &handler);
        resolver.run();
        assert_eq!(handler.error_count(), 1);
        assert_eq!(handler.diagnostics()[0].code, Some(E_SEM_UNINITIALIZED));
    }

    #[test]
    fn assignment_initializes_a_declared_variable() {
        let handler = Handler::new();
        let tokens =
            Lexer::collect_tokens("fn main() { let a: float; a = 1.0; }", &handler);
        let ast = Parser::new(tokens, &handler).parse().unwrap();
        let mut resolver = Resolver::new(&ast, &handler);
        resolver.run();
        assert!(!handler.has_errors());
    }

    #[test]
    fn calling_an_undeclared_function_is_reported() {
        let handler = Handler::new();
        let tokens = Lexer::collect_tokens("fn main() { let a = f(1.0); }", &handler);
        let ast = Parser::new(tokens, &handler).parse().unwrap();
        let mut resolver = Resolver::new(&ast, &handler);
        resolver.run();
        assert_eq!(handler.diagnostics()[0].code, Some(E_SEM_UNDECLARED_FN));
    }

    #[test]
    fn a_function_is_visible_from_another_declared_after_it_in_source() {
        let handler = Handler::new();
        let tokens = Lexer::collect_tokens(
            "fn main() { let a = g(1.0); } fn g(x: float) -> float { return x; }",
            &handler,
        );
        let ast = Parser::new(tokens, &handler).parse().unwrap();
        let mut resolver = Resolver::new(&ast, &handler);
        resolver.run();
        assert!(!handler.has_errors());
    }

    #[test]
    fn a_block_local_cannot_be_seen_from_a_sibling_block() {
        let handler = Handler::new();
        let tokens = Lexer::collect_tokens(
            "fn main() { { let a = 1.0; } a = 2.0; }",
            &handler,
        );
        let ast = Parser::new(tokens, &handler).parse().unwrap();
        let mut resolver = Resolver::new(&ast, &handler);
        resolver.run();
        assert!(handler.diagnostics().iter().any(|d| d.code == Some(E_SEM_UNDECLARED_VAR)));
    }

    #[test]
    fn nested_function_declarations_are_rejected() {
        let handler = Handler::new();
        let tokens =
            Lexer::collect_tokens("fn main() { fn inner() {} }", &handler);
        let ast = Parser::new(tokens, &handler).parse().unwrap();
        let mut resolver = Resolver::new(&ast, &handler);
        resolver.run();
        assert!(handler.diagnostics().iter().any(|d| d.code == Some(E_SEM_NESTED_FN)));
    }
}
