//! Shared compilation state.
//!
//! `CompilationContext` owns the one `Ast` live during a compile plus the
//! maps the resolver and type checker populate into it. It hands each
//! phase only the pieces of itself that phase needs — by borrowing fields
//! directly rather than through a method that takes all of `&self`/`&mut
//! self`, the borrow checker sees the borrows as disjoint even though
//! they're drawn from the same struct in the same statement.

use crate::resolve::Resolver;
use crate::typeck::TypeChecker;
use hksl_par::ast::{Ast, ExprId, StmtId};
use hksl_util::diagnostic::Handler;
use hksl_util::types::{TypeId, TypeRegistry};
use hksl_util::{FxHashMap, Span};

#[derive(Default)]
pub struct CompilationContext {
    ast: Option<Ast>,
    types: TypeRegistry,
    handler: Handler,
    ref_to_decl: FxHashMap<ExprId, ExprId>,
    call_to_function: FxHashMap<ExprId, StmtId>,
    expr_to_type: FxHashMap<ExprId, TypeId>,
}

impl CompilationContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_ast(&mut self, ast: Ast) {
        self.ast = Some(ast);
    }

    pub fn ast(&self) -> &Ast {
        self.ast.as_ref().expect("CompilationContext::set_ast was never called")
    }

    pub fn types(&self) -> &TypeRegistry {
        &self.types
    }

    pub fn handler(&self) -> &Handler {
        &self.handler
    }

    pub fn ref_to_decl(&self) -> &FxHashMap<ExprId, ExprId> {
        &self.ref_to_decl
    }

    pub fn call_to_function(&self) -> &FxHashMap<ExprId, StmtId> {
        &self.call_to_function
    }

    pub fn expr_to_type(&self) -> &FxHashMap<ExprId, TypeId> {
        &self.expr_to_type
    }

    /// Appends a diagnostic at `span` and marks the context failing.
    /// Exposed for callers outside the resolver/type-checker pair
    /// (currently unused by either, which report through the `Handler`
    /// directly so their diagnostics carry a `DiagnosticCode`).
    pub fn error(&self, span: Span, msg: impl Into<String>) {
        self.handler.build_error(span, msg).emit(&self.handler);
    }

    pub fn is_success(&self) -> bool {
        !self.handler.has_errors()
    }

    pub fn is_failing(&self) -> bool {
        self.handler.has_errors()
    }

    /// The accumulated diagnostics as `"{span}: {message}"` strings, in
    /// discovery order — the embedding API's `CompilationResult.errors`.
    pub fn errors(&self) -> Vec<String> {
        self.handler
            .diagnostics()
            .iter()
            .map(|d| format!("{}: {}", d.span, d.message))
            .collect()
    }

    /// Driver-level semantics: print accumulated diagnostics and terminate
    /// the process if the context is failing. The embedding API instead
    /// checks `is_failing`/`errors` and returns a `CompilationResult`.
    pub fn abort_if_failure(&self) {
        if self.is_failing() {
            for line in self.errors() {
                println!("{line}");
            }
            std::process::exit(1);
        }
    }

    /// Runs the resolver over the current AST, populating `ref_to_decl` and
    /// `call_to_function`.
    pub fn resolve(&mut self) {
        let ast = self.ast.as_ref().expect("CompilationContext::set_ast was never called");
        let mut resolver = Resolver::new(ast, &self.handler);
        resolver.run();
        let (ref_to_decl, call_to_function) = resolver.into_maps();
        self.ref_to_decl = ref_to_decl;
        self.call_to_function = call_to_function;
    }

    /// Runs the type checker over the current AST. Requires `resolve` to
    /// have already run and the context to not be failing — the driver is
    /// responsible for calling `abort_if_failure`/checking `is_failing`
    /// between the two.
    pub fn typecheck(&mut self) {
        let top_level = self.ast.as_ref().expect("ast not set").top_level.clone();
        let ast = self.ast.as_mut().expect("CompilationContext::set_ast was never called");
        let mut checker =
            TypeChecker::new(ast, &self.handler, &self.ref_to_decl, &self.call_to_function);
        checker.run(&top_level);
        self.expr_to_type = checker.into_type_map();
    }
}
