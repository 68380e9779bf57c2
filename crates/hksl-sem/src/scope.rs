//! Scope stack used by the resolver.
//!
//! HKSL scoping is a plain stack, not a rib tree: a `Global` scope pushed
//! once at construction, a `Function` scope per function body, and a
//! `Block` scope per nested `{ }`. There's no closure capture and no scope
//! reuse, so `Vec<Scope>` mirroring the visitor's own call stack is all the
//! shape this language needs.

use hksl_par::ast::{ExprId, StmtId};
use hksl_util::{FxHashMap, Span, Symbol};

/// Which kind of lexical region a [`Scope`] represents. Variable lookup
/// stops at the first `Function` scope it crosses, walking from the top of
/// the stack down; function lookup searches every scope on the stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScopeKind {
    Global,
    Function,
    Block,
}

/// Bookkeeping for one declared variable: where it was declared, and
/// whether it's been assigned yet. Checked for `initialized == false` when
/// the owning scope is popped.
#[derive(Debug, Clone, Copy)]
pub struct VariableData {
    pub decl: ExprId,
    pub span: Span,
    pub initialized: bool,
}

#[derive(Debug)]
pub struct Scope {
    pub kind: ScopeKind,
    pub variables: FxHashMap<Symbol, VariableData>,
    pub functions: FxHashMap<Symbol, StmtId>,
}

impl Scope {
    pub fn new(kind: ScopeKind) -> Self {
        Self { kind, variables: FxHashMap::default(), functions: FxHashMap::default() }
    }
}

/// The stack of scopes live during a resolver walk.
#[derive(Debug, Default)]
pub struct ScopeStack {
    scopes: Vec<Scope>,
}

impl ScopeStack {
    pub fn new() -> Self {
        Self { scopes: Vec::new() }
    }

    pub fn push(&mut self, kind: ScopeKind) {
        self.scopes.push(Scope::new(kind));
    }

    pub fn pop(&mut self) -> Scope {
        self.scopes.pop().expect("scope stack underflow")
    }

    pub fn top(&self) -> &Scope {
        self.scopes.last().expect("scope stack is empty")
    }

    pub fn top_mut(&mut self) -> &mut Scope {
        self.scopes.last_mut().expect("scope stack is empty")
    }

    pub fn len(&self) -> usize {
        self.scopes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scopes.is_empty()
    }

    /// `find_var_decl`: search from the top of the stack downward, stopping
    /// after the first `Function` scope (inclusive) — a hit there is
    /// returned, but the search never continues into an outer function or
    /// into `Global`. HKSL has no global variables and no closures.
    pub fn find_var_decl(&self, name: Symbol) -> Option<VariableData> {
        for scope in self.scopes.iter().rev() {
            if let Some(data) = scope.variables.get(&name) {
                return Some(*data);
            }
            if scope.kind == ScopeKind::Function {
                break;
            }
        }
        None
    }

    /// `find_function`: search every scope, bottom to top. In practice only
    /// `Global` ever holds a function (nested declarations are rejected),
    /// but the loop is written over the whole stack to match the general
    /// rule.
    pub fn find_function(&self, name: Symbol) -> Option<StmtId> {
        for scope in &self.scopes {
            if let Some(&id) = scope.functions.get(&name) {
                return Some(id);
            }
        }
        None
    }

    /// True once any scope other than `Global` is open — used to reject a
    /// `Function` statement seen anywhere but the top level.
    pub fn inside_nested_scope(&self) -> bool {
        self.scopes.len() > 1
    }

    /// Marks a variable found via the same search rule as `find_var_decl`
    /// as initialized — used when an `AssignmentExpr`'s place is that
    /// variable. Returns `false` if the name wasn't found (the caller will
    /// already have reported an undeclared-variable error in that case).
    pub fn mark_initialized(&mut self, name: Symbol) -> bool {
        for scope in self.scopes.iter_mut().rev() {
            if let Some(data) = scope.variables.get_mut(&name) {
                data.initialized = true;
                return true;
            }
            if scope.kind == ScopeKind::Function {
                break;
            }
        }
        false
    }
}
