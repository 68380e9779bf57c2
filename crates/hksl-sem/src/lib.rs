//! hksl-sem - Name Resolution & Type Checking
//!
//! The two semantic passes that run after parsing: a [`resolve::Resolver`]
//! that binds every variable use and call expression to its declaration
//! while enforcing scoping and definite-initialization, and a
//! [`typeck::TypeChecker`] that assigns a concrete primitive type to every
//! expression and infers the types `let` leaves unstated. Both are built
//! on one generic [`visitor::Visitor`] traversal, and both report through
//! the shared [`hksl_util::diagnostic::Handler`] owned by
//! [`context::CompilationContext`], which is the state a driver actually
//! holds across a compile.
//!
//! Resolution errors are fatal at the phase boundary — a driver calls
//! `CompilationContext::abort_if_failure` (or checks `is_failing`) between
//! `resolve` and `typecheck` so that a program with unresolved names
//! doesn't also get a flood of type errors about those same names.

pub mod context;
pub mod resolve;
pub mod scope;
pub mod typeck;
pub mod visitor;

pub use context::CompilationContext;
pub use resolve::Resolver;
pub use scope::{Scope, ScopeKind, ScopeStack, VariableData};
pub use typeck::TypeChecker;
pub use visitor::{walk_expr, walk_stmt, Visitor};
