//! Foundation types shared across the HKSL compiler pipeline.
//!
//! Most of this crate is the same kind of ground floor any compiler's
//! "util" crate provides — it doesn't know HKSL's grammar or its semantic
//! rules:
//!
//! - [`symbol`] — interned identifiers (`Symbol`)
//! - [`span`] — source locations (`Span`)
//! - [`index_vec`] — typed-index arenas (`IndexVec`, `Idx`, `define_idx!`)
//! - [`diagnostic`] — user-facing error/warning reporting (`Diagnostic`, `Handler`)
//! - [`error`] — internal, programmer-facing errors for this crate's own APIs
//!
//! [`types`] is the one exception: the primitive type registry is shared
//! between the parser (which resolves type names eagerly) and the type
//! checker (which assigns them to expressions), so it lives at the base of
//! the dependency graph rather than duplicated or hoisted awkwardly later.

pub mod diagnostic;
pub mod error;
pub mod index_vec;
pub mod span;
pub mod symbol;
pub mod types;

pub use diagnostic::{Diagnostic, Handler, Level};
pub use index_vec::{Idx, IndexVec};
pub use span::Span;
pub use symbol::Symbol;
pub use types::{TypeId, TypeRegistry};

pub use rustc_hash::{FxHashMap, FxHashSet};
