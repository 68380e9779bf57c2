//! Core error types for the hksl-util crate.
//!
//! These are programmer-facing errors: they signal misuse of the utilities
//! themselves (a corrupted interner, an out-of-range index), not a problem
//! with HKSL source text. Source-text problems are reported as `Diagnostic`s
//! accumulated on a `CompilationContext`, never as a `Result::Err` here.

use thiserror::Error;

/// Error type for symbol interning operations
#[derive(Debug, Error)]
pub enum SymbolError {
    /// Symbol not found in the interner
    #[error("symbol not found: index {index}")]
    NotFound { index: u32 },
}

/// Error type for index vector operations
#[derive(Debug, Error)]
pub enum IndexVecError {
    /// Index out of bounds
    #[error("index out of bounds: index {index}, length {length}")]
    OutOfBounds { index: usize, length: usize },
}

/// Error type for diagnostic operations
#[derive(Debug, Error)]
pub enum DiagnosticError {
    /// Invalid diagnostic code
    #[error("invalid diagnostic code: {0}")]
    InvalidCode(String),
}

/// Result type alias for symbol operations
pub type SymbolResult<T> = std::result::Result<T, SymbolError>;

/// Result type alias for index vector operations
pub type IndexVecResult<T> = std::result::Result<T, IndexVecError>;

/// Result type alias for diagnostic operations
pub type DiagnosticResult<T> = std::result::Result<T, DiagnosticError>;
