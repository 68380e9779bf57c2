//! hksl-par - Recursive-Descent Parser
//!
//! Turns the token list produced by `hksl-lex` into an [`Ast`]: an arena of
//! expressions and an arena of statements, rooted at an ordered list of
//! top-level statements. Parsing is hand-written recursive descent — the
//! grammar is small and unambiguous enough (one level of arithmetic
//! precedence, no backtracking needed anywhere) that a parser generator
//! would add machinery without removing any.
//!
//! Parser errors are fatal, same as the lexer's: the first unexpected
//! token, unmatched bracket, missing semicolon, non-place assignment
//! target, or unknown type name stops parsing and reports a single
//! diagnostic. `parse()` returns `None` in that case; the driver is
//! responsible for not proceeding to resolution.

pub mod ast;
mod expr;
mod stmt;

pub use ast::{Ast, BinOp, ExprId, ExprKind, ExprNode, StmtId, StmtKind, StmtNode, UnaryOp};

use hksl_lex::{Token, TokenKind};
use hksl_util::diagnostic::{DiagnosticCode, Handler};
use hksl_util::{Span, TypeRegistry};

pub struct Parser<'a> {
    tokens: Vec<Token>,
    position: usize,
    handler: &'a Handler,
    types: TypeRegistry,
    ast: Ast,
    failed: bool,
}

impl<'a> Parser<'a> {
    pub fn new(tokens: Vec<Token>, handler: &'a Handler) -> Self {
        Self {
            tokens,
            position: 0,
            handler,
            types: TypeRegistry::new(),
            ast: Ast::new(),
            failed: false,
        }
    }

    /// Parse a full program. Returns `None` once a fatal error has been
    /// reported; the `Ast` built so far is discarded along with it.
    pub fn parse(mut self) -> Option<Ast> {
        while !self.at(TokenKind::Eof) {
            let stmt = self.parse_statement()?;
            self.ast.top_level.push(stmt);
        }
        if self.failed {
            None
        } else {
            Some(self.ast)
        }
    }

    // -- token stream helpers --------------------------------------------

    fn current(&self) -> &Token {
        &self.tokens[self.position.min(self.tokens.len() - 1)]
    }

    fn peek(&self, offset: usize) -> &Token {
        let idx = (self.position + offset).min(self.tokens.len() - 1);
        &self.tokens[idx]
    }

    fn at(&self, kind: TokenKind) -> bool {
        std::mem::discriminant(&self.current().kind) == std::mem::discriminant(&kind)
    }

    /// Advances past the current token and returns it. Does nothing (and
    /// returns the `Eof` token again) if already at `Eof` — callers check
    /// `at(TokenKind::Eof)` before looping further, so this is only ever a
    /// defensive floor, never load-bearing.
    fn advance(&mut self) -> Token {
        let tok = *self.current();
        if !matches!(tok.kind, TokenKind::Eof) {
            self.position += 1;
        }
        tok
    }

    fn consume(&mut self, kind: TokenKind) -> Option<Token> {
        if self.at(kind) {
            Some(self.advance())
        } else {
            None
        }
    }

    fn expect(&mut self, kind: TokenKind, what: &str) -> Option<Token> {
        if let Some(tok) = self.consume(kind) {
            Some(tok)
        } else {
            let span = self.current().span;
            self.fatal(
                DiagnosticCode::E_PARSE_EXPECTED_TOKEN,
                format!("expected {what}, found {:?}", self.current().kind),
                span,
            );
            None
        }
    }

    fn fatal(&mut self, code: DiagnosticCode, message: impl Into<String>, span: Span) {
        self.handler.build_error(span, message).code(code).emit(self.handler);
        self.failed = true;
    }
}
