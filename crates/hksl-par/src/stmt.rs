//! Statement parsing.
//!
//! ```text
//! program     := statement*
//! statement   := function | block | return_stmt | if_stmt | expr_stmt
//! function    := "fn" IDENT "(" params? ")" ("->" type)? block
//! params      := param ("," param)*
//! param       := IDENT ":" type
//! block       := "{" statement* "}"
//! return_stmt := "return" expr? ";"
//! if_stmt     := "if" expr block else_stmt?
//! else_stmt   := "else" (if_stmt | block)
//! expr_stmt   := expr ";"
//! ```
//!
//! A function's return type defaults to `void` when the `-> type` clause is
//! omitted. `if`/`else` bodies are always blocks — `if cond stmt` with a bare
//! statement body is not part of the grammar.

use crate::ast::{ExprId, StmtId, StmtKind};
use crate::Parser;
use hksl_lex::TokenKind;
use hksl_util::diagnostic::DiagnosticCode;

impl<'a> Parser<'a> {
    pub(crate) fn parse_statement(&mut self) -> Option<StmtId> {
        if self.at(TokenKind::KeywordFn) {
            self.parse_function()
        } else if self.at(TokenKind::LeftCurly) {
            self.parse_block()
        } else if self.at(TokenKind::KeywordReturn) {
            self.parse_return_stmt()
        } else if self.at(TokenKind::KeywordIf) {
            self.parse_if_stmt()
        } else {
            self.parse_expr_stmt()
        }
    }

    fn parse_function(&mut self) -> Option<StmtId> {
        let fn_token = self.advance();
        let name_tok = self.expect_identifier("a function name")?;
        let name = match name_tok.kind {
            TokenKind::Identifier(sym) => sym,
            _ => unreachable!(),
        };
        self.expect(TokenKind::LeftRound, "`(`")?;
        let args = self.parse_params()?;
        self.expect(TokenKind::RightRound, "`)`")?;
        let return_type = if self.consume(TokenKind::RightArrow).is_some() {
            self.parse_type()?.0
        } else {
            hksl_util::types::VOID
        };
        let block = self.parse_block()?;
        let span = fn_token.span.merge(self.ast.stmt(block).span);
        Some(self.ast.push_stmt(
            StmtKind::Function { name, name_span: name_tok.span, args, block, return_type },
            span,
        ))
    }

    /// `param := IDENT ":" type`, comma-separated, no trailing comma.
    /// Parameters require an explicit type — unlike `let`, there's nothing
    /// to infer from.
    fn parse_params(&mut self) -> Option<Vec<ExprId>> {
        let mut params = Vec::new();
        if self.at(TokenKind::RightRound) {
            return Some(params);
        }
        loop {
            params.push(self.parse_typed_param()?);
            if self.consume(TokenKind::Comma).is_none() {
                break;
            }
            if self.at(TokenKind::RightRound) {
                let span = self.current().span;
                self.fatal(
                    DiagnosticCode::E_PARSE_UNEXPECTED_TOKEN,
                    "trailing comma is not allowed in a parameter list",
                    span,
                );
                return None;
            }
        }
        Some(params)
    }

    fn parse_typed_param(&mut self) -> Option<ExprId> {
        let var_decl = self.parse_var_decl()?;
        let node = self.ast.expr(var_decl);
        let crate::ast::ExprKind::VarDecl { ty, name_span, .. } = &node.kind else {
            unreachable!("parse_var_decl always produces a VarDecl")
        };
        if ty.is_none() {
            let span = *name_span;
            self.fatal(
                DiagnosticCode::E_PARSE_EXPECTED_TOKEN,
                "function parameters require an explicit type",
                span,
            );
            return None;
        }
        Some(var_decl)
    }

    fn parse_block(&mut self) -> Option<StmtId> {
        let open = self.expect(TokenKind::LeftCurly, "`{`")?;
        let mut statements = Vec::new();
        while !self.at(TokenKind::RightCurly) && !self.at(TokenKind::Eof) {
            statements.push(self.parse_statement()?);
        }
        let close = self.expect(TokenKind::RightCurly, "`}`")?;
        let span = open.span.merge(close.span);
        Some(self.ast.push_stmt(StmtKind::BlockStatement { statements }, span))
    }

    fn parse_return_stmt(&mut self) -> Option<StmtId> {
        let ret_token = self.advance();
        let value = if self.at(TokenKind::Semicolon) {
            None
        } else {
            Some(self.parse_expr()?)
        };
        let semi = self.expect(TokenKind::Semicolon, "`;`")?;
        let span = ret_token.span.merge(semi.span);
        Some(self.ast.push_stmt(StmtKind::ReturnStatement { value, ret_token: ret_token.span }, span))
    }

    fn parse_if_stmt(&mut self) -> Option<StmtId> {
        let if_token = self.advance();
        let condition = self.parse_expr()?;
        let then_block = self.parse_block()?;
        let mut span = if_token.span.merge(self.ast.stmt(then_block).span);
        let else_stmt = if self.at(TokenKind::KeywordElse) {
            let else_id = self.parse_else_stmt()?;
            span = span.merge(self.ast.stmt(else_id).span);
            Some(else_id)
        } else {
            None
        };
        Some(self.ast.push_stmt(StmtKind::IfStatement { condition, then_block, else_stmt }, span))
    }

    /// `else_stmt := "else" (if_stmt | block)` — an `else if` is an
    /// `ElseStatement` wrapping a nested `IfStatement`, not its own node.
    fn parse_else_stmt(&mut self) -> Option<StmtId> {
        let else_token = self.advance();
        let inner = if self.at(TokenKind::KeywordIf) {
            self.parse_if_stmt()?
        } else {
            self.parse_block()?
        };
        let span = else_token.span.merge(self.ast.stmt(inner).span);
        Some(self.ast.push_stmt(StmtKind::ElseStatement { statement: inner }, span))
    }

    fn parse_expr_stmt(&mut self) -> Option<StmtId> {
        let expr = self.parse_expr()?;
        let semi = self.expect(TokenKind::Semicolon, "`;`")?;
        let span = self.ast.expr(expr).span.merge(semi.span);
        Some(self.ast.push_stmt(StmtKind::ExprStatement { expr }, span))
    }
}
