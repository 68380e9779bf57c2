//! Expression parsing.
//!
//! Precedence, loosest to tightest:
//!
//! ```text
//! expr       := let_expr
//! let_expr   := "let" var_decl ("=" expr)? | assignment
//! assignment := equality ("=" assignment)?        (right-associative)
//! equality   := term ("==" term)?                 (non-associative)
//! term       := factor (("+" | "-") factor)*       (left-associative)
//! factor     := unary (("*" | "/") unary)*         (left-associative)
//! unary      := "-" unary | primary
//! primary    := NUMBER | "(" expr ")" | place
//! place      := IDENT ("(" arg_list? ")")?
//! arg_list   := expr ("," expr)*
//! ```
//!
//! `let` is only legal where a statement expects an expression statement
//! (see [`crate::stmt`]), but it is parsed here rather than as its own
//! statement kind because the grammar writes it as the loosest-binding
//! expression form, one level above assignment. A `let`'s right-hand side
//! and each call argument are parsed via the full `expr` nonterminal
//! (matching spec.md's grammar and `Parser.cpp`'s `call_expr`), not
//! `assignment` — so either position can itself hold a nested `let`.

use crate::ast::{BinOp, ExprId, ExprKind, UnaryOp};
use crate::Parser;
use hksl_lex::TokenKind;
use hksl_util::diagnostic::DiagnosticCode;
use hksl_util::{Span, Symbol, TypeId};

impl<'a> Parser<'a> {
    pub(crate) fn parse_expr(&mut self) -> Option<ExprId> {
        if self.at(TokenKind::KeywordLet) {
            self.parse_let_expr()
        } else {
            self.parse_assignment()
        }
    }

    fn parse_let_expr(&mut self) -> Option<ExprId> {
        let let_token = self.advance();
        let var_decl = self.parse_var_decl()?;
        let rhs = if self.consume(TokenKind::Equals).is_some() {
            Some(self.parse_expr()?)
        } else {
            None
        };
        let decl_span = self.ast.expr(var_decl).span;
        let span = rhs.map_or(decl_span, |r| decl_span.merge(self.ast.expr(r).span));
        let span = let_token.span.merge(span);
        Some(self.ast.push_expr(ExprKind::LetExpr { var_decl, rhs }, span))
    }

    /// A bare `IDENT (":" type)?` binding, as used by `let` and by function
    /// parameters. Produces a `VarDecl` expression node.
    pub(crate) fn parse_var_decl(&mut self) -> Option<ExprId> {
        let name_tok = self.expect_identifier("a name")?;
        let name = identifier_symbol(&name_tok.kind);
        let mut span = name_tok.span;
        let ty = if self.consume(TokenKind::Colon).is_some() {
            let (ty, ty_span) = self.parse_type()?;
            span = span.merge(ty_span);
            Some(ty)
        } else {
            None
        };
        Some(self.ast.push_expr(
            ExprKind::VarDecl { name, name_span: name_tok.span, ty },
            span,
        ))
    }

    /// `type := IDENT`, resolved to a primitive [`TypeId`] immediately.
    pub(crate) fn parse_type(&mut self) -> Option<(TypeId, Span)> {
        let tok = self.expect_identifier("a type name")?;
        let name = identifier_symbol(&tok.kind);
        match self.types.lookup(name.as_str()) {
            Some(ty) => Some((ty, tok.span)),
            None => {
                self.fatal(
                    DiagnosticCode::E_PARSE_UNKNOWN_TYPE,
                    format!("unknown type `{}`", name.as_str()),
                    tok.span,
                );
                None
            }
        }
    }

    fn parse_assignment(&mut self) -> Option<ExprId> {
        let lhs = self.parse_equality()?;
        if let Some(eq) = self.consume(TokenKind::Equals) {
            if !self.ast.expr(lhs).kind.is_place() {
                self.fatal(
                    DiagnosticCode::E_PARSE_NOT_A_PLACE,
                    "left-hand side of `=` must be a variable or call, not an expression",
                    self.ast.expr(lhs).span,
                );
                return None;
            }
            let rhs = self.parse_assignment()?;
            let span = self.ast.expr(lhs).span.merge(self.ast.expr(rhs).span);
            Some(self.ast.push_expr(ExprKind::AssignmentExpr { lhs, rhs, eq_token: eq.span }, span))
        } else {
            Some(lhs)
        }
    }

    fn parse_equality(&mut self) -> Option<ExprId> {
        let left = self.parse_term()?;
        if let Some(op_tok) = self.consume(TokenKind::DoubleEquals) {
            let right = self.parse_term()?;
            let span = self.ast.expr(left).span.merge(self.ast.expr(right).span);
            Some(self.ast.push_expr(
                ExprKind::BinExpr { op: BinOp::Equals, left, right, op_token: op_tok.span },
                span,
            ))
        } else {
            Some(left)
        }
    }

    fn parse_term(&mut self) -> Option<ExprId> {
        let mut left = self.parse_factor()?;
        loop {
            let op = if self.at(TokenKind::Plus) {
                BinOp::Add
            } else if self.at(TokenKind::Minus) {
                BinOp::Subtract
            } else {
                return Some(left);
            };
            let op_tok = self.advance();
            let right = self.parse_factor()?;
            let span = self.ast.expr(left).span.merge(self.ast.expr(right).span);
            left = self.ast.push_expr(ExprKind::BinExpr { op, left, right, op_token: op_tok.span }, span);
        }
    }

    fn parse_factor(&mut self) -> Option<ExprId> {
        let mut left = self.parse_unary()?;
        loop {
            let op = if self.at(TokenKind::Star) {
                BinOp::Multiply
            } else if self.at(TokenKind::Slash) {
                BinOp::Divide
            } else {
                return Some(left);
            };
            let op_tok = self.advance();
            let right = self.parse_unary()?;
            let span = self.ast.expr(left).span.merge(self.ast.expr(right).span);
            left = self.ast.push_expr(ExprKind::BinExpr { op, left, right, op_token: op_tok.span }, span);
        }
    }

    fn parse_unary(&mut self) -> Option<ExprId> {
        if self.at(TokenKind::Minus) {
            let op_tok = self.advance();
            let expr = self.parse_unary()?;
            let span = op_tok.span.merge(self.ast.expr(expr).span);
            Some(self.ast.push_expr(
                ExprKind::UnaryExpr { op: UnaryOp::Negate, expr, op_token: op_tok.span },
                span,
            ))
        } else {
            self.parse_primary()
        }
    }

    fn parse_primary(&mut self) -> Option<ExprId> {
        if let TokenKind::Number(value) = self.current().kind {
            let tok = self.advance();
            return Some(self.ast.push_expr(ExprKind::NumberConstant { value }, tok.span));
        }
        if self.consume(TokenKind::LeftRound).is_some() {
            let inner = self.parse_expr()?;
            self.expect(TokenKind::RightRound, "`)`")?;
            return Some(inner);
        }
        if matches!(self.current().kind, TokenKind::Identifier(_)) {
            return self.parse_place();
        }
        let span = self.current().span;
        self.fatal(
            DiagnosticCode::E_PARSE_UNEXPECTED_TOKEN,
            format!("expected an expression, found {:?}", self.current().kind),
            span,
        );
        None
    }

    /// `IDENT ("(" arg_list? ")")?` — a bare name or a call.
    fn parse_place(&mut self) -> Option<ExprId> {
        let name_tok = self.advance();
        let name = identifier_symbol(&name_tok.kind);
        if self.consume(TokenKind::LeftRound).is_some() {
            let args = self.parse_arg_list()?;
            let close = self.expect(TokenKind::RightRound, "`)`")?;
            let span = name_tok.span.merge(close.span);
            return Some(self.ast.push_expr(
                ExprKind::CallExpr { fn_name: name, name_span: name_tok.span, args },
                span,
            ));
        }
        Some(self.ast.push_expr(ExprKind::Variable { name }, name_tok.span))
    }

    /// `arg_list := expr ("," expr)*` with no trailing comma.
    fn parse_arg_list(&mut self) -> Option<Vec<ExprId>> {
        let mut args = Vec::new();
        if self.at(TokenKind::RightRound) {
            return Some(args);
        }
        loop {
            args.push(self.parse_expr()?);
            if self.consume(TokenKind::Comma).is_none() {
                break;
            }
            if self.at(TokenKind::RightRound) {
                let span = self.current().span;
                self.fatal(
                    DiagnosticCode::E_PARSE_UNEXPECTED_TOKEN,
                    "trailing comma is not allowed in an argument list",
                    span,
                );
                return None;
            }
        }
        Some(args)
    }

    /// Consumes the current token if it's an identifier, reporting `what`
    /// as the expectation otherwise. `Identifier`'s payload makes it
    /// awkward to match with plain `expect`, which compares by discriminant
    /// against a caller-supplied sentinel value.
    pub(crate) fn expect_identifier(&mut self, what: &str) -> Option<hksl_lex::Token> {
        if matches!(self.current().kind, TokenKind::Identifier(_)) {
            Some(self.advance())
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
}

fn identifier_symbol(kind: &TokenKind) -> Symbol {
    match kind {
        TokenKind::Identifier(sym) => *sym,
        _ => unreachable!("caller already matched on TokenKind::Identifier"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::StmtKind;
    use hksl_lex::Lexer;
    use hksl_util::diagnostic::Handler;

    fn parse_expr_in_statement(source: &str) -> (crate::Ast, bool) {
        let wrapped = format!("fn main() {{ {source}; }}");
        let handler = Handler::new();
        let tokens = Lexer::collect_tokens(&wrapped, &handler);
        let parser = crate::Parser::new(tokens, &handler);
        let ast = parser.parse();
        (ast.unwrap_or_default(), handler.has_errors())
    }

    fn first_expr(ast: &crate::Ast) -> ExprId {
        let StmtKind::Function { block, .. } = &ast.stmt(ast.top_level[0]).kind else {
            panic!("expected a function")
        };
        let StmtKind::BlockStatement { statements } = &ast.stmt(*block).kind else {
            panic!("expected a block")
        };
        let StmtKind::ExprStatement { expr } = &ast.stmt(statements[0]).kind else {
            panic!("expected an expression statement")
        };
        *expr
    }

    #[test]
    fn multiplication_binds_tighter_than_addition() {
        let (ast, errs) = parse_expr_in_statement("1.0 + 2.0 * 3.0");
        assert!(!errs);
        let ExprKind::BinExpr { op: BinOp::Add, right, .. } = &ast.expr(first_expr(&ast)).kind
        else {
            panic!("expected a top-level Add")
        };
        assert!(matches!(ast.expr(*right).kind, ExprKind::BinExpr { op: BinOp::Multiply, .. }));
    }

    #[test]
    fn subtraction_is_left_associative() {
        let (ast, errs) = parse_expr_in_statement("1.0 - 2.0 - 3.0");
        assert!(!errs);
        let ExprKind::BinExpr { op: BinOp::Subtract, left, .. } = &ast.expr(first_expr(&ast)).kind
        else {
            panic!("expected a top-level Subtract")
        };
        assert!(matches!(ast.expr(*left).kind, ExprKind::BinExpr { op: BinOp::Subtract, .. }));
    }

    #[test]
    fn parens_override_precedence() {
        let (ast, errs) = parse_expr_in_statement("(1.0 + 2.0) * 3.0");
        assert!(!errs);
        let ExprKind::BinExpr { op: BinOp::Multiply, left, .. } = &ast.expr(first_expr(&ast)).kind
        else {
            panic!("expected a top-level Multiply")
        };
        assert!(matches!(ast.expr(*left).kind, ExprKind::BinExpr { op: BinOp::Add, .. }));
    }

    #[test]
    fn unary_minus_chains() {
        let (ast, errs) = parse_expr_in_statement("--1.0");
        assert!(!errs);
        let ExprKind::UnaryExpr { op: UnaryOp::Negate, expr, .. } = &ast.expr(first_expr(&ast)).kind
        else {
            panic!("expected an outer UnaryExpr")
        };
        assert!(matches!(ast.expr(*expr).kind, ExprKind::UnaryExpr { .. }));
    }

    #[test]
    fn call_with_no_args() {
        let (ast, errs) = parse_expr_in_statement("noise()");
        assert!(!errs);
        let ExprKind::CallExpr { args, .. } = &ast.expr(first_expr(&ast)).kind else {
            panic!("expected a CallExpr")
        };
        assert!(args.is_empty());
    }

    #[test]
    fn call_with_args() {
        let (ast, errs) = parse_expr_in_statement("lerp(a, b, 0.5)");
        assert!(!errs);
        let ExprKind::CallExpr { args, .. } = &ast.expr(first_expr(&ast)).kind else {
            panic!("expected a CallExpr")
        };
        assert_eq!(args.len(), 3);
    }

    #[test]
    fn equality_is_not_chainable() {
        // a == b == c is a type error later, but the parser itself stops
        // after one `==` — the leftover `== c` reads as a second statement
        // head, which is a parse error since it isn't a valid expression
        // start.
        let (_, errs) = parse_expr_in_statement("a == b == c");
        assert!(errs);
    }
}
