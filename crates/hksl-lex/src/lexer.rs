//! The tokenizer itself.
//!
//! `Lexer` is an `Iterator<Token>` over a [`Cursor`](crate::cursor::Cursor).
//! Iteration stops after yielding `Eof`, or early (yielding nothing further)
//! once a fatal error has been reported to the `Handler`.

use crate::cursor::Cursor;
use crate::{keyword_for, Token, TokenKind};
use hksl_util::diagnostic::{DiagnosticCode, Handler};
use hksl_util::{Span, Symbol};

pub struct Lexer<'a> {
    cursor: Cursor<'a>,
    handler: &'a Handler,
    failed: bool,
}

impl<'a> Lexer<'a> {
    pub fn new(source: &'a str, handler: &'a Handler) -> Self {
        Self {
            cursor: Cursor::new(source),
            handler,
            failed: false,
        }
    }

    /// Tokenize `source` fully, draining the lexer until (and including)
    /// `Eof`, or until a fatal error cuts the stream short.
    pub fn collect_tokens(source: &'a str, handler: &'a Handler) -> Vec<Token> {
        let lexer = Lexer::new(source, handler);
        lexer.collect()
    }

    fn current_span(&self, start_pos: usize, start_line: u32, start_col: u32) -> Span {
        Span::new(start_pos, self.cursor.position(), start_line, start_col)
    }

    fn skip_trivia(&mut self) {
        loop {
            self.cursor.skip_whitespace();
            if self.cursor.current_char() == '/' && self.cursor.peek_char(1) == '/' {
                while !self.cursor.is_at_end() && self.cursor.current_char() != '\n' {
                    self.cursor.advance();
                }
                continue;
            }
            break;
        }
    }

    fn fatal(&mut self, code: DiagnosticCode, message: impl Into<String>, span: Span) {
        self.handler.build_error(span, message).code(code).emit(self.handler);
        self.failed = true;
    }

    fn scan_number(&mut self, start_pos: usize, start_line: u32, start_col: u32) -> Option<Token> {
        while self.cursor.current_char().is_ascii_digit() {
            self.cursor.advance();
        }
        if self.cursor.current_char() == '.' && self.cursor.peek_char(1).is_ascii_digit() {
            self.cursor.advance();
            while self.cursor.current_char().is_ascii_digit() {
                self.cursor.advance();
            }
        } else if self.cursor.current_char() == '.' {
            // `3.` is valid (trailing dot, no fractional digits); a bare
            // `.` with no digits on either side never reaches this branch.
            self.cursor.advance();
        }
        let text = self.cursor.slice_from(start_pos);
        let span = self.current_span(start_pos, start_line, start_col);
        match text.parse::<f64>() {
            Ok(value) => Some(Token::new(TokenKind::Number(value), span)),
            Err(_) => {
                self.fatal(
                    DiagnosticCode::E_LEX_UNTERMINATED,
                    format!("invalid numeric literal `{text}`"),
                    span,
                );
                None
            }
        }
    }

    fn scan_identifier(&mut self, start_pos: usize, start_line: u32, start_col: u32) -> Token {
        while is_ident_continue(self.cursor.current_char()) {
            self.cursor.advance();
        }
        let text = self.cursor.slice_from(start_pos);
        let span = self.current_span(start_pos, start_line, start_col);
        let kind = keyword_for(text).unwrap_or_else(|| TokenKind::Identifier(Symbol::intern(text)));
        Token::new(kind, span)
    }

    fn scan_token(&mut self) -> Option<Token> {
        let start_pos = self.cursor.position();
        let start_line = self.cursor.line();
        let start_col = self.cursor.column();

        let c = self.cursor.current_char();

        if c.is_ascii_digit() {
            return self.scan_number(start_pos, start_line, start_col);
        }
        if is_ident_start(c) {
            return Some(self.scan_identifier(start_pos, start_line, start_col));
        }

        self.cursor.advance();
        let two_char = |this: &mut Self, second: char, kind: TokenKind| -> Option<TokenKind> {
            if this.cursor.match_char(second) {
                Some(kind)
            } else {
                None
            }
        };

        let kind = match c {
            '+' => two_char(self, '=', TokenKind::PlusEqual).unwrap_or(TokenKind::Plus),
            '-' => {
                if let Some(k) = two_char(self, '=', TokenKind::MinusEqual) {
                    k
                } else if self.cursor.match_char('>') {
                    TokenKind::RightArrow
                } else {
                    TokenKind::Minus
                }
            }
            '*' => two_char(self, '=', TokenKind::StarEqual).unwrap_or(TokenKind::Star),
            '/' => two_char(self, '=', TokenKind::SlashEqual).unwrap_or(TokenKind::Slash),
            ',' => TokenKind::Comma,
            '.' => TokenKind::Dot,
            ':' => TokenKind::Colon,
            ';' => TokenKind::Semicolon,
            '=' => two_char(self, '=', TokenKind::DoubleEquals).unwrap_or(TokenKind::Equals),
            '[' => TokenKind::LeftSquare,
            ']' => TokenKind::RightSquare,
            '{' => TokenKind::LeftCurly,
            '}' => TokenKind::RightCurly,
            '(' => TokenKind::LeftRound,
            ')' => TokenKind::RightRound,
            '\0' => {
                let span = self.current_span(start_pos, start_line, start_col);
                self.fatal(
                    DiagnosticCode::E_LEX_UNTERMINATED,
                    "unexpected end of input while reading a token",
                    span,
                );
                return None;
            }
            other => {
                let span = self.current_span(start_pos, start_line, start_col);
                self.fatal(
                    DiagnosticCode::E_LEX_UNEXPECTED_CHAR,
                    format!("unexpected character `{other}`"),
                    span,
                );
                return None;
            }
        };

        let span = self.current_span(start_pos, start_line, start_col);
        Some(Token::new(kind, span))
    }
}

impl<'a> Iterator for Lexer<'a> {
    type Item = Token;

    fn next(&mut self) -> Option<Token> {
        if self.failed {
            return None;
        }
        self.skip_trivia();
        if self.cursor.is_at_end() {
            let span = Span::point(self.cursor.line(), self.cursor.column());
            self.failed = true; // next() should not be called again after Eof
            return Some(Token::new(TokenKind::Eof, span));
        }
        self.scan_token()
    }
}

fn is_ident_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_'
}

fn is_ident_continue(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

#[cfg(test)]
mod tests {
    use super::*;
    use hksl_util::diagnostic::Handler;

    fn lex(source: &str) -> (Vec<Token>, bool) {
        let handler = Handler::new();
        let tokens = Lexer::collect_tokens(source, &handler);
        (tokens, handler.has_errors())
    }

    #[test]
    fn empty_source_is_just_eof() {
        let (tokens, errored) = lex("");
        assert!(!errored);
        assert_eq!(tokens.len(), 1);
        assert!(tokens[0].is_eof());
    }

    #[test]
    fn skips_whitespace_and_line_comments() {
        let (tokens, errored) = lex("  \n // a comment\n  fn");
        assert!(!errored);
        assert_eq!(tokens[0].kind, TokenKind::KeywordFn);
    }

    #[test]
    fn two_char_operators_win_over_one_char_prefixes() {
        let (tokens, errored) = lex("+= -= *= /= == ->");
        assert!(!errored);
        let kinds: Vec<_> = tokens.iter().map(|t| t.kind).collect();
        assert_eq!(
            kinds,
            vec![
                TokenKind::PlusEqual,
                TokenKind::MinusEqual,
                TokenKind::StarEqual,
                TokenKind::SlashEqual,
                TokenKind::DoubleEquals,
                TokenKind::RightArrow,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn single_char_punctuation() {
        let (tokens, errored) = lex("+-*/,.;:=[]{}()");
        assert!(!errored);
        assert_eq!(tokens.len(), 16 + 1);
    }

    #[test]
    fn number_with_trailing_dot_and_no_fraction() {
        let (tokens, errored) = lex("3.");
        assert!(!errored);
        assert_eq!(tokens[0].kind, TokenKind::Number(3.0));
    }

    #[test]
    fn number_with_fraction() {
        let (tokens, errored) = lex("3.5");
        assert!(!errored);
        assert_eq!(tokens[0].kind, TokenKind::Number(3.5));
    }

    #[test]
    fn bare_dot_is_not_a_number_start() {
        // `.3` has no leading digit, so the dot is lexed as its own token
        // and `3` separately — the grammar rejects this shape, not the lexer.
        let (tokens, errored) = lex(".3");
        assert!(!errored);
        assert_eq!(tokens[0].kind, TokenKind::Dot);
        assert_eq!(tokens[1].kind, TokenKind::Number(3.0));
    }

    #[test]
    fn identifiers_and_keywords() {
        let (tokens, errored) = lex("fn let if else return foo_Bar2");
        assert!(!errored);
        let kinds: Vec<_> = tokens.iter().map(|t| t.kind).collect();
        assert_eq!(kinds[0], TokenKind::KeywordFn);
        assert_eq!(kinds[1], TokenKind::KeywordLet);
        assert_eq!(kinds[2], TokenKind::KeywordIf);
        assert_eq!(kinds[3], TokenKind::KeywordElse);
        assert_eq!(kinds[4], TokenKind::KeywordReturn);
        match kinds[5] {
            TokenKind::Identifier(sym) => assert_eq!(sym.as_str(), "foo_Bar2"),
            other => panic!("expected identifier, got {other:?}"),
        }
    }

    #[test]
    fn unexpected_character_is_fatal() {
        let (tokens, errored) = lex("fn @ main");
        assert!(errored);
        // only the tokens up to (not including) the bad character survive
        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].kind, TokenKind::KeywordFn);
    }

    #[test]
    fn span_tracks_start_line_and_column() {
        let (tokens, _) = lex("fn\nmain");
        assert_eq!(tokens[0].span.line, 1);
        assert_eq!(tokens[0].span.column, 1);
        assert_eq!(tokens[1].span.line, 2);
        assert_eq!(tokens[1].span.column, 1);
    }
}
