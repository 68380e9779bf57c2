//! Lexing a fixed token's own spelling yields exactly that token back.

use hksl_lex::{Lexer, TokenKind};
use hksl_util::diagnostic::Handler;
use quickcheck::TestResult;
use quickcheck_macros::quickcheck;

const FIXED_KINDS: &[TokenKind] = &[
    TokenKind::Plus,
    TokenKind::Minus,
    TokenKind::Star,
    TokenKind::Slash,
    TokenKind::Comma,
    TokenKind::Dot,
    TokenKind::Colon,
    TokenKind::Semicolon,
    TokenKind::Equals,
    TokenKind::LeftSquare,
    TokenKind::RightSquare,
    TokenKind::LeftCurly,
    TokenKind::RightCurly,
    TokenKind::LeftRound,
    TokenKind::RightRound,
    TokenKind::DoubleEquals,
    TokenKind::PlusEqual,
    TokenKind::MinusEqual,
    TokenKind::StarEqual,
    TokenKind::SlashEqual,
    TokenKind::RightArrow,
    TokenKind::KeywordIf,
    TokenKind::KeywordElse,
    TokenKind::KeywordFn,
    TokenKind::KeywordLet,
    TokenKind::KeywordReturn,
];

#[test]
fn every_fixed_token_kind_round_trips_through_its_own_spelling() {
    for kind in FIXED_KINDS {
        let text = kind.fixed_text().expect("fixed kinds always have text");
        let handler = Handler::new();
        let tokens = Lexer::collect_tokens(text, &handler);
        assert!(!handler.has_errors(), "{text:?} failed to lex");
        assert_eq!(tokens.len(), 2, "{text:?} should yield one token plus Eof");
        assert_eq!(&tokens[0].kind, kind, "{text:?} round-tripped to a different kind");
    }
}

#[quickcheck]
fn well_formed_identifiers_always_lex_to_a_single_identifier_token(name: String) -> TestResult {
    let mut chars = name.chars();
    let starts_ok = matches!(chars.next(), Some(c) if c.is_ascii_alphabetic() || c == '_');
    if !starts_ok || !chars.all(|c| c.is_ascii_alphanumeric() || c == '_') {
        return TestResult::discard();
    }
    if hksl_lex::keyword_for(&name).is_some() {
        return TestResult::discard();
    }

    let handler = Handler::new();
    let tokens = Lexer::collect_tokens(&name, &handler);
    let ok = !handler.has_errors()
        && tokens.len() == 2
        && matches!(&tokens[0].kind, TokenKind::Identifier(sym) if sym.eq_str(&name));
    TestResult::from_bool(ok)
}
