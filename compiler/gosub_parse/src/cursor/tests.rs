use super::*;
use gosub_ir::StringInterner;
use pretty_assertions::assert_eq;

#[test]
fn test_advance_stops_at_eof() {
    let interner = StringInterner::new();
    let tokens = gosub_lexer::lex("x", &interner);
    let mut cursor = Cursor::new(&tokens);

    assert!(cursor.check_ident());
    cursor.advance();
    assert!(cursor.is_at_end());
    let eof = cursor.advance();
    assert_eq!(eof.kind, TokenKind::Eof);
    assert!(cursor.is_at_end());
    assert_eq!(cursor.position(), 1);
}

#[test]
fn test_peek_and_eat() {
    let interner = StringInterner::new();
    let tokens = gosub_lexer::lex("a := 1", &interner);
    let mut cursor = Cursor::new(&tokens);

    assert_eq!(cursor.peek_kind_at(1), TokenKind::ColonEq);
    assert_eq!(cursor.peek_kind_at(10), TokenKind::Eof);
    assert!(!cursor.eat(TokenKind::ColonEq));
    cursor.advance();
    assert!(cursor.eat(TokenKind::ColonEq));
    assert_eq!(cursor.current_kind(), TokenKind::Int(1));
    assert_eq!(cursor.previous_span(), Span::new(2, 4));
}

#[test]
fn test_skip_terminators() {
    let interner = StringInterner::new();
    let tokens = gosub_lexer::lex("\n;\n\ny", &interner);
    let mut cursor = Cursor::new(&tokens);

    cursor.skip_newlines();
    assert!(cursor.check(TokenKind::Semicolon));
    cursor.skip_terminators();
    assert!(cursor.check_ident());
}
