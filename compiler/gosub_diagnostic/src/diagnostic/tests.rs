use super::*;
use pretty_assertions::assert_eq;

#[test]
fn test_headline_defaults_to_code_description() {
    let diag = Diagnostic::error(ErrorCode::E2009);
    assert_eq!(diag.message, ErrorCode::E2009.description());
    assert_eq!(diag.site(), None);
}

#[test]
fn test_site_is_first_site_label() {
    let diag = Diagnostic::error(ErrorCode::E2010)
        .with_secondary_label(Span::new(0, 4), "struct declared here")
        .with_label(Span::new(20, 26), "receiver")
        .with_label(Span::new(30, 31), "second site");
    assert_eq!(diag.site(), Some(Span::new(20, 26)));
    assert!(!diag.labels[0].is_site());
}

#[test]
fn test_display_lists_every_part() {
    let diag = Diagnostic::error(ErrorCode::E1001)
        .with_message("expected `)`, found `}`")
        .with_label(Span::new(4, 5), "unexpected token")
        .with_secondary_label(Span::new(0, 1), "call starts here")
        .with_note("while parsing call arguments")
        .with_suggestion("close the argument list");

    assert_eq!(
        diag.to_string(),
        "error[E1001]: expected `)`, found `}`\n  at 4..5: unexpected token\n  \
         see 0..1: call starts here\n  note: while parsing call arguments\n  \
         help: close the argument list"
    );
}

#[test]
fn test_type_mismatch() {
    let diag = type_mismatch(Span::new(0, 1), "int", "string", "in argument 1");
    assert_eq!(diag.code, ErrorCode::E2001);
    assert_eq!(diag.message, "cannot use `string` as `int`");
    assert_eq!(diag.labels[0].text, "expected `int` in argument 1");

    let bare = type_mismatch(Span::new(0, 1), "bool", "int", "");
    assert_eq!(bare.labels[0].text, "expected `bool`");
}

#[test]
fn test_unknown_identifier_and_redefinition() {
    let unknown = unknown_identifier(Span::new(2, 5), "foo");
    assert_eq!(unknown.code, ErrorCode::E2003);
    assert_eq!(unknown.message, "undefined: `foo`");

    let redef = redefinition(Span::new(30, 33), "foo", Span::new(4, 7));
    assert_eq!(redef.code, ErrorCode::E2006);
    assert_eq!(redef.site(), Some(Span::new(30, 33)));
    assert_eq!(redef.labels[1].kind, LabelKind::Context);
    assert_eq!(redef.labels[1].span, Span::new(4, 7));
}
