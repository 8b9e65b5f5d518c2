//! Raw logos token, before literal decoding and interning.

use gosub_ir::TokenKind;
use logos::Logos;

#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
#[logos(skip r"[ \t\r]+")]
pub(crate) enum RawToken {
    #[regex(r"//[^\n]*")]
    LineComment,

    #[token("\n")]
    Newline,

    #[regex(r"[0-9][0-9_]*")]
    Int,
    #[regex(r#""([^"\\\n]|\\.)*""#)]
    Str,
    #[regex(r"'([^'\\\n]|\\.)*'")]
    Char,
    #[regex(r"[a-zA-Z_][a-zA-Z0-9_]*")]
    Ident,

    /// Keywords outrank `Ident` on equal-length matches.
    #[token("package", |_| TokenKind::Package)]
    #[token("import", |_| TokenKind::Import)]
    #[token("const", |_| TokenKind::Const)]
    #[token("var", |_| TokenKind::Var)]
    #[token("type", |_| TokenKind::Type)]
    #[token("func", |_| TokenKind::Func)]
    #[token("struct", |_| TokenKind::Struct)]
    #[token("interface", |_| TokenKind::Interface)]
    #[token("map", |_| TokenKind::Map)]
    #[token("if", |_| TokenKind::If)]
    #[token("else", |_| TokenKind::Else)]
    #[token("for", |_| TokenKind::For)]
    #[token("range", |_| TokenKind::Range)]
    #[token("switch", |_| TokenKind::Switch)]
    #[token("case", |_| TokenKind::Case)]
    #[token("default", |_| TokenKind::Default)]
    #[token("return", |_| TokenKind::Return)]
    #[token("break", |_| TokenKind::Break)]
    #[token("continue", |_| TokenKind::Continue)]
    Keyword(TokenKind),

    #[token("(", |_| TokenKind::LParen)]
    #[token(")", |_| TokenKind::RParen)]
    #[token("{", |_| TokenKind::LBrace)]
    #[token("}", |_| TokenKind::RBrace)]
    #[token("[", |_| TokenKind::LBracket)]
    #[token("]", |_| TokenKind::RBracket)]
    #[token(",", |_| TokenKind::Comma)]
    #[token(":", |_| TokenKind::Colon)]
    #[token(";", |_| TokenKind::Semicolon)]
    #[token(".", |_| TokenKind::Dot)]
    #[token("...", |_| TokenKind::Ellipsis)]
    #[token("=", |_| TokenKind::Eq)]
    #[token(":=", |_| TokenKind::ColonEq)]
    #[token("+=", |_| TokenKind::PlusEq)]
    #[token("-=", |_| TokenKind::MinusEq)]
    #[token("*=", |_| TokenKind::StarEq)]
    #[token("++", |_| TokenKind::PlusPlus)]
    #[token("--", |_| TokenKind::MinusMinus)]
    #[token("+", |_| TokenKind::Plus)]
    #[token("-", |_| TokenKind::Minus)]
    #[token("*", |_| TokenKind::Star)]
    #[token("/", |_| TokenKind::Slash)]
    #[token("%", |_| TokenKind::Percent)]
    #[token("&", |_| TokenKind::Amp)]
    #[token("|", |_| TokenKind::Pipe)]
    #[token("^", |_| TokenKind::Caret)]
    #[token("&^", |_| TokenKind::AmpCaret)]
    #[token("<<", |_| TokenKind::Shl)]
    #[token(">>", |_| TokenKind::Shr)]
    #[token("==", |_| TokenKind::EqEq)]
    #[token("!=", |_| TokenKind::NotEq)]
    #[token("<", |_| TokenKind::Lt)]
    #[token(">", |_| TokenKind::Gt)]
    #[token("<=", |_| TokenKind::LtEq)]
    #[token(">=", |_| TokenKind::GtEq)]
    #[token("&&", |_| TokenKind::AmpAmp)]
    #[token("||", |_| TokenKind::PipePipe)]
    #[token("!", |_| TokenKind::Bang)]
    Punct(TokenKind),
}
