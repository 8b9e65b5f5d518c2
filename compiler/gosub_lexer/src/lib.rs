//! Lexer for gosub using logos with string interning.
//!
//! Newlines are significant: each one becomes a [`TokenKind::Newline`]
//! token, which the parser uses to terminate declarations and statements.
//! Line comments are dropped.

mod raw_token;

use gosub_ir::{LexError, Span, StringInterner, Token, TokenKind, TokenList};
use logos::Logos;

use raw_token::RawToken;

/// Lex source code into a [`TokenList`] ending with [`TokenKind::Eof`].
///
/// Malformed input becomes [`TokenKind::Error`] tokens; lexing never stops
/// early.
pub fn lex(source: &str, interner: &StringInterner) -> TokenList {
    let mut result = TokenList::new();
    let mut logos = RawToken::lexer(source);

    while let Some(token_result) = logos.next() {
        let span = Span::from_range(logos.span());
        let slice = logos.slice();

        let kind = match token_result {
            Ok(RawToken::LineComment) => continue,
            Ok(raw) => convert_token(raw, slice, interner),
            Err(()) => TokenKind::Error(LexError::InvalidCharacter),
        };
        result.push(Token::new(kind, span));
    }

    let eof = u32::try_from(source.len()).unwrap_or(u32::MAX);
    result.push(Token::new(TokenKind::Eof, Span::point(eof)));
    result
}

fn convert_token(raw: RawToken, slice: &str, interner: &StringInterner) -> TokenKind {
    match raw {
        RawToken::Int => convert_int(slice),
        RawToken::Str => match unescape(&slice[1..slice.len() - 1]) {
            Some(text) => TokenKind::Str(interner.intern(&text)),
            None => TokenKind::Error(LexError::BadEscape),
        },
        RawToken::Char => convert_char(&slice[1..slice.len() - 1]),
        RawToken::Ident => TokenKind::Ident(interner.intern(slice)),
        RawToken::LineComment | RawToken::Newline => TokenKind::Newline,
        RawToken::Keyword(kind) | RawToken::Punct(kind) => kind,
    }
}

/// Decimal integer; a leading zero followed by more digits is rejected.
fn convert_int(slice: &str) -> TokenKind {
    let digits: String = slice.chars().filter(|c| *c != '_').collect();
    if digits.len() > 1 && digits.starts_with('0') {
        return TokenKind::Error(LexError::OctalLiteral);
    }
    match digits.parse::<i64>() {
        Ok(n) => TokenKind::Int(n),
        Err(_) => TokenKind::Error(LexError::IntegerOverflow),
    }
}

fn convert_char(body: &str) -> TokenKind {
    let Some(text) = unescape(body) else {
        return TokenKind::Error(LexError::BadEscape);
    };
    let mut chars = text.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => TokenKind::Char(i64::from(u32::from(c))),
        _ => TokenKind::Error(LexError::BadCharLiteral),
    }
}

/// Decode escapes: `\n`, `\t`, `\r` and three-digit octal `\NNN`; a
/// backslash before any other character yields that character.
fn unescape(body: &str) -> Option<String> {
    let mut out = String::with_capacity(body.len());
    let mut chars = body.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next()? {
            'n' => out.push('\n'),
            't' => out.push('\t'),
            'r' => out.push('\r'),
            d @ '0'..='7' => {
                let mut value = d.to_digit(8)?;
                for _ in 0..2 {
                    let next = chars.next()?.to_digit(8)?;
                    value = value * 8 + next;
                }
                out.push(char::from(u8::try_from(value).ok()?));
            }
            other => out.push(other),
        }
    }
    Some(out)
}
