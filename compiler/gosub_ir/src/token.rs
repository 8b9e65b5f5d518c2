//! Tokens produced by the lexer.

use super::{Name, Span};

/// Why the lexer rejected a piece of input.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum LexError {
    /// A byte that starts no token.
    InvalidCharacter,
    /// A decimal literal starting with `0` and followed by more digits.
    OctalLiteral,
    /// A decimal literal that does not fit in `i64`.
    IntegerOverflow,
    /// A char literal that does not hold exactly one character.
    BadCharLiteral,
    /// A string with an unknown or truncated escape sequence.
    BadEscape,
}

impl LexError {
    pub fn message(self) -> &'static str {
        match self {
            LexError::InvalidCharacter => "invalid character",
            LexError::OctalLiteral => "octal literals are not supported",
            LexError::IntegerOverflow => "integer literal is too large",
            LexError::BadCharLiteral => "char literal must hold exactly one character",
            LexError::BadEscape => "invalid escape sequence in literal",
        }
    }
}

macro_rules! token_kinds {
    ($($group:literal { $($variant:ident => $text:literal,)* })*) => {
        /// What a token is. Literal and identifier kinds carry their value;
        /// every other kind stands for one fixed piece of source text.
        #[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
        pub enum TokenKind {
            Int(i64),
            /// String literal with escapes already decoded.
            Str(Name),
            /// Char literal, as its code point.
            Char(i64),
            Ident(Name),
            $($(#[doc = concat!("`", $text, "` (", $group, ")")] $variant,)*)*
            /// End of line, significant as a statement terminator.
            Newline,
            Error(LexError),
            Eof,
        }

        impl TokenKind {
            /// Source text for fixed tokens, a category name otherwise.
            pub fn display_name(&self) -> &'static str {
                match self {
                    TokenKind::Int(_) => "integer",
                    TokenKind::Str(_) => "string",
                    TokenKind::Char(_) => "char",
                    TokenKind::Ident(_) => "identifier",
                    $($(TokenKind::$variant => $text,)*)*
                    TokenKind::Newline => "end of line",
                    TokenKind::Error(_) => "error",
                    TokenKind::Eof => "end of file",
                }
            }
        }
    };
}

token_kinds! {
    "keyword" {
        Package => "package",
        Import => "import",
        Const => "const",
        Var => "var",
        Type => "type",
        Func => "func",
        Struct => "struct",
        Interface => "interface",
        Map => "map",
        If => "if",
        Else => "else",
        For => "for",
        Range => "range",
        Switch => "switch",
        Case => "case",
        Default => "default",
        Return => "return",
        Break => "break",
        Continue => "continue",
    }
    "punctuation" {
        LParen => "(",
        RParen => ")",
        LBrace => "{",
        RBrace => "}",
        LBracket => "[",
        RBracket => "]",
        Comma => ",",
        Colon => ":",
        Semicolon => ";",
        Dot => ".",
        Ellipsis => "...",
    }
    "assignment" {
        Eq => "=",
        ColonEq => ":=",
        PlusEq => "+=",
        MinusEq => "-=",
        StarEq => "*=",
        PlusPlus => "++",
        MinusMinus => "--",
    }
    "operator" {
        Plus => "+",
        Minus => "-",
        Star => "*",
        Slash => "/",
        Percent => "%",
        Amp => "&",
        Pipe => "|",
        Caret => "^",
        AmpCaret => "&^",
        Shl => "<<",
        Shr => ">>",
        EqEq => "==",
        NotEq => "!=",
        Lt => "<",
        Gt => ">",
        LtEq => "<=",
        GtEq => ">=",
        AmpAmp => "&&",
        PipePipe => "||",
        Bang => "!",
    }
}

impl TokenKind {
    /// Terminates a top-level declaration or a statement.
    #[inline]
    pub fn is_terminator(&self) -> bool {
        matches!(
            self,
            TokenKind::Newline | TokenKind::Semicolon | TokenKind::Eof
        )
    }
}

/// A token with its source span.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
}

impl Token {
    #[inline]
    pub const fn new(kind: TokenKind, span: Span) -> Self {
        Token { kind, span }
    }
}

/// Lexer output for one source file; always ends with [`TokenKind::Eof`].
#[derive(Clone, Default, Debug)]
pub struct TokenList {
    tokens: Vec<Token>,
}

impl TokenList {
    #[inline]
    pub fn new() -> Self {
        TokenList { tokens: Vec::new() }
    }

    #[inline]
    pub fn push(&mut self, token: Token) {
        self.tokens.push(token);
    }

    #[inline]
    pub fn get(&self, index: usize) -> Option<&Token> {
        self.tokens.get(index)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Token> {
        self.tokens.iter()
    }

}

impl std::ops::Index<usize> for TokenList {
    type Output = Token;

    #[inline]
    fn index(&self, index: usize) -> &Self::Output {
        &self.tokens[index]
    }
}
