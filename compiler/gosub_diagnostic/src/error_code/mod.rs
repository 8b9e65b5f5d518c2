//! Stable error codes.
//!
//! A code is `E` followed by four digits; the first digit is the [`Phase`]
//! that reports it. Codes never change meaning once assigned, so tests and
//! tooling can match on them.

use std::fmt;

/// The part of the compiler that reports a code.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum Phase {
    /// `E0xxx`
    Lex,
    /// `E1xxx`
    Parse,
    /// `E2xxx`: declarations, types and statement structure.
    Check,
    /// `E3xxx`
    Load,
}

macro_rules! error_codes {
    ($($phase:ident { $($code:ident => $text:literal,)* })*) => {
        #[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
        pub enum ErrorCode {
            $($(#[doc = $text] $code,)*)*
        }

        impl ErrorCode {
            /// Every code, in numeric order.
            pub const ALL: &'static [ErrorCode] = &[$($(ErrorCode::$code,)*)*];

            pub fn as_str(self) -> &'static str {
                match self {
                    $($(ErrorCode::$code => stringify!($code),)*)*
                }
            }

            /// One-line meaning, used as the headline when nothing more
            /// specific is known.
            pub fn description(self) -> &'static str {
                match self {
                    $($(ErrorCode::$code => $text,)*)*
                }
            }

            pub fn phase(self) -> Phase {
                match self {
                    $($(ErrorCode::$code => Phase::$phase,)*)*
                }
            }
        }
    };
}

error_codes! {
    Lex {
        E0001 => "invalid character in source",
        E0002 => "invalid integer literal",
        E0003 => "invalid char literal",
        E0004 => "invalid escape sequence",
    }
    Parse {
        E1001 => "unexpected token",
        E1002 => "expected expression",
        E1003 => "unclosed delimiter",
        E1004 => "expected identifier",
        E1005 => "expected type",
        E1006 => "expected end of line",
    }
    Check {
        E2001 => "type mismatch",
        E2002 => "expression is not a type",
        E2003 => "unknown identifier",
        E2004 => "wrong number of call arguments",
        E2005 => "wrong number of results",
        E2006 => "name defined more than once",
        E2007 => "unknown member",
        E2008 => "type cannot be resolved",
        E2009 => "value is not callable",
        E2010 => "invalid method receiver",
        E2011 => "invalid statement",
        E2012 => "constants cannot declare a type",
        E2013 => "invalid assignment target",
        E2014 => "expected a value",
        E2015 => "type cannot be stored in a variable",
    }
    Load {
        E3001 => "module not found",
        E3002 => "module could not be read",
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests;
