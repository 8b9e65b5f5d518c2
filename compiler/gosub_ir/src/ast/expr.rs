//! Expression nodes.
//!
//! Type expressions (`*T`, `[]T`, `struct{...}`) are ordinary expressions;
//! the code generator decides from context whether a node denotes a value
//! or a type.

use std::fmt;

use crate::{Name, Span};

use super::{ExprId, ExprRange, FieldInitRange, MethodSpecRange, ParamRange};

#[derive(Copy, Clone, Eq, PartialEq, Hash)]
pub struct Expr {
    pub kind: ExprKind,
    pub span: Span,
}

impl Expr {
    #[inline]
    pub const fn new(kind: ExprKind, span: Span) -> Self {
        Expr { kind, span }
    }
}

impl fmt::Debug for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?} @ {:?}", self.kind, self.span)
    }
}

#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum ExprKind {
    /// Integer or char literal.
    Int(i64),
    /// String literal, escapes decoded.
    Str(Name),
    Ident(Name),

    Unary {
        op: UnaryOp,
        operand: ExprId,
    },
    Binary {
        op: BinaryOp,
        left: ExprId,
        right: ExprId,
    },
    /// `func(args)`; `spread` is set when the last argument ends in `...`.
    Call {
        func: ExprId,
        args: ExprRange,
        spread: bool,
    },
    /// `receiver.member`
    Dot {
        receiver: ExprId,
        member: Name,
    },
    /// `receiver[index]`
    Index {
        receiver: ExprId,
        index: ExprId,
    },
    /// `receiver[lo:hi]`; either bound may be left out.
    SliceExpr {
        receiver: ExprId,
        lo: Option<ExprId>,
        hi: Option<ExprId>,
    },
    /// `&T{field: value, ...}`
    Ctor {
        ty: ExprId,
        fields: FieldInitRange,
    },

    /// `*T`
    PointerType(ExprId),
    /// `[]T`
    SliceType(ExprId),
    /// `map[K]V`
    MapType {
        key: ExprId,
        value: ExprId,
    },
    /// `struct { name type ... }`
    StructType(ParamRange),
    /// `interface { Meth(sig) ... }`; empty means the universal interface.
    InterfaceType(MethodSpecRange),
}

#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum UnaryOp {
    Neg,
    Not,
}

impl UnaryOp {
    pub fn as_c_str(self) -> &'static str {
        match self {
            UnaryOp::Neg => "-",
            UnaryOp::Not => "!",
        }
    }
}

#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Rem,
    Shl,
    Shr,
    BitAnd,
    BitOr,
    BitXor,
    /// `&^`, bit clear.
    AndNot,
    Eq,
    NotEq,
    Lt,
    Gt,
    LtEq,
    GtEq,
    And,
    Or,
}

impl BinaryOp {
    /// The C operator spelling. `AndNot` has no single C operator; the
    /// code generator writes it as `a & ~b`.
    pub fn as_c_str(self) -> &'static str {
        match self {
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
            BinaryOp::Rem => "%",
            BinaryOp::Shl => "<<",
            BinaryOp::Shr => ">>",
            BinaryOp::BitAnd | BinaryOp::AndNot => "&",
            BinaryOp::BitOr => "|",
            BinaryOp::BitXor => "^",
            BinaryOp::Eq => "==",
            BinaryOp::NotEq => "!=",
            BinaryOp::Lt => "<",
            BinaryOp::Gt => ">",
            BinaryOp::LtEq => "<=",
            BinaryOp::GtEq => ">=",
            BinaryOp::And => "&&",
            BinaryOp::Or => "||",
        }
    }
}

/// A `name type` pair: function input/output, struct field, or receiver.
///
/// Unnamed outputs carry [`Name::EMPTY`].
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct Param {
    pub name: Name,
    pub ty: ExprId,
    pub span: Span,
}

/// `field: value` inside a constructor.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct FieldInit {
    pub name: Name,
    pub value: ExprId,
    pub span: Span,
}

/// Function signature. For a variadic signature the last input's type
/// expression is already the slice type.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default)]
pub struct FuncSig {
    pub inputs: ParamRange,
    pub outputs: ParamRange,
    pub variadic: bool,
}

/// Method listed in an interface body.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct MethodSpec {
    pub name: Name,
    pub sig: FuncSig,
    pub span: Span,
}
