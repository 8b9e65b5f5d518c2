//! Statement nodes.

use crate::{Name, Span};

use super::{BinaryOp, CaseRange, ExprId, ExprRange, StmtId, StmtRange};

#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct Stmt {
    pub kind: StmtKind,
    pub span: Span,
}

impl Stmt {
    #[inline]
    pub const fn new(kind: StmtKind, span: Span) -> Self {
        Stmt { kind, span }
    }
}

#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum StmtKind {
    /// Every assignment form, and the lone expression statement
    /// (`lhs` empty, `op` is [`AssignOp::Lone`]).
    Assign {
        lhs: ExprRange,
        op: AssignOp,
        rhs: ExprRange,
    },
    /// `var name type` inside a function body.
    Var { name: Name, ty: ExprId },
    Return(ExprRange),
    Break(Option<Name>),
    Continue(Option<Name>),
    /// `for [cond] { body }`
    While {
        cond: Option<ExprId>,
        body: StmtRange,
    },
    /// `for [init]; [cond]; [post] { body }`
    For {
        init: Option<StmtId>,
        cond: Option<ExprId>,
        post: Option<StmtId>,
        body: StmtRange,
    },
    /// `for [key [, value] :=] range coll { body }`
    Range {
        key: Option<Name>,
        value: Option<Name>,
        coll: ExprId,
        body: StmtRange,
    },
    If {
        cond: ExprId,
        then_branch: StmtRange,
        else_branch: Option<StmtRange>,
    },
    Switch {
        subject: Option<ExprId>,
        cases: CaseRange,
        default: Option<StmtRange>,
    },
    Block(StmtRange),
}

#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum AssignOp {
    /// `=`
    Set,
    /// `:=`
    Define,
    /// `+=`, `-=`, `*=`
    Compound(BinaryOp),
    /// `++`
    Inc,
    /// `--`
    Dec,
    /// No operator: an expression evaluated for its side effects.
    Lone,
}

impl AssignOp {
    pub fn as_str(self) -> &'static str {
        match self {
            AssignOp::Set => "=",
            AssignOp::Define => ":=",
            AssignOp::Compound(BinaryOp::Add) => "+=",
            AssignOp::Compound(BinaryOp::Sub) => "-=",
            AssignOp::Compound(BinaryOp::Mul) => "*=",
            AssignOp::Compound(_) => "?=",
            AssignOp::Inc => "++",
            AssignOp::Dec => "--",
            AssignOp::Lone => "",
        }
    }
}

/// `case a, b: body`
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct SwitchCase {
    pub matches: ExprRange,
    pub body: StmtRange,
    pub span: Span,
}
