//! Results of compiling an expression.

use std::fmt;
use std::rc::Rc;

use gosub_types::{FuncRec, TypeValue};

use crate::ModuleId;

/// A C expression fragment and the type of the value it computes.
#[derive(Clone, Debug)]
pub struct CExpr {
    pub c: String,
    pub ty: TypeValue,
}

impl CExpr {
    pub fn new(c: impl Into<String>, ty: TypeValue) -> Self {
        CExpr { c: c.into(), ty }
    }
}

/// A method with its receiver already chosen.
#[derive(Clone, Debug)]
pub struct BoundMethod {
    /// C function to call.
    pub func_c: String,
    /// Receiver fragment, passed as the first argument.
    pub receiver: String,
    pub func: Rc<FuncRec>,
}

impl BoundMethod {
    /// Inputs the caller supplies, the receiver excluded.
    pub fn explicit_inputs(&self) -> usize {
        if self.func.is_method {
            self.func.inputs.len().saturating_sub(1)
        } else {
            self.func.inputs.len()
        }
    }
}

#[derive(Clone, Debug)]
pub enum Value {
    CExpr(CExpr),
    /// A global whose value was not built yet when it was referenced.
    NameRef { module: ModuleId, name: String },
    /// A value denoting a type; its own type is the metatype.
    TypeRef(TypeValue),
    /// A loaded module; only valid on the left of a dot.
    ImportRef(ModuleId),
    SubRef {
        container: Box<Value>,
        index: Box<Value>,
    },
    BoundMethod(BoundMethod),
}

impl Value {
    pub fn cexpr(c: impl Into<String>, ty: TypeValue) -> Self {
        Value::CExpr(CExpr::new(c, ty))
    }

    /// Type of the value, where one is known without further lookups.
    pub fn ty(&self) -> Option<TypeValue> {
        match self {
            Value::CExpr(e) => Some(e.ty.clone()),
            Value::TypeRef(_) => Some(TypeValue::TYPE),
            Value::ImportRef(_) => Some(TypeValue::IMPORT),
            Value::BoundMethod(m) => Some(TypeValue::Function(Rc::clone(&m.func))),
            Value::NameRef { .. } | Value::SubRef { .. } => None,
        }
    }
}

/// Describes the value for "expected a value, found ..." messages.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::CExpr(e) => write!(f, "value of type `{}`", e.ty),
            Value::NameRef { name, .. } => write!(f, "`{name}`"),
            Value::TypeRef(ty) => write!(f, "type `{ty}`"),
            Value::ImportRef(_) => f.write_str("a module"),
            Value::SubRef { .. } => f.write_str("subscript"),
            Value::BoundMethod(m) => write!(f, "method `{}`", m.func_c),
        }
    }
}
