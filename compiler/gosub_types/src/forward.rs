//! Forward handles for type declarations.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use crate::TypeValue;

/// Maximum number of forward hops followed before a chain counts as cyclic.
pub const RESOLVE_DEPTH: usize = 16;

/// Why a forward handle could not be resolved.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ResolveError {
    #[error("type `{0}` is used before it is defined")]
    Unbound(String),
    #[error("type `{0}` is defined in terms of itself")]
    TooDeep(String),
}

/// A shared, initially empty slot for the type of a declaration.
///
/// Clones share the slot; binding it through any clone is visible to all.
#[derive(Clone)]
pub struct ForwardRef {
    name: Rc<str>,
    target: Rc<RefCell<Option<TypeValue>>>,
}

impl ForwardRef {
    pub fn new(name: &str) -> Self {
        ForwardRef {
            name: Rc::from(name),
            target: Rc::new(RefCell::new(None)),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Binds the handle. Each handle is bound exactly once.
    pub fn bind(&self, ty: TypeValue) {
        let mut slot = self.target.borrow_mut();
        assert!(slot.is_none(), "forward type `{}` bound twice", self.name);
        *slot = Some(ty);
    }

    pub fn is_bound(&self) -> bool {
        self.target.borrow().is_some()
    }

    pub fn target(&self) -> Option<TypeValue> {
        self.target.borrow().clone()
    }
}

impl fmt::Debug for ForwardRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Forward({})", self.name)
    }
}
