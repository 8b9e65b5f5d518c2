use std::rc::Rc;

use rustc_hash::FxHashSet;

use crate::{FuncRec, Member, TypeValue};

/// Creates function types and tracks which pointer typedefs were emitted.
///
/// Every function type gets a fresh `funk_<n>` name. The typedef line is
/// handed out once, the first time a caller asks for it.
#[derive(Default)]
pub struct FuncPtrTypedefs {
    next: u32,
    emitted: FxHashSet<String>,
}

impl FuncPtrTypedefs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn function(
        &mut self,
        inputs: Vec<Member>,
        outputs: Vec<Member>,
        variadic: bool,
        is_method: bool,
    ) -> TypeValue {
        self.next += 1;
        let name = format!("funk_{}", self.next);
        TypeValue::Function(Rc::new(FuncRec::new(
            inputs, outputs, variadic, is_method, name,
        )))
    }

    /// The typedef line for `ty` if it is a function type whose typedef has
    /// not been handed out yet.
    pub fn request(&mut self, ty: &TypeValue) -> Option<String> {
        let rec = ty.as_function()?;
        if self.emitted.insert(rec.ptr_typedef().to_owned()) {
            Some(rec.typedef_line())
        } else {
            None
        }
    }
}
