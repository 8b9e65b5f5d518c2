//! Per-module symbol tables.

use std::rc::Rc;

use gosub_ir::{ParsedModule, Span};
use gosub_types::{ForwardRef, TypeValue};
use rustc_hash::FxHashMap;

use crate::compiler::Emitted;
use crate::Value;

/// Index of a module in the generator's arena.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct ModuleId(u32);

impl ModuleId {
    pub(crate) fn new(index: usize) -> Self {
        ModuleId(u32::try_from(index).unwrap_or_else(|_| panic!("too many modules: {index}")))
    }

    pub fn index(self) -> usize {
        self.0 as usize
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum GDefKind {
    Import,
    Type,
    Const,
    Var,
    Func,
}

/// A global definition.
///
/// `decl` indexes the declaration list of `kind` in the module's
/// [`ParsedModule`].
#[derive(Clone, Debug)]
pub struct GDef {
    pub package: String,
    pub name: String,
    pub c_name: String,
    pub kind: GDefKind,
    pub decl: usize,
    pub span: Span,
    /// Set by the build pass.
    pub value: Option<Value>,
    /// Handle other declarations see until a type is built.
    pub forward: Option<ForwardRef>,
}

impl GDef {
    pub(crate) fn new(package: &str, name: &str, kind: GDefKind, decl: usize, span: Span) -> Self {
        GDef {
            package: package.to_owned(),
            name: name.to_owned(),
            c_name: format!("{package}__{name}"),
            kind,
            decl,
            span,
            value: None,
            forward: (kind == GDefKind::Type).then(|| ForwardRef::new(name)),
        }
    }

    /// Type of a built type, var or func.
    pub fn ty(&self) -> Option<TypeValue> {
        match &self.value {
            Some(Value::TypeRef(ty)) => Some(ty.clone()),
            Some(Value::CExpr(e)) => Some(e.ty.clone()),
            _ => None,
        }
    }
}

/// A method attached to a struct of this module.
#[derive(Clone, Debug)]
pub struct MethodDef {
    pub c_name: String,
    pub ty: TypeValue,
    /// Index into [`ParsedModule::methods`].
    pub decl: usize,
    pub span: Span,
}

/// One compiled source module.
pub struct Module {
    name: String,
    pub(crate) ast: Rc<ParsedModule>,
    globals: Vec<GDef>,
    index: FxHashMap<String, usize>,
    pub(crate) methods: Vec<MethodDef>,
    /// Body of the `<pkg>__INIT` routine, if any var has an initializer.
    pub(crate) init: Option<Emitted>,
}

impl Module {
    pub(crate) fn new(name: &str, ast: ParsedModule) -> Self {
        Module {
            name: name.to_owned(),
            ast: Rc::new(ast),
            globals: Vec::new(),
            index: FxHashMap::default(),
            methods: Vec::new(),
            init: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Globals in slot order.
    pub fn globals(&self) -> &[GDef] {
        &self.globals
    }

    pub fn get(&self, name: &str) -> Option<&GDef> {
        self.index.get(name).map(|&i| &self.globals[i])
    }

    pub fn methods(&self) -> &[MethodDef] {
        &self.methods
    }

    pub(crate) fn get_mut(&mut self, name: &str) -> Option<&mut GDef> {
        self.index.get(name).map(|&i| &mut self.globals[i])
    }

    /// Adds a global; on a duplicate name, returns the earlier definition.
    pub(crate) fn insert(&mut self, def: GDef) -> Result<(), &GDef> {
        if let Some(&i) = self.index.get(&def.name) {
            return Err(&self.globals[i]);
        }
        self.index.insert(def.name.clone(), self.globals.len());
        self.globals.push(def);
        Ok(())
    }
}
