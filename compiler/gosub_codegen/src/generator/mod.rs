//! The compiler-wide registry.
//!
//! A [`Generator`] owns every loaded [`Module`] in an arena indexed by
//! [`ModuleId`]. Modules never point at each other; they are found again
//! through [`Generator::find_module`]. Each module is loaded at most once:
//! its cache entry is installed before its own imports are loaded, so a
//! second request for the same name, including one from an import cycle,
//! gets the existing entry.

mod passes;

use gosub_ir::{Span, StringInterner};
use gosub_types::{FuncPtrTypedefs, Prim, TypeValue};
use rustc_hash::FxHashMap;

use crate::loader::{LoadError, ModuleLoader};
use crate::{CompileError, CompileErrorKind, Module, ModuleId, Value};

pub struct Generator {
    loader: Box<dyn ModuleLoader>,
    pub(crate) interner: StringInterner,
    modules: Vec<Module>,
    by_name: FxHashMap<String, ModuleId>,
    in_order: Vec<ModuleId>,
    builtin: Option<ModuleId>,
    prims: FxHashMap<&'static str, Value>,
    pub(crate) typedefs: FuncPtrTypedefs,
    serial: u32,
    out: String,
}

impl Generator {
    pub fn new(loader: Box<dyn ModuleLoader>) -> Self {
        let mut prims: FxHashMap<&'static str, Value> = Prim::NAMED
            .iter()
            .map(|&p| (p.name(), Value::TypeRef(TypeValue::Prim(p))))
            .collect();
        prims.insert("true", Value::cexpr("1", TypeValue::BOOL));
        prims.insert("false", Value::cexpr("0", TypeValue::BOOL));
        prims.insert("nil", Value::cexpr("(void*)0", TypeValue::NIL));

        Generator {
            loader,
            interner: StringInterner::new(),
            modules: Vec::new(),
            by_name: FxHashMap::default(),
            in_order: Vec::new(),
            builtin: None,
            prims,
            typedefs: FuncPtrTypedefs::new(),
            serial: 0,
            out: String::new(),
        }
    }

    /// Appends the fixed `#include` lines.
    pub fn emit_preamble(&mut self) {
        self.out.push_str("#include <stdio.h>\n");
        self.out.push_str("#include \"runt.h\"\n");
    }

    /// Loads module `name` through the loader, compiling it if it is not
    /// loaded yet.
    pub fn load_module(&mut self, name: &str) -> Result<ModuleId, CompileError> {
        self.import(name, name, Span::DUMMY)
    }

    /// Loads the prelude and makes its globals visible to later modules.
    pub fn load_builtin(&mut self) -> Result<ModuleId, CompileError> {
        let id = self.load_module("builtin")?;
        self.builtin = Some(id);
        Ok(id)
    }

    /// Compiles `source` as module `name`. A module of that name that is
    /// already loaded is returned as is.
    #[tracing::instrument(level = "debug", skip(self, source))]
    pub fn compile_source(&mut self, name: &str, source: &str) -> Result<ModuleId, CompileError> {
        if let Some(&id) = self.by_name.get(name) {
            return Ok(id);
        }

        let tokens = gosub_lexer::lex(source, &self.interner);
        let ast = gosub_parse::parse(&tokens, &self.interner)
            .map_err(|err| CompileError::parse(name, err))?;
        if let Some(package) = ast.package {
            let package = self.interner.lookup(package);
            if package != name {
                tracing::warn!(module = name, package, "package name does not match module name");
            }
        }

        let id = ModuleId::new(self.modules.len());
        self.modules.push(Module::new(name, ast));
        self.by_name.insert(name.to_owned(), id);

        self.slot(id)?;
        self.build(id)?;
        self.define(id)?;
        self.init_globals(id);
        self.emit_functions(id)?;

        self.in_order.push(id);
        tracing::debug!(module = name, "module compiled");
        Ok(id)
    }

    /// Loads the module an `import` names, attributing failures to `from`.
    pub(crate) fn import(
        &mut self,
        name: &str,
        from: &str,
        span: Span,
    ) -> Result<ModuleId, CompileError> {
        if let Some(&id) = self.by_name.get(name) {
            return Ok(id);
        }
        let source = self.loader.load(name).map_err(|err| {
            let kind = match err {
                LoadError::NotFound(name) => CompileErrorKind::ModuleNotFound(name),
                err @ LoadError::Io { .. } => CompileErrorKind::ModuleRead {
                    name: name.to_owned(),
                    reason: err.to_string(),
                },
            };
            CompileError::new(from, span, kind)
        })?;
        tracing::debug!(module = name, bytes = source.len(), "loading module");
        self.compile_source(name, &source)
    }

    pub fn module(&self, id: ModuleId) -> &Module {
        &self.modules[id.index()]
    }

    pub(crate) fn module_mut(&mut self, id: ModuleId) -> &mut Module {
        &mut self.modules[id.index()]
    }

    pub fn find_module(&self, name: &str) -> Option<ModuleId> {
        self.by_name.get(name).copied()
    }

    /// Modules in the order their compilation finished; imports come
    /// before the modules importing them.
    pub fn modules_in_order(&self) -> &[ModuleId] {
        &self.in_order
    }

    pub fn builtin(&self) -> Option<ModuleId> {
        self.builtin
    }

    pub fn output(&self) -> &str {
        &self.out
    }

    pub fn into_output(self) -> String {
        self.out
    }

    pub(crate) fn emit(&mut self, text: &str) {
        self.out.push_str(text);
    }

    pub(crate) fn next_serial(&mut self) -> u32 {
        self.serial += 1;
        self.serial
    }

    /// Value of global `name` in module `id`.
    ///
    /// A type that is not built yet is its forward handle; any other global
    /// that is not built yet is a [`Value::NameRef`].
    pub(crate) fn global_value(&self, id: ModuleId, name: &str) -> Option<Value> {
        let def = self.module(id).get(name)?;
        Some(match (&def.value, &def.forward) {
            (Some(value), _) => value.clone(),
            (None, Some(forward)) => Value::TypeRef(TypeValue::Forward(forward.clone())),
            (None, None) => Value::NameRef {
                module: id,
                name: name.to_owned(),
            },
        })
    }

    pub(crate) fn prim(&self, name: &str) -> Option<Value> {
        self.prims.get(name).cloned()
    }
}
