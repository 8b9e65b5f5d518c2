//! The per-module passes, run in order by [`Generator::compile_source`].
//!
//! 1. `slot` registers every top-level name, so declarations may refer to
//!    each other regardless of order.
//! 2. `build` imports modules, builds types, constants, variable types,
//!    function signatures and methods, then compiles variable initializers.
//! 3. `define` emits C declarations for every global.
//! 4. `init_globals` emits the `<pkg>__INIT` routine.
//! 5. `emit_functions` emits function and method bodies.

use std::rc::Rc;

use gosub_ir::{FuncDecl, Name, Span};
use gosub_types::{Member, Prim, TypeValue};

use super::Generator;
use crate::compiler::{Compiler, Emitted};
use crate::{CompileError, CompileErrorKind, GDef, GDefKind, MethodDef, ModuleId, Value};

impl Generator {
    #[tracing::instrument(level = "debug", skip(self))]
    pub(super) fn slot(&mut self, id: ModuleId) -> Result<(), CompileError> {
        let ast = Rc::clone(&self.module(id).ast);
        let imports = ast.imports.iter().map(|d| (d.name, GDefKind::Import, d.span));
        let types = ast.types.iter().map(|d| (d.name, GDefKind::Type, d.span));
        let consts = ast.consts.iter().map(|d| (d.name, GDefKind::Const, d.span));
        let vars = ast.vars.iter().map(|d| (d.name, GDefKind::Var, d.span));
        let funcs = ast.funcs.iter().map(|d| (d.name, GDefKind::Func, d.span));

        // `decl` counts within each kind, so it indexes that kind's list.
        let mut decls: Vec<(Name, GDefKind, usize, Span)> = Vec::with_capacity(ast.decl_count());
        for group in [
            imports.collect::<Vec<_>>(),
            types.collect(),
            consts.collect(),
            vars.collect(),
            funcs.collect(),
        ] {
            decls.extend(
                group
                    .into_iter()
                    .enumerate()
                    .map(|(i, (name, kind, span))| (name, kind, i, span)),
            );
        }

        let package = self.module(id).name().to_owned();
        for (name, kind, decl, span) in decls {
            let name = self.interner.lookup(name);
            let def = GDef::new(&package, name, kind, decl, span);
            if let Err(previous) = self.module_mut(id).insert(def).map_err(|prev| prev.span) {
                return Err(CompileError::new(
                    package,
                    span,
                    CompileErrorKind::Redefined {
                        name: name.to_owned(),
                        previous,
                    },
                ));
            }
        }
        Ok(())
    }

    #[tracing::instrument(level = "debug", skip(self))]
    pub(super) fn build(&mut self, id: ModuleId) -> Result<(), CompileError> {
        let ast = Rc::clone(&self.module(id).ast);
        let package = self.module(id).name().to_owned();

        for decl in &ast.imports {
            let name = self.interner.lookup(decl.name);
            let target = self.import(name, &package, decl.span)?;
            self.set_value(id, name, Value::ImportRef(target));
        }

        let mut built = Vec::with_capacity(ast.types.len());
        for decl in &ast.types {
            let name = self.interner.lookup(decl.name);
            let ty = Compiler::new(self, id).compile_named_type(decl.ty, name)?;
            if let Some(forward) = self.module(id).get(name).and_then(|d| d.forward.clone()) {
                forward.bind(ty.clone());
            }
            self.set_value(id, name, Value::TypeRef(ty.clone()));
            built.push((ty, decl.span));
        }
        for (ty, span) in built {
            ty.validate().map_err(|err| {
                CompileError::new(&package, span, CompileErrorKind::BadType(err.to_string()))
            })?;
        }

        for decl in &ast.consts {
            let name = self.interner.lookup(decl.name);
            if decl.ty.is_some() {
                return Err(CompileError::new(
                    &package,
                    decl.span,
                    CompileErrorKind::TypedConst(name.to_owned()),
                ));
            }
            let mut compiler = Compiler::new(self, id);
            let value = compiler.compile_value(decl.value)?;
            if !compiler.is_pristine() {
                return Err(compiler.error(
                    decl.span,
                    CompileErrorKind::InvalidStatement(format!(
                        "initializer of constant `{name}` is not constant"
                    )),
                ));
            }
            self.set_value(id, name, Value::CExpr(value));
        }

        for decl in &ast.vars {
            let name = self.interner.lookup(decl.name);
            match (decl.ty, decl.init) {
                (Some(ty), _) => {
                    let ty = Compiler::new(self, id).compile_type(ty)?;
                    if !ty.has_zero_value() {
                        return Err(CompileError::new(
                            &package,
                            decl.span,
                            CompileErrorKind::NotStorable(ty.to_string()),
                        ));
                    }
                    Compiler::new(self, id).set_global_type(name, ty);
                }
                (None, Some(_)) => {}
                (None, None) => {
                    return Err(CompileError::new(
                        &package,
                        decl.span,
                        CompileErrorKind::InvalidStatement(format!(
                            "variable `{name}` needs a type or an initializer"
                        )),
                    ))
                }
            }
        }

        for decl in &ast.funcs {
            let name = self.interner.lookup(decl.name);
            let ty = Compiler::new(self, id).signature(decl.sig, None)?;
            let c_name = format!("{package}__{name}");
            self.set_value(id, name, Value::cexpr(c_name, ty));
        }

        for (i, decl) in ast.methods.iter().enumerate() {
            self.build_method(id, i, decl)?;
        }

        self.build_var_inits(id)
    }

    /// Attaches method `decl` to the struct its receiver points to.
    fn build_method(
        &mut self,
        id: ModuleId,
        i: usize,
        decl: &FuncDecl,
    ) -> Result<(), CompileError> {
        let package = self.module(id).name().to_owned();
        let name = self.interner.lookup(decl.name);
        let ty = Compiler::new(self, id).signature(decl.sig, decl.receiver)?;
        let receiver = ty
            .as_function()
            .and_then(|f| f.inputs.first().map(|m| m.ty.clone()))
            .unwrap_or(TypeValue::Prim(Prim::Void));

        let Some(rec) = receiver
            .pointee_struct()
            .filter(|rec| rec.package() == package)
        else {
            return Err(CompileError::new(
                package,
                decl.span,
                CompileErrorKind::BadReceiver(receiver.to_string()),
            ));
        };

        let c_name = format!("{}__{name}", rec.c_name());
        if let Some(previous) = self.module(id).methods().iter().find(|m| m.c_name == c_name) {
            return Err(CompileError::new(
                package,
                decl.span,
                CompileErrorKind::Redefined {
                    name: format!("{}.{name}", rec.name()),
                    previous: previous.span,
                },
            ));
        }

        rec.add_method(Member::new(name, ty.clone()));
        self.module_mut(id).methods.push(MethodDef {
            c_name,
            ty,
            decl: i,
            span: decl.span,
        });
        Ok(())
    }

    /// Compiles every variable initializer into the module's init routine,
    /// inferring the types of variables declared without one.
    fn build_var_inits(&mut self, id: ModuleId) -> Result<(), CompileError> {
        let ast = Rc::clone(&self.module(id).ast);
        if ast.vars.iter().all(|v| v.init.is_none()) {
            return Ok(());
        }

        let targets: Vec<(&'static str, Option<TypeValue>)> = ast
            .vars
            .iter()
            .map(|decl| {
                let name = self.interner.lookup(decl.name);
                (name, self.module(id).get(name).and_then(GDef::ty))
            })
            .collect();

        let mut compiler = Compiler::new(self, id);
        for (decl, (name, declared)) in ast.vars.iter().zip(targets) {
            let Some(init) = decl.init else { continue };
            let value = compiler.compile_value(init)?;
            let ty = match declared {
                Some(ty) => ty,
                None if value.ty.is_prim(Prim::ConstInt) => TypeValue::INT,
                None if value.ty.has_zero_value() && !value.ty.is_prim(Prim::Nil) => {
                    value.ty.clone()
                }
                None => {
                    return Err(compiler.error(
                        decl.span,
                        CompileErrorKind::NotStorable(value.ty.to_string()),
                    ))
                }
            };
            let c_name = compiler.set_global_type(name, ty.clone());
            let converted = compiler.convert(&ty, value, decl.span, "in variable initializer")?;
            compiler.line(&format!("{c_name} = ({})({converted});", ty.c_type()));
        }

        // Typedefs go out now, ahead of the declarations that may use them.
        let mut init = compiler.finish();
        for typedef in std::mem::take(&mut init.typedefs) {
            self.emit(&typedef);
            self.emit("\n");
        }
        self.module_mut(id).init = Some(init);
        Ok(())
    }

    #[tracing::instrument(level = "debug", skip(self))]
    pub(super) fn define(&mut self, id: ModuleId) -> Result<(), CompileError> {
        let globals: Vec<(GDefKind, String, Option<TypeValue>)> = self
            .module(id)
            .globals()
            .iter()
            .map(|d| (d.kind, d.c_name.clone(), d.ty()))
            .collect();

        for (kind, c_name, ty) in globals {
            let Some(ty) = ty else { continue };
            match kind {
                GDefKind::Import | GDefKind::Const => {}
                GDefKind::Type => {
                    self.emit_typedefs_for(&ty);
                    self.emit(&format!("typedef {} {c_name};\n", ty.c_type()));
                }
                GDefKind::Var => {
                    self.emit_typedefs_for(&ty);
                    self.emit(&format!("{} {c_name};\n", ty.c_type()));
                }
                GDefKind::Func => self.emit_extern(&c_name, &ty),
            }
        }

        let methods: Vec<(String, TypeValue)> = self
            .module(id)
            .methods()
            .iter()
            .map(|m| (m.c_name.clone(), m.ty.clone()))
            .collect();
        for (c_name, ty) in methods {
            self.emit_extern(&c_name, &ty);
        }
        Ok(())
    }

    fn emit_extern(&mut self, c_name: &str, ty: &TypeValue) {
        let Some(func) = ty.as_function() else {
            panic!("function `{c_name}` has non-function type `{ty}`");
        };
        for member in func.inputs.iter().chain(&func.outputs) {
            self.emit_typedefs_for(&member.ty);
        }
        self.emit(&format!("extern {};\n", func.signature_str(c_name)));
    }

    /// Emits pointer typedefs `ty` depends on, innermost first.
    fn emit_typedefs_for(&mut self, ty: &TypeValue) {
        let Some(func) = ty.as_function() else { return };
        for member in func.inputs.iter().chain(&func.outputs) {
            self.emit_typedefs_for(&member.ty);
        }
        if let Some(line) = self.typedefs.request(ty) {
            self.emit(&line);
            self.emit("\n");
        }
    }

    #[tracing::instrument(level = "debug", skip(self))]
    pub(super) fn init_globals(&mut self, id: ModuleId) {
        let Some(init) = self.module_mut(id).init.take() else {
            return;
        };
        let header = format!("void {}__INIT(void) {{", self.module(id).name());
        self.emit_routine(&header, init);
    }

    #[tracing::instrument(level = "debug", skip(self))]
    pub(super) fn emit_functions(&mut self, id: ModuleId) -> Result<(), CompileError> {
        let ast = Rc::clone(&self.module(id).ast);
        for decl in &ast.funcs {
            let name = self.interner.lookup(decl.name);
            let Some(def) = self.module(id).get(name) else {
                panic!("function `{name}` was never slotted");
            };
            let (c_name, ty) = (def.c_name.clone(), def.ty());
            self.emit_function(id, &c_name, ty, decl)?;
        }

        let methods: Vec<(String, TypeValue, usize)> = self
            .module(id)
            .methods()
            .iter()
            .map(|m| (m.c_name.clone(), m.ty.clone(), m.decl))
            .collect();
        for (c_name, ty, decl) in methods {
            self.emit_function(id, &c_name, Some(ty), &ast.methods[decl])?;
        }
        Ok(())
    }

    fn emit_function(
        &mut self,
        id: ModuleId,
        c_name: &str,
        ty: Option<TypeValue>,
        decl: &FuncDecl,
    ) -> Result<(), CompileError> {
        let Some(func) = ty.as_ref().and_then(TypeValue::as_function) else {
            panic!("function `{c_name}` was not built");
        };
        let signature = func.signature_str(c_name);
        let Some(body) = decl.body else {
            self.emit(&format!("{signature}; //NATIVE\n"));
            return Ok(());
        };

        tracing::trace!(function = c_name, "compiling body");
        let mut compiler = Compiler::for_function(self, id, func, decl.span)?;
        compiler.compile_block(body)?;
        let emitted = compiler.finish();
        self.emit_routine(&format!("{signature} {{"), emitted);
        Ok(())
    }

    /// Writes typedefs, then `header`, locals, body and the closing brace.
    fn emit_routine(&mut self, header: &str, emitted: Emitted) {
        for typedef in &emitted.typedefs {
            self.emit(typedef);
            self.emit("\n");
        }
        self.emit(header);
        self.emit("\n");
        for local in &emitted.locals {
            self.emit(local);
            self.emit("\n");
        }
        self.emit(&emitted.body);
        self.emit("}\n");
    }

    fn set_value(&mut self, id: ModuleId, name: &str, value: Value) {
        match self.module_mut(id).get_mut(name) {
            Some(def) => def.value = Some(value),
            None => panic!("global `{name}` was never slotted"),
        }
    }
}
