//! Tree-walking code generation for expressions and statements.
//!
//! A [`Compiler`] emits C statements into its own buffer and collects the
//! locals it introduces on the way. Declarations for those locals are only
//! known once the whole body has been walked, so [`Compiler::finish`] hands
//! both back separately and the caller writes declarations first.

mod call;
mod expr;
mod stmt;
mod types;

use std::rc::Rc;

use gosub_ir::{ExprId, Name, ParsedModule, Span};
use gosub_types::{FuncRec, Prim, TypeValue};
use rustc_hash::{FxHashMap, FxHashSet};

use crate::{CExpr, CompileError, CompileErrorKind, GDefKind, Generator, ModuleId, Value};

/// Output of one compiler: declarations, statements and the function
/// pointer typedefs the declarations need.
pub(crate) struct Emitted {
    pub typedefs: Vec<String>,
    pub locals: Vec<String>,
    pub body: String,
}

pub(crate) struct Compiler<'g> {
    gen: &'g mut Generator,
    module: ModuleId,
    ast: Rc<ParsedModule>,
    scopes: Vec<FxHashMap<String, Value>>,
    locals: Vec<String>,
    local_names: FxHashSet<String>,
    typedefs: Vec<String>,
    /// Function being compiled; `None` for global initializers.
    func: Option<Rc<FuncRec>>,
    /// Local holding a single named result.
    named_result: Option<String>,
    break_label: Option<String>,
    continue_label: Option<String>,
    body: String,
}

impl<'g> Compiler<'g> {
    pub(crate) fn new(gen: &'g mut Generator, module: ModuleId) -> Self {
        let ast = Rc::clone(&gen.module(module).ast);
        Compiler {
            gen,
            module,
            ast,
            scopes: vec![FxHashMap::default()],
            locals: Vec::new(),
            local_names: FxHashSet::default(),
            typedefs: Vec::new(),
            func: None,
            named_result: None,
            break_label: None,
            continue_label: None,
            body: String::new(),
        }
    }

    /// A compiler for the body of a function with signature `func`, with
    /// its parameters and named results in scope.
    pub(crate) fn for_function(
        gen: &'g mut Generator,
        module: ModuleId,
        func: Rc<FuncRec>,
        span: Span,
    ) -> Result<Self, CompileError> {
        let mut compiler = Compiler::new(gen, module);
        for (i, input) in func.inputs.iter().enumerate() {
            if input.is_named() {
                compiler.bind(&input.name, Value::cexpr(func.input_c_name(i), input.ty.clone()));
            }
        }
        if func.returns_through_pointers() {
            for (j, output) in func.outputs.iter().enumerate() {
                if output.is_named() {
                    let c = format!("(*{})", func.output_c_name(j));
                    compiler.bind(&output.name, Value::cexpr(c, output.ty.clone()));
                }
            }
        } else if let Some(output) = func.outputs.first().filter(|o| o.is_named()) {
            let c = compiler.declare_local(&output.name, &output.ty, span)?;
            compiler.bind(&output.name, Value::cexpr(c.clone(), output.ty.clone()));
            compiler.named_result = Some(c);
        }
        compiler.func = Some(func);
        Ok(compiler)
    }

    pub(crate) fn finish(self) -> Emitted {
        Emitted {
            typedefs: self.typedefs,
            locals: self.locals,
            body: self.body,
        }
    }

    /// Whether nothing was emitted or declared yet.
    pub(crate) fn is_pristine(&self) -> bool {
        self.body.is_empty() && self.locals.is_empty()
    }

    // Names and errors

    fn name(&self, name: Name) -> &'static str {
        self.gen.interner.lookup(name)
    }

    fn package(&self) -> &str {
        self.gen.module(self.module).name()
    }

    pub(crate) fn error(&self, span: Span, kind: CompileErrorKind) -> CompileError {
        CompileError::new(self.package(), span, kind)
    }

    fn mismatch(
        &self,
        span: Span,
        expected: &TypeValue,
        found: &TypeValue,
        context: &str,
    ) -> CompileError {
        self.error(
            span,
            CompileErrorKind::Mismatch {
                expected: expected.to_string(),
                found: found.to_string(),
                context: context.to_owned(),
            },
        )
    }

    fn expr_span(&self, id: ExprId) -> Span {
        self.ast.arena.get_expr(id).span
    }

    // Emission

    pub(crate) fn line(&mut self, text: &str) {
        self.body.push_str(text);
        self.body.push('\n');
    }

    /// Declares a C local of type `ty`, initialised to its zero value.
    fn add_local(&mut self, c: String, ty: &TypeValue, span: Span) -> Result<(), CompileError> {
        if !ty.has_zero_value() {
            return Err(self.error(span, CompileErrorKind::NotStorable(ty.to_string())));
        }
        if let Some(typedef) = self.gen.typedefs.request(ty) {
            self.typedefs.push(typedef);
        }
        self.locals
            .push(format!("{} {c} = {};", ty.c_type(), ty.zero_value()));
        self.local_names.insert(c);
        Ok(())
    }

    /// Declares the C local for source variable `name`.
    fn declare_local(
        &mut self,
        name: &str,
        ty: &TypeValue,
        span: Span,
    ) -> Result<String, CompileError> {
        let mut c = format!("v_{name}");
        if self.local_names.contains(&c) {
            c = format!("v_{name}_{}", self.gen.next_serial());
        }
        self.add_local(c.clone(), ty, span)?;
        Ok(c)
    }

    fn temp(&mut self, ty: &TypeValue, span: Span) -> Result<String, CompileError> {
        let c = format!("_tmp_{}", self.gen.next_serial());
        self.add_local(c.clone(), ty, span)?;
        Ok(c)
    }

    fn bind(&mut self, name: &str, value: Value) {
        if let Some(scope) = self.scopes.last_mut() {
            scope.insert(name.to_owned(), value);
        }
    }

    fn push_scope(&mut self) {
        self.scopes.push(FxHashMap::default());
    }

    fn pop_scope(&mut self) {
        self.scopes.pop();
    }

    // Lookup

    /// Block chain, then this module, then the prelude, then primitives.
    fn lookup(&self, name: &str, span: Span) -> Result<Value, CompileError> {
        if let Some(value) = self.scopes.iter().rev().find_map(|s| s.get(name)) {
            return Ok(value.clone());
        }
        if let Some(value) = self.gen.global_value(self.module, name) {
            return Ok(value);
        }
        if let Some(builtin) = self.gen.builtin().filter(|&b| b != self.module) {
            if let Some(value) = self.gen.global_value(builtin, name) {
                return Ok(value);
            }
        }
        self.gen
            .prim(name)
            .ok_or_else(|| self.error(span, CompileErrorKind::UnknownIdent(name.to_owned())))
    }

    /// Whether `name` may appear on the left of an assignment.
    fn is_assignable_name(&self, name: &str) -> bool {
        if self.scopes.iter().any(|s| s.contains_key(name)) {
            return true;
        }
        let global = |id: ModuleId| {
            self.gen
                .module(id)
                .get(name)
                .map(|def| def.kind == GDefKind::Var)
        };
        match global(self.module) {
            Some(is_var) => is_var,
            None => self.gen.builtin().and_then(global).unwrap_or(false),
        }
    }

    // Values

    /// Turns a value into a C expression.
    fn to_cexpr(&mut self, value: Value, span: Span) -> Result<CExpr, CompileError> {
        match value {
            Value::CExpr(e) => Ok(e),
            Value::NameRef { module, name } => {
                let resolved = self.gen.module(module).get(&name).and_then(|d| d.value.clone());
                match resolved {
                    Some(value) => self.to_cexpr(value, span),
                    None => Err(self.error(span, CompileErrorKind::NotYetResolved(name))),
                }
            }
            Value::SubRef { container, index } => {
                let container = self.to_single(*container, span)?;
                let index = self.to_single(*index, span)?;
                let Some(elem) = container.ty.element() else {
                    return Err(self.error(
                        span,
                        CompileErrorKind::Mismatch {
                            expected: "slice, map or string".to_owned(),
                            found: container.ty.to_string(),
                            context: "in subscript".to_owned(),
                        },
                    ));
                };
                Ok(CExpr::new(format!("({})[({})]", container.c, index.c), elem))
            }
            other @ (Value::TypeRef(_) | Value::ImportRef(_) | Value::BoundMethod(_)) => {
                Err(self.error(span, CompileErrorKind::NotAValue(other.to_string())))
            }
        }
    }

    /// Like [`Compiler::to_cexpr`], rejecting multi-valued results.
    fn to_single(&mut self, value: Value, span: Span) -> Result<CExpr, CompileError> {
        let e = self.to_cexpr(value, span)?;
        if let Some(members) = e.ty.as_multi() {
            return Err(self.error(
                span,
                CompileErrorKind::ResultCount(format!(
                    "expected 1 value, but the call returns {}",
                    members.len()
                )),
            ));
        }
        Ok(e)
    }

    /// Compiles an expression that must produce one value.
    pub(crate) fn compile_value(&mut self, id: ExprId) -> Result<CExpr, CompileError> {
        let value = self.compile_expr(id)?;
        self.to_single(value, self.expr_span(id))
    }

    /// Converts `src` for storage in a location of type `dest`.
    pub(crate) fn convert(
        &mut self,
        dest: &TypeValue,
        src: CExpr,
        span: Span,
        context: &str,
    ) -> Result<String, CompileError> {
        if dest.as_function().is_some() {
            return if src.ty.is_prim(Prim::Nil) || dest.equals(&src.ty) {
                Ok(src.c)
            } else {
                Err(self.mismatch(span, dest, &src.ty, context))
            };
        }
        if !dest.is_storable() {
            return Err(self.error(span, CompileErrorKind::NotStorable(dest.to_string())));
        }
        dest.assign(&src.c, &src.ty)
            .ok_or_else(|| self.mismatch(span, dest, &src.ty, context))
    }

    /// Records the type for a global variable and returns its C name.
    pub(crate) fn set_global_type(&mut self, name: &str, ty: TypeValue) -> String {
        let module = self.module;
        match self.gen.module_mut(module).get_mut(name) {
            Some(def) => {
                def.value = Some(Value::cexpr(def.c_name.clone(), ty));
                def.c_name.clone()
            }
            None => panic!("global `{name}` was never slotted"),
        }
    }
}

