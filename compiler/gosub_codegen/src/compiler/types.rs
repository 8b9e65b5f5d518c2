//! Type expressions and signatures.

use std::rc::Rc;

use gosub_ir::{ExprId, ExprKind, FuncSig, MethodSpecRange, Param, ParamRange, Span};
use gosub_types::{InterfaceRec, Member, ResolveError, StructRec, TypeValue};

use super::Compiler;
use crate::{CompileError, CompileErrorKind, Value};

impl Compiler<'_> {
    /// Compiles an expression that must denote a type.
    pub(crate) fn compile_type(&mut self, id: ExprId) -> Result<TypeValue, CompileError> {
        match self.compile_expr(id)? {
            Value::TypeRef(ty) => Ok(ty),
            other => Err(self.error(
                self.expr_span(id),
                CompileErrorKind::NotAType(other.to_string()),
            )),
        }
    }

    /// Fails unless every forward handle reachable from `ty` is bound.
    ///
    /// Types taken from another module go through here: inside an import
    /// cycle that module may not have built them yet.
    pub(crate) fn require_resolved(&self, ty: &TypeValue, span: Span) -> Result<(), CompileError> {
        ty.validate().map_err(|err| {
            let kind = match err {
                ResolveError::Unbound(name) => CompileErrorKind::NotYetResolved(name),
                err @ ResolveError::TooDeep(_) => CompileErrorKind::BadType(err.to_string()),
            };
            self.error(span, kind)
        })
    }

    /// Compiles the right side of `type name ...`; struct and interface
    /// literals take the declared name.
    pub(crate) fn compile_named_type(
        &mut self,
        id: ExprId,
        name: &str,
    ) -> Result<TypeValue, CompileError> {
        match self.ast.arena.get_expr(id).kind {
            ExprKind::StructType(fields) => self.struct_type(fields, name),
            ExprKind::InterfaceType(methods) => self.interface_type(methods, Some(name)),
            _ => self.compile_type(id),
        }
    }

    pub(super) fn struct_type(
        &mut self,
        fields: ParamRange,
        name: &str,
    ) -> Result<TypeValue, CompileError> {
        let params = self.ast.arena.get_params(fields).to_vec();
        let fields = self.members(&params)?;
        let rec = StructRec::new(self.package(), name, fields);
        Ok(TypeValue::Struct(Rc::new(rec)))
    }

    /// An interface type; an unnamed one without methods is `interface{}`.
    pub(super) fn interface_type(
        &mut self,
        methods: MethodSpecRange,
        name: Option<&str>,
    ) -> Result<TypeValue, CompileError> {
        let specs = self.ast.arena.get_method_specs(methods).to_vec();
        let Some(name) = name.map(str::to_owned).or_else(|| {
            (!specs.is_empty()).then(|| format!("_interface_{}", self.gen.next_serial()))
        }) else {
            return Ok(TypeValue::Interface(None));
        };

        let mut members = Vec::with_capacity(specs.len());
        for spec in specs {
            let ty = self.signature(spec.sig, None)?;
            members.push(Member::new(self.name(spec.name), ty));
        }
        let rec = InterfaceRec::new(self.package(), &name, members);
        Ok(TypeValue::Interface(Some(Rc::new(rec))))
    }

    /// Function type for a signature; a receiver becomes the first input.
    pub(crate) fn signature(
        &mut self,
        sig: FuncSig,
        receiver: Option<Param>,
    ) -> Result<TypeValue, CompileError> {
        let mut params: Vec<Param> = receiver.into_iter().collect();
        params.extend_from_slice(self.ast.arena.get_params(sig.inputs));
        let inputs = self.members(&params)?;

        let outputs = self.ast.arena.get_params(sig.outputs).to_vec();
        let outputs = self.members(&outputs)?;

        Ok(self
            .gen
            .typedefs
            .function(inputs, outputs, sig.variadic, receiver.is_some()))
    }

    fn members(&mut self, params: &[Param]) -> Result<Vec<Member>, CompileError> {
        let mut members = Vec::with_capacity(params.len());
        for param in params {
            let ty = self.compile_type(param.ty)?;
            members.push(Member::new(self.name(param.name), ty));
        }
        Ok(members)
    }
}
