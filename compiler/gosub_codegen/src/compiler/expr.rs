use gosub_ir::{ensure_sufficient_stack, BinaryOp, ExprId, ExprKind, FieldInitRange, Name, Span, UnaryOp};
use gosub_types::{Prim, TypeValue};

use super::Compiler;
use crate::{BoundMethod, CompileError, CompileErrorKind, Value};

impl Compiler<'_> {
    pub(crate) fn compile_expr(&mut self, id: ExprId) -> Result<Value, CompileError> {
        ensure_sufficient_stack(|| self.compile_expr_inner(id))
    }

    fn compile_expr_inner(&mut self, id: ExprId) -> Result<Value, CompileError> {
        let expr = *self.ast.arena.get_expr(id);
        match expr.kind {
            ExprKind::Int(n) => Ok(Value::cexpr(n.to_string(), TypeValue::CONST_INT)),
            ExprKind::Str(s) => Ok(Value::cexpr(
                format!("MakeStringFromC(\"{}\")", escape_c(self.name(s))),
                TypeValue::STRING,
            )),
            ExprKind::Ident(name) => self.lookup(self.name(name), expr.span),
            ExprKind::Unary { op, operand } => {
                let operand = self.compile_value(operand)?;
                let ty = match op {
                    UnaryOp::Neg => TypeValue::INT,
                    UnaryOp::Not => TypeValue::BOOL,
                };
                Ok(Value::cexpr(format!("({}({}))", op.as_c_str(), operand.c), ty))
            }
            ExprKind::Binary { op, left, right } => {
                let left = self.compile_value(left)?;
                let right = self.compile_value(right)?;
                let c = match op {
                    BinaryOp::AndNot => format!("({} & ~{})", left.c, right.c),
                    op => format!("({} {} {})", left.c, op.as_c_str(), right.c),
                };
                Ok(Value::cexpr(c, TypeValue::INT))
            }
            ExprKind::Call { func, args, spread } => self.compile_call(func, args, spread, expr.span),
            ExprKind::Dot { receiver, member } => self.compile_dot(receiver, member, expr.span),
            ExprKind::Index { receiver, index } => Ok(Value::SubRef {
                container: Box::new(self.compile_expr(receiver)?),
                index: Box::new(self.compile_expr(index)?),
            }),
            ExprKind::SliceExpr { receiver, lo, hi } => {
                self.compile_slice_expr(receiver, lo, hi, expr.span)
            }
            ExprKind::Ctor { ty, fields } => self.compile_ctor(ty, fields, expr.span),
            ExprKind::PointerType(inner) => {
                Ok(Value::TypeRef(TypeValue::pointer(self.compile_type(inner)?)))
            }
            ExprKind::SliceType(elem) => Ok(Value::TypeRef(TypeValue::slice(self.compile_type(elem)?))),
            ExprKind::MapType { key, value } => {
                let key = self.compile_type(key)?;
                let value = self.compile_type(value)?;
                Ok(Value::TypeRef(TypeValue::map(key, value)))
            }
            ExprKind::StructType(fields) => {
                let name = format!("_struct_{}", self.gen.next_serial());
                Ok(Value::TypeRef(self.struct_type(fields, &name)?))
            }
            ExprKind::InterfaceType(methods) => Ok(Value::TypeRef(self.interface_type(methods, None)?)),
        }
    }

    /// `x.m`: a module member, a struct field, or a method bound to `x`.
    /// Fields are searched before methods.
    fn compile_dot(&mut self, receiver: ExprId, member: Name, span: Span) -> Result<Value, CompileError> {
        let member = self.name(member);
        let receiver = self.compile_expr(receiver)?;

        if let Value::ImportRef(module) = receiver {
            let value = self.gen.global_value(module, member).ok_or_else(|| {
                self.error(
                    span,
                    CompileErrorKind::UnknownMember {
                        member: member.to_owned(),
                        container: format!("module {}", self.gen.module(module).name()),
                    },
                )
            })?;
            if let Value::TypeRef(ty) = &value {
                self.require_resolved(ty, span)?;
            }
            return Ok(value);
        }

        let receiver = self.to_single(receiver, span)?;
        if let Some(rec) = receiver.ty.pointee_struct() {
            if let Some(field) = rec.field(member) {
                return Ok(Value::cexpr(
                    format!("({}).{member}", receiver.c),
                    field.ty.clone(),
                ));
            }
            if let Some(func) = rec.method(member).and_then(|m| m.ty.as_function()) {
                return Ok(Value::BoundMethod(BoundMethod {
                    func_c: format!("{}__{member}", rec.c_name()),
                    receiver: receiver.c,
                    func,
                }));
            }
        } else if let Some(Some(rec)) = receiver.ty.as_interface() {
            if let Some(func) = rec.method(member).and_then(|m| m.ty.as_function()) {
                return Ok(Value::BoundMethod(BoundMethod {
                    func_c: format!("I_{member}"),
                    receiver: receiver.c,
                    func,
                }));
            }
        }

        Err(self.error(
            span,
            CompileErrorKind::UnknownMember {
                member: member.to_owned(),
                container: format!("`{}`", receiver.ty),
            },
        ))
    }

    /// `x[lo:hi]` on a slice or a string: a copy of `x` whose offset and
    /// length are narrowed after a bounds check. Bounds are in elements;
    /// the runtime counts bytes.
    fn compile_slice_expr(
        &mut self,
        receiver: ExprId,
        lo: Option<ExprId>,
        hi: Option<ExprId>,
        span: Span,
    ) -> Result<Value, CompileError> {
        let container = self.compile_value(receiver)?;
        let elem_c = if container.ty.is_prim(Prim::String) {
            None
        } else if let Some(elem) = container.ty.slice_element() {
            Some(elem.c_type())
        } else {
            return Err(self.error(
                span,
                CompileErrorKind::Mismatch {
                    expected: "slice or string".to_owned(),
                    found: container.ty.to_string(),
                    context: "in slice expression".to_owned(),
                },
            ));
        };

        let copy = self.temp(&container.ty, span)?;
        self.line(&format!("{copy} = {};", container.c));
        let lo = lo.map(|id| self.slice_bound(id)).transpose()?;
        let hi = hi.map(|id| self.slice_bound(id)).transpose()?;
        if lo.is_none() && hi.is_none() {
            return Ok(Value::cexpr(copy, container.ty));
        }

        let bytes = |n: &str| match &elem_c {
            Some(elem) => format!("({n} * sizeof({elem}))"),
            None => n.to_owned(),
        };
        let lo_b = lo.as_deref().map_or_else(|| "0".to_owned(), bytes);
        let hi_b = hi.as_deref().map_or_else(|| format!("({copy}).len"), bytes);
        self.line(&format!(
            "assert(0 <= {lo_b} && {lo_b} <= {hi_b} && {hi_b} <= ({copy}).len);"
        ));
        if lo.is_some() {
            self.line(&format!("({copy}).offset += {lo_b};"));
            self.line(&format!("({copy}).len = {hi_b} - {lo_b};"));
        } else {
            self.line(&format!("({copy}).len = {hi_b};"));
        }
        Ok(Value::cexpr(copy, container.ty))
    }

    /// One bound of a slice expression, evaluated once into an `int`.
    fn slice_bound(&mut self, id: ExprId) -> Result<String, CompileError> {
        let span = self.expr_span(id);
        let value = self.compile_value(id)?;
        let c = self.convert(&TypeValue::INT, value, span, "in slice index")?;
        let bound = self.temp(&TypeValue::INT, span)?;
        self.line(&format!("{bound} = {c};"));
        Ok(bound)
    }

    /// `&T{f: v}` allocates a `T` and assigns the listed fields.
    fn compile_ctor(&mut self, ty: ExprId, fields: FieldInitRange, span: Span) -> Result<Value, CompileError> {
        let struct_ty = self.compile_type(ty)?;
        let Some(rec) = struct_ty.as_struct() else {
            return Err(self.error(
                self.expr_span(ty),
                CompileErrorKind::Mismatch {
                    expected: "struct type".to_owned(),
                    found: struct_ty.to_string(),
                    context: "in constructor".to_owned(),
                },
            ));
        };

        let handle_ty = TypeValue::pointer(struct_ty);
        let handle = self.temp(&handle_ty, span)?;
        let c_name = rec.c_name();
        self.line(&format!(
            "{handle} = oalloc(sizeof(struct {c_name}), CLASS_{c_name});"
        ));

        let inits = self.ast.arena.get_field_inits(fields).to_vec();
        for init in inits {
            let name = self.name(init.name);
            let Some(field) = rec.field(name) else {
                return Err(self.error(
                    init.span,
                    CompileErrorKind::UnknownMember {
                        member: name.to_owned(),
                        container: format!("struct `{}`", rec.name()),
                    },
                ));
            };
            let value = self.compile_value(init.value)?;
            let c = self.convert(&field.ty, value, init.span, "in constructor field")?;
            self.line(&format!("({handle}).{name} = {c};"));
        }

        Ok(Value::cexpr(handle, handle_ty))
    }
}

/// Escapes text for a C string literal.
fn escape_c(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for b in s.bytes() {
        match b {
            b'"' => out.push_str("\\\""),
            b'\\' => out.push_str("\\\\"),
            b'\n' => out.push_str("\\n"),
            b'\t' => out.push_str("\\t"),
            b'\r' => out.push_str("\\r"),
            0x20..=0x7e => out.push(char::from(b)),
            _ => out.push_str(&format!("\\{b:03o}")),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::escape_c;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_escape_c() {
        assert_eq!(escape_c("hi"), "hi");
        assert_eq!(escape_c("a\"b\\c\n"), "a\\\"b\\\\c\\n");
        assert_eq!(escape_c("\u{1}é"), "\\001\\303\\251");
    }
}
