use gosub_ir::{ExprId, ExprKind, ExprRange, Span};
use gosub_types::{Member, Prim, TypeValue};

use super::Compiler;
use crate::{CompileError, CompileErrorKind, Value};

impl Compiler<'_> {
    /// Compiles `func(args)`.
    ///
    /// Fixed inputs bind positionally. Extra arguments to a variadic
    /// function are appended to a fresh slice temporary, which is passed
    /// last. With several outputs, each result gets a temporary whose
    /// address is appended to the arguments, and the call's type is a
    /// `Multi` naming those temporaries.
    pub(super) fn compile_call(
        &mut self,
        func: ExprId,
        args: ExprRange,
        spread: bool,
        span: Span,
    ) -> Result<Value, CompileError> {
        let args = self.ast.arena.get_expr_list(args).to_vec();
        match self.intrinsic(func) {
            Some(Intrinsic::Len) => return self.compile_len(&args, spread, span),
            Some(Intrinsic::Append) => return self.compile_append(&args, spread, span),
            None => {}
        }
        let callee = self.compile_expr(func)?;

        let (func_c, rec, mut c_args, skip) = match callee {
            Value::TypeRef(ty) => return self.compile_conversion(&ty, &args, span),
            Value::BoundMethod(m) => {
                let skip = m.func.inputs.len() - m.explicit_inputs();
                (m.func_c, m.func, vec![m.receiver], skip)
            }
            other => {
                let callee = self.to_single(other, span)?;
                match callee.ty.as_function() {
                    Some(rec) => (callee.c, rec, Vec::new(), 0),
                    None => {
                        return Err(self.error(
                            span,
                            CompileErrorKind::NotCallable(callee.ty.to_string()),
                        ))
                    }
                }
            }
        };

        let params = &rec.inputs[skip..];
        let fixed = if rec.variadic && !spread {
            params.len().saturating_sub(1)
        } else {
            params.len()
        };
        if spread && !rec.variadic {
            return Err(self.error(
                span,
                CompileErrorKind::ArgCount(
                    "cannot use `...` in call to non-variadic function".to_owned(),
                ),
            ));
        }
        let count_ok = if rec.variadic && !spread {
            args.len() >= fixed
        } else {
            args.len() == fixed
        };
        if !count_ok {
            let at_least = if rec.variadic && !spread { "at least " } else { "" };
            return Err(self.error(
                span,
                CompileErrorKind::ArgCount(format!(
                    "got {} args for func call, wanted {at_least}{fixed} args",
                    args.len()
                )),
            ));
        }

        for (i, (&arg, param)) in args.iter().zip(params).take(fixed).enumerate() {
            let value = self.compile_value(arg)?;
            let context = format!("in argument {} of call", i + 1);
            c_args.push(self.convert(&param.ty, value, self.expr_span(arg), &context)?);
        }

        if rec.variadic && !spread {
            let slice_ty = &params[fixed].ty;
            c_args.push(self.pack_variadic(slice_ty, &args[fixed..], span)?);
        }

        let ty = match rec.outputs.as_slice() {
            [] => TypeValue::Prim(Prim::Void),
            [single] => single.ty.clone(),
            outputs => {
                let serial = self.gen.next_serial();
                let mut members = Vec::with_capacity(outputs.len());
                for (j, output) in outputs.iter().enumerate() {
                    let temp = format!("_multi_{serial}_{j}");
                    self.add_local(temp.clone(), &output.ty, span)?;
                    c_args.push(format!("&{temp}"));
                    members.push(Member::new(temp, output.ty.clone()));
                }
                TypeValue::multi(members)
            }
        };

        Ok(Value::cexpr(format!("{func_c}({})", c_args.join(", ")), ty))
    }

    /// Builds the slice for the variadic tail of a call and returns the
    /// temporary holding it.
    fn pack_variadic(
        &mut self,
        slice_ty: &TypeValue,
        extra: &[ExprId],
        span: Span,
    ) -> Result<String, CompileError> {
        let Some(elem) = slice_ty.slice_element() else {
            panic!("variadic input of type `{slice_ty}` is not a slice");
        };
        let slice = self.temp(slice_ty, span)?;
        self.line(&format!("{slice} = NilSlice;"));
        self.append_items(&slice, &elem, extra, "in variadic argument", span)?;
        Ok(slice)
    }

    /// Appends each of `items`, converted to `elem`, to the slice local
    /// `slice`.
    fn append_items(
        &mut self,
        slice: &str,
        elem: &TypeValue,
        items: &[ExprId],
        context: &str,
        span: Span,
    ) -> Result<(), CompileError> {
        for &arg in items {
            let value = self.compile_value(arg)?;
            let c = self.convert(elem, value, self.expr_span(arg), context)?;
            let item = self.temp(elem, span)?;
            self.line(&format!("{item} = {c};"));
            self.line(&format!(
                "{slice} = SliceAppend({slice}, &{item}, sizeof({item}), 1);"
            ));
        }
        Ok(())
    }

    /// `len` and `append` are compiled inline unless a local or a global
    /// of this module takes the name.
    fn intrinsic(&self, func: ExprId) -> Option<Intrinsic> {
        let ExprKind::Ident(name) = self.ast.arena.get_expr(func).kind else {
            return None;
        };
        let name = self.name(name);
        let intrinsic = match name {
            "len" => Intrinsic::Len,
            "append" => Intrinsic::Append,
            _ => return None,
        };
        let shadowed = self.scopes.iter().any(|s| s.contains_key(name))
            || self.gen.module(self.module).get(name).is_some();
        (!shadowed).then_some(intrinsic)
    }

    /// `len(x)` of a string or a slice.
    fn compile_len(
        &mut self,
        args: &[ExprId],
        spread: bool,
        span: Span,
    ) -> Result<Value, CompileError> {
        let [arg] = args else {
            return Err(self.error(
                span,
                CompileErrorKind::ArgCount(format!(
                    "`len` takes 1 argument, got {}",
                    args.len()
                )),
            ));
        };
        if spread {
            return Err(self.error(
                span,
                CompileErrorKind::ArgCount("cannot use `...` in call to `len`".to_owned()),
            ));
        }
        let value = self.compile_value(*arg)?;
        let c = if value.ty.is_prim(Prim::String) {
            format!("({}).len", value.c)
        } else if let Some(elem) = value.ty.slice_element() {
            slice_len(&value.c, &elem)
        } else {
            return Err(self.error(
                self.expr_span(*arg),
                CompileErrorKind::Mismatch {
                    expected: "slice or string".to_owned(),
                    found: value.ty.to_string(),
                    context: "in argument to `len`".to_owned(),
                },
            ));
        };
        Ok(Value::cexpr(c, TypeValue::INT))
    }

    /// `append(s, a, b)` and `append(s, t...)`. The result is a copy of `s`
    /// with the new elements added; `s` itself is not assigned.
    fn compile_append(
        &mut self,
        args: &[ExprId],
        spread: bool,
        span: Span,
    ) -> Result<Value, CompileError> {
        let Some((&first, items)) = args.split_first() else {
            return Err(self.error(
                span,
                CompileErrorKind::ArgCount("`append` needs a slice to append to".to_owned()),
            ));
        };
        let slice = self.compile_value(first)?;
        let Some(elem) = slice.ty.slice_element() else {
            return Err(self.error(
                self.expr_span(first),
                CompileErrorKind::Mismatch {
                    expected: "slice".to_owned(),
                    found: slice.ty.to_string(),
                    context: "in argument 1 of `append`".to_owned(),
                },
            ));
        };
        let result = self.temp(&slice.ty, span)?;
        self.line(&format!("{result} = {};", slice.c));

        if !spread {
            self.append_items(&result, &elem, items, "in argument to `append`", span)?;
            return Ok(Value::cexpr(result, slice.ty));
        }
        let [rest] = items else {
            return Err(self.error(
                span,
                CompileErrorKind::ArgCount(format!(
                    "`append` with `...` takes 2 arguments, got {}",
                    args.len()
                )),
            ));
        };
        let value = self.compile_value(*rest)?;
        let context = "in argument 2 of `append`";
        let c = self.convert(&slice.ty, value, self.expr_span(*rest), context)?;
        let from = self.temp(&slice.ty, span)?;
        let item = self.temp(&elem, span)?;
        let int = TypeValue::INT.c_type();
        self.line(&format!("{from} = {c};"));
        self.line(&format!("{{ {int} _n_ = {};", slice_len(&from, &elem)));
        self.line(&format!("for ({int} _i_ = 0; _i_ < _n_; _i_++) {{"));
        self.line(&format!("SliceGet({from}, sizeof({item}), _i_, &{item});"));
        self.line(&format!(
            "{result} = SliceAppend({result}, &{item}, sizeof({item}), 1);"
        ));
        self.line("}}");
        Ok(Value::cexpr(result, slice.ty))
    }

    /// `T(x)` where `T` denotes a type.
    fn compile_conversion(
        &mut self,
        ty: &TypeValue,
        args: &[ExprId],
        span: Span,
    ) -> Result<Value, CompileError> {
        let [arg] = args else {
            return Err(self.error(
                span,
                CompileErrorKind::ArgCount(format!(
                    "conversion to `{ty}` takes 1 argument, got {}",
                    args.len()
                )),
            ));
        };
        let value = self.compile_value(*arg)?;
        let convertible = ty.is_storable()
            && ty.as_function().is_none()
            && value.ty.as_function().is_none()
            && !value.ty.is_prim(Prim::Void);
        let converted = convertible
            .then(|| ty.cast(&value.c, &value.ty))
            .flatten();
        match converted {
            Some(c) => Ok(Value::cexpr(c, ty.clone())),
            None => Err(self.mismatch(span, ty, &value.ty, "in conversion")),
        }
    }
}

#[derive(Copy, Clone, Debug)]
enum Intrinsic {
    Len,
    Append,
}

/// Element count of the slice fragment `c`; the runtime keeps slice
/// lengths in bytes.
pub(super) fn slice_len(c: &str, elem: &TypeValue) -> String {
    format!("(({c}).len / sizeof({}))", elem.c_type())
}
