use std::fmt;
use std::rc::Rc;

use crate::{ForwardRef, FuncRec, InterfaceRec, Member, Prim, ResolveError, StructRec, RESOLVE_DEPTH};

/// A source-level type.
///
/// Cloning is cheap: composite variants share their parts.
#[derive(Clone)]
pub enum TypeValue {
    Prim(Prim),
    Pointer(Rc<TypeValue>),
    Slice(Rc<TypeValue>),
    Map(Rc<TypeValue>, Rc<TypeValue>),
    Struct(Rc<StructRec>),
    /// `None` is the universal `interface{}`.
    Interface(Option<Rc<InterfaceRec>>),
    Function(Rc<FuncRec>),
    Multi(Rc<[Member]>),
    Forward(ForwardRef),
}

impl TypeValue {
    pub const INT: TypeValue = TypeValue::Prim(Prim::Int);
    pub const BOOL: TypeValue = TypeValue::Prim(Prim::Bool);
    pub const BYTE: TypeValue = TypeValue::Prim(Prim::Byte);
    pub const STRING: TypeValue = TypeValue::Prim(Prim::String);
    pub const CONST_INT: TypeValue = TypeValue::Prim(Prim::ConstInt);
    pub const TYPE: TypeValue = TypeValue::Prim(Prim::Type);
    pub const NIL: TypeValue = TypeValue::Prim(Prim::Nil);
    pub const IMPORT: TypeValue = TypeValue::Prim(Prim::Import);

    pub fn pointer(inner: TypeValue) -> Self {
        TypeValue::Pointer(Rc::new(inner))
    }

    pub fn slice(elem: TypeValue) -> Self {
        TypeValue::Slice(Rc::new(elem))
    }

    pub fn map(key: TypeValue, value: TypeValue) -> Self {
        TypeValue::Map(Rc::new(key), Rc::new(value))
    }

    pub fn multi(members: Vec<Member>) -> Self {
        TypeValue::Multi(members.into())
    }

    /// Follows forward handles until a concrete variant is reached.
    pub fn resolve(&self) -> Result<TypeValue, ResolveError> {
        let mut current = self.clone();
        for _ in 0..RESOLVE_DEPTH {
            let TypeValue::Forward(forward) = &current else {
                return Ok(current);
            };
            let Some(next) = forward.target() else {
                return Err(ResolveError::Unbound(forward.name().to_owned()));
            };
            current = next;
        }
        let name = match self {
            TypeValue::Forward(forward) => forward.name().to_owned(),
            other => other.to_string(),
        };
        Err(ResolveError::TooDeep(name))
    }

    fn peel(&self) -> TypeValue {
        match self.resolve() {
            Ok(ty) => ty,
            Err(err) => panic!("unvalidated type reached code generation: {err}"),
        }
    }

    /// Checks that every forward handle reachable through pointers, slices
    /// and maps resolves. Structs, interfaces and functions end the walk.
    pub fn validate(&self) -> Result<(), ResolveError> {
        self.validate_at(0)
    }

    fn validate_at(&self, depth: usize) -> Result<(), ResolveError> {
        if depth > RESOLVE_DEPTH {
            return Err(ResolveError::TooDeep(self.to_string()));
        }
        match self.resolve()? {
            TypeValue::Pointer(inner) | TypeValue::Slice(inner) => inner.validate_at(depth + 1),
            TypeValue::Map(key, value) => {
                key.validate_at(depth + 1)?;
                value.validate_at(depth + 1)
            }
            _ => Ok(()),
        }
    }

    /// Type equality: nominal for primitives, structs and interfaces,
    /// structural for everything composite.
    ///
    /// # Panics
    ///
    /// Comparing a `Multi` is an invariant violation; multi-valued results
    /// only ever feed a destructuring assignment.
    pub fn equals(&self, other: &TypeValue) -> bool {
        match (self.peel(), other.peel()) {
            (TypeValue::Multi(_), _) | (_, TypeValue::Multi(_)) => {
                panic!("multi-valued types cannot be compared")
            }
            (TypeValue::Prim(a), TypeValue::Prim(b)) => a == b,
            (TypeValue::Pointer(a), TypeValue::Pointer(b))
            | (TypeValue::Slice(a), TypeValue::Slice(b)) => a.equals(&b),
            (TypeValue::Map(k1, v1), TypeValue::Map(k2, v2)) => k1.equals(&k2) && v1.equals(&v2),
            (TypeValue::Struct(a), TypeValue::Struct(b)) => a.same_as(&b),
            (TypeValue::Interface(a), TypeValue::Interface(b)) => match (a, b) {
                (None, None) => true,
                (Some(a), Some(b)) => a.same_as(&b),
                _ => false,
            },
            (TypeValue::Function(a), TypeValue::Function(b)) => a.same_shape(&b),
            _ => false,
        }
    }

    /// Canonical C type name.
    pub fn c_type(&self) -> String {
        match self.peel() {
            TypeValue::Prim(p) => p.c_type(),
            TypeValue::Pointer(_) => "Pointer".to_owned(),
            TypeValue::Slice(_) => "Slice".to_owned(),
            TypeValue::Map(..) => "Map".to_owned(),
            TypeValue::Struct(_) => "Struct".to_owned(),
            TypeValue::Interface(_) => "Interface".to_owned(),
            TypeValue::Function(rec) => rec.ptr_typedef().to_owned(),
            TypeValue::Multi(_) => "Multi".to_owned(),
            TypeValue::Forward(_) => unreachable!("peel never yields a forward handle"),
        }
    }

    /// Converts an expression of type `src` into this type.
    ///
    /// Returns the possibly rewritten C fragment, or `None` if the
    /// assignment is not allowed.
    ///
    /// # Panics
    ///
    /// When `self` is the metatype, a function type or a `Multi`, or when
    /// `src` is a `Multi`.
    pub fn assign(&self, c: &str, src: &TypeValue) -> Option<String> {
        let dest = self.peel();
        let src = src.peel();
        assert_assignable_kind(&dest, "assign to");
        assert!(
            !matches!(src, TypeValue::Multi(_)),
            "cannot assign from a multi-valued type"
        );

        if dest.equals(&src) {
            return Some(c.to_owned());
        }
        match (&dest, &src) {
            (TypeValue::Interface(_), TypeValue::Pointer(inner))
                if matches!(inner.peel(), TypeValue::Struct(_)) =>
            {
                Some(format!("HandleToInterface({c})"))
            }
            (TypeValue::Interface(None), TypeValue::Interface(_)) => Some(c.to_owned()),
            (TypeValue::Prim(p), TypeValue::Prim(Prim::ConstInt)) if p.is_int_like() => {
                Some(format!("({})({c})", p.c_type()))
            }
            (
                TypeValue::Pointer(_)
                | TypeValue::Slice(_)
                | TypeValue::Map(..)
                | TypeValue::Interface(_),
                TypeValue::Prim(Prim::Nil),
            ) => Some(c.to_owned()),
            _ => None,
        }
    }

    /// Explicit conversion: assignment, plus casts between int-like
    /// primitives.
    ///
    /// # Panics
    ///
    /// When either side is the metatype, a function type or a `Multi`.
    pub fn cast(&self, c: &str, src: &TypeValue) -> Option<String> {
        let dest = self.peel();
        let src = src.peel();
        assert_assignable_kind(&dest, "cast to");
        assert_assignable_kind(&src, "cast from");

        if let Some(converted) = dest.assign(c, &src) {
            return Some(converted);
        }
        match (&dest, &src) {
            (TypeValue::Prim(d), TypeValue::Prim(s)) if d.is_int_like() && s.is_int_like() => {
                Some(format!("({})({c})", d.c_type()))
            }
            _ => None,
        }
    }

    pub fn is_int_like(&self) -> bool {
        matches!(self.peel(), TypeValue::Prim(p) if p.is_int_like())
    }

    pub fn is_prim(&self, prim: Prim) -> bool {
        matches!(self.peel(), TypeValue::Prim(p) if p == prim)
    }

    /// Whether a C variable can hold a value of this type.
    pub fn is_storable(&self) -> bool {
        match self.peel() {
            TypeValue::Prim(p) => matches!(
                p,
                Prim::Bool
                    | Prim::Byte
                    | Prim::Int
                    | Prim::Uint
                    | Prim::Uintptr
                    | Prim::String
                    | Prim::Any
            ),
            TypeValue::Multi(_) => false,
            _ => true,
        }
    }

    /// Whether [`TypeValue::zero_value`] is defined for this type.
    pub fn has_zero_value(&self) -> bool {
        self.is_storable() && !matches!(self.peel(), TypeValue::Struct(_))
    }

    /// C initializer for a local of this type.
    ///
    /// # Panics
    ///
    /// When [`TypeValue::has_zero_value`] is false.
    pub fn zero_value(&self) -> String {
        let ty = self.peel();
        assert!(ty.has_zero_value(), "type `{ty}` has no zero value");
        match ty {
            TypeValue::Prim(Prim::String) | TypeValue::Slice(_) => "{0, 0, 0}".to_owned(),
            TypeValue::Prim(_) => "0".to_owned(),
            _ => "(void*)0".to_owned(),
        }
    }

    /// Element type produced by subscripting.
    pub fn element(&self) -> Option<TypeValue> {
        match self.peel() {
            TypeValue::Slice(elem) => Some((*elem).clone()),
            TypeValue::Map(_, value) => Some((*value).clone()),
            TypeValue::Prim(Prim::String) => Some(TypeValue::BYTE),
            _ => None,
        }
    }

    /// Element type of a slice; `None` for every other type.
    pub fn slice_element(&self) -> Option<TypeValue> {
        match self.peel() {
            TypeValue::Slice(elem) => Some((*elem).clone()),
            _ => None,
        }
    }

    /// The struct behind a pointer-to-struct type.
    pub fn pointee_struct(&self) -> Option<Rc<StructRec>> {
        match self.peel() {
            TypeValue::Pointer(inner) => match inner.peel() {
                TypeValue::Struct(rec) => Some(rec),
                _ => None,
            },
            _ => None,
        }
    }

    pub fn as_struct(&self) -> Option<Rc<StructRec>> {
        match self.peel() {
            TypeValue::Struct(rec) => Some(rec),
            _ => None,
        }
    }

    /// The interface record; the outer `None` means not an interface.
    pub fn as_interface(&self) -> Option<Option<Rc<InterfaceRec>>> {
        match self.peel() {
            TypeValue::Interface(rec) => Some(rec),
            _ => None,
        }
    }

    pub fn as_function(&self) -> Option<Rc<FuncRec>> {
        match self.peel() {
            TypeValue::Function(rec) => Some(rec),
            _ => None,
        }
    }

    pub fn as_multi(&self) -> Option<Rc<[Member]>> {
        match self.peel() {
            TypeValue::Multi(members) => Some(members),
            _ => None,
        }
    }
}

fn assert_assignable_kind(ty: &TypeValue, what: &str) {
    assert!(
        !matches!(
            ty,
            TypeValue::Prim(Prim::Type) | TypeValue::Function(_) | TypeValue::Multi(_)
        ),
        "cannot {what} type `{ty}`"
    );
}

impl fmt::Display for TypeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeValue::Prim(p) => write!(f, "{p}"),
            TypeValue::Pointer(inner) => write!(f, "*{inner}"),
            TypeValue::Slice(elem) => write!(f, "[]{elem}"),
            TypeValue::Map(key, value) => write!(f, "map[{key}]{value}"),
            TypeValue::Struct(rec) => write!(f, "{}.{}", rec.package(), rec.name()),
            TypeValue::Interface(None) => f.write_str("interface{}"),
            TypeValue::Interface(Some(rec)) => write!(f, "{}.{}", rec.package(), rec.name()),
            TypeValue::Function(rec) => {
                f.write_str("func(")?;
                write_types(f, &rec.inputs)?;
                f.write_str(")")?;
                match rec.outputs.len() {
                    0 => Ok(()),
                    1 => write!(f, " {}", rec.outputs[0].ty),
                    _ => {
                        f.write_str(" (")?;
                        write_types(f, &rec.outputs)?;
                        f.write_str(")")
                    }
                }
            }
            TypeValue::Multi(members) => {
                f.write_str("(")?;
                write_types(f, members)?;
                f.write_str(")")
            }
            // Bound handles are not followed: the target may contain this
            // same handle again.
            TypeValue::Forward(forward) => f.write_str(forward.name()),
        }
    }
}

fn write_types(f: &mut fmt::Formatter<'_>, members: &[Member]) -> fmt::Result {
    for (i, m) in members.iter().enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        write!(f, "{}", m.ty)?;
    }
    Ok(())
}

impl fmt::Debug for TypeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}
