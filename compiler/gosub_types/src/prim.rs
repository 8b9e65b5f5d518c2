use std::fmt;

/// Primitive types.
///
/// Names starting with an underscore cannot be written by ordinary source
/// programs except through the prelude; they name compiler-internal kinds.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Prim {
    Bool,
    Byte,
    /// Untyped integer constant. Int-like, but only equal to itself.
    ConstInt,
    Int,
    Uint,
    Uintptr,
    String,
    /// The metatype: the type of a value that denotes a type.
    Type,
    List,
    Void,
    /// Marker type of an imported module.
    Import,
    Any,
    /// Type of `nil`.
    Nil,
}

impl Prim {
    pub const ALL: [Prim; 13] = [
        Prim::Bool,
        Prim::Byte,
        Prim::ConstInt,
        Prim::Int,
        Prim::Uint,
        Prim::Uintptr,
        Prim::String,
        Prim::Type,
        Prim::List,
        Prim::Void,
        Prim::Import,
        Prim::Any,
        Prim::Nil,
    ];

    /// Primitives reachable by name from source programs.
    pub const NAMED: [Prim; 9] = [
        Prim::Bool,
        Prim::Byte,
        Prim::Int,
        Prim::Uint,
        Prim::Uintptr,
        Prim::String,
        Prim::Type,
        Prim::Void,
        Prim::Any,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Prim::Bool => "bool",
            Prim::Byte => "byte",
            Prim::ConstInt => "_const_int_",
            Prim::Int => "int",
            Prim::Uint => "uint",
            Prim::Uintptr => "uintptr",
            Prim::String => "string",
            Prim::Type => "_type_",
            Prim::List => "_list_",
            Prim::Void => "_void_",
            Prim::Import => "_import_",
            Prim::Any => "_any_",
            Prim::Nil => "_nil_",
        }
    }

    /// C type name, `P_` followed by the primitive's name.
    pub fn c_type(self) -> String {
        format!("P_{}", self.name())
    }

    /// Integer kinds that may be cast into one another.
    pub fn is_int_like(self) -> bool {
        matches!(
            self,
            Prim::Byte | Prim::ConstInt | Prim::Int | Prim::Uint | Prim::Uintptr
        )
    }
}

impl fmt::Display for Prim {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
