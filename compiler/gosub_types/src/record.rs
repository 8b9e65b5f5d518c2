//! Records behind struct, interface and function types.

use std::cell::RefCell;
use std::fmt;

use crate::TypeValue;

/// A named, typed entry: struct field, method, parameter or result.
#[derive(Clone)]
pub struct Member {
    pub name: String,
    pub ty: TypeValue,
}

impl Member {
    pub fn new(name: impl Into<String>, ty: TypeValue) -> Self {
        Member {
            name: name.into(),
            ty,
        }
    }

    /// Whether the entry has a usable name; `_` and the empty name do not.
    pub fn is_named(&self) -> bool {
        !self.name.is_empty() && self.name != "_"
    }
}

impl fmt::Debug for Member {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.name, self.ty)
    }
}

impl fmt::Debug for FuncRec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FuncRec")
            .field("inputs", &self.inputs)
            .field("outputs", &self.outputs)
            .field("variadic", &self.variadic)
            .field("is_method", &self.is_method)
            .field("ptr_typedef", &self.ptr_typedef)
            .finish()
    }
}

/// A struct declaration. Methods are attached after the struct is built.
pub struct StructRec {
    package: String,
    name: String,
    fields: Vec<Member>,
    methods: RefCell<Vec<Member>>,
}

impl StructRec {
    pub fn new(package: &str, name: &str, fields: Vec<Member>) -> Self {
        StructRec {
            package: package.to_owned(),
            name: name.to_owned(),
            fields,
            methods: RefCell::new(Vec::new()),
        }
    }

    pub fn package(&self) -> &str {
        &self.package
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Qualified C name, `pkg__Name`.
    pub fn c_name(&self) -> String {
        format!("{}__{}", self.package, self.name)
    }

    pub fn fields(&self) -> &[Member] {
        &self.fields
    }

    pub fn field(&self, name: &str) -> Option<&Member> {
        self.fields.iter().find(|m| m.name == name)
    }

    pub fn method(&self, name: &str) -> Option<Member> {
        self.methods.borrow().iter().find(|m| m.name == name).cloned()
    }

    pub fn add_method(&self, method: Member) {
        self.methods.borrow_mut().push(method);
    }

    pub(crate) fn same_as(&self, other: &StructRec) -> bool {
        self.package == other.package && self.name == other.name
    }
}

/// An interface declaration.
pub struct InterfaceRec {
    package: String,
    name: String,
    methods: Vec<Member>,
}

impl InterfaceRec {
    pub fn new(package: &str, name: &str, methods: Vec<Member>) -> Self {
        InterfaceRec {
            package: package.to_owned(),
            name: name.to_owned(),
            methods,
        }
    }

    pub fn package(&self) -> &str {
        &self.package
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn methods(&self) -> &[Member] {
        &self.methods
    }

    pub fn method(&self, name: &str) -> Option<&Member> {
        self.methods.iter().find(|m| m.name == name)
    }

    pub(crate) fn same_as(&self, other: &InterfaceRec) -> bool {
        self.package == other.package && self.name == other.name
    }
}

/// A function signature.
///
/// For a variadic function the last input already has slice type. For a
/// method the receiver is the first input.
pub struct FuncRec {
    pub inputs: Vec<Member>,
    pub outputs: Vec<Member>,
    pub variadic: bool,
    pub is_method: bool,
    ptr_typedef: String,
}

impl FuncRec {
    pub(crate) fn new(
        inputs: Vec<Member>,
        outputs: Vec<Member>,
        variadic: bool,
        is_method: bool,
        ptr_typedef: String,
    ) -> Self {
        FuncRec {
            inputs,
            outputs,
            variadic,
            is_method,
            ptr_typedef,
        }
    }

    /// Name of the C function-pointer typedef for this signature.
    pub fn ptr_typedef(&self) -> &str {
        &self.ptr_typedef
    }

    /// C parameter name of input `i`.
    pub fn input_c_name(&self, i: usize) -> String {
        match self.inputs.get(i) {
            Some(m) if m.is_named() => format!("in_{}", m.name),
            _ => format!("__{i}"),
        }
    }

    /// C parameter name of output `j` when outputs are passed by pointer.
    pub fn output_c_name(&self, j: usize) -> String {
        match self.outputs.get(j) {
            Some(m) if m.is_named() => format!("out_{}", m.name),
            _ => format!("out__{j}"),
        }
    }

    /// Whether results come back through trailing pointer parameters.
    pub fn returns_through_pointers(&self) -> bool {
        self.outputs.len() != 1
    }

    /// C declarator for a function called `name` with this signature.
    ///
    /// A single output is the C return type; otherwise the function returns
    /// `void` and every output becomes a trailing `*out_` parameter.
    pub fn signature_str(&self, name: &str) -> String {
        let ret = if self.returns_through_pointers() {
            "void".to_owned()
        } else {
            self.outputs[0].ty.c_type()
        };

        let mut params: Vec<String> = self
            .inputs
            .iter()
            .enumerate()
            .map(|(i, m)| format!("{} {}", m.ty.c_type(), self.input_c_name(i)))
            .collect();
        if self.returns_through_pointers() {
            params.extend(
                self.outputs
                    .iter()
                    .enumerate()
                    .map(|(j, m)| format!("{} *{}", m.ty.c_type(), self.output_c_name(j))),
            );
        }

        format!("{ret} {name}({})", params.join(", "))
    }

    /// The `typedef` line declaring [`FuncRec::ptr_typedef`].
    pub fn typedef_line(&self) -> String {
        format!(
            "typedef {};",
            self.signature_str(&format!("(*{})", self.ptr_typedef))
        )
    }

    pub(crate) fn same_shape(&self, other: &FuncRec) -> bool {
        fn same(a: &[Member], b: &[Member]) -> bool {
            a.len() == b.len() && a.iter().zip(b).all(|(x, y)| x.ty.equals(&y.ty))
        }
        self.variadic == other.variadic
            && same(&self.inputs, &other.inputs)
            && same(&self.outputs, &other.outputs)
    }
}
