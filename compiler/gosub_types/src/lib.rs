//! Type values for gosub.
//!
//! A [`TypeValue`] is the compiler's view of a source-level type. The set of
//! variants is closed:
//! - primitives, nominal by name (`int`, `string`, the `_type_` metatype, ...)
//! - pointers, slices and maps, equal when their components are equal
//! - structs and interfaces, nominal by their qualified record name
//! - functions, compared structurally over inputs and outputs
//! - `Multi`, the aggregate result of a call with several outputs
//! - forward handles to type declarations that are not built yet
//!
//! Every operation that looks at the shape of a type resolves forward
//! handles first (see [`TypeValue::resolve`]). Reaching an unbound or
//! cyclic handle at that point is a compiler bug and panics; the code
//! generator validates declared types before anything else inspects them.

mod forward;
mod prim;
mod record;
mod type_value;
mod typedefs;

pub use forward::{ForwardRef, ResolveError, RESOLVE_DEPTH};
pub use prim::Prim;
pub use record::{FuncRec, InterfaceRec, Member, StructRec};
pub use type_value::TypeValue;
pub use typedefs::FuncPtrTypedefs;

#[cfg(test)]
mod tests;
