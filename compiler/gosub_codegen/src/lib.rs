//! Global resolution and C code generation.
//!
//! [`Generator`] is the registry of loaded modules. Compiling a module runs
//! five passes over its declarations (slot, build, define, init, emit) and
//! appends C text to one output buffer shared by every module; imports are
//! compiled on demand while the importing module is being built.
//!
//! ```text
//! compile_to_c(source)
//!     emit_preamble
//!     load_builtin        via the ModuleLoader, unless skipped
//!     compile_source("main", source)
//!         slot -> build (imports recurse here) -> define -> init -> emit
//! ```
//!
//! The first error aborts compilation and is returned as a
//! [`CompileError`] naming the module its span points into.

mod compiler;
mod error;
mod generator;
pub mod loader;
mod options;
mod registry;
mod value;

pub use error::{CompileError, CompileErrorKind};
pub use generator::Generator;
pub use loader::{FsLoader, LoadError, MemoryLoader, ModuleLoader};
pub use options::Options;
pub use registry::{GDef, GDefKind, MethodDef, Module, ModuleId};
pub use value::{BoundMethod, CExpr, Value};

/// Compiles the `main` module `source` to C, loading imports from
/// `options.lib_dir`.
pub fn compile_to_c(source: &str, options: &Options) -> Result<String, CompileError> {
    let loader = FsLoader::new(&options.lib_dir);
    compile_with_loader(source, options, Box::new(loader))
}

/// Like [`compile_to_c`], with module sources coming from `loader`.
pub fn compile_with_loader(
    source: &str,
    options: &Options,
    loader: Box<dyn ModuleLoader>,
) -> Result<String, CompileError> {
    let mut gen = Generator::new(loader);
    gen.emit_preamble();
    if !options.skip_builtin {
        gen.load_builtin()?;
    }
    gen.compile_source("main", source)?;
    Ok(gen.into_output())
}

#[cfg(test)]
mod tests;
