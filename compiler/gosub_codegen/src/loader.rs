//! Module source loading.
//!
//! The generator only needs "module name in, source text out"; where the
//! text comes from is up to the [`ModuleLoader`].

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use rustc_hash::FxHashMap;

#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("module `{0}` not found")]
    NotFound(String),
    #[error("cannot read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

pub trait ModuleLoader {
    /// Source text of module `name`.
    fn load(&self, name: &str) -> Result<String, LoadError>;
}

/// Loads `<root>/<name>.go`.
#[derive(Clone, Debug)]
pub struct FsLoader {
    root: PathBuf,
}

impl FsLoader {
    pub fn new(root: impl AsRef<Path>) -> Self {
        FsLoader {
            root: root.as_ref().to_path_buf(),
        }
    }

    pub fn path_of(&self, name: &str) -> PathBuf {
        self.root.join(format!("{name}.go"))
    }
}

impl ModuleLoader for FsLoader {
    fn load(&self, name: &str) -> Result<String, LoadError> {
        let path = self.path_of(name);
        match fs::read_to_string(&path) {
            Ok(text) => Ok(text),
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                Err(LoadError::NotFound(name.to_owned()))
            }
            Err(source) => Err(LoadError::Io { path, source }),
        }
    }
}

/// Serves modules from memory.
#[derive(Clone, Debug, Default)]
pub struct MemoryLoader {
    modules: FxHashMap<String, String>,
}

impl MemoryLoader {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_module(mut self, name: &str, source: &str) -> Self {
        self.insert(name, source);
        self
    }

    pub fn insert(&mut self, name: &str, source: &str) {
        self.modules.insert(name.to_owned(), source.to_owned());
    }
}

impl ModuleLoader for MemoryLoader {
    fn load(&self, name: &str) -> Result<String, LoadError> {
        self.modules
            .get(name)
            .cloned()
            .ok_or_else(|| LoadError::NotFound(name.to_owned()))
    }
}

#[cfg(test)]
#[expect(clippy::unwrap_used, reason = "Tests use unwrap for brevity")]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_fs_loader_reads_module_files() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("util.go"), "package util\n").unwrap();

        let loader = FsLoader::new(dir.path());
        assert_eq!(loader.load("util").unwrap(), "package util\n");
        assert!(matches!(loader.load("missing"), Err(LoadError::NotFound(name)) if name == "missing"));
    }

    #[test]
    fn test_memory_loader() {
        let loader = MemoryLoader::new().with_module("a", "package a\n");
        assert_eq!(loader.load("a").unwrap(), "package a\n");
        assert!(loader.load("b").is_err());
    }
}
