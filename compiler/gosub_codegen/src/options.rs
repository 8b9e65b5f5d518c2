use std::path::{Path, PathBuf};

/// Settings for one compilation run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Options {
    /// Directory holding importable modules as `<name>.go`.
    pub lib_dir: PathBuf,
    /// Do not load the `builtin` prelude module.
    pub skip_builtin: bool,
}

impl Default for Options {
    fn default() -> Self {
        Options {
            lib_dir: PathBuf::from("lib"),
            skip_builtin: false,
        }
    }
}

impl Options {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_lib_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.lib_dir = dir.as_ref().to_path_buf();
        self
    }

    #[must_use]
    pub fn with_skip_builtin(mut self, skip: bool) -> Self {
        self.skip_builtin = skip;
        self
    }
}
