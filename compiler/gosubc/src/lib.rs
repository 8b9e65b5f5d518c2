//! Driver for the `gosub` command: argument handling, file I/O and error
//! reporting around [`gosub_codegen::compile_to_c`].

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Once;

use gosub_codegen::{CompileError, Options};
use gosub_diagnostic::emitter::{ColorMode, DiagnosticEmitter, TerminalEmitter};

static TRACING_INIT: Once = Once::new();

/// Initialize tracing for debug output.
///
/// Safe to call more than once. Enable with `RUST_LOG=gosub_codegen=debug`.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        if std::env::var("RUST_LOG").is_ok() {
            tracing_subscriber::registry()
                .with(
                    fmt::layer()
                        .with_writer(io::stderr)
                        .with_target(true)
                        .with_level(true),
                )
                .with(EnvFilter::from_default_env())
                .init();
        }
    });
}

pub const USAGE: &str = "\
Usage: gosub <input.go> [options]
       gosub help | version

Options:
  -o <path>           Write C to <path> instead of stdout
  --lib-dir <dir>     Directory holding imported modules (default: lib)
  --skip-builtin      Do not load the builtin module
  -h, --help          Show this message
  -V, --version       Show the version";

#[derive(Debug, PartialEq, Eq)]
pub enum Command {
    Help,
    Version,
    Compile(CompileArgs),
}

#[derive(Debug, PartialEq, Eq)]
pub struct CompileArgs {
    pub input: PathBuf,
    pub output: Option<PathBuf>,
    pub options: Options,
}

#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error("{0}")]
    Usage(String),
    #[error("cannot read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("cannot write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error(transparent)]
    Compile(#[from] CompileError),
}

/// Parses the arguments after the program name.
pub fn parse_args(args: &[String]) -> Result<Command, CliError> {
    let mut input = None;
    let mut output = None;
    let mut options = Options::new();

    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "help" | "-h" | "--help" => return Ok(Command::Help),
            "version" | "-V" | "--version" => return Ok(Command::Version),
            "-o" => {
                let Some(path) = iter.next() else {
                    return Err(CliError::Usage("-o needs a path".to_owned()));
                };
                output = Some(PathBuf::from(path));
            }
            "--lib-dir" => {
                let Some(dir) = iter.next() else {
                    return Err(CliError::Usage("--lib-dir needs a directory".to_owned()));
                };
                options = options.with_lib_dir(dir);
            }
            "--skip-builtin" => options = options.with_skip_builtin(true),
            flag if flag.starts_with('-') => {
                return Err(CliError::Usage(format!("unknown option `{flag}`")));
            }
            path => {
                if input.is_some() {
                    return Err(CliError::Usage(format!("unexpected argument `{path}`")));
                }
                input = Some(PathBuf::from(path));
            }
        }
    }

    match input {
        Some(input) => Ok(Command::Compile(CompileArgs {
            input,
            output,
            options,
        })),
        None => Err(CliError::Usage("missing input file".to_owned())),
    }
}

pub fn read_source(path: &Path) -> Result<String, CliError> {
    fs::read_to_string(path).map_err(|source| CliError::Read {
        path: path.to_path_buf(),
        source,
    })
}

/// Compiles `source`, the contents of `args.input`, and writes the C text.
pub fn compile(args: &CompileArgs, source: &str) -> Result<(), CliError> {
    let c = gosub_codegen::compile_to_c(source, &args.options)?;
    tracing::debug!(bytes = c.len(), "compiled");
    match &args.output {
        Some(path) => fs::write(path, c).map_err(|source| CliError::Write {
            path: path.clone(),
            source,
        }),
        None => {
            let mut stdout = io::stdout().lock();
            stdout
                .write_all(c.as_bytes())
                .map_err(|source| CliError::Write {
                    path: PathBuf::from("<stdout>"),
                    source,
                })
        }
    }
}

/// Path and text of the file an error in `module` points into.
///
/// `main` is the input file; other modules come from the lib directory.
pub fn module_source(
    module: &str,
    args: &CompileArgs,
    main_source: &str,
) -> Option<(PathBuf, String)> {
    if module == "main" {
        return Some((args.input.clone(), main_source.to_owned()));
    }
    let path = args.options.lib_dir.join(format!("{module}.go"));
    let text = fs::read_to_string(&path).ok()?;
    Some((path, text))
}

/// Renders `err` to stderr with a source snippet where one is available.
pub fn report(err: &CompileError, args: &CompileArgs, main_source: &str) {
    let is_tty = io::IsTerminal::is_terminal(&io::stderr());
    let emitter = TerminalEmitter::with_color_mode(io::stderr(), ColorMode::Auto, is_tty);
    let mut emitter = match module_source(&err.module, args, main_source) {
        Some((path, text)) => emitter
            .with_source(&text)
            .with_file_path(path.display().to_string()),
        None => emitter,
    };
    emitter.emit(&err.to_diagnostic());
    emitter.emit_summary(1);
    emitter.flush();
}

#[cfg(test)]
mod tests;
