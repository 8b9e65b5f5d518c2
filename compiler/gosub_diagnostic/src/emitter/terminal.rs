//! Human-readable rendering, optionally colored with ANSI escapes.
//!
//! ```text
//! error[E2006]: `x` is already defined in this module
//!   --> prog.go:3:5
//!   |
//! 3 | var x int
//!   |     ^ redefined here
//!   ::: prog.go:2:5
//!   |
//! 2 | var x int
//!   |     - first defined here
//!   = note: in module `main`
//! ```

use std::io::Write;

use gosub_ir::Span;

use crate::span_utils::LineIndex;
use crate::{Diagnostic, Label};

use super::DiagnosticEmitter;

mod colors {
    pub const ERROR: &str = "\x1b[1;31m";
    pub const NOTE: &str = "\x1b[1;36m";
    pub const HELP: &str = "\x1b[1;32m";
    pub const BOLD: &str = "\x1b[1m";
    pub const CONTEXT: &str = "\x1b[1;34m";
    pub const RESET: &str = "\x1b[0m";
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ColorMode {
    /// Color only when writing to a TTY.
    #[default]
    Auto,
    Always,
    Never,
}

impl ColorMode {
    pub fn should_use_colors(self, is_tty: bool) -> bool {
        match self {
            ColorMode::Auto => is_tty,
            ColorMode::Always => true,
            ColorMode::Never => false,
        }
    }
}

struct SourceText {
    text: String,
    lines: LineIndex,
}

/// Writes diagnostics to `W`.
///
/// With [`with_source`](Self::with_source) each label gets a
/// `path:line:col` location and an underlined excerpt; without it labels
/// fall back to raw byte ranges.
pub struct TerminalEmitter<W: Write> {
    writer: W,
    colors: bool,
    source: Option<SourceText>,
    file_path: Option<String>,
}

impl<W: Write> TerminalEmitter<W> {
    pub fn with_color_mode(writer: W, mode: ColorMode, is_tty: bool) -> Self {
        TerminalEmitter {
            writer,
            colors: mode.should_use_colors(is_tty),
            source: None,
            file_path: None,
        }
    }

    #[must_use]
    pub fn with_source(mut self, source: &str) -> Self {
        self.source = Some(SourceText {
            text: source.to_owned(),
            lines: LineIndex::build(source),
        });
        self
    }

    #[must_use]
    pub fn with_file_path(mut self, path: impl Into<String>) -> Self {
        self.file_path = Some(path.into());
        self
    }

    fn paint(&mut self, text: &str, color: &str) {
        let _ = if self.colors {
            write!(self.writer, "{color}{text}{}", colors::RESET)
        } else {
            write!(self.writer, "{text}")
        };
    }

    /// Width of the line-number gutter: enough for the largest line any
    /// label points at.
    fn gutter(&self, labels: &[Label]) -> usize {
        let Some(source) = &self.source else {
            return 1;
        };
        labels
            .iter()
            .map(|label| source.lines.span_start(label.span).0)
            .max()
            .map_or(1, |line| line.to_string().len())
    }

    fn label(&mut self, label: &Label, gutter: usize) {
        let (arrow, mark, color) = if label.is_site() {
            ("-->", '^', colors::ERROR)
        } else {
            (":::", '-', colors::CONTEXT)
        };
        let pad = " ".repeat(gutter);

        let Some(source) = &self.source else {
            let _ = write!(
                self.writer,
                "{pad} {arrow} {}..{}: ",
                label.span.start, label.span.end
            );
            self.paint(&label.text, color);
            let _ = writeln!(self.writer);
            return;
        };

        let (line, col) = source.lines.span_start(label.span);
        let text = source.lines.line_text(&source.text, line).to_owned();
        let location = match &self.file_path {
            Some(path) => format!("{path}:{line}:{col}"),
            None => format!("{line}:{col}"),
        };
        let underline = underline(label.span, col, &text, mark);

        let _ = writeln!(self.writer, "{pad} {arrow} {location}");
        let _ = writeln!(self.writer, "{pad} |");
        let _ = writeln!(self.writer, "{line:>gutter$} | {text}");
        let _ = write!(self.writer, "{pad} | {}", " ".repeat(col as usize - 1));
        self.paint(&format!("{underline} {}", label.text), color);
        let _ = writeln!(self.writer);
    }

    fn trailer(&mut self, kind: &str, color: &str, text: &str, gutter: usize) {
        let _ = write!(self.writer, "{} = ", " ".repeat(gutter));
        self.paint(kind, color);
        let _ = writeln!(self.writer, ": {text}");
    }
}

/// Marks under the spanned part of `line`, at least one; a span running
/// past the end of the line stops there.
fn underline(span: Span, col: u32, line: &str, mark: char) -> String {
    let available = line.len().saturating_sub(col as usize - 1);
    let width = (span.len() as usize).min(available).max(1);
    mark.to_string().repeat(width)
}

impl<W: Write> DiagnosticEmitter for TerminalEmitter<W> {
    fn emit(&mut self, diagnostic: &Diagnostic) {
        self.paint("error", colors::ERROR);
        self.paint(&format!("[{}]", diagnostic.code), colors::BOLD);
        let _ = writeln!(self.writer, ": {}", diagnostic.message);

        let gutter = self.gutter(&diagnostic.labels);
        for label in &diagnostic.labels {
            self.label(label, gutter);
        }
        for note in &diagnostic.notes {
            self.trailer("note", colors::NOTE, note, gutter);
        }
        for help in &diagnostic.help {
            self.trailer("help", colors::HELP, help, gutter);
        }
        let _ = writeln!(self.writer);
    }

    fn flush(&mut self) {
        let _ = self.writer.flush();
    }

    fn emit_summary(&mut self, error_count: usize) {
        match error_count {
            0 => {}
            1 => {
                self.paint("error", colors::ERROR);
                let _ = writeln!(self.writer, ": aborting due to previous error");
            }
            n => {
                self.paint("error", colors::ERROR);
                let _ = writeln!(self.writer, ": aborting due to {n} previous errors");
            }
        }
    }
}

#[cfg(test)]
#[expect(clippy::unwrap_used, reason = "Tests use unwrap for brevity")]
mod tests;
