use super::*;
use crate::{redefinition, ErrorCode};
use gosub_ir::Span;
use pretty_assertions::assert_eq;

const DUP: &str = "package main\nvar x int\nvar x int\n";

fn render(emitter: impl FnOnce(&mut Vec<u8>)) -> String {
    let mut output = Vec::new();
    emitter(&mut output);
    String::from_utf8(output).unwrap()
}

#[test]
fn test_excerpt_with_context_label() {
    let text = render(|out| {
        let mut emitter = TerminalEmitter::with_color_mode(out, ColorMode::Never, false)
            .with_source(DUP)
            .with_file_path("dup.go");
        emitter.emit(
            &redefinition(Span::new(27, 28), "x", Span::new(17, 18))
                .with_note("in module `main`"),
        );
    });

    assert_eq!(
        text,
        "error[E2006]: `x` is already defined in this module\n\
         \x20 --> dup.go:3:5\n\
         \x20 |\n\
         3 | var x int\n\
         \x20 |     ^ redefined here\n\
         \x20 ::: dup.go:2:5\n\
         \x20 |\n\
         2 | var x int\n\
         \x20 |     - first defined here\n\
         \x20 = note: in module `main`\n\n"
    );
}

#[test]
fn test_byte_ranges_without_source() {
    let text = render(|out| {
        let mut emitter = TerminalEmitter::with_color_mode(out, ColorMode::Never, false);
        emitter.emit(
            &Diagnostic::error(ErrorCode::E2012)
                .with_message("constant `k` cannot declare a type")
                .with_label(Span::new(6, 9), "declared here")
                .with_suggestion("remove the type"),
        );
    });

    assert_eq!(
        text,
        "error[E2012]: constant `k` cannot declare a type\n  \
         --> 6..9: declared here\n  \
         = help: remove the type\n\n"
    );
}

#[test]
fn test_underline_stops_at_line_end() {
    let source = "func f() {\n  return x\n";
    let text = render(|out| {
        let mut emitter = TerminalEmitter::with_color_mode(out, ColorMode::Never, false)
            .with_source(source);
        emitter.emit(&Diagnostic::error(ErrorCode::E1003).with_label(Span::new(9, 40), "open"));
    });
    assert!(text.contains("--> 1:10\n"), "{text}");
    assert!(text.contains("  |          ^ open\n"), "{text}");
}

#[test]
fn test_wide_gutter_aligns_bars() {
    let source = "\n".repeat(11) + "var y = nope\n";
    let text = render(|out| {
        let mut emitter = TerminalEmitter::with_color_mode(out, ColorMode::Never, false)
            .with_source(&source);
        emitter.emit(&crate::unknown_identifier(Span::new(19, 23), "nope"));
    });
    assert!(text.contains("\n12 | var y = nope\n"), "{text}");
    assert!(text.contains("\n   |         ^^^^ "), "{text}");
}

#[test]
fn test_colors_follow_mode() {
    let diag = Diagnostic::error(ErrorCode::E2009).with_label(Span::new(0, 1), "here");
    let colored = render(|out| {
        TerminalEmitter::with_color_mode(out, ColorMode::Auto, true).emit(&diag);
    });
    let plain = render(|out| {
        TerminalEmitter::with_color_mode(out, ColorMode::Auto, false).emit(&diag);
    });
    assert!(colored.contains("\x1b[1;31merror\x1b[0m"));
    assert!(!plain.contains("\x1b["));
    assert!(plain.starts_with("error[E2009]: "));
}

#[test]
fn test_summary() {
    let summary = |errors| {
        render(|out| {
            TerminalEmitter::with_color_mode(out, ColorMode::Never, false).emit_summary(errors);
        })
    };
    assert_eq!(summary(1), "error: aborting due to previous error\n");
    assert_eq!(summary(3), "error: aborting due to 3 previous errors\n");
    assert_eq!(summary(0), "");
}
