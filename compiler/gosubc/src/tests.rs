#![expect(clippy::unwrap_used, reason = "Tests use unwrap for brevity")]

use super::*;
use pretty_assertions::assert_eq;

fn args(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| (*s).to_owned()).collect()
}

#[test]
fn test_parse_compile_args() {
    let command = parse_args(&args(&[
        "prog.go",
        "-o",
        "out.c",
        "--lib-dir",
        "mylib",
        "--skip-builtin",
    ]))
    .unwrap();
    assert_eq!(
        command,
        Command::Compile(CompileArgs {
            input: PathBuf::from("prog.go"),
            output: Some(PathBuf::from("out.c")),
            options: Options::new().with_lib_dir("mylib").with_skip_builtin(true),
        })
    );
}

#[test]
fn test_parse_help_and_version() {
    assert_eq!(parse_args(&args(&["--help"])).unwrap(), Command::Help);
    assert_eq!(parse_args(&args(&["x.go", "-V"])).unwrap(), Command::Version);
}

#[test]
fn test_parse_errors() {
    assert!(matches!(parse_args(&[]), Err(CliError::Usage(_))));
    assert!(matches!(
        parse_args(&args(&["a.go", "b.go"])),
        Err(CliError::Usage(_))
    ));
    assert!(matches!(
        parse_args(&args(&["a.go", "-o"])),
        Err(CliError::Usage(_))
    ));
    assert!(matches!(
        parse_args(&args(&["--frob"])),
        Err(CliError::Usage(msg)) if msg == "unknown option `--frob`"
    ));
}

#[test]
fn test_compile_writes_output_file() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("prog.go");
    let output = dir.path().join("prog.c");
    fs::write(&input, "package main\nvar x int\n").unwrap();

    let args = CompileArgs {
        input: input.clone(),
        output: Some(output.clone()),
        options: Options::new().with_skip_builtin(true),
    };
    let source = read_source(&input).unwrap();
    compile(&args, &source).unwrap();

    let c = fs::read_to_string(&output).unwrap();
    assert!(c.starts_with("#include <stdio.h>\n"));
    assert!(c.contains("P_int main__x;"));
}

#[test]
fn test_compile_error_points_into_lib_module() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("builtin.go"), "package builtin\nvar y = nope\n").unwrap();

    let args = CompileArgs {
        input: dir.path().join("prog.go"),
        output: None,
        options: Options::new().with_lib_dir(dir.path()),
    };
    let Err(CliError::Compile(err)) = compile(&args, "package main\n") else {
        panic!("expected a compile error");
    };
    assert_eq!(err.module, "builtin");

    let (path, text) = module_source(&err.module, &args, "package main\n").unwrap();
    assert_eq!(path, dir.path().join("builtin.go"));
    assert!(text.contains("nope"));
    assert!(module_source("missing", &args, "").is_none());
}

#[test]
fn test_missing_input() {
    let dir = tempfile::tempdir().unwrap();
    let err = read_source(&dir.path().join("absent.go")).unwrap_err();
    assert!(matches!(err, CliError::Read { .. }));
}
