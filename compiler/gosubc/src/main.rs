//! gosub: compiles a Go subset to C.

use gosubc::{compile, init_tracing, parse_args, read_source, report, CliError, Command, USAGE};

fn main() {
    init_tracing();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let args = match parse_args(&args) {
        Ok(Command::Help) => {
            println!("{USAGE}");
            return;
        }
        Ok(Command::Version) => {
            println!("gosub {}", env!("CARGO_PKG_VERSION"));
            return;
        }
        Ok(Command::Compile(args)) => args,
        Err(err) => {
            eprintln!("error: {err}");
            eprintln!();
            eprintln!("{USAGE}");
            std::process::exit(1);
        }
    };

    let source = match read_source(&args.input) {
        Ok(source) => source,
        Err(err) => {
            eprintln!("error: {err}");
            std::process::exit(1);
        }
    };

    match compile(&args, &source) {
        Ok(()) => {}
        Err(CliError::Compile(err)) => {
            report(&err, &args, &source);
            std::process::exit(1);
        }
        Err(err) => {
            eprintln!("error: {err}");
            std::process::exit(1);
        }
    }
}
