//! Minimal read loop: type Go code line by line, and every complete unit
//! is parsed and summarized.
//!
//! Enable logging with `RUST_LOG=replbuf=debug`.
#![allow(missing_docs)]

use std::io::{self, BufRead, Write};

use replbuf::{Buffer, BufferError, Construct, TopLevelParser, syntax::Stmt};

fn init_tracing() {
    use tracing_subscriber::{EnvFilter, fmt, prelude::*};

    if std::env::var("RUST_LOG").is_ok() {
        tracing_subscriber::registry()
            .with(fmt::layer().with_target(true).with_level(true))
            .with(EnvFilter::from_default_env())
            .init();
    }
}

fn describe(construct: &Construct) -> String {
    match construct {
        Construct::Imports(specs) => format!("{} import(s)", specs.len()),
        Construct::Func(func) if func.recv.is_some() => format!("method {}", func.name.name),
        Construct::Func(func) => format!("func {}", func.name.name),
        Construct::Type(spec) => format!("type {}", spec.name.name),
        Construct::Value { keyword, spec } => {
            let names: Vec<_> = spec.names.iter().map(|n| n.name.as_str()).collect();
            format!("{keyword} {}", names.join(", "))
        }
        Construct::Stmt(Stmt::Expr(_)) => "expression".to_string(),
        Construct::Stmt(_) => "statement".to_string(),
    }
}

fn main() -> io::Result<()> {
    init_tracing();

    let parser = TopLevelParser::default();
    let mut buf = Buffer::new();
    let stdin = io::stdin();
    let mut stdout = io::stdout();

    loop {
        write!(stdout, "{}", if buf.is_empty() { ">>> " } else { "... " })?;
        stdout.flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }

        let mut status = buf.append(&line).map(drop);
        while buf.is_ready() || status.is_err() {
            match &status {
                Err(BufferError::ExtraInput { .. }) | Ok(()) => {}
                Err(err) => writeln!(stdout, "error: {err}")?,
            }
            if buf.is_ready() {
                match parser.parse_ready(&buf) {
                    Ok(construct) => writeln!(stdout, "{}", describe(&construct))?,
                    Err(err) => writeln!(stdout, "{err}")?,
                }
            }
            if matches!(status, Err(BufferError::TooLarge { .. })) {
                break;
            }
            status = buf.reset();
        }
    }
    Ok(())
}
