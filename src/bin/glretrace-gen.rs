use docopt::Docopt;
use serde::Deserialize;
use std::io::prelude::*;
use std::{fs, io};

use gl_retrace_gen::{logging, Catalog};

static USAGE: &str = "
Generate GL replay code.

Write the C++ source for replaying recorded GL calls. Each entry point in the
catalog gets a function that decodes a recorded call and makes it again,
followed by a table of all of them.

Usage:
  glretrace-gen [--catalog=<path>] [--output=<path>]
  glretrace-gen (-h | --help)

Options:
  --catalog=<path>  Read entry points from this TOML catalog, instead of
                    using the built-in GL catalog.
  --output=<path>   Write to this file instead of standard output.
  -h, --help        Show this message.
";

#[derive(Debug, Deserialize)]
struct Args {
    flag_catalog: Option<String>,
    flag_output: Option<String>,
}

fn main() -> gl_retrace_gen::Result<()> {
    let args: Args = Docopt::new(USAGE)
        .and_then(|d| d.deserialize())
        .unwrap_or_else(|e| e.exit());

    logging::init();

    let catalog = match &args.flag_catalog {
        Some(path) => Catalog::open(path)?,
        None => Catalog::gl()?,
    };

    let text = gl_retrace_gen::generate(&catalog);

    match &args.flag_output {
        Some(path) => fs::write(path, text)?,
        None => {
            let stdout = io::stdout();
            let mut stdout = stdout.lock();
            stdout.write_all(text.as_bytes())?;
            stdout.flush()?;
        }
    }

    Ok(())
}
