use docopt::Docopt;
use serde::Deserialize;

use gl_retrace_gen::{classify, logging, Catalog, Roles};

static USAGE: &str = "
Show the replay roles of GL functions.

For each name, print the roles that affect how its calls are replayed:
whether it sets an array pointer, draws, binds a framebuffer, and so on.
Names with no special roles print `-`.

Usage:
  gl-roles <name>...
  gl-roles --all
  gl-roles (-h | --help)

Options:
  --all       Show every function in the built-in GL catalog.
  -h, --help  Show this message.
";

#[derive(Debug, Deserialize)]
struct Args {
    arg_name: Vec<String>,
    flag_all: bool,
}

fn describe(roles: Roles) -> String {
    if roles.is_empty() {
        return "-".to_owned();
    }
    let names: Vec<&str> = roles.iter_names().map(|(name, _)| name).collect();
    names.join(" ")
}

fn main() -> gl_retrace_gen::Result<()> {
    let args: Args = Docopt::new(USAGE)
        .and_then(|d| d.deserialize())
        .unwrap_or_else(|e| e.exit());

    logging::init();

    if args.flag_all {
        let catalog = Catalog::gl()?;
        for function in catalog.functions() {
            println!("{:36} {}", function.name(), describe(function.roles()));
        }
    } else {
        for name in &args.arg_name {
            println!("{:36} {}", name, describe(classify(name)));
        }
    }

    Ok(())
}
