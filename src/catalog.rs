//! Catalogs of GL functions.
//!
//! A catalog is a TOML file with one `[[function]]` table per entry point:
//!
//! ```toml
//! [[function]]
//! name = "glVertexPointer"
//! args = [
//!     { name = "size", type = "GLint" },
//!     { name = "type", type = "GLenum" },
//!     { name = "stride", type = "GLsizei" },
//!     { name = "pointer", type = "const GLvoid *" },
//! ]
//!
//! [[function]]
//! name = "glGetError"
//! ret = "GLenum"
//! sideeffects = false
//! ```
//!
//! `ret` defaults to `void`, `args` to none, and `sideeffects` to `true`.
//! An argument with `array = true` points to an array of its pointee type.
//!
//! The order of functions in the file is the order in which code is
//! generated for them.

use serde::Deserialize;
use std::collections::HashSet;
use std::fs;
use std::path::Path;

use crate::api::Function;
use crate::error::{Error, Result};

/// The GL catalog built into this crate.
pub static GL_CATALOG: &str = include_str!("../catalog/gl.toml");

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct CatalogFile {
    #[serde(default, rename = "function")]
    functions: Vec<FunctionEntry>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct FunctionEntry {
    name: String,
    #[serde(default)]
    ret: Option<String>,
    #[serde(default)]
    args: Vec<ArgEntry>,
    #[serde(default = "default_sideeffects")]
    sideeffects: bool,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ArgEntry {
    name: String,
    #[serde(rename = "type")]
    ctype: String,
    #[serde(default)]
    array: bool,
}

fn default_sideeffects() -> bool {
    true
}

/// An ordered list of GL functions.
#[derive(Debug)]
pub struct Catalog {
    functions: Vec<Function>,
}

impl Catalog {
    /// Build a catalog from a list of functions, checking that names are
    /// unique.
    pub fn new(functions: Vec<Function>) -> Result<Catalog> {
        let mut seen = HashSet::new();
        for function in &functions {
            if !seen.insert(function.name()) {
                return Err(Error::DuplicateFunction(function.name().to_owned()));
            }

            let mut args = HashSet::new();
            for arg in function.args() {
                if !args.insert(arg.name()) {
                    return Err(Error::DuplicateArgument {
                        function: function.name().to_owned(),
                        argument: arg.name().to_owned(),
                    });
                }
            }
        }

        Ok(Catalog { functions })
    }

    /// Parse a catalog from TOML text.
    pub fn from_toml(text: &str) -> Result<Catalog> {
        let file: CatalogFile = toml::from_str(text)?;

        let functions = file
            .functions
            .into_iter()
            .map(|entry| {
                let mut function = Function::new(&entry.name);
                if let Some(ret) = &entry.ret {
                    function = function.returns(ret);
                }
                for arg in &entry.args {
                    function = if arg.array {
                        function.array_arg(&arg.name, &arg.ctype)
                    } else {
                        function.arg(&arg.name, &arg.ctype)
                    };
                }
                if !entry.sideeffects {
                    function = function.without_side_effects();
                }
                function
            })
            .collect();

        Catalog::new(functions)
    }

    /// Read a catalog from the TOML file at `path`.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Catalog> {
        let text = fs::read_to_string(path)?;
        Catalog::from_toml(&text)
    }

    /// The GL catalog built into this crate.
    pub fn gl() -> Result<Catalog> {
        Catalog::from_toml(GL_CATALOG)
    }

    pub fn functions(&self) -> &[Function] {
        &self.functions
    }

    pub fn get(&self, name: &str) -> Option<&Function> {
        self.functions.iter().find(|function| function.name() == name)
    }

    pub fn len(&self) -> usize {
        self.functions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.functions.is_empty()
    }
}

#[test]
fn test_from_toml() {
    let catalog = Catalog::from_toml(r#"
        [[function]]
        name = "glUniform4fv"
        args = [
            { name = "location", type = "GLint" },
            { name = "count", type = "GLsizei" },
            { name = "value", type = "const GLfloat *", array = true },
        ]

        [[function]]
        name = "glGetError"
        ret = "GLenum"
        sideeffects = false
    "#).unwrap();

    assert_eq!(catalog.len(), 2);
    let names: Vec<&str> = catalog.functions().iter().map(Function::name).collect();
    assert_eq!(names, ["glUniform4fv", "glGetError"]);

    let uniform = catalog.get("glUniform4fv").unwrap();
    assert_eq!(uniform.args().len(), 3);
    assert_eq!(uniform.args()[2].local_type(), "GLfloat *");
    assert!(uniform.sideeffects());
    assert_eq!(uniform.ret(), None);

    let get_error = catalog.get("glGetError").unwrap();
    assert_eq!(get_error.ret(), Some("GLenum"));
    assert!(!get_error.sideeffects());
    assert!(get_error.args().is_empty());

    assert!(catalog.get("glFinish").is_none());
}

#[test]
fn test_duplicates_rejected() {
    let duplicate_function = r#"
        [[function]]
        name = "glFlush"
        [[function]]
        name = "glFlush"
    "#;
    match Catalog::from_toml(duplicate_function) {
        Err(Error::DuplicateFunction(name)) => assert_eq!(name, "glFlush"),
        other => panic!("unexpected result: {:?}", other),
    }

    let duplicate_argument = r#"
        [[function]]
        name = "glScissor"
        args = [{ name = "x", type = "GLint" }, { name = "x", type = "GLint" }]
    "#;
    match Catalog::from_toml(duplicate_argument) {
        Err(Error::DuplicateArgument { function, argument }) => {
            assert_eq!(function, "glScissor");
            assert_eq!(argument, "x");
        }
        other => panic!("unexpected result: {:?}", other),
    }
}

#[test]
fn test_malformed() {
    assert!(matches!(Catalog::from_toml("[[function]]\nnom = 1\n"), Err(Error::Catalog(_))));
    assert!(Catalog::from_toml("").unwrap().is_empty());
}

#[test]
fn test_embedded_catalog() {
    use crate::roles;

    let catalog = Catalog::gl().unwrap();
    for table in [
        roles::ARRAY_POINTER_FUNCTIONS,
        roles::DRAW_ARRAY_FUNCTIONS,
        roles::DRAW_ELEMENTS_FUNCTIONS,
        roles::BIND_FRAMEBUFFER_FUNCTIONS,
        roles::MISC_DRAW_FUNCTIONS,
    ].iter() {
        for name in table.iter() {
            assert!(catalog.get(name).is_some(), "embedded catalog lacks {}", name);
        }
    }
    for name in [roles::VIEWPORT, roles::BEGIN, roles::END].iter() {
        assert!(catalog.get(name).is_some(), "embedded catalog lacks {}", name);
    }
}
