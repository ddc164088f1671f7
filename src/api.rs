//! A representation for the GL entry points we generate replay code for.
//!
//! A `Function` is a name, an optional return type, and a list of
//! `Argument`s. Each argument carries its C type as written in the catalog,
//! and a `Kind` derived from it that says how a recorded value of that type
//! is decoded at replay time.

use crate::roles::{self, Roles};

/// How an argument's recorded value is turned back into a C value.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Kind {
    /// Signed integer types: `GLint`, `GLsizei`, and friends.
    SInt,
    /// Unsigned integer types, including `GLboolean`.
    UInt,
    /// `GLenum`.
    Enum,
    /// `GLbitfield`.
    Bitmask,
    /// `GLfloat` and `GLclampf`.
    Float,
    /// `GLdouble` and `GLclampd`.
    Double,
    /// A NUL-terminated string passed to GL.
    String,
    /// Any other pointer. Replay passes along whatever address was recorded.
    Opaque,
    /// A pointer to an array of scalars of the given kind.
    Array(Box<Kind>),
    /// A type we don't know how to decode.
    Unknown,
}

impl Kind {
    /// Determine the kind of an argument whose C type is `ctype`. If `array`
    /// is set, a pointer type is taken to point to an array of its pointee.
    pub fn from_ctype(ctype: &str, array: bool) -> Kind {
        let ctype = normalize(ctype);
        let pointee = match ctype.strip_suffix('*') {
            Some(pointee) => pointee.trim_end(),
            None => return scalar_kind(&ctype).unwrap_or(Kind::Unknown),
        };

        let is_const = pointee.starts_with("const ");
        let base = strip_const(pointee);

        if array {
            return match scalar_kind(base) {
                Some(elem) => Kind::Array(Box::new(elem)),
                None => Kind::Unknown,
            };
        }

        match base {
            "GLchar" | "GLcharARB" | "char" if is_const => Kind::String,
            _ => Kind::Opaque,
        }
    }
}

fn scalar_kind(ctype: &str) -> Option<Kind> {
    Some(match ctype {
        "GLbyte" | "GLshort" | "GLint" | "GLsizei" | "GLintptr" | "GLintptrARB" | "GLsizeiptr"
        | "GLsizeiptrARB" | "GLint64" | "GLint64EXT" | "int" => Kind::SInt,
        "GLubyte" | "GLushort" | "GLuint" | "GLuint64" | "GLuint64EXT" | "GLboolean"
        | "unsigned" => Kind::UInt,
        "GLenum" => Kind::Enum,
        "GLbitfield" => Kind::Bitmask,
        "GLfloat" | "GLclampf" => Kind::Float,
        "GLdouble" | "GLclampd" => Kind::Double,
        _ => return None,
    })
}

/// Collapse runs of whitespace, and make sure a trailing `*` stands alone.
fn normalize(ctype: &str) -> String {
    let words: Vec<&str> = ctype.split_whitespace().collect();
    let joined = words.join(" ");
    match joined.strip_suffix('*') {
        Some(pointee) => format!("{} *", pointee.trim_end()),
        None => joined,
    }
}

fn strip_const(ctype: &str) -> &str {
    ctype.strip_prefix("const ").unwrap_or(ctype).trim()
}

/// An argument of a `Function`.
#[derive(Clone, Debug)]
pub struct Argument {
    name: String,
    index: usize,
    ctype: String,
    kind: Kind,
}

impl Argument {
    pub fn new(index: usize, name: &str, ctype: &str, array: bool) -> Argument {
        let ctype = normalize(ctype);
        Argument {
            name: name.to_owned(),
            index,
            kind: Kind::from_ctype(&ctype, array),
            ctype,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// This argument's zero-based position in its function's argument list.
    pub fn index(&self) -> usize {
        self.index
    }

    /// The C type of this argument, as the catalog spelled it.
    pub fn ctype(&self) -> &str {
        &self.ctype
    }

    pub fn kind(&self) -> &Kind {
        &self.kind
    }

    /// The type of the local variable that holds this argument during
    /// replay.
    ///
    /// This is just `ctype`, except for arrays: we allocate those ourselves,
    /// so the variable points to non-`const` elements.
    pub fn local_type(&self) -> String {
        match self.kind {
            Kind::Array(_) => format!("{} *", self.element_type()),
            _ => self.ctype.clone(),
        }
    }

    /// For a pointer argument, the type it points to, without `const`.
    pub fn element_type(&self) -> &str {
        match self.ctype.strip_suffix('*') {
            Some(pointee) => strip_const(pointee),
            None => &self.ctype,
        }
    }
}

/// A GL entry point.
#[derive(Clone, Debug)]
pub struct Function {
    name: String,
    ret: Option<String>,
    args: Vec<Argument>,
    sideeffects: bool,
    roles: Roles,
}

impl Function {
    /// Create a function named `name` that takes no arguments, returns
    /// nothing, and has side effects. Use the builder methods below to fill
    /// in the rest.
    pub fn new(name: &str) -> Function {
        Function {
            name: name.to_owned(),
            ret: None,
            args: Vec::new(),
            sideeffects: true,
            roles: roles::classify(name),
        }
    }

    /// Set the return type. `void` means no return value.
    pub fn returns(mut self, ctype: &str) -> Function {
        let ctype = normalize(ctype);
        self.ret = if ctype == "void" { None } else { Some(ctype) };
        self
    }

    /// Append an argument.
    pub fn arg(self, name: &str, ctype: &str) -> Function {
        self.push_arg(name, ctype, false)
    }

    /// Append an argument that points to an array of its pointee type.
    pub fn array_arg(self, name: &str, ctype: &str) -> Function {
        self.push_arg(name, ctype, true)
    }

    fn push_arg(mut self, name: &str, ctype: &str, array: bool) -> Function {
        let index = self.args.len();
        self.args.push(Argument::new(index, name, ctype, array));
        self
    }

    /// Mark this function as having no side effects worth replaying.
    pub fn without_side_effects(mut self) -> Function {
        self.sideeffects = false;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn ret(&self) -> Option<&str> {
        self.ret.as_deref()
    }

    pub fn args(&self) -> &[Argument] {
        &self.args
    }

    pub fn sideeffects(&self) -> bool {
        self.sideeffects
    }

    pub fn roles(&self) -> Roles {
        self.roles
    }
}

#[test]
fn test_kind_from_ctype() {
    assert_eq!(Kind::from_ctype("GLint", false), Kind::SInt);
    assert_eq!(Kind::from_ctype("GLsizei", false), Kind::SInt);
    assert_eq!(Kind::from_ctype("GLboolean", false), Kind::UInt);
    assert_eq!(Kind::from_ctype("GLenum", false), Kind::Enum);
    assert_eq!(Kind::from_ctype("GLbitfield", false), Kind::Bitmask);
    assert_eq!(Kind::from_ctype("GLclampf", false), Kind::Float);
    assert_eq!(Kind::from_ctype("GLdouble", false), Kind::Double);
    assert_eq!(Kind::from_ctype("GLhandleARB", false), Kind::Unknown);

    assert_eq!(Kind::from_ctype("const GLvoid *", false), Kind::Opaque);
    assert_eq!(Kind::from_ctype("const GLvoid*", false), Kind::Opaque);
    assert_eq!(Kind::from_ctype("GLchar *", false), Kind::Opaque);
    assert_eq!(Kind::from_ctype("const GLchar *", false), Kind::String);
    assert_eq!(Kind::from_ctype("const  GLcharARB  *", false), Kind::String);

    assert_eq!(Kind::from_ctype("const GLfloat *", true), Kind::Array(Box::new(Kind::Float)));
    assert_eq!(Kind::from_ctype("GLuint *", true), Kind::Array(Box::new(Kind::UInt)));
    assert_eq!(Kind::from_ctype("const GLvoid *", true), Kind::Unknown);
    assert_eq!(Kind::from_ctype("GLfloat", true), Kind::Float);
}

#[test]
fn test_local_type() {
    let arg = Argument::new(2, "value", "const GLfloat*", true);
    assert_eq!(arg.ctype(), "const GLfloat *");
    assert_eq!(arg.element_type(), "GLfloat");
    assert_eq!(arg.local_type(), "GLfloat *");

    let arg = Argument::new(0, "pointer", "const GLvoid *", false);
    assert_eq!(arg.local_type(), "const GLvoid *");
}

#[test]
fn test_function_builder() {
    let function = Function::new("glDrawElements")
        .arg("mode", "GLenum")
        .arg("count", "GLsizei")
        .arg("type", "GLenum")
        .arg("indices", "const GLvoid *");

    assert_eq!(function.roles(), Roles::DRAW_ELEMENTS);
    assert!(function.sideeffects());
    assert_eq!(function.ret(), None);

    let indices: Vec<usize> = function.args().iter().map(Argument::index).collect();
    assert_eq!(indices, [0, 1, 2, 3]);
    assert_eq!(function.args()[3].name(), "indices");

    let function = Function::new("glGetError").returns("GLenum").without_side_effects();
    assert_eq!(function.ret(), Some("GLenum"));
    assert!(!function.sideeffects());
    assert_eq!(function.roles(), Roles::empty());

    assert_eq!(Function::new("glFinish").returns("void").ret(), None);
}
