//! Generating C++ replay functions from a catalog.
//!
//! For each function in a catalog, a `Retracer` emits a C++ function that
//! takes a recorded `Trace::Call`, decodes its arguments into locals, and
//! makes the call:
//!
//! ```text
//! static void retrace_glScissor(Trace::Call &call) {
//!     GLint x;
//!     x = (call.arg(0)).toSInt();
//!     ...
//!     glScissor(x, y, width, height);
//! }
//! ```
//!
//! After all the functions, it emits a table mapping each GL function name
//! to its replay function.
//!
//! Most entry points replay fine this way, but some need extra statements
//! around the call, or need an argument decoded differently. A `Retracer` is
//! parameterized by a `Hooks` implementation that gets a say at each of
//! those points. Every hook has a default that generates the plain code
//! shown above, so an implementation need only override what differs.

use tracing::{debug, info, warn};

use crate::api::{Argument, Function, Kind};
use crate::catalog::Catalog;
use crate::emit::Emitter;

/// Whether an argument extraction produced code that decodes the value.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Extraction {
    Decoded,
    /// We don't know how to decode this argument, so a call with it can't
    /// be replayed.
    Unsupported,
}

/// Points at which code generation can be customized for particular
/// functions.
pub trait Hooks {
    /// Emit statements at the very top of `function`'s body, before its
    /// arguments are decoded.
    fn prologue(&self, _function: &Function, _out: &mut Emitter) {}

    /// Emit the statement that makes the call, with anything that needs to
    /// surround it.
    fn call(&self, function: &Function, out: &mut Emitter) {
        call_statement(function, out);
    }

    /// Emit statements that decode `arg` from the recorded value `rvalue`
    /// into the local `lvalue`.
    fn extract_arg(
        &self,
        _function: &Function,
        arg: &Argument,
        lvalue: &str,
        rvalue: &str,
        out: &mut Emitter,
    ) -> Extraction {
        extract_value(arg, lvalue, rvalue, out)
    }
}

/// Hooks that generate plain replay code for every function.
#[derive(Copy, Clone, Debug, Default)]
pub struct Plain;

impl Hooks for Plain {}

/// Drives generation of replay code for a whole catalog.
pub struct Retracer<H> {
    hooks: H,
}

impl<H: Hooks> Retracer<H> {
    pub fn new(hooks: H) -> Retracer<H> {
        Retracer { hooks }
    }

    /// Emit replay functions for every function in `catalog`, in order,
    /// followed by the dispatch table.
    pub fn retrace_api(&self, catalog: &Catalog, out: &mut Emitter) {
        for function in catalog.functions() {
            self.retrace_function(function, out);
        }
        dispatch_table(catalog, out);
        info!(functions = catalog.len(), "generated replay functions");
    }

    /// Emit the replay function for `function`.
    pub fn retrace_function(&self, function: &Function, out: &mut Emitter) {
        debug!(function = function.name(), roles = ?function.roles(), "retracing");
        let depth = out.depth();
        out.open(&format!("static void retrace_{}(Trace::Call &call) {{", function.name()));
        self.retrace_function_body(function, out);
        out.close("}");
        debug_assert_eq!(out.depth(), depth, "unbalanced blocks in retrace_{}", function.name());
        out.blank();
    }

    fn retrace_function_body(&self, function: &Function, out: &mut Emitter) {
        self.hooks.prologue(function, out);

        if !function.sideeffects() {
            out.line("(void)call;");
            return;
        }

        let mut supported = true;
        for arg in function.args() {
            out.line(&format!("{} {};", arg.local_type(), arg.name()));
            let rvalue = format!("call.arg({})", arg.index());
            match self.hooks.extract_arg(function, arg, arg.name(), &rvalue, out) {
                Extraction::Decoded => {}
                Extraction::Unsupported => {
                    warn!(function = function.name(), arg = arg.name(), ctype = arg.ctype(),
                          "can't decode argument");
                    out.line(&format!("{} = 0; // FIXME", arg.name()));
                    supported = false;
                }
            }
        }

        if !supported {
            out.open("if (1) {");
            fail_call(function, out);
            out.close("}");
        }

        self.hooks.call(function, out);
    }
}

/// Emit the plain call of `function`, passing the decoded arguments.
pub fn call_statement(function: &Function, out: &mut Emitter) {
    let args: Vec<&str> = function.args().iter().map(Argument::name).collect();
    let call = format!("{}({})", function.name(), args.join(", "));
    match function.ret() {
        None => out.line(&format!("{};", call)),
        Some(ret) => {
            out.line(&format!("{} __result;", ret));
            out.line(&format!("__result = {};", call));
            out.line("(void)__result;");
        }
    }
}

/// Emit the plain decoding of `arg`, according to its kind.
pub fn extract_value(arg: &Argument, lvalue: &str, rvalue: &str, out: &mut Emitter) -> Extraction {
    match arg.kind() {
        Kind::Opaque => {
            out.line(&format!("{} = ({})({}).toPointer();", lvalue, arg.ctype(), rvalue));
            Extraction::Decoded
        }
        Kind::Array(elem) => extract_array(arg, elem, lvalue, rvalue, out),
        kind => extract_scalar(kind, lvalue, rvalue, out),
    }
}

fn extract_scalar(kind: &Kind, lvalue: &str, rvalue: &str, out: &mut Emitter) -> Extraction {
    let method = match kind {
        Kind::SInt | Kind::Enum => "toSInt",
        Kind::UInt | Kind::Bitmask => "toUInt",
        Kind::Float => "toFloat",
        Kind::Double => "toDouble",
        Kind::String => "toString",
        Kind::Opaque | Kind::Array(_) | Kind::Unknown => return Extraction::Unsupported,
    };
    out.line(&format!("{} = ({}).{}();", lvalue, rvalue, method));
    Extraction::Decoded
}

/// Copy a recorded array into a freshly allocated one, element by element.
/// A null pointer is recorded as something other than an array.
fn extract_array(arg: &Argument, elem: &Kind, lvalue: &str, rvalue: &str, out: &mut Emitter) -> Extraction {
    let array = format!("__a_{}", arg.name());
    let index = format!("__j_{}", arg.name());
    let length = format!("{}->values.size()", array);

    out.line(&format!("const Trace::Array *{} = dynamic_cast<const Trace::Array *>(&{});",
                      array, rvalue));
    out.open(&format!("if ({}) {{", array));
    out.line(&format!("{} = new {}[{}];", lvalue, arg.element_type(), length));
    out.open(&format!("for (size_t {i} = 0; {i} < {n}; ++{i}) {{", i = index, n = length));
    let extraction = extract_scalar(elem,
                                    &format!("{}[{}]", lvalue, index),
                                    &format!("*{}->values[{}]", array, index),
                                    out);
    out.close("}");
    out.reopen("} else {");
    out.line(&format!("{} = NULL;", lvalue));
    out.close("}");
    extraction
}

/// Emit statements that give up on replaying `function`.
pub fn fail_call(function: &Function, out: &mut Emitter) {
    out.line(&format!("std::cerr << \"warning: unsupported call {}\\n\";", function.name()));
    out.line("return;");
}

/// Emit the table mapping each function's name to its replay function.
fn dispatch_table(catalog: &Catalog, out: &mut Emitter) {
    out.open("const glretrace::Entry glretrace::gl_callbacks[] = {");
    for function in catalog.functions() {
        out.line(&format!("{{\"{name}\", &retrace_{name}}},", name = function.name()));
    }
    out.line("{NULL, NULL}");
    out.close("};");
}

#[cfg(test)]
fn plain(function: &Function) -> String {
    let mut out = Emitter::new();
    Retracer::new(Plain).retrace_function(function, &mut out);
    out.into_text()
}

#[test]
fn test_plain_function() {
    let function = Function::new("glScissor")
        .arg("x", "GLint")
        .arg("y", "GLint")
        .arg("width", "GLsizei")
        .arg("height", "GLsizei");

    assert_eq!(plain(&function), "\
static void retrace_glScissor(Trace::Call &call) {
    GLint x;
    x = (call.arg(0)).toSInt();
    GLint y;
    y = (call.arg(1)).toSInt();
    GLsizei width;
    width = (call.arg(2)).toSInt();
    GLsizei height;
    height = (call.arg(3)).toSInt();
    glScissor(x, y, width, height);
}

");
}

#[test]
fn test_return_value() {
    let function = Function::new("glCreateShader").returns("GLuint").arg("type", "GLenum");
    assert_eq!(plain(&function), "\
static void retrace_glCreateShader(Trace::Call &call) {
    GLenum type;
    type = (call.arg(0)).toSInt();
    GLuint __result;
    __result = glCreateShader(type);
    (void)__result;
}

");
}

#[test]
fn test_no_side_effects() {
    let function = Function::new("glGetError").returns("GLenum").without_side_effects();
    assert_eq!(plain(&function), "\
static void retrace_glGetError(Trace::Call &call) {
    (void)call;
}

");
}

#[test]
fn test_pointer_and_string() {
    let function = Function::new("glBindAttribLocation")
        .arg("data", "const GLvoid *")
        .arg("name", "const GLchar *");
    let text = plain(&function);
    assert!(text.contains("    const GLvoid * data;\n    data = (const GLvoid *)(call.arg(0)).toPointer();\n"));
    assert!(text.contains("    const GLchar * name;\n    name = (call.arg(1)).toString();\n"));
}

#[test]
fn test_array() {
    let function = Function::new("glLoadMatrixf").array_arg("m", "const GLfloat *");
    assert_eq!(plain(&function), "\
static void retrace_glLoadMatrixf(Trace::Call &call) {
    GLfloat * m;
    const Trace::Array *__a_m = dynamic_cast<const Trace::Array *>(&call.arg(0));
    if (__a_m) {
        m = new GLfloat[__a_m->values.size()];
        for (size_t __j_m = 0; __j_m < __a_m->values.size(); ++__j_m) {
            m[__j_m] = (*__a_m->values[__j_m]).toFloat();
        }
    } else {
        m = NULL;
    }
    glLoadMatrixf(m);
}

");
}

#[test]
fn test_arrays_leave_depth_balanced() {
    let function = Function::new("glMultiModeDrawArraysIBM")
        .array_arg("mode", "const GLenum *")
        .array_arg("first", "const GLint *")
        .array_arg("count", "const GLsizei *")
        .arg("primcount", "GLsizei");

    let mut out = Emitter::new();
    Retracer::new(Plain).retrace_function(&function, &mut out);
    assert_eq!(out.depth(), 0);

    let text = out.into_text();
    assert_eq!(text.matches("\n    } else {\n").count(), 3);
    assert!(text.ends_with("\n    GLsizei primcount;\n    primcount = (call.arg(3)).toSInt();\n    glMultiModeDrawArraysIBM(mode, first, count, primcount);\n}\n\n"));
}

#[test]
fn test_unsupported_argument() {
    let function = Function::new("glUseProgramObjectARB").arg("programObj", "GLhandleARB");
    assert_eq!(plain(&function), "\
static void retrace_glUseProgramObjectARB(Trace::Call &call) {
    GLhandleARB programObj;
    programObj = 0; // FIXME
    if (1) {
        std::cerr << \"warning: unsupported call glUseProgramObjectARB\\n\";
        return;
    }
    glUseProgramObjectARB(programObj);
}

");
}

#[test]
fn test_dispatch_table() {
    let catalog = Catalog::new(vec![Function::new("glFlush"), Function::new("glFinish")]).unwrap();
    let mut out = Emitter::new();
    Retracer::new(Plain).retrace_api(&catalog, &mut out);
    assert!(out.text().ends_with("\
const glretrace::Entry glretrace::gl_callbacks[] = {
    {\"glFlush\", &retrace_glFlush},
    {\"glFinish\", &retrace_glFinish},
    {NULL, NULL}
};
"));
    assert_eq!(out.depth(), 0);
}
