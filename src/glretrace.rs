//! Replay code generation specialized for GL.
//!
//! On top of the plain decode-and-call code that `retrace` generates, GL
//! replay needs:
//!
//! - Recordings made before buffer objects were required (format version
//!   0) can contain vertex and index pointers into the recorded process's
//!   memory. Those calls can only be replayed if a buffer object is bound
//!   to interpret the pointer as an offset into.
//!
//! - The window has to grow to fit any viewport the application sets.
//!
//! - Changing framebuffers takes a snapshot, and draws are counted, so the
//!   replayer knows when there's something to capture.
//!
//! - `glGetError` is checked after every call, except inside
//!   `glBegin`/`glEnd`, where calling it is itself an error.
//!
//! - Vertex and index pointers are passed as the recorded blobs, and
//!   uniform calls look up the current program their location belongs to.
//!
//! The generated code refers to state in the `glretrace` namespace, declared
//! in `glretrace.hpp`.

use tracing::trace;

use crate::api::{Argument, Function};
use crate::catalog::Catalog;
use crate::emit::Emitter;
use crate::retrace::{self, Extraction, Hooks, Retracer};
use crate::roles::{self, Roles};

/// The text that starts every generated GL replay source file.
pub const HEADER: &str = "
#include \"glproc.hpp\"
#include \"glretrace.hpp\"



";

/// `Hooks` for replaying GL calls.
#[derive(Copy, Clone, Debug, Default)]
pub struct GlRetrace;

/// Generate the complete GL replay source file for `catalog`.
pub fn generate(catalog: &Catalog) -> String {
    let mut out = Emitter::new();
    out.raw(HEADER);
    Retracer::new(GlRetrace).retrace_api(catalog, &mut out);
    out.into_text()
}

impl Hooks for GlRetrace {
    fn prologue(&self, function: &Function, out: &mut Emitter) {
        let roles = function.roles();
        let vertex_arrays = roles.reads_vertex_arrays();
        let element_array = roles.reads_element_array();
        if !vertex_arrays && !element_array {
            return;
        }

        out.open("if (glretrace::parser.version < 1) {");
        if vertex_arrays {
            require_buffer(function, "__array_buffer", "GL_ARRAY_BUFFER_BINDING", out);
        }
        if element_array {
            require_buffer(function, "__element_array_buffer", "GL_ELEMENT_ARRAY_BUFFER_BINDING", out);
        }
        out.close("}");
    }

    fn call(&self, function: &Function, out: &mut Emitter) {
        let name = function.name();
        let roles = function.roles();

        if name == roles::VIEWPORT {
            grow_window(out);
        }

        // Errors can be checked again once the primitive is closed, starting
        // with the `glEnd` itself.
        if name == roles::END {
            out.line("glretrace::insideGlBeginEnd = false;");
        }

        retrace::call_statement(function, out);

        if roles.contains(Roles::BIND_FRAMEBUFFER) {
            snapshot_on_framebuffer_change(out);
        }

        if roles.is_draw() {
            out.line("glretrace::unsaved_draws++;");
        }

        if name == roles::BEGIN {
            out.line("glretrace::insideGlBeginEnd = true;");
        } else {
            // glGetError is not allowed inside glBegin/glEnd
            out.line("glretrace::checkGlError();");
        }
    }

    fn extract_arg(
        &self,
        function: &Function,
        arg: &Argument,
        lvalue: &str,
        rvalue: &str,
        out: &mut Emitter,
    ) -> Extraction {
        let roles = function.roles();

        if (roles.contains(Roles::ARRAY_POINTER) && arg.name() == "pointer")
            || (roles.contains(Roles::DRAW_ELEMENTS) && arg.name() == "indices")
        {
            trace!(function = function.name(), arg = arg.name(), "passing blob");
            out.line(&format!("{} = ({}).blob();", lvalue, rvalue));
            return Extraction::Decoded;
        }

        if function.name().starts_with(roles::UNIFORM_PREFIX)
            && arg.index() == 0
            && arg.name() == "location"
        {
            trace!(function = function.name(), "looking up current program");
            out.line("GLint program = -1;");
            out.line("glGetIntegerv(GL_CURRENT_PROGRAM, &program);");
        }

        retrace::extract_value(arg, lvalue, rvalue, out)
    }
}

/// Give up on `function` unless some buffer is bound to `binding`.
fn require_buffer(function: &Function, local: &str, binding: &str, out: &mut Emitter) {
    out.line(&format!("GLint {} = 0;", local));
    out.line(&format!("glGetIntegerv({}, &{});", binding, local));
    out.open(&format!("if (!{}) {{", local));
    retrace::fail_call(function, out);
    out.close("}");
}

/// Grow the window to contain the viewport, resizing the drawable at most
/// once.
fn grow_window(out: &mut Emitter) {
    out.line("bool reshape_window = false;");
    out.open("if (x + width > glretrace::window_width) {");
    out.line("glretrace::window_width = x + width;");
    out.line("reshape_window = true;");
    out.close("}");
    out.open("if (y + height > glretrace::window_height) {");
    out.line("glretrace::window_height = y + height;");
    out.line("reshape_window = true;");
    out.close("}");
    out.open("if (reshape_window) {");
    out.line("// XXX: does not always work");
    out.line("glretrace::drawable->resize(glretrace::window_width, glretrace::window_height);");
    out.line("reshape_window = false;");
    out.close("}");
}

fn snapshot_on_framebuffer_change(out: &mut Emitter) {
    out.line("GLint __new_fb = 0;");
    out.line("glGetIntegerv(GL_FRAMEBUFFER_BINDING_EXT, &__new_fb);");
    out.open("if (__new_fb != glretrace::fb) {");
    out.line("glretrace::snapshot(call.no);");
    out.line("glretrace::fb = __new_fb;");
    out.close("}");
}

#[cfg(test)]
fn retrace_one(function: &Function) -> String {
    let mut out = Emitter::new();
    Retracer::new(GlRetrace).retrace_function(function, &mut out);
    out.into_text()
}

#[test]
fn test_vertex_pointer() {
    let function = Function::new("glVertexPointer")
        .arg("size", "GLint")
        .arg("type", "GLenum")
        .arg("stride", "GLsizei")
        .arg("pointer", "const GLvoid *");

    assert_eq!(retrace_one(&function), "\
static void retrace_glVertexPointer(Trace::Call &call) {
    if (glretrace::parser.version < 1) {
        GLint __array_buffer = 0;
        glGetIntegerv(GL_ARRAY_BUFFER_BINDING, &__array_buffer);
        if (!__array_buffer) {
            std::cerr << \"warning: unsupported call glVertexPointer\\n\";
            return;
        }
    }
    GLint size;
    size = (call.arg(0)).toSInt();
    GLenum type;
    type = (call.arg(1)).toSInt();
    GLsizei stride;
    stride = (call.arg(2)).toSInt();
    const GLvoid * pointer;
    pointer = (call.arg(3)).blob();
    glVertexPointer(size, type, stride, pointer);
    glretrace::checkGlError();
}

");
}

#[test]
fn test_draw_elements() {
    let function = Function::new("glDrawElements")
        .arg("mode", "GLenum")
        .arg("count", "GLsizei")
        .arg("type", "GLenum")
        .arg("indices", "const GLvoid *");

    assert_eq!(retrace_one(&function), "\
static void retrace_glDrawElements(Trace::Call &call) {
    if (glretrace::parser.version < 1) {
        GLint __element_array_buffer = 0;
        glGetIntegerv(GL_ELEMENT_ARRAY_BUFFER_BINDING, &__element_array_buffer);
        if (!__element_array_buffer) {
            std::cerr << \"warning: unsupported call glDrawElements\\n\";
            return;
        }
    }
    GLenum mode;
    mode = (call.arg(0)).toSInt();
    GLsizei count;
    count = (call.arg(1)).toSInt();
    GLenum type;
    type = (call.arg(2)).toSInt();
    const GLvoid * indices;
    indices = (call.arg(3)).blob();
    glDrawElements(mode, count, type, indices);
    glretrace::unsaved_draws++;
    glretrace::checkGlError();
}

");
}

#[test]
fn test_draw_arrays() {
    let function = Function::new("glDrawArrays")
        .arg("mode", "GLenum")
        .arg("first", "GLint")
        .arg("count", "GLsizei");
    let text = retrace_one(&function);

    assert!(text.contains("__array_buffer"));
    assert!(!text.contains("__element_array_buffer"));
    assert_eq!(text.matches("glretrace::unsaved_draws++;").count(), 1);
    assert_eq!(text.matches("glretrace::checkGlError();").count(), 1);
    assert!(!text.contains(".blob()"));
}

#[test]
fn test_viewport() {
    let function = Function::new("glViewport")
        .arg("x", "GLint")
        .arg("y", "GLint")
        .arg("width", "GLsizei")
        .arg("height", "GLsizei");
    let text = retrace_one(&function);

    assert_eq!(text.matches("glretrace::drawable->resize(").count(), 1);
    let resize = text.find("if (reshape_window) {").unwrap();
    assert!(resize > text.find("if (y + height > glretrace::window_height) {").unwrap());
    assert!(resize < text.find("glViewport(x, y, width, height);").unwrap());
    assert!(text.ends_with("    glViewport(x, y, width, height);\n    glretrace::checkGlError();\n}\n\n"));
}

#[test]
fn test_bind_framebuffer() {
    let function = Function::new("glBindFramebufferEXT")
        .arg("target", "GLenum")
        .arg("framebuffer", "GLuint");

    assert!(retrace_one(&function).ends_with("
    glBindFramebufferEXT(target, framebuffer);
    GLint __new_fb = 0;
    glGetIntegerv(GL_FRAMEBUFFER_BINDING_EXT, &__new_fb);
    if (__new_fb != glretrace::fb) {
        glretrace::snapshot(call.no);
        glretrace::fb = __new_fb;
    }
    glretrace::checkGlError();
}

"));
}

#[test]
fn test_begin_end() {
    let begin = retrace_one(&Function::new("glBegin").arg("mode", "GLenum"));
    assert!(begin.ends_with("    glBegin(mode);\n    glretrace::insideGlBeginEnd = true;\n}\n\n"));
    assert!(!begin.contains("checkGlError"));
    assert!(!begin.contains("unsaved_draws"));

    let end = retrace_one(&Function::new("glEnd"));
    assert_eq!(end, "\
static void retrace_glEnd(Trace::Call &call) {
    glretrace::insideGlBeginEnd = false;
    glEnd();
    glretrace::unsaved_draws++;
    glretrace::checkGlError();
}

");
}

#[test]
fn test_uniform_location() {
    let function = Function::new("glUniform1i").arg("location", "GLint").arg("v0", "GLint");
    assert_eq!(retrace_one(&function), "\
static void retrace_glUniform1i(Trace::Call &call) {
    GLint location;
    GLint program = -1;
    glGetIntegerv(GL_CURRENT_PROGRAM, &program);
    location = (call.arg(0)).toSInt();
    GLint v0;
    v0 = (call.arg(1)).toSInt();
    glUniform1i(location, v0);
    glretrace::checkGlError();
}

");

    // Only the first argument, and only if it's called `location`.
    let block = Function::new("glUniformBlockBinding")
        .arg("program", "GLuint")
        .arg("location", "GLuint");
    assert!(!retrace_one(&block).contains("GL_CURRENT_PROGRAM"));

    let get = Function::new("glGetUniformLocation")
        .returns("GLint")
        .arg("location", "GLint");
    assert!(!retrace_one(&get).contains("GL_CURRENT_PROGRAM"));
}

#[test]
fn test_argument_names_alone_dont_select_blobs() {
    // `indices` is only a blob for element draws, and `pointer` only for
    // array pointer functions.
    let function = Function::new("glDrawArraysIndirect")
        .arg("pointer", "const GLvoid *")
        .arg("indices", "const GLvoid *");
    let text = retrace_one(&function);
    assert!(text.contains("pointer = (const GLvoid *)(call.arg(0)).toPointer();"));
    assert!(text.contains("indices = (const GLvoid *)(call.arg(1)).toPointer();"));
}

#[test]
fn test_generate_header() {
    let catalog = Catalog::new(vec![Function::new("glFlush")]).unwrap();
    let text = generate(&catalog);
    assert!(text.starts_with("\n#include \"glproc.hpp\"\n#include \"glretrace.hpp\"\n\n\n\nstatic void retrace_glFlush"));
}
