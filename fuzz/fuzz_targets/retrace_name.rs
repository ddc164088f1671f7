#![no_main]
use libfuzzer_sys::fuzz_target;

use gl_retrace_gen::roles::{self, Roles};
use gl_retrace_gen::{Catalog, Function};

fuzz_target!(|data: &[u8]| {
    let name = match std::str::from_utf8(data) {
        Ok(name) => name,
        Err(_) => return,
    };
    // Names end up in the output, so keep them to C identifiers.
    if !name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
        return;
    }

    let function = Function::new(name)
        .arg("location", "GLint")
        .arg("pointer", "const GLvoid *")
        .arg("indices", "const GLvoid *");
    let roles = function.roles();

    let catalog = Catalog::new(vec![function]).expect("one function can't collide");
    let text = gl_retrace_gen::generate(&catalog);
    assert_eq!(text, gl_retrace_gen::generate(&catalog));

    let guarded = roles.intersects(Roles::ARRAY_POINTER | Roles::DRAW_ARRAYS | Roles::DRAW_ELEMENTS);
    assert_eq!(text.contains("glretrace::parser.version < 1"), guarded);
    assert_eq!(text.contains("glretrace::unsaved_draws++;"), roles.is_draw());
    assert_eq!(text.contains("glretrace::snapshot(call.no);"),
               roles.contains(Roles::BIND_FRAMEBUFFER));
    assert_eq!(text.contains("drawable->resize("), name == roles::VIEWPORT);
    assert_eq!(text.contains("glretrace::checkGlError();"), name != roles::BEGIN);
});
