//! Properties of classification and generation over arbitrary names.

use proptest::prelude::*;

use gl_retrace_gen::roles::{self, Roles};
use gl_retrace_gen::{classify, Emitter, Function, GlRetrace, Retracer};

fn known(name: &str) -> bool {
    [
        roles::ARRAY_POINTER_FUNCTIONS,
        roles::DRAW_ARRAY_FUNCTIONS,
        roles::DRAW_ELEMENTS_FUNCTIONS,
        roles::BIND_FRAMEBUFFER_FUNCTIONS,
        roles::MISC_DRAW_FUNCTIONS,
    ]
    .iter()
    .any(|table| table.contains(&name))
}

/// A function shaped like an array pointer call, so that every override has
/// a chance to apply.
fn function(name: &str) -> Function {
    Function::new(name)
        .arg("location", "GLint")
        .arg("pointer", "const GLvoid *")
        .arg("indices", "const GLvoid *")
}

fn unit(function: &Function) -> String {
    let mut out = Emitter::new();
    Retracer::new(GlRetrace).retrace_function(function, &mut out);
    out.into_text()
}

proptest! {
    #[test]
    fn unknown_names_have_no_roles(name in "gl[A-Za-z0-9]{0,24}") {
        prop_assume!(!known(&name));
        prop_assert_eq!(classify(&name), Roles::empty());
    }

    #[test]
    fn unknown_names_replay_plainly(name in "gl[A-Za-z0-9]{0,24}") {
        prop_assume!(!known(&name));
        prop_assume!(name != roles::VIEWPORT && name != roles::BEGIN && name != roles::END);
        prop_assume!(!name.starts_with(roles::UNIFORM_PREFIX));

        let text = unit(&function(&name));
        prop_assert!(!text.contains("parser.version"));
        prop_assert!(!text.contains(".blob()"));
        prop_assert!(!text.contains("unsaved_draws"));
        prop_assert!(!text.contains("insideGlBeginEnd"));
        prop_assert!(!text.contains("GL_CURRENT_PROGRAM"));
        let last = "    glretrace::checkGlError();\n}\n\n";
        prop_assert!(text.ends_with(last), "{}", name);
    }

    #[test]
    fn uniform_names_look_up_program(suffix in "[A-Za-z0-9]{0,12}") {
        let name = format!("{}{}", roles::UNIFORM_PREFIX, suffix);
        let text = unit(&function(&name));
        prop_assert_eq!(text.matches("glGetIntegerv(GL_CURRENT_PROGRAM, &program);").count(), 1);
    }

    #[test]
    fn generation_is_deterministic(name in "[A-Za-z0-9_]{1,32}") {
        let function = function(&name);
        prop_assert_eq!(unit(&function), unit(&function));
        prop_assert_eq!(classify(&name), function.roles());
    }

    #[test]
    fn listed_names_keep_their_roles(index in 0..roles::DRAW_ELEMENTS_FUNCTIONS.len()) {
        let name = roles::DRAW_ELEMENTS_FUNCTIONS[index];
        let text = unit(&function(name));
        prop_assert!(text.contains("indices = (call.arg(2)).blob();"));
        prop_assert!(!text.contains("pointer = (call.arg(1)).blob();"));
        prop_assert!(text.contains("(GL_ELEMENT_ARRAY_BUFFER_BINDING,"));
        prop_assert!(!text.contains("(GL_ARRAY_BUFFER_BINDING,"));
    }
}
