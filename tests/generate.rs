//! Check the generated GL replay code for the whole built-in catalog.

use gl_retrace_gen::roles::{self, Roles};
use gl_retrace_gen::{generate, Catalog, Emitter, Function, GlRetrace, Retracer};

/// Generate the replay function for `function` alone.
fn unit(function: &Function) -> String {
    let mut out = Emitter::new();
    Retracer::new(GlRetrace).retrace_function(function, &mut out);
    out.into_text()
}

/// Return the byte offset of the statement that calls `function` in `unit`.
fn call_offset(unit: &str, function: &Function) -> Option<usize> {
    let statement = match function.ret() {
        Some(_) => format!("__result = {}(", function.name()),
        None => format!("    {}(", function.name()),
    };
    unit.find(&statement)
}

fn catalog() -> Catalog {
    Catalog::gl().expect("built-in catalog should parse")
}

#[test]
fn legacy_guard_follows_roles() {
    for function in catalog().functions() {
        let text = unit(function);
        let roles = function.roles();
        let vertex = roles.intersects(Roles::ARRAY_POINTER | Roles::DRAW_ARRAYS);
        let elements = roles.contains(Roles::DRAW_ELEMENTS);

        assert_eq!(text.contains("glretrace::parser.version < 1"), vertex || elements,
                   "{}", function.name());
        assert_eq!(text.contains("(GL_ARRAY_BUFFER_BINDING,"), vertex, "{}", function.name());
        assert_eq!(text.contains("(GL_ELEMENT_ARRAY_BUFFER_BINDING,"), elements,
                   "{}", function.name());

        // The guard comes before anything else in the body.
        if vertex || elements {
            let body = text.lines().nth(1).unwrap();
            assert_eq!(body, "    if (glretrace::parser.version < 1) {");
        }
    }
}

#[test]
fn only_viewport_resizes() {
    for function in catalog().functions() {
        let text = unit(function);
        let expected = if function.name() == roles::VIEWPORT { 1 } else { 0 };
        assert_eq!(text.matches("glretrace::drawable->resize(").count(), expected,
                   "{}", function.name());
        assert_eq!(text.contains("reshape_window"), expected == 1, "{}", function.name());
    }
}

#[test]
fn snapshot_only_after_framebuffer_binds() {
    for function in catalog().functions() {
        let text = unit(function);
        let snapshot = text.find("glretrace::snapshot(call.no);");
        if function.roles().contains(Roles::BIND_FRAMEBUFFER) {
            let snapshot = snapshot.expect("framebuffer bind should snapshot");
            let call = call_offset(&text, function).unwrap();
            assert!(call < snapshot, "{}", function.name());
            // Always conditional on the binding having changed.
            let guard = text.find("if (__new_fb != glretrace::fb) {").unwrap();
            assert!(call < guard && guard < snapshot, "{}", function.name());
        } else {
            assert!(snapshot.is_none(), "{}", function.name());
            assert!(!text.contains("__new_fb"), "{}", function.name());
        }
    }
}

#[test]
fn draws_counted_once() {
    let mut draws = 0;
    for function in catalog().functions() {
        let text = unit(function);
        let count = text.matches("glretrace::unsaved_draws++;").count();
        if function.roles().is_draw() {
            draws += 1;
            assert_eq!(count, 1, "{}", function.name());
            assert!(call_offset(&text, function).unwrap() < text.find("unsaved_draws").unwrap());
        } else {
            assert_eq!(count, 0, "{}", function.name());
        }
    }
    assert_eq!(draws,
               roles::DRAW_ARRAY_FUNCTIONS.len()
               + roles::DRAW_ELEMENTS_FUNCTIONS.len()
               + roles::MISC_DRAW_FUNCTIONS.len());
}

#[test]
fn begin_end_bracketing() {
    for function in catalog().functions() {
        let text = unit(function);
        let name = function.name();
        let clear = text.find("glretrace::insideGlBeginEnd = false;");
        let set = text.find("glretrace::insideGlBeginEnd = true;");
        let check = text.find("glretrace::checkGlError();");
        let call = call_offset(&text, function);

        if !function.sideeffects() {
            assert!(call.is_none(), "{}", name);
            assert!(clear.is_none() && set.is_none() && check.is_none(), "{}", name);
            continue;
        }
        let call = call.unwrap();

        match name {
            roles::END => {
                assert!(clear.unwrap() < call);
                assert!(set.is_none());
                assert!(call < check.unwrap());
            }
            roles::BEGIN => {
                assert!(clear.is_none());
                assert!(call < set.unwrap());
                assert!(check.is_none());
            }
            _ => {
                assert!(clear.is_none() && set.is_none(), "{}", name);
                assert!(call < check.unwrap(), "{}", name);
                assert_eq!(text.matches("glretrace::checkGlError();").count(), 1, "{}", name);
            }
        }
    }
}

#[test]
fn error_check_is_last_statement() {
    for function in catalog().functions() {
        if !function.sideeffects() || function.name() == roles::BEGIN {
            continue;
        }
        assert!(unit(function).ends_with("    glretrace::checkGlError();\n}\n\n"),
                "{}", function.name());
    }
}

#[test]
fn argument_overrides() {
    for function in catalog().functions() {
        let text = unit(function);
        let roles = function.roles();
        for arg in function.args() {
            let blob = format!("{} = (call.arg({})).blob();", arg.name(), arg.index());
            let expected = (roles.contains(Roles::ARRAY_POINTER) && arg.name() == "pointer")
                || (roles.contains(Roles::DRAW_ELEMENTS) && arg.name() == "indices");
            assert_eq!(text.contains(&blob), expected, "{} {}", function.name(), arg.name());
        }

        let preamble = function.name().starts_with(roles::UNIFORM_PREFIX)
            && function.args().first().map(|arg| arg.name()) == Some("location");
        assert_eq!(text.matches("glGetIntegerv(GL_CURRENT_PROGRAM, &program);").count(),
                   if preamble { 1 } else { 0 },
                   "{}", function.name());
        if preamble {
            let declared = text.find("GLint location;").unwrap();
            let lookup = text.find("GLint program = -1;").unwrap();
            let decoded = text.find("location = (call.arg(0)).toSInt();").unwrap();
            assert!(declared < lookup && lookup < decoded, "{}", function.name());
        }
    }
}

#[test]
fn draw_arrays_example() {
    let catalog = catalog();
    let function = catalog.get("glDrawArrays").unwrap();
    assert_eq!(function.roles(), Roles::DRAW_ARRAYS);

    let text = unit(function);
    assert!(text.contains("(GL_ARRAY_BUFFER_BINDING,"));
    assert!(!text.contains("(GL_ELEMENT_ARRAY_BUFFER_BINDING,"));
    assert_eq!(text.matches("glretrace::unsaved_draws++;").count(), 1);
    assert_eq!(text.matches("glretrace::checkGlError();").count(), 1);
}

#[test]
fn unsupported_arguments_fail_the_call() {
    let catalog = catalog();
    let text = unit(catalog.get("glUseProgramObjectARB").unwrap());
    assert!(text.contains("    programObj = 0; // FIXME\n    if (1) {\n"));
    assert!(text.contains("warning: unsupported call glUseProgramObjectARB"));
}

#[test]
fn whole_file() {
    let catalog = catalog();
    let text = generate(&catalog);

    assert!(text.starts_with("\n#include \"glproc.hpp\"\n#include \"glretrace.hpp\"\n\n\n\n"));
    assert!(text.ends_with("    {NULL, NULL}\n};\n"));

    // Units appear once each, in catalog order, and so do table entries.
    let mut last_unit = 0;
    let mut last_entry = 0;
    for function in catalog.functions() {
        let header = format!("static void retrace_{}(Trace::Call &call) {{\n", function.name());
        let entry = format!("    {{\"{name}\", &retrace_{name}}},\n", name = function.name());
        assert_eq!(text.matches(&header).count(), 1, "{}", function.name());
        assert_eq!(text.matches(&entry).count(), 1, "{}", function.name());

        let unit = text.find(&header).unwrap();
        let entry = text.find(&entry).unwrap();
        assert!(last_unit < unit && last_entry < entry, "{}", function.name());
        last_unit = unit;
        last_entry = entry;
    }

    // Every unit, and the table, start at the left margin.
    for line in text.lines() {
        if line.trim_start().starts_with("static void ") || line.trim_start().starts_with("const glretrace::Entry") {
            assert!(!line.starts_with(' '), "indented: {:?}", line);
        }
    }
    assert_eq!(text.lines().last(), Some("};"));

    // Braces balance.
    assert_eq!(text.matches('{').count(), text.matches('}').count());
}

#[test]
fn generation_is_deterministic() {
    let first = generate(&catalog());
    let second = generate(&catalog());
    assert_eq!(first, second);
}
