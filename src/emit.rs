//! Accumulating generated C++ source text.

/// The text of a generated translation unit, under construction.
///
/// An `Emitter` keeps track of how deeply nested the current line is, so
/// that code generating a statement doesn't need to know whether it is
/// being emitted at the top of a function body or inside some guard.
/// Each level of nesting is four spaces.
#[derive(Debug, Default)]
pub struct Emitter {
    text: String,
    depth: usize,
}

const INDENT: &str = "    ";

impl Emitter {
    pub fn new() -> Emitter {
        Emitter::default()
    }

    /// Append `line` at the current depth.
    pub fn line(&mut self, line: &str) {
        if !line.is_empty() {
            for _ in 0..self.depth {
                self.text.push_str(INDENT);
            }
            self.text.push_str(line);
        }
        self.text.push('\n');
    }

    /// Append an empty line.
    pub fn blank(&mut self) {
        self.line("");
    }

    /// Append `line`, which opens a block, and indent what follows.
    pub fn open(&mut self, line: &str) {
        self.line(line);
        self.depth += 1;
    }

    /// Stop indenting for the innermost block, and append `line`, which
    /// closes it.
    pub fn close(&mut self, line: &str) {
        debug_assert!(self.depth > 0, "gl-retrace-gen: closing a block that was never opened");
        self.depth = self.depth.saturating_sub(1);
        self.line(line);
    }

    /// Append `line`, which both closes the innermost block and opens
    /// another at the same depth, like `} else {`.
    pub fn reopen(&mut self, line: &str) {
        self.close(line);
        self.depth += 1;
    }

    /// Append `text` exactly as given, ignoring the current depth.
    pub fn raw(&mut self, text: &str) {
        self.text.push_str(text);
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn into_text(self) -> String {
        self.text
    }
}

#[test]
fn test_nesting() {
    let mut out = Emitter::new();
    out.open("void f() {");
    out.line("int x = 0;");
    out.open("if (x) {");
    out.line("return;");
    out.close("}");
    out.blank();
    out.close("}");
    assert_eq!(out.depth(), 0);
    assert_eq!(out.text(),
               "void f() {\n    int x = 0;\n    if (x) {\n        return;\n    }\n\n}\n");
}

#[test]
fn test_raw_ignores_depth() {
    let mut out = Emitter::new();
    out.open("{");
    out.raw("#include <x>\n");
    out.close("}");
    assert_eq!(out.into_text(), "{\n#include <x>\n}\n");
}

#[test]
fn test_reopen() {
    let mut out = Emitter::new();
    out.open("if (a) {");
    out.line("x();");
    out.reopen("} else {");
    out.line("y();");
    out.close("}");
    assert_eq!(out.depth(), 0);
    assert_eq!(out.text(), "if (a) {\n    x();\n} else {\n    y();\n}\n");
}

#[test]
#[cfg(debug_assertions)]
#[should_panic]
fn test_unbalanced_close() {
    Emitter::new().close("}");
}
