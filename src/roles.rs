//! Roles that GL entry points play during replay.
//!
//! Most GL calls can be replayed by decoding their arguments and making the
//! call. A few need more than that: client-side array pointers have to be
//! refused for old recordings, draws have to be counted, framebuffer binds
//! may call for a snapshot, and so on. This module names those functions.
//!
//! Every function's roles are computed once, by exact name, when its
//! `api::Function` is built. A function can have any number of roles; an
//! unrecognized name simply has none.

use bitflags::bitflags;

/// The viewport-setting function. Replay grows the window to fit it.
pub const VIEWPORT: &str = "glViewport";

/// The function that opens an immediate-mode primitive.
pub const BEGIN: &str = "glBegin";

/// The function that closes an immediate-mode primitive.
pub const END: &str = "glEnd";

/// Functions whose names start with this take a uniform location relative
/// to the current program.
pub const UNIFORM_PREFIX: &str = "glUniform";

bitflags! {
    /// The set of replay roles a GL function has.
    #[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
    pub struct Roles: u8 {
        /// Sets a vertex attribute array pointer.
        const ARRAY_POINTER = 1 << 0;
        /// Draws from the enabled vertex arrays.
        const DRAW_ARRAYS = 1 << 1;
        /// Draws using an index array.
        const DRAW_ELEMENTS = 1 << 2;
        /// Changes the current framebuffer.
        const BIND_FRAMEBUFFER = 1 << 3;
        /// Touches the framebuffer without being a draw call proper.
        const MISC_DRAW = 1 << 4;
    }
}

/// Define a table of function names, and a matcher for it.
///
/// The matcher compiles to a `match` on the name rather than a scan of the
/// table.
macro_rules! function_names {
    ( $( $(#[$attr:meta])* $table:ident, $matcher:ident => [ $( $name:literal, )* ] )* ) => {
        $(
            $(#[$attr])*
            pub const $table: &[&str] = &[ $( $name ),* ];

            fn $matcher(name: &str) -> bool {
                matches!(name, $( $name )|*)
            }
        )*
    }
}

function_names! {
    /// Functions that record a pointer into client memory for a vertex array.
    ///
    /// The `EXT` variants and `glMatrixIndexPointerARB` take a pointer too,
    /// but recordings don't contain them, so they are left out.
    ARRAY_POINTER_FUNCTIONS, is_array_pointer => [
        "glVertexPointer",
        "glNormalPointer",
        "glColorPointer",
        "glIndexPointer",
        "glTexCoordPointer",
        "glEdgeFlagPointer",
        "glFogCoordPointer",
        "glSecondaryColorPointer",

        "glInterleavedArrays",

        "glVertexAttribPointer",
        "glVertexAttribPointerARB",
        "glVertexAttribPointerNV",
        "glVertexAttribLPointer",
        "glVertexAttribLPointerEXT",
    ]

    /// Functions that draw straight from the vertex arrays.
    DRAW_ARRAY_FUNCTIONS, is_draw_array => [
        "glDrawArrays",
        "glDrawArraysEXT",
        "glDrawArraysIndirect",
        "glDrawArraysInstanced",
        "glDrawArraysInstancedARB",
        "glDrawArraysInstancedEXT",
        "glDrawMeshArraysSUN",
        "glMultiDrawArrays",
        "glMultiDrawArraysEXT",
        "glMultiModeDrawArraysIBM",
    ]

    /// Functions that draw through an index array.
    ///
    /// The `glMultiDrawElements` family takes an array of index pointers, not
    /// a single one, so it doesn't belong here.
    DRAW_ELEMENTS_FUNCTIONS, is_draw_elements => [
        "glDrawElements",
        "glDrawElementsBaseVertex",
        "glDrawElementsIndirect",
        "glDrawElementsInstanced",
        "glDrawElementsInstancedARB",
        "glDrawElementsInstancedBaseVertex",
        "glDrawElementsInstancedEXT",
        "glDrawRangeElements",
        "glDrawRangeElementsBaseVertex",
        "glDrawRangeElementsEXT",
    ]

    BIND_FRAMEBUFFER_FUNCTIONS, is_bind_framebuffer => [
        "glBindFramebuffer",
        "glBindFramebufferARB",
        "glBindFramebufferEXT",
    ]

    /// Functions that aren't draws, but still count as drawing.
    MISC_DRAW_FUNCTIONS, is_misc_draw => [
        "glClear",
        "glEnd",
    ]
}

/// Return the roles of the GL function named `name`.
pub fn classify(name: &str) -> Roles {
    let mut roles = Roles::empty();
    roles.set(Roles::ARRAY_POINTER, is_array_pointer(name));
    roles.set(Roles::DRAW_ARRAYS, is_draw_array(name));
    roles.set(Roles::DRAW_ELEMENTS, is_draw_elements(name));
    roles.set(Roles::BIND_FRAMEBUFFER, is_bind_framebuffer(name));
    roles.set(Roles::MISC_DRAW, is_misc_draw(name));
    roles
}

impl Roles {
    /// True if replaying a call with these roles counts as a draw.
    pub fn is_draw(self) -> bool {
        self.intersects(Roles::DRAW_ARRAYS | Roles::DRAW_ELEMENTS | Roles::MISC_DRAW)
    }

    /// True if this call reads vertex data through the current array buffer.
    pub fn reads_vertex_arrays(self) -> bool {
        self.intersects(Roles::ARRAY_POINTER | Roles::DRAW_ARRAYS)
    }

    /// True if this call reads indices through the current element buffer.
    pub fn reads_element_array(self) -> bool {
        self.contains(Roles::DRAW_ELEMENTS)
    }
}

#[test]
fn test_classify_tables() {
    let tables: [(&[&str], Roles); 5] = [
        (ARRAY_POINTER_FUNCTIONS, Roles::ARRAY_POINTER),
        (DRAW_ARRAY_FUNCTIONS, Roles::DRAW_ARRAYS),
        (DRAW_ELEMENTS_FUNCTIONS, Roles::DRAW_ELEMENTS),
        (BIND_FRAMEBUFFER_FUNCTIONS, Roles::BIND_FRAMEBUFFER),
        (MISC_DRAW_FUNCTIONS, Roles::MISC_DRAW),
    ];

    for (table, role) in tables.iter() {
        for name in table.iter() {
            assert!(classify(name).contains(*role), "{} should have {:?}", name, role);
        }
    }

    // The tables happen to be disjoint, so each listed name has exactly the
    // role of its table.
    for (table, role) in tables.iter() {
        for name in table.iter() {
            assert_eq!(classify(name), *role, "{}", name);
        }
    }
}

#[test]
fn test_classify_unknown() {
    assert_eq!(classify(""), Roles::empty());
    assert_eq!(classify("glEnable"), Roles::empty());
    assert_eq!(classify("glBegin"), Roles::empty());
    assert_eq!(classify("glViewport"), Roles::empty());

    // Matching is exact: no prefixes, suffixes, or case folding.
    assert_eq!(classify("glDrawArraysFoo"), Roles::empty());
    assert_eq!(classify("gldrawarrays"), Roles::empty());
    assert_eq!(classify("glVertexPointerEXT"), Roles::empty());
    assert_eq!(classify("glMultiDrawElements"), Roles::empty());
    assert_eq!(classify(" glClear"), Roles::empty());
}

#[test]
fn test_role_predicates() {
    let draw_arrays = classify("glDrawArrays");
    assert!(draw_arrays.is_draw());
    assert!(draw_arrays.reads_vertex_arrays());
    assert!(!draw_arrays.reads_element_array());

    let draw_elements = classify("glDrawElements");
    assert!(draw_elements.is_draw());
    assert!(!draw_elements.reads_vertex_arrays());
    assert!(draw_elements.reads_element_array());

    let pointer = classify("glVertexAttribPointer");
    assert!(!pointer.is_draw());
    assert!(pointer.reads_vertex_arrays());

    assert!(classify("glEnd").is_draw());
    assert!(classify("glClear").is_draw());
    assert!(!classify("glBindFramebuffer").is_draw());
}
