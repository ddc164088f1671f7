//! Errors from loading catalogs and writing generated code.
//!
//! Generating code from a catalog can't fail. Everything here happens on
//! the way in or the way out.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("gl-retrace-gen: {0}")]
    Io(#[from] std::io::Error),

    #[error("gl-retrace-gen: malformed catalog: {0}")]
    Catalog(#[from] toml::de::Error),

    #[error("gl-retrace-gen: catalog lists function `{0}` more than once")]
    DuplicateFunction(String),

    #[error("gl-retrace-gen: function `{function}` has more than one argument named `{argument}`")]
    DuplicateArgument { function: String, argument: String },
}

pub type Result<T> = std::result::Result<T, Error>;
