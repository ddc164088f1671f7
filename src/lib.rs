//! Generate the C++ source of a GL trace replayer.
//!
//! A GL trace records every GL call an application made. To replay it, we
//! need a C++ function per GL entry point that decodes a recorded call's
//! arguments and makes the call again. This crate generates those
//! functions from a catalog of GL entry points.
//!
//! The `retrace` module has the generic machinery: a `Retracer` walks a
//! `Catalog` and emits plain decode-and-call code for each function,
//! consulting a `Hooks` implementation at each point where a function might
//! need something special. The `glretrace` module provides the hooks GL
//! needs: guarding client-side arrays in old recordings, growing the window,
//! snapshotting on framebuffer changes, counting draws, and checking errors
//! outside `glBegin`/`glEnd`. Which functions need what is decided by the
//! name tables in `roles`.
//!
//! The `glretrace-gen` binary writes the generated file for the built-in GL
//! catalog (or one given on the command line) to standard output.

pub mod api;
pub mod catalog;
pub mod emit;
mod error;
pub mod glretrace;
pub mod logging;
pub mod retrace;
pub mod roles;

pub use api::{Argument, Function, Kind};
pub use catalog::Catalog;
pub use emit::Emitter;
pub use error::{Error, Result};
pub use glretrace::{generate, GlRetrace};
pub use retrace::{Hooks, Retracer};
pub use roles::{classify, Roles};
