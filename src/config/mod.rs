//! Configuration structs for rendering and solving.

pub mod options;
pub use options::{RenderOptions, SolveOptions};
