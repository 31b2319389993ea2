//! matrixcore: named numeric matrices over dense, compressed-row and view storage
//!
//! This crate provides a single `Matrix` type backed by interchangeable
//! storage schemes, index selectors for sub-matrix copies and aliasing views,
//! structural pattern analysis, scheme-aware algebra (with a Faer-backed
//! right division), read-only wrappers, enumerators and binary persistence.

pub mod access;
pub mod config;
pub mod error;
pub mod matrix;
pub mod ops;
pub mod pattern;

// Re-exports for convenience
pub use access::*;
pub use config::*;
pub use error::*;
pub use matrix::*;
pub use pattern::{Bandwidth, Structure};
