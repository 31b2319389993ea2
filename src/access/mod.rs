//! Storage access traits and index selectors.

pub mod selector;
pub mod traits;

pub use selector::{ALL_TOKEN, IndexCollection, Selector};
pub use traits::{ElementAccess, MatShape, SubmatrixExtract};
