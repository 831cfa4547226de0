//! Article table loading.
//!
//! The table is read once into an immutable [`Dataset`] that every
//! aggregation borrows.

pub mod loader;
pub mod month;

pub use loader::*;
pub use month::*;
