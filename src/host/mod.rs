//! Host Collaborators
//!
//! Boundary contracts the session consumes but does not own: the level
//! catalog and the progress store. Reference in-memory implementations are
//! provided for hosts and tests.

pub mod catalog;
pub mod progress;

pub use catalog::{Catalog, CatalogError, LevelCatalog};
pub use progress::{InMemoryProgress, ProgressSnapshot, ProgressStore};
