//! Domain layer: entities and the ordered course store
//!
//! This layer is independent of external concerns (no I/O, no CLI, no config loading).

pub mod catalog;
pub mod entities;
pub mod error;
pub mod store;

pub use catalog::{CatalogWarning, ParsedCatalog, DEFAULT_DELIMITER};
pub use entities::*;
pub use error::DomainError;
pub use store::{InOrderIterator, InsertOutcome, OrderedCourseStore};
