//! Domain-level errors (no external dependencies)

use thiserror::Error;

/// Domain errors represent malformed catalog content.
/// These are independent of where the content came from.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("line {line}: expected course number and title, found {found} field(s)")]
    TooFewFields { line: usize, found: usize },

    #[error("line {line}: empty course number")]
    EmptyCourseId { line: usize },

    #[error("line {line}: course {id} has an empty title")]
    EmptyTitle { line: usize, id: String },
}
