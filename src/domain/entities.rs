//! Domain entities: core data structures

use std::fmt;

/// Normalize a raw course identifier: surrounding whitespace removed, ASCII uppercased.
///
/// `" cs101 "` → `"CS101"`
pub fn normalize_id(raw: &str) -> String {
    raw.trim().to_ascii_uppercase()
}

/// A single course in the catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CourseRecord {
    /// Normalized course identifier, unique key in the store
    pub id: String,
    /// Display title
    pub title: String,
    /// Normalized identifiers of prerequisite courses, in input order.
    /// May name courses that are not in the catalog.
    pub prerequisites: Vec<String>,
}

impl CourseRecord {
    /// Create a record, normalizing the identifier and every prerequisite.
    ///
    /// Prerequisites that are empty after trimming are dropped.
    pub fn new<I, S>(id: &str, title: &str, prerequisites: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            id: normalize_id(id),
            title: title.trim().to_string(),
            prerequisites: prerequisites
                .into_iter()
                .map(|p| normalize_id(p.as_ref()))
                .filter(|p| !p.is_empty())
                .collect(),
        }
    }

    pub fn has_prerequisites(&self) -> bool {
        !self.prerequisites.is_empty()
    }
}

impl fmt::Display for CourseRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}, {}", self.id, self.title)
    }
}
