//! Catalog text parsing
//!
//! Turns delimited course lines into validated [`CourseRecord`]s. Pure: no I/O,
//! no store access.

use std::collections::HashSet;
use std::fmt;

use itertools::Itertools;

use crate::domain::entities::{normalize_id, CourseRecord};
use crate::domain::error::DomainError;

/// Default field delimiter.
pub const DEFAULT_DELIMITER: char = ',';

/// Non-fatal findings while parsing a catalog.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CatalogWarning {
    /// A prerequisite names a course that appears nowhere in the input
    UndefinedPrerequisite { course: String, prerequisite: String },
    /// A course number appears more than once; the later line wins
    DuplicateCourse { id: String, line: usize },
}

impl fmt::Display for CatalogWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CatalogWarning::UndefinedPrerequisite {
                course,
                prerequisite,
            } => write!(
                f,
                "prerequisite {} of {} not found in file",
                prerequisite, course
            ),
            CatalogWarning::DuplicateCourse { id, line } => {
                write!(f, "course {} redefined on line {}, later entry wins", id, line)
            }
        }
    }
}

/// Parsed catalog: records in input order plus warnings.
#[derive(Debug, Clone, Default)]
pub struct ParsedCatalog {
    pub records: Vec<CourseRecord>,
    pub warnings: Vec<CatalogWarning>,
}

impl ParsedCatalog {
    /// Parse catalog content.
    ///
    /// Line format: `ID<d>Title[<d>Prereq...]` where `<d>` is `delimiter`.
    /// Blank lines are skipped. Every field is trimmed; identifiers are uppercased.
    ///
    /// # Errors
    /// The first malformed line aborts the parse: fewer than two fields,
    /// an empty course number, or an empty title.
    pub fn parse(content: &str, delimiter: char) -> Result<Self, DomainError> {
        let mut records = Vec::new();
        let mut warnings = Vec::new();
        let mut seen = HashSet::new();

        for (i, line) in content.lines().enumerate() {
            let line_no = i + 1;
            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }

            let fields: Vec<&str> = trimmed.split(delimiter).map(str::trim).collect();
            if fields.len() < 2 {
                return Err(DomainError::TooFewFields {
                    line: line_no,
                    found: fields.len(),
                });
            }

            let id = normalize_id(fields[0]);
            if id.is_empty() {
                return Err(DomainError::EmptyCourseId { line: line_no });
            }
            if fields[1].is_empty() {
                return Err(DomainError::EmptyTitle { line: line_no, id });
            }

            if !seen.insert(id.clone()) {
                warnings.push(CatalogWarning::DuplicateCourse {
                    id: id.clone(),
                    line: line_no,
                });
            }
            records.push(CourseRecord::new(&id, fields[1], &fields[2..]));
        }

        // prerequisites are checked against the whole file, so forward references are fine
        warnings.extend(
            records
                .iter()
                .flat_map(|r| r.prerequisites.iter().map(move |p| (r, p)))
                .filter(|(_, p)| !seen.contains(*p))
                .map(|(r, p)| CatalogWarning::UndefinedPrerequisite {
                    course: r.id.clone(),
                    prerequisite: p.clone(),
                })
                .unique(),
        );

        Ok(Self { records, warnings })
    }

    pub fn undefined_prerequisites(&self) -> impl Iterator<Item = &CatalogWarning> {
        self.warnings
            .iter()
            .filter(|w| matches!(w, CatalogWarning::UndefinedPrerequisite { .. }))
    }
}
