//! Course catalog service
//!
//! Loads a catalog file into the ordered store and answers list/lookup queries.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{debug, instrument};

use crate::application::{ApplicationError, ApplicationResult, IoResultExt};
use crate::domain::{
    normalize_id, CatalogWarning, CourseRecord, InsertOutcome, OrderedCourseStore, ParsedCatalog,
};
use crate::infrastructure::traits::FileSystem;

/// Summary of a successful load.
#[derive(Debug, Clone)]
pub struct LoadReport {
    /// Canonical path of the loaded catalog
    pub path: PathBuf,
    /// Number of distinct courses now in the store
    pub courses: usize,
    /// Non-fatal findings (undefined prerequisites, duplicates)
    pub warnings: Vec<CatalogWarning>,
}

/// Service owning the course store.
pub struct CatalogService {
    fs: Arc<dyn FileSystem>,
    delimiter: char,
    store: OrderedCourseStore,
    source: Option<PathBuf>,
}

impl std::fmt::Debug for CatalogService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CatalogService")
            .field("delimiter", &self.delimiter)
            .field("store", &self.store)
            .field("source", &self.source)
            .finish_non_exhaustive()
    }
}

impl CatalogService {
    /// Create a new catalog service with an empty store.
    pub fn new(fs: Arc<dyn FileSystem>, delimiter: char) -> Self {
        Self {
            fs,
            delimiter,
            store: OrderedCourseStore::new(),
            source: None,
        }
    }

    /// Load a catalog file, replacing the current store contents.
    ///
    /// The file is read and parsed completely before the store is touched, so
    /// a failed load keeps the previous catalog.
    #[instrument(level = "debug", skip(self))]
    pub fn load(&mut self, path: &Path) -> ApplicationResult<LoadReport> {
        if !self.fs.is_file(path) {
            return Err(ApplicationError::OperationFailed {
                context: format!("catalog not found: {}", path.display()),
                source: Box::new(std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    "file does not exist",
                )),
            });
        }
        let canonical = self
            .fs
            .canonicalize(path)
            .with_path_context("canonicalize", path)?;
        let content = self
            .fs
            .read_to_string(&canonical)
            .with_path_context("read catalog", &canonical)?;

        let parsed = ParsedCatalog::parse(&content, self.delimiter).map_err(|source| {
            ApplicationError::InvalidCatalog {
                path: canonical.clone(),
                source,
            }
        })?;
        debug!(
            "load: parsed {} records, {} warnings",
            parsed.records.len(),
            parsed.warnings.len()
        );

        self.store.clear();
        for record in parsed.records {
            if self.store.insert(record) == InsertOutcome::Replaced {
                debug!("load: replaced earlier entry");
            }
        }
        // user-facing reporting is the caller's job, filtered by settings
        for warning in &parsed.warnings {
            debug!("load: {}", warning);
        }
        self.source = Some(canonical.clone());

        Ok(LoadReport {
            path: canonical,
            courses: self.store.len(),
            warnings: parsed.warnings,
        })
    }

    /// Look up one course. The query is trimmed and uppercased first.
    ///
    /// `Ok(None)` means the catalog is loaded but has no such course.
    #[instrument(level = "debug", skip(self))]
    pub fn course(&self, id: &str) -> ApplicationResult<Option<&CourseRecord>> {
        self.ensure_loaded()?;
        Ok(self.store.search(&normalize_id(id)))
    }

    /// All courses in ascending course-number order.
    #[instrument(level = "debug", skip(self))]
    pub fn courses(&self) -> ApplicationResult<Vec<&CourseRecord>> {
        self.ensure_loaded()?;
        Ok(self.store.in_order())
    }

    pub fn is_loaded(&self) -> bool {
        self.source.is_some()
    }

    /// Path of the most recently loaded catalog.
    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    pub fn store(&self) -> &OrderedCourseStore {
        &self.store
    }

    fn ensure_loaded(&self) -> ApplicationResult<()> {
        if self.is_loaded() {
            Ok(())
        } else {
            Err(ApplicationError::CatalogNotLoaded)
        }
    }
}
