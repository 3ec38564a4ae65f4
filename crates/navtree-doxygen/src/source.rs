//! Where data files are read from.
//!
//! [`DataSource`] abstracts reading Doxygen's data files by name so the
//! loader works the same against an HTML output directory
//! ([`FsDataSource`]) and an in-memory set of files ([`MemoryDataSource`]).

use std::collections::HashMap;
use std::path::{Component, Path, PathBuf};

/// Error returned when a data file cannot be read.
#[derive(Debug, thiserror::Error)]
pub enum DataSourceError {
    /// No file with this name.
    #[error("Data file not found: {0}")]
    NotFound(String),
    /// Name is not a plain file name within the source.
    #[error("Invalid data file name: {0}")]
    InvalidName(String),
    /// I/O error reading the file.
    #[error("I/O error reading {name}: {source}")]
    Io {
        /// Requested file name.
        name: String,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },
}

impl DataSourceError {
    /// Whether the file does not exist.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}

/// Read access to named data files.
pub trait DataSource: Send + Sync {
    /// Read the file `name` as UTF-8 text.
    ///
    /// `name` is a relative file name such as `navtreedata.js`.
    fn read(&self, name: &str) -> Result<String, DataSourceError>;
}

/// Data files in a directory, typically Doxygen's HTML output directory.
#[derive(Debug, Clone)]
pub struct FsDataSource {
    dir: PathBuf,
}

impl FsDataSource {
    /// Create a source reading from `dir`.
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Directory files are read from.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn resolve(&self, name: &str) -> Result<PathBuf, DataSourceError> {
        let relative = Path::new(name);
        let is_plain = !name.is_empty()
            && relative
                .components()
                .all(|c| matches!(c, Component::Normal(_)));
        if !is_plain {
            return Err(DataSourceError::InvalidName(name.to_owned()));
        }
        Ok(self.dir.join(relative))
    }
}

impl DataSource for FsDataSource {
    fn read(&self, name: &str) -> Result<String, DataSourceError> {
        let path = self.resolve(name)?;
        std::fs::read_to_string(&path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => DataSourceError::NotFound(name.to_owned()),
            _ => DataSourceError::Io {
                name: name.to_owned(),
                source: e,
            },
        })
    }
}

/// In-memory data files.
///
/// # Example
///
/// ```
/// use navtree_doxygen::{DataSource, MemoryDataSource};
///
/// let source = MemoryDataSource::new()
///     .with_file("navtreedata.js", "var NAVTREE = [];");
///
/// assert_eq!(source.read("navtreedata.js").unwrap(), "var NAVTREE = [];");
/// assert!(source.read("menudata.js").unwrap_err().is_not_found());
/// ```
#[derive(Debug, Clone, Default)]
pub struct MemoryDataSource {
    files: HashMap<String, String>,
}

impl MemoryDataSource {
    /// Create an empty source.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a file.
    #[must_use]
    pub fn with_file(mut self, name: impl Into<String>, content: impl Into<String>) -> Self {
        self.insert(name, content);
        self
    }

    /// Add or replace a file.
    pub fn insert(&mut self, name: impl Into<String>, content: impl Into<String>) {
        self.files.insert(name.into(), content.into());
    }
}

impl DataSource for MemoryDataSource {
    fn read(&self, name: &str) -> Result<String, DataSourceError> {
        self.files
            .get(name)
            .cloned()
            .ok_or_else(|| DataSourceError::NotFound(name.to_owned()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fs_read_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("navtreedata.js"), "var NAVTREE = [];").unwrap();
        let source = FsDataSource::new(dir.path());

        let content = source.read("navtreedata.js").unwrap();

        assert_eq!(content, "var NAVTREE = [];");
    }

    #[test]
    fn test_fs_read_missing_file_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let source = FsDataSource::new(dir.path());

        let err = source.read("annotated.js").unwrap_err();

        assert!(err.is_not_found());
        assert_eq!(err.to_string(), "Data file not found: annotated.js");
    }

    #[test]
    fn test_fs_rejects_path_traversal() {
        let dir = tempfile::tempdir().unwrap();
        let source = FsDataSource::new(dir.path().join("html"));

        for name in ["../secret.js", "/etc/passwd", "", "a/../../b.js"] {
            let err = source.read(name).unwrap_err();
            assert!(
                matches!(err, DataSourceError::InvalidName(_)),
                "Expected InvalidName for {name:?}, got {err:?}"
            );
        }
    }

    #[test]
    fn test_fs_allows_nested_plain_names() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("search")).unwrap();
        std::fs::write(dir.path().join("search/data.js"), "var X = 1;").unwrap();
        let source = FsDataSource::new(dir.path());

        assert_eq!(source.read("search/data.js").unwrap(), "var X = 1;");
    }

    #[test]
    fn test_fs_directory_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("annotated.js")).unwrap();
        let source = FsDataSource::new(dir.path());

        let err = source.read("annotated.js").unwrap_err();

        assert!(!err.is_not_found());
    }

    #[test]
    fn test_memory_insert_replaces() {
        let mut source = MemoryDataSource::new().with_file("a.js", "old");

        source.insert("a.js", "new");

        assert_eq!(source.read("a.js").unwrap(), "new");
    }
}
