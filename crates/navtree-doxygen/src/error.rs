//! Error type for loading Doxygen navigation data.

use navtree_core::LoadError;

use crate::js::ParseError;
use crate::source::DataSourceError;

/// Error returned by [`DoxygenLoader::load`](crate::DoxygenLoader::load).
#[derive(Debug, thiserror::Error)]
pub enum DoxygenError {
    /// A data file could not be read.
    #[error(transparent)]
    Source(#[from] DataSourceError),
    /// A data file is not a valid literal script.
    #[error("Failed to parse {file}: {source}")]
    Parse {
        /// File name.
        file: String,
        /// Parser error with position.
        #[source]
        source: ParseError,
    },
    /// The data does not describe a valid navigation tree.
    #[error("Invalid navigation data in {file}: {source}")]
    Load {
        /// File name.
        file: String,
        /// Validation error with node path.
        #[source]
        source: LoadError,
    },
}

impl DoxygenError {
    /// Validation error, if this is one.
    #[must_use]
    pub fn load_error(&self) -> Option<&LoadError> {
        match self {
            Self::Load { source, .. } => Some(source),
            _ => None,
        }
    }
}
