//! Facade error type.

use navtree_config::ConfigError;
use navtree_doxygen::DoxygenError;

/// Error opening documentation navigation data.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("{0}")]
    Config(#[from] ConfigError),

    #[error("{0}")]
    Doxygen(#[from] DoxygenError),

    #[error("Invalid placeholder pattern: {0}")]
    Pattern(#[from] regex::Error),

    #[error("Failed to serialize navigation: {0}")]
    Json(#[from] serde_json::Error),
}
