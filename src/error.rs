use std::path::PathBuf;

use crate::config::ConfigError;
use crate::diagnostics::Diagnostic;
use thiserror::Error;

/// Top-level error type for the dragon-mvc library.
///
/// Every variant is fatal for the request that produced it.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("{0}")]
    Fatal(Diagnostic),

    #[error("controller not found: {}", .path.display())]
    ControllerNotFound { path: PathBuf },

    #[error("model not found: {}", .path.display())]
    ModelNotFound { path: PathBuf },

    #[error("class not found: {}", .path.display())]
    ToolNotFound { path: PathBuf },

    #[error("user library not found: {}", .path.display())]
    LibraryNotFound { path: PathBuf },

    #[error("action {action} does not exist on {controller}")]
    MissingAction { controller: String, action: String },

    #[error("{} does not define {name}", .path.display())]
    ClassMismatch { name: String, path: PathBuf },

    #[error("routing failed: {0}")]
    Route(String),

    #[error("application context requires {0}")]
    MissingContext(&'static str),
}
