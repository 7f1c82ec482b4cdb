use std::path::PathBuf;
use thiserror::Error;

/// Fatal failures of a sitemap generation run.
///
/// Per-page catalog problems are not errors; they are reported as
/// [`PageOutcome`](crate::catalog::PageOutcome) values and skipped.
#[derive(Debug, Error)]
pub enum GenerateError {
    #[error("No images found. Aborting sitemap generation.")]
    EmptyCatalog,

    #[error("Failed to write {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to build the HTTP client: {0}")]
    Client(#[from] reqwest::Error),

    #[error("Failed to serialize the summary: {0}")]
    Json(#[from] serde_json::Error),
}

impl GenerateError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        GenerateError::Io {
            path: path.into(),
            source,
        }
    }
}
