use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum StarsError {
    #[error("cannot open catalog file {path:?}: {source}")]
    CatalogOpen {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("settings error: {0}")]
    Settings(#[from] serde_json::Error),

    #[error("unknown catalog type: {0}")]
    UnknownCatalog(String),

    #[error("unknown draw mode: {0}")]
    UnknownDrawMode(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, StarsError>;
