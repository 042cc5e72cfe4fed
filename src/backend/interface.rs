use std::path::PathBuf;

use thiserror::Error;

use crate::core::Store;

#[derive(Debug, Error)]
pub enum BackendError {
    #[error("failed to access {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error
    },
    /// The file exists but does not hold a valid store.
    #[error("failed to parse {path}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error
    },
    #[error("failed to serialize bills")]
    Serialize(#[from] serde_json::Error)
}

pub type Result<T> = std::result::Result<T, BackendError>;

/// Somewhere to keep every bill between runs.
pub trait BillStore {
    /// Reads all bills, or an empty store when nothing was saved yet.
    fn load(&self) -> Result<Store>;
    /// Replaces whatever was saved with `store`.
    fn save(&self, store: &Store) -> Result<()>;
}
