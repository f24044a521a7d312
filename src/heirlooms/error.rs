use crate::model::HeirloomId;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum HeirloomError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Heirloom not found: {0}")]
    NotFound(HeirloomId),

    #[error("Failed to write {}: {source}", .path.display())]
    StorageWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to read {}: {source}", .path.display())]
    StorageRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("No free heirloom id found after {attempts} attempts")]
    AllocationExhausted { attempts: u32 },

    #[error("Not implemented: {0}")]
    NotImplemented(&'static str),

    #[error("Unauthorized: invalid credentials")]
    Unauthorized,

    #[error("Configuration error: {0}")]
    Config(String),
}

impl HeirloomError {
    pub fn write(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::StorageWrite {
            path: path.into(),
            source,
        }
    }

    pub fn read(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::StorageRead {
            path: path.into(),
            source,
        }
    }

    /// Errors caused by the request itself rather than by the store.
    /// These never change state.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidInput(_) | Self::NotFound(_) | Self::Unauthorized
        )
    }
}

pub type Result<T> = std::result::Result<T, HeirloomError>;
