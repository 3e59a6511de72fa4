use std::path::PathBuf;

use thiserror::Error;

/// Failures that abort a report conversion.
#[derive(Debug, Error)]
pub enum FlattenError {
    /// The XML could not be turned into a tree even with recovery enabled.
    #[error("XML Parse Error: {message} (at byte {position})")]
    Parse { position: u64, message: String },

    #[error("Failed to access {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write CSV output: {0}")]
    Csv(#[from] csv::Error),

    #[error("Invalid configuration: {0}")]
    Config(String),
}

impl FlattenError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        FlattenError::Io {
            path: path.into(),
            source,
        }
    }

    pub fn is_parse_error(&self) -> bool {
        matches!(self, FlattenError::Parse { .. })
    }
}

pub type Result<T> = std::result::Result<T, FlattenError>;
