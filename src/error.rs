use std::path::PathBuf;
use thiserror::Error;

/// Result type for catalog operations
pub type Result<T> = std::result::Result<T, CatalogError>;

#[derive(Debug, Error)]
pub enum CatalogError {
    /// Filesystem failure while walking the tag tree
    #[error("failed to walk {}: {source}", path.display())]
    Traversal {
        path: PathBuf,
        #[source]
        source: walkdir::Error,
    },

    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Key-dump document missing, unparsable, or lacking required keys
    #[error("invalid key dump {}: {reason}", path.display())]
    Document { path: PathBuf, reason: String },

    /// Malformed hexadecimal key string
    #[error("sector {sector} {slot}: invalid key {value:?}: {reason}")]
    KeyFormat {
        sector: usize,
        slot: KeySlot,
        value: String,
        reason: String,
    },

    #[error(
        "{} has {} candidates for {kind}: {}",
        dir.display(),
        candidates.len(),
        candidates.join(", ")
    )]
    AmbiguousArtifact {
        dir: PathBuf,
        kind: &'static str,
        candidates: Vec<String>,
    },

    /// External tag parser raised or returned nothing
    #[error("failed to parse {}: {reason}", path.display())]
    Parse { path: PathBuf, reason: String },

    #[error("invalid configuration {}: {reason}", path.display())]
    Config { path: PathBuf, reason: String },

    #[error("failed to export report to {}: {reason}", path.display())]
    Export { path: PathBuf, reason: String },
}

/// Which half of a sector's key pair a value belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeySlot {
    A,
    B,
}

impl std::fmt::Display for KeySlot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            KeySlot::A => f.write_str("KeyA"),
            KeySlot::B => f.write_str("KeyB"),
        }
    }
}

impl CatalogError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        CatalogError::Io {
            path: path.into(),
            source,
        }
    }

    pub fn document(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        CatalogError::Document {
            path: path.into(),
            reason: reason.into(),
        }
    }

    pub fn parse(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        CatalogError::Parse {
            path: path.into(),
            reason: reason.into(),
        }
    }
}

impl From<walkdir::Error> for CatalogError {
    fn from(err: walkdir::Error) -> Self {
        let path = err.path().map(PathBuf::from).unwrap_or_default();
        CatalogError::Traversal { path, source: err }
    }
}
