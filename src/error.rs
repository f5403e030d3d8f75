//! Error types for the scan pipeline.
//!
//! Unreadable directories never surface: the walker skips them. Everything
//! else is returned to the caller, which decides whether to log and continue.

use std::path::PathBuf;

/// The compromised-package list could not be read.
#[derive(Debug, thiserror::Error)]
#[error("failed to read compromised package list {path:?}: {source}")]
pub struct LoadError {
    pub path: PathBuf,
    #[source]
    pub source: std::io::Error,
}

/// The requested report location was rejected.
#[derive(Debug, thiserror::Error)]
pub enum PathError {
    #[error("invalid output path: path traversal attempt detected, output must be within {cwd:?}")]
    OutsideWorkingDir { cwd: PathBuf },

    #[error("invalid output path: output file must have .json extension")]
    NotJson,

    #[error("invalid output path: filename contains suspicious characters")]
    SuspiciousFilename,

    #[error("invalid output path: cannot determine working directory: {0}")]
    WorkingDir(#[source] std::io::Error),
}

/// The report could not be persisted.
#[derive(Debug, thiserror::Error)]
pub enum WriteError {
    #[error(transparent)]
    Path(#[from] PathError),

    #[error("failed to serialize report: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("failed to write report to {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// A manifest that contributes nothing to the scan.
#[derive(Debug, thiserror::Error)]
pub enum ManifestError {
    #[error("failed to read manifest {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid manifest {path:?}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("manifest {path:?} has no string '{field}' field")]
    MissingField { path: PathBuf, field: &'static str },
}
