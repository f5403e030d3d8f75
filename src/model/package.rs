use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// A manifest that parsed and carried both a name and a version.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScannedPackage {
    pub name: String,
    /// Raw version string as written in the manifest, prefix included.
    pub version: String,
    pub path: PathBuf,
}

impl ScannedPackage {
    pub fn new(name: impl Into<String>, version: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
            path: path.into(),
        }
    }
}
