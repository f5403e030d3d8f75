use crate::checker::{is_compromised, CompromisedDb};
use crate::error::ManifestError;
use crate::model::{ScannedPackage, Vulnerability};
use serde_json::Value;
use std::fs;
use std::path::Path;

/// What a single manifest contributes to the scan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestOutcome {
    pub package: ScannedPackage,
    pub vulnerability: Option<Vulnerability>,
}

/// Reads one `package.json` and checks it against the database.
///
/// # Errors
///
/// Returns [`ManifestError`] if the file cannot be read, is not JSON, or
/// lacks a non-empty string `name` or `version`. Callers skip such files.
pub fn scan_manifest(path: &Path, db: &CompromisedDb) -> Result<ManifestOutcome, ManifestError> {
    let content = fs::read_to_string(path).map_err(|source| ManifestError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    let doc: Value = serde_json::from_str(&content).map_err(|source| ManifestError::Parse {
        path: path.to_path_buf(),
        source,
    })?;

    let name = string_field(&doc, "name").ok_or_else(|| ManifestError::MissingField {
        path: path.to_path_buf(),
        field: "name",
    })?;
    let version = string_field(&doc, "version").ok_or_else(|| ManifestError::MissingField {
        path: path.to_path_buf(),
        field: "version",
    })?;

    let vulnerability = db
        .lookup(name)
        .filter(|range| is_compromised(version, range))
        .map(|range| Vulnerability::compromised(name, version, range, path));

    Ok(ManifestOutcome {
        package: ScannedPackage::new(name, version, path),
        vulnerability,
    })
}

fn string_field<'a>(doc: &'a Value, field: &str) -> Option<&'a str> {
    doc.get(field)
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
}
