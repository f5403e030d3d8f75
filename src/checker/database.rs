use crate::error::LoadError;
use std::collections::HashMap;
use std::fs;
use std::io::Read;
use std::path::Path;

/// Compromised package names mapped to their version range strings.
///
/// Built once from a `name,range` list and read-only afterwards, so it can be
/// shared across scan workers behind an `Arc` without locking.
#[derive(Debug, Clone, Default)]
pub struct CompromisedDb {
    entries: HashMap<String, String>,
}

impl CompromisedDb {
    /// Reads the list at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`LoadError`] only when the file cannot be read. Malformed rows
    /// are skipped.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, LoadError> {
        let path = path.as_ref();
        let file = fs::File::open(path).map_err(|source| LoadError {
            path: path.to_path_buf(),
            source,
        })?;

        Self::from_reader(file).map_err(|source| LoadError {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Builds the database from any reader producing the list text.
    pub fn from_reader<R: Read>(mut reader: R) -> std::io::Result<Self> {
        let mut content = String::new();
        reader.read_to_string(&mut content)?;
        Ok(Self::parse(&content))
    }

    /// Parses list text. The first line is a header and is always dropped.
    pub fn parse(content: &str) -> Self {
        let mut entries = HashMap::new();

        for line in content.split('\n').skip(1) {
            if line.trim().is_empty() {
                continue;
            }

            let mut fields = line.split(',').map(str::trim);
            let name = fields.next().unwrap_or_default();
            let range = fields.next().unwrap_or_default();

            if name.is_empty() || range.is_empty() {
                continue;
            }

            // later rows win
            entries.insert(name.to_string(), range.to_string());
        }

        Self { entries }
    }

    /// Returns the compromised range recorded for `name`.
    pub fn lookup(&self, name: &str) -> Option<&str> {
        self.entries.get(name).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
