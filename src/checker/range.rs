use super::version::{compare_versions, normalize};
use std::cmp::Ordering;

/// An inclusive interval of compromised versions, or a single point.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionRange {
    pub min: String,
    pub max: String,
    pub is_single: bool,
}

impl VersionRange {
    /// Parses `"X.Y.Z"` or `"X.Y.Z-A.B.C"`.
    ///
    /// Anything containing a `-` is split on every `-`; the first two pieces
    /// are the trimmed bounds and the rest are dropped. Everything else is a
    /// single version.
    pub fn parse(range: &str) -> Self {
        if !range.contains('-') {
            return Self {
                min: range.to_string(),
                max: range.to_string(),
                is_single: true,
            };
        }

        let mut bounds = range.split('-').map(str::trim);
        Self {
            min: bounds.next().unwrap_or_default().to_string(),
            max: bounds.next().unwrap_or_default().to_string(),
            is_single: false,
        }
    }

    /// Returns true if `version` (already normalized) falls inside the range.
    pub fn contains(&self, version: &str) -> bool {
        if self.is_single {
            return compare_versions(version, &self.min) == Ordering::Equal;
        }

        compare_versions(version, &self.min) != Ordering::Less
            && compare_versions(version, &self.max) != Ordering::Greater
    }
}

/// Checks an installed version against a range string from the database.
///
/// ```
/// use compromise_scan::checker::is_compromised;
///
/// assert!(is_compromised("1.0.1", "1.0.0-1.0.2"));
/// assert!(!is_compromised("1.0.3", "1.0.0-1.0.2"));
/// assert!(is_compromised("^1.2.0", "1.2.0"));
/// ```
pub fn is_compromised(installed_version: &str, range: &str) -> bool {
    VersionRange::parse(range).contains(normalize(installed_version))
}
