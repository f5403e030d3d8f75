use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub const INCIDENT: &str = "SHA-1 HULUD npm supply chain incident (Nov 2025)";
pub const RECOMMENDATION: &str = "Remove immediately and check for malicious activity";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Severity {
    Critical,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Critical => "CRITICAL",
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An installed package whose version falls inside a compromised range.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Vulnerability {
    pub package_name: String,
    pub installed_version: String,
    pub compromised_range: String,
    pub location: PathBuf,
    pub severity: Severity,
    pub incident: String,
    pub recommendation: String,
}

impl Vulnerability {
    /// Builds a finding with the fixed severity, incident and recommendation.
    pub fn compromised(
        package_name: impl Into<String>,
        installed_version: impl Into<String>,
        compromised_range: impl Into<String>,
        location: impl Into<PathBuf>,
    ) -> Self {
        Self {
            package_name: package_name.into(),
            installed_version: installed_version.into(),
            compromised_range: compromised_range.into(),
            location: location.into(),
            severity: Severity::Critical,
            incident: INCIDENT.to_string(),
            recommendation: RECOMMENDATION.to_string(),
        }
    }
}
