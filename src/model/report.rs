use super::{ScannedPackage, Vulnerability};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ScanStatus {
    Safe,
    Vulnerable,
}

impl ScanStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ScanStatus::Safe => "SAFE",
            ScanStatus::Vulnerable => "VULNERABLE",
        }
    }
}

impl std::fmt::Display for ScanStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanInfo {
    pub scan_path: PathBuf,
    pub csv_path: PathBuf,
    pub start_time: Option<DateTime<Utc>>,
    pub end_time: Option<DateTime<Utc>>,
    /// Milliseconds between start and end, `None` if either is missing.
    pub duration: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanSummary {
    pub total_packages_scanned: usize,
    pub total_unique_packages: usize,
    pub compromised_packages_found: usize,
    pub status: ScanStatus,
}

/// The full machine-readable result of one scan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanReport {
    pub scan: ScanInfo,
    pub summary: ScanSummary,
    pub vulnerabilities: Vec<Vulnerability>,
    pub scanned_packages: Vec<ScannedPackage>,
}

impl ScanReport {
    pub fn is_vulnerable(&self) -> bool {
        self.summary.status == ScanStatus::Vulnerable
    }
}

/// Append-only collection of per-manifest results.
///
/// Owned by whoever drives the traversal; only that owner pushes into it.
#[derive(Debug, Clone, Default)]
pub struct ScanAccumulator {
    packages: Vec<ScannedPackage>,
    vulnerabilities: Vec<Vulnerability>,
}

impl ScanAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, package: ScannedPackage, vulnerability: Option<Vulnerability>) {
        self.packages.push(package);
        if let Some(vuln) = vulnerability {
            self.vulnerabilities.push(vuln);
        }
    }

    pub fn packages(&self) -> &[ScannedPackage] {
        &self.packages
    }

    pub fn vulnerabilities(&self) -> &[Vulnerability] {
        &self.vulnerabilities
    }
}

/// Turns an accumulator and scan timing into a [`ScanReport`].
///
/// # Example
///
/// ```
/// use compromise_scan::model::{ScanAccumulator, ScanReportBuilder, ScanStatus, ScannedPackage};
///
/// let mut acc = ScanAccumulator::new();
/// acc.record(ScannedPackage::new("lodash", "4.17.21", "node_modules/lodash/package.json"), None);
///
/// let report = ScanReportBuilder::new(".", "list.csv").results(acc).build();
/// assert_eq!(report.summary.total_packages_scanned, 1);
/// assert_eq!(report.summary.status, ScanStatus::Safe);
/// assert_eq!(report.scan.duration, None);
/// ```
#[derive(Debug, Clone)]
pub struct ScanReportBuilder {
    scan_path: PathBuf,
    csv_path: PathBuf,
    start_time: Option<DateTime<Utc>>,
    end_time: Option<DateTime<Utc>>,
    results: ScanAccumulator,
}

impl ScanReportBuilder {
    pub fn new(scan_path: impl Into<PathBuf>, csv_path: impl Into<PathBuf>) -> Self {
        Self {
            scan_path: scan_path.into(),
            csv_path: csv_path.into(),
            start_time: None,
            end_time: None,
            results: ScanAccumulator::default(),
        }
    }

    pub fn started_at(mut self, time: DateTime<Utc>) -> Self {
        self.start_time = Some(time);
        self
    }

    pub fn finished_at(mut self, time: DateTime<Utc>) -> Self {
        self.end_time = Some(time);
        self
    }

    pub fn results(mut self, results: ScanAccumulator) -> Self {
        self.results = results;
        self
    }

    pub fn build(self) -> ScanReport {
        let ScanAccumulator {
            packages,
            vulnerabilities,
        } = self.results;

        let unique: HashSet<&str> = packages.iter().map(|p| p.name.as_str()).collect();
        let total_unique_packages = unique.len();

        let compromised = vulnerabilities.len();
        let status = if compromised > 0 {
            ScanStatus::Vulnerable
        } else {
            ScanStatus::Safe
        };

        let duration = match (self.start_time, self.end_time) {
            (Some(start), Some(end)) => Some((end - start).num_milliseconds()),
            _ => None,
        };

        ScanReport {
            scan: ScanInfo {
                scan_path: self.scan_path,
                csv_path: self.csv_path,
                start_time: self.start_time,
                end_time: self.end_time,
                duration,
            },
            summary: ScanSummary {
                total_packages_scanned: packages.len(),
                total_unique_packages,
                compromised_packages_found: compromised,
                status,
            },
            vulnerabilities,
            scanned_packages: packages,
        }
    }
}
