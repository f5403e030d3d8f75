//! Core data types for scanned packages, findings, and scan reports.
//!
//! - [`ScannedPackage`] - A manifest that parsed with a name and version
//! - [`Vulnerability`] - A package whose version is in a compromised range
//! - [`ScanReport`] - Complete scan results with summary statistics
//! - [`ScanAccumulator`] / [`ScanReportBuilder`] - How a report is assembled
//!
//! # Example
//!
//! ```
//! use compromise_scan::model::{ScanAccumulator, ScanReportBuilder, ScannedPackage};
//!
//! let mut acc = ScanAccumulator::new();
//! acc.record(ScannedPackage::new("lodash", "4.17.21", "node_modules/lodash/package.json"), None);
//!
//! let report = ScanReportBuilder::new(".", "list.csv").results(acc).build();
//! println!("Scanned {} packages", report.summary.total_packages_scanned);
//! ```

mod package;
mod report;
mod vulnerability;

pub use package::*;
pub use report::*;
pub use vulnerability::*;
