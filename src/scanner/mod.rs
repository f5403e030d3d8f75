//! Manifest discovery and per-manifest checks.
//!
//! [`find_manifests`] walks a dependency root for `package.json` files and
//! [`scan_manifest`] turns each one into a [`ScannedPackage`] plus an optional
//! [`Vulnerability`].
//!
//! # Example
//!
//! ```no_run
//! use compromise_scan::checker::CompromisedDb;
//! use compromise_scan::scanner::{find_manifests, scan_manifest};
//!
//! let db = CompromisedDb::load("compromise/sha1_hulud_full.csv")?;
//! for path in find_manifests("node_modules") {
//!     if let Ok(outcome) = scan_manifest(&path, &db) {
//!         println!("{}@{}", outcome.package.name, outcome.package.version);
//!     }
//! }
//! # Ok::<(), compromise_scan::error::LoadError>(())
//! ```
//!
//! [`ScannedPackage`]: crate::model::ScannedPackage
//! [`Vulnerability`]: crate::model::Vulnerability

mod manifest;
mod walk;

pub use manifest::{scan_manifest, ManifestOutcome};
pub use walk::{find_manifests, MANIFEST_FILE, SKIPPED_DIRS};
