//! Scan driver.
//!
//! Runs one scan from start to finish:
//!
//! ```text
//! Init -> LoadingDb -> (LoadFailed | Walking) -> Scanning -> Aggregating -> Done
//! ```
//!
//! `LoadFailed` is terminal and yields an empty report with no end time. A
//! missing `node_modules` under the scan path goes straight from `Walking`
//! to `Done` with an empty report.

use crate::checker::CompromisedDb;
use crate::error::{LoadError, ManifestError};
use crate::model::{ScanAccumulator, ScanReport, ScanReportBuilder};
use crate::scanner::{find_manifests, scan_manifest, ManifestOutcome};
use anyhow::Result;
use chrono::Utc;
use futures::stream::{self, StreamExt};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info, warn};

/// Directory under the scan path that holds installed dependencies.
pub const DEPENDENCY_ROOT: &str = "node_modules";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanPhase {
    Init,
    LoadingDb,
    LoadFailed,
    Walking,
    Scanning,
    Aggregating,
    Done,
}

#[derive(Debug, Clone)]
pub struct ScanOptions {
    /// Project directory; dependencies are read from `<scan_path>/node_modules`.
    pub scan_path: PathBuf,
    pub csv_path: PathBuf,
    pub parallel: bool,
    pub workers: usize,
    pub show_progress: bool,
}

impl ScanOptions {
    pub fn new(scan_path: impl Into<PathBuf>, csv_path: impl Into<PathBuf>) -> Self {
        Self {
            scan_path: scan_path.into(),
            csv_path: csv_path.into(),
            parallel: true,
            workers: 4,
            show_progress: false,
        }
    }

    pub fn sequential(mut self) -> Self {
        self.parallel = false;
        self
    }

    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers;
        self
    }

    pub fn with_progress(mut self, show: bool) -> Self {
        self.show_progress = show;
        self
    }
}

/// Result of [`ScanEngine::run`].
#[derive(Debug)]
pub struct ScanOutcome {
    pub report: ScanReport,
    /// `Done` or `LoadFailed`.
    pub phase: ScanPhase,
    /// Set when the compromised list could not be read.
    pub load_error: Option<LoadError>,
}

impl ScanOutcome {
    pub fn load_failed(&self) -> bool {
        self.phase == ScanPhase::LoadFailed
    }
}

pub struct ScanEngine {
    options: ScanOptions,
    phase: ScanPhase,
}

impl ScanEngine {
    pub fn new(options: ScanOptions) -> Self {
        Self {
            options,
            phase: ScanPhase::Init,
        }
    }

    /// Runs the scan.
    ///
    /// Unreadable directories and bad manifests are skipped. An unreadable
    /// compromised list ends the scan early with an empty report.
    ///
    /// # Errors
    ///
    /// Only fails if a scan worker panics.
    pub async fn run(mut self) -> Result<ScanOutcome> {
        let builder = ScanReportBuilder::new(&self.options.scan_path, &self.options.csv_path)
            .started_at(Utc::now());

        self.enter(ScanPhase::LoadingDb);
        let db = match CompromisedDb::load(&self.options.csv_path) {
            Ok(db) => db,
            Err(err) => {
                error!(error = %err, "could not load compromised package list");
                self.enter(ScanPhase::LoadFailed);
                return Ok(ScanOutcome {
                    report: builder.build(),
                    phase: self.phase,
                    load_error: Some(err),
                });
            }
        };
        info!(entries = db.len(), "loaded compromised package entries");

        self.enter(ScanPhase::Walking);
        let root = self.options.scan_path.join(DEPENDENCY_ROOT);
        if !root.is_dir() {
            warn!(path = %root.display(), "no node_modules directory found");
            self.enter(ScanPhase::Done);
            return Ok(ScanOutcome {
                report: builder.finished_at(Utc::now()).build(),
                phase: self.phase,
                load_error: None,
            });
        }

        let manifests = tokio::task::spawn_blocking(move || find_manifests(root)).await?;
        info!(count = manifests.len(), "found package.json files");

        self.enter(ScanPhase::Scanning);
        let progress = self.progress_bar(manifests.len());
        let db = Arc::new(db);
        let results = if self.options.parallel {
            scan_concurrent(manifests, db, self.options.workers, progress.clone()).await?
        } else {
            scan_sequential(manifests, db, progress.clone()).await?
        };
        if let Some(pb) = progress {
            pb.finish_with_message(format!("{} packages scanned", results.packages().len()));
        }

        self.enter(ScanPhase::Aggregating);
        let report = builder.finished_at(Utc::now()).results(results).build();

        self.enter(ScanPhase::Done);
        Ok(ScanOutcome {
            report,
            phase: self.phase,
            load_error: None,
        })
    }

    fn enter(&mut self, phase: ScanPhase) {
        debug!(from = ?self.phase, to = ?phase, "scan phase");
        self.phase = phase;
    }

    fn progress_bar(&self, total: usize) -> Option<ProgressBar> {
        if !self.options.show_progress {
            return None;
        }

        let pb = ProgressBar::new(total as u64);
        let style = ProgressStyle::with_template(
            "{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} packages scanned",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("#>-");
        pb.set_style(style);
        pb.enable_steady_tick(Duration::from_millis(100));
        Some(pb)
    }
}

/// Scans manifests on a bounded pool of blocking tasks.
///
/// `buffered` yields results in dispatch order, and only this loop touches
/// the accumulator.
async fn scan_concurrent(
    manifests: Vec<PathBuf>,
    db: Arc<CompromisedDb>,
    workers: usize,
    progress: Option<ProgressBar>,
) -> Result<ScanAccumulator> {
    let mut results = stream::iter(manifests)
        .map(|path| {
            let db = Arc::clone(&db);
            tokio::task::spawn_blocking(move || scan_manifest(&path, &db))
        })
        .buffered(workers.max(1));

    let mut acc = ScanAccumulator::new();
    while let Some(joined) = results.next().await {
        record(&mut acc, joined?);
        if let Some(ref pb) = progress {
            pb.inc(1);
        }
    }

    Ok(acc)
}

/// Scans manifests one after another on a single blocking task.
async fn scan_sequential(
    manifests: Vec<PathBuf>,
    db: Arc<CompromisedDb>,
    progress: Option<ProgressBar>,
) -> Result<ScanAccumulator> {
    let acc = tokio::task::spawn_blocking(move || {
        let mut acc = ScanAccumulator::new();
        for path in &manifests {
            record(&mut acc, scan_manifest(path, &db));
            if let Some(ref pb) = progress {
                pb.inc(1);
            }
        }
        acc
    })
    .await?;

    Ok(acc)
}

fn record(acc: &mut ScanAccumulator, result: Result<ManifestOutcome, ManifestError>) {
    match result {
        Ok(outcome) => {
            if let Some(ref vuln) = outcome.vulnerability {
                warn!(
                    package = %vuln.package_name,
                    version = %vuln.installed_version,
                    range = %vuln.compromised_range,
                    "compromised package found"
                );
            }
            acc.record(outcome.package, outcome.vulnerability);
        }
        Err(err) => debug!(error = %err, "skipping manifest"),
    }
}

/// Convenience wrapper for callers that only need the report.
pub async fn scan(scan_path: &Path, csv_path: &Path) -> Result<ScanReport> {
    let outcome = ScanEngine::new(ScanOptions::new(scan_path, csv_path)).run().await?;
    Ok(outcome.report)
}
