//! End-to-end scans over temporary project trees.

use compromise_scan::engine::{scan, ScanEngine, ScanOptions};
use compromise_scan::output::{sanitize_output_path, write_report_to};
use compromise_scan::{ScanReport, ScanStatus};
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::TempDir;

const LIST: &str = "package_name,version_range\nevil-pkg,1.0.0-1.2.0\n";

struct Project {
    dir: TempDir,
}

impl Project {
    fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("list.csv"), LIST).unwrap();
        Self { dir }
    }

    fn root(&self) -> &Path {
        self.dir.path()
    }

    fn csv(&self) -> PathBuf {
        self.root().join("list.csv")
    }

    fn add(&self, rel: &str, body: &str) -> PathBuf {
        let dir = self.root().join("node_modules").join(rel);
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join("package.json");
        fs::write(&path, body).unwrap();
        path
    }

    fn write_config(&self, toml: &str) {
        let dir = self.root().join("config").join("compromise-scan");
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("config.toml"), toml).unwrap();
    }

    fn run_cli(&self) -> (i32, ScanReport) {
        let output = Command::new(env!("CARGO_BIN_EXE_compromise-scan"))
            .current_dir(self.root())
            .env("XDG_CONFIG_HOME", self.root().join("config"))
            .args(["--csv", "list.csv", "--output", "report.json", "--quiet"])
            .output()
            .unwrap();

        let report = fs::read_to_string(self.root().join("report.json")).unwrap();
        (
            output.status.code().unwrap(),
            serde_json::from_str(&report).unwrap(),
        )
    }
}

#[tokio::test]
async fn compromised_version_is_reported() {
    let project = Project::new();
    let manifest = project.add("evil-pkg", r#"{"name":"evil-pkg","version":"1.1.0"}"#);

    let report = scan(project.root(), &project.csv()).await.unwrap();

    assert_eq!(report.summary.status, ScanStatus::Vulnerable);
    assert_eq!(report.summary.compromised_packages_found, 1);
    assert_eq!(report.vulnerabilities[0].location, manifest);
    assert_eq!(report.vulnerabilities[0].compromised_range, "1.0.0-1.2.0");
}

#[tokio::test]
async fn version_outside_range_is_safe() {
    let project = Project::new();
    project.add("evil-pkg", r#"{"name":"evil-pkg","version":"2.0.0"}"#);

    let report = scan(project.root(), &project.csv()).await.unwrap();

    assert_eq!(report.summary.status, ScanStatus::Safe);
    assert_eq!(report.summary.compromised_packages_found, 0);
    assert_eq!(report.summary.total_packages_scanned, 1);
}

#[tokio::test]
async fn manifest_without_version_is_ignored() {
    let project = Project::new();
    project.add("evil-pkg", r#"{"name":"evil-pkg"}"#);
    project.add("lodash", r#"{"name":"lodash","version":"4.17.21"}"#);

    let report = scan(project.root(), &project.csv()).await.unwrap();

    assert_eq!(report.summary.total_packages_scanned, 1);
    assert_eq!(report.scanned_packages[0].name, "lodash");
    assert!(report.vulnerabilities.is_empty());
}

#[tokio::test]
async fn nested_and_scoped_packages_are_found() {
    let project = Project::new();
    project.add("@scope/util", r#"{"name":"@scope/util","version":"1.0.0"}"#);
    project.add(
        "outer/node_modules/evil-pkg",
        r#"{"name":"evil-pkg","version":"1.0.0"}"#,
    );
    project.add("evil-pkg", r#"{"name":"evil-pkg","version":"1.2.1"}"#);
    project.add(".bin/evil-pkg", r#"{"name":"evil-pkg","version":"1.1.0"}"#);
    project.add(".cache/evil-pkg", r#"{"name":"evil-pkg","version":"1.1.0"}"#);

    let report = scan(project.root(), &project.csv()).await.unwrap();

    assert_eq!(report.summary.total_packages_scanned, 3);
    assert_eq!(report.summary.total_unique_packages, 2);
    assert_eq!(report.summary.compromised_packages_found, 1);
    assert_eq!(report.vulnerabilities[0].installed_version, "1.0.0");
}

#[tokio::test]
async fn summary_invariants_hold() {
    let project = Project::new();
    for (i, version) in ["0.9.0", "1.0.0", "1.1.5", "1.2.0", "1.2.1"].iter().enumerate() {
        project.add(
            &format!("p{}/node_modules/evil-pkg", i),
            &format!(r#"{{"name":"evil-pkg","version":"{}"}}"#, version),
        );
    }

    let outcome = ScanEngine::new(ScanOptions::new(project.root(), project.csv()).with_workers(2))
        .run()
        .await
        .unwrap();
    let report = outcome.report;

    assert_eq!(report.summary.compromised_packages_found, report.vulnerabilities.len());
    assert_eq!(report.summary.compromised_packages_found, 3);
    assert_eq!(report.summary.total_unique_packages, 1);
    assert_eq!(report.summary.total_packages_scanned, report.scanned_packages.len());
    assert!(report.scan.duration.is_some());
}

#[tokio::test]
async fn report_file_matches_report() {
    let project = Project::new();
    project.add("evil-pkg", r#"{"name":"evil-pkg","version":"1.1.0"}"#);

    let report = scan(project.root(), &project.csv()).await.unwrap();
    let out = project.root().join("report.json");
    write_report_to(&report, &out).unwrap();

    let json: serde_json::Value = serde_json::from_str(&fs::read_to_string(&out).unwrap()).unwrap();
    assert_eq!(json["summary"]["status"], "VULNERABLE");
    assert_eq!(json["vulnerabilities"][0]["incident"], "SHA-1 HULUD npm supply chain incident (Nov 2025)");
    assert_eq!(
        json["vulnerabilities"][0]["recommendation"],
        "Remove immediately and check for malicious activity"
    );
    assert!(json["scan"]["startTime"].is_string());
    assert!(json["scan"]["duration"].is_number());
}

#[test]
fn output_path_is_resolved_under_working_dir() {
    let cwd = std::env::current_dir().unwrap();

    let path = sanitize_output_path("report.json").unwrap();
    assert_eq!(path, cwd.join("report.json"));

    assert!(sanitize_output_path("../outside.json").is_err());
    assert!(sanitize_output_path("report.txt").is_err());
}

#[test]
fn cli_exits_one_when_compromised() {
    let project = Project::new();
    project.add("evil-pkg", r#"{"name":"evil-pkg","version":"1.1.0"}"#);

    let (code, report) = project.run_cli();

    assert_eq!(code, 1);
    assert_eq!(report.summary.status, ScanStatus::Vulnerable);
    assert_eq!(report.summary.compromised_packages_found, 1);
}

#[test]
fn cli_exits_zero_when_safe() {
    let project = Project::new();
    project.add("evil-pkg", r#"{"name":"evil-pkg","version":"2.0.0"}"#);

    let (code, report) = project.run_cli();

    assert_eq!(code, 0);
    assert_eq!(report.summary.status, ScanStatus::Safe);
    assert_eq!(report.summary.compromised_packages_found, 0);
}

#[test]
fn cli_exits_zero_when_list_is_missing() {
    let project = Project::new();
    fs::remove_file(project.csv()).unwrap();
    project.add("evil-pkg", r#"{"name":"evil-pkg","version":"1.1.0"}"#);

    let (code, report) = project.run_cli();

    assert_eq!(code, 0);
    assert_eq!(report.summary.status, ScanStatus::Safe);
    assert_eq!(report.summary.total_packages_scanned, 0);
    assert!(report.scan.end_time.is_none());
}

#[cfg(target_os = "linux")]
#[test]
fn cli_exits_one_when_list_is_missing_and_configured_to_fail() {
    let project = Project::new();
    project.write_config("fail_on_load_error = true\n");
    fs::remove_file(project.csv()).unwrap();
    project.add("evil-pkg", r#"{"name":"evil-pkg","version":"1.1.0"}"#);

    let (code, report) = project.run_cli();

    assert_eq!(code, 1);
    assert_eq!(report.summary.status, ScanStatus::Safe);
    assert_eq!(report.summary.total_packages_scanned, 0);
}
