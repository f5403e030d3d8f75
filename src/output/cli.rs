use crate::model::ScanReport;
use anyhow::Result;
use std::fmt::Write;
use tabled::{settings::Style, Table, Tabled};

#[derive(Tabled)]
struct VulnRow {
    #[tabled(rename = "#")]
    index: usize,
    #[tabled(rename = "Package")]
    package: String,
    #[tabled(rename = "Compromised Range")]
    range: String,
    #[tabled(rename = "Severity")]
    severity: String,
    #[tabled(rename = "Location")]
    location: String,
}

pub fn print_summary(report: &ScanReport) -> Result<()> {
    print!("{}", render_summary(report)?);
    Ok(())
}

/// Builds the human-readable scan summary.
pub fn render_summary(report: &ScanReport) -> Result<String> {
    let rule = "=".repeat(70);
    let mut out = String::new();

    writeln!(out)?;
    writeln!(out, "{}", rule)?;
    writeln!(out, "{:^70}", "SCAN SUMMARY")?;
    writeln!(out, "{}", rule)?;
    writeln!(out)?;

    if let Some(start) = report.scan.start_time {
        writeln!(out, "Scan started at: {}", start.format("%Y-%m-%d %H:%M:%S UTC"))?;
    }
    if let Some(ms) = report.scan.duration {
        writeln!(out, "Duration:        {} ms", ms)?;
    }
    writeln!(out)?;

    let summary = &report.summary;
    writeln!(out, "Total packages scanned:     {}", summary.total_packages_scanned)?;
    writeln!(out, "Unique packages:            {}", summary.total_unique_packages)?;
    writeln!(out, "Compromised packages found: {}", summary.compromised_packages_found)?;
    writeln!(out)?;

    if report.vulnerabilities.is_empty() {
        writeln!(out, "No compromised packages detected")?;
    } else {
        writeln!(out, "CRITICAL VULNERABILITIES DETECTED:")?;
        writeln!(out)?;

        let rows: Vec<VulnRow> = report
            .vulnerabilities
            .iter()
            .enumerate()
            .map(|(i, v)| VulnRow {
                index: i + 1,
                package: format!("{}@{}", v.package_name, v.installed_version),
                range: v.compromised_range.clone(),
                severity: format!("\x1b[31m{}\x1b[0m", v.severity),
                location: truncate(&v.location.display().to_string(), 60),
            })
            .collect();

        let table = Table::new(rows).with(Style::rounded()).to_string();
        writeln!(out, "{}", table)?;
        writeln!(out)?;

        for (i, v) in report.vulnerabilities.iter().enumerate() {
            writeln!(out, "{}. {}@{}", i + 1, v.package_name, v.installed_version)?;
            writeln!(out, "   Incident: {}", v.incident)?;
            writeln!(out, "   {}", v.recommendation)?;
        }
        writeln!(out)?;
        writeln!(out, "ACTION REQUIRED: Remove compromised packages immediately!")?;
    }

    writeln!(out)?;
    writeln!(out, "{}", rule)?;
    writeln!(out, "Status: {}", summary.status)?;

    Ok(out)
}

/// Keeps the tail of long paths, which is where the package name is.
fn truncate(s: &str, max_len: usize) -> String {
    let count = s.chars().count();
    if count <= max_len {
        s.to_string()
    } else {
        let tail: String = s.chars().skip(count - (max_len - 3)).collect();
        format!("...{}", tail)
    }
}
