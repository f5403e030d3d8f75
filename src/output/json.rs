use crate::error::{PathError, WriteError};
use crate::model::ScanReport;
use std::env;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Component, Path, PathBuf};

/// Default report filename, relative to the working directory.
pub const DEFAULT_OUTPUT: &str = "compromise-scan-report.json";

pub fn print_json(report: &ScanReport) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(report)?;
    println!("{}", json);
    Ok(())
}

/// Resolves `requested` against the current directory and validates it.
///
/// # Errors
///
/// See [`sanitize_output_path_in`].
pub fn sanitize_output_path(requested: impl AsRef<Path>) -> Result<PathBuf, PathError> {
    let cwd = env::current_dir().map_err(PathError::WorkingDir)?;
    sanitize_output_path_in(requested, &cwd)
}

/// Resolves `requested` against `cwd` and validates it as a report location.
///
/// The resolved path must lie inside `cwd` (compared by path segments, so
/// `/a/bc` is not inside `/a/b`), must end in `.json`, and the requested
/// filename must not contain `..`, `/` or `\`.
///
/// # Errors
///
/// Returns the [`PathError`] for the first check that fails.
///
/// # Example
///
/// ```
/// use compromise_scan::output::sanitize_output_path_in;
/// use std::path::Path;
///
/// let cwd = Path::new("/work");
/// assert_eq!(
///     sanitize_output_path_in("report.json", cwd).unwrap(),
///     Path::new("/work/report.json")
/// );
/// assert!(sanitize_output_path_in("../outside.json", cwd).is_err());
/// assert!(sanitize_output_path_in("report.txt", cwd).is_err());
/// ```
pub fn sanitize_output_path_in(
    requested: impl AsRef<Path>,
    cwd: &Path,
) -> Result<PathBuf, PathError> {
    let requested = requested.as_ref();
    let cwd = normalize(cwd);
    let resolved = normalize(&cwd.join(requested));

    if !resolved.starts_with(&cwd) {
        return Err(PathError::OutsideWorkingDir { cwd });
    }

    if resolved.extension().and_then(|e| e.to_str()) != Some("json") {
        return Err(PathError::NotJson);
    }

    let suspicious = match requested.file_name().and_then(|n| n.to_str()) {
        Some(name) => name.contains("..") || name.contains('/') || name.contains('\\'),
        None => true,
    };
    if suspicious {
        return Err(PathError::SuspiciousFilename);
    }

    Ok(resolved)
}

/// Validates `requested` and writes the report there as pretty JSON.
///
/// Returns the absolute path that was written.
pub fn write_report(report: &ScanReport, requested: impl AsRef<Path>) -> Result<PathBuf, WriteError> {
    let path = sanitize_output_path(requested)?;
    write_report_to(report, &path)?;
    Ok(path)
}

/// Writes the report to an already validated path.
pub fn write_report_to(report: &ScanReport, path: &Path) -> Result<(), WriteError> {
    let io_err = |source| WriteError::Io {
        path: path.to_path_buf(),
        source,
    };

    let file = File::create(path).map_err(io_err)?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, report)?;
    writer.write_all(b"\n").map_err(io_err)?;
    writer.flush().map_err(io_err)?;
    Ok(())
}

/// Lexically resolves `.` and `..` without touching the filesystem.
fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                out.pop();
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}
