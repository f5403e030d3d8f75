use std::cmp::Ordering;

/// Range operator characters stripped from the front of an installed version.
const PREFIX_CHARS: &[char] = &['^', '~', '>', '=', '<'];

/// Strips any leading run of `^ ~ > = <` from a version string.
///
/// ```
/// use compromise_scan::checker::normalize;
///
/// assert_eq!(normalize("^1.2.0"), "1.2.0");
/// assert_eq!(normalize(">=2.0.0"), "2.0.0");
/// assert_eq!(normalize("1.0.0"), "1.0.0");
/// ```
pub fn normalize(version: &str) -> &str {
    version.trim_start_matches(PREFIX_CHARS)
}

/// Compares two dotted versions segment by segment.
///
/// Missing and non-numeric segments count as `0`, so `"1.0.0-beta"`
/// compares equal to `"1.0.0"` in its last position. Pre-release tags do
/// not sort below the release.
pub fn compare_versions(a: &str, b: &str) -> Ordering {
    let left: Vec<u128> = a.split('.').map(segment_value).collect();
    let right: Vec<u128> = b.split('.').map(segment_value).collect();

    for i in 0..left.len().max(right.len()) {
        let l = left.get(i).copied().unwrap_or(0);
        let r = right.get(i).copied().unwrap_or(0);

        match l.cmp(&r) {
            Ordering::Equal => continue,
            other => return other,
        }
    }

    Ordering::Equal
}

/// Digit-only segments too large for `u128` saturate instead of becoming 0.
fn segment_value(segment: &str) -> u128 {
    let segment = segment.trim();
    match segment.parse::<u128>() {
        Ok(n) => n,
        Err(_) if !segment.is_empty() && segment.bytes().all(|b| b.is_ascii_digit()) => u128::MAX,
        Err(_) => 0,
    }
}
