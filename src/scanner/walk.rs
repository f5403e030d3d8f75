use std::path::{Path, PathBuf};
use tracing::debug;
use walkdir::{DirEntry, WalkDir};

/// Manifest filename looked for at every depth.
pub const MANIFEST_FILE: &str = "package.json";

/// Directory names that are never descended into.
pub const SKIPPED_DIRS: &[&str] = &[".bin", ".cache"];

/// Recursively collects every `package.json` under `root`.
///
/// Directories named in [`SKIPPED_DIRS`] are pruned at any depth. Directories
/// that cannot be read are skipped and the walk continues with their
/// siblings. Symlinks are not followed, but a symlink named `package.json`
/// is still reported. The result is sorted so that callers
/// see the same order on every platform.
pub fn find_manifests(root: impl AsRef<Path>) -> Vec<PathBuf> {
    let walker = WalkDir::new(root.as_ref()).follow_links(false).into_iter();

    let mut manifests: Vec<PathBuf> = walker
        .filter_entry(|e| e.depth() == 0 || !is_skipped_dir(e))
        .filter_map(|entry| match entry {
            Ok(e) => Some(e),
            Err(err) => {
                debug!(error = %err, "skipping unreadable entry");
                None
            }
        })
        .filter(|e| !e.file_type().is_dir() && e.file_name() == MANIFEST_FILE)
        .map(DirEntry::into_path)
        .collect();

    manifests.sort();
    manifests
}

fn is_skipped_dir(entry: &DirEntry) -> bool {
    entry.file_type().is_dir()
        && entry
            .file_name()
            .to_str()
            .is_some_and(|name| SKIPPED_DIRS.contains(&name))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn touch(path: &Path) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, "{}").unwrap();
    }

    #[test]
    fn test_finds_nested_manifests() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        touch(&root.join("a/package.json"));
        touch(&root.join("a/node_modules/b/package.json"));
        touch(&root.join("@scope/c/package.json"));

        let found = find_manifests(root);
        assert_eq!(
            found,
            vec![
                root.join("@scope/c/package.json"),
                root.join("a/node_modules/b/package.json"),
                root.join("a/package.json"),
            ]
        );
    }

    #[test]
    fn test_skipped_dirs_are_never_entered() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        touch(&root.join(".bin/package.json"));
        touch(&root.join(".cache/x/package.json"));
        touch(&root.join("a/node_modules/.bin/package.json"));
        touch(&root.join("a/.cache/deep/er/package.json"));
        touch(&root.join("a/package.json"));

        let found = find_manifests(root);
        assert_eq!(found, vec![root.join("a/package.json")]);
    }

    #[test]
    fn test_name_must_match_exactly() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        touch(&root.join("a/package.json.bak"));
        touch(&root.join("a/Package.json"));
        touch(&root.join("a/my-package.json"));
        fs::create_dir_all(root.join("b/package.json")).unwrap();

        assert!(find_manifests(root).is_empty());
    }

    #[test]
    fn test_skipped_name_on_file_is_not_special() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        touch(&root.join(".bin"));
        touch(&root.join("a/package.json"));

        assert_eq!(find_manifests(root), vec![root.join("a/package.json")]);
    }

    #[cfg(unix)]
    #[test]
    fn test_symlinked_manifest_is_found() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        touch(&root.join("store/pkg.json"));
        fs::create_dir_all(root.join("pkg")).unwrap();
        std::os::unix::fs::symlink(root.join("store/pkg.json"), root.join("pkg/package.json"))
            .unwrap();

        assert_eq!(find_manifests(root), vec![root.join("pkg/package.json")]);
    }

    #[test]
    fn test_missing_root_yields_nothing() {
        let dir = tempfile::tempdir().unwrap();
        assert!(find_manifests(dir.path().join("absent")).is_empty());
    }

    #[cfg(unix)]
    #[test]
    fn test_unreadable_dir_is_skipped() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        touch(&root.join("locked/inner/package.json"));
        touch(&root.join("open/package.json"));

        let locked = root.join("locked");
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o000)).unwrap();

        let found = find_manifests(root);

        fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();

        // root ignores permission bits, so only assert the sibling survives
        assert!(found.contains(&root.join("open/package.json")));
    }
}
