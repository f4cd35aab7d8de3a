// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Recursive directory listing helper.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

/// List every file below `top`, relative to `top`, in sorted order.
///
/// Directories are descended into but not listed themselves. Symlinks to
/// directories are neither listed nor followed; other symlinks count as
/// files. Subdirectories that cannot be read are skipped with a warning.
///
/// # Errors
///
/// Returns an error only when `top` itself cannot be read.
pub fn walk_folder(top: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    let mut pending = Vec::new();
    let entries =
        fs::read_dir(top).with_context(|| format!("Failed to read directory {:?}", top))?;
    collect_entries(top, entries, &mut files, &mut pending);

    while let Some(dir) = pending.pop() {
        match fs::read_dir(&dir) {
            Ok(entries) => collect_entries(top, entries, &mut files, &mut pending),
            Err(err) => tracing::warn!(dir = %dir.display(), "Skipping unreadable directory: {err}"),
        }
    }

    files.sort();
    Ok(files)
}

fn collect_entries(
    top: &Path,
    entries: fs::ReadDir,
    files: &mut Vec<PathBuf>,
    pending: &mut Vec<PathBuf>,
) {
    for entry in entries {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                tracing::warn!("Skipping unreadable directory entry: {err}");
                continue;
            }
        };
        let path = entry.path();
        let Ok(file_type) = entry.file_type() else {
            tracing::warn!(path = %path.display(), "Skipping entry that cannot be inspected");
            continue;
        };
        if file_type.is_dir() {
            pending.push(path);
        } else if file_type.is_symlink() && path.is_dir() {
            continue;
        } else if let Ok(relative) = path.strip_prefix(top) {
            files.push(relative.to_path_buf());
        }
    }
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::path::PathBuf;

    use tempfile::TempDir;

    use super::walk_folder;

    #[test]
    fn walk_folder_lists_nested_files_relative_to_root() {
        let tmp = TempDir::new().unwrap();
        fs::create_dir_all(tmp.path().join("OEBPS/Text")).unwrap();
        fs::create_dir_all(tmp.path().join("empty")).unwrap();
        fs::write(tmp.path().join("mimetype"), b"x").unwrap();
        fs::write(tmp.path().join("OEBPS/Text/ch1.xhtml"), b"x").unwrap();

        let files = walk_folder(tmp.path()).unwrap();

        assert_eq!(
            files,
            vec![
                PathBuf::from("OEBPS").join("Text").join("ch1.xhtml"),
                PathBuf::from("mimetype"),
            ]
        );
    }

    #[cfg(unix)]
    #[test]
    fn walk_folder_skips_symlinked_directories() {
        let tmp = TempDir::new().unwrap();
        let outside = TempDir::new().unwrap();
        fs::create_dir_all(outside.path().join("META-INF")).unwrap();
        fs::write(outside.path().join("META-INF/encryption.xml"), b"x").unwrap();
        fs::write(tmp.path().join("a.txt"), b"x").unwrap();
        std::os::unix::fs::symlink(outside.path(), tmp.path().join("linked")).unwrap();

        let files = walk_folder(tmp.path()).unwrap();

        assert_eq!(files, vec![PathBuf::from("a.txt")]);
    }

    // Permission bits are ignored for root, so only the absence of an error is asserted.
    #[cfg(unix)]
    #[test]
    fn walk_folder_tolerates_unreadable_subdirectories() {
        use std::os::unix::fs::PermissionsExt;

        let tmp = TempDir::new().unwrap();
        let locked = tmp.path().join("locked");
        fs::create_dir_all(&locked).unwrap();
        fs::write(locked.join("inner.txt"), b"x").unwrap();
        fs::write(tmp.path().join("a.txt"), b"x").unwrap();
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o000)).unwrap();

        let result = walk_folder(tmp.path());
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();

        let files = result.unwrap();
        assert!(files.contains(&PathBuf::from("a.txt")));
    }

    #[test]
    fn walk_folder_errors_for_missing_directory() {
        let tmp = TempDir::new().unwrap();
        assert!(walk_folder(&tmp.path().join("missing")).is_err());
    }
}
