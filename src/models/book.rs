// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Book file entries and copy results.

use std::path::{Component, Path, PathBuf};

use anyhow::{Result, bail};

/// One file of the book as reported by the host.
///
/// `key` is the manifest id for manifest files and the href for auxiliary
/// files; `book_path` is the file's location inside the book, `/`-separated.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BookEntry {
    pub key: String,
    pub book_path: String,
}

impl BookEntry {
    pub fn new(key: impl Into<String>, book_path: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            book_path: book_path.into(),
        }
    }

    /// Resolve the entry's book path below `root`.
    ///
    /// Rejects absolute paths and `..` components so a host can never place
    /// files outside the destination folder.
    pub fn target_under(&self, root: &Path) -> Result<PathBuf> {
        let relative = Path::new(&self.book_path);
        let mut target = root.to_path_buf();
        for component in relative.components() {
            match component {
                Component::Normal(part) => target.push(part),
                Component::CurDir => {}
                _ => bail!("Refusing to write outside destination: {}", self.book_path),
            }
        }
        if target == root {
            bail!("Empty book path for {}", self.key);
        }
        Ok(target)
    }
}

/// Which host registry an entry came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EntryKind {
    Manifest,
    Auxiliary,
}

/// Book paths written by a successful copy, in write order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CopyReport {
    pub written: Vec<String>,
}

impl CopyReport {
    pub fn record(&mut self, book_path: &str) {
        self.written.push(book_path.to_string());
    }

    pub fn len(&self) -> usize {
        self.written.len()
    }

    pub fn is_empty(&self) -> bool {
        self.written.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use super::{BookEntry, CopyReport};

    #[test]
    fn copy_report_tracks_written_paths() {
        let mut report = CopyReport::default();
        assert!(report.is_empty());

        report.record("mimetype");
        assert!(!report.is_empty());
        assert_eq!(report.len(), 1);
    }

    #[test]
    fn target_under_joins_nested_book_path() {
        let entry = BookEntry::new("id1", "OEBPS/Text/ch1.xhtml");
        let target = entry.target_under(Path::new("/out")).unwrap();
        assert_eq!(target, Path::new("/out/OEBPS/Text/ch1.xhtml"));
    }

    #[test]
    fn target_under_rejects_escaping_paths() {
        let root = Path::new("/out");
        assert!(BookEntry::new("a", "../evil.txt").target_under(root).is_err());
        assert!(BookEntry::new("b", "/etc/passwd").target_under(root).is_err());
        assert!(BookEntry::new("c", "OEBPS/../../x").target_under(root).is_err());
        assert!(BookEntry::new("d", "").target_under(root).is_err());
    }
}
