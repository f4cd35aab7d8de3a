// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Write a book's files into a destination folder.
//!
//! Existing files at colliding paths are overwritten; unrelated files are
//! left alone. The copy is not atomic: on failure, files written so far
//! stay on disk.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};

use crate::host::BookHost;
use crate::models::book::{BookEntry, CopyReport, EntryKind};

/// Book path of the mimetype marker written at the destination root.
pub const MIMETYPE_FILE: &str = "mimetype";

/// Literal content of the mimetype marker.
pub const EPUB_MIMETYPE: &[u8] = b"application/epub+zip";

/// Copy every manifest file, then every auxiliary file, then the mimetype
/// marker into `destdir`.
///
/// # Errors
///
/// Stops at the first entry that cannot be read from the host or written to
/// disk.
pub fn copy_book_contents_to(host: &dyn BookHost, destdir: &Path) -> Result<CopyReport> {
    let mut report = CopyReport::default();

    for entry in host.manifest() {
        let data = host
            .read_file(&entry.key)
            .with_context(|| format!("Failed to read manifest item {}", entry.key))?;
        write_entry(destdir, &entry, EntryKind::Manifest, &data)?;
        report.record(&entry.book_path);
    }

    for entry in host.other_files() {
        let data = host
            .read_other_file(&entry.key)
            .with_context(|| format!("Failed to read book file {}", entry.key))?;
        write_entry(destdir, &entry, EntryKind::Auxiliary, &data)?;
        report.record(&entry.book_path);
    }

    let mimetype = BookEntry::new(MIMETYPE_FILE, MIMETYPE_FILE);
    write_entry(destdir, &mimetype, EntryKind::Auxiliary, EPUB_MIMETYPE)?;
    report.record(MIMETYPE_FILE);

    Ok(report)
}

fn write_entry(destdir: &Path, entry: &BookEntry, kind: EntryKind, data: &[u8]) -> Result<()> {
    let target = entry.target_under(destdir)?;
    if let Some(parent) = target.parent()
        && !parent.exists()
    {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory {:?}", parent))?;
    }
    fs::write(&target, data).with_context(|| format!("Failed to write {:?}", target))?;
    tracing::info!(book_path = %entry.book_path, ?kind, "saved");
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::TempDir;

    use super::copy_book_contents_to;
    use crate::host::EpubHost;
    use crate::host::epub::tests::sample_members;
    use crate::host::memory::MemoryHost;
    use crate::models::prefs::PrefsFile;

    fn sample_host() -> EpubHost {
        EpubHost::from_members(sample_members(), PrefsFile::new("unused.json")).unwrap()
    }

    #[test]
    fn copies_manifest_auxiliary_and_mimetype() {
        let tmp = TempDir::new().unwrap();
        let report = copy_book_contents_to(&sample_host(), tmp.path()).unwrap();

        assert_eq!(
            fs::read(tmp.path().join("OEBPS/Text/chapter 1.xhtml")).unwrap(),
            b"<html/>"
        );
        assert_eq!(fs::read(tmp.path().join("OEBPS/Styles/book.css")).unwrap(), b"p {}");
        assert!(tmp.path().join("META-INF/container.xml").is_file());
        assert!(tmp.path().join("OEBPS/content.opf").is_file());
        assert_eq!(
            fs::read(tmp.path().join("mimetype")).unwrap(),
            b"application/epub+zip"
        );
        assert_eq!(report.len(), 6);
        assert_eq!(report.written.last().map(String::as_str), Some("mimetype"));
    }

    #[test]
    fn copies_single_manifest_file_with_exact_bytes() {
        let tmp = TempDir::new().unwrap();
        let host =
            MemoryHost::new(20240101).with_manifest_file("id1", "text/chap1.xhtml", b"<html/>");

        copy_book_contents_to(&host, tmp.path()).unwrap();

        assert_eq!(fs::read(tmp.path().join("text/chap1.xhtml")).unwrap(), b"<html/>");
        assert_eq!(
            fs::read(tmp.path().join("mimetype")).unwrap(),
            b"application/epub+zip"
        );
    }

    #[test]
    fn rejects_book_paths_escaping_the_destination() {
        let tmp = TempDir::new().unwrap();
        let dest = tmp.path().join("out");
        fs::create_dir(&dest).unwrap();
        let host = MemoryHost::new(20240101).with_other_file("../escape.txt", b"nope");

        assert!(copy_book_contents_to(&host, &dest).is_err());
        assert!(!tmp.path().join("escape.txt").exists());
    }

    #[test]
    fn overwrites_collisions_and_keeps_unrelated_files() {
        let tmp = TempDir::new().unwrap();
        fs::create_dir_all(tmp.path().join("OEBPS/Styles")).unwrap();
        fs::write(tmp.path().join("OEBPS/Styles/book.css"), b"old").unwrap();
        fs::write(tmp.path().join("notes.txt"), b"keep me").unwrap();

        copy_book_contents_to(&sample_host(), tmp.path()).unwrap();

        assert_eq!(fs::read(tmp.path().join("OEBPS/Styles/book.css")).unwrap(), b"p {}");
        assert_eq!(fs::read(tmp.path().join("notes.txt")).unwrap(), b"keep me");
    }

    // A directory squatting on a file path makes the write fail; earlier files remain.
    #[test]
    fn failure_aborts_and_keeps_partial_output() {
        let tmp = TempDir::new().unwrap();
        fs::create_dir_all(tmp.path().join("OEBPS/Styles/book.css")).unwrap();

        let err = copy_book_contents_to(&sample_host(), tmp.path()).unwrap_err();

        assert!(err.to_string().contains("book.css"));
        assert!(tmp.path().join("OEBPS/Text/chapter 1.xhtml").is_file());
        assert!(!tmp.path().join("mimetype").exists());
    }
}
