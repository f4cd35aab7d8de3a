// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! [`BookHost`] backed by a packed `.epub` file.
//!
//! The archive is read fully into memory on open. Files listed in the OPF
//! manifest become manifest entries; every other archive member except
//! `mimetype` becomes an auxiliary entry keyed by its book path.

use std::collections::{BTreeMap, HashSet};
use std::fs::File;
use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result, anyhow, bail};
use zip::ZipArchive;

use super::BookHost;
use super::quickparser::{QuickParser, TagEvent, TagType};
use crate::models::book::BookEntry;
use crate::models::prefs::{Prefs, PrefsFile};

/// Build stamp reported by this host.
pub const EPUB_HOST_VERSION: u32 = 20240101;

const CONTAINER_PATH: &str = "META-INF/container.xml";
const MIMETYPE_PATH: &str = "mimetype";

/// An EPUB archive loaded into memory.
#[derive(Debug)]
pub struct EpubHost {
    files: BTreeMap<String, Vec<u8>>,
    manifest: Vec<BookEntry>,
    other: Vec<BookEntry>,
    opf_path: String,
    prefs_file: PrefsFile,
    launcher_version: u32,
}

impl EpubHost {
    /// Open and index an EPUB file.
    ///
    /// # Errors
    ///
    /// Fails when the file is not a readable zip archive or lacks a
    /// container document pointing at a package document.
    pub fn open(path: &Path, prefs_file: PrefsFile) -> Result<Self> {
        let file = File::open(path).with_context(|| format!("Failed to open book {:?}", path))?;
        let mut archive =
            ZipArchive::new(file).with_context(|| format!("Not a zip archive: {:?}", path))?;

        let mut members = Vec::with_capacity(archive.len());
        for idx in 0..archive.len() {
            let mut entry = archive
                .by_index(idx)
                .with_context(|| format!("Failed to read archive entry {idx} in {:?}", path))?;
            if entry.is_dir() {
                continue;
            }
            let name = entry.name().to_string();
            let mut data = Vec::new();
            entry
                .read_to_end(&mut data)
                .with_context(|| format!("Failed to extract {name} from {:?}", path))?;
            members.push((name, data));
        }

        Self::from_members(members, prefs_file)
    }

    /// Index archive members given in archive order.
    pub(crate) fn from_members(
        members: Vec<(String, Vec<u8>)>,
        prefs_file: PrefsFile,
    ) -> Result<Self> {
        let order: Vec<String> = members.iter().map(|(name, _)| name.clone()).collect();
        let files: BTreeMap<String, Vec<u8>> = members.into_iter().collect();

        let container = files
            .get(CONTAINER_PATH)
            .ok_or_else(|| anyhow!("Book has no {CONTAINER_PATH}"))?;
        let opf_path = rootfile_path(&String::from_utf8_lossy(container))
            .ok_or_else(|| anyhow!("No rootfile declared in {CONTAINER_PATH}"))?;
        let opf = files
            .get(&opf_path)
            .ok_or_else(|| anyhow!("Package document {opf_path} is missing from the book"))?;

        let opf_dir = opf_path.rsplit_once('/').map_or("", |(dir, _)| dir);
        let mut manifest = Vec::new();
        for (id, href) in manifest_items(&String::from_utf8_lossy(opf)) {
            let book_path = resolve_book_path(opf_dir, &href);
            if files.contains_key(&book_path) {
                manifest.push(BookEntry::new(id, book_path));
            } else {
                tracing::warn!(%id, %book_path, "Manifest item not present in book; skipping");
            }
        }

        let manifested: HashSet<&str> = manifest.iter().map(|e| e.book_path.as_str()).collect();
        let other = order
            .iter()
            .filter(|name| name.as_str() != MIMETYPE_PATH && !manifested.contains(name.as_str()))
            .map(|name| BookEntry::new(name.clone(), name.clone()))
            .collect();

        Ok(Self {
            files,
            manifest,
            other,
            opf_path,
            prefs_file,
            launcher_version: EPUB_HOST_VERSION,
        })
    }

    /// Report a different launcher build stamp.
    pub fn with_launcher_version(mut self, version: u32) -> Self {
        self.launcher_version = version;
        self
    }
}

impl BookHost for EpubHost {
    fn launcher_version(&self) -> u32 {
        self.launcher_version
    }

    fn manifest(&self) -> Vec<BookEntry> {
        self.manifest.clone()
    }

    fn other_files(&self) -> Vec<BookEntry> {
        self.other.clone()
    }

    fn read_file(&self, id: &str) -> Result<Vec<u8>> {
        let entry = self
            .manifest
            .iter()
            .find(|entry| entry.key == id)
            .ok_or_else(|| anyhow!("Unknown manifest id: {id}"))?;
        self.read_other_file(&entry.book_path)
    }

    fn read_other_file(&self, href: &str) -> Result<Vec<u8>> {
        match self.files.get(href) {
            Some(data) => Ok(data.clone()),
            None => bail!("No such file in book: {href}"),
        }
    }

    fn opf_book_path(&self) -> String {
        self.opf_path.clone()
    }

    fn prefs(&self) -> Result<Prefs> {
        self.prefs_file.load()
    }

    fn save_prefs(&mut self, prefs: &Prefs) -> Result<()> {
        self.prefs_file.save(prefs)
    }
}

fn is_open_tag(ev: &TagEvent, local: &str) -> bool {
    ev.local_name() == Some(local) && matches!(ev.tag_type, Some(TagType::Begin | TagType::Single))
}

fn rootfile_path(container: &str) -> Option<String> {
    QuickParser::new(container)
        .find(|ev| is_open_tag(ev, "rootfile") && ev.attr("full-path").is_some())
        .and_then(|ev| ev.attr("full-path").map(str::to_string))
}

/// `(id, href)` pairs of the OPF manifest with hrefs percent-decoded.
/// Remote resources and items without an id or href are left out.
fn manifest_items(opf: &str) -> Vec<(String, String)> {
    QuickParser::new(opf)
        .filter(|ev| is_open_tag(ev, "item") && parent_is(&ev.tag_path, "manifest"))
        .filter_map(|ev| {
            let id = ev.attr("id")?.to_string();
            let href = ev.attr("href")?;
            if href.contains("://") || href.starts_with("data:") {
                return None;
            }
            let href = href.split('#').next().unwrap_or(href);
            let decoded = urlencoding::decode(href)
                .map(|cow| cow.into_owned())
                .unwrap_or_else(|_| href.to_string());
            Some((id, decoded))
        })
        .collect()
}

fn parent_is(tag_path: &str, local: &str) -> bool {
    let mut segments = tag_path.rsplit('.');
    segments.next();
    segments
        .next()
        .map(|seg| seg.rsplit_once(':').map_or(seg, |(_, name)| name))
        == Some(local)
}

/// Join an href onto the folder of the referencing document, folding `.`
/// and `..` segments.
fn resolve_book_path(base_dir: &str, href: &str) -> String {
    let mut parts: Vec<&str> = base_dir.split('/').filter(|s| !s.is_empty()).collect();
    for segment in href.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                parts.pop();
            }
            other => parts.push(other),
        }
    }
    parts.join("/")
}
