// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! In-memory [`BookHost`] for tests.

use std::collections::BTreeMap;

use anyhow::{Result, anyhow};

use super::BookHost;
use crate::models::book::BookEntry;
use crate::models::prefs::Prefs;

#[derive(Debug, Default)]
pub struct MemoryHost {
    pub launcher_version: u32,
    pub manifest: Vec<BookEntry>,
    pub other: Vec<BookEntry>,
    pub data: BTreeMap<String, Vec<u8>>,
    pub opf_path: String,
    pub prefs: Prefs,
    pub saved_prefs: Option<Prefs>,
}

impl MemoryHost {
    pub fn new(launcher_version: u32) -> Self {
        Self {
            launcher_version,
            opf_path: "OEBPS/content.opf".into(),
            ..Default::default()
        }
    }

    pub fn with_manifest_file(mut self, id: &str, book_path: &str, data: &[u8]) -> Self {
        self.manifest.push(BookEntry::new(id, book_path));
        self.data.insert(book_path.into(), data.to_vec());
        self
    }

    pub fn with_other_file(mut self, book_path: &str, data: &[u8]) -> Self {
        self.other.push(BookEntry::new(book_path, book_path));
        self.data.insert(book_path.into(), data.to_vec());
        self
    }
}

impl BookHost for MemoryHost {
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
            .find(|e| e.key == id)
            .ok_or_else(|| anyhow!("Unknown manifest id: {id}"))?;
        self.read_other_file(&entry.book_path)
    }

    fn read_other_file(&self, href: &str) -> Result<Vec<u8>> {
        self.data
            .get(href)
            .cloned()
            .ok_or_else(|| anyhow!("No such file in book: {href}"))
    }

    fn opf_book_path(&self) -> String {
        self.opf_path.clone()
    }

    fn prefs(&self) -> Result<Prefs> {
        Ok(self.prefs.clone())
    }

    fn save_prefs(&mut self, prefs: &Prefs) -> Result<()> {
        self.saved_prefs = Some(prefs.clone());
        Ok(())
    }
}
