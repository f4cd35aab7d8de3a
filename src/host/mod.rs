// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Contract between the export logic and the application holding the book.
//!
//! The export pipeline never touches the book container directly; it asks a
//! [`BookHost`] for the file registries, raw bytes, the package document and
//! the persisted preferences.

pub mod epub;
#[cfg(test)]
pub mod memory;
pub mod quickparser;

use anyhow::Result;

use crate::models::book::BookEntry;
use crate::models::prefs::Prefs;

pub use epub::EpubHost;

/// Everything the exporter needs from the application holding the book.
pub trait BookHost {
    /// Host build stamp in `YYYYMMDD` form.
    fn launcher_version(&self) -> u32;

    /// Manifest files in package order (`key` = manifest id).
    fn manifest(&self) -> Vec<BookEntry>;

    /// Files present in the book but not listed in the manifest (`key` = href).
    fn other_files(&self) -> Vec<BookEntry>;

    /// Raw bytes of a manifest file.
    fn read_file(&self, id: &str) -> Result<Vec<u8>>;

    /// Raw bytes of any file by its book href.
    fn read_other_file(&self, href: &str) -> Result<Vec<u8>>;

    /// Book path of the package (OPF) document.
    fn opf_book_path(&self) -> String;

    fn prefs(&self) -> Result<Prefs>;

    fn save_prefs(&mut self, prefs: &Prefs) -> Result<()>;
}
