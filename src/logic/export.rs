// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Export pipeline: derive a folder name, ask for a destination, validate
//! it, copy the book, remember where it went.
//!
//! Responsibilities:
//! - Refuse hosts older than the supported launcher version.
//! - Read the first `dc:title` from the package document.
//! - Gate the chosen folder and perform the copy.
//! - Update the `lastDir` preference only after a successful copy.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};

use crate::host::BookHost;
use crate::host::quickparser::QuickParser;
use crate::logic::copy::copy_book_contents_to;
use crate::logic::destination::check_destination;
use crate::models::book::CopyReport;
use crate::models::prefs::{LAST_DIR_KEY, Prefs};
use crate::ui::FolderPicker;
use crate::utils::folder_name_for_title;

/// Oldest host launcher build the exporter runs on.
pub const MIN_LAUNCHER_VERSION: u32 = 20230315;

/// First launcher build that can report where the package document lives.
pub const OPF_PATH_LAUNCHER_VERSION: u32 = 20190927;

/// Package document location assumed for older launchers.
pub const LEGACY_OPF_HREF: &str = "OEBPS/content.opf";

const TITLE_PATH_SUFFIX: &str = ".dc:title";

/// Settings the pipeline would otherwise read from the process environment.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExportConfig {
    pub min_launcher_version: u32,
    pub opf_path_launcher_version: u32,
    pub legacy_opf_href: String,
    /// Fallback base directory when no usable `lastDir` is stored.
    pub home_dir: PathBuf,
}

impl ExportConfig {
    pub fn with_home_dir(home_dir: PathBuf) -> Self {
        Self {
            min_launcher_version: MIN_LAUNCHER_VERSION,
            opf_path_launcher_version: OPF_PATH_LAUNCHER_VERSION,
            legacy_opf_href: LEGACY_OPF_HREF.to_string(),
            home_dir,
        }
    }
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self::with_home_dir(home::home_dir().unwrap_or_else(|| PathBuf::from(".")))
    }
}

/// How an export run ended without error.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Outcome {
    Exported {
        destination: PathBuf,
        report: CopyReport,
    },
    Cancelled,
}

/// Run an export and translate the result into the host status code:
/// `0` for success or cancellation, `-1` for any failure.
pub fn run(host: &mut dyn BookHost, picker: &dyn FolderPicker, config: &ExportConfig) -> i32 {
    match export(host, picker, config) {
        Ok(Outcome::Exported {
            destination,
            report,
        }) => {
            tracing::info!(
                destination = %destination.display(),
                files = report.len(),
                "Copy to folder finished"
            );
            0
        }
        Ok(Outcome::Cancelled) => {
            tracing::info!("Export cancelled by user");
            0
        }
        Err(err) => {
            tracing::error!("{err:#}");
            -1
        }
    }
}

/// Export the host's book into a folder chosen through `picker`.
///
/// # Errors
///
/// Fails when the host is too old, the chosen folder is not an acceptable
/// destination, or the copy itself fails. A failed copy leaves the files
/// written so far in place.
pub fn export(
    host: &mut dyn BookHost,
    picker: &dyn FolderPicker,
    config: &ExportConfig,
) -> Result<Outcome> {
    let version = host.launcher_version();
    if version < config.min_launcher_version {
        bail!(
            "This exporter requires a host launcher version of {} or later (found {})",
            config.min_launcher_version,
            version
        );
    }

    let mut prefs = host.prefs().unwrap_or_else(|err| {
        tracing::warn!("Ignoring unreadable preferences: {err:#}");
        Prefs::default()
    });
    prefs.set_default(LAST_DIR_KEY, config.home_dir.to_string_lossy());
    let base = prefs
        .get(LAST_DIR_KEY)
        .map(PathBuf::from)
        .filter(|dir| dir.is_dir())
        .unwrap_or_else(|| config.home_dir.clone());

    let title = book_title(&*host, config);
    let folder = folder_name_for_title(title.as_deref().unwrap_or_default());
    tracing::info!(title = title.as_deref().unwrap_or(""), %folder, "Derived folder name");

    let start = start_directory(&base, &folder);
    let Some(chosen) = picker.pick_folder(&start) else {
        return Ok(Outcome::Cancelled);
    };

    check_destination(&chosen)?;
    let report = copy_book_contents_to(&*host, &chosen).context("Copy to folder failed")?;

    let last_dir = chosen.parent().unwrap_or(chosen.as_path());
    prefs.set(LAST_DIR_KEY, last_dir.to_string_lossy());
    if let Err(err) = host.save_prefs(&prefs) {
        tracing::warn!("Failed to save preferences: {err:#}");
    }

    Ok(Outcome::Exported {
        destination: chosen,
        report,
    })
}

/// The picker opens in `base/folder` when that already exists, else in `base`.
fn start_directory(base: &Path, folder: &str) -> PathBuf {
    let default_path = base.join(folder);
    if default_path.is_dir() {
        default_path
    } else {
        base.to_path_buf()
    }
}

/// Text of the first `dc:title` in the package document, trimmed.
///
/// Returns `None` when the document cannot be read, has no title, or its
/// first title is blank; the caller falls back to a fixed folder name.
fn book_title(host: &dyn BookHost, config: &ExportConfig) -> Option<String> {
    let opf_href = if host.launcher_version() >= config.opf_path_launcher_version {
        host.opf_book_path()
    } else {
        config.legacy_opf_href.clone()
    };

    let opf = match host.read_other_file(&opf_href) {
        Ok(data) => data,
        Err(err) => {
            tracing::warn!("Failed to read package document {opf_href}: {err:#}");
            return None;
        }
    };

    first_title(&String::from_utf8_lossy(&opf))
}

fn first_title(opf: &str) -> Option<String> {
    QuickParser::new(opf)
        .find_map(|ev| match ev.text {
            Some(text) if ev.tag_path.ends_with(TITLE_PATH_SUFFIX) => Some(text),
            _ => None,
        })
        .map(|text| text.trim().to_string())
        .filter(|text| !text.is_empty())
}
