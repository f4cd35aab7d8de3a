// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Gatekeeping for export destinations.
//!
//! A folder that already holds an unpacked book with an encryption
//! descriptor (`META-INF/encryption.xml`) is refused before anything is
//! written. The check runs once; the folder is not re-checked during the copy.

use std::path::{Component, Path};

use anyhow::{Result, bail};

use crate::utils::walk_folder;

const METADATA_DIR: &str = "META-INF";
const ENCRYPTION_DESCRIPTOR: &str = "encryption.xml";

/// Return `false` when any file below `dir` has both a `META-INF` segment
/// and an `encryption.xml` segment in its relative path (ASCII
/// case-insensitive).
///
/// The caller is responsible for checking that `dir` exists and is a
/// directory.
///
/// # Errors
///
/// Returns an error when part of the tree cannot be listed.
pub fn valid_destination(dir: &Path) -> Result<bool> {
    let files = walk_folder(dir)?;
    Ok(!files.iter().any(|file| {
        let mut has_metadata_dir = false;
        let mut has_descriptor = false;
        for segment in file.components() {
            let Component::Normal(segment) = segment else {
                continue;
            };
            let segment = segment.to_string_lossy();
            has_metadata_dir |= segment.eq_ignore_ascii_case(METADATA_DIR);
            has_descriptor |= segment.eq_ignore_ascii_case(ENCRYPTION_DESCRIPTOR);
        }
        has_metadata_dir && has_descriptor
    }))
}

/// Ensure `dir` is an existing directory that passes [`valid_destination`].
pub fn check_destination(dir: &Path) -> Result<()> {
    if !dir.is_dir() {
        bail!("Folder selected is not a directory or does not exist: {:?}", dir);
    }
    if !valid_destination(dir)? {
        bail!(
            "Folder selected is invalid due to an existing {}/{}: {:?}",
            METADATA_DIR,
            ENCRYPTION_DESCRIPTOR,
            dir
        );
    }
    Ok(())
}
