// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Destination folder selection.

use std::path::{Path, PathBuf};

/// Asks the user for a destination folder. `None` means the user cancelled.
pub trait FolderPicker {
    fn pick_folder(&self, start: &Path) -> Option<PathBuf>;
}

/// Presentation options for the native dialog, fixed at construction.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DialogOptions {
    pub title: String,
    pub can_create_directories: bool,
}

impl Default for DialogOptions {
    fn default() -> Self {
        Self {
            title: "Select Folder to copy ebook files into".to_string(),
            can_create_directories: true,
        }
    }
}

/// Modal platform folder dialog via `rfd`; blocks until the user answers.
#[derive(Clone, Debug, Default)]
pub struct NativeFolderPicker {
    options: DialogOptions,
}

impl NativeFolderPicker {
    pub fn new(options: DialogOptions) -> Self {
        Self { options }
    }
}

impl FolderPicker for NativeFolderPicker {
    fn pick_folder(&self, start: &Path) -> Option<PathBuf> {
        rfd::FileDialog::new()
            .set_title(self.options.title.as_str())
            .set_directory(start)
            .set_can_create_directories(self.options.can_create_directories)
            .pick_folder()
    }
}

/// Non-interactive picker that always answers with the same folder.
#[derive(Clone, Debug)]
pub struct PresetFolder(pub PathBuf);

impl FolderPicker for PresetFolder {
    fn pick_folder(&self, _start: &Path) -> Option<PathBuf> {
        Some(self.0.clone())
    }
}

#[cfg(test)]
mod tests {
    use std::path::{Path, PathBuf};

    use super::{DialogOptions, FolderPicker, PresetFolder};

    #[test]
    fn preset_folder_ignores_start_directory() {
        let picker = PresetFolder(PathBuf::from("/books/out"));
        assert_eq!(
            picker.pick_folder(Path::new("/elsewhere")),
            Some(PathBuf::from("/books/out"))
        );
    }

    #[test]
    fn dialog_options_default_allows_creating_folders() {
        let options = DialogOptions::default();
        assert!(options.can_create_directories);
        assert!(options.title.contains("Folder"));
    }
}
