// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! User-facing dialogs.

pub mod folder_picker;

pub use folder_picker::{DialogOptions, FolderPicker, NativeFolderPicker, PresetFolder};
