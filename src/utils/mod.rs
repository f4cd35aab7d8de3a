// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Shared helper utilities reused by the host adapters and export logic.

pub mod sanitize_component;
pub mod walk;

/// Sanitize a book title into a folder name with a fallback.
pub use sanitize_component::folder_name_for_title;
/// List files below a directory, relative to it.
pub use walk::walk_folder;
