// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Business logic for exporting a book into a folder.

pub mod copy;
pub mod destination;
pub mod export;
