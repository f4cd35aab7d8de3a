// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Domain layer: plain data types shared between hosts and export logic.

pub mod book;
pub mod prefs;
