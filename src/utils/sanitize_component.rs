// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Produce filesystem-safe folder names from book titles.

/// Characters that are never allowed in a path component on at least one
/// supported platform.
const FORBIDDEN: &[char] = &['\u{ae}', '\0', '\\', '|', '?', '*', '<', '"', ':', '>', '+', '/'];

const SUBSTITUTE: char = '_';

/// Fallback used when a title sanitizes to nothing.
pub const FALLBACK_FOLDER_NAME: &str = "foldername";

/// Produce a filesystem-safe path component.
///
/// # Steps
/// - Drop everything outside printable ASCII.
/// - Turn forbidden characters (`® \ | ? * < " : > + /`) into `_`.
/// - Turn each run of whitespace into a single `_`.
/// - Neutralise dot-only names, `..` sequences and leading/trailing dots.
///
/// The result may be empty; callers that need a name should go through
/// [`folder_name_for_title`].
pub fn sanitize_component(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut in_whitespace = false;

    for ch in value.chars().filter(|c| is_printable(*c)) {
        if ch.is_ascii_whitespace() || ch == '\x0b' {
            if !in_whitespace {
                out.push(SUBSTITUTE);
                in_whitespace = true;
            }
            continue;
        }
        in_whitespace = false;
        if FORBIDDEN.contains(&ch) {
            out.push(SUBSTITUTE);
        } else {
            out.push(ch);
        }
    }

    if !out.is_empty() && out.chars().all(|c| c == '.') {
        return SUBSTITUTE.to_string();
    }

    let mut out = out.replace("..", "_");

    // Windows refuses components that end with a period.
    if out.ends_with('.') {
        out.pop();
        out.push(SUBSTITUTE);
    }

    // Leading dots hide the folder on macOS and Unix.
    if out.starts_with('.') {
        out.replace_range(..1, "_");
    }

    out
}

/// Sanitize a book title into a folder name, falling back to
/// [`FALLBACK_FOLDER_NAME`] when nothing usable survives.
pub fn folder_name_for_title(title: &str) -> String {
    let name = sanitize_component(title);
    if name.is_empty() {
        FALLBACK_FOLDER_NAME.to_string()
    } else {
        name
    }
}

/// Printable ASCII: graphic characters plus the six ASCII whitespace characters.
fn is_printable(ch: char) -> bool {
    ch.is_ascii_graphic() || matches!(ch, ' ' | '\t' | '\n' | '\r' | '\x0b' | '\x0c')
}
