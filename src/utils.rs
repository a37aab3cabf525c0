/*!
 * Utility functions for ctxmerge
 */

use std::collections::HashSet;
use std::env;
use std::io;
use std::path::{Component, Path, PathBuf};

use once_cell::sync::Lazy;

/// Entry names that are never descended into or included
pub static EXCLUDED_NAMES: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        // Dependencies
        "node_modules",
        // Version Control
        ".git",
        // Build & Dist
        "dist",
        "build",
        ".next",
        "out",
    ]
    .into_iter()
    .collect()
});

/// Check a single entry name against [`EXCLUDED_NAMES`]
pub fn is_excluded_name(name: &str) -> bool {
    EXCLUDED_NAMES.contains(name)
}

/// Heuristic token estimate: one token per four characters, rounded up
pub fn estimate_tokens(chars: usize) -> usize {
    chars.div_ceil(4)
}

/// Format a count with `,` thousands separators
pub fn format_with_separators(num: usize) -> String {
    let digits = num.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);

    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }

    out
}

/// Render a path with `/` separators regardless of platform
pub fn normalize_path(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}

/// Make `path` absolute against the current directory
///
/// `.` and `..` are folded lexically and symlinks are left in place, so a
/// linked folder keeps the path it was selected by.
pub fn absolute_path(path: &Path) -> io::Result<PathBuf> {
    let joined = if path.is_absolute() {
        path.to_path_buf()
    } else {
        env::current_dir()?.join(path)
    };

    let mut resolved = PathBuf::new();
    for component in joined.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                resolved.pop();
            }
            other => resolved.push(other),
        }
    }

    Ok(resolved)
}

/// Length of `text` in UTF-16 code units
///
/// Characters outside the Basic Multilingual Plane count twice.
pub fn text_length(text: &str) -> usize {
    text.encode_utf16().count()
}

/// Strip trailing whitespace, including U+FEFF but not U+0085
pub fn trim_trailing_whitespace(text: &str) -> &str {
    text.trim_end_matches(|c: char| c == '\u{FEFF}' || (c.is_whitespace() && c != '\u{85}'))
}

/// Number of lines in a piece of text, counting a final unterminated line
pub fn count_lines(text: &str) -> usize {
    text.lines().count()
}
