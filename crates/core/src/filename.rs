//! Safe local filenames derived from URL paths.
//!
//! The name portion keeps only alphanumerics plus `.`, `_` and `-` and is
//! capped at [`MAX_NAME_LEN`] characters. The extension is kept as-is so the
//! conversion backend can still detect the document format.

use std::fmt;

/// Maximum number of characters kept from the name portion.
pub const MAX_NAME_LEN: usize = 50;

/// A sanitized filename split into name and extension (with leading dot).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CleanName {
    pub stem: String,
    pub extension: String,
}

impl CleanName {
    /// Sanitize the final component of a URL path.
    ///
    /// Anything after `?` is dropped. If the path itself has no extension but
    /// the dropped query ends in one (`download?name=report.docx`), that
    /// extension is kept.
    pub fn from_url_path(url_path: &str) -> Self {
        let (path, query) = match url_path.split_once('?') {
            Some((path, query)) => (path, Some(query)),
            None => (url_path, None),
        };

        let (name, mut extension) = split_extension(basename(path));
        if extension.is_empty()
            && let Some(query) = query
        {
            let (_, query_ext) = split_extension(basename(query));
            if is_plain_extension(query_ext) {
                extension = query_ext;
            }
        }

        let stem = name
            .chars()
            .filter(|c| c.is_alphanumeric() || matches!(c, '.' | '_' | '-'))
            .take(MAX_NAME_LEN)
            .collect();

        Self { stem, extension: extension.to_string() }
    }

    pub fn is_empty(&self) -> bool {
        self.stem.is_empty() && self.extension.is_empty()
    }
}

impl fmt::Display for CleanName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.stem, self.extension)
    }
}

/// Sanitize a URL path into a filename, e.g. `report?ver=2.pdf` -> `report.pdf`.
pub fn clean_filename(url_path: &str) -> String {
    CleanName::from_url_path(url_path).to_string()
}

fn basename(path: &str) -> &str {
    path.rsplit('/').next().unwrap_or(path)
}

/// Split at the last dot; leading dots (`.bashrc`) do not start an extension.
fn split_extension(name: &str) -> (&str, &str) {
    match name.rfind('.') {
        Some(idx) if name[..idx].chars().any(|c| c != '.') => (&name[..idx], &name[idx..]),
        _ => (name, ""),
    }
}

fn is_plain_extension(ext: &str) -> bool {
    ext.len() > 1 && ext[1..].chars().all(|c| c.is_ascii_alphanumeric())
}
