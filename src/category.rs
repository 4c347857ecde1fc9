//! Extension-based classification of directory entries.
//!
//! A file's category is derived from its name alone: the lowercase extension
//! without the leading dot, or [`NO_EXTENSION_CATEGORY`] when the name carries
//! no extension. File contents are never inspected.
//!
//! # Examples
//!
//! ```
//! use dirsort::category::{CategoryKey, classify};
//!
//! assert_eq!(classify("report.PDF").as_str(), "pdf");
//! assert_eq!(classify("archive.tar.gz").as_str(), "gz");
//! assert_eq!(classify("README"), CategoryKey::no_extension());
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;

/// Category used for names that carry no extension.
pub const NO_EXTENSION_CATEGORY: &str = "_noext";

/// The key a file is grouped under, doubling as its destination directory name.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CategoryKey(String);

impl CategoryKey {
    /// Returns the sentinel category for names without an extension.
    pub fn no_extension() -> Self {
        Self(NO_EXTENSION_CATEGORY.to_string())
    }

    /// Returns the key as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the directory name files of this category are moved into.
    ///
    /// # Examples
    ///
    /// ```
    /// use dirsort::category::classify;
    ///
    /// assert_eq!(classify("photo.JPG").dir_name(), "jpg");
    /// assert_eq!(classify("Makefile").dir_name(), "_noext");
    /// ```
    pub fn dir_name(&self) -> &str {
        &self.0
    }

    /// Returns true if this is the no-extension sentinel.
    pub fn is_no_extension(&self) -> bool {
        self.0 == NO_EXTENSION_CATEGORY
    }
}

impl fmt::Display for CategoryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for CategoryKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Extracts the extension of a file name, if it has one.
///
/// The extension is the text after the last `.`. A leading dot marks a hidden
/// file rather than an extension, and a trailing dot yields nothing.
///
/// # Examples
///
/// ```
/// use dirsort::category::extension_of;
///
/// assert_eq!(extension_of("notes.txt"), Some("txt"));
/// assert_eq!(extension_of(".bashrc"), None);
/// assert_eq!(extension_of(".config.toml"), Some("toml"));
/// assert_eq!(extension_of("trailing."), None);
/// ```
pub fn extension_of(name: &str) -> Option<&str> {
    let (stem, ext) = name.rsplit_once('.')?;
    if stem.is_empty() || ext.is_empty() {
        return None;
    }
    Some(ext)
}

/// Classifies an entry name into its category.
///
/// Classification is case-insensitive: `a.TXT`, `b.txt` and `c.Txt` all land
/// in `txt`.
pub fn classify(name: &str) -> CategoryKey {
    match extension_of(name) {
        Some(ext) => CategoryKey(ext.to_lowercase()),
        None => CategoryKey::no_extension(),
    }
}
