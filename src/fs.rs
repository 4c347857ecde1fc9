//! File-system provider used by the organizer.
//!
//! The organizer never touches `std::fs` directly. Everything it needs from
//! the file system goes through the [`FileSystem`] trait, which keeps the
//! decision logic testable against providers that fail on demand.

use std::ffi::OsString;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// The kind of an entry found while listing a directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    /// A regular file, or a symbolic link (links are not followed).
    File,
    /// A directory.
    Directory,
}

/// A single immediate entry of a listed directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectoryEntry {
    /// The entry's file name, converted lossily for classification and display.
    pub name: String,
    /// The exact file name on disk. Every path built for the entry uses this.
    pub file_name: OsString,
    /// Whether the entry is a file or a directory.
    pub kind: EntryKind,
}

impl DirectoryEntry {
    /// Creates an entry with the given name and kind.
    pub fn new(name: impl Into<String>, kind: EntryKind) -> Self {
        let name = name.into();
        Self {
            file_name: OsString::from(&name),
            name,
            kind,
        }
    }

    /// Creates an entry from a raw file name, which need not be valid UTF-8.
    pub fn from_file_name(file_name: OsString, kind: EntryKind) -> Self {
        Self {
            name: file_name.to_string_lossy().into_owned(),
            file_name,
            kind,
        }
    }

    /// Returns true if this entry is a directory.
    pub fn is_directory(&self) -> bool {
        self.kind == EntryKind::Directory
    }
}

/// Operations the organizer needs from a file system.
///
/// Implementations must honour two contracts:
///
/// * [`make_directory`](Self::make_directory) succeeds when the directory
///   already exists.
/// * [`move_entry`](Self::move_entry) never replaces an existing destination;
///   it fails with [`io::ErrorKind::AlreadyExists`] instead.
pub trait FileSystem {
    /// Lists the immediate entries of `path`.
    fn list_entries(&self, path: &Path) -> io::Result<Vec<DirectoryEntry>>;

    /// Returns true if anything exists at `path`. Dangling links count as existing.
    fn exists(&self, path: &Path) -> bool;

    /// Returns true if `path` is a directory.
    fn is_dir(&self, path: &Path) -> bool;

    /// Resolves `path` to an absolute path without `.`, `..` or symlinks.
    fn canonicalize(&self, path: &Path) -> io::Result<PathBuf>;

    /// Creates a directory, optionally with its missing parents.
    fn make_directory(&self, path: &Path, recursive: bool) -> io::Result<()>;

    /// Moves `source` to `destination`, failing if the destination exists.
    fn move_entry(&self, source: &Path, destination: &Path) -> io::Result<()>;
}

impl<T: FileSystem + ?Sized> FileSystem for &T {
    fn list_entries(&self, path: &Path) -> io::Result<Vec<DirectoryEntry>> {
        (**self).list_entries(path)
    }

    fn exists(&self, path: &Path) -> bool {
        (**self).exists(path)
    }

    fn is_dir(&self, path: &Path) -> bool {
        (**self).is_dir(path)
    }

    fn canonicalize(&self, path: &Path) -> io::Result<PathBuf> {
        (**self).canonicalize(path)
    }

    fn make_directory(&self, path: &Path, recursive: bool) -> io::Result<()> {
        (**self).make_directory(path, recursive)
    }

    fn move_entry(&self, source: &Path, destination: &Path) -> io::Result<()> {
        (**self).move_entry(source, destination)
    }
}

/// [`FileSystem`] backed by the local disk through `std::fs`.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalFileSystem;

impl FileSystem for LocalFileSystem {
    fn list_entries(&self, path: &Path) -> io::Result<Vec<DirectoryEntry>> {
        let mut entries = Vec::new();
        for entry in fs::read_dir(path)? {
            let entry = entry?;
            // file_type() does not follow symlinks
            let kind = if entry.file_type()?.is_dir() {
                EntryKind::Directory
            } else {
                EntryKind::File
            };
            entries.push(DirectoryEntry::from_file_name(entry.file_name(), kind));
        }
        Ok(entries)
    }

    fn exists(&self, path: &Path) -> bool {
        fs::symlink_metadata(path).is_ok()
    }

    fn is_dir(&self, path: &Path) -> bool {
        path.is_dir()
    }

    fn canonicalize(&self, path: &Path) -> io::Result<PathBuf> {
        fs::canonicalize(path)
    }

    fn make_directory(&self, path: &Path, recursive: bool) -> io::Result<()> {
        let result = if recursive {
            fs::create_dir_all(path)
        } else {
            fs::create_dir(path)
        };
        match result {
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists && path.is_dir() => Ok(()),
            other => other,
        }
    }

    fn move_entry(&self, source: &Path, destination: &Path) -> io::Result<()> {
        // rename() silently replaces files on Unix
        if self.exists(destination) {
            return Err(io::Error::new(
                io::ErrorKind::AlreadyExists,
                format!("destination {} already exists", destination.display()),
            ));
        }
        fs::rename(source, destination)
    }
}
