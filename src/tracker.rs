use std::{
    ffi::{OsStr, OsString},
    io,
    path::{Path, PathBuf},
};

use derive_more::Display;
use log::debug;
use walkdir::{DirEntry, WalkDir};

use crate::registry::{Claim, FileRegistry};

/// A file in the current directory whose name was already claimed by an
/// earlier directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShadowRecord {
    pub name: OsString,
    /// The directory that first provided `name`.
    pub origin: OsString,
}

impl ShadowRecord {
    /// Shadows are grouped by the directory that shadows them, then by name.
    fn sort_key(&self) -> (&OsStr, &OsStr) {
        (self.origin.as_os_str(), self.name.as_os_str())
    }
}

/// Sorted result of scanning one directory.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct DirectoryReport {
    pub dir: OsString,
    /// Names this directory was the first to provide, ascending.
    pub not_shadowed: Vec<OsString>,
    /// Names already provided by earlier directories, by origin then name.
    pub shadowed: Vec<ShadowRecord>,
}

#[derive(Debug, Display)]
pub enum ScanError {
    /// The directory could not be opened. The run carries on without it.
    #[display("Failed to open {}: {source}", dir.display())]
    Open { dir: PathBuf, source: io::Error },
    /// Reading the directory failed part way through.
    #[display("Failed to read {}: {source}", dir.display())]
    Read {
        dir: PathBuf,
        source: walkdir::Error,
    },
    /// Couldn't tell whether an entry is a directory.
    #[display("Failed to determine the type of {}: {source}", path.display())]
    EntryType { path: PathBuf, source: io::Error },
}

impl std::error::Error for ScanError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ScanError::Open { source, .. } => Some(source),
            ScanError::Read { source, .. } => Some(source),
            ScanError::EntryType { source, .. } => Some(source),
        }
    }
}

impl ScanError {
    /// Whether the remaining directories can still be scanned. Only a
    /// directory that couldn't be opened at all may be skipped.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, ScanError::Open { .. })
    }
}

/// Returns true if `path` is a directory, following symlinks. Entries that
/// vanish before they can be inspected, and dangling symlinks, count as plain
/// files.
fn is_dir(path: &Path) -> Result<bool, ScanError> {
    match std::fs::metadata(path) {
        Ok(metadata) => Ok(metadata.is_dir()),
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(false),
        Err(source) => Err(ScanError::EntryType {
            path: path.to_owned(),
            source,
        }),
    }
}

/// Whether the walk root is a directory. walkdir follows a symlinked root
/// but reports the link's own file type for it, and it happily "walks" a
/// plain file by yielding just that file.
fn root_is_dir(root: &DirEntry) -> bool {
    root.file_type().is_dir()
        || (root.path_is_symlink()
            && std::fs::metadata(root.path()).is_ok_and(|metadata| metadata.is_dir()))
}

/// Convert a walkdir error on the directory itself into an open failure.
fn open_error(dir: &Path, err: walkdir::Error) -> ScanError {
    let source = match err.into_io_error() {
        Some(source) => source,
        None => io::Error::other("filesystem loop"),
    };
    ScanError::Open {
        dir: dir.to_owned(),
        source,
    }
}

/// List the names of the direct children of `dir` that aren't directories.
/// Subdirectories are skipped, not descended into.
pub fn list_plain_files(dir: &OsStr) -> Result<Vec<OsString>, ScanError> {
    let dir = Path::new(dir);
    let mut names = Vec::new();
    // Errors before the first child are about the directory itself.
    let mut opened = false;

    for result in WalkDir::new(dir).max_depth(1) {
        let entry = match result {
            Ok(entry) => entry,
            Err(err) if !opened => return Err(open_error(dir, err)),
            Err(source) => {
                return Err(ScanError::Read {
                    dir: dir.to_owned(),
                    source,
                });
            }
        };

        if entry.depth() == 0 {
            if !root_is_dir(&entry) {
                return Err(ScanError::Open {
                    dir: dir.to_owned(),
                    source: io::Error::from(io::ErrorKind::NotADirectory),
                });
            }
            continue;
        }

        opened = true;
        if is_dir(entry.path())? {
            continue;
        }
        names.push(entry.file_name().to_owned());
    }

    Ok(names)
}

/// Offer each of `names` (found in `dir`) to the registry and collect the
/// sorted report for the directory.
pub fn classify(
    registry: &mut FileRegistry,
    dir: &OsStr,
    names: impl IntoIterator<Item = OsString>,
) -> DirectoryReport {
    let mut report = DirectoryReport {
        dir: dir.to_owned(),
        ..Default::default()
    };

    for name in names {
        match registry.claim(name.clone(), dir) {
            Claim::First => {
                debug!("{}: first in {}", name.to_string_lossy(), dir.to_string_lossy());
                report.not_shadowed.push(name);
            }
            Claim::Shadowed { origin } => {
                debug!("{}: shadowed by {}", name.to_string_lossy(), origin.to_string_lossy());
                report.shadowed.push(ShadowRecord {
                    name,
                    origin: origin.to_owned(),
                });
            }
        }
    }

    report.not_shadowed.sort();
    // Stable, although the key is unique within one directory anyway.
    report.shadowed.sort_by(|a, b| a.sort_key().cmp(&b.sort_key()));

    report
}

/// Scan one directory against everything registered so far.
pub fn scan_directory(
    registry: &mut FileRegistry,
    dir: &OsStr,
) -> Result<DirectoryReport, ScanError> {
    let names = list_plain_files(dir)?;
    Ok(classify(registry, dir, names))
}
