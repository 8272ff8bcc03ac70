use std::ffi::{OsStr, OsString};

/// A directory-producing command line option, in the order it was given.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DirSource {
    /// `-I dir` or `-L dir`. These are aliases.
    Dir(OsString),
    /// `-P path`, a colon-separated list of directories.
    PathList(OsString),
}

/// Split a colon-separated search path. Empty components are dropped, so
/// `"a::b:"` gives `a` and `b`.
#[cfg(unix)]
pub fn split_path_list(path: &OsStr) -> Vec<OsString> {
    use std::os::unix::ffi::OsStrExt as _;

    path.as_bytes()
        .split(|&b| b == b':')
        .filter(|component| !component.is_empty())
        .map(|component| OsStr::from_bytes(component).to_owned())
        .collect()
}

// Elsewhere there's no byte access to `OsStr`, so go through a lossy string.
#[cfg(not(unix))]
pub fn split_path_list(path: &OsStr) -> Vec<OsString> {
    path.to_string_lossy()
        .split(':')
        .filter(|component| !component.is_empty())
        .map(OsString::from)
        .collect()
}

/// Build the ordered list of directories to scan. Option-derived directories
/// come first, then the positional ones. Nothing is deduplicated or checked
/// for existence here.
pub fn build_directory_list(options: &[DirSource], positional: &[OsString]) -> Vec<OsString> {
    let mut dirs = Vec::new();
    for option in options {
        match option {
            DirSource::Dir(dir) => dirs.push(dir.clone()),
            DirSource::PathList(path) => dirs.extend(split_path_list(path)),
        }
    }
    dirs.extend(positional.iter().cloned());
    dirs
}
