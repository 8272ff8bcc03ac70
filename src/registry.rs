use std::{
    collections::{BTreeMap, btree_map::Entry},
    ffi::{OsStr, OsString},
};

/// Outcome of offering a file name to the registry.
#[derive(Debug, PartialEq, Eq)]
pub enum Claim<'a> {
    /// The name had not been seen before and now belongs to the directory.
    First,
    /// The name already belongs to an earlier directory.
    Shadowed { origin: &'a OsStr },
}

/// Maps every file name seen so far to the directory that introduced it.
/// Entries are never replaced: the first directory to claim a name keeps it.
#[derive(Debug, Default)]
pub struct FileRegistry {
    files: BTreeMap<OsString, OsString>,
}

impl FileRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `name` as found in `dir`, unless some directory already
    /// has it.
    pub fn claim(&mut self, name: OsString, dir: &OsStr) -> Claim<'_> {
        match self.files.entry(name) {
            Entry::Occupied(entry) => Claim::Shadowed {
                origin: entry.into_mut().as_os_str(),
            },
            Entry::Vacant(entry) => {
                entry.insert(dir.to_owned());
                Claim::First
            }
        }
    }

    /// Number of distinct file names seen so far.
    pub fn len(&self) -> usize {
        self.files.len()
    }
}
