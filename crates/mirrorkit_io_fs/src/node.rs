//! Directory handle used for tracked roots and transient tree-walk nodes.

use std::ffi::{OsStr, OsString};
use std::fmt;
use std::fs;
use std::hash::{Hash, Hasher};
use std::path::{Path, PathBuf};

use crate::spec::{MirrorError, Result};
use crate::util::{derive_name, normalize_path};

/// One file found directly under a directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpecFileEntry {
    /// Full path of the file (or of the link pointing at it).
    pub path_file: PathBuf,
    /// File name used at the destination, byte for byte.
    pub name_file: OsString,
    /// The entry itself is a symbolic link.
    pub if_is_symlink: bool,
}

/// Result of reading a directory once.
///
/// Holds both views of the same listing, so callers that need the files and
/// the subdirectories to agree should use [`DirectoryNode::snapshot`].
#[derive(Debug, Clone)]
pub struct SpecDirectorySnapshot<'a> {
    /// Child directories, sorted by name.
    pub subdirectories: Vec<DirectoryNode<'a>>,
    /// Child files, sorted by name.
    pub files: Vec<SpecFileEntry>,
    /// Entries that are neither files nor directories (sockets, FIFOs,
    /// devices, broken links).
    pub specials: Vec<PathBuf>,
}

/// Immutable handle to one filesystem directory.
///
/// `path_full` is computed once at construction and is the identity of the
/// node: equality and hashing ignore `parent`. Child listings are not cached;
/// every call re-reads the filesystem.
#[derive(Debug, Clone)]
pub struct DirectoryNode<'a> {
    path_full: PathBuf,
    name: OsString,
    parent: Option<&'a DirectoryNode<'a>>,
    if_is_symlink: bool,
}

impl<'a> DirectoryNode<'a> {
    /// Build a root node (no parent) for `path`.
    ///
    /// The path is canonicalized; a missing tail is kept as-is under its
    /// deepest existing ancestor.
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self::from_canonical(normalize_path(path.as_ref()))
    }

    /// Root node for a path that is already canonical.
    pub(crate) fn from_canonical(path_full: PathBuf) -> Self {
        Self {
            name: derive_name(&path_full),
            path_full,
            parent: None,
            if_is_symlink: false,
        }
    }

    // Children are not re-canonicalized: the parent is already canonical and a
    // symlinked child must keep its own name, not its target's.
    fn new_child(
        path_full: PathBuf,
        name: OsString,
        parent: &'a DirectoryNode<'a>,
        if_is_symlink: bool,
    ) -> Self {
        Self {
            path_full,
            name,
            parent: Some(parent),
            if_is_symlink,
        }
    }

    pub fn path_full(&self) -> &Path {
        &self.path_full
    }

    /// Last segment of [`Self::path_full`]; empty for a filesystem root.
    pub fn name(&self) -> &OsStr {
        &self.name
    }

    pub fn parent(&self) -> Option<&'a DirectoryNode<'a>> {
        self.parent
    }

    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }

    /// The node was reached through a symbolic link.
    pub fn is_symlink(&self) -> bool {
        self.if_is_symlink
    }

    /// Number of parent hops up to the root.
    pub fn depth(&self) -> usize {
        let mut n_depth = 0;
        let mut node_cursor = self.parent;
        while let Some(node) = node_cursor {
            n_depth += 1;
            node_cursor = node.parent;
        }
        n_depth
    }

    /// Path of this node relative to its root, built from the parent chain.
    pub fn path_relative(&self) -> PathBuf {
        let mut l_names = Vec::with_capacity(self.depth());
        let mut node_cursor = Some(self);
        while let Some(node) = node_cursor {
            if node.parent.is_none() {
                break;
            }
            l_names.push(node.name.as_os_str());
            node_cursor = node.parent;
        }
        l_names.iter().rev().collect()
    }

    /// Child directories, re-read from disk on every call.
    pub fn subdirectories(&self) -> Result<Vec<DirectoryNode<'_>>> {
        Ok(self.snapshot()?.subdirectories)
    }

    /// Paths of child files, re-read from disk on every call.
    pub fn files(&self) -> Result<Vec<PathBuf>> {
        Ok(self
            .snapshot()?
            .files
            .into_iter()
            .map(|spec_file| spec_file.path_file)
            .collect())
    }

    /// Read the directory once and classify every entry.
    ///
    /// Symbolic links are followed for classification: a link to a directory
    /// is listed as a subdirectory, a link to a file as a file.
    pub fn snapshot(&self) -> Result<SpecDirectorySnapshot<'_>> {
        let iter_entries =
            fs::read_dir(&self.path_full).map_err(|e| MirrorError::io(&self.path_full, e))?;

        let mut l_dirs = Vec::new();
        let mut l_files = Vec::new();
        let mut l_specials = Vec::new();

        for entry_res in iter_entries {
            let entry = entry_res.map_err(|e| MirrorError::io(&self.path_full, e))?;
            let path_entry = entry.path();
            let name_entry = entry.file_name();
            let cfg_file_type = entry
                .file_type()
                .map_err(|e| MirrorError::io(&path_entry, e))?;

            let b_is_symlink = cfg_file_type.is_symlink();
            let (b_is_dir, b_is_file) = if b_is_symlink {
                match fs::metadata(&path_entry) {
                    Ok(meta_target) => (meta_target.is_dir(), meta_target.is_file()),
                    Err(_) => (false, false),
                }
            } else {
                (cfg_file_type.is_dir(), cfg_file_type.is_file())
            };

            if b_is_dir {
                l_dirs.push(DirectoryNode::new_child(
                    path_entry,
                    name_entry,
                    self,
                    b_is_symlink,
                ));
            } else if b_is_file {
                l_files.push(SpecFileEntry {
                    path_file: path_entry,
                    name_file: name_entry,
                    if_is_symlink: b_is_symlink,
                });
            } else {
                l_specials.push(path_entry);
            }
        }

        l_dirs.sort_by(|a, b| a.name.cmp(&b.name));
        l_files.sort_by(|a, b| a.name_file.cmp(&b.name_file));
        l_specials.sort();

        Ok(SpecDirectorySnapshot {
            subdirectories: l_dirs,
            files: l_files,
            specials: l_specials,
        })
    }
}

impl PartialEq for DirectoryNode<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.path_full == other.path_full
    }
}

impl Eq for DirectoryNode<'_> {}

impl Hash for DirectoryNode<'_> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.path_full.hash(state);
    }
}

impl fmt::Display for DirectoryNode<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.path_full.display())
    }
}
