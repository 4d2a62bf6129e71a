//! Tracked source and backup roots.

use std::fmt;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::node::DirectoryNode;
use crate::spec::EnumRegistryKind;
use crate::util::{normalize_path, resolve_existing_dir};

/// Supplies absolute directory paths chosen by the operator.
///
/// Stands in for an interactive folder picker; the registry never prompts
/// anybody itself.
pub trait PathProvider {
    fn provide_paths(&self) -> Vec<PathBuf>;
}

impl<P: AsRef<Path>> PathProvider for [P] {
    fn provide_paths(&self) -> Vec<PathBuf> {
        self.iter().map(|p| p.as_ref().to_path_buf()).collect()
    }
}

impl<P: AsRef<Path>> PathProvider for Vec<P> {
    fn provide_paths(&self) -> Vec<PathBuf> {
        self.as_slice().provide_paths()
    }
}

/// Mutation notification passed to the registry observer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EnumRegistryEvent {
    /// A new root was appended to a collection.
    Added {
        kind: EnumRegistryKind,
        path: PathBuf,
    },
    /// Both collections were cleared.
    Reset,
}

/// Callback invoked after every successful registry mutation.
pub type FnRegistryObserver = Box<dyn Fn(&EnumRegistryEvent) + Send>;

/// Two ordered, deduplicated collections of root directories.
///
/// Adding a path that is not an existing directory, or whose canonical form is
/// already tracked, is a silent no-op. Callers that need to know whether a
/// path was accepted must query the registry afterwards.
#[derive(Default)]
pub struct PathRegistry {
    sources: Vec<DirectoryNode<'static>>,
    backups: Vec<DirectoryNode<'static>>,
    observer: Option<FnRegistryObserver>,
}

impl PathRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Install (or replace) the mutation observer.
    pub fn set_observer(&mut self, observer: FnRegistryObserver) {
        self.observer = Some(observer);
    }

    pub fn add_source<P: AsRef<Path>>(&mut self, path: P) {
        self.add_root(EnumRegistryKind::Source, path.as_ref());
    }

    pub fn add_backup<P: AsRef<Path>>(&mut self, path: P) {
        self.add_root(EnumRegistryKind::Backup, path.as_ref());
    }

    /// Register every path from `provider` as a source.
    pub fn add_sources_from<T: PathProvider + ?Sized>(&mut self, provider: &T) {
        for path in provider.provide_paths() {
            self.add_source(path);
        }
    }

    /// Register every path from `provider` as a backup root.
    pub fn add_backups_from<T: PathProvider + ?Sized>(&mut self, provider: &T) {
        for path in provider.provide_paths() {
            self.add_backup(path);
        }
    }

    /// Forget all tracked roots. The filesystem is not touched.
    pub fn reset(&mut self) {
        self.sources.clear();
        self.backups.clear();
        self.notify(&EnumRegistryEvent::Reset);
    }

    /// Tracked sources in registration order.
    pub fn sources(&self) -> &[DirectoryNode<'static>] {
        &self.sources
    }

    /// Tracked backup roots in registration order.
    pub fn backups(&self) -> &[DirectoryNode<'static>] {
        &self.backups
    }

    pub fn roots(&self, kind: EnumRegistryKind) -> &[DirectoryNode<'static>] {
        match kind {
            EnumRegistryKind::Source => &self.sources,
            EnumRegistryKind::Backup => &self.backups,
        }
    }

    pub fn contains_source<P: AsRef<Path>>(&self, path: P) -> bool {
        self.contains(EnumRegistryKind::Source, path.as_ref())
    }

    pub fn contains_backup<P: AsRef<Path>>(&self, path: P) -> bool {
        self.contains(EnumRegistryKind::Backup, path.as_ref())
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty() && self.backups.is_empty()
    }

    fn contains(&self, kind: EnumRegistryKind, path: &Path) -> bool {
        let path_full = normalize_path(path);
        self.roots(kind)
            .iter()
            .any(|node| node.path_full() == path_full)
    }

    fn add_root(&mut self, kind: EnumRegistryKind, path: &Path) {
        let Some(path_full) = resolve_existing_dir(path) else {
            debug!(?kind, path = %path.display(), "not an existing directory; ignored");
            return;
        };

        let l_roots = match kind {
            EnumRegistryKind::Source => &mut self.sources,
            EnumRegistryKind::Backup => &mut self.backups,
        };
        if l_roots.iter().any(|node| node.path_full() == path_full) {
            debug!(?kind, path = %path_full.display(), "already registered; ignored");
            return;
        }

        l_roots.push(DirectoryNode::from_canonical(path_full.clone()));
        debug!(?kind, path = %path_full.display(), "root registered");
        self.notify(&EnumRegistryEvent::Added {
            kind,
            path: path_full,
        });
    }

    fn notify(&self, event: &EnumRegistryEvent) {
        if let Some(observer) = &self.observer {
            observer(event);
        }
    }
}

impl fmt::Debug for PathRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PathRegistry")
            .field("sources", &self.sources)
            .field("backups", &self.backups)
            .field("observer", &self.observer.is_some())
            .finish()
    }
}
