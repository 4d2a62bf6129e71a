//! Mirror option models and the top-level error type.

use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Message used when `run_backup` is called without any source root.
pub const C_MSG_NO_SOURCES: &str = "no source directories registered";
/// Message used when `run_backup` is called without any backup root.
pub const C_MSG_NO_BACKUPS: &str = "no backup locations registered";

////////////////////////////////////////////////////////////////////////////////
// #region EnumsInit

/// Symlink handling policy while walking a source tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EnumMirrorSymlinkStrategy {
    /// Follow the link and mirror the target file/directory contents.
    #[default]
    Dereference,
    /// Ignore symlink entries.
    SkipSymlinks,
}

/// Which tracked collection of a [`crate::PathRegistry`] an entry belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnumRegistryKind {
    /// Directory trees that get copied.
    Source,
    /// Backup roots that receive a copy of every source.
    Backup,
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region StructsAndErrors

/// Input options for one mirror run.
#[derive(Debug, Clone)]
pub struct SpecMirrorOptions {
    /// Symlink handling behavior.
    pub rule_symlink: EnumMirrorSymlinkStrategy,
    /// Apply source permissions, timestamps and xattrs to copied files.
    pub if_preserve_metadata: bool,
    /// Do not mutate filesystem; only count what would be copied.
    pub if_dry_run: bool,
}

impl Default for SpecMirrorOptions {
    fn default() -> Self {
        Self {
            rule_symlink: EnumMirrorSymlinkStrategy::Dereference,
            if_preserve_metadata: true,
            if_dry_run: false,
        }
    }
}

/// Result alias used across the crate.
pub type Result<T> = std::result::Result<T, MirrorError>;

/// Errors raised by a mirror run.
///
/// Nothing is caught internally: the first error aborts the run and the
/// filesystem keeps whatever was copied before it.
#[derive(Debug, Error)]
pub enum MirrorError {
    /// The registry is missing sources or backups.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Underlying filesystem operation failed.
    #[error("I/O failure at {}: {source}", .path.display())]
    Io {
        /// Path being read or written when the failure happened.
        path: PathBuf,
        /// Underlying IO error.
        #[source]
        source: io::Error,
    },

    /// Source root is missing or no longer a directory.
    ///
    /// Usually a source removed after registration. Like [`Self::Io`] this is
    /// a filesystem failure, not a configuration error.
    #[error("Source is not a directory: {}", .0.display())]
    SourceNotDirectory(PathBuf),

    /// Destination is the source itself or lies inside it.
    #[error(
        "Source and destination directories overlap: {} <-> {}",
        .path_source.display(),
        .path_destination.display()
    )]
    SourceDestinationOverlap {
        /// Normalized source directory.
        path_source: PathBuf,
        /// Normalized destination directory.
        path_destination: PathBuf,
    },
}

impl MirrorError {
    /// Wrap an IO error with the path it happened on.
    pub fn io(path: impl AsRef<Path>, source: io::Error) -> Self {
        Self::Io {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }

    /// `true` for precondition failures that can be fixed by registering roots.
    pub fn is_configuration(&self) -> bool {
        matches!(self, Self::Configuration(_))
    }

    /// `true` when the filesystem failed underneath a copy.
    pub fn is_io(&self) -> bool {
        matches!(self, Self::Io { .. } | Self::SourceNotDirectory(_))
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
