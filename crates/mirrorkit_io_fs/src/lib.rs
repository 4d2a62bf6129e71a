//! `mirrorkit_io_fs` v1:
//! Rust-side directory mirroring engine.
//!
//! Modules:
//! - `node`     : directory handle with lazy child listings
//! - `registry` : tracked source/backup roots
//! - `copy`     : recursive tree-copy strategy
//! - `mirror`   : backup run over the sources x backups cross product
//! - `spec`     : enums/options/errors
//! - `report`   : run-time report model
//! - `util`     : shared helper functions

pub mod copy;
pub mod mirror;
pub mod node;
pub mod registry;
pub mod report;
pub mod spec;
mod util;

pub use copy::{CopyStrategy, TreeCopyStrategy, copy_tree};
pub use mirror::MirrorEngine;
pub use node::{DirectoryNode, SpecDirectorySnapshot, SpecFileEntry};
pub use registry::{EnumRegistryEvent, FnRegistryObserver, PathProvider, PathRegistry};
pub use report::{ReportMirror, ReportMirrorBuilder};
pub use spec::{
    C_MSG_NO_BACKUPS, C_MSG_NO_SOURCES, EnumMirrorSymlinkStrategy, EnumRegistryKind, MirrorError,
    Result, SpecMirrorOptions,
};
