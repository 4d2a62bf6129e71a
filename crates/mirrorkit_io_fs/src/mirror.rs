//! Backup run orchestration over the registry cross product.

use tracing::info;

use crate::copy::{CopyStrategy, TreeCopyStrategy};
use crate::registry::PathRegistry;
use crate::report::{ReportMirror, ReportMirrorBuilder};
use crate::spec::{C_MSG_NO_BACKUPS, C_MSG_NO_SOURCES, MirrorError, Result, SpecMirrorOptions};

/// Drives one [`CopyStrategy`] over every (backup root, source root) pair.
///
/// The engine holds no state between runs; the registry is owned by the
/// caller and borrowed for the duration of a run.
#[derive(Debug, Clone, Default)]
pub struct MirrorEngine<S = TreeCopyStrategy> {
    strategy: S,
}

impl MirrorEngine<TreeCopyStrategy> {
    /// Engine backed by the filesystem tree copy with `spec_options`.
    pub fn with_options(spec_options: SpecMirrorOptions) -> Self {
        Self::new(TreeCopyStrategy::new(spec_options))
    }
}

impl<S: CopyStrategy> MirrorEngine<S> {
    pub fn new(strategy: S) -> Self {
        Self { strategy }
    }

    pub fn strategy(&self) -> &S {
        &self.strategy
    }

    /// Copy every registered source under every registered backup root.
    ///
    /// Each source `S` lands at `B/name(S)` for each backup `B`. Backups are
    /// the outer loop and sources the inner one, both in registration order.
    ///
    /// # Errors
    /// - [`MirrorError::Configuration`] before any I/O when either collection
    ///   is empty.
    /// - Any copy failure, returned as soon as it happens. Pairs already
    ///   processed stay on disk; remaining pairs are not attempted.
    pub fn run_backup(&self, registry: &PathRegistry) -> Result<()> {
        self.run_backup_with_report(registry).map(|_| ())
    }

    /// Same as [`Self::run_backup`], returning the aggregated counters.
    pub fn run_backup_with_report(&self, registry: &PathRegistry) -> Result<ReportMirror> {
        if registry.sources().is_empty() {
            return Err(MirrorError::Configuration(C_MSG_NO_SOURCES.to_string()));
        }
        if registry.backups().is_empty() {
            return Err(MirrorError::Configuration(C_MSG_NO_BACKUPS.to_string()));
        }

        info!(
            n_sources = registry.sources().len(),
            n_backups = registry.backups().len(),
            "backup run started"
        );

        let mut builder_report = ReportMirrorBuilder::default();
        for node_backup in registry.backups() {
            for node_source in registry.sources() {
                let path_dir_dst = node_backup.path_full().join(node_source.name());
                info!(
                    src = %node_source.path_full().display(),
                    dst = %path_dir_dst.display(),
                    "mirroring"
                );
                self.strategy
                    .copy_tree(node_source, &path_dir_dst, &mut builder_report)?;
                builder_report.add_pair();
            }
        }

        let report = builder_report.build();
        info!(%report, "backup run finished");
        Ok(report)
    }
}
