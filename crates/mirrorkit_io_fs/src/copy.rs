//! Recursive directory-tree copy primitive.

use std::fs;
use std::path::Path;

use tracing::{debug, warn};

use crate::node::{DirectoryNode, SpecFileEntry};
use crate::report::{ReportMirror, ReportMirrorBuilder};
use crate::spec::{EnumMirrorSymlinkStrategy, MirrorError, Result, SpecMirrorOptions};
use crate::util::{apply_metadata, copy_file_overwrite, is_overlap};

/// Mirrors one source directory into one destination directory.
///
/// [`crate::MirrorEngine`] calls this once per (backup root, source root)
/// pair. Implementations must propagate the first failure instead of
/// recording it, so the engine can abort the remaining pairs.
pub trait CopyStrategy {
    fn copy_tree(
        &self,
        source: &DirectoryNode<'_>,
        destination: &Path,
        builder_report: &mut ReportMirrorBuilder,
    ) -> Result<()>;
}

/// Filesystem implementation of [`CopyStrategy`].
///
/// Depth-first, preorder: the destination directory is ensured first, then
/// every direct file is copied over whatever sits at the destination, then
/// each subdirectory is recursed into. Files are never compared before being
/// overwritten. There is no cycle detection: a symlink pointing at one of its
/// own ancestors recurses until the OS rejects the path.
#[derive(Debug, Clone, Default)]
pub struct TreeCopyStrategy {
    spec_options: SpecMirrorOptions,
}

impl TreeCopyStrategy {
    pub fn new(spec_options: SpecMirrorOptions) -> Self {
        Self { spec_options }
    }

    pub fn options(&self) -> &SpecMirrorOptions {
        &self.spec_options
    }

    fn walk_directory(
        &self,
        node_src: &DirectoryNode<'_>,
        path_dir_dst: &Path,
        builder_report: &mut ReportMirrorBuilder,
    ) -> Result<()> {
        let if_dry_run = self.spec_options.if_dry_run;
        if !if_dry_run {
            fs::create_dir_all(path_dir_dst).map_err(|e| MirrorError::io(path_dir_dst, e))?;
        }
        builder_report.add_dir();

        let spec_snapshot = node_src.snapshot()?;

        for path_special in &spec_snapshot.specials {
            warn!(path = %path_special.display(), "special file skipped");
            builder_report.add_warning(format!(
                "Special file skipped: {}",
                path_special.display()
            ));
            builder_report.add_skipped();
        }

        for spec_file in &spec_snapshot.files {
            self.handle_file_entry(spec_file, path_dir_dst, builder_report)?;
        }

        for node_sub in &spec_snapshot.subdirectories {
            if node_sub.is_symlink()
                && self.spec_options.rule_symlink == EnumMirrorSymlinkStrategy::SkipSymlinks
            {
                debug!(path = %node_sub.path_full().display(), "symlinked directory skipped");
                builder_report.add_skipped();
                continue;
            }
            let path_dir_dst_sub = path_dir_dst.join(node_sub.name());
            self.walk_directory(node_sub, &path_dir_dst_sub, builder_report)?;
        }

        Ok(())
    }

    fn handle_file_entry(
        &self,
        spec_file: &SpecFileEntry,
        path_dir_dst: &Path,
        builder_report: &mut ReportMirrorBuilder,
    ) -> Result<()> {
        if spec_file.if_is_symlink
            && self.spec_options.rule_symlink == EnumMirrorSymlinkStrategy::SkipSymlinks
        {
            debug!(path = %spec_file.path_file.display(), "symlinked file skipped");
            builder_report.add_skipped();
            return Ok(());
        }

        let path_file_dst = path_dir_dst.join(&spec_file.name_file);
        if self.spec_options.if_dry_run {
            let meta_src = fs::metadata(&spec_file.path_file)
                .map_err(|e| MirrorError::io(&spec_file.path_file, e))?;
            builder_report.add_file(meta_src.len());
            return Ok(());
        }

        let n_bytes = copy_file_overwrite(&spec_file.path_file, &path_file_dst)
            .map_err(|e| MirrorError::io(&path_file_dst, e))?;
        if self.spec_options.if_preserve_metadata {
            self.preserve_metadata(&spec_file.path_file, &path_file_dst, builder_report);
        }
        debug!(
            src = %spec_file.path_file.display(),
            dst = %path_file_dst.display(),
            n_bytes,
            "file copied"
        );
        builder_report.add_file(n_bytes);
        Ok(())
    }

    // Content is what a backup needs; targets that refuse chmod or utimes
    // (vfat, CIFS) only cost a warning.
    fn preserve_metadata(
        &self,
        path_file_src: &Path,
        path_file_dst: &Path,
        builder_report: &mut ReportMirrorBuilder,
    ) {
        if let Err(e) = apply_metadata(path_file_src, path_file_dst) {
            warn!(path = %path_file_dst.display(), error = %e, "metadata not preserved");
            builder_report.add_warning(format!(
                "Metadata not preserved: {}: {e}",
                path_file_dst.display()
            ));
        }
    }
}

impl CopyStrategy for TreeCopyStrategy {
    fn copy_tree(
        &self,
        source: &DirectoryNode<'_>,
        destination: &Path,
        builder_report: &mut ReportMirrorBuilder,
    ) -> Result<()> {
        let path_dir_src = source.path_full();
        if !path_dir_src.is_dir() {
            return Err(MirrorError::SourceNotDirectory(path_dir_src.to_path_buf()));
        }
        if is_overlap(path_dir_src, destination) {
            return Err(MirrorError::SourceDestinationOverlap {
                path_source: path_dir_src.to_path_buf(),
                path_destination: destination.to_path_buf(),
            });
        }
        self.walk_directory(source, destination, builder_report)
    }
}

/// Copy a directory tree from `dir_source` to `dir_destination`.
///
/// Standalone form of [`TreeCopyStrategy`] for a single pair; returns the
/// counters of this one copy.
pub fn copy_tree<P, Q>(
    dir_source: P,
    dir_destination: Q,
    spec_options: SpecMirrorOptions,
) -> Result<ReportMirror>
where
    P: AsRef<Path>,
    Q: AsRef<Path>,
{
    let node_src = DirectoryNode::new(dir_source);
    let mut builder_report = ReportMirrorBuilder::default();
    TreeCopyStrategy::new(spec_options).copy_tree(
        &node_src,
        dir_destination.as_ref(),
        &mut builder_report,
    )?;
    Ok(builder_report.build())
}
