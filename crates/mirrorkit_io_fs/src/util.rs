use std::ffi::OsString;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

////////////////////////////////////////////////////////////////////////////////
// #region PathUtilities

fn _is_relative_to_base(path: &Path, base: &Path) -> bool {
    path.starts_with(base)
}

/// Absolute form of `path` without touching the filesystem.
pub(crate) fn absolutize_path(path: &Path) -> PathBuf {
    if path.is_absolute() {
        return path.to_path_buf();
    }
    std::env::current_dir()
        .unwrap_or_else(|_| PathBuf::from("."))
        .join(path)
}

/// Canonical form of `path`.
///
/// When the location does not exist (yet), the deepest existing ancestor is
/// canonicalized and the missing tail re-appended.
pub(crate) fn normalize_path(path: &Path) -> PathBuf {
    let path_abs = absolutize_path(path);
    let mut path_existing = path_abs.as_path();
    let mut l_tail = Vec::new();
    loop {
        if let Ok(resolved) = fs::canonicalize(path_existing) {
            return l_tail
                .iter()
                .rev()
                .fold(resolved, |path_acc, part| path_acc.join(part));
        }
        match (path_existing.parent(), path_existing.file_name()) {
            (Some(parent), Some(name)) => {
                l_tail.push(name);
                path_existing = parent;
            }
            _ => return absolutize_path(path),
        }
    }
}

/// Canonicalize `path` only if it resolves to an existing directory.
pub(crate) fn resolve_existing_dir(path: &Path) -> Option<PathBuf> {
    let path_resolved = fs::canonicalize(path).ok()?;
    path_resolved.is_dir().then_some(path_resolved)
}

/// `dst` is `src` itself or lies somewhere below it.
///
/// Only this direction recurses into its own output; a source nested inside
/// its destination is a finite copy.
pub(crate) fn is_overlap(src: &Path, dst: &Path) -> bool {
    let src_resolved = normalize_path(src);
    let dst_resolved = normalize_path(dst);
    _is_relative_to_base(&dst_resolved, &src_resolved)
}

/// Last segment of `path`, bytes untouched (empty for filesystem roots).
pub(crate) fn derive_name(path: &Path) -> OsString {
    path.file_name()
        .map(|name| name.to_os_string())
        .unwrap_or_default()
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region FileCopy

/// Copy one file, replacing whatever file sits at `path_file_dst`.
///
/// Returns the number of bytes written. Metadata is applied separately by
/// [`apply_metadata`].
pub(crate) fn copy_file_overwrite(
    path_file_src: &Path,
    path_file_dst: &Path,
) -> Result<u64, io::Error> {
    ensure_writable(path_file_dst)?;
    fs::copy(path_file_src, path_file_dst)
}

/// Apply source permissions, timestamps and xattrs to an already copied file.
///
/// No-op outside Linux.
pub(crate) fn apply_metadata(
    path_file_src: &Path,
    path_file_dst: &Path,
) -> Result<(), io::Error> {
    #[cfg(target_os = "linux")]
    {
        apply_metadata_linux(path_file_src, path_file_dst)
    }
    #[cfg(not(target_os = "linux"))]
    {
        let _ = (path_file_src, path_file_dst);
        Ok(())
    }
}

/// Clear the read-only bit of an existing destination file.
///
/// Preserved permissions from an earlier run can leave a read-only copy
/// behind that `fs::copy` refuses to truncate.
fn ensure_writable(path_file_dst: &Path) -> Result<(), io::Error> {
    match fs::symlink_metadata(path_file_dst) {
        Ok(meta_dst) if meta_dst.is_file() && meta_dst.permissions().readonly() => {
            let mut perms_dst = meta_dst.permissions();
            #[allow(clippy::permissions_set_readonly_false)]
            perms_dst.set_readonly(false);
            fs::set_permissions(path_file_dst, perms_dst)
        }
        Ok(_) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e),
    }
}

#[cfg(target_os = "linux")]
fn apply_metadata_linux(path_file_src: &Path, path_file_dst: &Path) -> Result<(), io::Error> {
    use filetime::{FileTime, set_file_times};

    let stat_src = fs::metadata(path_file_src)?;
    fs::set_permissions(path_file_dst, stat_src.permissions())?;

    let file_time_access = FileTime::from_last_access_time(&stat_src);
    let file_time_modify = FileTime::from_last_modification_time(&stat_src);
    set_file_times(path_file_dst, file_time_access, file_time_modify)?;

    copy_xattrs_linux(path_file_src, path_file_dst);
    Ok(())
}

// Best effort: filesystems without xattr support are not an error.
#[cfg(target_os = "linux")]
fn copy_xattrs_linux(path_file_src: &Path, path_file_dst: &Path) {
    let iter_xattr_names = match xattr::list(path_file_src) {
        Ok(v) => v,
        Err(_) => return,
    };

    for name in iter_xattr_names {
        let Some(raw_value) = xattr::get(path_file_src, &name).ok().flatten() else {
            continue;
        };
        let _ = xattr::set(path_file_dst, &name, &raw_value);
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use std::path::Path;

    use tempfile::TempDir;

    use super::{
        apply_metadata, copy_file_overwrite, derive_name, is_overlap, normalize_path,
        resolve_existing_dir,
    };

    #[test]
    fn overlap_only_when_destination_inside_source() {
        let tmp = TempDir::new().expect("tempdir");
        let src = tmp.path().join("src");
        std::fs::create_dir_all(&src).expect("mkdir src");

        assert!(is_overlap(&src, &src));
        assert!(is_overlap(&src, &src.join("nested")));
        // A source below its destination does not feed on its own output.
        assert!(!is_overlap(&src.join("nested"), &src));
        assert!(!is_overlap(&src, &tmp.path().join("dst")));
        // "src2" shares a string prefix with "src" but is a sibling.
        assert!(!is_overlap(&src, &tmp.path().join("src2")));
    }

    #[test]
    fn normalize_path_keeps_missing_tail_under_canonical_ancestor() {
        let tmp = TempDir::new().expect("tempdir");
        let path_base = std::fs::canonicalize(tmp.path()).expect("canonical tmp");

        let path_normalized = normalize_path(&tmp.path().join("not/yet/there"));
        assert_eq!(path_normalized, path_base.join("not/yet/there"));
    }

    #[test]
    fn resolve_existing_dir_rejects_files_and_missing_paths() {
        let tmp = TempDir::new().expect("tempdir");
        let path_file = tmp.path().join("a.txt");
        std::fs::write(&path_file, "a").expect("write");

        assert!(resolve_existing_dir(&path_file).is_none());
        assert!(resolve_existing_dir(&tmp.path().join("missing")).is_none());

        let path_resolved = resolve_existing_dir(tmp.path()).expect("dir resolves");
        assert!(path_resolved.is_absolute());
    }

    #[test]
    fn resolve_existing_dir_collapses_dot_segments() {
        let tmp = TempDir::new().expect("tempdir");
        std::fs::create_dir_all(tmp.path().join("a/b")).expect("mkdir");

        let path_plain = resolve_existing_dir(&tmp.path().join("a")).expect("plain");
        let path_dotted = resolve_existing_dir(&tmp.path().join("a/b/../.")).expect("dotted");
        assert_eq!(path_plain, path_dotted);
    }

    #[test]
    fn derive_name_uses_last_segment() {
        assert_eq!(derive_name(Path::new("/data/photos")), "photos");
        assert_eq!(derive_name(Path::new("/")), "");
    }

    #[test]
    fn copy_file_overwrite_replaces_read_only_destination() {
        let tmp = TempDir::new().expect("tempdir");
        let path_src = tmp.path().join("src.txt");
        let path_dst = tmp.path().join("dst.txt");
        std::fs::write(&path_src, "new").expect("write src");
        std::fs::write(&path_dst, "old content").expect("write dst");

        let mut perms_dst = std::fs::metadata(&path_dst).expect("meta").permissions();
        perms_dst.set_readonly(true);
        std::fs::set_permissions(&path_dst, perms_dst).expect("set readonly");

        let n_bytes = copy_file_overwrite(&path_src, &path_dst).expect("overwrite");
        assert_eq!(n_bytes, 3);
        assert_eq!(std::fs::read_to_string(&path_dst).expect("read"), "new");
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn copy_file_overwrite_preserves_linux_metadata() {
        use filetime::{FileTime, set_file_times};
        use std::os::unix::fs::PermissionsExt;

        let tmp = TempDir::new().expect("tempdir");
        let path_src = tmp.path().join("meta.txt");
        let path_dst = tmp.path().join("meta_copy.txt");
        std::fs::write(&path_src, "meta").expect("write src");

        std::fs::set_permissions(&path_src, std::fs::Permissions::from_mode(0o640))
            .expect("set permissions");
        set_file_times(
            &path_src,
            FileTime::from_unix_time(1_700_000_010, 0),
            FileTime::from_unix_time(1_700_000_020, 0),
        )
        .expect("set times");

        let c_xattr_name = "user.mirrorkit_fs_test";
        let b_if_has_xattr = xattr::set(&path_src, c_xattr_name, b"meta_value").is_ok();

        copy_file_overwrite(&path_src, &path_dst).expect("copy");
        apply_metadata(&path_src, &path_dst).expect("metadata");

        let stat_src = std::fs::metadata(&path_src).expect("src metadata");
        let stat_dst = std::fs::metadata(&path_dst).expect("dst metadata");
        assert_eq!(
            stat_src.permissions().mode() & 0o777,
            stat_dst.permissions().mode() & 0o777
        );
        assert_eq!(
            FileTime::from_last_modification_time(&stat_src),
            FileTime::from_last_modification_time(&stat_dst)
        );

        if b_if_has_xattr {
            let raw_value_dst = xattr::get(&path_dst, c_xattr_name)
                .expect("get dst xattr")
                .expect("xattr exists");
            assert_eq!(raw_value_dst, b"meta_value");
        }
    }
}
