//! Mirror run report model and mutable report builder.

use std::collections::BTreeMap;
use std::fmt;

/// Aggregate counters and diagnostics for one backup run.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ReportMirror {
    /// Number of (backup root, source root) pairs mirrored.
    pub cnt_pairs: u64,
    /// Number of destination directories ensured (roots included).
    pub cnt_dirs: u64,
    /// Number of files copied (or planned in dry-run).
    pub cnt_files: u64,
    /// Number of entries skipped by strategy.
    pub cnt_skipped: u64,
    /// Total bytes written to destinations.
    pub n_bytes: u64,
    /// Non-fatal warnings collected during traversal.
    pub warnings: Vec<String>,
}

impl ReportMirror {
    /// Number of collected warnings.
    pub fn warning_count(&self) -> usize {
        self.warnings.len()
    }

    /// Machine-readable counters.
    pub fn to_dict(&self) -> BTreeMap<String, u64> {
        let mut dict_counts = BTreeMap::new();
        dict_counts.insert("cnt_pairs".to_string(), self.cnt_pairs);
        dict_counts.insert("cnt_dirs".to_string(), self.cnt_dirs);
        dict_counts.insert("cnt_files".to_string(), self.cnt_files);
        dict_counts.insert("cnt_skipped".to_string(), self.cnt_skipped);
        dict_counts.insert("n_bytes".to_string(), self.n_bytes);
        dict_counts.insert("cnt_warnings".to_string(), self.warning_count() as u64);
        dict_counts
    }

    /// Human-readable one-line summary.
    pub fn format(&self, prefix: &str) -> String {
        format!(
            "{prefix} pairs={} dirs={} files={} skipped={} bytes={} warnings={}",
            self.cnt_pairs,
            self.cnt_dirs,
            self.cnt_files,
            self.cnt_skipped,
            self.n_bytes,
            self.warning_count()
        )
    }
}

impl fmt::Display for ReportMirror {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format("[MIRROR]"))
    }
}

/// Mutable accumulator for mirror statistics.
#[derive(Debug, Default, Clone)]
pub struct ReportMirrorBuilder {
    /// See [`ReportMirror::cnt_pairs`].
    pub cnt_pairs: u64,
    /// See [`ReportMirror::cnt_dirs`].
    pub cnt_dirs: u64,
    /// See [`ReportMirror::cnt_files`].
    pub cnt_files: u64,
    /// See [`ReportMirror::cnt_skipped`].
    pub cnt_skipped: u64,
    /// See [`ReportMirror::n_bytes`].
    pub n_bytes: u64,
    /// See [`ReportMirror::warnings`].
    pub warnings: Vec<String>,
}

impl ReportMirrorBuilder {
    pub fn add_pair(&mut self) {
        self.cnt_pairs += 1;
    }

    pub fn add_dir(&mut self) {
        self.cnt_dirs += 1;
    }

    /// Count one copied file of `n_bytes` length.
    pub fn add_file(&mut self, n_bytes: u64) {
        self.cnt_files += 1;
        self.n_bytes += n_bytes;
    }

    pub fn add_skipped(&mut self) {
        self.cnt_skipped += 1;
    }

    /// Add warning message.
    pub fn add_warning(&mut self, warning: String) {
        self.warnings.push(warning);
    }

    /// Finalize builder into immutable report.
    pub fn build(self) -> ReportMirror {
        ReportMirror {
            cnt_pairs: self.cnt_pairs,
            cnt_dirs: self.cnt_dirs,
            cnt_files: self.cnt_files,
            cnt_skipped: self.cnt_skipped,
            n_bytes: self.n_bytes,
            warnings: self.warnings,
        }
    }
}
