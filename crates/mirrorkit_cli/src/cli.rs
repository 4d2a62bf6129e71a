use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use mirrorkit_io_fs::{EnumMirrorSymlinkStrategy, SpecMirrorOptions};

/// Mirror source directories into backup locations, overwriting previous copies.
#[derive(Debug, Parser)]
#[command(name = "mirrorkit", version)]
pub struct Cli {
    /// Source directory to back up (repeatable)
    #[arg(short, long = "source", value_name = "PATH")]
    pub sources: Vec<PathBuf>,

    /// Backup location receiving a copy of every source (repeatable)
    #[arg(short, long = "backup", value_name = "PATH")]
    pub backups: Vec<PathBuf>,

    /// Walk the sources and report, without writing anything
    #[arg(long)]
    pub dry_run: bool,

    /// Ignore symbolic links instead of copying their targets
    #[arg(long)]
    pub skip_symlinks: bool,

    /// Do not carry permissions, timestamps and xattrs over to copies
    #[arg(long)]
    pub no_preserve_metadata: bool,

    #[arg(long, value_enum, default_value_t = LogLevel::default())]
    pub log_level: LogLevel,
}

impl Cli {
    pub fn to_mirror_options(&self) -> SpecMirrorOptions {
        SpecMirrorOptions {
            rule_symlink: if self.skip_symlinks {
                EnumMirrorSymlinkStrategy::SkipSymlinks
            } else {
                EnumMirrorSymlinkStrategy::Dereference
            },
            if_preserve_metadata: !self.no_preserve_metadata,
            if_dry_run: self.dry_run,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum, Default)]
pub enum LogLevel {
    Debug,
    Info,
    #[default]
    Warn,
    Error,
    Silent,
}

impl LogLevel {
    pub fn to_tracing_level(self) -> Option<tracing::Level> {
        match self {
            LogLevel::Debug => Some(tracing::Level::DEBUG),
            LogLevel::Info => Some(tracing::Level::INFO),
            LogLevel::Warn => Some(tracing::Level::WARN),
            LogLevel::Error => Some(tracing::Level::ERROR),
            LogLevel::Silent => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use clap::Parser;
    use mirrorkit_io_fs::EnumMirrorSymlinkStrategy;

    use super::{Cli, LogLevel};

    #[test]
    fn cli_collects_repeated_roots_in_order() {
        let cli = Cli::parse_from([
            "mirrorkit", "-s", "/a", "--source", "/b", "-b", "/bk1", "--backup", "/bk2",
        ]);
        assert_eq!(cli.sources, vec![PathBuf::from("/a"), PathBuf::from("/b")]);
        assert_eq!(cli.backups.len(), 2);
        assert!(matches!(cli.log_level, LogLevel::Warn));
    }

    #[test]
    fn cli_maps_flags_onto_mirror_options() {
        let cli = Cli::parse_from([
            "mirrorkit",
            "--dry-run",
            "--skip-symlinks",
            "--no-preserve-metadata",
            "--log-level",
            "silent",
        ]);
        let spec_options = cli.to_mirror_options();
        assert!(spec_options.if_dry_run);
        assert!(!spec_options.if_preserve_metadata);
        assert_eq!(
            spec_options.rule_symlink,
            EnumMirrorSymlinkStrategy::SkipSymlinks
        );
        assert!(cli.log_level.to_tracing_level().is_none());
    }
}
