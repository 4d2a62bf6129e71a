//! `mirrorkit` command-line front end.
//!
//! Builds a [`PathRegistry`] from the `--source`/`--backup` arguments, runs one
//! backup pass and renders the outcome.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser as _;
use mirrorkit_io_fs::{EnumRegistryKind, MirrorEngine, PathRegistry, ReportMirror, Result};
use tracing::debug;

use crate::cli::Cli;

mod cli;

fn main() -> ExitCode {
    let cli_args = Cli::parse();
    setup_tracing(&cli_args);
    debug!("Parsed CLI arguments: {cli_args:?}");

    match run(&cli_args) {
        Ok(report) => {
            println!("Backup completed: {report}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn setup_tracing(cli_args: &Cli) {
    if let Some(level) = cli_args.log_level.to_tracing_level() {
        tracing_subscriber::fmt()
            .with_max_level(level)
            .with_writer(std::io::stderr)
            .without_time()
            .compact()
            .init();
    }
}

fn run(cli_args: &Cli) -> Result<ReportMirror> {
    let mut registry = PathRegistry::new();
    registry.add_sources_from(&cli_args.sources);
    registry.add_backups_from(&cli_args.backups);

    // The registry drops unusable paths silently; tell the operator which.
    for path in rejected_paths(&registry, EnumRegistryKind::Source, &cli_args.sources) {
        eprintln!("Warning: source ignored, not a directory: {}", path.display());
    }
    for path in rejected_paths(&registry, EnumRegistryKind::Backup, &cli_args.backups) {
        eprintln!("Warning: backup ignored, not a directory: {}", path.display());
    }

    MirrorEngine::with_options(cli_args.to_mirror_options()).run_backup_with_report(&registry)
}

fn rejected_paths<'p>(
    registry: &PathRegistry,
    kind: EnumRegistryKind,
    l_paths: &'p [PathBuf],
) -> impl Iterator<Item = &'p PathBuf> {
    l_paths.iter().filter(move |path| match kind {
        EnumRegistryKind::Source => !registry.contains_source(path),
        EnumRegistryKind::Backup => !registry.contains_backup(path),
    })
}
