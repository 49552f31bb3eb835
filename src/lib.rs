//! dupsweep - Duplicate File Finder
//!
//! A command-line tool that finds duplicate files across directory trees by
//! comparing sizes, then a BLAKE3 fingerprint of a small window, then a
//! fingerprint of the whole content, and optionally removes the redundant
//! copies.

pub mod actions;
pub mod cli;
pub mod config;
pub mod duplicates;
pub mod error;
pub mod logging;
pub mod progress;
pub mod scanner;

use anyhow::Context;

use crate::actions::{delete_redundant, ConsoleReporter, DeleteConfig};
use crate::cli::Cli;
use crate::config::Config;
use crate::duplicates::{DuplicateFinder, FinderConfig};
use crate::error::ExitCode;
use crate::progress::Progress;

/// Run the application with parsed arguments.
///
/// # Errors
///
/// Returns an error if the configuration is invalid, a root cannot be
/// scanned, or a file fails partway through hashing.
pub fn run_app(cli: Cli) -> anyhow::Result<ExitCode> {
    if cli.version {
        println!("{}", cli::version_string());
        return Ok(ExitCode::Success);
    }

    let config =
        Config::load_from(cli.config.as_deref()).context("Failed to load configuration")?;
    let finder_config = finder_config(&cli, &config);
    log::debug!("Finder configuration: {:?}", finder_config);

    let progress = Progress::new(!cli.no_progress, cli.quiet);
    let finder = DuplicateFinder::new(finder_config).with_progress(Box::new(progress));

    let report = finder.find_duplicates(&cli.roots)?;

    if !report.scan_errors.is_empty() {
        log::warn!(
            "{} entries could not be read during the scan",
            report.scan_errors.len()
        );
    }

    if !cli.quiet {
        println!("{}", report.totals.summary_line(report.elapsed));
    }

    if cli.remove {
        let delete_config = DeleteConfig { trash: cli.trash };
        let result = delete_redundant(
            report.duplicate_groups(),
            &delete_config,
            &ConsoleReporter::new(cli.quiet),
        );
        if !result.all_succeeded() {
            log::warn!("{} redundant copies could not be removed", result.failure_count());
        }
    } else if !cli.quiet {
        println!("\nAdd -r option to remove redundant files.");
    }

    Ok(ExitCode::Success)
}

/// Merge the layered configuration with command-line flags.
fn finder_config(cli: &Cli, config: &Config) -> FinderConfig {
    FinderConfig::default()
        .with_walker_config(config.walker_config(cli.ext.as_deref()))
        .with_partial_hash(config.smallhash && !cli.disable_smallhash)
        .with_partial_window(config.partial_window)
        .with_verify(cli.verify)
}
