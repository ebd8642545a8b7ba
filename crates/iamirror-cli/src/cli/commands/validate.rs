//! Validate command: audit an existing mirror against a manifest.

use anyhow::{Context, Result};
use iamirror_core::config::MirrorConfig;
use iamirror_core::manifest;
use iamirror_core::verify::{self, VerifySummary};
use std::fs;
use std::path::Path;

pub fn run_validate(
    cfg: &MirrorConfig,
    manifest_path: &Path,
    directory: &Path,
    threads: Option<usize>,
) -> Result<()> {
    let threads = threads.unwrap_or(cfg.threads).max(1);
    let xml = fs::read_to_string(manifest_path)
        .with_context(|| format!("read manifest {}", manifest_path.display()))?;
    let files = manifest::parse_manifest(&xml)?;
    tracing::info!(files = files.len(), threads, "starting validation run");

    let reports = verify::verify_all(files, directory, threads);
    let summary = VerifySummary::tally(&reports);
    println!(
        "{} valid, {} missing, {} mismatched, {} without checksum",
        summary.valid, summary.missing, summary.mismatched, summary.no_checksum
    );
    Ok(())
}
