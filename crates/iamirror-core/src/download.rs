//! Download orchestration: the per-file decision state machine, run over a
//! bounded worker pool.
//!
//! Per file: validate any existing local copy; a valid copy is skipped, an
//! invalid one is deleted (with a forced filesystem sync) and re-fetched, a
//! missing one is fetched. Every failure is contained at the file boundary;
//! one bad file never takes down the batch.

use crate::fetch::{self, FetchStatus};
use crate::manifest::ArchiveFile;
use crate::paths;
use crate::pool;
use crate::validate::{self, ValidationOutcome};
use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

/// Terminal state of one file after a download run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileOutcome {
    /// Already present and valid; no network access.
    Skipped,
    Downloaded,
    /// Fetch failed or the fresh download did not verify. Carries the cause
    /// so a re-run can distinguish "needs retry" from "already done".
    Failed(String),
}

/// Per-file result, aggregated by the orchestrator.
#[derive(Debug, Clone)]
pub struct FileReport {
    pub name: String,
    pub outcome: FileOutcome,
}

/// Counts of terminal outcomes for one run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub downloaded: usize,
    pub skipped: usize,
    pub failed: usize,
}

impl RunSummary {
    pub fn tally(reports: &[FileReport]) -> Self {
        let mut summary = RunSummary::default();
        for report in reports {
            match report.outcome {
                FileOutcome::Skipped => summary.skipped += 1,
                FileOutcome::Downloaded => summary.downloaded += 1,
                FileOutcome::Failed(_) => summary.failed += 1,
            }
        }
        summary
    }
}

/// Processes every manifest file with up to `workers` concurrent jobs and
/// returns one report per file, in completion order.
pub fn download_all(
    files: Vec<ArchiveFile>,
    base_url: &str,
    target_dir: &Path,
    workers: usize,
) -> Vec<FileReport> {
    let base_url = base_url.to_string();
    let target_dir = target_dir.to_path_buf();
    pool::run_jobs(files, workers, move |file| {
        // Last-resort boundary: any error during the per-file sequence is a
        // terminal Failed for that file only.
        let outcome = match process_one(&file, &base_url, &target_dir) {
            Ok(outcome) => outcome,
            Err(e) => {
                tracing::error!(file = %file.name, "processing failed: {:#}", e);
                FileOutcome::Failed(format!("{:#}", e))
            }
        };
        if let FileOutcome::Failed(_) = outcome {
            println!("❌  Failed {}", file.name);
        }
        FileReport {
            name: file.name,
            outcome,
        }
    })
}

fn process_one(file: &ArchiveFile, base_url: &str, target_dir: &Path) -> Result<FileOutcome> {
    let segments = paths::sanitize(&file.name)?;
    let local_path = segments.join_to(target_dir);

    match validate::validate(&local_path, file.checksums.as_ref())? {
        ValidationOutcome::Ok => {
            println!("⏭️  Skipping {}", file.name);
            return Ok(FileOutcome::Skipped);
        }
        ValidationOutcome::Invalid => {
            fs::remove_file(&local_path)
                .with_context(|| format!("remove invalid copy {}", local_path.display()))?;
            sync_filesystem();
        }
        ValidationOutcome::Missing => {}
    }

    println!("🌏  Downloading {} ...", file.name);
    match fetch::fetch(base_url, file, target_dir)? {
        FetchStatus::Verified => {
            println!("✅  OK {}", file.name);
            Ok(FileOutcome::Downloaded)
        }
        FetchStatus::ChecksumMismatch => Ok(FileOutcome::Failed("checksum mismatch".to_string())),
    }
}

/// The original copy must be fully gone before the replacement starts
/// streaming in.
#[cfg(unix)]
fn sync_filesystem() {
    unsafe { libc::sync() }
}

#[cfg(not(unix))]
fn sync_filesystem() {}
