//! Read-only mirror audit: re-runs validation over an existing directory.
//!
//! No network access and no mutation of any local file. Output is advisory;
//! this is a batch read audit, not a repair tool.

use crate::manifest::{ArchiveFile, ChecksumSet};
use crate::paths;
use crate::pool;
use crate::validate::{self, ValidationOutcome};
use anyhow::Result;
use std::path::Path;

/// Advisory classification of one mirrored file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerifyOutcome {
    Valid,
    Missing,
    Mismatch,
    /// Present, but the manifest carries nothing to check it against.
    NoChecksum,
}

#[derive(Debug, Clone)]
pub struct VerifyReport {
    pub name: String,
    pub outcome: VerifyOutcome,
}

/// Counts of audit outcomes for one run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct VerifySummary {
    pub valid: usize,
    pub missing: usize,
    pub mismatched: usize,
    pub no_checksum: usize,
}

impl VerifySummary {
    pub fn tally(reports: &[VerifyReport]) -> Self {
        let mut summary = VerifySummary::default();
        for report in reports {
            match report.outcome {
                VerifyOutcome::Valid => summary.valid += 1,
                VerifyOutcome::Missing => summary.missing += 1,
                VerifyOutcome::Mismatch => summary.mismatched += 1,
                VerifyOutcome::NoChecksum => summary.no_checksum += 1,
            }
        }
        summary
    }
}

/// Audits every manifest file against `directory` with up to `workers`
/// concurrent jobs. Same pool shape as the download run, purely read-only.
pub fn verify_all(files: Vec<ArchiveFile>, directory: &Path, workers: usize) -> Vec<VerifyReport> {
    let directory = directory.to_path_buf();
    pool::run_jobs(files, workers, move |file| {
        let outcome = match verify_one(&file, &directory) {
            Ok(outcome) => outcome,
            Err(e) => {
                tracing::error!(file = %file.name, "audit failed: {:#}", e);
                // An unreadable file cannot be called valid.
                VerifyOutcome::Mismatch
            }
        };
        match outcome {
            VerifyOutcome::Valid => println!("✅  File is valid: {}", file.name),
            VerifyOutcome::Missing => println!("⚠️  Missing file: {}", file.name),
            VerifyOutcome::Mismatch => println!("⚠️  Checksum mismatch for file {}", file.name),
            VerifyOutcome::NoChecksum => println!("❔  No checksum for file {}", file.name),
        }
        VerifyReport {
            name: file.name,
            outcome,
        }
    })
}

fn verify_one(file: &ArchiveFile, directory: &Path) -> Result<VerifyOutcome> {
    let segments = paths::sanitize(&file.name)?;
    let path = segments.join_to(directory);
    if !path.exists() {
        return Ok(VerifyOutcome::Missing);
    }
    if file.checksums.as_ref().and_then(ChecksumSet::best).is_none() {
        return Ok(VerifyOutcome::NoChecksum);
    }
    let outcome = match validate::validate(&path, file.checksums.as_ref())? {
        ValidationOutcome::Ok => VerifyOutcome::Valid,
        ValidationOutcome::Missing => VerifyOutcome::Missing,
        ValidationOutcome::Invalid => VerifyOutcome::Mismatch,
    };
    Ok(outcome)
}
