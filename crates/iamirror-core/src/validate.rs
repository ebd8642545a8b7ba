//! Classification of a local file against its expected checksums.

use crate::checksum;
use crate::manifest::ChecksumSet;
use anyhow::Result;
use std::path::Path;

/// Result of comparing a local file to its manifest record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationOutcome {
    /// Present and the best checksum matches, or no checksum data exists to
    /// disprove it.
    Ok,
    Missing,
    /// Present but the best checksum does not match.
    Invalid,
}

/// Validates the file at `path` against `checksums`.
///
/// A file with no integrity data (absent or all-empty set) is `Ok` once
/// present: absence of proof is not proof of absence, and such files are
/// never re-downloaded. Read failures on an existing file propagate.
pub fn validate(path: &Path, checksums: Option<&ChecksumSet>) -> Result<ValidationOutcome> {
    if !path.exists() {
        return Ok(ValidationOutcome::Missing);
    }
    let Some((algorithm, expected)) = checksums.and_then(ChecksumSet::best) else {
        tracing::debug!(path = %path.display(), "no checksum data, accepting as-is");
        return Ok(ValidationOutcome::Ok);
    };
    match checksum::compute(path, algorithm)? {
        // Disappeared between the existence check and the read.
        None => Ok(ValidationOutcome::Missing),
        Some(got) if got == expected => {
            tracing::debug!(path = %path.display(), %algorithm, %got, "checksum ok");
            Ok(ValidationOutcome::Ok)
        }
        Some(got) => {
            tracing::warn!(
                path = %path.display(), %algorithm, %expected, %got,
                "checksum mismatch"
            );
            Ok(ValidationOutcome::Invalid)
        }
    }
}
