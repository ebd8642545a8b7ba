//! Streaming retrieval of one remote file to its sanitized local path.

use crate::checksum;
use crate::manifest::{ArchiveFile, ChecksumSet};
use crate::paths;
use anyhow::{Context, Result};
use std::fs::{self, File};
use std::io::Write;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

/// Transport-level failure while streaming a file to disk. Distinct from a
/// checksum mismatch, which is an outcome, not an error.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("transfer: {0}")]
    Curl(#[from] curl::Error),
    #[error("HTTP {0}")]
    Http(u32),
    #[error("i/o: {0}")]
    Io(#[from] std::io::Error),
}

/// Outcome of a fetch whose transfer completed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchStatus {
    /// Body written and the best checksum (if any) matched.
    Verified,
    /// Body written but the best checksum did not match. The file is left
    /// in place for inspection; the next download run's validation pass
    /// deletes and re-fetches it.
    ChecksumMismatch,
}

/// Downloads one manifest file under `target_dir` and verifies the result.
///
/// The remote URL is `base_url` + the raw manifest name (the archive expects
/// the original path); the local destination is the sanitized one. Parent
/// directories are created first. Transport and disk failures propagate as
/// errors, clearly separate from `ChecksumMismatch`.
pub fn fetch(base_url: &str, file: &ArchiveFile, target_dir: &Path) -> Result<FetchStatus> {
    let segments = paths::sanitize(&file.name)?;
    let local_path = segments.join_to(target_dir);
    fs::create_dir_all(segments.dir_path(target_dir))
        .with_context(|| format!("create directories for {}", file.name))?;

    let url = format!("{}{}", base_url, file.name);
    if let Err(e) = download_to(&url, &local_path) {
        // Don't leave a truncated body behind to be mistaken for a complete
        // file on the next run.
        let _ = fs::remove_file(&local_path);
        return Err(anyhow::Error::new(e).context(format!("download {}", url)));
    }

    let Some((algorithm, expected)) = file.checksums.as_ref().and_then(ChecksumSet::best) else {
        return Ok(FetchStatus::Verified);
    };
    match checksum::compute(&local_path, algorithm)? {
        Some(got) if got == expected => Ok(FetchStatus::Verified),
        got => {
            let got = got.map_or_else(|| "unavailable".to_string(), |v| v.to_string());
            tracing::warn!(
                file = %file.name, %algorithm, %expected, got = %got,
                "fresh download failed verification"
            );
            Ok(FetchStatus::ChecksumMismatch)
        }
    }
}

/// Streams `url` to `dest` with a single GET. The file handle and the curl
/// transfer are both released on every exit path.
fn download_to(url: &str, dest: &Path) -> Result<(), FetchError> {
    let mut out = File::create(dest)?;
    let mut write_error: Option<std::io::Error> = None;

    let mut easy = curl::easy::Easy::new();
    easy.url(url)?;
    easy.follow_location(true)?;
    easy.max_redirections(10)?;
    easy.fail_on_error(true)?;
    easy.connect_timeout(Duration::from_secs(30))?;
    // Abort when throughput drops below 1 KiB/s for 60s instead of a hard
    // wall-clock timeout; large files on slow links stay alive.
    easy.low_speed_limit(1024)?;
    easy.low_speed_time(Duration::from_secs(60))?;

    let transfer_result = {
        let mut transfer = easy.transfer();
        transfer.write_function(|data| match out.write_all(data) {
            Ok(()) => Ok(data.len()),
            Err(e) => {
                write_error = Some(e);
                // Short write aborts the transfer.
                Ok(0)
            }
        })?;
        transfer.perform()
    };
    if let Some(e) = write_error {
        return Err(FetchError::Io(e));
    }
    if let Err(e) = transfer_result {
        let code = easy.response_code().unwrap_or(0);
        if e.is_http_returned_error() && code != 0 {
            return Err(FetchError::Http(code));
        }
        return Err(FetchError::Curl(e));
    }

    let code = easy.response_code()?;
    if !(200..300).contains(&code) {
        return Err(FetchError::Http(code));
    }
    out.flush()?;
    Ok(())
}
