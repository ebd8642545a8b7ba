//! Streaming checksum computation for mirrored files.
//!
//! All algorithms read the file in fixed-size chunks so arbitrarily large
//! files never have to fit in memory. A missing file is reported as
//! "unavailable" (`None`), not as an error; callers treat it as
//! "cannot validate."

use anyhow::{Context, Result};
use md5::Md5;
use sha1::{Digest, Sha1};
use std::fmt;
use std::fs::File;
use std::io::Read;
use std::path::Path;

const BUF_SIZE: usize = 64 * 1024;

/// Checksum kinds found in an item manifest, strongest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChecksumAlgorithm {
    Sha1,
    Md5,
    Crc32,
    /// Byte-count comparison only. Weak fallback, not a hash.
    Size,
}

/// Preference order used when a manifest record carries several checksums.
pub const PREFERENCE: [ChecksumAlgorithm; 4] = [
    ChecksumAlgorithm::Sha1,
    ChecksumAlgorithm::Md5,
    ChecksumAlgorithm::Crc32,
    ChecksumAlgorithm::Size,
];

impl fmt::Display for ChecksumAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ChecksumAlgorithm::Sha1 => "sha1",
            ChecksumAlgorithm::Md5 => "md5",
            ChecksumAlgorithm::Crc32 => "crc32",
            ChecksumAlgorithm::Size => "size",
        };
        f.write_str(name)
    }
}

/// Computed or expected checksum value: lowercase hex for the hash kinds,
/// a byte count for [`ChecksumAlgorithm::Size`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChecksumValue {
    Hex(String),
    Bytes(u64),
}

impl fmt::Display for ChecksumValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChecksumValue::Hex(s) => f.write_str(s),
            ChecksumValue::Bytes(n) => write!(f, "{}", n),
        }
    }
}

/// Computes `algorithm` over the file at `path`.
///
/// Returns `Ok(None)` when the file does not exist. I/O failures on an
/// existing file are real errors and propagate.
pub fn compute(path: &Path, algorithm: ChecksumAlgorithm) -> Result<Option<ChecksumValue>> {
    if !path.is_file() {
        return Ok(None);
    }
    let value = match algorithm {
        ChecksumAlgorithm::Sha1 => ChecksumValue::Hex(hex_digest::<Sha1>(path)?),
        ChecksumAlgorithm::Md5 => ChecksumValue::Hex(hex_digest::<Md5>(path)?),
        ChecksumAlgorithm::Crc32 => ChecksumValue::Hex(crc32_hex(path)?),
        ChecksumAlgorithm::Size => {
            let meta = path
                .metadata()
                .with_context(|| format!("stat {}", path.display()))?;
            ChecksumValue::Bytes(meta.len())
        }
    };
    Ok(Some(value))
}

/// Chunked digest over the whole file, returned as lowercase hex.
fn hex_digest<D: Digest>(path: &Path) -> Result<String> {
    let mut f = File::open(path).with_context(|| format!("open {}", path.display()))?;
    let mut hasher = D::new();
    let mut buf = [0u8; BUF_SIZE];
    loop {
        let n = f
            .read(&mut buf)
            .with_context(|| format!("read {}", path.display()))?;
        if n == 0 {
            break;
        }
        hasher.update(&buf[..n]);
    }
    Ok(hex::encode(hasher.finalize()))
}

/// CRC-32 (ISO-3309 polynomial) folded across chunks, zero-padded to 8 hex
/// digits. Chunked folding is equivalent to hashing the whole stream at once.
fn crc32_hex(path: &Path) -> Result<String> {
    let mut f = File::open(path).with_context(|| format!("open {}", path.display()))?;
    let mut hasher = crc32fast::Hasher::new();
    let mut buf = [0u8; BUF_SIZE];
    loop {
        let n = f
            .read(&mut buf)
            .with_context(|| format!("read {}", path.display()))?;
        if n == 0 {
            break;
        }
        hasher.update(&buf[..n]);
    }
    Ok(format!("{:08x}", hasher.finalize()))
}
