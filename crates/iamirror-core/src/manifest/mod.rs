//! Item manifest model: file records and their expected checksums.
//!
//! An Internet Archive item publishes a `{item}_files.xml` manifest listing
//! every file with up to four integrity fields. Records are constructed once
//! from the manifest and read-only afterwards.

mod parse;

pub use parse::{parse_manifest, ManifestError};

use crate::checksum::{ChecksumAlgorithm, ChecksumValue, PREFERENCE};
use url::Url;

/// Expected checksums for one manifest record. Any subset may be present.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChecksumSet {
    pub sha1: Option<String>,
    pub md5: Option<String>,
    pub crc32: Option<String>,
    pub size: Option<u64>,
}

impl ChecksumSet {
    /// The strongest available checksum and its expected value, per the
    /// fixed preference order (sha1 > md5 > crc32 > size). `None` when the
    /// set carries no integrity data at all.
    pub fn best(&self) -> Option<(ChecksumAlgorithm, ChecksumValue)> {
        PREFERENCE.into_iter().find_map(|algorithm| {
            self.expected(algorithm).map(|value| (algorithm, value))
        })
    }

    /// Expected value for one algorithm, hex digests normalized to lowercase.
    fn expected(&self, algorithm: ChecksumAlgorithm) -> Option<ChecksumValue> {
        let hex = |s: &String| ChecksumValue::Hex(s.to_ascii_lowercase());
        match algorithm {
            ChecksumAlgorithm::Sha1 => self.sha1.as_ref().map(hex),
            ChecksumAlgorithm::Md5 => self.md5.as_ref().map(hex),
            ChecksumAlgorithm::Crc32 => self.crc32.as_ref().map(hex),
            ChecksumAlgorithm::Size => self.size.map(ChecksumValue::Bytes),
        }
    }
}

/// One file listed in an item manifest. `name` is the manifest's own
/// relative path, untrusted until sanitized.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveFile {
    pub name: String,
    pub checksums: Option<ChecksumSet>,
}

/// Derives the item identifier from a user-supplied archive URL: its last
/// non-empty path segment (`https://archive.org/details/<item>` → `<item>`).
pub fn archive_name_from_url(url: &str) -> Option<String> {
    let parsed = Url::parse(url).ok()?;
    let segment = parsed.path().split('/').filter(|s| !s.is_empty()).last()?;
    if segment == "." || segment == ".." {
        return None;
    }
    Some(segment.to_string())
}

/// Manifest file name for an item, as published by the archive.
pub fn manifest_file_name(archive_name: &str) -> String {
    format!("{}_files.xml", archive_name)
}
