//! Sanitization of untrusted, manifest-supplied file names.
//!
//! Manifest names are publisher-controlled input. Traversal segments are
//! removed outright rather than resolved, so a sanitized name joined onto a
//! base directory can never escape that base.

use std::path::{Path, PathBuf};
use thiserror::Error;

/// A manifest name that sanitizes down to nothing (e.g. `"/"` or `"../.."`).
/// Fatal to that single manifest entry only.
#[derive(Debug, Error)]
#[error("manifest entry {0:?} yields no usable path")]
pub struct InvalidManifestEntry(pub String);

/// Relative path components of a manifest name after sanitization.
/// Never empty; the last segment is the leaf file name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathSegments(Vec<String>);

impl PathSegments {
    pub fn segments(&self) -> &[String] {
        &self.0
    }

    /// The file's own name (last segment).
    pub fn leaf(&self) -> &str {
        self.0.last().map(String::as_str).unwrap_or_default()
    }

    /// Directory segments (all but the last). Empty for a top-level file.
    pub fn dir_segments(&self) -> &[String] {
        &self.0[..self.0.len() - 1]
    }

    /// Full local path for this file under `base`.
    pub fn join_to(&self, base: &Path) -> PathBuf {
        let mut path = base.to_path_buf();
        for segment in &self.0 {
            path.push(segment);
        }
        path
    }

    /// Local directory the file lives in, under `base`.
    pub fn dir_path(&self, base: &Path) -> PathBuf {
        let mut path = base.to_path_buf();
        for segment in self.dir_segments() {
            path.push(segment);
        }
        path
    }
}

/// Splits `raw_name` on `/` and drops every `.`, `..`, and empty segment
/// (the latter covers leading slashes and doubled separators, normalizing
/// absolute-looking names to a safe relative form).
pub fn sanitize(raw_name: &str) -> Result<PathSegments, InvalidManifestEntry> {
    let segments: Vec<String> = raw_name
        .split('/')
        .filter(|part| !part.is_empty() && *part != "." && *part != "..")
        .map(str::to_string)
        .collect();
    if segments.is_empty() {
        return Err(InvalidManifestEntry(raw_name.to_string()));
    }
    Ok(PathSegments(segments))
}
