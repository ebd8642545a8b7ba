//! `_files.xml` parsing.
//!
//! The manifest is a flat `<files>` document of `<file name=...>` elements,
//! each with optional `<sha1>`, `<md5>`, `<crc32>` and `<size>` children.
//! A parse failure here is fatal to the whole run; without the manifest no
//! files can be enumerated.

use super::{ArchiveFile, ChecksumSet};
use roxmltree::{Document, Node};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ManifestError {
    #[error("manifest XML is not well-formed: {0}")]
    Xml(#[from] roxmltree::Error),
    #[error("manifest contains no <file> records")]
    Empty,
}

/// Parses manifest XML into file records.
///
/// Records without a `name` attribute are skipped with a warning; a manifest
/// yielding no records at all is an error.
pub fn parse_manifest(xml: &str) -> Result<Vec<ArchiveFile>, ManifestError> {
    let doc = Document::parse(xml)?;
    let files: Vec<ArchiveFile> = doc
        .descendants()
        .filter(|node| node.has_tag_name("file"))
        .filter_map(|node| {
            let Some(name) = node.attribute("name") else {
                tracing::warn!("manifest <file> record without name attribute, skipping");
                return None;
            };
            Some(ArchiveFile {
                name: name.to_string(),
                checksums: Some(read_checksums(&node)),
            })
        })
        .collect();
    if files.is_empty() {
        return Err(ManifestError::Empty);
    }
    Ok(files)
}

fn read_checksums(file_node: &Node<'_, '_>) -> ChecksumSet {
    let text_of = |tag: &str| {
        file_node
            .children()
            .find(|c| c.has_tag_name(tag))
            .and_then(|c| c.text())
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
    };
    let size = text_of("size").and_then(|s| match s.parse::<u64>() {
        Ok(n) => Some(n),
        Err(_) => {
            tracing::warn!(size = %s, "manifest size field is not an integer, ignoring");
            None
        }
    });
    ChecksumSet {
        sha1: text_of("sha1"),
        md5: text_of("md5"),
        crc32: text_of("crc32"),
        size,
    }
}
