//! Integration tests: full download runs against an in-process HTTP server.
//!
//! Covers the skip/fetch/re-fetch decision logic end to end: a fresh mirror
//! downloads everything, a second run fetches nothing, corruption of one
//! file re-fetches exactly that file, and pool size never changes outcomes.

mod common;

use common::file_server;
use iamirror_core::download::{download_all, FileOutcome, RunSummary};
use iamirror_core::manifest::{ArchiveFile, ChecksumSet};
use sha1::{Digest, Sha1};
use std::collections::HashMap;
use std::fs;
use tempfile::tempdir;

fn sha1_hex(data: &[u8]) -> String {
    let mut hasher = Sha1::new();
    hasher.update(data);
    hex::encode(hasher.finalize())
}

fn record(name: &str, body: &[u8]) -> ArchiveFile {
    ArchiveFile {
        name: name.to_string(),
        checksums: Some(ChecksumSet {
            sha1: Some(sha1_hex(body)),
            size: Some(body.len() as u64),
            ..Default::default()
        }),
    }
}

fn item() -> (HashMap<String, Vec<u8>>, Vec<ArchiveFile>) {
    let bodies: Vec<(&str, Vec<u8>)> = vec![
        ("track01.flac", b"first body".to_vec()),
        ("disc1/track02.flac", (0u8..=255).cycle().take(70_000).collect()),
        ("cover.jpg", b"jpeg bytes".to_vec()),
    ];
    let files = bodies.iter().map(|(n, b)| record(n, b)).collect();
    let served = bodies
        .into_iter()
        .map(|(n, b)| (n.to_string(), b))
        .collect();
    (served, files)
}

#[test]
fn fresh_mirror_downloads_everything() {
    let (served, files) = item();
    let server = file_server::start(served.clone());
    let dir = tempdir().unwrap();

    let reports = download_all(files, &server.base_url, dir.path(), 2);
    let summary = RunSummary::tally(&reports);
    assert_eq!(
        summary,
        RunSummary {
            downloaded: 3,
            skipped: 0,
            failed: 0
        }
    );
    for (name, body) in &served {
        let local = dir.path().join(name);
        assert!(local.exists(), "{} should exist", name);
        assert_eq!(&fs::read(&local).unwrap(), body, "{} content", name);
    }
}

#[test]
fn second_run_performs_zero_fetches() {
    let (served, files) = item();
    let server = file_server::start(served);
    let dir = tempdir().unwrap();

    download_all(files.clone(), &server.base_url, dir.path(), 2);
    let hits_after_first = server.hits();
    assert_eq!(hits_after_first, 3);

    let reports = download_all(files, &server.base_url, dir.path(), 2);
    assert!(reports
        .iter()
        .all(|r| r.outcome == FileOutcome::Skipped));
    assert_eq!(server.hits(), hits_after_first, "no network access on rerun");
}

#[test]
fn corrupting_one_file_refetches_only_that_file() {
    let (served, files) = item();
    let server = file_server::start(served.clone());
    let dir = tempdir().unwrap();

    download_all(files.clone(), &server.base_url, dir.path(), 2);
    let hits_after_first = server.hits();

    let victim = dir.path().join("cover.jpg");
    fs::write(&victim, b"bit rot").unwrap();

    let reports = download_all(files, &server.base_url, dir.path(), 2);
    let summary = RunSummary::tally(&reports);
    assert_eq!(
        summary,
        RunSummary {
            downloaded: 1,
            skipped: 2,
            failed: 0
        }
    );
    let refetched: Vec<_> = reports
        .iter()
        .filter(|r| r.outcome == FileOutcome::Downloaded)
        .collect();
    assert_eq!(refetched.len(), 1);
    assert_eq!(refetched[0].name, "cover.jpg");
    assert_eq!(server.hits(), hits_after_first + 1);
    assert_eq!(fs::read(&victim).unwrap(), served["cover.jpg"]);
}

#[test]
fn pool_size_does_not_affect_terminal_outcomes() {
    let (served, files) = item();
    let server = file_server::start(served);

    let dir_serial = tempdir().unwrap();
    let dir_parallel = tempdir().unwrap();
    let serial = download_all(files.clone(), &server.base_url, dir_serial.path(), 1);
    let parallel = download_all(files, &server.base_url, dir_parallel.path(), 8);

    let mut serial: Vec<_> = serial.into_iter().map(|r| (r.name, r.outcome)).collect();
    let mut parallel: Vec<_> = parallel.into_iter().map(|r| (r.name, r.outcome)).collect();
    serial.sort_by(|a, b| a.0.cmp(&b.0));
    parallel.sort_by(|a, b| a.0.cmp(&b.0));
    assert_eq!(serial, parallel);
}

#[test]
fn missing_remote_file_fails_without_aborting_the_batch() {
    let (served, mut files) = item();
    files.push(record("ghost.bin", b"never published"));
    let server = file_server::start(served);
    let dir = tempdir().unwrap();

    let reports = download_all(files, &server.base_url, dir.path(), 2);
    let summary = RunSummary::tally(&reports);
    assert_eq!(summary.downloaded, 3);
    assert_eq!(summary.failed, 1);
    let failed = reports
        .iter()
        .find(|r| matches!(r.outcome, FileOutcome::Failed(_)))
        .unwrap();
    assert_eq!(failed.name, "ghost.bin");
    assert!(!dir.path().join("ghost.bin").exists());
}

#[test]
fn mismatched_download_is_failed_but_left_in_place() {
    let body = b"what the server actually has".to_vec();
    let server = file_server::start(HashMap::from([("a.bin".to_string(), body.clone())]));
    let dir = tempdir().unwrap();

    // Manifest promises different content than the server serves.
    let files = vec![record("a.bin", b"what the manifest promised")];
    let reports = download_all(files, &server.base_url, dir.path(), 1);
    assert_eq!(
        reports[0].outcome,
        FileOutcome::Failed("checksum mismatch".to_string())
    );
    assert_eq!(fs::read(dir.path().join("a.bin")).unwrap(), body);
}

#[test]
fn traversal_names_land_inside_the_target_dir() {
    let body = b"trapped".to_vec();
    // Serve the body under both spellings; clients may squash dot segments.
    let server = file_server::start(HashMap::from([
        ("../escape.txt".to_string(), body.clone()),
        ("escape.txt".to_string(), body.clone()),
    ]));
    let dir = tempdir().unwrap();
    let base = dir.path().join("mirror");
    fs::create_dir_all(&base).unwrap();

    let files = vec![record("../escape.txt", &body)];
    let reports = download_all(files, &server.base_url, &base, 1);
    assert_eq!(reports[0].outcome, FileOutcome::Downloaded);
    assert!(base.join("escape.txt").exists());
    assert!(!dir.path().join("escape.txt").exists());
}
