//! Download command: mirror one item's full file set.

use anyhow::{Context, Result};
use iamirror_core::config::MirrorConfig;
use iamirror_core::download::{self, RunSummary};
use iamirror_core::fetch;
use iamirror_core::manifest::{self, ArchiveFile};
use std::fs;
use std::path::Path;

pub fn run_download(
    cfg: &MirrorConfig,
    url: &str,
    threads: Option<usize>,
    target_dir: &Path,
) -> Result<()> {
    let threads = threads.unwrap_or(cfg.threads).max(1);
    let archive_name = manifest::archive_name_from_url(url)
        .with_context(|| format!("cannot derive an item identifier from {}", url))?;
    let archive_url = format!("{}{}/", cfg.base_url, archive_name);
    let manifest_name = manifest::manifest_file_name(&archive_name);

    fs::create_dir_all(target_dir)
        .with_context(|| format!("create target directory {}", target_dir.display()))?;

    // Bootstrap: the manifest is itself a file of the item, fetched with no
    // checksums. Failure here is fatal; nothing can be enumerated without it.
    let manifest_record = ArchiveFile {
        name: manifest_name.clone(),
        checksums: None,
    };
    fetch::fetch(&archive_url, &manifest_record, target_dir)
        .with_context(|| format!("fetch manifest {}", manifest_name))?;

    let xml = fs::read_to_string(target_dir.join(&manifest_name))
        .with_context(|| format!("read manifest {}", manifest_name))?;
    let files: Vec<ArchiveFile> = manifest::parse_manifest(&xml)?
        .into_iter()
        .filter(|f| f.name != manifest_name)
        .collect();
    tracing::info!(
        item = %archive_name,
        files = files.len(),
        threads,
        "starting download run"
    );

    let reports = download::download_all(files, &archive_url, target_dir, threads);
    let summary = RunSummary::tally(&reports);
    println!(
        "{} downloaded, {} skipped, {} failed",
        summary.downloaded, summary.skipped, summary.failed
    );
    if summary.failed > 0 {
        tracing::warn!(failed = summary.failed, "run completed with failures; re-run to retry");
    }
    Ok(())
}
