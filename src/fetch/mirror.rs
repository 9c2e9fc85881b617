// src/fetch/mirror.rs
//
// Pre-downloads raw source files into a local directory so `LocalSource`
// can serve them. Pipelines never call this.

use anyhow::{Context, Result};
use futures::{stream::FuturesUnordered, StreamExt};
use reqwest::Client;
use std::{path::Path, sync::Arc};
use tokio::{fs, sync::Semaphore, time::Instant};
use tracing::{error, info};
use url::Url;

use super::http::parse_base;

/// What happened to one file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MirrorOutcome {
    Downloaded,
    Skipped,
    Failed { id: String, error: String },
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct MirrorReport {
    pub downloaded: usize,
    pub skipped: usize,
    pub failed: Vec<(String, String)>,
}

impl MirrorReport {
    fn record(&mut self, outcome: MirrorOutcome) {
        match outcome {
            MirrorOutcome::Downloaded => self.downloaded += 1,
            MirrorOutcome::Skipped => self.skipped += 1,
            MirrorOutcome::Failed { id, error } => self.failed.push((id, error)),
        }
    }
}

/// Download `url` to `dest`, going through a temp file so a partial download
/// never looks complete.
pub async fn download_file(client: &Client, url: &Url, dest: &Path) -> Result<()> {
    if let Some(parent) = dest.parent() {
        fs::create_dir_all(parent)
            .await
            .with_context(|| format!("creating {}", parent.display()))?;
    }

    let resp = client
        .get(url.as_str())
        .send()
        .await
        .with_context(|| format!("GET {}", url))?
        .error_for_status()?;
    let bytes = resp.bytes().await?;

    let tmp = dest.with_extension("part");
    fs::write(&tmp, &bytes)
        .await
        .with_context(|| format!("writing {}", tmp.display()))?;
    fs::rename(&tmp, dest)
        .await
        .with_context(|| format!("renaming {} -> {}", tmp.display(), dest.display()))?;
    Ok(())
}

/// Mirror every id under `dest_dir`, at most `max_concurrent` at a time.
/// Existing files are left alone. Failures are collected, not fatal.
pub async fn mirror(
    client: &Client,
    base_url: &str,
    ids: &[String],
    dest_dir: &Path,
    max_concurrent: usize,
) -> Result<MirrorReport> {
    let base = parse_base(base_url)?;
    let sem = Arc::new(Semaphore::new(max_concurrent.max(1)));
    let mut tasks = FuturesUnordered::new();

    for id in ids {
        let client = client.clone();
        let sem = sem.clone();
        let id = id.clone();
        let dest = dest_dir.join(&id);
        let url = base.join(&id);

        tasks.push(tokio::spawn(async move {
            if fs::try_exists(&dest).await.unwrap_or(false) {
                info!(id = %id, "already mirrored");
                return MirrorOutcome::Skipped;
            }
            let url = match url {
                Ok(u) => u,
                Err(e) => {
                    return MirrorOutcome::Failed {
                        id,
                        error: e.to_string(),
                    }
                }
            };

            let _permit = match sem.acquire().await {
                Ok(p) => p,
                Err(e) => {
                    return MirrorOutcome::Failed {
                        id,
                        error: e.to_string(),
                    }
                }
            };
            info!(id = %id, "downloading");
            let start = Instant::now();
            match download_file(&client, &url, &dest).await {
                Ok(()) => {
                    info!(id = %id, elapsed = ?start.elapsed(), "downloaded");
                    MirrorOutcome::Downloaded
                }
                Err(err) => {
                    error!("{} failed: {:#}", url, err);
                    MirrorOutcome::Failed {
                        id,
                        error: format!("{:#}", err),
                    }
                }
            }
        }));
    }

    let mut report = MirrorReport::default();
    while let Some(joined) = tasks.next().await {
        report.record(joined.context("mirror task panicked")?);
    }

    info!(
        downloaded = report.downloaded,
        skipped = report.skipped,
        failed = report.failed.len(),
        "mirror finished"
    );
    Ok(report)
}
