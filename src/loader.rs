use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use broadcast_feed::Format;
use tracing::{debug, info};

/// Where candidate documents are read from.
#[derive(Debug, Clone)]
pub enum Source {
    Dir(PathBuf),
    Url(String),
}

/// The first candidate that could be read.
#[derive(Debug)]
pub struct Loaded {
    pub name: String,
    pub content: String,
    /// Format implied by the candidate's extension.
    pub format: Format,
}

/// Try each candidate in order and return the first one that reads.
/// A missing candidate moves on to the next; there are no retries.
pub async fn load_first(source: &Source, candidates: &[String]) -> Result<Loaded> {
    let client = reqwest::Client::new();
    let mut failures = Vec::new();

    for name in candidates {
        let attempt = match source {
            Source::Dir(dir) => read_file(&dir.join(name)).await,
            Source::Url(base) => fetch(&client, &join_url(base, name)).await,
        };
        match attempt {
            Ok(content) => {
                info!("Loaded {} ({} bytes)", name, content.len());
                return Ok(Loaded {
                    name: name.clone(),
                    content,
                    format: Format::from_path(Path::new(name)),
                });
            }
            Err(e) => {
                debug!("Candidate {} unavailable: {:#}", name, e);
                failures.push(format!("{}: {:#}", name, e));
            }
        }
    }

    if failures.is_empty() {
        bail!("No candidate file names configured");
    }
    bail!("No candidate could be loaded:\n  {}", failures.join("\n  "))
}

async fn read_file(path: &Path) -> Result<String> {
    tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read {:?}", path))
}

async fn fetch(client: &reqwest::Client, url: &str) -> Result<String> {
    let text = client
        .get(url)
        .send()
        .await?
        .error_for_status()?
        .text()
        .await
        .with_context(|| format!("Failed to fetch {}", url))?;
    Ok(text)
}

fn join_url(base: &str, name: &str) -> String {
    format!("{}/{}", base.trim_end_matches('/'), name.trim_start_matches('/'))
}
