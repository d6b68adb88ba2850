use std::path::PathBuf;

use anyhow::{Context, Result};
use broadcast_feed::Format;
use config::{Config, Environment, File};
use serde::Deserialize;

pub const DEFAULT_CANDIDATES: &[&str] = &["posts.json", "posts.txt", "articles.psv"];

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    /// Directory the loader searches for candidate files.
    pub source_dir: PathBuf,
    /// When set, candidates are fetched from `{base_url}/{name}` instead.
    pub base_url: Option<String>,
    /// File names tried in order; first readable one wins.
    pub candidates: Vec<String>,
    /// Declared format overriding the extension hint.
    pub format: Option<String>,
}

impl Settings {
    /// `broadcast_feed.toml` (optional) overlaid with `BROADCAST_*` env vars.
    pub fn load() -> Result<Self> {
        let settings = Config::builder()
            .set_default("source_dir", ".")?
            .set_default("candidates", DEFAULT_CANDIDATES.to_vec())?
            .add_source(File::with_name("broadcast_feed").required(false))
            .add_source(
                Environment::with_prefix("BROADCAST")
                    .try_parsing(true)
                    .list_separator(",")
                    .with_list_parse_key("candidates"),
            )
            .build()
            .context("Failed to read settings")?;
        settings
            .try_deserialize()
            .context("Invalid settings")
    }

    pub fn declared_format(&self) -> Result<Option<Format>> {
        self.format
            .as_deref()
            .map(str::parse::<Format>)
            .transpose()
            .context("Invalid format in settings")
    }
}
