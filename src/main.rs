mod loader;
mod settings;

use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result};
use broadcast_feed::{parse_detailed, write_free_text, Feed, Format, Parsed};
use clap::{Parser, Subcommand};
use tracing::{info, warn};

use loader::Source;
use settings::Settings;

#[derive(Parser)]
#[command(name = "broadcast_feed", about = "Parse and search broadcast transcripts and article feeds")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse one file and print its records
    Parse {
        path: PathBuf,
        /// free-text, flat-record or structured (default: from extension)
        #[arg(short, long)]
        format: Option<Format>,
        /// Print the feed as JSON
        #[arg(long)]
        json: bool,
        /// Sort articles newest first
        #[arg(long)]
        newest_first: bool,
    },
    /// Print titles of records matching a query
    Search {
        path: PathBuf,
        query: String,
        #[arg(short, long)]
        format: Option<Format>,
    },
    /// Load the first available candidate document, then parse it
    Load {
        /// Directory to look in (default: settings source_dir)
        #[arg(short, long, conflicts_with = "url")]
        dir: Option<PathBuf>,
        /// Base URL to fetch candidates from
        #[arg(short, long)]
        url: Option<String>,
        /// Only show records matching this query
        #[arg(short, long, default_value = "")]
        query: String,
    },
    /// Parse many files in parallel and report totals
    Batch {
        #[arg(required = true)]
        paths: Vec<PathBuf>,
    },
    /// Rewrite a document's broadcasts in the free-text format
    Export {
        path: PathBuf,
        #[arg(short, long)]
        format: Option<Format>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let t0 = Instant::now();
    let cli = Cli::parse();
    let settings = Settings::load()?;
    let configured_format = settings.declared_format()?;

    let result = match cli.command {
        Commands::Parse { path, format, json, newest_first } => {
            let mut parsed = parse_file(&path, format.or(configured_format))?;
            if newest_first {
                parsed.feed.sort_newest_first();
            }
            if json {
                println!("{}", serde_json::to_string_pretty(&parsed.feed)?);
            } else {
                print_feed(&parsed.feed);
                print_skipped(&parsed);
            }
            Ok(())
        }
        Commands::Search { path, query, format } => {
            let parsed = parse_file(&path, format.or(configured_format))?;
            let hits = parsed.feed.filter(&query);
            for title in hits.titles() {
                println!("{}", title);
            }
            println!("\n{} of {} {} match {:?}", hits.len(), parsed.feed.len(), parsed.feed.kind(), query);
            Ok(())
        }
        Commands::Load { dir, url, query } => {
            let source = match (url.or(settings.base_url.clone()), dir) {
                (_, Some(dir)) => Source::Dir(dir),
                (Some(url), None) => Source::Url(url),
                (None, None) => Source::Dir(settings.source_dir.clone()),
            };
            let loaded = loader::load_first(&source, &settings.candidates).await?;
            let format = configured_format.unwrap_or(loaded.format);
            let parsed = parse_detailed(&loaded.content, format)
                .with_context(|| format!("Failed to parse {}", loaded.name))?;
            println!("Loaded {} as {}", loaded.name, format);
            print_feed(&parsed.feed.filter(&query));
            print_skipped(&parsed);
            Ok(())
        }
        Commands::Batch { paths } => batch(&paths, configured_format),
        Commands::Export { path, format } => {
            let parsed = parse_file(&path, format.or(configured_format))?;
            match parsed.feed {
                Feed::Broadcasts(b) => {
                    print!("{}", write_free_text(&b));
                    Ok(())
                }
                Feed::Articles(_) => Err(anyhow::anyhow!(
                    "{} holds articles; only broadcasts can be exported as free text",
                    path.display()
                )),
            }
        }
    };

    let elapsed = t0.elapsed();
    if elapsed.as_secs() >= 1 {
        info!("Done in {:.1}s", elapsed.as_secs_f64());
    }

    result
}

fn parse_file(path: &Path, declared: Option<Format>) -> Result<Parsed> {
    let raw = std::fs::read_to_string(path).with_context(|| format!("Failed to read {:?}", path))?;
    let format = Format::resolve(declared, Some(path));
    parse_detailed(&raw, format).with_context(|| format!("Failed to parse {:?} as {}", path, format))
}

fn batch(paths: &[PathBuf], declared: Option<Format>) -> Result<()> {
    use indicatif::{ProgressBar, ProgressStyle};
    use rayon::prelude::*;

    let pb = ProgressBar::new(paths.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({per_sec})")?
            .progress_chars("#>-"),
    );

    let results: Vec<(&PathBuf, Result<Parsed>)> = paths
        .par_iter()
        .map(|path| {
            let result = parse_file(path, declared);
            pb.inc(1);
            (path, result)
        })
        .collect();
    pb.finish_and_clear();

    let mut counts = BatchCounts::default();
    for (path, result) in &results {
        match result {
            Ok(parsed) => {
                match &parsed.feed {
                    Feed::Broadcasts(b) => counts.broadcasts += b.len(),
                    Feed::Articles(a) => counts.articles += a.len(),
                }
                counts.skipped += parsed.skipped.len();
                println!("{:<40} {:>5} {}", path.display(), parsed.feed.len(), parsed.feed.kind());
            }
            Err(e) => {
                counts.failed += 1;
                warn!("{:#}", e);
            }
        }
    }
    counts.print();
    Ok(())
}

#[derive(Default)]
struct BatchCounts {
    broadcasts: usize,
    articles: usize,
    skipped: usize,
    failed: usize,
}

impl BatchCounts {
    fn print(&self) {
        println!(
            "Parsed {} broadcasts, {} articles ({} records skipped, {} files failed).",
            self.broadcasts, self.articles, self.skipped, self.failed,
        );
    }
}

fn print_feed(feed: &Feed) {
    match feed {
        Feed::Broadcasts(broadcasts) => {
            for b in broadcasts {
                let host = b.host.as_deref().unwrap_or("-");
                println!(
                    "{} | host: {} | {} lines | {} images",
                    b.title,
                    host,
                    b.utterances.len(),
                    b.images.len()
                );
            }
        }
        Feed::Articles(articles) => {
            for a in articles {
                println!("{:>4} | {:<10} | {:<20} | {}", a.id, a.date, truncate(&a.author, 20), a.title);
            }
        }
    }
    println!("\n{} {}", feed.len(), feed.kind());
}

fn print_skipped(parsed: &Parsed) {
    if parsed.skipped.is_empty() {
        return;
    }
    println!("\n--- Skipped ---");
    for s in &parsed.skipped {
        println!("  #{}: {}", s.position, s.reason);
    }
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let truncated: String = s.chars().take(max).collect();
        format!("{}...", truncated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn load_rejects_dir_with_url() {
        let res = Cli::try_parse_from(["broadcast_feed", "load", "--dir", "feeds", "--url", "https://example.com"]);
        assert_eq!(res.err().map(|e| e.kind()), Some(clap::error::ErrorKind::ArgumentConflict));
    }

    #[test]
    fn load_takes_either_source() {
        assert!(Cli::try_parse_from(["broadcast_feed", "load", "--dir", "feeds"]).is_ok());
        assert!(Cli::try_parse_from(["broadcast_feed", "load", "-u", "https://example.com"]).is_ok());
    }
}
