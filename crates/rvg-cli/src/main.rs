use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use rvg_acquire::fetch::DEFAULT_ORIGIN;
use rvg_acquire::{FetchConfig, HarvestOptions, Harvester, PageFetcher};
use rvg_model::Catalog;

#[derive(Parser)]
#[command(name = "rvg")]
#[command(about = "Harvest the Reina-Valera Gómez Bible into one text file per chapter")]
#[command(version)]
struct Cli {
    /// Log level: error, warn, info, debug, trace
    #[arg(long, global = true, default_value = "info", value_enum)]
    log_level: LogLevel,

    /// Use UTC timestamps instead of local time
    #[arg(long, global = true)]
    utc: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, clap::ValueEnum)]
enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch every chapter and write `{NN}-{book}/{book}-{CC}.txt` files
    Fetch {
        /// Root directory for the book directories
        #[arg(short = 'O', long, default_value = ".")]
        output_dir: PathBuf,

        /// Site origin serving the /sparvg/ pages
        #[arg(long, default_value = DEFAULT_ORIGIN)]
        origin: String,

        /// Only these books, by site code (e.g., "GEN,PSA,REV")
        #[arg(short, long, value_delimiter = ',')]
        book: Vec<String>,

        /// Per-request timeout in seconds
        #[arg(long, default_value_t = 30)]
        timeout_secs: u64,

        /// Pause before each request, in milliseconds
        #[arg(long, default_value_t = 0)]
        delay_ms: u64,

        /// Keep a copy of every fetched page under `{output_dir}/.html/`
        #[arg(long)]
        cache_html: bool,
    },

    /// List the books of the catalog
    Books {
        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Map log level, suppressing noisy HTML-parsing crates at debug/trace
    let level = match cli.log_level {
        LogLevel::Error => "error",
        LogLevel::Warn  => "warn",
        LogLevel::Info  => "info",
        LogLevel::Debug => "debug,selectors=warn,html5ever=warn,hyper_util=info",
        LogLevel::Trace => "trace,selectors=warn,html5ever=warn,hyper_util=info",
    };
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    // Timestamp format: 2026-02-14 19:44:09.123 -08:00
    let time_format = "%Y-%m-%d %H:%M:%S%.3f %:z";

    if cli.utc {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_timer(tracing_subscriber::fmt::time::ChronoUtc::new(time_format.to_string()))
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_timer(tracing_subscriber::fmt::time::ChronoLocal::new(time_format.to_string()))
            .init();
    }

    match cli.command {
        Commands::Fetch {
            output_dir,
            origin,
            book,
            timeout_secs,
            delay_ms,
            cache_html,
        } => {
            let catalog = if book.is_empty() {
                Catalog::standard()
            } else {
                Catalog::standard()
                    .select(book.as_slice())
                    .context("Invalid --book selection")?
            };

            let fetcher = PageFetcher::new(&FetchConfig {
                origin,
                timeout: Duration::from_secs(timeout_secs),
                ..FetchConfig::default()
            })?;
            let options = HarvestOptions {
                output_dir,
                cache_html,
                delay: Duration::from_millis(delay_ms),
            };

            let summary = Harvester::new(catalog, fetcher, options).run().await?;
            if !summary.is_success() {
                for failure in &summary.failures {
                    tracing::error!(
                        book = %failure.site_code,
                        chapter = failure.chapter,
                        "{}",
                        failure.reason
                    );
                }
                anyhow::bail!(
                    "{} of {} chapters failed; re-run to retry them",
                    summary.failures.len(),
                    summary.chapters()
                );
            }
        }
        Commands::Books { json } => {
            let catalog = Catalog::standard();
            if json {
                println!("{}", serde_json::to_string_pretty(catalog.entries())?);
            } else {
                for entry in catalog.entries() {
                    println!(
                        "{:<22} {:<4} {:>3}  {}",
                        entry.dir_name(),
                        entry.book.site_code,
                        entry.book.chapters,
                        entry.book.name
                    );
                }
                tracing::info!(
                    books = catalog.len(),
                    chapters = catalog.total_chapters(),
                    "Catalog listed"
                );
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_fetch_defaults() {
        let cli = Cli::try_parse_from(["rvg", "fetch"]).unwrap();
        let Commands::Fetch { output_dir, origin, book, timeout_secs, delay_ms, cache_html } = cli.command else {
            panic!("expected fetch command");
        };
        assert_eq!(output_dir, PathBuf::from("."));
        assert_eq!(origin, "https://ebible.org");
        assert!(book.is_empty());
        assert_eq!(timeout_secs, 30);
        assert_eq!(delay_ms, 0);
        assert!(!cache_html);
    }

    #[test]
    fn test_book_list_splits_on_commas() {
        let cli = Cli::try_parse_from(["rvg", "--utc", "fetch", "-b", "GEN,PSA", "-O", "/tmp/biblia"]).unwrap();
        assert!(cli.utc);
        let Commands::Fetch { book, output_dir, .. } = cli.command else {
            panic!("expected fetch command");
        };
        assert_eq!(book, vec!["GEN", "PSA"]);
        assert_eq!(output_dir, PathBuf::from("/tmp/biblia"));
    }
}
