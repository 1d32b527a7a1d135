use std::path::PathBuf;
use std::time::Duration;

use chrono::{DateTime, Local};
use rvg_model::{Catalog, ChapterTarget};

use crate::error::{ChapterError, HarvestError};
use crate::extract::VerseExtractor;
use crate::fetch::PageFetcher;
use crate::output::{self, WriteOutcome};

/// Directory under the output root where raw pages are archived.
pub const HTML_CACHE_DIR: &str = ".html";

#[derive(Debug, Clone)]
pub struct HarvestOptions {
    /// Root holding the `{NN}-{code}` book directories.
    pub output_dir: PathBuf,
    /// Archive every fetched page under `{output_dir}/.html/`.
    pub cache_html: bool,
    /// Pause before each request.
    pub delay: Duration,
}

impl Default for HarvestOptions {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("."),
            cache_html: false,
            delay: Duration::ZERO,
        }
    }
}

/// How a single chapter ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChapterOutcome {
    Saved { verses: usize },
    /// Destination already non-empty; nothing fetched or written.
    AlreadyExists,
    /// Page fetched but no verse containers matched; nothing written.
    NoContent,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChapterFailure {
    pub site_code: String,
    pub chapter: u16,
    pub reason: String,
}

/// Tally of a finished harvest.
#[derive(Debug, Clone)]
pub struct HarvestSummary {
    pub saved: usize,
    pub already_existed: usize,
    pub no_content: usize,
    pub verses: usize,
    pub failures: Vec<ChapterFailure>,
    pub started_at: DateTime<Local>,
    pub finished_at: DateTime<Local>,
}

impl HarvestSummary {
    fn new(started_at: DateTime<Local>) -> Self {
        Self {
            saved: 0,
            already_existed: 0,
            no_content: 0,
            verses: 0,
            failures: Vec::new(),
            started_at,
            finished_at: started_at,
        }
    }

    fn record(&mut self, outcome: ChapterOutcome) {
        match outcome {
            ChapterOutcome::Saved { verses } => {
                self.saved += 1;
                self.verses += verses;
            }
            ChapterOutcome::AlreadyExists => self.already_existed += 1,
            ChapterOutcome::NoContent => self.no_content += 1,
        }
    }

    fn record_failure(&mut self, target: &ChapterTarget, err: &ChapterError) {
        self.failures.push(ChapterFailure {
            site_code: target.book.site_code.to_string(),
            chapter: target.chapter,
            reason: err.to_string(),
        });
    }

    /// Chapters visited, whatever their outcome.
    pub fn chapters(&self) -> usize {
        self.saved + self.already_existed + self.no_content + self.failures.len()
    }

    /// True when no chapter failed.
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }

    pub fn elapsed(&self) -> chrono::Duration {
        self.finished_at - self.started_at
    }
}

/// Walks a catalog chapter by chapter: fetch, extract, write once.
///
/// Strictly sequential. A chapter that fails is logged and recorded; the
/// walk always continues with the next one.
pub struct Harvester {
    catalog: Catalog,
    fetcher: PageFetcher,
    extractor: VerseExtractor,
    options: HarvestOptions,
}

impl Harvester {
    pub fn new(catalog: Catalog, fetcher: PageFetcher, options: HarvestOptions) -> Self {
        Self {
            catalog,
            fetcher,
            extractor: VerseExtractor::default(),
            options,
        }
    }

    pub fn with_extractor(mut self, extractor: VerseExtractor) -> Self {
        self.extractor = extractor;
        self
    }

    /// Harvest every chapter of the catalog.
    ///
    /// Consumes the harvester, so the fetcher's connections are released
    /// when the run ends. Only failing to create the book directories aborts
    /// the run; per-chapter failures end up in the summary.
    pub async fn run(self) -> Result<HarvestSummary, HarvestError> {
        let mut summary = HarvestSummary::new(Local::now());
        tracing::info!(
            books = self.catalog.len(),
            chapters = self.catalog.total_chapters(),
            origin = %self.fetcher.origin(),
            output = %self.options.output_dir.display(),
            "Starting harvest"
        );

        output::ensure_book_directories(&self.options.output_dir, &self.catalog)?;

        for target in self.catalog.chapters() {
            match self.harvest_chapter(&target).await {
                Ok(outcome) => summary.record(outcome),
                Err(err) => {
                    tracing::error!(
                        book = %target.book.name,
                        chapter = target.chapter,
                        status = ?fetch_status(&err),
                        error = %err,
                        "Chapter failed"
                    );
                    summary.record_failure(&target, &err);
                }
            }
        }

        summary.finished_at = Local::now();
        tracing::info!(
            saved = summary.saved,
            already_existed = summary.already_existed,
            no_content = summary.no_content,
            failed = summary.failures.len(),
            verses = summary.verses,
            seconds = summary.elapsed().num_milliseconds() as f64 / 1000.0,
            "Harvest finished"
        );
        Ok(summary)
    }

    async fn harvest_chapter(&self, target: &ChapterTarget) -> Result<ChapterOutcome, ChapterError> {
        let file_name = target.file_name();
        let path = target.file_path(&self.options.output_dir);
        tracing::info!(file = %file_name, "Processing chapter");

        // Resumed runs skip finished chapters without a request.
        let exists = output::has_content(&path).map_err(|source| ChapterError::Inspect {
            path: path.clone(),
            source,
        })?;
        if exists {
            tracing::info!(file = %file_name, "File already exists and is not empty. Skipping");
            return Ok(ChapterOutcome::AlreadyExists);
        }

        if !self.options.delay.is_zero() {
            tokio::time::sleep(self.options.delay).await;
        }
        let html = self.fetcher.fetch_page(&target.remote_path()).await?;

        if self.options.cache_html {
            let cache_dir = self.options.output_dir.join(HTML_CACHE_DIR);
            if let Err(err) = output::cache_html(&cache_dir, &target.page_name(), &html) {
                tracing::warn!(page = %target.page_name(), error = %err, "Could not cache raw HTML");
            }
        }

        let verses = self.extractor.extract(&html);
        if verses.is_empty() {
            tracing::warn!(book = %target.book.name, chapter = target.chapter, "No verses found");
            return Ok(ChapterOutcome::NoContent);
        }
        tracing::info!(
            book = %target.book.name,
            chapter = target.chapter,
            verses = verses.len(),
            "Extracted verses"
        );

        let written = output::write_once(&path, &verses).map_err(|source| ChapterError::Write {
            path: path.clone(),
            source,
        })?;
        match written {
            WriteOutcome::Written { bytes } => {
                tracing::info!(path = %path.display(), bytes, "Saved chapter");
                Ok(ChapterOutcome::Saved { verses: verses.len() })
            }
            WriteOutcome::AlreadyExists => {
                tracing::info!(file = %file_name, "File already exists and is not empty. Skipping");
                Ok(ChapterOutcome::AlreadyExists)
            }
        }
    }
}

fn fetch_status(err: &ChapterError) -> Option<u16> {
    match err {
        ChapterError::Fetch(fetch) => fetch.status().map(|s| s.as_u16()),
        ChapterError::Inspect { .. } | ChapterError::Write { .. } => None,
    }
}
