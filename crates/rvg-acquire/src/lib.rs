//! Chapter acquisition for the Reina-Valera Gómez Bible on ebible.org.
//!
//! [`harvest::Harvester`] walks a [`rvg_model::Catalog`], fetching each
//! chapter page with [`fetch::PageFetcher`], pulling verses out with
//! [`extract::VerseExtractor`] and writing them once with [`output::write_once`].

pub mod error;
pub mod extract;
pub mod fetch;
pub mod harvest;
pub mod normalize;
pub mod output;

pub use error::{ChapterError, ExtractError, FetchError, HarvestError};
pub use extract::VerseExtractor;
pub use fetch::{FetchConfig, PageFetcher};
pub use harvest::{ChapterFailure, ChapterOutcome, HarvestOptions, HarvestSummary, Harvester};
