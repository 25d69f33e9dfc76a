//! Podharvest - incremental podcast episode harvester.
//!
//! Drives a headless browser through a "load more" paginated episode listing,
//! checkpointing every newly revealed batch to a JSON snapshot and streaming
//! progress to a single observer.

pub mod aggregate;
pub mod cli;
pub mod config;
pub mod error;
pub mod models;
pub mod progress;
pub mod scrapers;
pub mod server;
pub mod storage;

pub use error::{ScrapeError, ScrapeResult};
pub use models::Episode;
