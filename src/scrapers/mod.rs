//! Episode listing scraper: browser driver, extraction, pagination and sessions.

pub mod browser;
pub mod config;
pub mod extract;
pub mod pagination;
pub mod session;

pub use browser::{BrowserEngineConfig, ChromiumLauncher, DriverLauncher, PageDriver};
pub use config::{SelectorConfig, SourceConfig};
pub use extract::EpisodeExtractor;
pub use pagination::{Harvest, PaginationController, StopReason};
pub use session::run_session;
