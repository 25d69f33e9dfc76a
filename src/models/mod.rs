//! Data models for podharvest.

mod episode;

pub use episode::{Episode, NO_DATE, NO_DESCRIPTION, NO_DURATION, NO_TITLE};
