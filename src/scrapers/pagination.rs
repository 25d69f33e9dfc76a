//! Pagination controller: expands the listing until the source runs dry.
//!
//! Each step waits for episode elements, extracts the whole page, folds the
//! new suffix into the running result, checkpoints it to disk and publishes
//! it. Then the "load more" control is clicked and the element count is
//! re-measured after a settle delay. The loop ends when the control is gone,
//! a click reveals nothing new, or the expansion limit is reached.
//!
//! Every await point also watches the observer; if it disconnects the run
//! stops with [`ScrapeError::Cancelled`].

use std::future::Future;
use std::path::PathBuf;

use tracing::{debug, info};

use super::browser::{BrowserEngineConfig, PageDriver};
use super::config::SourceConfig;
use super::extract::EpisodeExtractor;
use crate::aggregate::Aggregator;
use crate::config::Settings;
use crate::error::{ScrapeError, ScrapeResult};
use crate::models::Episode;
use crate::progress::ProgressPublisher;
use crate::storage;

/// Why a harvest ended successfully.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// No "load more" control on the page.
    NoExpandControl,
    /// A click revealed no additional episodes.
    NoNewContent,
    /// `max_expansions` clicks were made.
    ExpansionLimit,
}

impl std::fmt::Display for StopReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NoExpandControl => write!(f, "no load-more control"),
            Self::NoNewContent => write!(f, "no new episodes after expanding"),
            Self::ExpansionLimit => write!(f, "expansion limit reached"),
        }
    }
}

/// Outcome of a successful harvest.
#[derive(Debug, Clone)]
pub struct Harvest {
    pub episodes: Vec<Episode>,
    /// Number of "load more" clicks made.
    pub expansions: u32,
    pub stop: StopReason,
}

pub struct PaginationController {
    source: SourceConfig,
    browser: BrowserEngineConfig,
    extractor: EpisodeExtractor,
    snapshot_path: PathBuf,
}

impl PaginationController {
    /// Validate the source URL and compile the selectors.
    pub fn new(settings: &Settings) -> ScrapeResult<Self> {
        url::Url::parse(&settings.source.url).map_err(|e| ScrapeError::Navigation {
            url: settings.source.url.clone(),
            message: format!("invalid URL: {}", e),
        })?;

        Ok(Self {
            extractor: EpisodeExtractor::new(&settings.source)?,
            source: settings.source.clone(),
            browser: settings.browser.clone(),
            snapshot_path: settings.snapshot_path.clone(),
        })
    }

    /// Harvest the listing, publishing a progress event after every step.
    ///
    /// Does not publish a terminal event; that belongs to the session.
    pub async fn run(
        &self,
        driver: &mut dyn PageDriver,
        publisher: &ProgressPublisher,
    ) -> ScrapeResult<Harvest> {
        until_closed(publisher, driver.navigate(&self.source.url)).await??;

        let mut aggregator = Aggregator::new();
        let mut expansions: u32 = 0;

        let stop = loop {
            until_closed(publisher, self.wait_for_episodes(driver)).await??;

            let html = driver.content().await?;
            let visible = self.extractor.extract(&html);

            if expansions > 0 && visible.len() <= aggregator.emitted() {
                break StopReason::NoNewContent;
            }

            let appended = aggregator.push(&visible);
            storage::write_snapshot(&self.snapshot_path, aggregator.episodes())?;
            publisher.progress(aggregator.episodes()).await?;
            info!(
                step = expansions,
                new = appended.len(),
                total = aggregator.emitted(),
                "Harvested episodes"
            );

            if self
                .source
                .max_expansions
                .is_some_and(|max| expansions >= max)
            {
                break StopReason::ExpansionLimit;
            }

            let load_more = &self.source.selectors.load_more;
            if !until_closed(publisher, driver.click_first(load_more)).await?? {
                break StopReason::NoExpandControl;
            }
            expansions += 1;
            debug!("Clicked load-more ({})", expansions);

            until_closed(publisher, tokio::time::sleep(self.browser.settle_interval())).await?;

            let count = driver.count(&self.source.selectors.episode).await?;
            if count <= aggregator.emitted() {
                debug!(count, "Element count did not grow after expanding");
                break StopReason::NoNewContent;
            }
        };

        info!(
            episodes = aggregator.emitted(),
            expansions,
            "Harvest finished: {}",
            stop
        );

        Ok(Harvest {
            episodes: aggregator.into_episodes(),
            expansions,
            stop,
        })
    }

    /// Poll until at least one episode element exists, bounded by the wait timeout.
    async fn wait_for_episodes(&self, driver: &mut dyn PageDriver) -> ScrapeResult<()> {
        let selector = &self.source.selectors.episode;
        let poll = async {
            loop {
                if driver.count(selector).await? > 0 {
                    return Ok::<(), ScrapeError>(());
                }
                tokio::time::sleep(self.browser.poll_interval()).await;
            }
        };

        match tokio::time::timeout(self.browser.wait_timeout(), poll).await {
            Ok(result) => result,
            Err(_) => Err(ScrapeError::SelectorTimeout {
                selector: selector.clone(),
                timeout_secs: self.browser.wait_timeout,
            }),
        }
    }
}

/// Run `fut` unless the observer disconnects first.
async fn until_closed<F: Future>(
    publisher: &ProgressPublisher,
    fut: F,
) -> ScrapeResult<F::Output> {
    tokio::select! {
        output = fut => Ok(output),
        _ = publisher.closed() => Err(ScrapeError::Cancelled),
    }
}
