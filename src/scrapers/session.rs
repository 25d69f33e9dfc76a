//! One scrape session: launch a driver, harvest, release the driver, report.

use tracing::{info, warn};

use super::browser::DriverLauncher;
use super::pagination::{Harvest, PaginationController};
use crate::config::Settings;
use crate::error::ScrapeResult;
use crate::progress::ProgressPublisher;

/// Run a full session and emit exactly one terminal event.
///
/// The driver is closed on every path out of the controller. A cancelled
/// session emits nothing further since the observer is gone.
pub async fn run_session(
    settings: &Settings,
    launcher: &dyn DriverLauncher,
    publisher: ProgressPublisher,
) -> ScrapeResult<Harvest> {
    let outcome = harvest(settings, launcher, &publisher).await;

    match &outcome {
        Ok(harvest) => {
            info!(
                episodes = harvest.episodes.len(),
                "Scrape complete ({})", harvest.stop
            );
            publisher.complete().await;
        }
        Err(e) if e.is_cancelled() => {
            info!("Observer disconnected, scrape stopped");
        }
        Err(e) => {
            warn!("Scrape failed: {}", e);
            publisher.fail(e.to_string()).await;
        }
    }

    outcome
}

async fn harvest(
    settings: &Settings,
    launcher: &dyn DriverLauncher,
    publisher: &ProgressPublisher,
) -> ScrapeResult<Harvest> {
    let controller = PaginationController::new(settings)?;
    let mut driver = launcher.launch().await?;
    let result = controller.run(driver.as_mut(), publisher).await;
    driver.close().await;
    result
}
