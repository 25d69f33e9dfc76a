//! Foreground scrape command.

use std::time::Duration;

use console::style;
use indicatif::{ProgressBar, ProgressStyle};

use crate::config::Settings;
use crate::progress::{self, ProgressEvent};
use crate::scrapers::{run_session, ChromiumLauncher};

/// Run one scrape session, reporting progress on a spinner.
pub async fn cmd_scrape(settings: &Settings) -> anyhow::Result<()> {
    println!(
        "{} Harvesting episodes from {}",
        style("→").cyan(),
        settings.source.url
    );

    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} [{elapsed_precise}] {msg}")?,
    );
    pb.enable_steady_tick(Duration::from_millis(100));
    pb.set_message("Loading listing...");

    let (publisher, mut rx) = progress::channel(16);
    let launcher = ChromiumLauncher::new(settings.browser.clone());
    let session = run_session(settings, &launcher, publisher);

    let watcher = async {
        while let Some(event) = rx.recv().await {
            match event {
                ProgressEvent::Progress { episodes } => {
                    pb.set_message(format!("{} episodes collected", episodes.len()));
                }
                ProgressEvent::Complete | ProgressEvent::Error { .. } => break,
            }
        }
    };

    let (outcome, ()) = tokio::join!(session, watcher);
    pb.finish_and_clear();

    match outcome {
        Ok(harvest) => {
            println!(
                "{} {} episodes saved to {} ({})",
                style("✓").green(),
                harvest.episodes.len(),
                settings.snapshot_path.display(),
                harvest.stop
            );
            Ok(())
        }
        Err(e) => {
            eprintln!("{} Scrape failed: {}", style("✗").red(), e);
            Err(e.into())
        }
    }
}
