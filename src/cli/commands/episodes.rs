//! List episodes from the snapshot.

use anyhow::Context;
use console::style;

use crate::config::Settings;
use crate::storage;

pub async fn cmd_episodes(settings: &Settings, limit: usize) -> anyhow::Result<()> {
    let episodes = storage::read_snapshot(&settings.snapshot_path)
        .with_context(|| format!("Failed to read {}", settings.snapshot_path.display()))?;

    if episodes.is_empty() {
        println!(
            "{} No episodes in {}",
            style("!").yellow(),
            settings.snapshot_path.display()
        );
        return Ok(());
    }

    let shown = if limit == 0 {
        episodes.len()
    } else {
        limit.min(episodes.len())
    };

    for episode in &episodes[..shown] {
        println!("{}", style(&episode.title).bold());
        println!(
            "  {} {}  {}",
            style("→").dim(),
            episode.date,
            style(&episode.duration).dim()
        );
    }

    println!(
        "\n{} {} of {} episodes",
        style("✓").green(),
        shown,
        episodes.len()
    );
    Ok(())
}
