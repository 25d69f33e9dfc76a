//! Episode extraction from rendered listing HTML.

use std::sync::LazyLock;

use regex::Regex;
use scraper::{ElementRef, Html, Selector};

use super::config::SourceConfig;
use crate::error::{ScrapeError, ScrapeResult};
use crate::models::Episode;

/// `HH:MM:SS` is tried before `MM:SS` so the longer form wins.
static DURATION_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\d{2}:\d{2}:\d{2}|\d{2}:\d{2}").expect("valid duration regex")
});

/// Compiled selectors for one listing layout.
#[derive(Debug, Clone)]
pub struct EpisodeExtractor {
    episode: Selector,
    title: Selector,
    description: Selector,
    time: Selector,
    delimiter: String,
}

impl EpisodeExtractor {
    pub fn new(config: &SourceConfig) -> ScrapeResult<Self> {
        let selectors = &config.selectors;
        Ok(Self {
            episode: parse_selector(&selectors.episode)?,
            title: parse_selector(&selectors.title)?,
            description: parse_selector(&selectors.description)?,
            time: parse_selector(&selectors.time)?,
            delimiter: config.delimiter.clone(),
        })
    }

    /// Extract every episode element on the page, in document order.
    pub fn extract(&self, html: &str) -> Vec<Episode> {
        let document = Html::parse_document(html);
        document
            .select(&self.episode)
            .map(|element| self.extract_one(element))
            .collect()
    }

    fn extract_one(&self, element: ElementRef<'_>) -> Episode {
        let title = first_text(element, &self.title);
        let description = first_text(element, &self.description);
        let time_text = first_text(element, &self.time).unwrap_or_default();
        let (date, duration) = split_time_text(&time_text, &self.delimiter);
        Episode::from_parts(title, description, date, duration)
    }
}

fn parse_selector(selector: &str) -> ScrapeResult<Selector> {
    Selector::parse(selector).map_err(|e| ScrapeError::InvalidSelector {
        selector: selector.to_string(),
        message: e.to_string(),
    })
}

/// Whitespace-normalized text of the first match under `element`.
fn first_text(element: ElementRef<'_>, selector: &Selector) -> Option<String> {
    element.select(selector).next().map(|el| {
        el.text()
            .flat_map(str::split_whitespace)
            .collect::<Vec<_>>()
            .join(" ")
    })
}

/// Split combined time text such as `"Jan 1, 2024 | 01:23:45"` into date and
/// duration.
///
/// The date is the text before the first delimiter. The duration is the first
/// time pattern anywhere after it, so extra segments like `"Bonus"` are
/// skipped.
pub fn split_time_text(text: &str, delimiter: &str) -> (Option<String>, Option<String>) {
    let (date_part, rest) = match text.split_once(delimiter) {
        Some((date, rest)) => (date, Some(rest)),
        None => (text, None),
    };

    let date = Some(date_part.trim().to_string()).filter(|d| !d.is_empty());
    let duration = rest
        .and_then(|r| DURATION_PATTERN.find(r))
        .map(|m| m.as_str().to_string());

    (date, duration)
}
