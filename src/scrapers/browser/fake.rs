//! Simulated paginating source for tests.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Notify;

use super::{DriverLauncher, PageDriver};
use crate::error::{ScrapeError, ScrapeResult};

/// Behaviour of the simulated listing.
#[derive(Debug, Clone)]
pub(crate) struct FakeSite {
    /// Episodes the source can reveal in total.
    pub total: usize,
    /// Episodes visible initially and revealed per click.
    pub page_size: usize,
    /// Keep the "load more" button after everything is shown.
    pub sticky_button: bool,
    /// Clicks after this many reveal nothing.
    pub stall_after: Option<usize>,
    /// Episode elements never render.
    pub never_render: bool,
    pub fail_navigation: bool,
}

impl FakeSite {
    pub fn new(total: usize, page_size: usize) -> Self {
        Self {
            total,
            page_size,
            sticky_button: false,
            stall_after: None,
            never_render: false,
            fail_navigation: false,
        }
    }
}

/// Counters shared between a launcher, its drivers and the test.
#[derive(Debug, Default)]
pub(crate) struct FakeProbe {
    pub launches: AtomicUsize,
    pub clicks: AtomicUsize,
    pub closed: AtomicBool,
}

impl FakeProbe {
    pub fn closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }

    pub fn clicks(&self) -> usize {
        self.clicks.load(Ordering::SeqCst)
    }
}

pub(crate) struct FakeDriver {
    site: FakeSite,
    visible: usize,
    clicks: usize,
    probe: Arc<FakeProbe>,
    gate: Option<Arc<Notify>>,
}

impl FakeDriver {
    pub fn new(site: FakeSite, probe: Arc<FakeProbe>) -> Self {
        Self {
            site,
            visible: 0,
            clicks: 0,
            probe,
            gate: None,
        }
    }

    fn has_button(&self) -> bool {
        !self.site.never_render && (self.visible < self.site.total || self.site.sticky_button)
    }
}

/// Listing HTML for episodes `0..visible`.
pub(crate) fn render_listing(visible: usize, button: bool) -> String {
    let mut html = String::from("<html><body><main>");
    for i in 0..visible {
        html.push_str(&format!(
            r#"<article class="sc-episode-teaser">
                <h3 class="sc-episode-teaser-title"><a href="/episodes/{i}">Episode {i}</a></h3>
                <div class="sc-episode-teaser-description">Notes for episode {i}</div>
                <div class="sc-episode-teaser-time">Jan {day}, 2024 | {mins:02}:{secs:02}</div>
            </article>"#,
            i = i,
            day = i % 28 + 1,
            mins = 40 + i % 20,
            secs = i % 60,
        ));
    }
    if button {
        html.push_str(r#"<button class="button button-secondary">Load more</button>"#);
    }
    html.push_str("</main></body></html>");
    html
}

#[async_trait]
impl PageDriver for FakeDriver {
    async fn navigate(&mut self, url: &str) -> ScrapeResult<()> {
        if let Some(gate) = self.gate.take() {
            gate.notified().await;
        }
        if self.site.fail_navigation {
            return Err(ScrapeError::Navigation {
                url: url.to_string(),
                message: "net::ERR_NAME_NOT_RESOLVED".to_string(),
            });
        }
        if !self.site.never_render {
            self.visible = self.site.page_size.min(self.site.total);
        }
        Ok(())
    }

    async fn count(&mut self, _selector: &str) -> ScrapeResult<usize> {
        Ok(self.visible)
    }

    async fn content(&mut self) -> ScrapeResult<String> {
        Ok(render_listing(self.visible, self.has_button()))
    }

    async fn click_first(&mut self, _selector: &str) -> ScrapeResult<bool> {
        if !self.has_button() {
            return Ok(false);
        }
        self.clicks += 1;
        self.probe.clicks.fetch_add(1, Ordering::SeqCst);
        let stalled = self.site.stall_after.is_some_and(|n| self.clicks > n);
        if !stalled {
            self.visible = (self.visible + self.site.page_size).min(self.site.total);
        }
        Ok(true)
    }

    async fn close(&mut self) {
        self.probe.closed.store(true, Ordering::SeqCst);
    }
}

/// Launches a fresh [`FakeDriver`] per session.
pub(crate) struct FakeLauncher {
    pub site: FakeSite,
    pub probe: Arc<FakeProbe>,
    /// When set, navigation blocks until notified.
    pub gate: Option<Arc<Notify>>,
}

impl FakeLauncher {
    pub fn new(site: FakeSite) -> Self {
        Self {
            site,
            probe: Arc::new(FakeProbe::default()),
            gate: None,
        }
    }
}

#[async_trait]
impl DriverLauncher for FakeLauncher {
    async fn launch(&self) -> ScrapeResult<Box<dyn PageDriver>> {
        self.probe.launches.fetch_add(1, Ordering::SeqCst);
        let mut driver = FakeDriver::new(self.site.clone(), self.probe.clone());
        driver.gate = self.gate.clone();
        Ok(Box::new(driver))
    }
}
