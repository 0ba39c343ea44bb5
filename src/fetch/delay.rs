// src/fetch/delay.rs
use std::time::Duration;

/// Pause between page requests. Injected so tests can run without real sleeps.
#[async_trait::async_trait]
pub trait DelayPolicy: Send + Sync {
    /// Called after page `completed_pages` succeeded and another page follows.
    async fn wait(&self, completed_pages: usize);
    fn name(&self) -> &'static str;
}

/// Fixed courtesy delay against the per-minute rate limit. Not adaptive.
#[derive(Clone, Copy, Debug)]
pub struct FixedDelay(pub Duration);

impl Default for FixedDelay {
    fn default() -> Self {
        Self(crate::config::DEFAULT_INTER_PAGE_DELAY)
    }
}

#[async_trait::async_trait]
impl DelayPolicy for FixedDelay {
    async fn wait(&self, completed_pages: usize) {
        if self.0.is_zero() {
            return;
        }
        tracing::debug!(
            target: "fetch",
            completed_pages,
            delay_ms = self.0.as_millis() as u64,
            "waiting before next page"
        );
        tokio::time::sleep(self.0).await;
    }

    fn name(&self) -> &'static str {
        "fixed"
    }
}

#[derive(Clone, Copy, Debug, Default)]
pub struct NoDelay;

#[async_trait::async_trait]
impl DelayPolicy for NoDelay {
    async fn wait(&self, _completed_pages: usize) {}

    fn name(&self) -> &'static str {
        "none"
    }
}
