pub mod arxiv;
pub mod hacker_news;
pub mod library;
pub mod market;
pub mod tech;
pub mod types;

use anyhow::Result;
use async_trait::async_trait;
use rand::rngs::StdRng;
use std::time::Duration;
use types::{Briefing, Channel};

#[async_trait]
pub trait IntelFeed: Send + Sync {
    fn channel(&self) -> Channel;
    async fn gather(&mut self, rng: &mut StdRng) -> Result<Briefing>;
}

/// Shared HTTP client for the content sources.
pub(crate) fn http_client(timeout_ms: u64) -> reqwest::Client {
    reqwest::Client::builder()
        .timeout(Duration::from_millis(timeout_ms))
        .user_agent(concat!("godfather/", env!("CARGO_PKG_VERSION")))
        .build()
        .expect("failed to build reqwest client")
}
