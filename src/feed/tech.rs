use super::hacker_news::HackerNews;
use super::market::MarketPulse;
use super::types::*;
use super::IntelFeed;
use crate::config::TechConfig;
use anyhow::Result;
use async_trait::async_trait;
use rand::rngs::StdRng;

/// Tech & markets: a keyword-matching Hacker News story plus the ticker's
/// daily move. Falls back to a stock headline instead of failing.
pub struct TechFeed {
    news: HackerNews,
    market: MarketPulse,
    config: TechConfig,
}

impl TechFeed {
    pub fn new(config: &TechConfig) -> Self {
        Self {
            news: HackerNews::new(&config.hn_base_url, config.request_timeout_ms),
            market: MarketPulse::new(&config.market_base_url, config.request_timeout_ms),
            config: config.clone(),
        }
    }

    fn fallback(&self) -> Intel {
        Intel::new(&self.config.fallback_title, &self.config.fallback_source)
    }
}

#[async_trait]
impl IntelFeed for TechFeed {
    fn channel(&self) -> Channel {
        Channel::Tech
    }

    async fn gather(&mut self, _rng: &mut StdRng) -> Result<Briefing> {
        let intel = match self.news.find_story(&self.config.keywords, self.config.top_stories).await {
            Ok(Some(intel)) => intel,
            Ok(None) => {
                tracing::info!("no keyword match in top stories, using fallback headline");
                self.fallback()
            }
            Err(e) => {
                tracing::warn!(error = %e, "hacker news fetch failed");
                self.fallback()
            }
        };

        let detail = self.market.market_line(&self.config.ticker).await;

        Ok(Briefing {
            channel: Channel::Tech,
            intel,
            detail,
        })
    }
}
