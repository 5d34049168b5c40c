use super::types::*;
use super::IntelFeed;
use anyhow::Result;
use async_trait::async_trait;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;

pub const SOURCE: &str = "Internal Library";
pub const DETAIL: &str = "Concept";

/// Philosophy & psychology topics from a static list. No network.
pub struct MindFeed {
    topics: Vec<String>,
}

impl MindFeed {
    pub fn new(topics: Vec<String>) -> Self {
        Self { topics }
    }

    pub fn pick(&self, rng: &mut StdRng) -> Result<Briefing> {
        let topic = self
            .topics
            .choose(rng)
            .ok_or_else(|| anyhow::anyhow!("topic library is empty"))?;
        Ok(Briefing {
            channel: Channel::Mind,
            intel: Intel::new(topic, SOURCE),
            detail: DETAIL.to_string(),
        })
    }
}

#[async_trait]
impl IntelFeed for MindFeed {
    fn channel(&self) -> Channel {
        Channel::Mind
    }

    async fn gather(&mut self, rng: &mut StdRng) -> Result<Briefing> {
        self.pick(rng)
    }
}
