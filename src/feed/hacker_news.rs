use super::types::*;
use anyhow::{Context, Result};
use reqwest::Client;

pub struct HackerNews {
    client: Client,
    base_url: String,
}

/// True when the lowercased title contains any keyword as a substring.
pub fn title_matches(title: &str, keywords: &[String]) -> bool {
    let lower = title.to_lowercase();
    keywords
        .iter()
        .any(|k| !k.is_empty() && lower.contains(&k.to_lowercase()))
}

impl HackerNews {
    pub fn new(base_url: &str, timeout_ms: u64) -> Self {
        Self {
            client: super::http_client(timeout_ms),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub async fn top_story_ids(&self) -> Result<Vec<u64>> {
        let url = format!("{}/topstories.json", self.base_url);
        let resp = self.client.get(&url).send().await
            .context("hacker news topstories request failed")?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            anyhow::bail!("hacker news topstories ({}): {}", status, body);
        }

        resp.json().await.context("failed to parse topstories response")
    }

    pub async fn item(&self, id: u64) -> Result<HnItem> {
        let url = format!("{}/item/{}.json", self.base_url, id);
        let resp = self.client.get(&url).send().await
            .with_context(|| format!("hacker news item {} request failed", id))?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            anyhow::bail!("hacker news item {} ({}): {}", id, status, body);
        }

        resp.json().await
            .with_context(|| format!("failed to parse hacker news item {}", id))
    }

    /// Walk the first `limit` top stories in rank order and return the first
    /// whose title hits a keyword. Items that fail to load are skipped.
    pub async fn find_story(&self, keywords: &[String], limit: usize) -> Result<Option<Intel>> {
        let ids = self.top_story_ids().await?;

        for id in ids.into_iter().take(limit) {
            let item = match self.item(id).await {
                Ok(item) => item,
                Err(e) => {
                    tracing::debug!(id, error = %e, "skipping hacker news item");
                    continue;
                }
            };
            if let Some(title) = item.title {
                if title_matches(&title, keywords) {
                    return Ok(Some(Intel::new(title, "Hacker News")));
                }
            }
        }

        Ok(None)
    }
}
