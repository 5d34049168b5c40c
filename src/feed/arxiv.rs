use super::types::*;
use super::IntelFeed;
use crate::config::{ScienceConfig, ScienceDomain};
use anyhow::{Context, Result};
use async_trait::async_trait;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use regex::Regex;
use reqwest::Client;
use std::sync::LazyLock;

static ENTRY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<entry\b[^>]*>(.*?)</entry>").expect("valid entry regex"));
static TITLE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<title\b[^>]*>(.*?)</title>").expect("valid title regex"));
static CHAR_REF_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"&#(?:[xX]([0-9a-fA-F]+)|([0-9]+));").expect("valid char ref regex"));

/// Universal science: a recent ArXiv paper from a randomly chosen domain.
pub struct ScienceFeed {
    client: Client,
    base_url: String,
    max_results: u32,
    domains: Vec<ScienceDomain>,
}

/// Extract entry titles from an Atom feed, whitespace collapsed and
/// entities unescaped. The feed's own `<title>` is outside any entry.
pub fn parse_entry_titles(atom: &str) -> Vec<String> {
    ENTRY_RE
        .captures_iter(atom)
        .filter_map(|entry| {
            let body = entry.get(1)?.as_str();
            let raw = TITLE_RE.captures(body)?.get(1)?.as_str();
            let title = clean_title(raw);
            (!title.is_empty()).then_some(title)
        })
        .collect()
}

fn clean_title(raw: &str) -> String {
    let collapsed = raw.split_whitespace().collect::<Vec<_>>().join(" ");
    unescape_xml(&collapsed)
}

/// `&#945;` and `&#x3B1;` to their characters. Invalid code points are left as-is.
fn decode_char_refs(s: &str) -> String {
    CHAR_REF_RE
        .replace_all(s, |caps: &regex::Captures| {
            let code = match (caps.get(1), caps.get(2)) {
                (Some(hex), _) => u32::from_str_radix(hex.as_str(), 16).ok(),
                (None, Some(dec)) => dec.as_str().parse::<u32>().ok(),
                _ => None,
            };
            code.and_then(char::from_u32)
                .map(String::from)
                .unwrap_or_else(|| caps[0].to_string())
        })
        .into_owned()
}

fn unescape_xml(s: &str) -> String {
    decode_char_refs(s)
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&apos;", "'")
        .replace("&amp;", "&")
}

impl ScienceFeed {
    pub fn new(config: &ScienceConfig) -> Self {
        Self {
            client: super::http_client(config.request_timeout_ms),
            base_url: config.arxiv_base_url.clone(),
            max_results: config.max_results,
            domains: config.domains.clone(),
        }
    }

    /// Latest paper titles for an ArXiv category, newest first.
    pub async fn latest_titles(&self, category: &str) -> Result<Vec<String>> {
        let search = format!("cat:{}", category);
        let max_results = self.max_results.to_string();
        let resp = self.client
            .get(&self.base_url)
            .query(&[
                ("search_query", search.as_str()),
                ("start", "0"),
                ("max_results", max_results.as_str()),
                ("sortBy", "submittedDate"),
                ("sortOrder", "descending"),
            ])
            .send()
            .await
            .context("arxiv request failed")?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            anyhow::bail!("arxiv {} ({}): {}", category, status, body);
        }

        let body = resp.text().await.context("failed to read arxiv response")?;
        Ok(parse_entry_titles(&body))
    }
}

#[async_trait]
impl IntelFeed for ScienceFeed {
    fn channel(&self) -> Channel {
        Channel::Science
    }

    async fn gather(&mut self, rng: &mut StdRng) -> Result<Briefing> {
        let domain = self
            .domains
            .choose(rng)
            .cloned()
            .ok_or_else(|| anyhow::anyhow!("no science domains configured"))?;
        println!("   -> Domain Selected: {}", domain.name.to_uppercase());

        let titles = self.latest_titles(&domain.category).await?;
        let title = titles
            .choose(rng)
            .cloned()
            .ok_or_else(|| anyhow::anyhow!("arxiv returned no entries for {}", domain.category))?;

        Ok(Briefing {
            channel: Channel::Science,
            intel: Intel::new(title, format!("ArXiv ({})", domain.name.to_uppercase())),
            detail: domain.name,
        })
    }
}
