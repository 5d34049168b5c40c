use serde::Deserialize;
use std::fmt;

/// Normalized internal types shared by every source (provider-agnostic).

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Channel {
    Tech,
    Science,
    Mind,
}

impl Channel {
    pub const ALL: [Channel; 3] = [Channel::Tech, Channel::Science, Channel::Mind];

    pub fn as_str(&self) -> &'static str {
        match self {
            Channel::Tech => "tech",
            Channel::Science => "science",
            Channel::Mind => "mind",
        }
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Channel {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "tech" => Ok(Channel::Tech),
            "science" => Ok(Channel::Science),
            "mind" => Ok(Channel::Mind),
            other => anyhow::bail!("unknown channel '{}' (expected tech, science or mind)", other),
        }
    }
}

/// A topic worth writing about, with where it came from.
#[derive(Debug, Clone, PartialEq)]
pub struct Intel {
    pub title: String,
    pub source: String,
}

impl Intel {
    pub fn new(title: impl Into<String>, source: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            source: source.into(),
        }
    }
}

/// Everything downstream stages need: the topic plus the channel's sub-mode
/// (market line for tech, domain name for science, "Concept" for mind).
#[derive(Debug, Clone, PartialEq)]
pub struct Briefing {
    pub channel: Channel,
    pub intel: Intel,
    pub detail: String,
}

/// Hacker News item (only the fields we read).
#[derive(Debug, Deserialize)]
pub struct HnItem {
    pub id: u64,
    #[serde(default)]
    pub title: Option<String>,
}

/// Yahoo chart API v8 response.
#[derive(Debug, Deserialize)]
pub struct ChartResponse {
    pub chart: ChartBody,
}

#[derive(Debug, Deserialize)]
pub struct ChartBody {
    #[serde(default)]
    pub result: Option<Vec<ChartResult>>,
}

#[derive(Debug, Deserialize)]
pub struct ChartResult {
    pub indicators: ChartIndicators,
}

#[derive(Debug, Deserialize)]
pub struct ChartIndicators {
    #[serde(default)]
    pub quote: Vec<ChartQuote>,
}

/// Series can contain nulls for sessions without trades.
#[derive(Debug, Deserialize)]
pub struct ChartQuote {
    #[serde(default)]
    pub open: Vec<Option<f64>>,
    #[serde(default)]
    pub close: Vec<Option<f64>>,
}
