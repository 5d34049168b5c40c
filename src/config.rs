use anyhow::{Context, Result};
use serde::Deserialize;
use std::io::{self, IsTerminal, Write};
use std::path::Path;

const ENV_FILE: &str = ".env";

#[derive(Debug, Deserialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub channels: ChannelsConfig,
    #[serde(default)]
    pub tech: TechConfig,
    #[serde(default)]
    pub science: ScienceConfig,
    #[serde(default)]
    pub mind: MindConfig,
    #[serde(default)]
    pub gemini: GeminiConfig,
    #[serde(default)]
    pub linkedin: LinkedInConfig,
    #[serde(default)]
    pub art: ArtConfig,
}

/// Relative weights used when picking the channel for a run.
#[derive(Debug, Deserialize, Clone)]
pub struct ChannelsConfig {
    #[serde(default = "default_tech_weight")]
    pub tech_weight: u32,
    #[serde(default = "default_science_weight")]
    pub science_weight: u32,
    #[serde(default = "default_mind_weight")]
    pub mind_weight: u32,
}

fn default_tech_weight() -> u32 { 40 }
fn default_science_weight() -> u32 { 40 }
fn default_mind_weight() -> u32 { 20 }

impl Default for ChannelsConfig {
    fn default() -> Self {
        Self {
            tech_weight: default_tech_weight(),
            science_weight: default_science_weight(),
            mind_weight: default_mind_weight(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct TechConfig {
    #[serde(default = "default_hn_base_url")]
    pub hn_base_url: String,
    #[serde(default = "default_top_stories")]
    pub top_stories: usize,
    #[serde(default = "default_keywords")]
    pub keywords: Vec<String>,
    #[serde(default = "default_ticker")]
    pub ticker: String,
    #[serde(default = "default_market_base_url")]
    pub market_base_url: String,
    #[serde(default = "default_fallback_title")]
    pub fallback_title: String,
    #[serde(default = "default_fallback_source")]
    pub fallback_source: String,
    #[serde(default = "default_request_timeout_ms")]
    pub request_timeout_ms: u64,
}

fn default_hn_base_url() -> String { "https://hacker-news.firebaseio.com/v0".to_string() }
fn default_top_stories() -> usize { 10 }
fn default_keywords() -> Vec<String> {
    ["ai", "gpu", "nvidia", "crypto", "startup"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}
fn default_ticker() -> String { "NVDA".to_string() }
fn default_market_base_url() -> String { "https://query1.finance.yahoo.com".to_string() }
fn default_fallback_title() -> String { "The Stagnation of Software".to_string() }
fn default_fallback_source() -> String { "Observation".to_string() }
fn default_request_timeout_ms() -> u64 { 10_000 }

impl Default for TechConfig {
    fn default() -> Self {
        Self {
            hn_base_url: default_hn_base_url(),
            top_stories: default_top_stories(),
            keywords: default_keywords(),
            ticker: default_ticker(),
            market_base_url: default_market_base_url(),
            fallback_title: default_fallback_title(),
            fallback_source: default_fallback_source(),
            request_timeout_ms: default_request_timeout_ms(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct ScienceConfig {
    #[serde(default = "default_arxiv_base_url")]
    pub arxiv_base_url: String,
    #[serde(default = "default_max_results")]
    pub max_results: u32,
    #[serde(default = "default_domains")]
    pub domains: Vec<ScienceDomain>,
    #[serde(default = "default_request_timeout_ms")]
    pub request_timeout_ms: u64,
}

/// An ArXiv category the science channel can draw from.
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct ScienceDomain {
    pub name: String,
    pub category: String,
}

fn default_arxiv_base_url() -> String { "http://export.arxiv.org/api/query".to_string() }
fn default_max_results() -> u32 { 5 }
fn default_domains() -> Vec<ScienceDomain> {
    [
        ("genetics", "q-bio.GN"),
        ("neuro", "q-bio.NC"),
        ("ai", "cs.AI"),
        ("ml", "cs.LG"),
        ("niche", "cs.CY"),
    ]
    .iter()
    .map(|(name, category)| ScienceDomain {
        name: name.to_string(),
        category: category.to_string(),
    })
    .collect()
}

impl Default for ScienceConfig {
    fn default() -> Self {
        Self {
            arxiv_base_url: default_arxiv_base_url(),
            max_results: default_max_results(),
            domains: default_domains(),
            request_timeout_ms: default_request_timeout_ms(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct MindConfig {
    #[serde(default = "default_topics")]
    pub topics: Vec<String>,
}

fn default_topics() -> Vec<String> {
    [
        "Jungian Shadow in AI",
        "Stoicism for Founders",
        "Vedantic Non-Dualism",
        "Nietzsche's Will to Power",
        "The Lacanian Mirror Stage",
        "Baudrillard's Hyperreality",
        "Camus and The Absurd",
        "Girard's Mimetic Desire",
        "The Psychology of Flow",
        "Biocentrism",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

impl Default for MindConfig {
    fn default() -> Self {
        Self { topics: default_topics() }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct GeminiConfig {
    #[serde(default = "default_gemini_base_url")]
    pub base_url: String,
    /// Candidate models, tried in order after any discovered model.
    #[serde(default = "default_models")]
    pub models: Vec<String>,
    #[serde(default = "default_true")]
    pub discover_models: bool,
    #[serde(default = "default_max_rounds")]
    pub max_rounds: u32,
    #[serde(default = "default_retry_backoff_ms")]
    pub retry_backoff_ms: u64,
    #[serde(default = "default_gemini_timeout_ms")]
    pub request_timeout_ms: u64,
    #[serde(default = "default_max_post_chars")]
    pub max_post_chars: usize,
}

fn default_gemini_base_url() -> String {
    "https://generativelanguage.googleapis.com/v1beta".to_string()
}
fn default_models() -> Vec<String> {
    ["gemini-1.5-flash", "gemini-1.5-pro", "gemini-pro"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}
fn default_true() -> bool { true }
fn default_max_rounds() -> u32 { 2 }
fn default_retry_backoff_ms() -> u64 { 5_000 }
fn default_gemini_timeout_ms() -> u64 { 60_000 }
fn default_max_post_chars() -> usize { 500 }

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            base_url: default_gemini_base_url(),
            models: default_models(),
            discover_models: true,
            max_rounds: default_max_rounds(),
            retry_backoff_ms: default_retry_backoff_ms(),
            request_timeout_ms: default_gemini_timeout_ms(),
            max_post_chars: default_max_post_chars(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct LinkedInConfig {
    #[serde(default = "default_linkedin_api_base")]
    pub api_base: String,
    #[serde(default = "default_media_title")]
    pub media_title: String,
    #[serde(default = "default_linkedin_timeout_ms")]
    pub request_timeout_ms: u64,
}

fn default_linkedin_api_base() -> String { "https://api.linkedin.com/v2".to_string() }
fn default_media_title() -> String { "Insight".to_string() }
fn default_linkedin_timeout_ms() -> u64 { 30_000 }

impl Default for LinkedInConfig {
    fn default() -> Self {
        Self {
            api_base: default_linkedin_api_base(),
            media_title: default_media_title(),
            request_timeout_ms: default_linkedin_timeout_ms(),
        }
    }
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum ArtStyle {
    #[default]
    Chart,
    Attractor,
    Auto,
}

impl std::str::FromStr for ArtStyle {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "chart" => Ok(ArtStyle::Chart),
            "attractor" => Ok(ArtStyle::Attractor),
            "auto" => Ok(ArtStyle::Auto),
            other => anyhow::bail!("unknown art style '{}' (expected chart, attractor or auto)", other),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct ArtConfig {
    #[serde(default)]
    pub style: ArtStyle,
    #[serde(default = "default_width")]
    pub width: u32,
    #[serde(default = "default_height")]
    pub height: u32,
    #[serde(default = "default_image_path")]
    pub image_path: String,
    #[serde(default = "default_attractor_iterations")]
    pub attractor_iterations: u32,
}

fn default_width() -> u32 { 1000 }
fn default_height() -> u32 { 500 }
fn default_image_path() -> String { "visual.png".to_string() }
fn default_attractor_iterations() -> u32 { 400_000 }

pub const MAX_ATTRACTOR_ITERATIONS: u32 = 50_000_000;

impl Default for ArtConfig {
    fn default() -> Self {
        Self {
            style: ArtStyle::default(),
            width: default_width(),
            height: default_height(),
            image_path: default_image_path(),
            attractor_iterations: default_attractor_iterations(),
        }
    }
}

impl Config {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let config: Config = toml::from_str(&content)
            .with_context(|| "Failed to parse config TOML")?;
        config.validate()?;
        Ok(config)
    }

    /// Load the config file if present, otherwise the built-in defaults.
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if path.exists() {
            Self::load(path)
        } else {
            tracing::info!(path = %path.display(), "config file not found, using defaults");
            Ok(Self::default())
        }
    }

    pub fn validate(&self) -> Result<()> {
        let c = &self.channels;
        if c.tech_weight == 0 && c.science_weight == 0 && c.mind_weight == 0 {
            anyhow::bail!("channel weights cannot all be zero");
        }
        if self.mind.topics.is_empty() {
            anyhow::bail!("mind.topics cannot be empty (it is the fallback channel)");
        }
        if self.science.domains.is_empty() {
            anyhow::bail!("science.domains cannot be empty");
        }
        if self.gemini.models.is_empty() && !self.gemini.discover_models {
            anyhow::bail!("gemini.models cannot be empty when discover_models is off");
        }
        if self.gemini.max_rounds == 0 {
            anyhow::bail!("gemini.max_rounds must be at least 1");
        }
        if self.art.width == 0 || self.art.height == 0 {
            anyhow::bail!("art.width and art.height must be non-zero");
        }
        if self.art.attractor_iterations == 0 || self.art.attractor_iterations > MAX_ATTRACTOR_ITERATIONS {
            anyhow::bail!(
                "art.attractor_iterations must be between 1 and {}",
                MAX_ATTRACTOR_ITERATIONS
            );
        }
        Ok(())
    }

    /// Load .env file into process environment. Real env vars take precedence.
    pub fn load_env_file() {
        let path = Path::new(ENV_FILE);
        let content = match std::fs::read_to_string(path) {
            Ok(c) => c,
            Err(_) => return,
        };
        // Strip BOM if present (common on Windows-created files)
        let content = content.strip_prefix('\u{feff}').unwrap_or(&content);
        for line in content.lines() {
            let line = line.trim().trim_matches('\r');
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            if let Some((key, value)) = line.split_once('=') {
                let key = key.trim();
                let value = value.trim().trim_matches('"').trim_matches('\'');
                if std::env::var(key).is_err() {
                    std::env::set_var(key, value);
                }
            }
        }
    }

    /// All Gemini keys: `GEMINI_API_KEY` first, then `GEMINI_API_KEYS`
    /// (comma-separated). Prompts for one when none are set.
    pub fn gemini_api_keys() -> Result<Vec<String>> {
        gemini_keys_from(
            std::env::var("GEMINI_API_KEY").ok(),
            std::env::var("GEMINI_API_KEYS").ok(),
            io::stdin().is_terminal(),
        )
    }

    pub fn linkedin_access_token() -> Result<String> {
        secret_or_prompt(
            std::env::var("LINKEDIN_ACCESS_TOKEN").ok(),
            "LINKEDIN_ACCESS_TOKEN",
            "LinkedIn Access Token",
            io::stdin().is_terminal(),
        )
    }

    /// Optional member id or URN. When unset the publisher asks LinkedIn.
    pub fn linkedin_user_id() -> Option<String> {
        user_id_from(std::env::var("LINKEDIN_USER_ID").ok())
    }
}

/// Combine the primary key with a comma-separated list, dropping blanks and
/// duplicates while keeping order.
pub fn merge_keys(primary: Option<&str>, extra: Option<&str>) -> Vec<String> {
    let mut keys: Vec<String> = Vec::new();
    let candidates = primary
        .into_iter()
        .chain(extra.into_iter().flat_map(|list| list.split(',')));
    for raw in candidates {
        let key = sanitize_key(raw);
        if !key.is_empty() && !keys.contains(&key) {
            keys.push(key);
        }
    }
    keys
}

fn gemini_keys_from(primary: Option<String>, extra: Option<String>, interactive: bool) -> Result<Vec<String>> {
    let keys = merge_keys(primary.as_deref(), extra.as_deref());
    if !keys.is_empty() {
        return Ok(keys);
    }
    let key = secret_or_prompt(None, "GEMINI_API_KEY", "Gemini API Key", interactive)?;
    Ok(vec![key])
}

fn user_id_from(raw: Option<String>) -> Option<String> {
    raw.map(|v| sanitize_key(&v)).filter(|v| !v.is_empty())
}

/// Use the value when it is set, otherwise ask on an interactive terminal
/// and save the answer to .env.
fn secret_or_prompt(value: Option<String>, var: &str, label: &str, interactive: bool) -> Result<String> {
    if let Some(value) = value.map(|v| sanitize_key(&v)).filter(|v| !v.is_empty()) {
        return Ok(value);
    }
    if !interactive {
        anyhow::bail!("{} is not set (export it or add it to {})", var, ENV_FILE);
    }
    let value = prompt(label)?;
    save_env_var(var, &value);
    Ok(value)
}

fn prompt(label: &str) -> Result<String> {
    print!("  {} > ", label);
    io::stdout().flush()?;
    let mut input = String::new();
    io::stdin().read_line(&mut input)?;
    let value = sanitize_key(&input);
    if value.is_empty() {
        anyhow::bail!("{} cannot be empty", label);
    }
    Ok(value)
}

/// Strip carriage returns, BOM, and other invisible chars from a key/path value.
fn sanitize_key(raw: &str) -> String {
    raw.replace(['\r', '\u{feff}', '\u{200b}'], "")
        .trim()
        .to_string()
}

/// Append a KEY=VALUE line to .env and set it in the current process.
fn save_env_var(key: &str, value: &str) {
    std::env::set_var(key, value);
    let path = Path::new(ENV_FILE);
    let mut contents = std::fs::read_to_string(path).unwrap_or_default();
    if !contents.is_empty() && !contents.ends_with('\n') {
        contents.push('\n');
    }
    contents.push_str(&format!("{}={}\n", key, value));
    if let Err(e) = std::fs::write(path, contents) {
        tracing::warn!(error = %e, "failed to save {} to {}", key, ENV_FILE);
    }
}
