use crate::config::{ArtStyle, ChannelsConfig, Config};
use crate::feed::arxiv::ScienceFeed;
use crate::feed::library::MindFeed;
use crate::feed::tech::TechFeed;
use crate::feed::types::{Briefing, Channel};
use crate::feed::IntelFeed;
use crate::gemini::{self, client::GeminiClient};
use crate::linkedin::rest::LinkedInRest;
use crate::linkedin::types::PublishedPost;
use crate::render::{Artist, Artwork};
use anyhow::Result;
use chrono::{DateTime, Utc};
use rand::distributions::{Distribution, WeightedIndex};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::path::PathBuf;

/// Per-run switches, usually from the command line.
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    pub dry_run: bool,
    pub channel: Option<Channel>,
    pub style: Option<ArtStyle>,
    pub seed: Option<u64>,
}

#[derive(Debug, Clone)]
pub struct RunReport {
    pub started_at: DateTime<Utc>,
    pub requested: Channel,
    pub briefing: Briefing,
    pub style: ArtStyle,
    pub image_path: PathBuf,
    pub post: String,
    pub published: Option<PublishedPost>,
}

impl RunReport {
    /// True when the requested channel failed and Mind stood in.
    pub fn fell_back(&self) -> bool {
        self.requested != self.briefing.channel
    }
}

/// LinkedIn client plus the optional preconfigured author.
pub struct Publisher {
    rest: LinkedInRest,
    author: Option<String>,
}

impl Publisher {
    pub fn new(rest: LinkedInRest, author: Option<String>) -> Self {
        Self { rest, author }
    }
}

/// Weighted channel draw.
pub fn pick_channel(weights: &ChannelsConfig, rng: &mut StdRng) -> Result<Channel> {
    let w = [weights.tech_weight, weights.science_weight, weights.mind_weight];
    let dist = WeightedIndex::new(w)
        .map_err(|e| anyhow::anyhow!("invalid channel weights {:?}: {}", w, e))?;
    Ok(Channel::ALL[dist.sample(rng)])
}

pub struct Pipeline {
    channels: ChannelsConfig,
    max_post_chars: usize,
    feeds: Vec<Box<dyn IntelFeed>>,
    artist: Artist,
    gemini: GeminiClient,
    publisher: Option<Publisher>,
}

impl Pipeline {
    pub fn new(config: &Config, gemini_keys: Vec<String>, publisher: Option<Publisher>) -> Result<Self> {
        config.validate()?;
        let feeds: Vec<Box<dyn IntelFeed>> = vec![
            Box::new(TechFeed::new(&config.tech)),
            Box::new(ScienceFeed::new(&config.science)),
            Box::new(MindFeed::new(config.mind.topics.clone())),
        ];
        Ok(Self {
            channels: config.channels.clone(),
            max_post_chars: config.gemini.max_post_chars,
            feeds,
            artist: Artist::new(config.art.clone()),
            gemini: GeminiClient::new(&config.gemini, gemini_keys)?,
            publisher,
        })
    }

    async fn gather_from(&mut self, channel: Channel, rng: &mut StdRng) -> Result<Briefing> {
        let feed = self
            .feeds
            .iter_mut()
            .find(|f| f.channel() == channel)
            .ok_or_else(|| anyhow::anyhow!("no feed registered for {}", channel))?;
        feed.gather(rng).await
    }

    /// Gather a briefing for `channel`, falling back to Mind on failure.
    pub async fn gather(&mut self, channel: Channel, rng: &mut StdRng) -> Result<Briefing> {
        match self.gather_from(channel, rng).await {
            Ok(briefing) => Ok(briefing),
            Err(e) if channel != Channel::Mind => {
                tracing::warn!(%channel, error = %e, "feed failed, falling back to mind");
                println!("  {} feed failed, switching to MIND", channel.as_str().to_uppercase());
                self.gather_from(Channel::Mind, rng).await
            }
            Err(e) => Err(e),
        }
    }

    pub async fn run(&mut self, opts: &RunOptions) -> Result<RunReport> {
        let started_at = Utc::now();
        let mut rng = match opts.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        let requested = match opts.channel {
            Some(c) => c,
            None => pick_channel(&self.channels, &mut rng)?,
        };
        println!("  Channel: {}", requested.as_str().to_uppercase());
        let briefing = self.gather(requested, &mut rng).await?;
        println!("  Topic:   \"{}\" ({})", briefing.intel.title, briefing.intel.source);
        tracing::info!(
            channel = %briefing.channel,
            title = %briefing.intel.title,
            source = %briefing.intel.source,
            detail = %briefing.detail,
            "briefing ready"
        );

        println!("  Artist:  painting...");
        let Artwork { style, path: image_path, png } = self.artist.paint_to_file(&briefing, opts.style, &mut rng)?;

        println!("  Brain:   thinking...");
        let post = gemini::write_post(&self.gemini, &briefing, self.max_post_chars).await?;

        let published = if opts.dry_run {
            println!();
            println!("  ** DRY RUN ** (nothing published)");
            println!();
            println!("{}", post);
            println!();
            None
        } else {
            let publisher = self
                .publisher
                .as_ref()
                .ok_or_else(|| anyhow::anyhow!("no LinkedIn publisher configured"))?;
            println!("  Publisher: uploading...");
            let published = publisher
                .rest
                .publish(publisher.author.as_deref(), &post, png)
                .await?;
            tracing::info!(author = %published.author, asset = %published.asset, post = ?published.post_id, "post published");
            Some(published)
        };

        Ok(RunReport {
            started_at,
            requested,
            briefing,
            style,
            image_path,
            post,
            published,
        })
    }
}
