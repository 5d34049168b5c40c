use anyhow::Result;
use clap::Parser;
use godfather::config::{ArtStyle, Config};
use godfather::feed::types::Channel;
use godfather::linkedin::auth::LinkedInAuth;
use godfather::linkedin::rest::LinkedInRest;
use godfather::pipeline::{Pipeline, Publisher, RunOptions};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

/// Fetch a topic, write a post about it, paint a picture, publish to LinkedIn.
#[derive(Debug, Parser)]
#[command(name = "godfather", version)]
struct Cli {
    /// Config file (defaults are used when it does not exist)
    #[arg(long, default_value = "config.toml")]
    config: PathBuf,

    /// Generate the post and image but do not publish
    #[arg(long)]
    dry_run: bool,

    /// Force a channel instead of the weighted draw (tech, science, mind)
    #[arg(long)]
    channel: Option<Channel>,

    /// Override the configured art style (chart, attractor, auto)
    #[arg(long)]
    style: Option<ArtStyle>,

    /// Seed for channel, topic and art randomness
    #[arg(long)]
    seed: Option<u64>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("godfather=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = Config::load_or_default(&cli.config)?;

    // Load saved keys from .env (real env vars take precedence)
    Config::load_env_file();

    println!();
    println!("  Godfather v{}", env!("CARGO_PKG_VERSION"));
    println!("  ==============");
    println!();
    if cli.dry_run {
        println!("  ** DRY RUN MODE ** (post is printed, not published)");
        println!();
    }

    let gemini_keys = Config::gemini_api_keys()?;
    tracing::debug!(keys = gemini_keys.len(), "Gemini keys loaded");

    let publisher = if cli.dry_run {
        None
    } else {
        let auth = Arc::new(LinkedInAuth::new(Config::linkedin_access_token()?));
        let rest = LinkedInRest::new(auth, &config.linkedin)?;
        Some(Publisher::new(rest, Config::linkedin_user_id()))
    };

    let mut pipeline = Pipeline::new(&config, gemini_keys, publisher)?;
    let opts = RunOptions {
        dry_run: cli.dry_run,
        channel: cli.channel,
        style: cli.style,
        seed: cli.seed,
    };

    let report = pipeline.run(&opts).await?;

    println!("  Image:   {} ({:?})", report.image_path.display(), report.style);
    if report.fell_back() {
        println!("  Note:    {} feed failed, used {}", report.requested, report.briefing.channel);
    }
    match &report.published {
        Some(post) => {
            println!(
                "  Published as {} (post {})",
                post.author,
                post.post_id.as_deref().unwrap_or("id unavailable")
            );
            println!();
            println!("  GODFATHER HAS SPOKEN.");
        }
        None => println!("  Done (dry run)."),
    }
    tracing::debug!(started_at = %report.started_at, "run complete");
    Ok(())
}
