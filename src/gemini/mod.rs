pub mod client;
pub mod prompt;
pub mod types;

use crate::feed::types::Briefing;
use anyhow::Result;
use client::GeminiClient;

/// Write the post for a briefing: prompt, generate, tidy.
pub async fn write_post(client: &GeminiClient, briefing: &Briefing, max_chars: usize) -> Result<String> {
    let prompt = prompt::build_prompt(briefing, max_chars);
    let raw = client.generate(&prompt).await?;
    let post = prompt::clean_post(&raw);
    if post.is_empty() {
        anyhow::bail!("Gemini returned an empty post");
    }
    Ok(post)
}
