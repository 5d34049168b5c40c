use crate::feed::types::{Briefing, Channel};

/// LinkedIn caps share commentary at 3000 characters.
pub const LINKEDIN_TEXT_LIMIT: usize = 3000;

/// Build the writing prompt for a briefing. Each channel gets its own persona.
pub fn build_prompt(briefing: &Briefing, max_chars: usize) -> String {
    let intel = &briefing.intel;
    match briefing.channel {
        Channel::Tech => format!(
            "Role: Cynical Tech Godfather.\n\
             Topic: \"{}\" from {}.\n\
             Context: Market is {}.\n\
             Task: Write a LinkedIn post (max {} chars). Connect news to power/money.\n",
            intel.title, intel.source, briefing.detail, max_chars,
        ),
        Channel::Mind => format!(
            "Role: Modern Philosopher.\n\
             Topic: \"{}\".\n\
             Task: Write a LinkedIn post (max {} chars). Apply this deep concept to modern work/life.\n\
             Tone: Mystical but actionable.\n",
            intel.title, max_chars,
        ),
        Channel::Science => format!(
            "Role: R&D Director.\n\
             Paper: \"{}\" (Source: {}).\n\
             Field: {}.\n\
             Task: Write a LinkedIn post (max {} chars).\n\
             - If Genetics: Discuss modifying the source code of life.\n\
             - If Neuro: Discuss the hardware of the mind.\n\
             - If AI/ML: Discuss the optimization of intelligence.\n\
             Tone: Visionary, slightly dangerous excitement.\n",
            intel.title, intel.source, briefing.detail.to_uppercase(), max_chars,
        ),
    }
}

/// Tidy model output for posting: drop code fences and wrapping quotes,
/// then cap at LinkedIn's limit on a char boundary.
pub fn clean_post(raw: &str) -> String {
    let mut text = raw.trim();

    if let Some(inner) = text.strip_prefix("```") {
        // Skip an optional language tag on the fence line.
        let inner = inner.split_once('\n').map_or(inner, |(_, rest)| rest);
        text = inner.strip_suffix("```").unwrap_or(inner).trim();
    }

    for (open, close) in [('"', '"'), ('\u{201c}', '\u{201d}')] {
        if text.len() > 1 && text.starts_with(open) && text.ends_with(close) {
            text = text[open.len_utf8()..text.len() - close.len_utf8()].trim();
        }
    }

    text.chars().take(LINKEDIN_TEXT_LIMIT).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feed::types::Intel;

    fn briefing(channel: Channel, title: &str, source: &str, detail: &str) -> Briefing {
        Briefing {
            channel,
            intel: Intel::new(title, source),
            detail: detail.to_string(),
        }
    }

    #[test]
    fn test_tech_prompt_includes_market() {
        let b = briefing(Channel::Tech, "GPU prices collapse", "Hacker News", "NVDA DOWN 2.10%");
        let p = build_prompt(&b, 500);
        assert!(p.starts_with("Role: Cynical Tech Godfather."));
        assert!(p.contains("Topic: \"GPU prices collapse\" from Hacker News."));
        assert!(p.contains("Context: Market is NVDA DOWN 2.10%."));
        assert!(p.contains("(max 500 chars)"));
    }

    #[test]
    fn test_mind_prompt() {
        let b = briefing(Channel::Mind, "Camus and The Absurd", "Internal Library", "Concept");
        let p = build_prompt(&b, 300);
        assert!(p.contains("Modern Philosopher"));
        assert!(p.contains("\"Camus and The Absurd\""));
        assert!(p.contains("(max 300 chars)"));
        assert!(!p.contains("Internal Library"));
    }

    #[test]
    fn test_science_prompt_uppercases_field() {
        let b = briefing(Channel::Science, "Neural Codes", "ArXiv (NEURO)", "neuro");
        let p = build_prompt(&b, 500);
        assert!(p.contains("Role: R&D Director."));
        assert!(p.contains("Field: NEURO."));
        assert!(p.contains("(Source: ArXiv (NEURO))"));
    }

    #[test]
    fn test_clean_post_strips_quotes_and_fences() {
        assert_eq!(clean_post("  \"Power is leverage.\"  "), "Power is leverage.");
        assert_eq!(clean_post("```markdown\nBuild.\n```"), "Build.");
        assert_eq!(clean_post("\u{201c}Flow.\u{201d}"), "Flow.");
    }

    #[test]
    fn test_clean_post_keeps_inner_quotes() {
        assert_eq!(clean_post("He said \"ship it\" today"), "He said \"ship it\" today");
    }

    #[test]
    fn test_clean_post_caps_length_on_char_boundary() {
        let long = "é".repeat(LINKEDIN_TEXT_LIMIT + 10);
        let cleaned = clean_post(&long);
        assert_eq!(cleaned.chars().count(), LINKEDIN_TEXT_LIMIT);
    }
}
