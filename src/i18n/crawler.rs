//! Crawler detection by User-Agent substring.
//!
//! Search-engine, social-preview and AI fetchers are never redirected: they
//! get the default locale's structure so every URL they index stays stable.

use regex::{Regex, RegexBuilder};
use std::sync::OnceLock;

/// Known automated-agent identity tokens, matched case-insensitively as
/// substrings of the User-Agent. Changing this list is a deploy, not a
/// runtime setting.
pub const CRAWLER_TOKENS: &[&str] = &[
    // Search engines
    "Googlebot",
    "Google-InspectionTool",
    "Storebot-Google",
    "AdsBot-Google",
    "Mediapartners-Google",
    "bingbot",
    "BingPreview",
    "msnbot",
    "Slurp",
    "DuckDuckBot",
    "Baiduspider",
    "YandexBot",
    "Sogou web spider",
    "Exabot",
    "SeznamBot",
    "Applebot",
    "PetalBot",
    "Yeti",
    // Social previews
    "facebookexternalhit",
    "Facebot",
    "Twitterbot",
    "LinkedInBot",
    "Slackbot",
    "Discordbot",
    "TelegramBot",
    "WhatsApp",
    "Pinterestbot",
    "redditbot",
    "Embedly",
    "SkypeUriPreview",
    // AI content fetchers
    "GPTBot",
    "ChatGPT-User",
    "OAI-SearchBot",
    "ClaudeBot",
    "Claude-Web",
    "anthropic-ai",
    "PerplexityBot",
    "Perplexity-User",
    "Google-Extended",
    "CCBot",
    "Bytespider",
    "Amazonbot",
    "cohere-ai",
    "YouBot",
    "Diffbot",
    // SEO tools
    "AhrefsBot",
    "SemrushBot",
    "MJ12bot",
    "DotBot",
    "rogerbot",
    "Screaming Frog",
];

static CRAWLER_REGEX: OnceLock<Regex> = OnceLock::new();

fn crawler_regex() -> &'static Regex {
    CRAWLER_REGEX.get_or_init(|| {
        let pattern = CRAWLER_TOKENS
            .iter()
            .map(|token| regex::escape(token))
            .collect::<Vec<_>>()
            .join("|");

        RegexBuilder::new(&pattern)
            .case_insensitive(true)
            .build()
            .expect("crawler tokens are escaped literals")
    })
}

/// Check whether a User-Agent belongs to a known crawler.
///
/// Empty and unmatched strings are not crawlers.
pub fn is_crawler(user_agent: &str) -> bool {
    !user_agent.trim().is_empty() && crawler_regex().is_match(user_agent)
}
