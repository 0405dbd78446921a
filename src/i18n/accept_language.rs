//! Accept-Language parsing.
//!
//! Turns the raw language-negotiation header into an ordered preference
//! list. The parser never fails: blank entries are skipped and entries with
//! an unusable weight are kept at weight 0 so they sort last.

use crate::i18n::Locale;

/// One entry of a parsed Accept-Language header.
#[derive(Debug, Clone, PartialEq)]
pub struct LanguagePreference {
    /// Language tag as written by the client, trimmed (e.g. "de-AT")
    pub tag: String,

    /// Quality weight in `[0, 1]`
    pub weight: f32,
}

impl LanguagePreference {
    /// The supported locale this entry asks for, if any.
    pub fn locale(&self) -> Option<Locale> {
        Locale::from_language_tag(&self.tag)
    }
}

/// Parse an Accept-Language header value.
///
/// The result is sorted by descending weight. Entries with equal weight
/// keep the order they had in the header.
///
/// # Example
/// ```
/// use locale_router::i18n::parse_accept_language;
///
/// let prefs = parse_accept_language("de;q=0.5,en;q=0.9,fr;q=0.7");
/// let tags: Vec<&str> = prefs.iter().map(|p| p.tag.as_str()).collect();
/// assert_eq!(tags, ["en", "fr", "de"]);
/// ```
pub fn parse_accept_language(header: &str) -> Vec<LanguagePreference> {
    let mut preferences: Vec<LanguagePreference> =
        header.split(',').filter_map(parse_entry).collect();

    // `sort_by` is stable, so equal weights keep header order.
    preferences.sort_by(|a, b| b.weight.total_cmp(&a.weight));
    preferences
}

/// First supported locale in preference order.
pub fn preferred_locale(preferences: &[LanguagePreference]) -> Option<Locale> {
    preferences.iter().find_map(LanguagePreference::locale)
}

fn parse_entry(entry: &str) -> Option<LanguagePreference> {
    let mut parts = entry.split(';');
    let tag = parts.next()?.trim();
    if tag.is_empty() {
        return None;
    }

    let mut weight = 1.0;
    for param in parts {
        let Some((key, value)) = param.split_once('=') else {
            continue;
        };
        if key.trim().eq_ignore_ascii_case("q") {
            weight = parse_weight(value);
        }
    }

    Some(LanguagePreference {
        tag: tag.to_string(),
        weight,
    })
}

/// Weight of a `q=` parameter; anything non-numeric or outside `[0, 1]`
/// counts as 0.
fn parse_weight(value: &str) -> f32 {
    match value.trim().parse::<f32>() {
        Ok(weight) if (0.0..=1.0).contains(&weight) => weight,
        _ => 0.0,
    }
}
