//! Consistency checks for the static locale tables.
//!
//! The tables are compiled in, but a bad edit (a missing config entry, a
//! duplicated `hreflang` tag, a territory listed twice) would silently skew
//! resolution. The server runs these checks before accepting traffic.

use crate::i18n::country::{AMBIGUOUS_TERRITORIES, DIRECT_TERRITORIES};
use crate::i18n::crawler::CRAWLER_TOKENS;
use crate::i18n::{normalize_territory, Locale, LocaleConfig};
use std::collections::HashSet;
use thiserror::Error;

/// A problem found in the static locale tables.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    #[error("locale '{0}' has no registry entry")]
    MissingLocale(Locale),

    #[error("locale '{0}' has more than one registry entry")]
    DuplicateLocale(Locale),

    #[error("SEO tag '{0}' is used by more than one locale")]
    DuplicateSeoTag(&'static str),

    #[error("territory code '{0}' is not a two-character uppercase code")]
    MalformedTerritory(&'static str),

    #[error("territory '{0}' is listed more than once")]
    DuplicateTerritory(&'static str),

    #[error("ambiguous territory '{0}' needs at least two candidate locales")]
    TooFewCandidates(&'static str),

    #[error("crawler token list is empty or contains a blank token")]
    InvalidCrawlerTokens,
}

/// Every locale has exactly one entry and SEO tags are pairwise distinct.
pub(crate) fn validate_locale_configs(configs: &[LocaleConfig]) -> Result<(), RegistryError> {
    for locale in Locale::ALL {
        match configs.iter().filter(|config| config.locale == locale).count() {
            0 => return Err(RegistryError::MissingLocale(locale)),
            1 => {}
            _ => return Err(RegistryError::DuplicateLocale(locale)),
        }
    }

    let mut tags = HashSet::new();
    for config in configs {
        if !tags.insert(config.seo_tag.to_ascii_lowercase()) {
            return Err(RegistryError::DuplicateSeoTag(config.seo_tag));
        }
    }

    Ok(())
}

/// Territory codes are well-formed and appear once across both tables;
/// ambiguous entries list at least two candidates.
pub(crate) fn validate_territory_tables() -> Result<(), RegistryError> {
    check_territories(DIRECT_TERRITORIES, AMBIGUOUS_TERRITORIES)
}

fn check_territories(
    direct: &[(Locale, &[&'static str])],
    ambiguous: &[(&'static str, &[Locale])],
) -> Result<(), RegistryError> {
    let mut seen = HashSet::new();

    let direct_codes = direct.iter().flat_map(|(_, codes)| codes.iter().copied());
    let ambiguous_codes = ambiguous.iter().map(|(code, _)| *code);

    for code in direct_codes.chain(ambiguous_codes) {
        if normalize_territory(code).as_deref() != Some(code) {
            return Err(RegistryError::MalformedTerritory(code));
        }
        if !seen.insert(code) {
            return Err(RegistryError::DuplicateTerritory(code));
        }
    }

    for (code, candidates) in ambiguous {
        if candidates.len() < 2 {
            return Err(RegistryError::TooFewCandidates(*code));
        }
    }

    Ok(())
}

pub(crate) fn validate_crawler_tokens() -> Result<(), RegistryError> {
    check_crawler_tokens(CRAWLER_TOKENS)
}

fn check_crawler_tokens(tokens: &[&str]) -> Result<(), RegistryError> {
    if tokens.is_empty() || tokens.iter().any(|token| token.trim().is_empty()) {
        return Err(RegistryError::InvalidCrawlerTokens);
    }
    Ok(())
}
