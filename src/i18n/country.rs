//! Territory-to-locale mapping.
//!
//! The upstream edge supplies a two-letter territory code. Most territories
//! have one dominant written language among the supported locales; a few
//! split across several and are settled with the Accept-Language header.

use crate::i18n::{parse_accept_language, LanguagePreference, Locale};
use std::collections::HashMap;
use std::sync::OnceLock;

/// Territories grouped by the locale they map to.
pub(crate) const DIRECT_TERRITORIES: &[(Locale, &[&str])] = &[
    (
        Locale::English,
        &[
            "US", "GB", "IE", "AU", "NZ", "ZA", "IN", "NG", "KE", "GH", "JM", "TT", "BS", "BB",
            "PH",
        ],
    ),
    (Locale::ChineseSimplified, &["CN"]),
    (Locale::ChineseTraditional, &["TW", "HK", "MO"]),
    (Locale::Japanese, &["JP"]),
    (Locale::German, &["DE", "AT", "LI"]),
    (Locale::Dutch, &["NL", "SR", "AW", "CW", "SX", "BQ"]),
    (
        Locale::French,
        &[
            "FR", "MC", "SN", "CI", "ML", "BF", "NE", "TG", "BJ", "GN", "GA", "CG", "CD", "CM",
            "MG", "HT", "PF", "NC", "RE", "GP", "MQ", "GF", "YT", "PM", "WF", "BL", "MF",
        ],
    ),
    (
        Locale::Portuguese,
        &["PT", "BR", "AO", "MZ", "CV", "GW", "ST", "TL"],
    ),
    (
        Locale::Spanish,
        &[
            "ES", "MX", "AR", "CO", "CL", "PE", "VE", "EC", "GT", "CU", "BO", "DO", "HN", "PY",
            "SV", "NI", "CR", "PA", "UY", "PR", "GQ",
        ],
    ),
    (Locale::Russian, &["RU", "BY", "KZ", "KG"]),
];

/// Territories whose population splits across supported locales, with
/// their candidates in fallback order.
pub(crate) const AMBIGUOUS_TERRITORIES: &[(&str, &[Locale])] = &[
    ("CH", &[Locale::German, Locale::French]),
    ("BE", &[Locale::Dutch, Locale::French]),
    ("CA", &[Locale::English, Locale::French]),
    ("LU", &[Locale::French, Locale::German]),
    ("SG", &[Locale::English, Locale::ChineseSimplified]),
];

static DIRECT_INDEX: OnceLock<HashMap<&'static str, Locale>> = OnceLock::new();

fn direct_index() -> &'static HashMap<&'static str, Locale> {
    DIRECT_INDEX.get_or_init(|| {
        DIRECT_TERRITORIES
            .iter()
            .flat_map(|(locale, codes)| codes.iter().map(move |code| (*code, *locale)))
            .collect()
    })
}

/// Outcome of looking up a territory code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TerritoryMatch {
    /// Malformed or unknown territory: no geo signal
    Unmapped,
    /// One locale serves the whole territory
    Direct(Locale),
    /// Several candidate locales, in fallback order (always at least two)
    Ambiguous(&'static [Locale]),
}

impl TerritoryMatch {
    /// Candidate locales as an ordered list (empty when unmapped).
    pub fn candidates(&self) -> &[Locale] {
        match self {
            TerritoryMatch::Unmapped => &[],
            TerritoryMatch::Direct(locale) => std::slice::from_ref(locale),
            TerritoryMatch::Ambiguous(candidates) => *candidates,
        }
    }
}

/// Normalize a territory code: trimmed, exactly two non-whitespace
/// characters, uppercased. Anything else is not a territory code.
pub fn normalize_territory(code: &str) -> Option<String> {
    let code = code.trim();
    let mut chars = code.chars();
    match (chars.next(), chars.next(), chars.next()) {
        (Some(a), Some(b), None) if !a.is_whitespace() && !b.is_whitespace() => {
            Some(code.to_uppercase())
        }
        _ => None,
    }
}

/// Look up a territory code in the direct and ambiguous tables.
///
/// Case-insensitive. Codes that are not exactly two characters are never
/// looked up.
pub fn map_territory(code: &str) -> TerritoryMatch {
    let Some(code) = normalize_territory(code) else {
        return TerritoryMatch::Unmapped;
    };

    if let Some(locale) = direct_index().get(code.as_str()) {
        return TerritoryMatch::Direct(*locale);
    }

    AMBIGUOUS_TERRITORIES
        .iter()
        .find(|(territory, _)| *territory == code)
        .map(|(_, candidates)| TerritoryMatch::Ambiguous(*candidates))
        .unwrap_or(TerritoryMatch::Unmapped)
}

/// Pick one of several candidate locales using parsed language preferences.
///
/// Walks the preferences in order and returns the first candidate one of
/// them asks for. When none does, the first declared candidate wins. Returns
/// `None` only for an empty candidate list.
pub fn disambiguate(candidates: &[Locale], preferences: &[LanguagePreference]) -> Option<Locale> {
    preferences
        .iter()
        .filter_map(LanguagePreference::locale)
        .find(|locale| candidates.contains(locale))
        .or_else(|| candidates.first().copied())
}

/// Resolve a territory to a single locale, settling ambiguous territories
/// with the Accept-Language header.
///
/// Returns `None` when the territory carries no geo signal.
pub fn locale_for_territory(code: &str, accept_language: Option<&str>) -> Option<Locale> {
    match map_territory(code).candidates() {
        [] => None,
        [locale] => Some(*locale),
        candidates => {
            let preferences = accept_language
                .map(parse_accept_language)
                .unwrap_or_default();
            disambiguate(candidates, &preferences)
        }
    }
}
