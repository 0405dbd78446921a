//! Locale type: the closed set of language variants the site is served in.
//!
//! Every URL prefix, stored preference and alternate link is expressed in
//! terms of this enum. The set is fixed at compile time; per-locale metadata
//! lives in the registry.

use crate::i18n::{LocaleConfig, LocaleRegistry};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A supported site locale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Locale {
    #[serde(rename = "en")]
    English,
    #[serde(rename = "zh")]
    ChineseSimplified,
    #[serde(rename = "zh-TW")]
    ChineseTraditional,
    #[serde(rename = "ja")]
    Japanese,
    #[serde(rename = "de")]
    German,
    #[serde(rename = "nl")]
    Dutch,
    #[serde(rename = "fr")]
    French,
    #[serde(rename = "pt")]
    Portuguese,
    #[serde(rename = "es")]
    Spanish,
    #[serde(rename = "ru")]
    Russian,
}

impl Locale {
    /// All supported locales, in registry order.
    pub const ALL: [Locale; 10] = [
        Locale::English,
        Locale::ChineseSimplified,
        Locale::ChineseTraditional,
        Locale::Japanese,
        Locale::German,
        Locale::Dutch,
        Locale::French,
        Locale::Portuguese,
        Locale::Spanish,
        Locale::Russian,
    ];

    /// The locale served when no signal says otherwise, and the target of
    /// the `x-default` alternate link.
    pub const DEFAULT: Locale = Locale::English;

    /// URL prefix and stored-preference value for this locale.
    pub const fn code(self) -> &'static str {
        match self {
            Locale::English => "en",
            Locale::ChineseSimplified => "zh",
            Locale::ChineseTraditional => "zh-TW",
            Locale::Japanese => "ja",
            Locale::German => "de",
            Locale::Dutch => "nl",
            Locale::French => "fr",
            Locale::Portuguese => "pt",
            Locale::Spanish => "es",
            Locale::Russian => "ru",
        }
    }

    /// Look up a locale by its exact code.
    ///
    /// Matching is case-sensitive: `"zh-TW"` is a locale, `"zh-tw"` is not.
    /// This is the rule for URL segments and stored preferences.
    pub fn from_code(code: &str) -> Option<Locale> {
        Locale::ALL.into_iter().find(|locale| locale.code() == code)
    }

    /// Map a language-negotiation tag (e.g. `"de-AT"`, `"zh-Hant-HK"`) to a
    /// supported locale.
    ///
    /// Matching is case-insensitive. An exact code match wins, then Chinese
    /// tags naming a traditional script or a traditional-script region, then
    /// the base language subtag.
    pub fn from_language_tag(tag: &str) -> Option<Locale> {
        let tag = tag.trim().replace('_', "-").to_ascii_lowercase();
        if tag.is_empty() || tag == "*" {
            return None;
        }

        if let Some(locale) = Locale::ALL
            .into_iter()
            .find(|locale| locale.code().eq_ignore_ascii_case(&tag))
        {
            return Some(locale);
        }

        let mut subtags = tag.split('-');
        let base = subtags.next()?;

        if base == "zh"
            && subtags.any(|subtag| matches!(subtag, "hant" | "tw" | "hk" | "mo"))
        {
            return Some(Locale::ChineseTraditional);
        }

        Locale::ALL.into_iter().find(|locale| locale.code() == base)
    }

    /// The registry entry for this locale.
    pub fn config(self) -> &'static LocaleConfig {
        LocaleRegistry::get().config(self)
    }

    /// The language tag used in `hreflang` attributes.
    pub fn seo_tag(self) -> &'static str {
        self.config().seo_tag
    }

    /// Check if this is the fallback locale.
    pub fn is_default(self) -> bool {
        self == Locale::DEFAULT
    }
}

impl Default for Locale {
    fn default() -> Self {
        Locale::DEFAULT
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}
