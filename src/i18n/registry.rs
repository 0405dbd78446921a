//! Locale registry: Single source of truth for per-locale metadata.
//!
//! This module provides a centralized registry of display and SEO metadata
//! for every supported locale. It uses a singleton pattern with `OnceLock`
//! so the table is built once and then read concurrently without locking.

use crate::i18n::validator::{self, RegistryError};
use crate::i18n::Locale;
use serde::Serialize;
use std::sync::OnceLock;

/// Configuration for a supported locale.
#[derive(Debug, Clone, Serialize)]
pub struct LocaleConfig {
    /// The locale this entry describes
    pub locale: Locale,

    /// English name of the locale (e.g., "German", "Chinese (Traditional)")
    pub name: &'static str,

    /// Name of the locale in its own language (e.g., "Deutsch", "繁體中文")
    pub native_name: &'static str,

    /// Glyph shown next to the locale in language pickers
    pub icon: &'static str,

    /// BCP 47 tag emitted in `hreflang` attributes (pairwise unique)
    pub seo_tag: &'static str,
}

/// Global locale registry singleton.
///
/// Initialized once on first access and immutable thereafter.
pub struct LocaleRegistry {
    locales: Vec<LocaleConfig>,
}

/// Global registry instance (initialized lazily)
static REGISTRY: OnceLock<LocaleRegistry> = OnceLock::new();

impl LocaleRegistry {
    /// Get the global locale registry instance.
    pub fn get() -> &'static LocaleRegistry {
        REGISTRY.get_or_init(|| LocaleRegistry {
            locales: default_locales(),
        })
    }

    /// Get the configuration entry for a locale.
    ///
    /// # Panics
    /// Panics if the locale has no entry. `validate` rejects such a registry,
    /// and the server refuses to start when validation fails.
    pub fn config(&self, locale: Locale) -> &LocaleConfig {
        self.locales
            .iter()
            .find(|config| config.locale == locale)
            .expect("every locale should have a registry entry")
    }

    /// Get all locale entries in registry order.
    pub fn list_all(&self) -> Vec<&LocaleConfig> {
        self.locales.iter().collect()
    }

    /// Check the registry and the territory and crawler tables for
    /// consistency.
    ///
    /// Returns the first problem found.
    pub fn validate(&self) -> Result<(), RegistryError> {
        validator::validate_locale_configs(&self.locales)?;
        validator::validate_territory_tables()?;
        validator::validate_crawler_tokens()
    }
}

/// Shipped locale configurations, one per `Locale`, in `Locale::ALL` order.
fn default_locales() -> Vec<LocaleConfig> {
    vec![
        LocaleConfig {
            locale: Locale::English,
            name: "English",
            native_name: "English",
            icon: "🇺🇸",
            seo_tag: "en",
        },
        LocaleConfig {
            locale: Locale::ChineseSimplified,
            name: "Chinese (Simplified)",
            native_name: "简体中文",
            icon: "🇨🇳",
            seo_tag: "zh-Hans",
        },
        LocaleConfig {
            locale: Locale::ChineseTraditional,
            name: "Chinese (Traditional)",
            native_name: "繁體中文",
            icon: "🇹🇼",
            seo_tag: "zh-Hant",
        },
        LocaleConfig {
            locale: Locale::Japanese,
            name: "Japanese",
            native_name: "日本語",
            icon: "🇯🇵",
            seo_tag: "ja",
        },
        LocaleConfig {
            locale: Locale::German,
            name: "German",
            native_name: "Deutsch",
            icon: "🇩🇪",
            seo_tag: "de",
        },
        LocaleConfig {
            locale: Locale::Dutch,
            name: "Dutch",
            native_name: "Nederlands",
            icon: "🇳🇱",
            seo_tag: "nl",
        },
        LocaleConfig {
            locale: Locale::French,
            name: "French",
            native_name: "Français",
            icon: "🇫🇷",
            seo_tag: "fr",
        },
        LocaleConfig {
            locale: Locale::Portuguese,
            name: "Portuguese",
            native_name: "Português",
            icon: "🇧🇷",
            seo_tag: "pt",
        },
        LocaleConfig {
            locale: Locale::Spanish,
            name: "Spanish",
            native_name: "Español",
            icon: "🇪🇸",
            seo_tag: "es",
        },
        LocaleConfig {
            locale: Locale::Russian,
            name: "Russian",
            native_name: "Русский",
            icon: "🇷🇺",
            seo_tag: "ru",
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_registry_get_returns_singleton() {
        let registry1 = LocaleRegistry::get();
        let registry2 = LocaleRegistry::get();

        // Should return the same instance (same memory address)
        assert!(std::ptr::eq(registry1, registry2));
    }

    #[test]
    fn test_shipped_registry_validates() {
        assert_eq!(LocaleRegistry::get().validate(), Ok(()));
    }

    #[test]
    fn test_one_entry_per_locale() {
        let registry = LocaleRegistry::get();
        assert_eq!(registry.list_all().len(), Locale::ALL.len());

        for locale in Locale::ALL {
            assert_eq!(registry.config(locale).locale, locale);
        }
    }

    #[test]
    fn test_registry_order_matches_locale_order() {
        let order: Vec<Locale> = LocaleRegistry::get()
            .list_all()
            .iter()
            .map(|config| config.locale)
            .collect();
        assert_eq!(order, Locale::ALL.to_vec());
    }

    #[test]
    fn test_seo_tags_are_unique() {
        let tags: HashSet<&str> = LocaleRegistry::get()
            .list_all()
            .iter()
            .map(|config| config.seo_tag)
            .collect();
        assert_eq!(tags.len(), Locale::ALL.len());
    }

    #[test]
    fn test_chinese_variants_have_distinct_tags() {
        let registry = LocaleRegistry::get();
        let simplified = registry.config(Locale::ChineseSimplified);
        let traditional = registry.config(Locale::ChineseTraditional);

        assert_ne!(simplified.seo_tag, traditional.seo_tag);
        assert_eq!(simplified.native_name, "简体中文");
        assert_eq!(traditional.native_name, "繁體中文");
    }
}
