//! Internationalization (i18n) module: locale resolution for a multilingual site.
//!
//! This module decides, for every incoming request, which locale to serve and
//! whether to redirect to a locale-prefixed URL. Everything here is pure and
//! synchronous; the static tables are read concurrently without locking.
//!
//! # Architecture
//!
//! - `locale`: The closed `Locale` enum
//! - `registry`: Per-locale metadata (names, icon, SEO tag)
//! - `validator`: Startup consistency checks for the static tables
//! - `crawler`: User-Agent crawler detection
//! - `accept_language`: Accept-Language parsing
//! - `country`: Territory-code mapping and disambiguation
//! - `preference`: Stored preference cookie (read and write)
//! - `resolver`: The priority chain tying the above together
//! - `alternates`: `hreflang` alternate-link tables
//! - `metrics`: Resolution counters
//!
//! # Example
//!
//! ```
//! use locale_router::i18n::{resolve, Locale, RequestSignals};
//!
//! let signals = RequestSignals::new("/pricing?plan=pro")
//!     .with_territory("at")
//!     .with_accept_language("en-US,en;q=0.9");
//! let resolution = resolve(&signals);
//!
//! assert_eq!(resolution.locale, Locale::German);
//! assert_eq!(
//!     resolution.redirect.map(|r| r.location).as_deref(),
//!     Some("/de/pricing?plan=pro")
//! );
//! ```

mod accept_language;
mod alternates;
mod country;
mod crawler;
mod locale;
mod metrics;
mod preference;
mod registry;
mod resolver;
mod validator;

pub use accept_language::{parse_accept_language, preferred_locale, LanguagePreference};
pub(crate) use alternates::escape_attribute;
pub use alternates::{localized_url, AlternateLink, AlternateLinks, X_DEFAULT};
pub use country::{
    disambiguate, locale_for_territory, map_territory, normalize_territory, TerritoryMatch,
};
pub use crawler::{is_crawler, CRAWLER_TOKENS};
pub use locale::Locale;
pub use metrics::{MetricsReport, ResolutionMetrics};
pub use preference::{
    parse_cookie, read_preference, PreferenceRecord, SameSite, PREFERENCE_COOKIE,
    PREFERENCE_MAX_AGE_SECS, PREFERENCE_PATH,
};
pub use registry::{LocaleConfig, LocaleRegistry};
pub use resolver::{
    localized_target, path_locale, resolve, split_target, strip_locale_prefix, Redirect,
    RequestSignals, Resolution, ResolutionSource,
};
pub use validator::RegistryError;
