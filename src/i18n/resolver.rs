//! Locale resolution: the per-request priority chain.
//!
//! Signals are consulted strictly in this order, and the first one that
//! yields a locale wins:
//!
//! 1. crawler User-Agent (default locale, never redirected)
//! 2. locale already in the URL (authoritative, never redirected)
//! 3. stored preference cookie
//! 4. upstream territory code (ambiguous territories settled by header)
//! 5. Accept-Language header
//! 6. default locale
//!
//! Each tier is a plain function that either resolves or defers. Resolution
//! is total and deterministic; unusable signals simply defer.

use crate::i18n::{
    is_crawler, locale_for_territory, parse_accept_language, preferred_locale, read_preference,
    Locale,
};
use serde::Serialize;
use tracing::debug;

/// Per-request inputs to locale resolution.
///
/// Borrowed from the incoming request and dropped once it is resolved.
#[derive(Debug, Clone, Copy, Default)]
pub struct RequestSignals<'a> {
    /// User-Agent header (empty when absent)
    pub user_agent: &'a str,
    /// Territory code supplied by upstream infrastructure
    pub territory: Option<&'a str>,
    /// Raw Accept-Language header
    pub accept_language: Option<&'a str>,
    /// Raw Cookie header
    pub cookie: Option<&'a str>,
    /// Request target: path, optionally followed by `?query` and `#fragment`
    pub target: &'a str,
}

impl<'a> RequestSignals<'a> {
    /// Signals for a request target with every other signal absent.
    pub fn new(target: &'a str) -> Self {
        Self {
            target,
            ..Self::default()
        }
    }

    pub fn with_user_agent(mut self, user_agent: &'a str) -> Self {
        self.user_agent = user_agent;
        self
    }

    pub fn with_territory(mut self, territory: &'a str) -> Self {
        self.territory = Some(territory);
        self
    }

    pub fn with_accept_language(mut self, accept_language: &'a str) -> Self {
        self.accept_language = Some(accept_language);
        self
    }

    pub fn with_cookie(mut self, cookie: &'a str) -> Self {
        self.cookie = Some(cookie);
        self
    }

    /// Path component of the request target.
    pub fn path(&self) -> &'a str {
        split_target(self.target).0
    }
}

/// Which tier of the chain decided the locale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ResolutionSource {
    Crawler,
    PathLocale,
    Preference,
    Territory,
    AcceptLanguage,
    Default,
}

impl ResolutionSource {
    /// Whether a request resolved by this tier is redirected to a
    /// locale-prefixed URL.
    pub fn redirects(self) -> bool {
        !matches!(self, ResolutionSource::Crawler | ResolutionSource::PathLocale)
    }
}

/// A redirect to the locale-prefixed equivalent of the requested URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Redirect {
    /// `Location` header value: `/{locale}{path}` plus any query and fragment
    pub location: String,
}

/// Result of resolving one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    pub locale: Locale,
    pub source: ResolutionSource,
    pub redirect: Option<Redirect>,
}

impl Resolution {
    pub fn should_redirect(&self) -> bool {
        self.redirect.is_some()
    }
}

/// One tier of the chain: resolve, or defer with `None`.
type ResolverStep = fn(&RequestSignals<'_>) -> Option<(Locale, ResolutionSource)>;

const STEPS: &[ResolverStep] = &[
    crawler_step,
    path_locale_step,
    preference_step,
    territory_step,
    accept_language_step,
];

fn crawler_step(signals: &RequestSignals<'_>) -> Option<(Locale, ResolutionSource)> {
    is_crawler(signals.user_agent).then_some((Locale::DEFAULT, ResolutionSource::Crawler))
}

fn path_locale_step(signals: &RequestSignals<'_>) -> Option<(Locale, ResolutionSource)> {
    path_locale(signals.path()).map(|locale| (locale, ResolutionSource::PathLocale))
}

fn preference_step(signals: &RequestSignals<'_>) -> Option<(Locale, ResolutionSource)> {
    read_preference(signals.cookie).map(|locale| (locale, ResolutionSource::Preference))
}

fn territory_step(signals: &RequestSignals<'_>) -> Option<(Locale, ResolutionSource)> {
    let territory = signals.territory?;
    locale_for_territory(territory, signals.accept_language)
        .map(|locale| (locale, ResolutionSource::Territory))
}

fn accept_language_step(signals: &RequestSignals<'_>) -> Option<(Locale, ResolutionSource)> {
    let preferences = parse_accept_language(signals.accept_language?);
    preferred_locale(&preferences).map(|locale| (locale, ResolutionSource::AcceptLanguage))
}

/// Resolve the locale for a request and decide whether to redirect.
///
/// Never fails: every missing or malformed signal defers to the next tier,
/// and the default locale terminates the chain.
pub fn resolve(signals: &RequestSignals<'_>) -> Resolution {
    let (locale, source) = STEPS
        .iter()
        .find_map(|step| step(signals))
        .unwrap_or((Locale::DEFAULT, ResolutionSource::Default));

    let redirect = source.redirects().then(|| Redirect {
        location: localized_target(locale, signals.target),
    });

    debug!(
        locale = %locale,
        source = ?source,
        redirect = redirect.is_some(),
        "Resolved request locale"
    );

    Resolution {
        locale,
        source,
        redirect,
    }
}

/// Split a request target into path, query and fragment.
///
/// The query and fragment are returned without their leading `?` / `#`.
pub fn split_target(target: &str) -> (&str, Option<&str>, Option<&str>) {
    let (rest, fragment) = match target.split_once('#') {
        Some((rest, fragment)) => (rest, Some(fragment)),
        None => (target, None),
    };
    let (path, query) = match rest.split_once('?') {
        Some((path, query)) => (path, Some(query)),
        None => (rest, None),
    };
    (path, query, fragment)
}

/// The supported locale named by the first path segment, if any.
pub fn path_locale(path: &str) -> Option<Locale> {
    let first = path.trim_start_matches('/').split('/').next()?;
    Locale::from_code(first)
}

/// Split a path into its locale prefix and the locale-relative remainder.
///
/// `/fr/about` gives `(Some(French), "/about")`; `/fr` gives
/// `(Some(French), "/")`; unprefixed paths are returned whole.
pub fn strip_locale_prefix(path: &str) -> (Option<Locale>, &str) {
    let Some(locale) = path_locale(path) else {
        return (None, path);
    };

    let rest = &path.trim_start_matches('/')[locale.code().len()..];
    if rest.is_empty() {
        (Some(locale), "/")
    } else {
        (Some(locale), rest)
    }
}

/// Prefix a request target with a locale, keeping query and fragment.
pub fn localized_target(locale: Locale, target: &str) -> String {
    let (path, query, fragment) = split_target(target);

    let mut location = format!("/{}", locale.code());
    if !path.starts_with('/') {
        location.push('/');
    }
    location.push_str(path);
    if let Some(query) = query {
        location.push('?');
        location.push_str(query);
    }
    if let Some(fragment) = fragment {
        location.push('#');
        location.push_str(fragment);
    }
    location
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::i18n::country::DIRECT_TERRITORIES;
    use proptest::prelude::*;

    const GOOGLEBOT: &str = "Mozilla/5.0 (compatible; Googlebot/2.1; +http://www.google.com/bot.html)";
    const FIREFOX: &str = "Mozilla/5.0 (X11; Linux x86_64; rv:128.0) Gecko/20100101 Firefox/128.0";

    // ==================== Target Helper Tests ====================

    #[test]
    fn test_split_target() {
        assert_eq!(split_target("/about"), ("/about", None, None));
        assert_eq!(
            split_target("/about?ref=nav#team"),
            ("/about", Some("ref=nav"), Some("team"))
        );
        assert_eq!(split_target("/a#frag?x"), ("/a", None, Some("frag?x")));
        assert_eq!(split_target(""), ("", None, None));
    }

    #[test]
    fn test_path_locale() {
        assert_eq!(path_locale("/fr/about"), Some(Locale::French));
        assert_eq!(path_locale("/zh-TW"), Some(Locale::ChineseTraditional));
        assert_eq!(path_locale("/zh-tw/about"), None);
        assert_eq!(path_locale("/french/about"), None);
        assert_eq!(path_locale("/"), None);
        assert_eq!(path_locale(""), None);
    }

    #[test]
    fn test_strip_locale_prefix() {
        assert_eq!(
            strip_locale_prefix("/fr/about/team"),
            (Some(Locale::French), "/about/team")
        );
        assert_eq!(strip_locale_prefix("/ja"), (Some(Locale::Japanese), "/"));
        assert_eq!(strip_locale_prefix("/ja/"), (Some(Locale::Japanese), "/"));
        assert_eq!(strip_locale_prefix("/blog/post"), (None, "/blog/post"));
    }

    #[test]
    fn test_localized_target_keeps_query_and_fragment() {
        assert_eq!(
            localized_target(Locale::German, "/pricing?plan=pro#faq"),
            "/de/pricing?plan=pro#faq"
        );
        assert_eq!(localized_target(Locale::English, "/"), "/en/");
        assert_eq!(localized_target(Locale::Spanish, ""), "/es/");
        assert_eq!(localized_target(Locale::Dutch, "about"), "/nl/about");
    }

    // ==================== Individual Tier Tests ====================

    #[test]
    fn test_crawler_gets_default_without_redirect() {
        let signals = RequestSignals::new("/about")
            .with_user_agent(GOOGLEBOT)
            .with_cookie("preferred_locale=ja")
            .with_territory("DE")
            .with_accept_language("fr");
        let resolution = resolve(&signals);

        assert_eq!(resolution.locale, Locale::English);
        assert_eq!(resolution.source, ResolutionSource::Crawler);
        assert!(!resolution.should_redirect());
    }

    #[test]
    fn test_path_locale_is_authoritative() {
        let signals = RequestSignals::new("/nl/products?id=3")
            .with_user_agent(FIREFOX)
            .with_cookie("preferred_locale=ja")
            .with_territory("DE")
            .with_accept_language("fr");
        let resolution = resolve(&signals);

        assert_eq!(resolution.locale, Locale::Dutch);
        assert_eq!(resolution.source, ResolutionSource::PathLocale);
        assert_eq!(resolution.redirect, None);
    }

    #[test]
    fn test_preference_beats_territory_and_header() {
        let signals = RequestSignals::new("/about")
            .with_cookie("session=1; preferred_locale=ru")
            .with_territory("JP")
            .with_accept_language("fr");
        let resolution = resolve(&signals);

        assert_eq!(resolution.locale, Locale::Russian);
        assert_eq!(resolution.source, ResolutionSource::Preference);
        assert_eq!(
            resolution.redirect,
            Some(Redirect {
                location: "/ru/about".to_string()
            })
        );
    }

    #[test]
    fn test_invalid_preference_falls_through_to_territory() {
        let signals = RequestSignals::new("/")
            .with_cookie("preferred_locale=klingon")
            .with_territory("jp");
        let resolution = resolve(&signals);

        assert_eq!(resolution.locale, Locale::Japanese);
        assert_eq!(resolution.source, ResolutionSource::Territory);
        assert_eq!(resolution.redirect.map(|r| r.location), Some("/ja/".to_string()));
    }

    #[test]
    fn test_territory_beats_header() {
        let signals = RequestSignals::new("/docs")
            .with_territory("BR")
            .with_accept_language("es,en;q=0.5");
        let resolution = resolve(&signals);

        assert_eq!(resolution.locale, Locale::Portuguese);
        assert_eq!(resolution.source, ResolutionSource::Territory);
    }

    #[test]
    fn test_every_direct_territory_in_any_case() {
        for (locale, codes) in DIRECT_TERRITORIES {
            for code in *codes {
                let mut chars = code.chars();
                let mixed: String = chars
                    .next()
                    .map(|c| c.to_ascii_uppercase())
                    .into_iter()
                    .chain(chars.map(|c| c.to_ascii_lowercase()))
                    .collect();

                for variant in [code.to_ascii_lowercase(), code.to_ascii_uppercase(), mixed] {
                    let signals = RequestSignals::new("/")
                        .with_user_agent(FIREFOX)
                        .with_territory(&variant)
                        .with_accept_language("ru");
                    let resolution = resolve(&signals);

                    assert_eq!(resolution.locale, *locale, "territory {}", variant);
                    assert_eq!(resolution.source, ResolutionSource::Territory);
                }
            }
        }
    }

    #[test]
    fn test_ambiguous_territory_uses_header() {
        let signals = RequestSignals::new("/")
            .with_territory("CH")
            .with_accept_language("fr-CH,fr;q=0.9,de;q=0.8");
        assert_eq!(resolve(&signals).locale, Locale::French);

        let signals = RequestSignals::new("/")
            .with_territory("CH")
            .with_accept_language("en-US");
        assert_eq!(resolve(&signals).locale, Locale::German);
    }

    #[test]
    fn test_unmapped_territory_falls_through_to_header() {
        let signals = RequestSignals::new("/")
            .with_territory("IT")
            .with_accept_language("it,es;q=0.8");
        let resolution = resolve(&signals);

        assert_eq!(resolution.locale, Locale::Spanish);
        assert_eq!(resolution.source, ResolutionSource::AcceptLanguage);
    }

    #[test]
    fn test_malformed_territory_falls_through_to_header() {
        let signals = RequestSignals::new("/")
            .with_territory("XYZ")
            .with_accept_language("zh-HK");
        let resolution = resolve(&signals);

        assert_eq!(resolution.locale, Locale::ChineseTraditional);
        assert_eq!(resolution.source, ResolutionSource::AcceptLanguage);
    }

    #[test]
    fn test_header_uses_weight_order() {
        let signals = RequestSignals::new("/").with_accept_language("it,de;q=0.3,ja;q=0.6");
        assert_eq!(resolve(&signals).locale, Locale::Japanese);
    }

    #[test]
    fn test_no_signals_gives_default_with_redirect() {
        let resolution = resolve(&RequestSignals::new("/pricing?x=1"));

        assert_eq!(resolution.locale, Locale::English);
        assert_eq!(resolution.source, ResolutionSource::Default);
        assert_eq!(
            resolution.redirect.map(|r| r.location),
            Some("/en/pricing?x=1".to_string())
        );
    }

    #[test]
    fn test_unusable_header_gives_default() {
        let signals = RequestSignals::new("/").with_accept_language("*;q=abc, ,it");
        assert_eq!(resolve(&signals).source, ResolutionSource::Default);
    }

    #[test]
    fn test_resolution_is_deterministic() {
        let signals = RequestSignals::new("/a?b#c")
            .with_territory("BE")
            .with_accept_language("fr;q=0.5,nl;q=0.5");
        assert_eq!(resolve(&signals), resolve(&signals));
    }

    // ==================== Property Tests ====================

    fn any_locale() -> impl Strategy<Value = Locale> {
        prop::sample::select(Locale::ALL.to_vec())
    }

    fn any_territory() -> impl Strategy<Value = Option<String>> {
        prop::option::of(prop_oneof![
            "[A-Za-z]{2}",
            Just("CH".to_string()),
            Just("BE".to_string()),
            ".{0,4}",
        ])
    }

    fn any_header() -> impl Strategy<Value = Option<String>> {
        prop::option::of(prop_oneof![
            "[a-z]{2}(-[A-Z]{2})?(;q=0\\.[0-9])?(,[a-z]{2}(;q=0\\.[0-9])?){0,3}",
            ".{0,32}",
        ])
    }

    fn any_path() -> impl Strategy<Value = String> {
        "(/[a-z]{1,8}){0,3}(\\?[a-z]=[0-9])?(#[a-z]{1,4})?"
    }

    fn signals<'a>(
        target: &'a str,
        territory: &'a Option<String>,
        header: &'a Option<String>,
        cookie: &'a Option<String>,
    ) -> RequestSignals<'a> {
        RequestSignals {
            user_agent: FIREFOX,
            territory: territory.as_deref(),
            accept_language: header.as_deref(),
            cookie: cookie.as_deref(),
            target,
        }
    }

    proptest! {
        #[test]
        fn prop_resolution_is_total(
            user_agent in ".{0,40}",
            territory in any_territory(),
            header in any_header(),
            cookie in prop::option::of(".{0,40}"),
            target in ".{0,40}",
        ) {
            let mut s = signals(&target, &territory, &header, &cookie);
            s.user_agent = &user_agent;
            let resolution = resolve(&s);

            prop_assert!(Locale::ALL.contains(&resolution.locale));
            prop_assert_eq!(resolution.should_redirect(), resolution.source.redirects());
        }

        #[test]
        fn prop_preference_wins_over_geo_and_header(
            preferred in any_locale(),
            territory in any_territory(),
            header in any_header(),
            path in any_path(),
        ) {
            prop_assume!(path_locale(&path).is_none());
            let cookie = Some(format!("preferred_locale={}", preferred.code()));
            let resolution = resolve(&signals(&path, &territory, &header, &cookie));

            prop_assert_eq!(resolution.locale, preferred);
            prop_assert_eq!(resolution.source, ResolutionSource::Preference);
            prop_assert_eq!(
                resolution.redirect.map(|r| r.location),
                Some(localized_target(preferred, &path))
            );
        }

        #[test]
        fn prop_path_locale_never_redirects(
            in_path in any_locale(),
            rest in any_path(),
            preferred in prop::option::of(any_locale()),
            territory in any_territory(),
            header in any_header(),
        ) {
            let target = format!("/{}{}", in_path.code(), rest);
            let cookie = preferred.map(|l| format!("preferred_locale={}", l.code()));
            let resolution = resolve(&signals(&target, &territory, &header, &cookie));

            prop_assert_eq!(resolution.locale, in_path);
            prop_assert!(!resolution.should_redirect());
        }

        #[test]
        fn prop_crawlers_never_redirect(
            target in ".{0,40}",
            preferred in prop::option::of(any_locale()),
            territory in any_territory(),
            header in any_header(),
        ) {
            let cookie = preferred.map(|l| format!("preferred_locale={}", l.code()));
            let mut s = signals(&target, &territory, &header, &cookie);
            s.user_agent = GOOGLEBOT;
            let resolution = resolve(&s);

            prop_assert_eq!(resolution.locale, Locale::DEFAULT);
            prop_assert!(!resolution.should_redirect());
        }
    }
}
