//! Alternate-link generation for search engines.
//!
//! Every localized page declares all of its language equivalents plus an
//! `x-default` entry pointing at the fallback locale, so the set is the same
//! whichever locale is being viewed.

use crate::i18n::Locale;
use serde::Serialize;

/// `hreflang` value of the catch-all entry.
pub const X_DEFAULT: &str = "x-default";

/// One `<link rel="alternate">` entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AlternateLink {
    /// `hreflang` value: a locale's SEO tag, or `x-default`
    pub hreflang: &'static str,
    /// Absolute URL of the equivalent page
    pub href: String,
}

/// The complete alternate-link table for one page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AlternateLinks {
    /// Locale of the page being rendered
    pub current: Locale,
    pub links: Vec<AlternateLink>,
}

impl AlternateLinks {
    /// Build the table for a locale-relative page path.
    ///
    /// Produces one entry per supported locale in registry order, then the
    /// `x-default` entry targeting the default locale. `current` does not
    /// change the set.
    pub fn generate(current: Locale, page_path: &str, base_url: &str) -> Self {
        let base_url = base_url.trim_end_matches('/');
        let page_path = normalize_page_path(page_path);

        let mut links: Vec<AlternateLink> = Locale::ALL
            .iter()
            .map(|locale| AlternateLink {
                hreflang: locale.seo_tag(),
                href: localized_url(base_url, *locale, &page_path),
            })
            .collect();

        links.push(AlternateLink {
            hreflang: X_DEFAULT,
            href: localized_url(base_url, Locale::DEFAULT, &page_path),
        });

        Self { current, links }
    }

    /// URL of the page in the locale being viewed.
    pub fn canonical(&self) -> Option<&str> {
        let tag = self.current.seo_tag();
        self.links
            .iter()
            .find(|link| link.hreflang == tag)
            .map(|link| link.href.as_str())
    }

    /// The `x-default` entry.
    pub fn x_default(&self) -> Option<&AlternateLink> {
        self.links.iter().find(|link| link.hreflang == X_DEFAULT)
    }

    pub fn len(&self) -> usize {
        self.links.len()
    }

    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }

    /// Render as `<link>` tags, one per line, for the document head.
    pub fn to_html(&self) -> String {
        self.links
            .iter()
            .map(|link| {
                format!(
                    r#"<link rel="alternate" hreflang="{}" href="{}" />"#,
                    escape_attribute(link.hreflang),
                    escape_attribute(&link.href)
                )
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Absolute URL of a page in a given locale.
///
/// The root page maps to `{base}/{locale}` with no trailing slash.
pub fn localized_url(base_url: &str, locale: Locale, page_path: &str) -> String {
    let base_url = base_url.trim_end_matches('/');
    let page_path = normalize_page_path(page_path);
    if page_path == "/" {
        format!("{}/{}", base_url, locale.code())
    } else {
        format!("{}/{}{}", base_url, locale.code(), page_path)
    }
}

fn normalize_page_path(page_path: &str) -> String {
    let trimmed = page_path.trim();
    if trimmed.starts_with('/') {
        trimmed.to_string()
    } else {
        format!("/{}", trimmed)
    }
}

/// Escape a value for use inside a double-quoted HTML attribute.
pub(crate) fn escape_attribute(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '"' => escaped.push_str("&quot;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::collections::HashSet;

    const BASE: &str = "https://example.com";

    #[test]
    fn test_one_entry_per_locale_plus_default() {
        let links = AlternateLinks::generate(Locale::French, "/about", BASE);
        assert_eq!(links.len(), 11);
        assert_eq!(links.links.last().map(|l| l.hreflang), Some(X_DEFAULT));
    }

    #[test]
    fn test_hrefs_use_locale_prefix() {
        let links = AlternateLinks::generate(Locale::English, "/about", BASE);
        let find = |tag: &str| {
            links
                .links
                .iter()
                .find(|l| l.hreflang == tag)
                .map(|l| l.href.clone())
        };

        assert_eq!(find("de"), Some("https://example.com/de/about".to_string()));
        assert_eq!(
            find("zh-Hant"),
            Some("https://example.com/zh-TW/about".to_string())
        );
        assert_eq!(
            find("zh-Hans"),
            Some("https://example.com/zh/about".to_string())
        );
    }

    #[test]
    fn test_x_default_targets_english() {
        for current in Locale::ALL {
            let links = AlternateLinks::generate(current, "/pricing", BASE);
            let x_default = links.x_default().expect("Should have x-default");
            assert_eq!(x_default.href, "https://example.com/en/pricing");
        }
    }

    #[test]
    fn test_root_page_has_no_trailing_slash() {
        let links = AlternateLinks::generate(Locale::Japanese, "/", BASE);
        assert_eq!(links.canonical(), Some("https://example.com/ja"));
        assert_eq!(
            links.x_default().map(|l| l.href.as_str()),
            Some("https://example.com/en")
        );
    }

    #[test]
    fn test_base_url_trailing_slash_and_relative_path() {
        let links = AlternateLinks::generate(Locale::Dutch, "blog/post", "https://example.com/");
        assert_eq!(links.canonical(), Some("https://example.com/nl/blog/post"));
    }

    #[test]
    fn test_canonical_matches_current_locale() {
        let links = AlternateLinks::generate(Locale::ChineseTraditional, "/docs", BASE);
        assert_eq!(links.canonical(), Some("https://example.com/zh-TW/docs"));
    }

    #[test]
    fn test_to_html() {
        let links = AlternateLinks::generate(Locale::English, "/a?x=1&y=2", BASE);
        let html = links.to_html();

        assert_eq!(html.lines().count(), 11);
        assert!(html.contains(
            r#"<link rel="alternate" hreflang="fr" href="https://example.com/fr/a?x=1&amp;y=2" />"#
        ));
        assert!(html.ends_with(
            r#"<link rel="alternate" hreflang="x-default" href="https://example.com/en/a?x=1&amp;y=2" />"#
        ));
    }

    proptest! {
        #[test]
        fn prop_links_are_complete_unique_and_stable(
            index in 0usize..10,
            path in "(/[a-z0-9-]{1,10}){0,4}",
        ) {
            let current = Locale::ALL[index];
            let links = AlternateLinks::generate(current, &path, BASE);

            prop_assert_eq!(links.len(), Locale::ALL.len() + 1);

            let tags: HashSet<&str> = links.links.iter().map(|l| l.hreflang).collect();
            prop_assert_eq!(tags.len(), links.len());

            prop_assert_eq!(
                links.x_default().map(|l| l.href.clone()),
                Some(localized_url(BASE, Locale::English, &path))
            );
            prop_assert_eq!(&links, &AlternateLinks::generate(current, &path, BASE));
        }
    }
}
