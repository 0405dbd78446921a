//! Axum middleware applying locale resolution to every page request.
//!
//! Builds `RequestSignals` from the request headers and URI, runs the
//! resolver, and either answers with a 302 to the locale-prefixed URL or
//! passes the request on with the resolved locale attached.

use crate::config::Config;
use crate::i18n::{resolve, Locale, RequestSignals, Resolution, ResolutionMetrics};
use axum::{
    extract::{Request, State},
    http::{header, HeaderMap, HeaderValue, StatusCode, Uri},
    middleware::Next,
    response::{IntoResponse, Response},
};
use std::sync::Arc;
use tracing::{debug, warn};

/// Locale chosen for the current request, available to handlers as an
/// extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedLocale(pub Locale);

/// Paths that never take part in locale resolution, matched exactly.
const EXEMPT_PATHS: &[&str] = &["/health", "/favicon.ico", "/robots.txt", "/sitemap.xml"];

/// Path trees that never take part in locale resolution.
const EXEMPT_PREFIXES: &[&str] = &["/api/", "/static/"];

pub fn is_exempt(path: &str) -> bool {
    EXEMPT_PATHS.contains(&path) || EXEMPT_PREFIXES.iter().any(|prefix| path.starts_with(prefix))
}

fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers.get(name).and_then(|value| value.to_str().ok())
}

/// Join every `Cookie` header; HTTP/2 clients may split cookies across
/// several header lines.
fn cookie_header(headers: &HeaderMap) -> Option<String> {
    let cookies: Vec<&str> = headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .collect();

    (!cookies.is_empty()).then(|| cookies.join("; "))
}

/// Resolve a request from its headers and URI.
pub fn resolve_request(headers: &HeaderMap, uri: &Uri, config: &Config) -> Resolution {
    let cookie = cookie_header(headers);
    let target = uri
        .path_and_query()
        .map(|path_and_query| path_and_query.as_str())
        .unwrap_or("/");

    let signals = RequestSignals {
        user_agent: header_str(headers, header::USER_AGENT.as_str()).unwrap_or(""),
        territory: header_str(headers, &config.territory_header),
        accept_language: header_str(headers, header::ACCEPT_LANGUAGE.as_str()),
        cookie: cookie.as_deref(),
        target,
    };

    resolve(&signals)
}

/// Whether the response travels over an encrypted channel.
pub fn is_encrypted(headers: &HeaderMap, uri: &Uri, config: &Config) -> bool {
    if uri.scheme_str() == Some("https") {
        return true;
    }

    config.trust_forwarded_proto
        && header_str(headers, "x-forwarded-proto")
            .and_then(|value| value.split(',').next())
            .map(|proto| proto.trim().eq_ignore_ascii_case("https"))
            .unwrap_or(false)
}

/// Locale resolution middleware.
pub async fn locale_layer(
    State(config): State<Arc<Config>>,
    mut request: Request,
    next: Next,
) -> Response {
    if is_exempt(request.uri().path()) {
        return next.run(request).await;
    }

    let resolution = resolve_request(request.headers(), request.uri(), &config);
    ResolutionMetrics::global().record(&resolution);

    if let Some(redirect) = &resolution.redirect {
        match HeaderValue::from_str(&redirect.location) {
            Ok(location) => {
                debug!(
                    from = %request.uri().path(),
                    to = %redirect.location,
                    source = ?resolution.source,
                    "Redirecting to localized URL"
                );
                return (
                    StatusCode::FOUND,
                    [
                        (header::LOCATION, location),
                        (
                            header::VARY,
                            HeaderValue::from_static("Accept-Language, Cookie"),
                        ),
                    ],
                )
                    .into_response();
            }
            Err(e) => {
                warn!("Redirect target is not a valid header value: {}", e);
            }
        }
    }

    request
        .extensions_mut()
        .insert(ResolvedLocale(resolution.locale));
    next.run(request).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::i18n::ResolutionSource;

    fn headers(pairs: &[(&'static str, &'static str)]) -> HeaderMap {
        let mut map = HeaderMap::new();
        for (name, value) in pairs {
            map.append(*name, HeaderValue::from_static(*value));
        }
        map
    }

    fn uri(s: &str) -> Uri {
        s.parse().expect("Should parse URI")
    }

    #[test]
    fn test_exempt_paths() {
        assert!(is_exempt("/api/preference"));
        assert!(is_exempt("/health"));
        assert!(is_exempt("/static/app.css"));
        assert!(!is_exempt("/"));
        assert!(!is_exempt("/apidocs"));
        assert!(!is_exempt("/fr/about"));
        assert!(is_exempt("/robots.txt"));
        assert!(!is_exempt("/healthcare"));
        assert!(!is_exempt("/health-tips"));
        assert!(!is_exempt("/robots.txt.bak"));
        assert!(!is_exempt("/static"));
    }

    #[test]
    fn test_resolve_request_reads_configured_territory_header() {
        let config = Config {
            territory_header: "x-country".to_string(),
            ..Config::default()
        };
        let resolution = resolve_request(
            &headers(&[("x-country", "nl"), ("cf-ipcountry", "JP")]),
            &uri("/shop?item=4"),
            &config,
        );

        assert_eq!(resolution.locale, Locale::Dutch);
        assert_eq!(resolution.source, ResolutionSource::Territory);
        assert_eq!(
            resolution.redirect.map(|r| r.location),
            Some("/nl/shop?item=4".to_string())
        );
    }

    #[test]
    fn test_resolve_request_joins_split_cookie_headers() {
        let resolution = resolve_request(
            &headers(&[("cookie", "a=1"), ("cookie", "preferred_locale=es")]),
            &uri("/"),
            &Config::default(),
        );
        assert_eq!(resolution.locale, Locale::Spanish);
        assert_eq!(resolution.source, ResolutionSource::Preference);
    }

    #[test]
    fn test_resolve_request_without_headers() {
        let resolution = resolve_request(&HeaderMap::new(), &uri("/"), &Config::default());
        assert_eq!(resolution.locale, Locale::English);
        assert_eq!(
            resolution.redirect.map(|r| r.location),
            Some("/en/".to_string())
        );
    }

    #[test]
    fn test_is_encrypted() {
        let config = Config::default();
        assert!(is_encrypted(
            &headers(&[("x-forwarded-proto", "https")]),
            &uri("/"),
            &config
        ));
        assert!(is_encrypted(
            &headers(&[("x-forwarded-proto", "HTTPS, http")]),
            &uri("/"),
            &config
        ));
        assert!(!is_encrypted(
            &headers(&[("x-forwarded-proto", "http")]),
            &uri("/"),
            &config
        ));
        assert!(!is_encrypted(&HeaderMap::new(), &uri("/"), &config));
        assert!(is_encrypted(
            &HeaderMap::new(),
            &uri("https://example.com/"),
            &config
        ));
    }

    #[test]
    fn test_forwarded_proto_ignored_when_untrusted() {
        let config = Config {
            trust_forwarded_proto: false,
            ..Config::default()
        };
        assert!(!is_encrypted(
            &headers(&[("x-forwarded-proto", "https")]),
            &uri("/"),
            &config
        ));
    }
}
