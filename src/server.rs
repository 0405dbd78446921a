//! HTTP surface: localized pages, the preference endpoint and a few
//! read-only API routes.

use crate::config::Config;
use crate::i18n::{
    escape_attribute, strip_locale_prefix, AlternateLinks, Locale, LocaleConfig, LocaleRegistry, MetricsReport,
    PreferenceRecord, ResolutionMetrics,
};
use crate::middleware::{is_encrypted, locale_layer, ResolvedLocale};
use anyhow::Result;
use axum::{
    extract::{Extension, State},
    http::{header, HeaderMap, HeaderValue, StatusCode, Uri},
    middleware,
    response::{Html, IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, warn};

/// Build the application router.
pub fn router(config: Config) -> Router {
    let state = Arc::new(config);

    Router::new()
        .route("/health", get(health))
        .route("/api/locales", get(list_locales))
        .route("/api/metrics", get(metrics))
        .route("/api/preference", post(set_preference))
        .route("/", get(page))
        .route("/*path", get(page))
        .layer(middleware::from_fn_with_state(state.clone(), locale_layer))
        .with_state(state)
        // Logging layer: method + path only (no query params, no client headers)
        .layer(
            tower_http::trace::TraceLayer::new_for_http().make_span_with(
                |request: &axum::http::Request<_>| {
                    tracing::info_span!(
                        "http_request",
                        method = %request.method(),
                        path = %request.uri().path(),
                    )
                },
            ),
        )
}

/// Bind and serve until the process is stopped.
pub async fn serve(config: Config) -> Result<()> {
    let addr = format!("{}:{}", config.host, config.port);
    let app = router(config);

    info!("Locale router listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

// ==================== Handlers ====================

async fn health() -> &'static str {
    "ok"
}

async fn list_locales() -> Json<Vec<&'static LocaleConfig>> {
    Json(LocaleRegistry::get().list_all())
}

async fn metrics() -> Json<MetricsReport> {
    Json(ResolutionMetrics::global().report())
}

#[derive(Debug, Deserialize)]
struct PreferenceRequest {
    locale: String,
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
}

/// Persist an explicit locale choice.
async fn set_preference(
    State(config): State<Arc<Config>>,
    headers: HeaderMap,
    uri: Uri,
    Json(body): Json<PreferenceRequest>,
) -> Response {
    let secure = is_encrypted(&headers, &uri, &config);

    let Some(record) = PreferenceRecord::from_code(&body.locale, secure) else {
        warn!("Rejected preference for unsupported locale '{}'", body.locale);
        return (
            StatusCode::BAD_REQUEST,
            Json(ErrorBody {
                error: format!("unsupported locale '{}'", body.locale),
            }),
        )
            .into_response();
    };

    match HeaderValue::from_str(&record.to_header_value()) {
        Ok(cookie) => {
            ResolutionMetrics::global().record_preference_written();
            info!("Stored locale preference: {}", record.locale);
            (StatusCode::NO_CONTENT, [(header::SET_COOKIE, cookie)]).into_response()
        }
        Err(e) => {
            warn!("Preference record is not a valid header value: {}", e);
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

/// Render the head of a localized page.
///
/// Locale-prefixed paths render in that locale. Unprefixed paths only get
/// here when resolution chose not to redirect (crawlers), and render in the
/// resolved locale.
async fn page(
    State(config): State<Arc<Config>>,
    resolved: Option<Extension<ResolvedLocale>>,
    uri: Uri,
) -> Html<String> {
    let (prefix, page_path) = strip_locale_prefix(uri.path());
    let locale = prefix
        .or(resolved.map(|Extension(ResolvedLocale(locale))| locale))
        .unwrap_or(Locale::DEFAULT);

    Html(render_page(locale, page_path, &config.site_base_url))
}

fn render_page(locale: Locale, page_path: &str, base_url: &str) -> String {
    let config = locale.config();
    let alternates = AlternateLinks::generate(locale, page_path, base_url);
    let canonical = alternates.canonical().unwrap_or_default();

    let picker: String = LocaleRegistry::get()
        .list_all()
        .iter()
        .map(|entry| {
            let href = format!(
                "/{}{}",
                entry.locale.code(),
                if page_path == "/" { "" } else { page_path }
            );
            format!(
                r#"<li><a href="{}" hreflang="{}">{} {}</a></li>"#,
                escape_attribute(&href),
                entry.seo_tag,
                entry.icon,
                escape_attribute(entry.native_name)
            )
        })
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        r#"<!DOCTYPE html>
<html lang="{lang}">
<head>
<meta charset="utf-8">
<title>{name}</title>
<link rel="canonical" href="{canonical}" />
{alternates}
</head>
<body>
<ul class="locale-picker">
{picker}
</ul>
</body>
</html>
"#,
        lang = config.seo_tag,
        name = config.native_name,
        canonical = canonical,
        alternates = alternates.to_html(),
        picker = picker,
    )
}
