//! Resolution metrics and observability module.
//!
//! Counts how requests were resolved (which tier of the chain won) and how
//! many were redirected. Recorded by the HTTP layer; the resolver itself
//! stays free of side effects.

use crate::i18n::{Resolution, ResolutionSource};
use serde::Serialize;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::OnceLock;

/// Global resolution metrics singleton.
pub struct ResolutionMetrics {
    crawler: AtomicUsize,
    path_locale: AtomicUsize,
    preference: AtomicUsize,
    territory: AtomicUsize,
    accept_language: AtomicUsize,
    default: AtomicUsize,

    /// Number of 302 responses issued
    redirects: AtomicUsize,

    /// Number of preference records written
    preferences_written: AtomicUsize,
}

/// Global metrics instance (initialized lazily)
static METRICS: OnceLock<ResolutionMetrics> = OnceLock::new();

impl ResolutionMetrics {
    /// Get the global resolution metrics instance.
    pub fn global() -> &'static ResolutionMetrics {
        METRICS.get_or_init(|| ResolutionMetrics {
            crawler: AtomicUsize::new(0),
            path_locale: AtomicUsize::new(0),
            preference: AtomicUsize::new(0),
            territory: AtomicUsize::new(0),
            accept_language: AtomicUsize::new(0),
            default: AtomicUsize::new(0),
            redirects: AtomicUsize::new(0),
            preferences_written: AtomicUsize::new(0),
        })
    }

    fn counter(&self, source: ResolutionSource) -> &AtomicUsize {
        match source {
            ResolutionSource::Crawler => &self.crawler,
            ResolutionSource::PathLocale => &self.path_locale,
            ResolutionSource::Preference => &self.preference,
            ResolutionSource::Territory => &self.territory,
            ResolutionSource::AcceptLanguage => &self.accept_language,
            ResolutionSource::Default => &self.default,
        }
    }

    /// Record one resolved request.
    pub fn record(&self, resolution: &Resolution) {
        self.counter(resolution.source).fetch_add(1, Ordering::Relaxed);
        if resolution.should_redirect() {
            self.redirects.fetch_add(1, Ordering::Relaxed);
        }
    }

    /// Record a preference record sent to a client.
    pub fn record_preference_written(&self) {
        self.preferences_written.fetch_add(1, Ordering::Relaxed);
    }

    /// Number of requests resolved by a given tier.
    pub fn resolved_by(&self, source: ResolutionSource) -> usize {
        self.counter(source).load(Ordering::Relaxed)
    }

    pub fn redirects(&self) -> usize {
        self.redirects.load(Ordering::Relaxed)
    }

    pub fn preferences_written(&self) -> usize {
        self.preferences_written.load(Ordering::Relaxed)
    }

    /// Generate a metrics report.
    pub fn report(&self) -> MetricsReport {
        let crawler = self.resolved_by(ResolutionSource::Crawler);
        let path_locale = self.resolved_by(ResolutionSource::PathLocale);
        let preference = self.resolved_by(ResolutionSource::Preference);
        let territory = self.resolved_by(ResolutionSource::Territory);
        let accept_language = self.resolved_by(ResolutionSource::AcceptLanguage);
        let default = self.resolved_by(ResolutionSource::Default);

        let total = crawler + path_locale + preference + territory + accept_language + default;
        let redirects = self.redirects();
        let redirect_rate = if total > 0 {
            (redirects as f64 / total as f64) * 100.0
        } else {
            0.0
        };

        MetricsReport {
            total,
            crawler,
            path_locale,
            preference,
            territory,
            accept_language,
            default,
            redirects,
            redirect_rate,
            preferences_written: self.preferences_written(),
        }
    }

    /// Reset all metrics to zero (useful for testing).
    #[cfg(test)]
    pub fn reset(&self) {
        for counter in [
            &self.crawler,
            &self.path_locale,
            &self.preference,
            &self.territory,
            &self.accept_language,
            &self.default,
            &self.redirects,
            &self.preferences_written,
        ] {
            counter.store(0, Ordering::Relaxed);
        }
    }
}

/// Metrics report containing current resolution statistics.
#[derive(Debug, Clone, Serialize)]
pub struct MetricsReport {
    /// Number of resolved requests
    pub total: usize,

    pub crawler: usize,
    pub path_locale: usize,
    pub preference: usize,
    pub territory: usize,
    pub accept_language: usize,
    pub default: usize,

    /// Number of redirects issued
    pub redirects: usize,

    /// Redirects as a percentage of resolved requests (0-100)
    pub redirect_rate: f64,

    pub preferences_written: usize,
}
