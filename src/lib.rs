//! Locale resolution and redirect decisions for a multilingual site.
//!
//! The `i18n` module holds the pure resolution engine; `middleware` and
//! `server` put it in front of an axum router.

pub mod config;
pub mod i18n;
pub mod middleware;
pub mod server;
