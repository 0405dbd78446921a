//! Stored locale preference.
//!
//! An explicit locale choice is persisted client-side as a cookie. Reading
//! is lenient: anything that is not exactly a supported locale code counts
//! as no preference. Writing only ever produces a record for a valid locale.

use crate::i18n::Locale;
use std::fmt;

/// Cookie name holding the explicit locale choice.
pub const PREFERENCE_COOKIE: &str = "preferred_locale";

/// Lifetime of a preference record: one year, in seconds.
pub const PREFERENCE_MAX_AGE_SECS: u64 = 365 * 24 * 60 * 60;

/// Path scope of the preference record.
pub const PREFERENCE_PATH: &str = "/";

/// Extract a cookie value by name from a `Cookie` request header.
///
/// The first cookie with a matching name wins.
pub fn parse_cookie<'a>(header: &'a str, name: &str) -> Option<&'a str> {
    header.split(';').find_map(|part| {
        let (key, value) = part.trim().split_once('=')?;
        (key.trim() == name).then(|| value.trim().trim_matches('"'))
    })
}

/// Read the stored preference from a `Cookie` request header.
///
/// Returns `None` for a missing cookie or any value that is not exactly a
/// supported locale code (case-sensitive).
pub fn read_preference(cookie_header: Option<&str>) -> Option<Locale> {
    let value = parse_cookie(cookie_header?, PREFERENCE_COOKIE)?;
    Locale::from_code(value)
}

/// Cross-site policy for the preference cookie.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SameSite {
    Lax,
}

impl fmt::Display for SameSite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SameSite::Lax => f.write_str("Lax"),
        }
    }
}

/// A durable preference record, ready to be sent as `Set-Cookie`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreferenceRecord {
    pub locale: Locale,
    pub max_age_secs: u64,
    pub path: &'static str,
    pub same_site: SameSite,
    /// Set only when the response travels over an encrypted channel
    pub secure: bool,
}

impl PreferenceRecord {
    /// Build the record for an explicit locale choice.
    pub fn new(locale: Locale, secure: bool) -> Self {
        Self {
            locale,
            max_age_secs: PREFERENCE_MAX_AGE_SECS,
            path: PREFERENCE_PATH,
            same_site: SameSite::Lax,
            secure,
        }
    }

    /// Build the record from a submitted locale code.
    ///
    /// Returns `None` for anything that is not a supported locale code, so
    /// invalid state is never persisted.
    pub fn from_code(code: &str, secure: bool) -> Option<Self> {
        Locale::from_code(code).map(|locale| Self::new(locale, secure))
    }

    /// Render the `Set-Cookie` header value.
    pub fn to_header_value(&self) -> String {
        let secure = if self.secure { "; Secure" } else { "" };
        format!(
            "{PREFERENCE_COOKIE}={}; Max-Age={}; Path={}; SameSite={}{secure}",
            self.locale.code(),
            self.max_age_secs,
            self.path,
            self.same_site,
        )
    }
}

impl fmt::Display for PreferenceRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_header_value())
    }
}
