use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{name} must be a valid {expected}, got '{value}'")]
    Invalid {
        name: &'static str,
        expected: &'static str,
        value: String,
    },

    #[error("SITE_BASE_URL must start with http:// or https://, got '{0}'")]
    BaseUrl(String),
}

#[derive(Debug, Clone)]
pub struct Config {
    // Server
    pub host: String,
    pub port: u16,

    // Absolute origin used for alternate links
    pub site_base_url: String,

    // Request header carrying the upstream-inferred territory code
    pub territory_header: String,

    // Treat `x-forwarded-proto: https` as an encrypted channel
    pub trust_forwarded_proto: bool,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build the config from any variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let port = match lookup("PORT") {
            Some(value) => value.trim().parse().map_err(|_| ConfigError::Invalid {
                name: "PORT",
                expected: "port number",
                value,
            })?,
            None => 8080,
        };

        let site_base_url = lookup("SITE_BASE_URL")
            .unwrap_or_else(|| format!("http://localhost:{}", port))
            .trim()
            .trim_end_matches('/')
            .to_string();
        if !(site_base_url.starts_with("http://") || site_base_url.starts_with("https://")) {
            return Err(ConfigError::BaseUrl(site_base_url));
        }

        let trust_forwarded_proto = match lookup("TRUST_FORWARDED_PROTO") {
            Some(value) => parse_bool(&value).ok_or(ConfigError::Invalid {
                name: "TRUST_FORWARDED_PROTO",
                expected: "boolean",
                value,
            })?,
            None => true,
        };

        Ok(Self {
            // Server
            host: lookup("HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            port,

            site_base_url,

            territory_header: lookup("TERRITORY_HEADER")
                .map(|name| name.trim().to_ascii_lowercase())
                .filter(|name| !name.is_empty())
                .unwrap_or_else(|| "cf-ipcountry".to_string()),

            trust_forwarded_proto,
        })
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            site_base_url: "http://localhost:8080".to_string(),
            territory_header: "cf-ipcountry".to_string(),
            trust_forwarded_proto: true,
        }
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
