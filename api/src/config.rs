use std::env;

use log::LevelFilter;

const DEFAULT_KEYDB_URL: &str = "redis://127.0.0.1:5556/";
const DEFAULT_BIND_ADDR: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 5554;
const DEFAULT_LOG_FILE: &str = "api.log";

/// Where player records are kept.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreKind {
    KeyDb,
    Memory,
}

/// Runtime settings, read from `API_*` environment variables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    pub log_level: LevelFilter,
    pub log_file: Option<String>,
    pub bind_addr: String,
    pub port: u16,
    pub store: StoreKind,
    pub keydb_url: String,
    pub tls_cert: Option<String>,
    pub tls_key: Option<String>,
}

fn parse_log_level(value: &str) -> Option<LevelFilter> {
    match value.to_lowercase().as_str() {
        "off" => Some(LevelFilter::Off),
        "error" => Some(LevelFilter::Error),
        "warn" | "warning" => Some(LevelFilter::Warn),
        "info" => Some(LevelFilter::Info),
        "debug" => Some(LevelFilter::Debug),
        "trace" => Some(LevelFilter::Trace),
        _ => None,
    }
}

fn parse_store_kind(value: &str) -> Option<StoreKind> {
    match value.trim().to_lowercase().as_str() {
        "keydb" | "redis" => Some(StoreKind::KeyDb),
        "memory" => Some(StoreKind::Memory),
        _ => None,
    }
}

fn resolve_log_file(value: Option<String>) -> Option<String> {
    match value {
        Some(value) => {
            let trimmed = value.trim();
            if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("none") {
                None
            } else {
                Some(trimmed.to_string())
            }
        }
        None => Some(DEFAULT_LOG_FILE.to_string()),
    }
}

impl ApiConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary variable lookup.
    /// Unset or unparseable values fall back to their defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        Self {
            log_level: lookup("API_LOG_LEVEL")
                .as_deref()
                .and_then(parse_log_level)
                .unwrap_or(LevelFilter::Info),
            log_file: resolve_log_file(lookup("API_LOG_FILE")),
            bind_addr: lookup("API_BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string()),
            port: lookup("API_PORT")
                .and_then(|value| value.parse::<u16>().ok())
                .unwrap_or(DEFAULT_PORT),
            store: lookup("API_STORE")
                .as_deref()
                .and_then(parse_store_kind)
                .unwrap_or(StoreKind::KeyDb),
            keydb_url: lookup("API_KEYDB_URL").unwrap_or_else(|| DEFAULT_KEYDB_URL.to_string()),
            tls_cert: lookup("API_TLS_CERT"),
            tls_key: lookup("API_TLS_KEY"),
        }
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.bind_addr, self.port)
    }
}
