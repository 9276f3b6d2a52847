//! Server configuration read from the environment (and `.env`).

use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use crate::session::DEFAULT_PAGE_SIZE;

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 8080;
const DEFAULT_SESSION_TTL_SECS: u64 = 60 * 60; // 1 hour
const DEFAULT_MAX_SESSIONS: u64 = 10_000;
const DEFAULT_ALLOWED_ORIGINS: &[&str] = &[
    "http://localhost:5173",
    "http://localhost:3000",
    "http://localhost:8080",
    "http://127.0.0.1:8080",
];

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub page_size: usize,
    pub generation_delay: Duration,
    pub session_ttl: Duration,
    pub max_sessions: u64,
    /// Catalog JSON replacing the bundled one.
    pub catalog_path: Option<PathBuf>,
    /// Directory the saved collection is persisted to. In-memory only when unset.
    pub saved_documents_path: Option<PathBuf>,
    pub allowed_origins: Vec<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            page_size: DEFAULT_PAGE_SIZE,
            generation_delay: Duration::ZERO,
            session_ttl: Duration::from_secs(DEFAULT_SESSION_TTL_SECS),
            max_sessions: DEFAULT_MAX_SESSIONS,
            catalog_path: None,
            saved_documents_path: None,
            allowed_origins: DEFAULT_ALLOWED_ORIGINS
                .iter()
                .map(|origin| origin.to_string())
                .collect(),
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from any key lookup. Malformed values fall back to defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();

        let page_size = match parse_or(&lookup, "PAGE_SIZE", defaults.page_size) {
            0 => {
                log::warn!("PAGE_SIZE must be at least 1, using {}", DEFAULT_PAGE_SIZE);
                DEFAULT_PAGE_SIZE
            }
            size => size,
        };

        let allowed_origins = lookup("ALLOWED_ORIGINS")
            .map(|raw| {
                raw.split(',')
                    .map(str::trim)
                    .filter(|origin| !origin.is_empty())
                    .map(String::from)
                    .collect::<Vec<_>>()
            })
            .filter(|origins| !origins.is_empty())
            .unwrap_or(defaults.allowed_origins);

        Self {
            host: lookup("HOST")
                .filter(|host| !host.trim().is_empty())
                .unwrap_or(defaults.host),
            port: parse_or(&lookup, "PORT", defaults.port),
            page_size,
            generation_delay: Duration::from_millis(parse_or(&lookup, "GENERATION_DELAY_MS", 0)),
            session_ttl: Duration::from_secs(parse_or(
                &lookup,
                "SESSION_TTL_SECS",
                DEFAULT_SESSION_TTL_SECS,
            )),
            max_sessions: parse_or(&lookup, "MAX_SESSIONS", defaults.max_sessions),
            catalog_path: non_empty_path(&lookup, "CATALOG_PATH"),
            saved_documents_path: non_empty_path(&lookup, "SAVED_DOCUMENTS_PATH"),
            allowed_origins,
        }
    }
}

fn parse_or<T: FromStr + Copy + std::fmt::Display>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: T,
) -> T {
    match lookup(key) {
        Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
            log::warn!("Invalid value '{}' for {}, using default {}", raw, key, default);
            default
        }),
        None => default,
    }
}

fn non_empty_path(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<PathBuf> {
    lookup(key)
        .filter(|value| !value.trim().is_empty())
        .map(PathBuf::from)
}
