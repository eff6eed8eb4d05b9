use anyhow::{bail, Context};
use serde::Deserialize;
use std::{collections::HashMap, env, str::FromStr};

// Top-level container for every setting
#[derive(Debug, Clone, Deserialize, Default)]
pub struct Config {
    pub app: AppConfig,
    pub database: DatabaseConfig,
    pub partners: PartnerConfig,
    pub circuit_breaker: CircuitBreakerConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

impl FromStr for LogFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "text" | "pretty" => Ok(LogFormat::Text),
            "json" => Ok(LogFormat::Json),
            other => bail!("unknown log format '{other}'"),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub environment: String,
    pub rust_log: String,
    pub log_format: LogFormat,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            environment: "development".to_string(),
            rust_log: "event_tickets=debug,tower_http=debug".to_string(),
            log_format: LogFormat::Text,
        }
    }
}

// Without a URL the service keeps its data in memory
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    pub url: Option<String>,
    pub pool_size: u32,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: None,
            pool_size: 20,
        }
    }
}

// Partner id -> base URL, plus the outbound timeout shared by every partner
#[derive(Debug, Clone, Deserialize)]
pub struct PartnerConfig {
    pub base_urls: HashMap<i32, String>,
    pub timeout_seconds: u64,
}

impl Default for PartnerConfig {
    fn default() -> Self {
        Self {
            base_urls: HashMap::new(),
            timeout_seconds: 10,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct CircuitBreakerConfig {
    pub failure_threshold: u32,
    pub timeout_seconds: u64,
}

impl Default for CircuitBreakerConfig {
    fn default() -> Self {
        Self {
            failure_threshold: 5,
            timeout_seconds: 60,
        }
    }
}

const DEFAULT_PARTNER_BASE_URLS: &str =
    "1=http://localhost:8000/partner1,2=http://localhost:8000/partner2";

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        let defaults = Config::default();

        Ok(Config {
            app: AppConfig {
                host: env::var("HOST").unwrap_or(defaults.app.host),
                port: parse_var("PORT", defaults.app.port)?,
                environment: env::var("ENVIRONMENT").unwrap_or(defaults.app.environment),
                rust_log: env::var("RUST_LOG").unwrap_or(defaults.app.rust_log),
                log_format: parse_var("LOG_FORMAT", defaults.app.log_format)?,
            },
            database: DatabaseConfig {
                url: env::var("DATABASE_URL").ok().filter(|url| !url.is_empty()),
                pool_size: parse_var("DB_POOL_SIZE", defaults.database.pool_size)?,
            },
            partners: PartnerConfig {
                base_urls: parse_partner_urls(
                    &env::var("PARTNER_BASE_URLS")
                        .unwrap_or_else(|_| DEFAULT_PARTNER_BASE_URLS.to_string()),
                )
                .context("PARTNER_BASE_URLS is malformed")?,
                timeout_seconds: parse_var(
                    "PARTNER_TIMEOUT_SECONDS",
                    defaults.partners.timeout_seconds,
                )?,
            },
            circuit_breaker: CircuitBreakerConfig {
                failure_threshold: parse_var(
                    "CIRCUIT_BREAKER_FAILURE_THRESHOLD",
                    defaults.circuit_breaker.failure_threshold,
                )?,
                timeout_seconds: parse_var(
                    "CIRCUIT_BREAKER_TIMEOUT_SECONDS",
                    defaults.circuit_breaker.timeout_seconds,
                )?,
            },
        })
    }
}

fn parse_var<T>(name: &str, default: T) -> anyhow::Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|e| anyhow::anyhow!("{name} must be valid: {e}")),
        Err(_) => Ok(default),
    }
}

/// Parses `"1=http://a,2=http://b"` into a partner id -> base URL map.
pub fn parse_partner_urls(raw: &str) -> anyhow::Result<HashMap<i32, String>> {
    let mut urls = HashMap::new();
    for entry in raw.split(',').map(str::trim).filter(|e| !e.is_empty()) {
        let (id, url) = entry
            .split_once('=')
            .with_context(|| format!("expected <id>=<url>, got '{entry}'"))?;
        let id: i32 = id
            .trim()
            .parse()
            .with_context(|| format!("partner id '{id}' is not an integer"))?;
        let url = url.trim().trim_end_matches('/');
        if url.is_empty() {
            bail!("partner {id} has an empty URL");
        }
        if urls.insert(id, url.to_string()).is_some() {
            bail!("partner {id} is configured twice");
        }
    }
    Ok(urls)
}
