//! Runtime configuration.
//!
//! Built once at startup from the process environment (after loading an
//! optional `.env` file) and passed by reference to everything that needs it.

use std::str::FromStr;
use std::time::Duration;

use crate::error::{SieveError, SieveResult};

/// Default chat-completions endpoint.
pub const DEFAULT_OPENAI_URL: &str = "https://api.openai.com/v1/chat/completions";

/// Default classification model.
pub const DEFAULT_MODEL: &str = "gpt-4";

/// Output token cap for a classification reply.
pub const DEFAULT_MAX_TOKENS: u32 = 50;

pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_MAX_CONCURRENCY: usize = 8;
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_MAX_REDIRECTS: usize = 10;

/// Runtime mode. Development mode turns on verbose diagnostic logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RunMode {
    Development,
    #[default]
    Production,
}

impl RunMode {
    pub fn is_development(self) -> bool {
        self == RunMode::Development
    }

    fn parse(value: &str) -> Self {
        match value.trim().to_lowercase().as_str() {
            "development" | "dev" => RunMode::Development,
            _ => RunMode::Production,
        }
    }
}

/// Settings for the chat-completion classifier.
#[derive(Debug, Clone)]
pub struct ClassifierConfig {
    pub api_key: String,
    pub api_url: String,
    pub model: String,
    pub max_tokens: u32,
    pub timeout: Duration,
}

/// Settings for outbound page fetches.
#[derive(Debug, Clone)]
pub struct FetchConfig {
    pub timeout: Duration,
    pub max_redirects: usize,
    pub user_agent: String,
}

/// Application configuration.
#[derive(Debug, Clone)]
pub struct Config {
    pub mode: RunMode,
    pub host: String,
    pub port: u16,
    pub max_concurrency: usize,
    pub classifier: ClassifierConfig,
    pub fetch: FetchConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            mode: RunMode::default(),
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            max_concurrency: DEFAULT_MAX_CONCURRENCY,
            classifier: ClassifierConfig {
                api_key: String::new(),
                api_url: DEFAULT_OPENAI_URL.to_string(),
                model: DEFAULT_MODEL.to_string(),
                max_tokens: DEFAULT_MAX_TOKENS,
                timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            },
            fetch: FetchConfig {
                timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
                max_redirects: DEFAULT_MAX_REDIRECTS,
                user_agent: concat!("sieve/", env!("CARGO_PKG_VERSION")).to_string(),
            },
        }
    }
}

impl Config {
    /// Load configuration from `.env` (if present) and the process environment.
    pub fn from_env() -> SieveResult<Self> {
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> SieveResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Config::default();
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let max_concurrency = parse_or(&get, "SIEVE_MAX_CONCURRENCY", defaults.max_concurrency)?;
        if max_concurrency == 0 {
            return Err(SieveError::config("SIEVE_MAX_CONCURRENCY must be at least 1"));
        }

        Ok(Self {
            mode: get("SIEVE_ENV")
                .or_else(|| get("NODE_ENV"))
                .map(|v| RunMode::parse(&v))
                .unwrap_or_default(),
            host: get("SIEVE_HOST").unwrap_or(defaults.host),
            port: parse_or(&get, "PORT", defaults.port)?,
            max_concurrency,
            classifier: ClassifierConfig {
                api_key: get("OPENAI_API_KEY").unwrap_or_default(),
                api_url: get("OPENAI_API_URL").unwrap_or(defaults.classifier.api_url),
                model: get("OPENAI_MODEL").unwrap_or(defaults.classifier.model),
                max_tokens: parse_or(&get, "OPENAI_MAX_TOKENS", defaults.classifier.max_tokens)?,
                timeout: Duration::from_secs(parse_or(
                    &get,
                    "SIEVE_CLASSIFY_TIMEOUT_SECS",
                    DEFAULT_TIMEOUT_SECS,
                )?),
            },
            fetch: FetchConfig {
                timeout: Duration::from_secs(parse_or(
                    &get,
                    "SIEVE_FETCH_TIMEOUT_SECS",
                    DEFAULT_TIMEOUT_SECS,
                )?),
                max_redirects: parse_or(&get, "SIEVE_MAX_REDIRECTS", defaults.fetch.max_redirects)?,
                user_agent: defaults.fetch.user_agent,
            },
        })
    }

    /// Base URL of the locally running server.
    pub fn server_url(&self) -> String {
        format!("http://{}:{}", self.host, self.port)
    }
}

fn parse_or<T, G>(get: &G, key: &str, default: T) -> SieveResult<T>
where
    T: FromStr,
    G: Fn(&str) -> Option<String>,
{
    match get(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| SieveError::config(format!("invalid value for {}: '{}'", key, raw))),
        None => Ok(default),
    }
}
