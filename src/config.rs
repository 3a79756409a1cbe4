use std::env;
use std::time::Duration;

const DEFAULT_API_BASE: &str = "https://api.gamelayer.co/api/v0";
const DEFAULT_ACCOUNT: &str = "new-account-content";
const DEFAULT_EVENT_ID: &str = "complete-mission";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthMode {
    None,
    Local,
    Link,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub api_base: String,
    pub account: String,
    pub api_key: String,
    pub player_id: Option<String>,
    pub default_event: String,
    pub request_timeout: Duration,
    pub cache_ttl: Duration,
    pub flash_duration: Duration,
    pub auth_mode: AuthMode,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_string(),
            account: DEFAULT_ACCOUNT.to_string(),
            api_key: String::new(),
            player_id: None,
            default_event: DEFAULT_EVENT_ID.to_string(),
            request_timeout: Duration::from_secs(10),
            cache_ttl: Duration::from_secs(300),
            flash_duration: Duration::from_secs(3),
            auth_mode: AuthMode::None,
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        let api_base = string_env("GAMELAYER_API_BASE")
            .map(|base| base.trim_end_matches('/').to_string())
            .unwrap_or(defaults.api_base);
        let timeout_secs = u64_env("GAMELAYER_TIMEOUT_SECS").unwrap_or(10).max(1);
        let cache_ttl_secs = u64_env("CACHE_TTL_SECS").unwrap_or(300);
        let flash_secs = u64_env("FLASH_SECS").unwrap_or(3).max(1);

        Self {
            api_base,
            account: string_env("GAMELAYER_ACCOUNT").unwrap_or(defaults.account),
            api_key: string_env("GAMELAYER_API_KEY").unwrap_or_default(),
            player_id: string_env("GAMELAYER_PLAYER_ID"),
            default_event: string_env("GAMELAYER_DEFAULT_EVENT").unwrap_or(defaults.default_event),
            request_timeout: Duration::from_secs(timeout_secs),
            cache_ttl: Duration::from_secs(cache_ttl_secs),
            flash_duration: Duration::from_secs(flash_secs),
            auth_mode: string_env("AUTH_MODE")
                .map(|raw| parse_auth_mode(&raw))
                .unwrap_or(AuthMode::None),
        }
    }
}

pub fn parse_auth_mode(raw: &str) -> AuthMode {
    match raw.trim().to_ascii_lowercase().as_str() {
        "local" => AuthMode::Local,
        "link" | "email_link" | "email-link" => AuthMode::Link,
        _ => AuthMode::None,
    }
}

fn string_env(key: &str) -> Option<String> {
    env::var(key)
        .ok()
        .map(|val| val.trim().to_string())
        .filter(|val| !val.is_empty())
}

fn u64_env(key: &str) -> Option<u64> {
    env::var(key).ok().and_then(|val| val.trim().parse::<u64>().ok())
}
