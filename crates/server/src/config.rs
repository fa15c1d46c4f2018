use std::{
    collections::HashMap,
    fs,
    net::{AddrParseError, SocketAddr},
    path::PathBuf,
    time::Duration,
};

use thiserror::Error;
use tracing::warn;

pub const SETTINGS_FILE: &str = "server.toml";
pub const MAX_PAGE_SIZE: usize = 50;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid bind address {value:?}: {source}")]
    InvalidBindAddr {
        value: String,
        source: AddrParseError,
    },
}

#[derive(Debug, Clone)]
pub struct Settings {
    pub server_bind: String,
    pub static_dir: PathBuf,
    pub page_size: usize,
    pub search_delay_ms: u64,
    pub scroll_delay_ms: u64,
    pub submit_delay_ms: u64,
    pub sse_updates: u32,
    pub sse_interval_ms: u64,
    pub max_slow_load_secs: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            server_bind: "127.0.0.1:5000".into(),
            static_dir: PathBuf::from("static"),
            page_size: 10,
            search_delay_ms: 300,
            scroll_delay_ms: 500,
            submit_delay_ms: 1000,
            sse_updates: 10,
            sse_interval_ms: 1000,
            max_slow_load_secs: 10,
        }
    }
}

impl Settings {
    /// Settings with every simulated delay removed.
    #[cfg(test)]
    pub fn instant() -> Self {
        Self {
            search_delay_ms: 0,
            scroll_delay_ms: 0,
            submit_delay_ms: 0,
            sse_interval_ms: 1,
            max_slow_load_secs: 0,
            ..Self::default()
        }
    }

    pub fn bind_addr(&self) -> Result<SocketAddr, ConfigError> {
        self.server_bind
            .parse()
            .map_err(|source| ConfigError::InvalidBindAddr {
                value: self.server_bind.clone(),
                source,
            })
    }

    pub fn search_delay(&self) -> Duration {
        Duration::from_millis(self.search_delay_ms)
    }

    pub fn scroll_delay(&self) -> Duration {
        Duration::from_millis(self.scroll_delay_ms)
    }

    pub fn submit_delay(&self) -> Duration {
        Duration::from_millis(self.submit_delay_ms)
    }

    /// Never zero: a zero period would stall the SSE ticker.
    pub fn sse_interval(&self) -> Duration {
        Duration::from_millis(self.sse_interval_ms.max(1))
    }

    pub fn clamp_page_size(&self, requested: Option<usize>) -> usize {
        requested
            .unwrap_or(self.page_size)
            .clamp(1, MAX_PAGE_SIZE)
    }

    pub fn clamp_slow_load(&self, requested_secs: u64) -> Duration {
        Duration::from_secs(requested_secs.min(self.max_slow_load_secs))
    }
}

pub fn load_settings() -> Settings {
    let raw_file = fs::read_to_string(SETTINGS_FILE).ok();
    settings_from_sources(raw_file.as_deref(), |key| std::env::var(key).ok())
}

/// Defaults, then the flat `server.toml` table, then environment overrides.
pub fn settings_from_sources(
    raw_file: Option<&str>,
    env: impl Fn(&str) -> Option<String>,
) -> Settings {
    let mut settings = Settings::default();

    if let Some(raw) = raw_file {
        match toml::from_str::<HashMap<String, toml::Value>>(raw) {
            Ok(file_cfg) => {
                for (key, value) in file_cfg {
                    let value = match value {
                        toml::Value::String(s) => s,
                        other => other.to_string(),
                    };
                    apply(&mut settings, &key, &value);
                }
            }
            Err(error) => warn!(%error, file = SETTINGS_FILE, "ignoring unreadable settings file"),
        }
    }

    for (env_key, key) in ENV_KEYS {
        if let Some(value) = env(env_key) {
            apply(&mut settings, key, &value);
        }
    }

    settings
}

/// Later entries win, so `APP__BIND_ADDR` overrides `SERVER_BIND`.
const ENV_KEYS: [(&str, &str); 10] = [
    ("SERVER_BIND", "bind_addr"),
    ("APP__BIND_ADDR", "bind_addr"),
    ("APP__STATIC_DIR", "static_dir"),
    ("APP__PAGE_SIZE", "page_size"),
    ("APP__SEARCH_DELAY_MS", "search_delay_ms"),
    ("APP__SCROLL_DELAY_MS", "scroll_delay_ms"),
    ("APP__SUBMIT_DELAY_MS", "submit_delay_ms"),
    ("APP__SSE_UPDATES", "sse_updates"),
    ("APP__SSE_INTERVAL_MS", "sse_interval_ms"),
    ("APP__MAX_SLOW_LOAD_SECS", "max_slow_load_secs"),
];

fn apply(settings: &mut Settings, key: &str, value: &str) {
    let value = value.trim();
    match key {
        "bind_addr" => settings.server_bind = value.to_string(),
        "static_dir" => settings.static_dir = PathBuf::from(value),
        "page_size" => set_parsed(&mut settings.page_size, key, value),
        "search_delay_ms" => set_parsed(&mut settings.search_delay_ms, key, value),
        "scroll_delay_ms" => set_parsed(&mut settings.scroll_delay_ms, key, value),
        "submit_delay_ms" => set_parsed(&mut settings.submit_delay_ms, key, value),
        "sse_updates" => set_parsed(&mut settings.sse_updates, key, value),
        "sse_interval_ms" => set_parsed(&mut settings.sse_interval_ms, key, value),
        "max_slow_load_secs" => set_parsed(&mut settings.max_slow_load_secs, key, value),
        _ => warn!(key, "ignoring unknown setting"),
    }
}

fn set_parsed<T: std::str::FromStr>(slot: &mut T, key: &str, value: &str) {
    match value.parse() {
        Ok(parsed) => *slot = parsed,
        Err(_) => warn!(key, value, "ignoring invalid numeric setting"),
    }
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
