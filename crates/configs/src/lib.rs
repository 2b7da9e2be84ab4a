//! Application configuration.
//!
//! Values come from `config.toml` (path overridable through `CONFIG_PATH`)
//! and are then overlaid with environment variables, so a deployment can run
//! from environment alone.

use std::path::Path;

use anyhow::{anyhow, Result};
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default)]
    pub worker_threads: Option<usize>,
    /// Per-request deadline; 0 disables it.
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            worker_threads: None,
            request_timeout_secs: default_request_timeout(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// Full connection URL. When empty the URL is assembled from the parts below.
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub host: String,
    #[serde(default = "default_db_port")]
    pub port: u16,
    #[serde(default)]
    pub user: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub name: String,
    #[serde(default = "default_true")]
    pub encrypt: bool,
    #[serde(default)]
    pub trust_server_certificate: bool,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,
    #[serde(default = "default_idle_timeout")]
    pub idle_timeout_secs: u64,
    #[serde(default = "default_max_lifetime")]
    pub max_lifetime_secs: u64,
    #[serde(default = "default_acquire_timeout")]
    pub acquire_timeout_secs: u64,
    #[serde(default)]
    pub sqlx_logging: bool,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            host: String::new(),
            port: default_db_port(),
            user: String::new(),
            password: String::new(),
            name: String::new(),
            encrypt: true,
            trust_server_certificate: false,
            max_connections: default_max_connections(),
            min_connections: default_min_connections(),
            connect_timeout_secs: default_connect_timeout(),
            idle_timeout_secs: default_idle_timeout(),
            max_lifetime_secs: default_max_lifetime(),
            acquire_timeout_secs: default_acquire_timeout(),
            sqlx_logging: false,
        }
    }
}

fn default_host() -> String { "0.0.0.0".into() }
fn default_port() -> u16 { 3000 }
fn default_request_timeout() -> u64 { 30 }
fn default_db_port() -> u16 { 5432 }
fn default_true() -> bool { true }
fn default_max_connections() -> u32 { 10 }
fn default_min_connections() -> u32 { 1 }
fn default_connect_timeout() -> u64 { 30 }
fn default_idle_timeout() -> u64 { 600 }
fn default_max_lifetime() -> u64 { 3600 }
fn default_acquire_timeout() -> u64 { 30 }

pub fn config_path() -> String {
    std::env::var("CONFIG_PATH").unwrap_or_else(|_| "config.toml".to_string())
}

pub fn load_from_file(path: &str) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path)?;
    let cfg: AppConfig = toml::from_str(&content)?;
    Ok(cfg)
}

impl AppConfig {
    /// Load `config.toml` when present, overlay the process environment and validate.
    pub fn load_and_validate() -> Result<Self> {
        let path = config_path();
        let mut cfg = if Path::new(&path).exists() {
            load_from_file(&path)?
        } else {
            AppConfig::default()
        };
        cfg.apply_env(|key| std::env::var(key).ok());
        cfg.normalize_and_validate()?;
        Ok(cfg)
    }

    /// Overlay values found through `lookup`; unset or blank variables are ignored.
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        self.server.apply_env(&get);
        self.database.apply_env(&get);
    }

    pub fn normalize_and_validate(&mut self) -> Result<()> {
        self.server.normalize()?;
        self.database.validate()?;
        Ok(())
    }
}

impl ServerConfig {
    fn apply_env(&mut self, get: &dyn Fn(&str) -> Option<String>) {
        if let Some(host) = get("SERVER_HOST") {
            self.host = host;
        }
        // PORT 优先于 SERVER_PORT
        if let Some(port) = get("PORT").or_else(|| get("SERVER_PORT")).and_then(|p| p.trim().parse().ok()) {
            self.port = port;
        }
        if let Some(w) = get("TOKIO_WORKER_THREADS").and_then(|v| v.trim().parse().ok()) {
            self.worker_threads = Some(w);
        }
        if let Some(t) = get("REQUEST_TIMEOUT_SECS").and_then(|v| v.trim().parse().ok()) {
            self.request_timeout_secs = t;
        }
    }

    fn normalize(&mut self) -> Result<()> {
        if self.host.trim().is_empty() {
            self.host = default_host();
        }
        if self.port == 0 {
            return Err(anyhow!("server.port must be in 1..=65535"));
        }
        if self.worker_threads == Some(0) {
            self.worker_threads = None;
        }
        Ok(())
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl DatabaseConfig {
    /// In-memory SQLite with a single pooled connection, so every query sees the same database.
    ///
    /// For tests only: the database lives inside that one connection and is gone
    /// once the pool retires it (`idle_timeout_secs`, `max_lifetime_secs`). Local
    /// runs should point `DATABASE_URL` at a SQLite file instead.
    pub fn sqlite_memory() -> Self {
        Self {
            url: "sqlite::memory:".into(),
            max_connections: 1,
            min_connections: 1,
            ..Self::default()
        }
    }

    fn apply_env(&mut self, get: &dyn Fn(&str) -> Option<String>) {
        if let Some(url) = get("DATABASE_URL") {
            self.url = url;
        }
        if let Some(host) = get("DB_HOST") {
            self.host = host;
        }
        if let Some(port) = get("DB_PORT").and_then(|p| p.trim().parse().ok()) {
            self.port = port;
        }
        if let Some(user) = get("DB_USER") {
            self.user = user;
        }
        if let Some(password) = get("DB_PASSWORD") {
            self.password = password;
        }
        if let Some(name) = get("DB_NAME") {
            self.name = name;
        }
        if let Some(v) = get("DB_ENCRYPT").and_then(|v| parse_flag(&v)) {
            self.encrypt = v;
        }
        if let Some(v) = get("DB_TRUST_SERVER_CERTIFICATE").and_then(|v| parse_flag(&v)) {
            self.trust_server_certificate = v;
        }
        if let Some(v) = get("DB_MAX_CONNECTIONS").and_then(|v| v.trim().parse().ok()) {
            self.max_connections = v;
        }
    }

    /// Whether the URL names an in-memory SQLite database.
    pub fn is_in_memory(&self) -> bool {
        let url = self.url.trim().to_ascii_lowercase();
        url.starts_with("sqlite:") && (url.contains(":memory:") || url.contains("mode=memory"))
    }

    /// TLS mode derived from the encryption flags.
    pub fn ssl_mode(&self) -> &'static str {
        match (self.encrypt, self.trust_server_certificate) {
            (false, _) => "disable",
            (true, true) => "require",
            (true, false) => "verify-full",
        }
    }

    /// Connection URL: `url` verbatim when set, otherwise a postgres URL built from the parts.
    pub fn connection_url(&self) -> Result<String> {
        if !self.url.trim().is_empty() {
            return Ok(self.url.trim().to_string());
        }
        if self.host.trim().is_empty() || self.user.trim().is_empty() || self.name.trim().is_empty() {
            return Err(anyhow!(
                "database url is empty; set DATABASE_URL or DB_HOST, DB_USER and DB_NAME"
            ));
        }
        let userinfo = if self.password.is_empty() {
            encode_userinfo(&self.user)
        } else {
            format!("{}:{}", encode_userinfo(&self.user), encode_userinfo(&self.password))
        };
        Ok(format!(
            "postgres://{}@{}:{}/{}?sslmode={}",
            userinfo,
            self.host.trim(),
            self.port,
            self.name.trim(),
            self.ssl_mode()
        ))
    }

    pub fn validate(&self) -> Result<()> {
        let url = self.connection_url()?;
        let lower = url.to_lowercase();
        if !(lower.starts_with("postgresql://") || lower.starts_with("postgres://") || lower.starts_with("sqlite:")) {
            return Err(anyhow!("database url must start with postgres://, postgresql:// or sqlite:"));
        }
        if self.min_connections == 0 {
            return Err(anyhow!("database.min_connections must be >= 1"));
        }
        if self.max_connections < self.min_connections {
            return Err(anyhow!("database.max_connections must be >= min_connections"));
        }
        if self.connect_timeout_secs == 0 || self.acquire_timeout_secs == 0 {
            return Err(anyhow!("database timeouts must be positive seconds"));
        }
        Ok(())
    }
}

fn parse_flag(v: &str) -> Option<bool> {
    match v.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

// Percent-encode everything outside the RFC 3986 unreserved set.
fn encode_userinfo(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for b in raw.bytes() {
        match b {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'.' | b'_' | b'~' => out.push(b as char),
            _ => out.push_str(&format!("%{:02X}", b)),
        }
    }
    out
}
