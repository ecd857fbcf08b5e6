use anyhow::Result;
use serde::Deserialize;
use anyhow::anyhow;

#[derive(Debug, Clone, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub listing: ListingConfig,
    #[serde(default)]
    pub security: SecurityConfig,
    #[serde(default)]
    pub runtime: RuntimeConfig,
    #[serde(default)]
    pub status: StatusLabels,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    #[serde(default)]
    pub worker_threads: Option<usize>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { host: "127.0.0.1".into(), port: 8080, worker_threads: None }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    #[serde(default)]
    pub url: String,
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

fn default_max_connections() -> u32 { 10 }
fn default_min_connections() -> u32 { 2 }
fn default_connect_timeout() -> u64 { 30 }
fn default_idle_timeout() -> u64 { 600 }
fn default_max_lifetime() -> u64 { 3600 }
fn default_acquire_timeout() -> u64 { 30 }

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
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

/// Fallback paging values for list requests that omit `page`/`limit`.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct ListingConfig {
    #[serde(default = "default_page")]
    pub page: u32,
    #[serde(default = "default_limit")]
    pub limit: u32,
}

fn default_page() -> u32 { 1 }
fn default_limit() -> u32 { 10 }

impl Default for ListingConfig {
    fn default() -> Self {
        Self { page: default_page(), limit: default_limit() }
    }
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct SecurityConfig {
    /// Secret used to obfuscate record ids on the wire.
    #[serde(default)]
    pub id_cipher_secret: String,
}

#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Production,
}

impl Environment {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "development" | "dev" => Some(Self::Development),
            "production" | "prod" => Some(Self::Production),
            _ => None,
        }
    }

    pub fn is_production(self) -> bool {
        self == Self::Production
    }
}

#[derive(Debug, Clone, Copy, Deserialize, Default)]
pub struct RuntimeConfig {
    #[serde(default)]
    pub environment: Environment,
}

/// Stored labels of the record lifecycle states.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct StatusLabels {
    #[serde(default = "default_active")]
    pub active: String,
    #[serde(default = "default_inactive")]
    pub inactive: String,
    #[serde(default = "default_deleted")]
    pub deleted: String,
}

fn default_active() -> String { "active".into() }
fn default_inactive() -> String { "inactive".into() }
fn default_deleted() -> String { "deleted".into() }

impl Default for StatusLabels {
    fn default() -> Self {
        Self { active: default_active(), inactive: default_inactive(), deleted: default_deleted() }
    }
}

pub fn load_default() -> Result<AppConfig> {
    let path = std::env::var("CONFIG_PATH").unwrap_or_else(|_| "config.toml".to_string());
    load_from_file(&path)
}

pub fn load_from_file(path: &str) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path)?;
    let cfg: AppConfig = toml::from_str(&content)?;
    Ok(cfg)
}

impl AppConfig {
    /// `CONFIG_PATH` (or `config.toml`) if present, otherwise defaults filled from the environment.
    pub fn load_or_env() -> Result<Self> {
        let path = std::env::var("CONFIG_PATH").unwrap_or_else(|_| "config.toml".to_string());
        Self::load_or_env_from(&path)
    }

    /// Only a missing file falls back to defaults; unreadable or malformed files are errors.
    pub fn load_or_env_from(path: &str) -> Result<Self> {
        let mut cfg = match std::fs::read_to_string(path) {
            Ok(content) => toml::from_str(&content).map_err(|e| anyhow!("{}: {}", path, e))?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Self::default(),
            Err(e) => return Err(anyhow!("{}: {}", path, e)),
        };
        cfg.normalize_and_validate()?;
        Ok(cfg)
    }

    pub fn normalize_and_validate(&mut self) -> Result<()> {
        self.server.normalize()?;
        self.database.normalize_from_env();
        self.database.validate()?;
        self.listing.normalize();
        self.security.normalize_from_env()?;
        self.runtime.normalize_from_env();
        self.status.validate()?;
        Ok(())
    }
}

impl ServerConfig {
    fn normalize(&mut self) -> Result<()> {
        if self.host.trim().is_empty() {
            self.host = std::env::var("SERVER_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        }
        if self.port == 0 {
            return Err(anyhow!("server.port must be within 1..=65535"));
        }
        let env_threads = std::env::var("TOKIO_WORKER_THREADS").ok();
        self.worker_threads = Some(resolve_worker_threads(self.worker_threads, env_threads.as_deref()));
        Ok(())
    }
}

/// Configured count wins, then `TOKIO_WORKER_THREADS`, then 4. Zero means unset.
fn resolve_worker_threads(configured: Option<usize>, env: Option<&str>) -> usize {
    configured
        .filter(|n| *n > 0)
        .or_else(|| env.and_then(|v| v.trim().parse::<usize>().ok()).filter(|n| *n > 0))
        .unwrap_or(4)
}

impl DatabaseConfig {
    pub fn normalize_from_env(&mut self) {
        if self.url.trim().is_empty() {
            if let Ok(url) = std::env::var("DATABASE_URL") {
                self.url = url;
            }
        }
        if self.max_connections == 0 { self.max_connections = default_max_connections(); }
        if self.connect_timeout_secs == 0 { self.connect_timeout_secs = default_connect_timeout(); }
        if self.acquire_timeout_secs == 0 { self.acquire_timeout_secs = default_acquire_timeout(); }
    }

    pub fn validate(&self) -> Result<()> {
        if self.url.trim().is_empty() {
            return Err(anyhow!("database.url is empty; set it in config.toml or DATABASE_URL"));
        }
        let lower = self.url.to_lowercase();
        if !(lower.starts_with("postgresql://") || lower.starts_with("postgres://")) {
            return Err(anyhow!("database.url must start with postgresql:// or postgres://"));
        }
        if self.min_connections == 0 {
            return Err(anyhow!("database.min_connections must be >= 1"));
        }
        if self.max_connections < self.min_connections {
            return Err(anyhow!("database.max_connections must be >= min_connections"));
        }
        Ok(())
    }
}

impl ListingConfig {
    fn normalize(&mut self) {
        if self.page == 0 { self.page = default_page(); }
        if self.limit == 0 { self.limit = default_limit(); }
    }
}

impl SecurityConfig {
    fn normalize_from_env(&mut self) -> Result<()> {
        if self.id_cipher_secret.trim().is_empty() {
            if let Ok(secret) = std::env::var("ID_CIPHER_SECRET") {
                self.id_cipher_secret = secret;
            }
        }
        if self.id_cipher_secret.trim().is_empty() {
            return Err(anyhow!("security.id_cipher_secret is empty; set it in config.toml or ID_CIPHER_SECRET"));
        }
        Ok(())
    }
}

impl RuntimeConfig {
    fn normalize_from_env(&mut self) {
        if let Some(env) = std::env::var("APP_ENV").ok().and_then(|v| Environment::parse(&v)) {
            self.environment = env;
        }
    }
}

impl StatusLabels {
    fn validate(&self) -> Result<()> {
        let labels = [&self.active, &self.inactive, &self.deleted];
        if labels.iter().any(|l| l.trim().is_empty()) {
            return Err(anyhow!("status labels must not be empty"));
        }
        if self.active == self.inactive || self.active == self.deleted || self.inactive == self.deleted {
            return Err(anyhow!("status labels must be distinct"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
[server]
host = "0.0.0.0"
port = 9000

[database]
url = "postgres://u:p@localhost:5432/blog"

[listing]
limit = 25

[security]
id_cipher_secret = "s3cret"

[runtime]
environment = "production"
"#;

    #[test]
    fn parses_sections_and_defaults() {
        let cfg: AppConfig = toml::from_str(SAMPLE).expect("parse");
        assert_eq!(cfg.server.port, 9000);
        assert_eq!(cfg.listing.page, 1);
        assert_eq!(cfg.listing.limit, 25);
        assert!(cfg.runtime.environment.is_production());
        assert_eq!(cfg.status, StatusLabels::default());
        assert_eq!(cfg.database.max_connections, 10);
    }

    #[test]
    fn validate_accepts_complete_config() {
        let mut cfg: AppConfig = toml::from_str(SAMPLE).expect("parse");
        cfg.normalize_and_validate().expect("valid");
        assert!(cfg.server.worker_threads.is_some_and(|n| n > 0));
    }

    #[test]
    fn rejects_non_postgres_url() {
        let db = DatabaseConfig { url: "mysql://x".into(), min_connections: 1, max_connections: 2, ..Default::default() };
        assert!(db.validate().is_err());
    }

    #[test]
    fn rejects_duplicate_status_labels() {
        let labels = StatusLabels { active: "on".into(), inactive: "on".into(), deleted: "gone".into() };
        assert!(labels.validate().is_err());
    }

    #[test]
    fn missing_file_falls_back_to_env_and_defaults() {
        std::env::set_var("DATABASE_URL", "postgres://env:pw@localhost:5432/blog");
        std::env::set_var("ID_CIPHER_SECRET", "from-env");
        let cfg = AppConfig::load_or_env_from("/nonexistent/blog-feed-admin/config.toml").expect("env config");
        assert_eq!(cfg.database.url, "postgres://env:pw@localhost:5432/blog");
        assert_eq!(cfg.database.min_connections, 2);
        assert_eq!(cfg.database.idle_timeout_secs, 600);
        assert_eq!(cfg.security.id_cipher_secret, "from-env");
        assert_eq!(cfg.listing.limit, 10);
    }

    #[test]
    fn malformed_file_is_an_error_not_a_fallback() {
        let path = std::env::temp_dir().join(format!("blog-feed-admin-bad-{}.toml", std::process::id()));
        std::fs::write(&path, "[runtime\nenvironment = \"production\"").expect("write temp config");
        let err = AppConfig::load_or_env_from(path.to_str().expect("utf-8 path")).unwrap_err();
        let _ = std::fs::remove_file(&path);
        assert!(err.to_string().contains("blog-feed-admin-bad"), "unexpected error: {err}");
    }

    #[test]
    fn worker_threads_prefer_config_then_env() {
        assert_eq!(resolve_worker_threads(Some(8), Some("2")), 8);
        assert_eq!(resolve_worker_threads(None, Some("2")), 2);
        assert_eq!(resolve_worker_threads(Some(0), Some(" 3 ")), 3);
        assert_eq!(resolve_worker_threads(None, Some("lots")), 4);
        assert_eq!(resolve_worker_threads(None, None), 4);
    }

    #[test]
    fn default_database_section_passes_validation_once_url_is_set() {
        let db = DatabaseConfig { url: "postgres://u@localhost/db".into(), ..Default::default() };
        assert!(db.validate().is_ok());
    }

    #[test]
    fn environment_parse_accepts_short_forms() {
        assert_eq!(Environment::parse("prod"), Some(Environment::Production));
        assert_eq!(Environment::parse(" Development "), Some(Environment::Development));
        assert_eq!(Environment::parse("staging"), None);
    }
}
