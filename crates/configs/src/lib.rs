use std::path::PathBuf;

use anyhow::anyhow;
use anyhow::Result;
use serde::Deserialize;

pub const DEFAULT_STORAGE_FILE: &str = "TODO.md";
pub const DEFAULT_MAX_CONTENT_CHARS: usize = 1_048_576;

#[derive(Debug, Clone, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub storage: StorageConfig,
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
        Self { host: "127.0.0.1".into(), port: 8080, worker_threads: Some(4) }
    }
}

/// On-disk encoding of the durable artifact.
#[derive(Debug, Clone, Copy, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum StorageEncoding {
    /// One global text blob; session identifiers collapse onto the fallback slot.
    #[default]
    Raw,
    /// JSON object of session identifier to content.
    Json,
}

impl std::str::FromStr for StorageEncoding {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "raw" | "text" => Ok(Self::Raw),
            "json" => Ok(Self::Json),
            other => Err(anyhow!("unknown storage encoding: {other}")),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    #[serde(default = "default_storage_path")]
    pub path: PathBuf,
    #[serde(default)]
    pub encoding: StorageEncoding,
    #[serde(default = "default_max_content_chars")]
    pub max_content_chars: usize,
    #[serde(default = "default_reload_on_read")]
    pub reload_on_read: bool,
    /// Refuse to start when the artifact cannot be decoded.
    #[serde(default)]
    pub strict_load: bool,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            path: default_storage_path(),
            encoding: StorageEncoding::default(),
            max_content_chars: default_max_content_chars(),
            reload_on_read: default_reload_on_read(),
            strict_load: false,
        }
    }
}

fn default_storage_path() -> PathBuf { PathBuf::from(DEFAULT_STORAGE_FILE) }
fn default_max_content_chars() -> usize { DEFAULT_MAX_CONTENT_CHARS }
fn default_reload_on_read() -> bool { true }

pub fn config_path() -> String {
    std::env::var("CONFIG_PATH").unwrap_or_else(|_| "config.toml".to_string())
}

pub fn load_from_file(path: &str) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path)?;
    parse(&content)
}

pub fn parse(content: &str) -> Result<AppConfig> {
    let cfg: AppConfig = toml::from_str(content)?;
    Ok(cfg)
}

impl AppConfig {
    /// Load from `CONFIG_PATH` (default `config.toml`) and validate.
    pub fn load_or_env() -> Result<Self> {
        Self::load_or_env_from(&config_path())
    }

    /// Only an absent file falls back to defaults plus environment overrides;
    /// a file that exists but does not parse is an error.
    pub fn load_or_env_from(path: &str) -> Result<Self> {
        let mut cfg = match load_from_file(path) {
            Ok(cfg) => cfg,
            Err(e) if is_not_found(&e) => Self::from_env_defaults(),
            Err(e) => return Err(e.context(format!("cannot load config {path}"))),
        };
        cfg.normalize_and_validate()?;
        Ok(cfg)
    }

    fn from_env_defaults() -> Self {
        let mut server = ServerConfig::default();
        if let Ok(host) = std::env::var("SERVER_HOST") {
            server.host = host;
        }
        if let Some(port) = std::env::var("SERVER_PORT").ok().and_then(|p| p.parse::<u16>().ok()) {
            server.port = port;
        }
        server.worker_threads = std::env::var("TOKIO_WORKER_THREADS")
            .ok()
            .and_then(|v| v.parse::<usize>().ok());
        Self { server, storage: StorageConfig::default() }
    }

    pub fn normalize_and_validate(&mut self) -> Result<()> {
        self.server.normalize()?;
        self.storage.apply_env_overrides()?;
        self.storage.validate()?;
        Ok(())
    }
}

fn is_not_found(e: &anyhow::Error) -> bool {
    e.downcast_ref::<std::io::Error>()
        .is_some_and(|io| io.kind() == std::io::ErrorKind::NotFound)
}

impl ServerConfig {
    fn normalize(&mut self) -> Result<()> {
        if self.host.trim().is_empty() {
            self.host = "127.0.0.1".to_string();
        }
        if self.port == 0 {
            return Err(anyhow!("server.port must be in 1..=65535"));
        }
        match self.worker_threads {
            Some(0) | None => self.worker_threads = Some(4),
            Some(_) => {}
        }
        Ok(())
    }
}

impl StorageConfig {
    /// `TODO_FILE`, `TODO_ENCODING` and `TODO_MAX_CHARS` take precedence over the file.
    pub fn apply_env_overrides(&mut self) -> Result<()> {
        self.apply_overrides(
            std::env::var("TODO_FILE").ok(),
            std::env::var("TODO_ENCODING").ok(),
            std::env::var("TODO_MAX_CHARS").ok(),
        )
    }

    fn apply_overrides(
        &mut self,
        file: Option<String>,
        encoding: Option<String>,
        max_chars: Option<String>,
    ) -> Result<()> {
        if let Some(file) = file.filter(|f| !f.trim().is_empty()) {
            self.path = PathBuf::from(file);
        }
        if let Some(encoding) = encoding {
            self.encoding = encoding.parse()?;
        }
        if let Some(max) = max_chars {
            self.max_content_chars = max
                .trim()
                .parse()
                .map_err(|_| anyhow!("TODO_MAX_CHARS must be a positive integer, got {max:?}"))?;
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if self.path.as_os_str().is_empty() {
            return Err(anyhow!("storage.path is empty; set it in config.toml or TODO_FILE"));
        }
        if self.max_content_chars == 0 {
            return Err(anyhow!("storage.max_content_chars must be >= 1"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_config_uses_defaults() -> Result<()> {
        let cfg = parse("")?;
        assert_eq!(cfg.server.port, 8080);
        assert_eq!(cfg.storage.path, PathBuf::from("TODO.md"));
        assert_eq!(cfg.storage.encoding, StorageEncoding::Raw);
        assert_eq!(cfg.storage.max_content_chars, DEFAULT_MAX_CONTENT_CHARS);
        assert!(cfg.storage.reload_on_read);
        assert!(!cfg.storage.strict_load);
        Ok(())
    }

    #[test]
    fn storage_section_parses() -> Result<()> {
        let cfg = parse(
            r#"
            [server]
            host = "0.0.0.0"
            port = 9000

            [storage]
            path = "data/todos.json"
            encoding = "json"
            max_content_chars = 1000
            reload_on_read = false
            "#,
        )?;
        assert_eq!(cfg.server.host, "0.0.0.0");
        assert_eq!(cfg.storage.path, PathBuf::from("data/todos.json"));
        assert_eq!(cfg.storage.encoding, StorageEncoding::Json);
        assert_eq!(cfg.storage.max_content_chars, 1000);
        assert!(!cfg.storage.reload_on_read);
        Ok(())
    }

    #[test]
    fn overrides_take_precedence() -> Result<()> {
        let mut storage = StorageConfig::default();
        storage.apply_overrides(
            Some("/tmp/other.json".into()),
            Some("JSON".into()),
            Some("42".into()),
        )?;
        assert_eq!(storage.path, PathBuf::from("/tmp/other.json"));
        assert_eq!(storage.encoding, StorageEncoding::Json);
        assert_eq!(storage.max_content_chars, 42);
        Ok(())
    }

    #[test]
    fn blank_file_override_is_ignored() -> Result<()> {
        let mut storage = StorageConfig::default();
        storage.apply_overrides(Some("  ".into()), None, None)?;
        assert_eq!(storage.path, PathBuf::from(DEFAULT_STORAGE_FILE));
        Ok(())
    }

    #[test]
    fn bad_values_rejected() {
        let mut storage = StorageConfig::default();
        assert!(storage.apply_overrides(None, Some("yaml".into()), None).is_err());
        assert!(storage.apply_overrides(None, None, Some("lots".into())).is_err());

        let zero = StorageConfig { max_content_chars: 0, ..StorageConfig::default() };
        assert!(zero.validate().is_err());
    }

    fn temp_config(body: &str) -> Result<PathBuf> {
        let path = std::env::temp_dir().join(format!("todo_config_{}.toml", uuid::Uuid::new_v4()));
        std::fs::write(&path, body)?;
        Ok(path)
    }

    #[test]
    fn missing_config_falls_back_to_defaults() -> Result<()> {
        let path = std::env::temp_dir().join(format!("todo_absent_{}.toml", uuid::Uuid::new_v4()));
        let cfg = AppConfig::load_or_env_from(&path.to_string_lossy())?;
        assert!(cfg.server.worker_threads.is_some());
        assert!(cfg.storage.max_content_chars > 0);
        Ok(())
    }

    #[test]
    fn malformed_config_is_an_error() -> Result<()> {
        let path = temp_config("[storage]\npath = \"/srv/todos/work.json\"\nencoding = \"jsn\"\n")?;
        assert!(AppConfig::load_or_env_from(&path.to_string_lossy()).is_err());

        std::fs::write(&path, "[storage\npath = ")?;
        assert!(AppConfig::load_or_env_from(&path.to_string_lossy()).is_err());

        let _ = std::fs::remove_file(&path);
        Ok(())
    }

    #[test]
    fn existing_config_is_used() -> Result<()> {
        let path = temp_config("[storage]\nencoding = \"json\"\nmax_content_chars = 77\n")?;
        let cfg = AppConfig::load_or_env_from(&path.to_string_lossy())?;
        if std::env::var("TODO_ENCODING").is_err() {
            assert_eq!(cfg.storage.encoding, StorageEncoding::Json);
        }
        if std::env::var("TODO_MAX_CHARS").is_err() {
            assert_eq!(cfg.storage.max_content_chars, 77);
        }
        let _ = std::fs::remove_file(&path);
        Ok(())
    }

    #[test]
    fn zero_port_rejected() {
        let mut server = ServerConfig { port: 0, ..ServerConfig::default() };
        assert!(server.normalize().is_err());
    }
}
