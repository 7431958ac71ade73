use std::env;
use std::fmt;
use std::fs::File;
use std::io::BufReader;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

use tracing::info;

use crate::standards::{ConfigurationError, StandardsTable};

/// Distinguishes runtime behavior for different stages of the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnvironment {
    Development,
    Test,
    Production,
}

impl AppEnvironment {
    fn from_str(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "prod" | "production" => Self::Production,
            "test" | "ci" => Self::Test,
            _ => Self::Development,
        }
    }
}

/// Top-level configuration for the application.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub server: ServerConfig,
    pub telemetry: TelemetryConfig,
    pub standards: StandardsConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("APP_PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse::<u16>()
            .map_err(|_| ConfigError::InvalidPort)?;

        let log_level = env::var("APP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        let standards_path = env::var("KITSUSA_STANDARDS_PATH")
            .ok()
            .map(|raw| raw.trim().to_string())
            .filter(|raw| !raw.is_empty())
            .map(PathBuf::from);

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig { log_level },
            standards: StandardsConfig {
                path: standards_path,
            },
        })
    }
}

/// Settings controlling the HTTP server binding.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        if self.host.eq_ignore_ascii_case("localhost") {
            return Ok(SocketAddr::new(IpAddr::from([127, 0, 0, 1]), self.port));
        }

        let ip: IpAddr = self
            .host
            .parse()
            .map_err(|source| ConfigError::InvalidHost { source })?;

        Ok(SocketAddr::new(ip, self.port))
    }
}

/// Tracing controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

/// Where the reference tables come from. `None` selects the built-in tables.
#[derive(Debug, Clone, Default)]
pub struct StandardsConfig {
    pub path: Option<PathBuf>,
}

/// Load and validate the reference tables named by the configuration.
pub fn load_standards(config: &StandardsConfig) -> Result<StandardsTable, ConfigurationError> {
    let table = match &config.path {
        Some(path) => {
            let file = File::open(path).map_err(|source| ConfigurationError::Io {
                path: path.clone(),
                source,
            })?;
            StandardsTable::from_reader(BufReader::new(file))?
        }
        None => StandardsTable::builtin(),
    };

    info!(
        source = config
            .path
            .as_ref()
            .map(|path| path.display().to_string())
            .unwrap_or_else(|| "built-in".to_string()),
        version = table.version(),
        "standards tables loaded"
    );
    Ok(table)
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidPort => None,
            ConfigError::InvalidHost { source } => Some(source),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::sync::{Mutex, OnceLock};

    fn env_guard() -> &'static Mutex<()> {
        static GUARD: OnceLock<Mutex<()>> = OnceLock::new();
        GUARD.get_or_init(|| Mutex::new(()))
    }

    fn reset_env() {
        env::remove_var("APP_ENV");
        env::remove_var("APP_HOST");
        env::remove_var("APP_PORT");
        env::remove_var("APP_LOG_LEVEL");
        env::remove_var("KITSUSA_STANDARDS_PATH");
    }

    #[test]
    fn load_uses_defaults_when_env_missing() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        let config = AppConfig::load().expect("config loads with defaults");
        assert_eq!(config.environment, AppEnvironment::Development);
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.telemetry.log_level, "info");
        assert!(config.standards.path.is_none());
    }

    #[test]
    fn rejects_non_numeric_port() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("APP_PORT", "eighty");
        let result = AppConfig::load();
        reset_env();
        assert!(matches!(result, Err(ConfigError::InvalidPort)));
    }

    #[test]
    fn reads_standards_path_from_env() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("APP_ENV", "production");
        env::set_var("KITSUSA_STANDARDS_PATH", "/etc/kitsusa/standards.json");
        let config = AppConfig::load().expect("config loads");
        reset_env();
        assert_eq!(config.environment, AppEnvironment::Production);
        assert_eq!(
            config.standards.path,
            Some(PathBuf::from("/etc/kitsusa/standards.json"))
        );
    }

    #[test]
    fn accepts_localhost_host() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("APP_HOST", "localhost");
        let config = AppConfig::load().expect("config loads");
        reset_env();
        let addr = config.server.socket_addr().expect("localhost resolves");
        assert_eq!(addr, SocketAddr::new(IpAddr::from([127, 0, 0, 1]), 3000));
    }

    #[test]
    fn load_standards_defaults_to_builtin_tables() {
        let table = load_standards(&StandardsConfig::default()).expect("built-in tables load");
        assert_eq!(table.version(), StandardsTable::builtin().version());
    }

    #[test]
    fn load_standards_reads_json_documents() {
        let mut document = StandardsTable::builtin().document().clone();
        document.version = "site-override".to_string();
        let path = env::temp_dir().join(format!("kitsusa-standards-{}.json", std::process::id()));
        let mut file = File::create(&path).expect("temp file");
        file.write_all(&serde_json::to_vec(&document).expect("serializes"))
            .expect("write document");

        let loaded = load_standards(&StandardsConfig {
            path: Some(path.clone()),
        });
        std::fs::remove_file(&path).ok();

        assert_eq!(loaded.expect("document loads").version(), "site-override");
    }

    #[test]
    fn missing_standards_file_is_an_io_error() {
        let config = StandardsConfig {
            path: Some(PathBuf::from("/nonexistent/kitsusa/standards.json")),
        };
        match load_standards(&config) {
            Err(ConfigurationError::Io { path, .. }) => {
                assert_eq!(path, PathBuf::from("/nonexistent/kitsusa/standards.json"))
            }
            other => panic!("expected io error, got {other:?}"),
        }
    }
}
