use anyhow::Result;
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Main configuration structure for rfqflow
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RfqflowConfig {
    /// Procurement API endpoint settings (consumed by transport implementations)
    pub api: ApiConfig,
    /// Poller and notification tuning
    pub watcher: WatcherConfig,
    /// Observability settings
    pub observability: ObservabilityConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ApiConfig {
    /// Base URL of the procurement backend
    pub base_url: String,
    /// API token (can be set via env var)
    pub token: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct WatcherConfig {
    /// Gap between scheduled polls in seconds
    pub poll_interval_seconds: u64,
    /// Debounce window for coalescing refresh triggers, in milliseconds
    pub debounce_ms: u64,
    /// How long a dedup key suppresses a repeat notification, in seconds.
    /// A transition reverted and redone inside this window stays silent;
    /// that is a policy choice, so it is a tunable rather than a constant.
    pub dedup_ttl_seconds: u64,
    /// Cadence for purging expired dedup entries, in seconds
    pub purge_interval_seconds: u64,
}

impl WatcherConfig {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_seconds)
    }

    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    pub fn dedup_ttl(&self) -> chrono::Duration {
        chrono::Duration::seconds(self.dedup_ttl_seconds as i64)
    }

    pub fn purge_interval(&self) -> Duration {
        Duration::from_secs(self.purge_interval_seconds)
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ObservabilityConfig {
    /// Log level
    pub log_level: String,
    /// Emit structured JSON logs instead of plain text
    pub json_logs: bool,
}

impl Default for RfqflowConfig {
    fn default() -> Self {
        Self {
            api: ApiConfig {
                base_url: "http://localhost:8080/api".to_string(),
                token: None, // Will be read from env var
            },
            watcher: WatcherConfig {
                poll_interval_seconds: 15,
                debounce_ms: 2000,
                dedup_ttl_seconds: 300,
                purge_interval_seconds: 60,
            },
            observability: ObservabilityConfig {
                log_level: "info".to_string(),
                json_logs: true,
            },
        }
    }
}

impl RfqflowConfig {
    /// Load configuration from multiple sources with precedence:
    /// 1. Default values
    /// 2. Configuration file (rfqflow.toml)
    /// 3. Environment variables (prefixed with RFQFLOW_)
    pub fn load() -> Result<Self> {
        let defaults = RfqflowConfig::default();
        let mut builder = Config::builder().add_source(Config::try_from(&defaults)?);

        if Path::new("rfqflow.toml").exists() {
            builder = builder.add_source(File::with_name("rfqflow"));
        }

        builder = builder.add_source(
            Environment::with_prefix("RFQFLOW")
                .separator("_")
                .try_parsing(true),
        );

        let config = builder.build()?;
        let mut rfqflow_config: RfqflowConfig = config.try_deserialize()?;

        // Special handling for the API token - check the bare env var too
        if rfqflow_config.api.token.is_none() {
            if let Ok(token) = std::env::var("RFQFLOW_API_TOKEN") {
                rfqflow_config.api.token = Some(token);
            }
        }

        Ok(rfqflow_config)
    }

    /// Save configuration to file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let toml_content = toml::to_string_pretty(self)?;
        std::fs::write(path, toml_content)?;
        Ok(())
    }

    /// Load .env file if it exists
    pub fn load_env_file() -> Result<()> {
        if Path::new(".env").exists() {
            dotenvy::dotenv()?;
            tracing::info!("Loaded environment variables from .env file");
        }
        Ok(())
    }
}

/// Global configuration instance
static CONFIG: std::sync::LazyLock<Result<RfqflowConfig, anyhow::Error>> =
    std::sync::LazyLock::new(|| {
        // Load .env file first
        let _ = RfqflowConfig::load_env_file();
        RfqflowConfig::load()
    });

/// Get the global configuration
pub fn config() -> Result<&'static RfqflowConfig> {
    CONFIG
        .as_ref()
        .map_err(|e| anyhow::anyhow!("Failed to load configuration: {}", e))
}

/// Initialize configuration (called at startup)
pub fn init_config() -> Result<()> {
    let _config = config()?;
    tracing::info!("Configuration loaded successfully");
    Ok(())
}
