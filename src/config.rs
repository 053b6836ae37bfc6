use anyhow::Result;
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Built-in check-in server address. The operator can override the address
/// at runtime and reset back to this constant.
pub const DEFAULT_SERVER_URL: &str = "https://convo-backend-gdvo.onrender.com";

/// Main configuration structure for Gatecheck
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GatecheckConfig {
    /// Check-in server settings
    pub server: ServerConfig,
    /// Scanner behavior at startup
    pub scanner: ScannerConfig,
    /// Observability settings
    pub observability: ObservabilityConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    /// Base address of the check-in server
    pub base_url: String,
    /// Per-request timeout in seconds
    pub request_timeout_seconds: u64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ScannerConfig {
    /// Turn the torch on as soon as the console starts
    pub torch_on_start: bool,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ObservabilityConfig {
    /// Log level directive (overridden by RUST_LOG when set)
    pub log_level: String,
    /// Emit logs as JSON for structured ingestion
    pub json_logs: bool,
}

impl Default for GatecheckConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                base_url: DEFAULT_SERVER_URL.to_string(),
                request_timeout_seconds: 30,
            },
            scanner: ScannerConfig {
                torch_on_start: false,
            },
            observability: ObservabilityConfig {
                log_level: "info".to_string(),
                json_logs: false,
            },
        }
    }
}

impl GatecheckConfig {
    /// Load configuration from multiple sources with precedence:
    /// 1. Default values
    /// 2. Configuration file (gatecheck.toml)
    /// 3. Environment variables (prefixed with GATECHECK_)
    pub fn load() -> Result<Self> {
        let mut builder =
            Config::builder().add_source(Config::try_from(&GatecheckConfig::default())?);

        if Path::new("gatecheck.toml").exists() {
            builder = builder.add_source(File::with_name("gatecheck"));
        }

        // Override with environment variables, e.g. GATECHECK_SERVER__BASE_URL
        builder = builder.add_source(
            Environment::with_prefix("GATECHECK")
                .separator("__")
                .try_parsing(true),
        );

        let settings = builder.build()?;
        Ok(settings.try_deserialize()?)
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
static CONFIG: std::sync::LazyLock<Result<GatecheckConfig, anyhow::Error>> =
    std::sync::LazyLock::new(|| {
        // Load .env file first
        let _ = GatecheckConfig::load_env_file();
        GatecheckConfig::load()
    });

/// Get the global configuration
pub fn config() -> Result<&'static GatecheckConfig> {
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
