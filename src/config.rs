use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub paths: PathsConfig,
    #[serde(default)]
    pub ui: UiConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Remote service endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Registration endpoint (POST)
    #[serde(default = "default_registration_url")]
    pub registration_url: String,
    /// Profile service base; reads hit `{profile_url}/details/{id}`, updates `{profile_url}/{id}`
    #[serde(default = "default_profile_url")]
    pub profile_url: String,
    /// System parameter lookup base; the parameter code is appended
    #[serde(default = "default_parameters_url")]
    pub parameters_url: String,
    /// Profile managed by the editor
    #[serde(default)]
    pub profile_id: String,
    /// Request timeout in seconds (default: 15)
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Parameter code listing selectable services
    #[serde(default = "default_services_param")]
    pub services_param: String,
    /// Parameter code listing operational locations
    #[serde(default = "default_locations_param")]
    pub locations_param: String,
}

fn default_registration_url() -> String {
    "http://localhost:8081/api/users/register".to_string()
}

fn default_profile_url() -> String {
    "http://localhost:6090/api/profile".to_string()
}

fn default_parameters_url() -> String {
    "http://localhost:8082/api/common/systemparameter".to_string()
}

fn default_timeout_secs() -> u64 {
    15
}

fn default_services_param() -> String {
    "SERVICE_EXPERTISES".to_string()
}

fn default_locations_param() -> String {
    "OPERATIONAL_LOCATIONS".to_string()
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            registration_url: default_registration_url(),
            profile_url: default_profile_url(),
            parameters_url: default_parameters_url(),
            profile_id: String::new(),
            timeout_secs: default_timeout_secs(),
            services_param: default_services_param(),
            locations_param: default_locations_param(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathsConfig {
    /// Directory for the session token and logs
    #[serde(default = "default_state_path")]
    pub state: String,
}

fn default_state_path() -> String {
    ".bizdir".to_string()
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            state: default_state_path(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiConfig {
    #[serde(default = "default_refresh_rate")]
    pub refresh_rate_ms: u64,
    /// Delay before the registration success screen hands control back (default: 5000)
    #[serde(default = "default_success_redirect")]
    pub success_redirect_ms: u64,
}

fn default_refresh_rate() -> u64 {
    250
}

fn default_success_redirect() -> u64 {
    5000
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            refresh_rate_ms: default_refresh_rate(),
            success_redirect_ms: default_success_redirect(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level filter (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Whether to log to file in TUI mode (false = stderr for debugging)
    #[serde(default = "default_log_to_file")]
    pub to_file: bool,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_to_file() -> bool {
    true
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            to_file: default_log_to_file(),
        }
    }
}

impl Config {
    /// Path to the project-local config file
    pub fn local_config_path() -> PathBuf {
        PathBuf::from(".bizdir/config.toml")
    }

    pub fn load(config_path: Option<&str>) -> Result<Self> {
        // Start with embedded defaults so bizdir works without config files
        let defaults = Config::default();
        let defaults_json =
            serde_json::to_string(&defaults).context("Failed to serialize default config")?;

        let mut builder = config::Config::builder().add_source(config::File::from_str(
            &defaults_json,
            config::FileFormat::Json,
        ));

        let local_config = Self::local_config_path();
        if local_config.exists() {
            builder = builder.add_source(config::File::from(local_config));
        }

        // User config in ~/.config/bizdir/ (optional global overrides)
        if let Some(config_dir) = dirs::config_dir() {
            let user_config = config_dir.join("bizdir").join("config.toml");
            if user_config.exists() {
                builder = builder.add_source(config::File::from(user_config));
            }
        }

        // Explicit config file (CLI override)
        if let Some(path) = config_path {
            builder = builder.add_source(config::File::with_name(path));
        }

        // Environment variables with BIZDIR_ prefix
        builder = builder.add_source(
            config::Environment::with_prefix("BIZDIR")
                .separator("__")
                .try_parsing(true),
        );

        let config = builder.build().context("Failed to load configuration")?;
        config
            .try_deserialize()
            .context("Failed to deserialize configuration")
    }

    /// Save config to .bizdir/config.toml
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::local_config_path())
    }

    pub fn save_to(&self, config_path: &std::path::Path) -> Result<()> {
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent).context("Failed to create config directory")?;
        }

        let toml_str =
            toml::to_string_pretty(self).context("Failed to serialize config to TOML")?;

        std::fs::write(config_path, toml_str).context("Failed to write config file")?;

        Ok(())
    }

    /// Get absolute path to state directory
    pub fn state_path(&self) -> PathBuf {
        let path = PathBuf::from(&self.paths.state);
        if path.is_absolute() {
            path
        } else {
            std::env::current_dir().unwrap_or_default().join(path)
        }
    }

    /// Get absolute path to logs directory
    pub fn logs_path(&self) -> PathBuf {
        self.state_path().join("logs")
    }

    /// Where the session token is kept between runs
    pub fn session_path(&self) -> PathBuf {
        self.state_path().join("session.json")
    }

    pub fn request_timeout(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.api.timeout_secs)
    }
}
