use std::path::PathBuf;
use std::time::Duration;
use tracing::Level;

/// A custom error type for configuration loading failures.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingVar(String),
    #[error("Invalid value for environment variable {0}: {1}")]
    InvalidValue(String, String),
}

/// Holds all configuration loaded from the environment at startup.
#[derive(Clone, Debug)]
pub struct Config {
    pub mqtt_host: String,
    pub mqtt_port: u16,
    pub mqtt_client_id: String,
    pub calico_home: PathBuf,
    pub skills_dir: PathBuf,
    pub settings_path: PathBuf,
    /// `None` when file logging is disabled.
    pub log_file: Option<PathBuf>,
    pub log_max_lines: usize,
    pub reconnect_delay: Duration,
    pub log_level: Level,
}

fn parse_var<T: std::str::FromStr>(name: &str, default: T) -> Result<T, ConfigError>
where
    T::Err: std::fmt::Display,
{
    match std::env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .map_err(|e| ConfigError::InvalidValue(name.to_string(), e.to_string())),
        Err(_) => Ok(default),
    }
}

fn path_var(name: &str, default: PathBuf) -> PathBuf {
    std::env::var(name).map(PathBuf::from).unwrap_or(default)
}

impl Config {
    /// Loads configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Only load from .env in non-test mode to avoid contamination
        if !cfg!(test) {
            dotenvy::dotenv().ok();
        }

        let mqtt_host = std::env::var("MQTT_HOST").unwrap_or_else(|_| "localhost".to_string());
        if mqtt_host.trim().is_empty() {
            return Err(ConfigError::InvalidValue(
                "MQTT_HOST".to_string(),
                "host must not be empty".to_string(),
            ));
        }
        let mqtt_port = parse_var::<u16>("MQTT_PORT", 1883)?;
        let mqtt_client_id = std::env::var("MQTT_CLIENT_ID")
            .unwrap_or_else(|_| "calico_skill_service".to_string());

        let calico_home = match std::env::var("CALICO_HOME") {
            Ok(home) => PathBuf::from(home),
            Err(_) => dirs::home_dir()
                .map(|home| home.join("Documents").join("Calico"))
                .ok_or_else(|| {
                    ConfigError::MissingVar(
                        "CALICO_HOME must be set when no home directory is available".to_string(),
                    )
                })?,
        };
        let skills_dir = path_var("SKILLS_DIR", calico_home.join("skills"));
        let settings_path = path_var(
            "SETTINGS_PATH",
            calico_home.join("settings").join("config.json"),
        );
        let log_file = match std::env::var("LOG_FILE") {
            Ok(path) if path.trim().is_empty() => None,
            Ok(path) => Some(PathBuf::from(path)),
            Err(_) => Some(calico_home.join("logs").join("calico_skill_service.log")),
        };
        let log_max_lines = parse_var::<usize>("LOG_MAX_LINES", 2500)?;
        let reconnect_delay = Duration::from_secs(parse_var::<u64>("RECONNECT_DELAY_SECS", 5)?);

        let log_level_str = std::env::var("RUST_LOG").unwrap_or_else(|_| "INFO".to_string());
        let log_level = log_level_str.parse::<Level>().map_err(|_| {
            ConfigError::InvalidValue(
                "RUST_LOG".to_string(),
                format!("'{}' is not a valid log level", log_level_str),
            )
        })?;

        Ok(Self {
            mqtt_host,
            mqtt_port,
            mqtt_client_id,
            calico_home,
            skills_dir,
            settings_path,
            log_file,
            log_max_lines,
            reconnect_delay,
            log_level,
        })
    }
}
