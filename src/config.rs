use std::path::PathBuf;
use std::time::Duration;
use serde::{Deserialize, Serialize};
use directories::ProjectDirs;
use clap::Parser;
use std::fs;
use tracing::{info, warn};

/// JWT secret used when nothing else is configured; fine for local use only
pub const DEVELOPMENT_JWT_SECRET: &str = "flashdeck-development-secret";

/// Configuration for the Flashdeck server
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// URL for the database connection
    pub database_url: String,
    /// Address the HTTP server listens on
    pub bind_address: String,
    /// Secret used to sign session tokens
    pub jwt_secret: String,
    /// Lifetime of session tokens in minutes
    pub token_ttl_minutes: u64,
    /// Directory for rolling JSON log files, if file logging is wanted
    pub log_dir: Option<PathBuf>,
}

/// Update structure for Config with all fields optional
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ConfigUpdate {
    /// Optional update for database URL
    #[serde(default)]
    pub database_url: Option<String>,
    /// Optional update for the listen address
    #[serde(default)]
    pub bind_address: Option<String>,
    /// Optional update for the token secret
    #[serde(default)]
    pub jwt_secret: Option<String>,
    /// Optional update for the token lifetime (in minutes)
    #[serde(default)]
    pub token_ttl_minutes: Option<u64>,
    /// Optional update for the log directory
    #[serde(default)]
    pub log_dir: Option<PathBuf>,
    /// Server URL used by the CLI client (ignored by the server)
    #[serde(default)]
    pub server_url: Option<String>,
}

/// Command line arguments for the server
#[derive(Parser, Debug)]
#[clap(name = "flashdeck", about = "Flashcard collections and study sessions")]
pub struct CliArgs {
    /// Database URL
    #[clap(long, env = "DATABASE_URL")]
    pub database_url: Option<String>,

    /// Address to listen on, e.g. 127.0.0.1:8080
    #[clap(long, env = "FLASHDECK_BIND_ADDRESS")]
    pub bind_address: Option<String>,

    /// Secret for signing session tokens
    #[clap(long, env = "JWT_SECRET", hide_env_values = true)]
    pub jwt_secret: Option<String>,

    /// Session token lifetime in minutes
    #[clap(long, env = "TOKEN_TTL_MINUTES")]
    pub token_ttl_minutes: Option<u64>,

    /// Directory for JSON log files
    #[clap(long, env = "FLASHDECK_LOG_DIR")]
    pub log_dir: Option<PathBuf>,

    /// Debug mode
    #[clap(long, env = "FLASHDECK_DEBUG", default_value_t = false)]
    pub debug: bool,
}

impl Config {
    /// Applies a config update to the current configuration
    pub fn apply_update(self, update: ConfigUpdate) -> Self {
        Self {
            database_url: update.database_url.unwrap_or(self.database_url),
            bind_address: update.bind_address.unwrap_or(self.bind_address),
            jwt_secret: update.jwt_secret.unwrap_or(self.jwt_secret),
            token_ttl_minutes: update.token_ttl_minutes.unwrap_or(self.token_ttl_minutes),
            log_dir: update.log_dir.or(self.log_dir),
        }
    }

    /// Returns the token lifetime as a Duration
    pub fn token_ttl(&self) -> Duration {
        Duration::from_secs(self.token_ttl_minutes * 60)
    }

    /// Whether the built-in development secret is still in use
    pub fn uses_development_secret(&self) -> bool {
        self.jwt_secret == DEVELOPMENT_JWT_SECRET
    }
}

/// Returns the base (default) configuration
pub fn base_config(config_path: Option<PathBuf>) -> Config {
    let database_url = config_path.map_or("flashdeck.db".to_string(), |path| path.join("flashdeck.db").to_string_lossy().to_string());

    Config {
        database_url,
        bind_address: "127.0.0.1:8080".to_string(),
        jwt_secret: DEVELOPMENT_JWT_SECRET.to_string(),
        token_ttl_minutes: 60,
        log_dir: None,
    }
}

/// Loads configuration from a TOML file
pub fn config_from_file(config_path: Option<PathBuf>) -> Result<ConfigUpdate, String> {
    let Some(config_path) = config_path else {
        return Ok(ConfigUpdate::default());
    };

    if !config_path.exists() {
        info!("Config file not found at {:?}, using defaults", config_path);
        return Ok(ConfigUpdate::default());
    }

    match fs::read_to_string(&config_path) {
        Ok(content) => match toml::from_str::<ConfigUpdate>(&content) {
            Ok(config) => {
                info!("Loaded configuration from {:?}", config_path);
                Ok(config)
            },
            Err(e) => {
                warn!("Failed to parse config file: {}", e);
                Err(format!("Failed to parse config file: {}", e))
            }
        },
        Err(e) => {
            warn!("Failed to read config file: {}", e);
            Err(format!("Failed to read config file: {}", e))
        }
    }
}

/// Loads configuration from command line arguments
pub fn config_from_args(args: &CliArgs) -> ConfigUpdate {
    ConfigUpdate {
        database_url: args.database_url.clone(),
        bind_address: args.bind_address.clone(),
        jwt_secret: args.jwt_secret.clone(),
        token_ttl_minutes: args.token_ttl_minutes,
        log_dir: args.log_dir.clone(),
        server_url: None,
    }
}

/// Returns the XDG config directory for Flashdeck, if one can be determined
///
/// The directory is not required to exist.
pub fn get_config_dir_path() -> Option<PathBuf> {
    match ProjectDirs::from("com", "flashdeck", "flashdeck") {
        Some(proj_dirs) => Some(proj_dirs.config_dir().to_path_buf()),
        None => {
            warn!("Could not determine XDG config directory, skipping config file");
            None
        }
    }
}

/// Gets the complete configuration by combining defaults with
/// values from config file, environment variables, and command line arguments
/// in order of increasing precedence
pub fn get_config(args: &CliArgs) -> Config {
    let config_path = get_config_dir_path().and_then(|path| {
        if !path.exists() {
            info!("Config path not found at {:?}, using defaults", path);
            None
        } else {
            Some(path)
        }
    });

    let base = base_config(config_path.clone());

    // Apply updates in order of increasing precedence
    let config = base
        .apply_update(config_from_file(config_path.map(|dir| dir.join("config.toml"))).unwrap_or_default())
        .apply_update(config_from_args(args));

    if config.uses_development_secret() {
        warn!("Using the built-in development JWT secret; set JWT_SECRET for anything but local use");
    }

    info!("Final configuration: database_url={}, bind_address={}, token_ttl={}min, log_dir={:?}",
          config.database_url, config.bind_address, config.token_ttl_minutes, config.log_dir);

    config
}

#[cfg(test)]
mod tests;

#[cfg(test)]
mod prop_tests;
