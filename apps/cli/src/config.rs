use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::args::Cli;

const CONFIG_DIR_NAME: &str = "phone-usage";
const CONFIG_FILE_NAME: &str = "config.toml";
const DEFAULT_PORT: u16 = 8080;
const DEFAULT_BIND_ADDRESS: &str = "127.0.0.1";
const DEFAULT_REQUEST_TIMEOUT_MS: u64 = 10_000;
const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5_000;
const DEFAULT_LOG_LEVEL: &str = "info";

/// On-disk configuration. Missing keys take their defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CliConfig {
    pub port: u16,
    pub bind_address: String,
    /// Defaults to `phone-usage.sqlite` in the data dir.
    pub database_path: Option<String>,
    pub request_timeout_ms: u64,
    pub busy_timeout_ms: u64,
    pub log_level: String,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            bind_address: DEFAULT_BIND_ADDRESS.to_string(),
            database_path: None,
            request_timeout_ms: DEFAULT_REQUEST_TIMEOUT_MS,
            busy_timeout_ms: DEFAULT_BUSY_TIMEOUT_MS,
            log_level: DEFAULT_LOG_LEVEL.to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ConfigLoad {
    pub config: CliConfig,
    pub file: PathBuf,
    pub created: bool,
}

/// Effective settings after flags and env vars are applied over the file.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub port: u16,
    pub bind_address: String,
    pub database_path: Option<PathBuf>,
    pub request_timeout: Option<Duration>,
    pub busy_timeout: Duration,
    pub log_level: String,
}

impl Settings {
    pub fn resolve(config: CliConfig, cli: &Cli) -> Self {
        let request_timeout_ms = cli.request_timeout_ms.unwrap_or(config.request_timeout_ms);
        Self {
            port: cli.port.unwrap_or(config.port),
            bind_address: cli.bind_address.clone().unwrap_or(config.bind_address),
            database_path: cli
                .database_path
                .clone()
                .or(config.database_path)
                .map(|path| app_api::expand_home_path(&path)),
            request_timeout: (request_timeout_ms > 0)
                .then(|| Duration::from_millis(request_timeout_ms)),
            busy_timeout: Duration::from_millis(config.busy_timeout_ms),
            log_level: cli.log_level.clone().unwrap_or(config.log_level),
        }
    }
}

pub fn load_or_create(explicit: Option<&Path>) -> Result<ConfigLoad, String> {
    let file = match explicit {
        Some(path) => path.to_path_buf(),
        None => default_config_dir()?.join(CONFIG_FILE_NAME),
    };
    load_or_create_at(file)
}

fn load_or_create_at(file: PathBuf) -> Result<ConfigLoad, String> {
    if file.exists() {
        let contents = fs::read_to_string(&file)
            .map_err(|err| format!("read config {}: {}", file.display(), err))?;
        let config: CliConfig = toml::from_str(&contents)
            .map_err(|err| format!("parse config {}: {}", file.display(), err))?;
        return Ok(ConfigLoad {
            config,
            file,
            created: false,
        });
    }

    if let Some(dir) = file.parent() {
        fs::create_dir_all(dir)
            .map_err(|err| format!("create config dir {}: {}", dir.display(), err))?;
    }
    let config = CliConfig::default();
    let contents =
        toml::to_string_pretty(&config).map_err(|err| format!("serialize config: {}", err))?;
    fs::write(&file, contents).map_err(|err| format!("write config {}: {}", file.display(), err))?;

    Ok(ConfigLoad {
        config,
        file,
        created: true,
    })
}

fn default_config_dir() -> Result<PathBuf, String> {
    dirs::config_dir()
        .map(|dir| dir.join(CONFIG_DIR_NAME))
        .ok_or_else(|| "could not resolve the config directory".to_string())
}

/// Where the database lives unless `database_path` says otherwise.
pub fn default_data_dir() -> Result<PathBuf, String> {
    dirs::data_dir()
        .map(|dir| dir.join(CONFIG_DIR_NAME))
        .ok_or_else(|| "could not resolve the data directory".to_string())
}
