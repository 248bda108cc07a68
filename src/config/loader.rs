//! Configuration loading from disk, environment, and command line.

use std::fs;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use crate::config::schema::ServiceConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Port to listen on, replacing the port of `listener.bind_address`.
pub const ENV_PORT: &str = "PORT";
/// Database file path.
pub const ENV_DATABASE: &str = "COLOR_ROTATOR_DB";
/// Log level.
pub const ENV_LOG_LEVEL: &str = "COLOR_ROTATOR_LOG";

/// Error type for configuration loading.
#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
    Env { var: &'static str, value: String },
    Validation(Vec<ValidationError>),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "IO error: {}", e),
            ConfigError::Parse(e) => write!(f, "Parse error: {}", e),
            ConfigError::Env { var, value } => {
                write!(f, "Invalid value '{}' for {}", value, var)
            }
            ConfigError::Validation(errors) => {
                write!(f, "Validation failed: ")?;
                for (i, err) in errors.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", err)?;
                }
                Ok(())
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// Values given on the command line, applied after the environment.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub bind_address: Option<String>,
    pub database: Option<PathBuf>,
}

/// Build the effective configuration from the process environment.
///
/// Defaults, then the optional file, then the environment, then
/// `overrides`. The result is validated once all layers are applied.
pub fn resolve_config(
    path: Option<&Path>,
    overrides: &ConfigOverrides,
) -> Result<ServiceConfig, ConfigError> {
    resolve_config_with(path, overrides, |var| std::env::var(var).ok())
}

/// [`resolve_config`] with environment variables read through `lookup`.
pub fn resolve_config_with<F>(
    path: Option<&Path>,
    overrides: &ConfigOverrides,
    lookup: F,
) -> Result<ServiceConfig, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let mut config = match path {
        Some(path) => read_config_file(path)?,
        None => ServiceConfig::default(),
    };

    apply_env(&mut config, lookup)?;

    if let Some(bind) = &overrides.bind_address {
        config.listener.bind_address = bind.clone();
    }
    if let Some(db) = &overrides.database {
        config.store.path = db.clone();
    }

    validate_config(&config).map_err(ConfigError::Validation)?;
    Ok(config)
}

fn read_config_file(path: &Path) -> Result<ServiceConfig, ConfigError> {
    let content = fs::read_to_string(path).map_err(ConfigError::Io)?;
    toml::from_str(&content).map_err(ConfigError::Parse)
}

/// Apply environment overrides read through `lookup`.
pub fn apply_env<F>(config: &mut ServiceConfig, lookup: F) -> Result<(), ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(value) = lookup(ENV_PORT) {
        let port: u16 = value.trim().parse().map_err(|_| ConfigError::Env {
            var: ENV_PORT,
            value: value.clone(),
        })?;
        config.listener.bind_address = match config.listener.bind_address.parse::<SocketAddr>() {
            Ok(mut addr) => {
                addr.set_port(port);
                addr.to_string()
            }
            Err(_) => format!("0.0.0.0:{}", port),
        };
    }

    if let Some(value) = lookup(ENV_DATABASE) {
        config.store.path = PathBuf::from(value);
    }

    if let Some(value) = lookup(ENV_LOG_LEVEL) {
        config.observability.log_level = value;
    }

    Ok(())
}
