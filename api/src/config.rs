//! Configuration loading
//!
//! Sources, later ones winning:
//! 1. Built-in defaults for the detected environment
//! 2. Optional `config/<environment>.toml`
//! 3. `SF__`-prefixed environment variables (`SF__SERVER__PORT=9000`)

use config::{Config, ConfigError, File};
use sf_shared::{AppConfig, Environment};

/// Prefix for environment variable overrides
pub const ENV_PREFIX: &str = "SF";

/// Load configuration for the environment named by `ENVIRONMENT`/`ENV`/`RUST_ENV`
pub fn load_config() -> Result<AppConfig, ConfigError> {
    load_config_for(Environment::from_env())
}

pub fn load_config_for(environment: Environment) -> Result<AppConfig, ConfigError> {
    let defaults = AppConfig::for_environment(environment);

    let settings = Config::builder()
        .add_source(Config::try_from(&defaults)?)
        .add_source(File::with_name(environment.config_file()).required(false))
        .add_source(config::Environment::with_prefix(ENV_PREFIX).separator("__"))
        .build()?;

    let mut config: AppConfig = settings.try_deserialize()?;
    // The file and variables may not move a process into another environment
    config.environment = environment;

    Ok(config.sanitized())
}
