use std::path::PathBuf;

use courier::config::{load_layered, ConfigError, EnvConfig};
use courier::mail::MailConfig;
use serde::Deserialize;

const ENV_PREFIX: &str = "COURIER";

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    #[serde(default = "default_port")]
    pub port: u16,

    /// Active profile, set from `COURIER_PROFILE`.
    pub profile: String,

    #[serde(default)]
    pub user: User,

    #[serde(default)]
    pub mail: MailConfig,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct User {
    #[serde(default)]
    pub name: String,
}

fn default_port() -> u16 {
    8080
}

/// Where to look for settings: `COURIER_PROFILE` and `COURIER_CONFIG_DIR`.
#[derive(Debug, Deserialize)]
struct Bootstrap {
    #[serde(default = "default_profile")]
    profile: String,
    #[serde(default = "default_config_dir")]
    config_dir: PathBuf,
}

fn default_profile() -> String {
    "default".to_string()
}

fn default_config_dir() -> PathBuf {
    PathBuf::from("config")
}

impl Settings {
    /// Load `config/default.toml`, `config/{profile}.toml`, then `COURIER_*`
    /// env vars. `COURIER_CONFIG_DIR` moves the config directory.
    pub fn load() -> Result<Self, ConfigError> {
        let bootstrap = Bootstrap::from_env_with_prefix(ENV_PREFIX)?;
        load_layered(bootstrap.config_dir, &bootstrap.profile, ENV_PREFIX)
    }
}
