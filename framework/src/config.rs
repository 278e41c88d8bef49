use std::path::Path;

use config::{Config, Environment, File};
use serde::de::DeserializeOwned;

pub use config::ConfigError;

/// Load a flat struct straight from environment variables.
pub trait EnvConfig: Sized {
    fn from_env() -> Result<Self, ConfigError>;
    fn from_env_with_prefix(prefix: &str) -> Result<Self, ConfigError>;
}

impl<D> EnvConfig for D
where
    D: DeserializeOwned,
{
    fn from_env() -> Result<Self, ConfigError> {
        Config::builder()
            .add_source(Environment::default())
            .build()?
            .try_deserialize()
    }

    fn from_env_with_prefix(prefix: &str) -> Result<Self, ConfigError> {
        Config::builder()
            .add_source(Environment::with_prefix(prefix))
            .build()?
            .try_deserialize()
    }
}

/// Load nested settings from layered sources, last one wins:
///
/// 1. `{dir}/default.toml`
/// 2. `{dir}/{profile}.toml`
/// 3. environment variables `{PREFIX}_KEY`, with `__` separating nested keys
///    (`COURIER_MAIL__SMTP__HOST` sets `mail.smtp.host`)
///
/// Both files are optional.
pub fn load_layered<D>(dir: impl AsRef<Path>, profile: &str, prefix: &str) -> Result<D, ConfigError>
where
    D: DeserializeOwned,
{
    let dir = dir.as_ref();
    Config::builder()
        .add_source(File::from(dir.join("default.toml")).required(false))
        .add_source(File::from(dir.join(format!("{profile}.toml"))).required(false))
        .add_source(
            Environment::with_prefix(prefix)
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        )
        .set_override("profile", profile)?
        .build()?
        .try_deserialize()
}
