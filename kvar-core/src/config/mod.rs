pub mod consul;
pub mod telemetry;

use serde::Deserialize;
use std::{collections::HashMap, env, path::Path};

use crate::{constants::Constants, errors::Error, types};

use self::{consul::Consul, telemetry::Telemetry};

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub consul: Consul,
    #[serde(default)]
    pub telemetry: Telemetry,
    /// Local variable name to remote key, resolved at startup.
    #[serde(default)]
    pub variables: HashMap<String, String>,
}

impl Config {
    fn get_config_dir() -> types::Result<String> {
        let mut path = env::current_exe().map_err(|e| Error::ConfigLoadFailed {
            message: "failed to locate current executable".to_string(),
            source: e.into(),
        })?;
        path.pop();
        path.push("config");

        if !path.is_dir() {
            if Path::new("kvar-runtime/config").is_dir() {
                return Ok("kvar-runtime/config".into());
            }

            if Path::new("config").is_dir() {
                return Ok("config".into());
            }

            return Err(Error::ConfigLoadFailed {
                message: "default config dir was not found".to_string(),
                source: anyhow::anyhow!("no config dir next to executable or in working dir"),
            });
        }

        match path.to_str() {
            Some(v) => Ok(v.into()),
            _ => Err(Error::ConfigLoadFailed {
                message: "failed to get default config dir".to_string(),
                source: anyhow::anyhow!("config dir path is not valid unicode"),
            }),
        }
    }

    /// Loads `default`, then `{run_mode}` and `local` if present, then `KVAR_*`
    /// environment variables (nested keys separated by `__`).
    pub fn from_dir(run_mode: &str, config_dir: &str) -> types::Result<Self> {
        let config = config::Config::builder()
            .add_source(config::File::with_name(&format!("{}/default", config_dir)))
            .add_source(
                config::File::with_name(&format!("{}/{}", config_dir, run_mode)).required(false),
            )
            // Not checked in
            .add_source(config::File::with_name(&format!("{}/local", config_dir)).required(false))
            .add_source(
                config::Environment::with_prefix(&Constants::EnvPrefix.to_string())
                    .prefix_separator("_")
                    .separator(&Constants::EnvSeparator.to_string()),
            )
            .build()
            .map_err(|e| Error::ConfigLoadFailed {
                message: format!("failed to build config from dir '{}'", config_dir),
                source: e.into(),
            })?;

        config
            .try_deserialize()
            .map_err(|e| Error::ConfigLoadFailed {
                message: format!("failed to deserialize config from dir '{}'", config_dir),
                source: e.into(),
            })
    }

    pub fn custom_run_mode(run_mode: &str) -> types::Result<Self> {
        let config_dir = match env::var(Constants::ConfigDirEnv.to_string()) {
            Ok(dir) => dir,
            Err(_) => Self::get_config_dir()?,
        };

        Self::from_dir(run_mode, &config_dir)
    }

    pub fn new() -> types::Result<Self> {
        let run_mode = env::var(Constants::RunModeEnv.to_string())
            .unwrap_or_else(|_| Constants::DefaultRunMode.to_string());

        Self::custom_run_mode(&run_mode)
    }
}
