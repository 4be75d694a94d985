use std::{fs, path::Path};

use serde::Deserialize;
use tracing::debug;
use types::HttpApiConf;

use crate::error::SnmpCfgResult;

pub const DEFAULT_CONFIG_FILE: &str = "snmpcfg.toml";

#[derive(Deserialize, Debug, Default, PartialEq)]
pub struct Config {
    #[serde(default)]
    pub api: HttpApiConf,
    #[serde(default)]
    pub log: Log,
}

#[derive(Deserialize, Debug, PartialEq)]
pub struct Log {
    #[serde(default = "default_level")]
    pub level: String,
}

fn default_level() -> String {
    "info".to_owned()
}

impl Default for Log {
    fn default() -> Self {
        Self {
            level: default_level(),
        }
    }
}

impl Config {
    pub fn load(path: impl AsRef<Path>) -> SnmpCfgResult<Self> {
        let data = fs::read_to_string(path)?;
        Ok(toml::from_str(&data)?)
    }

    /// An explicit path must exist. Without one, `snmpcfg.toml` in the working
    /// directory is used when present, defaults otherwise.
    pub fn load_or_default(path: Option<&Path>) -> SnmpCfgResult<Self> {
        match path {
            Some(path) => Self::load(path),
            None => {
                let path = Path::new(DEFAULT_CONFIG_FILE);
                if path.exists() {
                    Self::load(path)
                } else {
                    debug!("no {} found, using defaults", DEFAULT_CONFIG_FILE);
                    Ok(Self::default())
                }
            }
        }
    }
}
