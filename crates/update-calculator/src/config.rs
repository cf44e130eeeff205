// SPDX-License-Identifier: MIT OR Apache-2.0

use std::fs;
use std::path::{Path, PathBuf};

use libupdate_calculator::{Config, Error, Result};
use serde::Deserialize;

const CONFIG_FILE_NAME: &str = "update-calculator.toml";

fn config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join(CONFIG_FILE_NAME))
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct TomlConfig {
    mirror_dir: Option<PathBuf>,
    manifests_dir: Option<PathBuf>,
    arch: Option<String>,
    channels: Option<Vec<String>>,
    threads: Option<usize>,
}

/// values given on the command line; they win over the config file.
#[derive(Debug, Default)]
pub struct Overrides {
    pub mirror_dir: Option<PathBuf>,
    pub manifests_dir: Option<PathBuf>,
    pub threads: Option<usize>,
}

/// cli configuration wrapper that combines toml file parsing with the library's config.
#[derive(Debug, Clone)]
pub struct CliConfig {
    pub inner: Config,
}

impl std::ops::Deref for CliConfig {
    type Target = Config;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

impl CliConfig {
    /// loads `explicit` if given, otherwise the file in the user config dir if it exists.
    pub fn load(explicit: Option<&Path>, overrides: Overrides) -> Result<Self> {
        let toml_config = match explicit {
            Some(path) => Self::read_toml_config(path)?,
            None => match config_path().filter(|p| p.exists()) {
                Some(path) => Self::read_toml_config(&path)?,
                None => TomlConfig::default(),
            },
        };

        Self::resolve(toml_config, overrides)
    }

    fn read_toml_config(path: &Path) -> Result<TomlConfig> {
        let content = fs::read_to_string(path).map_err(|e| {
            Error::config(format!(
                "failed to read config file {}: {e}",
                path.display()
            ))
        })?;

        Self::parse_toml_config(&content).map_err(|e| {
            Error::config(format!(
                "failed to parse config file {}: {e}",
                path.display()
            ))
        })
    }

    fn parse_toml_config(content: &str) -> std::result::Result<TomlConfig, toml::de::Error> {
        toml::from_str(content)
    }

    fn resolve(toml_config: TomlConfig, overrides: Overrides) -> Result<Self> {
        let mirror_dir = overrides
            .mirror_dir
            .or(toml_config.mirror_dir)
            .ok_or_else(|| Error::config("mirror_dir is not set (use --mirror-dir)"))?;
        let manifests_dir = overrides
            .manifests_dir
            .or(toml_config.manifests_dir)
            .ok_or_else(|| Error::config("manifests_dir is not set (use --manifests-dir)"))?;

        let mut inner = Config::new(mirror_dir, manifests_dir);

        if let Some(arch) = toml_config.arch {
            inner = inner.with_arch(arch);
        }
        if let Some(channels) = toml_config.channels {
            if channels.is_empty() {
                return Err(Error::config("channels must not be empty"));
            }
            inner = inner.with_channels(channels);
        }
        if let Some(threads) = overrides.threads.or(toml_config.threads) {
            inner = inner.with_threads(threads);
        }

        Ok(Self { inner })
    }
}
