use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Ok, Result};
use glob::Pattern;
use serde::{Deserialize, Serialize};

use crate::core::{
    generator::{DEFAULT_ENCODING, DEFAULT_TEMPLATE_EXTENSION},
    utils::{is_glob_pattern, resolve_encoding},
};

pub const CONFIG_FILE_NAME: &str = ".i18ngenrc.json";

#[derive(Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    #[serde(default = "default_template_extension")]
    pub template_extension: String,
    #[serde(default = "default_encoding")]
    pub encoding: String,
    #[serde(default)]
    pub ignores: Vec<String>,
    #[serde(default)]
    pub keep_going: bool,
}

fn default_template_extension() -> String {
    DEFAULT_TEMPLATE_EXTENSION.to_string()
}

fn default_encoding() -> String {
    DEFAULT_ENCODING.to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            template_extension: default_template_extension(),
            encoding: default_encoding(),
            ignores: Vec::new(),
            keep_going: false,
        }
    }
}

impl Config {
    /// Validate configuration values.
    ///
    /// Returns an error if a glob pattern in `ignores` is invalid, the encoding
    /// label is unknown, or the template extension is empty.
    pub fn validate(&self) -> Result<()> {
        // Patterns without wildcards are literal paths, so `[id]` needs no escaping.
        for pattern in &self.ignores {
            if is_glob_pattern(pattern) {
                Pattern::new(pattern)
                    .with_context(|| format!("Invalid glob pattern in 'ignores': \"{}\"", pattern))?;
            }
        }

        resolve_encoding(&self.encoding)
            .with_context(|| format!("Invalid 'encoding': \"{}\"", self.encoding))?;

        let extension = self.template_extension.trim_start_matches('.');
        if extension.is_empty() {
            anyhow::bail!("'templateExtension' must not be empty");
        }

        Ok(())
    }
}

pub fn find_config_file(start_dir: &Path) -> Option<PathBuf> {
    let mut current = start_dir.to_path_buf();

    loop {
        let config_path = current.join(CONFIG_FILE_NAME);
        if config_path.exists() {
            return Some(config_path);
        }
        if current.join(".git").exists() {
            return None;
        }
        if !current.pop() {
            return None;
        }
    }
}

/// Result of loading configuration.
pub struct ConfigLoadResult {
    pub config: Config,
    /// True if config was loaded from a file, false if using defaults.
    pub from_file: bool,
}

pub fn load_config(start_dir: &Path) -> Result<ConfigLoadResult> {
    match find_config_file(start_dir) {
        Some(path) => {
            let content = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read config file: {:?}", path))?;
            let config: Config = serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse config file: {:?}", path))?;
            config.validate()?;
            Ok(ConfigLoadResult {
                config,
                from_file: true,
            })
        }
        None => Ok(ConfigLoadResult {
            config: Config::default(),
            from_file: false,
        }),
    }
}
