use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use anyhow::{Context as _, Result, anyhow};
use serde::{Deserialize, Serialize};

use crate::git::LogOptions;

const CONFIG_DIR_NAME: &str = ".forkline";
const CONFIG_FILE_NAME: &str = "config.toml";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ThemePreference {
    #[default]
    System,
    Light,
    Dark,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GraphSettings {
    pub max_commits: usize,
    pub all_refs: bool,
    pub author_filter: Option<String>,
    pub zebra_rows: bool,
    pub graph_width: Option<f32>,
    pub min_graph_width: f32,
}

impl Default for GraphSettings {
    fn default() -> Self {
        Self {
            max_commits: 300,
            all_refs: true,
            author_filter: None,
            zebra_rows: true,
            graph_width: None,
            min_graph_width: 48.0,
        }
    }
}

impl GraphSettings {
    pub fn log_options(&self) -> LogOptions {
        LogOptions {
            limit: self.max_commits,
            all_refs: self.all_refs,
            author: self.author_filter.clone(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub theme: ThemePreference,
    pub graph: GraphSettings,
}

#[derive(Debug, Clone)]
pub struct ConfigStore {
    path: PathBuf,
}

impl ConfigStore {
    pub fn new() -> Result<Self> {
        let home_dir =
            dirs::home_dir().ok_or_else(|| anyhow!("failed to resolve home directory"))?;
        Ok(Self::at(home_dir.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME)))
    }

    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads the config file, writing the defaults first when none exists.
    pub fn load_or_create_default(&self) -> Result<AppConfig> {
        match fs::read_to_string(&self.path) {
            Ok(raw) => toml::from_str::<AppConfig>(&raw)
                .with_context(|| format!("invalid config at {}", self.path.display())),
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                let config = AppConfig::default();
                self.save(&config)?;
                Ok(config)
            }
            Err(err) => {
                Err(err).with_context(|| format!("failed to read config at {}", self.path.display()))
            }
        }
    }

    pub fn save(&self, config: &AppConfig) -> Result<()> {
        if let Some(dir) = self.path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
            fs::create_dir_all(dir)
                .with_context(|| format!("failed to create config directory {}", dir.display()))?;
        }
        let contents = toml::to_string_pretty(config).context("failed to encode config as TOML")?;
        fs::write(&self.path, contents)
            .with_context(|| format!("failed to write config at {}", self.path.display()))
    }
}
