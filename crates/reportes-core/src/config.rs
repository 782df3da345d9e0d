//! Project and user configuration.
//!
//! Project settings live in `.reportes/config.toml`; the user-level file at
//! `<config_dir>/reportes/config.toml` only carries presentation defaults.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::{Path, PathBuf};

/// Directory created by `rp init` at the project root.
pub const PROJECT_DIR: &str = ".reportes";

/// Overrides the ticket database path.
pub const TICKETS_DB_ENV: &str = "REPORTES_DB";

/// Overrides the office directory database path.
pub const OFFICES_DB_ENV: &str = "REPORTES_OFFICES_DB";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProjectConfig {
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub staff: StaffConfig,
    #[serde(default)]
    pub stats: StatsConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Ticket database, relative to `.reportes/` unless absolute.
    #[serde(default = "default_tickets_db")]
    pub tickets: PathBuf,
    /// Office directory database, relative to `.reportes/` unless absolute.
    #[serde(default = "default_offices_db")]
    pub offices: PathBuf,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            tickets: default_tickets_db(),
            offices: default_offices_db(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StaffConfig {
    /// Technicians offered as resolvers.
    #[serde(default = "default_employees")]
    pub employees: Vec<String>,
}

impl Default for StaffConfig {
    fn default() -> Self {
        Self {
            employees: default_employees(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatsConfig {
    /// Month-name locale for trend labels: `en` or `es`.
    #[serde(default = "default_locale")]
    pub locale: String,
    /// Length of the office/floor/resolver rankings.
    #[serde(default = "default_top")]
    pub top: usize,
}

impl Default for StatsConfig {
    fn default() -> Self {
        Self {
            locale: default_locale(),
            top: default_top(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UserConfig {
    #[serde(default)]
    pub output: Option<String>,
}

/// Fully resolved store locations for one invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorePaths {
    pub tickets: PathBuf,
    pub offices: PathBuf,
}

/// Path of the project directory under `project_root`.
#[must_use]
pub fn project_dir(project_root: &Path) -> PathBuf {
    project_root.join(PROJECT_DIR)
}

/// Load `.reportes/config.toml`, or defaults when the file is absent.
///
/// # Errors
///
/// Returns an error if the file exists but cannot be read or parsed.
pub fn load_project_config(project_root: &Path) -> Result<ProjectConfig> {
    let path = project_dir(project_root).join("config.toml");
    if !path.exists() {
        return Ok(ProjectConfig::default());
    }

    let content = std::fs::read_to_string(&path)
        .with_context(|| format!("Failed to read {}", path.display()))?;

    toml::from_str::<ProjectConfig>(&content)
        .with_context(|| format!("Failed to parse {}", path.display()))
}

/// Load the per-user config, or defaults when there is none.
///
/// # Errors
///
/// Returns an error if the file exists but cannot be read or parsed.
pub fn load_user_config() -> Result<UserConfig> {
    let Some(config_dir) = dirs::config_dir() else {
        return Ok(UserConfig::default());
    };

    let path = config_dir.join("reportes/config.toml");
    if !path.exists() {
        return Ok(UserConfig::default());
    }

    let content = std::fs::read_to_string(&path)
        .with_context(|| format!("Failed to read {}", path.display()))?;

    toml::from_str::<UserConfig>(&content)
        .with_context(|| format!("Failed to parse {}", path.display()))
}

/// Serialize a config for `rp init`.
///
/// # Errors
///
/// Returns an error if TOML serialization fails.
pub fn render_project_config(config: &ProjectConfig) -> Result<String> {
    toml::to_string_pretty(config).context("serialize project config")
}

impl ProjectConfig {
    /// Resolve database locations, honoring the environment overrides.
    #[must_use]
    pub fn store_paths(&self, project_root: &Path) -> StorePaths {
        self.store_paths_with(
            project_root,
            env::var_os(TICKETS_DB_ENV).map(PathBuf::from),
            env::var_os(OFFICES_DB_ENV).map(PathBuf::from),
        )
    }

    fn store_paths_with(
        &self,
        project_root: &Path,
        tickets_override: Option<PathBuf>,
        offices_override: Option<PathBuf>,
    ) -> StorePaths {
        let base = project_dir(project_root);
        StorePaths {
            tickets: tickets_override.unwrap_or_else(|| base.join(&self.store.tickets)),
            offices: offices_override.unwrap_or_else(|| base.join(&self.store.offices)),
        }
    }
}

fn default_tickets_db() -> PathBuf {
    PathBuf::from("tickets.db")
}

fn default_offices_db() -> PathBuf {
    PathBuf::from("offices.db")
}

fn default_employees() -> Vec<String> {
    ["Tomas", "Norela", "Nahuel", "Adrian", "Marcelo", "Chloe"]
        .into_iter()
        .map(String::from)
        .collect()
}

fn default_locale() -> String {
    "en".to_string()
}

const fn default_top() -> usize {
    5
}
