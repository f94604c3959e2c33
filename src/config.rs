use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::entity::Role;
use crate::permission::Viewer;
use crate::tree::{BuildOptions, OrphanPolicy, SortKey};

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    /// Logging configuration
    #[serde(default)]
    pub log: LogConfig,
    /// Where employee and department records come from
    #[serde(default)]
    pub source: SourceConfig,
    /// Tree construction and display options
    #[serde(default)]
    pub tree: TreeConfig,
    /// Identity used for the access filter
    #[serde(default)]
    pub viewer: ViewerConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LogConfig {
    /// Log level: trace, debug, info, warn, error
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    #[default]
    File,
    Http,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SourceConfig {
    #[serde(default)]
    pub kind: SourceKind,
    /// Snapshot file for the `file` source
    #[serde(default = "default_source_path")]
    pub path: PathBuf,
    /// Backend URL for the `http` source (e.g., "http://localhost:8080")
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Bearer token for the `http` source
    #[serde(default)]
    pub token: String,
    /// Fetch the nested org chart report instead of the flat employee list
    #[serde(default)]
    pub report: bool,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            kind: SourceKind::default(),
            path: default_source_path(),
            base_url: default_base_url(),
            token: String::new(),
            report: false,
        }
    }
}

fn default_source_path() -> PathBuf {
    PathBuf::from("./etc/employees.json")
}

fn default_base_url() -> String {
    "http://localhost:8080".to_string()
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct TreeConfig {
    #[serde(default)]
    pub orphans: OrphanPolicy,
    #[serde(default)]
    pub sort: SortKey,
    /// Rows at this depth or deeper start collapsed (all expanded if unset)
    #[serde(default)]
    pub expand_depth: Option<usize>,
}

impl TreeConfig {
    pub fn build_options(&self) -> BuildOptions {
        BuildOptions {
            orphans: self.orphans,
            sort: self.sort,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ViewerConfig {
    #[serde(default)]
    pub id: i64,
    #[serde(default = "default_viewer_role")]
    pub role: Role,
    #[serde(default)]
    pub department_id: Option<i64>,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            id: 0,
            role: default_viewer_role(),
            department_id: None,
        }
    }
}

fn default_viewer_role() -> Role {
    Role::Admin
}

impl ViewerConfig {
    pub fn viewer(&self) -> Viewer {
        Viewer {
            id: self.id,
            role: self.role,
            department_id: self.department_id,
        }
    }
}

impl Config {
    /// Load configuration from TOML file
    pub fn load(path: &str) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }
}
