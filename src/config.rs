//! Configuration loading.
//!
//! Configuration is loaded from TOML files with the following resolution order:
//! 1. explicit path (host-provided)
//! 2. `~/.muninn/config.toml` (user)
//! 3. `/etc/muninn/config.toml` (system)
//!
//! Every section is optional; defaults reproduce the field application's
//! stock deployment (Sheets data API, Drive-hosted media, minimal shell
//! manifest). Embedded hosts that configure the builder directly never
//! need a config file.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::worker::Promotion;
use crate::{MuninnError, Result};

/// Engine configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub cache: CacheConfig,
    #[serde(default)]
    pub shell: ShellConfig,
    #[serde(default)]
    pub hosts: HostsConfig,
    #[serde(default)]
    pub network: NetworkConfig,
}

/// Cache set naming.
#[derive(Debug, Clone, Deserialize)]
pub struct CacheConfig {
    /// Prefix shared by every set name (default: "muninn").
    #[serde(default = "default_prefix")]
    pub prefix: String,
    /// Deployed cache version; bump on every release that changes the
    /// shell (default: 1).
    #[serde(default = "default_version")]
    pub version: u32,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            prefix: default_prefix(),
            version: default_version(),
        }
    }
}

fn default_prefix() -> String {
    "muninn".to_string()
}

fn default_version() -> u32 {
    1
}

/// Application shell: origin, bootstrap manifest, promotion urgency.
#[derive(Debug, Clone, Deserialize)]
pub struct ShellConfig {
    /// Origin the application is served from (default: http://127.0.0.1:8080).
    #[serde(default = "default_origin")]
    pub origin: String,
    /// Paths seeded into the shell set during install, joined against
    /// `origin`. Install is all-or-nothing over this list.
    #[serde(default = "default_manifest")]
    pub manifest: Vec<String>,
    /// Whether a freshly installed version self-promotes (default: immediate).
    #[serde(default)]
    pub promotion: Promotion,
}

impl Default for ShellConfig {
    fn default() -> Self {
        Self {
            origin: default_origin(),
            manifest: default_manifest(),
            promotion: Promotion::default(),
        }
    }
}

fn default_origin() -> String {
    "http://127.0.0.1:8080".to_string()
}

fn default_manifest() -> Vec<String> {
    vec![
        "/".to_string(),
        "/index.html".to_string(),
        "/icon-192.png".to_string(),
        "/icon-512.png".to_string(),
    ]
}

/// Host lists driving request classification.
#[derive(Debug, Clone, Deserialize)]
pub struct HostsConfig {
    /// Data API hosts — requests to these are never cached in either
    /// direction (passthrough).
    #[serde(default = "default_data_hosts")]
    pub data: Vec<String>,
    /// Media hosts — requests to these are served cache-first.
    #[serde(default = "default_media_hosts")]
    pub media: Vec<String>,
}

impl Default for HostsConfig {
    fn default() -> Self {
        Self {
            data: default_data_hosts(),
            media: default_media_hosts(),
        }
    }
}

fn default_data_hosts() -> Vec<String> {
    vec!["sheets.googleapis.com".to_string()]
}

fn default_media_hosts() -> Vec<String> {
    vec![
        "drive.google.com".to_string(),
        "lh3.googleusercontent.com".to_string(),
    ]
}

/// Network behaviour.
#[derive(Debug, Clone, Deserialize)]
pub struct NetworkConfig {
    /// Request timeout in seconds (default: 30).
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout(),
        }
    }
}

fn default_timeout() -> u64 {
    30
}

impl Config {
    /// Load configuration from the standard locations.
    ///
    /// Resolution order:
    /// 1. Explicit path (if provided)
    /// 2. `~/.muninn/config.toml`
    /// 3. `/etc/muninn/config.toml`
    pub fn load(explicit_path: Option<&Path>) -> Result<Self> {
        let path = Self::resolve_config_path(explicit_path)?;
        let content = fs::read_to_string(&path).map_err(|e| {
            MuninnError::Configuration(format!("Failed to read config file {path:?}: {e}"))
        })?;
        toml::from_str(&content).map_err(|e| {
            MuninnError::Configuration(format!("Failed to parse config file {path:?}: {e}"))
        })
    }

    /// Resolve the config file path.
    fn resolve_config_path(explicit: Option<&Path>) -> Result<PathBuf> {
        if let Some(path) = explicit {
            if path.exists() {
                return Ok(path.to_path_buf());
            }
            return Err(MuninnError::Configuration(format!(
                "Config file not found: {path:?}"
            )));
        }

        // User config
        if let Some(home) = dirs::home_dir() {
            let user_config = home.join(".muninn").join("config.toml");
            if user_config.exists() {
                return Ok(user_config);
            }
        }

        // System config
        let system_config = PathBuf::from("/etc/muninn/config.toml");
        if system_config.exists() {
            return Ok(system_config);
        }

        Err(MuninnError::Configuration(
            "No config file found. Create ~/.muninn/config.toml or /etc/muninn/config.toml"
                .to_string(),
        ))
    }
}
