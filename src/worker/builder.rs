//! Builder for configuring engine instances.

use std::sync::Arc;
use std::time::Duration;

use reqwest::Url;

use super::classify::Classifier;
use super::command::CommandChannel;
use super::interceptor::Interceptor;
use super::lifecycle::{LifecycleController, Promotion};
use super::strategy::StrategyEngine;
use crate::config::Config;
use crate::fetch::{Fetcher, HttpFetcher};
use crate::host::{NoopViews, ViewRegistry};
use crate::registry::GenerationRegistry;
use crate::store::{CacheStorage, MemoryStorage};
use crate::{MuninnError, Result};

/// Main entry point for creating engine instances.
pub struct Muninn;

impl Muninn {
    /// Create a new builder for configuring the engine.
    pub fn builder() -> MuninnBuilder {
        MuninnBuilder::new()
    }
}

/// Builder for configuring engine instances.
///
/// Starts from [`Config::default()`]; the setters override individual
/// settings and [`config()`](MuninnBuilder::config) applies a loaded TOML
/// layer wholesale. Collaborators default to [`MemoryStorage`],
/// [`HttpFetcher`], and [`NoopViews`].
pub struct MuninnBuilder {
    config: Config,
    storage: Option<Arc<dyn CacheStorage>>,
    fetcher: Option<Arc<dyn Fetcher>>,
    views: Option<Arc<dyn ViewRegistry>>,
}

impl MuninnBuilder {
    pub fn new() -> Self {
        Self {
            config: Config::default(),
            storage: None,
            fetcher: None,
            views: None,
        }
    }

    /// Apply a loaded configuration, replacing all settings (but not
    /// injected collaborators).
    pub fn config(mut self, config: Config) -> Self {
        self.config = config;
        self
    }

    /// Set the deployed cache version. Bump on every release that changes
    /// the shell; activation deletes every set from other versions.
    pub fn version(mut self, version: u32) -> Self {
        self.config.cache.version = version;
        self
    }

    /// Set the prefix shared by every cache set name.
    pub fn name_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.config.cache.prefix = prefix.into();
        self
    }

    /// Set the origin the application shell is served from.
    pub fn shell_origin(mut self, origin: impl Into<String>) -> Self {
        self.config.shell.origin = origin.into();
        self
    }

    /// Replace the shell bootstrap manifest (paths joined against the
    /// shell origin at install time).
    pub fn shell_manifest<I, S>(mut self, paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.config.shell.manifest = paths.into_iter().map(Into::into).collect();
        self
    }

    /// Replace the data-API host list (classified passthrough).
    pub fn data_hosts<I, S>(mut self, hosts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.config.hosts.data = hosts.into_iter().map(Into::into).collect();
        self
    }

    /// Replace the media host list (classified image, cache-first).
    pub fn media_hosts<I, S>(mut self, hosts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.config.hosts.media = hosts.into_iter().map(Into::into).collect();
        self
    }

    /// Set the promotion urgency for this version.
    pub fn promotion(mut self, promotion: Promotion) -> Self {
        self.config.shell.promotion = promotion;
        self
    }

    /// Set the network timeout for the default fetcher (seconds).
    pub fn timeout(mut self, secs: u64) -> Self {
        self.config.network.timeout_secs = secs;
        self
    }

    /// Inject a cache storage backend (default: in-memory).
    pub fn storage(mut self, storage: Arc<dyn CacheStorage>) -> Self {
        self.storage = Some(storage);
        self
    }

    /// Inject a network fetcher (default: reqwest).
    pub fn fetcher(mut self, fetcher: Arc<dyn Fetcher>) -> Self {
        self.fetcher = Some(fetcher);
        self
    }

    /// Inject the host's view registry (default: no-op).
    pub fn views(mut self, views: Arc<dyn ViewRegistry>) -> Self {
        self.views = Some(views);
        self
    }

    /// Build the engine.
    pub fn build(self) -> Result<Interceptor> {
        let config = self.config;

        if config.shell.manifest.is_empty() {
            return Err(MuninnError::Configuration(
                "shell manifest must not be empty".to_string(),
            ));
        }
        if config.cache.version == 0 {
            return Err(MuninnError::Configuration(
                "cache version must be at least 1".to_string(),
            ));
        }
        let shell_origin = Url::parse(&config.shell.origin)
            .map_err(|e| MuninnError::InvalidUrl(format!("{}: {e}", config.shell.origin)))?;
        if shell_origin.host_str().is_none() {
            return Err(MuninnError::Configuration(format!(
                "shell origin has no host: {}",
                config.shell.origin
            )));
        }

        let storage = self
            .storage
            .unwrap_or_else(|| Arc::new(MemoryStorage::new()));
        let fetcher: Arc<dyn Fetcher> = match self.fetcher {
            Some(fetcher) => fetcher,
            None => Arc::new(HttpFetcher::new(Duration::from_secs(
                config.network.timeout_secs,
            ))?),
        };
        let views = self.views.unwrap_or_else(|| Arc::new(NoopViews));

        let registry = Arc::new(GenerationRegistry::new(
            &config.cache.prefix,
            config.cache.version,
        ));
        let classifier = Classifier::new(config.hosts.data, config.hosts.media);
        let strategy = StrategyEngine::new(storage.clone(), fetcher.clone());
        let lifecycle = LifecycleController::new(
            storage.clone(),
            fetcher.clone(),
            views.clone(),
            registry.clone(),
            shell_origin.clone(),
            config.shell.manifest,
            config.shell.promotion,
        );
        let commands = CommandChannel::new(storage, fetcher, views, registry.clone(), shell_origin);

        Ok(Interceptor::new(
            classifier, strategy, lifecycle, commands, registry,
        ))
    }
}

impl Default for MuninnBuilder {
    fn default() -> Self {
        Self::new()
    }
}
