//! Lifecycle controller: installing → waiting → activating → active.
//!
//! One controller instance corresponds to one deployed version. The host
//! runtime delivers `install` and `activate` strictly in that order and
//! never concurrently for the same instance; the install/activate of a
//! new version may overlap with in-flight fetch handling from the still
//! active previous version, which generation cleanup tolerates by
//! deleting only sets absent from the new registry.

use std::sync::{Arc, Mutex};

use futures_util::future::{join_all, try_join_all};
use reqwest::Url;
use serde::Deserialize;
use tracing::{info, warn};

use crate::fetch::Fetcher;
use crate::host::ViewRegistry;
use crate::registry::GenerationRegistry;
use crate::store::CacheStorage;
use crate::telemetry;
use crate::types::InterceptedRequest;
use crate::{MuninnError, Result};

/// Where this engine instance is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Seeding the shell set; not yet eligible to serve.
    Installing,
    /// Installed, waiting for the host to deliver `activate`.
    Waiting,
    /// Cleaning up stale generations and claiming views.
    Activating,
    /// Serving. Terminal until a newer version supersedes this instance.
    Active,
}

/// How urgently a freshly installed version takes over.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Promotion {
    /// Self-promote: the host may activate straight after install without
    /// waiting for a predecessor instance to retire. The default — shell
    /// assets are latency-sensitive.
    #[default]
    Immediate,
    /// Defer activation until no other instance is running.
    Deferred,
}

/// Drives the lifecycle state machine and owns generation membership.
pub struct LifecycleController {
    storage: Arc<dyn CacheStorage>,
    fetcher: Arc<dyn Fetcher>,
    views: Arc<dyn ViewRegistry>,
    registry: Arc<GenerationRegistry>,
    shell_origin: Url,
    manifest: Vec<String>,
    promotion: Promotion,
    phase: Mutex<Phase>,
}

impl LifecycleController {
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn new(
        storage: Arc<dyn CacheStorage>,
        fetcher: Arc<dyn Fetcher>,
        views: Arc<dyn ViewRegistry>,
        registry: Arc<GenerationRegistry>,
        shell_origin: Url,
        manifest: Vec<String>,
        promotion: Promotion,
    ) -> Self {
        Self {
            storage,
            fetcher,
            views,
            registry,
            shell_origin,
            manifest,
            promotion,
            phase: Mutex::new(Phase::Installing),
        }
    }

    /// Current lifecycle phase.
    pub fn phase(&self) -> Phase {
        *self.phase.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn set_phase(&self, phase: Phase) {
        *self.phase.lock().unwrap_or_else(|e| e.into_inner()) = phase;
    }

    /// Configured promotion urgency. The host dispatcher honours it when
    /// deciding how soon to deliver `activate`.
    pub fn promotion(&self) -> Promotion {
        self.promotion
    }

    /// Seed the current shell set with the bootstrap manifest.
    ///
    /// All-or-nothing: every manifest path must fetch with a success
    /// status before anything is written. Any transport error or
    /// non-success status fails the whole install, nothing is persisted,
    /// and the phase stays [`Phase::Installing`] — the new version must
    /// not supersede the currently active one.
    pub async fn install(&self) -> Result<()> {
        info!(
            version = self.registry.version(),
            set = self.registry.shell(),
            "installing shell generation"
        );

        let requests = self
            .manifest
            .iter()
            .map(|path| {
                let url = self.shell_origin.join(path).map_err(|e| {
                    MuninnError::InstallFailed {
                        url: path.clone(),
                        reason: e.to_string(),
                    }
                })?;
                InterceptedRequest::get(url.as_str())
            })
            .collect::<Result<Vec<_>>>()?;

        let fetcher = &self.fetcher;
        let fetches = requests.iter().map(|request| async move {
            let snapshot =
                fetcher
                    .fetch(request)
                    .await
                    .map_err(|e| MuninnError::InstallFailed {
                        url: request.url().to_string(),
                        reason: e.to_string(),
                    })?;
            if !snapshot.is_success() {
                return Err(MuninnError::InstallFailed {
                    url: request.url().to_string(),
                    reason: format!("status {}", snapshot.status()),
                });
            }
            Ok((request.key(), snapshot))
        });
        let entries = try_join_all(fetches).await?;

        let shell = self.storage.open(self.registry.shell()).await?;
        for (key, snapshot) in entries {
            shell.store(key, snapshot).await?;
        }

        self.set_phase(Phase::Waiting);
        info!(
            entries = self.manifest.len(),
            "shell generation installed, waiting"
        );
        Ok(())
    }

    /// Delete stale generations and take over all open views.
    ///
    /// Every set whose name is absent from the current registry is
    /// deleted, in parallel; individual deletion failures are logged and
    /// left for a future activation to retry. A set still being read by
    /// an in-flight request survives as that reader's handle — the store
    /// contract guarantees it.
    pub async fn activate(&self) -> Result<()> {
        self.set_phase(Phase::Activating);

        let names = self.storage.names().await?;
        let stale = self.registry.stale(&names);

        let storage = &self.storage;
        let deletions = stale.iter().map(|name| async move {
            match storage.delete(name).await {
                Ok(_) => {
                    metrics::counter!(telemetry::GENERATIONS_DELETED_TOTAL).increment(1);
                    info!(set = name, "deleted stale cache set");
                }
                Err(e) => {
                    warn!(set = name, error = %e, "failed to delete stale cache set");
                }
            }
        });
        join_all(deletions).await;

        self.views.claim().await?;
        self.set_phase(Phase::Active);
        info!(version = self.registry.version(), "activation complete");
        Ok(())
    }
}
