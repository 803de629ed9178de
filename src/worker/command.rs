//! Command channel: bulk precache and notification interactions.
//!
//! Commands arrive out-of-band from host application views and are
//! fire-and-forget — nothing is ever reported back to the sender. A
//! user-initiated background precache is advisory, not transactional:
//! each URL fails or succeeds on its own and partial success is the
//! expected outcome.

use std::sync::Arc;

use futures_util::future::join_all;
use reqwest::Url;
use tracing::{debug, warn};

use crate::fetch::Fetcher;
use crate::host::{Notification, ViewHandle, ViewRegistry};
use crate::registry::GenerationRegistry;
use crate::store::{CacheSet, CacheStorage};
use crate::telemetry;
use crate::types::{Command, InterceptedRequest};
use crate::{MuninnError, Result};

/// Executes out-of-band commands against the cache store and the host's
/// view list.
pub struct CommandChannel {
    storage: Arc<dyn CacheStorage>,
    fetcher: Arc<dyn Fetcher>,
    views: Arc<dyn ViewRegistry>,
    registry: Arc<GenerationRegistry>,
    app_origin: Url,
}

impl CommandChannel {
    pub(crate) fn new(
        storage: Arc<dyn CacheStorage>,
        fetcher: Arc<dyn Fetcher>,
        views: Arc<dyn ViewRegistry>,
        registry: Arc<GenerationRegistry>,
        app_origin: Url,
    ) -> Self {
        Self {
            storage,
            fetcher,
            views,
            registry,
            app_origin,
        }
    }

    /// Dispatch one decoded command.
    pub async fn handle(&self, command: Command) {
        match command {
            Command::PrecacheImages(urls) => self.precache(&urls).await,
        }
    }

    /// Best-effort bulk precache into the current image set.
    ///
    /// All URLs are fetched concurrently. Each item's failure — parse,
    /// transport, or non-success status — is caught and logged in
    /// isolation and never aborts the batch.
    pub async fn precache(&self, urls: &[String]) {
        let set = match self.storage.open(self.registry.image()).await {
            Ok(set) => set,
            Err(e) => {
                warn!(error = %e, "precache aborted: image set unavailable");
                return;
            }
        };
        debug!(count = urls.len(), set = set.name(), "precaching images");

        let jobs = urls.iter().map(|url| {
            let set = set.clone();
            async move {
                match self.precache_one(set, url).await {
                    Ok(()) => {
                        metrics::counter!(telemetry::PRECACHE_ITEMS_TOTAL, "status" => "ok")
                            .increment(1);
                    }
                    Err(e) => {
                        metrics::counter!(telemetry::PRECACHE_ITEMS_TOTAL, "status" => "error")
                            .increment(1);
                        warn!(url = %url, error = %e, "precache item failed");
                    }
                }
            }
        });
        join_all(jobs).await;
    }

    async fn precache_one(&self, set: Arc<dyn CacheSet>, url: &str) -> Result<()> {
        let request = InterceptedRequest::get(url)?;
        let snapshot = self.fetcher.fetch(&request).await?;
        if !snapshot.is_success() {
            return Err(MuninnError::UpstreamStatus {
                status: snapshot.status(),
                url: url.to_string(),
            });
        }
        set.store(request.key(), snapshot).await
    }

    /// React to a click on a system notification.
    ///
    /// Closes the notification, then focuses the first open view on the
    /// application's origin, or opens a new one there if none exists.
    /// Exactly one view is focused or opened per click.
    pub async fn notification_clicked(&self, notification: &dyn Notification) -> Result<()> {
        notification.close();

        let views = self.views.views().await;
        match views.iter().find(|view| self.is_app_view(view)) {
            Some(view) => {
                debug!(view = %view.id, "focusing existing application view");
                self.views.focus(view).await
            }
            None => {
                debug!(origin = %self.app_origin, "no open application view, opening one");
                self.views.open(self.app_origin.as_str()).await
            }
        }
    }

    fn is_app_view(&self, view: &ViewHandle) -> bool {
        Url::parse(&view.url).is_ok_and(|url| url.origin() == self.app_origin.origin())
    }
}
