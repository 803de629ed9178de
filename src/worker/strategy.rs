//! Retrieval strategies over the cache store.
//!
//! Three independent procedures, selected by the
//! [`Classifier`](super::Classifier):
//!
//! - **Passthrough** is not a procedure at all — the engine returns
//!   [`FetchOutcome::Declined`] and the host lets the request proceed as
//!   if no interception layer existed. No cache read or write occurs.
//! - **Cache-first** ([`StrategyEngine::cache_first`]) serves a hit with
//!   zero network traffic, however old the snapshot; a miss goes to the
//!   network and a successful response is stored before it is returned.
//! - **Stale-while-revalidate**
//!   ([`StrategyEngine::stale_while_revalidate`]) answers from cache
//!   without waiting for the network and lets a detached task overwrite
//!   the entry once the fresh response lands.
//!
//! # Error policy
//!
//! Failures that would leave the caller with no answer are surfaced: a
//! cache-first miss whose fetch dies propagates the error. Failures after
//! a usable answer was already returned are suppressed: a revalidation
//! that dies is warn-logged and not retried until the next request for
//! that identity.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::fetch::Fetcher;
use crate::store::CacheStorage;
use crate::telemetry;
use crate::types::{InterceptedRequest, ResponseSnapshot};
use crate::{MuninnError, Result};

/// Outcome of intercepting one request.
#[derive(Debug)]
pub enum FetchOutcome {
    /// The engine declines involvement; the host performs the request
    /// natively and the response is bit-identical to an unintercepted
    /// call.
    Declined,
    /// The engine supplies the response.
    Response(ResponseSnapshot),
}

/// Executes the retrieval strategies against a cache set.
pub struct StrategyEngine {
    storage: Arc<dyn CacheStorage>,
    fetcher: Arc<dyn Fetcher>,
}

impl StrategyEngine {
    pub(crate) fn new(storage: Arc<dyn CacheStorage>, fetcher: Arc<dyn Fetcher>) -> Self {
        Self { storage, fetcher }
    }

    /// Cache-first retrieval.
    ///
    /// A hit is returned immediately — no network call is made, even if
    /// the snapshot is old. A miss fetches; a successful response is
    /// stored under the request identity before being returned, which
    /// bounds the strategy to at most one network fetch per distinct
    /// identity per generation. A transport failure on a miss propagates:
    /// there is nothing better to return.
    pub async fn cache_first(
        &self,
        set_name: &str,
        request: &InterceptedRequest,
    ) -> Result<ResponseSnapshot> {
        let set = self.storage.open(set_name).await?;
        let key = request.key();

        if let Some(snapshot) = set.lookup(&key).await {
            metrics::counter!(telemetry::CACHE_HITS_TOTAL, "strategy" => "cache_first")
                .increment(1);
            debug!(%key, "cache-first hit");
            return Ok(snapshot);
        }
        metrics::counter!(telemetry::CACHE_MISSES_TOTAL, "strategy" => "cache_first").increment(1);

        let fetched = self.fetcher.fetch(request).await?;
        if fetched.is_success() {
            if let Err(e) = set.store(key, fetched.clone()).await {
                // The caller still has a usable answer; don't take it away.
                warn!(error = %e, "failed to store cache-first response");
            }
        }
        Ok(fetched)
    }

    /// Stale-while-revalidate retrieval.
    ///
    /// The network fetch is spawned before the cache lookup so neither
    /// waits on the other. On a hit the snapshot is returned immediately
    /// and the fetch keeps running detached, overwriting the entry when
    /// it resolves with a success status; its failure is warn-logged and
    /// invisible to the caller. On a miss the caller receives the network
    /// result directly once it resolves.
    pub async fn stale_while_revalidate(
        &self,
        set_name: &str,
        request: &InterceptedRequest,
    ) -> Result<ResponseSnapshot> {
        let set = self.storage.open(set_name).await?;
        let key = request.key();

        let refresh = {
            let fetcher = self.fetcher.clone();
            let set = set.clone();
            let key = key.clone();
            let request = request.clone();
            tokio::spawn(async move {
                let fetched = fetcher.fetch(&request).await?;
                if fetched.is_success() {
                    if let Err(e) = set.store(key, fetched.clone()).await {
                        warn!(error = %e, "failed to store revalidated response");
                    }
                }
                Ok::<ResponseSnapshot, MuninnError>(fetched)
            })
        };

        if let Some(snapshot) = set.lookup(&key).await {
            metrics::counter!(telemetry::CACHE_HITS_TOTAL, "strategy" => "stale_while_revalidate")
                .increment(1);
            debug!(%key, "serving stale, revalidating in background");
            // Watch the detached refresh only to account for it; the
            // caller already has its answer.
            tokio::spawn(async move {
                match refresh.await {
                    Ok(Ok(_)) => {
                        metrics::counter!(telemetry::REVALIDATIONS_TOTAL, "status" => "ok")
                            .increment(1);
                    }
                    Ok(Err(e)) => {
                        metrics::counter!(telemetry::REVALIDATIONS_TOTAL, "status" => "error")
                            .increment(1);
                        warn!(%key, error = %e, "revalidation failed; stale entry retained");
                    }
                    Err(e) => {
                        metrics::counter!(telemetry::REVALIDATIONS_TOTAL, "status" => "error")
                            .increment(1);
                        warn!(%key, error = %e, "revalidation task failed");
                    }
                }
            });
            return Ok(snapshot);
        }
        metrics::counter!(telemetry::CACHE_MISSES_TOTAL, "strategy" => "stale_while_revalidate")
            .increment(1);

        match refresh.await {
            Ok(result) => result,
            Err(e) => Err(MuninnError::Task(e.to_string())),
        }
    }
}
