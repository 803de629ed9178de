//! The event-facing engine core.
//!
//! The host runtime delivers three kinds of events — lifecycle
//! (install/activate), request interception (fetch), and messages
//! (commands) — plus notification interactions. [`Interceptor`] exposes
//! one entry point per event; a single-threaded dispatcher invokes them
//! one at a time, and any concurrency (revalidation, precache fan-out)
//! lives inside the handlers as explicit task composition.

use std::sync::Arc;

use tracing::debug;

use super::classify::{Classifier, RequestClass};
use super::command::CommandChannel;
use super::lifecycle::{LifecycleController, Phase, Promotion};
use super::strategy::{FetchOutcome, StrategyEngine};
use crate::host::Notification;
use crate::registry::GenerationRegistry;
use crate::telemetry;
use crate::types::{Command, InterceptedRequest};
use crate::Result;

/// The background interception core: classifies every outbound request
/// and answers from cache, proxies to the network, or declines.
pub struct Interceptor {
    classifier: Classifier,
    strategy: StrategyEngine,
    lifecycle: LifecycleController,
    commands: CommandChannel,
    registry: Arc<GenerationRegistry>,
}

impl std::fmt::Debug for Interceptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Interceptor").finish_non_exhaustive()
    }
}

impl Interceptor {
    pub(crate) fn new(
        classifier: Classifier,
        strategy: StrategyEngine,
        lifecycle: LifecycleController,
        commands: CommandChannel,
        registry: Arc<GenerationRegistry>,
    ) -> Self {
        Self {
            classifier,
            strategy,
            lifecycle,
            commands,
            registry,
        }
    }

    /// Lifecycle event: seed the shell generation. All-or-nothing; on
    /// failure the phase stays `Installing` and this version never
    /// activates.
    pub async fn handle_install(&self) -> Result<()> {
        self.lifecycle.install().await
    }

    /// Lifecycle event: delete stale generations and claim open views.
    pub async fn handle_activate(&self) -> Result<()> {
        self.lifecycle.activate().await
    }

    /// Request interception event.
    ///
    /// Classifies the request and either declines (passthrough — the
    /// host proceeds natively, the cache untouched in either direction)
    /// or supplies a response via the class's strategy.
    pub async fn handle_fetch(&self, request: &InterceptedRequest) -> Result<FetchOutcome> {
        let class = self.classifier.classify(request);
        debug!(
            method = request.method(),
            url = %request.url(),
            class = class.as_label(),
            "intercepted request"
        );

        let outcome = match class {
            RequestClass::Passthrough => Ok(FetchOutcome::Declined),
            RequestClass::Image => self
                .strategy
                .cache_first(self.registry.image(), request)
                .await
                .map(FetchOutcome::Response),
            RequestClass::Shell => self
                .strategy
                .stale_while_revalidate(self.registry.shell(), request)
                .await
                .map(FetchOutcome::Response),
        };

        let status = if outcome.is_ok() { "ok" } else { "error" };
        metrics::counter!(
            telemetry::REQUESTS_TOTAL,
            "class" => class.as_label(),
            "status" => status
        )
        .increment(1);
        outcome
    }

    /// Message event: decode and execute one raw command.
    ///
    /// Fire-and-forget — decode failures (including unknown `type`
    /// values) are logged and dropped, and nothing is ever returned to
    /// the sender.
    pub async fn handle_message(&self, raw: &str) {
        match serde_json::from_str::<Command>(raw) {
            Ok(command) => self.commands.handle(command).await,
            Err(e) => debug!(error = %e, "ignoring undecodable command message"),
        }
    }

    /// Execute an already-decoded command.
    pub async fn handle_command(&self, command: Command) {
        self.commands.handle(command).await;
    }

    /// Notification interaction event: close the notification, then
    /// focus an open application view or open a new one.
    pub async fn handle_notification_click(&self, notification: &dyn Notification) -> Result<()> {
        self.commands.notification_clicked(notification).await
    }

    /// Current lifecycle phase.
    pub fn phase(&self) -> Phase {
        self.lifecycle.phase()
    }

    /// Configured promotion urgency.
    pub fn promotion(&self) -> Promotion {
        self.lifecycle.promotion()
    }

    /// The generation registry for this instance.
    pub fn registry(&self) -> &GenerationRegistry {
        &self.registry
    }
}
