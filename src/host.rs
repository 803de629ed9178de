//! Host runtime collaborators.
//!
//! The engine never owns application views or system notifications — the
//! host runtime does. These traits are the seam the
//! [`LifecycleController`](crate::worker::LifecycleController) (view
//! claiming) and the [`CommandChannel`](crate::worker::CommandChannel)
//! (notification focus/open) talk through. Hosts inject an implementation
//! via [`MuninnBuilder::views()`](crate::MuninnBuilder::views);
//! [`NoopViews`] serves hosts without a view layer.

use async_trait::async_trait;

use crate::Result;

/// One open application view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewHandle {
    /// Host-assigned identifier.
    pub id: String,
    /// URL the view is currently showing.
    pub url: String,
}

impl ViewHandle {
    /// Build a handle from its parts.
    pub fn new(id: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            url: url.into(),
        }
    }
}

/// The host's registry of open application views.
#[async_trait]
pub trait ViewRegistry: Send + Sync {
    /// Every currently open view.
    async fn views(&self) -> Vec<ViewHandle>;

    /// Route all open views through this engine instance, including
    /// views loaded before the current activation.
    async fn claim(&self) -> Result<()>;

    /// Bring an existing view to the foreground.
    async fn focus(&self, view: &ViewHandle) -> Result<()>;

    /// Open a new view at `url`.
    async fn open(&self, url: &str) -> Result<()>;
}

/// Do-nothing [`ViewRegistry`] for hosts without a view layer.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopViews;

#[async_trait]
impl ViewRegistry for NoopViews {
    async fn views(&self) -> Vec<ViewHandle> {
        Vec::new()
    }

    async fn claim(&self) -> Result<()> {
        Ok(())
    }

    async fn focus(&self, _view: &ViewHandle) -> Result<()> {
        Ok(())
    }

    async fn open(&self, _url: &str) -> Result<()> {
        Ok(())
    }
}

/// Handle to the system notification a click interaction came from.
///
/// The engine closes the notification before performing the focus/open
/// action.
pub trait Notification: Send + Sync {
    /// Dismiss the notification.
    fn close(&self);
}
