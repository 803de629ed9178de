//! Request classification: the three-way policy split.
//!
//! This module determines which retrieval strategy handles each
//! intercepted request. The classifier is intentionally simple — a host
//! lookup against two configured lists, re-evaluated per request with no
//! memoization and no path or content-type inspection.
//!
//! The split is a deliberate policy trade:
//!
//! - Data-API hosts are [`Passthrough`](RequestClass::Passthrough): a
//!   stale spreadsheet row shown as fresh is worse than a visible
//!   network failure, so the cache never touches these in either
//!   direction.
//! - Media hosts are [`Image`](RequestClass::Image): image bytes for a
//!   given URL never change, so cache-first is safe and saves the radio.
//! - Everything else is [`Shell`](RequestClass::Shell): application
//!   documents, scripts, styles — served stale, refreshed behind the
//!   user's back.

use crate::types::InterceptedRequest;

/// Which strategy handles a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestClass {
    /// Decline interception; the request proceeds natively.
    Passthrough,
    /// Cache-first against the current image generation.
    Image,
    /// Stale-while-revalidate against the current shell generation.
    Shell,
}

impl RequestClass {
    /// Metric label for this class.
    pub fn as_label(&self) -> &'static str {
        match self {
            RequestClass::Passthrough => "passthrough",
            RequestClass::Image => "image",
            RequestClass::Shell => "shell",
        }
    }
}

/// Maps an intercepted request to its policy class.
///
/// Pure, synchronous, and total: every request gets a class, and URLs
/// without a host fall through to [`RequestClass::Shell`].
#[derive(Debug, Clone)]
pub struct Classifier {
    data_hosts: Vec<String>,
    media_hosts: Vec<String>,
}

impl Classifier {
    /// Build a classifier from the configured host lists.
    ///
    /// Hosts are lowercased once here; parsed URLs already carry
    /// lowercase hosts, so classification is a plain equality scan.
    pub fn new(data_hosts: Vec<String>, media_hosts: Vec<String>) -> Self {
        Self {
            data_hosts: data_hosts.into_iter().map(|h| h.to_lowercase()).collect(),
            media_hosts: media_hosts.into_iter().map(|h| h.to_lowercase()).collect(),
        }
    }

    /// Classify one request by its target host.
    pub fn classify(&self, request: &InterceptedRequest) -> RequestClass {
        match request.host() {
            Some(host) if self.data_hosts.iter().any(|h| h == host) => RequestClass::Passthrough,
            Some(host) if self.media_hosts.iter().any(|h| h == host) => RequestClass::Image,
            _ => RequestClass::Shell,
        }
    }
}
