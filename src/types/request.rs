//! Intercepted request descriptor and cache identity.

use std::fmt;

use reqwest::Url;
use serde::{Deserialize, Serialize};

use crate::{MuninnError, Result};

/// Read-only description of one outbound network call.
///
/// Exists only for the duration of handling a single fetch event and is
/// never persisted — only a derived [`ResponseSnapshot`](crate::ResponseSnapshot)
/// may be. Cloneable so a detached revalidation task can own a copy after
/// the originating event handler has returned.
#[derive(Debug, Clone)]
pub struct InterceptedRequest {
    method: String,
    url: Url,
    headers: Vec<(String, String)>,
}

impl InterceptedRequest {
    /// Parse a request descriptor from a method and an absolute URL.
    pub fn new(method: impl Into<String>, url: &str) -> Result<Self> {
        let parsed =
            Url::parse(url).map_err(|e| MuninnError::InvalidUrl(format!("{url}: {e}")))?;
        Ok(Self {
            method: method.into().to_ascii_uppercase(),
            url: parsed,
            headers: Vec::new(),
        })
    }

    /// Convenience constructor for a GET request.
    pub fn get(url: &str) -> Result<Self> {
        Self::new("GET", url)
    }

    /// Attach a request header (builder style).
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Request method, uppercased.
    pub fn method(&self) -> &str {
        &self.method
    }

    /// Parsed target URL.
    pub fn url(&self) -> &Url {
        &self.url
    }

    /// Request headers in insertion order.
    pub fn headers(&self) -> &[(String, String)] {
        &self.headers
    }

    /// Host component of the target URL, if any.
    pub fn host(&self) -> Option<&str> {
        self.url.host_str()
    }

    /// The cache identity of this request.
    pub fn key(&self) -> RequestKey {
        RequestKey::new(&self.method, self.url.as_str())
    }
}

/// Cache identity of a request: method plus normalized URL.
///
/// Normalization happens at parse time — [`Url`] lowercases the host and
/// drops default ports. Query and fragment stay significant: two URLs
/// differing only in query string are distinct identities.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RequestKey {
    method: String,
    url: String,
}

impl RequestKey {
    /// Build a key from an already-normalized URL string.
    pub fn new(method: &str, url: &str) -> Self {
        Self {
            method: method.to_ascii_uppercase(),
            url: url.to_string(),
        }
    }

    /// Request method, uppercased.
    pub fn method(&self) -> &str {
        &self.method
    }

    /// Normalized URL string.
    pub fn url(&self) -> &str {
        &self.url
    }
}

impl fmt::Display for RequestKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.method, self.url)
    }
}
