//! Captured response snapshots.

use serde::{Deserialize, Serialize};

/// Immutable captured copy of a network response.
///
/// A snapshot records status, headers, and body at the moment the response
/// was received. Cache sets store a snapshot only when
/// [`is_success`](ResponseSnapshot::is_success) holds — failed or error
/// responses are never persisted. Once written, an entry is replace-only:
/// overwriting under the same key is the only mutation.
///
/// Serde-serializable so durable [`CacheStorage`](crate::store::CacheStorage)
/// backends can persist snapshots however they like.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResponseSnapshot {
    status: u16,
    headers: Vec<(String, String)>,
    body: Vec<u8>,
}

impl ResponseSnapshot {
    /// Capture a snapshot from its parts.
    pub fn new(status: u16, headers: Vec<(String, String)>, body: Vec<u8>) -> Self {
        Self {
            status,
            headers,
            body,
        }
    }

    /// A 200 snapshot with the given body and no headers.
    pub fn ok(body: impl Into<Vec<u8>>) -> Self {
        Self::new(200, Vec::new(), body.into())
    }

    /// HTTP status code.
    pub fn status(&self) -> u16 {
        self.status
    }

    /// Response headers in capture order.
    pub fn headers(&self) -> &[(String, String)] {
        &self.headers
    }

    /// Case-insensitive single-header lookup.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Response body bytes.
    pub fn body(&self) -> &[u8] {
        &self.body
    }

    /// Whether the status is in the 2xx range. Only successful snapshots
    /// may be written to a cache set.
    pub fn is_success(&self) -> bool {
        (200..=299).contains(&self.status)
    }
}
