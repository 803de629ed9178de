//! Out-of-band command messages from host application views.

use serde::{Deserialize, Serialize};

/// A command posted by an application view.
///
/// Wire format matches the host application's message payloads:
///
/// ```json
/// { "type": "PRECACHE_IMAGES", "payload": ["https://...", "https://..."] }
/// ```
///
/// Commands are fire-and-forget — no response is returned to the sender.
/// Unknown `type` values fail to decode; the dispatcher logs and drops
/// them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload")]
pub enum Command {
    /// Proactively fetch the listed image URLs into the image cache set,
    /// best-effort and in order of the payload.
    #[serde(rename = "PRECACHE_IMAGES")]
    PrecacheImages(Vec<String>),
}
