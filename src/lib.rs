//! Muninn - offline-first request interception and caching core
//!
//! This crate is the background caching subsystem of a field application:
//! a host event dispatcher feeds it lifecycle events (install/activate),
//! request interception events (fetch), and out-of-band messages, and the
//! engine decides per request — by target host — whether to answer from a
//! persistent cache, proxy to the network, or run a cache-then-revalidate
//! hybrid. It also owns cache-generation rotation and a bulk-precache
//! command protocol.
//!
//! # Example
//!
//! ```rust,no_run
//! use muninn::{FetchOutcome, InterceptedRequest, Muninn};
//!
//! #[tokio::main]
//! async fn main() -> muninn::Result<()> {
//!     let engine = Muninn::builder()
//!         .version(5)
//!         .shell_origin("https://records.example.org")
//!         .shell_manifest(["/", "/index.html", "/icon-192.png"])
//!         .build()?;
//!
//!     engine.handle_install().await?;
//!     engine.handle_activate().await?;
//!
//!     let request = InterceptedRequest::get("https://records.example.org/index.html")?;
//!     match engine.handle_fetch(&request).await? {
//!         FetchOutcome::Response(snapshot) => println!("{} bytes", snapshot.body().len()),
//!         FetchOutcome::Declined => println!("proceeding natively"),
//!     }
//!     Ok(())
//! }
//! ```
//!
//! # Policy split
//!
//! Requests to the data API pass through untouched — stale data rows are
//! worse than a visible network failure. Requests to media hosts are
//! served cache-first: one network fetch per image per generation.
//! Everything else is the application shell, served stale and revalidated
//! behind the user's back.

pub mod config;
pub mod error;
pub mod fetch;
pub mod host;
pub mod registry;
pub mod store;
pub mod telemetry;
pub mod types;
pub mod worker;

// Re-export main types at crate root
pub use config::Config;
pub use error::{MuninnError, Result};
pub use fetch::{Fetcher, HttpFetcher};
pub use host::{Notification, NoopViews, ViewHandle, ViewRegistry};
pub use registry::GenerationRegistry;
pub use store::{CacheSet, CacheStorage, MemoryStorage};
pub use types::{Command, InterceptedRequest, RequestKey, ResponseSnapshot};
pub use worker::{
    FetchOutcome, Interceptor, Muninn, MuninnBuilder, Phase, Promotion, RequestClass,
};
