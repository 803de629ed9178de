//! The event-facing engine: builder, interceptor, classification,
//! strategies, lifecycle, and the command channel.

pub mod builder;
pub mod classify;
pub mod command;
pub mod interceptor;
pub mod lifecycle;
pub mod strategy;

pub use builder::{Muninn, MuninnBuilder};
pub use classify::{Classifier, RequestClass};
pub use command::CommandChannel;
pub use interceptor::Interceptor;
pub use lifecycle::{LifecycleController, Phase, Promotion};
pub use strategy::{FetchOutcome, StrategyEngine};
