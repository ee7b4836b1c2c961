//! tlweb-core: admin/debug HTTP server of the TeslaLogger daemon
//!
//! Serves a fixed set of endpoints: daemon state introspection, cost
//! correction of a charging session, a charging session lookup and the last
//! raw responses of the upstream vehicle API. The daemon's state and its
//! database are collaborators reached through [`StateProvider`] and
//! [`ChargingStore`].
//!
//! ## Features
//! - `native` - Native server with tokio/hyper/socket2
//! - `mysql` - [`store::MySqlStore`] backed by sqlx

#![forbid(unsafe_code)]
#![warn(clippy::all)]

pub mod config;
pub mod cost;
pub mod dispatch;
pub mod error;
pub mod handlers;
pub mod request;
pub mod response;
pub mod router;
pub mod state;
pub mod store;

#[cfg(feature = "native")]
pub mod server;

// Re-exports
pub use config::Config;
pub use cost::{CostPayload, CostUpdate, CostValue};
pub use dispatch::ServerState;
pub use error::{Error, Result};
pub use handlers::{Reply, StateSnapshot};
pub use request::{Charset, Method, Request, RequestBuilder};
pub use response::{Response, ResponseBuilder, StatusCode, NOT_FOUND_BODY};
pub use router::{ApiResource, Route};
pub use state::{DaemonValues, HflMode, LoggerState, MemCacheKey, MemoryState, StateProvider};
pub use store::{ChargingStore, StoreError};

#[cfg(feature = "native")]
pub use server::{bind_with_fallback, run, BindScope, Listener};
