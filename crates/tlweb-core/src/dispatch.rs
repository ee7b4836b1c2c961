//! Request dispatch
//!
//! Maps a path to its handler and contains handler panics so that one bad
//! request cannot take down the accept loop or a concurrent request.

use crate::handlers::{charging_state, set_cost, states, tesla_api};
use crate::router::Route;
use crate::state::StateProvider;
use crate::store::ChargingStore;
use crate::{Error, Request, Response, Result};
use futures_util::FutureExt;
use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use tracing::{debug, error};

/// Collaborators shared by all connections
///
/// Holds no mutable state of its own.
#[derive(Clone)]
pub struct ServerState {
    state: Arc<dyn StateProvider>,
    store: Arc<dyn ChargingStore>,
}

impl ServerState {
    pub fn new(state: Arc<dyn StateProvider>, store: Arc<dyn ChargingStore>) -> Self {
        Self { state, store }
    }

    /// Route and run one request
    ///
    /// Returns `Err` only when the handler panicked; the caller should then
    /// drop the connection without answering.
    pub async fn handle(&self, req: Request) -> Result<Response> {
        let outcome = AssertUnwindSafe(self.route(&req)).catch_unwind().await;
        match outcome {
            Ok(response) => Ok(response),
            Err(panic) => {
                error!(
                    method = %req.method,
                    path = %req.path,
                    reason = panic_message(panic.as_ref()),
                    "handler panicked"
                );
                Err(Error::HandlerPanic { path: req.path })
            }
        }
    }

    async fn route(&self, req: &Request) -> Response {
        let Some(route) = Route::resolve(&req.path) else {
            debug!(method = %req.method, path = %req.path, "URL not found");
            return Response::not_found();
        };
        debug!(method = %req.method, route = route.name(), "dispatching");

        let reply = match route {
            Route::ChargingState => charging_state::handle(req, self.store.as_ref()).await,
            Route::SetCost => set_cost::handle(req, self.store.as_ref()).await,
            Route::TeslaApi(resource) => tesla_api::handle(resource, self.state.as_ref()),
            Route::LoggerStates => states::handle(self.state.as_ref()),
        };
        reply.into_response()
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> &str {
    if let Some(msg) = panic.downcast_ref::<&'static str>() {
        msg
    } else if let Some(msg) = panic.downcast_ref::<String>() {
        msg
    } else {
        "unknown panic"
    }
}
