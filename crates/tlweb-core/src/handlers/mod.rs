//! Endpoint handlers
//!
//! Handlers never fail outward. Each returns a [`Reply`] that the dispatcher
//! turns into a response; error replies log themselves when built.

pub mod charging_state;
pub mod set_cost;
pub mod states;
pub mod tesla_api;

pub use states::StateSnapshot;

use crate::cost::CostError;
use crate::store::StoreError;
use crate::Response;
use thiserror::Error;
use tracing::{error, warn};

/// Why a handler could not produce its regular body
#[derive(Debug, Error)]
pub enum HandlerError {
    #[error(transparent)]
    Cost(#[from] CostError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("Cannot serialize response: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Outcome of one handler invocation
#[derive(Debug)]
pub enum Reply {
    /// Regular response
    Ok(Response),
    /// The request itself was unusable; answered with a sentinel body
    ClientError {
        sentinel: &'static str,
        error: HandlerError,
    },
    /// A collaborator failed; answered with a sentinel body
    ServerError {
        sentinel: &'static str,
        error: HandlerError,
    },
    /// Nothing to send; the default empty response goes out
    Unchanged,
}

impl Reply {
    pub fn client_error(
        route: &'static str,
        sentinel: &'static str,
        error: impl Into<HandlerError>,
    ) -> Self {
        let error = error.into();
        warn!(route, err = %error, "request rejected");
        Reply::ClientError { sentinel, error }
    }

    pub fn server_error(
        route: &'static str,
        sentinel: &'static str,
        error: impl Into<HandlerError>,
    ) -> Self {
        let error = error.into();
        error!(route, err = %error, "request failed");
        Reply::ServerError { sentinel, error }
    }

    /// Map to the response sent on the wire
    ///
    /// Sentinel bodies go out with status 200; the dashboard inspects the
    /// body, not the status.
    pub fn into_response(self) -> Response {
        match self {
            Reply::Ok(response) => response,
            Reply::ClientError { sentinel, .. } | Reply::ServerError { sentinel, .. } => {
                Response::text(sentinel)
            }
            Reply::Unchanged => Response::default(),
        }
    }
}
