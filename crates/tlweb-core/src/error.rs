//! Error types for tlweb-core

use std::net::SocketAddr;
use thiserror::Error;

/// Result type alias for tlweb operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for the admin HTTP server
#[derive(Debug, Error)]
pub enum Error {
    /// Listener could not be bound, neither on all interfaces nor on loopback
    #[error("Failed to bind listener on {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        #[source]
        source: std::io::Error,
    },

    /// Parse error
    #[error("Parse error: {0}")]
    Parse(String),

    /// IO error (native only)
    #[cfg(feature = "native")]
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Hyper error (native only)
    #[cfg(feature = "native")]
    #[error("HTTP error: {0}")]
    Hyper(String),

    /// Handler panicked while serving a request
    #[error("Handler panicked while serving {path}")]
    HandlerPanic { path: String },
}
