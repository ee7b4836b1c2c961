//! Charging-session store
//!
//! The relational database belongs to the daemon. The admin server issues
//! exactly two statements against it, both through [`ChargingStore`].

use crate::cost::CostUpdate;
use async_trait::async_trait;
use thiserror::Error;

#[cfg(feature = "mysql")]
pub mod mysql;

#[cfg(feature = "mysql")]
pub use mysql::MySqlStore;

/// One result row, column name to JSON value
pub type Row = serde_json::Map<String, serde_json::Value>;

/// Store errors
#[derive(Debug, Error)]
pub enum StoreError {
    #[cfg(feature = "mysql")]
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Cannot decode column {column}: {reason}")]
    Decode { column: String, reason: String },

    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

pub type Result<T> = std::result::Result<T, StoreError>;

/// Access to `chargingstate` and its joined rows
#[async_trait]
pub trait ChargingStore: Send + Sync {
    /// Overwrite the cost columns of one session, returns affected rows
    async fn update_cost(&self, update: &CostUpdate) -> Result<u64>;

    /// The session `id` joined with its position and added energy
    ///
    /// Rows carry every `chargingstate` column plus `lat`, `lng`, `address`
    /// and `kWh`. Zero or one row is expected.
    async fn charging_state(&self, id: &str) -> Result<Vec<Row>>;
}
