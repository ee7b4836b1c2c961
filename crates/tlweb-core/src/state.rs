//! Daemon state seen by the admin server
//!
//! The logger daemon owns its runtime state; the server only reads it
//! through [`StateProvider`]. [`MemoryState`] is a thread-safe registry the
//! daemon can write into and hand to the server as its provider.

use chrono::NaiveDateTime;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::fmt;

/// Operating state of the logger's main loop
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoggerState {
    #[default]
    Start,
    Drive,
    Park,
    Charge,
    Sleep,
    WaitForSleep,
    Online,
    GoSleep,
}

impl LoggerState {
    pub fn as_str(&self) -> &'static str {
        match self {
            LoggerState::Start => "Start",
            LoggerState::Drive => "Drive",
            LoggerState::Park => "Park",
            LoggerState::Charge => "Charge",
            LoggerState::Sleep => "Sleep",
            LoggerState::WaitForSleep => "WaitForSleep",
            LoggerState::Online => "Online",
            LoggerState::GoSleep => "GoSleep",
        }
    }
}

impl fmt::Display for LoggerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How high-frequency logging decides when to stop
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HflMode {
    #[default]
    Ticks,
    Time,
}

impl fmt::Display for HflMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HflMode::Ticks => f.write_str("Ticks"),
            HflMode::Time => f.write_str("Time"),
        }
    }
}

/// Keys of the daemon's in-memory result cache
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MemCacheKey {
    /// Last outside temperature fetched asynchronously, in °C
    GetOutsideTempAsync,
}

/// Read-only view of the daemon's runtime state
///
/// Implementations provide their own synchronization; the server calls
/// these getters from any worker without locking.
pub trait StateProvider: Send + Sync {
    fn current_state(&self) -> LoggerState;
    fn last_shift_state(&self) -> String;
    fn high_frequency_logging(&self) -> bool;
    fn high_frequency_logging_ticks(&self) -> i64;
    fn high_frequency_logging_ticks_limit(&self) -> i64;
    fn high_frequency_logging_until(&self) -> NaiveDateTime;
    fn high_frequency_logging_mode(&self) -> HflMode;
    fn cached_value(&self, key: MemCacheKey) -> Option<f64>;
    fn last_car_used(&self) -> NaiveDateTime;
    fn last_odometer_changed(&self) -> NaiveDateTime;
    fn last_try_token_refresh(&self) -> NaiveDateTime;
    fn last_set_charge_limit_address_name(&self) -> String;
    fn go_sleep_with_wakeup(&self) -> bool;
    fn odometer_last_trip(&self) -> f64;
    fn last_is_drive_timestamp(&self) -> NaiveDateTime;
    fn last_update_efficiency(&self) -> NaiveDateTime;

    /// Last raw upstream API response cached under `name`
    fn tesla_api_json(&self, name: &str) -> Option<String>;
}

/// Plain values mirrored from the daemon
#[derive(Debug, Clone, Default)]
pub struct DaemonValues {
    pub current_state: LoggerState,
    pub last_shift_state: String,
    pub high_frequency_logging: bool,
    pub high_frequency_logging_ticks: i64,
    pub high_frequency_logging_ticks_limit: i64,
    pub high_frequency_logging_until: NaiveDateTime,
    pub high_frequency_logging_mode: HflMode,
    pub last_car_used: NaiveDateTime,
    pub last_odometer_changed: NaiveDateTime,
    pub last_try_token_refresh: NaiveDateTime,
    pub last_set_charge_limit_address_name: String,
    pub go_sleep_with_wakeup: bool,
    pub odometer_last_trip: f64,
    pub last_is_drive_timestamp: NaiveDateTime,
    pub last_update_efficiency: NaiveDateTime,
}

/// In-memory [`StateProvider`] shared between the daemon and the server
#[derive(Debug, Default)]
pub struct MemoryState {
    values: RwLock<DaemonValues>,
    mem_cache: RwLock<HashMap<MemCacheKey, f64>>,
    api_responses: RwLock<HashMap<String, String>>,
}

impl MemoryState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mutate the mirrored values under a single write lock
    pub fn update(&self, f: impl FnOnce(&mut DaemonValues)) {
        f(&mut self.values.write());
    }

    /// Copy of the current values
    pub fn values(&self) -> DaemonValues {
        self.values.read().clone()
    }

    pub fn set_cached(&self, key: MemCacheKey, value: f64) {
        self.mem_cache.write().insert(key, value);
    }

    pub fn clear_cached(&self, key: MemCacheKey) {
        self.mem_cache.write().remove(&key);
    }

    /// Remember the raw JSON of the latest upstream call named `name`
    pub fn record_api_response(&self, name: impl Into<String>, json: impl Into<String>) {
        self.api_responses.write().insert(name.into(), json.into());
    }
}

impl StateProvider for MemoryState {
    fn current_state(&self) -> LoggerState {
        self.values.read().current_state
    }

    fn last_shift_state(&self) -> String {
        self.values.read().last_shift_state.clone()
    }

    fn high_frequency_logging(&self) -> bool {
        self.values.read().high_frequency_logging
    }

    fn high_frequency_logging_ticks(&self) -> i64 {
        self.values.read().high_frequency_logging_ticks
    }

    fn high_frequency_logging_ticks_limit(&self) -> i64 {
        self.values.read().high_frequency_logging_ticks_limit
    }

    fn high_frequency_logging_until(&self) -> NaiveDateTime {
        self.values.read().high_frequency_logging_until
    }

    fn high_frequency_logging_mode(&self) -> HflMode {
        self.values.read().high_frequency_logging_mode
    }

    fn cached_value(&self, key: MemCacheKey) -> Option<f64> {
        self.mem_cache.read().get(&key).copied()
    }

    fn last_car_used(&self) -> NaiveDateTime {
        self.values.read().last_car_used
    }

    fn last_odometer_changed(&self) -> NaiveDateTime {
        self.values.read().last_odometer_changed
    }

    fn last_try_token_refresh(&self) -> NaiveDateTime {
        self.values.read().last_try_token_refresh
    }

    fn last_set_charge_limit_address_name(&self) -> String {
        self.values.read().last_set_charge_limit_address_name.clone()
    }

    fn go_sleep_with_wakeup(&self) -> bool {
        self.values.read().go_sleep_with_wakeup
    }

    fn odometer_last_trip(&self) -> f64 {
        self.values.read().odometer_last_trip
    }

    fn last_is_drive_timestamp(&self) -> NaiveDateTime {
        self.values.read().last_is_drive_timestamp
    }

    fn last_update_efficiency(&self) -> NaiveDateTime {
        self.values.read().last_update_efficiency
    }

    fn tesla_api_json(&self, name: &str) -> Option<String> {
        self.api_responses.read().get(name).cloned()
    }
}
