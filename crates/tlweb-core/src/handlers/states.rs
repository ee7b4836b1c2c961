//! `/debug/TeslaLogger/states`: live dump of the daemon's state variables

use crate::state::{MemCacheKey, StateProvider};
use crate::Response;
use chrono::NaiveDateTime;

use super::Reply;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Shown instead of an empty charge-limit address
const EMPTY_ADDRESS: &str = "&lt;&gt;";

/// Ordered label/value pairs captured at one instant
#[derive(Debug, Clone, PartialEq)]
pub struct StateSnapshot {
    pub entries: Vec<(&'static str, String)>,
}

fn timestamp(dt: NaiveDateTime) -> String {
    dt.format(TIMESTAMP_FORMAT).to_string()
}

/// Capitalized, as the dashboard has always displayed flags
fn flag(value: bool) -> String {
    let text = if value { "True" } else { "False" };
    text.to_string()
}

impl StateSnapshot {
    /// Read every value from `state` now
    pub fn capture(state: &dyn StateProvider) -> Self {
        let outside_temp = state
            .cached_value(MemCacheKey::GetOutsideTempAsync)
            .map(|t| t.to_string())
            .unwrap_or_else(|| "null".to_string());

        let address = state.last_set_charge_limit_address_name();
        let address = if address.is_empty() {
            EMPTY_ADDRESS.to_string()
        } else {
            address
        };

        let entries = vec![
            ("Program._currentState", state.current_state().to_string()),
            ("WebHelper._lastShift_State", state.last_shift_state()),
            (
                "Program.highFreequencyLogging",
                flag(state.high_frequency_logging()),
            ),
            (
                "Program.highFrequencyLoggingTicks",
                state.high_frequency_logging_ticks().to_string(),
            ),
            (
                "Program.highFrequencyLoggingTicksLimit",
                state.high_frequency_logging_ticks_limit().to_string(),
            ),
            (
                "Program.highFrequencyLoggingUntil",
                timestamp(state.high_frequency_logging_until()),
            ),
            (
                "Program.highFrequencyLoggingMode",
                state.high_frequency_logging_mode().to_string(),
            ),
            ("TLMemCacheKey.GetOutsideTempAsync", outside_temp),
            ("Program.lastCarUsed", timestamp(state.last_car_used())),
            (
                "Program.lastOdometerChanged",
                timestamp(state.last_odometer_changed()),
            ),
            (
                "Program.lastTryTokenRefresh",
                timestamp(state.last_try_token_refresh()),
            ),
            ("Program.lastSetChargeLimitAddressName", address),
            (
                "Program.goSleepWithWakeup",
                flag(state.go_sleep_with_wakeup()),
            ),
            (
                "Program.odometerLastTrip",
                state.odometer_last_trip().to_string(),
            ),
            (
                "WebHelper.lastIsDriveTimestamp",
                timestamp(state.last_is_drive_timestamp()),
            ),
            (
                "WebHelper.lastUpdateEfficiency",
                timestamp(state.last_update_efficiency()),
            ),
        ];

        Self { entries }
    }

    /// Two-column HTML table; values are inserted as-is
    pub fn to_html(&self) -> String {
        let rows: String = self
            .entries
            .iter()
            .map(|(label, value)| format!("<tr><td>{label}</td><td>{value}</td></tr>"))
            .collect();
        format!("<html><head></head><body><table>{rows}</table></body></html>")
    }
}

pub fn handle(state: &dyn StateProvider) -> Reply {
    Reply::Ok(Response::html(StateSnapshot::capture(state).to_html()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::{HflMode, LoggerState, MemoryState};
    use chrono::NaiveDate;

    fn at(h: u32, m: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 5, 17)
            .and_then(|d| d.and_hms_opt(h, m, 0))
            .unwrap()
    }

    #[test]
    fn test_defaults_are_rendered() {
        let snapshot = StateSnapshot::capture(&MemoryState::new());

        assert_eq!(snapshot.entries.len(), 16);
        let value = |label: &str| {
            snapshot
                .entries
                .iter()
                .find(|(l, _)| *l == label)
                .map(|(_, v)| v.clone())
                .unwrap()
        };
        assert_eq!(value("Program._currentState"), "Start");
        assert_eq!(value("TLMemCacheKey.GetOutsideTempAsync"), "null");
        assert_eq!(value("Program.lastSetChargeLimitAddressName"), "&lt;&gt;");
        assert_eq!(value("Program.lastCarUsed"), "1970-01-01 00:00:00");
        assert_eq!(value("WebHelper._lastShift_State"), "");
        assert_eq!(value("Program.highFreequencyLogging"), "False");
        assert_eq!(value("Program.goSleepWithWakeup"), "False");
    }

    #[test]
    fn test_live_values() {
        let state = MemoryState::new();
        state.update(|v| {
            v.current_state = LoggerState::Drive;
            v.last_shift_state = "D".into();
            v.high_frequency_logging = true;
            v.high_frequency_logging_ticks = 3;
            v.high_frequency_logging_ticks_limit = 100;
            v.high_frequency_logging_mode = HflMode::Time;
            v.high_frequency_logging_until = at(13, 45);
            v.last_set_charge_limit_address_name = "Home".into();
            v.odometer_last_trip = 42.5;
        });
        state.set_cached(MemCacheKey::GetOutsideTempAsync, 21.5);

        let snapshot = StateSnapshot::capture(&state);
        let labels: Vec<_> = snapshot.entries.iter().map(|(l, _)| *l).collect();
        assert_eq!(labels[0], "Program._currentState");
        assert_eq!(labels[15], "WebHelper.lastUpdateEfficiency");

        let html = snapshot.to_html();
        assert!(html.starts_with("<html><head></head><body><table><tr>"));
        assert!(html.ends_with("</tr></table></body></html>"));
        assert!(html.contains("<tr><td>Program._currentState</td><td>Drive</td></tr>"));
        assert!(html.contains("<tr><td>WebHelper._lastShift_State</td><td>D</td></tr>"));
        assert!(html.contains("<tr><td>Program.highFreequencyLogging</td><td>True</td></tr>"));
        assert!(html.contains("<td>Program.highFrequencyLoggingMode</td><td>Time</td>"));
        assert!(html.contains("<td>Program.highFrequencyLoggingUntil</td><td>2024-05-17 13:45:00</td>"));
        assert!(html.contains("<td>TLMemCacheKey.GetOutsideTempAsync</td><td>21.5</td>"));
        assert!(html.contains("<td>Program.lastSetChargeLimitAddressName</td><td>Home</td>"));
        assert!(html.contains("<td>Program.odometerLastTrip</td><td>42.5</td>"));
    }

    #[test]
    fn test_snapshot_is_never_cached() {
        let state = MemoryState::new();
        let before = StateSnapshot::capture(&state);

        state.update(|v| v.current_state = LoggerState::Sleep);
        let after = StateSnapshot::capture(&state);

        assert_ne!(before, after);
        assert_eq!(after.entries[0].1, "Sleep");
    }

    #[test]
    fn test_handle_sends_html() {
        let res = handle(&MemoryState::new()).into_response();
        assert_eq!(res.content_type(), Some("text/html; charset=utf-8"));
        assert!(res.body_string().unwrap().contains("<table>"));
    }
}
