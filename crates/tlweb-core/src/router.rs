//! Fixed route table
//!
//! The admin server answers a handful of literal paths. Routing ignores the
//! HTTP method; anything not listed here is a 404.

/// Prefix shared by all upstream-API debug routes
pub const TESLA_API_PREFIX: &str = "/debug/TeslaAPI/";

/// Upstream API resources whose last raw response can be inspected
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ApiResource {
    Vehicles,
    ChargeState,
    ClimateState,
    DriveState,
    VehicleConfig,
    VehicleState,
    AutoConditioningStop,
    ChargePortDoorOpen,
    SetChargeLimit,
}

impl ApiResource {
    pub const ALL: [ApiResource; 9] = [
        ApiResource::Vehicles,
        ApiResource::ChargeState,
        ApiResource::ClimateState,
        ApiResource::DriveState,
        ApiResource::VehicleConfig,
        ApiResource::VehicleState,
        ApiResource::AutoConditioningStop,
        ApiResource::ChargePortDoorOpen,
        ApiResource::SetChargeLimit,
    ];

    /// Path below [`TESLA_API_PREFIX`]
    pub fn route_suffix(&self) -> &'static str {
        match self {
            ApiResource::Vehicles => "vehicles",
            ApiResource::ChargeState => "charge_state",
            ApiResource::ClimateState => "climate_state",
            ApiResource::DriveState => "drive_state",
            ApiResource::VehicleConfig => "vehicle_config",
            ApiResource::VehicleState => "vehicle_state",
            ApiResource::AutoConditioningStop => "command/auto_conditioning_stop",
            ApiResource::ChargePortDoorOpen => "command/charge_port_door_open",
            ApiResource::SetChargeLimit => "command/set_charge_limit",
        }
    }

    /// Name under which the daemon caches the raw response: the last path segment
    pub fn cache_key(&self) -> &'static str {
        let suffix = self.route_suffix();
        suffix.rsplit('/').next().unwrap_or(suffix)
    }

    /// Full request path
    pub fn path(&self) -> String {
        format!("{}{}", TESLA_API_PREFIX, self.route_suffix())
    }

    fn from_suffix(suffix: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|r| r.route_suffix() == suffix)
    }
}

/// Handler selected for a request path
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    /// `/getchargingstate`
    ChargingState,
    /// `/setcost`
    SetCost,
    /// `/debug/TeslaAPI/...`
    TeslaApi(ApiResource),
    /// `/debug/TeslaLogger/states`
    LoggerStates,
}

impl Route {
    /// Match a request path, `None` means 404
    pub fn resolve(path: &str) -> Option<Self> {
        match path {
            "/getchargingstate" => Some(Route::ChargingState),
            "/setcost" => Some(Route::SetCost),
            "/debug/TeslaLogger/states" => Some(Route::LoggerStates),
            _ => path
                .strip_prefix(TESLA_API_PREFIX)
                .and_then(ApiResource::from_suffix)
                .map(Route::TeslaApi),
        }
    }

    /// Short name used in logs
    pub fn name(&self) -> &'static str {
        match self {
            Route::ChargingState => "getchargingstate",
            Route::SetCost => "setcost",
            Route::TeslaApi(_) => "debug_tesla_api",
            Route::LoggerStates => "debug_logger_states",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_literal_routes() {
        assert_eq!(Route::resolve("/getchargingstate"), Some(Route::ChargingState));
        assert_eq!(Route::resolve("/setcost"), Some(Route::SetCost));
        assert_eq!(Route::resolve("/debug/TeslaLogger/states"), Some(Route::LoggerStates));
    }

    #[test]
    fn test_api_routes() {
        for resource in ApiResource::ALL {
            assert_eq!(Route::resolve(&resource.path()), Some(Route::TeslaApi(resource)));
        }

        assert_eq!(
            Route::resolve("/debug/TeslaAPI/command/set_charge_limit"),
            Some(Route::TeslaApi(ApiResource::SetChargeLimit))
        );
    }

    #[test]
    fn test_cache_keys() {
        assert_eq!(ApiResource::Vehicles.cache_key(), "vehicles");
        assert_eq!(ApiResource::AutoConditioningStop.cache_key(), "auto_conditioning_stop");
        assert_eq!(ApiResource::ChargePortDoorOpen.cache_key(), "charge_port_door_open");
    }

    #[test]
    fn test_unknown_paths() {
        for path in [
            "/",
            "",
            "/setcost/",
            "/SETCOST",
            "/getchargingstate/42",
            "/debug/TeslaAPI/",
            "/debug/TeslaAPI/set_charge_limit",
            "/debug/TeslaAPI/command/honk_horn",
            "/debug/TeslaAPI/vehicles/extra",
            "/debug/TeslaLogger/states/",
            "/debug/teslaapi/vehicles",
        ] {
            assert_eq!(Route::resolve(path), None, "{path}");
        }
    }
}
