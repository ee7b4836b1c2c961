//! `/debug/TeslaAPI/*`: last raw upstream API response, verbatim
//!
//! A resource that was never fetched yields no body at all, unlike the
//! other handlers which always answer with a sentinel.

use crate::router::ApiResource;
use crate::state::StateProvider;
use crate::Response;
use tracing::debug;

use super::Reply;

pub fn handle(resource: ApiResource, state: &dyn StateProvider) -> Reply {
    match state.tesla_api_json(resource.cache_key()) {
        Some(json) => Reply::Ok(Response::json(json)),
        None => {
            debug!(resource = resource.cache_key(), "no cached upstream response");
            Reply::Unchanged
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::MemoryState;
    use crate::StatusCode;

    #[test]
    fn test_cached_response_is_passed_through() {
        let state = MemoryState::new();
        let raw = r#"{"response":{"battery_level":80,"charging_state":"Charging"}}"#;
        state.record_api_response("charge_state", raw);

        let res = handle(ApiResource::ChargeState, &state).into_response();
        assert_eq!(res.status, StatusCode::OK);
        assert_eq!(res.content_type(), Some("application/json"));
        assert_eq!(res.body_string().as_deref(), Some(raw));
    }

    #[test]
    fn test_commands_use_last_segment() {
        let state = MemoryState::new();
        state.record_api_response("set_charge_limit", r#"{"result":true}"#);

        let res = handle(ApiResource::SetChargeLimit, &state).into_response();
        assert_eq!(res.body_string().as_deref(), Some(r#"{"result":true}"#));
    }

    #[test]
    fn test_miss_leaves_response_untouched() {
        let state = MemoryState::new();
        for resource in ApiResource::ALL {
            let reply = handle(resource, &state);
            assert!(matches!(reply, Reply::Unchanged));

            let res = reply.into_response();
            assert_eq!(res.status, StatusCode::OK);
            assert!(res.body.is_empty());
            assert_eq!(res.content_type(), None);
        }
    }
}
