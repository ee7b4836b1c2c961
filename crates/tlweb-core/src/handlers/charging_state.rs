//! `/getchargingstate?id=<n>`: one charging session with location and energy

use crate::store::ChargingStore;
use crate::{Request, Response};
use tracing::info;

use super::Reply;

const ROUTE: &str = "getchargingstate";
const NOT_FOUND: &str = "not found!";

pub async fn handle(req: &Request, store: &dyn ChargingStore) -> Reply {
    info!("HTTP getchargingstate");

    let Some(id) = req.query_param("id") else {
        return Reply::Ok(Response::text(NOT_FOUND));
    };

    let rows = match store.charging_state(&id).await {
        Ok(rows) => rows,
        Err(e) => return Reply::server_error(ROUTE, "", e),
    };

    if rows.is_empty() {
        return Reply::Ok(Response::text(NOT_FOUND));
    }

    match serde_json::to_string(&rows) {
        Ok(json) => Reply::Ok(Response::json(json)),
        Err(e) => Reply::server_error(ROUTE, "", e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cost::CostUpdate;
    use crate::store::{Row, StoreError};
    use crate::{Method, RequestBuilder, StatusCode};
    use async_trait::async_trait;
    use parking_lot::Mutex;
    use serde_json::{json, Value};

    #[derive(Default)]
    struct FixedStore {
        rows: Vec<Row>,
        fail: bool,
        asked: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl ChargingStore for FixedStore {
        async fn update_cost(&self, _update: &CostUpdate) -> crate::store::Result<u64> {
            Ok(0)
        }

        async fn charging_state(&self, id: &str) -> crate::store::Result<Vec<Row>> {
            self.asked.lock().push(id.to_string());
            if self.fail {
                return Err(StoreError::Unavailable("timeout".into()));
            }
            Ok(self.rows.clone())
        }
    }

    fn session_42() -> Row {
        let Value::Object(row) = json!({
            "id": 42,
            "StartDate": "2024-05-17T08:00:00",
            "EndDate": "2024-05-17T09:10:00",
            "cost_total": 12.5,
            "cost_currency": "EUR",
            "lat": 48.137,
            "lng": 11.575,
            "address": "Marienplatz, München",
            "kWh": 31.2
        }) else {
            unreachable!()
        };
        row
    }

    fn lookup(query: &str) -> Request {
        RequestBuilder::new(Method::Get, "/getchargingstate")
            .query(query)
            .build()
    }

    #[tokio::test]
    async fn test_found() {
        let store = FixedStore {
            rows: vec![session_42()],
            ..Default::default()
        };

        let res = handle(&lookup("id=42"), &store).await.into_response();
        assert_eq!(res.status, StatusCode::OK);
        assert_eq!(res.content_type(), Some("application/json"));
        assert_eq!(store.asked.lock().as_slice(), ["42"]);

        let body: Value = serde_json::from_slice(&res.body).unwrap();
        let rows = body.as_array().unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0]["id"], 42);
        assert_eq!(rows[0]["address"], "Marienplatz, München");
        for key in ["lat", "lng", "kWh", "cost_total"] {
            assert!(rows[0].get(key).is_some(), "{key}");
        }
    }

    #[tokio::test]
    async fn test_not_found() {
        let store = FixedStore::default();
        let res = handle(&lookup("id=7"), &store).await.into_response();
        assert_eq!(res.body_string().as_deref(), Some("not found!"));
    }

    #[tokio::test]
    async fn test_missing_id_is_not_found() {
        let store = FixedStore::default();
        let req = RequestBuilder::new(Method::Get, "/getchargingstate").build();

        let res = handle(&req, &store).await.into_response();
        assert_eq!(res.body_string().as_deref(), Some("not found!"));
        assert!(store.asked.lock().is_empty());
    }

    #[tokio::test]
    async fn test_store_failure_is_empty_body() {
        let store = FixedStore {
            fail: true,
            ..Default::default()
        };

        let reply = handle(&lookup("id=42"), &store).await;
        assert!(matches!(reply, Reply::ServerError { .. }));

        let res = reply.into_response();
        assert_eq!(res.status, StatusCode::OK);
        assert!(res.body.is_empty());
    }
}
