//! `/setcost`: correct the cost columns of a past charging session

use crate::cost::CostUpdate;
use crate::store::ChargingStore;
use crate::{Request, Response};
use tracing::info;

use super::Reply;

const ROUTE: &str = "setcost";
const OK: &str = "OK";
const ERROR: &str = "ERROR";

/// Payload from the `JSON` query parameter, else the decoded body
fn payload(req: &Request) -> String {
    req.query_param("JSON").unwrap_or_else(|| req.body_text())
}

pub async fn handle(req: &Request, store: &dyn ChargingStore) -> Reply {
    info!("SetCost");

    let json = payload(req);
    info!(json = %json, "SetCost payload");

    let update = match CostUpdate::from_json(&json) {
        Ok(update) => update,
        Err(e) => return Reply::client_error(ROUTE, ERROR, e),
    };

    match store.update_cost(&update).await {
        Ok(rows) => {
            info!(id = %update.id, rows, "SetCost OK");
            Reply::Ok(Response::text(OK))
        }
        Err(e) => Reply::server_error(ROUTE, ERROR, e),
    }
}
