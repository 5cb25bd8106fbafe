use axum::{
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use model::dashboard::{Dashboard, DeviceReport};
use serde_json::json;
use tracking::database::Database;

use crate::{common::schema, WebState};

mod distance;
mod session;

pub use distance::ClearResponse;

pub fn routes<D: Database>(state: WebState<D>) -> Router {
    Router::new()
        .route("/ping", get(ping))
        .route("/ws", get(session::websocket::<D>))
        .route("/clear", post(distance::clear::<D>))
        .route("/clear/schema", get(schema::<ClearResponse>))
        .route("/total_distance/schema", get(schema::<DeviceReport>))
        .route("/total_distance/:imei", get(distance::total_distance::<D>))
        .route("/dashboard", get(distance::dashboard::<D>))
        .route("/dashboard/schema", get(schema::<Dashboard>))
        .with_state(state)
}

async fn ping() -> impl IntoResponse {
    Json(json!({
        "message": "pong!"
    }))
}
