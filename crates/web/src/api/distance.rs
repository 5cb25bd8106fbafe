use axum::{
    extract::{OriginalUri, Path, State},
    http::Method,
    Json,
};
use model::dashboard::{Dashboard, DeviceReport};
use schemars::JsonSchema;
use serde::Serialize;
use tracking::{database::Database, RequestError};
use utility::id::Id;

use crate::{
    common::{RouteErrorResponse, RouteResult},
    WebState,
};

#[derive(Debug, Clone, Serialize, JsonSchema)]
pub struct ClearResponse {
    pub message: String,
    pub records_saved: usize,
    pub total_distance: f64,
}

pub(crate) async fn clear<D: Database>(
    OriginalUri(original_uri): OriginalUri,
    State(WebState { tracker, .. }): State<WebState<D>>,
) -> RouteResult<Json<ClearResponse>> {
    tracker
        .reset()
        .await
        .map(|summary| {
            Json(ClearResponse {
                message: "Distance data saved and tracking cleared".to_owned(),
                records_saved: summary.records_saved,
                total_distance: summary.total_distance,
            })
        })
        .map_err(|why| {
            RouteErrorResponse::from(RequestError::from(why))
                .with_method(&Method::POST)
                .with_uri(original_uri.path())
        })
}

pub(crate) async fn total_distance<D: Database>(
    OriginalUri(original_uri): OriginalUri,
    Path(imei): Path<String>,
    State(WebState { tracker, .. }): State<WebState<D>>,
) -> RouteResult<Json<DeviceReport>> {
    tracker
        .device_report(&Id::new(imei))
        .await
        .map(Json)
        .map_err(|why| {
            RouteErrorResponse::from(why)
                .with_method(&Method::GET)
                .with_uri(original_uri.path())
        })
}

pub(crate) async fn dashboard<D: Database>(
    OriginalUri(original_uri): OriginalUri,
    State(WebState { tracker, .. }): State<WebState<D>>,
) -> RouteResult<Json<Dashboard>> {
    tracker.dashboard().await.map(Json).map_err(|why| {
        RouteErrorResponse::from(why)
            .with_method(&Method::GET)
            .with_uri(original_uri.path())
    })
}
