pub use crate::common::RouteResult;
pub use crate::config::WebConfig;

use std::{path::Path, time::Duration};

use axum::{routing::on, Router};
use tokio::net::TcpListener;
use tower_http::{
    services::{ServeDir, ServeFile},
    trace::TraceLayer,
};
use tracking::{database::Database, Tracker};

use crate::common::{route_not_found, METHOD_FILTER_ALL};

pub mod api;
pub mod common;
pub mod config;

#[derive(Clone)]
pub struct WebState<D: Database> {
    pub tracker: Tracker<D>,
    pub write_timeout: Duration,
}

pub async fn start_web_server<D: Database>(
    config: WebConfig,
    tracker: Tracker<D>,
) -> std::io::Result<()> {
    let routes = router(
        WebState {
            tracker,
            write_timeout: config.write_timeout,
        },
        &config.static_dir,
    );

    let listener = TcpListener::bind(&config.bind_address).await?;
    log::info!("listening on {}", listener.local_addr()?);
    serve(listener, routes).await
}

pub async fn serve(listener: TcpListener, routes: Router) -> std::io::Result<()> {
    axum::serve(listener, routes.into_make_service()).await
}

pub fn router<D: Database>(state: WebState<D>, static_dir: &Path) -> Router {
    Router::new()
        .merge(api::routes(state))
        .merge(static_content_router(static_dir))
        .fallback_service(on(METHOD_FILTER_ALL, route_not_found))
        .layer(TraceLayer::new_for_http())
}

fn static_content_router(static_dir: &Path) -> Router {
    Router::new()
        .route_service("/", ServeFile::new(static_dir.join("index.html")))
        .nest_service("/static", ServeDir::new(static_dir))
}
