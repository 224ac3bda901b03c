use std::sync::Arc;

use anyhow::Result;
use axum::{
    http::{header, HeaderValue},
    routing::get,
    Router,
};
use tower_http::set_header::SetResponseHeaderLayer;
use tracing::info;
use tracing_subscriber::EnvFilter;

use herdwatch_common::{Config, HerdwatchError};
use herdwatch_engine::{loader, Dataset};

mod components;
mod pages;
mod rest;
mod templates;

pub struct AppState {
    pub dataset: Arc<Dataset>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("herdwatch=info".parse()?))
        .init();

    info!("Herdwatch API starting...");

    let config = Config::from_env();

    // The dataset is loaded once and shared read-only for the life of
    // the process. Zero usable records makes the whole dashboard
    // meaningless, so that is a startup failure, not a warning.
    let dataset = loader::load_cached(&config.data_files)?;
    if dataset.is_empty() {
        tracing::error!(files = ?config.data_files, "No usable outbreak data; check DATA_FILES");
        return Err(HerdwatchError::NoData.into());
    }
    if let Some((min_date, max_date)) = dataset.date_range() {
        info!(
            records = dataset.len(),
            regions = dataset.regions().len(),
            %min_date,
            %max_date,
            "Outbreak dataset loaded"
        );
    }

    let state = Arc::new(AppState { dataset });

    let app = Router::new()
        // Health check
        .route("/", get(|| async { "ok" }))
        // SSR dashboard
        .route("/dashboard", get(pages::dashboard_page))
        // JSON boundary
        .route("/api/summary", get(rest::api_summary))
        .route("/api/assess", get(rest::api_assess))
        .route("/api/records", get(rest::api_records))
        .route("/api/monthly", get(rest::api_monthly))
        .with_state(state)
        // CORS
        .layer(
            tower_http::cors::CorsLayer::new()
                .allow_origin(tower_http::cors::Any)
                .allow_methods(tower_http::cors::Any)
                .allow_headers(tower_http::cors::Any),
        )
        // Scenario responses depend on query parameters, never on time
        // of day, but the source files can be swapped between runs.
        .layer(SetResponseHeaderLayer::overriding(
            header::CACHE_CONTROL,
            HeaderValue::from_static("no-store"),
        ))
        // Logging layer: method + path + status + latency only
        .layer(
            tower_http::trace::TraceLayer::new_for_http().make_span_with(
                |request: &axum::http::Request<_>| {
                    tracing::info_span!(
                        "http_request",
                        method = %request.method(),
                        path = %request.uri().path(),
                    )
                },
            ),
        );

    let addr = format!("{}:{}", config.web_host, config.web_port);
    info!("Herdwatch API listening on {addr}");
    info!("Dashboard available at http://{addr}/dashboard");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
