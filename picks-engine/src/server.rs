use crate::updater::SharedReport;
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use std::path::Path;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tracing::info;

pub fn router(latest: SharedReport, site_dir: &Path) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/report.json", get(get_report))
        .fallback_service(ServeDir::new(site_dir))
        .layer(CorsLayer::permissive())
        .with_state(latest)
}

pub async fn serve(latest: SharedReport, site_dir: &Path, port: u16) -> anyhow::Result<()> {
    let app = router(latest, site_dir);
    let addr = format!("0.0.0.0:{}", port);
    info!("🌐 Server starting on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

async fn health() -> &'static str {
    "OK"
}

async fn get_report(State(latest): State<SharedReport>) -> Response {
    match latest.read().await.as_ref() {
        Some(report) => Json(report.clone()).into_response(),
        None => (StatusCode::NOT_FOUND, "no report yet").into_response(),
    }
}
