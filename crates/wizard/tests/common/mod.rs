use std::sync::Arc;
use std::time::Duration;

use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::post;
use axum::{Json, Router};

use skinwise_analysis::api::AnalysisConfig;
use skinwise_analysis::gateway::UploadGateway;
use skinwise_analysis::image_file::ImageFile;
use skinwise_core::catalog::Catalog;
use skinwise_wizard::controller::WizardController;

/// Serve `router` on an ephemeral localhost port and return its base URL.
pub async fn spawn_stub(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{addr}")
}

/// Analysis stub answering every upload with `status` and `body`.
pub fn analysis_stub(status: StatusCode, body: serde_json::Value) -> Router {
    Router::new().route(
        "/analyze-skin",
        post(move || {
            let body = body.clone();
            async move { (status, Json(body)).into_response() }
        }),
    )
}

/// Controller backed by the embedded catalog and a stub at `router`.
pub async fn controller(router: Router, delay: Duration) -> WizardController {
    let api_url = spawn_stub(router).await;
    let gateway = UploadGateway::new(&AnalysisConfig {
        api_url,
        timeout: Duration::from_secs(5),
    })
    .unwrap();
    WizardController::new(Arc::new(gateway), Catalog::builtin().unwrap(), delay)
}

pub fn jpeg() -> ImageFile {
    ImageFile::new("face.jpg", "image/jpeg", vec![0xFF, 0xD8, 0xFF, 0xE0])
}
