use std::time::Duration;

use axum::extract::Multipart;
use axum::http::StatusCode;
use axum::Router;

use skinwise_analysis::api::AnalysisConfig;
use skinwise_analysis::image_file::ImageFile;

/// Serve `router` on an ephemeral localhost port and return its base URL.
pub async fn spawn_stub(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{addr}")
}

/// A base URL nothing is listening on.
pub async fn unreachable_url() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{addr}")
}

pub fn config(api_url: String) -> AnalysisConfig {
    AnalysisConfig {
        api_url,
        timeout: Duration::from_secs(5),
    }
}

pub fn jpeg() -> ImageFile {
    ImageFile::new("face.jpg", "image/jpeg", vec![0xFF, 0xD8, 0xFF, 0xE0])
}

/// Drain a multipart upload and check it carries exactly one `file` field
/// with an image content type.
pub async fn expect_file_field(mut multipart: Multipart) -> Result<(), StatusCode> {
    let mut seen = 0;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|_| StatusCode::BAD_REQUEST)?
    {
        if field.name() != Some("file") {
            return Err(StatusCode::BAD_REQUEST);
        }
        let is_image = field
            .content_type()
            .is_some_and(|ct| ct.starts_with("image/"));
        if !is_image {
            return Err(StatusCode::UNSUPPORTED_MEDIA_TYPE);
        }
        field.bytes().await.map_err(|_| StatusCode::BAD_REQUEST)?;
        seen += 1;
    }
    if seen == 1 {
        Ok(())
    } else {
        Err(StatusCode::BAD_REQUEST)
    }
}
