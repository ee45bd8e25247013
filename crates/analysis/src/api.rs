//! REST API client for the skin-analysis HTTP endpoints.
//!
//! Wraps `POST /analyze-skin` (multipart image upload) and the `GET /`
//! liveness probe using [`reqwest`].

use std::time::Duration;

use serde::Deserialize;

use crate::image_file::ImageFile;

/// Multipart field carrying the image bytes.
pub const FILE_FIELD: &str = "file";

/// Connection settings for the analysis service.
#[derive(Debug, Clone)]
pub struct AnalysisConfig {
    /// Base HTTP URL, e.g. `http://localhost:8000`.
    pub api_url: String,
    /// Upper bound on a single request, including the response body.
    pub timeout: Duration,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            api_url: "http://localhost:8000".to_string(),
            timeout: Duration::from_secs(30),
        }
    }
}

/// HTTP client for a single analysis service instance.
pub struct AnalysisApi {
    client: reqwest::Client,
    api_url: String,
    timeout: Duration,
}

/// Success payload of `POST /analyze-skin`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AnalysisResponse {
    /// Positional classification code, e.g. `OSPT`.
    pub skin_type: String,
    #[serde(default)]
    pub skin_percentage: Option<f64>,
    #[serde(default)]
    pub short_info: Option<String>,
}

/// Failure payload of `POST /analyze-skin`.
#[derive(Debug, Deserialize)]
struct ErrorResponse {
    #[serde(default)]
    detail: Option<String>,
}

/// Errors from the analysis REST API layer.
#[derive(Debug, thiserror::Error)]
pub enum AnalysisApiError {
    /// The HTTP request itself failed (network, DNS, TLS, timeout, etc.).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The service returned a non-2xx status code.
    #[error("Analysis API error ({status}): {}", detail_text(.detail))]
    Rejected {
        status: u16,
        /// `detail` field of the error payload, when present.
        detail: Option<String>,
    },

    /// A success response whose body is not JSON at all.
    #[error("Response body is not JSON: {0}")]
    InvalidBody(String),

    /// A success response whose JSON does not match [`AnalysisResponse`].
    #[error("Response does not match the analysis schema: {0}")]
    Schema(String),
}

fn detail_text(detail: &Option<String>) -> &str {
    detail.as_deref().unwrap_or("<no detail>")
}

impl AnalysisApi {
    /// Create a new API client from connection settings.
    pub fn new(config: &AnalysisConfig) -> Result<Self, AnalysisApiError> {
        let client = reqwest::Client::builder().timeout(config.timeout).build()?;
        Ok(Self::with_client(client, config))
    }

    /// Create an API client reusing an existing [`reqwest::Client`].
    ///
    /// `config.timeout` is applied to every request, overriding whatever
    /// the client was built with.
    pub fn with_client(client: reqwest::Client, config: &AnalysisConfig) -> Self {
        Self {
            client,
            api_url: config.api_url.trim_end_matches('/').to_string(),
            timeout: config.timeout,
        }
    }

    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    /// Upper bound on a single request.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Upload an image for classification.
    ///
    /// Sends a `POST /analyze-skin` multipart request with the image in
    /// the `file` field.
    pub async fn analyze_skin(&self, file: &ImageFile) -> Result<AnalysisResponse, AnalysisApiError> {
        let part = reqwest::multipart::Part::bytes(file.bytes.clone())
            .file_name(file.file_name.clone())
            .mime_str(&file.mime_type)?;
        let form = reqwest::multipart::Form::new().part(FILE_FIELD, part);

        let response = self
            .client
            .post(format!("{}/analyze-skin", self.api_url))
            .timeout(self.timeout)
            .multipart(form)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            let detail = serde_json::from_str::<ErrorResponse>(&body)
                .ok()
                .and_then(|e| e.detail)
                .filter(|d| !d.trim().is_empty());
            return Err(AnalysisApiError::Rejected {
                status: status.as_u16(),
                detail,
            });
        }

        parse_analysis(&body)
    }

    /// Probe `GET /`. Returns `true` iff the service answers with a 2xx
    /// status; network failures count as unreachable.
    pub async fn health_check(&self) -> bool {
        let request = self
            .client
            .get(format!("{}/", self.api_url))
            .timeout(self.timeout);
        match request.send().await {
            Ok(response) => response.status().is_success(),
            Err(e) => {
                tracing::debug!(error = %e, "Analysis service health check failed");
                false
            }
        }
    }
}

/// Decode a success body, separating "not JSON" from "wrong JSON shape".
pub fn parse_analysis(body: &str) -> Result<AnalysisResponse, AnalysisApiError> {
    let value: serde_json::Value =
        serde_json::from_str(body).map_err(|e| AnalysisApiError::InvalidBody(e.to_string()))?;
    serde_json::from_value(value).map_err(|e| AnalysisApiError::Schema(e.to_string()))
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn parses_full_payload() {
        let parsed = parse_analysis(
            r#"{"skin_type": "OSPT", "skin_percentage": 41.27, "short_info": "Oily skin"}"#,
        )
        .unwrap();
        assert_eq!(parsed.skin_type, "OSPT");
        assert_eq!(parsed.skin_percentage, Some(41.27));
        assert_eq!(parsed.short_info.as_deref(), Some("Oily skin"));
    }

    #[test]
    fn optional_fields_may_be_absent_or_null() {
        let parsed = parse_analysis(r#"{"skin_type": "DS", "short_info": null}"#).unwrap();
        assert_eq!(parsed.skin_percentage, None);
        assert_eq!(parsed.short_info, None);
    }

    #[test]
    fn missing_code_is_a_schema_error() {
        assert_matches!(
            parse_analysis(r#"{"short_info": "x"}"#),
            Err(AnalysisApiError::Schema(_))
        );
        assert_matches!(
            parse_analysis(r#"{"skin_type": 42}"#),
            Err(AnalysisApiError::Schema(_))
        );
    }

    #[test]
    fn non_json_body_is_invalid() {
        assert_matches!(
            parse_analysis("<html>oops</html>"),
            Err(AnalysisApiError::InvalidBody(_))
        );
    }

    #[test]
    fn trailing_slash_is_trimmed_from_base_url() {
        let config = AnalysisConfig {
            api_url: "http://host:8000/".into(),
            timeout: Duration::from_secs(3),
        };
        let api = AnalysisApi::with_client(reqwest::Client::new(), &config);
        assert_eq!(api.api_url(), "http://host:8000");
        assert_eq!(api.timeout(), Duration::from_secs(3));
    }

    #[test]
    fn default_config_targets_local_service() {
        let config = AnalysisConfig::default();
        assert_eq!(config.api_url, "http://localhost:8000");
        assert_eq!(config.timeout, Duration::from_secs(30));
    }
}
