//! Single-flight image upload gateway.
//!
//! [`UploadGateway::submit_image`] checks the file type, sends the image to
//! the analysis service and decodes the result into a [`SkinProfile`].
//! Only one submission may be in flight; a second call made meanwhile is
//! dropped, not queued. The in-flight flag is held by an RAII guard, so it
//! is released on every exit path: success, rejection, timeout,
//! cancellation or a dropped future.

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use skinwise_core::profile::SkinProfile;
use tokio_util::sync::CancellationToken;

use crate::api::{AnalysisApi, AnalysisApiError, AnalysisConfig, AnalysisResponse};
use crate::image_file::ImageFile;

/// Outcome of a submission that did not fail.
#[derive(Debug, Clone, PartialEq)]
pub enum Submission {
    /// The image was analyzed and decoded.
    Completed(SkinProfile),
    /// Another upload was already in flight; nothing was sent.
    Dropped,
}

/// Classified upload failures. Each carries a user-facing message via
/// [`UploadError::user_message`].
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum UploadError {
    #[error("File type '{0}' is not an image")]
    InvalidFileType(String),

    #[error("Analysis server unreachable: {0}")]
    ServerUnreachable(String),

    /// The server answered with an error, or the failure could not be
    /// classified (`status` is `None` in that case).
    #[error("Analysis rejected (status {status:?}): {detail:?}")]
    AnalysisRejected {
        status: Option<u16>,
        detail: Option<String>,
    },

    #[error("Malformed analysis response: {0}")]
    MalformedProfile(String),

    #[error("Analysis timed out after {0:?}")]
    TimedOut(Duration),

    #[error("Upload cancelled")]
    Cancelled,
}

impl UploadError {
    /// Inline message for the upload section. Never a raw technical error.
    pub fn user_message(&self) -> String {
        match self {
            Self::InvalidFileType(_) => "Please upload a valid image file (JPG or PNG)".into(),
            Self::ServerUnreachable(_) => {
                "Cannot connect to analysis server. Please ensure the server is running.".into()
            }
            Self::AnalysisRejected {
                status: Some(_),
                detail,
            } => detail
                .clone()
                .unwrap_or_else(|| "Error analyzing image".into()),
            Self::AnalysisRejected { status: None, .. } | Self::MalformedProfile(_) => {
                "Error processing image. Please try again.".into()
            }
            Self::TimedOut(_) => {
                "The analysis server took too long to respond. Please try again.".into()
            }
            Self::Cancelled => "Upload cancelled.".into(),
        }
    }
}

/// Releases the in-flight flag when dropped.
struct InFlightGuard<'a>(&'a AtomicBool);

impl<'a> InFlightGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self(flag))
    }
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// Upload front door to the analysis service.
pub struct UploadGateway {
    api: AnalysisApi,
    in_flight: AtomicBool,
}

impl UploadGateway {
    pub fn new(config: &AnalysisConfig) -> Result<Self, AnalysisApiError> {
        Ok(Self::with_api(AnalysisApi::new(config)?))
    }

    pub fn with_api(api: AnalysisApi) -> Self {
        Self {
            api,
            in_flight: AtomicBool::new(false),
        }
    }

    pub fn api(&self) -> &AnalysisApi {
        &self.api
    }

    /// Whether a submission is currently awaiting the service.
    pub fn in_flight(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    /// Probe the service's liveness endpoint.
    pub async fn health_check(&self) -> bool {
        self.api.health_check().await
    }

    /// Submit an image for analysis.
    ///
    /// Returns [`Submission::Dropped`] when another submission is in
    /// flight. A non-image file fails with
    /// [`UploadError::InvalidFileType`] before any network call.
    pub async fn submit_image(
        &self,
        file: &ImageFile,
        cancel: &CancellationToken,
    ) -> Result<Submission, UploadError> {
        if self.in_flight() {
            tracing::debug!(file_name = %file.file_name, "Upload already in flight, dropping");
            return Ok(Submission::Dropped);
        }

        if !file.is_image() {
            tracing::info!(
                file_name = %file.file_name,
                mime_type = %file.mime_type,
                "Rejected non-image upload",
            );
            return Err(UploadError::InvalidFileType(file.mime_type.clone()));
        }

        let Some(_guard) = InFlightGuard::acquire(&self.in_flight) else {
            tracing::debug!(file_name = %file.file_name, "Upload already in flight, dropping");
            return Ok(Submission::Dropped);
        };

        tracing::info!(
            file_name = %file.file_name,
            bytes = file.bytes.len(),
            api_url = %self.api.api_url(),
            "Submitting image for analysis",
        );

        let result = tokio::select! {
            _ = cancel.cancelled() => Err(UploadError::Cancelled),
            result = self.api.analyze_skin(file) => result
                .map_err(|e| self.classify(e))
                .and_then(decode_profile),
        };

        match &result {
            Ok(profile) => tracing::info!(
                code = %profile.code,
                skin_type = profile.skin_type.label(),
                sensitive = profile.sensitive,
                pigmented = profile.pigmented,
                "Image analysis complete",
            ),
            Err(e) => tracing::warn!(error = %e, "Image analysis failed"),
        }

        result.map(Submission::Completed)
    }

    fn classify(&self, error: AnalysisApiError) -> UploadError {
        match error {
            AnalysisApiError::Request(e) if e.is_timeout() => {
                UploadError::TimedOut(self.api.timeout())
            }
            AnalysisApiError::Request(e) if e.is_connect() => {
                UploadError::ServerUnreachable(e.to_string())
            }
            AnalysisApiError::Request(e) => {
                tracing::warn!(error = %e, "Unclassified transport error during upload");
                UploadError::AnalysisRejected {
                    status: None,
                    detail: None,
                }
            }
            AnalysisApiError::Rejected { status, detail } => UploadError::AnalysisRejected {
                status: Some(status),
                detail,
            },
            AnalysisApiError::InvalidBody(reason) => {
                tracing::warn!(reason = %reason, "Analysis response is not JSON");
                UploadError::AnalysisRejected {
                    status: None,
                    detail: None,
                }
            }
            AnalysisApiError::Schema(reason) => UploadError::MalformedProfile(reason),
        }
    }
}

fn decode_profile(response: AnalysisResponse) -> Result<SkinProfile, UploadError> {
    SkinProfile::decode(
        &response.skin_type,
        response.skin_percentage,
        response.short_info,
    )
    .map_err(|e| UploadError::MalformedProfile(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn guard_is_exclusive_and_releases_on_drop() {
        let flag = AtomicBool::new(false);
        let guard = InFlightGuard::acquire(&flag).unwrap();
        assert!(flag.load(Ordering::Acquire));
        assert!(InFlightGuard::acquire(&flag).is_none());
        drop(guard);
        assert!(!flag.load(Ordering::Acquire));
        assert!(InFlightGuard::acquire(&flag).is_some());
    }

    #[test]
    fn rejected_message_prefers_server_detail() {
        let err = UploadError::AnalysisRejected {
            status: Some(400),
            detail: Some("Only JPG or PNG files are allowed".into()),
        };
        assert_eq!(err.user_message(), "Only JPG or PNG files are allowed");

        let err = UploadError::AnalysisRejected {
            status: Some(500),
            detail: None,
        };
        assert_eq!(err.user_message(), "Error analyzing image");
    }

    #[test]
    fn unclassified_failures_get_fallback_message() {
        let err = UploadError::AnalysisRejected {
            status: None,
            detail: None,
        };
        assert_eq!(err.user_message(), "Error processing image. Please try again.");
        assert_eq!(
            UploadError::MalformedProfile("short code".into()).user_message(),
            "Error processing image. Please try again."
        );
    }

    #[test]
    fn malformed_code_is_classified() {
        let response = AnalysisResponse {
            skin_type: "D".into(),
            skin_percentage: None,
            short_info: None,
        };
        assert!(matches!(
            decode_profile(response),
            Err(UploadError::MalformedProfile(_))
        ));
    }
}
