//! Client for the external skin-analysis service.
//!
//! [`api::AnalysisApi`] wraps the service's HTTP endpoints;
//! [`gateway::UploadGateway`] adds the single-upload guard, file-type
//! precondition, cancellation and error classification on top.

pub mod api;
pub mod gateway;
pub mod image_file;
