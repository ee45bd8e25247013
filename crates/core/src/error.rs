#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Malformed skin profile: {0}")]
    MalformedProfile(String),

    #[error("Invalid product catalog: {0}")]
    InvalidCatalog(String),
}
