use thiserror::Error;

/// Errors surfaced by drift detection. Statistical edge cases never error;
/// only the injected store can fail.
#[derive(Debug, Error)]
pub enum DriftError {
    #[error("drift store query failed: {0}")]
    Store(#[from] Box<dyn std::error::Error + Send + Sync>),
}
