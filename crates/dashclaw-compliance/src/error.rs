use thiserror::Error;

#[derive(Debug, Error)]
pub enum ComplianceError {
    #[error("failed to serialize report: {0}")]
    Serialize(#[from] serde_json::Error),
}
