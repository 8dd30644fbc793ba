use thiserror::Error;

#[derive(Debug, Error)]
pub enum SignalError {
    #[error("signal store query failed: {0}")]
    Store(#[from] Box<dyn std::error::Error + Send + Sync>),
}
