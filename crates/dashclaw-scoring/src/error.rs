use thiserror::Error;

/// Structural scoring failures. Bad or missing data never lands here; it
/// degrades to `no_data`/`None` sentinels on the dimension results.
#[derive(Debug, Error)]
pub enum ScoringError {
    #[error("profile {profile_id} has no dimensions")]
    NoDimensions { profile_id: String },

    #[error("no dimension had data for action {action_id}")]
    NoScoreableData { action_id: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = ScoringError::NoDimensions {
            profile_id: "sp_1".into(),
        };
        assert!(err.to_string().contains("sp_1"));
    }
}
