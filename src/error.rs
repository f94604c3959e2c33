use thiserror::Error;

/// Org chart error types
#[derive(Error, Debug)]
pub enum OrgError {
    #[error("Cycle detected in manager chain: {}", join_ids(.ids))]
    CycleDetected { ids: Vec<i64> },

    #[error("Unknown role: {0}")]
    UnknownRole(String),

    #[error("Invalid department filter: {0}")]
    InvalidDepartment(String),

    #[error("Data source error: {0}")]
    Source(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Config error: {0}")]
    Config(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

fn join_ids(ids: &[i64]) -> String {
    ids.iter()
        .map(|id| id.to_string())
        .collect::<Vec<_>>()
        .join(" -> ")
}

/// Result type alias for the engine and its collaborators
pub type OrgResult<T> = Result<T, OrgError>;

/// Helper to convert anyhow errors to OrgError
impl From<anyhow::Error> for OrgError {
    fn from(err: anyhow::Error) -> Self {
        OrgError::Internal(err.to_string())
    }
}

impl From<toml::de::Error> for OrgError {
    fn from(err: toml::de::Error) -> Self {
        OrgError::Config(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cycle_message() {
        let err = OrgError::CycleDetected { ids: vec![1, 2] };
        assert_eq!(err.to_string(), "Cycle detected in manager chain: 1 -> 2");
    }

    #[test]
    fn test_from_anyhow() {
        let err: OrgError = anyhow::anyhow!("boom").into();
        assert!(matches!(err, OrgError::Internal(ref m) if m == "boom"));
    }

    #[test]
    fn test_from_toml() {
        let parsed: Result<toml::Value, _> = toml::from_str("= broken");
        let err: OrgError = parsed.unwrap_err().into();
        assert!(matches!(err, OrgError::Config(_)));
    }
}
