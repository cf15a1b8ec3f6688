use thiserror::Error;

pub type Result<T> = std::result::Result<T, ProbeError>;

#[derive(Debug, Error)]
pub enum ProbeError {
    #[error("failed to build HTTP client: {0}")]
    ClientBuild(#[from] reqwest::Error),

    #[error("URL template must contain {{candidate}}: {0}")]
    InvalidTemplate(String),

    #[error("identity pool is empty")]
    NoIdentities,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ProbeError::InvalidTemplate("https://example.com/".to_string());
        assert_eq!(
            err.to_string(),
            "URL template must contain {candidate}: https://example.com/"
        );
        assert_eq!(ProbeError::NoIdentities.to_string(), "identity pool is empty");
    }
}
