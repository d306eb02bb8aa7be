use thiserror::Error;

/// Main error type for Food Scout
#[derive(Error, Debug)]
pub enum FoodScoutError {
    /// Missing credentials or invalid settings, fatal at startup
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Completion error: {0}")]
    Completion(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("API error ({status}): {body}")]
    Api { status: u16, body: String },

    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    #[error("Session busy: {0}")]
    SessionBusy(String),

    #[error("Tutor error: {0}")]
    Tutor(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl FoodScoutError {
    /// Whether this error came from talking to the completion service
    pub fn is_completion_failure(&self) -> bool {
        matches!(
            self,
            Self::Completion(_) | Self::Network(_) | Self::Api { .. } | Self::MalformedResponse(_)
        )
    }
}

impl From<reqwest::Error> for FoodScoutError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            Self::MalformedResponse(err.to_string())
        } else {
            Self::Network(err.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_display() {
        let err = FoodScoutError::Api {
            status: 429,
            body: "quota exceeded".to_string(),
        };
        assert_eq!(err.to_string(), "API error (429): quota exceeded");
    }

    #[test]
    fn test_completion_failure_classification() {
        assert!(FoodScoutError::Network("refused".into()).is_completion_failure());
        assert!(FoodScoutError::MalformedResponse("no choices".into()).is_completion_failure());
        assert!(!FoodScoutError::Configuration("missing key".into()).is_completion_failure());
        assert!(!FoodScoutError::Tutor("bad".into()).is_completion_failure());
    }
}
